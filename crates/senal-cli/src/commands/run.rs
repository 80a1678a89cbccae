//! Graph execution command: load, tick, render, dump viewer signals.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use tracing::info;
use senal_graph::{Graph, HeadlessUi};
use senal_nodes::{builtin_registry, save_csv, CsvData};

#[derive(Args)]
pub struct RunArgs {
    /// Graph JSON file to load
    #[arg(value_name = "GRAPH")]
    graph: PathBuf,

    /// Number of frames to run
    #[arg(long, default_value = "1")]
    ticks: usize,

    /// Directory to write one CSV per viewer (final frame only)
    #[arg(long)]
    out: Option<PathBuf>,

    /// Decimal precision for CSV output
    #[arg(long, default_value = "6")]
    precision: usize,
}

pub fn run(args: RunArgs) -> anyhow::Result<()> {
    let json = fs::read_to_string(&args.graph)
        .with_context(|| format!("reading graph file '{}'", args.graph.display()))?;
    let mut graph = Graph::load(&json, builtin_registry())
        .with_context(|| format!("loading graph '{}'", args.graph.display()))?;

    info!(nodes = graph.len(), "graph loaded");

    let mut ui = HeadlessUi;
    for _ in 0..args.ticks {
        graph.tick();
        graph.render(&mut ui);
    }

    let viewers: Vec<String> = graph
        .nodes()
        .filter(|n| matches!(n.type_name(), "ViewerNode" | "MultiViewerNode"))
        .map(|n| n.name().to_string())
        .collect();

    if viewers.is_empty() {
        println!("graph has no viewers; nothing to report");
        return Ok(());
    }

    for name in &viewers {
        let node = graph.node(name).expect("viewer listed above");
        let ports: Vec<String> = node.input_names().iter().map(|p| p.to_string()).collect();

        let mut columns = Vec::new();
        for port in &ports {
            let value = graph.input_value(name, port)?;
            let samples = value.as_signal().unwrap_or(&[]).to_vec();
            println!("{name}.{port}: {} samples", samples.len());
            columns.push((port.clone(), samples));
        }

        if let Some(dir) = &args.out {
            fs::create_dir_all(dir)
                .with_context(|| format!("creating output directory '{}'", dir.display()))?;
            let path = dir.join(format!("{name}.csv"));
            save_csv(&path, &CsvData { columns }, args.precision)
                .with_context(|| format!("writing '{}'", path.display()))?;
            println!("wrote {}", path.display());
        }
    }

    Ok(())
}
