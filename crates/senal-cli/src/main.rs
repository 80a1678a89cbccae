//! Señal CLI - headless host for the Señal signal playground.

mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "senal")]
#[command(author, version, about = "Señal signal playground CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Design a digital IIR filter and print its coefficients
    Design(commands::design::DesignArgs),

    /// Load a graph file, tick it, and dump the viewer signals
    Run(commands::run::RunArgs),

    /// List the registered node types
    Nodes(commands::nodes::NodesArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Design(args) => commands::design::run(args),
        Commands::Run(args) => commands::run::run(args),
        Commands::Nodes(args) => commands::nodes::run(args),
    }
}
