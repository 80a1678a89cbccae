//! Registry listing command.

use clap::Args;
use senal_nodes::builtin_registry;

#[derive(Args)]
pub struct NodesArgs {}

pub fn run(_args: NodesArgs) -> anyhow::Result<()> {
    let registry = builtin_registry();
    println!("registered node types:");
    for tag in registry.type_names() {
        println!("  {tag}");
    }
    Ok(())
}
