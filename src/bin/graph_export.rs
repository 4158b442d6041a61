use anyhow::Context;
use clap::Parser;
use repository_json_schema::config::GeneratorConfig;
use repository_json_schema::{ModelGraph, ModelRegistry};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "model-graph-export")]
#[command(about = "Export the model reference graph to DOT format")]
struct Cli {
    /// Directory of model definition files (overrides config)
    #[arg(short, long)]
    models: Option<PathBuf>,

    /// Output file (defaults to models.dot)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print reference cycles instead of writing DOT
    #[arg(long)]
    cycles: bool,

    /// Config file
    #[arg(short, long)]
    config: Option<String>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = GeneratorConfig::load_from(cli.config.as_deref()).context("loading configuration")?;
    let models_dir = cli.models.unwrap_or_else(|| config.models_path());

    println!("Loading models from: {:?}", models_dir);
    let mut registry = ModelRegistry::new();
    registry
        .load_from_directory(&models_dir)
        .with_context(|| format!("loading models from {}", models_dir.display()))?;
    let graph = ModelGraph::build(&registry);

    println!("Graph loaded: {} models, {} edges", graph.model_count(), graph.edge_count());

    if cli.cycles {
        let cycles = graph.cycles();
        if cycles.is_empty() {
            println!("No reference cycles");
        }
        for group in cycles {
            println!("  cycle: {}", group.join(" -> "));
        }
        return Ok(());
    }

    let output_path = cli.output.unwrap_or_else(|| PathBuf::from("models.dot"));
    std::fs::write(&output_path, graph.to_dot()).with_context(|| format!("writing {}", output_path.display()))?;
    println!("Exported DOT to: {:?}", output_path);

    Ok(())
}
