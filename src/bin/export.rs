//! Schema Export CLI
//!
//! Loads model definitions from a directory and prints the JSON Schema of one
//! model: the model document itself, its `$ref` wrapper, or one of the query
//! filter schemas.

use anyhow::{bail, Context};
use clap::{Parser, ValueEnum};
use repository_json_schema::config::GeneratorConfig;
use repository_json_schema::schema::DRAFT_07;
use repository_json_schema::{
    get_fields_json_schema_for, get_filter_json_schema_for, get_scope_filter_json_schema_for,
    get_where_json_schema_for, JsonSchemaCache, JsonSchemaOptions, ModelRegistry, Partial,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Kind {
    /// Model schema
    Model,
    /// Complete query filter
    Filter,
    /// `where` clause
    Where,
    /// `fields` clause
    Fields,
    /// Relation scope filter
    Scope,
}

#[derive(Parser)]
#[command(name = "schema-export")]
#[command(about = "Export the JSON Schema of a repository model")]
struct Cli {
    /// Model to export
    model: String,

    /// Directory of model definition files (overrides config)
    #[arg(short, long)]
    models: Option<PathBuf>,

    /// Which schema to export
    #[arg(short, long, value_enum, default_value = "model")]
    kind: Kind,

    /// Properties to leave out (model) or filter keys to leave out (filters)
    #[arg(short, long, value_delimiter = ',')]
    exclude: Vec<String>,

    /// Properties made optional
    #[arg(long, value_delimiter = ',')]
    optional: Vec<String>,

    /// Make every property optional
    #[arg(long)]
    partial: bool,

    /// Make nested models partial as well (implies --partial)
    #[arg(long)]
    deep: bool,

    /// Add relation navigational properties
    #[arg(long)]
    include_relations: bool,

    /// Explicit schema title
    #[arg(short, long)]
    title: Option<String>,

    /// Wrap the model schema as {"$ref", "definitions"}
    #[arg(long = "ref")]
    as_ref: bool,

    /// Omit titles on filter schemas
    #[arg(long)]
    no_title: bool,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Config file
    #[arg(short, long)]
    config: Option<String>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = GeneratorConfig::load_from(cli.config.as_deref()).context("loading configuration")?;
    let models_dir = cli.models.clone().unwrap_or_else(|| config.models_path());

    let mut registry = ModelRegistry::new();
    registry
        .load_from_directory(&models_dir)
        .with_context(|| format!("loading models from {}", models_dir.display()))?;

    let Some(model) = registry.get(&cli.model).cloned() else {
        let suggestions: Vec<String> = registry.search(&cli.model, 3).into_iter().map(|r| r.name).collect();
        if suggestions.is_empty() {
            bail!("model {} not found in {}", cli.model, models_dir.display());
        }
        bail!("model {} not found; did you mean {}?", cli.model, suggestions.join(", "));
    };

    let mut schema = match cli.kind {
        Kind::Model => {
            let mut options = JsonSchemaOptions::new().exclude(cli.exclude.clone()).optional(cli.optional.clone());
            options.partial = match (cli.partial, cli.deep) {
                (_, true) => Partial::Deep,
                (true, false) => Partial::Shallow,
                _ => Partial::Off,
            };
            options.include_relations = cli.include_relations || config.defaults.include_relations;
            options.title = cli.title.clone();

            if options.include_relations {
                registry.validate_relations().context("resolving relations")?;
            }

            let mut cache = JsonSchemaCache::new();
            if cli.as_ref {
                cache.get_json_schema_ref(&registry, &model.name, &options)?
            } else {
                (*cache.get_json_schema(&registry, &model.name, &options)?).clone()
            }
        }
        kind => {
            let mut options = config.filter_options().exclude(cli.exclude.clone());
            if cli.no_title {
                options.set_title = false;
            }
            match kind {
                Kind::Filter => get_filter_json_schema_for(&model, &options),
                Kind::Where => get_where_json_schema_for(&model, &options),
                Kind::Fields => get_fields_json_schema_for(&model, &options),
                _ => get_scope_filter_json_schema_for(&model, &options),
            }
        }
    };

    if config.output.include_schema_uri {
        schema.meta_schema = Some(DRAFT_07.to_string());
    }

    let rendered = config.output.format.render(&schema)?;
    match cli.output {
        Some(path) => {
            std::fs::write(&path, rendered + "\n").with_context(|| format!("writing {}", path.display()))?;
            eprintln!("Exported {:?} schema of {} to {}", cli.kind, model.name, path.display());
        }
        None => println!("{}", rendered),
    }

    Ok(())
}
