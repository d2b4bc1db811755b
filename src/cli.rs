//! CLI: YAML documents → (schema | rust)
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};

use crate::aggregate::DEFAULT_AGGREGATE_NAME;
use crate::generate::{Generation, GenerationOutput, GeneratorConfig};
use crate::graph::DEFAULT_MAX_DEPTH;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// infer class definitions from YAML configuration documents and output either a
/// JSON view of the class graph or a Rust module with a reloadable aggregate
#[derive(Parser, Debug)]
#[command(version)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,

    /// more log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// infer and print the class registry, manifest and aggregate as JSON
    Schema(SchemaOut),
    /// infer and emit Rust structs plus the aggregate
    Rust(RustOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// a single YAML file or a directory searched recursively for *.yaml / *.yml
    path: PathBuf,

    /// class name for single-file input
    #[arg(long, default_value = "Config")]
    root_type: String,

    /// name of the aggregate type
    #[arg(long, default_value = DEFAULT_AGGREGATE_NAME)]
    aggregate_name: String,

    /// nesting limit per document
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,
}

#[derive(clap::Parser, Debug)]
struct SchemaOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// output .json file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(clap::Parser, Debug)]
struct RustOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// output .rs file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    fn generator_config(&self) -> GeneratorConfig {
        GeneratorConfig {
            root_type: self.root_type.clone(),
            aggregate_name: self.aggregate_name.clone(),
            max_depth: self.max_depth,
        }
    }

    fn generate(&self) -> anyhow::Result<GenerationOutput> {
        let output = Generation::new(self.generator_config())
            .run_path(&self.path)
            .with_context(|| format!("generation failed for {}", self.path.display()))?;
        if !output.diagnostics.is_empty() {
            tracing::warn!(skipped = output.diagnostics.len(), "some documents were skipped");
        }
        Ok(output)
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn run(&self) -> anyhow::Result<()> {
        match &self.cmd {
            Command::Schema(target) => {
                let output = target.input_settings.generate()?;
                let schema_src = serde_json::to_string_pretty(&output)
                    .context("failed to serialize the class graph")?;
                write_output(target.out.as_deref(), &schema_src)
            }
            Command::Rust(target) => {
                let output = target.input_settings.generate()?;
                let mut cg = crate::codegen::Codegen::new();
                cg.emit(&output);
                let rust_src = cg.into_string();
                write_output(target.out.as_deref(), &rust_src)
            }
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn write_output(out: Option<&Path>, src: &str) -> anyhow::Result<()> {
    let Some(out) = out else {
        println!("{src}");
        return Ok(());
    };
    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(out, src).with_context(|| format!("failed to write {}", out.display()))?;
    tracing::info!(path = %out.display(), "wrote output");
    Ok(())
}
