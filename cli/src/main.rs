use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use structgen_core::{Schema, SchemaSummary, generate_all, resolve};
use structgen_loader::{DocumentSet, GenerateConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Crates whose logs follow the verbosity flag.
const CRATES: &[&str] = &["schema_structgen", "structgen_core", "structgen_loader"];

/// Output format for the flattened model.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliOutputFormat {
    Json,
    Yaml,
}

#[derive(Debug, Parser)]
#[command(name = "schema-structgen")]
#[command(about = "Resolve declarative schemas and generate Go structs", version)]
struct Cli {
    #[command(flatten)]
    verbose: Verbosity<WarnLevel>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Resolve schemas and write Go struct definitions.
    Generate(GenerateArgs),
    /// Resolve schemas and print the flattened property model.
    Resolve(ResolveArgs),
    /// Parse and resolve schemas, reporting the first error.
    Validate(ValidateArgs),
}

#[derive(Debug, Args)]
struct GenerateArgs {
    /// Schema files and/or directories (overrides config inputs).
    inputs: Vec<PathBuf>,
    /// Path to a structgen YAML config.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Output Go file (default: stdout).
    #[arg(long)]
    output: Option<PathBuf>,
    /// Go package name.
    #[arg(long)]
    package: Option<String>,
    /// Suffix appended to every struct name.
    #[arg(long)]
    suffix: Option<String>,
    /// Struct tag key (e.g. json, yaml, db).
    #[arg(long)]
    annotation: Option<String>,
}

#[derive(Debug, Args)]
struct ResolveArgs {
    /// Schema files and/or directories.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: CliOutputFormat,
    /// Suffix appended to object type names.
    #[arg(long, default_value = "")]
    suffix: String,
}

#[derive(Debug, Args)]
struct ValidateArgs {
    /// Schema files and/or directories.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
}

fn main() {
    let cli = Cli::parse();
    init_logging(&cli.verbose);

    let result = match cli.command {
        Command::Generate(args) => run_generate(args),
        Command::Resolve(args) => run_resolve(args),
        Command::Validate(args) => run_validate(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

/// Logs go to stderr so generated output on stdout stays clean. `RUST_LOG`
/// takes precedence over `-v`.
fn init_logging(verbose: &Verbosity<WarnLevel>) {
    let level = verbose.tracing_level_filter();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let allowlist: Vec<String> = CRATES.iter().map(|c| format!("{c}={level}")).collect();
        EnvFilter::new(format!("warn,{}", allowlist.join(",")))
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_generate(args: GenerateArgs) -> Result<(), String> {
    let mut config = match &args.config {
        Some(path) => GenerateConfig::load(path)
            .map_err(|err| format!("Failed to load config '{}': {err}", path.display()))?,
        None => GenerateConfig::default(),
    };
    if !args.inputs.is_empty() {
        config.inputs = args.inputs;
    }
    if args.output.is_some() {
        config.output = args.output;
    }
    if let Some(package) = args.package {
        config.options.package = package;
    }
    if let Some(suffix) = args.suffix {
        config.options.suffix = suffix;
    }
    if let Some(annotation) = args.annotation {
        config.options.annotation = annotation;
    }

    let schemas = load_and_resolve(&config.inputs)?;
    let source = generate_all(&schemas, &config.options).map_err(|err| err.to_string())?;

    match &config.output {
        Some(path) => {
            create_parent_dir(path)?;
            fs::write(path, source)
                .map_err(|err| format!("Failed to write '{}': {err}", path.display()))?;
            println!(
                "Generated {} schema(s) into '{}'.",
                schemas.len(),
                path.display()
            );
        }
        None => print!("{source}"),
    }
    Ok(())
}

fn run_resolve(args: ResolveArgs) -> Result<(), String> {
    let schemas = load_and_resolve(&args.inputs)?;
    let summaries: Vec<SchemaSummary> = schemas
        .iter()
        .map(|schema| schema.summary(&args.suffix))
        .collect();

    let raw = match args.format {
        CliOutputFormat::Json => {
            serde_json::to_string_pretty(&summaries).map_err(|err| err.to_string())? + "\n"
        }
        CliOutputFormat::Yaml => serde_yaml::to_string(&summaries).map_err(|err| err.to_string())?,
    };
    print!("{raw}");
    Ok(())
}

fn run_validate(args: ValidateArgs) -> Result<(), String> {
    let schemas = load_and_resolve(&args.inputs)?;
    println!(
        "Validated {} schema(s) from {} input(s).",
        schemas.len(),
        args.inputs.len()
    );
    Ok(())
}

fn load_and_resolve(inputs: &[PathBuf]) -> Result<Vec<Schema>, String> {
    let documents = DocumentSet::builder()
        .from_paths(inputs.iter().cloned())
        .build()
        .map_err(|err| err.to_string())?;
    info!(documents = documents.len(), "loaded schema documents");
    resolve(documents.documents()).map_err(|err| err.to_string())
}

fn create_parent_dir(path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|err| {
                format!(
                    "Failed to create output directory '{}': {err}",
                    parent.display()
                )
            })?;
        }
    }
    Ok(())
}
