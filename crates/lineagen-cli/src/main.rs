use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use lineagen_core::catalog::ColumnTypeCatalog;
use lineagen_core::Error as CoreError;
use lineagen_generate::{
    generate_workflow, GenerateOptions, InMemoryWorkflow, SampleRange,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Error)]
enum CliError {
    #[error("core error: {0}")]
    Core(#[from] CoreError),
    #[error("workflow error: {0}")]
    Workflow(#[from] lineagen_core::workflow::WorkflowError),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

#[derive(Parser, Debug)]
#[command(name = "lineagen", version, about = "Lineagen CLI")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Generate(GenerateArgs),
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Output directory for generated artifacts.
    #[arg(long, default_value = "out")]
    out: PathBuf,
    /// Name of the generated workflow.
    #[arg(long, default_value = "workflow")]
    name: String,
    /// Number of derived versions to generate.
    #[arg(long, default_value_t = 10)]
    versions: usize,
    /// Number of columns in the base artifact.
    #[arg(long, default_value_t = 10)]
    columns: usize,
    /// Number of rows in the base artifact.
    #[arg(long, default_value_t = 1000)]
    rows: u64,
    /// Branching factor biasing source selection toward recent artifacts.
    #[arg(long, default_value_t = 1.0)]
    bfactor: f64,
    /// Seed for deterministic generation.
    #[arg(long)]
    seed: Option<u64>,
    /// Lower bound for sample fractions.
    #[arg(long, default_value_t = 0.1)]
    sample_min: f64,
    /// Upper bound for sample fractions.
    #[arg(long, default_value_t = 0.99)]
    sample_max: f64,
    /// Directory with custom column type lists.
    #[arg(long)]
    catalog_dir: Option<PathBuf>,
}

fn main() -> Result<(), CliError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();

    match cli.command {
        Command::Generate(args) => run_generate(args),
    }
}

fn run_generate(args: GenerateArgs) -> Result<(), CliError> {
    let GenerateArgs {
        out,
        name,
        versions,
        columns,
        rows,
        bfactor,
        seed,
        sample_min,
        sample_max,
        catalog_dir,
    } = args;

    if versions == 0 {
        return Err(CliError::InvalidConfig(
            "versions must be at least 1".to_string(),
        ));
    }
    if columns == 0 {
        return Err(CliError::InvalidConfig(
            "columns must be at least 1".to_string(),
        ));
    }
    if !(0.0..=1.0).contains(&sample_min)
        || !(0.0..=1.0).contains(&sample_max)
        || sample_min > sample_max
    {
        return Err(CliError::InvalidConfig(
            "sample bounds must satisfy 0 <= min <= max <= 1".to_string(),
        ));
    }
    if bfactor <= 0.0 {
        return Err(CliError::InvalidConfig(
            "branching factor must be positive".to_string(),
        ));
    }

    let catalog = match catalog_dir {
        Some(dir) => ColumnTypeCatalog::from_dir(&dir)?,
        None => ColumnTypeCatalog::builtin(),
    };

    let seed = seed.unwrap_or_else(rand::random);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    tracing::info!(event = "seed_selected", seed = seed);

    let options = GenerateOptions {
        target_versions: versions,
        base_columns: columns,
        base_rows: rows,
        branching_factor: bfactor,
        sample_range: SampleRange {
            min: sample_min,
            max: sample_max,
        },
        ..GenerateOptions::default()
    };

    let mut workflow = InMemoryWorkflow::new(name, out.clone(), &catalog);
    let report = generate_workflow(&mut workflow, &catalog, &options, &mut rng)?;

    let report_path = out.join("run_report.json");
    std::fs::write(&report_path, serde_json::to_vec_pretty(&report)?)?;
    tracing::info!(event = "report_written", path = %report_path.display());

    Ok(())
}
