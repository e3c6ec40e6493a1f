use clap::Parser;
use color_eyre::eyre::WrapErr;
use fincompare::util::io::atomic_write;
use fincompare::{OutputFormat, RunOptions, init_logging, run};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "fincompare")]
#[command(about = "Compare buying vs renting a house, or severance vs pension fund, over many years")]
struct Args {
    /// Scenario file (YAML)
    scenario: PathBuf,

    /// Seed for randomly varying rates
    #[arg(short, long, default_value_t = 42)]
    seed: u64,

    /// Run a Monte Carlo batch of this many projections
    #[arg(short, long)]
    iterations: Option<usize>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Write the report to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Reference tables for fund returns and CCNL contributions (YAML)
    #[arg(short, long)]
    reference: Option<PathBuf>,

    /// Path to the data directory (default: ~/.fincompare/)
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Log level (debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".fincompare")
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    let data_dir = args.data_dir.unwrap_or_else(default_data_dir);

    init_logging(&data_dir, &args.log_level)?;

    let options = RunOptions {
        seed: args.seed,
        iterations: args.iterations,
        format: args.format,
        reference: args.reference,
    };
    let current_year = jiff::Zoned::now().year();
    let report = run(&args.scenario, &options, current_year)?;

    match args.output {
        Some(path) => {
            atomic_write(&path, &report)
                .wrap_err_with(|| format!("failed to write {}", path.display()))?;
            tracing::info!(output = %path.display(), "report written");
        }
        None => print!("{report}"),
    }

    tracing::info!("Application shutting down");
    Ok(())
}
