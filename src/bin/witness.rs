use clap::Parser;
use std::{io, path::PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;
use witness_memory::{
    Strategy, WitnessConfig, WitnessEngine, WitnessError, WitnessStats,
    estimate_memory,
    stream::{self, Mode, STDIN_PATH},
};

const AFTER_HELP: &str = "\
With no FILE, or when FILE is -, read standard input.

Options may also be set through WITNESS_STRATEGY, WITNESS_CAPACITY,
WITNESS_FALSE_POSITIVE_RATE and WITNESS_LIVE_FILTERS (or a .env file);
command-line flags take precedence. Set RUST_LOG for diagnostics on stderr.

Examples:
  witness
        probabilistic deduplication from stdin to stdout
  witness -o s f - g
        deduplicate f, then stdin, then g, to output s
  witness -e -l 10000000 -f 0.000000001
        show estimated memory usage for given options
  witness -d -D -l 65536
        output duplicates and avoid false positives with deterministic
        mode, lower entry limit to avoid excessive memory usage";

/// Concatenate FILE(s) and filter or output duplicate lines.
#[derive(Parser)]
#[command(name = "witness", author, version, about, long_about = None, after_help = AFTER_HELP)]
struct Cli {
    /// Output only duplicates instead of filtering them out
    #[arg(short = 'd', long)]
    duplicates: bool,

    /// Use deterministic mode instead of probabilistic
    /// (requires an order of magnitude more memory)
    #[arg(short = 'D', long)]
    deterministic: bool,

    /// Limit after which entries are forgotten
    #[arg(short, long)]
    limit: Option<usize>,

    /// Chance of false positive, between 0.0 and 1.0 (probabilistic only)
    #[arg(short, long)]
    fpr: Option<f64>,

    /// Number of live Bloom filters in the bank (probabilistic only)
    #[arg(short = 'L', long)]
    live_filters: Option<usize>,

    /// Output file, defaults to stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output estimated memory usage for given options and exit
    #[arg(short, long)]
    estimate_memory: bool,

    /// Print the memory estimate as JSON
    #[arg(long, requires = "estimate_memory")]
    json: bool,

    /// Input files, processed in order
    #[arg(value_name = "FILE")]
    files: Vec<PathBuf>,
}

impl Cli {
    fn config(&self) -> Result<WitnessConfig, WitnessError> {
        let mut config = WitnessConfig::from_env()?;
        if self.deterministic {
            config.strategy = Strategy::Deterministic;
        }
        if let Some(limit) = self.limit {
            config.capacity = limit;
        }
        if let Some(fpr) = self.fpr {
            config.false_positive_rate = fpr;
        }
        if let Some(live_filters) = self.live_filters {
            config.live_filters = live_filters;
        }
        config.validate()?;
        Ok(config)
    }

    fn inputs(&self) -> Vec<PathBuf> {
        if self.files.is_empty() {
            vec![PathBuf::from(STDIN_PATH)]
        } else {
            self.files.clone()
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let config = cli.config()?;

    if cli.estimate_memory {
        let estimate = estimate_memory(&config)?;
        if cli.json {
            println!("{}", serde_json::to_string_pretty(&estimate)?);
        } else {
            println!("{estimate}");
        }
        return Ok(());
    }

    let engine = WitnessEngine::new(&config)?;
    info!(
        strategy = %config.strategy,
        capacity = config.capacity,
        memory_bytes = engine.memory_bytes(),
        "witness memory ready"
    );

    let mode = if cli.duplicates {
        Mode::Duplicates
    } else {
        Mode::Unique
    };

    match stream::process_paths(&engine, mode, cli.output.as_ref(), &cli.inputs())
    {
        Ok(stats) => {
            info!(
                lines_read = stats.lines_read,
                lines_written = stats.lines_written,
                "done"
            );
            Ok(())
        }
        // downstream closed early, e.g. piped into `head`
        Err(WitnessError::Io(e)) if e.kind() == io::ErrorKind::BrokenPipe => {
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
