//! Timing Table CLI Application
//!
//! Command-line front end over the timing-locator library. It adds:
//! - Report definitions (catalogs, flag combinations) as TOML data
//! - LaTeX table rendering
//! - JSON export of the resolved cells
//!
//! Run without arguments it reads `timing_results.txt` from the working
//! directory and prints the two built-in Round5 tables to stdout.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use timing_locator::{MatchMode, RecordLocator};
use timing_table::{config, report, ReportConfig};

/// Default timing log, relative to the working directory
const DEFAULT_LOG: &str = "timing_results.txt";

/// Timing Table - Render KEM speed-test logs as LaTeX comparison tables
#[derive(Parser, Debug)]
#[command(name = "timing-table")]
#[command(about = "Render KEM timing logs as LaTeX comparison tables", long_about = None)]
#[command(version)]
struct Args {
    /// Path to the timing log to read
    #[arg(short, long, value_name = "FILE", default_value = DEFAULT_LOG)]
    log: PathBuf,

    /// Path to a report definition (report.toml) replacing the built-in tables
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output file for the rendered tables (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// How search tokens are matched against log lines
    #[arg(long, value_enum)]
    match_mode: Option<MatchModeArg>,

    /// Emit the resolved cells as JSON instead of LaTeX
    #[arg(long)]
    json: bool,

    /// Print the effective report definition as TOML and exit
    #[arg(long)]
    dump_config: bool,

    /// Verbosity level (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum MatchModeArg {
    /// Token may appear anywhere in the line (may overmatch)
    Substring,
    /// Token must equal a whole field of the line
    Token,
}

impl From<MatchModeArg> for MatchMode {
    fn from(arg: MatchModeArg) -> Self {
        match arg {
            MatchModeArg::Substring => MatchMode::Substring,
            MatchModeArg::Token => MatchMode::Token,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(args.verbose, args.quiet);

    log::info!("Timing Table CLI v{}", env!("CARGO_PKG_VERSION"));
    log::debug!("Using locator library v{}", timing_locator::VERSION);

    let mut definition = match &args.config {
        Some(path) => {
            log::info!("Loading report definition from: {:?}", path);
            config::load_config(path)?
        }
        None => ReportConfig::default(),
    };
    if let Some(mode) = args.match_mode {
        definition.locator.match_mode = mode.into();
    }
    if definition.locator.match_mode == MatchMode::Token {
        log::warn!("Token matching enabled; results may differ from substring matching");
    }

    let document = if args.dump_config {
        toml::to_string_pretty(&definition).context("Failed to serialize report definition")?
    } else {
        render_report(&definition, &args.log, args.json)?
    };

    write_output(args.output.as_deref(), &document)
}

/// Build every table before anything is written, so a failed lookup
/// leaves no partial document behind
fn render_report(definition: &ReportConfig, log_path: &Path, json: bool) -> Result<String> {
    let locator = RecordLocator::new(log_path, definition.locator.clone())
        .context("Invalid locator configuration")?;
    log::info!("Reading timing log: {:?}", locator.path());

    if json {
        let mut tables = Vec::with_capacity(definition.tables.len());
        for spec in &definition.tables {
            tables.push(report::resolve_table(spec, &locator)?);
        }
        let mut text = serde_json::to_string_pretty(&tables).context("Failed to serialize tables")?;
        text.push('\n');
        return Ok(text);
    }

    let mut document = String::new();
    for spec in &definition.tables {
        let table = report::build_table(spec, &locator)
            .with_context(|| format!("Failed to build table {}", spec.label))?;
        document.push_str(&table);
        document.push('\n');
    }
    Ok(document)
}

fn write_output(path: Option<&Path>, document: &str) -> Result<()> {
    match path {
        Some(path) => {
            fs::write(path, document).with_context(|| format!("Failed to write output: {:?}", path))?;
            log::info!("Wrote {:?}", path);
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(document.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}
