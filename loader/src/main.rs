//! Paysheet loader CLI - stage earnings from a CSV into PS_PSHUP_TXN
//!
//! ```bash
//! paysheet-load earnings.csv 2019-01-01 2019-01-31 BWK GFU --config ps.ini
//! paysheet-load earnings.csv "Jan 1 2019" "Jan 31 2019" BWK GFU   # PS_DATABASE_* env
//! ```
//!
//! Connection settings come from `--config` or, without it, from
//! `PS_DATABASE_*` environment variables (a `.env` file is read first).
//! `RUST_LOG` controls diagnostic output.

use chrono::Local;
use clap::Parser;
use paysheet::{
    config, load, parse_date, prepare_file, BatchContext, LoadReport, LoadResult, OracleStore,
    PayPeriod, Privilege, SourceTag, DEFAULT_WAIT,
};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "paysheet-load")]
#[command(
    about = "Load payroll earnings from a CSV into the PeopleSoft paysheet staging table",
    long_about = None
)]
struct Cli {
    /// CSV file to import
    csv: PathBuf,

    /// Pay period start date
    pay_start: String,

    /// Pay period end date
    pay_end: String,

    /// Pay group code
    pay_group: String,

    /// Company code
    company: String,

    /// Path to an INI config file with a [connection] section
    #[arg(long)]
    config: Option<PathBuf>,

    /// Connect as SYSDBA (you don't need this unless you know why it's here)
    #[arg(long)]
    as_sysdba: bool,

    /// CSV delimiter (auto-detect if not specified)
    #[arg(short, long)]
    delimiter: Option<char>,

    /// Seconds to wait before deleting previously staged rows
    #[arg(long, default_value_t = DEFAULT_WAIT.as_secs())]
    wait: u64,

    /// Only print warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,paysheet::console=off"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    paysheet::logs::CONSOLE.set_quiet(cli.quiet);

    match cmd_load(&cli) {
        Ok(report) => {
            eprintln!(
                "\n✨ Done! {} removed, {} inserted, {} skipped",
                report.purged, report.inserted, report.skipped
            );
        }
        Err(e) => {
            eprintln!("❌ Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn cmd_load(cli: &Cli) -> LoadResult<LoadReport> {
    let privilege = if cli.as_sysdba { Privilege::Sysdba } else { Privilege::Normal };
    let descriptor = config::resolve(cli.config.as_deref(), privilege)?;

    let period = PayPeriod::new(parse_date(&cli.pay_start)?, parse_date(&cli.pay_end)?)?;
    let context = BatchContext {
        source: SourceTag::OTHER,
        created_at: Local::now().naive_local(),
        company: cli.company.clone(),
        paygroup: cli.pay_group.clone(),
        period,
    };

    let batch = prepare_file(&cli.csv, cli.delimiter, context)?;

    eprintln!("🔌 Connecting to {}:{} as {}", descriptor.host, descriptor.port, descriptor.user);
    let mut store = OracleStore::connect(&descriptor)?;

    let wait = Duration::from_secs(cli.wait);
    load::warn_and_wait(&load::confirmation_message(&batch, &cli.csv, wait), wait);

    load::run(&mut store, &batch)
}
