//! FILENAME: app/report-cli/src/main.rs
//! `report`: renders a grouped report job to text, JSON, CSV or XLSX.

mod error;
mod job;
mod logging;

use std::io::Write;
use std::path::PathBuf;

use clap::{ArgAction, Parser};
use log::{error, info};
use report_format::{render_report, ReportFormat};

use crate::error::CliError;
use crate::job::ReportJob;

#[derive(Parser, Debug)]
#[command(name = "report", version, about = "Render grouped reports from a JSON job")]
struct Args {
    /// Report job: definition, field metadata and dataset
    #[arg(short, long)]
    job: PathBuf,

    /// Output format: text, json, csv or xlsx
    #[arg(short, long, default_value = "text")]
    format: String,

    /// Write the report here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// One row per value of the first grouping field
    #[arg(long)]
    digest: bool,

    /// Start a new page before each group at LEVEL (0 = outermost)
    #[arg(long = "page-break", value_name = "LEVEL")]
    page_breaks: Vec<usize>,

    /// Suppress per-group totals rows
    #[arg(long)]
    no_totals: bool,

    /// Append a grand total row
    #[arg(long)]
    grand_total: bool,

    /// Also write log lines to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let args = Args::parse();

    let env_level = std::env::var(logging::LOG_ENV).ok();
    let level = logging::resolve_level(args.verbose, env_level.as_deref());
    if let Err(e) = logging::init(level, args.log_file.as_deref()) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    if let Err(e) = run(&args) {
        error!("{}", e);
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), CliError> {
    let format: ReportFormat = args.format.parse()?;

    let mut job = ReportJob::load(&args.job)?;
    if args.no_totals {
        job.definition.draw_totals = false;
    }
    if args.grand_total {
        job.definition.draw_grand_total = true;
    }
    for &level in &args.page_breaks {
        job.page_breaks.set(level, true);
    }

    let document = job.build_document(args.digest)?;
    let bytes = render_report(&document, format)?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, &bytes)?;
            info!("wrote {} report ({} bytes) to {:?}", format, bytes.len(), path);
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&bytes)?;
            stdout.flush()?;
        }
    }
    Ok(())
}
