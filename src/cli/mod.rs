//! # bgp-filters
//!
//! Reads every `*.toml` file in the config directory and runs `bgpq4` for each
//! enabled section:
//!
//! ```sh
//! $ bgp-filters --config-dir config --output-dir output
//!  Source  Requests  Succeeded  Disabled  Failed  Merged
//! ----------------------------------------------------------------------------
//!  demo    3         2          1         0       output/demo/filtersprefix.conf
//! ```
//!
//! Use `--dry-run` to print the bgpq4 arguments without running anything,
//! and `--report <file>` to save a JSON summary of the run.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use bgp_filters::query::{DEFAULT_PROGRAM, DEFAULT_TIMEOUT};
use bgp_filters::{Error, OutputFormat, QueryOptions, RunReport};

#[cfg(feature = "cli")]
mod table;

#[derive(Parser, Debug)]
#[clap(name = "bgp-filters", version, rename_all = "kebab-case")]
/// Generate BGP prefix filters with bgpq4
pub struct Args {
    /// Directory of *.toml filter configs
    #[clap(short, long, default_value = "config")]
    pub config_dir: PathBuf,
    /// Directory receiving <config>/filters/*.conf and <config>/filtersprefix.conf
    #[clap(short, long, default_value = "output")]
    pub output_dir: PathBuf,
    /// bgpq4 binary to run
    #[clap(long, default_value = DEFAULT_PROGRAM)]
    pub bgpq4: String,
    /// Router config format bgpq4 should generate
    #[clap(short, long, arg_enum, default_value = "bird")]
    pub format: OutputFormat,
    /// IRR server to query (bgpq4 -h)
    #[clap(long)]
    pub irr_host: Option<String>,
    /// IRR sources to use, e.g. "RADB,RIPE" (bgpq4 -S)
    #[clap(long)]
    pub sources: Option<String>,
    /// Seconds to wait for each bgpq4 query, 0 waits forever
    #[clap(short, long, default_value_t = DEFAULT_TIMEOUT)]
    pub timeout: u64,
    /// Write a JSON report of the run to this file
    #[clap(long)]
    pub report: Option<PathBuf>,
    /// Show the bgpq4 commands without running them
    #[clap(long)]
    pub dry_run: bool,
    /// Show debug logs (additive for trace logs)
    #[clap(short, parse(from_occurrences))]
    pub verbose: u8,
}

impl Args {
    pub fn query_options(&self) -> QueryOptions {
        QueryOptions {
            program: self.bgpq4.clone(),
            format: self.format,
            irr_host: self.irr_host.clone(),
            sources: self.sources.clone(),
            timeout: match self.timeout {
                0 => None,
                secs => Some(Duration::from_secs(secs)),
            },
        }
    }
}

#[cfg(feature = "cli")]
pub fn print_error(err: &Error) {
    use colored::*;
    eprintln!("{}", format!("Error: {}", err).red());
}

#[cfg(not(feature = "cli"))]
pub fn print_error(err: &Error) {
    eprintln!("Error: {}", err);
}

/// Per-source summary printed at the end of a run
#[cfg(feature = "cli")]
pub fn print_summary(report: &RunReport) {
    use bgp_filters::utils::format_elapsed_time;
    use colored::*;

    use table::{OutputTable, SourceSummaryRow};

    let mut table = OutputTable::new();
    for source in &report.sources {
        table.add_row(&SourceSummaryRow(source));
    }
    table.print();

    let footer = format!(
        "{} filter(s) generated, {} failed in {}",
        report.succeeded(),
        report.failed_count(),
        format_elapsed_time(report.elapsed())
    );
    if report.is_clean() {
        println!("{}", footer.green());
    } else {
        println!("{}", footer.yellow());
    }
}

#[cfg(not(feature = "cli"))]
pub fn print_summary(report: &RunReport) {
    for source in &report.sources {
        println!(
            "{}: {} succeeded, {} disabled, {} failed",
            source.name,
            source.succeeded(),
            source.disabled(),
            source.failed_count()
        );
    }
}
