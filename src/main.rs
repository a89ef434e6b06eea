use std::process;

use clap::Parser;
use env_logger::Builder;
use log::{debug, error, info, LevelFilter};

use bgp_filters::{Bgpq4, Runner};

mod cli;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = cli::Args::parse();

    let (crate_level, other_level) = match args.verbose {
        0 => (LevelFilter::Info, LevelFilter::Warn),
        1 => (LevelFilter::Debug, LevelFilter::Warn),
        2 => (LevelFilter::Trace, LevelFilter::Warn),
        _ => (LevelFilter::Trace, LevelFilter::Trace),
    };
    Builder::new()
        .filter(Some("bgp_filters"), crate_level)
        .filter(None, other_level)
        .init();
    debug!("Logging at levels {}/{}", crate_level, other_level);

    let options = args.query_options();
    let runner = Runner::new(Bgpq4::new(&options), &args.output_dir, options).dry_run(args.dry_run);
    let report = match runner.run(&args.config_dir).await {
        Ok(report) => report,
        Err(err) => {
            cli::print_error(&err);
            process::exit(1);
        }
    };

    if let Some(path) = &args.report {
        match report.write_json(path) {
            Ok(()) => info!("Report saved to {}", path.display()),
            Err(err) => error!("Failed to write report {}: {}", path.display(), err),
        }
    }
    cli::print_summary(&report);
}
