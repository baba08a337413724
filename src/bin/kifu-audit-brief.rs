use std::process::ExitCode;

use clap::Parser;

use kifu_audit::config::app_config::BriefArgs;
use kifu_audit::logging::init_logging;
use kifu_audit::snapshot::load;
use kifu_audit::summary::{SummarySource, render_report};

fn main() -> ExitCode {
    init_logging();
    let args = BriefArgs::parse();

    match load(&args.file) {
        Ok(snapshot) => {
            println!("{}", render_report(&snapshot, SummarySource::Saved));
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{e}");
            println!("ERROR: {e}");
            ExitCode::FAILURE
        }
    }
}
