use std::process::ExitCode;

use clap::Parser;

use kifu_audit::collector::run;
use kifu_audit::config::app_config::{CollectorArgs, load_config};
use kifu_audit::logging::init_logging;

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    init_logging();

    let config = match load_config(CollectorArgs::parse()) {
        Ok(config) => config,
        Err(e) => {
            log::error!("{e}");
            println!("ERROR: {e}");
            return ExitCode::FAILURE;
        }
    };

    match run(&config).await {
        Ok(output) => {
            println!("{}", output.stdout);
            if output.success {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(e) => {
            log::error!("{e}");
            println!("ERROR: {e}");
            ExitCode::FAILURE
        }
    }
}
