use clap::Parser;
use std::process::ExitCode;

use seo_auditor::cli::{self, Cli};
use seo_auditor::lifecycle;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    lifecycle::init_logging();

    match cli::run(cli).await {
        Ok(code) => code,
        Err(e) => {
            log::error!("{:#}", e);
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
