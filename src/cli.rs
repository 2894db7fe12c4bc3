//! Command-line front end.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::commands::{self, ScanResponse};
use crate::config::AppConfig;
use crate::error::CommandError;
use crate::lifecycle;

#[derive(Debug, Parser)]
#[command(
    name = "seo-auditor",
    version,
    about = "Single-page on-page SEO checker with optional auto-fix"
)]
pub struct Cli {
    /// Directory holding the history database and corrected pages
    #[arg(long, global = true, value_name = "DIR", env = "SEO_AUDITOR_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Seconds to wait for the page before giving up
    #[arg(long, global = true, value_name = "SECS", env = "SEO_AUDITOR_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,

    #[arg(long, global = true, value_name = "UA", env = "SEO_AUDITOR_USER_AGENT")]
    pub user_agent: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch a page, score it and list what to fix
    Scan {
        #[arg(value_name = "URL")]
        url: String,

        /// I own this site: also write a corrected copy of the page
        #[arg(long, default_value_t = false)]
        owner: bool,

        /// Print the response as JSON
        #[arg(long, default_value_t = false)]
        json: bool,

        /// Also save the results as a PDF report
        #[arg(long, value_name = "FILE")]
        pdf: Option<PathBuf>,
    },

    /// Print (or save) a corrected page by file name
    Fixed {
        #[arg(value_name = "NAME")]
        name: String,

        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Render arbitrary fields as a PDF report
    Report {
        /// A `key=value` pair; repeat for more lines, order is kept
        #[arg(long = "field", value_name = "KEY=VALUE", value_parser = parse_field)]
        fields: Vec<(String, String)>,

        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

impl Cli {
    pub fn config(&self) -> AppConfig {
        AppConfig::default().with_overrides(
            self.data_dir.clone(),
            self.timeout_secs,
            self.user_agent.clone(),
        )
    }
}

pub fn parse_field(raw: &str) -> std::result::Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got {:?}", raw)),
    }
}

pub async fn run(cli: Cli) -> Result<ExitCode> {
    let config = cli.config();

    match cli.command {
        Command::Scan {
            url,
            owner,
            json,
            pdf,
        } => {
            let state = lifecycle::setup(&config).await?;
            match commands::scan_site(&state, url, owner).await {
                Ok(response) => {
                    if json {
                        println!("{}", serde_json::to_string_pretty(&response)?);
                    } else {
                        print_scan(&response);
                    }
                    if let Some(path) = pdf {
                        match commands::export_report(&response.fields) {
                            Ok(download) => write_file(&path, &download.bytes).await?,
                            Err(e) => return Ok(fail(&e, json)),
                        }
                    }
                    Ok(ExitCode::SUCCESS)
                }
                Err(e) => Ok(fail(&e, json)),
            }
        }
        Command::Fixed { name, output } => {
            let state = lifecycle::setup(&config).await?;
            match commands::get_fixed_page(&state, name).await {
                Ok(markup) => {
                    match output {
                        Some(path) => write_file(&path, markup.as_bytes()).await?,
                        None => println!("{}", markup),
                    }
                    Ok(ExitCode::SUCCESS)
                }
                Err(e) => Ok(fail(&e, false)),
            }
        }
        Command::Report { fields, output } => match commands::export_report(&fields) {
            Ok(download) => {
                let path = output.unwrap_or_else(|| PathBuf::from(&download.file_name));
                write_file(&path, &download.bytes).await?;
                Ok(ExitCode::SUCCESS)
            }
            Err(e) => Ok(fail(&e, false)),
        },
    }
}

fn fail(error: &CommandError, json: bool) -> ExitCode {
    if json {
        match serde_json::to_string(error) {
            Ok(body) => println!("{}", body),
            Err(_) => eprintln!("error: {}", error),
        }
    } else {
        eprintln!("error: {}", error);
    }
    ExitCode::FAILURE
}

async fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    tokio::fs::write(path, bytes)
        .await
        .with_context(|| format!("failed to write {}", path.display()))?;
    eprintln!("Saved {}", path.display());
    Ok(())
}

fn print_scan(response: &ScanResponse) {
    for (name, value) in &response.fields {
        println!("{:<18} {}", format!("{}:", name), value);
    }

    let findings: Vec<_> = response.result.findings().collect();
    if !findings.is_empty() {
        println!();
        println!("Suggested fixes:");
        for (issue, fix) in findings {
            println!("  - {}: {}", issue, fix);
        }
    }

    if let Some(name) = &response.fixed_page {
        println!();
        println!("Corrected page: seo-auditor fixed {}", name);
    }
}
