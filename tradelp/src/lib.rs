//! Command-line tools for the trade LP engine: settle a period from a JSON
//! scenario, or export its linear program for inspection elsewhere.

use clap::Parser;
use std::{io::Write as _, path::PathBuf, time::Duration};
use tlp_core::models::WarmStart;
use tlp_solver::io::Scenario;
use tracing::{Level, event};

mod io;
pub use io::*;

mod commands;
pub use commands::*;

mod config;
pub use config::AppConfig;

// The top-level arguments: the configuration file and which subcommand to execute
#[derive(Parser)]
#[command(version, about, long_about = None)]
pub struct BaseArgs {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true, env = "TLP_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

impl BaseArgs {
    pub async fn evaluate(self) -> anyhow::Result<()> {
        let AppConfig { trade, timeout } = AppConfig::load(self.config.as_deref())?;

        match self.command {
            Commands::Solve {
                io,
                backend,
                warm_start,
                save_warm_start,
                save_graph,
            } => {
                let scenario = serde_json::from_reader::<_, Scenario>(io.read()?)?;
                let warm_start = match warm_start {
                    Some(source) => Some(serde_json::from_reader::<_, WarmStart>(source.read()?)?),
                    None => None,
                };
                event!(
                    Level::INFO,
                    centers = scenario.graph.centers.len(),
                    backend = ?backend,
                    warm_start = warm_start.as_ref().map(WarmStart::len),
                    "read scenario"
                );

                let (mut scenario, settlement) =
                    backend.settle(scenario, trade, warm_start, timeout).await?;

                let mut output = io.write()?;
                serde_json::to_writer_pretty(&mut output, &settlement)?;
                output.flush()?;

                if let Some(target) = save_warm_start {
                    let mut output = target.write()?;
                    serde_json::to_writer_pretty(&mut output, &settlement.next_warm_start())?;
                    output.flush()?;
                }

                if let Some(target) = save_graph {
                    match settlement.allocations.as_ref() {
                        Some(allocations) => scenario.graph.record_production(allocations),
                        None => event!(
                            Level::WARN,
                            status = %settlement.status,
                            "no allocations, graph written without production"
                        ),
                    }
                    let mut output = target.write()?;
                    serde_json::to_writer_pretty(&mut output, &scenario.graph)?;
                    output.flush()?;
                }
            }
            Commands::Export { io, format } => {
                let scenario = serde_json::from_reader::<_, Scenario>(io.read()?)?;

                let format = if let Some(format) = format {
                    format
                } else if let Some(ext) = io.extension() {
                    ext.parse()?
                } else {
                    return Err(CliError::ExportInference)?;
                };

                let mut output = io.write()?;
                format.export(&scenario, &trade, &mut output)?;
                output.flush()?;
            }
        }

        Ok(())
    }
}

#[derive(thiserror::Error, Debug)]
pub enum CliError {
    #[error("Unable to infer export format, please specify a valid format")]
    ExportInference,
    #[error("Solve did not finish within {0:?}")]
    Timeout(Duration),
}
