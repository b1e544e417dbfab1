use crate::CliError;
use clap::ValueEnum;
use std::time::Duration;
use tlp_core::models::{Settlement, TradeConfig, WarmStart};
use tlp_solver::{ClarabelBackend, OsqpBackend, TradeLp, io::Scenario};
use tracing::{Level, event};

// This explicitly articulates the available backends for the `solve` subcommand
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum SolverLib {
    Clarabel,
    Osqp,
}

impl SolverLib {
    /// Settle the scenario on the blocking pool, abandoning it after `timeout`.
    /// The scenario is handed back alongside the settlement.
    pub async fn settle(
        self,
        scenario: Scenario,
        config: TradeConfig,
        warm_start: Option<WarmStart>,
        timeout: Option<Duration>,
    ) -> anyhow::Result<(Scenario, Settlement)> {
        let task = tokio::task::spawn_blocking(move || {
            let warm_start = warm_start.as_ref();
            let settled = match self {
                SolverLib::Clarabel => {
                    scenario.settle(&TradeLp::<ClarabelBackend>::new(config), warm_start)
                }
                SolverLib::Osqp => {
                    scenario.settle(&TradeLp::<OsqpBackend>::new(config), warm_start)
                }
            };
            (scenario, settled)
        });

        let joined = match timeout {
            Some(limit) => tokio::time::timeout(limit, task).await.map_err(|_| {
                event!(
                    Level::ERROR,
                    backend = ?self,
                    timeout = %humantime::format_duration(limit),
                    "solve timed out"
                );
                CliError::Timeout(limit)
            })?,
            None => task.await,
        };
        let (scenario, settled) = joined?;
        Ok((scenario, settled?))
    }
}
