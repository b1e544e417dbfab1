use crate::error::ConfigurationError;
use crate::model::TradeModel;
use serde::{Deserialize, Serialize};
use std::io::Write;
use tlp_core::models::{DomainGraph, Settlement, TradeConfig, TradeData, WarmStart};
use tlp_core::ports::Solver;

/// Export failures: either the model could not be built, or the buffer could not be written
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// The scenario is inconsistent
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    /// Writing failed
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A self-contained period: the network and the data pricing its trade
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// The network
    pub graph: DomainGraph,
    /// Transport costs, tariffs, quotas and caps
    #[serde(default)]
    pub data: TradeData,
}

impl Scenario {
    /// Settle the scenario with any engine
    pub fn settle<S: Solver>(
        &self,
        solver: &S,
        warm_start: Option<&WarmStart>,
    ) -> Result<Settlement, S::Error> {
        solver.settle(&self.graph, &self.data, warm_start)
    }

    /// Build (but do not solve) the scenario's model
    pub fn model(&self, config: &TradeConfig) -> Result<TradeModel<'_>, ConfigurationError> {
        TradeModel::build(&self.graph, &self.data, config)
    }

    /// Build the model and export it to MPS format
    pub fn export_mps(
        &self,
        config: &TradeConfig,
        buffer: &mut impl Write,
    ) -> Result<(), ExportError> {
        Ok(self.model(config)?.program().write_mps(buffer)?)
    }

    /// Build the model and export it to LP format
    pub fn export_lp(
        &self,
        config: &TradeConfig,
        buffer: &mut impl Write,
    ) -> Result<(), ExportError> {
        Ok(self.model(config)?.program().write_lp(buffer)?)
    }
}
