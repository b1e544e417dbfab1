use crate::backend::Backend;
use crate::error::TradeError;
use crate::model::TradeModel;
use tlp_core::models::{DomainGraph, Settlement, TradeConfig, TradeData, WarmStart};
use tlp_core::ports::Solver;
use tracing::{Level, event, span};

/// The Trade LP engine: `(graph, data, config, warm start) → settlement`.
///
/// Holds nothing but an immutable configuration and a backend; every call to
/// [`Solver::settle`] builds a fresh model, so one engine can settle any number
/// of periods without stale tables.
pub struct TradeLp<B> {
    config: TradeConfig,
    backend: B,
}

impl<B: Backend> TradeLp<B> {
    /// An engine whose backend is configured from `config.solver`
    pub fn new(config: TradeConfig) -> Self {
        let backend = B::from_options(&config.solver);
        Self { config, backend }
    }

    /// An engine with an explicitly configured backend
    pub fn with_backend(config: TradeConfig, backend: B) -> Self {
        Self { config, backend }
    }

    /// The configuration in effect
    pub fn config(&self) -> &TradeConfig {
        &self.config
    }

    /// The backend in use
    pub fn backend(&self) -> &B {
        &self.backend
    }
}

impl<B: Backend> Solver for TradeLp<B> {
    type Error = TradeError;

    fn settle(
        &self,
        graph: &DomainGraph,
        data: &TradeData,
        warm_start: Option<&WarmStart>,
    ) -> Result<Settlement, Self::Error> {
        let span = span!(
            Level::INFO,
            "trade_lp",
            backend = self.backend.name(),
            seed = self.config.solver.seed
        );
        let _guard = span.enter();

        let model = TradeModel::build(graph, data, &self.config)?;
        let settlement = model
            .solve(&self.backend, warm_start)?
            .into_settlement()?;

        event!(
            Level::INFO,
            status = %settlement.status,
            objective = settlement.allocations.as_ref().map(|x| x.objective),
            "settled period"
        );
        Ok(settlement)
    }
}
