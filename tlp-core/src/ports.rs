use crate::models::{DomainGraph, Settlement, TradeData, WarmStart};

/// Interface for engines that settle one period of trade.
///
/// An implementation takes an immutable snapshot of the network and its trade
/// data, and produces a [`Settlement`]: the solver status, the allocations (when
/// optimal), diagnostics, and a report on the warm start.
///
/// Settling is a single blocking call that may take seconds to minutes on large
/// networks. Callers that need responsiveness should run it on a blocking pool,
/// behind a timeout. Nothing is retained between calls: state meant to carry over
/// to the next period (the warm start) is returned and passed back explicitly.
pub trait Solver {
    /// Error type for failures that prevent a solve from being attempted
    /// (inconsistent configuration, backend setup). An infeasible model is
    /// *not* an error; it is reported through [`Settlement::status`].
    type Error: std::error::Error;

    /// Settle a period.
    ///
    /// # Arguments
    ///
    /// - `graph`: the network for this period
    /// - `data`: transport costs, tariffs, quotas and caps for this period
    /// - `warm_start`: solved flows from a prior period, if any
    fn settle(
        &self,
        graph: &DomainGraph,
        data: &TradeData,
        warm_start: Option<&WarmStart>,
    ) -> Result<Settlement, Self::Error>;
}
