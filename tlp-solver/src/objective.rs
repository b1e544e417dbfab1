use crate::model::Layout;
use crate::params::Parameters;
use crate::program::LinearProgram;
use tlp_core::models::TradeConfig;

/// Demand slack must always cost more than the dearest route, or the optimum
/// would rather leave demand unmet than pay for shipping.
const DEMAND_SLACK_MULTIPLIER: f64 = 5.0;

/// The per-unit penalty on unmet demand for this build
pub fn demand_slack_cost(config: &TradeConfig, params: &Parameters<'_>) -> f64 {
    config
        .demand_slack_cost
        .max(DEMAND_SLACK_MULTIPLIER * params.max_arc_cost())
}

/// Price every variable: arcs at their per-unit cost, slacks at their penalties.
/// Returns the demand slack cost in effect.
pub fn assemble(
    lp: &mut LinearProgram,
    layout: &Layout,
    params: &Parameters<'_>,
    config: &TradeConfig,
) -> f64 {
    for (idx, &cost) in params.arc_costs.iter().enumerate() {
        lp.set_cost(Layout::flow(idx.into()), cost);
    }

    let demand_cost = demand_slack_cost(config, params);
    for &slack in layout.demand_slack.values() {
        lp.set_cost(slack, demand_cost);
    }
    for &slack in layout.capacity_slack.values() {
        lp.set_cost(slack, config.soft_minimum_capacity_slack_cost);
    }

    demand_cost
}
