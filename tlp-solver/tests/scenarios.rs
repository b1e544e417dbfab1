use approx::assert_abs_diff_eq;
use rstest::*;
use rstest_reuse::{self, *};
use tlp_core::models::{
    ANY, Allocations, BomElement, Settlement, SkipReason, SolveStatus, TradeData, TradeKey,
};
use tlp_core::ports::Solver;
use tlp_solver::{Backend, ConfigurationError, TradeError, TradeLp};

use all_backends::all_backends;

use networks::*;

const TOL: f64 = 1e-3;

fn settle(
    backend: impl Backend,
    graph: &tlp_core::models::DomainGraph,
    data: &TradeData,
) -> Settlement {
    TradeLp::with_backend(config(), backend)
        .settle(graph, data, None)
        .unwrap()
}

fn allocations(settlement: &Settlement) -> &Allocations {
    assert_eq!(settlement.status, SolveStatus::Optimal);
    settlement.allocations.as_ref().unwrap()
}

fn unmet(allocations: &Allocations, center: &str) -> f64 {
    allocations.unmet_demand.get(center).copied().unwrap_or(0.0)
}

/// Two suppliers (100 and 80) feed one demand center (150) at no cost.
#[apply(all_backends)]
fn scenario_a_demand_fully_met(#[case] backend: impl Backend) {
    let graph = graph(
        vec![supply("mine", "ore"), demand("market", "ore")],
        vec![
            center("s1", "mine", 100.0, "AUS"),
            center("s2", "mine", 80.0, "AUS"),
            center("d", "market", 150.0, "DEU"),
        ],
        &[("mine", "market")],
    );

    let settlement = settle(backend, &graph, &TradeData::default());
    let allocations = allocations(&settlement);

    assert_abs_diff_eq!(allocations.inflow("d", None), 150.0, epsilon = TOL);
    assert_abs_diff_eq!(unmet(allocations, "d"), 0.0, epsilon = TOL);
    assert!(allocations.outflow("s1", None) <= 100.0 + TOL);
    assert!(allocations.outflow("s2", None) <= 80.0 + TOL);
    assert_eq!(settlement.diagnostics.allocation_variables, 2);
    assert_eq!(settlement.diagnostics.demand_slack_variables, 1);
}

/// Demand of 200 against 150 of capacity leaves 50 unmet, at the slack penalty.
#[apply(all_backends)]
fn scenario_b_shortfall_absorbed_by_slack(#[case] backend: impl Backend) {
    let graph = graph(
        vec![supply("mine", "ore"), demand("market", "ore")],
        vec![
            center("s1", "mine", 100.0, "AUS"),
            center("s2", "mine", 50.0, "AUS"),
            center("d", "market", 200.0, "DEU"),
        ],
        &[("mine", "market")],
    );
    let mut data = TradeData::default();
    data.transportation_costs.push(route("AUS", "DEU", "ore", 10.0));

    let settlement = settle(backend, &graph, &data);
    let allocations = allocations(&settlement);

    assert_eq!(settlement.diagnostics.demand_slack_cost, 1000.0);
    assert_abs_diff_eq!(unmet(allocations, "d"), 50.0, epsilon = TOL);
    assert_abs_diff_eq!(allocations.inflow("d", None), 150.0, epsilon = TOL);
    assert_abs_diff_eq!(
        allocations.objective,
        150.0 * 10.0 + 50.0 * 1000.0,
        epsilon = 1.0
    );
}

/// The demand slack penalty rises with the dearest route, so expensive supply still beats shortfall.
#[apply(all_backends)]
fn scenario_b_penalty_tracks_costliest_route(#[case] backend: impl Backend) {
    let graph = graph(
        vec![supply("mine", "ore"), demand("market", "ore")],
        vec![
            center("s1", "mine", 150.0, "AUS"),
            center("d", "market", 200.0, "DEU"),
        ],
        &[("mine", "market")],
    );
    let mut data = TradeData::default();
    data.transportation_costs.push(route("AUS", "DEU", "ore", 300.0));

    let settlement = settle(backend, &graph, &data);
    let allocations = allocations(&settlement);

    assert_eq!(settlement.diagnostics.demand_slack_cost, 1500.0);
    assert_abs_diff_eq!(allocations.inflow("d", None), 150.0, epsilon = TOL);
    assert_abs_diff_eq!(
        allocations.objective,
        150.0 * 300.0 + 50.0 * 1500.0,
        epsilon = 1.0
    );
}

fn dependent_network(with_quarry: bool) -> tlp_core::models::DomainGraph {
    let mut smelt = bom("ore", &["iron"], Some(1.0));
    smelt.dependent_commodities.insert("flux".into(), 0.2);

    let mut processes = vec![
        supply("mine", "ore"),
        production("furnace", vec![smelt]),
        demand("market", "iron"),
    ];
    let mut centers = vec![
        center("mine", "mine", 100.0, "AUS"),
        center("furnace", "furnace", 100.0, "DEU"),
        center("market", "market", 50.0, "DEU"),
    ];
    if with_quarry {
        processes.push(supply("quarry", "flux"));
        centers.push(center("quarry", "quarry", 100.0, "DEU"));
    }

    graph(
        processes,
        centers,
        &[("mine", "furnace"), ("quarry", "furnace"), ("furnace", "market")],
    )
}

/// Flux is required at 0.2 per unit of ore but nobody supplies it: the
/// requirement is skipped and reported, and the model stays feasible.
#[apply(all_backends)]
fn scenario_c_unsupplied_dependent_is_skipped(#[case] backend: impl Backend) {
    let graph = dependent_network(false);
    let settlement = settle(backend, &graph, &TradeData::default());
    let allocations = allocations(&settlement);

    assert_eq!(settlement.diagnostics.dependent_skipped, 1);
    assert_eq!(settlement.diagnostics.dependent_enforced, 0);
    let skipped = &settlement.diagnostics.skipped;
    assert_eq!(skipped.len(), 1);
    assert_eq!(skipped[0].center.as_deref(), Some("furnace"));
    assert_eq!(skipped[0].subject, "flux");
    assert_eq!(skipped[0].reason, SkipReason::Unsupplied);

    assert_abs_diff_eq!(allocations.inflow("market", None), 50.0, epsilon = TOL);
    assert_abs_diff_eq!(allocations.inflow("furnace", None), 50.0, epsilon = TOL);
}

/// With a supplier present the requirement is enforced exactly.
#[apply(all_backends)]
fn scenario_c_supplied_dependent_is_enforced(#[case] backend: impl Backend) {
    let graph = dependent_network(true);
    let settlement = settle(backend, &graph, &TradeData::default());
    let allocations = allocations(&settlement);

    assert_eq!(settlement.diagnostics.dependent_enforced, 1);
    assert_eq!(settlement.diagnostics.dependent_skipped, 0);
    let ore = allocations.inflow("furnace", Some(&"ore".into()));
    let flux = allocations.inflow("furnace", Some(&"flux".into()));
    assert_abs_diff_eq!(ore, 50.0, epsilon = TOL);
    assert_abs_diff_eq!(flux, 0.2 * ore, epsilon = TOL);
}

/// Dependents configured as mandatory fail fast instead of relaxing.
#[test]
fn scenario_c_mandatory_dependent_fails_fast() {
    let graph = dependent_network(false);
    let mut config = config();
    config.mandatory_dependents.push("Flux".into());

    let error = TradeLp::with_backend(config, tlp_solver::ClarabelBackend::default())
        .settle(&graph, &TradeData::default(), None)
        .unwrap_err();

    assert!(matches!(
        error,
        TradeError::Configuration(ConfigurationError::UnsuppliedDependent { ref center, .. })
            if center == "furnace"
    ));
}

/// Cheap ore A is capped at 60% of the furnace's iron-making inflow.
#[apply(all_backends)]
fn scenario_d_ratio_bounds_hold(#[case] backend: impl Backend) {
    let mut ore_a: BomElement = bom("ore_a", &["iron"], Some(1.0));
    ore_a.parameters.minimum_ratio = Some(0.3);
    ore_a.parameters.maximum_ratio = Some(0.6);
    let ore_b = bom("ore_b", &["iron"], Some(1.0));

    let graph = graph(
        vec![
            supply("mine_a", "ore_a"),
            supply("mine_b", "ore_b"),
            production("furnace", vec![ore_a, ore_b]),
            demand("market", "iron"),
        ],
        vec![
            priced("mine_a", "mine_a", 200.0, "AUS", 1.0),
            priced("mine_b", "mine_b", 200.0, "BRA", 5.0),
            center("furnace", "furnace", 200.0, "DEU"),
            center("market", "market", 100.0, "DEU"),
        ],
        &[("mine_a", "furnace"), ("mine_b", "furnace"), ("furnace", "market")],
    );

    let settlement = settle(backend, &graph, &TradeData::default());
    let allocations = allocations(&settlement);

    let a = allocations.inflow("furnace", Some(&"ore_a".into()));
    let b = allocations.inflow("furnace", Some(&"ore_b".into()));
    let share = a / (a + b);
    assert!(share >= 0.3 - TOL && share <= 0.6 + TOL, "share {share}");
    // The cheaper ore is used up to its maximum share
    assert_abs_diff_eq!(share, 0.6, epsilon = TOL);
    assert_abs_diff_eq!(a + b, 100.0, epsilon = TOL);
}

/// A quota of 10 on (AUS, DEU, *) caps all commodities on that pair together.
#[apply(all_backends)]
fn scenario_e_commodity_wildcard_quota(#[case] backend: impl Backend) {
    let graph = graph(
        vec![
            supply("ore_mine", "ore"),
            supply("coal_mine", "coal"),
            demand("ore_market", "ore"),
            demand("coal_market", "coal"),
        ],
        vec![
            center("aus_ore", "ore_mine", 100.0, "AUS"),
            center("aus_coal", "coal_mine", 100.0, "AUS"),
            center("bra_ore", "ore_mine", 100.0, "BRA"),
            center("bra_coal", "coal_mine", 100.0, "BRA"),
            center("deu_ore", "ore_market", 20.0, "DEU"),
            center("deu_coal", "coal_market", 20.0, "DEU"),
        ],
        &[("ore_mine", "ore_market"), ("coal_mine", "coal_market")],
    );
    let mut data = TradeData::default();
    for commodity in ["ore", "coal"] {
        data.transportation_costs.push(route("AUS", "DEU", commodity, 1.0));
        data.transportation_costs.push(route("BRA", "DEU", commodity, 3.0));
    }
    data.tariff_quotas.insert(TradeKey::new("AUS", "DEU", ANY), 10.0);

    let settlement = settle(backend, &graph, &data);
    let allocations = allocations(&settlement);

    let from_aus = allocations.outflow("aus_ore", None) + allocations.outflow("aus_coal", None);
    assert!(from_aus <= 10.0 + TOL, "shipped {from_aus} under a quota of 10");
    assert_abs_diff_eq!(from_aus, 10.0, epsilon = TOL);
    assert_abs_diff_eq!(allocations.inflow("deu_ore", None), 20.0, epsilon = TOL);
    assert_abs_diff_eq!(allocations.inflow("deu_coal", None), 20.0, epsilon = TOL);
    assert_eq!(
        settlement.diagnostics.constraints[&tlp_core::models::ConstraintFamily::TradeQuota],
        1
    );
}
