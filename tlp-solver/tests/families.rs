use approx::assert_abs_diff_eq;
use rstest::*;
use rstest_reuse::{self, *};
use tlp_core::models::{
    ANY, AggregateKey, Commodity, ConstraintFamily, FeedstockKey, RatioBounds, SkipReason,
    SolveStatus, TradeConfig, TradeData, TradeKey,
};
use tlp_core::ports::Solver;
use tlp_solver::{Backend, ConfigurationError, TradeLp, TradeModel};

use all_backends::all_backends;

use networks::*;

const TOL: f64 = 1e-3;

fn commodity(name: &str) -> Commodity {
    Commodity::new(name)
}

#[apply(all_backends)]
fn feedstock_cap_limits_scrap(#[case] backend: impl Backend) {
    let mut data = steel_data();
    data.secondary_feedstock_caps.insert(
        FeedstockKey {
            commodity: commodity("scrap"),
            regions: vec!["DEU".to_owned()],
        },
        20.0,
    );

    let settlement = TradeLp::with_backend(config(), backend)
        .settle(&steel(), &data, None)
        .unwrap();
    let allocations = settlement.allocations.unwrap();

    assert_abs_diff_eq!(
        allocations.inflow("eaf_deu", Some(&commodity("scrap"))),
        20.0,
        epsilon = TOL
    );
    // Iron makes up the difference
    assert_abs_diff_eq!(
        allocations.outflow("eaf_deu", None),
        200.0,
        epsilon = TOL
    );
    assert_eq!(
        settlement.diagnostics.constraints[&ConstraintFamily::SecondaryFeedstock],
        1
    );
}

#[test]
fn feedstock_cap_outside_the_region_is_skipped() {
    let graph = steel();
    let mut data = steel_data();
    let key = FeedstockKey {
        commodity: commodity("scrap"),
        regions: vec!["JPN".to_owned()],
    };
    data.secondary_feedstock_caps.insert(key, 20.0);

    let model = TradeModel::build(&graph, &data, &config()).unwrap();
    let skipped = &model.diagnostics().skipped;
    assert_eq!(skipped.len(), 1);
    assert_eq!(skipped[0].family, ConstraintFamily::SecondaryFeedstock);
    assert_eq!(skipped[0].reason, SkipReason::NoMatchingArcs);
}

#[apply(all_backends)]
fn soft_minimum_shortfall_is_penalized(#[case] backend: impl Backend) {
    let mut supplier = center("s1", "mine", 100.0, "AUS");
    supplier.soft_minimum_capacity = Some(0.9);
    let graph = graph(
        vec![supply("mine", "ore"), demand("market", "ore")],
        vec![supplier, center("d", "market", 50.0, "DEU")],
        &[("mine", "market")],
    );
    let config = TradeConfig {
        soft_minimum_capacity_slack_cost: 7.0,
        ..config()
    };

    let settlement = TradeLp::with_backend(config, backend)
        .settle(&graph, &TradeData::default(), None)
        .unwrap();
    assert_eq!(settlement.diagnostics.capacity_slack_variables, 1);
    let allocations = settlement.allocations.unwrap();

    // Demand caps the outflow at 50, 40 short of the preferred 90
    assert_abs_diff_eq!(allocations.outflow("s1", None), 50.0, epsilon = TOL);
    assert_abs_diff_eq!(allocations.capacity_shortfall["s1"], 40.0, epsilon = TOL);
    assert_abs_diff_eq!(allocations.objective, 280.0, epsilon = TOL);
}

#[apply(all_backends)]
fn recipe_without_input_ratio_is_not_balanced(#[case] backend: impl Backend) {
    let graph = graph(
        vec![
            supply("mine", "ore"),
            production("furnace", vec![bom("ore", &["iron"], None)]),
            demand("market", "iron"),
        ],
        vec![
            priced("mine_aus", "mine", 100.0, "AUS", 1.0),
            center("furnace_deu", "furnace", 100.0, "DEU"),
            center("market_deu", "market", 50.0, "DEU"),
        ],
        &[("mine", "furnace"), ("furnace", "market")],
    );

    let settlement = TradeLp::with_backend(config(), backend)
        .settle(&graph, &TradeData::default(), None)
        .unwrap();
    assert_eq!(
        settlement.diagnostics.constraints[&ConstraintFamily::BomBalance],
        0
    );
    let skipped = &settlement.diagnostics.skipped;
    assert_eq!(skipped.len(), 1);
    assert_eq!(skipped[0].family, ConstraintFamily::BomBalance);
    assert_eq!(skipped[0].center.as_deref(), Some("furnace_deu"));
    assert_eq!(skipped[0].subject, "iron");
    assert_eq!(skipped[0].reason, SkipReason::NoInputRatio);

    // The furnace is free to serve the market
    let allocations = settlement.allocations.unwrap();
    assert_abs_diff_eq!(
        allocations.inflow("market_deu", None),
        50.0,
        epsilon = TOL
    );
    assert!(allocations.unmet_demand.is_empty());
}

/// An EAF melting two grades of DRI and scrap into steel
fn dri_graph(dri_b_outputs: &[&str]) -> tlp_core::models::DomainGraph {
    graph(
        vec![
            supply("plant_a", "dri_a"),
            supply("plant_b", "dri_b"),
            supply("scrapyard", "scrap"),
            production(
                "eaf",
                vec![
                    bom("dri_a", &["steel"], Some(1.0)),
                    bom("dri_b", dri_b_outputs, Some(1.0)),
                    bom("scrap", &["steel"], Some(1.0)),
                ],
            ),
            demand("market", "steel"),
        ],
        vec![
            priced("dri_a_swe", "plant_a", 100.0, "SWE", 5.0),
            priced("dri_b_swe", "plant_b", 100.0, "SWE", 6.0),
            priced("scrap_deu", "scrapyard", 100.0, "DEU", 1.0),
            center("eaf_deu", "eaf", 100.0, "DEU"),
            center("market_deu", "market", 100.0, "DEU"),
        ],
        &[("*", "eaf"), ("eaf", "market")],
    )
}

fn dri_share(minimum: f64, maximum: f64) -> TradeData {
    let mut data = TradeData::default();
    data.aggregated_ratios.insert(
        AggregateKey {
            technology: "eaf".to_owned(),
            mask: "DRI".to_owned(),
        },
        RatioBounds {
            minimum: Some(minimum),
            maximum: Some(maximum),
        },
    );
    data
}

#[apply(all_backends)]
fn aggregated_share_forces_dri(#[case] backend: impl Backend) {
    let graph = dri_graph(&["steel"]);
    let settlement = TradeLp::with_backend(config(), backend)
        .settle(&graph, &dri_share(0.3, 0.6), None)
        .unwrap();
    assert_eq!(settlement.status, SolveStatus::Optimal);
    assert_eq!(
        settlement.diagnostics.constraints[&ConstraintFamily::AggregatedRatio],
        2
    );
    let allocations = settlement.allocations.unwrap();

    // Scrap is cheapest, so DRI sits at its minimum share, all of it the cheaper grade
    let dri_a = allocations.inflow("eaf_deu", Some(&commodity("dri_a")));
    let dri_b = allocations.inflow("eaf_deu", Some(&commodity("dri_b")));
    let scrap = allocations.inflow("eaf_deu", Some(&commodity("scrap")));
    assert_abs_diff_eq!(dri_a + dri_b, 30.0, epsilon = TOL);
    assert_abs_diff_eq!(dri_b, 0.0, epsilon = TOL);
    assert_abs_diff_eq!(scrap, 70.0, epsilon = TOL);
}

#[test]
fn aggregated_share_needs_common_outputs() {
    let graph = dri_graph(&["steel", "slag"]);
    let data = dri_share(0.3, 0.6);
    let error = TradeModel::build(&graph, &data, &config()).unwrap_err();
    assert_eq!(
        error,
        ConfigurationError::InconsistentAggregate {
            technology: "eaf".to_owned(),
            mask: "DRI".to_owned(),
            center: "eaf_deu".to_owned(),
        }
    );
}

#[test]
fn aggregated_share_for_absent_technology_is_skipped() {
    let graph = dri_graph(&["steel"]);
    let mut data = TradeData::default();
    data.aggregated_ratios.insert(
        AggregateKey {
            technology: "bof".to_owned(),
            mask: "dri".to_owned(),
        },
        RatioBounds {
            minimum: Some(0.1),
            maximum: None,
        },
    );

    let model = TradeModel::build(&graph, &data, &config()).unwrap();
    let skipped = &model.diagnostics().skipped;
    assert_eq!(skipped.len(), 1);
    assert_eq!(skipped[0].family, ConstraintFamily::AggregatedRatio);
    assert_eq!(skipped[0].center, None);
    assert_eq!(skipped[0].reason, SkipReason::NoMatchingArcs);
}

#[test]
fn quota_with_two_wildcards_never_matches() {
    let graph = steel();
    let mut data = steel_data();
    data.tariff_quotas.insert(TradeKey::new(ANY, ANY, "ore"), 10.0);

    let model = TradeModel::build(&graph, &data, &config()).unwrap();
    assert_eq!(
        model.diagnostics().constraints[&ConstraintFamily::TradeQuota],
        0
    );
    let skipped = &model.diagnostics().skipped;
    assert_eq!(skipped.len(), 1);
    assert_eq!(skipped[0].family, ConstraintFamily::TradeQuota);
    assert_eq!(skipped[0].reason, SkipReason::NoMatchingArcs);
}

#[test]
fn unknown_process_fails_fast() {
    let mut graph = steel();
    graph.centers.push(center("bof_deu", "bof", 100.0, "DEU"));
    let error = TradeModel::build(&graph, &steel_data(), &config()).unwrap_err();
    assert_eq!(
        error,
        ConfigurationError::UnknownProcess {
            center: "bof_deu".to_owned(),
            process: "bof".to_owned(),
        }
    );
}

#[test]
fn duplicate_center_fails_fast() {
    let mut graph = steel();
    graph.centers.push(center("mine_aus", "mine", 10.0, "AUS"));
    let error = TradeModel::build(&graph, &steel_data(), &config()).unwrap_err();
    assert_eq!(error, ConfigurationError::DuplicateCenter("mine_aus".to_owned()));
}

#[rstest]
#[case::nan_capacity(f64::NAN)]
#[case::negative_capacity(-1.0)]
#[case::infinite_capacity(f64::INFINITY)]
fn inadmissible_capacity_fails_fast(#[case] capacity: f64) {
    let mut graph = steel();
    graph.centers[0].capacity = capacity;
    let error = TradeModel::build(&graph, &steel_data(), &config()).unwrap_err();
    assert!(matches!(
        error,
        ConfigurationError::InvalidValue {
            field: "capacity",
            ..
        }
    ));
}

#[test]
fn non_finite_tax_fails_fast() {
    let graph = steel();
    let mut data = steel_data();
    data.tariff_taxes
        .insert(TradeKey::new("BRA", "DEU", ANY), f64::NAN);
    let error = TradeModel::build(&graph, &data, &config()).unwrap_err();
    assert!(matches!(error, ConfigurationError::InvalidValue { .. }));
}

#[rstest]
#[case::zero_epsilon(TradeConfig { epsilon: 0.0, ..Default::default() }, "epsilon")]
#[case::negative_penalty(TradeConfig { demand_slack_cost: -1.0, ..Default::default() }, "demand_slack_cost")]
#[case::nan_penalty(
    TradeConfig { soft_minimum_capacity_slack_cost: f64::NAN, ..Default::default() },
    "soft_minimum_capacity_slack_cost"
)]
fn inadmissible_config_fails_fast(#[case] config: TradeConfig, #[case] expected: &str) {
    let graph = steel();
    let error = TradeModel::build(&graph, &steel_data(), &config).unwrap_err();
    let ConfigurationError::InvalidConfig { field, .. } = error else {
        panic!("expected an invalid configuration");
    };
    assert_eq!(field, expected);
}
