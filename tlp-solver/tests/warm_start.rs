use approx::assert_abs_diff_eq;
use tlp_core::models::{ArcKey, SolveStatus, WarmStart, WarmStartReport};
use tlp_core::ports::Solver;
use tlp_solver::{ClarabelBackend, OsqpBackend, TradeLp};

use networks::*;

#[test]
fn cold_solve_reports_not_requested() {
    let engine = TradeLp::with_backend(config(), OsqpBackend::default());
    let settlement = engine.settle(&steel(), &steel_data(), None).unwrap();
    assert_eq!(settlement.warm_start, WarmStartReport::NotRequested);
}

#[test]
fn osqp_starts_from_previous_period() {
    let graph = steel();
    let data = steel_data();
    let engine = TradeLp::with_backend(config(), OsqpBackend::default());

    let first = engine.settle(&graph, &data, None).unwrap();
    let warm_start = first.next_warm_start();
    assert!(!warm_start.is_empty());

    let second = engine.settle(&graph, &data, Some(&warm_start)).unwrap();
    assert_eq!(second.status, SolveStatus::Optimal);
    assert_eq!(
        second.warm_start,
        WarmStartReport::Applied {
            matched: warm_start.len(),
            supplied: warm_start.len(),
        }
    );
    assert_abs_diff_eq!(
        first.allocations.unwrap().objective,
        second.allocations.unwrap().objective,
        epsilon = 1e-2
    );
}

#[test]
fn clarabel_solves_cold() {
    let graph = steel();
    let data = steel_data();
    let engine = TradeLp::with_backend(config(), ClarabelBackend::default());

    let warm_start = engine.settle(&graph, &data, None).unwrap().next_warm_start();
    let settlement = engine.settle(&graph, &data, Some(&warm_start)).unwrap();

    assert_eq!(settlement.status, SolveStatus::Optimal);
    assert_eq!(
        settlement.warm_start,
        WarmStartReport::Unsupported {
            backend: "clarabel".to_owned()
        }
    );
}

#[test]
fn vanished_arcs_are_not_matched() {
    let graph = steel();
    let data = steel_data();
    let engine = TradeLp::with_backend(config(), OsqpBackend::default());

    let warm_start = [
        (ArcKey::new("mine_aus", "bf_deu", "ore"), 200.0),
        (ArcKey::new("mine_chl", "bf_deu", "ore"), 50.0),
        (ArcKey::new("eaf_deu", "market_deu", "slag"), 10.0),
    ]
    .into_iter()
    .collect::<WarmStart>();

    let settlement = engine.settle(&graph, &data, Some(&warm_start)).unwrap();
    assert_eq!(settlement.status, SolveStatus::Optimal);
    assert_eq!(
        settlement.warm_start,
        WarmStartReport::Applied {
            matched: 1,
            supplied: 3,
        }
    );
}

#[test]
fn warm_start_survives_a_changed_network() {
    let data = steel_data();
    let engine = TradeLp::with_backend(config(), OsqpBackend::default());

    let warm_start = engine.settle(&steel(), &data, None).unwrap().next_warm_start();

    // The Australian mine closes between periods
    let mut graph = steel();
    graph.centers.retain(|center| center.name != "mine_aus");
    let settlement = engine.settle(&graph, &data, Some(&warm_start)).unwrap();

    assert_eq!(settlement.status, SolveStatus::Optimal);
    let WarmStartReport::Applied { matched, supplied } = settlement.warm_start else {
        panic!("expected the warm start to be applied");
    };
    assert!(matched < supplied);
    let allocations = settlement.allocations.unwrap();
    assert!(allocations.outflow("mine_bra", None) > 0.0);
}
