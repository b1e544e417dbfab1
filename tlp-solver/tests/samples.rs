use approx::assert_abs_diff_eq;
use rstest::*;
use rstest_reuse::{self, *};
use serde_json::Value;
use std::{fs::File, io::BufReader, path::PathBuf};
use tlp_core::models::{Allocations, SolveStatus};
use tlp_solver::{Backend, TradeLp, io::Scenario};

use all_backends::all_backends;

use networks::config;

// For every backend, and for every (input.json, expected.json) pair in `./samples/**`,
//   1. Read in the scenario,
//   2. Read in the known-good figures,
//   3. Settle the scenario,
//   4. Compare the objective, and the per-center figures listed in the reference.
// Centers the reference does not mention are not compared.

#[apply(all_backends)]
#[rstest]
fn settle_sample(
    #[case] backend: impl Backend,
    #[files("tests/samples/**/input.json")] input: PathBuf,
) {
    let mut expected = input.clone();
    expected.set_file_name("expected.json");

    let scenario: Scenario =
        serde_json::from_reader(BufReader::new(File::open(input).unwrap())).unwrap();
    let reference: Value =
        serde_json::from_reader(BufReader::new(File::open(expected).unwrap())).unwrap();

    let settlement = scenario
        .settle(&TradeLp::with_backend(config(), backend), None)
        .unwrap();
    assert_eq!(settlement.status, SolveStatus::Optimal);
    let allocations = settlement.allocations.unwrap();

    cmp(&allocations, &reference, 1e-3);
}

fn cmp(allocations: &Allocations, reference: &Value, eps: f64) {
    let objective = reference["objective"].as_f64().unwrap();
    assert_abs_diff_eq!(allocations.objective, objective, epsilon = eps * objective.max(1.0));

    let figures = |field: &str| {
        reference[field]
            .as_object()
            .unwrap()
            .iter()
            .map(|(center, value)| (center.clone(), value.as_f64().unwrap()))
            .collect::<Vec<_>>()
    };

    for (center, expected) in figures("inflow") {
        assert_abs_diff_eq!(allocations.inflow(&center, None), expected, epsilon = eps);
    }
    for (center, expected) in figures("production") {
        assert_abs_diff_eq!(allocations.production[&center], expected, epsilon = eps);
    }

    let unmet = figures("unmet_demand");
    assert_eq!(allocations.unmet_demand.len(), unmet.len());
    for (center, expected) in unmet {
        assert_abs_diff_eq!(allocations.unmet_demand[&center], expected, epsilon = eps);
    }
}
