use super::{Commodity, Map};
use std::fmt;

/// A single backend option value. Backends interpret the keys they understand
/// and ignore (with a warning) the rest.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(untagged)
)]
pub enum OptionValue {
    /// A switch, e.g. `presolve = true`
    Bool(bool),
    /// A count, e.g. `max_iter = 500`
    Integer(i64),
    /// A tolerance or limit, e.g. `tol_feas = 1e-8`
    Float(f64),
    /// A choice, e.g. `algorithm = "qdldl"`
    Text(String),
}

impl OptionValue {
    /// Interpret as a boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            Self::Integer(value) => Some(*value != 0),
            _ => None,
        }
    }

    /// Interpret as a float (integers are widened)
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(value) => Some(*value),
            Self::Integer(value) => Some(*value as f64),
            _ => None,
        }
    }

    /// Interpret as a non-negative integer
    pub fn as_u32(&self) -> Option<u32> {
        match self {
            Self::Integer(value) => u32::try_from(*value).ok(),
            _ => None,
        }
    }

    /// Interpret as text
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            _ => None,
        }
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(value) => value.fmt(f),
            Self::Integer(value) => value.fmt(f),
            Self::Float(value) => value.fmt(f),
            Self::Text(value) => value.fmt(f),
        }
    }
}

/// Options passed through to the solver backend.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SolverOptions {
    /// The random seed handed to the backend, for reproducible solves
    #[cfg_attr(feature = "serde", serde(default))]
    pub seed: u64,
    /// Opaque backend settings (algorithm choice, presolve, scaling, tolerances, ...)
    #[cfg_attr(feature = "serde", serde(default))]
    pub options: Map<String, OptionValue>,
}

impl SolverOptions {
    /// Builder-style insertion of a backend option
    pub fn with(mut self, key: impl Into<String>, value: OptionValue) -> Self {
        self.options.insert(key.into(), value);
        self
    }
}

/// The per-call configuration of the engine. It is never mutated by a solve;
/// build a new one (or clone and modify) between periods.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct TradeConfig {
    /// Numerical tolerance: flows below it are noise, capacities may be exceeded by it
    pub epsilon: f64,
    /// The floor of the per-unit penalty for unmet demand. The effective cost is
    /// raised each solve to a multiple of the most expensive allocation.
    pub demand_slack_cost: f64,
    /// Per-unit penalty for falling short of a soft minimum capacity
    pub soft_minimum_capacity_slack_cost: f64,
    /// Verify after extraction that no center ships more than its capacity
    pub check_capacity: bool,
    /// Dependent commodities that must be supplied: an unsupplied requirement is a
    /// configuration error instead of a relaxed (skipped) constraint
    pub mandatory_dependents: Vec<Commodity>,
    /// Backend settings
    pub solver: SolverOptions,
}

impl Default for TradeConfig {
    fn default() -> Self {
        Self {
            epsilon: 1e-6,
            demand_slack_cost: 1e3,
            soft_minimum_capacity_slack_cost: 1e2,
            check_capacity: true,
            mandatory_dependents: Vec::new(),
            solver: SolverOptions::default(),
        }
    }
}
