use super::{Commodity, Map};
use std::fmt;

/// An allocation arc, named by its endpoints' center names and the commodity shipped.
///
/// Results and warm starts are keyed by names rather than engine-internal indices,
/// so they stay meaningful across periods whose networks differ.
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArcKey {
    /// The shipping center
    pub from: String,
    /// The receiving center
    pub to: String,
    /// The commodity shipped
    pub commodity: Commodity,
}

impl ArcKey {
    /// Construct a key from names
    pub fn new(from: impl Into<String>, to: impl Into<String>, commodity: impl Into<Commodity>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            commodity: commodity.into(),
        }
    }
}

impl fmt::Display for ArcKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {} [{}]", self.from, self.to, self.commodity)
    }
}

/// The settled flows of one period.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Allocations {
    /// Flow volume per arc; only arcs carrying at least epsilon are present
    #[cfg_attr(feature = "serde", serde(with = "crate::models::map::entries"))]
    pub volumes: Map<ArcKey, f64>,
    /// The per-unit cost of each arc present in `volumes`
    #[cfg_attr(feature = "serde", serde(with = "crate::models::map::entries"))]
    pub costs: Map<ArcKey, f64>,
    /// Realized outflow per shipping center
    pub production: Map<String, f64>,
    /// Demand left unmet per demand center (only shortfalls of at least epsilon)
    pub unmet_demand: Map<String, f64>,
    /// Shortfall against the soft minimum capacity per center (only shortfalls of at least epsilon)
    pub capacity_shortfall: Map<String, f64>,
    /// The optimal objective value, including slack penalties
    pub objective: f64,
}

impl Allocations {
    /// Total flow shipped along all arcs
    pub fn total_volume(&self) -> f64 {
        self.volumes.values().sum()
    }

    /// Total flow received by a center, optionally restricted to one commodity
    pub fn inflow(&self, center: &str, commodity: Option<&Commodity>) -> f64 {
        self.volumes
            .iter()
            .filter(|(arc, _)| arc.to == center && commodity.is_none_or(|c| &arc.commodity == c))
            .map(|(_, volume)| volume)
            .sum()
    }

    /// Total flow shipped by a center, optionally restricted to one commodity
    pub fn outflow(&self, center: &str, commodity: Option<&Commodity>) -> f64 {
        self.volumes
            .iter()
            .filter(|(arc, _)| arc.from == center && commodity.is_none_or(|c| &arc.commodity == c))
            .map(|(_, volume)| volume)
            .sum()
    }
}

/// Solved allocation values from a previous period, used to seed the next solve.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct WarmStart(
    #[cfg_attr(feature = "serde", serde(with = "crate::models::map::entries"))] pub Map<ArcKey, f64>,
);

impl WarmStart {
    /// The seeded value for an arc, if any
    pub fn get(&self, arc: &ArcKey) -> Option<f64> {
        self.0.get(arc).copied()
    }

    /// The number of seeded arcs
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether any arcs are seeded
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(ArcKey, f64)> for WarmStart {
    fn from_iter<I: IntoIterator<Item = (ArcKey, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// What the backend reported. Only `Optimal` carries allocations.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum SolveStatus {
    /// A solution was found and loaded
    Optimal,
    /// The constraints cannot be satisfied simultaneously
    Infeasible,
    /// The objective can be decreased without bound
    Unbounded,
    /// Anything else (iteration or time limits, numerical trouble), with the backend's label
    Other(String),
}

impl SolveStatus {
    /// Whether extraction may proceed
    pub fn is_optimal(&self) -> bool {
        matches!(self, Self::Optimal)
    }
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Optimal => "optimal".fmt(f),
            Self::Infeasible => "infeasible".fmt(f),
            Self::Unbounded => "unbounded".fmt(f),
            Self::Other(label) => write!(f, "other ({label})"),
        }
    }
}

/// The nine constraint families of the model
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum ConstraintFamily {
    /// Outflow within capacity
    ProductionCapacity,
    /// Inflow plus slack equals demand
    DemandSatisfaction,
    /// Input inflow covers grouped output outflow
    BomBalance,
    /// Minimum/maximum share of a BOM input
    BomRatio,
    /// Dependent commodities follow their primary inputs
    DependentCommodity,
    /// Flow over matching arcs within quota
    TradeQuota,
    /// Outflow plus slack reaches the soft minimum
    SoftMinimumCapacity,
    /// Regional secondary feedstock caps
    SecondaryFeedstock,
    /// Minimum/maximum share of a feedstock family
    AggregatedRatio,
}

impl ConstraintFamily {
    /// Every family, in build order
    pub const ALL: [ConstraintFamily; 9] = [
        Self::ProductionCapacity,
        Self::DemandSatisfaction,
        Self::BomBalance,
        Self::BomRatio,
        Self::DependentCommodity,
        Self::TradeQuota,
        Self::SoftMinimumCapacity,
        Self::SecondaryFeedstock,
        Self::AggregatedRatio,
    ];

    /// A short, stable label, also used as a row-name prefix
    pub fn label(&self) -> &'static str {
        match self {
            Self::ProductionCapacity => "capacity",
            Self::DemandSatisfaction => "demand",
            Self::BomBalance => "bom",
            Self::BomRatio => "ratio",
            Self::DependentCommodity => "dependent",
            Self::TradeQuota => "quota",
            Self::SoftMinimumCapacity => "minimum",
            Self::SecondaryFeedstock => "feedstock",
            Self::AggregatedRatio => "aggregate",
        }
    }
}

impl fmt::Display for ConstraintFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.label().fmt(f)
    }
}

/// Why a constraint was not added to the model
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum SkipReason {
    /// No center supplies the dependent commodity to this center; the recipe is relaxed
    Unsupplied,
    /// Neither side of the ratio has any flows to compare
    NoComparableFlows,
    /// No arc is covered by the key
    NoMatchingArcs,
    /// No input of the group carries a positive input ratio to balance against
    NoInputRatio,
}

/// A constraint the builder decided not to enforce.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkippedConstraint {
    /// The family the constraint belongs to
    pub family: ConstraintFamily,
    /// The center concerned, if the constraint is per-center
    pub center: Option<String>,
    /// The commodity (or key) concerned
    pub subject: String,
    /// Why it was skipped
    pub reason: SkipReason,
}

/// Structured facts about a model build and solve, for locating infeasibility
/// and auditing relaxed recipes.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Diagnostics {
    /// The number of legal allocation arcs (one variable each)
    pub allocation_variables: usize,
    /// The number of demand slack variables
    pub demand_slack_variables: usize,
    /// The number of soft minimum capacity slack variables
    pub capacity_slack_variables: usize,
    /// Rows per constraint family
    pub constraints: Map<ConstraintFamily, usize>,
    /// Dependent-commodity constraints actually enforced
    pub dependent_enforced: usize,
    /// Dependent-commodity constraints skipped for lack of a supplier
    pub dependent_skipped: usize,
    /// Every skipped constraint, with the reason
    pub skipped: Vec<SkippedConstraint>,
    /// Arcs priced with the zero-cost transport fallback
    pub routes_without_transport_cost: usize,
    /// The per-unit demand slack penalty in effect for this solve
    pub demand_slack_cost: f64,
}

impl Diagnostics {
    /// Total number of variables
    pub fn variables(&self) -> usize {
        self.allocation_variables + self.demand_slack_variables + self.capacity_slack_variables
    }

    /// Total number of constraint rows
    pub fn total_constraints(&self) -> usize {
        self.constraints.values().sum()
    }
}

/// What became of a requested warm start
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum WarmStartReport {
    /// The caller did not supply one
    NotRequested,
    /// The backend started from the supplied values; `matched` arcs were found in this period's model
    Applied {
        /// Seeded arcs present in the model
        matched: usize,
        /// Seeded arcs supplied
        supplied: usize,
    },
    /// The backend cannot warm start; the values were not used
    Unsupported {
        /// The backend that declined
        backend: String,
    },
}

/// The full result of settling one period.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Settlement {
    /// The backend's verdict
    pub status: SolveStatus,
    /// The settled flows, present exactly when `status` is optimal
    pub allocations: Option<Allocations>,
    /// Build and solve diagnostics
    pub diagnostics: Diagnostics,
    /// What happened to the warm start, if one was supplied
    pub warm_start: WarmStartReport,
}

impl Settlement {
    /// The warm start for the next period: every allocation variable's solved value.
    ///
    /// Empty when the period was not settled.
    pub fn next_warm_start(&self) -> WarmStart {
        self.allocations
            .as_ref()
            .map(|allocations| {
                allocations
                    .volumes
                    .iter()
                    .map(|(arc, volume)| (arc.clone(), *volume))
                    .collect()
            })
            .unwrap_or_default()
    }
}
