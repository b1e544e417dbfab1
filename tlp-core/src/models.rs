mod center;
mod commodity;
mod config;
mod graph;
pub(crate) mod map;
mod outcome;
mod process;
mod trade;
mod wildcard;

pub use center::{Location, ProcessCenter, ProcessConnector};
pub use commodity::Commodity;
pub use config::{OptionValue, SolverOptions, TradeConfig};
pub use graph::DomainGraph;
pub use map::Map;
#[cfg(feature = "serde")]
pub use map::entries;
pub use outcome::{
    Allocations, ArcKey, ConstraintFamily, Diagnostics, Settlement, SkipReason,
    SkippedConstraint, SolveStatus, WarmStart, WarmStartReport,
};
pub use process::{BomElement, BomParameters, ParameterKind, Process, ProcessType};
pub use trade::{
    AggregateKey, FeedstockKey, RatioBounds, TradeData, TradeKey, TransportationCost,
};
pub use wildcard::{ANY, Wildcard};
