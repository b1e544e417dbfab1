#![warn(missing_docs)]
//! The Trade LP engine: builds a linear program settling multi-commodity trade
//! across a production network, hands it to a black-box backend, and reads the
//! solved flows back out.
//!
//! The pipeline runs once per period:
//! domain graph → legal arcs → parameter tables → constraint families + objective
//! → backend → allocations. [`TradeLp`] wraps it behind the
//! [`tlp_core::ports::Solver`] port; [`TradeModel`] exposes the individual
//! stages for callers that want to inspect or export the model.

mod arcs;
mod constraints;
mod extract;
mod network;
mod objective;
mod params;
mod tariff;

/**
 * Errors raised while building, solving or checking a model.
 */
mod error;
pub use error::*;

/**
 * Typed indices used throughout the model.
 */
mod index;
pub use index::{ArcId, CenterId, CommodityId, RegionId, RowId, VarId};

/**
 * The backend-neutral linear program and its exporters.
 */
mod export;
mod program;
pub use program::{LinearProgram, Row, Sense, Variable, VariableKind};

/**
 * The model lifecycle: built, then optimal or unsettled.
 */
mod model;
pub use model::{SolveOutcome, SolvedModel, TradeModel};

/**
 * The seam between the model and the black-box solvers.
 */
mod backend;
pub use backend::{Backend, BackendOutcome};

/**
 * These are implementations of the solver backends.
 */
mod impls;
pub use impls::*;

mod engine;
pub use engine::TradeLp;

/// Reading and writing scenarios as JSON
#[cfg(feature = "io")]
pub mod io;

// We use non-std collections here for their ordering semantics and performance
pub(crate) type Map<K, V> = indexmap::IndexMap<K, V, rustc_hash::FxBuildHasher>;
pub(crate) type Set<T> = indexmap::IndexSet<T, rustc_hash::FxBuildHasher>;
