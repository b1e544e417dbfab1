#![warn(missing_docs)]
//! Core models and ports for settling multi-commodity trade with a linear program.
//!
//! This crate holds the data a caller hands to the engine (the domain graph of
//! commodities, processes, centers and connectors; transport costs, tariffs and
//! caps; configuration) and the data it gets back (allocations, diagnostics,
//! warm starts). The engine itself lives in `tlp-solver`.

/// Core domain models for the trade settlement system.
///
/// The models in this module are primarily data structures with minimal business
/// logic, separating the domain entities from the optimization that consumes them.
pub mod models;

/// Interface traits for the trade settlement system.
///
/// These traits define the contract between a caller (for instance a yearly
/// simulation loop) and an engine implementation, without specifying how the
/// settlement is computed.
pub mod ports;
