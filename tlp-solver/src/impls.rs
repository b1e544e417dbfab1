#[cfg(any(feature = "clarabel", feature = "osqp"))]
use {
    tlp_core::models::OptionValue,
    tracing::{Level, event},
};

/// Implementation using the Clarabel interior point solver
#[cfg(feature = "clarabel")]
mod clarabel;
#[cfg(feature = "clarabel")]
pub use clarabel::ClarabelBackend;

/// Implementation using the OSQP operator splitting solver
#[cfg(feature = "osqp")]
mod osqp;
#[cfg(feature = "osqp")]
pub use osqp::OsqpBackend;

/// Overwrite `target` if the option had the expected type
#[cfg(feature = "clarabel")]
fn set<T>(target: &mut T, value: Option<T>) -> bool {
    match value {
        Some(value) => {
            *target = value;
            true
        }
        None => false,
    }
}

#[cfg(any(feature = "clarabel", feature = "osqp"))]
fn ignored(backend: &'static str, key: &str, value: &OptionValue) {
    event!(
        Level::WARN,
        backend,
        option = key,
        value = %value,
        "ignoring unrecognized or mistyped solver option"
    );
}
