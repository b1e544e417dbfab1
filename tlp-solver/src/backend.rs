use crate::error::BackendError;
use crate::program::LinearProgram;
use tlp_core::models::{SolveStatus, SolverOptions};

/// What a backend reports for one solve.
#[derive(Debug, Clone, PartialEq)]
pub struct BackendOutcome {
    /// The backend's verdict, mapped onto the engine's statuses
    pub status: SolveStatus,
    /// One value per variable; only meaningful when the status is optimal
    pub values: Vec<f64>,
    /// Whether the supplied starting point was actually used
    pub warm_start_applied: bool,
    /// Iterations taken, if the backend reports them
    pub iterations: Option<u32>,
}

/// A black-box LP solver.
///
/// Implementations translate a [`LinearProgram`] (minimize `cᵀx` over `x ≥ 0`
/// subject to its rows) into their own standard form and back. A solve is a
/// single blocking call with no state retained between calls.
pub trait Backend {
    /// Backend-specific settings
    type Settings;

    /// Create a backend with the given settings
    fn new(settings: Self::Settings) -> Self;

    /// Create a backend from the engine's opaque options map. Keys the backend
    /// does not understand are logged and ignored.
    fn from_options(options: &SolverOptions) -> Self
    where
        Self: Sized;

    /// A short name for logs and reports
    fn name(&self) -> &'static str;

    /// Can this backend start from a supplied primal point?
    fn supports_warm_start(&self) -> bool;

    /// Solve the program, optionally starting from `warm_start` (one value per variable).
    ///
    /// An infeasible or unbounded program is reported through the status, not as an error.
    fn solve(
        &self,
        program: &LinearProgram,
        warm_start: Option<&[f64]>,
    ) -> Result<BackendOutcome, BackendError>;
}
