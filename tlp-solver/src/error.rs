use tlp_core::models::Commodity;

/// The caller's data is self-contradictory. Raised before any solve is attempted.
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum ConfigurationError {
    /// Two centers share a name
    #[error("duplicate process center `{0}`")]
    DuplicateCenter(String),
    /// Two processes share a name
    #[error("duplicate process `{0}`")]
    DuplicateProcess(String),
    /// A center references a process that does not exist
    #[error("process center `{center}` references unknown process `{process}`")]
    UnknownProcess {
        /// The referencing center
        center: String,
        /// The missing process
        process: String,
    },
    /// A numeric field is NaN, infinite, or outside its admissible range
    #[error("{entity}: `{field}` = {value} is not admissible")]
    InvalidValue {
        /// The center or BOM element concerned
        entity: String,
        /// The offending field
        field: &'static str,
        /// The offending value
        value: f64,
    },
    /// The feedstocks selected by an aggregated-ratio mask at one center do not all
    /// yield the same outputs, so their shares have no common denominator
    #[error(
        "aggregated ratio ({technology}, {mask}) at `{center}`: masked feedstocks yield different outputs"
    )]
    InconsistentAggregate {
        /// The technology of the key
        technology: String,
        /// The mask of the key
        mask: String,
        /// The center where the inconsistency was found
        center: String,
    },
    /// A dependent commodity configured as mandatory has no supplier at a center
    #[error("mandatory dependent commodity `{commodity}` has no supplier at `{center}`")]
    UnsuppliedDependent {
        /// The center lacking a supplier
        center: String,
        /// The dependent commodity
        commodity: Commodity,
    },
    /// The engine configuration itself is unusable
    #[error("invalid configuration: `{field}` = {value}")]
    InvalidConfig {
        /// The offending field
        field: &'static str,
        /// The offending value
        value: f64,
    },
}

/// The backend could not be set up or run. An infeasible model is not a backend error.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// The backend rejected the problem data or settings
    #[error("{backend} setup failed: {message}")]
    Setup {
        /// The backend name
        backend: &'static str,
        /// The backend's explanation
        message: String,
    },
    /// The backend returned a solution of the wrong dimension
    #[error("{backend} returned {actual} values for {expected} variables")]
    Dimension {
        /// The backend name
        backend: &'static str,
        /// The number of variables in the model
        expected: usize,
        /// The number of values returned
        actual: usize,
    },
}

/// A post-solve invariant does not hold. This indicates a defect in the model
/// builder rather than bad input data.
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum InvariantViolation {
    /// A center ships more than its capacity
    #[error("`{center}` ships {production} against capacity {capacity}")]
    CapacityOverrun {
        /// The center concerned
        center: String,
        /// The realized outflow
        production: f64,
        /// The declared capacity
        capacity: f64,
    },
}

/// Everything that can prevent a settlement from being produced.
#[derive(Debug, thiserror::Error)]
pub enum TradeError {
    /// Inconsistent input data or configuration
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    /// Backend failure
    #[error(transparent)]
    Backend(#[from] BackendError),
    /// A post-solve invariant failed
    #[error(transparent)]
    Invariant(#[from] InvariantViolation),
}
