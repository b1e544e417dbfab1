use std::fmt;

/// The textual form of [`Wildcard::Any`]
pub const ANY: &str = "*";

/// One component of a wildcard-capable key: either a concrete value or "*".
///
/// Process connectors and trade keys (tariffs, quotas) are expressed with these.
/// The value is compared verbatim; callers normalize commodity names before
/// constructing a wildcard (see [`crate::models::TradeKey::new`]).
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "String", into = "String")
)]
pub enum Wildcard {
    /// Matches anything
    Any,
    /// Matches exactly this value
    Is(String),
}

impl Wildcard {
    /// Does this component admit the given value?
    pub fn matches(&self, value: &str) -> bool {
        match self {
            Self::Any => true,
            Self::Is(expected) => expected == value,
        }
    }

    /// Is this the "*" component?
    pub fn is_any(&self) -> bool {
        matches!(self, Self::Any)
    }
}

impl From<String> for Wildcard {
    fn from(value: String) -> Self {
        if value.trim() == ANY {
            Self::Any
        } else {
            Self::Is(value)
        }
    }
}

impl From<&str> for Wildcard {
    fn from(value: &str) -> Self {
        Self::from(value.to_owned())
    }
}

impl From<Wildcard> for String {
    fn from(value: Wildcard) -> Self {
        match value {
            Wildcard::Any => ANY.to_owned(),
            Wildcard::Is(value) => value,
        }
    }
}

impl fmt::Display for Wildcard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => ANY.fmt(f),
            Self::Is(value) => value.fmt(f),
        }
    }
}
