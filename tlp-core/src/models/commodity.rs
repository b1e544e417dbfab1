use std::fmt;

/// A tradeable good, identified by its normalized (trimmed, lowercase) name.
///
/// Two commodities are equal exactly when their normalized names are equal, so
/// `Commodity::new("Iron Ore")` and `Commodity::new("iron ore ")` are the same
/// commodity.
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "String", into = "String")
)]
pub struct Commodity(String);

impl Commodity {
    /// Create a commodity, normalizing its name
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(name.as_ref().trim().to_lowercase())
    }

    /// The normalized name
    pub fn name(&self) -> &str {
        &self.0
    }

    /// Case-insensitive substring test, used for commodity family masks such as "dri"
    pub fn matches_mask(&self, mask: &str) -> bool {
        self.0.contains(&mask.trim().to_lowercase())
    }
}

impl From<String> for Commodity {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for Commodity {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<Commodity> for String {
    fn from(value: Commodity) -> Self {
        value.0
    }
}

impl fmt::Display for Commodity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
