use super::Wildcard;

/// Where a process center sits, for the purposes of transport costs, tariffs
/// and regional caps.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Location {
    /// ISO 3166-1 alpha-3 country code, used for transport costs and tariffs
    pub iso3: String,
    /// An optional broader region label (e.g. "EU"), usable in regional caps
    #[cfg_attr(feature = "serde", serde(default))]
    pub region: Option<String>,
}

impl Location {
    /// A location known only by its country
    pub fn iso3(iso3: impl Into<String>) -> Self {
        Self {
            iso3: iso3.into(),
            region: None,
        }
    }

    /// Is this location covered by any of the given country or region labels?
    pub fn within<S: AsRef<str>>(&self, labels: &[S]) -> bool {
        labels.iter().any(|label| {
            let label = label.as_ref();
            label == self.iso3 || self.region.as_deref() == Some(label)
        })
    }
}

/// A node of the network: a mine, a plant line, a demand hub.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProcessCenter {
    /// The unique name of the center
    pub name: String,
    /// The name of the process this center runs
    pub process: String,
    /// Maximum outflow (supply, production) or the demanded volume (demand)
    pub capacity: f64,
    /// Where the center is located
    pub location: Location,
    /// Cost per unit of outflow, charged on every allocation leaving this center
    #[cfg_attr(feature = "serde", serde(default))]
    pub production_cost: f64,
    /// Preferred minimum utilization as a fraction of capacity, enforced via penalty
    #[cfg_attr(feature = "serde", serde(default))]
    pub soft_minimum_capacity: Option<f64>,
    /// Realized production, written after a successful solve
    #[cfg_attr(feature = "serde", serde(default))]
    pub optimal_production: Option<f64>,
}

impl ProcessCenter {
    /// A center with no production cost, no soft minimum and no recorded production
    pub fn new(
        name: impl Into<String>,
        process: impl Into<String>,
        capacity: f64,
        location: Location,
    ) -> Self {
        Self {
            name: name.into(),
            process: process.into(),
            capacity,
            location,
            production_cost: 0.0,
            soft_minimum_capacity: None,
            optimal_production: None,
        }
    }
}

/// A legal technology-to-technology edge. Either side may be "*".
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProcessConnector {
    /// The originating process name
    pub from_process: Wildcard,
    /// The receiving process name
    pub to_process: Wildcard,
}

impl ProcessConnector {
    /// Create a connector; "*" on either side is a wildcard
    pub fn new(from_process: impl Into<Wildcard>, to_process: impl Into<Wildcard>) -> Self {
        Self {
            from_process: from_process.into(),
            to_process: to_process.into(),
        }
    }

    /// Does this connector permit flow from `from` to `to` (process names)?
    pub fn permits(&self, from: &str, to: &str) -> bool {
        self.from_process.matches(from) && self.to_process.matches(to)
    }
}
