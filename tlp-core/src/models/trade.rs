use super::{Commodity, Map, Wildcard};
use std::fmt;

/// The cost of moving one ton of a commodity between two countries.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransportationCost {
    /// Origin country (ISO3)
    pub from_iso3: String,
    /// Destination country (ISO3)
    pub to_iso3: String,
    /// The commodity shipped
    pub commodity: Commodity,
    /// Cost per ton
    pub cost_per_ton: f64,
}

/// A wildcard-capable (origin, destination, commodity) key for tariff taxes and quotas.
///
/// Origin and destination are ISO3 country codes. The commodity component is
/// normalized like a [`Commodity`] unless it is "*".
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "RawTradeKey", into = "RawTradeKey")
)]
pub struct TradeKey {
    /// Origin country, or "*"
    pub from: Wildcard,
    /// Destination country, or "*"
    pub to: Wildcard,
    /// Commodity, or "*"
    pub commodity: Wildcard,
}

impl TradeKey {
    /// Create a key; any component may be "*"
    pub fn new(
        from: impl Into<Wildcard>,
        to: impl Into<Wildcard>,
        commodity: impl Into<Wildcard>,
    ) -> Self {
        let commodity = match commodity.into() {
            Wildcard::Any => Wildcard::Any,
            Wildcard::Is(name) => Wildcard::Is(Commodity::new(name).into()),
        };
        Self {
            from: from.into(),
            to: to.into(),
            commodity,
        }
    }

    /// A key with no wildcards
    pub fn exact(from: &str, to: &str, commodity: &Commodity) -> Self {
        Self {
            from: Wildcard::Is(from.to_owned()),
            to: Wildcard::Is(to.to_owned()),
            commodity: Wildcard::Is(commodity.name().to_owned()),
        }
    }
}

impl fmt::Display for TradeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.from, self.to, self.commodity)
    }
}

/// The primitive form of a [`TradeKey`], so that deserialization normalizes the commodity
#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct RawTradeKey {
    from: String,
    to: String,
    commodity: String,
}

#[cfg(feature = "serde")]
impl From<RawTradeKey> for TradeKey {
    fn from(value: RawTradeKey) -> Self {
        Self::new(value.from, value.to, value.commodity)
    }
}

#[cfg(feature = "serde")]
impl From<TradeKey> for RawTradeKey {
    fn from(value: TradeKey) -> Self {
        Self {
            from: value.from.into(),
            to: value.to.into(),
            commodity: value.commodity.into(),
        }
    }
}

/// A regional cap on the consumption of a scarce (secondary) feedstock.
///
/// Region labels are matched against a center's ISO3 code and its optional region.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FeedstockKey {
    /// The capped commodity
    pub commodity: Commodity,
    /// The countries or regions the cap covers
    pub regions: Vec<String>,
}

/// A ratio constraint applied to a whole family of feedstocks at every center
/// running a given technology, e.g. "total DRI* share must be 30–60%".
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AggregateKey {
    /// The process name the constraint applies to
    pub technology: String,
    /// A case-insensitive substring selecting the feedstock family
    pub mask: String,
}

/// Lower and/or upper bound on a share
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RatioBounds {
    /// The minimum share, if any
    #[cfg_attr(feature = "serde", serde(default))]
    pub minimum: Option<f64>,
    /// The maximum share, if any
    #[cfg_attr(feature = "serde", serde(default))]
    pub maximum: Option<f64>,
}

/// Everything besides the domain graph that prices or restricts trade in a period.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TradeData {
    /// Per-ton transport costs; routes not listed cost nothing
    #[cfg_attr(feature = "serde", serde(default))]
    pub transportation_costs: Vec<TransportationCost>,
    /// Per-ton taxes keyed by wildcard-capable trade keys
    #[cfg_attr(
        feature = "serde",
        serde(default, with = "crate::models::map::entries")
    )]
    pub tariff_taxes: Map<TradeKey, f64>,
    /// Volume quotas keyed by wildcard-capable trade keys
    #[cfg_attr(
        feature = "serde",
        serde(default, with = "crate::models::map::entries")
    )]
    pub tariff_quotas: Map<TradeKey, f64>,
    /// Regional consumption caps for secondary feedstocks
    #[cfg_attr(
        feature = "serde",
        serde(default, with = "crate::models::map::entries")
    )]
    pub secondary_feedstock_caps: Map<FeedstockKey, f64>,
    /// Aggregated commodity-family ratios per technology
    #[cfg_attr(
        feature = "serde",
        serde(default, with = "crate::models::map::entries")
    )]
    pub aggregated_ratios: Map<AggregateKey, RatioBounds>,
}
