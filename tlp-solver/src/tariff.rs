// Resolution of wildcard-capable tariff keys against concrete arcs.
//
// An arc (from, to, commodity) is matched against a fixed, ordered list of key
// shapes. Taxes of every matching key are summed; an arc joins the quota bucket
// of every matching key. Keys of any other shape (two or more wildcards) never
// match an arc.

use tlp_core::models::{Commodity, TradeKey, Wildcard};

/// How a trade key relates to a concrete arc
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyShape {
    /// (from, to, commodity)
    Exact,
    /// (*, to, commodity)
    AnyOrigin,
    /// (from, *, commodity)
    AnyDestination,
    /// (from, to, *)
    AnyCommodity,
}

/// The order in which key shapes are tried
pub const PRECEDENCE: [KeyShape; 4] = [
    KeyShape::Exact,
    KeyShape::AnyOrigin,
    KeyShape::AnyDestination,
    KeyShape::AnyCommodity,
];

impl KeyShape {
    /// The key of this shape for a concrete route
    pub fn key(self, from: &str, to: &str, commodity: &Commodity) -> TradeKey {
        let exact = TradeKey::exact(from, to, commodity);
        match self {
            Self::Exact => exact,
            Self::AnyOrigin => TradeKey {
                from: Wildcard::Any,
                ..exact
            },
            Self::AnyDestination => TradeKey {
                to: Wildcard::Any,
                ..exact
            },
            Self::AnyCommodity => TradeKey {
                commodity: Wildcard::Any,
                ..exact
            },
        }
    }

    /// The shape of a key, if it is one that can match an arc
    pub fn of(key: &TradeKey) -> Option<Self> {
        match (key.from.is_any(), key.to.is_any(), key.commodity.is_any()) {
            (false, false, false) => Some(Self::Exact),
            (true, false, false) => Some(Self::AnyOrigin),
            (false, true, false) => Some(Self::AnyDestination),
            (false, false, true) => Some(Self::AnyCommodity),
            _ => None,
        }
    }
}

/// Every key that matches a route, in precedence order
pub fn candidates(from: &str, to: &str, commodity: &Commodity) -> [TradeKey; 4] {
    PRECEDENCE.map(|shape| shape.key(from, to, commodity))
}
