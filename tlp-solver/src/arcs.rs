use crate::Map;
use crate::index::{ArcId, CenterId, CommodityId, indices};
use crate::network::Network;
use tlp_core::models::ProcessType;

/// Whether the destination consumes the commodity as a primary BOM input or
/// only as a dependent requirement of one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArcKind {
    Primary,
    Dependent,
}

/// A legal (origin, destination, commodity) triple
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arc {
    pub from: CenterId,
    pub to: CenterId,
    pub commodity: CommodityId,
    pub kind: ArcKind,
}

/// The set of permitted arcs, with the adjacency lists every constraint family needs.
#[derive(Debug, Default)]
pub struct LegalArcs {
    arcs: Vec<Arc>,
    outgoing: Vec<Vec<ArcId>>,
    incoming: Map<(CenterId, CommodityId), Vec<ArcId>>,
}

impl LegalArcs {
    /// Enumerate every legal arc of the network.
    ///
    /// An arc exists when the origin is not a demand center, produces the
    /// commodity, a connector permits its process to feed the destination's,
    /// and the destination consumes the commodity (primarily, or as a dependent
    /// of some primary input). Self-loops are excluded. The enumeration order is
    /// fully determined by the order of the centers and recipes.
    pub fn enumerate(network: &Network<'_>) -> Self {
        let mut arcs = Self {
            arcs: Vec::new(),
            outgoing: vec![Vec::new(); network.len()],
            incoming: Map::default(),
        };

        for (from, origin) in network.centers() {
            match origin.kind {
                ProcessType::Demand => continue,
                ProcessType::Supply | ProcessType::Production => {}
            }
            for &commodity in network.recipe(from).products.iter() {
                for (to, _) in network.centers() {
                    if to == from || !network.permits(from, to) {
                        continue;
                    }
                    let recipe = network.recipe(to);
                    let kind = if recipe.consumes(commodity) {
                        ArcKind::Primary
                    } else if recipe.requires(commodity) {
                        ArcKind::Dependent
                    } else {
                        continue;
                    };
                    arcs.push(Arc {
                        from,
                        to,
                        commodity,
                        kind,
                    });
                }
            }
        }

        arcs
    }

    fn push(&mut self, arc: Arc) {
        let id = ArcId::from(self.arcs.len());
        self.outgoing[arc.from.index()].push(id);
        self.incoming
            .entry((arc.to, arc.commodity))
            .or_default()
            .push(id);
        self.arcs.push(arc);
    }

    /// The number of legal arcs
    pub fn len(&self) -> usize {
        self.arcs.len()
    }

    /// The arc behind an id
    pub fn get(&self, id: ArcId) -> &Arc {
        &self.arcs[id.index()]
    }

    /// Iterate over all arcs with their ids
    pub fn iter(&self) -> impl Iterator<Item = (ArcId, &Arc)> {
        indices(self.arcs.len()).zip(self.arcs.iter())
    }

    /// Arcs leaving a center
    pub fn outgoing(&self, center: CenterId) -> &[ArcId] {
        &self.outgoing[center.index()]
    }

    /// Arcs delivering a commodity to a center
    pub fn incoming(&self, center: CenterId, commodity: CommodityId) -> &[ArcId] {
        self.incoming
            .get(&(center, commodity))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Arcs leaving a center carrying one of the given commodities
    pub fn outgoing_of<'a>(
        &'a self,
        center: CenterId,
        commodities: &'a [CommodityId],
    ) -> impl Iterator<Item = ArcId> + 'a {
        self.outgoing(center)
            .iter()
            .copied()
            .filter(|&id| commodities.contains(&self.arcs[id.index()].commodity))
    }

    /// Is any center other than `center` able to deliver `commodity` to it?
    pub fn is_supplied(&self, center: CenterId, commodity: CommodityId) -> bool {
        !self.incoming(center, commodity).is_empty()
    }
}
