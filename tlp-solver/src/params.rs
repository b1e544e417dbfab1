use crate::arcs::LegalArcs;
use crate::error::ConfigurationError;
use crate::index::{ArcId, CenterId, CommodityId, RegionId};
use crate::network::Network;
use crate::tariff::{KeyShape, candidates};
use crate::Map;
use tlp_core::models::{ParameterKind, TradeData, TradeKey};
use tracing::{Level, event};

/// The arcs whose summed flow is limited by one quota key
#[derive(Debug)]
pub struct QuotaBucket<'d> {
    pub key: &'d TradeKey,
    pub limit: f64,
    pub arcs: Vec<ArcId>,
}

/// Lookup tables derived once per build, so that every constraint family and
/// the objective can read them in constant time.
#[derive(Debug)]
pub struct Parameters<'d> {
    pub capacity: Vec<f64>,
    pub ratios: Map<(CenterId, CommodityId, ParameterKind), f64>,
    pub dependent_quantities: Map<(CenterId, CommodityId, CommodityId), f64>,
    /// Per-unit cost of each arc: transport, destination energy, tariff tax, origin production
    pub arc_costs: Vec<f64>,
    pub quotas: Vec<QuotaBucket<'d>>,
    /// Quota keys of a shape that cannot match any arc
    pub unmatchable_quotas: Vec<&'d TradeKey>,
    pub routes_without_transport_cost: usize,
}

impl<'d> Parameters<'d> {
    /// Assemble every table from the resolved network, its legal arcs and the trade data.
    pub fn assemble(
        network: &Network<'_>,
        arcs: &LegalArcs,
        data: &'d TradeData,
    ) -> Result<Self, ConfigurationError> {
        let mut capacity = Vec::with_capacity(network.len());
        let mut ratios = Map::default();
        let mut energy_costs = Map::<(CenterId, CommodityId), f64>::default();
        let mut dependent_quantities = Map::default();

        for (center, node) in network.centers() {
            capacity.push(node.center.capacity);
            for (&input, details) in network.recipe(center).inputs.iter() {
                for (kind, value) in details.parameters.iter() {
                    ratios.insert((center, input, kind), value);
                }
                energy_costs.insert((center, input), details.energy_cost);
                for (&dependent, &quantity) in details.dependents.iter() {
                    dependent_quantities.insert((center, input, dependent), quantity);
                }
            }
        }

        // Routes between countries or of commodities the network never mentions are irrelevant
        let mut transport = Map::<(RegionId, RegionId, CommodityId), f64>::default();
        for route in data.transportation_costs.iter() {
            if !route.cost_per_ton.is_finite() {
                return Err(ConfigurationError::InvalidValue {
                    entity: format!(
                        "transportation cost {} -> {} [{}]",
                        route.from_iso3, route.to_iso3, route.commodity
                    ),
                    field: "cost_per_ton",
                    value: route.cost_per_ton,
                });
            }
            if let (Some(from), Some(to), Some(commodity)) = (
                network.region_id(&route.from_iso3),
                network.region_id(&route.to_iso3),
                network.commodity_id(&route.commodity),
            ) {
                transport.insert((from, to, commodity), route.cost_per_ton);
            }
        }

        for (key, &tax) in data.tariff_taxes.iter() {
            if !tax.is_finite() {
                return Err(ConfigurationError::InvalidValue {
                    entity: format!("tariff tax {key}"),
                    field: "tax",
                    value: tax,
                });
            }
            if KeyShape::of(key).is_none() {
                event!(Level::WARN, key = %key, "tariff tax key can never match an arc");
            }
        }

        let mut quotas = Vec::new();
        let mut unmatchable_quotas = Vec::new();
        let mut buckets = Map::<&TradeKey, usize>::default();
        for (key, &limit) in data.tariff_quotas.iter() {
            if !limit.is_finite() || limit < 0.0 {
                return Err(ConfigurationError::InvalidValue {
                    entity: format!("tariff quota {key}"),
                    field: "quota",
                    value: limit,
                });
            }
            if KeyShape::of(key).is_some() {
                buckets.insert(key, quotas.len());
                quotas.push(QuotaBucket {
                    key,
                    limit,
                    arcs: Vec::new(),
                });
            } else {
                event!(Level::WARN, key = %key, "tariff quota key can never match an arc");
                unmatchable_quotas.push(key);
            }
        }

        let mut arc_costs = Vec::with_capacity(arcs.len());
        let mut routes_without_transport_cost = 0;
        for (id, arc) in arcs.iter() {
            let origin = network.node(arc.from);
            let destination = network.node(arc.to);

            let transport_cost = match transport.get(&(origin.region, destination.region, arc.commodity)) {
                Some(&cost) => cost,
                None => {
                    routes_without_transport_cost += 1;
                    0.0
                }
            };

            let energy_cost = energy_costs
                .get(&(arc.to, arc.commodity))
                .copied()
                .unwrap_or(0.0);

            let mut tax = 0.0;
            for key in candidates(
                &origin.center.location.iso3,
                &destination.center.location.iso3,
                network.commodity(arc.commodity),
            ) {
                if let Some(amount) = data.tariff_taxes.get(&key) {
                    tax += amount;
                }
                if let Some(&bucket) = buckets.get(&key) {
                    quotas[bucket].arcs.push(id);
                }
            }

            arc_costs.push(transport_cost + energy_cost + tax + origin.center.production_cost);
        }

        if routes_without_transport_cost > 0 {
            event!(
                Level::DEBUG,
                routes = routes_without_transport_cost,
                "arcs without a transportation cost are priced at zero"
            );
        }

        Ok(Self {
            capacity,
            ratios,
            dependent_quantities,
            arc_costs,
            quotas,
            unmatchable_quotas,
            routes_without_transport_cost,
        })
    }

    /// The declared ratio of an input at a center, if any
    pub fn ratio(
        &self,
        center: CenterId,
        commodity: CommodityId,
        kind: ParameterKind,
    ) -> Option<f64> {
        self.ratios.get(&(center, commodity, kind)).copied()
    }

    /// The largest per-unit arc cost, or zero without arcs
    pub fn max_arc_cost(&self) -> f64 {
        self.arc_costs.iter().copied().fold(0.0, f64::max)
    }
}
