// The nine constraint families. Each family reads the shared build context and
// appends rows to the program; none depends on rows of another, so the order
// below only fixes the row numbering.

mod aggregate;
mod bom;
mod capacity;
mod demand;
mod dependent;
mod feedstock;
mod quota;
mod ratio;
mod soft_minimum;

use crate::arcs::LegalArcs;
use crate::error::ConfigurationError;
use crate::index::{ArcId, CenterId, VarId};
use crate::model::Layout;
use crate::network::Network;
use crate::params::Parameters;
use crate::program::LinearProgram;
use tlp_core::models::{
    ConstraintFamily, Diagnostics, SkipReason, SkippedConstraint, TradeConfig, TradeData,
};

/// Everything a constraint family may read
pub(crate) struct Context<'a> {
    pub network: &'a Network<'a>,
    pub arcs: &'a LegalArcs,
    pub params: &'a Parameters<'a>,
    pub data: &'a TradeData,
    pub config: &'a TradeConfig,
    pub layout: &'a Layout,
}

impl Context<'_> {
    /// The name of a center, for row names and diagnostics
    pub fn center_name(&self, center: CenterId) -> &str {
        &self.network.node(center).center.name
    }

    /// Record a constraint that was not added
    pub fn skip(
        &self,
        diagnostics: &mut Diagnostics,
        family: ConstraintFamily,
        center: Option<CenterId>,
        subject: impl Into<String>,
        reason: SkipReason,
    ) {
        diagnostics.skipped.push(SkippedConstraint {
            family,
            center: center.map(|id| self.center_name(id).to_owned()),
            subject: subject.into(),
            reason,
        });
    }
}

/// The flow variables of the given arcs, each with the same coefficient
fn flows<'a>(
    arcs: impl IntoIterator<Item = &'a ArcId>,
    coefficient: f64,
) -> impl Iterator<Item = (VarId, f64)> {
    arcs.into_iter()
        .map(move |&arc| (Layout::flow(arc), coefficient))
}

/// Build every family, recording the number of rows each contributed.
pub(crate) fn generate(
    ctx: &Context<'_>,
    lp: &mut LinearProgram,
    diagnostics: &mut Diagnostics,
) -> Result<(), ConfigurationError> {
    for family in ConstraintFamily::ALL {
        let before = lp.num_rows();
        match family {
            ConstraintFamily::ProductionCapacity => capacity::build(ctx, lp, diagnostics),
            ConstraintFamily::DemandSatisfaction => demand::build(ctx, lp, diagnostics),
            ConstraintFamily::BomBalance => bom::build(ctx, lp, diagnostics),
            ConstraintFamily::BomRatio => ratio::build(ctx, lp, diagnostics),
            ConstraintFamily::DependentCommodity => dependent::build(ctx, lp, diagnostics),
            ConstraintFamily::TradeQuota => quota::build(ctx, lp, diagnostics),
            ConstraintFamily::SoftMinimumCapacity => soft_minimum::build(ctx, lp, diagnostics),
            ConstraintFamily::SecondaryFeedstock => feedstock::build(ctx, lp, diagnostics),
            ConstraintFamily::AggregatedRatio => aggregate::build(ctx, lp, diagnostics),
        }?;
        diagnostics
            .constraints
            .insert(family, lp.num_rows() - before);
    }
    Ok(())
}

/// Rows bounding the share of `own` within `total` from below and/or above:
/// `Σ own - share × Σ total (>= | <=) 0`.
fn share_rows(
    lp: &mut LinearProgram,
    family: ConstraintFamily,
    name: &str,
    own: &[ArcId],
    total: &[ArcId],
    minimum: Option<f64>,
    maximum: Option<f64>,
) {
    use crate::program::Sense;

    for (label, share, sense) in [("min", minimum, Sense::Ge), ("max", maximum, Sense::Le)] {
        let Some(share) = share else {
            continue;
        };
        lp.add_row(
            format!("{name}_{label}"),
            family,
            flows(own, 1.0).chain(flows(total, -share)),
            sense,
            0.0,
        );
    }
}

#[cfg(test)]
mod tests {
    use crate::TradeModel;
    use crate::index::VarId;
    use crate::program::{Row, Sense};
    use approx::assert_abs_diff_eq;
    use tlp_core::models::{
        BomElement, BomParameters, ConstraintFamily, DomainGraph, Location, Process,
        ProcessCenter, ProcessConnector, ProcessType, TradeConfig, TradeData, TradeKey,
    };

    fn process(name: &str, kind: ProcessType, bill_of_materials: Vec<BomElement>) -> Process {
        Process {
            name: name.to_owned(),
            kind,
            bill_of_materials,
        }
    }

    fn bom(input: &str, outputs: &[&str], parameters: BomParameters) -> BomElement {
        BomElement {
            name: input.to_owned(),
            input: input.into(),
            outputs: outputs.iter().map(|&x| x.into()).collect(),
            parameters,
            dependent_commodities: Default::default(),
            energy_cost: 0.0,
        }
    }

    fn plain(input: &str, outputs: &[&str]) -> BomElement {
        bom(input, outputs, BomParameters::default())
    }

    /// Ore (needing flux) and scrap both make iron for one market. The arcs are
    /// x0 ore, x1 flux, x2 scrap and x3 iron, followed by the furnace's
    /// shortfall x4 and the market's unmet demand x5.
    fn graph() -> DomainGraph {
        let mut ore = bom(
            "ore",
            &["iron"],
            BomParameters {
                input_ratio: Some(1.5),
                minimum_ratio: Some(0.6),
                ..Default::default()
            },
        );
        ore.dependent_commodities.insert("flux".into(), 0.1);
        let scrap = bom(
            "scrap",
            &["iron"],
            BomParameters {
                input_ratio: Some(1.25),
                ..Default::default()
            },
        );

        let mut furnace =
            ProcessCenter::new("furnace_deu", "furnace", 80.0, Location::iso3("DEU"));
        furnace.soft_minimum_capacity = Some(0.5);

        DomainGraph {
            commodities: vec![],
            processes: vec![
                process("mine", ProcessType::Supply, vec![plain("ore", &["ore"])]),
                process("quarry", ProcessType::Supply, vec![plain("flux", &["flux"])]),
                process("yard", ProcessType::Supply, vec![plain("scrap", &["scrap"])]),
                process("furnace", ProcessType::Production, vec![ore, scrap]),
                process("market", ProcessType::Demand, vec![plain("iron", &[])]),
            ],
            centers: vec![
                ProcessCenter::new("mine_aus", "mine", 100.0, Location::iso3("AUS")),
                ProcessCenter::new("quarry_deu", "quarry", 50.0, Location::iso3("DEU")),
                ProcessCenter::new("yard_deu", "yard", 40.0, Location::iso3("DEU")),
                furnace,
                ProcessCenter::new("market_deu", "market", 70.0, Location::iso3("DEU")),
            ],
            connectors: vec![
                ProcessConnector::new("mine", "furnace"),
                ProcessConnector::new("quarry", "furnace"),
                ProcessConnector::new("yard", "furnace"),
                ProcessConnector::new("furnace", "market"),
            ],
        }
    }

    fn rows(data: &TradeData, family: ConstraintFamily) -> Vec<Row> {
        let graph = graph();
        let model = TradeModel::build(&graph, data, &TradeConfig::default()).unwrap();
        model.program().rows_in(family).cloned().collect()
    }

    fn coefficient(row: &Row, var: usize) -> f64 {
        row.terms
            .iter()
            .find(|(id, _)| *id == VarId::from(var))
            .map_or(0.0, |&(_, coefficient)| coefficient)
    }

    #[test]
    fn test_capacity_rows() {
        let rows = rows(&TradeData::default(), ConstraintFamily::ProductionCapacity);
        assert_eq!(rows.len(), 4);
        let furnace = &rows[3];
        assert_eq!(furnace.name, "capacity_c3_furnace_deu");
        assert_eq!(furnace.terms, vec![(VarId::from(3), 1.0)]);
        assert_eq!(furnace.sense, Sense::Le);
        assert_eq!(furnace.rhs, 80.0);
    }

    #[test]
    fn test_demand_row_carries_slack() {
        let rows = rows(&TradeData::default(), ConstraintFamily::DemandSatisfaction);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].terms, vec![(VarId::from(3), 1.0), (VarId::from(5), 1.0)]);
        assert_eq!(rows[0].sense, Sense::Eq);
        assert_eq!(rows[0].rhs, 70.0);
    }

    #[test]
    fn test_substitutes_share_one_balance() {
        let rows = rows(&TradeData::default(), ConstraintFamily::BomBalance);
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_abs_diff_eq!(coefficient(row, 0), 1.0 / 1.5);
        assert_abs_diff_eq!(coefficient(row, 2), 0.8);
        assert_eq!(coefficient(row, 3), -1.0);
        // Flux is not a primary input
        assert_eq!(coefficient(row, 1), 0.0);
        assert_eq!(row.sense, Sense::Eq);
        assert_eq!(row.rhs, 0.0);
    }

    #[test]
    fn test_minimum_share_row() {
        let rows = rows(&TradeData::default(), ConstraintFamily::BomRatio);
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert!(row.name.ends_with("_min"));
        assert_abs_diff_eq!(coefficient(row, 0), 0.4, epsilon = 1e-12);
        assert_abs_diff_eq!(coefficient(row, 2), -0.6, epsilon = 1e-12);
        assert_eq!(row.sense, Sense::Ge);
    }

    #[test]
    fn test_dependent_row() {
        let rows = rows(&TradeData::default(), ConstraintFamily::DependentCommodity);
        assert_eq!(rows.len(), 1);
        assert_eq!(coefficient(&rows[0], 1), 1.0);
        assert_eq!(coefficient(&rows[0], 0), -0.1);
        assert_eq!(rows[0].sense, Sense::Eq);
    }

    #[test]
    fn test_soft_minimum_row() {
        let rows = rows(&TradeData::default(), ConstraintFamily::SoftMinimumCapacity);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].terms, vec![(VarId::from(3), 1.0), (VarId::from(4), 1.0)]);
        assert_eq!(rows[0].sense, Sense::Ge);
        assert_eq!(rows[0].rhs, 40.0);
    }

    #[test]
    fn test_quota_row() {
        let mut data = TradeData::default();
        data.tariff_quotas
            .insert(TradeKey::new("AUS", "DEU", "ore"), 30.0);
        let rows = rows(&data, ConstraintFamily::TradeQuota);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].terms, vec![(VarId::from(0), 1.0)]);
        assert_eq!(rows[0].sense, Sense::Le);
        assert_eq!(rows[0].rhs, 30.0);
    }

    #[test]
    fn test_every_family_is_counted() {
        let graph = graph();
        let model =
            TradeModel::build(&graph, &TradeData::default(), &TradeConfig::default()).unwrap();
        let counts = &model.diagnostics().constraints;
        assert_eq!(counts.len(), ConstraintFamily::ALL.len());
        assert_eq!(counts[&ConstraintFamily::SecondaryFeedstock], 0);
        assert_eq!(counts[&ConstraintFamily::AggregatedRatio], 0);
        assert_eq!(counts.values().sum::<usize>(), model.program().num_rows());
    }
}
