use super::{Context, share_rows};
use crate::error::ConfigurationError;
use crate::index::{ArcId, CommodityId};
use crate::program::LinearProgram;
use tlp_core::models::{ConstraintFamily, Diagnostics, ProcessType, SkipReason};
use tracing::{Level, event};

/// minimum ≤ inflow of a masked feedstock family / inflow yielding the same outputs ≤ maximum,
/// at every production center running the keyed technology
pub(super) fn build(
    ctx: &Context<'_>,
    lp: &mut LinearProgram,
    diagnostics: &mut Diagnostics,
) -> Result<(), ConfigurationError> {
    for (idx, (key, bounds)) in ctx.data.aggregated_ratios.iter().enumerate() {
        let subject = format!("{} [{}]", key.technology, key.mask);
        for value in [bounds.minimum, bounds.maximum].into_iter().flatten() {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigurationError::InvalidValue {
                    entity: format!("aggregated ratio {subject}"),
                    field: "share",
                    value,
                });
            }
        }

        let mut applied = false;
        for (center, node) in ctx.network.centers() {
            match node.kind {
                ProcessType::Production => {}
                ProcessType::Supply | ProcessType::Demand => continue,
            }
            if node.process.name != key.technology {
                continue;
            }
            applied = true;

            let recipe = ctx.network.recipe(center);
            let masked = recipe
                .inputs
                .keys()
                .copied()
                .filter(|&input| ctx.network.commodity(input).matches_mask(&key.mask))
                .collect::<Vec<CommodityId>>();

            let Some(&first) = masked.first() else {
                ctx.skip(
                    diagnostics,
                    ConstraintFamily::AggregatedRatio,
                    Some(center),
                    subject.clone(),
                    SkipReason::NoComparableFlows,
                );
                continue;
            };

            let outputs = &recipe.inputs[&first].outputs;
            if masked
                .iter()
                .any(|input| &recipe.inputs[input].outputs != outputs)
            {
                return Err(ConfigurationError::InconsistentAggregate {
                    technology: key.technology.clone(),
                    mask: key.mask.clone(),
                    center: node.center.name.clone(),
                });
            }

            let own = masked
                .iter()
                .flat_map(|&input| ctx.arcs.incoming(center, input).iter().copied())
                .collect::<Vec<ArcId>>();
            let total = recipe
                .substitutes(first)
                .into_iter()
                .flat_map(|input| ctx.arcs.incoming(center, input).iter().copied())
                .collect::<Vec<ArcId>>();

            if own.is_empty() || total.is_empty() {
                ctx.skip(
                    diagnostics,
                    ConstraintFamily::AggregatedRatio,
                    Some(center),
                    subject.clone(),
                    SkipReason::NoComparableFlows,
                );
                continue;
            }

            share_rows(
                lp,
                ConstraintFamily::AggregatedRatio,
                &format!("aggregate_{idx}_{center}_{}", node.center.name),
                &own,
                &total,
                bounds.minimum,
                bounds.maximum,
            );
        }

        if !applied {
            event!(Level::DEBUG, key = %subject, "aggregated ratio applies to no center");
            ctx.skip(
                diagnostics,
                ConstraintFamily::AggregatedRatio,
                None,
                subject,
                SkipReason::NoMatchingArcs,
            );
        }
    }
    Ok(())
}
