use super::{Context, share_rows};
use crate::error::ConfigurationError;
use crate::index::ArcId;
use crate::program::LinearProgram;
use tlp_core::models::{ConstraintFamily, Diagnostics, ParameterKind, ProcessType, SkipReason};

/// minimum ≤ inflow of an input / inflow of all inputs yielding the same outputs ≤ maximum
pub(super) fn build(
    ctx: &Context<'_>,
    lp: &mut LinearProgram,
    diagnostics: &mut Diagnostics,
) -> Result<(), ConfigurationError> {
    for (center, node) in ctx.network.centers() {
        match node.kind {
            ProcessType::Production => {}
            ProcessType::Supply | ProcessType::Demand => continue,
        }

        let recipe = ctx.network.recipe(center);
        for &input in recipe.inputs.keys() {
            let minimum = ctx.params.ratio(center, input, ParameterKind::MinimumRatio);
            let maximum = ctx.params.ratio(center, input, ParameterKind::MaximumRatio);
            if minimum.is_none() && maximum.is_none() {
                continue;
            }

            let commodity = ctx.network.commodity(input);
            let own = ctx.arcs.incoming(center, input);
            let total = recipe
                .substitutes(input)
                .into_iter()
                .flat_map(|other| ctx.arcs.incoming(center, other).iter().copied())
                .collect::<Vec<ArcId>>();

            if own.is_empty() || total.is_empty() {
                ctx.skip(
                    diagnostics,
                    ConstraintFamily::BomRatio,
                    Some(center),
                    commodity.name(),
                    SkipReason::NoComparableFlows,
                );
                continue;
            }

            share_rows(
                lp,
                ConstraintFamily::BomRatio,
                &format!("ratio_{center}_{}_{commodity}", node.center.name),
                own,
                &total,
                minimum,
                maximum,
            );
        }
    }
    Ok(())
}
