use super::{Context, flows};
use crate::error::ConfigurationError;
use crate::index::VarId;
use crate::program::{LinearProgram, Sense};
use tlp_core::models::{ConstraintFamily, Diagnostics, ProcessType, SkipReason};
use tracing::{Level, event};

/// Inflow of a dependent commodity == Σ required quantity × inflow of each
/// primary input requiring it.
///
/// Without any supplier of the dependent commodity the row is skipped and the
/// recipe relaxes, unless the commodity is configured as mandatory.
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
        for &dependent in recipe.dependents.iter() {
            let commodity = ctx.network.commodity(dependent);

            let requirement = recipe
                .inputs
                .keys()
                .filter_map(|&input| {
                    ctx.params
                        .dependent_quantities
                        .get(&(center, input, dependent))
                        .map(|&quantity| (input, quantity))
                })
                .flat_map(|(input, quantity)| flows(ctx.arcs.incoming(center, input), -quantity))
                .collect::<Vec<(VarId, f64)>>();

            let supply = ctx.arcs.incoming(center, dependent);
            if supply.is_empty() {
                // Nothing flows either way
                if requirement.is_empty() {
                    continue;
                }
                if ctx.config.mandatory_dependents.contains(commodity) {
                    return Err(ConfigurationError::UnsuppliedDependent {
                        center: node.center.name.clone(),
                        commodity: commodity.clone(),
                    });
                }
                event!(
                    Level::WARN,
                    center = %node.center.name,
                    commodity = %commodity,
                    "no supplier of dependent commodity, recipe relaxed"
                );
                diagnostics.dependent_skipped += 1;
                ctx.skip(
                    diagnostics,
                    ConstraintFamily::DependentCommodity,
                    Some(center),
                    commodity.name(),
                    SkipReason::Unsupplied,
                );
                continue;
            }

            lp.add_row(
                format!("dependent_{center}_{}_{commodity}", node.center.name),
                ConstraintFamily::DependentCommodity,
                flows(supply, 1.0).chain(requirement),
                Sense::Eq,
                0.0,
            );
            diagnostics.dependent_enforced += 1;
        }
    }
    Ok(())
}
