use super::{Context, flows};
use crate::error::ConfigurationError;
use crate::index::ArcId;
use crate::program::{LinearProgram, Sense};
use tlp_core::models::{ConstraintFamily, Diagnostics, ParameterKind, ProcessType, SkipReason};
use tracing::{Level, event};

/// Σ (inflow of input / input ratio) == Σ outflow of the outputs those inputs yield.
///
/// Inputs are grouped by output set, so substitutable inputs jointly cover one
/// balance. Only inputs with a positive input ratio take part. A group in which
/// no input has one is not balanced at all and is recorded as skipped.
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
        for (group, (outputs, inputs)) in recipe.groups().into_iter().enumerate() {
            let ratios = inputs
                .iter()
                .map(|&input| {
                    let ratio = ctx
                        .params
                        .ratio(center, input, ParameterKind::InputRatio)
                        .filter(|&ratio| ratio > 0.0);
                    (input, ratio)
                })
                .collect::<Vec<_>>();

            if ratios.iter().all(|(_, ratio)| ratio.is_none()) {
                let subject = outputs
                    .iter()
                    .map(|&output| ctx.network.commodity(output).name())
                    .collect::<Vec<_>>()
                    .join(", ");
                event!(
                    Level::WARN,
                    center = %node.center.name,
                    outputs = %subject,
                    "no input ratio for outputs, balance skipped"
                );
                ctx.skip(
                    diagnostics,
                    ConstraintFamily::BomBalance,
                    Some(center),
                    subject,
                    SkipReason::NoInputRatio,
                );
                continue;
            }

            let mut terms = Vec::new();
            for (input, ratio) in ratios {
                let Some(ratio) = ratio else {
                    event!(
                        Level::WARN,
                        center = %node.center.name,
                        commodity = %ctx.network.commodity(input),
                        "input has no input ratio, left out of the balance"
                    );
                    continue;
                };
                terms.extend(flows(ctx.arcs.incoming(center, input), 1.0 / ratio));
            }

            let outflow = ctx
                .arcs
                .outgoing_of(center, outputs)
                .collect::<Vec<ArcId>>();
            terms.extend(flows(&outflow, -1.0));

            if terms.is_empty() {
                continue;
            }
            lp.add_row(
                format!("bom_{center}_{}_{group}", node.center.name),
                ConstraintFamily::BomBalance,
                terms,
                Sense::Eq,
                0.0,
            );
        }
    }
    Ok(())
}
