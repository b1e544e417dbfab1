use super::{Context, flows};
use crate::error::ConfigurationError;
use crate::program::{LinearProgram, Sense};
use tlp_core::models::{ConstraintFamily, Diagnostics};

/// Σ outgoing flow + shortfall ≥ fraction × capacity, for every center the
/// layout gave a shortfall variable
pub(super) fn build(
    ctx: &Context<'_>,
    lp: &mut LinearProgram,
    _: &mut Diagnostics,
) -> Result<(), ConfigurationError> {
    for (&center, &slack) in ctx.layout.capacity_slack.iter() {
        let node = ctx.network.node(center);
        let Some(fraction) = node.center.soft_minimum_capacity else {
            continue;
        };
        lp.add_row(
            format!("minimum_{center}_{}", node.center.name),
            ConstraintFamily::SoftMinimumCapacity,
            flows(ctx.arcs.outgoing(center), 1.0).chain([(slack, 1.0)]),
            Sense::Ge,
            fraction * ctx.params.capacity[center.index()],
        );
    }
    Ok(())
}
