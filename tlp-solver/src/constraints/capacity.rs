use super::{Context, flows};
use crate::error::ConfigurationError;
use crate::program::{LinearProgram, Sense};
use tlp_core::models::{ConstraintFamily, Diagnostics, ProcessType};

/// Σ outgoing flow ≤ capacity, for every center that ships anything
pub(super) fn build(
    ctx: &Context<'_>,
    lp: &mut LinearProgram,
    _: &mut Diagnostics,
) -> Result<(), ConfigurationError> {
    for (center, node) in ctx.network.centers() {
        match node.kind {
            ProcessType::Supply | ProcessType::Production => {}
            ProcessType::Demand => continue,
        }
        let outgoing = ctx.arcs.outgoing(center);
        if outgoing.is_empty() {
            continue;
        }
        lp.add_row(
            format!("capacity_{center}_{}", node.center.name),
            ConstraintFamily::ProductionCapacity,
            flows(outgoing, 1.0),
            Sense::Le,
            ctx.params.capacity[center.index()],
        );
    }
    Ok(())
}
