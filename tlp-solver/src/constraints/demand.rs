use super::{Context, flows};
use crate::error::ConfigurationError;
use crate::program::{LinearProgram, Sense};
use tlp_core::models::{ConstraintFamily, Diagnostics, ProcessType};

/// Σ inflow + demand slack == demand. Always added: the slack keeps it satisfiable
/// even for a demand center no arc reaches.
pub(super) fn build(
    ctx: &Context<'_>,
    lp: &mut LinearProgram,
    _: &mut Diagnostics,
) -> Result<(), ConfigurationError> {
    for (center, node) in ctx.network.centers() {
        match node.kind {
            ProcessType::Demand => {}
            ProcessType::Supply | ProcessType::Production => continue,
        }
        let Some(&slack) = ctx.layout.demand_slack.get(&center) else {
            continue;
        };
        let recipe = ctx.network.recipe(center);
        let inflow = recipe
            .inputs
            .keys()
            .flat_map(|&commodity| ctx.arcs.incoming(center, commodity));

        lp.add_row(
            format!("demand_{center}_{}", node.center.name),
            ConstraintFamily::DemandSatisfaction,
            flows(inflow, 1.0).chain([(slack, 1.0)]),
            Sense::Eq,
            ctx.params.capacity[center.index()],
        );
    }
    Ok(())
}
