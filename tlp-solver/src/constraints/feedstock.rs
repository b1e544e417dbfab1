use super::{Context, flows};
use crate::error::ConfigurationError;
use crate::index::ArcId;
use crate::program::{LinearProgram, Sense};
use tlp_core::models::{ConstraintFamily, Diagnostics, SkipReason};

/// Σ inflow of a commodity into the centers of a region set ≤ cap
pub(super) fn build(
    ctx: &Context<'_>,
    lp: &mut LinearProgram,
    diagnostics: &mut Diagnostics,
) -> Result<(), ConfigurationError> {
    for (idx, (key, &cap)) in ctx.data.secondary_feedstock_caps.iter().enumerate() {
        let subject = format!("{} in [{}]", key.commodity, key.regions.join(", "));
        if !cap.is_finite() || cap < 0.0 {
            return Err(ConfigurationError::InvalidValue {
                entity: format!("secondary feedstock cap on {subject}"),
                field: "cap",
                value: cap,
            });
        }

        let arcs = ctx
            .network
            .commodity_id(&key.commodity)
            .map(|commodity| {
                ctx.network
                    .centers()
                    .filter(|(_, node)| node.center.location.within(&key.regions))
                    .flat_map(|(center, _)| ctx.arcs.incoming(center, commodity).iter().copied())
                    .collect::<Vec<ArcId>>()
            })
            .unwrap_or_default();

        if arcs.is_empty() {
            ctx.skip(
                diagnostics,
                ConstraintFamily::SecondaryFeedstock,
                None,
                subject,
                SkipReason::NoMatchingArcs,
            );
            continue;
        }

        lp.add_row(
            format!("feedstock_{idx}_{}", key.commodity),
            ConstraintFamily::SecondaryFeedstock,
            flows(&arcs, 1.0),
            Sense::Le,
            cap,
        );
    }
    Ok(())
}
