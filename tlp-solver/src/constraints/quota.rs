use super::{Context, flows};
use crate::error::ConfigurationError;
use crate::program::{LinearProgram, Sense};
use tlp_core::models::{ConstraintFamily, Diagnostics, SkipReason};
use tracing::{Level, event};

/// Σ flow over the arcs matching a quota key ≤ quota
pub(super) fn build(
    ctx: &Context<'_>,
    lp: &mut LinearProgram,
    diagnostics: &mut Diagnostics,
) -> Result<(), ConfigurationError> {
    for &key in ctx.params.unmatchable_quotas.iter() {
        ctx.skip(
            diagnostics,
            ConstraintFamily::TradeQuota,
            None,
            key.to_string(),
            SkipReason::NoMatchingArcs,
        );
    }

    for (idx, bucket) in ctx.params.quotas.iter().enumerate() {
        if bucket.arcs.is_empty() {
            event!(Level::DEBUG, key = %bucket.key, "tariff quota matches no arc");
            ctx.skip(
                diagnostics,
                ConstraintFamily::TradeQuota,
                None,
                bucket.key.to_string(),
                SkipReason::NoMatchingArcs,
            );
            continue;
        }
        lp.add_row(
            format!("quota_{idx}_{}_{}_{}", bucket.key.from, bucket.key.to, bucket.key.commodity),
            ConstraintFamily::TradeQuota,
            flows(&bucket.arcs, 1.0),
            Sense::Le,
            bucket.limit,
        );
    }
    Ok(())
}
