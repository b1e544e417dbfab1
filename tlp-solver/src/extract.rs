use crate::error::InvariantViolation;
use crate::model::{Layout, TradeModel};
use tlp_core::models::{Allocations, ProcessType};
use tracing::{Level, event};

/// Read an optimal solution back into [`Allocations`].
///
/// Flows below epsilon are numerical noise and dropped. Realized production is the
/// retained outflow of every shipping center. With capacity checking on, any
/// center shipping more than `capacity + ε` is reported as an invariant violation.
pub(crate) fn extract(
    model: &TradeModel<'_>,
    values: &[f64],
) -> Result<Allocations, InvariantViolation> {
    let epsilon = model.epsilon;
    let mut allocations = Allocations::default();

    for (center, node) in model.network.centers() {
        match node.kind {
            ProcessType::Supply | ProcessType::Production => {
                allocations
                    .production
                    .insert(node.center.name.clone(), 0.0);
            }
            ProcessType::Demand => {
                if let Some(slack) = model.layout.demand_slack.get(&center) {
                    let unmet = values[slack.index()];
                    if unmet >= epsilon {
                        allocations
                            .unmet_demand
                            .insert(node.center.name.clone(), unmet);
                    }
                }
            }
        }
    }

    for (id, arc) in model.arcs.iter() {
        let volume = values[Layout::flow(id).index()];
        if volume < epsilon {
            continue;
        }
        let key = model.arc_key(id);
        allocations.costs.insert(key.clone(), model.arc_costs[id.index()]);
        allocations.volumes.insert(key, volume);
        if let Some(production) = allocations
            .production
            .get_mut(&model.network.node(arc.from).center.name)
        {
            *production += volume;
        }
    }

    for (&center, slack) in model.layout.capacity_slack.iter() {
        let shortfall = values[slack.index()];
        if shortfall >= epsilon {
            allocations
                .capacity_shortfall
                .insert(model.network.node(center).center.name.clone(), shortfall);
        }
    }

    allocations.objective = model.program.objective(values);

    if model.check_capacity {
        for (_, node) in model.network.centers() {
            let Some(&production) = allocations.production.get(&node.center.name) else {
                continue;
            };
            let capacity = node.center.capacity;
            if production > capacity + epsilon {
                event!(
                    Level::ERROR,
                    center = %node.center.name,
                    production,
                    capacity,
                    "realized production exceeds capacity"
                );
                return Err(InvariantViolation::CapacityOverrun {
                    center: node.center.name.clone(),
                    production,
                    capacity,
                });
            }
        }
    }

    event!(
        Level::DEBUG,
        arcs = allocations.volumes.len(),
        volume = allocations.total_volume(),
        objective = allocations.objective,
        "extracted allocations"
    );

    Ok(allocations)
}
