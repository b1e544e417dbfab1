use crate::arcs::LegalArcs;
use crate::backend::Backend;
use crate::constraints::{self, Context};
use crate::error::{BackendError, ConfigurationError, InvariantViolation};
use crate::index::{ArcId, CenterId, VarId};
use crate::network::Network;
use crate::objective;
use crate::params::Parameters;
use crate::program::{LinearProgram, VariableKind};
use crate::{Map, extract};
use tlp_core::models::{
    Allocations, ArcKey, Diagnostics, DomainGraph, ProcessType, Settlement, SolveStatus,
    TradeConfig, TradeData, WarmStart, WarmStartReport,
};
use tracing::{Level, event};

/// Where each kind of variable lives in the program. Allocation variables are
/// declared first, one per legal arc, so an arc's variable shares its index.
#[derive(Debug, Default)]
pub(crate) struct Layout {
    pub demand_slack: Map<CenterId, VarId>,
    pub capacity_slack: Map<CenterId, VarId>,
}

impl Layout {
    /// The flow variable of an arc
    pub fn flow(arc: ArcId) -> VarId {
        VarId::from(arc.index())
    }

    fn declare(lp: &mut LinearProgram, network: &Network<'_>, arcs: &LegalArcs) -> Self {
        for (id, arc) in arcs.iter() {
            lp.add_variable(
                format!(
                    "{id}_{}_{}_{}",
                    network.node(arc.from).center.name,
                    network.node(arc.to).center.name,
                    network.commodity(arc.commodity)
                ),
                VariableKind::Allocation(id),
            );
        }

        let mut layout = Self::default();
        for (center, node) in network.centers() {
            match node.kind {
                ProcessType::Demand => {
                    let slack = lp.add_variable(
                        format!("unmet_{center}_{}", node.center.name),
                        VariableKind::DemandSlack(center),
                    );
                    layout.demand_slack.insert(center, slack);
                }
                ProcessType::Supply | ProcessType::Production => {
                    // A soft minimum on a center that cannot ship is pure noise
                    if node.center.soft_minimum_capacity.is_some()
                        && !arcs.outgoing(center).is_empty()
                    {
                        let slack = lp.add_variable(
                            format!("shortfall_{center}_{}", node.center.name),
                            VariableKind::CapacitySlack(center),
                        );
                        layout.capacity_slack.insert(center, slack);
                    }
                }
            }
        }
        layout
    }
}

/// A fully assembled, not yet solved model of one period.
///
/// Built fresh for every period; solving consumes it.
#[derive(Debug)]
pub struct TradeModel<'g> {
    pub(crate) network: Network<'g>,
    pub(crate) arcs: LegalArcs,
    pub(crate) layout: Layout,
    pub(crate) arc_costs: Vec<f64>,
    pub(crate) program: LinearProgram,
    pub(crate) diagnostics: Diagnostics,
    pub(crate) epsilon: f64,
    pub(crate) check_capacity: bool,
}

impl<'g> TradeModel<'g> {
    /// Build the model: resolve the graph, enumerate legal arcs, assemble the
    /// parameter tables, declare the variables, generate the nine constraint
    /// families and price the objective.
    ///
    /// Fails fast, before any solve, if the data or configuration is inconsistent.
    pub fn build(
        graph: &'g DomainGraph,
        data: &TradeData,
        config: &TradeConfig,
    ) -> Result<Self, ConfigurationError> {
        validate(config)?;

        let network = Network::resolve(graph)?;
        let arcs = LegalArcs::enumerate(&network);
        let params = Parameters::assemble(&network, &arcs, data)?;

        let mut program = LinearProgram::default();
        let layout = Layout::declare(&mut program, &network, &arcs);

        let mut diagnostics = Diagnostics {
            allocation_variables: arcs.len(),
            demand_slack_variables: layout.demand_slack.len(),
            capacity_slack_variables: layout.capacity_slack.len(),
            routes_without_transport_cost: params.routes_without_transport_cost,
            ..Default::default()
        };

        let ctx = Context {
            network: &network,
            arcs: &arcs,
            params: &params,
            data,
            config,
            layout: &layout,
        };
        constraints::generate(&ctx, &mut program, &mut diagnostics)?;
        diagnostics.demand_slack_cost = objective::assemble(&mut program, &layout, &params, config);

        for (family, count) in diagnostics.constraints.iter() {
            event!(Level::DEBUG, family = %family, rows = count);
        }
        event!(
            Level::INFO,
            arcs = arcs.len(),
            variables = diagnostics.variables(),
            constraints = diagnostics.total_constraints(),
            dependent_enforced = diagnostics.dependent_enforced,
            dependent_skipped = diagnostics.dependent_skipped,
            skipped = diagnostics.skipped.len(),
            "built trade model"
        );

        Ok(Self {
            network,
            arcs,
            layout,
            arc_costs: params.arc_costs,
            program,
            diagnostics,
            epsilon: config.epsilon,
            check_capacity: config.check_capacity,
        })
    }

    /// The assembled linear program
    pub fn program(&self) -> &LinearProgram {
        &self.program
    }

    /// Build diagnostics: variable counts, rows per family, skipped constraints
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// The name-based key of an arc
    pub fn arc_key(&self, arc: ArcId) -> ArcKey {
        let arc = self.arcs.get(arc);
        ArcKey::new(
            self.network.node(arc.from).center.name.as_str(),
            self.network.node(arc.to).center.name.as_str(),
            self.network.commodity(arc.commodity).clone(),
        )
    }

    /// A starting point seeded from a prior period's flows, and how many of the
    /// seeded arcs exist in this model. Everything unseeded starts at zero.
    pub fn starting_point(&self, warm_start: &WarmStart) -> (Vec<f64>, usize) {
        let mut x0 = vec![0.0; self.program.num_variables()];
        let mut matched = 0;
        for (id, _) in self.arcs.iter() {
            if let Some(value) = warm_start.get(&self.arc_key(id)) {
                x0[Layout::flow(id).index()] = value;
                matched += 1;
            }
        }
        (x0, matched)
    }

    /// Hand the model to a backend. Only an optimal outcome can be extracted.
    pub fn solve<B: Backend>(
        self,
        backend: &B,
        warm_start: Option<&WarmStart>,
    ) -> Result<SolveOutcome<'g>, BackendError> {
        let mut report = WarmStartReport::NotRequested;
        let mut start = None;
        if let Some(warm_start) = warm_start {
            if backend.supports_warm_start() {
                let (x0, matched) = self.starting_point(warm_start);
                report = WarmStartReport::Applied {
                    matched,
                    supplied: warm_start.len(),
                };
                start = Some(x0);
            } else {
                event!(
                    Level::WARN,
                    backend = backend.name(),
                    supplied = warm_start.len(),
                    "backend cannot warm start, solving cold"
                );
                report = WarmStartReport::Unsupported {
                    backend: backend.name().to_owned(),
                };
            }
        }

        let outcome = backend.solve(&self.program, start.as_deref())?;
        if start.is_some() && !outcome.warm_start_applied {
            event!(
                Level::WARN,
                backend = backend.name(),
                "backend declined the warm start"
            );
            report = WarmStartReport::Unsupported {
                backend: backend.name().to_owned(),
            };
        }

        match outcome.status {
            SolveStatus::Optimal => {
                if outcome.values.len() != self.program.num_variables() {
                    return Err(BackendError::Dimension {
                        backend: backend.name(),
                        expected: self.program.num_variables(),
                        actual: outcome.values.len(),
                    });
                }
                event!(
                    Level::DEBUG,
                    backend = backend.name(),
                    iterations = outcome.iterations,
                    "solved trade model"
                );
                Ok(SolveOutcome::Optimal(SolvedModel {
                    model: self,
                    values: outcome.values,
                    warm_start: report,
                    iterations: outcome.iterations,
                }))
            }
            status @ (SolveStatus::Infeasible | SolveStatus::Unbounded | SolveStatus::Other(_)) => {
                let diagnostics = self.diagnostics;
                event!(
                    Level::WARN,
                    backend = backend.name(),
                    status = %status,
                    variables = diagnostics.variables(),
                    constraints = diagnostics.total_constraints(),
                    dependent_enforced = diagnostics.dependent_enforced,
                    dependent_skipped = diagnostics.dependent_skipped,
                    "trade could not be settled"
                );
                Ok(SolveOutcome::Unsettled {
                    status,
                    diagnostics,
                    warm_start: report,
                })
            }
        }
    }
}

/// The result of handing a model to a backend.
#[derive(Debug)]
pub enum SolveOutcome<'g> {
    /// A solution was found and loaded; extraction may proceed
    Optimal(SolvedModel<'g>),
    /// No solution is loaded. There is nothing to extract.
    Unsettled {
        /// Why the period could not be settled
        status: SolveStatus,
        /// The build diagnostics, to help locate the cause
        diagnostics: Diagnostics,
        /// What became of the warm start
        warm_start: WarmStartReport,
    },
}

impl SolveOutcome<'_> {
    /// The backend's verdict
    pub fn status(&self) -> SolveStatus {
        match self {
            Self::Optimal(_) => SolveStatus::Optimal,
            Self::Unsettled { status, .. } => status.clone(),
        }
    }

    /// Convert into the caller-facing settlement, extracting allocations when optimal
    pub fn into_settlement(self) -> Result<Settlement, InvariantViolation> {
        match self {
            Self::Optimal(solved) => solved.into_settlement(),
            Self::Unsettled {
                status,
                diagnostics,
                warm_start,
            } => Ok(Settlement {
                status,
                allocations: None,
                diagnostics,
                warm_start,
            }),
        }
    }
}

/// A model whose optimal solution is loaded.
#[derive(Debug)]
pub struct SolvedModel<'g> {
    model: TradeModel<'g>,
    values: Vec<f64>,
    warm_start: WarmStartReport,
    iterations: Option<u32>,
}

impl<'g> SolvedModel<'g> {
    /// The solved value of every variable
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// The optimal objective value, including slack penalties
    pub fn objective(&self) -> f64 {
        self.model.program.objective(&self.values)
    }

    /// The underlying model
    pub fn model(&self) -> &TradeModel<'g> {
        &self.model
    }

    /// What became of the warm start
    pub fn warm_start_report(&self) -> &WarmStartReport {
        &self.warm_start
    }

    /// Iterations taken, if the backend reports them
    pub fn iterations(&self) -> Option<u32> {
        self.iterations
    }

    /// Read the solved flows back into allocations, checking capacity if configured
    pub fn extract(&self) -> Result<Allocations, InvariantViolation> {
        extract::extract(&self.model, &self.values)
    }

    /// Extract, and bundle with the diagnostics and warm-start report
    pub fn into_settlement(self) -> Result<Settlement, InvariantViolation> {
        let allocations = self.extract()?;
        Ok(Settlement {
            status: SolveStatus::Optimal,
            allocations: Some(allocations),
            diagnostics: self.model.diagnostics,
            warm_start: self.warm_start,
        })
    }
}

fn validate(config: &TradeConfig) -> Result<(), ConfigurationError> {
    let checks = [
        ("epsilon", config.epsilon, config.epsilon > 0.0),
        ("demand_slack_cost", config.demand_slack_cost, config.demand_slack_cost >= 0.0),
        (
            "soft_minimum_capacity_slack_cost",
            config.soft_minimum_capacity_slack_cost,
            config.soft_minimum_capacity_slack_cost >= 0.0,
        ),
    ];
    for (field, value, admissible) in checks {
        if !value.is_finite() || !admissible {
            return Err(ConfigurationError::InvalidConfig { field, value });
        }
    }
    Ok(())
}
