use super::ignored;
use crate::backend::{Backend, BackendOutcome};
use crate::error::BackendError;
use crate::program::{Csc, LinearProgram, Sense};
use osqp::{CscMatrix, Problem, Settings, Status};
use std::time::Duration;
use tlp_core::models::{SolveStatus, SolverOptions};
use tracing::{Level, event};

const NAME: &str = "osqp";

/// A backend using the OSQP (Operator Splitting Quadratic Program) solver.
///
/// OSQP uses the Alternating Direction Method of Multipliers (ADMM) approach,
/// which can be faster than interior point methods for large-scale problems,
/// though sometimes with lower precision. Solution polishing is on and the
/// tolerances are tightened accordingly. ADMM can start from a supplied
/// primal point, so this backend honors warm starts.
///
/// Recognized options: `verbose`, `polish`, `max_iter`, `eps_abs`, `eps_rel`,
/// `rho`, `scaling` (iterations) and `time_limit` (seconds).
pub struct OsqpBackend(Settings);

impl Default for OsqpBackend {
    fn default() -> Self {
        Self(
            Settings::default()
                .verbose(false)
                .polish(true)
                .eps_abs(1e-7)
                .eps_rel(1e-7)
                .max_iter(100_000),
        )
    }
}

impl Backend for OsqpBackend {
    type Settings = Settings;

    fn new(settings: Self::Settings) -> Self {
        Self(settings)
    }

    fn from_options(options: &SolverOptions) -> Self {
        let mut settings = Self::default().0;
        for (key, value) in options.options.iter() {
            let current = settings.clone();
            let next = match key.as_str() {
                "verbose" => value.as_bool().map(|v| current.verbose(v)),
                "polish" => value.as_bool().map(|v| current.polish(v)),
                "max_iter" => value.as_u32().map(|v| current.max_iter(v)),
                "eps_abs" => value.as_f64().map(|v| current.eps_abs(v)),
                "eps_rel" => value.as_f64().map(|v| current.eps_rel(v)),
                "rho" => value.as_f64().map(|v| current.rho(v)),
                "scaling" => value.as_u32().map(|v| current.scaling(v)),
                "time_limit" => value
                    .as_f64()
                    .filter(|secs| secs.is_finite() && *secs >= 0.0)
                    .map(|secs| current.time_limit(Some(Duration::from_secs_f64(secs)))),
                _ => None,
            };
            match next {
                Some(next) => settings = next,
                None => ignored(NAME, key, value),
            }
        }
        // ADMM iterates deterministically; the seed only needs recording
        event!(Level::DEBUG, backend = NAME, seed = options.seed);
        Self(settings)
    }

    fn name(&self) -> &'static str {
        NAME
    }

    fn supports_warm_start(&self) -> bool {
        true
    }

    fn solve(
        &self,
        program: &LinearProgram,
        warm_start: Option<&[f64]>,
    ) -> Result<BackendOutcome, BackendError> {
        let n = program.num_variables();
        if n == 0 {
            return Ok(BackendOutcome {
                status: SolveStatus::Optimal,
                values: Vec::new(),
                warm_start_applied: false,
                iterations: None,
            });
        }

        // OSQP handles constraints via a box specification, e.g. lb <= Ax <= ub,
        // where equality is handled via setting lb[i] = ub[i].
        let mut triplets = Vec::new();
        let mut lb = Vec::with_capacity(program.num_rows() + n);
        let mut ub = Vec::with_capacity(program.num_rows() + n);

        for row in program.rows() {
            for &(var, coefficient) in row.terms.iter() {
                triplets.push((lb.len(), var.index(), coefficient));
            }
            let (lower, upper) = match row.sense {
                Sense::Le => (f64::NEG_INFINITY, row.rhs),
                Sense::Ge => (row.rhs, f64::INFINITY),
                Sense::Eq => (row.rhs, row.rhs),
            };
            lb.push(lower);
            ub.push(upper);
        }

        // Every variable is non-negative
        for var in 0..n {
            triplets.push((lb.len(), var, 1.0));
            lb.push(0.0);
            ub.push(f64::INFINITY);
        }

        let m = lb.len();
        let a = Csc::from_triplets(m, n, triplets);
        let a_matrix = CscMatrix {
            nrows: m,
            ncols: n,
            indptr: a.colptr.into(),
            indices: a.rowval.into(),
            data: a.nzval.into(),
        };

        // The objective is linear, so the quadratic term is empty
        let p = Csc::zeros(n);
        let p_matrix = CscMatrix {
            nrows: n,
            ncols: n,
            indptr: p.colptr.into(),
            indices: p.rowval.into(),
            data: p.nzval.into(),
        };
        let q = program.costs();

        let mut problem = Problem::new(&p_matrix, &q, &a_matrix, &lb, &ub, &self.0).map_err(
            |error| BackendError::Setup {
                backend: NAME,
                message: format!("{error:?}"),
            },
        )?;

        let warm_start_applied = match warm_start {
            Some(x0) if x0.len() == n => {
                problem.warm_start_x(x0);
                true
            }
            Some(x0) => {
                event!(
                    Level::WARN,
                    backend = NAME,
                    expected = n,
                    actual = x0.len(),
                    "warm start has the wrong dimension, ignoring it"
                );
                false
            }
            None => false,
        };

        let (status, values, iterations) = match problem.solve() {
            Status::Solved(solution) => (
                SolveStatus::Optimal,
                solution.x().to_vec(),
                Some(solution.iter()),
            ),
            Status::SolvedInaccurate(solution) => {
                event!(
                    Level::WARN,
                    backend = NAME,
                    "solution reached reduced accuracy only, accepting it"
                );
                (
                    SolveStatus::Optimal,
                    solution.x().to_vec(),
                    Some(solution.iter()),
                )
            }
            Status::PrimalInfeasible(_) | Status::PrimalInfeasibleInaccurate(_) => {
                (SolveStatus::Infeasible, Vec::new(), None)
            }
            Status::DualInfeasible(_) | Status::DualInfeasibleInaccurate(_) => {
                (SolveStatus::Unbounded, Vec::new(), None)
            }
            Status::MaxIterationsReached(_) => (
                SolveStatus::Other("max iterations reached".to_owned()),
                Vec::new(),
                None,
            ),
            Status::TimeLimitReached(_) => (
                SolveStatus::Other("time limit reached".to_owned()),
                Vec::new(),
                None,
            ),
            _ => (
                SolveStatus::Other("solver failure".to_owned()),
                Vec::new(),
                None,
            ),
        };

        Ok(BackendOutcome {
            status,
            values,
            warm_start_applied,
            iterations,
        })
    }
}
