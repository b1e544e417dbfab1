use super::{ignored, set};
use crate::backend::{Backend, BackendOutcome};
use crate::error::BackendError;
use crate::program::{Csc, LinearProgram, Row, Sense};
use clarabel::{algebra::*, solver::*};
use tlp_core::models::{SolveStatus, SolverOptions};
use tracing::{Level, event};

const NAME: &str = "clarabel";

/// A backend using the Clarabel interior point solver.
///
/// Recognized options: `verbose`, `max_iter`, `time_limit` (seconds),
/// `tol_gap_abs`, `tol_gap_rel`, `tol_feas`, `presolve`, `scaling`
/// (equilibration) and `algorithm` (the direct solve method).
/// Interior point methods cannot start from a supplied primal point.
pub struct ClarabelBackend(DefaultSettings<f64>);

impl Default for ClarabelBackend {
    fn default() -> Self {
        let mut settings = DefaultSettings::default();
        settings.verbose = false;
        Self(settings)
    }
}

impl Backend for ClarabelBackend {
    type Settings = DefaultSettings<f64>;

    fn new(settings: Self::Settings) -> Self {
        Self(settings)
    }

    fn from_options(options: &SolverOptions) -> Self {
        let mut settings = Self::default().0;
        for (key, value) in options.options.iter() {
            let applied = match key.as_str() {
                "verbose" => set(&mut settings.verbose, value.as_bool()),
                "max_iter" => set(&mut settings.max_iter, value.as_u32()),
                "time_limit" => set(&mut settings.time_limit, value.as_f64()),
                "tol_gap_abs" => set(&mut settings.tol_gap_abs, value.as_f64()),
                "tol_gap_rel" => set(&mut settings.tol_gap_rel, value.as_f64()),
                "tol_feas" => set(&mut settings.tol_feas, value.as_f64()),
                "presolve" => set(&mut settings.presolve_enable, value.as_bool()),
                "scaling" => set(&mut settings.equilibrate_enable, value.as_bool()),
                "algorithm" => set(
                    &mut settings.direct_solve_method,
                    value.as_str().map(str::to_owned),
                ),
                _ => false,
            };
            if !applied {
                ignored(NAME, key, value);
            }
        }
        // The interior point path is deterministic; the seed only needs recording
        event!(Level::DEBUG, backend = NAME, seed = options.seed);
        Self(settings)
    }

    fn name(&self) -> &'static str {
        NAME
    }

    fn supports_warm_start(&self) -> bool {
        false
    }

    fn solve(
        &self,
        program: &LinearProgram,
        _warm_start: Option<&[f64]>,
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

        // Clarabel handles constraints via a cone specification, e.g. Ax + s = b, where s is
        // in a cone. Equalities go first, in the zero cone; everything else is s >= 0.
        let (equalities, inequalities): (Vec<&Row>, Vec<&Row>) = program
            .rows()
            .iter()
            .partition(|row| row.sense == Sense::Eq);

        let mut triplets = Vec::new();
        let mut b = Vec::with_capacity(program.num_rows() + n);

        for row in equalities {
            for &(var, coefficient) in row.terms.iter() {
                triplets.push((b.len(), var.index(), coefficient));
            }
            b.push(row.rhs);
        }
        let nzero = b.len();

        // The signs on >= rows are flipped because we have to use s >= 0
        for row in inequalities {
            let sign = match row.sense {
                Sense::Le => 1.0,
                Sense::Ge => -1.0,
                Sense::Eq => continue,
            };
            for &(var, coefficient) in row.terms.iter() {
                triplets.push((b.len(), var.index(), sign * coefficient));
            }
            b.push(sign * row.rhs);
        }

        // Every variable is non-negative: -x + s = 0
        for var in 0..n {
            triplets.push((b.len(), var, -1.0));
            b.push(0.0);
        }

        let mut cones = Vec::with_capacity(2);
        if nzero > 0 {
            cones.push(ZeroConeT(nzero));
        }
        cones.push(NonnegativeConeT(b.len() - nzero));

        let a = Csc::from_triplets(b.len(), n, triplets);
        let a_matrix = CscMatrix::new(a.nrows, a.ncols, a.colptr, a.rowval, a.nzval);
        let p = Csc::zeros(n);
        let p_matrix = CscMatrix::new(p.nrows, p.ncols, p.colptr, p.rowval, p.nzval);
        let q = program.costs();

        let mut solver = DefaultSolver::new(&p_matrix, &q, &a_matrix, &b, &cones, self.0.clone())
            .map_err(|error| BackendError::Setup {
                backend: NAME,
                message: format!("{error:?}"),
            })?;
        solver.solve();

        let solution = &solver.solution;
        let status = match &solution.status {
            SolverStatus::Solved => SolveStatus::Optimal,
            SolverStatus::AlmostSolved => {
                event!(
                    Level::WARN,
                    backend = NAME,
                    "solution reached reduced accuracy only, accepting it"
                );
                SolveStatus::Optimal
            }
            SolverStatus::PrimalInfeasible | SolverStatus::AlmostPrimalInfeasible => {
                SolveStatus::Infeasible
            }
            SolverStatus::DualInfeasible | SolverStatus::AlmostDualInfeasible => {
                SolveStatus::Unbounded
            }
            other => SolveStatus::Other(format!("{other:?}")),
        };

        Ok(BackendOutcome {
            status,
            values: solution.x.clone(),
            warm_start_applied: false,
            iterations: Some(solution.iterations),
        })
    }
}
