use crate::Map;
use crate::index::{ArcId, CenterId, RowId, VarId};
use std::fmt;
use tlp_core::models::ConstraintFamily;

/// The direction of a constraint row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sense {
    /// `lhs <= rhs`
    Le,
    /// `lhs >= rhs`
    Ge,
    /// `lhs == rhs`
    Eq,
}

impl fmt::Display for Sense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Le => "<=".fmt(f),
            Self::Ge => ">=".fmt(f),
            Self::Eq => "=".fmt(f),
        }
    }
}

/// What a decision variable stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableKind {
    /// Flow along a legal arc
    Allocation(ArcId),
    /// Unmet demand at a demand center
    DemandSlack(CenterId),
    /// Shortfall against a center's soft minimum capacity
    CapacitySlack(CenterId),
}

/// A non-negative decision variable
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    /// A readable, solver-safe name
    pub name: String,
    /// What the variable stands for
    pub kind: VariableKind,
    /// The objective coefficient
    pub cost: f64,
}

/// A linear constraint `Σ coefficient × variable  (sense)  rhs`
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// A readable, solver-safe name
    pub name: String,
    /// The family the row belongs to
    pub family: ConstraintFamily,
    /// The nonzero terms, each variable at most once
    pub terms: Vec<(VarId, f64)>,
    /// The direction
    pub sense: Sense,
    /// The right-hand side
    pub rhs: f64,
}

/// A minimization problem over non-negative variables, independent of any
/// particular backend.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinearProgram {
    variables: Vec<Variable>,
    rows: Vec<Row>,
}

impl LinearProgram {
    /// Declare a variable with zero cost
    pub fn add_variable(&mut self, name: impl Into<String>, kind: VariableKind) -> VarId {
        let id = VarId::from(self.variables.len());
        self.variables.push(Variable {
            name: sanitize(name.into()),
            kind,
            cost: 0.0,
        });
        id
    }

    /// Set a variable's objective coefficient
    pub fn set_cost(&mut self, var: VarId, cost: f64) {
        self.variables[var.index()].cost = cost;
    }

    /// Add a row. Repeated variables are merged and zero coefficients dropped,
    /// keeping the first-seen order of the remaining terms.
    pub fn add_row(
        &mut self,
        name: impl Into<String>,
        family: ConstraintFamily,
        terms: impl IntoIterator<Item = (VarId, f64)>,
        sense: Sense,
        rhs: f64,
    ) -> RowId {
        let mut merged = Map::<VarId, f64>::default();
        for (var, coefficient) in terms {
            *merged.entry(var).or_default() += coefficient;
        }
        merged.retain(|_, coefficient| *coefficient != 0.0);

        let id = RowId::from(self.rows.len());
        self.rows.push(Row {
            name: sanitize(name.into()),
            family,
            terms: merged.into_iter().collect(),
            sense,
            rhs,
        });
        id
    }

    /// The variables, indexed by [`VarId`]
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    /// The rows, indexed by [`RowId`]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// The rows of one family
    pub fn rows_in(&self, family: ConstraintFamily) -> impl Iterator<Item = &Row> {
        self.rows.iter().filter(move |row| row.family == family)
    }

    /// The number of variables
    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    /// The number of rows
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// The objective coefficients, indexed by [`VarId`]
    pub fn costs(&self) -> Vec<f64> {
        self.variables.iter().map(|var| var.cost).collect()
    }

    /// The objective value at `x`
    pub fn objective(&self, x: &[f64]) -> f64 {
        self.variables
            .iter()
            .zip(x)
            .map(|(var, value)| var.cost * value)
            .sum()
    }

    /// The left-hand side of a row at `x`
    pub fn evaluate(&self, row: RowId, x: &[f64]) -> f64 {
        self.rows[row.index()]
            .terms
            .iter()
            .map(|(var, coefficient)| coefficient * x[var.index()])
            .sum()
    }
}

/// A sparse matrix in compressed sparse column form, as both bundled backends expect
#[derive(Debug, Default)]
pub(crate) struct Csc {
    pub nrows: usize,
    pub ncols: usize,
    pub colptr: Vec<usize>,
    pub rowval: Vec<usize>,
    pub nzval: Vec<f64>,
}

impl Csc {
    /// Compress (row, column, value) triplets. Every (row, column) pair must appear once.
    pub fn from_triplets(
        nrows: usize,
        ncols: usize,
        mut triplets: Vec<(usize, usize, f64)>,
    ) -> Self {
        triplets.sort_unstable_by_key(|&(row, col, _)| (col, row));

        let mut colptr = Vec::with_capacity(ncols + 1);
        let mut rowval = Vec::with_capacity(triplets.len());
        let mut nzval = Vec::with_capacity(triplets.len());

        let mut entries = triplets.into_iter().peekable();
        for col in 0..ncols {
            colptr.push(rowval.len());
            while let Some((row, _, value)) = entries.next_if(|&(_, c, _)| c == col) {
                rowval.push(row);
                nzval.push(value);
            }
        }
        colptr.push(rowval.len());

        Self {
            nrows,
            ncols,
            colptr,
            rowval,
            nzval,
        }
    }

    /// An all-zero square matrix (the objective has no quadratic part)
    pub fn zeros(n: usize) -> Self {
        Self {
            nrows: n,
            ncols: n,
            colptr: vec![0; n + 1],
            rowval: Vec::new(),
            nzval: Vec::new(),
        }
    }
}

// Names end up in MPS and LP files, which do not tolerate whitespace or most punctuation
fn sanitize(name: String) -> String {
    if name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '[' | ']' | '-'))
    {
        return name;
    }
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '[' | ']' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}
