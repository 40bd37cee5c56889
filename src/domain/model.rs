//! Generic MILP problem description handed to a [`Solver`](crate::domain::solver::Solver).
//!
//! Nothing in here knows about doctors or days; the schedule builder fills it in.

use std::fmt::Write as _;

use crate::error::ScheduleError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Maximize,
    Minimize,
}

/// Relational operator of a constraint row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sense {
    GreaterEqual,
    Equal,
    LessEqual,
}

impl Sense {
    fn symbol(self) -> &'static str {
        match self {
            Sense::GreaterEqual => ">=",
            Sense::Equal => "=",
            Sense::LessEqual => "<=",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarType {
    Binary,
    Integer,
    Continuous,
}

/// (lower, upper)
pub type Bound = (f64, f64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shape {
    pub nrows: usize,
    pub ncols: usize,
}

/// Sparse matrix in coordinate format. Only nonzero entries are stored.
#[derive(Debug, Clone, PartialEq)]
pub struct SparseMatrix {
    pub rows: Vec<usize>,
    pub cols: Vec<usize>,
    pub vals: Vec<f64>,
    pub shape: Shape,
}

impl SparseMatrix {
    pub fn new(nrows: usize, ncols: usize) -> Self {
        SparseMatrix {
            rows: Vec::new(),
            cols: Vec::new(),
            vals: Vec::new(),
            shape: Shape { nrows, ncols },
        }
    }

    pub fn with_capacity(nrows: usize, ncols: usize, nnz: usize) -> Self {
        SparseMatrix {
            rows: Vec::with_capacity(nnz),
            cols: Vec::with_capacity(nnz),
            vals: Vec::with_capacity(nnz),
            shape: Shape { nrows, ncols },
        }
    }

    pub fn push(&mut self, row: usize, col: usize, val: f64) {
        if val != 0.0 {
            self.rows.push(row);
            self.cols.push(col);
            self.vals.push(val);
        }
    }

    pub fn nnz(&self) -> usize {
        self.vals.len()
    }

    pub fn entries(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.rows
            .iter()
            .zip(&self.cols)
            .zip(&self.vals)
            .map(|((&r, &c), &v)| (r, c, v))
    }

    /// Entries of each row, in the order they were pushed.
    pub fn row_entries(&self) -> Vec<Vec<(usize, f64)>> {
        let mut by_row = vec![Vec::new(); self.shape.nrows];
        for (r, c, v) in self.entries() {
            if let Some(row) = by_row.get_mut(r) {
                row.push((c, v));
            }
        }
        by_row
    }

    /// Entries of each column, in the order they were pushed.
    pub fn col_entries(&self) -> Vec<Vec<(usize, f64)>> {
        let mut by_col = vec![Vec::new(); self.shape.ncols];
        for (r, c, v) in self.entries() {
            if let Some(col) = by_col.get_mut(c) {
                col.push((r, v));
            }
        }
        by_col
    }
}

/// `direction  c'x  s.t.  A x (senses) b,  l <= x <= u,  x of the given types`
#[derive(Debug, Clone, PartialEq)]
pub struct MilpProblem {
    pub direction: Direction,
    pub matrix: SparseMatrix,
    pub senses: Vec<Sense>,
    pub rhs: Vec<f64>,
    pub objective: Vec<f64>,
    pub bounds: Vec<Bound>,
    pub types: Vec<VarType>,
    pub names: Vec<String>,
}

impl MilpProblem {
    pub fn num_variables(&self) -> usize {
        self.matrix.shape.ncols
    }

    pub fn num_constraints(&self) -> usize {
        self.matrix.shape.nrows
    }

    /// Checks that every vector agrees with the matrix shape and every entry is in range.
    pub fn check(&self) -> Result<(), ScheduleError> {
        let Shape { nrows, ncols } = self.matrix.shape;

        let row_lengths = [("senses", self.senses.len()), ("rhs", self.rhs.len())];
        for (what, len) in row_lengths {
            if len != nrows {
                return Err(ScheduleError::Model(format!(
                    "{} has {} entries, matrix has {} rows",
                    what, len, nrows
                )));
            }
        }

        let col_lengths = [
            ("objective", self.objective.len()),
            ("bounds", self.bounds.len()),
            ("types", self.types.len()),
            ("names", self.names.len()),
        ];
        for (what, len) in col_lengths {
            if len != ncols {
                return Err(ScheduleError::Model(format!(
                    "{} has {} entries, matrix has {} columns",
                    what, len, ncols
                )));
            }
        }

        if self.matrix.rows.len() != self.matrix.vals.len()
            || self.matrix.cols.len() != self.matrix.vals.len()
        {
            return Err(ScheduleError::Model(
                "matrix rows, cols and vals differ in length".to_string(),
            ));
        }

        if let Some((r, c, _)) = self.matrix.entries().find(|&(r, c, _)| r >= nrows || c >= ncols) {
            return Err(ScheduleError::Model(format!(
                "matrix entry ({}, {}) lies outside shape {}x{}",
                r, c, nrows, ncols
            )));
        }

        if let Some((i, (lo, hi))) = self.bounds.iter().enumerate().find(|(_, (lo, hi))| lo > hi) {
            return Err(ScheduleError::Model(format!(
                "variable {} has lower bound {} above upper bound {}",
                self.names[i], lo, hi
            )));
        }

        Ok(())
    }

    /// Objective value of `values` under this problem's objective.
    pub fn objective_value(&self, values: &[f64]) -> f64 {
        self.objective.iter().zip(values).map(|(c, x)| c * x).sum()
    }

    /// CPLEX LP-style dump, for debug logging.
    pub fn to_lp_string(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{}",
            match self.direction {
                Direction::Maximize => "Maximize",
                Direction::Minimize => "Minimize",
            }
        );
        let _ = writeln!(out, " obj: {}", linear_terms(self.objective.iter().copied().enumerate(), &self.names));

        let _ = writeln!(out, "Subject To");
        for (i, row) in self.matrix.row_entries().into_iter().enumerate() {
            let _ = writeln!(
                out,
                " c{}: {} {} {}",
                i + 1,
                linear_terms(row.into_iter(), &self.names),
                self.senses[i].symbol(),
                self.rhs[i]
            );
        }

        let _ = writeln!(out, "Bounds");
        for (name, (lo, hi)) in self.names.iter().zip(&self.bounds) {
            let _ = writeln!(out, " {} <= {} <= {}", lo, name, hi);
        }

        let binaries: Vec<&str> = self.names_of(VarType::Binary);
        if !binaries.is_empty() {
            let _ = writeln!(out, "Binaries\n {}", binaries.join(" "));
        }
        let generals: Vec<&str> = self.names_of(VarType::Integer);
        if !generals.is_empty() {
            let _ = writeln!(out, "Generals\n {}", generals.join(" "));
        }
        out.push_str("End\n");
        out
    }

    fn names_of(&self, kind: VarType) -> Vec<&str> {
        self.names
            .iter()
            .zip(&self.types)
            .filter(|(_, t)| **t == kind)
            .map(|(n, _)| n.as_str())
            .collect()
    }
}

fn linear_terms(terms: impl Iterator<Item = (usize, f64)>, names: &[String]) -> String {
    let mut out = String::new();
    for (col, coeff) in terms.filter(|(_, v)| *v != 0.0) {
        let name = names.get(col).map(String::as_str).unwrap_or("?");
        if out.is_empty() {
            if coeff < 0.0 {
                out.push_str("- ");
            }
        } else {
            out.push_str(if coeff < 0.0 { " - " } else { " + " });
        }
        if coeff.abs() != 1.0 {
            let _ = write!(out, "{} ", coeff.abs());
        }
        out.push_str(name);
    }
    if out.is_empty() {
        out.push('0');
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    Optimal,
    Feasible,
    Infeasible,
    Unbounded,
    TimeLimit,
    Failed,
    Undefined,
}

impl SolveStatus {
    /// Whether the solution vector can be trusted.
    pub fn has_solution(self) -> bool {
        matches!(self, SolveStatus::Optimal | SolveStatus::Feasible)
    }
}

/// What a solver hands back: one value per variable plus the objective value.
#[derive(Debug, Clone, PartialEq)]
pub struct MilpSolution {
    pub status: SolveStatus,
    pub values: Vec<f64>,
    pub objective: f64,
    pub message: Option<String>,
}

impl MilpSolution {
    /// Keeps the solution only when the status says it holds a usable point.
    pub fn into_usable(self) -> Result<MilpSolution, ScheduleError> {
        let detail = self.message.clone();
        let describe = |fallback: &str| detail.clone().unwrap_or_else(|| fallback.to_string());

        match self.status {
            SolveStatus::Optimal | SolveStatus::Feasible => Ok(self),
            SolveStatus::Infeasible => Err(ScheduleError::Infeasible(describe(
                "quotas cannot be met under the staffing and consecutive-day rules",
            ))),
            SolveStatus::Unbounded => Err(ScheduleError::Solver(describe("problem is unbounded"))),
            SolveStatus::TimeLimit => Err(ScheduleError::Solver(describe(
                "time limit reached before a solution was found",
            ))),
            SolveStatus::Failed => Err(ScheduleError::Solver(describe("solver failed"))),
            SolveStatus::Undefined => {
                Err(ScheduleError::Solver(describe("solver returned no usable status")))
            }
        }
    }
}
