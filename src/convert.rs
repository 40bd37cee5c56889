use std::collections::HashMap;

use glpk_rust::{
    Bound, IntegerSparseMatrix as GlpkMatrix, Solution, SparseLEIntegerPolyhedron as GlpkPoly,
    Status as GlpkStatus, Variable as GlpkVar,
};

use crate::domain::model::{MilpProblem, Sense, SolveStatus, VarType};
use crate::error::ScheduleError;

/// Convert a general MILP to a GLPK LE polyhedron (A' x <= b').
///
/// `>=` rows are negated, `=` rows become a `<=` row plus its negation.
/// GLPK works on integer data only, so every coefficient, rhs and bound must be integral.
pub fn to_glpk_polyhedron(problem: &MilpProblem) -> Result<GlpkPoly<'_>, ScheduleError> {
    let mut rows = Vec::with_capacity(problem.matrix.nnz());
    let mut cols = Vec::with_capacity(problem.matrix.nnz());
    let mut vals = Vec::with_capacity(problem.matrix.nnz());
    let mut b: Vec<Bound> = Vec::with_capacity(problem.num_constraints());

    for (i, entries) in problem.matrix.row_entries().into_iter().enumerate() {
        let rhs = to_glpk_int(problem.rhs[i], || format!("rhs of row {}", i))?;

        let signs: &[i32] = match problem.senses[i] {
            Sense::LessEqual => &[1],
            Sense::GreaterEqual => &[-1],
            Sense::Equal => &[1, -1],
        };

        for &sign in signs {
            let row = b.len() as i32;
            for &(col, val) in &entries {
                let val = to_glpk_int(val, || format!("coefficient ({}, {})", i, col))?;
                rows.push(row);
                cols.push(col as i32);
                vals.push(sign * val);
            }
            b.push((0, sign * rhs));
        }
    }

    let variables = problem
        .names
        .iter()
        .zip(&problem.bounds)
        .zip(&problem.types)
        .map(|((name, &(lo, hi)), kind)| {
            if *kind == VarType::Continuous {
                return Err(ScheduleError::Solver(format!(
                    "GLPK backend only handles integer variables, {} is continuous",
                    name
                )));
            }
            Ok(GlpkVar {
                id: name.as_str(),
                bound: (
                    to_glpk_int(lo, || format!("lower bound of {}", name))?,
                    to_glpk_int(hi, || format!("upper bound of {}", name))?,
                ),
            })
        })
        .collect::<Result<Vec<GlpkVar<'_>>, ScheduleError>>()?;

    Ok(GlpkPoly {
        a: GlpkMatrix { rows, cols, vals },
        b,
        variables,
        double_bound: false,
    })
}

/// Objective keyed by variable name, zero coefficients left out.
pub fn to_glpk_objective(problem: &MilpProblem) -> HashMap<&str, f64> {
    problem
        .names
        .iter()
        .zip(&problem.objective)
        .filter(|(_, c)| **c != 0.0)
        .map(|(name, c)| (name.as_str(), *c))
        .collect()
}

/// Reorder a GLPK solution (keyed by name) into one value per variable.
pub fn from_glpk_solution(problem: &MilpProblem, solution: &Solution) -> Vec<f64> {
    problem
        .names
        .iter()
        .map(|name| {
            solution
                .solution
                .get(name.as_str())
                .map(|v| *v as f64)
                .unwrap_or(0.0)
        })
        .collect()
}

fn to_glpk_int(value: f64, what: impl FnOnce() -> String) -> Result<i32, ScheduleError> {
    if value.fract() != 0.0 || value < i32::MIN as f64 || value > i32::MAX as f64 {
        return Err(ScheduleError::Solver(format!(
            "GLPK backend needs integral data, {} is {}",
            what(),
            value
        )));
    }
    Ok(value as i32)
}

// glp_intopt return codes: no primal / no dual feasible solution.
const GLP_ENOPFS: i32 = 10;
const GLP_ENODFS: i32 = 11;

/// Status of a GLPK run, including the return code glpk-rust folds into `MIPFailed`.
///
/// With presolve on, `glp_intopt` reports an infeasible LP relaxation as a
/// failure (`GLP_ENOPFS`) rather than through the MIP status.
pub fn solution_status(solution: &Solution) -> SolveStatus {
    glpk_status(&solution.status, solution.error.as_deref())
}

fn glpk_status(status: &GlpkStatus, error: Option<&str>) -> SolveStatus {
    match status {
        GlpkStatus::Optimal => SolveStatus::Optimal,
        GlpkStatus::Feasible => SolveStatus::Feasible,
        GlpkStatus::Infeasible | GlpkStatus::NoFeasible | GlpkStatus::EmptySpace => {
            SolveStatus::Infeasible
        }
        GlpkStatus::Unbounded => SolveStatus::Unbounded,
        GlpkStatus::MIPFailed => match error.and_then(glpk_return_code) {
            Some(GLP_ENOPFS) => SolveStatus::Infeasible,
            Some(GLP_ENODFS) => SolveStatus::Unbounded,
            _ => SolveStatus::Failed,
        },
        GlpkStatus::SimplexFailed => SolveStatus::Failed,
        GlpkStatus::Undefined => SolveStatus::Undefined,
    }
}

/// Trailing code of messages like "GLPK MIP solver failed with code: 10".
fn glpk_return_code(message: &str) -> Option<i32> {
    message.rsplit(':').next()?.trim().parse().ok()
}

impl From<GlpkStatus> for SolveStatus {
    fn from(s: GlpkStatus) -> Self {
        glpk_status(&s, None)
    }
}
