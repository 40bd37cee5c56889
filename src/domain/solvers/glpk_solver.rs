use log::{debug, warn};

use crate::convert::{from_glpk_solution, solution_status, to_glpk_objective, to_glpk_polyhedron};
use crate::domain::model::{Direction, MilpProblem, MilpSolution, SolveStatus};
use crate::domain::solver::Solver;
use crate::error::ScheduleError;

use glpk_rust::{solve_ilps as glpk_solve_ilps, Solution};

const NO_TERMINAL_OUTPUT: bool = false;

/// GLPK solver implementation
pub struct GlpkSolver;

impl GlpkSolver {
    pub fn new() -> Self {
        GlpkSolver
    }
}

impl Default for GlpkSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl Solver for GlpkSolver {
    fn solve(&self, problem: &MilpProblem) -> Result<MilpSolution, ScheduleError> {
        problem.check()?;

        let mut polyhedron = to_glpk_polyhedron(problem)?;
        let objective = to_glpk_objective(problem);
        let maximize = problem.direction == Direction::Maximize;

        debug!(
            "GLPK: {} variables, {} LE rows after flattening senses",
            polyhedron.variables.len(),
            polyhedron.b.len()
        );

        let lib_solutions: Vec<Solution> =
            glpk_solve_ilps(&mut polyhedron, vec![objective], maximize, NO_TERMINAL_OUTPUT);

        let Some(solution) = lib_solutions.into_iter().next() else {
            return Err(ScheduleError::Solver("GLPK returned no solution".to_string()));
        };

        let values = from_glpk_solution(problem, &solution);
        let status: SolveStatus = solution_status(&solution);
        if let Some(error) = &solution.error {
            warn!("GLPK reported: {}", error);
        }

        Ok(MilpSolution {
            status,
            objective: problem.objective_value(&values),
            values,
            // An infeasible run gets the domain explanation, not GLPK's return code.
            message: solution.error.filter(|_| status != SolveStatus::Infeasible),
        })
    }

    fn name(&self) -> &str {
        "GLPK"
    }
}
