use log::debug;

use crate::domain::model::{Direction, MilpProblem, MilpSolution, Sense, SolveStatus, VarType};
use crate::domain::solver::{Solver, SolverOptions};
use crate::error::ScheduleError;

use ::highs::{ColProblem, HighsModelStatus, Sense as HighsSense};

const RANDOM_SEED: i32 = 1234;

/// HiGHS solver implementation
pub struct HighsSolver {
    options: SolverOptions,
}

impl HighsSolver {
    pub fn new(options: SolverOptions) -> Self {
        HighsSolver { options }
    }

    /// Convert HiGHS status to our status
    fn convert_status(model_status: HighsModelStatus) -> SolveStatus {
        match model_status {
            HighsModelStatus::Optimal => SolveStatus::Optimal,
            HighsModelStatus::Infeasible => SolveStatus::Infeasible,
            // Every column is bounded, so the model can only be infeasible.
            HighsModelStatus::UnboundedOrInfeasible => SolveStatus::Infeasible,
            HighsModelStatus::Unbounded => SolveStatus::Unbounded,
            HighsModelStatus::ReachedTimeLimit => SolveStatus::TimeLimit,
            _ => SolveStatus::Undefined,
        }
    }
}

impl Solver for HighsSolver {
    fn solve(&self, problem: &MilpProblem) -> Result<MilpSolution, ScheduleError> {
        problem.check()?;

        let sense = match problem.direction {
            Direction::Maximize => HighsSense::Maximise,
            Direction::Minimize => HighsSense::Minimise,
        };

        let mut model = ColProblem::new();

        // First, add all constraint rows
        let mut rows = Vec::with_capacity(problem.num_constraints());
        for (&row_sense, &rhs) in problem.senses.iter().zip(&problem.rhs) {
            let row = match row_sense {
                Sense::LessEqual => model.add_row(..=rhs),
                Sense::GreaterEqual => model.add_row(rhs..),
                Sense::Equal => model.add_row(rhs..=rhs),
            };
            rows.push(row);
        }

        // Then each column with its coefficients
        for (col_idx, entries) in problem.matrix.col_entries().into_iter().enumerate() {
            let row_factors: Vec<_> = entries
                .into_iter()
                .map(|(row_idx, val)| (rows[row_idx], val))
                .collect();
            let (lower, upper) = problem.bounds[col_idx];
            let obj_coeff = problem.objective[col_idx];

            match problem.types[col_idx] {
                VarType::Binary | VarType::Integer => {
                    model.add_integer_column(obj_coeff, lower..=upper, &row_factors)
                }
                VarType::Continuous => model.add_column(obj_coeff, lower..=upper, &row_factors),
            }
        }

        let mut highs_model = model.optimise(sense);
        highs_model.set_option("threads", 1);
        highs_model.set_option("random_seed", RANDOM_SEED);
        highs_model.set_option("output_flag", false);
        if let Some(secs) = self.options.time_limit_secs {
            highs_model.set_option("time_limit", secs as f64);
        }

        let solved = highs_model.solve();
        let status = Self::convert_status(solved.status());
        debug!("HiGHS finished with status {:?}", status);

        let values: Vec<f64> = if status.has_solution() {
            solved.get_solution().columns().to_vec()
        } else {
            vec![0.0; problem.num_variables()]
        };

        Ok(MilpSolution {
            status,
            objective: problem.objective_value(&values),
            values,
            message: None,
        })
    }

    fn name(&self) -> &str {
        "HiGHS"
    }
}
