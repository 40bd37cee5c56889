use crate::domain::model::{MilpProblem, MilpSolution};
use crate::error::ScheduleError;

/// Common interface for MILP solver backends
pub trait Solver: Send + Sync {
    /// Solve a single mixed-integer linear program
    ///
    /// # Arguments
    /// * `problem` - Direction, sparse constraint matrix, senses, right-hand sides,
    ///   objective, bounds, variable types and names
    ///
    /// # Returns
    /// One value per variable plus the objective value, tagged with the solver's status.
    /// A status without a usable point (infeasible, unbounded, ...) is still `Ok`;
    /// `Err` is reserved for problems the backend cannot even accept or run.
    fn solve(&self, problem: &MilpProblem) -> Result<MilpSolution, ScheduleError>;

    /// Get the solver name for logging/debugging
    fn name(&self) -> &str;
}

/// Knobs shared by all backends. Backends ignore what they cannot honour.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SolverOptions {
    pub time_limit_secs: Option<u64>,
}
