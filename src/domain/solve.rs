use log::{debug, info, log_enabled, trace, Level};
use std::time::Instant;

use crate::domain::builder::{ScheduleInputs, ScheduleModel};
use crate::domain::solver::Solver;
use crate::domain::validate::validate_request;
use crate::error::ScheduleError;
use crate::models::{Schedule, ScheduleRequest};

/// Expand the horizon, build the model, solve it with `solver` and decode the roster.
pub fn solve_schedule(req: &ScheduleRequest, solver: &dyn Solver) -> Result<Schedule, ScheduleError> {
    let horizon = req.horizon()?;
    validate_request(req, horizon.num_days()?)?;
    let days = horizon.expand()?;

    let model = ScheduleModel::build(&ScheduleInputs {
        days: &days,
        doctors: &req.doctors,
        num_shifts: &req.num_shifts,
        daily_shifts: &req.daily_shifts,
        availability: &req.availability_matrix,
    });

    info!(
        "Solving schedule for {} doctors over {} days with {} ({} variables, {} constraints)",
        req.doctors.len(),
        days.len(),
        solver.name(),
        model.problem.num_variables(),
        model.problem.num_constraints(),
    );
    if log_enabled!(Level::Trace) {
        trace!("Model:\n{}", model.problem.to_lp_string());
    }

    let start = Instant::now();
    let solution = solver.solve(&model.problem)?.into_usable()?;
    info!(
        "{} found a schedule in {:.2?}, objective {}",
        solver.name(),
        start.elapsed(),
        solution.objective
    );

    if solution.values.len() != model.layout.len() {
        return Err(ScheduleError::Solver(format!(
            "solver returned {} values for {} variables",
            solution.values.len(),
            model.layout.len()
        )));
    }

    let schedule = model.decode(&days, &req.doctors, &solution.values);
    debug!(
        "Decoded {} assignments",
        schedule.values().map(Vec::len).sum::<usize>()
    );

    Ok(schedule)
}
