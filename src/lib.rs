//! Doctor shift scheduling as a binary integer program.
//!
//! A request names a roster, a horizon (date range or month), per-day staffing
//! minimums, per-doctor quotas and an availability matrix. [`calendar`] expands
//! the horizon, [`domain::builder`] turns everything into a sparse MILP, a
//! [`domain::solver::Solver`] backend solves it and the builder decodes the
//! answer into a day → doctors map.

pub mod cache;
pub mod calendar;
pub mod config;
pub mod convert;
pub mod domain;
pub mod error;
pub mod models;
pub mod routes;
pub mod solve;

pub use domain::solve::solve_schedule;
pub use error::ScheduleError;
pub use models::{DoctorId, Schedule, ScheduleRequest, ScheduleResponse};
