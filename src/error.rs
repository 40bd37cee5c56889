use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

/// Everything that can go wrong between receiving a request and returning a schedule.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScheduleError {
    #[error("Invalid date range: last day {last} precedes first day {first}")]
    InvalidRange { first: String, last: String },

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("No feasible schedule exists: {0}")]
    Infeasible(String),

    #[error("Malformed model: {0}")]
    Model(String),

    #[error("Solver error: {0}")]
    Solver(String),

    #[error("Solver did not finish within {0} seconds")]
    Timeout(u64),
}

impl ResponseError for ScheduleError {
    fn status_code(&self) -> StatusCode {
        match self {
            ScheduleError::InvalidRange { .. }
            | ScheduleError::InvalidDate(_)
            | ScheduleError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ScheduleError::Infeasible(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ScheduleError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            ScheduleError::Model(_) | ScheduleError::Solver(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .json(serde_json::json!({ "error": self.to_string() }))
    }
}
