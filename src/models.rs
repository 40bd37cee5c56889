use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::calendar::Horizon;
use crate::error::ScheduleError;

// ---------- API (wire) types: owned & serde-friendly ----------

/// Doctor identifier, echoed back exactly as it was sent.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
#[serde(untagged)]
pub enum DoctorId {
    Number(i64),
    Text(String),
}

impl fmt::Display for DoctorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DoctorId::Number(n) => write!(f, "{}", n),
            DoctorId::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_day: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_day: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<i64>,
    pub doctors: Vec<DoctorId>,
    pub num_shifts: Vec<u32>,
    pub daily_shifts: Vec<u32>,
    /// Doctor-major: one row per doctor, one column per day.
    pub availability_matrix: Vec<Vec<f64>>,
}

impl ScheduleRequest {
    /// Picks the range or month variant, whichever the request carries.
    pub fn horizon(&self) -> Result<Horizon, ScheduleError> {
        let range = (self.first_day.as_ref(), self.last_day.as_ref());
        let month = (self.year, self.month);

        match (range, month) {
            ((Some(first), Some(last)), (None, None)) => Ok(Horizon::Range {
                first_day: first.clone(),
                last_day: last.clone(),
            }),
            ((None, None), (Some(year), Some(month))) => Ok(Horizon::Month { year, month }),
            ((None, None), (None, None)) => Err(ScheduleError::InvalidInput(
                "request needs either firstDay and lastDay, or year and month".to_string(),
            )),
            ((Some(_), Some(_)), _) | (_, (Some(_), Some(_))) => Err(ScheduleError::InvalidInput(
                "request must not mix firstDay/lastDay with year/month".to_string(),
            )),
            ((Some(_), None), _) | ((None, Some(_)), _) => Err(ScheduleError::InvalidInput(
                "firstDay and lastDay must be given together".to_string(),
            )),
            (_, (Some(_), None)) | (_, (None, Some(_))) => Err(ScheduleError::InvalidInput(
                "year and month must be given together".to_string(),
            )),
        }
    }
}

/// Day label → doctors on duty, in horizon order.
pub type Schedule = IndexMap<String, Vec<DoctorId>>;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ScheduleResponse {
    pub schedule: Schedule,
}
