use std::collections::HashSet;

use crate::error::ScheduleError;
use crate::models::{DoctorId, ScheduleRequest};

/// Checks that the request's arrays line up with the roster and the horizon.
pub fn validate_request(req: &ScheduleRequest, num_days: usize) -> Result<(), ScheduleError> {
    let num_doctors = req.doctors.len();

    if num_doctors == 0 {
        return Err(invalid("doctors must not be empty".to_string()));
    }

    validate_unique_doctors(&req.doctors)?;

    if req.num_shifts.len() != num_doctors {
        return Err(invalid(format!(
            "numShifts has {} entries, expected one per doctor ({})",
            req.num_shifts.len(),
            num_doctors,
        )));
    }

    // No schedule can give a doctor more shifts than there are days.
    for (doctor, &quota) in req.doctors.iter().zip(&req.num_shifts) {
        if quota as usize > num_days {
            return Err(ScheduleError::Infeasible(format!(
                "doctor {} needs {} shifts but the horizon has only {} days",
                doctor, quota, num_days
            )));
        }
    }

    if req.daily_shifts.len() != num_days {
        return Err(invalid(format!(
            "dailyShifts has {} entries, expected one per day ({})",
            req.daily_shifts.len(),
            num_days,
        )));
    }

    if req.availability_matrix.len() != num_doctors {
        return Err(invalid(format!(
            "availabilityMatrix has {} rows, expected one per doctor ({})",
            req.availability_matrix.len(),
            num_doctors,
        )));
    }

    for (row, (doctor, scores)) in req.doctors.iter().zip(&req.availability_matrix).enumerate() {
        if scores.len() != num_days {
            return Err(invalid(format!(
                "availabilityMatrix row {} (doctor {}) has {} entries, expected one per day ({})",
                row,
                doctor,
                scores.len(),
                num_days,
            )));
        }
        if let Some(col) = scores.iter().position(|s| !s.is_finite()) {
            return Err(invalid(format!(
                "availabilityMatrix[{}][{}] is not a finite number",
                row, col,
            )));
        }
    }

    Ok(())
}

fn validate_unique_doctors(doctors: &[DoctorId]) -> Result<(), ScheduleError> {
    let mut seen: HashSet<String> = HashSet::with_capacity(doctors.len());

    // Compared by rendered form: 7 and "7" would produce the same variable names.
    for doctor in doctors {
        if !seen.insert(doctor.to_string()) {
            return Err(invalid(format!("doctor {} appears more than once", doctor)));
        }
    }

    Ok(())
}

fn invalid(details: String) -> ScheduleError {
    ScheduleError::InvalidInput(details)
}
