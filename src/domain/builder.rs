//! Turns a validated scheduling request into a [`MilpProblem`] and reads
//! the solver's answer back into a per-day roster.

use log::debug;

use crate::calendar::Day;
use crate::domain::model::{Direction, MilpProblem, Sense, SparseMatrix, VarType};
use crate::models::{DoctorId, Schedule};

/// A variable counts as "assigned" when its value is at least `1 - ASSIGNMENT_TOLERANCE`.
pub const ASSIGNMENT_TOLERANCE: f64 = 1e-6;

/// Bijection between a variable index and its (doctor offset, day offset).
///
/// Variables are laid out doctor-major: all days of doctor 0, then all days
/// of doctor 1 and so on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariableLayout {
    num_doctors: usize,
    num_days: usize,
}

impl VariableLayout {
    pub fn new(num_doctors: usize, num_days: usize) -> Self {
        VariableLayout {
            num_doctors,
            num_days,
        }
    }

    pub fn num_doctors(&self) -> usize {
        self.num_doctors
    }

    pub fn num_days(&self) -> usize {
        self.num_days
    }

    pub fn len(&self) -> usize {
        self.num_doctors * self.num_days
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn index(&self, doctor: usize, day: usize) -> usize {
        debug_assert!(doctor < self.num_doctors && day < self.num_days);
        day + self.num_days * doctor
    }

    pub fn position(&self, index: usize) -> (usize, usize) {
        debug_assert!(index < self.len());
        (index / self.num_days, index % self.num_days)
    }
}

/// Inputs of the model, already checked for consistent dimensions.
#[derive(Debug, Clone, Copy)]
pub struct ScheduleInputs<'a> {
    pub days: &'a [Day],
    pub doctors: &'a [DoctorId],
    pub num_shifts: &'a [u32],
    pub daily_shifts: &'a [u32],
    pub availability: &'a [Vec<f64>],
}

/// The problem handed to the solver, together with the layout needed to decode it.
#[derive(Debug, Clone)]
pub struct ScheduleModel {
    pub problem: MilpProblem,
    pub layout: VariableLayout,
}

impl ScheduleModel {
    pub fn build(inputs: &ScheduleInputs<'_>) -> ScheduleModel {
        let layout = VariableLayout::new(inputs.doctors.len(), inputs.days.len());
        let (num_doctors, num_days) = (layout.num_doctors(), layout.num_days());
        let num_vars = layout.len();
        let num_consecutive = num_doctors * num_days.saturating_sub(1);
        let num_rows = num_days + num_doctors + num_consecutive;

        let mut names = vec![String::new(); num_vars];
        let mut objective = vec![0.0; num_vars];
        for (p, doctor) in inputs.doctors.iter().enumerate() {
            for (d, day) in inputs.days.iter().enumerate() {
                let j = layout.index(p, d);
                names[j] = format!("x_{}_{}", doctor, day.index);
                objective[j] = inputs.availability[p][d];
            }
        }

        let mut matrix = SparseMatrix::with_capacity(num_rows, num_vars, 2 * num_vars + 2 * num_consecutive);
        let mut senses = Vec::with_capacity(num_rows);
        let mut rhs = Vec::with_capacity(num_rows);

        // minimum staffing per day
        for d in 0..num_days {
            let row = senses.len();
            for p in 0..num_doctors {
                matrix.push(row, layout.index(p, d), 1.0);
            }
            senses.push(Sense::GreaterEqual);
            rhs.push(f64::from(inputs.daily_shifts[d]));
        }

        // exact quota per doctor
        for p in 0..num_doctors {
            let row = senses.len();
            for d in 0..num_days {
                matrix.push(row, layout.index(p, d), 1.0);
            }
            senses.push(Sense::Equal);
            rhs.push(f64::from(inputs.num_shifts[p]));
        }

        // never two days in a row
        for p in 0..num_doctors {
            for d in 1..num_days {
                let row = senses.len();
                matrix.push(row, layout.index(p, d - 1), 1.0);
                matrix.push(row, layout.index(p, d), 1.0);
                senses.push(Sense::LessEqual);
                rhs.push(1.0);
            }
        }

        debug!(
            "Built schedule model: {} variables, {} constraints, {} nonzeros",
            num_vars,
            senses.len(),
            matrix.nnz()
        );

        ScheduleModel {
            problem: MilpProblem {
                direction: Direction::Maximize,
                matrix,
                senses,
                rhs,
                objective,
                bounds: vec![(0.0, 1.0); num_vars],
                types: vec![VarType::Binary; num_vars],
                names,
            },
            layout,
        }
    }

    /// Reads a solution vector back into a roster. Every day gets a key, even if nobody works it.
    pub fn decode(&self, days: &[Day], doctors: &[DoctorId], values: &[f64]) -> Schedule {
        let mut schedule: Schedule = days.iter().map(|day| (day.label.clone(), Vec::new())).collect();

        for day in days {
            let d = day.offset();
            for (p, doctor) in doctors.iter().enumerate() {
                let assigned = values
                    .get(self.layout.index(p, d))
                    .is_some_and(|&v| is_assigned(v));
                if assigned {
                    if let Some(on_duty) = schedule.get_mut(&day.label) {
                        on_duty.push(doctor.clone());
                    }
                }
            }
        }

        schedule
    }
}

pub fn is_assigned(value: f64) -> bool {
    value >= 1.0 - ASSIGNMENT_TOLERANCE
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::expand_month;
    use crate::calendar::expand_range;
    use chrono::NaiveDate;

    fn days(n: u32) -> Vec<Day> {
        let first = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let last = NaiveDate::from_ymd_opt(2024, 1, n).unwrap();
        expand_range(first, last).unwrap()
    }

    fn doctors(n: i64) -> Vec<DoctorId> {
        (1..=n).map(DoctorId::Number).collect()
    }

    fn build(days: &[Day], doctors: &[DoctorId], num_shifts: &[u32]) -> ScheduleModel {
        let daily_shifts = vec![1; days.len()];
        let availability: Vec<Vec<f64>> = (0..doctors.len())
            .map(|p| (0..days.len()).map(|d| (p * 100 + d) as f64).collect())
            .collect();
        ScheduleModel::build(&ScheduleInputs {
            days,
            doctors,
            num_shifts,
            daily_shifts: &daily_shifts,
            availability: &availability,
        })
    }

    #[test]
    fn test_layout_is_a_bijection() {
        let layout = VariableLayout::new(3, 5);
        let mut seen = vec![false; layout.len()];
        for p in 0..3 {
            for d in 0..5 {
                let j = layout.index(p, d);
                assert_eq!(j, d + 5 * p);
                assert_eq!(layout.position(j), (p, d));
                assert!(!seen[j]);
                seen[j] = true;
            }
        }
        assert!(seen.into_iter().all(|s| s));
    }

    #[test]
    fn test_counts() {
        let days = days(7);
        let doctors = doctors(3);
        let model = build(&days, &doctors, &[2, 2, 3]);
        let p = &model.problem;
        assert_eq!(p.num_variables(), 3 * 7);
        assert_eq!(p.num_constraints(), 7 + 3 + 3 * 6);
        assert_eq!(p.matrix.nnz(), 7 * 3 + 3 * 7 + 2 * 3 * 6);
        assert!(p.check().is_ok());
        assert!(p.types.iter().all(|t| *t == VarType::Binary));
        assert!(p.bounds.iter().all(|b| *b == (0.0, 1.0)));
        assert_eq!(p.direction, Direction::Maximize);
    }

    #[test]
    fn test_counts_single_day() {
        let days = days(1);
        let doctors = doctors(2);
        let model = build(&days, &doctors, &[1, 0]);
        assert_eq!(model.problem.num_constraints(), 1 + 2);
        assert!(model.problem.check().is_ok());
    }

    #[test]
    fn test_constraint_order_and_rows() {
        let days = days(3);
        let doctors = doctors(2);
        let model = build(&days, &doctors, &[2, 1]);
        let p = &model.problem;
        let rows = p.matrix.row_entries();

        // staffing: day 1 touches doctor 0 day 1 and doctor 1 day 1
        assert_eq!(p.senses[1], Sense::GreaterEqual);
        assert_eq!(rows[1], vec![(1, 1.0), (4, 1.0)]);
        assert_eq!(p.rhs[1], 1.0);

        // quota for doctor 1
        assert_eq!(p.senses[4], Sense::Equal);
        assert_eq!(rows[4], vec![(3, 1.0), (4, 1.0), (5, 1.0)]);
        assert_eq!(p.rhs[4], 1.0);
        assert_eq!(p.rhs[3], 2.0);

        // consecutive: doctor 0 (d0,d1), (d1,d2), doctor 1 (d0,d1), (d1,d2)
        assert_eq!(&p.senses[5..], &[Sense::LessEqual; 4]);
        assert_eq!(rows[5], vec![(0, 1.0), (1, 1.0)]);
        assert_eq!(rows[6], vec![(1, 1.0), (2, 1.0)]);
        assert_eq!(rows[8], vec![(4, 1.0), (5, 1.0)]);
        assert!(p.rhs[5..].iter().all(|&b| b == 1.0));
    }

    #[test]
    fn test_objective_and_names_follow_layout() {
        let days = days(3);
        let doctors = vec![DoctorId::Text("ann".into()), DoctorId::Number(42)];
        let model = build(&days, &doctors, &[1, 1]);
        let j = model.layout.index(1, 2);
        assert_eq!(model.problem.names[j], "x_42_3");
        assert_eq!(model.problem.objective[j], 102.0);
        assert_eq!(model.problem.names[model.layout.index(0, 0)], "x_ann_1");
    }

    #[test]
    fn test_decode_keeps_every_day_and_uses_tolerance() {
        let days = days(3);
        let doctors = doctors(2);
        let model = build(&days, &doctors, &[2, 1]);
        // doctor 1 on days 1 and 3, doctor 2 on day 2 (slightly below 1.0)
        let values = [1.0, 0.0, 0.9999999, 0.0, 0.9999995, 0.5];
        let schedule = model.decode(&days, &doctors, &values);

        let keys: Vec<&String> = schedule.keys().collect();
        assert_eq!(keys, days.iter().map(|d| &d.label).collect::<Vec<_>>());
        assert_eq!(schedule[&days[0].label], vec![DoctorId::Number(1)]);
        assert_eq!(schedule[&days[1].label], vec![DoctorId::Number(2)]);
        assert_eq!(schedule[&days[2].label], vec![DoctorId::Number(1)]);
    }

    #[test]
    fn test_decode_empty_days_still_present() {
        let days = expand_month(2024, 2).unwrap();
        let doctors = doctors(1);
        let model = build(&days, &doctors, &[0]);
        let schedule = model.decode(&days, &doctors, &vec![0.0; days.len()]);
        assert_eq!(schedule.len(), 29);
        assert!(schedule.values().all(|v| v.is_empty()));
    }

    #[test]
    fn test_is_assigned_threshold() {
        assert!(is_assigned(1.0));
        assert!(is_assigned(1.0 - 1e-7));
        assert!(!is_assigned(0.99));
        assert!(!is_assigned(0.0));
    }
}
