//! Final grade and remarks derivation.
//!
//! The pass mark is compared against the weighted score as-is: a final grade of
//! `3.0` or lower passes. Component scores are percentages, so the threshold reads
//! like a 1.0 to 5.0 grade-point scale; it is kept unchanged until the grading scale
//! is confirmed.

use db::models::grade::Remarks;

pub const PRELIM_WEIGHT: f64 = 0.3;
pub const MIDTERM_WEIGHT: f64 = 0.3;
pub const FINALS_WEIGHT: f64 = 0.4;
pub const PASSING_THRESHOLD: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradeComputation {
    pub final_grade: Option<f64>,
    pub remarks: Remarks,
}

/// Weighted final grade, or `None` unless all three components are present.
pub fn compute_final_grade(
    prelim: Option<f64>,
    midterm: Option<f64>,
    finals: Option<f64>,
) -> Option<f64> {
    match (prelim, midterm, finals) {
        (Some(p), Some(m), Some(f)) => {
            Some(p * PRELIM_WEIGHT + m * MIDTERM_WEIGHT + f * FINALS_WEIGHT)
        }
        _ => None,
    }
}

pub fn remarks_for_final(final_grade: f64) -> Remarks {
    if final_grade <= PASSING_THRESHOLD {
        Remarks::Passed
    } else {
        Remarks::Failed
    }
}

pub fn compute(prelim: Option<f64>, midterm: Option<f64>, finals: Option<f64>) -> GradeComputation {
    match compute_final_grade(prelim, midterm, finals) {
        Some(final_grade) => GradeComputation {
            final_grade: Some(final_grade),
            remarks: remarks_for_final(final_grade),
        },
        None => {
            let partially_scored = [prelim, midterm, finals]
                .into_iter()
                .flatten()
                .any(|score| score > 0.0);

            GradeComputation {
                final_grade: None,
                remarks: if partially_scored {
                    Remarks::Incomplete
                } else {
                    Remarks::Pending
                },
            }
        }
    }
}

/// Remarks to store: the computed value, unless it is still `Pending` and the
/// encoder asked for `Pending` or `INC` explicitly.
pub fn resolve_remarks(computed: &GradeComputation, requested: Option<Remarks>) -> Remarks {
    match (computed.remarks, requested) {
        (Remarks::Pending, Some(r @ (Remarks::Pending | Remarks::Incomplete))) => r,
        (computed, _) => computed,
    }
}
