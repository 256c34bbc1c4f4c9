use crate::domain::model::{AggregateResult, Course, Selection};
use crate::utils::error::{GradeCalcError, Result};

pub const MIN_GRADE: f64 = 0.0;
pub const MAX_GRADE: f64 = 10.0;

/// Rejects grades the harmonic mean cannot take.
pub fn validate_grade(course: &Course, grade: f64) -> Result<()> {
    if grade.is_nan() || !(MIN_GRADE..=MAX_GRADE).contains(&grade) {
        return Err(GradeCalcError::GradeOutOfRange {
            course: course.name().to_string(),
            grade,
        });
    }
    if grade == 0.0 {
        return Err(GradeCalcError::InvalidGrade {
            course: course.name().to_string(),
            grade,
        });
    }
    Ok(())
}

/// Weighted harmonic mean of the selected grades, credits as weights.
///
/// Courses with zero credits are left out of both sums. Low grades are not
/// penalised separately; their large `credits / grade` terms already pull the
/// mean down.
pub fn aggregate(courses: &[Course], selection: &Selection) -> Result<AggregateResult> {
    let mut graded = Vec::with_capacity(selection.len());
    for (index, grade) in selection.iter() {
        let course = courses.get(index).ok_or_else(|| {
            GradeCalcError::invalid_parameter(
                "selection",
                index,
                format!("only {} courses are available", courses.len()),
            )
        })?;
        validate_grade(course, grade)?;
        graded.push((course, grade));
    }

    let mut total_credits = 0.0;
    let mut reciprocal_sum = 0.0;
    let mut passing_count = 0;
    let mut failing_count = 0;

    for (course, grade) in graded {
        let credits = course.credits();
        if credits <= 0.0 {
            tracing::debug!("Skipping '{}': no credits", course.name());
            continue;
        }

        if grade >= AggregateResult::PASSING_GRADE {
            passing_count += 1;
        } else {
            failing_count += 1;
        }

        total_credits += credits;
        reciprocal_sum += credits / grade;
    }

    if total_credits <= 0.0 {
        return Err(GradeCalcError::NoEligibleCourses);
    }

    Ok(AggregateResult {
        mean: total_credits / reciprocal_sum,
        total_credits,
        passing_count,
        failing_count,
        course_count: passing_count + failing_count,
    })
}
