use crate::core::{AggregateResult, Course};
use crate::utils::error::Result;
use serde::{Deserialize, Serialize};
use std::io::Write;

const RULE: &str = "======================================================================";
const THIN_RULE: &str = "----------------------------------------------------------------------";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Csv,
    Json,
}

#[derive(Debug, Serialize)]
struct CourseRow<'a> {
    index: usize,
    name: &'a str,
    credits: f64,
}

#[derive(Debug, Serialize)]
struct ResultRow {
    mean: f64,
    total_credits: f64,
    passing_count: usize,
    failing_count: usize,
    course_count: usize,
}

impl From<&AggregateResult> for ResultRow {
    fn from(result: &AggregateResult) -> Self {
        Self {
            mean: result.display_mean(),
            total_credits: result.total_credits,
            passing_count: result.passing_count,
            failing_count: result.failing_count,
            course_count: result.course_count,
        }
    }
}

fn course_rows(courses: &[Course]) -> impl Iterator<Item = CourseRow<'_>> {
    courses.iter().enumerate().map(|(i, course)| CourseRow {
        index: i + 1,
        name: course.name(),
        credits: course.credits(),
    })
}

pub fn write_courses<W: Write>(mut out: W, courses: &[Course], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => {
            writeln!(out, "{}", RULE)?;
            writeln!(out, "CURRICULUM COURSES ({})", courses.len())?;
            writeln!(out, "{}", RULE)?;
            for row in course_rows(courses) {
                writeln!(out, "{:>4}) {} ({} credits)", row.index, row.name, row.credits)?;
            }
        }
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(out);
            for row in course_rows(courses) {
                writer.serialize(row)?;
            }
            writer.flush()?;
        }
        OutputFormat::Json => {
            let rows: Vec<CourseRow<'_>> = course_rows(courses).collect();
            serde_json::to_writer_pretty(&mut out, &rows)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

pub fn write_result<W: Write>(mut out: W, result: &AggregateResult, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => write_result_table(&mut out, result)?,
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(out);
            writer.serialize(ResultRow::from(result))?;
            writer.flush()?;
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, &ResultRow::from(result))?;
            writeln!(out)?;
        }
    }
    Ok(())
}

fn write_result_table<W: Write>(out: &mut W, result: &AggregateResult) -> Result<()> {
    let mean = result.display_mean();

    writeln!(out)?;
    writeln!(out, "{}", RULE)?;
    writeln!(out, "FINAL RESULTS")?;
    writeln!(out, "{}", RULE)?;
    writeln!(out)?;
    writeln!(out, "Total courses evaluated: {}", result.course_count)?;
    writeln!(out, "  - Passing courses (>= 5): {}", result.passing_count)?;
    writeln!(out, "  - Failing courses (< 5): {}", result.failing_count)?;
    writeln!(out)?;
    writeln!(out, "Total credits: {}", result.total_credits)?;
    writeln!(out)?;
    writeln!(out, "{}", THIN_RULE)?;
    writeln!(out, "WEIGHTED HARMONIC MEAN GRADE: {:.2}", mean)?;
    writeln!(out, "{}", THIN_RULE)?;
    writeln!(out)?;

    if result.is_passing() {
        writeln!(out, "✓ Your average is PASSING ({:.2} >= 5.00)", mean)?;
    } else {
        writeln!(out, "✗ Your average is FAILING ({:.2} < 5.00)", mean)?;
    }

    if result.failing_count > 0 {
        writeln!(out)?;
        writeln!(
            out,
            "⚠ Warning: You have {} failing course(s)",
            result.failing_count
        )?;
        writeln!(out, "  These courses significantly lower your weighted average.")?;
    }

    writeln!(out)?;
    writeln!(
        out,
        "Informal projection only; check your official grades with the faculty registrar."
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render<F: FnOnce(&mut Vec<u8>) -> Result<()>>(f: F) -> String {
        let mut buffer = Vec::new();
        f(&mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    fn sample_result() -> AggregateResult {
        AggregateResult {
            mean: 11.0 / (6.0 / 9.5 + 5.0 / 3.0),
            total_credits: 11.0,
            passing_count: 1,
            failing_count: 1,
            course_count: 2,
        }
    }

    #[test]
    fn test_courses_csv() {
        let courses = vec![
            Course::new("Algoritmi", 6.0).unwrap(),
            Course::new("Baze de Date", 5.5).unwrap(),
        ];
        let output = render(|buf| write_courses(buf, &courses, OutputFormat::Csv));
        assert_eq!(output, "index,name,credits\n1,Algoritmi,6.0\n2,Baze de Date,5.5\n");
    }

    #[test]
    fn test_courses_json() {
        let courses = vec![Course::new("Retele", 5.0).unwrap()];
        let output = render(|buf| write_courses(buf, &courses, OutputFormat::Json));
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed[0]["name"], "Retele");
        assert_eq!(parsed[0]["index"], 1);
    }

    #[test]
    fn test_result_table_mentions_failing_courses() {
        let output = render(|buf| write_result(buf, &sample_result(), OutputFormat::Table));
        assert!(output.contains("WEIGHTED HARMONIC MEAN GRADE: 4.79"));
        assert!(output.contains("FAILING"));
        assert!(output.contains("1 failing course(s)"));
    }

    #[test]
    fn test_result_json_rounds_mean() {
        let output = render(|buf| write_result(buf, &sample_result(), OutputFormat::Json));
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["mean"], 4.79);
        assert_eq!(parsed["total_credits"], 11.0);
    }
}
