use crate::utils::error::{GradeCalcError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// A validated (name, credits) entry from the curriculum table.
///
/// Fields are private; the only way to obtain a `Course` is [`Course::new`],
/// so every instance in circulation has a non-empty name and finite,
/// non-negative credits.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Course {
    name: String,
    credits: f64,
}

impl Course {
    pub fn new(name: impl Into<String>, credits: f64) -> Result<Self> {
        let name = name.into();
        let trimmed = name.trim();

        if trimmed.is_empty() {
            return Err(GradeCalcError::InvalidCourse {
                message: "course name cannot be empty".to_string(),
            });
        }
        if !credits.is_finite() || credits < 0.0 {
            return Err(GradeCalcError::InvalidCourse {
                message: format!("'{}' has invalid credits {}", trimmed, credits),
            });
        }

        Ok(Self {
            name: trimmed.to_string(),
            credits,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn credits(&self) -> f64 {
        self.credits
    }

    pub fn display_name(&self) -> String {
        format!("{} ({} credits)", self.name, self.credits)
    }
}

impl fmt::Display for Course {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Study programme codes published by the faculty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Specialization {
    #[serde(rename = "CTI")]
    Cti,
    #[serde(rename = "CTI_EN")]
    CtiEn,
    #[serde(rename = "AU")]
    Au,
    #[serde(rename = "AU_EN")]
    AuEn,
}

impl Specialization {
    pub const ALL: [Specialization; 4] = [Self::Cti, Self::CtiEn, Self::Au, Self::AuEn];

    pub fn code(&self) -> &'static str {
        match self {
            Self::Cti => "CTI",
            Self::CtiEn => "CTI_EN",
            Self::Au => "AU",
            Self::AuEn => "AU_EN",
        }
    }

    /// File-name segment used in the published curriculum URLs.
    pub fn slug(&self) -> &'static str {
        match self {
            Self::Cti => "Calcro",
            Self::CtiEn => "Caleng(eng)",
            Self::Au => "AIA_RO",
            Self::AuEn => "AIA_EN(eng)",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Cti => "Calculatoare - Romanian",
            Self::CtiEn => "Calculatoare - English",
            Self::Au => "Automatica - Romanian",
            Self::AuEn => "Automatica - English",
        }
    }
}

impl fmt::Display for Specialization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Specialization {
    type Err = GradeCalcError;

    fn from_str(s: &str) -> Result<Self> {
        let code = s.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|spec| spec.code() == code)
            .ok_or_else(|| {
                GradeCalcError::invalid_parameter(
                    "specialization",
                    s,
                    "Must be one of CTI, CTI_EN, AU, AU_EN",
                )
            })
    }
}

/// Grades keyed by the position of the course in the parsed listing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    grades: BTreeMap<usize, f64>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the grade for a course index, replacing any earlier grade.
    pub fn insert(&mut self, index: usize, grade: f64) {
        self.grades.insert(index, grade);
    }

    pub fn grade(&self, index: usize) -> Option<f64> {
        self.grades.get(&index).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.grades.iter().map(|(index, grade)| (*index, *grade))
    }

    pub fn len(&self) -> usize {
        self.grades.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grades.is_empty()
    }
}

impl FromIterator<(usize, f64)> for Selection {
    fn from_iter<I: IntoIterator<Item = (usize, f64)>>(iter: I) -> Self {
        Self {
            grades: iter.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateResult {
    pub mean: f64,
    pub total_credits: f64,
    pub passing_count: usize,
    pub failing_count: usize,
    pub course_count: usize,
}

impl AggregateResult {
    pub const PASSING_GRADE: f64 = 5.0;

    /// Mean rounded to two decimals.
    pub fn display_mean(&self) -> f64 {
        (self.mean * 100.0).round() / 100.0
    }

    pub fn is_passing(&self) -> bool {
        self.display_mean() >= Self::PASSING_GRADE
    }
}

/// A table cell; `None` when the cell is missing or merged away.
pub type Cell = Option<String>;
pub type Row = Vec<Cell>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub rows: Vec<Row>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub tables: Vec<Table>,
}

/// A decoded curriculum document: pages of tables of rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub pages: Vec<Page>,
}

impl Document {
    pub fn table_count(&self) -> usize {
        self.pages.iter().map(|page| page.tables.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_course_new_trims_name() {
        let course = Course::new("  Baze de Date ", 5.0).unwrap();
        assert_eq!(course.name(), "Baze de Date");
        assert_eq!(course.credits(), 5.0);
        assert_eq!(course.display_name(), "Baze de Date (5 credits)");
    }

    #[test]
    fn test_course_new_rejects_invalid_state() {
        assert!(matches!(
            Course::new("   ", 4.0),
            Err(GradeCalcError::InvalidCourse { .. })
        ));
        assert!(Course::new("Fizica", -1.0).is_err());
        assert!(Course::new("Fizica", f64::NAN).is_err());
        assert!(Course::new("Practica", 0.0).is_ok());
    }

    #[test]
    fn test_specialization_from_str() {
        assert_eq!("cti".parse::<Specialization>().unwrap(), Specialization::Cti);
        assert_eq!(" AU_EN ".parse::<Specialization>().unwrap(), Specialization::AuEn);
        assert!(matches!(
            "XYZ".parse::<Specialization>(),
            Err(GradeCalcError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_display_mean_rounds_to_two_decimals() {
        let result = AggregateResult {
            mean: 4.78632,
            total_credits: 11.0,
            passing_count: 1,
            failing_count: 1,
            course_count: 2,
        };
        assert_eq!(result.display_mean(), 4.79);
        assert!(!result.is_passing());
    }
}
