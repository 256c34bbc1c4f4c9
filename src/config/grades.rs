use crate::core::parser::normalize_whitespace;
use crate::core::{Course, GradeSource, Selection};
use crate::utils::error::{GradeCalcError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A non-interactive grade sheet.
///
/// ```toml
/// [[grades]]
/// course = "Baze de Date"
/// grade = 8.5
///
/// [[grades]]
/// index = 3   # position shown by --list
/// grade = 9
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GradeFile {
    #[serde(default)]
    pub grades: Vec<GradeEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradeEntry {
    pub course: Option<String>,
    /// 1-based position in the course listing
    pub index: Option<usize>,
    pub grade: f64,
}

fn same_name(a: &str, b: &str) -> bool {
    normalize_whitespace(a).to_lowercase() == normalize_whitespace(b).to_lowercase()
}

impl GradeFile {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            GradeCalcError::config(format!("cannot read grade file '{}': {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Maps each entry onto a course position.
    ///
    /// Repeated names bind to successive courses of that name, so a sheet can
    /// grade two identically named optional courses.
    pub fn resolve(&self, courses: &[Course]) -> Result<Selection> {
        let mut selection = Selection::new();

        for entry in &self.grades {
            let index = match (entry.index, &entry.course) {
                (Some(position), _) => {
                    if position == 0 || position > courses.len() {
                        return Err(GradeCalcError::invalid_parameter(
                            "grades.index",
                            position,
                            format!("must be between 1 and {}", courses.len()),
                        ));
                    }
                    position - 1
                }
                (None, Some(name)) => courses
                    .iter()
                    .enumerate()
                    .position(|(i, course)| {
                        same_name(course.name(), name) && selection.grade(i).is_none()
                    })
                    .ok_or_else(|| {
                        GradeCalcError::invalid_parameter(
                            "grades.course",
                            name,
                            "no matching course in the curriculum",
                        )
                    })?,
                (None, None) => {
                    return Err(GradeCalcError::invalid_parameter(
                        "grades",
                        entry.grade,
                        "each entry needs either `course` or `index`",
                    ))
                }
            };

            tracing::debug!("Grade {} -> {}", entry.grade, courses[index].name());
            selection.insert(index, entry.grade);
        }

        Ok(selection)
    }
}

#[async_trait]
impl GradeSource for GradeFile {
    async fn collect(&self, courses: &[Course]) -> Result<Selection> {
        self.resolve(courses)
    }
}
