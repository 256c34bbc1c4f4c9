use crate::domain::model::{Cell, Course};
use regex::Regex;
use std::sync::OnceLock;

pub const DEFAULT_HEADER_TOKENS: [&str; 3] = ["subject", "credits", "total"];

#[derive(Debug, Clone)]
pub struct ParserOptions {
    /// Names matching one of these (case-insensitive) are header or footer rows.
    pub header_tokens: Vec<String>,
    /// Drop a leading numeric course code such as `1.00 ` from names.
    pub strip_course_codes: bool,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            header_tokens: DEFAULT_HEADER_TOKENS.iter().map(|t| t.to_string()).collect(),
            strip_course_codes: true,
        }
    }
}

fn decimal_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[+-]?\d+(?:[.,]\d+)?$").expect("valid decimal regex"))
}

fn course_code_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\d+(?:[.,]\d+)?\s+").expect("valid course code regex"))
}

/// Parses a decimal written with either `.` or `,` as separator.
///
/// Anything else, including `inf`/`NaN` and thousands separators, yields `None`.
pub fn parse_decimal(text: &str) -> Option<f64> {
    let text = text.trim();
    if !decimal_pattern().is_match(text) {
        return None;
    }
    text.replace(',', ".").parse::<f64>().ok()
}

pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Turns candidate table rows into course entries, skipping anything that
/// does not look like a course row.
#[derive(Debug, Clone)]
pub struct CourseParser {
    header_tokens: Vec<String>,
    strip_course_codes: bool,
}

impl CourseParser {
    pub fn new(options: ParserOptions) -> Self {
        Self {
            header_tokens: options
                .header_tokens
                .iter()
                .map(|token| normalize_whitespace(token).to_lowercase())
                .filter(|token| !token.is_empty())
                .collect(),
            strip_course_codes: options.strip_course_codes,
        }
    }

    pub fn parse<'a, I>(&self, rows: I) -> Vec<Course>
    where
        I: IntoIterator<Item = &'a [Cell]>,
    {
        let mut courses = Vec::new();
        let mut skipped = 0usize;

        for row in rows {
            match self.parse_row(row) {
                Some(course) => courses.push(course),
                None => {
                    skipped += 1;
                    tracing::trace!("Skipping row {:?}", row);
                }
            }
        }

        tracing::debug!("Parsed {} courses, skipped {} rows", courses.len(), skipped);
        courses
    }

    pub fn parse_row(&self, row: &[Cell]) -> Option<Course> {
        // credits: the last numeric cell
        let (credit_index, credits) = row.iter().enumerate().rev().find_map(|(index, cell)| {
            cell.as_deref()
                .and_then(parse_decimal)
                .map(|value| (index, value))
        })?;
        if credits < 0.0 {
            return None;
        }

        // name: the first non-empty, non-numeric cell before the credits
        let raw_name = row[..credit_index]
            .iter()
            .filter_map(|cell| cell.as_deref())
            .map(str::trim)
            .find(|cell| !cell.is_empty() && parse_decimal(cell).is_none())?;

        let name = self.normalize_name(raw_name);
        if name.is_empty() || self.is_header(&name) {
            return None;
        }

        Course::new(name, credits).ok()
    }

    fn normalize_name(&self, raw: &str) -> String {
        let name = normalize_whitespace(raw);
        if self.strip_course_codes {
            course_code_pattern().replace(&name, "").into_owned()
        } else {
            name
        }
    }

    fn is_header(&self, name: &str) -> bool {
        let lowered = name.to_lowercase();
        self.header_tokens.iter().any(|token| *token == lowered)
    }
}

impl Default for CourseParser {
    fn default() -> Self {
        Self::new(ParserOptions::default())
    }
}
