use crate::utils::error::{GradeCalcError, Result};
use regex::Regex;
use std::sync::OnceLock;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(GradeCalcError::invalid_parameter(
            field_name,
            url_str,
            "URL cannot be empty",
        ));
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(GradeCalcError::invalid_parameter(
                field_name,
                url_str,
                format!("Unsupported URL scheme: {}", scheme),
            )),
        },
        Err(e) => Err(GradeCalcError::invalid_parameter(
            field_name,
            url_str,
            format!("Invalid URL format: {}", e),
        )),
    }
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(GradeCalcError::invalid_parameter(
            field_name,
            value,
            "Value cannot be empty or whitespace-only",
        ));
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(GradeCalcError::invalid_parameter(
            field_name,
            value,
            format!("Value must be between {} and {}", min, max),
        ));
    }
    Ok(())
}

fn academic_year_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(\d{4})-(\d{4})$").expect("valid academic year regex"))
}

/// Accepts `YYYY-YYYY` where the second year follows the first.
pub fn validate_academic_year(field_name: &str, value: &str) -> Result<()> {
    let caps = academic_year_pattern().captures(value).ok_or_else(|| {
        GradeCalcError::invalid_parameter(field_name, value, "Expected the form YYYY-YYYY")
    })?;

    let start: u32 = caps[1].parse().unwrap_or(0);
    let end: u32 = caps[2].parse().unwrap_or(0);
    if end != start + 1 {
        return Err(GradeCalcError::invalid_parameter(
            field_name,
            value,
            "The second year must directly follow the first",
        ));
    }
    Ok(())
}
