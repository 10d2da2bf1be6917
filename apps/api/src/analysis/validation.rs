use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::cv::{is_present, CvDocument};

/// A data-quality issue in a CV. Warnings never block analysis; the scoring
/// engine tolerates all of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsistencyWarning {
    /// Dotted path of the offending field, e.g. `experience[1].endDate`.
    pub field: String,
    pub code: WarningCode,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningCode {
    MissingEmail,
    CurrentWithEndDate,
    MissingEndDate,
    InvalidDate,
    EndBeforeStart,
}

/// Parses `YYYY-MM-DD`, falling back to `YYYY-MM` (first of month).
pub fn parse_cv_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(&format!("{value}-01"), "%Y-%m-%d"))
        .ok()
}

pub fn check_consistency(cv: &CvDocument) -> Vec<ConsistencyWarning> {
    let mut warnings = Vec::new();

    if cv.personal_info.email.trim().is_empty() {
        warnings.push(ConsistencyWarning {
            field: "personalInfo.email".to_string(),
            code: WarningCode::MissingEmail,
            message: "Email address is required".to_string(),
        });
    }

    for (i, exp) in cv.experience.iter().enumerate() {
        let path = format!("experience[{i}]");
        if exp.current && is_present(&exp.end_date) {
            warnings.push(ConsistencyWarning {
                field: format!("{path}.endDate"),
                code: WarningCode::CurrentWithEndDate,
                message: format!(
                    "'{}' is marked as current but has an end date",
                    exp.company
                ),
            });
        } else if !exp.current && !is_present(&exp.end_date) {
            warnings.push(ConsistencyWarning {
                field: format!("{path}.endDate"),
                code: WarningCode::MissingEndDate,
                message: format!("'{}' has ended but no end date is set", exp.company),
            });
        }
        check_range(
            &mut warnings,
            &path,
            Some(&exp.start_date),
            exp.end_date.as_deref(),
        );
    }

    for (i, edu) in cv.education.iter().enumerate() {
        check_range(
            &mut warnings,
            &format!("education[{i}]"),
            Some(&edu.start_date),
            edu.end_date.as_deref(),
        );
    }

    for (i, project) in cv.projects.iter().enumerate() {
        check_range(
            &mut warnings,
            &format!("projects[{i}]"),
            project.start_date.as_deref(),
            project.end_date.as_deref(),
        );
    }

    warnings
}

fn check_range(
    warnings: &mut Vec<ConsistencyWarning>,
    path: &str,
    start: Option<&str>,
    end: Option<&str>,
) {
    let start = start.filter(|s| !s.is_empty());
    let end = end.filter(|s| !s.is_empty());

    let start_date = start.and_then(|s| parse_date_or_warn(warnings, path, "startDate", s));
    let end_date = end.and_then(|e| parse_date_or_warn(warnings, path, "endDate", e));

    if let (Some(start_date), Some(end_date)) = (start_date, end_date) {
        if end_date < start_date {
            warnings.push(ConsistencyWarning {
                field: format!("{path}.endDate"),
                code: WarningCode::EndBeforeStart,
                message: format!("End date {end_date} is before start date {start_date}"),
            });
        }
    }
}

fn parse_date_or_warn(
    warnings: &mut Vec<ConsistencyWarning>,
    path: &str,
    field: &str,
    value: &str,
) -> Option<NaiveDate> {
    let parsed = parse_cv_date(value);
    if parsed.is_none() {
        warnings.push(ConsistencyWarning {
            field: format!("{path}.{field}"),
            code: WarningCode::InvalidDate,
            message: format!("'{value}' is not a valid date (expected YYYY-MM-DD)"),
        });
    }
    parsed
}
