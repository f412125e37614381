//! Schema validation of the located analysis object.
//!
//! Produces a tagged `Analysis` instead of passing loosely-typed JSON around.
//! Only `Analysis::Valid` may reach the persistence step.

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::warn;

use crate::analysis::locate::{locate_analysis_json, LocateError};

pub const NOT_RESUME_DEFAULT_MESSAGE: &str =
    "The uploaded file does not appear to be a resume. Please upload a valid resume.";

/// Section name -> LaTeX snippet.
pub type LatexSections = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq)]
pub struct ResumeAnalysis {
    pub score: String,
    pub issues: String,
    pub improvements: String,
    pub latex: LatexSections,
}

impl ResumeAnalysis {
    /// The LaTeX sections serialized as a JSON object, as stored.
    pub fn latex_json(&self) -> String {
        Value::Object(
            self.latex
                .iter()
                .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                .collect(),
        )
        .to_string()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Analysis {
    Valid(ResumeAnalysis),
    NotResume { message: String },
    Malformed(LocateError),
    Incomplete { missing: Vec<&'static str> },
}

/// Locates, parses and validates a raw model completion.
pub fn interpret_completion(completion: &str) -> Analysis {
    match locate_analysis_json(completion) {
        Ok(located) => {
            if located.repaired {
                warn!("Model output needed JSON repair before parsing");
            }
            validate_analysis(&located.value)
        }
        Err(e) => Analysis::Malformed(e),
    }
}

pub fn validate_analysis(value: &Value) -> Analysis {
    if value.get("notResume").and_then(Value::as_bool) == Some(true) {
        let message = non_empty_str(value, "message")
            .unwrap_or(NOT_RESUME_DEFAULT_MESSAGE)
            .to_string();
        return Analysis::NotResume { message };
    }

    let score = non_empty_str(value, "score");
    let issues = non_empty_str(value, "issues");
    let improvements = non_empty_str(value, "improvements");

    let (Some(score), Some(issues), Some(improvements)) = (score, issues, improvements) else {
        let missing = [("score", score), ("issues", issues), ("improvements", improvements)]
            .into_iter()
            .filter(|(_, v)| v.is_none())
            .map(|(k, _)| k)
            .collect();
        return Analysis::Incomplete { missing };
    };

    Analysis::Valid(ResumeAnalysis {
        score: normalize_score(score),
        issues: issues.trim().to_string(),
        improvements: improvements.trim().to_string(),
        latex: latex_sections(value.get("latex")),
    })
}

fn non_empty_str<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}

fn latex_sections(latex: Option<&Value>) -> LatexSections {
    let Some(Value::Object(map)) = latex else {
        return LatexSections::new();
    };
    map.iter()
        .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
        .collect()
}

/// Parses a leading integer the way a lenient UI does: optional whitespace,
/// optional sign, then digits. Anything after the digits is ignored.
pub fn leading_integer(text: &str) -> Option<i64> {
    let trimmed = text.trim_start();
    let (sign, rest) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse::<i64>().ok().map(|n| sign * n)
}

/// `"82"`, `"82/100"` and `"82 / 100"` become `"82/100"`. Anything else,
/// such as `"8.5/10"`, is kept as given.
pub fn normalize_score(score: &str) -> String {
    let trimmed = score.trim();
    let digits_len = trimmed.chars().take_while(|c| c.is_ascii_digit()).count();
    let rest: String = trimmed[digits_len..].chars().filter(|c| !c.is_whitespace()).collect();
    match leading_integer(trimmed) {
        Some(n) if digits_len > 0 && (0..=100).contains(&n) && (rest.is_empty() || rest == "/100") => {
            format!("{n}/100")
        }
        _ => trimmed.to_string(),
    }
}
