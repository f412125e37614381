//! View models for the dashboard and detail pages. Pure functions of stored
//! rows; nothing here touches the database.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::analysis::prompts::RESUME_SECTIONS;
use crate::analysis::validation::leading_integer;
use crate::models::resume::ResumeRow;

const EMPTY_SCORE: &str = "—";

/// Display form of a stored score: `"82/100"` for anything that starts with
/// an integer, the raw text otherwise.
pub fn format_score(score: &str) -> String {
    let trimmed = score.trim();
    if trimmed.is_empty() {
        return EMPTY_SCORE.to_string();
    }
    match leading_integer(trimmed) {
        Some(n) => format!("{n}/100"),
        None => trimmed.to_string(),
    }
}

/// Chart value for a score, clamped to 0..=100. Unparsable scores plot as 0.
pub fn score_value(score: &str) -> i64 {
    leading_integer(score).unwrap_or(0).clamp(0, 100)
}

pub fn format_date(at: DateTime<Utc>) -> String {
    at.format("%b %-d, %Y").to_string()
}

/// Splits a bullet block into lines, dropping list markers and blank lines.
pub fn split_bullets(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| line.trim().trim_start_matches(['-', '*', '•']).trim())
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LatexSection {
    pub key: String,
    pub title: String,
    pub body: String,
}

/// Decodes the stored `latex` JSON into display sections. Known sections come
/// first in resume order, then any extra keys alphabetically.
pub fn latex_sections(latex: &str) -> Vec<LatexSection> {
    let Ok(mut map) = serde_json::from_str::<BTreeMap<String, String>>(latex) else {
        return Vec::new();
    };

    let known: Vec<(String, String)> = RESUME_SECTIONS
        .iter()
        .filter_map(|key| map.remove(*key).map(|body| (key.to_string(), body)))
        .collect();

    known
        .into_iter()
        .chain(map)
        .filter(|(_, body)| !body.trim().is_empty())
        .map(|(key, body)| LatexSection {
            title: section_title(&key),
            key,
            body,
        })
        .collect()
}

fn section_title(key: &str) -> String {
    key.replace(['_', '-'], " ")
        .split_whitespace()
        .map(|w| {
            let mut c = w.chars();
            match c.next() {
                None => String::new(),
                Some(f) => f.to_uppercase().to_string() + c.as_str(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// One row of the recent-uploads list.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeSummary {
    pub id: Uuid,
    pub name: String,
    pub score: String,
    pub score_value: i64,
    pub uploaded_at: DateTime<Utc>,
    pub uploaded_on: String,
}

impl From<&ResumeRow> for ResumeSummary {
    fn from(row: &ResumeRow) -> Self {
        Self {
            id: row.id,
            name: row.name.clone(),
            score: format_score(&row.score),
            score_value: score_value(&row.score),
            uploaded_at: row.uploaded_at,
            uploaded_on: format_date(row.uploaded_at),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub date: String,
    pub score: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub latest_score: String,
    pub latest_name: Option<String>,
    pub uploaded_count: usize,
    pub recent: Vec<ResumeSummary>,
    pub score_trend: Vec<TrendPoint>,
}

impl DashboardView {
    /// Builds the dashboard from rows already ordered newest first.
    pub fn from_recent(rows: &[ResumeRow]) -> Self {
        let latest = rows.first();
        Self {
            latest_score: latest
                .map(|r| format_score(&r.score))
                .unwrap_or_else(|| EMPTY_SCORE.to_string()),
            latest_name: latest.map(|r| r.name.clone()),
            uploaded_count: rows.len(),
            recent: rows.iter().map(ResumeSummary::from).collect(),
            score_trend: rows
                .iter()
                .rev()
                .map(|r| TrendPoint {
                    date: format_date(r.uploaded_at),
                    score: score_value(&r.score),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeDetailResponse {
    pub resume: ResumeRow,
    pub formatted_score: String,
    pub uploaded_on: String,
    pub issues: Vec<String>,
    pub improvements: Vec<String>,
    pub latex_sections: Vec<LatexSection>,
}

impl ResumeDetailResponse {
    pub fn from_row(row: ResumeRow) -> Self {
        Self {
            formatted_score: format_score(&row.score),
            uploaded_on: format_date(row.uploaded_at),
            issues: split_bullets(&row.issues),
            improvements: split_bullets(&row.improvements),
            latex_sections: latex_sections(&row.latex),
            resume: row,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn row(name: &str, score: &str, day: u32) -> ResumeRow {
        ResumeRow {
            id: Uuid::new_v4(),
            user_id: "user_alice".to_string(),
            name: name.to_string(),
            uploaded_at: Utc.with_ymd_and_hms(2026, 10, day, 9, 30, 0).unwrap(),
            score: score.to_string(),
            issues: "- Vague bullets\n\n* No metrics\n• Typos".to_string(),
            improvements: "Quantify results".to_string(),
            latex: r#"{"skills":"\\section{Skills}","education":"\\section{Education}","volunteer_work":"\\section{Volunteer}"}"#.to_string(),
        }
    }

    #[test]
    fn test_format_score() {
        assert_eq!(format_score("82/100"), "82/100");
        assert_eq!(format_score("82"), "82/100");
        assert_eq!(format_score("Excellent"), "Excellent");
        assert_eq!(format_score("  "), "—");
    }

    #[test]
    fn test_score_value_clamps() {
        assert_eq!(score_value("74/100"), 74);
        assert_eq!(score_value("n/a"), 0);
        assert_eq!(score_value("250"), 100);
        assert_eq!(score_value("-3"), 0);
    }

    #[test]
    fn test_format_date() {
        let at = Utc.with_ymd_and_hms(2026, 10, 7, 23, 0, 0).unwrap();
        assert_eq!(format_date(at), "Oct 7, 2026");
    }

    #[test]
    fn test_split_bullets() {
        assert_eq!(
            split_bullets("- Vague bullets\n\n* No metrics\n• Typos\n   \n-"),
            vec!["Vague bullets", "No metrics", "Typos"]
        );
    }

    #[test]
    fn test_latex_sections_ordering_and_titles() {
        let sections = latex_sections(
            r#"{"zeta":"z","skills":"s","education":"e","open_source":"o","projects":"  "}"#,
        );
        let keys: Vec<_> = sections.iter().map(|s| s.key.as_str()).collect();
        assert_eq!(keys, vec!["education", "skills", "open_source", "zeta"]);
        assert_eq!(sections[2].title, "Open Source");
        assert_eq!(sections[0].title, "Education");
    }

    #[test]
    fn test_latex_sections_undecodable() {
        assert!(latex_sections("not json").is_empty());
        assert!(latex_sections(r#"["a"]"#).is_empty());
        assert!(latex_sections("{}").is_empty());
    }

    #[test]
    fn test_dashboard_from_recent() {
        let rows = vec![row("newest.pdf", "90/100", 17), row("older.pdf", "70", 3)];
        let view = DashboardView::from_recent(&rows);

        assert_eq!(view.latest_score, "90/100");
        assert_eq!(view.latest_name.as_deref(), Some("newest.pdf"));
        assert_eq!(view.uploaded_count, 2);
        assert_eq!(view.recent[1].score, "70/100");
        assert_eq!(
            view.score_trend,
            vec![
                TrendPoint { date: "Oct 3, 2026".to_string(), score: 70 },
                TrendPoint { date: "Oct 17, 2026".to_string(), score: 90 },
            ]
        );
    }

    #[test]
    fn test_empty_dashboard() {
        let view = DashboardView::from_recent(&[]);
        assert_eq!(view.latest_score, "—");
        assert!(view.latest_name.is_none());
        assert_eq!(view.uploaded_count, 0);
        assert!(view.score_trend.is_empty());
    }

    #[test]
    fn test_detail_response() {
        let detail = ResumeDetailResponse::from_row(row("cv.pdf", "82/100", 17));
        assert_eq!(detail.formatted_score, "82/100");
        assert_eq!(detail.uploaded_on, "Oct 17, 2026");
        assert_eq!(detail.issues, vec!["Vague bullets", "No metrics", "Typos"]);
        assert_eq!(detail.improvements, vec!["Quantify results"]);
        let titles: Vec<_> = detail.latex_sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["Education", "Skills", "Volunteer Work"]);

        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["resume"]["userId"], "user_alice");
        assert!(json["latexSections"].is_array());
    }
}
