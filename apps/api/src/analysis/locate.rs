//! Finds the analysis object inside a free-form model completion.
//!
//! Every top-level `{...}` is a candidate; an object still open at the end of
//! the text is kept as a truncated candidate. Exactly one candidate may carry
//! the analysis schema. Two or more is ambiguous and rejected rather than
//! resolved by position. When no candidate carries the schema, a single
//! well-formed object is still returned so validation can name what is missing.

use serde_json::Value;
use thiserror::Error;

use crate::analysis::repair::repair_json;

/// Completions larger than this are not scanned.
pub const MAX_COMPLETION_BYTES: usize = 512 * 1024;
/// Candidates nested deeper than this are discarded.
pub const MAX_NESTING: usize = 64;
/// Keys that mark an object as an analysis or a not-a-resume verdict.
pub const SCHEMA_KEYS: [&str; 5] = ["notResume", "score", "issues", "improvements", "latex"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocateError {
    #[error("completion is {bytes} bytes, over the scan limit")]
    TooLarge { bytes: usize },

    #[error("completion contains no JSON object")]
    NoJson,

    #[error("{count} candidate objects match the analysis schema")]
    Ambiguous { count: usize },

    #[error("no candidate parsed, even after repair")]
    Unparsable,
}

/// The selected object and whether the repair pass was needed to read it.
#[derive(Debug, Clone, PartialEq)]
pub struct Located {
    pub value: Value,
    pub repaired: bool,
}

#[derive(Debug, Clone, Copy)]
struct Candidate<'a> {
    text: &'a str,
    complete: bool,
    max_depth: usize,
}

pub fn locate_analysis_json(completion: &str) -> Result<Located, LocateError> {
    if completion.len() > MAX_COMPLETION_BYTES {
        return Err(LocateError::TooLarge {
            bytes: completion.len(),
        });
    }

    let candidates = scan_candidates(completion);
    if candidates.is_empty() {
        return Err(LocateError::NoJson);
    }
    let candidates: Vec<_> = candidates
        .into_iter()
        .filter(|c| c.max_depth <= MAX_NESTING)
        .collect();

    let mut parsed: Vec<Value> = candidates
        .iter()
        .filter(|c| c.complete)
        .filter_map(|c| serde_json::from_str::<Value>(c.text).ok())
        .filter(Value::is_object)
        .collect();
    let strict: Vec<Value> = parsed.iter().filter(|v| is_schema_shaped(v)).cloned().collect();
    if let Some(located) = select(strict, false)? {
        return Ok(located);
    }

    let repaired: Vec<Value> = candidates
        .iter()
        .filter_map(|c| serde_json::from_str::<Value>(&repair_json(c.text)).ok())
        .filter(is_schema_shaped)
        .collect();
    if let Some(located) = select(repaired, true)? {
        return Ok(located);
    }

    // A lone well-formed object without any schema key is still the answer;
    // validation reports what it is missing. Repaired output is not used here
    // since repair turns any brace-delimited prose into some object.
    match (parsed.pop(), parsed.is_empty()) {
        (Some(value), true) => Ok(Located {
            value,
            repaired: false,
        }),
        _ => Err(LocateError::Unparsable),
    }
}

fn select(mut matches: Vec<Value>, repaired: bool) -> Result<Option<Located>, LocateError> {
    match matches.len() {
        0 => Ok(None),
        1 => Ok(matches.pop().map(|value| Located { value, repaired })),
        count => Err(LocateError::Ambiguous { count }),
    }
}

fn is_schema_shaped(value: &Value) -> bool {
    value
        .as_object()
        .map(|o| SCHEMA_KEYS.iter().any(|k| o.contains_key(*k)))
        .unwrap_or(false)
}

/// String-aware brace scan. Prose outside objects is ignored, so quotes and
/// apostrophes in surrounding text do not confuse it.
fn scan_candidates(text: &str) -> Vec<Candidate<'_>> {
    let mut candidates = Vec::new();
    let mut depth = 0usize;
    let mut max_depth = 0usize;
    let mut start = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in text.char_indices() {
        if depth == 0 {
            if c == '{' {
                start = i;
                depth = 1;
                max_depth = 1;
            }
            continue;
        }
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' | '[' => {
                depth += 1;
                max_depth = max_depth.max(depth);
            }
            '}' | ']' => {
                depth -= 1;
                if depth == 0 {
                    candidates.push(Candidate {
                        text: &text[start..=i],
                        complete: true,
                        max_depth,
                    });
                }
            }
            _ => {}
        }
    }

    if depth > 0 {
        candidates.push(Candidate {
            text: &text[start..],
            complete: false,
            max_depth,
        });
    }
    candidates
}
