//! Response Interpreter — turns raw model text into a `GenerationResult`.
//!
//! JSON answers are decoded leniently about presentation (code fences, stray
//! prose around the value) and strictly about shape: the expected top-level
//! sections must be there. Missing leaf fields are filled with the sentinel of
//! their record type rather than rejected. Delimited answers pass through.

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::warn;

use crate::models::candidate::{is_unknown, CandidateProfile, RankedCandidate, UNKNOWN};
use crate::models::job::{JobListing, JOB_SENTINEL};
use crate::workflow::prompts::{EMAIL_CLOSING, EMAIL_GREETING, INSERTION_POINT};
use crate::workflow::{GenerationResult, OutputShape, TaskKind};

/// Search answers are cut to this many candidates.
pub const MAX_RANKED_CANDIDATES: usize = 3;

/// Internal-note lines shorter than this are too generic to count as a leak.
const MIN_LEAK_CHARS: usize = 8;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("model response is not valid JSON")]
    MalformedJson { raw: String },

    #[error("model response is missing '{section}'")]
    MissingSection { section: &'static str, raw: String },
}

impl ParseError {
    /// The unmodified model output, kept for diagnosis.
    pub fn raw(&self) -> &str {
        match self {
            ParseError::MalformedJson { raw } | ParseError::MissingSection { raw, .. } => raw,
        }
    }
}

/// Interprets `raw` as the answer to a `task` prompt rendered with `shape`.
pub fn parse(
    task: TaskKind,
    shape: OutputShape,
    raw: &str,
) -> Result<GenerationResult, ParseError> {
    match (task, shape) {
        (TaskKind::ParseJob, _) => parse_job_listing(raw),
        (TaskKind::Register, OutputShape::StructuredJson) => parse_candidate_profile(raw),
        // A prose ranking is still a usable answer for the agent.
        (TaskKind::Search, OutputShape::StructuredJson) => {
            parse_ranked_candidates(raw).or_else(|e| {
                warn!("Search answer is not a ranked list ({e}); presenting it as text");
                Ok(GenerationResult::DisplayText {
                    display_text: raw.to_string(),
                })
            })
        }
        (TaskKind::Register | TaskKind::Search, OutputShape::Delimited) => {
            Ok(GenerationResult::DisplayText {
                display_text: raw.to_string(),
            })
        }
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from model output.
pub fn strip_code_fences(text: &str) -> &str {
    let text = text.trim();
    let Some(opened) = text.strip_prefix("```") else {
        return text;
    };
    // Drop the info string ("json", "JSON", ...) on the opening fence line.
    let body = match opened.find('\n') {
        Some(newline) if !opened[..newline].contains(['{', '[']) => &opened[newline + 1..],
        _ => opened.trim_start_matches(|c: char| c.is_ascii_alphabetic()),
    };
    body.trim_end()
        .strip_suffix("```")
        .unwrap_or(body)
        .trim()
}

/// Decodes the JSON value in `raw`, falling back to the outermost
/// `open`..`close` span when the model wrapped the value in prose.
fn locate_json(raw: &str, open: char, close: char) -> Result<Value, ParseError> {
    let text = strip_code_fences(raw);
    if let Ok(value) = serde_json::from_str::<Value>(text) {
        return Ok(value);
    }

    text.find(open)
        .zip(text.rfind(close))
        .filter(|(start, end)| start < end)
        .and_then(|(start, end)| serde_json::from_str::<Value>(&text[start..=end]).ok())
        .ok_or_else(|| ParseError::MalformedJson {
            raw: raw.to_string(),
        })
}

fn parse_candidate_profile(raw: &str) -> Result<GenerationResult, ParseError> {
    let value = locate_json(raw, '{', '}')?;
    let root = value.as_object().ok_or_else(|| missing("root object", raw))?;

    let db_data = lookup(root, &["dbData", "db_data"])
        .and_then(Value::as_object)
        .ok_or_else(|| missing("dbData", raw))?;
    let email_content = lookup(root, &["emailContent", "email_content"])
        .and_then(Value::as_str)
        .filter(|email| !email.trim().is_empty())
        .ok_or_else(|| missing("emailContent", raw))?;

    let candidate_field = |keys: &[&str]| {
        let value = text_field(db_data, keys, UNKNOWN);
        if is_unknown(&value) {
            UNKNOWN.to_string()
        } else {
            value
        }
    };

    let db_data = CandidateProfile {
        registered_date: String::new(),
        name: candidate_field(&["name"]),
        age: normalize_age(&candidate_field(&["age"])),
        skills: candidate_field(&["skills"]),
        pr_summary: candidate_field(&["prSummary", "pr_summary"]),
        conditions: candidate_field(&["conditions"]),
    };

    Ok(GenerationResult::CandidateProfile {
        db_data,
        email_content: email_content.to_string(),
    })
}

fn parse_job_listing(raw: &str) -> Result<GenerationResult, ParseError> {
    let value = locate_json(raw, '{', '}')?;
    let root = value.as_object().ok_or_else(|| missing("root object", raw))?;
    // Tolerate the model nesting the row under "jobData".
    let job = lookup(root, &["jobData", "job_data"])
        .and_then(Value::as_object)
        .unwrap_or(root);

    let job_data = JobListing {
        company: text_field(job, &["company"], JOB_SENTINEL),
        title: text_field(job, &["title"], JOB_SENTINEL),
        overview: text_field(job, &["overview"], JOB_SENTINEL),
        responsibilities: text_field(job, &["responsibilities"], JOB_SENTINEL),
        working_conditions: text_field(
            job,
            &["workingConditions", "working_conditions"],
            JOB_SENTINEL,
        ),
        desired_profile: text_field(job, &["desiredProfile", "desired_profile"], JOB_SENTINEL),
        internal_note: text_field(job, &["internalNote", "internal_note"], JOB_SENTINEL),
    };

    Ok(GenerationResult::JobListing { job_data })
}

fn parse_ranked_candidates(raw: &str) -> Result<GenerationResult, ParseError> {
    let value = locate_json(raw, '[', ']').or_else(|_| locate_json(raw, '{', '}'))?;

    let entries = match &value {
        Value::Array(entries) => entries,
        Value::Object(root) => {
            lookup(root, &["rankedCandidates", "ranked_candidates", "candidates"])
                .and_then(Value::as_array)
                .ok_or_else(|| missing("rankedCandidates", raw))?
        }
        _ => return Err(missing("rankedCandidates", raw)),
    };

    if entries.len() > MAX_RANKED_CANDIDATES {
        warn!(
            "Model ranked {} candidates, keeping the first {}",
            entries.len(),
            MAX_RANKED_CANDIDATES
        );
    }

    let ranked_candidates = entries
        .iter()
        .take(MAX_RANKED_CANDIDATES)
        .map(|entry| {
            let entry = entry
                .as_object()
                .ok_or_else(|| missing("rankedCandidates", raw))?;
            Ok(RankedCandidate {
                name: text_field(entry, &["name"], UNKNOWN),
                age: text_field(entry, &["age"], UNKNOWN),
                match_rationale: text_field(entry, &["matchRationale", "match_rationale"], ""),
                concerns: text_field(entry, &["concerns"], ""),
                pitch: text_field(entry, &["pitch"], ""),
            })
        })
        .collect::<Result<Vec<_>, ParseError>>()?;

    Ok(GenerationResult::RankedCandidates { ranked_candidates })
}

fn missing(section: &'static str, raw: &str) -> ParseError {
    ParseError::MissingSection {
        section,
        raw: raw.to_string(),
    }
}

fn lookup<'a>(object: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|key| object.get(*key))
}

/// String form of a scalar field. Absent, null and blank values become
/// `sentinel`; lists are joined with ", ".
fn text_field(object: &Map<String, Value>, keys: &[&str], sentinel: &str) -> String {
    let text = match lookup(object, keys) {
        None | Some(Value::Null) => return sentinel.to_string(),
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.trim().to_string(),
                other => other.to_string(),
            })
            .filter(|item| !item.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        Some(other) => other.to_string(),
    };

    if text.is_empty() {
        sentinel.to_string()
    } else {
        text
    }
}

/// "28歳" and "28才" become "28". Anything else is kept as written.
fn normalize_age(age: &str) -> String {
    let trimmed = age
        .trim()
        .trim_end_matches(['歳', '才'])
        .trim();
    if !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_digit()) {
        trimmed.to_string()
    } else {
        age.to_string()
    }
}

/// What a Register email must do with the job insertion point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertionRule {
    /// Suggestions were requested from listings: the placeholder must be replaced.
    MustBeFilled,
    /// The agent fills it in by hand: the placeholder must stay, once.
    MustBeKept,
    /// No listings to suggest from: the model may keep or fill it.
    Either,
}

/// Checks a structured Register email against the immutable template, the
/// insertion point rule and the internal-only job notes.
///
/// Returns a human-readable reason on violation.
pub fn check_email_contract(
    email: &str,
    internal_notes: &[&str],
    insertion: InsertionRule,
) -> Result<(), String> {
    let greetings = email.matches(EMAIL_GREETING).count();
    if greetings != 1 {
        return Err(format!(
            "email template greeting appears {greetings} times, expected exactly once"
        ));
    }

    let closings = email.matches(EMAIL_CLOSING).count();
    if closings != 1 {
        return Err(format!(
            "email template closing appears {closings} times, expected exactly once"
        ));
    }

    let placeholders = email.matches(INSERTION_POINT).count();
    match insertion {
        InsertionRule::MustBeFilled if placeholders > 0 => {
            return Err(format!(
                "email still contains the insertion point {INSERTION_POINT}"
            ));
        }
        InsertionRule::MustBeKept if placeholders != 1 => {
            return Err(format!(
                "insertion point {INSERTION_POINT} appears {placeholders} times, expected exactly once"
            ));
        }
        _ => {}
    }

    let leaked = internal_notes
        .iter()
        .flat_map(|note| note.lines())
        .map(str::trim)
        .filter(|line| line.chars().count() >= MIN_LEAK_CHARS)
        .any(|line| email.contains(line));
    if leaked {
        return Err("email repeats internal-only job notes".to_string());
    }

    Ok(())
}
