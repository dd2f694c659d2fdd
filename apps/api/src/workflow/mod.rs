// Recruiting workflows: candidate registration, job parsing, candidate search.
// Prompt construction, response interpretation and orchestration live here;
// every model call goes through llm_client, every row through store.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::models::candidate::{CandidateProfile, RankedCandidate};
use crate::models::job::JobListing;
use crate::store::Record;

pub mod cutoff;
pub mod handlers;
pub mod interpreter;
pub mod orchestrator;
pub mod prompt_builder;
pub mod prompts;

/// Names of the free-text blocks a `GenerationRequest` can carry.
pub const INTERVIEW_NOTES: &str = "interviewNotes";
pub const RESUME_TEXT: &str = "resumeText";
pub const RAW_TEXT: &str = "rawText";
pub const SALES_NOTES: &str = "salesNotes";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    Register,
    ParseJob,
    Search,
}

/// How the model is asked to shape Register and Search answers.
/// ParseJob always answers in JSON.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputShape {
    /// Human-readable blocks, shown as-is and never persisted.
    Delimited,
    #[default]
    StructuredJson,
}

impl FromStr for OutputShape {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" | "structured" | "structured_json" => Ok(Self::StructuredJson),
            "delimited" | "text" => Ok(Self::Delimited),
            other => Err(format!(
                "unknown output shape '{other}' (expected 'json' or 'delimited')"
            )),
        }
    }
}

/// Whether the model picks job listings for the outreach email.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchingMode {
    #[default]
    AutomaticSuggestion,
    /// Job listings are not loaded; the insertion point stays in the email for
    /// the agent to fill in.
    ManualPlaceholder,
}

impl FromStr for MatchingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" | "automatic" | "automatic_suggestion" => Ok(Self::AutomaticSuggestion),
            "manual" | "placeholder" | "manual_placeholder" => Ok(Self::ManualPlaceholder),
            other => Err(format!(
                "unknown matching mode '{other}' (expected 'auto' or 'manual')"
            )),
        }
    }
}

/// Everything a workflow run needs to know besides its inputs.
/// Passed explicitly into every orchestrator call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowConfig {
    pub store_name: String,
    pub jobs_sheet: String,
    pub candidates_sheet: String,
    pub output_shape: OutputShape,
    pub matching_mode: MatchingMode,
    pub cutoff_marker: String,
}

impl WorkflowConfig {
    /// Same settings against another store, when the request names one.
    pub fn for_store(&self, store_name: Option<&str>) -> Self {
        let mut config = self.clone();
        if let Some(name) = store_name.map(str::trim).filter(|n| !n.is_empty()) {
            config.store_name = name.to_string();
        }
        config
    }
}

/// One generation step's inputs. Built and consumed within a single workflow run.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub task: TaskKind,
    pub inputs: BTreeMap<&'static str, String>,
    pub context: Vec<Record>,
}

impl GenerationRequest {
    pub fn register(notes: &str, resume_text: &str, job_listings: Vec<Record>) -> Self {
        Self {
            task: TaskKind::Register,
            inputs: BTreeMap::from([
                (INTERVIEW_NOTES, notes.to_string()),
                (RESUME_TEXT, resume_text.to_string()),
            ]),
            context: job_listings,
        }
    }

    pub fn parse_job(raw_text: &str) -> Self {
        Self {
            task: TaskKind::ParseJob,
            inputs: BTreeMap::from([(RAW_TEXT, raw_text.to_string())]),
            context: Vec::new(),
        }
    }

    pub fn search(sales_notes: &str, candidates: Vec<Record>) -> Self {
        Self {
            task: TaskKind::Search,
            inputs: BTreeMap::from([(SALES_NOTES, sales_notes.to_string())]),
            context: candidates,
        }
    }

    /// A named input, or "" when absent.
    pub fn input(&self, name: &str) -> &str {
        self.inputs.get(name).map(String::as_str).unwrap_or_default()
    }
}

/// A parsed model answer. The expected variant depends on the task kind and
/// output shape; see `interpreter::parse`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GenerationResult {
    DisplayText {
        #[serde(rename = "displayText")]
        display_text: String,
    },
    CandidateProfile {
        #[serde(rename = "dbData")]
        db_data: CandidateProfile,
        #[serde(rename = "emailContent")]
        email_content: String,
    },
    JobListing {
        #[serde(rename = "jobData")]
        job_data: JobListing,
    },
    RankedCandidates {
        #[serde(rename = "rankedCandidates")]
        ranked_candidates: Vec<RankedCandidate>,
    },
}
