use serde::{Deserialize, Serialize};

use crate::models::{cell, SheetRow};

/// Value written for any candidate field the notes do not state.
pub const UNKNOWN: &str = "?";

/// True for blank values and both the ASCII and full-width question mark.
pub fn is_unknown(value: &str) -> bool {
    matches!(value.trim(), "" | "?" | "？")
}

/// A registered candidate, as stored in the "candidates" sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateProfile {
    /// Stamped at persistence time, never taken from the model.
    pub registered_date: String,
    pub name: String,
    pub age: String,
    pub skills: String,
    pub pr_summary: String,
    pub conditions: String,
}

impl SheetRow for CandidateProfile {
    const COLUMNS: &'static [&'static str] = &[
        "registeredDate",
        "name",
        "age",
        "skills",
        "prSummary",
        "conditions",
    ];

    fn to_row(&self) -> Vec<String> {
        vec![
            self.registered_date.clone(),
            self.name.clone(),
            self.age.clone(),
            self.skills.clone(),
            self.pr_summary.clone(),
            self.conditions.clone(),
        ]
    }

    fn from_row(values: &[String]) -> Self {
        Self {
            registered_date: cell(values, 0),
            name: cell(values, 1),
            age: cell(values, 2),
            skills: cell(values, 3),
            pr_summary: cell(values, 4),
            conditions: cell(values, 5),
        }
    }
}

/// One entry of a candidate search answer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedCandidate {
    pub name: String,
    pub age: String,
    pub match_rationale: String,
    /// "なし" or empty when the model found nothing to flag.
    pub concerns: String,
    pub pitch: String,
}
