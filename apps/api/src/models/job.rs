use serde::{Deserialize, Serialize};

use crate::models::{cell, SheetRow};

/// Value written for any job field the posting does not state.
pub const JOB_SENTINEL: &str = "";

/// One open position, as stored in the "jobs" sheet.
///
/// `internal_note` is for the agency only and must never reach candidate-facing text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobListing {
    pub company: String,
    pub title: String,
    pub overview: String,
    pub responsibilities: String,
    pub working_conditions: String,
    pub desired_profile: String,
    pub internal_note: String,
}

impl JobListing {
    /// Every field except `internal_note`, in column order.
    pub fn candidate_facing_fields_mut(&mut self) -> [&mut String; 6] {
        [
            &mut self.company,
            &mut self.title,
            &mut self.overview,
            &mut self.responsibilities,
            &mut self.working_conditions,
            &mut self.desired_profile,
        ]
    }
}

impl SheetRow for JobListing {
    const COLUMNS: &'static [&'static str] = &[
        "company",
        "title",
        "overview",
        "responsibilities",
        "workingConditions",
        "desiredProfile",
        "internalNote",
    ];

    fn to_row(&self) -> Vec<String> {
        vec![
            self.company.clone(),
            self.title.clone(),
            self.overview.clone(),
            self.responsibilities.clone(),
            self.working_conditions.clone(),
            self.desired_profile.clone(),
            self.internal_note.clone(),
        ]
    }

    fn from_row(values: &[String]) -> Self {
        Self {
            company: cell(values, 0),
            title: cell(values, 1),
            overview: cell(values, 2),
            responsibilities: cell(values, 3),
            working_conditions: cell(values, 4),
            desired_profile: cell(values, 5),
            internal_note: cell(values, 6),
        }
    }
}
