//! Prompt Builder — renders one instruction document per generation step.
//!
//! Pure and deterministic: the same request and config always produce the same
//! prompt. Context tables are embedded in full, never truncated or summarised.

use crate::llm_client::prompts::{
    JAPANESE_OUTPUT_INSTRUCTION, JSON_ONLY_INSTRUCTION, NO_GUESSING_INSTRUCTION, ROLE_PREAMBLE,
};
use crate::models::candidate::UNKNOWN;
use crate::store::Record;
use crate::workflow::prompts::{
    AUTOMATIC_MATCHING_INSTRUCTION, EMAIL_TEMPLATE, INSERTION_POINT, MANUAL_MATCHING_INSTRUCTION,
    MANUAL_MATCHING_TABLE, NO_INPUT, NO_ROWS, PARSE_JOB_PROMPT_TEMPLATE,
    REGISTER_DELIMITED_PROMPT_TEMPLATE, REGISTER_JSON_PROMPT_TEMPLATE,
    SEARCH_DELIMITED_PROMPT_TEMPLATE, SEARCH_JSON_PROMPT_TEMPLATE,
};
use crate::workflow::{
    GenerationRequest, MatchingMode, OutputShape, TaskKind, WorkflowConfig, INTERVIEW_NOTES,
    RAW_TEXT, RESUME_TEXT, SALES_NOTES,
};

/// Full-width question mark used by the delimited profile block.
const DELIMITED_UNKNOWN: &str = "「？」";

/// Renders the prompt for `request`. Blank inputs are rendered as
/// placeholders; callers reject them before a prompt is built.
pub fn build_prompt(request: &GenerationRequest, config: &WorkflowConfig) -> String {
    match request.task {
        TaskKind::Register => build_register_prompt(request, config),
        TaskKind::ParseJob => build_parse_job_prompt(request, config),
        TaskKind::Search => build_search_prompt(request, config),
    }
}

fn build_register_prompt(request: &GenerationRequest, config: &WorkflowConfig) -> String {
    let notes = request.input(INTERVIEW_NOTES);
    let resume = request.input(RESUME_TEXT);

    let (matching_instruction, job_table) = match config.matching_mode {
        MatchingMode::AutomaticSuggestion => (
            AUTOMATIC_MATCHING_INSTRUCTION,
            render_table(&request.context),
        ),
        MatchingMode::ManualPlaceholder => {
            (MANUAL_MATCHING_INSTRUCTION, MANUAL_MATCHING_TABLE.to_string())
        }
    };
    let matching_instruction =
        fill_template(matching_instruction, &[("insertion_point", INSERTION_POINT)]);

    let (template, sentinel) = match config.output_shape {
        OutputShape::StructuredJson => (REGISTER_JSON_PROMPT_TEMPLATE, format!("\"{UNKNOWN}\"")),
        OutputShape::Delimited => (
            REGISTER_DELIMITED_PROMPT_TEMPLATE,
            DELIMITED_UNKNOWN.to_string(),
        ),
    };
    let no_guessing =
        fill_template(NO_GUESSING_INSTRUCTION, &[("sentinel", sentinel.as_str())]);

    fill_template(
        template,
        &[
            ("preamble", ROLE_PREAMBLE),
            ("notes", or_placeholder(notes)),
            ("resume", or_placeholder(resume)),
            ("job_table", job_table.as_str()),
            ("matching_instruction", matching_instruction.as_str()),
            ("no_guessing", no_guessing.as_str()),
            ("japanese", JAPANESE_OUTPUT_INSTRUCTION),
            ("json_only", JSON_ONLY_INSTRUCTION),
            ("email_template", EMAIL_TEMPLATE),
        ],
    )
}

fn build_parse_job_prompt(request: &GenerationRequest, config: &WorkflowConfig) -> String {
    let raw_text = request.input(RAW_TEXT);

    fill_template(
        PARSE_JOB_PROMPT_TEMPLATE,
        &[
            ("preamble", ROLE_PREAMBLE),
            ("raw_text", raw_text),
            ("cutoff_marker", config.cutoff_marker.as_str()),
            ("japanese", JAPANESE_OUTPUT_INSTRUCTION),
            ("json_only", JSON_ONLY_INSTRUCTION),
        ],
    )
}

fn build_search_prompt(request: &GenerationRequest, config: &WorkflowConfig) -> String {
    let sales_notes = request.input(SALES_NOTES);

    let template = match config.output_shape {
        OutputShape::StructuredJson => SEARCH_JSON_PROMPT_TEMPLATE,
        OutputShape::Delimited => SEARCH_DELIMITED_PROMPT_TEMPLATE,
    };

    let candidate_table = render_table(&request.context);

    fill_template(
        template,
        &[
            ("preamble", ROLE_PREAMBLE),
            ("sales_notes", sales_notes),
            ("candidate_table", candidate_table.as_str()),
            ("japanese", JAPANESE_OUTPUT_INSTRUCTION),
            ("json_only", JSON_ONLY_INSTRUCTION),
        ],
    )
}

fn or_placeholder(text: &str) -> &str {
    if text.trim().is_empty() {
        NO_INPUT
    } else {
        text
    }
}

/// Renders records as a pipe-delimited table: a header line, then one line per
/// record in store order. Line breaks inside cells are flattened so every
/// record stays on one line.
pub fn render_table(records: &[Record]) -> String {
    let Some(first) = records.first() else {
        return NO_ROWS.to_string();
    };

    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(first.headers().collect::<Vec<_>>().join(" | "));
    for record in records {
        lines.push(
            record
                .values()
                .map(flatten_cell)
                .collect::<Vec<_>>()
                .join(" | "),
        );
    }
    lines.join("\n")
}

fn flatten_cell(value: &str) -> String {
    value
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" / ")
        .replace('|', "｜")
}

/// Replaces `{key}` placeholders in one left-to-right pass.
///
/// Substituted values are not scanned again, so user text that happens to
/// contain `{notes}` or similar is embedded verbatim. Braces that do not name
/// a known key are kept.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let replacement = after.find('}').and_then(|close| {
            let key = &after[..close];
            values
                .iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| (*value, close))
        });

        match replacement {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}
