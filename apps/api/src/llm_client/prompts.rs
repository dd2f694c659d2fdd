// Shared prompt fragments.
// Each workflow defines its own templates in workflow/prompts.rs; this file
// holds the pieces every task reuses.

/// Opening line of every prompt.
pub const ROLE_PREAMBLE: &str = "You are the meticulous assistant of a recruiting agent \
    at a Japanese staffing agency. Follow the output format below exactly.";

/// Appended to prompts whose answer is parsed as JSON.
pub const JSON_ONLY_INSTRUCTION: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON value. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Forbids guessing. Replace `{sentinel}` with the task's placeholder value.
pub const NO_GUESSING_INSTRUCTION: &str = "Use ONLY facts stated in the input. \
    If a value is not stated, do NOT guess: write {sentinel} instead.";

/// Output language for every generated value.
pub const JAPANESE_OUTPUT_INSTRUCTION: &str =
    "Write every generated value in natural business Japanese.";
