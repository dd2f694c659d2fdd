// All prompt templates for the recruiting workflows.
// Placeholders are `{name}` and are filled in a single pass by
// prompt_builder::fill_template; unknown braces (JSON examples) are kept.

/// Greeting line of the outreach email. The model must not alter it.
pub const EMAIL_GREETING: &str = "お世話になっております。プロの副業の中島です。";

/// Closing line of the outreach email. The model must not alter it.
pub const EMAIL_CLOSING: &str = "引き続きよろしくお願いいたします。";

/// The single substitution point for selected job details.
pub const INSERTION_POINT: &str = "[ここに推奨案件を挿入]";

/// Replaced by the candidate's name.
pub const NAME_PLACEHOLDER: &str = "[氏名]";

/// Immutable outreach email template.
pub const EMAIL_TEMPLATE: &str = "[氏名] 様

お世話になっております。プロの副業の中島です。

本日はお忙しい所貴重なお時間を頂きまして、誠にありがとうございました。
また、今後案件をご紹介させて頂くにあたり、
こちらのメールにて職務経歴書をお送りいただくことは可能でしょうか。

今後マッチングした案件をご紹介できればと思いますので、
何卒よろしくお願いいたします。

下記案件概要になります。
よろしければご確認いただけますと幸いです。

[ここに推奨案件を挿入]

何卒ご確認いただけますと幸いです。
引き続きよろしくお願いいたします。";

/// Rendered in place of an empty table.
pub const NO_ROWS: &str = "(no rows registered)";

/// Rendered in place of a blank free-text input.
pub const NO_INPUT: &str = "(not provided)";

/// Rendered in place of the job table when matching is manual.
pub const MANUAL_MATCHING_TABLE: &str = "(not provided: the agent selects listings by hand)";

pub const AUTOMATIC_MATCHING_INSTRUCTION: &str = "Select the listings from JOB LISTINGS that \
    best fit the candidate. Write them (title, conditions, reason for the selection) in place \
    of the line \"{insertion_point}\" and nowhere else in the email.";

pub const MANUAL_MATCHING_INSTRUCTION: &str = "Do NOT select any listing. Keep the line \
    \"{insertion_point}\" in the email exactly as written; the agent fills it in by hand.";

/// Register with structured output.
/// Replace: {preamble}, {notes}, {resume}, {job_table}, {matching_instruction},
///          {no_guessing}, {japanese}, {json_only}, {email_template}
pub const REGISTER_JSON_PROMPT_TEMPLATE: &str = r#"{preamble}

Using the INTERVIEW NOTES, the RESUME TEXT and the JOB LISTINGS below, extract the candidate's profile and write the outreach email.

INTERVIEW NOTES:
{notes}

RESUME TEXT:
{resume}

JOB LISTINGS:
{job_table}

RULES:
1. {no_guessing}
2. Copy the EMAIL TEMPLATE character for character. Do NOT change, add or remove any greeting or closing sentence.
3. Replace "[氏名]" with the candidate's name.
4. {matching_instruction}
5. The "internalNote" column is internal to the agency. NEVER quote, paraphrase or hint at its contents anywhere in your answer.
6. {japanese}
7. {json_only}

Return a JSON object with this EXACT schema (no extra fields):
{
  "dbData": {
    "name": "the candidate's name as written in the notes",
    "age": "age in years, digits only",
    "skills": "skills and job types the candidate can take on",
    "prSummary": "short summary of the candidate's strengths",
    "conditions": "hourly rate, available hours, on-site availability and place of residence"
  },
  "emailContent": "the completed email"
}

EMAIL TEMPLATE:
{email_template}"#;

/// Register with delimited output: the profile block followed by the email block.
/// Replace: {preamble}, {notes}, {resume}, {job_table}, {matching_instruction},
///          {no_guessing}, {email_template}
pub const REGISTER_DELIMITED_PROMPT_TEMPLATE: &str = r#"{preamble}

Using the INTERVIEW NOTES, the RESUME TEXT and the JOB LISTINGS below, fill in the OUTPUT FORMAT exactly.

INTERVIEW NOTES:
{notes}

RESUME TEXT:
{resume}

JOB LISTINGS:
{job_table}

RULES:
1. {no_guessing}
2. Use the email part word for word. Do NOT change any greeting or closing sentence.
3. {matching_instruction}
4. The "internalNote" column is internal to the agency. NEVER quote, paraphrase or hint at its contents.
5. Output only the two blocks below, nothing before or after them.

OUTPUT FORMAT:
--------------------------------------------------
【新規/既存】[新規か既存か判定]
氏名：[氏名]
年齢：[年齢]
時給：[時給]
対応可能職種：[職種]
稼動可能時間：[時間]
対面稼動可否：[可否]
在住：[在住地]
PR文：[PR文を要約]
--------------------------------------------------

--------------------------------------------------
{email_template}
--------------------------------------------------"#;

/// Job posting to listing row.
/// Replace: {preamble}, {raw_text}, {cutoff_marker}, {japanese}, {json_only}
pub const PARSE_JOB_PROMPT_TEMPLATE: &str = r#"{preamble}

Convert the JOB POSTING below into one structured job listing.

JOB POSTING:
{raw_text}

RULES:
1. Return exactly these seven keys: company, title, overview, responsibilities, workingConditions, desiredProfile, internalNote.
2. Use an empty string "" for any value the posting does not state. Never invent details.
3. Everything after the marker "{cutoff_marker}" is internal to the agency. Put ALL of it, unchanged, into "internalNote" and use none of it in any other key.
4. If the marker "{cutoff_marker}" does not appear, "internalNote" must be "".
5. Keep the posting's own wording; only "overview" may be summarised. {japanese}
6. {json_only}

Return a JSON object with this EXACT schema (no extra fields):
{
  "company": "company name",
  "title": "position title",
  "overview": "short overview of the position",
  "responsibilities": "what the person will do",
  "workingConditions": "pay, hours, location, remote policy",
  "desiredProfile": "required and preferred experience",
  "internalNote": "text after the internal marker, or empty"
}"#;

/// Candidate search, structured output.
/// Replace: {preamble}, {sales_notes}, {candidate_table}, {japanese}, {json_only}
pub const SEARCH_JSON_PROMPT_TEMPLATE: &str = r#"{preamble}

A client meeting produced the SALES NOTES below. Pick the registered candidates who best solve the client's problem.

SALES NOTES:
{sales_notes}

REGISTERED CANDIDATES:
{candidate_table}

RULES:
1. Select AT MOST 3 candidates, best match first. Only select candidates listed above.
2. "matchRationale": why this candidate fits the client's needs.
3. "concerns": risks or gaps; write "なし" if there are none.
4. "pitch": one ready-to-send sentence that names the candidate and a concrete pain point from the sales notes.
5. {japanese}
6. {json_only}

Return a JSON array with this EXACT schema (no extra fields):
[
  {
    "name": "candidate name",
    "age": "candidate age",
    "matchRationale": "why they fit",
    "concerns": "risks or なし",
    "pitch": "ready-to-send sentence"
  }
]"#;

/// Candidate search, delimited output.
/// Replace: {preamble}, {sales_notes}, {candidate_table}, {japanese}
pub const SEARCH_DELIMITED_PROMPT_TEMPLATE: &str = r#"{preamble}

A client meeting produced the SALES NOTES below. Pick the registered candidates who best solve the client's problem.

SALES NOTES:
{sales_notes}

REGISTERED CANDIDATES:
{candidate_table}

RULES:
1. Select AT MOST 3 candidates, best match first. Only select candidates listed above.
2. For each candidate output exactly this block and nothing else:

### [順位]. [氏名]（[年齢]）
■ マッチ理由：[why this candidate fits the client's needs]
■ 懸念点：[risks or gaps, or なし]
■ 提案トーク：[one ready-to-send sentence naming the candidate and a concrete pain point from the sales notes]

3. {japanese}"#;
