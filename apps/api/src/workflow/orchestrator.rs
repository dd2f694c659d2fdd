//! Workflow Orchestrator — sequences one user action end to end.
//!
//! Flows:
//!   register:  extract résumé → load job listings → generate → interpret →
//!              persist profile (non-fatal) → present email
//!   parse_job: open store → generate → interpret → enforce cutoff →
//!              persist listing (fatal) → present preview
//!   search:    load candidates (empty ⇒ fail fast) → generate → interpret →
//!              present ranked list
//!
//! Nothing is retried. Every run is serial and shares no state beyond the store.

use chrono::Local;
use serde::Serialize;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::extraction::{extract_text, Document};
use crate::llm_client::TextGenerator;
use crate::models::candidate::CandidateProfile;
use crate::models::job::JobListing;
use crate::store::{append_typed, Record, RecordStore, StoreHandle};
use crate::workflow::cutoff::enforce_internal_cutoff;
use crate::workflow::interpreter::{check_email_contract, parse, InsertionRule};
use crate::workflow::prompt_builder::build_prompt;
use crate::workflow::{
    GenerationRequest, GenerationResult, MatchingMode, OutputShape, TaskKind, WorkflowConfig,
};

// ────────────────────────────────────────────────────────────────────────────
// Inputs / Outcomes
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct RegisterInput {
    pub notes: String,
    pub document: Option<Document>,
}

/// What happened to the candidate row after a successful generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PersistenceStatus {
    Stored,
    /// Delimited answers carry no structured profile to store.
    Skipped,
    Failed { message: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterOutcome {
    pub result: GenerationResult,
    /// The stored profile, with its registration date.
    pub profile: Option<CandidateProfile>,
    /// The text shown to the agent: the email, or the whole delimited answer.
    pub email: String,
    pub persistence: PersistenceStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct ParseJobOutcome {
    pub job: JobListing,
    /// The values appended, in column order.
    pub persisted_row: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchOutcome {
    pub candidates_considered: usize,
    pub result: GenerationResult,
}

// ────────────────────────────────────────────────────────────────────────────
// Orchestrator
// ────────────────────────────────────────────────────────────────────────────

/// One workflow invocation's collaborators and settings.
pub struct Workflow<'a> {
    pub store: &'a dyn RecordStore,
    pub generator: &'a dyn TextGenerator,
    pub config: &'a WorkflowConfig,
}

impl<'a> Workflow<'a> {
    pub fn new(
        store: &'a dyn RecordStore,
        generator: &'a dyn TextGenerator,
        config: &'a WorkflowConfig,
    ) -> Self {
        Self {
            store,
            generator,
            config,
        }
    }

    /// Registers a candidate from interview notes and an optional résumé and
    /// drafts the outreach email.
    ///
    /// A failed append does not fail the action: the email is still returned
    /// and the failure is reported in `persistence`.
    pub async fn register(&self, input: RegisterInput) -> Result<RegisterOutcome, AppError> {
        let resume_text = match &input.document {
            Some(document) => extract_text(document).await,
            None => String::new(),
        };
        if input.notes.trim().is_empty() && resume_text.is_empty() {
            return Err(AppError::Validation(
                "interview notes or a readable resume is required".to_string(),
            ));
        }

        let handle = self.open().await?;

        // Listings are read by position: the sheet's own header may be
        // localized, so the internal note is always the schema's last column.
        let jobs: Vec<JobListing> = match self.config.matching_mode {
            MatchingMode::AutomaticSuggestion => {
                let records = self
                    .store
                    .read_sheet(&handle, &self.config.jobs_sheet)
                    .await?;
                if records.is_empty() {
                    warn!(
                        "Sheet '{}' has no job listings; registering without suggestions",
                        self.config.jobs_sheet
                    );
                }
                info!("Loaded {} job listings", records.len());
                records.iter().map(Record::decode::<JobListing>).collect()
            }
            MatchingMode::ManualPlaceholder => Vec::new(),
        };
        let insertion = match self.config.matching_mode {
            MatchingMode::ManualPlaceholder => InsertionRule::MustBeKept,
            MatchingMode::AutomaticSuggestion if jobs.is_empty() => InsertionRule::Either,
            MatchingMode::AutomaticSuggestion => InsertionRule::MustBeFilled,
        };
        let internal_notes: Vec<&str> = jobs
            .iter()
            .map(|job| job.internal_note.as_str())
            .filter(|note| !note.trim().is_empty())
            .collect();
        let job_listings = jobs.iter().map(Record::from_typed).collect();

        let request = GenerationRequest::register(&input.notes, &resume_text, job_listings);
        let (result, raw) = self.generate(&request).await?;

        let (mut profile, email) = match result.clone() {
            GenerationResult::CandidateProfile {
                db_data,
                email_content,
            } => (db_data, email_content),
            GenerationResult::DisplayText { display_text } => {
                info!("Delimited answer: presenting without persisting");
                return Ok(RegisterOutcome {
                    result,
                    profile: None,
                    email: display_text,
                    persistence: PersistenceStatus::Skipped,
                });
            }
            other => return Err(unexpected_variant(&other)),
        };

        if let Err(reason) = check_email_contract(&email, &internal_notes, insertion) {
            return Err(AppError::MalformedResponse { reason, raw });
        }

        profile.registered_date = Local::now().format("%Y-%m-%d").to_string();
        let persistence = match append_typed(
            self.store,
            &handle,
            &self.config.candidates_sheet,
            &profile,
        )
        .await
        {
            Ok(_) => {
                info!("Stored candidate '{}'", profile.name);
                PersistenceStatus::Stored
            }
            Err(e) => {
                warn!("Candidate '{}' was not stored: {e}", profile.name);
                PersistenceStatus::Failed {
                    message: e.to_string(),
                }
            }
        };

        Ok(RegisterOutcome {
            result,
            profile: Some(profile),
            email,
            persistence,
        })
    }

    /// Converts a raw job posting into a listing and appends it to the jobs sheet.
    pub async fn parse_job(&self, raw_text: &str) -> Result<ParseJobOutcome, AppError> {
        if raw_text.trim().is_empty() {
            return Err(AppError::Validation(
                "job posting text is required".to_string(),
            ));
        }

        let handle = self.open().await?;

        let request = GenerationRequest::parse_job(raw_text);
        let mut job = match self.generate(&request).await?.0 {
            GenerationResult::JobListing { job_data } => job_data,
            other => return Err(unexpected_variant(&other)),
        };

        if enforce_internal_cutoff(&mut job, raw_text, &self.config.cutoff_marker) {
            info!("Internal section split off at '{}'", self.config.cutoff_marker);
        }

        let persisted_row = append_typed(self.store, &handle, &self.config.jobs_sheet, &job)
            .await
            .map_err(|e| AppError::Persistence(e.to_string()))?;
        info!("Stored job '{}' / '{}'", job.company, job.title);

        Ok(ParseJobOutcome { job, persisted_row })
    }

    /// Ranks stored candidates against sales notes.
    ///
    /// Fails with `EmptyStore` before any generation when no candidate is stored.
    pub async fn search(&self, sales_notes: &str) -> Result<SearchOutcome, AppError> {
        if sales_notes.trim().is_empty() {
            return Err(AppError::Validation("sales notes are required".to_string()));
        }

        let handle = self.open().await?;
        let candidates = self
            .store
            .read_sheet(&handle, &self.config.candidates_sheet)
            .await?;
        if candidates.is_empty() {
            return Err(AppError::EmptyStore(self.config.candidates_sheet.clone()));
        }
        let candidates_considered = candidates.len();
        info!("Loaded {candidates_considered} candidates");

        let request = GenerationRequest::search(sales_notes, candidates);
        let (result, _) = self.generate(&request).await?;

        Ok(SearchOutcome {
            candidates_considered,
            result,
        })
    }

    async fn open(&self) -> Result<StoreHandle, AppError> {
        let handle = self.store.open_store(&self.config.store_name).await?;
        info!("Opened store '{}'", handle.name);
        Ok(handle)
    }

    /// Returns the interpreted answer along with the model's unmodified text.
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<(GenerationResult, String), AppError> {
        let prompt = build_prompt(request, self.config);
        info!(
            "Generating {:?} with {} ({} chars of prompt)",
            request.task,
            self.generator.model(),
            prompt.chars().count()
        );

        let raw = self.generator.generate(&prompt).await?;
        let result = parse(request.task, self.output_shape(request), &raw)?;
        info!("Interpreted {:?} answer", request.task);
        Ok((result, raw))
    }

    fn output_shape(&self, request: &GenerationRequest) -> OutputShape {
        match request.task {
            TaskKind::ParseJob => OutputShape::StructuredJson,
            _ => self.config.output_shape,
        }
    }
}

fn unexpected_variant(result: &GenerationResult) -> AppError {
    AppError::Internal(anyhow::anyhow!(
        "interpreter returned an unexpected result: {result:?}"
    ))
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;
    use crate::llm_client::scripted::ScriptedGenerator;
    use crate::llm_client::GenerationError;
    use crate::models::candidate::UNKNOWN;
    use crate::models::SheetRow;
    use crate::store::memory::MemoryStore;
    use crate::workflow::prompts::{
        EMAIL_CLOSING, EMAIL_GREETING, EMAIL_TEMPLATE, INSERTION_POINT, NAME_PLACEHOLDER,
    };

    const STORE: &str = "案件管理DB";
    const MARKER: &str = "【社内限定】";

    fn config() -> WorkflowConfig {
        WorkflowConfig {
            store_name: STORE.to_string(),
            jobs_sheet: "jobs".to_string(),
            candidates_sheet: "candidates".to_string(),
            output_shape: OutputShape::StructuredJson,
            matching_mode: MatchingMode::AutomaticSuggestion,
            cutoff_marker: MARKER.to_string(),
        }
    }

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn acme_store() -> MemoryStore {
        let store = MemoryStore::with_store(STORE);
        store.seed(
            STORE,
            "jobs",
            vec![
                strings(JobListing::COLUMNS),
                strings(&[
                    "ACME",
                    "Backend Dev",
                    "決済基盤の開発",
                    "API設計",
                    "時給4000円",
                    "Python経験3年以上",
                    "クライアントは30代までを希望",
                ]),
            ],
        );
        store
    }

    fn tanaka_email() -> String {
        EMAIL_TEMPLATE
            .replace(NAME_PLACEHOLDER, "田中さん")
            .replace(INSERTION_POINT, "ACME / Backend Dev / 時給4000円")
    }

    fn tanaka_answer() -> String {
        serde_json::json!({
            "dbData": {
                "name": "田中さん",
                "age": "28歳",
                "skills": "Python",
                "prSummary": "?",
                "conditions": "?"
            },
            "emailContent": tanaka_email()
        })
        .to_string()
    }

    fn tanaka() -> RegisterInput {
        RegisterInput {
            notes: "田中さん、28歳、Pythonが得意".to_string(),
            document: None,
        }
    }

    #[tokio::test]
    async fn test_register_scenario_stores_profile_and_presents_email() {
        let store = acme_store();
        let generator = ScriptedGenerator::answering(tanaka_answer());
        let config = config();

        let outcome = Workflow::new(&store, &generator, &config)
            .register(tanaka())
            .await
            .unwrap();

        let profile = outcome.profile.unwrap();
        assert_eq!(profile.name, "田中さん");
        assert_eq!(profile.age, "28");
        assert!(profile.skills.contains("Python"));
        assert_eq!(profile.pr_summary, UNKNOWN);
        assert!(!profile.registered_date.is_empty());

        assert_eq!(outcome.email.matches(EMAIL_GREETING).count(), 1);
        assert_eq!(outcome.email.matches(EMAIL_CLOSING).count(), 1);
        assert!(outcome.email.contains("ACME / Backend Dev"));
        assert_eq!(outcome.persistence, PersistenceStatus::Stored);

        let rows = store.rows(STORE, "candidates");
        assert_eq!(rows[0], strings(CandidateProfile::COLUMNS));
        assert_eq!(rows[1][1], "田中さん");
        assert_eq!(rows[1][2], "28");

        let prompt = &generator.prompts()[0];
        assert!(prompt.contains("田中さん、28歳、Pythonが得意"));
        assert!(prompt.contains("ACME"));
    }

    #[tokio::test]
    async fn test_register_persistence_failure_is_reported_not_fatal() {
        let store = acme_store();
        store.fail_appends();
        let generator = ScriptedGenerator::answering(tanaka_answer());
        let config = config();

        let outcome = Workflow::new(&store, &generator, &config)
            .register(tanaka())
            .await
            .unwrap();

        assert!(matches!(
            outcome.persistence,
            PersistenceStatus::Failed { .. }
        ));
        assert!(outcome.email.contains(EMAIL_GREETING));
        assert!(store.rows(STORE, "candidates").is_empty());
    }

    #[tokio::test]
    async fn test_register_rejects_email_leaking_internal_note() {
        let store = acme_store();
        let leaked = tanaka_email().replace("ACME / Backend Dev", "クライアントは30代までを希望");
        let answer = serde_json::json!({
            "dbData": {"name": "田中さん"},
            "emailContent": leaked
        });
        let generator = ScriptedGenerator::answering(answer.to_string());
        let config = config();

        let err = Workflow::new(&store, &generator, &config)
            .register(tanaka())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::MalformedResponse { .. }));
        assert!(store.rows(STORE, "candidates").is_empty());
    }

    #[tokio::test]
    async fn test_register_reads_internal_note_by_position_under_localized_headers() {
        let store = MemoryStore::with_store(STORE);
        store.seed(
            STORE,
            "jobs",
            vec![
                strings(&["会社名", "職種", "概要", "業務内容", "条件", "求める人物像", "社内メモ"]),
                strings(&[
                    "ACME",
                    "Backend Dev",
                    "決済基盤の開発",
                    "API設計",
                    "時給4000円",
                    "Python経験3年以上",
                    "クライアントは30代までを希望",
                ]),
            ],
        );
        let leaked = tanaka_email().replace("ACME / Backend Dev", "クライアントは30代までを希望");
        let answer = serde_json::json!({
            "dbData": {"name": "田中さん"},
            "emailContent": leaked
        });
        let generator = ScriptedGenerator::answering(answer.to_string());
        let config = config();

        let err = Workflow::new(&store, &generator, &config)
            .register(tanaka())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::MalformedResponse { .. }));
        assert!(store.rows(STORE, "candidates").is_empty());

        // The listing table is rendered with schema column names.
        let prompt = &generator.prompts()[0];
        assert!(prompt.contains(&JobListing::COLUMNS.join(" | ")));
        assert!(!prompt.contains("社内メモ"));
    }

    #[tokio::test]
    async fn test_register_contract_failure_keeps_full_model_output() {
        let store = acme_store();
        let leaked = tanaka_email().replace("ACME / Backend Dev", "クライアントは30代までを希望");
        let answer = serde_json::json!({
            "dbData": {"name": "田中さん", "skills": "Python"},
            "emailContent": leaked
        })
        .to_string();
        let generator = ScriptedGenerator::answering(answer.clone());
        let config = config();

        let err = Workflow::new(&store, &generator, &config)
            .register(tanaka())
            .await
            .unwrap_err();

        match err {
            AppError::MalformedResponse { raw, .. } => {
                assert_eq!(raw, answer);
                assert!(raw.contains("dbData"));
            }
            other => panic!("expected MalformedResponse, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_register_rejects_unfilled_insertion_point_when_listings_exist() {
        let store = acme_store();
        let email = EMAIL_TEMPLATE.replace(NAME_PLACEHOLDER, "田中さん");
        let answer = serde_json::json!({"dbData": {"name": "田中さん"}, "emailContent": email});
        let generator = ScriptedGenerator::answering(answer.to_string());
        let config = config();

        let err = Workflow::new(&store, &generator, &config)
            .register(tanaka())
            .await
            .unwrap_err();

        match err {
            AppError::MalformedResponse { reason, .. } => {
                assert!(reason.contains(INSERTION_POINT))
            }
            other => panic!("expected MalformedResponse, got {other:?}"),
        }
        assert!(store.rows(STORE, "candidates").is_empty());
    }

    #[tokio::test]
    async fn test_register_manual_matching_rejects_filled_insertion_point() {
        let store = acme_store();
        let generator = ScriptedGenerator::answering(tanaka_answer());
        let config = WorkflowConfig {
            matching_mode: MatchingMode::ManualPlaceholder,
            ..config()
        };

        let err = Workflow::new(&store, &generator, &config)
            .register(tanaka())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::MalformedResponse { .. }));
        assert!(store.rows(STORE, "candidates").is_empty());
    }

    #[tokio::test]
    async fn test_register_malformed_answer_keeps_raw_output() {
        let store = acme_store();
        let generator = ScriptedGenerator::answering("情報が不足しています");
        let config = config();

        let err = Workflow::new(&store, &generator, &config)
            .register(tanaka())
            .await
            .unwrap_err();

        match err {
            AppError::MalformedResponse { raw, .. } => assert_eq!(raw, "情報が不足しています"),
            other => panic!("expected MalformedResponse, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_register_delimited_is_presented_and_skipped() {
        let store = acme_store();
        let generator = ScriptedGenerator::answering("氏名：田中さん\n年齢：28");
        let config = WorkflowConfig {
            output_shape: OutputShape::Delimited,
            ..config()
        };

        let outcome = Workflow::new(&store, &generator, &config)
            .register(tanaka())
            .await
            .unwrap();

        assert_eq!(outcome.persistence, PersistenceStatus::Skipped);
        assert_eq!(outcome.email, "氏名：田中さん\n年齢：28");
        assert!(outcome.profile.is_none());
        assert!(store.rows(STORE, "candidates").is_empty());
    }

    #[tokio::test]
    async fn test_register_manual_matching_skips_job_listings() {
        let store = acme_store();
        let email = EMAIL_TEMPLATE.replace(NAME_PLACEHOLDER, "田中さん");
        let answer = serde_json::json!({"dbData": {"name": "田中さん"}, "emailContent": email});
        let generator = ScriptedGenerator::answering(answer.to_string());
        let config = WorkflowConfig {
            matching_mode: MatchingMode::ManualPlaceholder,
            ..config()
        };

        let outcome = Workflow::new(&store, &generator, &config)
            .register(tanaka())
            .await
            .unwrap();

        assert!(outcome.email.contains(INSERTION_POINT));
        assert!(!generator.prompts()[0].contains("Backend Dev"));
    }

    #[tokio::test]
    async fn test_register_reads_text_resume_when_notes_are_blank() {
        let store = acme_store();
        let generator = ScriptedGenerator::answering(tanaka_answer());
        let config = config();
        let input = RegisterInput {
            notes: String::new(),
            document: Some(Document {
                file_name: Some("resume.txt".to_string()),
                content_type: Some("text/plain".to_string()),
                bytes: Bytes::from_static("職務経歴: Django 5年".as_bytes()),
            }),
        };

        Workflow::new(&store, &generator, &config)
            .register(input)
            .await
            .unwrap();

        assert!(generator.prompts()[0].contains("職務経歴: Django 5年"));
    }

    #[tokio::test]
    async fn test_register_without_any_input_is_rejected_before_generation() {
        let store = acme_store();
        let generator = ScriptedGenerator::default();
        let config = config();

        let err = Workflow::new(&store, &generator, &config)
            .register(RegisterInput::default())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(generator.calls(), 0);
    }

    #[tokio::test]
    async fn test_unknown_store_is_a_store_access_error() {
        let store = MemoryStore::with_store("other");
        let generator = ScriptedGenerator::answering(tanaka_answer());
        let config = config();

        let err = Workflow::new(&store, &generator, &config)
            .register(tanaka())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::StoreAccess(_)));
        assert_eq!(generator.calls(), 0);
    }

    #[tokio::test]
    async fn test_generation_failure_is_reported() {
        let store = acme_store();
        let generator = ScriptedGenerator::failing(GenerationError::Api {
            status: 429,
            message: "quota exceeded".to_string(),
        });
        let config = config();

        let err = Workflow::new(&store, &generator, &config)
            .register(tanaka())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Generation(_)));
        assert!(store.rows(STORE, "candidates").is_empty());
    }

    fn acme_posting() -> String {
        format!("ACME株式会社 Backend Dev\n時給4000円\n{MARKER}\n手数料は35%で合意済み")
    }

    fn acme_job_answer(internal_note: &str) -> String {
        serde_json::json!({
            "company": "ACME",
            "title": "Backend Dev",
            "overview": "決済基盤の開発",
            "responsibilities": "API設計\n手数料は35%で合意済み",
            "workingConditions": "時給4000円",
            "desiredProfile": "Python経験3年以上",
            "internalNote": internal_note
        })
        .to_string()
    }

    #[tokio::test]
    async fn test_parse_job_round_trips_through_the_store() {
        let store = MemoryStore::with_store(STORE);
        let generator = ScriptedGenerator::answering(acme_job_answer("手数料"));
        let config = config();

        let outcome = Workflow::new(&store, &generator, &config)
            .parse_job(&acme_posting())
            .await
            .unwrap();

        assert_eq!(outcome.job.internal_note, "手数料は35%で合意済み");
        assert_eq!(outcome.job.responsibilities, "API設計");
        assert_eq!(outcome.persisted_row, outcome.job.to_row());

        let handle = store.open_store(STORE).await.unwrap();
        let records = store.read_sheet(&handle, "jobs").await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].decode::<JobListing>(), outcome.job);
        assert_eq!(
            records[0].headers().collect::<Vec<_>>(),
            JobListing::COLUMNS.to_vec()
        );
    }

    #[tokio::test]
    async fn test_parse_job_without_marker_has_empty_internal_note() {
        let store = MemoryStore::with_store(STORE);
        let generator = ScriptedGenerator::answering(acme_job_answer("invented"));
        let config = config();

        let outcome = Workflow::new(&store, &generator, &config)
            .parse_job("ACME株式会社 Backend Dev\n時給4000円")
            .await
            .unwrap();

        assert_eq!(outcome.job.internal_note, "");
        assert_eq!(outcome.persisted_row[6], "");
    }

    #[tokio::test]
    async fn test_parse_job_persistence_failure_is_fatal() {
        let store = MemoryStore::with_store(STORE);
        store.fail_appends();
        let generator = ScriptedGenerator::answering(acme_job_answer(""));
        let config = config();

        let err = Workflow::new(&store, &generator, &config)
            .parse_job(&acme_posting())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Persistence(_)));
    }

    #[tokio::test]
    async fn test_parse_job_opens_store_before_generating() {
        let store = MemoryStore::with_store("other");
        let generator = ScriptedGenerator::answering(acme_job_answer(""));
        let config = config();

        let err = Workflow::new(&store, &generator, &config)
            .parse_job(&acme_posting())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::StoreAccess(_)));
        assert_eq!(generator.calls(), 0);
    }

    #[tokio::test]
    async fn test_search_on_empty_store_never_calls_the_generator() {
        let store = MemoryStore::with_store(STORE);
        store.seed(STORE, "candidates", vec![strings(CandidateProfile::COLUMNS)]);
        let generator = ScriptedGenerator::default();
        let config = config();

        let err = Workflow::new(&store, &generator, &config)
            .search("React案件、採用管理画面の刷新")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::EmptyStore(_)));
        assert_eq!(generator.calls(), 0);
    }

    #[tokio::test]
    async fn test_search_ranks_stored_candidates() {
        let store = MemoryStore::with_store(STORE);
        store.seed(
            STORE,
            "candidates",
            vec![
                strings(CandidateProfile::COLUMNS),
                strings(&["2026-10-01", "佐藤さん", "35", "React", "UI改善が得意", "時給5000円"]),
                strings(&["2026-10-02", "鈴木さん", "41", "Go", "?", "?"]),
            ],
        );
        let answer = r#"[{"name": "佐藤さん", "age": "35", "matchRationale": "React経験",
            "concerns": "なし", "pitch": "佐藤さんなら管理画面の刷新を任せられます"}]"#;
        let generator = ScriptedGenerator::answering(answer);
        let config = config();

        let outcome = Workflow::new(&store, &generator, &config)
            .search("React案件、採用管理画面の刷新")
            .await
            .unwrap();

        assert_eq!(outcome.candidates_considered, 2);
        match outcome.result {
            GenerationResult::RankedCandidates { ranked_candidates } => {
                assert_eq!(ranked_candidates.len(), 1);
                assert_eq!(ranked_candidates[0].name, "佐藤さん");
            }
            other => panic!("expected ranked candidates, got {other:?}"),
        }
        let prompt = &generator.prompts()[0];
        assert!(prompt.contains("鈴木さん"));
        assert!(prompt.contains("採用管理画面の刷新"));
    }

    #[tokio::test]
    async fn test_search_with_blank_notes_is_rejected_before_generation() {
        let store = MemoryStore::with_store(STORE);
        let generator = ScriptedGenerator::default();
        let config = config();

        let err = Workflow::new(&store, &generator, &config)
            .search(" \n ")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(generator.calls(), 0);
    }

    #[tokio::test]
    async fn test_search_prose_answer_is_presented_as_text() {
        let store = MemoryStore::with_store(STORE);
        store.seed(
            STORE,
            "candidates",
            vec![
                strings(CandidateProfile::COLUMNS),
                strings(&["2026-10-01", "田中さん", "28", "React", "?", "?"]),
            ],
        );
        let answer = "### 1. 田中さん（28歳）\n- マッチ理由: React経験\n- 懸念点: なし";
        let generator = ScriptedGenerator::answering(answer);
        let config = config();

        let outcome = Workflow::new(&store, &generator, &config)
            .search("React案件")
            .await
            .unwrap();

        assert_eq!(
            outcome.result,
            GenerationResult::DisplayText {
                display_text: answer.to_string()
            }
        );
    }
}
