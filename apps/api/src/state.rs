use std::sync::Arc;

use crate::llm_client::TextGenerator;
use crate::store::RecordStore;
use crate::workflow::WorkflowConfig;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Google Sheets in production, the in-memory store in tests.
    pub store: Arc<dyn RecordStore>,
    pub generator: Arc<dyn TextGenerator>,
    /// Defaults for every workflow run; a request may override the store name.
    pub workflow: WorkflowConfig,
}
