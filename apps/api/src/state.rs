use std::sync::Arc;

use crate::analysis::analyzer::CvAnalyzer;
use crate::editor::registry::SessionRegistry;
use crate::llm_client::LlmClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable analyzer. Default: HeuristicAnalyzer.
    pub analyzer: Arc<dyn CvAnalyzer>,
    pub editor: Arc<SessionRegistry>,
    /// `None` when no API key is configured; coaching then answers 503.
    pub llm: Option<LlmClient>,
}
