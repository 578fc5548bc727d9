use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::TextGenerator;
use crate::screening::vocabulary::Vocabulary;

/// Shared application state injected into all route handlers via Axum extractors.
/// Everything here is read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Pluggable completion backend. Default: LlmClient against the configured endpoint.
    pub generator: Arc<dyn TextGenerator>,
    /// Word lists for the screening checks, loaded once at startup.
    pub vocabulary: Arc<Vocabulary>,
}
