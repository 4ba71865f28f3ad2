use std::sync::Arc;

use crate::ats::scorer::AtsScorer;
use crate::config::Config;
use crate::llm_client::LlmGateway;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Ordered generation backends, built once from config.
    pub gateway: LlmGateway,
    /// Pluggable ATS scorer. Default: HeuristicAtsScorer. RemoteAtsScorer when APILAYER_KEY is set.
    pub ats_scorer: Arc<dyn AtsScorer>,
    pub config: Config,
}
