pub mod client;
pub mod dto;
pub mod handlers;
pub mod services;

use std::sync::Arc;

use axum::Router;
use tracing::{info, warn};

use crate::{config::GenAiConfig, state::AppState};
use client::{DisabledGenerator, GeminiClient, TextGenerator};

pub fn router() -> Router<AppState> {
    handlers::genai_routes()
}

/// Live client when an API key is configured, otherwise the disabled stub.
pub fn generator_from_config(cfg: &GenAiConfig) -> anyhow::Result<Arc<dyn TextGenerator>> {
    match &cfg.api_key {
        Some(key) => {
            info!(model = %cfg.model, "Gemini AI enabled");
            Ok(Arc::new(GeminiClient::new(cfg, key.clone())?))
        }
        None => {
            warn!("GEMINI_API_KEY not set; AI features disabled");
            Ok(Arc::new(DisabledGenerator))
        }
    }
}
