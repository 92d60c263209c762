use std::sync::Arc;

mod app;
mod auth;
mod config;
mod db;
mod dto;
mod error;
mod expenses;
mod genai;
mod insights;
mod state;
mod store;

use crate::{config::AppConfig, state::AppState, store::PgStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "expense_tracker=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let config = Arc::new(AppConfig::from_env()?);

    let pool = db::connect(&config).await?;
    db::migrate(&pool).await?;

    let genai = genai::generator_from_config(&config.genai)?;
    let state = AppState::from_parts(config.clone(), Arc::new(PgStore::new(pool)), genai);

    app::serve(app::build_app(state), &config).await
}
