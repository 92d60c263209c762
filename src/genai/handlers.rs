use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use time::OffsetDateTime;
use tracing::instrument;

use super::{
    dto::{CategoryRequest, CategoryResponse, SummaryResponse},
    services,
};
use crate::{
    auth::jwt::AuthUser,
    error::{ApiJson, AppResult},
    state::AppState,
};

pub fn genai_routes() -> Router<AppState> {
    Router::new()
        .route("/genai/summary", get(get_summary))
        .route("/genai/category", post(suggest_category))
}

#[instrument(skip(state))]
pub async fn get_summary(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<SummaryResponse>> {
    let ai_summary = if state.genai.is_enabled() {
        let records = state.store.list_expenses(user_id).await?;
        services::summarize(
            state.genai.as_ref(),
            &records,
            OffsetDateTime::now_utc(),
            &state.config.genai.currency_symbol,
        )
        .await
    } else {
        services::DISABLED_SUMMARY.to_string()
    };
    Ok(Json(SummaryResponse { ai_summary }))
}

#[instrument(skip(state, payload))]
pub async fn suggest_category(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    ApiJson(payload): ApiJson<CategoryRequest>,
) -> AppResult<Json<CategoryResponse>> {
    let category = services::classify(state.genai.as_ref(), &payload.description).await;
    Ok(Json(CategoryResponse { category }))
}
