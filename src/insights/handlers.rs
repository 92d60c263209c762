use axum::{extract::State, routing::get, Json, Router};
use time::OffsetDateTime;
use tracing::{debug, instrument};

use super::aggregate::{monthly_insights, Insights};
use crate::{auth::jwt::AuthUser, error::AppResult, state::AppState};

pub fn insight_routes() -> Router<AppState> {
    Router::new().route("/insights", get(get_insights))
}

#[instrument(skip(state))]
pub async fn get_insights(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<Insights>> {
    let records = state.store.list_expenses(user_id).await?;
    let insights = monthly_insights(&records, OffsetDateTime::now_utc());
    debug!(
        records = records.len(),
        current_month = insights.transaction_count,
        total = insights.total_current_month,
        "insights computed"
    );
    Ok(Json(insights))
}
