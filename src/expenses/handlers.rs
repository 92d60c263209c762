use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use time::OffsetDateTime;
use tracing::instrument;

use super::{
    dto::{CreateExpenseRequest, ExpenseResponse},
    services,
};
use crate::{
    auth::jwt::AuthUser,
    dto::MessageResponse,
    error::{ApiJson, AppResult},
    state::AppState,
};

pub fn expense_routes() -> Router<AppState> {
    Router::new().route("/expenses", get(list_expenses).post(create_expense))
}

#[instrument(skip(state))]
pub async fn list_expenses(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<Vec<ExpenseResponse>>> {
    let expenses = state.store.list_expenses(user_id).await?;
    Ok(Json(expenses.into_iter().map(ExpenseResponse::from).collect()))
}

#[instrument(skip(state, payload))]
pub async fn create_expense(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiJson(payload): ApiJson<CreateExpenseRequest>,
) -> AppResult<(StatusCode, Json<MessageResponse>)> {
    services::add_expense(
        state.store.as_ref(),
        user_id,
        payload,
        OffsetDateTime::now_utc(),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(MessageResponse::new("Expense added"))))
}
