use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::{category::Category, repo_types::ExpenseRecord};

/// Amount as sent by clients: a JSON number or a numeric string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AmountInput {
    Number(f64),
    Text(String),
}

#[derive(Debug, Deserialize)]
pub struct CreateExpenseRequest {
    pub amount: AmountInput,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ExpenseResponse {
    pub id: Uuid,
    pub amount: f64,
    pub category: Category,
    pub description: String,
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
}

impl From<ExpenseRecord> for ExpenseResponse {
    fn from(e: ExpenseRecord) -> Self {
        Self {
            id: e.id,
            amount: e.amount,
            category: e.category,
            description: e.description,
            date: e.date,
        }
    }
}
