use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use super::category::Category;

/// Raw `expenses` row; `category` is free text in storage.
#[derive(Debug, FromRow)]
pub struct ExpenseRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub amount: f64,
    pub category: String,
    pub description: Option<String>,
    pub date: OffsetDateTime,
}

/// An expense owned by exactly one user.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub amount: f64,
    pub category: Category,
    pub description: String,
    pub date: OffsetDateTime,
}

impl From<ExpenseRow> for ExpenseRecord {
    fn from(r: ExpenseRow) -> Self {
        Self {
            id: r.id,
            user_id: r.user_id,
            amount: r.amount,
            category: Category::from_label_or_other(Some(&r.category)),
            description: r.description.unwrap_or_default(),
            date: r.date,
        }
    }
}

/// Validated input for a new expense.
#[derive(Debug, Clone)]
pub struct NewExpense {
    pub user_id: Uuid,
    pub amount: f64,
    pub category: Category,
    pub description: String,
    pub date: OffsetDateTime,
}
