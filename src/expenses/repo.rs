use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::{ExpenseRecord, ExpenseRow, NewExpense};

pub async fn insert(db: &PgPool, new: &NewExpense) -> Result<ExpenseRecord, sqlx::Error> {
    let row = sqlx::query_as::<_, ExpenseRow>(
        r#"
        INSERT INTO expenses (id, user_id, amount, category, description, date)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, user_id, amount, category, description, date
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(new.user_id)
    .bind(new.amount)
    .bind(new.category.as_str())
    .bind(&new.description)
    .bind(new.date)
    .fetch_one(db)
    .await?;
    Ok(row.into())
}

/// All expenses of one user, newest first.
pub async fn list_by_user(db: &PgPool, user_id: Uuid) -> Result<Vec<ExpenseRecord>, sqlx::Error> {
    let rows = sqlx::query_as::<_, ExpenseRow>(
        r#"
        SELECT id, user_id, amount, category, description, date
        FROM expenses
        WHERE user_id = $1
        ORDER BY date DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await?;
    Ok(rows.into_iter().map(ExpenseRecord::from).collect())
}
