use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::auth::repo_types::User;
use crate::expenses::{
    repo as expense_repo,
    repo_types::{ExpenseRecord, NewExpense},
};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("email already registered")]
    DuplicateEmail,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Durable storage for users and their expenses.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn create_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, StoreError>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;
    async fn add_expense(&self, new: NewExpense) -> Result<ExpenseRecord, StoreError>;
    /// Expenses owned by `user_id`, most recent `date` first.
    async fn list_expenses(&self, user_id: Uuid) -> Result<Vec<ExpenseRecord>, StoreError>;
}

#[derive(Clone)]
pub struct PgStore {
    db: PgPool,
}

impl PgStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RecordStore for PgStore {
    async fn create_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, StoreError> {
        User::create(&self.db, username, email, password_hash)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                    StoreError::DuplicateEmail
                }
                other => StoreError::Database(other),
            })
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(User::find_by_email(&self.db, email).await?)
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(User::find_by_id(&self.db, id).await?)
    }

    async fn add_expense(&self, new: NewExpense) -> Result<ExpenseRecord, StoreError> {
        Ok(expense_repo::insert(&self.db, &new).await?)
    }

    async fn list_expenses(&self, user_id: Uuid) -> Result<Vec<ExpenseRecord>, StoreError> {
        Ok(expense_repo::list_by_user(&self.db, user_id).await?)
    }
}

#[cfg(test)]
mod memory;
#[cfg(test)]
pub use memory::MemoryStore;
