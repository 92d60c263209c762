use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{RecordStore, StoreError};
use crate::auth::repo_types::User;
use crate::expenses::repo_types::{ExpenseRecord, NewExpense};

/// In-process store. Nothing survives a restart.
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<Vec<User>>,
    expenses: RwLock<Vec<ExpenseRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn create_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, StoreError> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.email == email) {
            return Err(StoreError::DuplicateEmail);
        }
        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: OffsetDateTime::now_utc(),
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn add_expense(&self, new: NewExpense) -> Result<ExpenseRecord, StoreError> {
        let record = ExpenseRecord {
            id: Uuid::new_v4(),
            user_id: new.user_id,
            amount: new.amount,
            category: new.category,
            description: new.description,
            date: new.date,
        };
        self.expenses.write().await.push(record.clone());
        Ok(record)
    }

    async fn list_expenses(&self, user_id: Uuid) -> Result<Vec<ExpenseRecord>, StoreError> {
        let mut out: Vec<ExpenseRecord> = self
            .expenses
            .read()
            .await
            .iter()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect();
        out.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expenses::category::Category;
    use time::macros::datetime;

    fn expense(user_id: Uuid, amount: f64, date: OffsetDateTime) -> NewExpense {
        NewExpense {
            user_id,
            amount,
            category: Category::Food,
            description: String::new(),
            date,
        }
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected_once() {
        let store = MemoryStore::new();
        store.create_user("ann", "ann@example.com", "h").await.unwrap();
        let err = store
            .create_user("ann2", "ann@example.com", "h2")
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateEmail));
        assert_eq!(store.users.read().await.len(), 1);
    }

    #[tokio::test]
    async fn email_lookup_is_case_sensitive() {
        let store = MemoryStore::new();
        store.create_user("ann", "Ann@example.com", "h").await.unwrap();
        assert!(store.find_user_by_email("ann@example.com").await.unwrap().is_none());
        assert!(store.find_user_by_email("Ann@example.com").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn list_filters_by_owner_and_sorts_newest_first() {
        let store = MemoryStore::new();
        let me = Uuid::new_v4();
        let other = Uuid::new_v4();
        store.add_expense(expense(me, 1.0, datetime!(2024-01-01 0:00 UTC))).await.unwrap();
        store.add_expense(expense(other, 2.0, datetime!(2024-03-01 0:00 UTC))).await.unwrap();
        store.add_expense(expense(me, 3.0, datetime!(2024-02-01 0:00 UTC))).await.unwrap();

        let mine = store.list_expenses(me).await.unwrap();
        assert_eq!(mine.len(), 2);
        assert!(mine.iter().all(|e| e.user_id == me));
        assert_eq!(mine[0].amount, 3.0);
        assert_eq!(mine[1].amount, 1.0);
    }
}
