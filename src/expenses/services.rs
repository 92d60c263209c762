use time::{
    format_description::well_known::Rfc3339,
    macros::format_description,
    Date, OffsetDateTime, PrimitiveDateTime, UtcOffset,
};
use tracing::info;
use uuid::Uuid;

use super::{
    category::Category,
    dto::{AmountInput, CreateExpenseRequest},
    repo_types::{ExpenseRecord, NewExpense},
};
use crate::{
    error::{AppError, AppResult},
    store::RecordStore,
};

/// Amounts must be finite and non-negative.
pub fn parse_amount(input: &AmountInput) -> AppResult<f64> {
    let amount = match input {
        AmountInput::Number(n) => *n,
        AmountInput::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| AppError::Validation("Amount must be a number".into()))?,
    };
    if !amount.is_finite() || amount < 0.0 {
        return Err(AppError::Validation(
            "Amount must be a non-negative number".into(),
        ));
    }
    Ok(amount)
}

/// Parses a client-supplied date. Naive values are taken as UTC; anything
/// missing or unparsable falls back to `now`.
pub fn parse_expense_date(raw: Option<&str>, now: OffsetDateTime) -> OffsetDateTime {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return now;
    };
    if let Ok(dt) = OffsetDateTime::parse(raw, &Rfc3339) {
        return dt.to_offset(UtcOffset::UTC);
    }
    let naive = raw.strip_suffix('Z').unwrap_or(raw);
    if let Ok(dt) = PrimitiveDateTime::parse(
        naive,
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second][optional [.[subsecond]]]"),
    ) {
        return dt.assume_utc();
    }
    if let Ok(dt) = PrimitiveDateTime::parse(
        naive,
        format_description!("[year]-[month]-[day]T[hour]:[minute]"),
    ) {
        return dt.assume_utc();
    }
    if let Ok(d) = Date::parse(naive, format_description!("[year]-[month]-[day]")) {
        return d.midnight().assume_utc();
    }
    now
}

pub async fn add_expense(
    store: &dyn RecordStore,
    user_id: Uuid,
    payload: CreateExpenseRequest,
    now: OffsetDateTime,
) -> AppResult<ExpenseRecord> {
    let new = NewExpense {
        user_id,
        amount: parse_amount(&payload.amount)?,
        category: Category::from_label_or_other(payload.category.as_deref()),
        description: payload.description.unwrap_or_default(),
        date: parse_expense_date(payload.date.as_deref(), now),
    };
    let record = store.add_expense(new).await?;
    info!(
        user_id = %user_id,
        amount = record.amount,
        category = %record.category,
        date = %record.date,
        "expense added"
    );
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use time::macros::datetime;

    const NOW: OffsetDateTime = datetime!(2024-05-20 12:00 UTC);

    fn request(amount: AmountInput, category: Option<&str>, date: Option<&str>) -> CreateExpenseRequest {
        CreateExpenseRequest {
            amount,
            category: category.map(String::from),
            description: None,
            date: date.map(String::from),
        }
    }

    #[test]
    fn amount_accepts_numbers_and_numeric_strings() {
        assert_eq!(parse_amount(&AmountInput::Number(12.5)).unwrap(), 12.5);
        assert_eq!(parse_amount(&AmountInput::Text(" 40 ".into())).unwrap(), 40.0);
        assert_eq!(parse_amount(&AmountInput::Number(0.0)).unwrap(), 0.0);
    }

    #[test]
    fn amount_rejects_negative_and_non_finite() {
        for input in [
            AmountInput::Number(-1.0),
            AmountInput::Text("abc".into()),
            AmountInput::Text("NaN".into()),
            AmountInput::Text("inf".into()),
        ] {
            assert!(matches!(parse_amount(&input), Err(AppError::Validation(_))));
        }
    }

    #[test]
    fn date_formats() {
        assert_eq!(
            parse_expense_date(Some("2024-03-01"), NOW),
            datetime!(2024-03-01 0:00 UTC)
        );
        assert_eq!(
            parse_expense_date(Some("2024-03-01T08:30:00Z"), NOW),
            datetime!(2024-03-01 8:30 UTC)
        );
        assert_eq!(
            parse_expense_date(Some("2024-03-01T08:30:00.250"), NOW),
            datetime!(2024-03-01 8:30:00.25 UTC)
        );
        assert_eq!(
            parse_expense_date(Some("2024-03-01T08:30"), NOW),
            datetime!(2024-03-01 8:30 UTC)
        );
        assert_eq!(
            parse_expense_date(Some("2024-03-01T23:30:00-02:00"), NOW),
            datetime!(2024-03-02 1:30 UTC)
        );
    }

    #[test]
    fn bad_or_missing_date_falls_back_to_now() {
        assert_eq!(parse_expense_date(None, NOW), NOW);
        assert_eq!(parse_expense_date(Some(""), NOW), NOW);
        assert_eq!(parse_expense_date(Some("yesterday"), NOW), NOW);
        assert_eq!(parse_expense_date(Some("2024-13-45"), NOW), NOW);
    }

    #[tokio::test]
    async fn add_expense_applies_defaults() {
        let store = MemoryStore::new();
        let user_id = Uuid::new_v4();
        let record = add_expense(
            &store,
            user_id,
            request(AmountInput::Number(9.99), Some("Snacks"), None),
            NOW,
        )
        .await
        .unwrap();
        assert_eq!(record.user_id, user_id);
        assert_eq!(record.category, Category::Other);
        assert_eq!(record.description, "");
        assert_eq!(record.date, NOW);
    }

    #[tokio::test]
    async fn add_expense_rejects_negative_amount_without_storing() {
        let store = MemoryStore::new();
        let user_id = Uuid::new_v4();
        let err = add_expense(&store, user_id, request(AmountInput::Number(-5.0), None, None), NOW)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(store.list_expenses(user_id).await.unwrap().is_empty());
    }
}
