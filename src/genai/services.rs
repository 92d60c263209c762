use std::fmt::Write as _;

use time::OffsetDateTime;
use tracing::{info, warn};

use super::client::TextGenerator;
use crate::{
    expenses::{category::Category, repo_types::ExpenseRecord},
    insights::aggregate::{category_totals, current_month},
};

pub const DISABLED_SUMMARY: &str = "AI features require GEMINI_API_KEY in the environment. \
     Get a free key at: https://makersuite.google.com/app/apikey";
pub const NO_EXPENSES: &str = "No expenses yet. Add some expenses to get AI insights!";
pub const NO_EXPENSES_THIS_MONTH: &str = "No expenses this month yet.";
pub const UNAVAILABLE: &str = "AI temporarily unavailable. Please try again later.";

const MIN_DESCRIPTION_CHARS: usize = 3;

pub fn summary_prompt(current: &[&ExpenseRecord], currency: &str) -> String {
    let total: f64 = current.iter().map(|r| r.amount).sum();
    let mut breakdown = String::new();
    for (category, amount) in category_totals(current.iter().copied()) {
        let _ = writeln!(breakdown, "{category}: {currency}{amount:.2}");
    }

    format!(
        "You are a financial advisor. Analyze this month's expenses and provide helpful insights.

Total spending this month: {currency}{total:.2}
Number of transactions: {count}

Breakdown by category:
{breakdown}
Provide:
1. A brief summary (1-2 sentences)
2. One specific observation about spending patterns
3. One actionable tip to save money

Keep it concise, friendly, and under 100 words.",
        count = current.len(),
    )
}

pub fn classification_prompt(description: &str) -> String {
    let labels: Vec<&str> = Category::ALL.iter().map(Category::as_str).collect();
    format!(
        "Classify this expense into EXACTLY ONE category from this list:
{}

Expense description: \"{description}\"

Return ONLY the category name, nothing else.",
        labels.join(", ")
    )
}

/// Summary of the current month's records. Empty input returns
/// `NO_EXPENSES_THIS_MONTH` without calling the service.
pub async fn summarize_month(
    generator: &dyn TextGenerator,
    current: &[&ExpenseRecord],
    currency: &str,
) -> String {
    if !generator.is_enabled() {
        return DISABLED_SUMMARY.to_string();
    }
    if current.is_empty() {
        return NO_EXPENSES_THIS_MONTH.to_string();
    }

    let prompt = summary_prompt(current, currency);
    match generator.generate(&prompt).await {
        Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
        Ok(_) => {
            warn!("empty AI summary");
            UNAVAILABLE.to_string()
        }
        Err(e) => {
            warn!(error = %e, "AI summary failed");
            UNAVAILABLE.to_string()
        }
    }
}

/// Summary for a user's full history, looking at `now`'s month only.
pub async fn summarize(
    generator: &dyn TextGenerator,
    records: &[ExpenseRecord],
    now: OffsetDateTime,
    currency: &str,
) -> String {
    if !generator.is_enabled() {
        return DISABLED_SUMMARY.to_string();
    }
    if records.is_empty() {
        return NO_EXPENSES.to_string();
    }
    summarize_month(generator, &current_month(records, now), currency).await
}

/// Never fails: anything unexpected collapses to `Category::Other`.
pub async fn classify(generator: &dyn TextGenerator, description: &str) -> Category {
    if !generator.is_enabled() || description.chars().count() < MIN_DESCRIPTION_CHARS {
        return Category::Other;
    }

    match generator.generate(&classification_prompt(description)).await {
        Ok(reply) => {
            let category = Category::from_label_or_other(Some(reply.trim()));
            info!(description = %description, category = %category, "AI category");
            category
        }
        Err(e) => {
            warn!(error = %e, "AI category failed");
            Category::Other
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genai::client::{stub::StubGenerator, DisabledGenerator};
    use time::macros::datetime;
    use uuid::Uuid;

    const NOW: OffsetDateTime = datetime!(2024-06-15 10:00 UTC);

    fn rec(amount: f64, category: Category, date: OffsetDateTime) -> ExpenseRecord {
        ExpenseRecord {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            amount,
            category,
            description: String::new(),
            date,
        }
    }

    #[test]
    fn summary_prompt_lists_totals_and_categories() {
        let a = rec(100.0, Category::Food, NOW);
        let b = rec(50.5, Category::Bills, NOW);
        let c = rec(20.0, Category::Food, NOW);
        let prompt = summary_prompt(&[&a, &b, &c], "$");
        assert!(prompt.contains("Total spending this month: $170.50"));
        assert!(prompt.contains("Number of transactions: 3"));
        assert!(prompt.contains("Food: $120.00\nBills: $50.50\n"));
    }

    #[test]
    fn classification_prompt_is_closed_list() {
        let prompt = classification_prompt("bus ticket");
        assert!(prompt.contains("Food, Transport, Shopping, Entertainment, Bills, Health, Other"));
        assert!(prompt.contains("\"bus ticket\""));
    }

    #[tokio::test]
    async fn summarize_empty_month_skips_service() {
        let gen = StubGenerator::replying("should not be used");
        let old = vec![rec(10.0, Category::Food, datetime!(2024-04-01 0:00 UTC))];
        assert_eq!(summarize(&gen, &old, NOW, "$").await, NO_EXPENSES_THIS_MONTH);
        assert_eq!(summarize_month(&gen, &[], "$").await, NO_EXPENSES_THIS_MONTH);
        assert_eq!(summarize(&gen, &[], NOW, "$").await, NO_EXPENSES);
        assert_eq!(gen.calls(), 0);
    }

    #[tokio::test]
    async fn summarize_returns_trimmed_reply() {
        let gen = StubGenerator::replying("  Spending looks healthy.\n");
        let records = vec![rec(10.0, Category::Food, NOW)];
        assert_eq!(summarize(&gen, &records, NOW, "$").await, "Spending looks healthy.");
        assert_eq!(gen.calls(), 1);
    }

    #[tokio::test]
    async fn summarize_falls_back_when_disabled_or_failing() {
        let records = vec![rec(10.0, Category::Food, NOW)];
        assert_eq!(
            summarize(&DisabledGenerator, &records, NOW, "$").await,
            DISABLED_SUMMARY
        );

        let failing = StubGenerator::failing();
        assert_eq!(summarize(&failing, &records, NOW, "$").await, UNAVAILABLE);
        assert_eq!(failing.calls(), 1);

        let blank = StubGenerator::replying("   ");
        assert_eq!(summarize(&blank, &records, NOW, "$").await, UNAVAILABLE);
    }

    #[tokio::test]
    async fn classify_short_input_skips_service() {
        let gen = StubGenerator::replying("Food");
        assert_eq!(classify(&gen, "").await, Category::Other);
        assert_eq!(classify(&gen, "ab").await, Category::Other);
        assert_eq!(gen.calls(), 0);
    }

    #[tokio::test]
    async fn classify_accepts_only_known_labels() {
        assert_eq!(
            classify(&StubGenerator::replying(" Transport\n"), "uber ride").await,
            Category::Transport
        );
        assert_eq!(
            classify(&StubGenerator::replying("transport"), "uber ride").await,
            Category::Other
        );
        assert_eq!(
            classify(&StubGenerator::replying("Category: Food"), "pizza").await,
            Category::Other
        );
    }

    #[tokio::test]
    async fn classify_falls_back_when_disabled_or_failing() {
        assert_eq!(classify(&DisabledGenerator, "groceries").await, Category::Other);
        let failing = StubGenerator::failing();
        assert_eq!(classify(&failing, "groceries").await, Category::Other);
        assert_eq!(failing.calls(), 1);
    }
}
