//! Month-level spending aggregation.
//!
//! Everything here is pure: the reference instant is passed in, so the same
//! input always yields the same `Insights`.

use std::collections::BTreeMap;

use serde::Serialize;
use time::{Month, OffsetDateTime};

use crate::expenses::{category::Category, repo_types::ExpenseRecord};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LargestExpense {
    pub category: Category,
    pub amount: f64,
}

/// Current-month totals plus the change against the previous month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insights {
    pub total_current_month: f64,
    #[serde(rename = "total_transactions")]
    pub transaction_count: usize,
    pub average_transaction: f64,
    pub category_breakdown: BTreeMap<Category, f64>,
    #[serde(rename = "month_over_month_change")]
    pub month_over_month_change_percent: f64,
    pub largest_expense: Option<LargestExpense>,
}

impl Insights {
    pub fn empty() -> Self {
        Self {
            total_current_month: 0.0,
            transaction_count: 0,
            average_transaction: 0.0,
            category_breakdown: BTreeMap::new(),
            month_over_month_change_percent: 0.0,
            largest_expense: None,
        }
    }
}

/// A calendar (year, month) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthKey {
    pub year: i32,
    pub month: Month,
}

impl MonthKey {
    pub fn of(at: OffsetDateTime) -> Self {
        Self {
            year: at.year(),
            month: at.month(),
        }
    }

    /// December of the prior year when `self` is January.
    pub fn previous(self) -> Self {
        match self.month {
            Month::January => Self {
                year: self.year - 1,
                month: Month::December,
            },
            m => Self {
                year: self.year,
                month: m.previous(),
            },
        }
    }

    /// Whether `at`, seen in `now`'s offset, falls in this month.
    fn contains(self, at: OffsetDateTime, now: OffsetDateTime) -> bool {
        MonthKey::of(at.to_offset(now.offset())) == self
    }
}

/// Two decimal places, rounding the exact binary value with ties to even.
/// Precision formatting does the decimal rounding, so no scaled intermediate
/// can overflow.
pub fn round2(value: f64) -> f64 {
    format!("{value:.2}").parse().unwrap_or(value)
}

/// Records dated in the same calendar month as `now`.
pub fn current_month(records: &[ExpenseRecord], now: OffsetDateTime) -> Vec<&ExpenseRecord> {
    let key = MonthKey::of(now);
    records.iter().filter(|r| key.contains(r.date, now)).collect()
}

/// Records dated in the calendar month before `now`'s.
pub fn previous_month(records: &[ExpenseRecord], now: OffsetDateTime) -> Vec<&ExpenseRecord> {
    let key = MonthKey::of(now).previous();
    records.iter().filter(|r| key.contains(r.date, now)).collect()
}

/// Full-precision per-category sums, only for categories present.
pub fn category_totals<'a, I>(records: I) -> BTreeMap<Category, f64>
where
    I: IntoIterator<Item = &'a ExpenseRecord>,
{
    let mut totals = BTreeMap::new();
    for r in records {
        *totals.entry(r.category).or_insert(0.0) += r.amount;
    }
    totals
}

/// Records outside the current and previous month count toward neither.
pub fn monthly_insights(records: &[ExpenseRecord], now: OffsetDateTime) -> Insights {
    let current = current_month(records, now);
    if current.is_empty() {
        return Insights::empty();
    }

    let total: f64 = current.iter().map(|r| r.amount).sum();
    let count = current.len();
    let average = total / count as f64;
    let totals = category_totals(current.iter().copied());

    let mut largest: Option<LargestExpense> = None;
    for (&category, &amount) in &totals {
        if largest.as_ref().map_or(true, |l| amount > l.amount) {
            largest = Some(LargestExpense { category, amount });
        }
    }

    let previous = previous_month(records, now);
    let previous_total: f64 = previous.iter().map(|r| r.amount).sum();
    let change = if previous.is_empty() || previous_total <= 0.0 {
        0.0
    } else {
        (total - previous_total) / previous_total * 100.0
    };

    Insights {
        total_current_month: round2(total),
        transaction_count: count,
        average_transaction: round2(average),
        category_breakdown: totals.into_iter().map(|(c, v)| (c, round2(v))).collect(),
        month_over_month_change_percent: round2(change),
        largest_expense: largest.map(|l| LargestExpense {
            category: l.category,
            amount: round2(l.amount),
        }),
    }
}
