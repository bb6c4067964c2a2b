use chrono::{DateTime, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::ExpenseCategory;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Expense {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) amount: Decimal,
    pub(crate) category: ExpenseCategory,
    /// ISO calendar date, e.g. "2024-01-15". Kept as text so malformed
    /// values loaded from storage survive a round trip.
    pub(crate) date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) notes: Option<String>,
}

impl Expense {
    pub(crate) fn new(
        name: String,
        amount: Decimal,
        category: ExpenseCategory,
        date: String,
        notes: Option<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            amount,
            category,
            date,
            notes,
        }
    }

    /// Year-month prefix of the date ("2024-01"). Short or odd dates return
    /// the whole text.
    pub(crate) fn month_key(&self) -> &str {
        self.date.get(..7).unwrap_or(&self.date)
    }

    pub(crate) fn parsed_date(&self) -> Option<NaiveDate> {
        parse_date(&self.date)
    }

    /// `needle` must already be lowercased.
    pub(crate) fn matches_search(&self, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }
        self.name.to_lowercase().contains(needle)
            || self
                .notes
                .as_deref()
                .is_some_and(|n| n.to_lowercase().contains(needle))
    }
}

/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp.
pub(crate) fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
}

/// Round to whole cents, halves away from zero.
pub(crate) fn round_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
