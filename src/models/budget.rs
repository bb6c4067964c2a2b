use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ExpenseCategory;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BudgetRule {
    pub(crate) category: ExpenseCategory,
    pub(crate) monthly_limit: Decimal,
}

impl BudgetRule {
    /// Negative limits are coerced to zero.
    pub(crate) fn new(category: ExpenseCategory, monthly_limit: Decimal) -> Self {
        Self {
            category,
            monthly_limit: monthly_limit.max(Decimal::ZERO),
        }
    }

    /// Find the rule for a category in a slice.
    pub(crate) fn find(rules: &[BudgetRule], category: ExpenseCategory) -> Option<&BudgetRule> {
        rules.iter().find(|r| r.category == category)
    }
}
