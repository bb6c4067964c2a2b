use rust_decimal::Decimal;

use super::form::parse_amount;
use crate::aggregate::{compute_budget_insights, BudgetInsight};
use crate::models::{BudgetRule, Expense, ExpenseCategory};

/// Working copy of the budget rules. Nothing is persisted until the caller
/// hands `rules()` to the ledger.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct BudgetEditor {
    draft: Vec<BudgetRule>,
}

impl BudgetEditor {
    pub(crate) fn new(saved: &[BudgetRule]) -> Self {
        Self {
            draft: saved.to_vec(),
        }
    }

    pub(crate) fn rules(&self) -> &[BudgetRule] {
        &self.draft
    }

    pub(crate) fn can_add(&self) -> bool {
        self.draft.len() < ExpenseCategory::all().len()
    }

    /// Add a zero-limit rule for the first category without one.
    pub(crate) fn add_budget(&mut self) -> Option<ExpenseCategory> {
        let unused = ExpenseCategory::all()
            .iter()
            .copied()
            .find(|c| BudgetRule::find(&self.draft, *c).is_none())?;
        self.draft.push(BudgetRule::new(unused, Decimal::ZERO));
        Some(unused)
    }

    /// Set a limit from raw input. Non-numeric or negative input becomes 0.
    /// Returns the stored limit, or `None` if the category has no rule.
    pub(crate) fn update_limit(&mut self, category: ExpenseCategory, input: &str) -> Option<Decimal> {
        self.set_limit(category, coerce_limit(input))
    }

    pub(crate) fn set_limit(&mut self, category: ExpenseCategory, limit: Decimal) -> Option<Decimal> {
        let rule = self.draft.iter_mut().find(|r| r.category == category)?;
        *rule = BudgetRule::new(category, limit);
        Some(rule.monthly_limit)
    }

    /// Update the rule for `category`, adding it first when missing.
    pub(crate) fn upsert(&mut self, category: ExpenseCategory, limit: Decimal) -> Decimal {
        if let Some(stored) = self.set_limit(category, limit) {
            return stored;
        }
        let rule = BudgetRule::new(category, limit);
        let stored = rule.monthly_limit;
        self.draft.push(rule);
        stored
    }

    pub(crate) fn remove(&mut self, category: ExpenseCategory) -> bool {
        let before = self.draft.len();
        self.draft.retain(|r| r.category != category);
        self.draft.len() != before
    }

    pub(crate) fn insights(&self, expenses: &[Expense]) -> Vec<BudgetInsight> {
        compute_budget_insights(&self.draft, expenses)
    }

    pub(crate) fn is_dirty(&self, saved: &[BudgetRule]) -> bool {
        self.draft.as_slice() != saved
    }

    pub(crate) fn len(&self) -> usize {
        self.draft.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.draft.is_empty()
    }
}

pub(crate) fn coerce_limit(input: &str) -> Decimal {
    parse_amount(input)
        .unwrap_or(Decimal::ZERO)
        .max(Decimal::ZERO)
}
