mod budget_editor;
mod form;

use anyhow::Result;

pub(crate) use budget_editor::{coerce_limit, BudgetEditor};
pub(crate) use form::ExpenseDraft;

use crate::aggregate::{compute_summary, group_by_month, MonthGroup, Summary};
use crate::models::{BudgetRule, Expense};
use crate::store::{LocalStorage, BUDGETS_KEY, EXPENSES_KEY};

/// The two persisted lists plus the storage they live in. Every change
/// builds a new list, writes it, and only then replaces the old one, so a
/// failed write leaves the in-memory state as it was.
pub(crate) struct Ledger {
    storage: LocalStorage,
    expenses: Vec<Expense>,
    budgets: Vec<BudgetRule>,
}

impl Ledger {
    pub(crate) fn load(mut storage: LocalStorage) -> Result<Self> {
        let expenses: Vec<Expense> = storage.get(EXPENSES_KEY)?;
        let budgets: Vec<BudgetRule> = storage.get(BUDGETS_KEY)?;
        tracing::info!(
            expenses = expenses.len(),
            budgets = budgets.len(),
            "ledger loaded"
        );
        Ok(Self {
            storage,
            expenses,
            budgets,
        })
    }

    pub(crate) fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub(crate) fn budgets(&self) -> &[BudgetRule] {
        &self.budgets
    }

    /// Storage keys holding stored lists that failed to decode at load.
    pub(crate) fn backups(&self) -> &[String] {
        self.storage.backups()
    }

    pub(crate) fn add_expense(&mut self, expense: Expense) -> Result<()> {
        let mut next = Vec::with_capacity(self.expenses.len() + 1);
        next.extend(self.expenses.iter().cloned());
        tracing::info!(id = %expense.id, amount = %expense.amount, category = %expense.category, "adding expense");
        next.push(expense);
        self.storage.set(EXPENSES_KEY, &next)?;
        self.expenses = next;
        Ok(())
    }

    /// Remove by exact id. Returns the removed expense, if any.
    pub(crate) fn remove_expense(&mut self, id: &str) -> Result<Option<Expense>> {
        let Some(removed) = self.expenses.iter().find(|e| e.id == id).cloned() else {
            return Ok(None);
        };
        let next: Vec<Expense> = self
            .expenses
            .iter()
            .filter(|e| e.id != id)
            .cloned()
            .collect();
        self.storage.set(EXPENSES_KEY, &next)?;
        self.expenses = next;
        tracing::info!(id, "removed expense");
        Ok(Some(removed))
    }

    /// Replace the whole rule set. Later duplicates of a category are
    /// dropped and negative limits clamp to zero.
    pub(crate) fn save_budgets(&mut self, rules: &[BudgetRule]) -> Result<()> {
        let mut next: Vec<BudgetRule> = Vec::with_capacity(rules.len());
        for rule in rules {
            if BudgetRule::find(&next, rule.category).is_some() {
                tracing::warn!(category = %rule.category, "dropping duplicate budget rule");
                continue;
            }
            next.push(BudgetRule::new(rule.category, rule.monthly_limit));
        }
        self.storage.set(BUDGETS_KEY, &next)?;
        self.budgets = next;
        tracing::info!(budgets = self.budgets.len(), "budgets saved");
        Ok(())
    }

    /// Resolve a full id or an unambiguous id prefix.
    pub(crate) fn find_expense(&self, id_or_prefix: &str) -> Option<&Expense> {
        if id_or_prefix.is_empty() {
            return None;
        }
        if let Some(exact) = self.expenses.iter().find(|e| e.id == id_or_prefix) {
            return Some(exact);
        }
        let mut matches = self
            .expenses
            .iter()
            .filter(|e| e.id.starts_with(id_or_prefix));
        match (matches.next(), matches.next()) {
            (Some(only), None) => Some(only),
            _ => None,
        }
    }

    pub(crate) fn summary(&self) -> Summary<'_> {
        compute_summary(&self.expenses, &self.budgets)
    }

    pub(crate) fn month_groups(&self) -> Vec<MonthGroup<'_>> {
        group_by_month(&self.expenses)
    }
}
