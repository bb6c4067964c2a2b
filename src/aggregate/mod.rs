use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::{BudgetRule, Expense, ExpenseCategory};

// ── Month grouping ────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct MonthGroup<'a> {
    /// Format: "YYYY-MM"
    pub(crate) month: String,
    pub(crate) items: Vec<&'a Expense>,
}

impl MonthGroup<'_> {
    pub(crate) fn total(&self) -> Decimal {
        self.items.iter().map(|e| e.amount).sum()
    }

    /// "January 2024", or the raw key when it is not a valid year-month.
    pub(crate) fn label(&self) -> String {
        month_label(&self.month)
    }
}

pub(crate) fn month_label(month: &str) -> String {
    NaiveDate::parse_from_str(&format!("{month}-01"), "%Y-%m-%d")
        .map(|d| d.format("%B %Y").to_string())
        .unwrap_or_else(|_| month.to_string())
}

/// Partition expenses by year-month, newest month first. Items keep their
/// input order within a group.
pub(crate) fn group_by_month(expenses: &[Expense]) -> Vec<MonthGroup<'_>> {
    let mut groups: BTreeMap<&str, Vec<&Expense>> = BTreeMap::new();
    for expense in expenses {
        groups.entry(expense.month_key()).or_default().push(expense);
    }
    groups
        .into_iter()
        .rev()
        .map(|(month, items)| MonthGroup {
            month: month.to_string(),
            items,
        })
        .collect()
}

/// Expenses dated in `month` ("YYYY-MM"); `None` keeps everything.
pub(crate) fn expenses_in_month(expenses: &[Expense], month: Option<&str>) -> Vec<Expense> {
    match month {
        Some(m) => expenses
            .iter()
            .filter(|e| e.month_key() == m)
            .cloned()
            .collect(),
        None => expenses.to_vec(),
    }
}

// ── Budget insights ───────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct BudgetInsight {
    pub(crate) category: ExpenseCategory,
    pub(crate) monthly_limit: Decimal,
    pub(crate) spent: Decimal,
    pub(crate) remaining: Decimal,
    /// Always within [0, 1].
    pub(crate) utilization: Decimal,
}

impl BudgetInsight {
    /// Utilization as a whole percentage, rounded half away from zero.
    pub(crate) fn percent(&self) -> u32 {
        round_percent(self.utilization).to_u32().unwrap_or(0)
    }
}

fn round_percent(ratio: Decimal) -> Decimal {
    (ratio * Decimal::ONE_HUNDRED).round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

pub(crate) fn compute_budget_insight(budget: &BudgetRule, expenses: &[Expense]) -> BudgetInsight {
    let spent: Decimal = expenses
        .iter()
        .filter(|e| e.category == budget.category)
        .map(|e| e.amount)
        .sum();
    let limit = budget.monthly_limit;
    let remaining = (limit - spent).max(Decimal::ZERO);
    let utilization = if limit.is_zero() {
        Decimal::ZERO
    } else {
        (spent / limit).clamp(Decimal::ZERO, Decimal::ONE)
    };
    BudgetInsight {
        category: budget.category,
        monthly_limit: limit,
        spent,
        remaining,
        utilization,
    }
}

pub(crate) fn compute_budget_insights(
    budgets: &[BudgetRule],
    expenses: &[Expense],
) -> Vec<BudgetInsight> {
    budgets
        .iter()
        .map(|b| compute_budget_insight(b, expenses))
        .collect()
}

// ── Summary ───────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Summary<'a> {
    pub(crate) total_spent: Decimal,
    pub(crate) expense_count: usize,
    pub(crate) largest_expense: Option<&'a Expense>,
    pub(crate) planned_total: Decimal,
    pub(crate) total_remaining: Decimal,
    pub(crate) budget_count: usize,
}

impl Summary<'_> {
    /// Total spent over total planned. Not clamped; `None` without a plan.
    pub(crate) fn overall_utilization(&self) -> Option<Decimal> {
        if self.planned_total.is_zero() {
            None
        } else {
            Some(self.total_spent / self.planned_total)
        }
    }

    pub(crate) fn overall_percent(&self) -> Option<i64> {
        self.overall_utilization()
            .and_then(|u| round_percent(u).to_i64())
    }
}

pub(crate) fn compute_summary<'a>(expenses: &'a [Expense], budgets: &[BudgetRule]) -> Summary<'a> {
    let total_spent = expenses.iter().map(|e| e.amount).sum();

    // Strict comparison keeps the first of equal amounts.
    let largest_expense = expenses.iter().fold(None::<&Expense>, |best, e| match best {
        Some(b) if e.amount <= b.amount => Some(b),
        _ => Some(e),
    });

    let planned_total = budgets.iter().map(|b| b.monthly_limit).sum();
    let total_remaining = budgets
        .iter()
        .map(|b| compute_budget_insight(b, expenses).remaining)
        .sum();

    Summary {
        total_spent,
        expense_count: expenses.len(),
        largest_expense,
        planned_total,
        total_remaining,
        budget_count: budgets.len(),
    }
}

// ── Filtering and sorting ─────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum SortKey {
    #[default]
    Date,
    Amount,
    Name,
}

impl SortKey {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Amount => "amount",
            Self::Name => "name",
        }
    }

    pub(crate) fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "date" | "d" => Some(Self::Date),
            "amount" | "a" => Some(Self::Amount),
            "name" | "n" => Some(Self::Name),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub(crate) fn flipped(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct SortState {
    pub(crate) key: SortKey,
    pub(crate) direction: SortDirection,
}

impl SortState {
    /// Same key flips the direction; a new key starts descending.
    pub(crate) fn toggle(&mut self, key: SortKey) {
        if self.key == key {
            self.direction = self.direction.flipped();
        } else {
            self.key = key;
            self.direction = SortDirection::Desc;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum CategoryFilter {
    #[default]
    All,
    Only(ExpenseCategory),
}

impl CategoryFilter {
    pub(crate) fn matches(&self, category: ExpenseCategory) -> bool {
        match self {
            Self::All => true,
            Self::Only(c) => *c == category,
        }
    }
}

impl std::fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => write!(f, "All categories"),
            Self::Only(c) => write!(f, "{c}"),
        }
    }
}

/// Distinct categories in first-seen order.
pub(crate) fn categories_present(expenses: &[Expense]) -> Vec<ExpenseCategory> {
    let mut seen = Vec::new();
    for e in expenses {
        if !seen.contains(&e.category) {
            seen.push(e.category);
        }
    }
    seen
}

pub(crate) fn filter_and_sort_expenses<'a>(
    expenses: &'a [Expense],
    search_term: &str,
    category_filter: CategoryFilter,
    sort_key: SortKey,
    sort_direction: SortDirection,
) -> Vec<&'a Expense> {
    let needle = search_term.trim().to_lowercase();
    let mut rows: Vec<&Expense> = expenses
        .iter()
        .filter(|e| category_filter.matches(e.category))
        .filter(|e| e.matches_search(&needle))
        .collect();

    rows.sort_by(|a, b| compare(a, b, sort_key, sort_direction));
    rows
}

fn compare(a: &Expense, b: &Expense, key: SortKey, direction: SortDirection) -> Ordering {
    let directed = |ord: Ordering| match direction {
        SortDirection::Asc => ord,
        SortDirection::Desc => ord.reverse(),
    };
    match key {
        // Unparseable dates go last whichever way we sort.
        SortKey::Date => match (a.parsed_date(), b.parsed_date()) {
            (Some(da), Some(db)) => directed(da.cmp(&db)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
        SortKey::Amount => directed(a.amount.cmp(&b.amount)),
        SortKey::Name => directed(
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.name.cmp(&b.name)),
        ),
    }
}
