mod budget;
mod category;
mod expense;

pub(crate) use budget::BudgetRule;
pub(crate) use category::ExpenseCategory;
pub(crate) use expense::{parse_date, round_cents, Expense};

#[cfg(test)]
mod tests;
