use chrono::Local;
use rust_decimal::Decimal;
use std::str::FromStr;
use thiserror::Error;

use crate::models::{Expense, ExpenseCategory};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub(crate) enum ValidationError {
    #[error("Expense name is required")]
    EmptyName,
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Amount must be greater than zero")]
    NonPositiveAmount,
}

/// Fields of the add-expense form, held as the user typed them.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ExpenseDraft {
    pub(crate) name: String,
    pub(crate) amount: String,
    pub(crate) category: ExpenseCategory,
    /// Format: "YYYY-MM-DD"
    pub(crate) date: String,
    pub(crate) notes: String,
}

impl Default for ExpenseDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            amount: String::new(),
            category: ExpenseCategory::Other,
            date: Local::now().format("%Y-%m-%d").to_string(),
            notes: String::new(),
        }
    }
}

impl ExpenseDraft {
    /// Parse the amount text. Empty text counts as zero; `$` and thousands
    /// separators are ignored.
    pub(crate) fn amount(&self) -> Result<Decimal, ValidationError> {
        parse_amount(&self.amount)
    }

    pub(crate) fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if self.amount()? <= Decimal::ZERO {
            return Err(ValidationError::NonPositiveAmount);
        }
        Ok(())
    }

    pub(crate) fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Build the expense and reset the form, keeping the date for the next
    /// entry. On error the form is left untouched.
    pub(crate) fn submit(&mut self) -> Result<Expense, ValidationError> {
        self.validate()?;
        let amount = self.amount()?;
        let notes = Some(self.notes.trim())
            .filter(|n| !n.is_empty())
            .map(String::from);
        let expense = Expense::new(
            self.name.trim().to_string(),
            amount,
            self.category,
            self.date.trim().to_string(),
            notes,
        );
        *self = Self {
            date: std::mem::take(&mut self.date),
            ..Self::default()
        };
        Ok(expense)
    }
}

pub(crate) fn parse_amount(input: &str) -> Result<Decimal, ValidationError> {
    let cleaned = input.trim().replace(['$', ','], "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return Ok(Decimal::ZERO);
    }
    Decimal::from_str(cleaned).map_err(|_| ValidationError::InvalidAmount(input.trim().to_string()))
}
