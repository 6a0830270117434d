use crate::error::{BudgetError, Result};
use crate::schema::{Category, NewExpense, Partner};
use chrono::NaiveDate;

/// Raw field values of the "Log Expense" form, as typed by the user.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseForm {
    pub description: String,
    pub amount: String,
    /// YYYY-MM-DD
    pub date: String,
    pub category: Category,
    pub paid_by: String,
}

impl ExpenseForm {
    /// A blank form dated `today`, paid by the first partner if there is one.
    pub fn blank(today: NaiveDate, partners: &[Partner]) -> Self {
        Self {
            description: String::new(),
            amount: String::new(),
            date: today.format("%Y-%m-%d").to_string(),
            category: Category::default(),
            paid_by: partners.first().map(|p| p.id.clone()).unwrap_or_default(),
        }
    }

    /// Clears the text fields and moves the date back to `today`.
    /// Category and payer keep their last selection.
    pub fn reset(&mut self, today: NaiveDate) {
        self.description.clear();
        self.amount.clear();
        self.date = today.format("%Y-%m-%d").to_string();
    }

    pub fn validate(&self, partners: &[Partner]) -> Result<NewExpense> {
        let description = self.description.trim();
        if description.is_empty() {
            return Err(BudgetError::validation("description", "is required"));
        }

        let raw_amount = self.amount.trim();
        if raw_amount.is_empty() {
            return Err(BudgetError::validation("amount", "is required"));
        }
        let amount: f64 = raw_amount
            .parse()
            .map_err(|_| BudgetError::validation("amount", format!("'{}' is not a number", raw_amount)))?;
        if !amount.is_finite() || amount < 0.0 {
            return Err(BudgetError::InvalidAmount(amount));
        }

        let date = NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d")
            .map_err(|e| BudgetError::DateError(format!("'{}': {}", self.date, e)))?;

        if !partners.iter().any(|p| p.id == self.paid_by) {
            return Err(BudgetError::UnknownPartner(self.paid_by.clone()));
        }

        Ok(NewExpense {
            description: description.to_string(),
            amount,
            date,
            category: self.category,
            paid_by: self.paid_by.clone(),
        })
    }
}
