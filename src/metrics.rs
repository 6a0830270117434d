//! Derived spending metrics.
//!
//! Everything here is a pure function of the expense collection and is
//! recomputed from scratch on every call; nothing is cached between renders.

use crate::schema::{Category, Expense, Partner, ProjectSettings};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: Category,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartnerTotal {
    pub partner_id: String,
    pub total: f64,
    pub count: usize,
    /// Share of total spending in percent; 0 when nothing has been spent.
    pub contribution_percentage: f64,
}

pub fn total_spent(expenses: &[Expense]) -> f64 {
    expenses.iter().map(|e| e.amount).sum()
}

/// Budget left after spending. Goes negative once the budget is exceeded.
pub fn remaining_budget(expenses: &[Expense], settings: &ProjectSettings) -> f64 {
    settings.total_budget - total_spent(expenses)
}

/// Spending as a percentage of the budget, unclamped.
pub fn utilization_ratio(expenses: &[Expense], settings: &ProjectSettings) -> f64 {
    total_spent(expenses) / settings.total_budget * 100.0
}

/// Display form of [`utilization_ratio`], capped at 100.
pub fn utilization_percentage(expenses: &[Expense], settings: &ProjectSettings) -> f64 {
    utilization_ratio(expenses, settings).min(100.0)
}

pub fn is_over_budget(expenses: &[Expense], settings: &ProjectSettings) -> bool {
    utilization_ratio(expenses, settings) > 100.0
}

pub fn category_total(expenses: &[Expense], category: Category) -> f64 {
    expenses
        .iter()
        .filter(|e| e.category == category)
        .map(|e| e.amount)
        .sum()
}

/// Per-category sums in [`Category::ALL`] order. Categories with nothing spent are omitted.
pub fn category_totals(expenses: &[Expense]) -> Vec<CategoryTotal> {
    Category::ALL
        .into_iter()
        .map(|category| CategoryTotal {
            category,
            total: category_total(expenses, category),
        })
        .filter(|ct| ct.total > 0.0)
        .collect()
}

pub fn contribution_percentage(partner_total: f64, total_spent: f64) -> f64 {
    if total_spent == 0.0 {
        return 0.0;
    }
    let pct = partner_total / total_spent * 100.0;
    if pct.is_nan() {
        0.0
    } else {
        pct
    }
}

pub fn partner_total(expenses: &[Expense], partner_id: &str) -> PartnerTotal {
    let spent = total_spent(expenses);
    let (total, count) = expenses
        .iter()
        .filter(|e| e.paid_by == partner_id)
        .fold((0.0, 0), |(sum, n), e| (sum + e.amount, n + 1));

    PartnerTotal {
        partner_id: partner_id.to_string(),
        total,
        count,
        contribution_percentage: contribution_percentage(total, spent),
    }
}

/// One entry per partner, in partner order, including partners with no expenses.
pub fn partner_totals(expenses: &[Expense], partners: &[Partner]) -> Vec<PartnerTotal> {
    partners
        .iter()
        .map(|p| partner_total(expenses, &p.id))
        .collect()
}

/// Every derived figure a render pass needs, computed in one go.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetSnapshot {
    pub total_budget: f64,
    pub total_spent: f64,
    pub remaining: f64,
    pub utilization_ratio: f64,
    pub utilization_percentage: f64,
    pub over_budget: bool,
    pub by_category: Vec<CategoryTotal>,
    pub by_partner: Vec<PartnerTotal>,
}

impl BudgetSnapshot {
    pub fn compute(
        expenses: &[Expense],
        settings: &ProjectSettings,
        partners: &[Partner],
    ) -> Self {
        let ratio = utilization_ratio(expenses, settings);
        Self {
            total_budget: settings.total_budget,
            total_spent: total_spent(expenses),
            remaining: remaining_budget(expenses, settings),
            utilization_ratio: ratio,
            utilization_percentage: ratio.min(100.0),
            over_budget: ratio > 100.0,
            by_category: category_totals(expenses),
            by_partner: partner_totals(expenses, partners),
        }
    }
}
