use crate::error::{BudgetError, Result};
use crate::schema::{Category, Expense, Partner, ProjectSettings};
use chrono::NaiveDate;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Initial partners, settings and expenses used to bootstrap a project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedData {
    pub partners: Vec<Partner>,
    pub settings: ProjectSettings,
    #[serde(default)]
    pub expenses: Vec<Expense>,
}

impl SeedData {
    /// The compiled-in fixture: three partners, a 50,000 budget and seven expenses.
    pub fn builtin() -> Self {
        Self {
            partners: vec![
                partner("p1", "Alex Chen", "Project Lead", "alex"),
                partner("p2", "Sarah Jones", "Marketing", "sarah"),
                partner("p3", "Mike Ross", "Developer", "mike"),
            ],
            settings: ProjectSettings {
                name: "Q3 Product Launch".to_string(),
                total_budget: 50_000.0,
                start_date: ymd(2023, 9, 1),
                currency: "$".to_string(),
            },
            expenses: vec![
                expense("e1", "Cloud Server Setup", 1200.0, ymd(2023, 9, 5), Category::Software, "p3"),
                expense("e2", "Social Media Ads", 3500.0, ymd(2023, 9, 10), Category::Marketing, "p2"),
                expense("e3", "Prototyping Materials", 850.0, ymd(2023, 9, 12), Category::Materials, "p1"),
                expense("e4", "Team Offsite Lunch", 240.0, ymd(2023, 9, 15), Category::Office, "p1"),
                expense("e5", "Freelance Designer", 1500.0, ymd(2023, 9, 20), Category::Labor, "p2"),
                expense("e6", "Dev Tools License", 600.0, ymd(2023, 9, 22), Category::Software, "p3"),
                expense("e7", "User Testing Incentives", 500.0, ymd(2023, 9, 25), Category::Other, "p2"),
            ],
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let seed: SeedData = serde_json::from_str(json)?;
        seed.validate()?;
        debug!(
            "Loaded seed with {} partners and {} expenses",
            seed.partners.len(),
            seed.expenses.len()
        );
        Ok(seed)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading seed data from {}", path.display());
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Checks the invariants the rest of the crate relies on: a positive budget,
    /// unique ids, non-negative amounts and expenses paid by known partners.
    pub fn validate(&self) -> Result<()> {
        let budget = self.settings.total_budget;
        if !budget.is_finite() || budget <= 0.0 {
            return Err(BudgetError::InvalidBudget(budget));
        }

        let mut partner_ids = HashSet::new();
        for partner in &self.partners {
            if !partner_ids.insert(partner.id.as_str()) {
                return Err(BudgetError::DuplicateId {
                    kind: "partner".to_string(),
                    id: partner.id.clone(),
                });
            }
        }

        let mut expense_ids = HashSet::new();
        for expense in &self.expenses {
            if !expense_ids.insert(expense.id.as_str()) {
                return Err(BudgetError::DuplicateId {
                    kind: "expense".to_string(),
                    id: expense.id.clone(),
                });
            }
            if !expense.amount.is_finite() || expense.amount < 0.0 {
                return Err(BudgetError::InvalidAmount(expense.amount));
            }
            if !partner_ids.contains(expense.paid_by.as_str()) {
                return Err(BudgetError::UnknownPartner(expense.paid_by.clone()));
            }
        }

        Ok(())
    }
}

impl Default for SeedData {
    fn default() -> Self {
        Self::builtin()
    }
}

fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

fn partner(id: &str, name: &str, role: &str, avatar_seed: &str) -> Partner {
    Partner {
        id: id.to_string(),
        name: name.to_string(),
        role: role.to_string(),
        avatar_url: format!("https://picsum.photos/seed/{}/100/100", avatar_seed),
    }
}

fn expense(
    id: &str,
    description: &str,
    amount: f64,
    date: NaiveDate,
    category: Category,
    paid_by: &str,
) -> Expense {
    Expense {
        id: id.to_string(),
        description: description.to_string(),
        amount,
        date,
        category,
        paid_by: paid_by.to_string(),
    }
}
