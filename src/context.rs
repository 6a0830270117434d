use crate::error::Result;
use crate::form::ExpenseForm;
use crate::metrics::BudgetSnapshot;
use crate::schema::{Expense, NewExpense, Partner, ProjectSettings};
use crate::seed::SeedData;
use crate::store::ExpenseStore;
use log::info;

/// Owns everything a dashboard reads: the read-only partners and settings,
/// and the expense store. All mutation goes through [`add_expense`](Self::add_expense)
/// and [`delete_expense`](Self::delete_expense).
#[derive(Debug, Clone)]
pub struct ProjectContext {
    partners: Vec<Partner>,
    settings: ProjectSettings,
    store: ExpenseStore,
}

impl ProjectContext {
    /// Validates the seed and takes ownership of it.
    pub fn from_seed(seed: SeedData) -> Result<Self> {
        seed.validate()?;
        info!(
            "Bootstrapping project '{}' with {} partners and {} expenses",
            seed.settings.name,
            seed.partners.len(),
            seed.expenses.len()
        );
        Ok(Self {
            partners: seed.partners,
            settings: seed.settings,
            store: ExpenseStore::new(seed.expenses),
        })
    }

    pub fn partners(&self) -> &[Partner] {
        &self.partners
    }

    pub fn settings(&self) -> &ProjectSettings {
        &self.settings
    }

    pub fn expenses(&self) -> &[Expense] {
        self.store.expenses()
    }

    pub fn store(&self) -> &ExpenseStore {
        &self.store
    }

    pub fn partner(&self, id: &str) -> Option<&Partner> {
        self.partners.iter().find(|p| p.id == id)
    }

    pub fn partner_name(&self, id: &str) -> &str {
        self.partner(id).map(|p| p.name.as_str()).unwrap_or("Unknown")
    }

    pub fn add_expense(&mut self, expense: NewExpense) -> &Expense {
        self.store.add(expense)
    }

    /// Validates the form against the known partners and adds the result.
    pub fn submit(&mut self, form: &ExpenseForm) -> Result<&Expense> {
        let expense = form.validate(&self.partners)?;
        Ok(self.store.add(expense))
    }

    pub fn delete_expense(&mut self, id: &str) -> Option<Expense> {
        self.store.delete(id)
    }

    pub fn snapshot(&self) -> BudgetSnapshot {
        BudgetSnapshot::compute(self.store.expenses(), &self.settings, &self.partners)
    }
}

impl Default for ProjectContext {
    fn default() -> Self {
        let seed = SeedData::builtin();
        Self {
            partners: seed.partners,
            settings: seed.settings,
            store: ExpenseStore::new(seed.expenses),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BudgetError;
    use crate::schema::Category;
    use chrono::NaiveDate;

    #[test]
    fn test_snapshot_tracks_mutations() {
        let mut ctx = ProjectContext::default();
        let before = ctx.snapshot().total_spent;

        let id = ctx
            .add_expense(NewExpense {
                description: "Test".to_string(),
                amount: 100.0,
                date: NaiveDate::from_ymd_opt(2023, 10, 1).unwrap(),
                category: Category::Other,
                paid_by: "p1".to_string(),
            })
            .id
            .clone();
        assert!((ctx.snapshot().total_spent - before - 100.0).abs() < 1e-9);
        assert_eq!(ctx.expenses()[0].id, id);

        ctx.delete_expense(&id);
        assert!((ctx.snapshot().total_spent - before).abs() < 1e-9);
    }

    #[test]
    fn test_submit_validates_first() {
        let mut ctx = ProjectContext::default();
        let mut form = ExpenseForm::blank(NaiveDate::from_ymd_opt(2023, 10, 1).unwrap(), ctx.partners());

        assert!(matches!(ctx.submit(&form), Err(BudgetError::Validation { .. })));
        assert_eq!(ctx.expenses().len(), 7);

        form.description = "Flights".to_string();
        form.amount = "420".to_string();
        form.category = Category::Travel;
        let added = ctx.submit(&form).unwrap();
        assert_eq!(added.category, Category::Travel);
        assert_eq!(ctx.expenses().len(), 8);
    }

    #[test]
    fn test_partner_name_falls_back_to_unknown() {
        let ctx = ProjectContext::default();
        assert_eq!(ctx.partner_name("p2"), "Sarah Jones");
        assert_eq!(ctx.partner_name("nobody"), "Unknown");
    }

    #[test]
    fn test_from_seed_rejects_invalid_seed() {
        let mut seed = SeedData::builtin();
        seed.settings.total_budget = -1.0;
        assert!(ProjectContext::from_seed(seed).is_err());
    }
}
