use crate::schema::{Expense, NewExpense};
use log::debug;
use rand::Rng;

const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const ID_LENGTH: usize = 9;

/// Owns the expense collection. Records are kept most-recent-first.
#[derive(Debug, Clone, Default)]
pub struct ExpenseStore {
    expenses: Vec<Expense>,
}

impl ExpenseStore {
    pub fn new(expenses: Vec<Expense>) -> Self {
        Self { expenses }
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn get(&self, id: &str) -> Option<&Expense> {
        self.expenses.iter().find(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.expenses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expenses.is_empty()
    }

    /// The first `n` records, i.e. the most recently added.
    pub fn recent(&self, n: usize) -> &[Expense] {
        &self.expenses[..n.min(self.expenses.len())]
    }

    /// Assigns a fresh id and puts the expense at the front of the collection.
    pub fn add(&mut self, expense: NewExpense) -> &Expense {
        let id = self.fresh_id();
        debug!(
            "Adding expense {} ({:.2}, {}) paid by {}",
            id, expense.amount, expense.category, expense.paid_by
        );
        self.expenses.insert(0, expense.with_id(id));
        &self.expenses[0]
    }

    /// Removes the expense with this id. Unknown ids are a no-op.
    pub fn delete(&mut self, id: &str) -> Option<Expense> {
        match self.expenses.iter().position(|e| e.id == id) {
            Some(idx) => {
                debug!("Deleting expense {}", id);
                Some(self.expenses.remove(idx))
            }
            None => {
                debug!("Delete ignored, no expense with id {}", id);
                None
            }
        }
    }

    fn fresh_id(&self) -> String {
        let mut rng = rand::thread_rng();
        loop {
            let id: String = (0..ID_LENGTH)
                .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
                .collect();
            if self.get(&id).is_none() {
                return id;
            }
        }
    }
}
