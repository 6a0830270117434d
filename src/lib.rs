//! # UnityBudget
//!
//! An in-memory budget tracker for a small team of project partners.
//!
//! ## Core Concepts
//!
//! - **Partners** pay for **expenses**, each dated and filed under one of seven categories
//! - **Project settings** fix the total budget and currency for the lifetime of the process
//! - **Derived metrics** (total spent, remaining, utilization, per-category and per-partner
//!   totals) are recomputed from the expense list every time they are read
//! - The **advisor** asks an LLM for a structured budget-health assessment and falls back
//!   to a fixed `Warning` result when the service cannot answer
//!
//! ## Example
//!
//! ```rust
//! use unity_budget::*;
//! use chrono::NaiveDate;
//!
//! let mut ctx = ProjectContext::from_seed(SeedData::builtin()).unwrap();
//!
//! let id = ctx
//!     .add_expense(NewExpense {
//!         description: "Test".to_string(),
//!         amount: 100.0,
//!         date: NaiveDate::from_ymd_opt(2023, 10, 1).unwrap(),
//!         category: Category::Other,
//!         paid_by: "p1".to_string(),
//!     })
//!     .id
//!     .clone();
//!
//! let snapshot = ctx.snapshot();
//! assert_eq!(snapshot.total_spent, 8490.0);
//! assert_eq!(ctx.expenses()[0].id, id);
//! ```

pub mod advisor;
pub mod context;
pub mod dashboard;
pub mod error;
pub mod form;
pub mod metrics;
pub mod schema;
pub mod seed;
pub mod store;

#[cfg(feature = "gemini")]
pub mod llm;

pub use advisor::{
    fallback_analysis, gemini_response_schema, parse_analysis, AdvisorConfig, AnalysisRequest,
    BudgetAdvisor, CompletionRequest, CompletionService, ExpenseSummary,
};
pub use context::ProjectContext;
pub use dashboard::{AnalysisPanel, DashboardView, StatTile, Tab, Trend};
pub use error::{BudgetError, Result};
pub use form::ExpenseForm;
pub use metrics::*;
pub use schema::*;
pub use seed::SeedData;
pub use store::ExpenseStore;
