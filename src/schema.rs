use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, JsonSchema)]
pub enum Category {
    Materials,
    Labor,
    Marketing,
    Software,
    Travel,
    Office,
    Other,
}

impl Category {
    /// Every category, in display order.
    pub const ALL: [Category; 7] = [
        Category::Materials,
        Category::Labor,
        Category::Marketing,
        Category::Software,
        Category::Travel,
        Category::Office,
        Category::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Materials => "Materials",
            Category::Labor => "Labor",
            Category::Marketing => "Marketing",
            Category::Software => "Software",
            Category::Travel => "Travel",
            Category::Office => "Office",
            Category::Other => "Other",
        }
    }
}

impl Default for Category {
    fn default() -> Self {
        Self::Other
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Partner {
    pub id: String,
    pub name: String,
    pub role: String,
    pub avatar_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Expense {
    pub id: String,
    pub description: String,
    pub amount: f64,
    /// Serialized as YYYY-MM-DD
    pub date: NaiveDate,
    pub category: Category,
    /// Partner id
    pub paid_by: String,
}

/// An expense as submitted, before the store assigns its id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewExpense {
    pub description: String,
    pub amount: f64,
    pub date: NaiveDate,
    pub category: Category,
    pub paid_by: String,
}

impl NewExpense {
    pub fn with_id(self, id: String) -> Expense {
        Expense {
            id,
            description: self.description,
            amount: self.amount,
            date: self.date,
            category: self.category,
            paid_by: self.paid_by,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProjectSettings {
    pub name: String,
    pub total_budget: f64,
    pub start_date: NaiveDate,
    /// Currency symbol used as a display prefix, e.g. "$"
    pub currency: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
pub enum AnalysisStatus {
    #[serde(rename = "On Track")]
    OnTrack,
    Warning,
    Critical,
}

impl AnalysisStatus {
    pub fn label(&self) -> &'static str {
        match self {
            AnalysisStatus::OnTrack => "On Track",
            AnalysisStatus::Warning => "Warning",
            AnalysisStatus::Critical => "Critical",
        }
    }
}

impl fmt::Display for AnalysisStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

/// Structured budget-health assessment.
/// This struct is serialized to JSON Schema and passed to the LLM as the response schema.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct AiAnalysisResult {
    #[schemars(
        description = "Overall financial health status based on burn rate and remaining budget."
    )]
    pub status: AnalysisStatus,

    #[schemars(description = "A concise 2-sentence executive summary of the current financial state.")]
    pub summary: String,

    #[schemars(description = "List of top 3 potential financial risks or anomalies detected.")]
    pub risks: Vec<String>,

    #[schemars(description = "List of 3 actionable recommendations to optimize spending.")]
    pub recommendations: Vec<String>,
}

impl AiAnalysisResult {
    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(AiAnalysisResult)
    }

    pub fn schema_as_json() -> std::result::Result<String, serde_json::Error> {
        let schema = Self::generate_json_schema();
        serde_json::to_string_pretty(&schema)
    }
}
