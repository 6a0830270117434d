//! Budget-health advisor.
//!
//! Summarises the project into a prompt, asks a [`CompletionService`] for an
//! [`AiAnalysisResult`] constrained by a JSON response schema, and falls back
//! to a fixed `Warning` result whenever anything along the way fails.

use crate::error::{BudgetError, Result};
use crate::metrics::{total_spent, utilization_ratio};
use crate::schema::{AiAnalysisResult, AnalysisStatus, Category, Expense, ProjectSettings};
use chrono::NaiveDate;
use futures::future::BoxFuture;
use log::{debug, error, info};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::future::Future;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

const FALLBACK_SUMMARY: &str =
    "AI analysis unavailable at the moment. Please check your network connection or API key.";
const FALLBACK_RISK: &str = "Analysis service unreachable";
const FALLBACK_RECOMMENDATION: &str = "Manually review large expenses";

const SYSTEM_INSTRUCTION: &str =
    "You are a senior project finance analyst. Analyze this project budget.";

/// A single structured-output completion call.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub system_instruction: Option<String>,
    pub prompt: String,
    /// Gemini-compatible JSON schema the response text must follow.
    pub response_schema: Option<Value>,
}

/// Anything that can turn a [`CompletionRequest`] into response text.
pub trait CompletionService: Send + Sync {
    fn complete<'a>(&'a self, request: &'a CompletionRequest) -> BoxFuture<'a, Result<String>>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct AdvisorConfig {
    pub model: String,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

/// An expense reduced to the fields the analyst sees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseSummary {
    pub description: String,
    pub amount: f64,
    pub category: Category,
    pub date: NaiveDate,
}

/// Everything sent to the analyst about the current state of the project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub project_name: String,
    pub total_budget: f64,
    pub total_spent: f64,
    /// Unclamped utilization, one decimal place.
    pub utilization: String,
    pub start_date: NaiveDate,
    pub expenses: Vec<ExpenseSummary>,
}

impl AnalysisRequest {
    pub fn from_state(expenses: &[Expense], settings: &ProjectSettings) -> Self {
        Self {
            project_name: settings.name.clone(),
            total_budget: settings.total_budget,
            total_spent: total_spent(expenses),
            utilization: format!("{:.1}", utilization_ratio(expenses, settings)),
            start_date: settings.start_date,
            expenses: expenses
                .iter()
                .map(|e| ExpenseSummary {
                    description: e.description.clone(),
                    amount: e.amount,
                    category: e.category,
                    date: e.date,
                })
                .collect(),
        }
    }

    pub fn to_prompt(&self) -> Result<String> {
        let expense_list = serde_json::to_string(&self.expenses)?;
        Ok(format!(
            "Project Details:\n\
             - Name: {}\n\
             - Total Budget: {}\n\
             - Total Spent So Far: {} ({}%)\n\
             - Start Date: {}\n\
             \n\
             Expenses List:\n\
             {}\n\
             \n\
             Provide a structured JSON assessment of the project's financial health.",
            self.project_name,
            self.total_budget,
            self.total_spent,
            self.utilization,
            self.start_date.format("%Y-%m-%d"),
            expense_list
        ))
    }
}

/// The degraded result returned whenever the service cannot produce an analysis.
pub fn fallback_analysis() -> AiAnalysisResult {
    AiAnalysisResult {
        status: AnalysisStatus::Warning,
        summary: FALLBACK_SUMMARY.to_string(),
        risks: vec![FALLBACK_RISK.to_string()],
        recommendations: vec![FALLBACK_RECOMMENDATION.to_string()],
    }
}

/// Parses response text as an analysis. List lengths are not enforced.
pub fn parse_analysis(text: &str) -> Result<AiAnalysisResult> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(BudgetError::EmptyResponse);
    }
    serde_json::from_str(trimmed).map_err(|e| {
        BudgetError::AdvisorFailed(format!("Response did not match the analysis schema: {}", e))
    })
}

/// Generates a Gemini-compatible JSON schema (no $ref, $schema, title or definitions)
/// for [`AiAnalysisResult`].
pub fn gemini_response_schema() -> Result<Value> {
    let mut root = serde_json::to_value(AiAnalysisResult::generate_json_schema())?;
    let definitions = match &mut root {
        Value::Object(map) => {
            map.remove("$schema");
            map.remove("definitions").unwrap_or(Value::Null)
        }
        _ => Value::Null,
    };
    Ok(clean_schema_node(root, &definitions))
}

fn clean_schema_node(node: Value, definitions: &Value) -> Value {
    let mut map = match node {
        Value::Object(map) => map,
        Value::Array(items) => {
            return Value::Array(
                items
                    .into_iter()
                    .map(|item| clean_schema_node(item, definitions))
                    .collect(),
            )
        }
        other => return other,
    };

    // schemars wraps a described reference as `allOf: [{$ref}]`
    if let Some(Value::Array(mut all_of)) = map.remove("allOf") {
        if all_of.len() == 1 {
            if let Value::Object(inner) = all_of.remove(0) {
                merge_missing(&mut map, inner);
            }
        } else {
            map.insert("allOf".to_string(), Value::Array(all_of));
        }
    }

    if let Some(Value::String(reference)) = map.remove("$ref") {
        let name = reference.rsplit('/').next().unwrap_or_default();
        if let Some(Value::Object(definition)) = definitions.get(name) {
            merge_missing(&mut map, definition.clone());
        }
        // A referenced definition may itself hold an allOf or $ref.
        return clean_schema_node(Value::Object(map), definitions);
    }

    map.remove("title");

    let cleaned: Map<String, Value> = map
        .into_iter()
        .map(|(key, value)| {
            let value = match (key.as_str(), value) {
                ("properties", Value::Object(props)) => Value::Object(
                    props
                        .into_iter()
                        .map(|(name, schema)| (name, clean_schema_node(schema, definitions)))
                        .collect(),
                ),
                ("items", value) => clean_schema_node(value, definitions),
                (_, value) => value,
            };
            (key, value)
        })
        .collect();

    Value::Object(cleaned)
}

fn merge_missing(target: &mut Map<String, Value>, source: Map<String, Value>) {
    for (key, value) in source {
        target.entry(key).or_insert(value);
    }
}

pub struct BudgetAdvisor<S> {
    service: S,
    config: AdvisorConfig,
}

impl<S: CompletionService> BudgetAdvisor<S> {
    pub fn new(service: S) -> Self {
        Self::with_config(service, AdvisorConfig::default())
    }

    pub fn with_config(service: S, config: AdvisorConfig) -> Self {
        Self { service, config }
    }

    pub fn config(&self) -> &AdvisorConfig {
        &self.config
    }

    pub fn build_request(
        &self,
        expenses: &[Expense],
        settings: &ProjectSettings,
    ) -> Result<CompletionRequest> {
        let summary = AnalysisRequest::from_state(expenses, settings);
        Ok(CompletionRequest {
            model: self.config.model.clone(),
            system_instruction: Some(SYSTEM_INSTRUCTION.to_string()),
            prompt: summary.to_prompt()?,
            response_schema: Some(gemini_response_schema()?),
        })
    }

    /// Requests a fresh analysis. Never fails: any error is logged and replaced
    /// by [`fallback_analysis`].
    ///
    /// The request is built before this returns, so the future does not borrow
    /// `expenses` or `settings` and the caller may keep mutating them meanwhile.
    pub fn analyze(
        &self,
        expenses: &[Expense],
        settings: &ProjectSettings,
    ) -> impl Future<Output = AiAnalysisResult> + Send + '_ {
        let pending = self.try_analyze(expenses, settings);
        async move {
            match pending.await {
                Ok(result) => result,
                Err(e) => {
                    error!("Budget analysis failed: {}", e);
                    fallback_analysis()
                }
            }
        }
    }

    /// Like [`analyze`](Self::analyze) but surfaces the failure instead of
    /// substituting the fallback.
    pub fn try_analyze(
        &self,
        expenses: &[Expense],
        settings: &ProjectSettings,
    ) -> impl Future<Output = Result<AiAnalysisResult>> + Send + '_ {
        let request = self.build_request(expenses, settings);
        let expense_count = expenses.len();
        async move {
            let request = request?;
            info!(
                "Requesting budget analysis from {} for {} expenses",
                request.model, expense_count
            );
            let text = self.service.complete(&request).await?;
            debug!("Advisor returned {} bytes", text.len());
            parse_analysis(&text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::SeedData;
    use futures::executor::block_on;
    use futures::FutureExt;
    use std::sync::Mutex;

    struct Canned(String);

    impl CompletionService for Canned {
        fn complete<'a>(&'a self, _request: &'a CompletionRequest) -> BoxFuture<'a, Result<String>> {
            futures::future::ready(Ok(self.0.clone())).boxed()
        }
    }

    struct Unreachable;

    impl CompletionService for Unreachable {
        fn complete<'a>(&'a self, _request: &'a CompletionRequest) -> BoxFuture<'a, Result<String>> {
            futures::future::ready(Err(BudgetError::AdvisorFailed(
                "connection refused".to_string(),
            )))
            .boxed()
        }
    }

    #[derive(Default)]
    struct Recording(Mutex<Vec<CompletionRequest>>);

    impl CompletionService for Recording {
        fn complete<'a>(&'a self, request: &'a CompletionRequest) -> BoxFuture<'a, Result<String>> {
            if let Ok(mut seen) = self.0.lock() {
                seen.push(request.clone());
            }
            futures::future::ready(Ok(String::new())).boxed()
        }
    }

    const ON_TRACK: &str = r#"{
        "status": "On Track",
        "summary": "Spending is modest. Marketing dominates.",
        "risks": ["Ad spend concentration"],
        "recommendations": ["Cap ads", "Track labor", "Review tooling", "Extra"]
    }"#;

    #[test]
    fn test_request_summarises_project() {
        let seed = SeedData::builtin();
        let request = AnalysisRequest::from_state(&seed.expenses, &seed.settings);

        assert_eq!(request.project_name, "Q3 Product Launch");
        assert_eq!(request.utilization, "16.8");
        assert_eq!(request.expenses.len(), 7);

        let prompt = request.to_prompt().unwrap();
        assert!(prompt.contains("- Total Budget: 50000"));
        assert!(prompt.contains("- Total Spent So Far: 8390 (16.8%)"));
        assert!(prompt.contains("- Start Date: 2023-09-01"));
        assert!(prompt.contains(r#""description":"Cloud Server Setup""#));
        assert!(!prompt.contains("paid_by"));
    }

    #[test]
    fn test_utilization_in_request_is_unclamped() {
        let mut seed = SeedData::builtin();
        seed.settings.total_budget = 4195.0;
        let request = AnalysisRequest::from_state(&seed.expenses, &seed.settings);
        assert_eq!(request.utilization, "200.0");
    }

    #[test]
    fn test_response_schema_is_flat() {
        let schema = gemini_response_schema().unwrap();
        let text = schema.to_string();

        assert!(!text.contains("$ref"));
        assert!(!text.contains("definitions"));
        assert!(!text.contains("$schema"));

        assert_eq!(schema["type"], "object");
        let status = &schema["properties"]["status"];
        assert_eq!(status["type"], "string");
        assert_eq!(
            status["enum"],
            serde_json::json!(["On Track", "Warning", "Critical"])
        );
        assert!(status["description"].as_str().unwrap().contains("burn rate"));
        assert_eq!(schema["properties"]["risks"]["items"]["type"], "string");

        let required = schema["required"].as_array().unwrap();
        assert_eq!(required.len(), 4);
    }

    #[test]
    fn test_successful_analysis_is_returned_unmodified() {
        let seed = SeedData::builtin();
        let advisor = BudgetAdvisor::new(Canned(ON_TRACK.to_string()));
        let result = block_on(advisor.analyze(&seed.expenses, &seed.settings));

        assert_eq!(result.status, AnalysisStatus::OnTrack);
        assert_eq!(result.risks.len(), 1);
        assert_eq!(result.recommendations.len(), 4);
    }

    #[test]
    fn test_network_failure_returns_fallback() {
        let seed = SeedData::builtin();
        let advisor = BudgetAdvisor::new(Unreachable);
        let result = block_on(advisor.analyze(&seed.expenses, &seed.settings));

        assert_eq!(result.status, AnalysisStatus::Warning);
        assert_eq!(result.risks, vec!["Analysis service unreachable".to_string()]);
        assert_eq!(
            result.recommendations,
            vec!["Manually review large expenses".to_string()]
        );
        assert_eq!(result, fallback_analysis());
    }

    #[test]
    fn test_malformed_and_empty_responses_fall_back() {
        let seed = SeedData::builtin();

        for body in ["", "   ", "not json", r#"{"status": "Fine", "summary": "", "risks": [], "recommendations": []}"#] {
            let advisor = BudgetAdvisor::new(Canned(body.to_string()));
            let result = block_on(advisor.analyze(&seed.expenses, &seed.settings));
            assert_eq!(result, fallback_analysis(), "body {:?} should fall back", body);
        }
    }

    #[test]
    fn test_try_analyze_surfaces_errors() {
        let seed = SeedData::builtin();
        let advisor = BudgetAdvisor::new(Canned(String::new()));
        let result = block_on(advisor.try_analyze(&seed.expenses, &seed.settings));
        assert!(matches!(result, Err(BudgetError::EmptyResponse)));
    }

    #[test]
    fn test_each_call_sends_a_fresh_request() {
        let mut seed = SeedData::builtin();
        let advisor = BudgetAdvisor::with_config(
            Recording::default(),
            AdvisorConfig {
                model: "test-model".to_string(),
            },
        );

        block_on(advisor.analyze(&seed.expenses, &seed.settings));
        seed.expenses.remove(0);
        block_on(advisor.analyze(&seed.expenses, &seed.settings));

        let seen = advisor.service.0.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].model, "test-model");
        assert!(seen[0].prompt.contains("Cloud Server Setup"));
        assert!(!seen[1].prompt.contains("Cloud Server Setup"));
        assert!(seen[1].response_schema.is_some());
    }
}
