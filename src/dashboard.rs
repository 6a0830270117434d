//! Text rendering of the three dashboard tabs and the UI state behind them.

use crate::context::ProjectContext;
use crate::error::Result;
use crate::form::ExpenseForm;
use crate::metrics::BudgetSnapshot;
use crate::schema::{AiAnalysisResult, AnalysisStatus, Expense, ProjectSettings};
use chrono::NaiveDate;
use log::debug;
use std::fmt::{self, Write};

const RECENT_ACTIVITY_ROWS: usize = 5;
const BAR_WIDTH: usize = 20;
/// Displayed utilization above which the spent tile trends up.
const HIGH_UTILIZATION: f64 = 80.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Dashboard,
    Expenses,
    Partners,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Dashboard, Tab::Expenses, Tab::Partners];

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Dashboard => "Dashboard",
            Tab::Expenses => "Expenses",
            Tab::Partners => "Partners",
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.title())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Up,
    Down,
    Neutral,
}

impl Trend {
    pub fn glyph(&self) -> &'static str {
        match self {
            Trend::Up => "↑",
            Trend::Down => "↓",
            Trend::Neutral => "–",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatTile {
    pub title: String,
    pub value: String,
    pub subtitle: Option<String>,
    pub trend: Option<Trend>,
}

/// Budget, spent and remaining tiles for the top of the dashboard.
pub fn stat_tiles(snapshot: &BudgetSnapshot, settings: &ProjectSettings) -> Vec<StatTile> {
    let spent_trend = if snapshot.utilization_percentage > HIGH_UTILIZATION {
        Trend::Up
    } else {
        Trend::Neutral
    };

    vec![
        StatTile {
            title: "Total Budget".to_string(),
            value: format_currency(&settings.currency, snapshot.total_budget),
            subtitle: None,
            trend: None,
        },
        StatTile {
            title: "Total Spent".to_string(),
            value: format_currency(&settings.currency, snapshot.total_spent),
            subtitle: Some(format!("{:.1}% utilized", snapshot.utilization_percentage)),
            trend: Some(spent_trend),
        },
        StatTile {
            title: "Remaining".to_string(),
            value: format_currency(&settings.currency, snapshot.remaining),
            subtitle: None,
            trend: None,
        },
    ]
}

/// Groups thousands and shows cents only when there are any.
pub fn format_amount(value: f64) -> String {
    let cents = (value.abs() * 100.0).round() as u64;
    let (whole, frac) = (cents / 100, cents % 100);

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    if frac == 0 {
        format!("{}{}", sign, grouped)
    } else {
        format!("{}{}.{:02}", sign, grouped, frac)
    }
}

pub fn format_currency(symbol: &str, value: f64) -> String {
    let amount = format_amount(value);
    match amount.strip_prefix('-') {
        Some(positive) => format!("-{}{}", symbol, positive),
        None => format!("{}{}", symbol, amount),
    }
}

fn bar(percentage: f64) -> String {
    let filled = ((percentage.clamp(0.0, 100.0) / 100.0) * BAR_WIDTH as f64).round() as usize;
    format!("[{}{}]", "#".repeat(filled), ".".repeat(BAR_WIDTH - filled))
}

fn status_glyph(status: AnalysisStatus) -> &'static str {
    match status {
        AnalysisStatus::OnTrack => "✔",
        AnalysisStatus::Warning => "!",
        AnalysisStatus::Critical => "✖",
    }
}

/// Advisor output shown on the dashboard.
///
/// Requests are never cancelled; every completion overwrites the shown result,
/// so whichever request finishes last wins. The panel is loading while any
/// request is still outstanding.
#[derive(Debug, Clone, Default)]
pub struct AnalysisPanel {
    in_flight: usize,
    latest: Option<AiAnalysisResult>,
}

impl AnalysisPanel {
    pub fn begin(&mut self) {
        self.in_flight += 1;
    }

    pub fn complete(&mut self, result: AiAnalysisResult) {
        self.in_flight = self.in_flight.saturating_sub(1);
        debug!("Analysis completed with status {}", result.status);
        self.latest = Some(result);
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    pub fn latest(&self) -> Option<&AiAnalysisResult> {
        self.latest.as_ref()
    }

    pub fn render(&self) -> String {
        let mut out = String::from("AI Budget Advisor\n");
        if self.is_loading() {
            out.push_str("  Analyzing...\n");
            return out;
        }
        match &self.latest {
            Some(result) => {
                let _ = writeln!(out, "  {} {}", status_glyph(result.status), result.status);
                let _ = writeln!(out, "  {}", result.summary);
                out.push_str("  Potential Risks\n");
                for risk in &result.risks {
                    let _ = writeln!(out, "    - {}", risk);
                }
                out.push_str("  Recommendations\n");
                for rec in &result.recommendations {
                    let _ = writeln!(out, "    - {}", rec);
                }
            }
            None => {
                out.push_str("  No analysis yet. Request one to assess budget health.\n");
            }
        }
        out
    }
}

/// UI-selection state: active tab, the add-expense form and the advisor panel.
#[derive(Debug, Clone)]
pub struct DashboardView {
    active_tab: Tab,
    form_open: bool,
    form: ExpenseForm,
    analysis: AnalysisPanel,
}

impl DashboardView {
    pub fn new(ctx: &ProjectContext, today: NaiveDate) -> Self {
        Self {
            active_tab: Tab::default(),
            form_open: false,
            form: ExpenseForm::blank(today, ctx.partners()),
            analysis: AnalysisPanel::default(),
        }
    }

    pub fn active_tab(&self) -> Tab {
        self.active_tab
    }

    pub fn select_tab(&mut self, tab: Tab) {
        self.active_tab = tab;
    }

    pub fn is_form_open(&self) -> bool {
        self.form_open
    }

    pub fn open_form(&mut self) {
        self.form_open = true;
    }

    pub fn close_form(&mut self) {
        self.form_open = false;
    }

    pub fn form(&self) -> &ExpenseForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut ExpenseForm {
        &mut self.form
    }

    /// Adds the form's expense. On success the form is reset and closed and the
    /// new id returned; on a validation error it stays open untouched.
    pub fn submit_form(&mut self, ctx: &mut ProjectContext, today: NaiveDate) -> Result<String> {
        let id = ctx.submit(&self.form)?.id.clone();
        self.form.reset(today);
        self.form_open = false;
        Ok(id)
    }

    pub fn delete_expense(&mut self, ctx: &mut ProjectContext, id: &str) -> Option<Expense> {
        ctx.delete_expense(id)
    }

    pub fn analysis(&self) -> &AnalysisPanel {
        &self.analysis
    }

    pub fn analysis_mut(&mut self) -> &mut AnalysisPanel {
        &mut self.analysis
    }

    pub fn render(&self, ctx: &ProjectContext) -> String {
        let mut out = String::new();
        let nav: Vec<String> = Tab::ALL
            .iter()
            .map(|tab| {
                if *tab == self.active_tab {
                    format!("[{}]", tab)
                } else {
                    tab.to_string()
                }
            })
            .collect();
        let _ = writeln!(out, "UnityBudget | {}", nav.join(" | "));
        let _ = writeln!(out, "{}\n", self.active_tab);

        let body = match self.active_tab {
            Tab::Dashboard => render_dashboard(ctx, &self.analysis),
            Tab::Expenses => render_expenses(ctx),
            Tab::Partners => render_partners(ctx),
        };
        out.push_str(&body);
        out
    }
}

pub fn render_dashboard(ctx: &ProjectContext, analysis: &AnalysisPanel) -> String {
    let settings = ctx.settings();
    let snapshot = ctx.snapshot();
    let mut out = String::new();

    let _ = writeln!(out, "{} (started {})", settings.name, settings.start_date);
    for tile in stat_tiles(&snapshot, settings) {
        let _ = write!(out, "  {:<14}{:>14}", tile.title, tile.value);
        if let Some(subtitle) = &tile.subtitle {
            let _ = write!(out, "  {}", subtitle);
        }
        if let Some(trend) = tile.trend {
            let _ = write!(out, "  {}", trend.glyph());
        }
        out.push('\n');
    }
    out.push('\n');

    out.push_str(&analysis.render());
    out.push('\n');

    out.push_str("Spending by Category\n");
    if snapshot.by_category.is_empty() {
        out.push_str("  No spending yet.\n");
    }
    for ct in &snapshot.by_category {
        let share = if snapshot.total_spent > 0.0 {
            ct.total / snapshot.total_spent * 100.0
        } else {
            0.0
        };
        let _ = writeln!(
            out,
            "  {:<10}{:>12}  {}",
            ct.category,
            format_currency(&settings.currency, ct.total),
            bar(share)
        );
    }
    out.push('\n');

    out.push_str("Partner Contribution\n");
    for pt in &snapshot.by_partner {
        let _ = writeln!(
            out,
            "  {:<14}{:>12}",
            ctx.partner_name(&pt.partner_id),
            format_currency(&settings.currency, pt.total)
        );
    }
    out.push('\n');

    out.push_str("Recent Activity\n");
    out.push_str(&expense_rows(ctx, ctx.store().recent(RECENT_ACTIVITY_ROWS), false));
    out
}

pub fn render_expenses(ctx: &ProjectContext) -> String {
    expense_rows(ctx, ctx.expenses(), true)
}

fn expense_rows(ctx: &ProjectContext, expenses: &[Expense], with_ids: bool) -> String {
    let currency = &ctx.settings().currency;
    let mut out = String::new();

    if expenses.is_empty() {
        out.push_str("  No expenses recorded yet.\n");
        return out;
    }

    for expense in expenses {
        if with_ids {
            let _ = write!(out, "  {:<10}", expense.id);
        }
        let _ = writeln!(
            out,
            "  {}  {:<26}{:<11}{:<14}{:>12}",
            expense.date.format("%Y-%m-%d"),
            expense.description,
            expense.category,
            ctx.partner_name(&expense.paid_by),
            format!("{}{:.2}", currency, expense.amount)
        );
    }
    out
}

pub fn render_partners(ctx: &ProjectContext) -> String {
    let snapshot = ctx.snapshot();
    let currency = &ctx.settings().currency;
    let mut out = String::new();

    for (partner, totals) in ctx.partners().iter().zip(&snapshot.by_partner) {
        let _ = writeln!(out, "  {} ({})", partner.name, partner.role);
        let _ = writeln!(
            out,
            "    Total Paid {}   Transactions {}",
            format_currency(currency, totals.total),
            totals.count
        );
        let _ = writeln!(
            out,
            "    {} {:.1}% of total",
            bar(totals.contribution_percentage),
            totals.contribution_percentage
        );
    }
    out
}
