use chrono::Local;
use dotenv::dotenv;
use unity_budget::llm::GeminiClient;
use unity_budget::{
    AdvisorConfig, BudgetAdvisor, Category, DashboardView, ProjectContext, SeedData, Tab,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    println!("📊 UnityBudget Dashboard Walkthrough");
    println!("═══════════════════════════════════════════════════════════════\n");

    // 1. Bootstrap from a seed file if one is given, otherwise the built-in fixture
    let seed = match std::env::args().nth(1) {
        Some(path) => {
            println!("📂 Loading seed from {}", path);
            SeedData::from_json_file(&path)?
        }
        None => SeedData::builtin(),
    };
    let mut ctx = ProjectContext::from_seed(seed)?;
    let today = Local::now().date_naive();
    let mut view = DashboardView::new(&ctx, today);

    for tab in Tab::ALL {
        view.select_tab(tab);
        println!("{}", view.render(&ctx));
        println!("───────────────────────────────────────────────────────────────\n");
    }

    // 2. Log an expense through the form
    view.open_form();
    {
        let form = view.form_mut();
        form.description = "Launch event catering".to_string();
        form.amount = "1850".to_string();
        form.category = Category::Other;
    }
    let id = view.submit_form(&mut ctx, today)?;
    println!("✅ Added expense {}\n", id);

    // 3. Ask the advisor. Without an API key the fallback result is shown instead.
    let model = std::env::var("GEMINI_MODEL").unwrap_or_else(|_| AdvisorConfig::default().model);
    view.analysis_mut().begin();
    let result = match GeminiClient::from_env() {
        Ok(client) => {
            let advisor = BudgetAdvisor::with_config(client, AdvisorConfig { model });
            advisor.analyze(ctx.expenses(), ctx.settings()).await
        }
        Err(e) => {
            println!("⚠️  {}", e);
            unity_budget::fallback_analysis()
        }
    };
    view.analysis_mut().complete(result);

    view.select_tab(Tab::Dashboard);
    println!("{}", view.render(&ctx));

    // 4. Remove it again
    view.delete_expense(&mut ctx, &id);
    view.select_tab(Tab::Expenses);
    println!("{}", view.render(&ctx));

    Ok(())
}
