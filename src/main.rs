//! Pipeline Dashboard CLI
//!
//! Terminal front end for the sales pipeline dashboard:
//! - Sign in and out through the backend proxy
//! - Render the dashboard (KPI cards, pipeline and stage charts)
//! - Browse opportunities with stage, amount and sort filters
//! - Generate a config file

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use pipeline_dashboard::config::{generate_default_config, LoggingConfig};
use pipeline_dashboard::fetch::FetchState;
use pipeline_dashboard::filters::{
    OpportunityFilters, SortDirection, SortField, StageFilter, PAGE_SIZE,
};
use pipeline_dashboard::views;
use pipeline_dashboard::{App, Config, DashboardClient, Route, Session};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "pipeline-dashboard")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Sales pipeline dashboard over a CRM backend proxy")]
#[command(long_about = "Sales Pipeline Dashboard.\nKPI cards, pipeline charts and a filterable opportunity table, read through the backend proxy.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Backend proxy URL (overrides config)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Existing session cookie value (overrides config)
    #[arg(long, global = true)]
    pub session: Option<String>,

    /// Config file (default: standard locations)
    #[arg(long = "config", global = true)]
    pub config_path: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,

    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show whether the session is signed in
    Status,

    /// Start the login flow
    Login,

    /// End the session
    Logout,

    /// Render the full dashboard
    Dashboard {
        /// Months shown in the pipeline chart (default: config)
        #[arg(short, long)]
        months: Option<u32>,
    },

    /// Show the KPI cards
    Kpis,

    /// Show open opportunities by stage
    Stages,

    /// Show pipeline totals by month
    Pipeline {
        /// Months back from today (default: config)
        #[arg(short, long)]
        months: Option<u32>,
    },

    /// List opportunities
    Opportunities {
        /// Stage name (default: all stages)
        #[arg(short, long)]
        stage: Option<String>,
        /// Sort column (close-date, amount, name, stage)
        #[arg(long, default_value = "CloseDate")]
        sort_by: SortField,
        /// Minimum amount
        #[arg(long)]
        min_amount: Option<String>,
        /// Page number, starting at 1
        #[arg(short, long, default_value = "1")]
        page: u32,
        /// Sort ascending instead of descending
        #[arg(long)]
        ascending: bool,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config_path {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    init_tracing(&config.logging, cli.verbose);

    if let Some(url) = &cli.api_url {
        config.api.base_url = url.clone();
    }
    if let Some(session) = &cli.session {
        config.api.session_cookie = Some(session.clone());
    }

    if let Commands::Config { output } = &cli.command {
        let content = generate_default_config();
        match output {
            Some(path) => {
                std::fs::write(path, content)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                println!("Config written to {}", path.display());
            }
            None => print!("{}", content),
        }
        return Ok(());
    }

    let session = Session::from_config(&config.api);
    let client = DashboardClient::new(&config.api, session)
        .with_context(|| format!("Invalid backend URL: {}", config.api.base_url))?;
    tracing::debug!(base_url = %client.base_url(), "Backend client ready");

    match cli.command {
        Commands::Status => {
            let status = client
                .auth_status()
                .await
                .context("Failed to check session")?;
            let health = client.health().await.ok();

            match cli.format {
                OutputFormat::Json => print_json(&serde_json::json!({
                    "backend": client.base_url().as_str(),
                    "authenticated": status.authenticated,
                    "demo_mode": health.map(|h| h.demo_mode),
                }))?,
                OutputFormat::Table => {
                    println!("Backend:        {}", client.base_url());
                    if let Some(health) = health {
                        println!(
                            "Mode:           {}",
                            if health.demo_mode { "demo" } else { "live" }
                        );
                    }
                    println!(
                        "Authenticated:  {}",
                        if status.authenticated { "yes" } else { "no" }
                    );
                }
            }
        }

        Commands::Login => {
            let target = client.begin_login().await.context("Failed to start login")?;
            let cookie = client.session_cookie();

            match cli.format {
                OutputFormat::Json => print_json(&serde_json::json!({
                    "redirect": target,
                    "session": cookie,
                }))?,
                OutputFormat::Table => {
                    println!("Open this URL in a browser to continue signing in:");
                    println!("  {}", target);
                    if let Some(cookie) = cookie {
                        println!();
                        println!("Session: {}", cookie);
                        println!("Pass it with --session or PIPELINE_SESSION.");
                    }
                }
            }
        }

        Commands::Logout => {
            client.logout().await.context("Failed to log out")?;
            println!("Logged out");
        }

        Commands::Dashboard { months } => {
            let mut dashboard = config.dashboard.clone();
            if let Some(months) = months {
                dashboard.pipeline_months = months;
            }

            match cli.format {
                OutputFormat::Json => {
                    let (kpis, stages, pipeline) = tokio::join!(
                        client.kpis(),
                        client.stages(),
                        client.pipeline(dashboard.pipeline_months)
                    );
                    print_json(&serde_json::json!({
                        "kpis": kpis.context("Failed to load KPIs")?,
                        "stages": stages.context("Failed to load stages")?,
                        "pipeline": pipeline.context("Failed to load pipeline")?,
                    }))?;
                }
                OutputFormat::Table => {
                    let app = App::start(client, dashboard).await;
                    println!("{}", app.render(Route::Dashboard).await);
                }
            }
        }

        Commands::Kpis => {
            let kpis = client.kpis().await.context("Failed to load KPIs")?;
            match cli.format {
                OutputFormat::Json => print_json(&kpis)?,
                OutputFormat::Table => println!("{}", views::render_kpis(&loaded(kpis))),
            }
        }

        Commands::Stages => {
            let stages = client.stages().await.context("Failed to load stages")?;
            match cli.format {
                OutputFormat::Json => print_json(&stages)?,
                OutputFormat::Table => {
                    let view = pipeline_dashboard::charts::stage_view(&loaded(stages));
                    println!("{}", views::render_pie_chart(&view));
                }
            }
        }

        Commands::Pipeline { months } => {
            let months = months.unwrap_or(config.dashboard.pipeline_months);
            let pipeline = client
                .pipeline(months)
                .await
                .context("Failed to load pipeline")?;
            match cli.format {
                OutputFormat::Json => print_json(&pipeline)?,
                OutputFormat::Table => {
                    let view = pipeline_dashboard::charts::pipeline_view(&loaded(pipeline));
                    println!("{}", views::render_bar_chart(&view));
                }
            }
        }

        Commands::Opportunities {
            stage,
            sort_by,
            min_amount,
            page,
            ascending,
        } => {
            let mut filters = OpportunityFilters::new();
            filters.set_stage(StageFilter::from_selection(stage.as_deref().unwrap_or("")));
            filters.set_sort_by(sort_by);
            if ascending {
                filters.set_sort_dir(Some(SortDirection::Asc));
            }
            if let Some(text) = min_amount {
                filters.set_min_amount(text);
            }
            filters.set_offset(page.saturating_sub(1).saturating_mul(PAGE_SIZE));

            match cli.format {
                OutputFormat::Json => {
                    let listing = client
                        .opportunities(&filters.to_query())
                        .await
                        .context("Failed to load opportunities")?;
                    print_json(&listing)?;
                }
                OutputFormat::Table => {
                    let app = App::start(client, config.dashboard.clone()).await;
                    println!("{}", app.render(Route::Opportunities(filters)).await);
                }
            }
        }

        Commands::Config { .. } => {}
    }

    Ok(())
}

fn init_tracing(logging: &LoggingConfig, verbose: bool) {
    let level = if verbose { "debug" } else { logging.level.as_str() };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("pipeline_dashboard={}", level).into());

    // Logs go to stderr; stdout carries the rendered output
    let registry = tracing_subscriber::registry().with(filter);
    if logging.is_json() {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn loaded<T>(data: T) -> FetchState<T> {
    let mut state = FetchState::default();
    state.succeed(data);
    state
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
