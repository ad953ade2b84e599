use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use tracing::info;

use goalhorn::config::AppConfig;
use goalhorn::monitor::TeamWatcher;
use goalhorn::monitoring::logger;
use goalhorn::nhl::NhlClient;
use goalhorn::ui::{self, SharedGameView};

#[derive(Debug, Parser)]
#[command(name = "goalhorn", about = "Live game watcher and goal-song player for one NHL team")]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, default_value = "config/default.toml")]
    config: PathBuf,

    /// Visual surface: none, a terminal window, or a browser-served page.
    #[arg(long, value_enum, default_value = "none")]
    ui: UiMode,

    /// Watch a single date (YYYY-MM-DD) instead of looping daily.
    #[arg(long)]
    date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum UiMode {
    None,
    Window,
    Browser,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let (config, secrets) = AppConfig::load(&cli.config)?;

    let _log_guard = logger::init_logging(&config.monitoring, cli.ui == UiMode::Window)?;

    info!(
        team_id = config.monitor.team_id,
        ui = ?cli.ui,
        poll_interval_s = config.monitor.poll_interval_seconds,
        "goalhorn starting"
    );

    let view = SharedGameView::new();
    let client = NhlClient::new(&config.api, &config.rate_limit)?;
    let ui_config = config.ui.clone();
    let watcher = TeamWatcher::new(config, secrets, client, view.clone())?;

    match cli.ui {
        UiMode::None => run_watcher(watcher, cli.date).await,
        UiMode::Browser => {
            let _dashboard =
                ui::dashboard::spawn_dashboard(view.clone(), &ui_config.bind, ui_config.port);
            run_watcher(watcher, cli.date).await
        }
        UiMode::Window => {
            let date = cli.date;
            let watch_task = tokio::spawn(async move { run_watcher(watcher, date).await });
            ui::tui::run_scoreboard(view).await?;
            watch_task.abort();
            Ok(())
        }
    }
}

async fn run_watcher(watcher: TeamWatcher, date: Option<NaiveDate>) -> Result<()> {
    match date {
        Some(date) => watcher.watch_day(date).await,
        None => watcher.run().await,
    }
}
