mod bootstrap;

use anyhow::{Context, Result};
use dashboard_core::settings::Settings;
use dashboard_data::analysis::{analyze, DashboardAnalysis};
use dashboard_runtime::loader::load_rows;
use dashboard_ui::app::App;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::load_with_last_used();

    bootstrap::ensure_directories()?;
    // The TUI owns the terminal, so its logs go to a file unless told otherwise.
    let log_file = match (&settings.log_file, settings.view.as_str()) {
        (Some(path), _) => Some(path.clone()),
        (None, "dashboard") => Some(bootstrap::default_log_file()),
        (None, _) => None,
    };
    bootstrap::setup_logging(&settings.log_level, log_file.as_deref())?;

    tracing::info!("Sales Dashboard v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Source: {}, View: {}, Measure: {}, Theme: {}",
        settings.source.display(),
        settings.view,
        settings.measure(),
        settings.theme
    );

    match settings.view.as_str() {
        "dashboard" => run_dashboard(&settings).await?,
        "report" => run_report(&settings).await?,
        unknown => eprintln!("Unknown view mode: {}", unknown),
    }

    Ok(())
}

async fn run_dashboard(settings: &Settings) -> Result<()> {
    let app = App::new(
        &settings.theme,
        settings.source.clone(),
        settings.date_range(),
        settings.measure(),
    );

    // In raw mode Ctrl+C arrives as a key event. The signal branch handles a
    // SIGINT sent from outside; `App::run` yields once per loop iteration, so
    // this branch gets polled.
    tokio::select! {
        result = app.run() => result.context("terminal dashboard failed")?,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Ctrl+C received; shutting down");
        }
    }
    Ok(())
}

async fn run_report(settings: &Settings) -> Result<()> {
    let rows = load_rows(&settings.source)
        .await
        .with_context(|| format!("could not load {}", settings.source.display()))?;
    let analysis = analyze(&rows, &settings.date_range(), settings.measure());
    println!("{}", render_report(&analysis)?);
    Ok(())
}

fn render_report(analysis: &DashboardAnalysis) -> Result<String> {
    Ok(serde_json::to_string_pretty(analysis)?)
}
