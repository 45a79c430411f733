//! Service wiring and command execution for the diagnostic binary.

use std::sync::Arc;

use tracing::info;

use baynav_events::EventBus;
use baynav_platform::{DesktopLauncher, FixedConnectivity, NoopConcealer, NoopHaptics};
use baynav_prefs::JsonFilePrefs;
use baynav_safety::{SafetyController, SafetyService};
use baynav_telemetry::{LogFormat, LoggingConfig, Metrics, init_logging};

use crate::cli::{Cli, Command};
use crate::error::{AppError, AppResult};

/// Wire the safety services, run the requested command, and tear down.
///
/// # Errors
///
/// Returns an error if telemetry cannot be initialised, the preference
/// document cannot be opened, or command output cannot be rendered.
pub async fn run_app(cli: Cli) -> AppResult<()> {
    let format = match cli.log_format.as_deref() {
        Some(value) => value
            .parse::<LogFormat>()
            .map_err(|err| AppError::telemetry("telemetry.format", err))?,
        None => LogFormat::infer(),
    };
    init_logging(&LoggingConfig {
        level: &cli.log_level,
        format,
        build_sha: env!("CARGO_PKG_VERSION"),
    })
    .map_err(|err| AppError::telemetry("telemetry.init", err))?;

    let metrics = Metrics::new().map_err(|err| AppError::telemetry("telemetry.metrics", err))?;
    let prefs = JsonFilePrefs::open(&cli.prefs)
        .await
        .map_err(|source| AppError::prefs("prefs.open", source))?;
    info!(prefs = %prefs.path().display(), "preference document ready");

    let engine = Arc::new(SafetyService::new(
        Arc::new(prefs),
        Arc::new(FixedConnectivity::new(cli.transport.to_reading())),
        Arc::new(DesktopLauncher::new()),
        Arc::new(NoopConcealer::new()),
        EventBus::new(),
        metrics.clone(),
    ));
    let controller = SafetyController::new(Arc::clone(&engine), Arc::new(NoopHaptics::new()));
    controller.initialize().await;

    let outcome = run_command(cli.command, &engine, &controller, &metrics).await;
    controller.shutdown().await;
    outcome
}

async fn run_command(
    command: Command,
    engine: &Arc<SafetyService>,
    controller: &SafetyController,
    metrics: &Metrics,
) -> AppResult<()> {
    match command {
        Command::Status => {
            let state = controller.current();
            let rendered = serde_json::to_string_pretty(&state)
                .map_err(|source| AppError::serialize("status.render", source))?;
            println!("{rendered}");
        }
        Command::QuickExit => {
            controller.execute_quick_exit().await;
            info!("quick exit completed");
        }
        Command::History => {
            println!("recent programs:");
            for program in engine.recent_programs().await {
                println!("  {program}");
            }
            println!("search history:");
            for query in engine.search_history().await {
                println!("  {query}");
            }
        }
        Command::ClearHistory => {
            controller.clear_all_history().await;
            info!("history cleared");
        }
        Command::Metrics => {
            let rendered = metrics
                .render()
                .map_err(|err| AppError::telemetry("telemetry.render", err))?;
            println!("{rendered}");
        }
    }
    Ok(())
}
