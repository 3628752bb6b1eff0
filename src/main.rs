//! Eyecare Reminder - reminds you to rest your eyes at configurable intervals
//!
//! This is the main entry point for the eyecare-reminder daemon.

use std::sync::{Arc, Mutex};
use tokio::{
    net::TcpListener,
    sync::{mpsc, watch},
    time::Instant,
};
use tracing::{error, info, warn};

use eyecare_reminder::{
    api::{create_router, guard::CLIENT_HEADER},
    config::Config,
    scheduler::Scheduler,
    services::{
        check_tools_available, DesktopEntryAutostart, DesktopNotifier, Notifier, NotifierConfig,
        SystemConditions,
    },
    settings::{Settings, SettingsProvider, YamlSettingsProvider},
    state::{AppState, TrayState},
    tasks::{reload_signal_task, reminder_timer_task, SchedulerCommand},
    utils::{init_tracing, shutdown_signal},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    let paths = config.paths()?;

    init_tracing(
        config.log_level(),
        config.log_to_file.then_some(paths.log_file.as_path()),
    )?;

    info!("Starting eyecare-reminder v{}", env!("CARGO_PKG_VERSION"));
    info!("Config file: {}", paths.config_file.display());

    // Missing tools only disable the matching suppression check
    let missing = check_tools_available().await;
    if !missing.is_empty() {
        warn!("Missing tools: {:?}", missing);
    }

    let autostart = DesktopEntryAutostart::new(paths.desktop_file.clone());
    if let Err(e) = autostart.ensure_icon_path(&paths.desktop_icon) {
        warn!("Desktop file not updated: {}", e);
    }

    let tray = Arc::new(Mutex::new(TrayState::new()));
    let notifier_config = NotifierConfig::default();
    let animation_period = notifier_config.animation_period;
    let notifier = DesktopNotifier::new(notifier_config, &paths, Arc::clone(&tray));

    let provider = YamlSettingsProvider::new(paths.config_file.clone());
    let settings = match provider.load() {
        Ok(settings) => settings,
        Err(e) => {
            error!("{}, running with default settings until the config is fixed", e);
            notifier.show_bad_config(&e);
            Settings::default()
        }
    };

    // Start the reminder timer task, the only owner of the scheduler
    let scheduler = Scheduler::new(settings, SystemConditions::new(), notifier, Instant::now());
    let (commands_tx, commands_rx) = mpsc::channel(16);
    let (snapshot_tx, snapshot_rx) = watch::channel(scheduler.snapshot());
    let timer = tokio::spawn(reminder_timer_task(
        scheduler,
        provider,
        commands_rx,
        snapshot_tx,
        animation_period,
    ));

    tokio::spawn(reload_signal_task(commands_tx.clone()));

    let state = Arc::new(AppState::new(
        commands_tx.clone(),
        snapshot_rx,
        tray,
        Arc::new(autostart),
        paths,
        config.port,
        config.host.clone(),
    ));

    // Create HTTP router with all endpoints
    let app = create_router(state);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Control API running on http://{}", addr);
    info!("Endpoints:");
    info!("  GET  /status            - Current phase, next reminder and settings");
    info!("  POST /reload            - Reload the config file (also on SIGHUP)");
    info!("  POST /reset             - Restore the default config");
    info!("  GET  /autostart         - Check whether autostart is enabled");
    info!("  POST /autostart/toggle  - Toggle autostart");
    info!("  POST /config/edit       - Open the config file");
    info!("  POST /log/open          - Open the log file");
    info!("  GET  /health            - Health check");
    info!("POST requests must send the {} header", CLIENT_HEADER);

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    if commands_tx.send(SchedulerCommand::Shutdown).await.is_err() {
        warn!("Reminder timer task already stopped");
    }
    if let Err(e) = timer.await {
        error!("Reminder timer task failed: {}", e);
    }

    info!("Shutdown complete");
    Ok(())
}
