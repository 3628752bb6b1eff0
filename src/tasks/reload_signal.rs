//! Config reload on SIGHUP

use futures::stream::StreamExt;
use signal_hook_tokio::Signals;
use tokio::sync::mpsc;
use tracing::{error, info};

use super::SchedulerCommand;

/// Background task that turns SIGHUP into a config reload
pub async fn reload_signal_task(commands: mpsc::Sender<SchedulerCommand>) {
    let mut signals = match Signals::new([signal_hook::consts::SIGHUP]) {
        Ok(signals) => signals,
        Err(e) => {
            error!("Failed to register SIGHUP handler: {}", e);
            return;
        }
    };

    info!("Starting reload signal task");
    while signals.next().await.is_some() {
        info!("Received SIGHUP, reloading config");
        if commands
            .send(SchedulerCommand::Reload { reply: None })
            .await
            .is_err()
        {
            break;
        }
    }
}
