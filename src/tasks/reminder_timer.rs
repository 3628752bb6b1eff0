//! Reminder timer background task

use std::time::Duration;

use futures::future::pending;
use tokio::{
    sync::{mpsc, oneshot, watch},
    time::{interval_at, sleep_until, Instant, Interval, MissedTickBehavior},
};
use tracing::{debug, error, info};

use crate::{
    error::ConfigError,
    scheduler::Scheduler,
    services::{ConditionChecker, Notifier},
    settings::{Settings, SettingsProvider},
    state::ScheduleSnapshot,
};

pub type CommandReply = oneshot::Sender<Result<Settings, ConfigError>>;

/// Requests other tasks can make of the scheduler
#[derive(Debug)]
pub enum SchedulerCommand {
    /// Reload the settings file and restart the cycle
    Reload { reply: Option<CommandReply> },
    /// Overwrite the settings file with defaults, then reload
    ResetDefaults { reply: Option<CommandReply> },
    Shutdown,
}

/// Background task that owns the scheduler and drives its timers.
///
/// All scheduler mutation happens here; the current state is published on
/// `snapshot_tx` after every event.
pub async fn reminder_timer_task<C, N, P>(
    mut scheduler: Scheduler<C, N>,
    provider: P,
    mut commands: mpsc::Receiver<SchedulerCommand>,
    snapshot_tx: watch::Sender<ScheduleSnapshot>,
    animation_period: Duration,
) where
    C: ConditionChecker + Send + Sync,
    N: Notifier + Send + Sync,
    P: SettingsProvider + Send,
{
    info!("Starting reminder timer task");

    let mut animation: Option<Interval> = None;
    publish(&scheduler, &snapshot_tx);

    loop {
        sync_animation(&scheduler, &mut animation, animation_period);
        let deadline = scheduler.state().deadline;

        tokio::select! {
            _ = sleep_until(deadline) => {
                let phase = scheduler.on_timer_expired(Instant::now()).await;
                debug!("Timer expired, now in {:?}", phase);
            }

            _ = next_pulse(&mut animation) => {
                scheduler.on_animation_pulse();
            }

            command = commands.recv() => match command {
                Some(SchedulerCommand::Reload { reply }) => {
                    info!("Reloading config");
                    let result = scheduler
                        .reload(&provider, Instant::now())
                        .map(|_| scheduler.settings().clone());
                    respond(reply, result);
                }
                Some(SchedulerCommand::ResetDefaults { reply }) => {
                    info!("Resetting config to defaults");
                    let result = provider
                        .write_defaults()
                        .and_then(|_| scheduler.reload(&provider, Instant::now()))
                        .map(|_| scheduler.settings().clone());
                    respond(reply, result);
                }
                Some(SchedulerCommand::Shutdown) | None => {
                    info!("Stopping reminder timer task");
                    break;
                }
            }
        }

        publish(&scheduler, &snapshot_tx);
    }
}

/// Run the animation pulse only while the cooldown is running
fn sync_animation<C, N>(scheduler: &Scheduler<C, N>, animation: &mut Option<Interval>, period: Duration)
where
    C: ConditionChecker,
    N: Notifier,
{
    if scheduler.state().is_cooldown() {
        if animation.is_none() {
            let mut pulse = interval_at(Instant::now() + period, period);
            pulse.set_missed_tick_behavior(MissedTickBehavior::Skip);
            *animation = Some(pulse);
        }
    } else if animation.take().is_some() {
        debug!("Animation stopped");
    }
}

async fn next_pulse(animation: &mut Option<Interval>) {
    match animation {
        Some(pulse) => {
            pulse.tick().await;
        }
        None => pending::<()>().await,
    }
}

fn publish<C, N>(scheduler: &Scheduler<C, N>, snapshot_tx: &watch::Sender<ScheduleSnapshot>)
where
    C: ConditionChecker,
    N: Notifier,
{
    // send_replace never fails, even without receivers
    snapshot_tx.send_replace(scheduler.snapshot());
}

fn respond(reply: Option<CommandReply>, result: Result<Settings, ConfigError>) {
    if let Err(e) = &result {
        error!("Config command failed: {}", e);
    }
    if let Some(reply) = reply {
        if reply.send(result).is_err() {
            debug!("Config command requester went away");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        state::TimerPhase,
        test_utils::{FakeConditions, FakeProvider, NotifierEvent, RecordingNotifier},
    };
    use tokio::{task::JoinHandle, time::sleep};

    struct Harness {
        notifier: RecordingNotifier,
        provider: FakeProvider,
        commands: mpsc::Sender<SchedulerCommand>,
        snapshots: watch::Receiver<ScheduleSnapshot>,
        handle: JoinHandle<()>,
    }

    fn spawn(settings: Settings) -> Harness {
        let notifier = RecordingNotifier::default();
        let provider = FakeProvider::valid(settings.clone());
        let scheduler = Scheduler::new(settings, FakeConditions::default(), notifier.clone(), Instant::now());
        let (commands, rx) = mpsc::channel(8);
        let (snapshot_tx, snapshots) = watch::channel(scheduler.snapshot());

        let handle = tokio::spawn(reminder_timer_task(
            scheduler,
            provider.clone(),
            rx,
            snapshot_tx,
            Duration::from_millis(500),
        ));

        Harness {
            notifier,
            provider,
            commands,
            snapshots,
            handle,
        }
    }

    fn settings(reminder: u64, cooldown: u64) -> Settings {
        Settings {
            reminder_interval: reminder,
            cooldown_interval: cooldown,
            ..Settings::default()
        }
    }

    async fn shutdown(harness: Harness) {
        harness.commands.send(SchedulerCommand::Shutdown).await.unwrap();
        harness.handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_reminder_cycle_over_nine_seconds() {
        let start = Instant::now();
        let harness = spawn(settings(5, 3));

        sleep(Duration::from_millis(5_100)).await;
        assert_eq!(harness.snapshots.borrow().state.phase, TimerPhase::Cooldown);
        assert_eq!(
            harness.notifier.notifications(),
            vec![NotifierEvent::Reminder { cooldown_secs: 3, sound: true }]
        );

        sleep(Duration::from_millis(3_000)).await;
        assert_eq!(harness.snapshots.borrow().state.phase, TimerPhase::Waiting);
        assert_eq!(
            harness.notifier.notifications(),
            vec![
                NotifierEvent::Reminder { cooldown_secs: 3, sound: true },
                NotifierEvent::CooldownEnded { sound: true },
            ]
        );

        sleep_until(start + Duration::from_secs(9)).await;
        {
            let snapshot = harness.snapshots.borrow();
            assert_eq!(snapshot.state.phase, TimerPhase::Waiting);
            assert_eq!((snapshot.state.deadline - start).as_secs(), 13);
        }

        shutdown(harness).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_icon_animates_only_during_cooldown() {
        let harness = spawn(settings(5, 3));

        sleep(Duration::from_millis(4_900)).await;
        assert!(!harness.notifier.events().contains(&NotifierEvent::AnimationFrame));

        sleep(Duration::from_millis(2_000)).await;
        let frames = harness
            .notifier
            .events()
            .iter()
            .filter(|e| **e == NotifierEvent::AnimationFrame)
            .count();
        assert!(frames >= 3, "expected pulses during cooldown, got {}", frames);

        sleep(Duration::from_millis(2_000)).await;
        harness.notifier.clear();
        sleep(Duration::from_millis(2_000)).await;
        assert!(!harness.notifier.events().contains(&NotifierEvent::AnimationFrame));

        shutdown(harness).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_reload_command_restarts_cycle() {
        let harness = spawn(settings(60, 10));
        sleep(Duration::from_secs(30)).await;

        harness.provider.set_yaml(&settings(90, 10).to_yaml().unwrap());
        let (reply, response) = oneshot::channel();
        harness
            .commands
            .send(SchedulerCommand::Reload { reply: Some(reply) })
            .await
            .unwrap();

        let reloaded = response.await.unwrap().unwrap();
        assert_eq!(reloaded.reminder_interval, 90);

        sleep(Duration::from_millis(10)).await;
        {
            let snapshot = harness.snapshots.borrow();
            assert_eq!(snapshot.settings.reminder_interval, 90);
            assert_eq!(snapshot.state.phase, TimerPhase::Waiting);
            assert!(snapshot.state.remaining(Instant::now()) > Duration::from_secs(89));
        }

        shutdown(harness).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_reload_keeps_running_cycle() {
        let harness = spawn(settings(60, 10));
        sleep(Duration::from_secs(30)).await;
        let deadline = harness.snapshots.borrow().state.deadline;

        harness.provider.set_yaml("reminder_interval: 5\n");
        let (reply, response) = oneshot::channel();
        harness
            .commands
            .send(SchedulerCommand::Reload { reply: Some(reply) })
            .await
            .unwrap();

        assert!(response.await.unwrap().is_err());
        sleep(Duration::from_millis(10)).await;
        {
            let snapshot = harness.snapshots.borrow();
            assert_eq!(snapshot.settings.reminder_interval, 60);
            assert_eq!(snapshot.state.deadline, deadline);
        }

        shutdown(harness).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_defaults_command() {
        let harness = spawn(settings(60, 10));

        let (reply, response) = oneshot::channel();
        harness
            .commands
            .send(SchedulerCommand::ResetDefaults { reply: Some(reply) })
            .await
            .unwrap();

        assert_eq!(response.await.unwrap().unwrap(), Settings::default());
        shutdown(harness).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_task_stops_when_senders_dropped() {
        let harness = spawn(settings(60, 10));
        drop(harness.commands);
        harness.handle.await.unwrap();
    }
}
