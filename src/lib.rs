pub mod analytics;
pub mod audio;
pub mod db;
pub mod detection;
pub mod mood;
pub mod notify;
pub mod recommendations;
pub mod settings;
pub mod timer;
pub mod utils;

use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use chrono::Utc;
use log::{info, warn};
use tokio::sync::{broadcast::error::RecvError, Mutex};

use audio::AudioEngineHandle;
use db::Database;
use detection::DetectionSession;
use mood::MoodAccumulator;
use notify::{ChimeNotifier, CompositeNotifier, LogNotifier};
use settings::SettingsStore;
use timer::{DurationsUpdate, TimerController, TimerEvent, TimerSnapshot};

const DEFAULT_DATA_DIR: &str = "moodfocus-data";

/// Everything a dashboard front end talks to.
pub struct AppState {
    pub db: Database,
    pub settings: Arc<SettingsStore>,
    pub timer: TimerController,
    pub detection: Arc<Mutex<DetectionSession>>,
    audio: AudioEngineHandle,
}

impl AppState {
    pub fn open(data_dir: PathBuf, tick_interval: Duration) -> Result<Self> {
        std::fs::create_dir_all(&data_dir)
            .with_context(|| format!("failed to create data directory {}", data_dir.display()))?;

        let db = Database::new(data_dir.join("moodfocus.sqlite3"))?;
        let settings = Arc::new(SettingsStore::new(data_dir.join("settings.json"))?);
        let audio = AudioEngineHandle::new();

        let notifier = CompositeNotifier::new(vec![
            Box::new(LogNotifier),
            Box::new(ChimeNotifier::new(audio.clone(), settings.clone())),
        ]);
        let timer = TimerController::with_tick_interval(
            settings.timer_durations(),
            Arc::new(notifier),
            tick_interval,
        );

        let detection = DetectionSession::new(MoodAccumulator::default())
            .with_mood_log(db.clone(), settings.log_mood_data());

        Ok(Self {
            db,
            settings,
            timer,
            detection: Arc::new(Mutex::new(detection)),
            audio,
        })
    }

    /// Persists the new durations, then applies them to the running timer.
    pub async fn update_timer_durations(&self, update: DurationsUpdate) -> Result<TimerSnapshot> {
        self.settings.update_timer_durations(&update)?;
        Ok(self.timer.set_durations(update).await)
    }

    pub async fn set_log_mood_data(&self, enabled: bool) -> Result<()> {
        self.settings.set_log_mood_data(enabled)?;
        self.detection.lock().await.set_log_mood_data(enabled);
        Ok(())
    }

    pub async fn shutdown(&self) -> Result<()> {
        self.timer.shutdown().await;
        self.audio.stop()
    }
}

fn data_dir_from_env() -> PathBuf {
    std::env::var("MOODFOCUS_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_DIR))
}

fn tick_interval_from_env() -> Duration {
    let debug_mode = std::env::var("MOODFOCUS_DEBUG")
        .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
        .unwrap_or(false);

    if debug_mode {
        Duration::from_millis(50)
    } else {
        Duration::from_secs(1)
    }
}

/// Headless runner: cycles focus and break periods until Ctrl-C, restarting
/// the timer after each transition the way a user pressing start would.
pub async fn run() -> Result<()> {
    // Initialize logging (reads RUST_LOG env var)
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    log::info!("moodfocus starting up...");

    let app = AppState::open(data_dir_from_env(), tick_interval_from_env())?;

    let open_tasks = app
        .db
        .list_tasks()
        .await?
        .into_iter()
        .filter(|task| !task.is_completed)
        .count();
    info!("{open_tasks} open tasks");

    let today = Utc::now().date_naive();
    for task in app.db.task_summary(3).await? {
        let marker = if task.is_overdue(today) { " (overdue)" } else { "" };
        info!("- {}{marker}", task.title);
    }

    for day in app.db.weekly_mood_summary(Utc::now()).await? {
        info!(
            "{}: valence {:.2}, energy {:.2} ({} samples)",
            day.day, day.avg_valence, day.avg_energy, day.samples
        );
    }

    let mut events = app.timer.subscribe();
    app.timer.toggle_active().await;

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(TimerEvent::ModeChanged(transition)) => {
                    info!("Starting {}", transition.to.label());
                    app.timer.toggle_active().await;
                }
                Ok(TimerEvent::StateChanged(_)) => {}
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Timer event receiver lagged by {skipped} events");
                }
                Err(RecvError::Closed) => break,
            },
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down");
                break;
            }
        }
    }

    app.shutdown().await
}
