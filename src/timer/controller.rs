use std::{sync::Arc, time::Duration};

use log::{debug, info};
use serde::Serialize;
use tokio::{
    sync::{broadcast, Mutex},
    task::JoinHandle,
    time::{self, Instant},
};

use crate::notify::TransitionNotifier;

use super::state::{format_time, Durations, DurationsUpdate, TimerMode, TimerState, Transition};

const EVENT_CAPACITY: usize = 64;

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TimerSnapshot {
    pub state: TimerState,
    pub display: String,
    pub progress: f64,
}

impl From<&TimerState> for TimerSnapshot {
    fn from(state: &TimerState) -> Self {
        Self {
            display: format_time(state.time_remaining),
            progress: state.progress(),
            state: state.clone(),
        }
    }
}

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum TimerEvent {
    StateChanged(TimerSnapshot),
    ModeChanged(Transition),
}

/// Drives a `TimerState` from a tokio interval while the timer is active.
///
/// The ticker task exits on its own once the state goes inactive, including
/// after every automatic transition.
#[derive(Clone)]
pub struct TimerController {
    state: Arc<Mutex<TimerState>>,
    ticker: Arc<Mutex<Option<JoinHandle<()>>>>,
    events: broadcast::Sender<TimerEvent>,
    notifier: Arc<dyn TransitionNotifier>,
    tick_interval: Duration,
}

impl TimerController {
    pub fn new(durations: Durations, notifier: Arc<dyn TransitionNotifier>) -> Self {
        Self::with_tick_interval(durations, notifier, Duration::from_secs(1))
    }

    pub fn with_tick_interval(
        durations: Durations,
        notifier: Arc<dyn TransitionNotifier>,
        tick_interval: Duration,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            state: Arc::new(Mutex::new(TimerState::with_durations(durations))),
            ticker: Arc::new(Mutex::new(None)),
            events,
            notifier,
            tick_interval,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TimerEvent> {
        self.events.subscribe()
    }

    pub async fn get_state(&self) -> TimerState {
        self.state.lock().await.clone()
    }

    pub async fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot::from(&*self.state.lock().await)
    }

    /// Starts or pauses the countdown.
    ///
    /// The ticker slot stays locked across the flip so concurrent toggles
    /// always leave exactly one ticker for an active timer.
    pub async fn toggle_active(&self) -> TimerSnapshot {
        let mut ticker = self.ticker.lock().await;
        let snapshot = {
            let mut state = self.state.lock().await;
            state.toggle_active();
            TimerSnapshot::from(&*state)
        };

        if snapshot.state.is_active {
            info!("Timer started in {:?} with {}", snapshot.state.mode, snapshot.display);
            self.spawn_ticker(&mut ticker);
        } else {
            info!("Timer paused at {}", snapshot.display);
            cancel_ticker(&mut ticker);
        }
        drop(ticker);

        self.emit(TimerEvent::StateChanged(snapshot.clone()));
        snapshot
    }

    pub async fn set_mode(&self, mode: TimerMode) -> TimerSnapshot {
        let mut ticker = self.ticker.lock().await;
        cancel_ticker(&mut ticker);
        self.mutate(|state| state.set_mode(mode)).await
    }

    pub async fn reset_timer(&self) -> TimerSnapshot {
        let mut ticker = self.ticker.lock().await;
        cancel_ticker(&mut ticker);
        self.mutate(TimerState::reset_timer).await
    }

    pub async fn set_durations(&self, update: DurationsUpdate) -> TimerSnapshot {
        self.mutate(|state| state.set_durations(&update)).await
    }

    /// Stops the ticker; the state is left as it was.
    pub async fn shutdown(&self) {
        cancel_ticker(&mut *self.ticker.lock().await);
    }

    async fn mutate<F>(&self, apply: F) -> TimerSnapshot
    where
        F: FnOnce(&mut TimerState),
    {
        let snapshot = {
            let mut state = self.state.lock().await;
            apply(&mut *state);
            TimerSnapshot::from(&*state)
        };
        self.emit(TimerEvent::StateChanged(snapshot.clone()));
        snapshot
    }

    fn spawn_ticker(&self, slot: &mut Option<JoinHandle<()>>) {
        cancel_ticker(slot);

        let state = self.state.clone();
        let events = self.events.clone();
        let notifier = self.notifier.clone();
        let tick_interval = self.tick_interval;

        let handle = tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + tick_interval, tick_interval);
            loop {
                interval.tick().await;

                let (snapshot, transition) = {
                    let mut guard = state.lock().await;
                    if !guard.is_active {
                        break;
                    }
                    let transition = guard.tick();
                    (TimerSnapshot::from(&*guard), transition)
                };

                if let Some(transition) = transition {
                    info!(
                        "{:?} finished, switching to {:?}",
                        transition.from, transition.to
                    );
                    notifier.notify(&transition);
                    let _ = events.send(TimerEvent::ModeChanged(transition));
                    let _ = events.send(TimerEvent::StateChanged(snapshot));
                    break;
                }

                let _ = events.send(TimerEvent::StateChanged(snapshot));
            }
            debug!("Timer ticker exiting");
        });

        *slot = Some(handle);
    }

    fn emit(&self, event: TimerEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }
}

fn cancel_ticker(slot: &mut Option<JoinHandle<()>>) {
    if let Some(handle) = slot.take() {
        handle.abort();
    }
}
