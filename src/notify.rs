use std::sync::Arc;

use log::info;

use crate::{audio::AudioEngineHandle, settings::SettingsStore, timer::Transition};

const ENABLE_LOGS: bool = true;

/// Receives the "mode changed" signal, exactly once per timer transition.
pub trait TransitionNotifier: Send + Sync {
    fn notify(&self, transition: &Transition);
}

pub struct LogNotifier;

impl TransitionNotifier for LogNotifier {
    fn notify(&self, transition: &Transition) {
        info!(
            "Mode changed to {} ({} focus sessions completed)",
            transition.to.label(),
            transition.completed_focus_count
        );
    }
}

/// Plays the completion chime, honoring the user's chime settings at the
/// moment of each transition.
pub struct ChimeNotifier {
    audio: AudioEngineHandle,
    settings: Arc<SettingsStore>,
}

impl ChimeNotifier {
    pub fn new(audio: AudioEngineHandle, settings: Arc<SettingsStore>) -> Self {
        Self { audio, settings }
    }
}

impl TransitionNotifier for ChimeNotifier {
    fn notify(&self, transition: &Transition) {
        let chime = self.settings.chime();
        if !chime.enabled {
            return;
        }
        if let Err(err) = self.audio.play_chime(chime.volume) {
            crate::log_warn!(
                "Failed to play chime for switch to {:?}: {err}",
                transition.to
            );
        }
    }
}

/// Fans one transition out to several notifiers in order.
pub struct CompositeNotifier {
    notifiers: Vec<Box<dyn TransitionNotifier>>,
}

impl CompositeNotifier {
    pub fn new(notifiers: Vec<Box<dyn TransitionNotifier>>) -> Self {
        Self { notifiers }
    }
}

impl TransitionNotifier for CompositeNotifier {
    fn notify(&self, transition: &Transition) {
        for notifier in &self.notifiers {
            notifier.notify(transition);
        }
    }
}
