use serde::{Deserialize, Serialize};

/// Focus sessions that must complete before a long break is due.
pub const FOCUS_SESSIONS_BEFORE_LONG_BREAK: u32 = 4;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum TimerMode {
    Focus,
    ShortBreak,
    LongBreak,
}

impl Default for TimerMode {
    fn default() -> Self {
        TimerMode::Focus
    }
}

impl TimerMode {
    pub fn label(&self) -> &'static str {
        match self {
            TimerMode::Focus => "Pomodoro",
            TimerMode::ShortBreak => "Short Break",
            TimerMode::LongBreak => "Long Break",
        }
    }
}

/// Configured length of each mode, in seconds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Durations {
    pub focus: u32,
    pub short_break: u32,
    pub long_break: u32,
}

impl Default for Durations {
    fn default() -> Self {
        Self {
            focus: 25 * 60,
            short_break: 5 * 60,
            long_break: 15 * 60,
        }
    }
}

impl Durations {
    pub fn get(&self, mode: TimerMode) -> u32 {
        match mode {
            TimerMode::Focus => self.focus,
            TimerMode::ShortBreak => self.short_break,
            TimerMode::LongBreak => self.long_break,
        }
    }

    pub fn merge(&self, update: &DurationsUpdate) -> Self {
        Self {
            focus: update.focus.unwrap_or(self.focus),
            short_break: update.short_break.unwrap_or(self.short_break),
            long_break: update.long_break.unwrap_or(self.long_break),
        }
    }
}

/// Partial edit of `Durations`; `None` keeps the current value.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct DurationsUpdate {
    pub focus: Option<u32>,
    pub short_break: Option<u32>,
    pub long_break: Option<u32>,
}

/// Emitted once for every automatic mode change.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Transition {
    pub from: TimerMode,
    pub to: TimerMode,
    pub completed_focus_count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TimerState {
    pub mode: TimerMode,
    pub time_remaining: u32,
    pub is_active: bool,
    pub completed_focus_count: u32,
    pub durations: Durations,
}

impl Default for TimerState {
    fn default() -> Self {
        Self::with_durations(Durations::default())
    }
}

impl TimerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Paused focus state sized from `durations`.
    pub fn with_durations(durations: Durations) -> Self {
        Self {
            mode: TimerMode::Focus,
            time_remaining: durations.focus,
            is_active: false,
            completed_focus_count: 0,
            durations,
        }
    }

    /// Advances the countdown by one second.
    ///
    /// Reaching zero while active rotates the mode on the following tick and
    /// pauses the timer; the returned `Transition` is the notification signal.
    pub fn tick(&mut self) -> Option<Transition> {
        if !self.is_active {
            return None;
        }

        if self.time_remaining > 0 {
            self.time_remaining -= 1;
            return None;
        }

        let from = self.mode;
        let to = match from {
            TimerMode::Focus => {
                self.completed_focus_count += 1;
                if self.completed_focus_count % FOCUS_SESSIONS_BEFORE_LONG_BREAK == 0 {
                    TimerMode::LongBreak
                } else {
                    TimerMode::ShortBreak
                }
            }
            TimerMode::ShortBreak | TimerMode::LongBreak => TimerMode::Focus,
        };

        self.mode = to;
        self.is_active = false;
        self.time_remaining = self.durations.get(to);

        Some(Transition {
            from,
            to,
            completed_focus_count: self.completed_focus_count,
        })
    }

    pub fn toggle_active(&mut self) {
        self.is_active = !self.is_active;
    }

    /// Manual mode override. Leaves the focus counter alone.
    pub fn set_mode(&mut self, mode: TimerMode) {
        self.mode = mode;
        self.is_active = false;
        self.time_remaining = self.durations.get(mode);
    }

    pub fn reset_timer(&mut self) {
        self.is_active = false;
        self.time_remaining = self.durations.get(self.mode);
    }

    /// Merges `update`; while paused the current countdown is resized to match.
    pub fn set_durations(&mut self, update: &DurationsUpdate) {
        self.durations = self.durations.merge(update);
        if !self.is_active {
            self.time_remaining = self.durations.get(self.mode);
        }
    }

    /// Fraction of the current mode left, 1.0 full to 0.0 empty.
    pub fn progress(&self) -> f64 {
        let total = self.durations.get(self.mode);
        if total == 0 {
            return 0.0;
        }
        f64::from(self.time_remaining) / f64::from(total)
    }
}

/// Renders seconds as `MM:SS`; minutes are not wrapped at an hour.
pub fn format_time(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
