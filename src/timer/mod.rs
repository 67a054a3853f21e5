pub mod controller;
pub mod state;

pub use controller::{TimerController, TimerEvent, TimerSnapshot};
pub use state::{
    format_time, Durations, DurationsUpdate, TimerMode, TimerState, Transition,
    FOCUS_SESSIONS_BEFORE_LONG_BREAK,
};
