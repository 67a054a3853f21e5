use std::collections::VecDeque;

use chrono::{DateTime, Utc};

use super::mapper::Mood;

/// About 20 seconds of samples at a 400 ms detection cadence.
pub const MAX_HISTORY_LENGTH: usize = 50;

/// Bounded, oldest-first buffer of recent moods for live charts.
#[derive(Debug, Clone)]
pub struct MoodHistory {
    entries: VecDeque<Mood>,
    capacity: usize,
}

impl Default for MoodHistory {
    fn default() -> Self {
        Self::with_capacity(MAX_HISTORY_LENGTH)
    }
}

impl MoodHistory {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Stamps `mood` with `at` and appends it, evicting the oldest entry when full.
    pub fn push(&mut self, mood: &Mood, at: DateTime<Utc>) {
        self.entries.push_back(mood.with_timestamp(at));
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    pub fn latest(&self) -> Option<&Mood> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Mood> {
        self.entries.iter()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mood::Emotion;
    use chrono::{Duration, TimeZone};

    #[test]
    fn evicts_oldest_past_capacity() {
        let start = Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap();
        let mut history = MoodHistory::default();

        for i in 0..(MAX_HISTORY_LENGTH + 5) {
            let mood = Mood::new(Emotion::Happy, i as f64 / 100.0, 0.0);
            history.push(&mood, start + Duration::milliseconds(400 * i as i64));
        }

        assert_eq!(history.len(), MAX_HISTORY_LENGTH);
        let oldest = history.iter().next().unwrap();
        assert_eq!(oldest.timestamp, Some(start + Duration::milliseconds(400 * 5)));
        assert_eq!(history.latest().unwrap().valence, 0.54);
    }

    #[test]
    fn push_does_not_mutate_the_source_mood() {
        let mut history = MoodHistory::with_capacity(2);
        let mood = Mood::new(Emotion::Sad, -0.5, -0.5);
        history.push(&mood, Utc::now());
        assert!(mood.timestamp.is_none());
        assert!(history.latest().unwrap().timestamp.is_some());

        history.clear();
        assert!(history.is_empty());
    }
}
