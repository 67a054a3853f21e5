use serde::{Deserialize, Serialize};

use super::mapper::Mood;

pub const DEFAULT_ALPHA: f64 = 0.2;

/// One exponential-moving-average step: `alpha * sample + (1 - alpha) * previous`.
pub fn smooth(previous: f64, sample: f64, alpha: f64) -> f64 {
    alpha * sample + (1.0 - alpha) * previous
}

/// Per-session EMA accumulators for the valence and energy streams.
///
/// Owned by whoever consumes detector samples; `apply` is the single
/// read-modify-write per sample.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MoodAccumulator {
    pub valence: f64,
    pub energy: f64,
    pub alpha: f64,
}

impl Default for MoodAccumulator {
    fn default() -> Self {
        Self::new(DEFAULT_ALPHA)
    }
}

impl MoodAccumulator {
    pub fn new(alpha: f64) -> Self {
        Self {
            valence: 0.0,
            energy: 0.0,
            alpha,
        }
    }

    /// Folds a raw mood into the accumulators and returns the smoothed mood.
    /// The dominant emotion is carried over from the raw sample unchanged.
    pub fn apply(&mut self, raw: &Mood) -> Mood {
        self.valence = smooth(self.valence, raw.valence, self.alpha);
        self.energy = smooth(self.energy, raw.energy, self.alpha);

        Mood {
            emotion: raw.emotion,
            valence: self.valence,
            energy: self.energy,
            timestamp: raw.timestamp,
        }
    }

    pub fn reset(&mut self) {
        self.valence = 0.0;
        self.energy = 0.0;
    }
}
