use serde::{Deserialize, Serialize};

use super::expressions::Emotion;

/// A mood vector to steer toward, as opposed to the mood that was observed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RegulationTarget {
    pub valence: f64,
    pub energy: f64,
}

impl RegulationTarget {
    pub const fn new(valence: f64, energy: f64) -> Self {
        Self { valence, energy }
    }

    /// Target used for labels outside the known set ("energize").
    pub const DEFAULT: RegulationTarget = RegulationTarget::new(0.6, 0.8);

    /// Rescales both axes from [-1, 1] to [0, 1] as `(x + 1) / 2`.
    pub fn to_unit_scale(&self) -> (f64, f64) {
        ((self.valence + 1.0) / 2.0, (self.energy + 1.0) / 2.0)
    }
}

impl Emotion {
    pub fn regulation_target(&self) -> RegulationTarget {
        match self {
            // calm down
            Emotion::Angry => RegulationTarget::new(0.5, -0.8),
            // cheer up
            Emotion::Sad => RegulationTarget::new(0.9, 0.6),
            // relax
            Emotion::Fearful => RegulationTarget::new(0.6, -0.7),
            // settle
            Emotion::Disgusted => RegulationTarget::new(0.5, -0.5),
            // stabilize
            Emotion::Surprised => RegulationTarget::new(0.5, 0.2),
            // sustain
            Emotion::Happy => RegulationTarget::new(0.8, 0.7),
            // focus
            Emotion::Neutral => RegulationTarget::new(0.5, 0.4),
        }
    }
}

/// Looks up the regulation target for a detector label. Unknown labels get
/// `RegulationTarget::DEFAULT`.
pub fn regulation_target(emotion: &str) -> RegulationTarget {
    emotion
        .parse::<Emotion>()
        .map(|emotion| emotion.regulation_target())
        .unwrap_or(RegulationTarget::DEFAULT)
}
