use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::expressions::{Emotion, ExpressionScores};

/// A point on the valence/energy circumplex plus the label that produced it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Mood {
    pub emotion: Emotion,
    /// Pleasantness, -1 (unpleasant) to 1 (pleasant).
    pub valence: f64,
    /// Arousal, -1 (calm) to 1 (excited).
    pub energy: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl Mood {
    pub fn new(emotion: Emotion, valence: f64, energy: f64) -> Self {
        Self {
            emotion,
            valence: clamp_unit(valence),
            energy: clamp_unit(energy),
            timestamp: None,
        }
    }

    pub fn with_timestamp(&self, at: DateTime<Utc>) -> Self {
        Self {
            timestamp: Some(at),
            ..self.clone()
        }
    }
}

/// Maps one detector sample to a `Mood`.
///
/// The dominant label is the first strictly greatest score in `Emotion::ALL`
/// order, starting from `(neutral, 0.0)`, so all-zero samples stay neutral.
/// Valence and energy are clamped rather than rejected; sums that overflow
/// into `inf - inf` read as 0.
pub fn map_expressions_to_mood(scores: &ExpressionScores) -> Mood {
    let (emotion, _) = scores
        .iter()
        .fold((Emotion::Neutral, 0.0), |(best, best_score), (emotion, score)| {
            if score > best_score {
                (emotion, score)
            } else {
                (best, best_score)
            }
        });

    let valence = scores.happy - (scores.sad + scores.angry + scores.fearful + scores.disgusted);
    let energy = (scores.angry + scores.surprised + scores.fearful) - (scores.sad + scores.neutral);

    Mood::new(emotion, valence, energy)
}

fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(-1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn one_hot_scores_pick_their_label() {
        for emotion in Emotion::ALL {
            let mood = map_expressions_to_mood(&ExpressionScores::one_hot(emotion));
            assert_eq!(mood.emotion, emotion);
        }
    }

    #[test]
    fn mostly_happy_sample() {
        let scores = ExpressionScores {
            neutral: 0.1,
            happy: 0.9,
            ..Default::default()
        };
        let mood = map_expressions_to_mood(&scores);
        assert_eq!(mood.emotion, Emotion::Happy);
        assert_close(mood.valence, 0.9);
        assert_close(mood.energy, -0.1);
        assert!(mood.timestamp.is_none());
    }

    #[test]
    fn mostly_sad_sample() {
        let scores = ExpressionScores {
            neutral: 0.2,
            sad: 0.8,
            ..Default::default()
        };
        let mood = map_expressions_to_mood(&scores);
        assert_eq!(mood.emotion, Emotion::Sad);
        assert_close(mood.valence, -0.8);
        assert_close(mood.energy, -1.0);
    }

    #[test]
    fn mostly_angry_sample() {
        let scores = ExpressionScores {
            neutral: 0.1,
            angry: 0.8,
            fearful: 0.1,
            ..Default::default()
        };
        let mood = map_expressions_to_mood(&scores);
        assert_eq!(mood.emotion, Emotion::Angry);
        assert_close(mood.valence, -0.9);
        assert_close(mood.energy, 0.8);
    }

    #[test]
    fn surprised_sample_has_neutral_valence() {
        let scores = ExpressionScores {
            neutral: 0.1,
            surprised: 0.9,
            ..Default::default()
        };
        let mood = map_expressions_to_mood(&scores);
        assert_eq!(mood.emotion, Emotion::Surprised);
        assert_eq!(mood.valence, 0.0);
        assert_close(mood.energy, 0.8);
    }

    #[test]
    fn pure_neutral_sample() {
        let mood = map_expressions_to_mood(&ExpressionScores::one_hot(Emotion::Neutral));
        assert_eq!(mood.emotion, Emotion::Neutral);
        assert_eq!(mood.valence, 0.0);
        assert_eq!(mood.energy, -1.0);
    }

    #[test]
    fn all_zero_or_negative_scores_default_to_neutral() {
        let zero = map_expressions_to_mood(&ExpressionScores::default());
        assert_eq!(zero.emotion, Emotion::Neutral);
        assert_eq!(zero.valence, 0.0);
        assert_eq!(zero.energy, 0.0);

        let negative = ExpressionScores {
            happy: -0.4,
            sad: -0.2,
            ..Default::default()
        };
        assert_eq!(map_expressions_to_mood(&negative).emotion, Emotion::Neutral);
    }

    #[test]
    fn ties_keep_the_first_label_in_order() {
        let scores = ExpressionScores {
            sad: 0.5,
            angry: 0.5,
            ..Default::default()
        };
        assert_eq!(map_expressions_to_mood(&scores).emotion, Emotion::Sad);

        let uniform = ExpressionScores::from_pairs(Emotion::ALL.map(|e| (e, 0.25)));
        assert_eq!(map_expressions_to_mood(&uniform).emotion, Emotion::Neutral);
    }

    #[test]
    fn out_of_range_inputs_are_clamped() {
        let too_happy = ExpressionScores {
            happy: 1.5,
            ..Default::default()
        };
        assert_eq!(map_expressions_to_mood(&too_happy).valence, 1.0);

        let miserable = ExpressionScores {
            sad: 0.8,
            angry: 0.8,
            ..Default::default()
        };
        assert_eq!(map_expressions_to_mood(&miserable).valence, -1.0);

        let wired = ExpressionScores {
            angry: 0.8,
            fearful: 0.5,
            ..Default::default()
        };
        assert_eq!(map_expressions_to_mood(&wired).energy, 1.0);

        let flat = ExpressionScores {
            neutral: 0.8,
            sad: 0.8,
            ..Default::default()
        };
        assert_eq!(map_expressions_to_mood(&flat).energy, -1.0);
    }

    #[test]
    fn adversarial_inputs_stay_in_range() {
        let samples = [
            ExpressionScores::from_pairs(Emotion::ALL.map(|e| (e, 1e6))),
            ExpressionScores::from_pairs(Emotion::ALL.map(|e| (e, -1e6))),
            ExpressionScores {
                happy: -3.0,
                surprised: 7.5,
                neutral: -2.0,
                ..Default::default()
            },
        ];
        for scores in samples {
            let mood = map_expressions_to_mood(&scores);
            assert!((-1.0..=1.0).contains(&mood.valence));
            assert!((-1.0..=1.0).contains(&mood.energy));
        }
    }

    #[test]
    fn overflowing_sums_do_not_produce_nan() {
        let maxed = ExpressionScores::from_pairs(Emotion::ALL.map(|e| (e, f64::MAX)));
        let mood = map_expressions_to_mood(&maxed);
        assert_eq!(mood.emotion, Emotion::Neutral);
        assert_eq!(mood.valence, -1.0);
        assert_eq!(mood.energy, 0.0);

        let mut accumulator = crate::mood::MoodAccumulator::default();
        let smoothed = accumulator.apply(&mood);
        assert!(smoothed.valence.is_finite() && smoothed.energy.is_finite());
        let next = accumulator.apply(&map_expressions_to_mood(&ExpressionScores::one_hot(
            Emotion::Happy,
        )));
        assert!(next.valence.is_finite() && next.energy.is_finite());
    }
}
