use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use anyhow::{anyhow, Error};

/// The closed set of expression labels a face-expression detector reports.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Neutral,
    Happy,
    Sad,
    Angry,
    Fearful,
    Disgusted,
    Surprised,
}

impl Default for Emotion {
    fn default() -> Self {
        Emotion::Neutral
    }
}

impl Emotion {
    /// Enumeration order used when scanning for the dominant label.
    pub const ALL: [Emotion; 7] = [
        Emotion::Neutral,
        Emotion::Happy,
        Emotion::Sad,
        Emotion::Angry,
        Emotion::Fearful,
        Emotion::Disgusted,
        Emotion::Surprised,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Emotion::Neutral => "neutral",
            Emotion::Happy => "happy",
            Emotion::Sad => "sad",
            Emotion::Angry => "angry",
            Emotion::Fearful => "fearful",
            Emotion::Disgusted => "disgusted",
            Emotion::Surprised => "surprised",
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Emotion {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Emotion::ALL
            .into_iter()
            .find(|emotion| emotion.as_str() == value)
            .ok_or_else(|| anyhow!("unknown emotion label '{value}'"))
    }
}

/// Raw per-label scores for one detector sample.
///
/// Scores are expected to be a probability-like distribution, but nothing here
/// relies on that.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExpressionScores {
    pub neutral: f64,
    pub happy: f64,
    pub sad: f64,
    pub angry: f64,
    pub fearful: f64,
    pub disgusted: f64,
    pub surprised: f64,
}

impl ExpressionScores {
    /// Scores where `emotion` is 1.0 and every other label is 0.0.
    pub fn one_hot(emotion: Emotion) -> Self {
        Self::from_pairs([(emotion, 1.0)])
    }

    /// Builds scores from `(label, score)` pairs; labels not mentioned stay 0.0.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (Emotion, f64)>,
    {
        let mut scores = Self::default();
        for (emotion, score) in pairs {
            *scores.get_mut(emotion) = score;
        }
        scores
    }

    pub fn get(&self, emotion: Emotion) -> f64 {
        match emotion {
            Emotion::Neutral => self.neutral,
            Emotion::Happy => self.happy,
            Emotion::Sad => self.sad,
            Emotion::Angry => self.angry,
            Emotion::Fearful => self.fearful,
            Emotion::Disgusted => self.disgusted,
            Emotion::Surprised => self.surprised,
        }
    }

    fn get_mut(&mut self, emotion: Emotion) -> &mut f64 {
        match emotion {
            Emotion::Neutral => &mut self.neutral,
            Emotion::Happy => &mut self.happy,
            Emotion::Sad => &mut self.sad,
            Emotion::Angry => &mut self.angry,
            Emotion::Fearful => &mut self.fearful,
            Emotion::Disgusted => &mut self.disgusted,
            Emotion::Surprised => &mut self.surprised,
        }
    }

    /// Iterates `(label, score)` in `Emotion::ALL` order.
    pub fn iter(&self) -> impl Iterator<Item = (Emotion, f64)> + '_ {
        Emotion::ALL.into_iter().map(move |emotion| (emotion, self.get(emotion)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_round_trip_through_strings() {
        for emotion in Emotion::ALL {
            assert_eq!(emotion.as_str().parse::<Emotion>().unwrap(), emotion);
        }
        assert!("tired".parse::<Emotion>().is_err());
    }

    #[test]
    fn serializes_lowercase_labels() {
        let json = serde_json::to_string(&Emotion::Surprised).unwrap();
        assert_eq!(json, "\"surprised\"");
    }

    #[test]
    fn missing_scores_default_to_zero() {
        let scores: ExpressionScores = serde_json::from_str(r#"{"happy":0.7}"#).unwrap();
        assert_eq!(scores.happy, 0.7);
        assert_eq!(scores.sad, 0.0);
    }

    #[test]
    fn iter_follows_enumeration_order() {
        let scores = ExpressionScores::one_hot(Emotion::Fearful);
        let labels: Vec<_> = scores.iter().map(|(emotion, _)| emotion).collect();
        assert_eq!(labels, Emotion::ALL.to_vec());
        assert_eq!(scores.get(Emotion::Fearful), 1.0);
    }
}
