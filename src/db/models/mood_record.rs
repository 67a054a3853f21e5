use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::mood::Emotion;

/// A logged, smoothed mood sample.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MoodRecord {
    pub id: String,
    pub emotion: Emotion,
    pub valence: f64,
    pub energy: f64,
    pub created_at: DateTime<Utc>,
}
