use std::collections::BTreeMap;

use anyhow::Result;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;

use crate::db::{helpers::format_datetime, Database, MoodRecord};

/// Average mood for one calendar day (UTC).
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyMoodSummary {
    pub date: NaiveDate,
    /// Weekday name, e.g. "Monday".
    pub day: String,
    pub avg_valence: f64,
    pub avg_energy: f64,
    pub samples: usize,
}

/// Groups records by UTC calendar day, oldest day first.
pub fn summarize_by_day(records: &[MoodRecord]) -> Vec<WeeklyMoodSummary> {
    let mut days: BTreeMap<NaiveDate, (f64, f64, usize)> = BTreeMap::new();
    for record in records {
        let entry = days
            .entry(record.created_at.date_naive())
            .or_insert((0.0, 0.0, 0));
        entry.0 += record.valence;
        entry.1 += record.energy;
        entry.2 += 1;
    }

    days.into_iter()
        .map(|(date, (valence, energy, samples))| WeeklyMoodSummary {
            date,
            day: date.format("%A").to_string(),
            avg_valence: valence / samples as f64,
            avg_energy: energy / samples as f64,
            samples,
        })
        .collect()
}

/// CSV export with a `timestamp,emotion,valence,energy` header.
pub fn moods_to_csv(records: &[MoodRecord]) -> String {
    let mut csv = String::from("timestamp,emotion,valence,energy\n");
    for record in records {
        csv.push_str(&format!(
            "{},{},{},{}\n",
            format_datetime(&record.created_at),
            record.emotion,
            record.valence,
            record.energy
        ));
    }
    csv
}

impl Database {
    /// Per-day averages over the seven days ending at `now`.
    pub async fn weekly_mood_summary(&self, now: DateTime<Utc>) -> Result<Vec<WeeklyMoodSummary>> {
        let records = self.list_moods_since(now - Duration::days(7)).await?;
        Ok(summarize_by_day(&records))
    }

    pub async fn export_moods_csv(&self) -> Result<String> {
        let records = self.list_moods().await?;
        Ok(moods_to_csv(&records))
    }
}
