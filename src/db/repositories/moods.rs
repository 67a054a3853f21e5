use anyhow::{Context, Result};
use chrono::{DateTime, SubsecRound, Utc};
use rusqlite::{params, Row};
use uuid::Uuid;

use crate::db::{
    connection::Database,
    helpers::{format_datetime, parse_datetime, parse_emotion},
    models::MoodRecord,
};
use crate::mood::Mood;

fn row_to_mood(row: &Row) -> Result<MoodRecord> {
    let emotion: String = row.get("emotion")?;
    let created_at: String = row.get("created_at")?;

    Ok(MoodRecord {
        id: row.get("id")?,
        emotion: parse_emotion(&emotion)?,
        valence: row.get("valence")?,
        energy: row.get("energy")?,
        created_at: parse_datetime(&created_at, "created_at")?,
    })
}

impl Database {
    /// Appends a mood to the log. Unstamped moods are logged at the current time.
    /// Timestamps are stored at millisecond precision.
    pub async fn insert_mood(&self, mood: &Mood) -> Result<MoodRecord> {
        let record = MoodRecord {
            id: Uuid::new_v4().to_string(),
            emotion: mood.emotion,
            valence: mood.valence,
            energy: mood.energy,
            created_at: mood.timestamp.unwrap_or_else(Utc::now).trunc_subsecs(3),
        };

        let stored = record.clone();
        self.execute(move |conn| {
            conn.execute(
                "INSERT INTO moods (id, emotion, valence, energy, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    stored.id,
                    stored.emotion.as_str(),
                    stored.valence,
                    stored.energy,
                    format_datetime(&stored.created_at),
                ],
            )
            .with_context(|| "failed to insert mood")?;
            Ok(())
        })
        .await?;

        Ok(record)
    }

    /// All logged moods, oldest first.
    pub async fn list_moods(&self) -> Result<Vec<MoodRecord>> {
        self.execute(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, emotion, valence, energy, created_at
                 FROM moods
                 ORDER BY created_at ASC",
            )?;

            let mut rows = stmt.query([])?;
            let mut moods = Vec::new();
            while let Some(row) = rows.next()? {
                moods.push(row_to_mood(row)?);
            }
            Ok(moods)
        })
        .await
    }

    /// Moods logged at or after `since`, oldest first.
    pub async fn list_moods_since(&self, since: DateTime<Utc>) -> Result<Vec<MoodRecord>> {
        let since = format_datetime(&since);
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, emotion, valence, energy, created_at
                 FROM moods
                 WHERE created_at >= ?1
                 ORDER BY created_at ASC",
            )?;

            let mut rows = stmt.query(params![since])?;
            let mut moods = Vec::new();
            while let Some(row) = rows.next()? {
                moods.push(row_to_mood(row)?);
            }
            Ok(moods)
        })
        .await
    }
}
