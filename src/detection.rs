use chrono::{DateTime, Duration, Utc};

use crate::{
    db::Database,
    mood::{map_expressions_to_mood, ExpressionScores, Mood, MoodAccumulator, MoodHistory, RegulationTarget},
};

const ENABLE_LOGS: bool = true;

/// How long the dominant emotion must hold before its target is handed out.
pub const TARGET_SETTLE_MILLIS: i64 = 1_500;

/// One camera detection run: maps, smooths, records and optionally logs samples.
///
/// Samples are taken by `&mut self`, so each accumulator update is a single
/// read-modify-write even when the session is shared behind a lock.
pub struct DetectionSession {
    accumulator: MoodAccumulator,
    history: MoodHistory,
    db: Option<Database>,
    log_mood_data: bool,
    emotion_since: Option<DateTime<Utc>>,
}

impl DetectionSession {
    pub fn new(accumulator: MoodAccumulator) -> Self {
        Self {
            accumulator,
            history: MoodHistory::default(),
            db: None,
            log_mood_data: false,
            emotion_since: None,
        }
    }

    /// Attaches the mood log; `log_mood_data` is the user's privacy choice.
    pub fn with_mood_log(mut self, db: Database, log_mood_data: bool) -> Self {
        self.db = Some(db);
        self.log_mood_data = log_mood_data;
        self
    }

    pub fn set_log_mood_data(&mut self, enabled: bool) {
        self.log_mood_data = enabled;
    }

    /// Processes one detector sample and returns the smoothed, stamped mood.
    /// Mood-log failures are logged and do not fail the sample.
    pub async fn ingest(&mut self, scores: &ExpressionScores, at: DateTime<Utc>) -> Mood {
        let raw = map_expressions_to_mood(scores);
        let mood = self.accumulator.apply(&raw).with_timestamp(at);
        if self.current_mood().map(|latest| latest.emotion) != Some(mood.emotion) {
            self.emotion_since = Some(at);
        }
        self.history.push(&mood, at);

        if self.log_mood_data {
            if let Some(db) = &self.db {
                if let Err(err) = db.insert_mood(&mood).await {
                    crate::log_error!("Error logging mood: {err:#}");
                }
            }
        }

        mood
    }

    /// Starts a fresh run: accumulators back to zero, history cleared.
    pub fn restart(&mut self) {
        self.accumulator.reset();
        self.history.clear();
        self.emotion_since = None;
        crate::log_info!("Detection session restarted");
    }

    pub fn current_mood(&self) -> Option<&Mood> {
        self.history.latest()
    }

    /// Target for the latest mood, if any sample has arrived.
    pub fn current_target(&self) -> Option<RegulationTarget> {
        self.current_mood().map(|mood| mood.emotion.regulation_target())
    }

    /// Like `current_target`, but only once the dominant emotion has held for
    /// `TARGET_SETTLE_MILLIS` as of `now`.
    pub fn settled_target(&self, now: DateTime<Utc>) -> Option<RegulationTarget> {
        let since = self.emotion_since?;
        if now - since < Duration::milliseconds(TARGET_SETTLE_MILLIS) {
            return None;
        }
        self.current_target()
    }

    pub fn history(&self) -> &MoodHistory {
        &self.history
    }
}

impl Default for DetectionSession {
    fn default() -> Self {
        Self::new(MoodAccumulator::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mood::Emotion;
    use chrono::TimeZone;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn smooths_across_samples_and_keeps_raw_emotion() {
        let mut session = DetectionSession::default();
        let happy = ExpressionScores {
            neutral: 0.1,
            happy: 0.9,
            ..Default::default()
        };

        let first = session.ingest(&happy, start()).await;
        assert_eq!(first.emotion, Emotion::Happy);
        assert!((first.valence - 0.18).abs() < 1e-9);
        assert!((first.energy + 0.02).abs() < 1e-9);
        assert_eq!(first.timestamp, Some(start()));

        let second = session
            .ingest(&happy, start() + Duration::milliseconds(400))
            .await;
        assert!(second.valence > first.valence && second.valence < 0.9);
        assert_eq!(session.history().len(), 2);
        assert_eq!(session.current_target(), Some(RegulationTarget::new(0.8, 0.7)));
    }

    #[tokio::test]
    async fn restart_resets_accumulators() {
        let mut session = DetectionSession::default();
        let sad = ExpressionScores::one_hot(Emotion::Sad);
        session.ingest(&sad, start()).await;
        session.restart();

        assert!(session.current_mood().is_none());
        assert!(session.current_target().is_none());
        let mood = session.ingest(&sad, start()).await;
        assert!((mood.valence + 0.2).abs() < 1e-9);
    }

    #[tokio::test]
    async fn target_waits_for_the_emotion_to_settle() {
        let mut session = DetectionSession::default();
        let happy = ExpressionScores::one_hot(Emotion::Happy);
        let sad = ExpressionScores::one_hot(Emotion::Sad);
        let ms = Duration::milliseconds;

        assert!(session.settled_target(start()).is_none());

        session.ingest(&happy, start()).await;
        session.ingest(&happy, start() + ms(500)).await;
        assert!(session.settled_target(start() + ms(1_000)).is_none());
        assert_eq!(
            session.settled_target(start() + ms(1_500)),
            Some(RegulationTarget::new(0.8, 0.7))
        );

        session.ingest(&sad, start() + ms(2_000)).await;
        assert!(session.settled_target(start() + ms(3_000)).is_none());
        assert_eq!(
            session.settled_target(start() + ms(3_500)),
            Some(Emotion::Sad.regulation_target())
        );

        session.restart();
        assert!(session.settled_target(start() + ms(10_000)).is_none());
    }

    #[tokio::test]
    async fn logs_only_when_opted_in() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(dir.path().join("d.sqlite3")).unwrap();
        let mut session = DetectionSession::default().with_mood_log(db.clone(), true);

        let scores = ExpressionScores::one_hot(Emotion::Surprised);
        session.ingest(&scores, start()).await;
        session.set_log_mood_data(false);
        session.ingest(&scores, start() + Duration::seconds(1)).await;

        let logged = db.list_moods().await.unwrap();
        assert_eq!(logged.len(), 1);
        assert_eq!(logged[0].emotion, Emotion::Surprised);
        assert_eq!(logged[0].created_at, start());
    }
}
