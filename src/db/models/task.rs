use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub is_completed: bool,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Open tasks whose due date is strictly before `today`.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        if self.is_completed {
            return false;
        }
        self.due_date.is_some_and(|due| due < today)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn task(is_completed: bool, due_date: Option<NaiveDate>) -> Task {
        Task {
            id: 1,
            title: "Read chapter".into(),
            is_completed,
            due_date,
            created_at: Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap(),
        }
    }

    #[test]
    fn overdue_only_when_open_and_past_due() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 9).unwrap();
        let yesterday = today.pred_opt().unwrap();

        assert!(task(false, Some(yesterday)).is_overdue(today));
        assert!(!task(false, Some(today)).is_overdue(today));
        assert!(!task(false, today.succ_opt()).is_overdue(today));
        assert!(!task(true, Some(yesterday)).is_overdue(today));
        assert!(!task(false, None).is_overdue(today));
    }

    #[test]
    fn due_date_serializes_as_calendar_date() {
        let json = serde_json::to_value(task(false, NaiveDate::from_ymd_opt(2026, 3, 9))).unwrap();
        assert_eq!(json["dueDate"], "2026-03-09");
        assert_eq!(json["isCompleted"], false);
    }
}
