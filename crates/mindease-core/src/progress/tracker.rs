//! Progress tracker over a persisted [`ProgressState`].
//!
//! Loaded once from [`PROGRESS_KEY`], written back after every mutation.
//! Unreadable or malformed state is replaced with an empty one; failed
//! writes are logged and the in-memory state stays authoritative.

use std::rc::Rc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::streak::{self, StreakTier};
use super::{ExerciseRecord, MoodRecord, ProgressState};
use crate::error::ValidationError;
use crate::mood::Mood;
use crate::storage::{KeyValueStore, PROGRESS_KEY};

/// Result of a check-in attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CheckInOutcome {
    /// A check-in already exists for today; nothing changed.
    AlreadyCheckedIn { date: NaiveDate },
    /// The check-in was appended.
    Recorded { date: NaiveDate, streak: u32 },
}

impl CheckInOutcome {
    pub fn message(&self) -> String {
        match self {
            CheckInOutcome::AlreadyCheckedIn { .. } => {
                "You've already checked in today. Keep it up! 💙".to_string()
            }
            CheckInOutcome::Recorded { streak, .. } => streak::celebration_message(*streak),
        }
    }
}

/// Result of recording an exercise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseOutcome {
    pub date: NaiveDate,
    pub duration: u32,
    pub weekly_count: usize,
}

impl ExerciseOutcome {
    pub fn message(&self) -> String {
        streak::exercise_message(self.weekly_count)
    }
}

/// Values the streak widget renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressSummary {
    pub streak: u32,
    pub tier: StreakTier,
    pub weekly_exercise_count: usize,
    pub label: String,
}

pub struct ProgressTracker {
    store: Rc<dyn KeyValueStore>,
    state: ProgressState,
}

impl ProgressTracker {
    pub fn load(store: Rc<dyn KeyValueStore>) -> Self {
        let state = match store.get(PROGRESS_KEY) {
            Ok(Some(json)) => serde_json::from_str(&json).unwrap_or_else(|e| {
                tracing::warn!("discarding malformed progress state: {e}");
                ProgressState::default()
            }),
            Ok(None) => ProgressState::default(),
            Err(e) => {
                tracing::warn!("could not read progress state: {e}");
                ProgressState::default()
            }
        };
        Self { store, state }
    }

    pub fn state(&self) -> &ProgressState {
        &self.state
    }

    pub fn check_ins(&self) -> &[MoodRecord] {
        &self.state.check_ins
    }

    pub fn exercises(&self) -> &[ExerciseRecord] {
        &self.state.exercises
    }

    /// Accept at most one check-in per calendar day.
    pub fn record_check_in(&mut self, mood: Mood, today: NaiveDate) -> CheckInOutcome {
        if self.state.last_check_in_date == Some(today) {
            tracing::debug!(%today, "check-in rejected, already checked in");
            return CheckInOutcome::AlreadyCheckedIn { date: today };
        }

        self.state.check_ins.push(MoodRecord { date: today, mood });
        self.state.last_check_in_date = Some(today);
        self.persist();

        let streak = self.calculate_streak();
        tracing::debug!(%today, streak, "check-in recorded");
        CheckInOutcome::Recorded {
            date: today,
            streak,
        }
    }

    /// Append an exercise; there is no daily cap.
    ///
    /// # Errors
    /// Returns an error if `duration` is zero.
    pub fn record_exercise(
        &mut self,
        duration: u32,
        today: NaiveDate,
    ) -> Result<ExerciseOutcome, ValidationError> {
        if duration == 0 {
            return Err(ValidationError::ZeroExerciseDuration);
        }

        self.state.exercises.push(ExerciseRecord {
            date: today,
            duration,
        });
        self.persist();

        let weekly_count = self.weekly_exercise_count(today);
        tracing::debug!(%today, duration, weekly_count, "exercise recorded");
        Ok(ExerciseOutcome {
            date: today,
            duration,
            weekly_count,
        })
    }

    pub fn calculate_streak(&self) -> u32 {
        streak::calculate_streak(&self.state.check_ins)
    }

    /// Exercises dated within `[today - 7 days, today]`.
    pub fn weekly_exercise_count(&self, today: NaiveDate) -> usize {
        self.state
            .exercises
            .iter()
            .filter(|ex| streak::within_week(ex.date, today))
            .count()
    }

    pub fn summary(&self, today: NaiveDate) -> ProgressSummary {
        let streak = self.calculate_streak();
        ProgressSummary {
            streak,
            tier: StreakTier::for_streak(streak),
            weekly_exercise_count: self.weekly_exercise_count(today),
            label: streak::streak_label(streak),
        }
    }

    fn persist(&self) {
        let json = match serde_json::to_string(&self.state) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!("could not serialize progress state: {e}");
                return;
            }
        };
        if let Err(e) = self.store.set(PROGRESS_KEY, &json) {
            tracing::warn!("could not persist progress state: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageError;
    use crate::storage::MemoryStore;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn tracker() -> (Rc<MemoryStore>, ProgressTracker) {
        let kv = Rc::new(MemoryStore::new());
        let tracker = ProgressTracker::load(kv.clone());
        (kv, tracker)
    }

    struct FailingStore;

    impl KeyValueStore for FailingStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Locked)
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Locked)
        }
    }

    #[test]
    fn consecutive_check_ins_build_streak() {
        let (_, mut t) = tracker();
        t.record_check_in(Mood::Happy, day("2024-01-01"));
        t.record_check_in(Mood::Calm, day("2024-01-02"));
        let outcome = t.record_check_in(Mood::Stressed, day("2024-01-03"));
        assert_eq!(
            outcome,
            CheckInOutcome::Recorded {
                date: day("2024-01-03"),
                streak: 3
            }
        );
        assert!(outcome.message().contains("3-day streak"));
    }

    #[test]
    fn gap_restarts_streak() {
        let (_, mut t) = tracker();
        t.record_check_in(Mood::Happy, day("2024-01-01"));
        let outcome = t.record_check_in(Mood::Calm, day("2024-01-03"));
        assert_eq!(
            outcome,
            CheckInOutcome::Recorded {
                date: day("2024-01-03"),
                streak: 1
            }
        );
        assert_eq!(outcome.message(), "Awesome! You checked in today. 🎉");
    }

    #[test]
    fn second_check_in_same_day_is_rejected() {
        let (kv, mut t) = tracker();
        t.record_check_in(Mood::Happy, day("2024-01-01"));
        let persisted = kv.get(PROGRESS_KEY).unwrap();

        let outcome = t.record_check_in(Mood::Anxious, day("2024-01-01"));
        assert!(matches!(outcome, CheckInOutcome::AlreadyCheckedIn { .. }));
        assert_ne!(outcome.message(), CheckInOutcome::Recorded { date: day("2024-01-01"), streak: 1 }.message());
        assert_eq!(t.check_ins().len(), 1);
        assert_eq!(t.check_ins()[0].mood, Mood::Happy);
        assert_eq!(t.state().last_check_in_date, Some(day("2024-01-01")));
        assert_eq!(kv.get(PROGRESS_KEY).unwrap(), persisted);
    }

    #[test]
    fn weekly_count_window_edges() {
        let (_, mut t) = tracker();
        let today = day("2024-03-15");
        t.record_exercise(1, day("2024-03-07")).unwrap(); // 8 days ago
        t.record_exercise(1, day("2024-03-08")).unwrap(); // 7 days ago
        t.record_exercise(1, today).unwrap();
        assert_eq!(t.weekly_exercise_count(today), 2);
    }

    #[test]
    fn exercises_have_no_daily_cap() {
        let (_, mut t) = tracker();
        let today = day("2024-03-15");
        t.record_exercise(1, today).unwrap();
        let outcome = t.record_exercise(2, today).unwrap();
        assert_eq!(outcome.weekly_count, 2);
        assert_eq!(outcome.message(), "Great work! You've completed 2 exercises this week. 🌟");
    }

    #[test]
    fn zero_duration_exercise_is_rejected() {
        let (_, mut t) = tracker();
        let result = t.record_exercise(0, day("2024-03-15"));
        assert_eq!(result, Err(ValidationError::ZeroExerciseDuration));
        assert!(t.exercises().is_empty());
    }

    #[test]
    fn state_survives_reload() {
        let (kv, mut t) = tracker();
        t.record_check_in(Mood::Happy, day("2024-01-01"));
        t.record_check_in(Mood::Calm, day("2024-01-02"));
        t.record_exercise(1, day("2024-01-02")).unwrap();
        t.record_exercise(3, day("2024-01-01")).unwrap();

        let reloaded = ProgressTracker::load(kv);
        assert_eq!(reloaded.state(), t.state());
        assert_eq!(reloaded.calculate_streak(), 2);
    }

    #[test]
    fn persisted_shape_uses_camel_case_keys() {
        let (kv, mut t) = tracker();
        t.record_check_in(Mood::Happy, day("2024-01-01"));
        let json: serde_json::Value =
            serde_json::from_str(&kv.get(PROGRESS_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(json["lastCheckInDate"], "2024-01-01");
        assert_eq!(json["checkIns"][0]["date"], "2024-01-01");
        assert_eq!(json["checkIns"][0]["mood"], "Happy");
        assert!(json["exercises"].as_array().unwrap().is_empty());
    }

    #[test]
    fn reads_browser_written_state() {
        let json = r#"{"checkIns":[{"date":"2024-01-01","mood":"Happy"},{"date":"2024-01-02","mood":"Calm"}],"exercises":[{"date":"2024-01-02","duration":1}],"lastCheckInDate":"2024-01-02"}"#;
        let kv = Rc::new(MemoryStore::with_entries([(PROGRESS_KEY, json)]));
        let t = ProgressTracker::load(kv);
        assert_eq!(t.calculate_streak(), 2);
        assert_eq!(t.weekly_exercise_count(day("2024-01-05")), 1);
    }

    #[test]
    fn malformed_state_falls_back_to_empty() {
        let kv = Rc::new(MemoryStore::with_entries([(PROGRESS_KEY, "{not json")]));
        let t = ProgressTracker::load(kv);
        assert_eq!(t.state(), &ProgressState::default());
        assert_eq!(t.calculate_streak(), 0);
    }

    #[test]
    fn storage_failures_do_not_block_state_changes() {
        let mut t = ProgressTracker::load(Rc::new(FailingStore));
        let outcome = t.record_check_in(Mood::Calm, day("2024-01-01"));
        assert!(matches!(outcome, CheckInOutcome::Recorded { streak: 1, .. }));
        assert_eq!(t.record_exercise(1, day("2024-01-01")).unwrap().weekly_count, 1);
    }

    #[test]
    fn summary_tracks_tier() {
        let (_, mut t) = tracker();
        let start = day("2024-01-01");
        for i in 0..7 {
            t.record_check_in(Mood::Calm, start + chrono::Duration::days(i));
        }
        let summary = t.summary(day("2024-01-07"));
        assert_eq!(summary.streak, 7);
        assert_eq!(summary.tier, StreakTier::High);
        assert_eq!(summary.label, "7-day streak");
        assert_eq!(summary.weekly_exercise_count, 0);
    }
}
