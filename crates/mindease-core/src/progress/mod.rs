//! Check-in and exercise progress.

mod streak;
mod tracker;

pub use streak::{
    calculate_streak, celebration_message, exercise_message, streak_label, within_week,
    Milestone, StreakTier,
};
pub use tracker::{CheckInOutcome, ExerciseOutcome, ProgressSummary, ProgressTracker};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::mood::Mood;

/// One accepted daily check-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodRecord {
    pub date: NaiveDate,
    pub mood: Mood,
}

/// One completed exercise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseRecord {
    pub date: NaiveDate,
    pub duration: u32,
}

/// Everything the tracker persists.
///
/// `check_ins` and `exercises` are append-only and kept in insertion order.
/// `last_check_in_date` mirrors the date of the newest check-in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressState {
    #[serde(default)]
    pub check_ins: Vec<MoodRecord>,
    #[serde(default)]
    pub exercises: Vec<ExerciseRecord>,
    #[serde(default)]
    pub last_check_in_date: Option<NaiveDate>,
}
