use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::breathing::PhaseName;
use crate::mood::Mood;
use crate::progress::StreakTier;

/// Every state change in the core produces an Event.
/// The host renders them; nothing flows back into core state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    MoodChanged {
        mood: Mood,
        /// `None` for moods without a styling class.
        style_class: Option<String>,
        at: DateTime<Utc>,
    },
    CheckInRecorded {
        date: NaiveDate,
        mood: Mood,
        streak: u32,
        message: String,
        at: DateTime<Utc>,
    },
    /// Same-day duplicate; distinct from the success path on purpose.
    CheckInRejected {
        date: NaiveDate,
        message: String,
        at: DateTime<Utc>,
    },
    ExerciseRecorded {
        date: NaiveDate,
        duration: u32,
        weekly_count: usize,
        message: String,
        at: DateTime<Utc>,
    },
    ProgressUpdated {
        streak: u32,
        tier: StreakTier,
        weekly_exercise_count: usize,
        label: String,
        at: DateTime<Utc>,
    },
    BreathingStarted {
        at: DateTime<Utc>,
    },
    PhaseStarted {
        phase_index: usize,
        phase: PhaseName,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    PhaseTick {
        phase: PhaseName,
        remaining_secs: u64,
        /// 0.0 at phase start, 1.0 once the phase duration has elapsed.
        progress: f64,
        /// Visual ring scale between the runner's minimum and maximum.
        scale: f64,
        at: DateTime<Utc>,
    },
    PhaseCompleted {
        phase_index: usize,
        phase: PhaseName,
        at: DateTime<Utc>,
    },
    BreathingStopped {
        completed_phases: u32,
        counts_as_exercise: bool,
        /// Placeholder shown in place of the remaining time.
        remaining_display: String,
        scale: f64,
        at: DateTime<Utc>,
    },
    SoundToggled {
        enabled: bool,
        at: DateTime<Utc>,
    },
}
