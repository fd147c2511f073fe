//! Streak arithmetic and the messages derived from it.
//!
//! Dates are compared as plain calendar days. No timezone or DST
//! normalization is applied; a check-in stored under a UTC day stays on that
//! day.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::MoodRecord;

/// Length of the unbroken run of daily check-ins ending at the newest one.
///
/// `check_ins` must be in insertion (chronological) order. The walk starts
/// at the tail and stops at the first pair that is not exactly one day
/// apart.
pub fn calculate_streak(check_ins: &[MoodRecord]) -> u32 {
    if check_ins.is_empty() {
        return 0;
    }

    let mut streak = 1;
    for pair in check_ins.windows(2).rev() {
        let (previous, current) = (pair[0].date, pair[1].date);
        if current.signed_duration_since(previous).num_days() == 1 {
            streak += 1;
        } else {
            break;
        }
    }
    streak
}

/// Whether `date` falls in the trailing week `[today - 7 days, today]`.
pub fn within_week(date: NaiveDate, today: NaiveDate) -> bool {
    let days_ago = today.signed_duration_since(date).num_days();
    (0..=7).contains(&days_ago)
}

/// Presentational band of a streak.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreakTier {
    Low,
    Mid,
    High,
}

impl StreakTier {
    pub fn for_streak(streak: u32) -> Self {
        match streak {
            s if s >= 7 => StreakTier::High,
            3..=6 => StreakTier::Mid,
            _ => StreakTier::Low,
        }
    }
}

/// Streak lengths that earn their own celebration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Milestone {
    ThreeDays,
    OneWeek,
    TwoWeeks,
    ThirtyDays,
}

impl Milestone {
    pub fn for_streak(streak: u32) -> Option<Self> {
        match streak {
            3 => Some(Milestone::ThreeDays),
            7 => Some(Milestone::OneWeek),
            14 => Some(Milestone::TwoWeeks),
            30 => Some(Milestone::ThirtyDays),
            _ => None,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Milestone::ThreeDays => "🔥 3-day streak! You're building momentum!",
            Milestone::OneWeek => "⭐ One-week streak! You're a wellness champion!",
            Milestone::TwoWeeks => "✨ Two-week streak! Incredible consistency!",
            Milestone::ThirtyDays => "👑 30-day streak! You've transformed your habits!",
        }
    }
}

/// Celebration shown after an accepted check-in.
pub fn celebration_message(streak: u32) -> String {
    match Milestone::for_streak(streak) {
        Some(milestone) => milestone.message().to_string(),
        None if streak > 1 => format!("🌟 {streak}-day streak! Keep it going!"),
        None => "Awesome! You checked in today. 🎉".to_string(),
    }
}

/// Short badge text for the streak widget.
pub fn streak_label(streak: u32) -> String {
    if streak > 0 {
        format!("{streak}-day streak")
    } else {
        "Start your journey".to_string()
    }
}

/// Encouragement shown after an exercise is recorded.
pub fn exercise_message(weekly_count: usize) -> String {
    let plural = if weekly_count == 1 { "" } else { "s" };
    format!("Great work! You've completed {weekly_count} exercise{plural} this week. 🌟")
}
