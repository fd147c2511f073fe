//! # MindEase Core Library
//!
//! This library provides the core logic behind the MindEase wellness
//! companion: mood selection, daily check-in streaks, and a guided breathing
//! timer with audio cues. Hosts (the CLI, or any UI layer) construct a
//! [`Companion`], forward user actions to it and render the [`Event`]s it
//! returns.
//!
//! ## Architecture
//!
//! - **Mood Store**: the current mood, persisted for styling
//! - **Progress Tracker**: check-ins, exercises, streak and weekly counts
//! - **Breathing Runner**: a wall-clock-based phase timer that hands the host
//!   one [`Continuation`] at a time instead of owning a timer thread
//! - **Storage**: a string key-value seam with in-memory and SQLite backends,
//!   plus TOML-based configuration
//!
//! ## Key Components
//!
//! - [`Companion`]: Composition root for a single user
//! - [`ProgressTracker`]: Streak and exercise bookkeeping
//! - [`BreathingRunner`]: Breathing cycle state machine
//! - [`KeyValueStore`]: Persistence trait

pub mod audio;
pub mod breathing;
pub mod chat;
pub mod clock;
pub mod companion;
pub mod error;
pub mod events;
pub mod mood;
pub mod progress;
pub mod storage;

pub use audio::{BreathingAudio, CuePlayer, SilentPlayer, SoundSettings, Tone, Utterance};
pub use breathing::{
    drive, BreathingCycle, BreathingRunner, Continuation, ContinuationHost, Phase, PhaseName,
    RunnerState, RunnerTiming,
};
pub use clock::{Clock, ManualClock, SystemClock};
pub use companion::{Companion, MoodSelection};
pub use error::{ConfigError, CoreError, StorageError, ValidationError};
pub use events::Event;
pub use mood::{Mood, MoodStore};
pub use progress::{
    CheckInOutcome, ExerciseOutcome, ExerciseRecord, MoodRecord, ProgressState, ProgressSummary,
    ProgressTracker, StreakTier,
};
pub use storage::{Config, KeyValueStore, MemoryStore, SqliteStore};
