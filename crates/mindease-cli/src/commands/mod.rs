pub mod breathe;
pub mod chat;
pub mod checkin;
pub mod config;
pub mod exercise;
pub mod mood;
pub mod progress;
pub mod sound;

use std::io::Write;
use std::rc::Rc;

use mindease_core::audio::{CuePlayer, Tone, Utterance};
use mindease_core::error::Result;
use mindease_core::{Companion, Config, Event, SqliteStore, SystemClock};

pub type App = Companion<SystemClock, TerminalCues>;

/// Open the persisted store and build the companion from the saved config.
pub fn open_companion() -> Result<App> {
    let store = SqliteStore::open()?;
    let config = Config::load_or_default();
    let companion = Companion::from_config(Rc::new(store), &config, SystemClock, TerminalCues)?;
    Ok(companion)
}

/// Cue player for a terminal: a bell for tones, a line on stderr for speech.
pub struct TerminalCues;

impl CuePlayer for TerminalCues {
    type Error = std::io::Error;

    fn play_tone(&mut self, _tone: &Tone) -> Result<(), Self::Error> {
        let mut err = std::io::stderr();
        err.write_all(b"\x07")?;
        err.flush()
    }

    fn speak(&mut self, utterance: &Utterance) -> Result<(), Self::Error> {
        writeln!(std::io::stderr(), "» {}", utterance.text)
    }
}

pub fn print_events(events: &[Event], json: bool) -> Result<(), serde_json::Error> {
    for event in events {
        if json {
            println!("{}", serde_json::to_string(event)?);
        } else if let Some(line) = describe(event) {
            println!("{line}");
        }
    }
    Ok(())
}

/// One human-readable line per event worth showing.
pub fn describe(event: &Event) -> Option<String> {
    match event {
        Event::MoodChanged { mood, .. } => Some(format!("Mood set to {mood}")),
        Event::CheckInRecorded { message, .. }
        | Event::CheckInRejected { message, .. }
        | Event::ExerciseRecorded { message, .. } => Some(message.clone()),
        Event::ProgressUpdated {
            label,
            weekly_exercise_count,
            ..
        } => Some(format!(
            "{label} · {weekly_exercise_count} exercise(s) this week"
        )),
        Event::BreathingStarted { .. } => Some("Breathing session started".into()),
        Event::PhaseStarted {
            phase,
            duration_secs,
            ..
        } => Some(format!("{phase} ({duration_secs}s)")),
        Event::PhaseTick { .. } | Event::PhaseCompleted { .. } => None,
        Event::BreathingStopped {
            remaining_display, ..
        } => Some(format!("Stopped {remaining_display}")),
        Event::SoundToggled { enabled, .. } => {
            Some(format!("Sound {}", if *enabled { "On" } else { "Off" }))
        }
    }
}
