//! Composition root tying mood, progress, breathing and audio together.
//!
//! Every operation returns the events the host should render, in order.

use std::rc::Rc;

use serde::Serialize;

use crate::audio::{BreathingAudio, CuePlayer, SoundSettings};
use crate::breathing::{
    BreathingCycle, BreathingRunner, Continuation, ContinuationHost, RunnerTiming,
};
use crate::clock::Clock;
use crate::error::ValidationError;
use crate::events::Event;
use crate::mood::{Mood, MoodStore};
use crate::progress::{CheckInOutcome, ExerciseOutcome, ProgressSummary, ProgressTracker};
use crate::storage::{Config, KeyValueStore};

/// Result of picking a mood.
#[derive(Debug, Clone, Serialize)]
pub struct MoodSelection {
    /// Mood name followed by its feedback sentence.
    pub feedback: String,
    pub outcome: CheckInOutcome,
    pub events: Vec<Event>,
}

pub struct Companion<C: Clock + Clone, P: CuePlayer> {
    clock: C,
    mood: MoodStore,
    progress: ProgressTracker,
    runner: BreathingRunner<C>,
    audio: BreathingAudio<P>,
}

impl<C: Clock + Clone, P: CuePlayer> Companion<C, P> {
    pub fn new(
        store: Rc<dyn KeyValueStore>,
        cycle: BreathingCycle,
        timing: RunnerTiming,
        default_sound: bool,
        clock: C,
        player: P,
    ) -> Self {
        Self {
            mood: MoodStore::load(store.clone()),
            progress: ProgressTracker::load(store.clone()),
            runner: BreathingRunner::new(cycle, timing, clock.clone()),
            audio: BreathingAudio::new(SoundSettings::load(store, default_sound), player),
            clock,
        }
    }

    /// Build from a loaded [`Config`].
    ///
    /// # Errors
    /// Returns an error if the configured breathing cycle or timing is
    /// invalid. A config from [`Config::load`] has already been sanitized.
    pub fn from_config(
        store: Rc<dyn KeyValueStore>,
        config: &Config,
        clock: C,
        player: P,
    ) -> Result<Self, ValidationError> {
        let cycle = config.breathing.cycle()?;
        let timing = config.breathing.timing()?;
        Ok(Self::new(
            store,
            cycle,
            timing,
            config.sound.default_enabled,
            clock,
            player,
        ))
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn current_mood(&self) -> Option<&Mood> {
        self.mood.current_mood()
    }

    pub fn progress(&self) -> &ProgressTracker {
        &self.progress
    }

    pub fn runner(&self) -> &BreathingRunner<C> {
        &self.runner
    }

    pub fn audio(&self) -> &BreathingAudio<P> {
        &self.audio
    }

    pub fn summary(&self) -> ProgressSummary {
        self.progress.summary(self.clock.today())
    }

    // ── Mood & progress ──────────────────────────────────────────────

    /// Change the current mood without checking in.
    pub fn set_mood(&mut self, mood: Mood) -> Event {
        self.mood.set_mood(mood, &self.clock)
    }

    /// Make `mood` current, then check in for today.
    pub fn select_mood(&mut self, mood: Mood) -> MoodSelection {
        let feedback = format!("{} — {}", mood, mood.feedback());
        let mut events = vec![self.mood.set_mood(mood.clone(), &self.clock)];

        let today = self.clock.today();
        let outcome = self.progress.record_check_in(mood.clone(), today);
        let at = self.clock.now();
        match &outcome {
            CheckInOutcome::AlreadyCheckedIn { date } => {
                events.push(Event::CheckInRejected {
                    date: *date,
                    message: outcome.message(),
                    at,
                });
            }
            CheckInOutcome::Recorded { date, streak } => {
                events.push(Event::CheckInRecorded {
                    date: *date,
                    mood,
                    streak: *streak,
                    message: outcome.message(),
                    at,
                });
                events.push(self.progress_event());
            }
        }

        MoodSelection {
            feedback,
            outcome,
            events,
        }
    }

    /// # Errors
    /// Returns an error if `duration` is zero.
    pub fn record_exercise(&mut self, duration: u32) -> Result<Vec<Event>, ValidationError> {
        let outcome = self.progress.record_exercise(duration, self.clock.today())?;
        Ok(vec![self.exercise_event(&outcome), self.progress_event()])
    }

    pub fn toggle_sound(&mut self) -> Event {
        let enabled = self.audio.toggle_sound();
        Event::SoundToggled {
            enabled,
            at: self.clock.now(),
        }
    }

    // ── Breathing ────────────────────────────────────────────────────

    pub fn start_breathing(&mut self) -> Vec<Event> {
        if self.runner.is_running() {
            return Vec::new();
        }
        self.audio.start_chime();
        let events = self.runner.start();
        self.cue(&events);
        events
    }

    pub fn fire(&mut self, id: u64) -> Vec<Event> {
        let events = self.runner.fire(id);
        self.cue(&events);
        events
    }

    /// Stop the session and credit an exercise if it got past its first
    /// phase. Also the teardown hook.
    pub fn stop_breathing(&mut self) -> Vec<Event> {
        let Some(stopped) = self.runner.stop() else {
            return Vec::new();
        };
        let counts = matches!(
            stopped,
            Event::BreathingStopped {
                counts_as_exercise: true,
                ..
            }
        );
        let mut events = vec![stopped];
        if counts {
            match self.progress.record_exercise(1, self.clock.today()) {
                Ok(outcome) => {
                    events.push(self.exercise_event(&outcome));
                    events.push(self.progress_event());
                }
                Err(e) => tracing::warn!("could not record breathing exercise: {e}"),
            }
        }
        events
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn cue(&mut self, events: &[Event]) {
        for event in events {
            if let Event::PhaseStarted { phase, .. } = event {
                self.audio.phase_cue(*phase);
            }
        }
    }

    fn exercise_event(&self, outcome: &ExerciseOutcome) -> Event {
        Event::ExerciseRecorded {
            date: outcome.date,
            duration: outcome.duration,
            weekly_count: outcome.weekly_count,
            message: outcome.message(),
            at: self.clock.now(),
        }
    }

    fn progress_event(&self) -> Event {
        let summary = self.summary();
        Event::ProgressUpdated {
            streak: summary.streak,
            tier: summary.tier,
            weekly_exercise_count: summary.weekly_exercise_count,
            label: summary.label,
            at: self.clock.now(),
        }
    }
}

impl<C: Clock + Clone, P: CuePlayer> ContinuationHost for Companion<C, P> {
    fn pending(&self) -> Option<Continuation> {
        self.runner.pending()
    }

    fn fire(&mut self, id: u64) -> Vec<Event> {
        Companion::fire(self, id)
    }

    fn stop(&mut self) -> Vec<Event> {
        self.stop_breathing()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{SilentPlayer, Tone, Utterance, START_CHIME};
    use crate::clock::ManualClock;
    use crate::progress::StreakTier;
    use crate::storage::MemoryStore;
    use chrono::NaiveDate;

    fn companion(clock: &ManualClock) -> Companion<ManualClock, SilentPlayer> {
        Companion::from_config(
            Rc::new(MemoryStore::new()),
            &Config::default(),
            clock.clone(),
            SilentPlayer,
        )
        .unwrap()
    }

    #[derive(Default)]
    struct RecordingPlayer {
        tones: Vec<Tone>,
        spoken: Vec<String>,
    }

    impl CuePlayer for RecordingPlayer {
        type Error = std::convert::Infallible;

        fn play_tone(&mut self, tone: &Tone) -> Result<(), Self::Error> {
            self.tones.push(*tone);
            Ok(())
        }

        fn speak(&mut self, utterance: &Utterance) -> Result<(), Self::Error> {
            self.spoken.push(utterance.text.clone());
            Ok(())
        }
    }

    fn recording_companion(clock: &ManualClock) -> Companion<ManualClock, RecordingPlayer> {
        Companion::from_config(
            Rc::new(MemoryStore::new()),
            &Config::default(),
            clock.clone(),
            RecordingPlayer::default(),
        )
        .unwrap()
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    const DAY_MS: u64 = 24 * 60 * 60 * 1000;

    #[test]
    fn select_mood_checks_in_and_reports_progress() {
        let clock = ManualClock::at_day(day(2024, 1, 1));
        let mut c = companion(&clock);
        let selection = c.select_mood(Mood::Happy);

        assert!(selection.feedback.starts_with("Happy — That's wonderful"));
        assert!(matches!(
            selection.outcome,
            CheckInOutcome::Recorded { streak: 1, .. }
        ));
        assert!(matches!(selection.events[0], Event::MoodChanged { .. }));
        assert!(matches!(selection.events[1], Event::CheckInRecorded { .. }));
        assert!(matches!(
            selection.events[2],
            Event::ProgressUpdated {
                streak: 1,
                tier: StreakTier::Low,
                ..
            }
        ));
        assert_eq!(c.current_mood(), Some(&Mood::Happy));
    }

    #[test]
    fn second_selection_same_day_changes_mood_but_not_progress() {
        let clock = ManualClock::at_day(day(2024, 1, 1));
        let mut c = companion(&clock);
        c.select_mood(Mood::Happy);
        clock.advance_ms(60 * 60 * 1000);
        let selection = c.select_mood(Mood::Anxious);

        assert!(matches!(
            selection.outcome,
            CheckInOutcome::AlreadyCheckedIn { .. }
        ));
        assert!(matches!(selection.events[1], Event::CheckInRejected { .. }));
        assert_eq!(selection.events.len(), 2);
        assert_eq!(c.current_mood(), Some(&Mood::Anxious));
        assert_eq!(c.progress().check_ins().len(), 1);
    }

    #[test]
    fn streak_grows_across_days() {
        let clock = ManualClock::at_day(day(2024, 1, 1));
        let mut c = companion(&clock);
        for _ in 0..3 {
            c.select_mood(Mood::Calm);
            clock.advance_ms(DAY_MS);
        }
        assert_eq!(c.progress().calculate_streak(), 3);
    }

    #[test]
    fn breathing_stopped_early_records_nothing() {
        let clock = ManualClock::at_day(day(2024, 1, 1));
        let mut c = companion(&clock);
        c.start_breathing();
        let events = c.stop_breathing();
        assert_eq!(events.len(), 1);
        assert!(c.progress().exercises().is_empty());
    }

    #[test]
    fn breathing_past_first_phase_records_one_exercise() {
        let clock = ManualClock::at_day(day(2024, 1, 1));
        let mut c = companion(&clock);
        c.start_breathing();
        while c.runner().completed_phases() == 0 {
            let next = c.pending().unwrap();
            clock.advance_ms(next.delay_ms);
            c.fire(next.id);
        }
        let events = c.stop_breathing();

        assert_eq!(c.progress().exercises().len(), 1);
        assert!(matches!(
            events[1],
            Event::ExerciseRecorded { weekly_count: 1, .. }
        ));
        assert!(matches!(events[2], Event::ProgressUpdated { .. }));

        // A second stop (e.g. teardown after a manual stop) adds nothing.
        assert!(c.stop_breathing().is_empty());
        assert_eq!(c.progress().exercises().len(), 1);
    }

    #[test]
    fn record_exercise_reports_weekly_count() {
        let clock = ManualClock::at_day(day(2024, 1, 1));
        let mut c = companion(&clock);
        c.record_exercise(1).unwrap();
        let events = c.record_exercise(1).unwrap();
        match &events[0] {
            Event::ExerciseRecorded { message, .. } => {
                assert!(message.contains("2 exercises this week"));
            }
            other => panic!("Expected ExerciseRecorded, got {other:?}"),
        }
        assert!(c.record_exercise(0).is_err());
    }

    #[test]
    fn start_breathing_chimes_once_and_cues_phases() {
        let clock = ManualClock::at_day(day(2024, 1, 1));
        let mut c = recording_companion(&clock);

        c.start_breathing();
        assert_eq!(c.audio().player().tones, vec![START_CHIME]);
        assert_eq!(c.audio().player().spoken, vec!["Inhale"]);

        // Already running: no second chime, no repeated cue.
        assert!(c.start_breathing().is_empty());
        assert_eq!(c.audio().player().tones.len(), 1);
        assert_eq!(c.audio().player().spoken.len(), 1);

        // Run through Hold into Exhale.
        while c.runner().completed_phases() < 2 {
            let next = c.pending().unwrap();
            clock.advance_ms(next.delay_ms);
            c.fire(next.id);
        }
        let gap = c.pending().unwrap();
        clock.advance_ms(gap.delay_ms);
        c.fire(gap.id);

        assert_eq!(c.audio().player().spoken, vec!["Inhale", "Exhale"]);
        assert_eq!(c.audio().player().tones.len(), 1);
    }

    #[test]
    fn muted_companion_plays_nothing() {
        let clock = ManualClock::at_day(day(2024, 1, 1));
        let mut c = recording_companion(&clock);
        c.toggle_sound();
        c.start_breathing();
        assert!(c.audio().player().tones.is_empty());
        assert!(c.audio().player().spoken.is_empty());
    }

    #[test]
    fn sanitized_config_with_zero_phase_still_builds() {
        let parsed: Config = toml::from_str("[breathing]\nhold_secs = 0\n").unwrap();
        assert!(Companion::from_config(
            Rc::new(MemoryStore::new()),
            &parsed,
            ManualClock::new(0),
            SilentPlayer,
        )
        .is_err());

        let mut c = Companion::from_config(
            Rc::new(MemoryStore::new()),
            &parsed.sanitized(),
            ManualClock::at_day(day(2024, 1, 1)),
            SilentPlayer,
        )
        .unwrap();
        assert!(matches!(
            c.select_mood(Mood::Calm).outcome,
            CheckInOutcome::Recorded { streak: 1, .. }
        ));
    }

    #[test]
    fn zero_poll_interval_is_rejected() {
        let mut config = Config::default();
        config.breathing.poll_interval_ms = 0;
        let result = Companion::from_config(
            Rc::new(MemoryStore::new()),
            &config,
            ManualClock::new(0),
            SilentPlayer,
        );
        assert!(matches!(result, Err(ValidationError::ZeroPollInterval)));
    }

    #[test]
    fn toggling_sound_reports_new_state() {
        let clock = ManualClock::new(0);
        let mut c = companion(&clock);
        assert!(c.audio().sound_enabled());
        assert!(matches!(
            c.toggle_sound(),
            Event::SoundToggled { enabled: false, .. }
        ));
    }
}
