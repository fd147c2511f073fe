//! Audio and speech cues for breathing sessions.
//!
//! The actual sound output lives behind [`CuePlayer`]. [`BreathingAudio`]
//! decides what to play and when, honors the persisted sound flag, and never
//! lets a player failure reach the caller.

use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::breathing::PhaseName;
use crate::storage::{KeyValueStore, SOUND_KEY};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Waveform {
    Sine,
    Square,
    Triangle,
    Sawtooth,
}

/// A tone request: fade in over 50 ms, hold, fade out over the last 100 ms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tone {
    pub frequency_hz: f32,
    pub duration_ms: u32,
    pub waveform: Waveform,
    pub volume: f32,
}

/// A spoken phrase. Starting a new utterance cancels the previous one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Utterance {
    pub text: String,
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
}

/// Output device for tones and speech.
pub trait CuePlayer {
    type Error: std::fmt::Display;

    fn play_tone(&mut self, tone: &Tone) -> Result<(), Self::Error>;
    fn speak(&mut self, utterance: &Utterance) -> Result<(), Self::Error>;
}

/// Chime played when a session starts.
pub const START_CHIME: Tone = Tone {
    frequency_hz: 600.0,
    duration_ms: 150,
    waveform: Waveform::Sine,
    volume: 1.0,
};

/// Spoken cue for a phase; Hold is silent.
pub fn phase_utterance(phase: PhaseName) -> Option<Utterance> {
    let pitch = match phase {
        PhaseName::Inhale => 1.0,
        PhaseName::Exhale => 0.9,
        PhaseName::Hold => return None,
    };
    Some(Utterance {
        text: phase.label().to_string(),
        rate: 0.9,
        pitch,
        volume: 0.8,
    })
}

/// Persisted sound on/off flag.
///
/// Enabled unless the stored value is exactly `"false"`.
pub struct SoundSettings {
    store: Rc<dyn KeyValueStore>,
    enabled: bool,
}

impl SoundSettings {
    pub fn load(store: Rc<dyn KeyValueStore>, default_enabled: bool) -> Self {
        let enabled = match store.get(SOUND_KEY) {
            Ok(Some(value)) => value != "false",
            Ok(None) => default_enabled,
            Err(e) => {
                tracing::warn!("could not read sound flag: {e}");
                default_enabled
            }
        };
        Self { store, enabled }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Flip the flag and persist it. Returns the new value.
    pub fn toggle(&mut self) -> bool {
        self.enabled = !self.enabled;
        let value = if self.enabled { "true" } else { "false" };
        if let Err(e) = self.store.set(SOUND_KEY, value) {
            tracing::warn!("could not persist sound flag: {e}");
        }
        self.enabled
    }
}

pub struct BreathingAudio<P> {
    settings: SoundSettings,
    player: P,
}

impl<P: CuePlayer> BreathingAudio<P> {
    pub fn new(settings: SoundSettings, player: P) -> Self {
        Self { settings, player }
    }

    pub fn sound_enabled(&self) -> bool {
        self.settings.enabled()
    }

    pub fn toggle_sound(&mut self) -> bool {
        self.settings.toggle()
    }

    pub fn player(&self) -> &P {
        &self.player
    }

    pub fn start_chime(&mut self) {
        if !self.settings.enabled() {
            return;
        }
        if let Err(e) = self.player.play_tone(&START_CHIME) {
            tracing::warn!("start chime failed: {e}");
        }
    }

    pub fn phase_cue(&mut self, phase: PhaseName) {
        if !self.settings.enabled() {
            return;
        }
        let Some(utterance) = phase_utterance(phase) else {
            return;
        };
        if let Err(e) = self.player.speak(&utterance) {
            tracing::warn!(phase = %phase, "speech cue failed: {e}");
        }
    }
}

/// Player that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentPlayer;

impl CuePlayer for SilentPlayer {
    type Error = std::convert::Infallible;

    fn play_tone(&mut self, _tone: &Tone) -> Result<(), Self::Error> {
        Ok(())
    }

    fn speak(&mut self, _utterance: &Utterance) -> Result<(), Self::Error> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[derive(Default)]
    struct RecordingPlayer {
        tones: Vec<Tone>,
        spoken: Vec<String>,
        fail: bool,
    }

    impl CuePlayer for RecordingPlayer {
        type Error = String;

        fn play_tone(&mut self, tone: &Tone) -> Result<(), Self::Error> {
            if self.fail {
                return Err("no audio device".into());
            }
            self.tones.push(*tone);
            Ok(())
        }

        fn speak(&mut self, utterance: &Utterance) -> Result<(), Self::Error> {
            if self.fail {
                return Err("speech unavailable".into());
            }
            self.spoken.push(utterance.text.clone());
            Ok(())
        }
    }

    fn audio(entries: &[(&str, &str)]) -> BreathingAudio<RecordingPlayer> {
        let kv = Rc::new(MemoryStore::with_entries(entries.iter().copied()));
        BreathingAudio::new(SoundSettings::load(kv, true), RecordingPlayer::default())
    }

    #[test]
    fn sound_defaults_to_enabled() {
        assert!(audio(&[]).sound_enabled());
        assert!(audio(&[(SOUND_KEY, "true")]).sound_enabled());
        assert!(audio(&[(SOUND_KEY, "garbage")]).sound_enabled());
        assert!(!audio(&[(SOUND_KEY, "false")]).sound_enabled());
    }

    #[test]
    fn toggle_persists_flag() {
        let kv = Rc::new(MemoryStore::new());
        let mut settings = SoundSettings::load(kv.clone(), true);
        assert!(!settings.toggle());
        assert_eq!(kv.get(SOUND_KEY).unwrap().as_deref(), Some("false"));
        assert!(settings.toggle());
        assert_eq!(kv.get(SOUND_KEY).unwrap().as_deref(), Some("true"));
    }

    #[test]
    fn cues_only_inhale_and_exhale() {
        let mut a = audio(&[]);
        a.start_chime();
        a.phase_cue(PhaseName::Inhale);
        a.phase_cue(PhaseName::Hold);
        a.phase_cue(PhaseName::Exhale);
        assert_eq!(a.player().tones, vec![START_CHIME]);
        assert_eq!(a.player().spoken, vec!["Inhale", "Exhale"]);
    }

    #[test]
    fn disabled_sound_is_silent() {
        let mut a = audio(&[(SOUND_KEY, "false")]);
        a.start_chime();
        a.phase_cue(PhaseName::Inhale);
        assert!(a.player().tones.is_empty());
        assert!(a.player().spoken.is_empty());
    }

    #[test]
    fn player_failures_are_swallowed() {
        let kv = Rc::new(MemoryStore::new());
        let mut a = BreathingAudio::new(
            SoundSettings::load(kv, true),
            RecordingPlayer {
                fail: true,
                ..Default::default()
            },
        );
        a.start_chime();
        a.phase_cue(PhaseName::Exhale);
        assert!(a.sound_enabled());
    }

    #[test]
    fn exhale_is_spoken_lower() {
        let inhale = phase_utterance(PhaseName::Inhale).unwrap();
        let exhale = phase_utterance(PhaseName::Exhale).unwrap();
        assert!(exhale.pitch < inhale.pitch);
        assert!(phase_utterance(PhaseName::Hold).is_none());
    }
}
