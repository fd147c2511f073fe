//! Current-mood store.
//!
//! Keeps the most recently selected mood, persists it under
//! [`CURRENT_MOOD_KEY`], and reports changes as [`Event::MoodChanged`] so the
//! host can restyle itself. The mood plays no part in streak logic.

use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::events::Event;
use crate::storage::{KeyValueStore, CURRENT_MOOD_KEY};

/// A mood as the user selected it.
///
/// Anything outside the four known moods is kept verbatim as `Other`; such
/// values persist and round-trip but carry no styling class.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Mood {
    Happy,
    Calm,
    Stressed,
    Anxious,
    Other(String),
}

impl Mood {
    pub fn as_str(&self) -> &str {
        match self {
            Mood::Happy => "Happy",
            Mood::Calm => "Calm",
            Mood::Stressed => "Stressed",
            Mood::Anxious => "Anxious",
            Mood::Other(s) => s,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Mood::Other(_))
    }

    /// Styling class applied while this mood is current.
    pub fn style_class(&self) -> Option<&'static str> {
        match self {
            Mood::Happy => Some("mood-happy"),
            Mood::Calm => Some("mood-calm"),
            Mood::Stressed => Some("mood-stressed"),
            Mood::Anxious => Some("mood-anxious"),
            Mood::Other(_) => None,
        }
    }

    /// Accent color associated with the mood.
    pub fn color(&self) -> Option<&'static str> {
        match self {
            Mood::Happy => Some("#FFD700"),
            Mood::Calm => Some("#87CEEB"),
            Mood::Stressed => Some("#D3D3D3"),
            Mood::Anxious => Some("#B0C4DE"),
            Mood::Other(_) => None,
        }
    }

    /// Supportive line shown right after the mood is picked.
    pub fn feedback(&self) -> &'static str {
        match self {
            Mood::Happy => "That's wonderful — keep noticing what helps you feel good.",
            Mood::Calm => "Great — staying grounded is powerful. Keep it up.",
            Mood::Stressed => "Sorry you're feeling stressed — try a short breathing exercise.",
            Mood::Anxious => {
                "It's okay to feel anxious. Small steps can help — try the breathing tool."
            }
            Mood::Other(_) => "Thanks for checking in.",
        }
    }
}

impl From<String> for Mood {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Happy" => Mood::Happy,
            "Calm" => Mood::Calm,
            "Stressed" => Mood::Stressed,
            "Anxious" => Mood::Anxious,
            _ => Mood::Other(s),
        }
    }
}

impl From<&str> for Mood {
    fn from(s: &str) -> Self {
        Mood::from(s.to_string())
    }
}

impl From<Mood> for String {
    fn from(mood: Mood) -> Self {
        match mood {
            Mood::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for Mood {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub struct MoodStore {
    store: Rc<dyn KeyValueStore>,
    current: Option<Mood>,
}

impl MoodStore {
    /// Restore the persisted mood, if any.
    pub fn load(store: Rc<dyn KeyValueStore>) -> Self {
        let current = match store.get(CURRENT_MOOD_KEY) {
            Ok(value) => value.filter(|s| !s.is_empty()).map(Mood::from),
            Err(e) => {
                tracing::warn!("could not read current mood: {e}");
                None
            }
        };
        Self { store, current }
    }

    pub fn current_mood(&self) -> Option<&Mood> {
        self.current.as_ref()
    }

    /// Make `mood` current and persist it.
    ///
    /// A failed write is logged; the in-memory mood still changes.
    pub fn set_mood(&mut self, mood: Mood, clock: &impl Clock) -> Event {
        if let Err(e) = self.store.set(CURRENT_MOOD_KEY, mood.as_str()) {
            tracing::warn!("could not persist current mood: {e}");
        }
        tracing::debug!(mood = %mood, "mood changed");
        let style_class = mood.style_class().map(str::to_string);
        self.current = Some(mood.clone());
        Event::MoodChanged {
            mood,
            style_class,
            at: clock.now(),
        }
    }
}
