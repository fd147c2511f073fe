use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhaseName {
    Inhale,
    Hold,
    Exhale,
}

impl PhaseName {
    pub fn label(&self) -> &'static str {
        match self {
            PhaseName::Inhale => "Inhale",
            PhaseName::Hold => "Hold",
            PhaseName::Exhale => "Exhale",
        }
    }
}

impl std::fmt::Display for PhaseName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phase {
    pub name: PhaseName,
    pub duration_secs: u64,
}

impl Phase {
    pub fn new(name: PhaseName, duration_secs: u64) -> Self {
        Self {
            name,
            duration_secs,
        }
    }

    /// Get phase duration in milliseconds.
    ///
    /// Uses saturating arithmetic to prevent overflow with large values.
    pub fn duration_ms(&self) -> u64 {
        self.duration_secs.saturating_mul(1000)
    }
}

/// Ordered, cyclic sequence of breathing phases.
///
/// Read-only once built; the runner wraps back to the first phase after the
/// last one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BreathingCycle {
    phases: Vec<Phase>,
}

impl BreathingCycle {
    /// # Errors
    /// Returns an error if `phases` is empty or any phase lasts zero seconds.
    pub fn new(phases: Vec<Phase>) -> Result<Self, ValidationError> {
        if phases.is_empty() {
            return Err(ValidationError::EmptyCycle);
        }
        if let Some(phase) = phases.iter().find(|p| p.duration_secs == 0) {
            return Err(ValidationError::ZeroDuration {
                phase: phase.name.to_string(),
            });
        }
        Ok(Self { phases })
    }

    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }

    pub fn len(&self) -> usize {
        self.phases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Phase> {
        self.phases.get(index)
    }

    /// Index of the phase after `index`, wrapping to 0.
    pub fn next_index(&self, index: usize) -> usize {
        (index + 1) % self.phases.len()
    }

    pub fn total_duration_secs(&self) -> u64 {
        self.phases.iter().map(|p| p.duration_secs).sum()
    }
}

impl Default for BreathingCycle {
    /// Inhale 4s, hold 4s, exhale 6s.
    fn default() -> Self {
        Self {
            phases: vec![
                Phase::new(PhaseName::Inhale, 4),
                Phase::new(PhaseName::Hold, 4),
                Phase::new(PhaseName::Exhale, 6),
            ],
        }
    }
}
