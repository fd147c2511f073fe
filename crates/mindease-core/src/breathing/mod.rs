mod cycle;
mod driver;
mod runner;

pub use cycle::{BreathingCycle, Phase, PhaseName};
pub use driver::drive;
pub use runner::{
    ring_scale, BreathingRunner, Continuation, ContinuationHost, ContinuationKind, RunnerState,
    RunnerTiming, MAX_SCALE, MIN_SCALE, REMAINING_PLACEHOLDER,
};
