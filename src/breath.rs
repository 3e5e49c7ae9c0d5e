use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const INHALE_MS: u64 = 4000;
pub const HOLD_MS: u64 = 2000;
pub const EXHALE_MS: u64 = 4000;

/// One step of the guided breathing rhythm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum_macros::Display)]
pub enum BreathPhase {
    Inhale,
    Hold,
    Exhale,
}

impl BreathPhase {
    pub fn dwell_ms(self) -> u64 {
        match self {
            BreathPhase::Inhale => INHALE_MS,
            BreathPhase::Hold => HOLD_MS,
            BreathPhase::Exhale => EXHALE_MS,
        }
    }

    pub fn dwell(self) -> Duration {
        Duration::from_millis(self.dwell_ms())
    }

    /// Next phase, and whether leaving this phase completes a breath cycle
    pub fn advance(self) -> (BreathPhase, bool) {
        match self {
            BreathPhase::Inhale => (BreathPhase::Hold, false),
            BreathPhase::Hold => (BreathPhase::Exhale, false),
            BreathPhase::Exhale => (BreathPhase::Inhale, true),
        }
    }

    /// Short prompt shown inside the breathing circle
    pub fn instruction(self) -> &'static str {
        match self {
            BreathPhase::Inhale => "breathe in...",
            BreathPhase::Hold => "hold...",
            BreathPhase::Exhale => "breathe out...",
        }
    }
}

/// Pure phase mapping: `(next_phase, cycle_completed)`
pub fn advance(current: BreathPhase) -> (BreathPhase, bool) {
    current.advance()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BreathStep {
    pub phase: BreathPhase,
    pub cycle_completed: bool,
}

/// Current phase plus the number of completed cycles.
///
/// Carries no timing of its own; the owning session decides when to call
/// [`BreathCycle::advance`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreathCycle {
    phase: BreathPhase,
    breath_count: u32,
}

impl Default for BreathCycle {
    fn default() -> Self {
        Self::new()
    }
}

impl BreathCycle {
    pub fn new() -> Self {
        Self {
            phase: BreathPhase::Inhale,
            breath_count: 0,
        }
    }

    pub fn phase(&self) -> BreathPhase {
        self.phase
    }

    pub fn breath_count(&self) -> u32 {
        self.breath_count
    }

    pub fn advance(&mut self) -> BreathStep {
        let (phase, cycle_completed) = self.phase.advance();
        self.phase = phase;
        if cycle_completed {
            self.breath_count += 1;
        }
        BreathStep {
            phase,
            cycle_completed,
        }
    }
}
