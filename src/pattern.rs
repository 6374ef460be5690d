// Open-loop weave test pattern
//
// Oscillates the turn channel with a sine wave while holding forward speed
// at zero, so the chassis wags in place. This is a bring-up pattern for
// checking the drive chain end to end, not a navigation behavior.

use crate::messages::ChassisCommand;

/// Sine-wave turn generator. The phase accumulator grows by a fixed step
/// each cycle and is never wrapped; only `sin` of it is ever taken.
#[derive(Debug, Clone)]
pub struct SineWeave {
    phase: f64,
    step: f64,
    amplitude: i16,
}

impl SineWeave {
    pub fn new(step: f64, amplitude: i16) -> Self {
        Self {
            phase: 0.0,
            step,
            amplitude,
        }
    }

    /// Current phase accumulator value
    pub fn phase(&self) -> f64 {
        self.phase
    }

    /// Cycles per full turn oscillation at the configured step
    pub fn period_cycles(&self) -> f64 {
        std::f64::consts::TAU / self.step
    }

    /// Advance one cycle and sample the pattern. The phase is stepped
    /// before sampling, so the first command carries `sin(step)`.
    pub fn next_command(&mut self) -> ChassisCommand {
        self.phase += self.step;

        let amp = self.amplitude as f64;
        let turn = (self.phase.sin() * amp).round() as i16;

        ChassisCommand {
            turn: turn.clamp(-self.amplitude, self.amplitude),
            forward: 0,
        }
    }
}

impl Default for SineWeave {
    fn default() -> Self {
        Self::new(crate::config::WEAVE_PHASE_STEP, crate::config::WEAVE_AMPLITUDE)
    }
}
