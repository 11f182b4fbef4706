//! Fixed-rate logic tick driven by variable frame deltas

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Converts real frame time into whole simulation ticks
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FixedStep {
    accumulator: f32,
    step: f32,
    max_substeps: u32,
}

impl Default for FixedStep {
    fn default() -> Self {
        Self::new(SIM_DT, MAX_SUBSTEPS)
    }
}

impl FixedStep {
    /// A step that is not a positive number falls back to `SIM_DT`
    pub fn new(step: f32, max_substeps: u32) -> Self {
        let step = if step.is_finite() && step > 0.0 {
            step
        } else {
            log::warn!("Invalid tick step {}, using {}", step, SIM_DT);
            SIM_DT
        };
        Self {
            accumulator: 0.0,
            step,
            max_substeps,
        }
    }

    /// Feed a frame delta (seconds) and return how many ticks to run.
    ///
    /// Long frames are clamped and the tick count is capped, so a stalled tab
    /// never triggers a burst of catch-up ticks.
    pub fn advance(&mut self, dt: f32) -> u32 {
        self.accumulator += dt.clamp(0.0, MAX_FRAME_DT);

        let mut ticks = 0;
        while self.accumulator >= self.step && ticks < self.max_substeps {
            self.accumulator -= self.step;
            ticks += 1;
        }
        ticks
    }

    /// Fraction of a tick left over, for render interpolation
    pub fn alpha(&self) -> f32 {
        (self.accumulator / self.step).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulates_partial_frames() {
        let mut clock = FixedStep::new(0.25, 8);
        assert_eq!(clock.advance(0.1), 0);
        assert_eq!(clock.advance(0.1), 0);
        assert_eq!(clock.advance(0.1), 1);
        assert!((clock.alpha() - 0.2).abs() < 1e-4);
    }

    #[test]
    fn test_long_frame_is_capped() {
        let mut clock = FixedStep::new(0.01, 4);
        assert_eq!(clock.advance(5.0), 4);
    }

    #[test]
    fn test_non_positive_step_falls_back() {
        for step in [0.0, -0.5, f32::NAN] {
            let mut clock = FixedStep::new(step, 8);
            assert_eq!(clock.advance(SIM_DT * 2.5), 2);
            assert!(clock.alpha().is_finite());
        }
    }

    #[test]
    fn test_negative_delta_ignored() {
        let mut clock = FixedStep::default();
        assert_eq!(clock.advance(-1.0), 0);
        assert_eq!(clock.alpha(), 0.0);
    }
}
