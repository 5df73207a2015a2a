//! First-Order Pre-Emphasis Filter

use serde::{Deserialize, Serialize};

/// Default pre-emphasis coefficient
pub const DEFAULT_PRE_EMPHASIS: f64 = 0.97;

/// Lifetime of the previous-sample carry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CarryScope {
    /// Carry persists across frames for the whole acquisition session
    #[default]
    Session,
    /// Carry is cleared at the start of every frame
    Frame,
}

/// `y[i] = x[i] - alpha * x[i-1]`, with `x[-1]` taken from the carry
pub struct PreEmphasis {
    alpha: f64,
    scope: CarryScope,
    /// Previous raw sample
    prev: f64,
}

impl PreEmphasis {
    /// Create a new filter with coefficient `alpha` in (0, 1)
    pub fn new(alpha: f64, scope: CarryScope) -> Self {
        assert!(alpha > 0.0 && alpha < 1.0, "Pre-emphasis coefficient must be in (0, 1)");
        Self {
            alpha,
            scope,
            prev: 0.0,
        }
    }

    /// Filter a frame in place
    pub fn apply(&mut self, frame: &mut [f64]) {
        if self.scope == CarryScope::Frame {
            self.prev = 0.0;
        }

        for sample in frame.iter_mut() {
            let current = *sample;
            *sample = current - self.alpha * self.prev;
            self.prev = current;
        }
    }

    /// Clear the carried sample
    pub fn reset(&mut self) {
        self.prev = 0.0;
    }

    /// Raw sample that will precede the next frame
    pub fn carry(&self) -> f64 {
        self.prev
    }
}
