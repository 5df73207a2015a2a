//! Frame Conditioning Stage

use crate::dc::remove_dc;
use crate::pre_emphasis::{CarryScope, PreEmphasis};
use tracing::{debug, trace};

/// Applies pre-emphasis then DC removal to each acquired frame
pub struct SignalConditioner {
    pre_emphasis: PreEmphasis,
}

impl SignalConditioner {
    /// Create a new conditioner
    pub fn new(alpha: f64, scope: CarryScope) -> Self {
        debug!("Signal conditioner: alpha={}, carry={:?}", alpha, scope);
        Self {
            pre_emphasis: PreEmphasis::new(alpha, scope),
        }
    }

    /// Condition a frame in place
    pub fn condition(&mut self, frame: &mut [f64]) {
        self.pre_emphasis.apply(frame);
        let offset = remove_dc(frame);
        trace!("Removed DC offset {:.3}", offset);
    }

    /// Clear the pre-emphasis carry (e.g. after a gap in acquisition)
    pub fn reset(&mut self) {
        self.pre_emphasis.reset();
    }

    /// Access the pre-emphasis stage
    pub fn pre_emphasis(&self) -> &PreEmphasis {
        &self.pre_emphasis
    }
}
