//! Signal Conditioning
//!
//! Prepares a raw sample frame for spectral analysis: first-order
//! pre-emphasis followed by DC removal, applied in place.

mod conditioner;
mod dc;
mod pre_emphasis;

pub use conditioner::SignalConditioner;
pub use dc::remove_dc;
pub use pre_emphasis::{CarryScope, PreEmphasis, DEFAULT_PRE_EMPHASIS};
