//! Shared utilities: color conversion and frame timing.

pub mod color;
pub mod frame_timing;
