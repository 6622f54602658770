//! Orbit camera producing the matrices the ray tracer consumes.

/// Orbit controller: rotate, pan, zoom, reset.
pub mod controller;
/// Core camera struct and matrix helpers.
pub mod core;
