//! The procedurally generated sphere field the ray tracer renders.
//!
//! A [`Scene`] is a fixed-size list of [`SphereSlot`]s, one per requested
//! sphere. Slots whose candidate overlapped an earlier sphere stay
//! [`SphereSlot::Empty`] and upload as an all-zero record, so the GPU buffer
//! always holds exactly `max_spheres` entries.

pub mod generator;
pub mod sphere;

pub use generator::{GeneratorParams, ScenePlacer, SceneGenerator};
pub use sphere::{GpuSphere, Material, Scene, SceneSummary, Sphere, SphereSlot};
