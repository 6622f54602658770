// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Function signature hygiene
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![warn(unused_results)]
#![warn(unused_qualifications)]
// Cast hygiene
#![warn(trivial_casts)]
#![warn(trivial_numeric_casts)]
// Tests are allowed to unwrap and panic on failure.
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

//! Compute-shader ray tracer and HDRI sun-alignment post-process on wgpu.
//!
//! Solstice renders a procedurally generated field of spheres resting on a
//! ground plane, lit by a directional sun and an equirectangular skybox, in a
//! single compute dispatch per frame. A second component adjusts an HDRI
//! (grayscale, Gaussian blur, exposure) with three compute kernels so the
//! sun's position can be read off the environment.
//!
//! # Key entry points
//!
//! - [`engine::RenderEngine`] - owns the GPU context and both components
//! - [`renderer::ray_tracer::RayTracingController`] - per-frame ray tracing
//!   and scene lifecycle
//! - [`renderer::sun_aligner::HdriSunAligner`] - the three-kernel HDRI pass
//! - [`scene::generator::SceneGenerator`] - sphere placement with overlap
//!   rejection
//! - [`options::Options`] - runtime configuration with TOML presets
//!
//! # Architecture
//!
//! Everything runs on the render call: parameter uploads, buffer allocation
//! and dispatches are recorded into one command encoder and submitted. GPU
//! resources are owned by the component that created them and released by
//! dropping them.

pub mod camera;
pub mod engine;
pub mod error;
pub mod gpu;
pub mod input;
pub mod options;
pub mod renderer;
pub mod scene;
pub mod util;
#[cfg(feature = "viewer")]
pub mod viewer;

pub use engine::{RenderEngine, ViewMode};
pub use error::SolsticeError;
pub use input::{InputEvent, KeyAction, MouseButton};
pub use options::Options;
#[cfg(feature = "viewer")]
pub use viewer::Viewer;
