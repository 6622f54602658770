//! GPU resource management utilities.
//!
//! Provides wgpu device/surface initialization, render-target caching,
//! structured storage buffers, texture blits, HDRI loading, and shader
//! composition.

/// Full-screen texture copies with a per-format pipeline cache.
pub mod blit;
/// HDR/EXR/LDR environment image loading and the fallback texture.
pub mod hdri;
/// Shared wgpu boilerplate for compute kernels and screen-space pipelines.
pub mod pipeline_helpers;
/// wgpu device, surface, and queue initialization.
pub mod render_context;
/// WGSL shader composition with `#import` support via naga-oil.
pub mod shader_composer;
/// Exact-size read-only storage buffers of `Pod` records.
pub mod structured_buffer;
/// Render-target textures and the size-keyed target cache.
pub mod texture;
