//! GPU side of the viewer.
//!
//! - `context` owns instance/device/surface wiring and MSAA selection.
//! - `pipeline` compiles the earth map GLSL into an alpha-blended pipeline.
//! - `textures` uploads the earth texture with the material's sampler.
//! - `mesh` mirrors the plane geometry into vertex/index buffers and rebuilds
//!   them when the geometry generation changes.
//! - `uniforms` is the std140 copy of the fade parameters and matrices.
//! - `state` glues these together behind `GpuState::render`.

mod context;
mod mesh;
mod pipeline;
mod state;
mod textures;
mod uniforms;

pub(crate) use state::GpuState;
