//! wgpu render backend for the projected view.
//!
//! Draw calls are collected on the CPU by [`ShapeBatch`], which implements
//! the renderer-agnostic `DrawSurface`. [`ShapeRenderer`] then draws one
//! presented batch as instanced screen-space quads.
//!
//! # Invariants
//! - Renderer never mutates world state.
//! - Instances are drawn in submission order with alpha blending and no
//!   depth buffer, so painter's order from the caller is preserved.
//! - A frame that overflows the GPU instance buffer is rejected whole.

mod batch;
mod gpu;
mod shaders;

pub use batch::{ShapeBatch, ShapeInstance, ShapeKind};
pub use gpu::ShapeRenderer;
