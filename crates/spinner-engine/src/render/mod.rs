//! GPU rendering subsystem.
//!
//! Renderers own their GPU resources (pipelines, buffers) and record into a
//! `RenderTarget` that the frame context has already cleared.
//!
//! Convention: vertex positions are given in a view space spanning
//! `[-aspect, aspect] x [-1, 1]`; the MVP uniform maps it to clip space.

mod ctx;
pub mod triangle;

pub use ctx::{RenderCtx, RenderTarget};
pub use triangle::{TriangleRenderer, Vertex};
