//! Small linear-algebra toolkit.
//!
//! Conventions:
//! - `f32` everywhere
//! - matrices are column-major and multiply column vectors (`M * v`)
//! - right-handed, +Z towards the viewer; rotations are counter-clockwise

mod mat4;
mod vec;

pub use mat4::{Mat4, OrthoAxis, OrthoError};
pub use vec::{Vec2, Vec3, Vec4};
