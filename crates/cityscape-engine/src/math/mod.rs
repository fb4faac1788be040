//! 3D math shared across the camera and renderers.
//!
//! Canonical GPU space:
//! - Right-handed world, +Y up
//! - Column-major matrices acting on column vectors
//! - wgpu NDC (depth 0..1)
//!
//! All constructors are pure; composition is plain matrix multiplication.

mod mat4;
mod vec3;

pub use mat4::Mat4;
pub use vec3::Vec3;
