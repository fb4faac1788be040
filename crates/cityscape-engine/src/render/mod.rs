//! GPU rendering subsystem.
//!
//! The [`LayerRenderer`] consumes the CPU-side layer collection and issues
//! GPU commands via wgpu. It owns all GPU resources (pipelines, mesh
//! buffers, uniform buffers) and mirrors the collection by revision, so
//! adding or removing a layer never touches the GPU outside a frame.
//!
//! Convention:
//! - geometry is in world units, +Y up
//! - matrices are uploaded column-major and applied as
//!   `projection * view * model` in the vertex stage

mod ctx;
mod layers;

pub use ctx::{RenderCtx, RenderTarget};
pub use layers::{CLEAR_COLOR, LayerRenderer};
