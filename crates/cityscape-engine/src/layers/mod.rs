//! Named drawable layers.
//!
//! A [`Layer`] is a CPU-side description: geometry, color, and a shading
//! kind. GPU buffers are owned by the renderer, which mirrors this
//! collection by revision (see `render::LayerRenderer`); removing a layer
//! here releases its GPU resources on the next frame.

mod collection;

pub use collection::{Layer, LayerKind, Layers};
