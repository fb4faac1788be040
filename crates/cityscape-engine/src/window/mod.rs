//! Window runtime.
//!
//! Owns the winit event loop, window/GPU pairing, and the translation from
//! platform events into the engine's platform-agnostic input types.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig, RuntimeCtx};
