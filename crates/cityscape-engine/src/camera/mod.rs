//! Orbit camera.
//!
//! All camera state lives in [`OrbitCamera`]; nothing here touches globals.
//! The controller accumulates pointer deltas into clamped yaw/pitch values
//! and derives the model/view/projection matrices once per frame via
//! [`OrbitCamera::frame_matrices`]. Renderers share the resulting
//! [`FrameMatrices`] instead of recomputing per layer.

mod orbit;

pub use orbit::{FrameMatrices, OrbitCamera, Projection};
