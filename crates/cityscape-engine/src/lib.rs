//! Cityscape engine crate.
//!
//! This crate owns the platform + GPU runtime pieces used by the viewer:
//! window/event loop, input translation, device/surface management, 3D math,
//! the orbit camera, scene-file loading, the layer collection, and the layer
//! renderer.

pub mod camera;
pub mod core;
pub mod device;
pub mod input;
pub mod layers;
pub mod logging;
pub mod math;
pub mod render;
pub mod scene;
pub mod time;
pub mod window;
