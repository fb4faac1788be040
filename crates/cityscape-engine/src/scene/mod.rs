//! Scene-file loading.
//!
//! A scene is a JSON object with up to four recognized top-level keys:
//! `buildings`, `water`, `parks`, `surface`. Unknown keys are ignored.
//! Decoding and validation are all-or-nothing: a malformed document or an
//! out-of-range index rejects the whole load, so callers never observe a
//! partially applied layer set.

mod file;

pub use file::{FlatGeometry, LitGeometry, SceneFile, load_scene_file};
