use crate::math::{Mat4, Vec3};

/// Projection mode for the scene camera.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum Projection {
    #[default]
    Perspective,
    Orthographic,
}

impl Projection {
    /// Returns the other mode; used by toggle-style controls.
    #[inline]
    pub fn toggled(self) -> Projection {
        match self {
            Projection::Perspective => Projection::Orthographic,
            Projection::Orthographic => Projection::Perspective,
        }
    }
}

/// Matrices for one frame, computed once and shared by all layers.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameMatrices {
    pub model: Mat4,
    pub view: Mat4,
    pub projection: Mat4,
}

/// Vertical field of view for the perspective projection, in degrees.
const FOV_Y_DEG: f32 = 45.0;

/// Near/far clip distances shared by both projection modes.
const NEAR: f32 = 0.1;
const FAR: f32 = 1000.0;

/// Half-extent of the orthographic view box.
const ORTHO_EXTENT: f32 = 1.0;

/// Yaw accumulator range, degrees.
const YAW_RANGE: (f32, f32) = (0.0, 360.0);

/// Pitch accumulator range, degrees. The lower bound keeps the eye strictly
/// above the ground plane.
const PITCH_RANGE: (f32, f32) = (1.0, 100.0);

/// Orbit camera state and controls.
///
/// Two independent drivers feed it:
/// - absolute controls ([`set_rotate_deg`](Self::set_rotate_deg),
///   [`set_zoom`](Self::set_zoom), [`set_projection`](Self::set_projection))
///   overwrite their value directly;
/// - pointer drags accumulate relative deltas into yaw/pitch, re-clamped
///   after every update. The accumulators have no decay: they encode an
///   absolute orientation as a running total.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitCamera {
    rotate_deg: f32,
    zoom: f32,
    projection: Projection,
    yaw_deg: f32,
    pitch_deg: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            rotate_deg: 0.0,
            zoom: 100.0,
            projection: Projection::default(),
            yaw_deg: YAW_RANGE.0,
            pitch_deg: PITCH_RANGE.0,
        }
    }
}

impl OrbitCamera {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the absolute scene rotation in degrees.
    pub fn set_rotate_deg(&mut self, deg: f32) {
        self.rotate_deg = deg;
    }

    #[inline]
    pub fn rotate_deg(&self) -> f32 {
        self.rotate_deg
    }

    /// Adjusts the scene rotation by a relative amount (keyboard control).
    pub fn rotate_by(&mut self, deg: f32) {
        self.rotate_deg += deg;
    }

    /// Sets the orbit distance. Clamped to a small positive minimum so the
    /// eye never collapses onto the pivot.
    pub fn set_zoom(&mut self, zoom: f32) {
        self.zoom = zoom.max(NEAR);
    }

    #[inline]
    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Adjusts the orbit distance by a relative amount (wheel/keyboard).
    pub fn zoom_by(&mut self, delta: f32) {
        self.set_zoom(self.zoom + delta);
    }

    pub fn set_projection(&mut self, projection: Projection) {
        self.projection = projection;
    }

    #[inline]
    pub fn projection(&self) -> Projection {
        self.projection
    }

    pub fn toggle_projection(&mut self) {
        self.projection = self.projection.toggled();
    }

    /// Accumulates a pointer drag into the yaw/pitch totals.
    ///
    /// Both accumulators are re-clamped after every update, so arbitrarily
    /// large or negative deltas cannot push them out of range.
    pub fn apply_pointer_delta(&mut self, dx: f32, dy: f32) {
        self.yaw_deg = (self.yaw_deg + dx).clamp(YAW_RANGE.0, YAW_RANGE.1);
        self.pitch_deg = (self.pitch_deg + dy).clamp(PITCH_RANGE.0, PITCH_RANGE.1);
    }

    #[inline]
    pub fn yaw_deg(&self) -> f32 {
        self.yaw_deg
    }

    #[inline]
    pub fn pitch_deg(&self) -> f32 {
        self.pitch_deg
    }

    /// Position of the eye on the orbit sphere around `pivot`.
    pub fn eye(&self, pivot: Vec3) -> Vec3 {
        let yaw = self.yaw_deg.to_radians();
        let pitch = self.pitch_deg.to_radians();
        pivot
            + Vec3::new(
                yaw.sin() * pitch.cos(),
                pitch.sin(),
                yaw.cos() * pitch.cos(),
            ) * self.zoom
    }

    /// Computes the shared matrices for one frame.
    ///
    /// - model: rotation by `rotate_deg` about `pivot` (the scene centroid)
    /// - view: look-at from the orbit eye toward `pivot`, +Y up
    /// - projection: selected by the current [`Projection`] mode
    pub fn frame_matrices(&self, pivot: Vec3, aspect: f32) -> FrameMatrices {
        let model = Mat4::translation(pivot.x, pivot.y, pivot.z)
            * Mat4::rotation_y(self.rotate_deg.to_radians())
            * Mat4::translation(-pivot.x, -pivot.y, -pivot.z);

        let view = Mat4::look_at(self.eye(pivot), pivot, Vec3::new(0.0, 1.0, 0.0));

        let projection = match self.projection {
            Projection::Perspective => {
                Mat4::perspective(FOV_Y_DEG.to_radians(), aspect, NEAR, FAR)
            }
            Projection::Orthographic => Mat4::orthographic(
                -ORTHO_EXTENT,
                ORTHO_EXTENT,
                -ORTHO_EXTENT,
                ORTHO_EXTENT,
                NEAR,
                FAR,
            ),
        };

        FrameMatrices {
            model,
            view,
            projection,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yaw_stays_in_range_under_adversarial_deltas() {
        let mut cam = OrbitCamera::new();
        for dx in [1e9, -1e9, 359.0, -720.0, f32::MAX, -f32::MAX, 0.5] {
            cam.apply_pointer_delta(dx, 0.0);
            assert!((0.0..=360.0).contains(&cam.yaw_deg()), "yaw = {}", cam.yaw_deg());
        }
    }

    #[test]
    fn pitch_stays_in_range_under_adversarial_deltas() {
        let mut cam = OrbitCamera::new();
        for dy in [-1e9, 1e9, 99.0, -200.0, f32::MAX, -f32::MAX, 0.25] {
            cam.apply_pointer_delta(0.0, dy);
            assert!((1.0..=100.0).contains(&cam.pitch_deg()), "pitch = {}", cam.pitch_deg());
        }
    }

    #[test]
    fn accumulators_have_no_decay() {
        let mut cam = OrbitCamera::new();
        cam.apply_pointer_delta(10.0, 5.0);
        cam.apply_pointer_delta(10.0, 5.0);
        assert_eq!(cam.yaw_deg(), 20.0);
        assert_eq!(cam.pitch_deg(), 11.0);
    }

    #[test]
    fn projection_switch_changes_only_the_projection_matrix() {
        let mut cam = OrbitCamera::new();
        cam.set_rotate_deg(33.0);
        cam.set_zoom(42.0);
        cam.apply_pointer_delta(120.0, 30.0);

        let pivot = Vec3::new(1.0, 2.0, 3.0);
        let a = cam.frame_matrices(pivot, 1.5);
        cam.set_projection(Projection::Orthographic);
        let b = cam.frame_matrices(pivot, 1.5);

        assert_eq!(a.model, b.model);
        assert_eq!(a.view, b.view);
        assert_ne!(a.projection, b.projection);
    }

    #[test]
    fn model_matrix_pivots_about_centroid() {
        let mut cam = OrbitCamera::new();
        cam.set_rotate_deg(90.0);
        let pivot = Vec3::new(4.0, 1.0, -2.0);
        let m = cam.frame_matrices(pivot, 1.0).model;
        let p = m.transform_point(pivot);
        assert!((p - pivot).length() < 1e-4);
    }

    #[test]
    fn eye_sits_at_zoom_distance_from_pivot() {
        let mut cam = OrbitCamera::new();
        cam.set_zoom(25.0);
        cam.apply_pointer_delta(45.0, 30.0);
        let pivot = Vec3::new(10.0, 0.0, 10.0);
        let d = (cam.eye(pivot) - pivot).length();
        assert!((d - 25.0).abs() < 1e-4);
    }

    #[test]
    fn zoom_never_reaches_zero() {
        let mut cam = OrbitCamera::new();
        cam.set_zoom(-5.0);
        assert!(cam.zoom() > 0.0);
        cam.zoom_by(-1e9);
        assert!(cam.zoom() > 0.0);
    }
}
