use std::path::Path;

use anyhow::{Context, Result};

use cityscape_engine::camera::OrbitCamera;
use cityscape_engine::core::{App, AppControl, FrameCtx};
use cityscape_engine::input::{Key, MouseButton};
use cityscape_engine::layers::Layers;
use cityscape_engine::render::{CLEAR_COLOR, LayerRenderer};
use cityscape_engine::scene::load_scene_file;

/// Scene rotation speed while an arrow key is held, degrees per second.
const ROTATE_SPEED: f32 = 90.0;

/// Zoom speed while Up/Down is held, world units per second.
const ZOOM_SPEED: f32 = 60.0;

/// Zoom change per wheel line.
const WHEEL_ZOOM_STEP: f32 = 5.0;

/// The city viewer application.
///
/// Owns the camera, the layer collection, and the renderer; the engine
/// runtime drives it through the [`App`] contract.
pub struct CityApp {
    camera: OrbitCamera,
    layers: Layers,
    renderer: LayerRenderer,
}

impl CityApp {
    pub fn new() -> Self {
        Self {
            camera: OrbitCamera::new(),
            layers: Layers::new(),
            renderer: LayerRenderer::new(),
        }
    }

    /// Loads a scene file and merges its layers into the collection.
    ///
    /// All-or-nothing: a malformed or invalid file leaves the current layer
    /// set untouched.
    pub fn load_scene(&mut self, path: &Path) -> Result<()> {
        let scene = load_scene_file(path)
            .with_context(|| format!("loading scene {}", path.display()))?;

        if scene.is_empty() {
            log::warn!("{}: no recognized layers in scene file", path.display());
        }

        self.layers.apply_scene(scene);

        let c = self.layers.centroid();
        log::info!(
            "scene loaded from {}: {} layer(s), centroid ({:.2}, {:.2}, {:.2})",
            path.display(),
            self.layers.len(),
            c.x,
            c.y,
            c.z
        );
        Ok(())
    }

    fn apply_input(&mut self, ctx: &FrameCtx<'_, '_>) -> AppControl {
        let frame = ctx.input_frame;

        for path in &frame.dropped_files {
            if let Err(err) = self.load_scene(path) {
                // Non-fatal: keep rendering whatever layers already exist.
                log::error!("scene load failed: {err:#}");
            }
        }

        if frame.keys_pressed.contains(&Key::Escape) {
            return AppControl::Exit;
        }

        if frame.keys_pressed.contains(&Key::P) {
            self.camera.toggle_projection();
            log::info!("projection: {:?}", self.camera.projection());
        }

        let dt = ctx.time.dt;
        if ctx.input.key_down(Key::ArrowLeft) {
            self.camera.rotate_by(-ROTATE_SPEED * dt);
        }
        if ctx.input.key_down(Key::ArrowRight) {
            self.camera.rotate_by(ROTATE_SPEED * dt);
        }
        if ctx.input.key_down(Key::ArrowUp) {
            self.camera.zoom_by(-ZOOM_SPEED * dt);
        }
        if ctx.input.key_down(Key::ArrowDown) {
            self.camera.zoom_by(ZOOM_SPEED * dt);
        }

        if frame.wheel_lines != 0.0 {
            self.camera.zoom_by(-frame.wheel_lines * WHEEL_ZOOM_STEP);
        }

        if ctx.input.button_down(MouseButton::Left) {
            let (dx, dy) = frame.pointer_delta;
            self.camera.apply_pointer_delta(dx, dy);
        }

        AppControl::Continue
    }
}

impl Default for CityApp {
    fn default() -> Self {
        Self::new()
    }
}

impl App for CityApp {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if self.apply_input(ctx) == AppControl::Exit {
            return AppControl::Exit;
        }

        // Matrices are computed once here and shared by every layer.
        let matrices = self
            .camera
            .frame_matrices(self.layers.centroid(), ctx.aspect());

        let layers = &self.layers;
        let renderer = &mut self.renderer;

        ctx.render(CLEAR_COLOR, |rctx, target| {
            renderer.render(rctx, target, layers, &matrices);
        })
    }
}
