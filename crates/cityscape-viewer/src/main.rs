use std::path::PathBuf;

use anyhow::Result;
use winit::dpi::LogicalSize;

use cityscape_engine::device::GpuInit;
use cityscape_engine::logging::{LoggingConfig, init_logging};
use cityscape_engine::window::{Runtime, RuntimeConfig};

mod app;

use app::CityApp;

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let mut app = CityApp::new();

    match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => app.load_scene(&path)?,
        None => {
            log::warn!("no scene file given; drop a JSON scene onto the window to load one");
            log::warn!("usage: cityscape-viewer [scene.json]");
        }
    }

    Runtime::run(
        RuntimeConfig {
            title: "cityscape".to_string(),
            initial_size: LogicalSize::new(1280.0, 720.0),
        },
        GpuInit::default(),
        app,
    )
}
