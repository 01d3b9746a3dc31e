use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use planet_scene::app;
use planet_scene::assets::FileSystemSource;
use planet_scene::cli::Cli;

const HEADLESS_FRAMES: u64 = 600;
const HEADLESS_INTERVAL: Duration = Duration::from_millis(16);

fn main() -> Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info,wgpu=warn,naga=warn"),
    )
    .init();

    let cli = Cli::parse();
    let config = cli.scene_config()?;
    let source = FileSystemSource::new(cli.assets.clone())
        .with_context(|| format!("Failed to open asset root {}", cli.assets.display()))?;
    let source = Arc::new(source);

    if cli.headless {
        let frames = cli.frames.unwrap_or(HEADLESS_FRAMES);
        let summary = app::run_headless(&config, source, frames, HEADLESS_INTERVAL)?;
        if !cli.no_ui {
            println!(
                "{} frames, {}/{} models loaded, {} root children",
                summary.frames, summary.slots_loaded, summary.slots_total, summary.root_children
            );
        }
        return Ok(());
    }

    log::info!("Controls: drag to orbit, wheel to zoom or scroll, Escape to quit");
    app::run(config, source, !cli.no_ui, cli.frames)
}
