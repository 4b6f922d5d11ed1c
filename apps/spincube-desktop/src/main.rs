mod app;
mod hud;

use anyhow::Result;
use clap::Parser;
use spincube_scene::{
    DEFAULT_TEXTURE, DebugTextRenderer, HeldKeys, Key, Renderer, Scene, SceneConfig,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use winit::event_loop::{ControlFlow, EventLoop};

#[derive(Parser, Debug)]
#[command(name = "spincube-desktop", about = "Spinning lit, textured cube")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Texture image applied to the box (PNG or JPEG)
    #[arg(long, default_value = DEFAULT_TEXTURE)]
    texture: PathBuf,

    /// Simulate this many frames without a window and print the last one
    #[arg(long, value_name = "FRAMES")]
    headless: Option<u32>,

    /// Seconds per simulated frame in headless mode
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f32,

    /// Keys held during headless simulation: left, right, up, down
    #[arg(long, value_delimiter = ',', value_parser = parse_key)]
    hold: Vec<Key>,
}

fn parse_key(s: &str) -> Result<Key, String> {
    Key::from_name(s).ok_or_else(|| format!("unknown key '{s}' (expected left, right, up, down)"))
}

impl Cli {
    fn scene_config(&self) -> SceneConfig {
        SceneConfig {
            texture_path: self.texture.clone(),
            ..SceneConfig::default()
        }
    }
}

/// Step the scene `frames` times and describe the final frame.
fn run_headless(config: &SceneConfig, frames: u32, dt: f32, keys: HeldKeys) -> Result<String> {
    let mut scene = Scene::setup(config)?;
    for _ in 0..frames {
        scene.update(keys, dt);
    }
    let output = DebugTextRenderer::new().render(&scene.frame());
    scene.release();
    Ok(output)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("spincube-desktop starting");

    if let Some(frames) = cli.headless {
        let keys: HeldKeys = cli.hold.iter().copied().collect();
        print!("{}", run_headless(&cli.scene_config(), frames, cli.dt, keys)?);
        return Ok(());
    }

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = app::GpuApp::new(cli.scene_config());
    event_loop.run_app(&mut app)?;

    match app.take_startup_error() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn cli_defaults() {
        let cli = Cli::parse_from(["spincube-desktop"]);
        assert!(!cli.verbose);
        assert_eq!(cli.texture, PathBuf::from("TreasureChest.jpg"));
        assert!(cli.headless.is_none());
        assert!(cli.hold.is_empty());
        assert_eq!(cli.scene_config().width, 640);
    }

    #[test]
    fn cli_parses_held_keys() {
        let cli = Cli::parse_from(["spincube-desktop", "--headless", "3", "--hold", "left,up"]);
        assert_eq!(cli.headless, Some(3));
        assert_eq!(cli.hold, vec![Key::Left, Key::Up]);
        assert!(Cli::try_parse_from(["spincube-desktop", "--hold", "jump"]).is_err());
    }

    #[test]
    fn headless_applies_held_keys() {
        let config = SceneConfig {
            texture_path: PathBuf::from("/nonexistent.jpg"),
            ..SceneConfig::default()
        };
        let keys: HeldKeys = [Key::Up].into_iter().collect();
        let out = run_headless(&config, 5, 0.2, keys).unwrap();
        // 2.0 + 5 frames * 5.0 * 0.2
        assert!(out.contains(", 7.00, "), "{out}");
        assert!(out.contains("texture=none"));
    }
}
