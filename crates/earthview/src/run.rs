use anyhow::Result;
use renderer::{Viewer, ViewerConfig};
use tracing_subscriber::EnvFilter;

use crate::cli::RunArgs;
use crate::paths::AppPaths;
use crate::scene::load_scene;

const DEFAULT_SURFACE_SIZE: (u32, u32) = (1280, 720);

pub fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

pub fn run(args: RunArgs) -> Result<()> {
    let paths = AppPaths::discover()?;
    let config = viewer_config(args, &paths)?;
    tracing::info!(
        assets = %config.scene.assets_root.display(),
        debug = config.scene.debug,
        overrides = config.debug_overrides.len(),
        "bootstrapping earth map viewer"
    );
    Viewer::new(config).run()
}

fn viewer_config(args: RunArgs, paths: &AppPaths) -> Result<ViewerConfig> {
    let loaded = load_scene(args.scene.config.as_deref(), paths)?;
    let mut scene = loaded.config;
    if args.debug || !args.overrides.is_empty() {
        scene.debug = true;
    }
    Ok(ViewerConfig {
        surface_size: args.size.unwrap_or(DEFAULT_SURFACE_SIZE),
        antialiasing: args.antialias,
        color_space: args.color_space,
        scene,
        debug_overrides: args.overrides,
    })
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use tempfile::TempDir;

    use super::*;
    use crate::cli::Cli;

    #[test]
    fn overrides_force_debug_panel() {
        let dir = TempDir::new().unwrap();
        let paths = AppPaths::from_raw(dir.path().join("config"), dir.path().join("data"));
        let cli = Cli::try_parse_from(["earthview", "--set", "Earth Map/Position X=1"]).unwrap();
        let config = viewer_config(cli.run, &paths).unwrap();
        assert!(config.scene.debug);
        assert_eq!(config.surface_size, DEFAULT_SURFACE_SIZE);
        assert_eq!(config.debug_overrides[0].value, 1.0);
    }
}
