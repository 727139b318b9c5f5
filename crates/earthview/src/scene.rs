use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use sceneconfig::SceneConfig;
use tracing::debug;

use crate::paths::AppPaths;

/// A scene configuration together with the file it came from, if any.
#[derive(Debug, Clone)]
pub struct LoadedScene {
    pub config: SceneConfig,
    pub source: Option<PathBuf>,
}

/// Loads `explicit` if given, else the scene file under the config directory
/// when it exists, else the built-in defaults. A relative `assets_root` is
/// anchored at the directory of the file it was read from.
pub fn load_scene(explicit: Option<&Path>, paths: &AppPaths) -> Result<LoadedScene> {
    let candidate = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => Some(paths.scene_file()).filter(|path| path.is_file()),
    };

    let Some(path) = candidate else {
        debug!("no scene file found; using defaults");
        return Ok(LoadedScene {
            config: SceneConfig::default(),
            source: None,
        });
    };

    let mut config = SceneConfig::load(&path)
        .with_context(|| format!("failed to load scene from {}", path.display()))?;
    if config.assets_root.is_relative() {
        if let Some(parent) = path.parent() {
            config.assets_root = parent.join(&config.assets_root);
        }
    }
    debug!(
        path = %path.display(),
        assets = %config.assets_root.display(),
        "loaded scene configuration"
    );
    Ok(LoadedScene {
        config,
        source: Some(path),
    })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    fn paths(root: &Path) -> AppPaths {
        AppPaths::from_raw(root.join("config"), root.join("data"))
    }

    #[test]
    fn falls_back_to_defaults_without_file() {
        let dir = TempDir::new().unwrap();
        let loaded = load_scene(None, &paths(dir.path())).unwrap();
        assert!(loaded.source.is_none());
        assert_eq!(loaded.config.assets_root, PathBuf::from("static"));
    }

    #[test]
    fn picks_up_config_dir_scene_and_anchors_assets() {
        let dir = TempDir::new().unwrap();
        let paths = paths(dir.path());
        fs::create_dir_all(paths.config_dir()).unwrap();
        fs::write(
            paths.scene_file(),
            "version = 1\nassets_root = \"assets\"\n[transition]\nduration = \"4s\"\n",
        )
        .unwrap();

        let loaded = load_scene(None, &paths).unwrap();
        assert_eq!(loaded.source.as_deref(), Some(paths.scene_file().as_path()));
        assert_eq!(loaded.config.assets_root, paths.config_dir().join("assets"));
        assert_eq!(loaded.config.transition.duration.as_secs(), 4);
    }

    #[test]
    fn explicit_path_errors_are_reported() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.toml");
        let err = load_scene(Some(&missing), &paths(dir.path())).unwrap_err();
        assert!(format!("{err:#}").contains("nope.toml"));
    }
}
