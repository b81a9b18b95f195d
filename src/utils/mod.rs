use std::path::PathBuf;

use anyhow::anyhow;
use directories::ProjectDirs;
use swipenav_config::Config;

pub fn default_config_path() -> Option<PathBuf> {
    let Some(dirs) = ProjectDirs::from("", "", "swipenav") else {
        warn!("error retrieving home directory");
        return None;
    };

    Some(dirs.config_dir().join("config.kdl"))
}

/// Loads the config from `path`, or from the default location if `path` is `None`.
///
/// A missing default config is not an error: the built-in defaults are used instead.
pub fn load_config(path: Option<PathBuf>) -> anyhow::Result<Config> {
    let path = match path {
        Some(path) => path,
        None => match default_config_path() {
            Some(path) if path.exists() => path,
            _ => {
                info!("no config file, using defaults");
                return Ok(Config::default());
            }
        },
    };

    Config::load(&path).map_err(|err| anyhow!("{err:?}"))
}
