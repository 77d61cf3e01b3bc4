use std::{
    env::{self, VarError},
    fs::File,
    io::Read,
    path::PathBuf,
    time::Duration,
};

use artic_core::{
    page::DEFAULT_ROWS_PER_PAGE,
    webapi::{DEFAULT_API_BASE, DEFAULT_TIMEOUT},
};
use platform_dirs::AppDirs;
use serde::{Deserialize, Serialize};

const APP_NAME: &str = "Artic";
const CONFIG_FILENAME: &str = "config.json";
const PROXY_ENV_VAR: &str = "HTTPS_PROXY";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_base: String,
    pub rows_per_page: usize,
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            rows_per_page: DEFAULT_ROWS_PER_PAGE,
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

impl Config {
    fn app_dirs() -> Option<AppDirs> {
        const USE_XDG_ON_MACOS: bool = false;

        AppDirs::new(Some(APP_NAME), USE_XDG_ON_MACOS)
    }

    pub fn config_dir() -> Option<PathBuf> {
        Self::app_dirs().map(|dirs| dirs.config_dir)
    }

    fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join(CONFIG_FILENAME))
    }

    /// Read the config file, if there is a readable one.
    pub fn load() -> Option<Config> {
        let path = Self::config_path()?;
        let file = File::open(&path).ok()?;
        log::info!("loading config: {:?}", &path);
        match Self::from_reader(file) {
            Ok(config) => Some(config),
            Err(err) => {
                log::error!("failed to read config {:?}: {}", &path, err);
                None
            }
        }
    }

    pub fn from_reader(reader: impl Read) -> Result<Config, serde_json::Error> {
        serde_json::from_reader(reader)
    }

    pub fn rows_per_page(&self) -> usize {
        self.rows_per_page.max(1)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn proxy() -> Option<String> {
        env::var(PROXY_ENV_VAR).map_or_else(
            |err| match err {
                VarError::NotPresent => None,
                VarError::NotUnicode(_) => {
                    log::error!("proxy URL is not a valid unicode");
                    None
                }
            },
            Some,
        )
    }
}
