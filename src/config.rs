use crate::model::{DEFAULT_DATE_FORMAT, DoneFilter};
use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_ENV: &str = "TASKTAB_CONFIG";
pub const URL_ENV: &str = "TASKTAB_URL";
pub const TOKEN_ENV: &str = "TASKTAB_TOKEN";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub url: String,
    #[serde(default)]
    pub token: String,
    #[serde(default = "default_date_format")]
    pub date_format: String,
    #[serde(default)]
    pub default_filter: DoneFilter,
    #[serde(default)]
    pub allow_insecure_certs: bool,
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
}

fn default_date_format() -> String {
    DEFAULT_DATE_FORMAT.to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Config {
    pub fn get_path() -> Result<PathBuf> {
        if let Ok(path) = env::var(CONFIG_ENV) {
            return Ok(PathBuf::from(path));
        }
        let proj = ProjectDirs::from("com", "tasktab", "tasktab")
            .ok_or_else(|| anyhow!("could not determine a home directory"))?;
        Ok(proj.config_dir().join("config.toml"))
    }

    pub fn get_path_string() -> Result<String> {
        Ok(Self::get_path()?.to_string_lossy().into_owned())
    }

    /// Loads the config file and applies environment overrides.
    pub fn load() -> Result<Self> {
        let path = Self::get_path()?;
        let mut cfg = Self::load_from(&path)?;
        cfg.apply_env();
        Ok(cfg)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config at {}", path.display()))?;
        let cfg: Config = toml::from_str(&content)
            .with_context(|| format!("failed to parse config at {}", path.display()))?;
        Ok(cfg)
    }

    pub fn apply_env(&mut self) {
        self.apply_overrides(env::var(URL_ENV).ok(), env::var(TOKEN_ENV).ok());
    }

    fn apply_overrides(&mut self, url: Option<String>, token: Option<String>) {
        if let Some(url) = url.filter(|u| !u.is_empty()) {
            self.url = url;
        }
        if let Some(token) = token {
            self.token = token;
        }
    }
}
