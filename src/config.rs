use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::Deserialize;

use crate::cache::DEFAULT_TTL_MS;
use crate::carousel::{DEFAULT_INTERVAL, DEFAULT_SWIPE_THRESHOLD};

pub const DEFAULT_BASE_URL: &str = "https://cse.iitdh.ac.in/strapi";

/// Runtime settings. Defaults, then the TOML file, then `PORTAL_*` env vars.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct PortalConfig {
    /// CMS root; collections live under `{base_url}/api/`
    pub base_url: String,
    /// SQLite URL for the cache store; data-dir file when unset
    pub database_url: Option<String>,
    pub cache_ttl_ms: i64,
    pub http_timeout_secs: u64,
    pub carousel: CarouselConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct CarouselConfig {
    pub interval_ms: u64,
    pub swipe_threshold_px: f64,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            database_url: None,
            cache_ttl_ms: DEFAULT_TTL_MS,
            http_timeout_secs: 30,
            carousel: CarouselConfig::default(),
        }
    }
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self { interval_ms: DEFAULT_INTERVAL.as_millis() as u64, swipe_threshold_px: DEFAULT_SWIPE_THRESHOLD }
    }
}

impl PortalConfig {
    /// Load from an explicit file, or from `portal.toml` in the config dir if it exists.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(p) => Some(p.to_path_buf()),
            None => default_config_path().filter(|p| p.exists()),
        };
        let mut cfg = match file {
            Some(p) => Self::from_file(&p)?,
            None => Self::default(),
        };
        cfg.apply_env(|k| std::env::var(k).ok());
        Ok(cfg)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).with_context(|| format!("reading config: {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("parsing config: {}", path.display()))
    }

    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(v) = var("PORTAL_BASE_URL").filter(|s| !s.trim().is_empty()) { self.base_url = v; }
        if let Some(v) = var("PORTAL_DATABASE_URL").filter(|s| !s.trim().is_empty()) { self.database_url = Some(v); }
        if let Some(v) = var("PORTAL_CACHE_TTL_MS").and_then(|s| s.parse().ok()) { self.cache_ttl_ms = v; }
        if let Some(v) = var("PORTAL_HTTP_TIMEOUT_SECS").and_then(|s| s.parse().ok()) { self.http_timeout_secs = v; }
    }

    pub fn http_timeout(&self) -> Duration { Duration::from_secs(self.http_timeout_secs) }
    pub fn carousel_interval(&self) -> Duration { Duration::from_millis(self.carousel.interval_ms) }
}

fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("dev", "portal", "portal").map(|p| p.config_dir().join("portal.toml"))
}
