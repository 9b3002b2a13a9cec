use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::models::{DEFAULT_PAGE_SIZE, HISTORY_WINDOWS};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigFile {
    pub server: Option<ServerConfig>,
    pub history: Option<HistoryConfig>,
    pub storage: Option<StorageConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryConfig {
    pub days: Option<u32>,
    pub page_size: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    pub dir: Option<String>,
}

/// Platform config directory path: `<config_dir>/cerebro/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("cerebro").join("config.toml"))
}

/// Load config by cascading CWD `.cerebro.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(&PathBuf::from(".cerebro.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &PathBuf) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unparseable config file");
            None
        }
    }
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    ConfigFile {
        server: Some(ServerConfig {
            base_url: overlay
                .server
                .as_ref()
                .and_then(|s| s.base_url.clone())
                .or_else(|| base.server.as_ref().and_then(|s| s.base_url.clone())),
            timeout_secs: overlay
                .server
                .as_ref()
                .and_then(|s| s.timeout_secs)
                .or_else(|| base.server.as_ref().and_then(|s| s.timeout_secs)),
        }),
        history: Some(HistoryConfig {
            days: overlay
                .history
                .as_ref()
                .and_then(|h| h.days)
                .or_else(|| base.history.as_ref().and_then(|h| h.days)),
            page_size: overlay
                .history
                .as_ref()
                .and_then(|h| h.page_size)
                .or_else(|| base.history.as_ref().and_then(|h| h.page_size)),
        }),
        storage: Some(StorageConfig {
            dir: overlay
                .storage
                .as_ref()
                .and_then(|s| s.dir.clone())
                .or_else(|| base.storage.as_ref().and_then(|s| s.dir.clone())),
        }),
    }
}

/// Fully resolved client settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub base_url: String,
    /// `None` keeps the transport's default timeout.
    pub timeout: Option<Duration>,
    pub history_days: u32,
    pub page_size: u32,
    /// `None` means the platform data directory.
    pub storage_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
            history_days: HISTORY_WINDOWS[0],
            page_size: DEFAULT_PAGE_SIZE,
            storage_dir: None,
        }
    }
}

impl Settings {
    /// Defaults overlaid with whatever the file sets.
    pub fn from_file(file_cfg: &ConfigFile) -> Self {
        let mut settings = Settings::default();
        if let Some(server) = &file_cfg.server {
            if let Some(ref url) = server.base_url
                && !url.is_empty()
            {
                settings.base_url = url.clone();
            }
            if let Some(secs) = server.timeout_secs {
                settings.timeout = Some(Duration::from_secs(secs.max(1)));
            }
        }
        if let Some(history) = &file_cfg.history {
            if let Some(days) = history.days {
                settings.history_days = days.max(1);
            }
            if let Some(size) = history.page_size {
                settings.page_size = size.max(1);
            }
        }
        if let Some(storage) = &file_cfg.storage
            && let Some(ref dir) = storage.dir
            && !dir.is_empty()
        {
            settings.storage_dir = Some(PathBuf::from(dir));
        }
        settings
    }

    /// Apply `CEREBRO_API_URL`, `CEREBRO_TIMEOUT` and `CEREBRO_DATA_DIR`.
    pub fn apply_env(self) -> Self {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    fn apply_env_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup("CEREBRO_API_URL").filter(|v| !v.is_empty()) {
            self.base_url = url;
        }
        if let Some(secs) = lookup("CEREBRO_TIMEOUT").and_then(|v| v.parse::<u64>().ok()) {
            self.timeout = Some(Duration::from_secs(secs.max(1)));
        }
        if let Some(dir) = lookup("CEREBRO_DATA_DIR").filter(|v| !v.is_empty()) {
            self.storage_dir = Some(PathBuf::from(dir));
        }
        self
    }

    /// Apply command-line flags, which win over everything else.
    pub fn apply_overrides(
        mut self,
        base_url: Option<String>,
        timeout_secs: Option<u64>,
        storage_dir: Option<PathBuf>,
    ) -> Self {
        if let Some(url) = base_url {
            self.base_url = url;
        }
        if let Some(secs) = timeout_secs {
            self.timeout = Some(Duration::from_secs(secs.max(1)));
        }
        if let Some(dir) = storage_dir {
            self.storage_dir = Some(dir);
        }
        self
    }
}
