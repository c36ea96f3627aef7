//! Configuration loading and root folder resolution
//!
//! Root folder priority order:
//! 1. Command-line argument (highest priority)
//! 2. `MFG_ROOT_FOLDER` environment variable
//! 3. `root_folder` key of the TOML config file
//! 4. OS-dependent compiled default (fallback)
//!
//! A missing or unreadable config file is not fatal; it is logged and the
//! next source is used.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::{Error, Result};

/// Environment variable overriding the root folder
pub const ROOT_FOLDER_ENV: &str = "MFG_ROOT_FOLDER";

/// Database file name inside the root folder
pub const DATABASE_FILE: &str = "mfg.db";

/// Default bind address for every service
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Application services sharing the database
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    Purchasing,
    Quality,
    Resources,
}

impl Service {
    pub fn name(&self) -> &'static str {
        match self {
            Service::Purchasing => "purchasing",
            Service::Quality => "quality",
            Service::Resources => "resources",
        }
    }

    pub fn default_port(&self) -> u16 {
        match self {
            Service::Purchasing => 5741,
            Service::Quality => 5742,
            Service::Resources => 5743,
        }
    }
}

/// Host/port override table (`[purchasing]`, `[quality]`, `[resources]`)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceSection {
    pub host: Option<String>,
    pub port: Option<u16>,
}

/// Contents of `config.toml`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    pub root_folder: Option<PathBuf>,
    #[serde(default)]
    pub purchasing: ServiceSection,
    #[serde(default)]
    pub quality: ServiceSection,
    #[serde(default)]
    pub resources: ServiceSection,
}

/// Resolved listen address for one service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
}

impl TomlConfig {
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Invalid config file: {}", e)))
    }

    /// Load the first config file found; `None` when there is none or it is invalid
    pub fn load() -> Option<Self> {
        let path = config_file_path()?;
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                warn!("Could not read config file {}: {}", path.display(), e);
                return None;
            }
        };
        match Self::parse(&content) {
            Ok(config) => {
                info!("Loaded config file {}", path.display());
                Some(config)
            }
            Err(e) => {
                warn!("{} ({}), using defaults", e, path.display());
                None
            }
        }
    }

    /// Listen address for `service`, falling back to the compiled defaults
    pub fn service(&self, service: Service) -> ServiceConfig {
        let section = match service {
            Service::Purchasing => &self.purchasing,
            Service::Quality => &self.quality,
            Service::Resources => &self.resources,
        };
        ServiceConfig {
            host: section
                .host
                .clone()
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: section.port.unwrap_or_else(|| service.default_port()),
        }
    }
}

/// Resolves the root folder from CLI, environment, config file and defaults
#[derive(Debug, Clone, Default)]
pub struct RootFolderResolver {
    cli_arg: Option<PathBuf>,
    config: Option<TomlConfig>,
}

impl RootFolderResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cli_arg(mut self, path: Option<PathBuf>) -> Self {
        self.cli_arg = path;
        self
    }

    pub fn with_config(mut self, config: Option<TomlConfig>) -> Self {
        self.config = config;
        self
    }

    pub fn resolve(&self) -> PathBuf {
        if let Some(path) = &self.cli_arg {
            return path.clone();
        }

        if let Ok(path) = std::env::var(ROOT_FOLDER_ENV) {
            if !path.trim().is_empty() {
                return PathBuf::from(path);
            }
        }

        if let Some(path) = self.config.as_ref().and_then(|c| c.root_folder.clone()) {
            return path;
        }

        default_root_folder()
    }
}

/// Create the root folder if needed
pub fn ensure_root_folder(root: &Path) -> Result<()> {
    if !root.exists() {
        info!("Creating root folder {}", root.display());
        std::fs::create_dir_all(root)?;
    }
    Ok(())
}

pub fn database_path(root: &Path) -> PathBuf {
    root.join(DATABASE_FILE)
}

/// First existing config file: `~/.config/mfg/config.toml`, then `/etc/mfg/config.toml`
fn config_file_path() -> Option<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("mfg").join("config.toml"));
    if let Some(path) = user_config {
        if path.exists() {
            return Some(path);
        }
    }

    if cfg!(unix) {
        let system_config = PathBuf::from("/etc/mfg/config.toml");
        if system_config.exists() {
            return Some(system_config);
        }
    }

    None
}

/// OS-dependent default root folder
pub fn default_root_folder() -> PathBuf {
    if cfg!(target_os = "windows") {
        dirs::data_local_dir()
            .map(|d| d.join("mfg"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\mfg"))
    } else {
        dirs::data_dir()
            .map(|d| d.join("mfg"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/mfg"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_defaults() {
        let config = TomlConfig::default();
        assert_eq!(
            config.service(Service::Quality),
            ServiceConfig {
                host: "127.0.0.1".to_string(),
                port: 5742
            }
        );
    }

    #[test]
    fn test_parse_service_overrides() {
        let config = TomlConfig::parse(
            r#"
            root_folder = "/srv/mfg"

            [purchasing]
            port = 8000

            [resources]
            host = "0.0.0.0"
            "#,
        )
        .unwrap();

        assert_eq!(config.root_folder, Some(PathBuf::from("/srv/mfg")));
        assert_eq!(config.service(Service::Purchasing).port, 8000);
        assert_eq!(config.service(Service::Resources).host, "0.0.0.0");
        assert_eq!(config.service(Service::Resources).port, 5743);
    }

    #[test]
    fn test_parse_rejects_bad_toml() {
        let err = TomlConfig::parse("root_folder = ").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_database_path() {
        assert_eq!(
            database_path(Path::new("/data")),
            PathBuf::from("/data/mfg.db")
        );
    }
}
