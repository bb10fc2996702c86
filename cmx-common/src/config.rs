//! Configuration loading and data root resolution

use crate::{Error, Result};
use serde::Deserialize;
use std::path::PathBuf;

/// Environment variable naming the data root directory
pub const ENV_DATA_ROOT: &str = "CMX_DATA_ROOT";
/// Environment variable overriding the listen address
pub const ENV_BIND: &str = "CMX_BIND";
/// Environment variable overriding the curation API base URL
pub const ENV_ADMIN_API: &str = "CMX_ADMIN_API";

const DEFAULT_BIND: &str = "127.0.0.1:5780";
const DEFAULT_ADMIN_API: &str = "http://127.0.0.1:3003";

/// Resolved application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Directory holding `info/`, `storage/` and `logs/` document trees
    pub data_root: PathBuf,
    /// Listen address, `host:port`
    pub bind: String,
    /// Base URL of the external curation API
    pub admin_api_base: String,
}

/// On-disk config file shape (`config.toml`)
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    data_root: Option<String>,
    bind: Option<String>,
    admin_api_base: Option<String>,
}

impl AppConfig {
    /// Resolve configuration following the priority order:
    /// 1. Command-line argument (highest priority)
    /// 2. Environment variable
    /// 3. TOML config file
    /// 4. Compiled default (fallback)
    pub fn resolve(
        cli_data_root: Option<&str>,
        cli_bind: Option<&str>,
        cli_admin_api: Option<&str>,
    ) -> Result<AppConfig> {
        let file = load_config_file().unwrap_or_default();

        let data_root = cli_data_root
            .map(PathBuf::from)
            .or_else(|| std::env::var(ENV_DATA_ROOT).ok().map(PathBuf::from))
            .or_else(|| file.data_root.as_deref().map(PathBuf::from))
            .unwrap_or_else(default_data_root);

        let bind = cli_bind
            .map(str::to_string)
            .or_else(|| std::env::var(ENV_BIND).ok())
            .or_else(|| file.bind.clone())
            .unwrap_or_else(|| DEFAULT_BIND.to_string());

        let admin_api_base = cli_admin_api
            .map(str::to_string)
            .or_else(|| std::env::var(ENV_ADMIN_API).ok())
            .or_else(|| file.admin_api_base.clone())
            .unwrap_or_else(|| DEFAULT_ADMIN_API.to_string());

        Ok(AppConfig {
            data_root,
            bind,
            admin_api_base: admin_api_base.trim_end_matches('/').to_string(),
        })
    }
}

/// Locate and parse the platform config file, if one exists
fn load_config_file() -> Option<FileConfig> {
    let path = config_file_path()?;
    let content = std::fs::read_to_string(&path).ok()?;
    match toml::from_str::<FileConfig>(&content) {
        Ok(config) => Some(config),
        Err(error) => {
            tracing::warn!(path = %path.display(), %error, "Ignoring malformed config file");
            None
        }
    }
}

/// Platform config file path.
///
/// Linux prefers `~/.config/cmx/config.toml`, then `/etc/cmx/config.toml`;
/// other platforms use the OS config directory.
fn config_file_path() -> Option<PathBuf> {
    if cfg!(target_os = "linux") {
        if let Some(user_config) = dirs::config_dir().map(|d| d.join("cmx").join("config.toml")) {
            if user_config.exists() {
                return Some(user_config);
            }
        }
        let system_config = PathBuf::from("/etc/cmx/config.toml");
        if system_config.exists() {
            return Some(system_config);
        }
        None
    } else {
        dirs::config_dir()
            .map(|d| d.join("cmx").join("config.toml"))
            .filter(|p| p.exists())
    }
}

/// OS-dependent default data root
fn default_data_root() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("cmx").join("data"))
        .unwrap_or_else(|| PathBuf::from("./data"))
}

/// Validate that the data root exists and is a directory
pub fn check_data_root(root: &std::path::Path) -> Result<()> {
    if !root.is_dir() {
        return Err(Error::Config(format!(
            "Data root is not a directory: {}",
            root.display()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn cli_argument_wins_over_environment() {
        std::env::set_var(ENV_DATA_ROOT, "/tmp/from-env");
        let config = AppConfig::resolve(Some("/tmp/from-cli"), None, None).unwrap();
        std::env::remove_var(ENV_DATA_ROOT);
        assert_eq!(config.data_root, PathBuf::from("/tmp/from-cli"));
    }

    #[test]
    #[serial]
    fn environment_wins_over_defaults() {
        std::env::set_var(ENV_BIND, "0.0.0.0:9999");
        let config = AppConfig::resolve(None, None, None).unwrap();
        std::env::remove_var(ENV_BIND);
        assert_eq!(config.bind, "0.0.0.0:9999");
    }

    #[test]
    #[serial]
    fn defaults_apply_without_overrides() {
        std::env::remove_var(ENV_BIND);
        std::env::remove_var(ENV_ADMIN_API);
        let config = AppConfig::resolve(None, None, None).unwrap();
        assert_eq!(config.bind, DEFAULT_BIND);
        assert_eq!(config.admin_api_base, DEFAULT_ADMIN_API);
    }

    #[test]
    #[serial]
    fn admin_api_base_trailing_slash_is_trimmed() {
        let config = AppConfig::resolve(None, None, Some("http://api.local/")).unwrap();
        assert_eq!(config.admin_api_base, "http://api.local");
    }
}
