/// Configuration module for the Office Installer.
///
/// This module provides:
/// - `AppConfig`: installer name, config extension, default config names and
///   the polling interval, optionally read from `office_installer.json`
/// - Resolution of the working directory (the folder holding the binary)
/// - `StartupFlags` parsed from the command line
///
/// The configuration file is read-only: nothing the user picks in the window
/// is written back.
///
/// # Example
///
/// ```rust
/// use office_installer::config::{load_config, resolve_work_dir};
///
/// let work_dir = resolve_work_dir();
/// let config = load_config(&work_dir);
/// assert!(config.poll_interval_ms > 0);
/// ```
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::catalog::{Architecture, CatalogRules, CONFIG_EXTENSION, DEFAULT_CONFIG_NAMES};

/// Name of the optional configuration file next to the binary
pub const CONFIG_FILE_NAME: &str = "office_installer.json";

/// Installer executable expected in the working directory
pub const DEFAULT_EXECUTABLE: &str = "setup.exe";

/// Application configuration
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Installer executable looked up in the working directory
    pub executable_name: String,
    /// Suffix identifying configuration files
    pub config_extension: String,
    /// Names pre-selected when present
    pub default_config_names: Vec<String>,
    /// How often a running installer is checked
    pub poll_interval_ms: u64,
    /// Where icon.png and banner.png live (None = working directory)
    pub assets_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            executable_name: DEFAULT_EXECUTABLE.to_string(),
            config_extension: CONFIG_EXTENSION.to_string(),
            default_config_names: DEFAULT_CONFIG_NAMES.iter().map(|n| n.to_string()).collect(),
            poll_interval_ms: 1000,
            assets_dir: None,
        }
    }
}

impl AppConfig {
    pub fn catalog_rules(&self) -> CatalogRules {
        CatalogRules {
            extension: self.config_extension.clone(),
            default_names: self.default_config_names.clone(),
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    pub fn assets_dir_or<'a>(&'a self, work_dir: &'a Path) -> &'a Path {
        self.assets_dir.as_deref().unwrap_or(work_dir)
    }
}

/// Directory of the running binary, or the current directory as fallback
pub fn resolve_work_dir() -> PathBuf {
    match binary_directory() {
        Ok(dir) => dir,
        Err(e) => {
            tracing::warn!("{}, using current directory", e);
            std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
        }
    }
}

fn binary_directory() -> Result<PathBuf> {
    let exe = std::env::current_exe().context("Failed to locate running executable")?;
    exe.parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| anyhow!("Executable path has no parent: {:?}", exe))
}

/// Load configuration from `office_installer.json` in `dir`
/// Returns default config if file doesn't exist or on error
pub fn load_config(dir: &Path) -> AppConfig {
    let config_path = dir.join(CONFIG_FILE_NAME);

    if !config_path.exists() {
        return AppConfig::default();
    }

    match read_config(&config_path) {
        Ok(config) => {
            tracing::info!("Loaded configuration from {:?}", config_path);
            config
        }
        Err(e) => {
            tracing::warn!("{:#}, using defaults", e);
            AppConfig::default()
        }
    }
}

fn read_config(path: &Path) -> Result<AppConfig> {
    let contents = fs::read_to_string(path)
        .map_err(|e| anyhow!("Failed to read {:?}: {}", path, e))?;

    serde_json::from_str(&contents).map_err(|e| anyhow!("Failed to parse {:?}: {}", path, e))
}

/// Startup flags parsed from command line
#[derive(Debug, Default, Clone, PartialEq)]
pub struct StartupFlags {
    /// Overrides the working directory
    pub work_dir: Option<PathBuf>,
    /// Initial architecture filter
    pub architecture: Option<Architecture>,
}

/// Parse `--dir <path>` and `--arch <all|x64|x86>`; unknown flags are ignored
pub fn parse_args<I>(args: I) -> StartupFlags
where
    I: IntoIterator<Item = String>,
{
    let mut flags = StartupFlags::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--dir" => {
                if let Some(dir) = args.next() {
                    flags.work_dir = Some(PathBuf::from(dir));
                }
            }
            "--arch" => {
                if let Some(value) = args.next() {
                    match value.parse() {
                        Ok(arch) => flags.architecture = Some(arch),
                        Err(e) => tracing::warn!("{}", e),
                    }
                }
            }
            other => tracing::debug!("Ignoring argument: {}", other),
        }
    }

    flags
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.executable_name, "setup.exe");
        assert_eq!(config.config_extension, ".xml");
        assert_eq!(config.poll_interval(), Duration::from_secs(1));
        assert!(config.default_config_names.contains(&"Configuracao.xml".to_string()));
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(load_config(dir.path()), AppConfig::default());
    }

    #[test]
    fn test_malformed_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), "{ not json").unwrap();
        assert_eq!(load_config(dir.path()), AppConfig::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            r#"{ "executable_name": "odt.exe", "poll_interval_ms": 250 }"#,
        )
        .unwrap();

        let config = load_config(dir.path());
        assert_eq!(config.executable_name, "odt.exe");
        assert_eq!(config.poll_interval(), Duration::from_millis(250));
        assert_eq!(config.config_extension, ".xml");
    }

    #[test]
    fn test_resolve_work_dir_exists() {
        assert!(resolve_work_dir().is_dir());
    }

    #[test]
    fn test_parse_args() {
        let flags = parse_args(args(&["--dir", "C:\\Office", "--arch", "x64", "--verbose"]));
        assert_eq!(flags.work_dir, Some(PathBuf::from("C:\\Office")));
        assert_eq!(flags.architecture, Some(Architecture::X64));
    }

    #[test]
    fn test_parse_args_bad_arch_ignored() {
        let flags = parse_args(args(&["--arch", "arm64"]));
        assert_eq!(flags, StartupFlags::default());
    }
}
