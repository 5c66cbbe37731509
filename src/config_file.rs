use log::debug;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::cli::SummaryFormat;
use crate::error::{Result, TrimError};

const PROJECT_CONFIG_NAME: &str = ".fqtrimrc";

/// Defaults loaded from an INI-style configuration file
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ConfigFile {
    pub threads: Option<usize>,
    pub compression_level: Option<u32>,
    pub log_file: Option<String>,
    pub summary_format: Option<SummaryFormat>,
}

impl ConfigFile {
    /// Find project-level .fqtrimrc by walking up directory tree
    pub fn find_project_config() -> Option<PathBuf> {
        let mut current = env::current_dir().ok()?;
        loop {
            let config_path = current.join(PROJECT_CONFIG_NAME);
            if config_path.is_file() {
                return Some(config_path);
            }
            if !current.pop() {
                break;
            }
        }
        None
    }

    /// User config file locations in order of preference
    pub fn get_user_config_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("fqtrim").join("config.ini"));
        }
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(PROJECT_CONFIG_NAME));
        }
        paths
    }

    /// Load configuration with precedence: project > user > defaults
    pub fn load() -> Result<Self> {
        let mut config = Self::default();

        if let Some(path) = Self::get_user_config_paths().into_iter().find(|p| p.is_file()) {
            config = Self::merge_configs(config, Self::load_from_path(&path)?);
        }

        if let Some(project_path) = Self::find_project_config() {
            config = Self::merge_configs(config, Self::load_from_path(&project_path)?);
        }

        Ok(config)
    }

    /// Load configuration with optional custom config file path
    pub fn load_with_custom_path(custom_path: Option<&Path>) -> Result<Self> {
        match custom_path {
            Some(path) => Self::load_from_path(path),
            None => Self::load(),
        }
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        debug!("Loading config file {}", path.display());
        let content = fs::read_to_string(path).map_err(|e| TrimError::Config {
            path: path.to_path_buf(),
            key: String::new(),
            reason: format!("cannot read file: {e}"),
        })?;
        Self::parse_ini_content(&content, path)
    }

    /// Parse INI content. Only root-level keys are read; sections are ignored.
    fn parse_ini_content(content: &str, path: &Path) -> Result<Self> {
        let mut config = Self::default();
        let mut in_section = false;

        for line in content.lines() {
            let line = line.trim();

            if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
                continue;
            }

            if line.starts_with('[') && line.ends_with(']') {
                in_section = true;
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            if in_section {
                continue;
            }
            let key = key.trim();
            let value = value.trim();

            match key {
                "threads" => config.threads = Some(parse_value(key, value, path)?),
                "compression-level" => {
                    let level: u32 = parse_value(key, value, path)?;
                    if level > 9 {
                        return Err(invalid(key, "must be between 0 and 9", path));
                    }
                    config.compression_level = Some(level);
                }
                "log-file" => config.log_file = Some(value.to_string()),
                "summary-format" => {
                    let format = <SummaryFormat as clap::ValueEnum>::from_str(value, true)
                        .map_err(|_| invalid(key, "expected 'table' or 'json'", path))?;
                    config.summary_format = Some(format);
                }
                _ => debug!("Ignoring unknown config key '{}'", key),
            }
        }

        Ok(config)
    }

    /// Merge two configuration objects, with the second taking precedence
    fn merge_configs(base: Self, overlay: Self) -> Self {
        Self {
            threads: overlay.threads.or(base.threads),
            compression_level: overlay.compression_level.or(base.compression_level),
            log_file: overlay.log_file.or(base.log_file),
            summary_format: overlay.summary_format.or(base.summary_format),
        }
    }
}

fn parse_value<T: FromStr>(key: &str, value: &str, path: &Path) -> Result<T> {
    value
        .parse()
        .map_err(|_| invalid(key, &format!("'{value}' is not a non-negative integer"), path))
}

fn invalid(key: &str, reason: &str, path: &Path) -> TrimError {
    TrimError::Config {
        path: path.to_path_buf(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}
