//! Configuration for tethercam
//!
//! Worker timing and teardown knobs, loadable from a TOML file.

use crate::errors::CameraError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TetherConfig {
    pub worker: WorkerConfig,
}

/// Device worker timing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Interval between poll-then-dispatch ticks in milliseconds
    pub tick_interval_ms: u64,
    /// How long camera construction waits for the initial bulk read
    pub startup_timeout_ms: u64,
    /// How long teardown waits for the worker thread to finish
    pub join_timeout_ms: u64,
}

impl Default for TetherConfig {
    fn default() -> Self {
        Self {
            worker: WorkerConfig {
                tick_interval_ms: 100,
                startup_timeout_ms: 5000,
                join_timeout_ms: 1000,
            },
        }
    }
}

impl TetherConfig {
    /// Load configuration from TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, CameraError> {
        let path = path.as_ref();

        if !path.exists() {
            log::info!("Config file not found at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .map_err(|e| CameraError::ConfigError(format!("Failed to read config file: {}", e)))?;

        let config: TetherConfig = toml::from_str(&contents)
            .map_err(|e| CameraError::ConfigError(format!("Failed to parse config file: {}", e)))?;

        config.validate().map_err(CameraError::ConfigError)?;
        log::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), CameraError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                CameraError::ConfigError(format!("Failed to create config directory: {}", e))
            })?;
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| CameraError::ConfigError(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, toml_string)
            .map_err(|e| CameraError::ConfigError(format!("Failed to write config file: {}", e)))?;

        log::info!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// Get default config file path
    pub fn default_path() -> PathBuf {
        PathBuf::from("tethercam.toml")
    }

    /// Load from default location or fall back to defaults
    pub fn load_or_default() -> Self {
        Self::load_from_file(Self::default_path()).unwrap_or_else(|e| {
            log::warn!("Failed to load config, using defaults: {}", e);
            Self::default()
        })
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.worker.tick_interval_ms == 0 {
            return Err("Tick interval must be at least 1 ms".to_string());
        }
        if self.worker.startup_timeout_ms == 0 {
            return Err("Startup timeout must be at least 1 ms".to_string());
        }
        Ok(())
    }
}
