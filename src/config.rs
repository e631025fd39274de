use crate::error::{PipelineError, PipelineResult};
use anyhow::{Context, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Weight of each scoring component, as recognized by `Config`'s §6
/// "Weights configuration" table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    pub hard_skills: f64,
    pub soft_skills: f64,
    pub experience: f64,
    pub education: f64,
    pub semantic_match: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            hard_skills: 0.35,
            soft_skills: 0.15,
            experience: 0.25,
            education: 0.15,
            semantic_match: 0.10,
        }
    }
}

impl Weights {
    pub fn sum(&self) -> f64 {
        self.hard_skills + self.soft_skills + self.experience + self.education + self.semantic_match
    }

    /// Weights must satisfy `|Σ − 1.0| ≤ 0.01`.
    pub fn validate(&self) -> PipelineResult<()> {
        let sum = self.sum();
        if (sum - 1.0).abs() > 0.01 {
            return Err(PipelineError::invalid_weights(sum));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub high: f64,
    pub medium: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            high: 80.0,
            medium: 60.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub weights: Weights,
    pub thresholds: Thresholds,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            weights: Weights::default(),
            thresholds: Thresholds::default(),
        }
    }
}

impl Config {
    /// Locates `<dirs::config_dir()>/resumatch/config.json`, creating the
    /// directory and writing out defaults on first run, exactly as the
    /// teacher's `ConfigManager` does for `AppConfig`.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_or_create_default(&config_path)
    }

    pub fn load_from_path(config_path: &PathBuf) -> Result<Self> {
        Self::load_or_create_default(config_path)
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
            .context("could not determine config directory")?;

        let app_config_dir = config_dir.join("resumatch");

        if !app_config_dir.exists() {
            fs::create_dir_all(&app_config_dir).context("failed to create config directory")?;
            info!("created config directory: {:?}", app_config_dir);
        }

        Ok(app_config_dir.join("config.json"))
    }

    fn load_or_create_default(config_path: &PathBuf) -> Result<Self> {
        if config_path.exists() {
            info!("loading configuration from: {:?}", config_path);
            Self::load_config(config_path)
        } else {
            info!("creating default configuration at: {:?}", config_path);
            let config = Self::default();
            Self::save_to_path(&config, config_path)?;
            Ok(config)
        }
    }

    fn load_config(config_path: &PathBuf) -> Result<Self> {
        let config_str = fs::read_to_string(config_path).context("failed to read config file")?;
        let config: Self =
            serde_json::from_str(&config_str).context("failed to parse config file")?;

        if let Err(e) = config.weights.validate() {
            warn!("configured weights are invalid ({}), falling back to defaults", e);
            return Ok(Self::default());
        }

        info!("configuration loaded successfully");
        Ok(config)
    }

    fn save_to_path(config: &Self, config_path: &PathBuf) -> Result<()> {
        let config_str =
            serde_json::to_string_pretty(config).context("failed to serialize config")?;
        fs::write(config_path, config_str).context("failed to write config file")?;
        info!("configuration saved to: {:?}", config_path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_weights_sum_to_one() {
        assert!((Weights::default().sum() - 1.0).abs() < 1e-9);
        assert!(Weights::default().validate().is_ok());
    }

    #[test]
    fn invalid_weights_rejected() {
        let bad = Weights {
            hard_skills: 0.5,
            soft_skills: 0.5,
            experience: 0.5,
            education: 0.5,
            semantic_match: 0.5,
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn load_from_path_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let config = Config::load_from_path(&path).unwrap();
        assert_eq!(config, Config::default());
        assert!(path.exists());

        let reloaded = Config::load_from_path(&path).unwrap();
        assert_eq!(reloaded, config);
    }
}
