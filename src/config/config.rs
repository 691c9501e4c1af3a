use crate::consensus::options::{
    AnalysisOptions, DEFAULT_COVERAGE_THRESHOLD, DEFAULT_PROPORTION_THRESHOLD,
};
use directories::ProjectDirs;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// User defaults read from `config.toml` in the platform config directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_coverage_threshold")]
    pub coverage_threshold: f64,
    #[serde(default = "default_proportion_threshold")]
    pub proportion_threshold: f64,
    /// Worker threads; 0 means one per available CPU.
    #[serde(default)]
    pub threads: usize,
}

fn default_coverage_threshold() -> f64 {
    DEFAULT_COVERAGE_THRESHOLD
}

fn default_proportion_threshold() -> f64 {
    DEFAULT_PROPORTION_THRESHOLD
}

impl Default for Config {
    fn default() -> Self {
        Self {
            coverage_threshold: default_coverage_threshold(),
            proportion_threshold: default_proportion_threshold(),
            threads: 0,
        }
    }
}

impl Config {
    pub fn path() -> Option<PathBuf> {
        ProjectDirs::from("org", "nasp", "nasp-tools")
            .map(|proj_dirs| proj_dirs.config_dir().join("config.toml"))
    }

    pub fn load() -> Self {
        if let Some(config_path) = Self::path() {
            if config_path.exists() {
                match fs::read_to_string(&config_path).map(|content| Self::parse(&content)) {
                    Ok(Ok(config)) => {
                        debug!("Loaded configuration from {}", config_path.display());
                        return config;
                    }
                    Ok(Err(e)) => warn!("Ignoring {}: {}", config_path.display(), e),
                    Err(e) => warn!("Could not read {}: {}", config_path.display(), e),
                }
            }
        }
        Config::default()
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn save(&self) -> anyhow::Result<()> {
        if let Some(config_path) = Self::path() {
            if let Some(config_dir) = config_path.parent() {
                fs::create_dir_all(config_dir)?;
            }
            let content = toml::to_string_pretty(self)?;
            fs::write(config_path, content)?;
        }
        Ok(())
    }

    /// Effective options, with command line values taking precedence.
    pub fn analysis_options(
        &self,
        coverage_threshold: Option<f64>,
        proportion_threshold: Option<f64>,
        threads: Option<usize>,
    ) -> AnalysisOptions {
        let defaults = AnalysisOptions::default();
        let threads = match threads.unwrap_or(self.threads) {
            0 => defaults.threads,
            n => n,
        };
        AnalysisOptions::new(
            coverage_threshold.unwrap_or(self.coverage_threshold),
            proportion_threshold.unwrap_or(self.proportion_threshold),
            threads,
        )
    }
}
