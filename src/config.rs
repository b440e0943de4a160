use crate::query::{Airline, Cabin, Passengers, TravelPlan};
use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone)]
pub struct LoadedPlan {
    pub path: PathBuf,
    pub config: PlanConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlanConfig {
    pub plan: PlanMeta,
    #[serde(default)]
    pub passengers: Passengers,
    #[serde(default)]
    pub options: PlanOptions,
}

impl PlanConfig {
    pub fn validate(&self) -> Result<()> {
        if self.plan.key.trim().is_empty() {
            bail!("plan.key must not be empty");
        }
        if self.plan.departure_dates.is_empty() {
            bail!("plan.departure_dates must list at least one date");
        }
        if self.options.timeout_secs == 0 {
            bail!("options.timeout_secs must be greater than zero");
        }

        Ok(())
    }

    pub fn travel_plan(&self) -> TravelPlan {
        TravelPlan {
            origin: self.plan.origin.clone(),
            destination: self.plan.destination.clone(),
            departure_dates: self.plan.departure_dates.clone(),
            return_dates: self.plan.return_dates.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlanMeta {
    pub key: String,
    pub origin: String,
    pub destination: String,
    pub departure_dates: Vec<String>,
    #[serde(default)]
    pub return_dates: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlanOptions {
    #[serde(default)]
    pub cabin: Cabin,
    #[serde(default)]
    pub airline: Airline,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for PlanOptions {
    fn default() -> Self {
        Self {
            cabin: Cabin::default(),
            airline: Airline::default(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

pub fn load_plans_from_dir(config_dir: &Path) -> Result<Vec<LoadedPlan>> {
    if !config_dir.exists() {
        bail!("config dir does not exist: {}", config_dir.display());
    }

    let mut loaded = Vec::new();
    for entry in WalkDir::new(config_dir) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) != Some("toml") {
            continue;
        }

        loaded.push(load_plan_file(path)?);
    }

    loaded.sort_by(|a, b| a.config.plan.key.cmp(&b.config.plan.key));
    Ok(loaded)
}

pub fn load_plan_file(config_path: &Path) -> Result<LoadedPlan> {
    let text = std::fs::read_to_string(config_path)
        .with_context(|| format!("failed to read plan config: {}", config_path.display()))?;
    let config: PlanConfig = toml::from_str(&text)
        .with_context(|| format!("failed to parse toml in {}", config_path.display()))?;
    config
        .validate()
        .with_context(|| format!("invalid plan config {}", config_path.display()))?;

    Ok(LoadedPlan {
        path: config_path.to_path_buf(),
        config,
    })
}

fn default_timeout_secs() -> u64 {
    10
}
