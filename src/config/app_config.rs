use crate::analytics::DEFAULT_MONTHS_AHEAD;
use crate::models::DEFAULT_CURRENCY;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

//application settings, every field optional in the json file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    //directory holding the csv tables
    pub data_dir: PathBuf,

    //currency for new accounts when none is given
    pub default_currency: String,

    //forecast horizon when the caller gives none or a non-positive one
    pub forecast_months: i32,

    //log filter used when neither RUST_LOG nor --verbose is set
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            data_dir: PathBuf::from("data"),
            default_currency: DEFAULT_CURRENCY.to_string(),
            forecast_months: DEFAULT_MONTHS_AHEAD,
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    //load configuration from a JSON file
    pub fn from_json_file(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = serde_json::from_str(&contents)?;
        Ok(config)
    }

    //save configuration to a JSON file
    pub fn to_json_file(&self, path: &Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    //picks the forecast horizon: a positive request wins, otherwise the configured default
    pub fn months_ahead(&self, requested: Option<i32>) -> i32 {
        match requested {
            Some(months) if months > 0 => months,
            _ => self.forecast_months,
        }
    }
}
