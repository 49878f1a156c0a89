//! TOML configuration for the `hecon` binary.
//!
//! Every table is optional and every key defaults:
//!
//! ```toml
//! [schema]
//! service = "FYF7Y9IB2I2II_L5JF77Y5J5F1B"
//!
//! [anonymize]
//! salt = "change-me"
//! granularity = "quarter"
//!
//! [analysis]
//! forecast_strategy = "advanced"
//! growth_estimator = "trend_slope"
//!
//! [analysis.thresholds]
//! max_alerts = 10
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use hecon_anonymize::AnonymizationPolicy;
use hecon_ingest::SchemaMapping;
use hecon_report::AnalysisOptions;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeconConfig {
    pub schema: SchemaMapping,
    pub anonymize: AnonymizeConfig,
    pub analysis: AnalysisOptions,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnonymizeConfig {
    /// Secret mixed into every identifier hash.
    pub salt: Option<String>,
    #[serde(flatten)]
    pub policy: AnonymizationPolicy,
}

impl HeconConfig {
    /// Reads `path`, or returns the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        let config = Self::from_toml(&content)
            .with_context(|| format!("parse config {}", path.display()))?;
        tracing::debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}
