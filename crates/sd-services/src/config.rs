use sd_catalog::{CatalogOverride, SmellCatalog, DEFAULT_WEIGHT};
use sd_report::ScoringConfig;
use sd_types::{EngineError, EngineResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Environment variable that overrides `analyzer.endpoint`
pub const ENV_ANALYZER_URL: &str = "SMELLDECK_ANALYZER_URL";

/// Engine configuration, usually loaded from `smelldeck.toml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub analyzer: AnalyzerConfig,
    #[serde(default)]
    pub extractor: ExtractorConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default = "default_weight")]
    pub default_weight: f64,
    #[serde(default)]
    pub categories: BTreeMap<String, CatalogOverride>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            default_weight: default_weight(),
            categories: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_form_field")]
    pub form_field: String,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
            form_field: default_form_field(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractorConfig {
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_recent_limit")]
    pub recent_limit: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            recent_limit: default_recent_limit(),
        }
    }
}

fn default_weight() -> f64 {
    DEFAULT_WEIGHT
}

fn default_endpoint() -> String {
    "http://localhost:5000/upload".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_form_field() -> String {
    "file".to_string()
}

fn default_extensions() -> Vec<String> {
    vec![".java".to_string()]
}

fn default_recent_limit() -> usize {
    sd_portfolio::DEFAULT_RECENT_LIMIT
}

impl EngineConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(raw: &str) -> EngineResult<Self> {
        let config: Self =
            toml::from_str(raw).map_err(|e| EngineError::ConfigError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file, then apply environment overrides
    pub fn load(path: &Path) -> EngineResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&raw)?
            .with_analyzer_endpoint(std::env::var(ENV_ANALYZER_URL).ok());
        config.validate()?;
        Ok(config)
    }

    /// Replace the analyzer endpoint when an override is present
    pub fn with_analyzer_endpoint(mut self, endpoint: Option<String>) -> Self {
        if let Some(endpoint) = endpoint.filter(|e| !e.trim().is_empty()) {
            self.analyzer.endpoint = endpoint;
        }
        self
    }

    pub fn validate(&self) -> EngineResult<()> {
        if !(self.scoring.impact_per_file.is_finite() && self.scoring.impact_per_file > 0.0) {
            return Err(EngineError::ConfigError(
                "scoring.impact_per_file must be positive".to_string(),
            ));
        }
        if !(self.scoring.min_score > 0.0 && self.scoring.min_score < sd_report::MAX_SCORE) {
            return Err(EngineError::ConfigError(
                "scoring.min_score must be in (0, 100)".to_string(),
            ));
        }
        if self.analyzer.timeout_secs == 0 {
            return Err(EngineError::ConfigError(
                "analyzer.timeout_secs must be at least 1".to_string(),
            ));
        }
        if self.extractor.extensions.is_empty() {
            return Err(EngineError::ConfigError(
                "extractor.extensions must list at least one extension".to_string(),
            ));
        }
        Ok(())
    }

    /// Built-in catalog with the configured overrides merged in
    pub fn build_catalog(&self) -> EngineResult<SmellCatalog> {
        SmellCatalog::builtin()
            .with_default_weight(self.catalog.default_weight)?
            .with_overrides(&self.catalog.categories)
    }
}
