use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::catalog::Locale;
use crate::error::{GuiaError, Result};
use crate::search::ScoreWeights;

/// Project-local config file name, looked up in the working directory.
pub const PROJECT_CONFIG_FILE: &str = "guia.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub controller: ControllerConfig,
    #[serde(default)]
    pub geolocation: GeolocationConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    pub fn load(explicit_path: Option<&Path>, project_root: &Path) -> Result<Self> {
        let mut config = Self::default();

        let explicit = explicit_path
            .map(PathBuf::from)
            .or_else(|| std::env::var("GUIA_CONFIG").ok().map(PathBuf::from));

        if let Some(path) = explicit {
            match Self::load_patch(&path)? {
                Some(patch) => config.merge_patch(patch),
                None => {
                    return Err(GuiaError::MissingConfig(format!(
                        "config file {} not found",
                        path.display()
                    )));
                }
            }
        } else {
            if let Some(global) = Self::load_global()? {
                config.merge_patch(global);
            }
            if let Some(project) = Self::load_patch(&project_root.join(PROJECT_CONFIG_FILE))? {
                config.merge_patch(project);
            }
        }

        config.apply_env_overrides()?;

        Ok(config)
    }

    /// Parse a full or partial TOML document over the defaults.
    pub fn from_toml(raw: &str) -> Result<Self> {
        let patch: ConfigPatch =
            toml::from_str(raw).map_err(|err| GuiaError::Config(format!("parse config: {err}")))?;
        let mut config = Self::default();
        config.merge_patch(patch);
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|err| GuiaError::Config(format!("serialize config: {err}")))
    }

    fn load_global() -> Result<Option<ConfigPatch>> {
        let Some(dir) = dirs::config_dir() else {
            return Ok(None);
        };
        Self::load_patch(&dir.join("guia/config.toml"))
    }

    fn load_patch(path: &Path) -> Result<Option<ConfigPatch>> {
        if !path.exists() {
            return Ok(None);
        }

        let raw = std::fs::read_to_string(path)
            .map_err(|err| GuiaError::Config(format!("read config {}: {err}", path.display())))?;
        let patch = toml::from_str(&raw)
            .map_err(|err| GuiaError::Config(format!("parse config {}: {err}", path.display())))?;
        Ok(Some(patch))
    }

    fn merge_patch(&mut self, patch: ConfigPatch) {
        if let Some(patch) = patch.search {
            self.search.merge(patch);
        }
        if let Some(patch) = patch.controller {
            self.controller.merge(patch);
        }
        if let Some(patch) = patch.geolocation {
            self.geolocation.merge(patch);
        }
        if let Some(patch) = patch.output {
            self.output.merge(patch);
        }
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Some(value) = env_string("GUIA_LOCALE") {
            self.search.default_locale = value.parse()?;
        }
        if let Some(value) = env_u32("GUIA_WEIGHT_NAME")? {
            self.search.weights.name = value;
        }
        if let Some(value) = env_u32("GUIA_WEIGHT_DESCRIPTION")? {
            self.search.weights.description = value;
        }
        if let Some(value) = env_u32("GUIA_WEIGHT_TAGS")? {
            self.search.weights.tags = value;
        }
        if let Some(value) = env_u32("GUIA_WEIGHT_ADDRESS")? {
            self.search.weights.address = value;
        }
        if let Some(value) = env_u32("GUIA_WEIGHT_FALLBACK")? {
            self.search.weights.fallback = value;
        }

        if let Some(value) = env_u64("GUIA_DEBOUNCE_MS")? {
            self.controller.debounce_ms = value;
        }

        if let Some(value) = env_u64("GUIA_GEO_TIMEOUT_MS")? {
            self.geolocation.timeout_ms = value;
        }
        if let Some(value) = env_u64("GUIA_GEO_MAX_AGE_MS")? {
            self.geolocation.maximum_age_ms = value;
        }

        if let Some(value) = env_string("GUIA_OUTPUT_FORMAT") {
            self.output.format = parse_output_format(&value)?;
        }
        if let Some(value) = env_u32("GUIA_OUTPUT_LIMIT")? {
            self.output.limit = value as usize;
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default)]
    pub default_locale: Locale,
    #[serde(default)]
    pub weights: ScoreWeights,
    /// Extra expansion entries per locale, merged after the built-in tables.
    #[serde(default)]
    pub extra_terms: BTreeMap<Locale, BTreeMap<String, Vec<String>>>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_locale: Locale::Es,
            weights: ScoreWeights::default(),
            extra_terms: BTreeMap::new(),
        }
    }
}

impl SearchConfig {
    fn merge(&mut self, patch: SearchPatch) {
        if let Some(value) = patch.default_locale {
            self.default_locale = value;
        }
        if let Some(weights) = patch.weights {
            if let Some(value) = weights.name {
                self.weights.name = value;
            }
            if let Some(value) = weights.description {
                self.weights.description = value;
            }
            if let Some(value) = weights.tags {
                self.weights.tags = value;
            }
            if let Some(value) = weights.address {
                self.weights.address = value;
            }
            if let Some(value) = weights.fallback {
                self.weights.fallback = value;
            }
        }
        if let Some(extra) = patch.extra_terms {
            for (locale, terms) in extra {
                self.extra_terms.entry(locale).or_default().extend(terms);
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControllerConfig {
    /// Quiet period after the last criteria change before recomputing.
    #[serde(default)]
    pub debounce_ms: u64,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self { debounce_ms: 300 }
    }
}

impl ControllerConfig {
    fn merge(&mut self, patch: ControllerPatch) {
        if let Some(value) = patch.debounce_ms {
            self.debounce_ms = value;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeolocationConfig {
    #[serde(default)]
    pub timeout_ms: u64,
    #[serde(default)]
    pub maximum_age_ms: u64,
}

impl Default for GeolocationConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 10_000,
            maximum_age_ms: 60_000,
        }
    }
}

impl GeolocationConfig {
    fn merge(&mut self, patch: GeolocationPatch) {
        if let Some(value) = patch.timeout_ms {
            self.timeout_ms = value;
        }
        if let Some(value) = patch.maximum_age_ms {
            self.maximum_age_ms = value;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Human,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
    /// Maximum rows printed by the CLI.
    #[serde(default)]
    pub limit: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Human,
            limit: 20,
        }
    }
}

impl OutputConfig {
    fn merge(&mut self, patch: OutputPatch) {
        if let Some(value) = patch.format {
            self.format = value;
        }
        if let Some(value) = patch.limit {
            self.limit = value;
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ConfigPatch {
    pub search: Option<SearchPatch>,
    pub controller: Option<ControllerPatch>,
    pub geolocation: Option<GeolocationPatch>,
    pub output: Option<OutputPatch>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct SearchPatch {
    pub default_locale: Option<Locale>,
    pub weights: Option<WeightsPatch>,
    pub extra_terms: Option<BTreeMap<Locale, BTreeMap<String, Vec<String>>>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct WeightsPatch {
    pub name: Option<u32>,
    pub description: Option<u32>,
    pub tags: Option<u32>,
    pub address: Option<u32>,
    pub fallback: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ControllerPatch {
    pub debounce_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct GeolocationPatch {
    pub timeout_ms: Option<u64>,
    pub maximum_age_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct OutputPatch {
    pub format: Option<OutputFormat>,
    pub limit: Option<usize>,
}

pub fn parse_output_format(value: &str) -> Result<OutputFormat> {
    match value.to_lowercase().as_str() {
        "human" | "text" => Ok(OutputFormat::Human),
        "json" => Ok(OutputFormat::Json),
        _ => Err(GuiaError::Config(format!(
            "invalid output format {value} (expected human|json)"
        ))),
    }
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

fn env_u32(key: &str) -> Result<Option<u32>> {
    match std::env::var(key) {
        Ok(value) => value
            .parse::<u32>()
            .map(Some)
            .map_err(|err| GuiaError::Config(format!("invalid {key} value {value}: {err}"))),
        Err(_) => Ok(None),
    }
}

fn env_u64(key: &str) -> Result<Option<u64>> {
    match std::env::var(key) {
        Ok(value) => value
            .parse::<u64>()
            .map(Some)
            .map_err(|err| GuiaError::Config(format!("invalid {key} value {value}: {err}"))),
        Err(_) => Ok(None),
    }
}
