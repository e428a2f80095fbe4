pub mod error;

use std::{
    env, fs,
    path::{Path, PathBuf},
};

use ticker_core::TickerConfig;

use crate::util::{duration_to_millis, parse_duration};
use crate::validation::{ConfigWarnings, collect_warnings};
use error::ConfigLoadError;

const ENV_CONFIG_PATH: &str = "TICKER_CONFIG_PATH";
const ENV_CONFIG_JSON: &str = "TICKER_CONFIG_JSON";
const ENV_SPEED: &str = "TICKER_SPEED";
const ENV_SPACING: &str = "TICKER_SPACING";
const ENV_HEIGHT: &str = "TICKER_HEIGHT";
const ENV_RESUME_DELAY: &str = "TICKER_RESUME_DELAY";
const ENV_FRAME_RATE: &str = "TICKER_FRAME_RATE";

const DEFAULT_CANDIDATES: &[&str] = &[
    "ticker.toml",
    "ticker.json",
    "config/ticker.toml",
    "config/ticker.json",
];

/// Source that produced the base configuration (before env overrides).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConfigSource {
    #[default]
    Default,
    /// Path handed in by the caller, e.g. a `--config` flag.
    Explicit(PathBuf),
    EnvPath(PathBuf),
    EnvInline,
    File(PathBuf),
}

/// The `TICKER_*` variables the loader consults, captured up front so
/// loading is deterministic and testable without touching the process env.
#[derive(Debug, Clone, Default)]
pub struct EnvSource {
    pub config_path: Option<String>,
    pub config_json: Option<String>,
    pub speed: Option<String>,
    pub spacing: Option<String>,
    pub height: Option<String>,
    pub resume_delay: Option<String>,
    pub frame_rate: Option<String>,
}

impl EnvSource {
    pub fn from_process() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let pairs: Vec<(String, String)> = pairs
            .into_iter()
            .map(|(key, value)| (key.as_ref().to_string(), value.into()))
            .collect();
        Self::from_lookup(|key| {
            pairs
                .iter()
                .find(|(candidate, _)| candidate == key)
                .map(|(_, value)| value.clone())
        })
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|raw| !raw.trim().is_empty());
        Self {
            config_path: non_empty(ENV_CONFIG_PATH),
            config_json: non_empty(ENV_CONFIG_JSON),
            speed: non_empty(ENV_SPEED),
            spacing: non_empty(ENV_SPACING),
            height: non_empty(ENV_HEIGHT),
            resume_delay: non_empty(ENV_RESUME_DELAY),
            frame_rate: non_empty(ENV_FRAME_RATE),
        }
    }
}

/// Effective configuration plus where it came from.
#[derive(Debug, Clone)]
pub struct ConfigLoad {
    pub config: TickerConfig,
    pub source: ConfigSource,
    /// Names of the environment variables that overrode file/default values.
    pub overrides: Vec<&'static str>,
    pub warnings: ConfigWarnings,
}

#[derive(Debug, Clone)]
pub struct TickerConfigLoader {
    env: EnvSource,
    base_dir: PathBuf,
    explicit_path: Option<PathBuf>,
}

impl Default for TickerConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl TickerConfigLoader {
    pub fn new() -> Self {
        Self {
            env: EnvSource::from_process(),
            base_dir: PathBuf::from("."),
            explicit_path: None,
        }
    }

    pub fn with_env(mut self, env: EnvSource) -> Self {
        self.env = env;
        self
    }

    /// Directory the default candidate files are resolved against.
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = dir.into();
        self
    }

    /// Use this file and skip the env/default lookup for the base config.
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.explicit_path = Some(path.into());
        self
    }

    /// Resolve the configuration.
    ///
    /// Evaluation order for the base config:
    /// 1) an explicit path from [`with_path`](Self::with_path),
    /// 2) `$TICKER_CONFIG_PATH` (TOML or JSON file),
    /// 3) `$TICKER_CONFIG_JSON` (inline JSON),
    /// 4) the first existing default file,
    /// 5) defaults.
    ///
    /// `TICKER_SPEED`, `TICKER_SPACING`, `TICKER_HEIGHT`,
    /// `TICKER_RESUME_DELAY` and `TICKER_FRAME_RATE` are applied on top.
    pub fn load(&self) -> Result<ConfigLoad, ConfigLoadError> {
        let (mut config, source) = self.resolve_base()?;
        let overrides = self.apply_overrides(&mut config)?;
        config.validate()?;
        let warnings = collect_warnings(&config);

        tracing::debug!(
            target: "ticker::config",
            ?source,
            ?overrides,
            warnings = warnings.len(),
            "ticker config resolved"
        );
        for warning in warnings.iter() {
            tracing::warn!(target: "ticker::config", "{warning}");
        }

        Ok(ConfigLoad {
            config,
            source,
            overrides,
            warnings,
        })
    }

    fn resolve_base(&self) -> Result<(TickerConfig, ConfigSource), ConfigLoadError> {
        if let Some(path) = &self.explicit_path {
            let config = load_from_file(path)?;
            return Ok((config, ConfigSource::Explicit(path.clone())));
        }

        if let Some(raw) = &self.env.config_path {
            let path = PathBuf::from(raw.trim());
            let config = load_from_file(&path)?;
            return Ok((config, ConfigSource::EnvPath(path)));
        }

        if let Some(raw) = &self.env.config_json {
            let config = parse_json(raw, ENV_CONFIG_JSON)?;
            return Ok((config, ConfigSource::EnvInline));
        }

        if let Some(path) = self.find_default_file() {
            let config = load_from_file(&path)?;
            return Ok((config, ConfigSource::File(path)));
        }

        Ok((TickerConfig::default(), ConfigSource::Default))
    }

    fn apply_overrides(
        &self,
        config: &mut TickerConfig,
    ) -> Result<Vec<&'static str>, ConfigLoadError> {
        let mut applied = Vec::new();

        if let Some(raw) = &self.env.speed {
            config.speed = parse_f32(ENV_SPEED, raw)?;
            applied.push(ENV_SPEED);
        }
        if let Some(raw) = &self.env.spacing {
            config.spacing = parse_f32(ENV_SPACING, raw)?;
            applied.push(ENV_SPACING);
        }
        if let Some(raw) = &self.env.height {
            config.height = parse_f32(ENV_HEIGHT, raw)?;
            applied.push(ENV_HEIGHT);
        }
        if let Some(raw) = &self.env.resume_delay {
            let delay = parse_duration(raw).map_err(|reason| {
                ConfigLoadError::InvalidOverride {
                    key: ENV_RESUME_DELAY,
                    value: raw.clone(),
                    reason,
                }
            })?;
            config.resume_delay_ms = duration_to_millis(delay);
            applied.push(ENV_RESUME_DELAY);
        }
        if let Some(raw) = &self.env.frame_rate {
            config.frame_rate_hz = raw.trim().parse::<u32>().map_err(|err| {
                ConfigLoadError::InvalidOverride {
                    key: ENV_FRAME_RATE,
                    value: raw.clone(),
                    reason: err.to_string(),
                }
            })?;
            applied.push(ENV_FRAME_RATE);
        }

        Ok(applied)
    }

    fn find_default_file(&self) -> Option<PathBuf> {
        DEFAULT_CANDIDATES
            .iter()
            .map(|candidate| self.base_dir.join(candidate))
            .find(|path| path.exists())
    }
}

pub fn load_from_file(path: &Path) -> Result<TickerConfig, ConfigLoadError> {
    let contents =
        fs::read_to_string(path).map_err(|source| ConfigLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    let origin = path.display().to_string();

    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => parse_json(&contents, &origin),
        Some("toml") | Some("tml") => toml::from_str(&contents)
            .map_err(|source| ConfigLoadError::Toml { origin, source }),
        _ => parse_from_str(&contents, &origin),
    }
}

/// Try TOML first, then JSON.
pub fn parse_from_str(
    contents: &str,
    origin: &str,
) -> Result<TickerConfig, ConfigLoadError> {
    toml::from_str(contents).or_else(|toml_err| {
        serde_json::from_str(contents).map_err(|json_err| {
            ConfigLoadError::Unparseable {
                origin: origin.to_string(),
                toml_error: toml_err.to_string(),
                json_error: json_err.to_string(),
            }
        })
    })
}

pub fn parse_json(raw: &str, origin: &str) -> Result<TickerConfig, ConfigLoadError> {
    serde_json::from_str(raw).map_err(|source| ConfigLoadError::Json {
        origin: origin.to_string(),
        source,
    })
}

pub fn to_toml_string(config: &TickerConfig) -> Result<String, ConfigLoadError> {
    Ok(toml::to_string(config)?)
}

fn parse_f32(key: &'static str, raw: &str) -> Result<f32, ConfigLoadError> {
    raw.trim()
        .parse::<f32>()
        .map_err(|err| ConfigLoadError::InvalidOverride {
            key,
            value: raw.to_string(),
            reason: err.to_string(),
        })
}
