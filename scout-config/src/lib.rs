//! Loader for workspace configuration with YAML + environment overlays.
//!
//! Sources are merged in the order they were added; `SCOUT__`-prefixed
//! environment variables are applied last and therefore win. Nested keys use
//! `__` as separator, e.g. `SCOUT__BROWSER__HEADLESS=true` or
//! `SCOUT__TIMEOUTS__ELEMENT_MS=8000`. String values may reference other
//! environment variables as `${VAR}`.
use config::{Config, ConfigError, Environment, File};
use scout_common::ScoutConfig;
use serde_json::Value;
use std::path::{Path, PathBuf};

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;
const ENV_PREFIX: &str = "SCOUT";

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => cur.clone(),
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

/// `<config_dir>/scout/scout.yaml`, if the platform has a config directory.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("scout").join("scout.yaml"))
}

/// Builder hides the `config` crate wiring (YAML + env overrides).
pub struct ScoutConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
}

impl Default for ScoutConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoutConfigLoader {
    /// Start empty; every field falls back to [`ScoutConfig::default`].
    ///
    /// ```
    /// use scout_config::ScoutConfigLoader;
    ///
    /// let config = ScoutConfigLoader::new()
    ///     .with_yaml_str("scenarios:\n  top_n: 5")
    ///     .load()
    ///     .expect("valid config");
    ///
    /// assert_eq!(config.scenarios.top_n, 5);
    /// assert_eq!(config.scenarios.page_bound, 5);
    /// ```
    pub fn new() -> Self {
        Self {
            builder: Config::builder(),
        }
    }

    /// Attach a YAML/TOML/JSON file; the `config` crate infers format by suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Like [`with_file`](Self::with_file) but a missing file is not an error.
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Allow tests/CLI to merge inline YAML snippets.
    ///
    /// ```
    /// use scout_common::OutputFormat;
    /// use scout_config::ScoutConfigLoader;
    ///
    /// let cfg = ScoutConfigLoader::new()
    ///     .with_yaml_str(
    ///         r#"
    /// browser:
    ///   headless: true
    /// table:
    ///   columns:
    ///     percent_change_index: 6
    /// output: json
    /// "#,
    ///     )
    ///     .load()
    ///     .unwrap();
    ///
    /// assert!(cfg.browser.headless);
    /// assert_eq!(cfg.table.columns.percent_change_index, Some(6));
    /// assert_eq!(cfg.output, OutputFormat::Json);
    /// ```
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, config::FileFormat::Yaml));
        self
    }

    /// Consume the builder and deserialize the merged sources into strongly typed config.
    ///
    /// ```
    /// use scout_config::ScoutConfigLoader;
    ///
    /// unsafe { std::env::set_var("SCOUT_DOC_BASE", "https://example.test/"); }
    ///
    /// let config = ScoutConfigLoader::new()
    ///     .with_yaml_str("browser:\n  base_url: \"${SCOUT_DOC_BASE}\"")
    ///     .load()
    ///     .expect("valid configuration");
    ///
    /// assert_eq!(config.browser.base_url, "https://example.test/");
    ///
    /// unsafe { std::env::remove_var("SCOUT_DOC_BASE"); }
    /// ```
    pub fn load(self) -> Result<ScoutConfig, ConfigError> {
        let cfg = self
            .builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        let typed: ScoutConfig =
            serde_json::from_value(v).map_err(|e| ConfigError::Message(e.to_string()))?;

        validate(&typed)?;
        Ok(typed)
    }
}

fn validate(cfg: &ScoutConfig) -> Result<(), ConfigError> {
    if cfg.scenarios.page_bound == 0 {
        return Err(ConfigError::Message(
            "scenarios.page_bound must be at least 1".into(),
        ));
    }
    if !cfg.scenarios.threshold_millions.is_finite() {
        return Err(ConfigError::Message(
            "scenarios.threshold_millions must be a finite number".into(),
        ));
    }
    let cols = &cfg.table.columns;
    if cols.name_index == cols.market_cap_index {
        return Err(ConfigError::Message(
            "table.columns: name and market cap must be different cells".into(),
        ));
    }
    Ok(())
}
