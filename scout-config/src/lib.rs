//! Loader for Scout configuration with YAML + environment overlays.
//!
//! Sources merge in the order they are attached; `SCOUT_`-prefixed
//! environment variables are applied last and therefore win. Nested keys use
//! a double underscore (`SCOUT_RETRY__MAX_ATTEMPTS=5`). String values may carry
//! `${VAR}` placeholders, expanded after merging.
use config::{Config, Environment, File, FileFormat};
use scout_common::observability::{LogConfig, LogFormat};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::time::Duration;

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;
const ENV_PREFIX: &str = "SCOUT";

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

#[derive(Debug, thiserror::Error)]
pub enum ScoutConfigError {
    #[error(transparent)]
    Source(#[from] config::ConfigError),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Top-level configuration handed to the platform registry at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoutConfig {
    /// Registry key of the platform used when none is given explicitly.
    pub platform: String,
    /// Upper bound on comments attached to a record.
    pub comments_limit: usize,
    pub http: HttpSettings,
    pub retry: RetrySettings,
    pub geeksforgeeks: GeeksforGeeksSettings,
    pub logging: LoggingSettings,
}

impl Default for ScoutConfig {
    fn default() -> Self {
        Self {
            platform: "geeksforgeeks".into(),
            comments_limit: 5,
            http: HttpSettings::default(),
            retry: RetrySettings::default(),
            geeksforgeeks: GeeksforGeeksSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    /// Per-attempt request timeout.
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
    pub user_agent: String,
}

impl HttpSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            connect_timeout_secs: 5,
            user_agent: DEFAULT_USER_AGENT.into(),
        }
    }
}

/// Backoff schedule for page fetches, in milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    pub max_attempts: u32,
    pub multiplier_ms: u64,
    pub min_backoff_ms: u64,
    pub max_backoff_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            multiplier_ms: 1_000,
            min_backoff_ms: 4_000,
            max_backoff_ms: 10_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeeksforGeeksSettings {
    /// Scheme + host of the problem site, without a trailing slash.
    pub site_base: String,
    /// Base path of the paginated comment endpoint.
    pub comments_api: String,
}

impl Default for GeeksforGeeksSettings {
    fn default() -> Self {
        Self {
            site_base: "https://www.geeksforgeeks.org".into(),
            comments_api: "https://commentapi.geeksforgeeks.org/api/vr/1/comment".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub dir: Option<PathBuf>,
    pub format: LogFormat,
    pub stderr: bool,
    pub filter: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            dir: None,
            format: LogFormat::Text,
            stderr: false,
            filter: "info".into(),
        }
    }
}

impl LoggingSettings {
    pub fn to_log_config(&self, app_name: &str) -> LogConfig {
        LogConfig {
            app_name: app_name.to_string(),
            log_dir: self.dir.clone(),
            emit_stderr: self.stderr,
            format: self.format,
            default_filter: self.filter.clone(),
        }
    }
}

impl ScoutConfig {
    fn validate(&self) -> Result<(), ScoutConfigError> {
        if self.retry.max_attempts == 0 {
            return Err(ScoutConfigError::Invalid(
                "retry.max_attempts must be at least 1".into(),
            ));
        }
        if self.retry.min_backoff_ms > self.retry.max_backoff_ms {
            return Err(ScoutConfigError::Invalid(
                "retry.min_backoff_ms exceeds retry.max_backoff_ms".into(),
            ));
        }
        if self.http.timeout_secs == 0 {
            return Err(ScoutConfigError::Invalid(
                "http.timeout_secs must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// `<config dir>/scout/scout.yaml`, when the platform has a config directory.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("scout").join("scout.yaml"))
}

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
    /// Start from built-in defaults; attach files or snippets before [`load`](Self::load).
    ///
    /// ```
    /// use scout_config::ScoutConfigLoader;
    ///
    /// let config = ScoutConfigLoader::new()
    ///     .with_yaml_str("comments_limit: 3")
    ///     .load()
    ///     .expect("valid config");
    ///
    /// assert_eq!(config.comments_limit, 3);
    /// assert_eq!(config.retry.max_attempts, 3);
    /// ```
    pub fn new() -> Self {
        Self {
            builder: Config::builder(),
        }
    }

    /// Attach a YAML/TOML/JSON file that must exist; the format is inferred by suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Attach a file that is skipped silently when missing.
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Allow tests/CLI to merge inline YAML snippets.
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self.builder.add_source(File::from_str(yaml, FileFormat::Yaml));
        self
    }

    /// Merge the attached sources, overlay `SCOUT_` environment variables,
    /// expand `${VAR}` placeholders and validate.
    ///
    /// ```
    /// use scout_config::ScoutConfigLoader;
    ///
    /// unsafe { std::env::set_var("SCOUT_DOC_SITE", "http://localhost:8080"); }
    ///
    /// let config = ScoutConfigLoader::new()
    ///     .with_yaml_str(r#"
    /// geeksforgeeks:
    ///   site_base: "${SCOUT_DOC_SITE}"
    /// "#)
    ///     .load()
    ///     .expect("valid configuration");
    ///
    /// assert_eq!(config.geeksforgeeks.site_base, "http://localhost:8080");
    ///
    /// unsafe { std::env::remove_var("SCOUT_DOC_SITE"); }
    /// ```
    pub fn load(self) -> Result<ScoutConfig, ScoutConfigError> {
        let cfg = self
            .builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        let typed: ScoutConfig = serde_json::from_value(v)
            .map_err(|e| config::ConfigError::Message(e.to_string()))?;
        typed.validate()?;

        Ok(typed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn expands_simple_string() {
        temp_env::with_var("SCOUT_TEST_HOST", Some("example.org"), || {
            let mut v = json!("https://${SCOUT_TEST_HOST}/problems/");
            expand_env_in_value(&mut v);
            assert_eq!(v, json!("https://example.org/problems/"));
        });
    }

    #[test]
    fn expands_nested_values() {
        temp_env::with_vars([("A_HOST", Some("a")), ("B_PATH", Some("b"))], || {
            let mut v = json!({ "site": "${A_HOST}", "paths": ["/${B_PATH}", 7] });
            expand_env_in_value(&mut v);
            assert_eq!(v, json!({ "site": "a", "paths": ["/b", 7] }));
        });
    }

    #[test]
    fn stops_on_cycles() {
        temp_env::with_vars([("CYC_A", Some("${CYC_B}")), ("CYC_B", Some("${CYC_A}"))], || {
            let mut v = json!("x=${CYC_A}");
            expand_env_in_value(&mut v);
            assert!(v.as_str().unwrap().contains("${"));
        });
    }

    #[test]
    fn unknown_vars_are_left_as_is() {
        let mut v = json!("hi-${SCOUT_DOES_NOT_EXIST}");
        expand_env_in_value(&mut v);
        assert_eq!(v, json!("hi-${SCOUT_DOES_NOT_EXIST}"));
    }

    #[test]
    fn defaults_match_documented_policy() {
        let cfg = ScoutConfig::default();
        assert_eq!(cfg.comments_limit, 5);
        assert_eq!(cfg.http.timeout(), Duration::from_secs(10));
        assert_eq!(cfg.retry.min_backoff_ms, 4_000);
        assert_eq!(cfg.retry.max_backoff_ms, 10_000);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn rejects_zero_attempts() {
        let mut cfg = ScoutConfig::default();
        cfg.retry.max_attempts = 0;
        assert!(matches!(cfg.validate(), Err(ScoutConfigError::Invalid(_))));
    }

    #[test]
    fn logging_settings_map_to_log_config() {
        let settings = LoggingSettings {
            stderr: true,
            format: LogFormat::Json,
            ..LoggingSettings::default()
        };
        let log = settings.to_log_config("scout");
        assert!(log.emit_stderr);
        assert_eq!(log.format, LogFormat::Json);
        assert_eq!(log.default_filter, "info");
    }
}
