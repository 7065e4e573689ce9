//! Operator configuration for link resolution.
//!
//! Every field is optional in the YAML file; missing fields fall back to
//! auto-discovery with the default timings.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// File name of the alias manifest relative to a base path.
pub const MANIFEST_RELATIVE_PATH: &str = "Data/Alias.xml";

/// Errors raised while loading or validating a [`ResolverConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Read {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The config file is not valid YAML for this schema.
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        /// Path that was parsed.
        path: PathBuf,
        /// Underlying YAML error.
        source: serde_yaml::Error,
    },
    /// A field holds a value the resolver cannot work with.
    #[error("invalid value for {field}: {reason}")]
    Invalid {
        /// Offending field name.
        field: &'static str,
        /// Why it was rejected.
        reason: String,
    },
}

/// Resolver options, read once per invocation and passed explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResolverConfig {
    /// Use `base_path`/`manifest_path` instead of probing.
    pub use_override: bool,
    /// Base path under which the output is deployed.
    pub base_path: Option<String>,
    /// Absolute path of the alias manifest.
    pub manifest_path: Option<String>,
    /// Extension used when a manifest link has none of the allowed ones.
    pub default_extension: String,
    /// Lifetime of a parsed manifest, in seconds.
    pub cache_ttl_secs: u64,
    /// Timeout for each discovery probe, in milliseconds.
    pub probe_timeout_ms: u64,
    /// Pause between discovery probes, in milliseconds.
    pub probe_delay_ms: u64,
    /// Maximum number of ancestor directories probed.
    pub max_probe_depth: usize,
    /// Timeout for fetching the manifest itself, in milliseconds.
    pub manifest_timeout_ms: u64,
    /// Largest manifest body accepted, in bytes.
    pub max_manifest_bytes: u64,
    /// Refetch a cached manifest once when a lookup misses against it.
    pub refetch_on_miss: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            use_override: false,
            base_path: None,
            manifest_path: None,
            default_extension: "htm".to_string(),
            cache_ttl_secs: 600,
            probe_timeout_ms: 2_000,
            probe_delay_ms: 30,
            max_probe_depth: 6,
            manifest_timeout_ms: 4_000,
            max_manifest_bytes: 2 * 1024 * 1024,
            refetch_on_miss: true,
        }
    }
}

impl ResolverConfig {
    /// Loads a config from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or validated.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
        let config: Self = serde_yaml::from_str(&content)
            .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })?;
        config.validate()?;
        Ok(config)
    }

    /// Loads the config from `path` (or `CSHLINK_CONFIG`, or defaults) and
    /// applies environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file is named but unusable.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let from_env = std::env::var_os("CSHLINK_CONFIG").map(PathBuf::from);
        let mut config = match path.map(Path::to_path_buf).or(from_env) {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Applies `CSHLINK_*` overrides using the given variable lookup.
    pub fn apply_env<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = var("CSHLINK_USE_OVERRIDE") {
            self.use_override = matches!(value.trim(), "1" | "true" | "yes" | "on");
        }
        if let Some(value) = var("CSHLINK_BASE_PATH").filter(|v| !v.trim().is_empty()) {
            self.base_path = Some(value);
        }
        if let Some(value) = var("CSHLINK_MANIFEST_PATH").filter(|v| !v.trim().is_empty()) {
            self.manifest_path = Some(value);
        }
        if let Some(value) = var("CSHLINK_DEFAULT_EXTENSION").filter(|v| !v.trim().is_empty()) {
            self.default_extension = value.trim().to_ascii_lowercase();
        }
    }

    /// Checks that the values can drive a resolution.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_extension.is_empty()
            || !self.default_extension.chars().all(|c| c.is_ascii_alphanumeric())
        {
            return Err(ConfigError::Invalid {
                field: "default_extension",
                reason: format!("{:?} is not an alphanumeric extension", self.default_extension),
            });
        }
        if self.max_manifest_bytes == 0 {
            return Err(ConfigError::Invalid {
                field: "max_manifest_bytes",
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    /// True when the override is enabled and names at least one path.
    #[must_use]
    pub fn has_override(&self) -> bool {
        let named = |value: &Option<String>| value.as_deref().is_some_and(|v| !v.trim().is_empty());
        self.use_override && (named(&self.base_path) || named(&self.manifest_path))
    }

    /// Lifetime of a parsed manifest.
    #[must_use]
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// Timeout for a single discovery probe.
    #[must_use]
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    /// Pause between discovery probes.
    #[must_use]
    pub fn probe_delay(&self) -> Duration {
        Duration::from_millis(self.probe_delay_ms)
    }

    /// Timeout for the manifest fetch.
    #[must_use]
    pub fn manifest_timeout(&self) -> Duration {
        Duration::from_millis(self.manifest_timeout_ms)
    }
}
