use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::filters::FilterLimits;
use crate::sql::Backend;
use crate::utils::file::expand_path;

use super::cli::CliConfig;
use super::constants::{APP_DOT_FOLDER, CONFIG_FILE_NAME, DEFAULT_MAX_PAGE_LIMIT, DEFAULT_PAGE_LIMIT};

// =============================================================================
// File Config (all fields optional, merged across files)
// =============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct LimitsFileConfig {
    pub max_filter_json_bytes: Option<usize>,
    pub max_conditions: Option<usize>,
    pub max_depth: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PagingFileConfig {
    pub default_limit: Option<u32>,
    pub max_limit: Option<u32>,
}

/// File-based configuration (JSON)
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub dialect: Option<Backend>,
    pub limits: Option<LimitsFileConfig>,
    pub paging: Option<PagingFileConfig>,
    #[serde(flatten)]
    pub extra: serde_json::Value,
}

impl FileConfig {
    /// Load configuration from a JSON file
    fn load_from_file(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "Loading config file");
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        tracing::trace!(config = ?config, "Parsed config file");
        Ok(config)
    }

    /// Warn about unknown fields in the config
    fn warn_unknown_fields(&self) {
        if let serde_json::Value::Object(map) = &self.extra
            && !map.is_empty()
        {
            let keys_str: String = map
                .keys()
                .map(|k| k.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            tracing::warn!(
                fields = %keys_str,
                "Unknown fields in config file (possible typos)"
            );
        }
    }

    /// Merge another FileConfig into this one (other takes precedence)
    fn merge(&mut self, other: FileConfig) {
        if other.dialect.is_some() {
            tracing::trace!(dialect = ?other.dialect, "Merging dialect");
            self.dialect = other.dialect;
        }

        if let Some(limits) = other.limits {
            let current = self.limits.get_or_insert_with(LimitsFileConfig::default);
            if limits.max_filter_json_bytes.is_some() {
                current.max_filter_json_bytes = limits.max_filter_json_bytes;
            }
            if limits.max_conditions.is_some() {
                current.max_conditions = limits.max_conditions;
            }
            if limits.max_depth.is_some() {
                current.max_depth = limits.max_depth;
            }
        }

        if let Some(paging) = other.paging {
            let current = self.paging.get_or_insert_with(PagingFileConfig::default);
            if paging.default_limit.is_some() {
                tracing::trace!(default_limit = ?paging.default_limit, "Merging paging.default_limit");
                current.default_limit = paging.default_limit;
            }
            if paging.max_limit.is_some() {
                tracing::trace!(max_limit = ?paging.max_limit, "Merging paging.max_limit");
                current.max_limit = paging.max_limit;
            }
        }
    }
}

// =============================================================================
// Engine Config (final, merged)
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagingConfig {
    pub default_limit: u32,
    pub max_limit: u32,
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_PAGE_LIMIT,
            max_limit: DEFAULT_MAX_PAGE_LIMIT,
        }
    }
}

impl PagingConfig {
    /// Requested limit, defaulted and clamped to `max_limit`
    pub fn resolve_limit(&self, requested: Option<u32>) -> u32 {
        requested.unwrap_or(self.default_limit).min(self.max_limit)
    }
}

/// Final merged engine configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineConfig {
    pub dialect: Backend,
    pub limits: FilterLimits,
    pub paging: PagingConfig,
}

impl EngineConfig {
    /// Load configuration from all sources
    ///
    /// Priority (lowest to highest):
    /// 1. Defaults
    /// 2. Profile directory config (~/.tabula/tabula.json)
    /// 3. Local directory config OR CLI-specified config path
    /// 4. CLI arguments (which include env var fallbacks via clap)
    pub fn load(cli: &CliConfig) -> Result<Self> {
        tracing::debug!("Loading engine configuration");
        tracing::trace!(cli = ?cli, "CLI config");

        let profile_path = get_profile_config_path().filter(|path| path.exists());

        let overlay_path = if let Some(ref path) = cli.config {
            let expanded = expand_path(&path.to_string_lossy());
            if !expanded.exists() {
                anyhow::bail!("Config file not found: {}", expanded.display());
            }
            Some(expanded)
        } else {
            let local = PathBuf::from(CONFIG_FILE_NAME);
            if local.exists() { Some(local) } else { None }
        };

        Self::load_from_paths(profile_path.as_deref(), overlay_path.as_deref(), cli)
    }

    /// Layer the given config files (either may be absent) under the CLI values
    pub fn load_from_paths(profile: Option<&Path>, overlay: Option<&Path>, cli: &CliConfig) -> Result<Self> {
        let mut file_config = FileConfig::default();
        let mut found_configs: Vec<String> = Vec::new();

        for path in [profile, overlay].into_iter().flatten() {
            let config = FileConfig::load_from_file(path)?;
            config.warn_unknown_fields();
            file_config.merge(config);
            found_configs.push(path.display().to_string());
        }

        tracing::debug!(configs = ?found_configs, "Config files loaded");

        let file_limits = file_config.limits.unwrap_or_default();
        let file_paging = file_config.paging.unwrap_or_default();
        let default_limits = FilterLimits::default();
        let default_paging = PagingConfig::default();

        let config = Self {
            dialect: cli.dialect.or(file_config.dialect).unwrap_or_default(),
            limits: FilterLimits {
                max_filter_json_bytes: file_limits
                    .max_filter_json_bytes
                    .unwrap_or(default_limits.max_filter_json_bytes),
                max_conditions: file_limits.max_conditions.unwrap_or(default_limits.max_conditions),
                max_depth: file_limits.max_depth.unwrap_or(default_limits.max_depth),
            },
            paging: PagingConfig {
                default_limit: cli
                    .default_limit
                    .or(file_paging.default_limit)
                    .unwrap_or(default_paging.default_limit),
                max_limit: cli
                    .max_limit
                    .or(file_paging.max_limit)
                    .unwrap_or(default_paging.max_limit),
            },
        };

        config.validate()?;
        tracing::debug!(
            dialect = %config.dialect,
            default_limit = config.paging.default_limit,
            max_limit = config.paging.max_limit,
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Validate the configuration for consistency and correctness
    fn validate(&self) -> Result<()> {
        if self.paging.max_limit == 0 {
            anyhow::bail!("Configuration error: paging.max_limit must be greater than 0");
        }
        if self.paging.default_limit > self.paging.max_limit {
            anyhow::bail!(
                "Configuration error: paging.default_limit ({}) exceeds paging.max_limit ({})",
                self.paging.default_limit,
                self.paging.max_limit
            );
        }
        if self.limits.max_depth == 0 {
            anyhow::bail!("Configuration error: limits.max_depth must be at least 1");
        }
        Ok(())
    }
}

/// Get the profile config path (~/.tabula/tabula.json)
fn get_profile_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(APP_DOT_FOLDER).join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn temp_config(json: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_file_config_parse_full() {
        let json = r#"{
            "dialect": "duckdb",
            "limits": { "max_conditions": 10, "max_depth": 4 },
            "paging": { "default_limit": 25 }
        }"#;
        let config: FileConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.dialect, Some(Backend::Duckdb));
        assert_eq!(config.limits.as_ref().unwrap().max_conditions, Some(10));
        assert!(config.limits.as_ref().unwrap().max_filter_json_bytes.is_none());
        assert_eq!(config.paging.as_ref().unwrap().default_limit, Some(25));
    }

    #[test]
    fn test_file_config_parse_empty() {
        let config: FileConfig = serde_json::from_str("{}").unwrap();
        assert!(config.dialect.is_none());
        assert!(config.limits.is_none());
    }

    #[test]
    fn test_file_config_parse_extra_fields() {
        let config: FileConfig = serde_json::from_str(r#"{ "dialekt": "duckdb" }"#).unwrap();
        assert!(config.dialect.is_none());
        assert!(config.extra.get("dialekt").is_some());
    }

    #[test]
    fn test_file_config_merge() {
        let mut base = FileConfig {
            dialect: Some(Backend::Postgres),
            limits: Some(LimitsFileConfig {
                max_filter_json_bytes: Some(1024),
                max_conditions: Some(5),
                max_depth: None,
            }),
            paging: None,
            extra: serde_json::Value::Null,
        };
        let overlay = FileConfig {
            dialect: Some(Backend::Duckdb),
            limits: Some(LimitsFileConfig {
                max_filter_json_bytes: None,
                max_conditions: Some(50),
                max_depth: Some(3),
            }),
            paging: Some(PagingFileConfig {
                default_limit: Some(10),
                max_limit: None,
            }),
            extra: serde_json::Value::Null,
        };
        base.merge(overlay);

        assert_eq!(base.dialect, Some(Backend::Duckdb));
        let limits = base.limits.unwrap();
        assert_eq!(limits.max_filter_json_bytes, Some(1024));
        assert_eq!(limits.max_conditions, Some(50));
        assert_eq!(limits.max_depth, Some(3));
        assert_eq!(base.paging.unwrap().default_limit, Some(10));
    }

    #[test]
    fn test_engine_config_defaults() {
        let config = EngineConfig::load_from_paths(None, None, &CliConfig::default()).unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.paging.default_limit, DEFAULT_PAGE_LIMIT);
    }

    #[test]
    fn test_layering_precedence() {
        let profile = temp_config(r#"{ "dialect": "duckdb", "paging": { "default_limit": 20, "max_limit": 40 } }"#);
        let local = temp_config(r#"{ "paging": { "default_limit": 30 } }"#);
        let cli = CliConfig {
            max_limit: Some(500),
            ..Default::default()
        };

        let config = EngineConfig::load_from_paths(Some(profile.path()), Some(local.path()), &cli).unwrap();
        assert_eq!(config.dialect, Backend::Duckdb);
        assert_eq!(config.paging.default_limit, 30);
        assert_eq!(config.paging.max_limit, 500);
    }

    #[test]
    fn test_cli_dialect_overrides_file() {
        let file = temp_config(r#"{ "dialect": "duckdb" }"#);
        let cli = CliConfig {
            dialect: Some(Backend::Postgres),
            ..Default::default()
        };
        let config = EngineConfig::load_from_paths(None, Some(file.path()), &cli).unwrap();
        assert_eq!(config.dialect, Backend::Postgres);
    }

    #[test]
    fn test_invalid_paging_rejected() {
        let file = temp_config(r#"{ "paging": { "default_limit": 900, "max_limit": 100 } }"#);
        let result = EngineConfig::load_from_paths(None, Some(file.path()), &CliConfig::default());
        assert!(result.unwrap_err().to_string().contains("exceeds paging.max_limit"));
    }

    #[test]
    fn test_malformed_file_reports_path() {
        let file = temp_config("{ not json");
        let err = EngineConfig::load_from_paths(None, Some(file.path()), &CliConfig::default()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_missing_cli_config_file() {
        let cli = CliConfig {
            config: Some(PathBuf::from("/definitely/not/here/tabula.json")),
            ..Default::default()
        };
        let err = EngineConfig::load(&cli).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn test_resolve_limit_clamps() {
        let paging = PagingConfig {
            default_limit: 10,
            max_limit: 50,
        };
        assert_eq!(paging.resolve_limit(None), 10);
        assert_eq!(paging.resolve_limit(Some(20)), 20);
        assert_eq!(paging.resolve_limit(Some(5000)), 50);
    }
}
