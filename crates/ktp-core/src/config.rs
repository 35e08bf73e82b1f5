//! Configuration module
//!
//! Settings for the resource manager and its front ends, read from the environment
//! (after loading an optional `.env` file).

use std::env;
use std::path::{Path, PathBuf};

use crate::constants::{DEFAULT_CATALOG_KEY, DEFAULT_DATA_DIR, DEFAULT_USER_ROLE};
use crate::models::ResourceContext;
use crate::storage_types::CatalogBackend;

/// Log output format for the binaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub environment: String,
    pub catalog_backend: CatalogBackend,
    pub data_dir: PathBuf,
    pub catalog_key: String,
    /// Keep one catalog per project/sub-project/role instead of one per profile.
    pub scope_catalog_by_context: bool,
    pub default_role: String,
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            environment: "development".to_string(),
            catalog_backend: CatalogBackend::Local,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            catalog_key: DEFAULT_CATALOG_KEY.to_string(),
            scope_catalog_by_context: false,
            default_role: DEFAULT_USER_ROLE.to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let environment = lookup("ENVIRONMENT")
            .or_else(|| lookup("APP_ENV"))
            .unwrap_or(defaults.environment);

        let catalog_backend = match lookup("KTP_CATALOG_BACKEND") {
            Some(value) => value.parse::<CatalogBackend>()?,
            None => defaults.catalog_backend,
        };

        let data_dir = lookup("KTP_DATA_DIR")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.data_dir);

        let catalog_key = lookup("KTP_CATALOG_KEY")
            .map(|v| v.trim().to_string())
            .unwrap_or(defaults.catalog_key);

        let scope_catalog_by_context = match lookup("KTP_SCOPE_CATALOG_BY_CONTEXT") {
            Some(value) => parse_bool(&value).ok_or_else(|| {
                anyhow::anyhow!("KTP_SCOPE_CATALOG_BY_CONTEXT must be true or false")
            })?,
            None => defaults.scope_catalog_by_context,
        };

        let default_role = lookup("KTP_USER_ROLE")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.default_role);

        let log_format = match lookup("KTP_LOG_FORMAT").as_deref().map(str::trim) {
            Some("json") => LogFormat::Json,
            Some("pretty") | Some("") | None => LogFormat::Pretty,
            Some(other) => {
                return Err(anyhow::anyhow!(
                    "KTP_LOG_FORMAT must be 'pretty' or 'json', got '{}'",
                    other
                ))
            }
        };

        let config = Config {
            environment,
            catalog_backend,
            data_dir,
            catalog_key,
            scope_catalog_by_context,
            default_role,
            log_format,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.catalog_key.is_empty() {
            return Err(anyhow::anyhow!("KTP_CATALOG_KEY must not be empty"));
        }

        Ok(())
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Key of the catalog for a given resource context.
    pub fn catalog_key_for(&self, context: &ResourceContext) -> String {
        if self.scope_catalog_by_context {
            context.scoped_catalog_key(&self.catalog_key)
        } else {
            self.catalog_key.clone()
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.catalog_backend, CatalogBackend::Local);
        assert_eq!(config.catalog_key, "uploadedFiles");
        assert_eq!(config.data_dir(), Path::new(".ktp"));
        assert_eq!(config.default_role, "Frontend Developer");
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert!(!config.scope_catalog_by_context);
        assert_eq!(config.environment, "development");
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("APP_ENV", "prod"),
            ("KTP_CATALOG_BACKEND", "memory"),
            ("KTP_DATA_DIR", "/tmp/ktp"),
            ("KTP_SCOPE_CATALOG_BY_CONTEXT", "yes"),
            ("KTP_USER_ROLE", "QA Engineer"),
            ("KTP_LOG_FORMAT", "json"),
        ]))
        .unwrap();
        assert_eq!(config.environment, "prod");
        assert_eq!(config.catalog_backend, CatalogBackend::Memory);
        assert_eq!(config.data_dir(), Path::new("/tmp/ktp"));
        assert!(config.scope_catalog_by_context);
        assert_eq!(config.default_role, "QA Engineer");
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_invalid_values_rejected() {
        for (name, value) in [
            ("KTP_CATALOG_BACKEND", "s3"),
            ("KTP_SCOPE_CATALOG_BY_CONTEXT", "maybe"),
            ("KTP_LOG_FORMAT", "xml"),
            ("KTP_CATALOG_KEY", " "),
        ] {
            assert!(Config::from_lookup(lookup_from(&[(name, value)])).is_err(), "{}", name);
        }
    }

    #[test]
    fn test_catalog_key_with_path_characters_is_accepted() {
        let config = Config::from_lookup(lookup_from(&[("KTP_CATALOG_KEY", "../team/files")]))
            .unwrap();
        assert_eq!(config.catalog_key, "../team/files");
    }

    #[test]
    fn test_catalog_key_for_context() {
        let ctx = ResourceContext::new(Some("Atlas".into()), Some("Web".into()), None);

        let global = Config::default();
        assert_eq!(global.catalog_key_for(&ctx), "uploadedFiles");

        let scoped = Config {
            scope_catalog_by_context: true,
            ..Config::default()
        };
        assert_eq!(
            scoped.catalog_key_for(&ctx),
            "uploadedFiles:Atlas:Web:Frontend Developer"
        );
    }
}
