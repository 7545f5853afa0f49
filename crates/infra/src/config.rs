//! Application configuration.
//!
//! Sources, later ones overriding earlier ones:
//! 1. `config/default.{toml,yaml,json}` (optional)
//! 2. `config/{env}.{toml,yaml,json}` (optional)
//! 3. `AYS__`-prefixed environment variables, `__` between path segments
//!    (e.g. `AYS__PAGING__MAX_PAGE_SIZE=50`)

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

use ays_core::PagingLimits;
use ays_observability::LoggingConfig;

/// Root application configuration. Every field has a default, so an empty
/// environment yields a usable configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub paging: PagingLimits,
}

impl AppConfig {
    pub fn load(env: &str) -> Result<Self, ConfigError> {
        Self::load_from(
            Config::builder()
                .add_source(File::with_name("config/default").required(false))
                .add_source(File::with_name(&format!("config/{env}")).required(false))
                .add_source(
                    Environment::with_prefix("AYS")
                        .separator("__")
                        .try_parsing(true),
                ),
        )
    }

    fn load_from(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        builder.build()?.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ays_observability::LogFormat;
    use config::FileFormat;

    fn from_toml(toml: &str) -> Result<AppConfig, ConfigError> {
        AppConfig::load_from(Config::builder().add_source(File::from_str(toml, FileFormat::Toml)))
    }

    #[test]
    fn empty_sources_yield_defaults() {
        let config = from_toml("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.paging.default_page_size, 10);
        assert_eq!(config.paging.max_page_size, 100);
    }

    #[test]
    fn sections_override_individual_fields() {
        let config = from_toml(
            r#"
            [logging]
            format = "pretty"

            [paging]
            max_page_size = 50
            "#,
        )
        .unwrap();

        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.paging.max_page_size, 50);
        assert_eq!(config.paging.default_page_size, 10);
    }

    #[test]
    fn wrong_types_are_reported() {
        assert!(from_toml("[paging]\nmax_page_size = \"many\"").is_err());
    }

    #[test]
    fn missing_files_are_optional() {
        assert!(AppConfig::load("no-such-environment").is_ok());
    }
}
