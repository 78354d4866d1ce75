use crate::error::{to_env_var, ConfigError, ENV_PREFIX};
use config::{Config, Environment, File};
use cortex_analyst::providers::configs::{
    CortexAnalystConfig, SnowflakeAuth, SnowflakeSqlConfig, TokenType, DEFAULT_TIMEOUT_MS,
};
use cortex_analyst::semantic_model::{
    default_models, SemanticModel, SemanticModelCatalog, DEFAULT_DATABASE, DEFAULT_MODEL,
    DEFAULT_SCHEMA, DEFAULT_STAGE,
};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
pub struct SnowflakeSettings {
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub token_type: TokenType,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default)]
    pub warehouse: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CatalogSettings {
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default = "default_schema")]
    pub schema: String,
    #[serde(default = "default_stage")]
    pub stage: String,
    #[serde(default = "default_model")]
    pub default_model: String,
    #[serde(default = "default_models")]
    pub models: Vec<SemanticModel>,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            database: default_database(),
            schema: default_schema(),
            stage: default_stage(),
            default_model: default_model(),
            models: default_models(),
        }
    }
}

impl CatalogSettings {
    pub fn catalog(&self) -> SemanticModelCatalog {
        SemanticModelCatalog {
            database: self.database.clone(),
            schema: self.schema.clone(),
            stage: self.stage.clone(),
            models: self.models.clone(),
        }
    }
}

/// Everything needed to reach the account, with the secrets already checked
#[derive(Debug)]
pub struct Connection {
    pub host: String,
    pub auth: SnowflakeAuth,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub snowflake: SnowflakeSettings,
    #[serde(default)]
    pub catalog: CatalogSettings,
}

impl Settings {
    /// Defaults, then the config file (required only when given explicitly), then
    /// `ANALYST_*` environment variables.
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match config_file {
            Some(path) => File::from(path.to_path_buf()).required(true),
            None => File::from(default_config_path()).required(false),
        };

        let config = Config::builder()
            .set_default("snowflake.timeout_ms", DEFAULT_TIMEOUT_MS)?
            .set_default("catalog.database", default_database())?
            .set_default("catalog.schema", default_schema())?
            .set_default("catalog.stage", default_stage())?
            .set_default("catalog.default_model", default_model())?
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings: Settings = config.try_deserialize().map_err(|err| {
            tracing::debug!("Configuration error: {:?}", &err);
            ConfigError::Other(err)
        })?;

        if !settings.catalog.catalog().contains(&settings.catalog.default_model) {
            return Err(ConfigError::Other(config::ConfigError::Message(format!(
                "default model '{}' is not one of the configured semantic models",
                settings.catalog.default_model
            ))));
        }

        Ok(settings)
    }

    pub fn connection(&self) -> Result<Connection, ConfigError> {
        let host = self
            .snowflake
            .host
            .clone()
            .filter(|h| !h.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar {
                env_var: to_env_var("snowflake.host"),
            })?;
        let token = self
            .snowflake
            .token
            .clone()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar {
                env_var: to_env_var("snowflake.token"),
            })?;

        Ok(Connection {
            host,
            auth: SnowflakeAuth::new(token, self.snowflake.token_type),
        })
    }

    pub fn analyst_config(&self) -> Result<CortexAnalystConfig, ConfigError> {
        let Connection { host, auth } = self.connection()?;
        Ok(CortexAnalystConfig {
            host,
            auth,
            timeout_ms: self.snowflake.timeout_ms,
            catalog: self.catalog.catalog(),
        })
    }

    /// Statements run in the database and schema the semantic models describe
    pub fn sql_config(&self) -> Result<SnowflakeSqlConfig, ConfigError> {
        let Connection { host, auth } = self.connection()?;
        Ok(SnowflakeSqlConfig {
            host,
            auth,
            timeout_ms: self.snowflake.timeout_ms,
            database: Some(self.catalog.database.clone()),
            schema: Some(self.catalog.schema.clone()),
            warehouse: self.snowflake.warehouse.clone(),
            role: self.snowflake.role.clone(),
        })
    }
}

pub fn default_config_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_default()
        .join(".config")
        .join("analyst")
        .join("config.toml")
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

fn default_database() -> String {
    DEFAULT_DATABASE.to_string()
}

fn default_schema() -> String {
    DEFAULT_SCHEMA.to_string()
}

fn default_stage() -> String {
    DEFAULT_STAGE.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn clean_env() {
        for (key, _) in env::vars() {
            if key.starts_with("ANALYST_") {
                env::remove_var(&key);
            }
        }
    }

    fn empty_config_file() -> NamedTempFile {
        tempfile::Builder::new().suffix(".toml").tempfile().unwrap()
    }

    #[test]
    #[serial]
    fn test_default_settings() {
        clean_env();
        env::set_var("ANALYST_SNOWFLAKE__HOST", "https://acme.snowflakecomputing.com");
        env::set_var("ANALYST_SNOWFLAKE__TOKEN", "test-token");

        let file = empty_config_file();
        let settings = Settings::load(Some(file.path())).unwrap();

        assert_eq!(settings.snowflake.timeout_ms, 30_000);
        assert_eq!(settings.snowflake.token_type, TokenType::OAuth);
        assert_eq!(settings.catalog.default_model, "Winter Game");

        let analyst = settings.analyst_config().unwrap();
        assert_eq!(analyst.host, "https://acme.snowflakecomputing.com");
        assert_eq!(analyst.auth.bearer(), "Bearer test-token");
        assert_eq!(
            analyst.catalog.resolve("Winter Game").unwrap(),
            "@CORTEX_ANALYST_DEMO.WINTER_GAME.RAW_DATA/winter_game.yaml"
        );

        let sql = settings.sql_config().unwrap();
        assert_eq!(sql.database.as_deref(), Some("CORTEX_ANALYST_DEMO"));
        assert_eq!(sql.schema.as_deref(), Some("WINTER_GAME"));
        assert_eq!(sql.warehouse, None);

        clean_env();
    }

    #[test]
    #[serial]
    fn test_missing_token_names_env_var() {
        clean_env();
        env::set_var("ANALYST_SNOWFLAKE__HOST", "https://acme.snowflakecomputing.com");

        let file = empty_config_file();
        let settings = Settings::load(Some(file.path())).unwrap();
        match settings.analyst_config() {
            Err(ConfigError::MissingEnvVar { env_var }) => {
                assert_eq!(env_var, "ANALYST_SNOWFLAKE__TOKEN")
            }
            other => panic!("Expected MissingEnvVar, got {:?}", other),
        }

        clean_env();
    }

    #[test]
    #[serial]
    fn test_file_then_environment_override() {
        clean_env();
        let mut file = empty_config_file();
        writeln!(
            file,
            r#"
[snowflake]
host = "https://file.snowflakecomputing.com"
token = "file-token"
token_type = "KEYPAIR_JWT"
warehouse = "ANALYST_WH"

[catalog]
database = "SPORTS"
schema = "OLYMPICS"
stage = "MODELS"
default_model = "Summer Game"

[[catalog.models]]
name = "Summer Game"
file = "summer_game.yaml"
"#
        )
        .unwrap();

        env::set_var("ANALYST_SNOWFLAKE__TIMEOUT_MS", "5000");
        env::set_var("ANALYST_SNOWFLAKE__TOKEN", "env-token");

        let settings = Settings::load(Some(file.path())).unwrap();
        assert_eq!(settings.snowflake.timeout_ms, 5000);
        assert_eq!(settings.snowflake.token_type, TokenType::KeyPairJwt);

        let analyst = settings.analyst_config().unwrap();
        assert_eq!(analyst.host, "https://file.snowflakecomputing.com");
        assert_eq!(analyst.auth.token, "env-token");
        assert_eq!(
            analyst.catalog.resolve("Summer Game").unwrap(),
            "@SPORTS.OLYMPICS.MODELS/summer_game.yaml"
        );
        assert!(analyst.catalog.resolve("Winter Game").is_err());
        assert_eq!(
            settings.sql_config().unwrap().warehouse.as_deref(),
            Some("ANALYST_WH")
        );

        clean_env();
    }

    #[test]
    #[serial]
    fn test_default_model_must_exist() {
        clean_env();
        env::set_var("ANALYST_CATALOG__DEFAULT_MODEL", "Summer Game");

        let file = empty_config_file();
        let result = Settings::load(Some(file.path()));
        assert!(matches!(result, Err(ConfigError::Other(_))));

        clean_env();
    }
}
