use serde::{Deserialize, Serialize};

use crate::semantic_model::SemanticModelCatalog;

pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// How the bearer token was minted; sent as `X-Snowflake-Authorization-Token-Type`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TokenType {
    #[default]
    #[serde(rename = "OAUTH", alias = "oauth")]
    OAuth,
    #[serde(rename = "KEYPAIR_JWT", alias = "keypair_jwt")]
    KeyPairJwt,
    #[serde(rename = "PROGRAMMATIC_ACCESS_TOKEN", alias = "programmatic_access_token")]
    ProgrammaticAccessToken,
}

impl TokenType {
    pub fn header_value(&self) -> &'static str {
        match self {
            TokenType::OAuth => "OAUTH",
            TokenType::KeyPairJwt => "KEYPAIR_JWT",
            TokenType::ProgrammaticAccessToken => "PROGRAMMATIC_ACCESS_TOKEN",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SnowflakeAuth {
    pub token: String,
    pub token_type: TokenType,
}

impl SnowflakeAuth {
    pub fn new<S: Into<String>>(token: S, token_type: TokenType) -> Self {
        Self {
            token: token.into(),
            token_type,
        }
    }

    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

#[derive(Debug, Clone)]
pub struct CortexAnalystConfig {
    pub host: String,
    pub auth: SnowflakeAuth,
    pub timeout_ms: u64,
    pub catalog: SemanticModelCatalog,
}

/// Session context for statements run through the SQL API
#[derive(Debug, Clone)]
pub struct SnowflakeSqlConfig {
    pub host: String,
    pub auth: SnowflakeAuth,
    pub timeout_ms: u64,
    pub database: Option<String>,
    pub schema: Option<String>,
    pub warehouse: Option<String>,
    pub role: Option<String>,
}
