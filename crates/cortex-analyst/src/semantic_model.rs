use serde::{Deserialize, Serialize};

use crate::errors::{AnalystError, AnalystResult};

pub const DEFAULT_DATABASE: &str = "CORTEX_ANALYST_DEMO";
pub const DEFAULT_SCHEMA: &str = "WINTER_GAME";
pub const DEFAULT_STAGE: &str = "RAW_DATA";
pub const DEFAULT_MODEL: &str = "Winter Game";

/// A named semantic model file living on the stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SemanticModel {
    pub name: String,
    pub file: String,
}

impl SemanticModel {
    pub fn new<S: Into<String>, T: Into<String>>(name: S, file: T) -> Self {
        Self {
            name: name.into(),
            file: file.into(),
        }
    }
}

/// The fixed selector table: which stage holds the models and which file each name maps to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SemanticModelCatalog {
    pub database: String,
    pub schema: String,
    pub stage: String,
    pub models: Vec<SemanticModel>,
}

impl Default for SemanticModelCatalog {
    fn default() -> Self {
        Self {
            database: DEFAULT_DATABASE.to_string(),
            schema: DEFAULT_SCHEMA.to_string(),
            stage: DEFAULT_STAGE.to_string(),
            models: default_models(),
        }
    }
}

pub fn default_models() -> Vec<SemanticModel> {
    vec![
        SemanticModel::new("Winter Game", "winter_game.yaml"),
        SemanticModel::new("Winter Game Enriched", "winter_game_enrichi.yaml"),
    ]
}

impl SemanticModelCatalog {
    pub fn contains(&self, selector: &str) -> bool {
        self.models.iter().any(|m| m.name == selector)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.models.iter().map(|m| m.name.as_str())
    }

    /// Fully-qualified stage reference for `selector`, e.g.
    /// `@CORTEX_ANALYST_DEMO.WINTER_GAME.RAW_DATA/winter_game.yaml`
    pub fn resolve(&self, selector: &str) -> AnalystResult<String> {
        let model = self
            .models
            .iter()
            .find(|m| m.name == selector)
            .ok_or_else(|| {
                AnalystError::Configuration(format!(
                    "unknown semantic model '{}', expected one of: {}",
                    selector,
                    self.names().collect::<Vec<_>>().join(", ")
                ))
            })?;

        Ok(format!(
            "@{}.{}.{}/{}",
            self.database, self.schema, self.stage, model.file
        ))
    }
}
