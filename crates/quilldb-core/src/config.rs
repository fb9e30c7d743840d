//! Store layout configuration loaded from TOML.
//!
//! ```toml
//! name = "quotes"
//!
//! [[columns]]
//! name = "sym"
//! kind = "symbol"
//! indexed = true
//! distinct_count_hint = 128
//! ```

use crate::{
    db::{
        index::is_mask_hint,
        schema::{ColumnKind, ColumnModel, StoreMetadata},
    },
    error::{ErrorClass, ErrorOrigin, InternalError},
};
use serde::Deserialize;
use std::collections::HashSet;
use thiserror::Error as ThisError;

///
/// ConfigError
///

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("config parse failed: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("store '{0}' declares no columns")]
    NoColumns(String),

    #[error("duplicate column '{0}'")]
    DuplicateColumn(String),

    #[error("indexed column '{0}' needs a non-zero distinct_count_hint")]
    MissingHint(String),

    #[error("indexed int column '{column}' needs a 2^n-1 distinct_count_hint, found {hint}")]
    HintNotMask { column: String, hint: u32 },

    #[error("column '{column}' of kind {kind} cannot be indexed")]
    NotIndexable { column: String, kind: ColumnKind },
}

impl From<ConfigError> for InternalError {
    fn from(err: ConfigError) -> Self {
        Self::new(ErrorClass::Unsupported, ErrorOrigin::Config, err.to_string())
    }
}

///
/// StoreConfig
///

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    pub name: String,
    #[serde(default)]
    pub columns: Vec<ColumnConfig>,
}

///
/// ColumnConfig
///

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ColumnConfig {
    pub name: String,
    pub kind: ColumnKind,
    #[serde(default)]
    pub indexed: bool,
    #[serde(default)]
    pub distinct_count_hint: u32,
}

impl StoreConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    /// Validate the layout and build the store metadata.
    pub fn into_metadata(self) -> Result<StoreMetadata, ConfigError> {
        if self.columns.is_empty() {
            return Err(ConfigError::NoColumns(self.name));
        }

        let mut seen = HashSet::new();
        let mut columns = Vec::with_capacity(self.columns.len());

        for col in self.columns {
            if !seen.insert(col.name.clone()) {
                return Err(ConfigError::DuplicateColumn(col.name));
            }

            let mut model = ColumnModel::new(col.name, col.kind);
            if col.indexed {
                validate_index(&model, col.distinct_count_hint)?;
                model = model.indexed(col.distinct_count_hint);
            }

            columns.push(model);
        }

        Ok(StoreMetadata::new(self.name, columns))
    }
}

/// Parse and validate a TOML store layout in one step.
pub fn load_store_metadata(source: &str) -> Result<StoreMetadata, InternalError> {
    Ok(StoreConfig::from_toml_str(source)?.into_metadata()?)
}

fn validate_index(model: &ColumnModel, hint: u32) -> Result<(), ConfigError> {
    if hint == 0 {
        return Err(ConfigError::MissingHint(model.name.clone()));
    }

    match model.kind {
        ColumnKind::Int if !is_mask_hint(hint) => Err(ConfigError::HintNotMask {
            column: model.name.clone(),
            hint,
        }),
        ColumnKind::Int | ColumnKind::Str | ColumnKind::Symbol => Ok(()),
        ColumnKind::Long => Err(ConfigError::NotIndexable {
            column: model.name.clone(),
            kind: model.kind,
        }),
    }
}

///
/// TESTS
///
