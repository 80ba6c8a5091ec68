use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Parameters identifying one distribution mapping file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MappingRequest {
    pub content_hash: String,
    pub file_names: Vec<String>,
    pub language_code: String,
}

impl MappingRequest {
    pub fn new(
        content_hash: impl Into<String>,
        file_names: impl IntoIterator<Item = impl Into<String>>,
        language_code: impl Into<String>,
    ) -> Self {
        Self {
            content_hash: content_hash.into(),
            file_names: file_names.into_iter().map(Into::into).collect(),
            language_code: language_code.into(),
        }
    }
}

/// Resource entries parsed out of a mapping file, grouped by Android resource kind.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageData {
    pub language: String,
    #[serde(default)]
    pub resources: BTreeMap<String, String>,
    #[serde(default)]
    pub arrays: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub plurals: BTreeMap<String, BTreeMap<String, String>>,
}

impl LanguageData {
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            ..Self::default()
        }
    }

    /// Total number of named entries across all resource kinds.
    pub fn len(&self) -> usize {
        self.resources.len() + self.arrays.len() + self.plurals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
