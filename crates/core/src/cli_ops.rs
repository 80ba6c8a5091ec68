use std::path::Path;
use std::sync::Arc;

use crate::api::HttpDistributionApi;
use crate::config::DistributionConfig;
use crate::fetcher::{MappingError, MappingFetcher};
use crate::model::{LanguageData, MappingRequest};
use crate::reader::XmlReader;
use crate::storage::{FileStorage, StorageError};

#[derive(thiserror::Error, Debug)]
pub enum CLIError {
    #[error(transparent)]
    Mapping(#[from] MappingError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    Other(String),
}

impl From<crate::api::FetchError> for CLIError {
    fn from(e: crate::api::FetchError) -> Self {
        CLIError::Mapping(MappingError::Transport(e))
    }
}

/// Render a mapping either as pretty JSON or as a short per-kind summary.
pub fn render(data: &LanguageData, json: bool) -> Result<String, CLIError> {
    if json {
        return Ok(serde_json::to_string_pretty(data)?);
    }
    let mut out = format!(
        "language {}: {} strings, {} arrays, {} plurals",
        data.language,
        data.resources.len(),
        data.arrays.len(),
        data.plurals.len()
    );
    for (name, value) in &data.resources {
        out.push_str(&format!("\n  {name} = {value}"));
    }
    Ok(out)
}

/// Fetch the mapping described by `request` into `out_dir` and return it.
pub async fn handle_fetch(
    config: &DistributionConfig,
    request: MappingRequest,
    out_dir: &Path,
) -> Result<LanguageData, CLIError> {
    if request.file_names.is_empty() {
        return Err(CLIError::Other("at least one --file is required".to_string()));
    }
    let api = HttpDistributionApi::new(config)?;
    let fetcher = MappingFetcher::new(
        Arc::new(api),
        Arc::new(XmlReader::new()),
        Arc::new(FileStorage::new(out_dir)),
        request,
    );
    Ok(fetcher.load().await.into_result()?)
}

/// Load a previously fetched mapping from `out_dir`.
pub async fn handle_show(out_dir: &Path, language: &str) -> Result<LanguageData, CLIError> {
    let stored = FileStorage::new(out_dir).load(language).await?;
    Ok(stored.data)
}
