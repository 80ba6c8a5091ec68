use reqwest::{Client, Url};
use thiserror::Error;

use crate::config::DistributionConfig;
use crate::model::MappingRequest;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("invalid url: {0}")]
    UrlParse(#[from] url::ParseError),
    #[error("unsupported url scheme: {0}")]
    UnsupportedScheme(String),
    #[error(transparent)]
    Network(#[from] reqwest::Error),
}

/// Raw answer from the distribution endpoint. Any status is carried through.
#[derive(Clone, Debug)]
pub struct MappingResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl MappingResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

#[async_trait::async_trait]
pub trait DistributionApi: Send + Sync {
    /// Request the mapping file. Only connection-level problems are errors;
    /// an HTTP error status is still an `Ok` response.
    async fn get_mapping_file(&self, request: &MappingRequest) -> Result<MappingResponse, FetchError>;
}

/// Build `{base}/{hash}/mapping/{language}?files[]=...`.
pub fn mapping_url(base: &str, request: &MappingRequest) -> Result<Url, FetchError> {
    let mut url = Url::parse(base)?;
    match url.scheme() {
        "http" | "https" => {}
        other => return Err(FetchError::UnsupportedScheme(other.to_string())),
    }

    url.path_segments_mut()
        .map_err(|_| FetchError::UnsupportedScheme(base.to_string()))?
        .pop_if_empty()
        .push(&request.content_hash)
        .push("mapping")
        .push(&request.language_code);

    {
        let mut query = url.query_pairs_mut();
        for name in &request.file_names {
            query.append_pair("files[]", name);
        }
    }
    if request.file_names.is_empty() {
        url.set_query(None);
    }

    Ok(url)
}

/// reqwest-backed distribution client.
#[derive(Clone, Debug)]
pub struct HttpDistributionApi {
    client: Client,
    base_url: String,
}

impl HttpDistributionApi {
    pub fn new(config: &DistributionConfig) -> Result<Self, FetchError> {
        // validate early so a bad base url fails at construction
        Url::parse(&config.base_url)?;
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait::async_trait]
impl DistributionApi for HttpDistributionApi {
    async fn get_mapping_file(&self, request: &MappingRequest) -> Result<MappingResponse, FetchError> {
        let url = mapping_url(&self.base_url, request)?;
        log::debug!("requesting mapping file {url}");

        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();
        log::debug!("mapping response status {status}, {} bytes", body.len());

        Ok(MappingResponse { status, body })
    }
}
