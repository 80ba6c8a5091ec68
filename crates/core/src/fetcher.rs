use std::sync::Arc;

use thiserror::Error;
use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

use crate::api::{DistributionApi, FetchError};
use crate::model::{LanguageData, MappingRequest};
use crate::reader::{ParseError, Reader};
use crate::storage::{MappingStorage, StorageError};

/// Only this status counts as a successful mapping response.
pub const STATUS_OK: u16 = 200;

#[derive(Error, Debug)]
pub enum MappingError {
    #[error("transport failure: {0}")]
    Transport(#[from] FetchError),
    #[error("unexpected HTTP status {0}")]
    Status(u16),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("failed to store mapping: {0}")]
    Storage(#[from] StorageError),
    #[error("no tokio runtime available to run the fetch")]
    NoRuntime,
}

#[derive(Debug)]
pub enum FetchOutcome {
    Success(LanguageData),
    Failure(MappingError),
}

impl FetchOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, FetchOutcome::Success(_))
    }

    pub fn into_result(self) -> Result<LanguageData, MappingError> {
        match self {
            FetchOutcome::Success(data) => Ok(data),
            FetchOutcome::Failure(err) => Err(err),
        }
    }
}

impl From<Result<LanguageData, MappingError>> for FetchOutcome {
    fn from(res: Result<LanguageData, MappingError>) -> Self {
        match res {
            Ok(data) => FetchOutcome::Success(data),
            Err(err) => FetchOutcome::Failure(err),
        }
    }
}

/// Observer notified once per fetch.
pub trait LanguageDataCallback: Send + Sync {
    fn on_data_loaded(&self, data: LanguageData);
    fn on_failure(&self, error: MappingError);
}

impl LanguageDataCallback for UnboundedSender<FetchOutcome> {
    fn on_data_loaded(&self, data: LanguageData) {
        let _ = self.send(FetchOutcome::Success(data));
    }

    fn on_failure(&self, error: MappingError) {
        let _ = self.send(FetchOutcome::Failure(error));
    }
}

/// Fetches a distribution mapping, parses it and hands it to storage.
pub struct MappingFetcher<A, R, S> {
    api: Arc<A>,
    reader: Arc<R>,
    storage: Arc<S>,
    request: Arc<MappingRequest>,
}

impl<A, R, S> Clone for MappingFetcher<A, R, S> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            reader: Arc::clone(&self.reader),
            storage: Arc::clone(&self.storage),
            request: Arc::clone(&self.request),
        }
    }
}

impl<A, R, S> MappingFetcher<A, R, S>
where
    A: DistributionApi + 'static,
    R: Reader + 'static,
    S: MappingStorage + 'static,
{
    pub fn new(api: Arc<A>, reader: Arc<R>, storage: Arc<S>, request: MappingRequest) -> Self {
        Self {
            api,
            reader,
            storage,
            request: Arc::new(request),
        }
    }

    pub fn request(&self) -> &MappingRequest {
        &self.request
    }

    /// Fire-and-forget refresh on the current tokio runtime. Failures are
    /// logged and dropped. Returns `None` when called outside a runtime.
    pub fn fetch_data(&self) -> Option<JoinHandle<()>> {
        let handle = match Handle::try_current() {
            Ok(handle) => handle,
            Err(e) => {
                log::warn!("mapping fetch skipped: {e}");
                return None;
            }
        };
        let this = self.clone();
        Some(handle.spawn(async move {
            if let FetchOutcome::Failure(err) = this.load().await {
                log::warn!(
                    "mapping fetch for {}/{} failed: {err}",
                    this.request.content_hash,
                    this.request.language_code
                );
            }
        }))
    }

    /// Same as [`fetch_data`](Self::fetch_data), reporting the outcome to `callback`.
    /// Outside a runtime the callback gets [`MappingError::NoRuntime`] right away.
    pub fn fetch_data_with(
        &self,
        callback: Arc<dyn LanguageDataCallback>,
    ) -> Option<JoinHandle<()>> {
        let handle = match Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                callback.on_failure(MappingError::NoRuntime);
                return None;
            }
        };
        let this = self.clone();
        Some(handle.spawn(async move {
            match this.load().await {
                FetchOutcome::Success(data) => callback.on_data_loaded(data),
                FetchOutcome::Failure(err) => callback.on_failure(err),
            }
        }))
    }

    /// Run request, status check, parse and store, returning the outcome.
    pub async fn load(&self) -> FetchOutcome {
        self.run().await.into()
    }

    async fn run(&self) -> Result<LanguageData, MappingError> {
        let response = self.api.get_mapping_file(&self.request).await?;
        if response.status != STATUS_OK {
            log::debug!("mapping request answered with status {}", response.status);
            return Err(MappingError::Status(response.status));
        }

        let parsed = self.reader.parse_input(&response.body);
        self.reader.close();
        drop(response);

        let mut data = parsed?;
        data.language = self.request.language_code.clone();

        self.storage.save_mapping(data.clone()).await?;
        log::debug!(
            "stored mapping for {} ({} entries)",
            data.language,
            data.len()
        );
        Ok(data)
    }
}
