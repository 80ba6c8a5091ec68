pub mod api;
pub mod cli_ops;
pub mod config;
pub mod fetcher;
pub mod model;
pub mod reader;
pub mod storage;

pub use api::{mapping_url, DistributionApi, FetchError, HttpDistributionApi, MappingResponse};
pub use config::DistributionConfig;
pub use fetcher::{FetchOutcome, LanguageDataCallback, MappingError, MappingFetcher};
pub use model::{LanguageData, MappingRequest};
pub use reader::{ParseError, Reader, XmlReader};
pub use storage::{FileStorage, MappingStorage, MemoryStorage, StorageError, StoredMapping};
