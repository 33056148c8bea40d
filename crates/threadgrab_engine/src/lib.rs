//! threadgrab engine: HTTP, filesystem and the concurrent download pipeline.
mod config;
mod download;
mod engine;
mod fetch;
mod persist;
mod thread_client;
mod types;

pub use config::{EngineConfig, DEFAULT_MAX_CONCURRENT_DOWNLOADS};
pub use download::{Downloader, OutcomeSink};
pub use engine::{Engine, HarvestError, HarvestPlan};
pub use fetch::{FetchSettings, Fetcher, ReqwestFetcher};
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use thread_client::{fetch_thread, ThreadError};
pub use types::{FailureKind, FetchError, FetchMetadata, FetchOutput};
