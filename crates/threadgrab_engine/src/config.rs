use std::path::PathBuf;

use threadgrab_core::Endpoints;

use crate::FetchSettings;

pub const DEFAULT_MAX_CONCURRENT_DOWNLOADS: usize = 8;

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub endpoints: Endpoints,
    /// Root under which `{board}/No. {thread}` is created.
    pub output_root: PathBuf,
    pub fetch: FetchSettings,
    /// `None` or `Some(0)` removes the cap.
    pub max_concurrent_downloads: Option<usize>,
}

impl EngineConfig {
    pub fn default_with_output(output_root: PathBuf) -> Self {
        Self {
            endpoints: Endpoints::default(),
            output_root,
            fetch: FetchSettings::default(),
            max_concurrent_downloads: Some(DEFAULT_MAX_CONCURRENT_DOWNLOADS),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::default_with_output(PathBuf::from("."))
    }
}
