use thiserror::Error;
use threadgrab_core::ResolveError;
use threadgrab_engine::HarvestError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("--threadurl flag can't be empty")]
    EmptyThreadUrl,
    #[error("invalid thread url: {0}")]
    InvalidThreadUrl(String),
    #[error(transparent)]
    Harvest(HarvestError),
    #[error("failed to start async runtime: {0}")]
    Runtime(std::io::Error),
}

impl AppError {
    /// 2 for bad arguments, 1 for everything else that stops the run.
    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::EmptyThreadUrl | AppError::InvalidThreadUrl(_) => 2,
            AppError::Harvest(_) | AppError::Runtime(_) => 1,
        }
    }
}

impl From<HarvestError> for AppError {
    fn from(err: HarvestError) -> Self {
        match err {
            HarvestError::Resolve(ResolveError::Empty) => AppError::EmptyThreadUrl,
            HarvestError::Resolve(ResolveError::InvalidUrl(url)) => AppError::InvalidThreadUrl(url),
            other => AppError::Harvest(other),
        }
    }
}
