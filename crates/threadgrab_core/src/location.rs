use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::Endpoints;

/// `[http(s)://]host/board/res/no[#fragment]`. The host is captured loosely
/// and compared literally against [`Endpoints::front_host`] afterwards.
static THREAD_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:https?://)?(?P<host>[^/#?]+)/(?P<board>[a-z0-9]{1,4})/res/(?P<no>[0-9]+)(?:#.*)?$")
        .expect("thread url pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("thread url can't be empty")]
    Empty,
    #[error("invalid thread url: {0}")]
    InvalidUrl(String),
}

/// Board and thread number taken from a thread page URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ThreadLocation {
    board: String,
    thread_no: String,
}

impl ThreadLocation {
    pub fn board(&self) -> &str {
        &self.board
    }

    pub fn thread_no(&self) -> &str {
        &self.thread_no
    }
}

impl fmt::Display for ThreadLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/{}", self.board, self.thread_no)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedThread {
    pub location: ThreadLocation,
    pub api_url: String,
}

/// Validate a thread page URL and derive its JSON API endpoint.
///
/// Pure: nothing is fetched on either the success or the failure path.
pub fn resolve(thread_url: &str, endpoints: &Endpoints) -> Result<ResolvedThread, ResolveError> {
    let input = thread_url.trim();
    if input.is_empty() {
        return Err(ResolveError::Empty);
    }

    let captures = THREAD_URL
        .captures(input)
        .ok_or_else(|| ResolveError::InvalidUrl(input.to_string()))?;

    if &captures["host"] != endpoints.front_host.as_str() {
        return Err(ResolveError::InvalidUrl(input.to_string()));
    }

    let location = ThreadLocation {
        board: captures["board"].to_string(),
        thread_no: captures["no"].to_string(),
    };
    let api_url = endpoints.thread_api_url(&location.board, &location.thread_no);

    Ok(ResolvedThread { location, api_url })
}
