/// Host names and URL bases of the imageboard being harvested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// Front-end host that thread page URLs must use, e.g. `boards.4chan.org`.
    pub front_host: String,
    /// Base of the read-only JSON API, without trailing slash.
    pub api_base: String,
    /// Base of the media CDN, without trailing slash.
    pub media_base: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            front_host: "boards.4chan.org".to_string(),
            api_base: "https://api.4chan.org".to_string(),
            media_base: "https://i.4cdn.org".to_string(),
        }
    }
}

impl Endpoints {
    /// `{api_base}/{board}/res/{thread_no}.json`
    pub fn thread_api_url(&self, board: &str, thread_no: &str) -> String {
        format!(
            "{}/{board}/res/{thread_no}.json",
            self.api_base.trim_end_matches('/')
        )
    }

    /// `{media_base}/{board}/src/{tim}{ext}`
    pub fn media_url(&self, board: &str, tim: u64, ext: &str) -> String {
        format!(
            "{}/{board}/src/{tim}{ext}",
            self.media_base.trim_end_matches('/')
        )
    }
}
