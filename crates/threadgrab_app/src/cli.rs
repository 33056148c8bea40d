//! Command-line definition. The CLI is the only configuration source.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use engine_logging::{LogDestination, DEFAULT_LOG_FILE};
use log::LevelFilter;
use threadgrab_engine::{EngineConfig, DEFAULT_MAX_CONCURRENT_DOWNLOADS};

/// Download every attachment of an imageboard thread.
#[derive(Debug, Parser)]
#[command(name = "threadgrab")]
#[command(version)]
pub struct Cli {
    /// Url of the thread, e.g. https://boards.4chan.org/g/res/123456
    #[arg(long = "threadurl", value_name = "URL")]
    pub thread_url: String,

    /// Directory under which `<board>/No. <thread>/` is created
    #[arg(long = "output-dir", value_name = "DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// Maximum simultaneous downloads; 0 starts them all at once
    #[arg(long = "max-concurrent", value_name = "N", default_value_t = DEFAULT_MAX_CONCURRENT_DOWNLOADS)]
    pub max_concurrent: usize,

    /// Per-request timeout in seconds; 0 disables it
    #[arg(long = "timeout-secs", value_name = "SECS", default_value_t = 120)]
    pub timeout_secs: u64,

    /// Override the JSON API base url
    #[arg(long = "api-base", value_name = "URL")]
    pub api_base: Option<String>,

    /// Override the media CDN base url
    #[arg(long = "media-base", value_name = "URL")]
    pub media_base: Option<String>,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Also write logs to ./threadgrab.log
    #[arg(long = "log-file")]
    pub log_file: bool,
}

impl Cli {
    pub fn engine_config(&self) -> EngineConfig {
        let mut config = EngineConfig::default_with_output(self.output_dir.clone());
        config.max_concurrent_downloads = Some(self.max_concurrent);
        config.fetch.request_timeout =
            (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs));
        if let Some(api_base) = &self.api_base {
            config.endpoints.api_base = api_base.clone();
        }
        if let Some(media_base) = &self.media_base {
            config.endpoints.media_base = media_base.clone();
        }
        config
    }

    pub fn log_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Warn
        }
    }

    pub fn log_destination(&self) -> LogDestination {
        if self.log_file {
            LogDestination::Both(PathBuf::from(DEFAULT_LOG_FILE))
        } else {
            LogDestination::Terminal
        }
    }
}
