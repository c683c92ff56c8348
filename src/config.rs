use std::path::PathBuf;
use std::time::Duration;

use scan_proto::proto::Protocol;
use tracing::{Level, event};
use url::Url;

/// Where the capabilities document comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Query the scanner service at this endpoint
    Url(Url),
    /// Decode a response previously saved to disk
    File(PathBuf),
}

#[derive(Debug)]
pub struct Config {
    pub input: Input,
    pub protocol: Protocol,
    pub timeout: Duration,
    pub verbosity: Level,
    pub print_request: bool,
}

impl Config {
    pub fn log(&self) {
        event!(Level::INFO, ?self);
    }
}
