//! Server configuration
//!
//! Two pieces of configuration exist:
//!
//! - [`ConnectionConfig`]: where to listen, read once at startup from a three-line text file
//!   (protocol, host, port).
//! - [`Configuration`]: logging and session pacing, created programmatically with
//!   [`Configuration::new()`] or from environment variables with [`Configuration::from_env()`].
//!
//! # Environment Variables
//!
//! All values are optional. Flags are enabled by the case-insensitive value `"true"`,
//! durations are whole milliseconds.
//!
//! - `TTT_VERBOSE`: Log at trace level instead of info (default: `false`)
//! - `TTT_LOG`: Log to a timestamped file instead of stdout (default: `false`)
//! - `TTT_TICK_MS`: Session tick length (default: `32`)
//! - `TTT_WIN_PAUSE_MS`: Pause after a round ends before play resumes (default: `2000`)
//! - `TTT_STATUS_MS`: Period of the session status log line (default: `1000`)

use std::{fs, path::Path, time::Duration};

use anyhow::{anyhow, bail, Context};

/// Configuration for logging and session pacing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Configuration {
    pub(crate) verbose: bool,
    pub(crate) log: bool,
    pub(crate) tick_interval: Duration,
    pub(crate) win_pause: Duration,
    pub(crate) status_interval: Duration,
}

impl Configuration {
    /// Create a new configuration with default parameters.
    ///
    /// By default:
    /// - Logs go to stdout at info level.
    /// - A session ticks every 32ms.
    /// - Play resumes 2s after a round ends.
    /// - Session status is logged every second.
    pub fn new() -> Self {
        Self {
            verbose: false,
            log: false,
            tick_interval: Duration::from_millis(32),
            win_pause: Duration::from_millis(2000),
            status_interval: Duration::from_millis(1000),
        }
    }

    /// Create configuration from environment variables (see module documentation).
    ///
    /// Unset or unparsable variables keep their default value.
    pub fn from_env() -> Self {
        fn get_env_flag(var: &str, default: bool) -> bool {
            match std::env::var(var) {
                Ok(val) => val.eq_ignore_ascii_case("true"),
                Err(_) => default,
            }
        }

        fn get_env_millis(var: &str, default: Duration) -> Duration {
            std::env::var(var)
                .ok()
                .and_then(|val| val.trim().parse::<u64>().ok())
                .map(Duration::from_millis)
                .unwrap_or(default)
        }

        let defaults = Self::new();
        Self {
            verbose: get_env_flag("TTT_VERBOSE", defaults.verbose),
            log: get_env_flag("TTT_LOG", defaults.log),
            tick_interval: get_env_millis("TTT_TICK_MS", defaults.tick_interval),
            win_pause: get_env_millis("TTT_WIN_PAUSE_MS", defaults.win_pause),
            status_interval: get_env_millis("TTT_STATUS_MS", defaults.status_interval),
        }
    }

    /// Enable or disable trace level logging.
    pub fn with_verbose(mut self, value: bool) -> Self {
        self.verbose = value;
        self
    }

    /// Enable or disable logging to file.
    pub fn with_log(mut self, value: bool) -> Self {
        self.log = value;
        self
    }

    /// Set the length of one session tick.
    pub fn with_tick_interval(mut self, value: Duration) -> Self {
        self.tick_interval = value;
        self
    }

    /// Set the pause between the end of a round and the next one.
    pub fn with_win_pause(mut self, value: Duration) -> Self {
        self.win_pause = value;
        self
    }

    /// Set how often a session logs its status.
    pub fn with_status_interval(mut self, value: Duration) -> Self {
        self.status_interval = value;
        self
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self::new()
    }
}

/// Stream-socket protocol names accepted in the connection file.
const SUPPORTED_PROTOCOLS: [&str; 3] = ["tcp", "tcp4", "tcp6"];

/// Listening address, as read from the connection file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    /// Transport protocol name, one of `tcp`, `tcp4`, `tcp6`.
    pub protocol: String,
    /// Host name or address to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
}

impl ConnectionConfig {
    /// Read a connection file: protocol, host, and port, one per line.
    ///
    /// # Errors
    /// When the file is unreadable or its content is invalid.
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("could not read connection config '{}'", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("invalid connection config '{}'", path.display()))
    }

    /// Parse the content of a connection file.
    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let mut lines = content.lines().map(str::trim);
        let mut next_line = |what: &str| match lines.next() {
            Some(line) if !line.is_empty() => Ok(line.to_owned()),
            _ => Err(anyhow!("missing {what} line")),
        };

        let protocol = next_line("protocol")?;
        let host = next_line("host")?;
        let port = next_line("port")?;

        if !SUPPORTED_PROTOCOLS.contains(&protocol.as_str()) {
            bail!("unsupported protocol '{protocol}', expected one of {SUPPORTED_PROTOCOLS:?}");
        }
        let port = port
            .parse()
            .with_context(|| format!("could not parse port '{port}'"))?;

        Ok(Self {
            protocol,
            host,
            port,
        })
    }

    /// `host:port`, with IPv6 hosts bracketed.
    pub fn address(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}
