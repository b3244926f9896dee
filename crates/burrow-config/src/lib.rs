//! Shared configuration for the Burrow shell daemon.
//!
//! Configuration is layered by [`ortho_config`]: built-in defaults, then an
//! optional TOML file (`--config-path` or `BURROW_CONFIG_PATH`), then
//! `BURROW_*` environment variables, then command-line flags. The resolved
//! [`Config`] tells the daemon where to listen, where the per-client sandbox
//! roots live, how large its read buffers are, and how to log.

mod defaults;
mod listen;
mod logging;
mod storage;

use camino::{Utf8Path, Utf8PathBuf};
use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

pub use defaults::{
    DEFAULT_LISTEN_HOST, DEFAULT_LISTEN_PORT, DEFAULT_LOG_FILTER, DEFAULT_MAX_LINE_BYTES,
    DEFAULT_READ_BUFFER_BYTES, DEFAULT_STORAGE_ROOT, default_listen_host, default_listen_port,
    default_log_filter, default_log_filter_string, default_log_format, default_max_line_bytes,
    default_read_buffer_bytes, default_storage_root,
};
pub use listen::{ListenAddress, ListenAddressParseError};
pub use logging::{LogFormat, LogFormatParseError};
pub use storage::StoragePreparationError;

/// Resolved daemon configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "BURROW")]
pub struct Config {
    /// Host name or address the TCP listener binds to.
    #[serde(default = "defaults::default_listen_host")]
    #[ortho_config(default = defaults::default_listen_host())]
    pub listen_host: String,
    /// TCP port the listener binds to.
    #[serde(default = "defaults::default_listen_port")]
    #[ortho_config(default = defaults::default_listen_port())]
    pub listen_port: u16,
    /// Directory holding one sandbox root per client host.
    #[serde(default = "defaults::default_storage_root")]
    #[ortho_config(default = defaults::default_storage_root())]
    pub storage_root: Utf8PathBuf,
    /// Size of the scratch buffer used for each socket read.
    #[serde(default = "defaults::default_read_buffer_bytes")]
    #[ortho_config(default = defaults::default_read_buffer_bytes())]
    pub read_buffer_bytes: usize,
    /// Upper bound on a command line still waiting for its terminator.
    #[serde(default = "defaults::default_max_line_bytes")]
    #[ortho_config(default = defaults::default_max_line_bytes())]
    pub max_line_bytes: usize,
    /// `tracing` filter expression.
    #[serde(default = "defaults::default_log_filter_string")]
    #[ortho_config(default = defaults::default_log_filter_string())]
    pub log_filter: String,
    /// Output format for log records.
    #[serde(default = "defaults::default_log_format")]
    #[ortho_config(default = defaults::default_log_format())]
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_host: default_listen_host(),
            listen_port: default_listen_port(),
            storage_root: default_storage_root(),
            read_buffer_bytes: default_read_buffer_bytes(),
            max_line_bytes: default_max_line_bytes(),
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
        }
    }
}

impl Config {
    /// Address the daemon listens on.
    #[must_use]
    pub fn listen_address(&self) -> ListenAddress {
        ListenAddress::new(self.listen_host.clone(), self.listen_port)
    }

    /// Directory under which sandbox roots are created.
    #[must_use]
    pub fn storage_root(&self) -> &Utf8Path {
        self.storage_root.as_path()
    }

    /// Scratch read buffer size, never zero.
    #[must_use]
    pub fn read_buffer_bytes(&self) -> usize {
        self.read_buffer_bytes.max(1)
    }

    /// Maximum length of a pending command line.
    #[must_use]
    pub fn max_line_bytes(&self) -> usize {
        self.max_line_bytes.max(self.read_buffer_bytes())
    }

    /// Log filter expression.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        self.log_filter.as_str()
    }

    /// Log output format.
    #[must_use]
    pub fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Creates the storage root directory when it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns [`StoragePreparationError`] when the directory cannot be
    /// created or the path exists but is not a directory.
    pub fn prepare_storage_root(&self) -> Result<(), StoragePreparationError> {
        storage::prepare(self.storage_root())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn default_config_matches_documented_defaults() {
        let config = Config::default();
        assert_eq!(config.listen_host, DEFAULT_LISTEN_HOST);
        assert_eq!(config.listen_port, DEFAULT_LISTEN_PORT);
        assert_eq!(config.storage_root(), Utf8Path::new(DEFAULT_STORAGE_ROOT));
        assert_eq!(config.read_buffer_bytes(), DEFAULT_READ_BUFFER_BYTES);
        assert_eq!(config.max_line_bytes(), DEFAULT_MAX_LINE_BYTES);
        assert_eq!(config.log_filter(), DEFAULT_LOG_FILTER);
        assert_eq!(config.log_format(), LogFormat::Json);
    }

    #[rstest]
    fn loading_without_any_layer_yields_defaults() {
        let config = Config::load_from_iter([std::ffi::OsString::from("burrowd")])
            .expect("defaults alone must form a configuration");
        assert_eq!(config, Config::default());
    }

    #[rstest]
    fn listen_address_combines_host_and_port() {
        let config = Config {
            listen_host: String::from("127.0.0.1"),
            listen_port: 7000,
            ..Config::default()
        };
        assert_eq!(config.listen_address().to_string(), "tcp://127.0.0.1:7000");
    }

    #[rstest]
    #[case(0, 0, 1, 1)]
    #[case(16, 8, 16, 16)]
    #[case(512, 4096, 512, 4096)]
    fn buffer_sizes_are_clamped(
        #[case] read: usize,
        #[case] max_line: usize,
        #[case] expected_read: usize,
        #[case] expected_max_line: usize,
    ) {
        let config = Config {
            read_buffer_bytes: read,
            max_line_bytes: max_line,
            ..Config::default()
        };
        assert_eq!(config.read_buffer_bytes(), expected_read);
        assert_eq!(config.max_line_bytes(), expected_max_line);
    }
}
