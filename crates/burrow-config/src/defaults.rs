use camino::Utf8PathBuf;

use crate::logging::LogFormat;

/// Default listener host; accepts connections on every interface.
pub const DEFAULT_LISTEN_HOST: &str = "0.0.0.0";

/// Default TCP port for the shell listener.
pub const DEFAULT_LISTEN_PORT: u16 = 5679;

/// Default directory holding the per-client sandbox roots.
pub const DEFAULT_STORAGE_ROOT: &str = "server";

/// Default scratch buffer size for a single socket read.
pub const DEFAULT_READ_BUFFER_BYTES: usize = 512;

/// Default cap on a command line awaiting its terminator.
pub const DEFAULT_MAX_LINE_BYTES: usize = 64 * 1024;

/// Default log filter expression used by the daemon.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Owned listener host, for serde defaults.
pub fn default_listen_host() -> String {
    DEFAULT_LISTEN_HOST.to_string()
}

/// Listener port, for serde defaults.
pub fn default_listen_port() -> u16 {
    DEFAULT_LISTEN_PORT
}

/// Owned storage root path, for serde defaults.
pub fn default_storage_root() -> Utf8PathBuf {
    Utf8PathBuf::from(DEFAULT_STORAGE_ROOT)
}

/// Read buffer size, for serde defaults.
pub fn default_read_buffer_bytes() -> usize {
    DEFAULT_READ_BUFFER_BYTES
}

/// Pending line cap, for serde defaults.
pub fn default_max_line_bytes() -> usize {
    DEFAULT_MAX_LINE_BYTES
}

/// Default log filter expression used by the daemon.
pub fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Owned log filter value used where allocation is required (e.g. serde).
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

/// Default logging format for the daemon.
pub fn default_log_format() -> LogFormat {
    LogFormat::Json
}
