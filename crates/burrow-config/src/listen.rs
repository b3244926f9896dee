use std::fmt;

use thiserror::Error;

/// TCP address the shell listener binds to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenAddress {
    host: String,
    port: u16,
}

impl ListenAddress {
    /// Builds a listen address from its host and port.
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Host name or literal address.
    #[must_use]
    pub fn host(&self) -> &str {
        self.host.as_str()
    }

    /// TCP port; `0` asks the OS for an ephemeral port.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Validates that the host is usable for binding.
    ///
    /// # Errors
    ///
    /// Returns [`ListenAddressParseError::MissingHost`] when the host is blank.
    pub fn validate(&self) -> Result<(), ListenAddressParseError> {
        if self.host.trim().is_empty() {
            return Err(ListenAddressParseError::MissingHost(self.to_string()));
        }
        Ok(())
    }
}

impl fmt::Display for ListenAddress {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "tcp://{}:{}", self.host, self.port)
    }
}

/// Errors reported for unusable listen addresses.
#[derive(Debug, Error)]
pub enum ListenAddressParseError {
    /// The host component was empty.
    #[error("missing TCP host in '{0}'")]
    MissingHost(String),
}
