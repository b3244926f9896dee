//! Test configuration loaders for scenarios covering success and failure paths.

use std::ffi::OsString;
use std::fs;
use std::sync::Arc;

use camino::Utf8PathBuf;
use ortho_config::{OrthoConfig, OrthoError};
use tempfile::TempDir;

use burrow_config::Config;

use crate::bootstrap::ConfigLoader;

/// Loader that binds to an ephemeral loopback port and stores sandboxes under
/// a temporary directory.
#[derive(Clone)]
pub struct TestConfigLoader {
    storage: Arc<TempDir>,
    storage_name: &'static str,
}

impl TestConfigLoader {
    #[must_use]
    pub fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temporary storage directory");
        Self {
            storage: Arc::new(dir),
            storage_name: "server",
        }
    }

    /// Places a regular file where the storage root should be created.
    #[must_use]
    pub fn with_blocked_storage() -> Self {
        let loader = Self {
            storage_name: "blocked",
            ..Self::new()
        };
        fs::write(loader.storage_root().as_std_path(), b"not a directory")
            .expect("failed to write storage blocker");
        loader
    }

    pub fn storage_root(&self) -> Utf8PathBuf {
        let path = self.storage.path().join(self.storage_name);
        Utf8PathBuf::from_path_buf(path).expect("temporary storage path was not valid UTF-8")
    }
}

impl Default for TestConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader for TestConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        Ok(Config {
            listen_host: String::from("127.0.0.1"),
            listen_port: 0,
            storage_root: self.storage_root(),
            ..Config::default()
        })
    }
}

/// Loader that intentionally fails by passing invalid CLI arguments.
pub struct FailingConfigLoader;

impl ConfigLoader for FailingConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        let args = vec![
            OsString::from("burrowd"),
            OsString::from("--listen-port"),
            OsString::from("not-a-port"),
        ];
        Config::load_from_iter(args)
    }
}
