//! Process supervision test world shared across BDD scenarios.

use std::io::{ErrorKind, Read, Write};
use std::net::{SocketAddr, TcpStream};
use std::sync::{Arc, Condvar, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use crate::health::HealthReporter;
use crate::process::LaunchError;
use crate::process::launch::{LaunchPlan, ServiceDeps, run_daemon_with};
use crate::process::shutdown::{ShutdownError, ShutdownSignal};
use crate::tests::support::{FailingConfigLoader, RecordingHealthReporter, TestConfigLoader};

pub const WAIT_TIMEOUT: Duration = Duration::from_secs(3);
pub const POLL_INTERVAL: Duration = Duration::from_millis(25);

pub type StepResult = Result<(), String>;

pub struct ProcessTestWorld {
    loader: TestConfigLoader,
    pub reporter: Arc<RecordingHealthReporter>,
    shutdown: TestShutdownSignal,
    handle: Option<thread::JoinHandle<Result<(), LaunchError>>>,
    result: Option<Result<(), LaunchError>>,
    client: Option<TcpStream>,
    transcript: String,
}

impl Default for ProcessTestWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessTestWorld {
    pub fn new() -> Self {
        Self {
            loader: TestConfigLoader::new(),
            reporter: Arc::new(RecordingHealthReporter::default()),
            shutdown: TestShutdownSignal::new(),
            handle: None,
            result: None,
            client: None,
            transcript: String::new(),
        }
    }

    pub fn start_background(&mut self) -> StepResult {
        if self.handle.is_some() {
            return Err("daemon already running".to_owned());
        }
        let loader = self.loader.clone();
        let reporter = self.reporter.clone() as Arc<dyn HealthReporter>;
        let shutdown = self.shutdown.clone();
        self.handle = Some(thread::spawn(move || {
            run_daemon_with(LaunchPlan {
                shutdown,
                services: ServiceDeps { loader, reporter },
            })
        }));
        Ok(())
    }

    pub fn start_with_invalid_config(&mut self) -> StepResult {
        if self.result.is_some() {
            return Err("result already recorded".to_owned());
        }
        let reporter = self.reporter.clone() as Arc<dyn HealthReporter>;
        let plan = LaunchPlan {
            shutdown: TestShutdownSignal::new(),
            services: ServiceDeps {
                loader: FailingConfigLoader,
                reporter,
            },
        };
        self.result = Some(run_daemon_with(plan));
        Ok(())
    }

    pub fn wait_for_ready(&self) -> Result<SocketAddr, String> {
        let deadline = Instant::now() + WAIT_TIMEOUT;
        while Instant::now() < deadline {
            if let Some(address) = self.reporter.ready_address() {
                return Ok(address);
            }
            thread::sleep(POLL_INTERVAL);
        }
        Err("daemon did not report a listening address".to_owned())
    }

    pub fn connect(&mut self) -> StepResult {
        let address = self.wait_for_ready()?;
        let stream = TcpStream::connect(address).map_err(|error| error.to_string())?;
        stream
            .set_read_timeout(Some(POLL_INTERVAL))
            .map_err(|error| error.to_string())?;
        self.client = Some(stream);
        Ok(())
    }

    /// Sends one line, starting a fresh transcript for its reply.
    pub fn send(&mut self, line: &str) -> StepResult {
        self.transcript.clear();
        let client = self
            .client
            .as_mut()
            .ok_or_else(|| "client not connected".to_owned())?;
        client
            .write_all(format!("{line}\n").as_bytes())
            .map_err(|error| error.to_string())
    }

    /// Reads until the transcript ends with `suffix` or the wait times out.
    pub fn read_until(&mut self, suffix: &str) -> StepResult {
        let client = self
            .client
            .as_mut()
            .ok_or_else(|| "client not connected".to_owned())?;
        let deadline = Instant::now() + WAIT_TIMEOUT;
        let mut chunk = [0_u8; 256];
        while Instant::now() < deadline {
            if self.transcript.ends_with(suffix) {
                return Ok(());
            }
            match client.read(&mut chunk) {
                Ok(0) => break,
                Ok(count) => {
                    let bytes = chunk.get(..count).unwrap_or_default();
                    self.transcript.push_str(&String::from_utf8_lossy(bytes));
                }
                Err(error)
                    if matches!(error.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {}
                Err(error) => return Err(error.to_string()),
            }
        }
        if self.transcript.ends_with(suffix) {
            Ok(())
        } else {
            Err(format!(
                "expected output ending with {suffix:?}, got {:?}",
                self.transcript
            ))
        }
    }

    pub fn transcript(&self) -> &str {
        &self.transcript
    }

    pub fn trigger_shutdown(&self) {
        self.shutdown.trigger();
    }

    pub fn join_background(&mut self) -> StepResult {
        let handle = self
            .handle
            .take()
            .ok_or_else(|| "daemon not running".to_owned())?;
        match handle.join() {
            Ok(result) => {
                self.result = Some(result);
                Ok(())
            }
            Err(_) => Err("daemon thread panicked".to_owned()),
        }
    }

    pub fn last_result(&self) -> Option<&Result<(), LaunchError>> {
        self.result.as_ref()
    }

    pub fn client_closed(&mut self) -> bool {
        let Some(client) = self.client.as_mut() else {
            return true;
        };
        let deadline = Instant::now() + WAIT_TIMEOUT;
        let mut chunk = [0_u8; 64];
        while Instant::now() < deadline {
            match client.read(&mut chunk) {
                Ok(0) => return true,
                Ok(_) => {}
                Err(error)
                    if matches!(error.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {}
                Err(_) => return true,
            }
        }
        false
    }
}

impl Drop for ProcessTestWorld {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.shutdown.trigger();
            drop(handle.join());
        }
    }
}

#[derive(Clone)]
pub struct TestShutdownSignal {
    state: Arc<(Mutex<bool>, Condvar)>,
}

impl TestShutdownSignal {
    pub fn new() -> Self {
        Self {
            state: Arc::new((Mutex::new(false), Condvar::new())),
        }
    }

    pub fn trigger(&self) {
        let (lock, cvar) = &*self.state;
        let mut triggered = lock.lock().expect("shutdown mutex poisoned");
        *triggered = true;
        cvar.notify_all();
    }
}

impl ShutdownSignal for TestShutdownSignal {
    fn wait(&self) -> Result<(), ShutdownError> {
        let (lock, cvar) = &*self.state;
        let mut triggered = lock.lock().expect("shutdown mutex poisoned");
        while !*triggered {
            triggered = cvar.wait(triggered).expect("shutdown mutex poisoned");
        }
        Ok(())
    }
}
