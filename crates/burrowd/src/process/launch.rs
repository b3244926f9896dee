//! Supervises daemon launch sequencing and runtime orchestration.

use std::sync::Arc;

use tracing::info;

use crate::StructuredHealthReporter;
use crate::bootstrap::{ConfigLoader, SystemConfigLoader, bootstrap_with};
use crate::health::HealthReporter;
use crate::storage::LocalFilesystem;
use crate::transport::{LoopSettings, SocketListener};

use super::PROCESS_TARGET;
use super::errors::LaunchError;
use super::shutdown::{ShutdownSignal, SystemShutdownSignal};

/// Service dependencies required to construct the daemon runtime.
pub(crate) struct ServiceDeps<L> {
    pub(crate) loader: L,
    pub(crate) reporter: Arc<dyn HealthReporter>,
}

/// Collaborators required to launch the daemon runtime.
pub(crate) struct LaunchPlan<L, S> {
    pub(crate) shutdown: S,
    pub(crate) services: ServiceDeps<L>,
}

/// Runs the daemon using the production collaborators.
///
/// Blocks until a termination signal arrives, then stops the event loop and
/// waits for it to close every connection.
///
/// # Errors
///
/// Returns [`LaunchError`] when bootstrap, listener startup or the signal wait
/// fails.
pub fn run_daemon() -> Result<(), LaunchError> {
    let plan = LaunchPlan {
        shutdown: SystemShutdownSignal::new(),
        services: ServiceDeps {
            loader: SystemConfigLoader,
            reporter: Arc::new(StructuredHealthReporter::new()),
        },
    };
    run_daemon_with(plan)
}

/// Runs the daemon with injected collaborators.
pub(crate) fn run_daemon_with<L, S>(plan: LaunchPlan<L, S>) -> Result<(), LaunchError>
where
    L: ConfigLoader,
    S: ShutdownSignal,
{
    let LaunchPlan { shutdown, services } = plan;
    let ServiceDeps { loader, reporter } = services;

    info!(target: PROCESS_TARGET, "starting daemon runtime");
    let daemon = bootstrap_with(&loader, reporter)?;
    let config = daemon.config();
    let reporter = daemon.reporter();

    let listener = SocketListener::bind(&config.listen_address())?;
    let handle = listener.start(LoopSettings::from_config(config), LocalFilesystem::new())?;
    reporter.listener_ready(handle.local_addr());

    let waited = shutdown.wait();
    info!(target: PROCESS_TARGET, "stopping shell listener");
    handle.shutdown();
    let joined = handle.join();
    reporter.listener_stopped();

    waited?;
    joined?;
    info!(target: PROCESS_TARGET, "shutdown sequence completed");
    Ok(())
}
