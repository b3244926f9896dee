//! Test harness utilities shared by the daemon behavioural suites.

mod config_loader;
mod process_world;
mod quoted;
mod reporter;
mod world;

pub use config_loader::{FailingConfigLoader, TestConfigLoader};
pub use process_world::{ProcessTestWorld, StepResult};
pub use quoted::QuotedString;
pub use reporter::{HealthEvent, RecordingHealthReporter};
pub use world::{TestWorld, world};
