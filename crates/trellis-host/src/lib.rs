mod exec;
mod probe;
mod timesync;

pub use exec::{command_succeeds, run_command, run_capture};
pub use probe::{probe, ComposeVariant, ContainerRuntime, EnvironmentFacts};
pub use timesync::{ensure_time_sync, time_sync_active, TimeSyncPolicy, TimeSyncReport};

#[cfg(test)]
mod tests;
