use std::path::Path;
use std::process::Command;

use anyhow::Result;
use trellis_core::{HostArch, HostOs};

use crate::exec::command_succeeds;
use crate::timesync;

/// How compose is invoked on this host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposeVariant {
    /// `docker compose` plugin.
    Plugin,
    /// Legacy standalone `docker-compose` binary.
    Standalone,
}

impl ComposeVariant {
    /// Program and leading arguments for a compose invocation.
    pub fn command(self) -> (&'static str, &'static [&'static str]) {
        match self {
            Self::Plugin => ("docker", &["compose"]),
            Self::Standalone => ("docker-compose", &[]),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerRuntime {
    Absent,
    /// Docker responds but no compose front-end was found.
    MissingCompose,
    Ready(ComposeVariant),
}

/// Host facts the state machine needs to make safe decisions. Read-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnvironmentFacts {
    pub os: HostOs,
    pub arch: HostArch,
    pub has_systemd: bool,
    pub container_runtime: ContainerRuntime,
    pub time_sync_active: bool,
}

/// Inspects the host. An unsupported kernel family or architecture is an
/// unrecoverable precondition failure. A missing service supervisor or
/// container runtime is not; the chosen backend re-checks before mutating
/// anything.
pub fn probe() -> Result<EnvironmentFacts> {
    let os = HostOs::from_target(std::env::consts::OS)?;
    let arch = HostArch::from_target(std::env::consts::ARCH)?;

    Ok(EnvironmentFacts {
        os,
        arch,
        has_systemd: systemd_present(),
        container_runtime: detect_container_runtime(),
        time_sync_active: timesync::time_sync_active(),
    })
}

fn systemd_present() -> bool {
    Path::new("/run/systemd/system").exists()
}

fn detect_container_runtime() -> ContainerRuntime {
    let mut docker = Command::new("docker");
    docker.arg("info");
    if !command_succeeds(&mut docker) {
        return ContainerRuntime::Absent;
    }

    let mut plugin = Command::new("docker");
    plugin.args(["compose", "version"]);
    if command_succeeds(&mut plugin) {
        return ContainerRuntime::Ready(ComposeVariant::Plugin);
    }

    let mut standalone = Command::new("docker-compose");
    standalone.arg("version");
    if command_succeeds(&mut standalone) {
        return ContainerRuntime::Ready(ComposeVariant::Standalone);
    }

    ContainerRuntime::MissingCompose
}
