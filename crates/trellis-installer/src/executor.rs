use std::path::PathBuf;

use anyhow::Result;
use trellis_core::{Backend, ConvergenceAction, InstallOptions, InstallTarget};
use trellis_host::EnvironmentFacts;

use crate::container::ContainerExecutor;
use crate::layout::InstallLayout;
use crate::native::NativeServiceExecutor;

/// One backend's materialization of a convergence plan. `install` converges
/// artifacts on disk; it does not guarantee the supervised process is
/// healthy.
pub trait Executor {
    fn install(&self, action: ConvergenceAction, options: &InstallOptions)
        -> Result<InstallReport>;
    fn uninstall(&self) -> Result<UninstallReport>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallReport {
    pub action: ConvergenceAction,
    /// Resolved release version (native) or image tag (container).
    pub version: String,
    pub binary_sha256: Option<String>,
    /// The config document this target reads, whether written or preserved.
    pub config_path: Option<PathBuf>,
    pub config_backup: Option<PathBuf>,
    /// Unit file or compose manifest.
    pub supervision_path: PathBuf,
    pub service_started: bool,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UninstallStatus {
    Uninstalled,
    /// Nothing to remove for this target: reported, not an error.
    NotInstalled,
    /// Some teardown steps failed; the rest were still attempted.
    Partial,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UninstallReport {
    pub status: UninstallStatus,
    pub removed: Vec<PathBuf>,
    pub warnings: Vec<String>,
}

pub fn run_install(
    target: InstallTarget,
    layout: &InstallLayout,
    facts: &EnvironmentFacts,
    action: ConvergenceAction,
    options: &InstallOptions,
) -> Result<InstallReport> {
    match target.backend {
        Backend::NativeService => {
            NativeServiceExecutor::new(target.role, layout, facts).install(action, options)
        }
        Backend::Container => {
            ContainerExecutor::new(target.role, layout, facts).install(action, options)
        }
    }
}

pub fn run_uninstall(
    target: InstallTarget,
    layout: &InstallLayout,
    facts: &EnvironmentFacts,
) -> Result<UninstallReport> {
    match target.backend {
        Backend::NativeService => NativeServiceExecutor::new(target.role, layout, facts).uninstall(),
        Backend::Container => ContainerExecutor::new(target.role, layout, facts).uninstall(),
    }
}
