use std::path::Path;
use std::process::Command;

use anyhow::{anyhow, Result};
use trellis_core::{download_url, render_config, ConvergenceAction, InstallOptions, Role};
use trellis_host::{run_command, EnvironmentFacts};

use crate::executor::{Executor, InstallReport, UninstallReport, UninstallStatus};
use crate::fs_utils::{atomic_write, backup_file, remove_file_if_exists};
use crate::layout::InstallLayout;
use crate::resolver;

/// Materializes a plan as a downloaded binary, a config document, and a
/// systemd unit.
pub struct NativeServiceExecutor<'a> {
    role: Role,
    layout: &'a InstallLayout,
    facts: &'a EnvironmentFacts,
}

impl<'a> NativeServiceExecutor<'a> {
    pub fn new(role: Role, layout: &'a InstallLayout, facts: &'a EnvironmentFacts) -> Self {
        Self {
            role,
            layout,
            facts,
        }
    }

    /// Install with injectable download and systemctl seams. Step order is
    /// fixed; a failed step stops the run and leaves earlier steps' artifacts
    /// in place, except that supervisor failures after the artifacts are
    /// converged are reported rather than fatal.
    pub fn install_with<Download, RunCommand>(
        &self,
        action: ConvergenceAction,
        options: &InstallOptions,
        mut download: Download,
        mut run_systemctl: RunCommand,
    ) -> Result<InstallReport>
    where
        Download: FnMut(&str, &Path) -> Result<String>,
        RunCommand: FnMut(&mut Command, &str) -> Result<()>,
    {
        if !self.facts.has_systemd {
            return Err(anyhow!(
                "systemd is required for the system method but was not detected on this host"
            ));
        }

        self.layout.ensure_native_dirs(self.role)?;

        let version = resolver::resolve_version(options.version.as_deref())?;
        let url = download_url(&version, self.role, self.facts.os, self.facts.arch);
        let binary_path = self.layout.binary_path(self.role);
        let binary_sha256 = download(&url, &binary_path)?;

        let config_path = self.layout.config_path(self.role);
        let mut config_backup = None;
        if action.writes_config() {
            if action == ConvergenceAction::UpgradeReplaceConfig && config_path.exists() {
                config_backup = Some(backup_file(&config_path)?);
            }
            let rendered = render_config(self.role, options)?;
            // Owner-only: the document carries secret material.
            atomic_write(&config_path, &rendered, 0o600)?;
        }

        let unit_path = self.layout.unit_path(self.role);
        let unit = render_unit(
            self.role,
            &binary_path,
            &config_path,
            &self.layout.role_data_dir(self.role),
        );
        atomic_write(&unit_path, &unit, 0o644)?;

        let unit_name = InstallLayout::unit_name(self.role);
        let mut warnings = Vec::new();
        let mut service_started = true;
        let steps: [(&[&str], &str); 3] = [
            (&["daemon-reload"], "systemctl daemon-reload failed"),
            (&["enable", unit_name.as_str()], "enabling the unit failed"),
            (&["restart", unit_name.as_str()], "starting the unit failed"),
        ];
        for (args, context_message) in steps {
            let mut command = Command::new("systemctl");
            command.args(args);
            if let Err(err) = run_systemctl(&mut command, context_message) {
                warnings.push(format!("{err:#}"));
                service_started = false;
            }
        }

        Ok(InstallReport {
            action,
            version,
            binary_sha256: Some(binary_sha256),
            config_path: Some(config_path),
            config_backup,
            supervision_path: unit_path,
            service_started,
            warnings,
        })
    }

    /// Best-effort teardown: every step is attempted even when an earlier
    /// one fails. Config and data directories are deliberately left in place.
    pub fn uninstall_with<RunCommand>(&self, mut run_systemctl: RunCommand) -> Result<UninstallReport>
    where
        RunCommand: FnMut(&mut Command, &str) -> Result<()>,
    {
        let unit_path = self.layout.unit_path(self.role);
        let binary_path = self.layout.binary_path(self.role);
        let unit_present = unit_path.exists();
        let binary_present = binary_path.exists();
        if !unit_present && !binary_present {
            return Ok(UninstallReport {
                status: UninstallStatus::NotInstalled,
                removed: Vec::new(),
                warnings: Vec::new(),
            });
        }

        let unit_name = InstallLayout::unit_name(self.role);
        let mut warnings = Vec::new();
        let mut removed = Vec::new();

        if unit_present {
            let steps: [(&[&str], &str); 2] = [
                (&["stop", unit_name.as_str()], "stopping the unit failed"),
                (&["disable", unit_name.as_str()], "disabling the unit failed"),
            ];
            for (args, context_message) in steps {
                let mut command = Command::new("systemctl");
                command.args(args);
                if let Err(err) = run_systemctl(&mut command, context_message) {
                    warnings.push(format!("{err:#}"));
                }
            }

            match remove_file_if_exists(&unit_path) {
                Ok(()) => removed.push(unit_path.clone()),
                Err(err) => warnings.push(format!(
                    "failed to remove unit {}: {err}",
                    unit_path.display()
                )),
            }

            let mut reload = Command::new("systemctl");
            reload.arg("daemon-reload");
            if let Err(err) = run_systemctl(&mut reload, "systemctl daemon-reload failed") {
                warnings.push(format!("{err:#}"));
            }
        }

        if binary_present {
            match remove_file_if_exists(&binary_path) {
                Ok(()) => removed.push(binary_path.clone()),
                Err(err) => warnings.push(format!(
                    "failed to remove binary {}: {err}",
                    binary_path.display()
                )),
            }
        }

        let status = if warnings.is_empty() {
            UninstallStatus::Uninstalled
        } else {
            UninstallStatus::Partial
        };
        Ok(UninstallReport {
            status,
            removed,
            warnings,
        })
    }
}

impl Executor for NativeServiceExecutor<'_> {
    fn install(
        &self,
        action: ConvergenceAction,
        options: &InstallOptions,
    ) -> Result<InstallReport> {
        self.install_with(action, options, resolver::download_binary, run_command)
    }

    fn uninstall(&self) -> Result<UninstallReport> {
        self.uninstall_with(run_command)
    }
}

/// Unit declares restart-always with a fixed delay, a high but bounded file
/// descriptor limit, and ordering on network availability.
pub(crate) fn render_unit(
    role: Role,
    binary_path: &Path,
    config_path: &Path,
    working_dir: &Path,
) -> String {
    format!(
        "[Unit]\n\
         Description=Trellis {role} agent\n\
         After=network-online.target\n\
         Wants=network-online.target\n\
         \n\
         [Service]\n\
         Type=simple\n\
         WorkingDirectory={working_dir}\n\
         ExecStart={binary} --config {config}\n\
         Restart=always\n\
         RestartSec=5\n\
         LimitNOFILE=65535\n\
         \n\
         [Install]\n\
         WantedBy=multi-user.target\n",
        working_dir = working_dir.display(),
        binary = binary_path.display(),
        config = config_path.display(),
    )
}
