use std::fs;
use std::process::Command;

use anyhow::Result;
use trellis_core::PromptSource;

use crate::exec::{command_succeeds, run_capture, run_command};

/// What to do when no time synchronization is active. Time sync degrades the
/// managed proxy tool's correctness, not the installer's safety, so nothing
/// here ever aborts an installation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeSyncPolicy {
    /// Proceed with a warning only.
    Skip,
    /// Attempt a distro-specific install-and-enable of a time daemon.
    AutoInstall,
    /// Ask the operator which of the two they want.
    Interactive,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeSyncReport {
    Active,
    SkippedWithWarning,
    Installed { distro: String },
    /// Advisory only; reported but never fatal.
    InstallFailed { detail: String },
    Declined,
}

/// The indicators are OR-combined: any one succeeding is sufficient.
pub fn time_sync_active() -> bool {
    timedatectl_synchronized() || chrony_tracking() || ntpstat_synchronized()
}

fn timedatectl_synchronized() -> bool {
    let mut command = Command::new("timedatectl");
    command.args(["show", "--property", "NTPSynchronized", "--value"]);
    match run_capture(&mut command, "timedatectl query failed") {
        Ok(value) => value == "yes",
        Err(_) => false,
    }
}

fn chrony_tracking() -> bool {
    let mut command = Command::new("chronyc");
    command.arg("tracking");
    command_succeeds(&mut command)
}

fn ntpstat_synchronized() -> bool {
    let mut command = Command::new("ntpstat");
    command_succeeds(&mut command)
}

pub fn ensure_time_sync(
    policy: TimeSyncPolicy,
    prompts: &mut dyn PromptSource,
) -> Result<TimeSyncReport> {
    if time_sync_active() {
        return Ok(TimeSyncReport::Active);
    }

    match policy {
        TimeSyncPolicy::Skip => Ok(TimeSyncReport::SkippedWithWarning),
        TimeSyncPolicy::AutoInstall => Ok(install_time_daemon()),
        TimeSyncPolicy::Interactive => {
            let install = prompts.confirm(
                "No active time synchronization was detected. Install and enable a time daemon now?",
                true,
            )?;
            if install {
                Ok(install_time_daemon())
            } else {
                Ok(TimeSyncReport::Declined)
            }
        }
    }
}

type StrategyStep = (&'static str, &'static [&'static str], &'static str);

/// Ordered (package-manager, service-enable) command pairs keyed by the
/// detected distribution. Unknown distributions map to no strategy, which
/// surfaces as an advisory failure.
pub(crate) fn strategy_for(distro: &str) -> Option<Vec<StrategyStep>> {
    match distro {
        "debian" | "ubuntu" => Some(vec![
            (
                "apt-get",
                &["install", "-y", "chrony"],
                "installing chrony with apt-get failed",
            ),
            (
                "systemctl",
                &["enable", "--now", "chrony"],
                "enabling chrony failed",
            ),
        ]),
        "fedora" | "rhel" | "centos" | "rocky" | "almalinux" => Some(vec![
            (
                "dnf",
                &["install", "-y", "chrony"],
                "installing chrony with dnf failed",
            ),
            (
                "systemctl",
                &["enable", "--now", "chronyd"],
                "enabling chronyd failed",
            ),
        ]),
        "opensuse-leap" | "opensuse-tumbleweed" | "sles" => Some(vec![
            (
                "zypper",
                &["--non-interactive", "install", "chrony"],
                "installing chrony with zypper failed",
            ),
            (
                "systemctl",
                &["enable", "--now", "chronyd"],
                "enabling chronyd failed",
            ),
        ]),
        _ => None,
    }
}

fn install_time_daemon() -> TimeSyncReport {
    let Some(distro) = detect_distro() else {
        return TimeSyncReport::InstallFailed {
            detail: "could not determine the distribution from /etc/os-release".to_string(),
        };
    };
    let Some(steps) = strategy_for(&distro) else {
        return TimeSyncReport::InstallFailed {
            detail: format!("no time daemon strategy for distribution '{distro}'"),
        };
    };

    for (program, args, context_message) in steps {
        let mut command = Command::new(program);
        command.args(args);
        if let Err(err) = run_command(&mut command, context_message) {
            return TimeSyncReport::InstallFailed {
                detail: format!("{err:#}"),
            };
        }
    }

    TimeSyncReport::Installed { distro }
}

pub(crate) fn parse_os_release_id(raw: &str) -> Option<String> {
    raw.lines()
        .find_map(|line| line.strip_prefix("ID="))
        .map(|value| value.trim().trim_matches('"').to_string())
        .filter(|value| !value.is_empty())
}

fn detect_distro() -> Option<String> {
    let raw = fs::read_to_string("/etc/os-release").ok()?;
    parse_os_release_id(&raw)
}
