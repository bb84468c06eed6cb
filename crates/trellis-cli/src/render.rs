use std::io::IsTerminal;
use std::time::Duration;

use anstyle::{AnsiColor, Effects, Style};
use indicatif::ProgressBar;
use trellis_core::{
    classify_version_change, ConvergenceAction, GeneratedSecrets, InstallTarget, PriorState,
    VersionChange,
};
use trellis_host::TimeSyncReport;
use trellis_installer::{InstallReport, UninstallReport, UninstallStatus};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum OutputStyle {
    Plain,
    Rich,
}

pub fn current_output_style() -> OutputStyle {
    if std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal() {
        OutputStyle::Rich
    } else {
        OutputStyle::Plain
    }
}

fn status_style(status: &str) -> Style {
    match status {
        "ok" => Style::new()
            .fg_color(Some(AnsiColor::Green.into()))
            .effects(Effects::BOLD),
        "warn" => Style::new()
            .fg_color(Some(AnsiColor::Yellow.into()))
            .effects(Effects::BOLD),
        "error" => Style::new()
            .fg_color(Some(AnsiColor::Red.into()))
            .effects(Effects::BOLD),
        _ => Style::new().fg_color(Some(AnsiColor::BrightBlue.into())),
    }
}

fn colorize(style: Style, text: &str) -> String {
    format!("{}{}{}", style.render(), text, style.render_reset())
}

pub fn render_status_line(style: OutputStyle, status: &str, message: &str) -> String {
    let tag = format!("[{status}]");
    match style {
        OutputStyle::Plain => format!("{tag} {message}"),
        OutputStyle::Rich => format!("{} {message}", colorize(status_style(status), &tag)),
    }
}

pub fn print_status(status: &str, message: &str) {
    println!("{}", render_status_line(current_output_style(), status, message));
}

pub fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
}

/// Spinner shown while an executor converges a target. Hidden on plain
/// output.
pub fn start_spinner(label: &str) -> ProgressBar {
    if current_output_style() == OutputStyle::Plain {
        return ProgressBar::hidden();
    }
    let progress = ProgressBar::new_spinner();
    progress.set_message(label.to_string());
    progress.enable_steady_tick(Duration::from_millis(80));
    progress
}

pub fn install_summary_lines(
    target: InstallTarget,
    prior: &PriorState,
    report: &InstallReport,
    generated: &GeneratedSecrets,
    timesync: &TimeSyncReport,
) -> Vec<String> {
    let mut lines = vec![format!("Converged {target}: {}", report.action)];

    match classify_version_change(prior.installed_version(), &report.version) {
        VersionChange::Upgraded => lines.push(format!(
            "Version: {} (upgraded from {})",
            report.version,
            prior.installed_version().unwrap_or("unknown")
        )),
        VersionChange::Downgraded => lines.push(format!(
            "Version: {} (downgraded from {})",
            report.version,
            prior.installed_version().unwrap_or("unknown")
        )),
        VersionChange::Reinstalled => {
            lines.push(format!("Version: {} (reinstalled)", report.version))
        }
        VersionChange::Unknown => lines.push(format!("Version: {}", report.version)),
    }

    if let Some(digest) = &report.binary_sha256 {
        lines.push(format!("Binary sha256: {digest}"));
    }
    if let Some(config_path) = &report.config_path {
        if report.action == ConvergenceAction::UpgradePreserveConfig {
            lines.push(format!("Config: {} (preserved)", config_path.display()));
        } else {
            lines.push(format!("Config: {}", config_path.display()));
        }
    }
    if let Some(backup) = &report.config_backup {
        lines.push(format!("Config backup: {}", backup.display()));
    }
    lines.push(format!(
        "Supervision: {}",
        report.supervision_path.display()
    ));

    if let Some(secret) = &generated.jwt_secret {
        lines.push(format!("Generated jwt secret: {secret}"));
    }
    if let Some(password) = &generated.admin_password {
        lines.push(format!("Generated admin password: {password}"));
    }

    if report.service_started {
        lines.push("Service: started".to_string());
    } else {
        lines.push(
            "Service: artifacts converged but the service did not start; fix the config and restart it in place"
                .to_string(),
        );
    }
    for warning in &report.warnings {
        lines.push(format!("Warning: {warning}"));
    }
    lines.push(time_sync_line(timesync));
    lines
}

fn time_sync_line(report: &TimeSyncReport) -> String {
    match report {
        TimeSyncReport::Active => "Time sync: active".to_string(),
        TimeSyncReport::SkippedWithWarning => {
            "Time sync: not active; the managed proxy may misbehave until NTP is configured"
                .to_string()
        }
        TimeSyncReport::Installed { distro } => {
            format!("Time sync: installed and enabled a time daemon ({distro})")
        }
        TimeSyncReport::InstallFailed { detail } => {
            format!("Time sync: time daemon install failed ({detail}); continuing")
        }
        TimeSyncReport::Declined => "Time sync: left inactive at the operator's request".to_string(),
    }
}

pub fn uninstall_summary_lines(target: InstallTarget, report: &UninstallReport) -> Vec<String> {
    let mut lines = match report.status {
        UninstallStatus::NotInstalled => {
            return vec![format!(
                "No {target} installation was found; nothing to remove"
            )];
        }
        UninstallStatus::Uninstalled => vec![format!("Removed the {target} installation")],
        UninstallStatus::Partial => {
            vec![format!("Removed the {target} installation with warnings")]
        }
    };

    for path in &report.removed {
        lines.push(format!("Removed: {}", path.display()));
    }
    for warning in &report.warnings {
        lines.push(format!("Warning: {warning}"));
    }
    lines.push("Config and data directories were left in place".to_string());
    lines
}
