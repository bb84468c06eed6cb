use anyhow::Result;
use trellis_core::{
    Backend, ConvergenceAction, GeneratedSecrets, InstallOptions, InstallTarget, PromptSource,
    Role,
};
use trellis_host::{ensure_time_sync, probe, TimeSyncPolicy};
use trellis_installer::{detect, plan, run_install, run_uninstall, InstallLayout};

use crate::cli::Cli;
use crate::completion;
use crate::prompt::{NonInteractivePrompts, TerminalPrompts};
use crate::render;

pub fn run_cli(cli: Cli) -> Result<()> {
    if let Some(shell) = cli.completions {
        completion::print_completions(shell);
        return Ok(());
    }

    let interactive = !cli.yes;
    let mut prompts: Box<dyn PromptSource> = if interactive {
        Box::new(TerminalPrompts)
    } else {
        Box::new(NonInteractivePrompts)
    };

    // Unsupported hosts fail here, before any network or filesystem step.
    let facts = probe()?;
    ensure_root()?;

    let target = resolve_target(&cli, prompts.as_mut())?;
    let mut options = build_options(&cli);
    let layout = InstallLayout::from_options(&options);

    if cli.uninstall {
        let report = run_uninstall(target, &layout, &facts)?;
        render::print_lines(&render::uninstall_summary_lines(target, &report));
        return Ok(());
    }

    if interactive {
        fill_missing_node_options(target.role, &mut options, prompts.as_mut())?;
    }
    // Hard precondition, checked before any filesystem mutation.
    options.validate_for(target.role)?;

    let prior = detect(target, &layout);
    let action = plan(
        &prior,
        cli.force,
        cli.force_config,
        interactive,
        prompts.as_mut(),
    )?;
    if action == ConvergenceAction::Abort {
        render::print_status("info", "installation cancelled; nothing was changed");
        return Ok(());
    }

    let generated = if action.writes_config() {
        GeneratedSecrets::fill(&mut options, target.role)
    } else {
        GeneratedSecrets::none()
    };

    let spinner = render::start_spinner(&format!("converging {target}"));
    let result = run_install(target, &layout, &facts, action, &options);
    spinner.finish_and_clear();
    let report = result?;

    let timesync = ensure_time_sync(time_sync_policy(&cli, interactive), prompts.as_mut())?;
    render::print_lines(&render::install_summary_lines(
        target, &prior, &report, &generated, &timesync,
    ));
    Ok(())
}

pub(crate) fn resolve_target(cli: &Cli, prompts: &mut dyn PromptSource) -> Result<InstallTarget> {
    let role = match cli.mode.as_deref() {
        Some(value) => Role::parse(value)?,
        None => {
            let index = prompts.choose(
                "Which role should this host run?",
                &["server (control plane)", "node (worker)"],
            )?;
            if index == 0 {
                Role::Server
            } else {
                Role::Node
            }
        }
    };

    let backend = match cli.method.as_deref() {
        Some(value) => Backend::parse(value)?,
        None => {
            let index = prompts.choose(
                "Which deployment method should be used?",
                &["docker (compose deployment)", "system (native service)"],
            )?;
            if index == 0 {
                Backend::Container
            } else {
                Backend::NativeService
            }
        }
    };

    Ok(InstallTarget::new(role, backend))
}

pub(crate) fn build_options(cli: &Cli) -> InstallOptions {
    let mut options = InstallOptions::default();
    if let Some(port) = cli.port {
        options.port = port;
    }
    options.master_url = cli.master.clone();
    options.master_token = cli.token.clone();
    if let Some(user) = &cli.admin_user {
        options.admin_username = user.clone();
    }
    options.admin_password = cli.admin_pass.clone();
    options.jwt_secret = cli.jwt_secret.clone();
    if let Some(expiration) = &cli.jwt_expiration {
        options.jwt_expiration = expiration.clone();
    }
    if let Some(timezone) = &cli.timezone {
        options.timezone = timezone.clone();
    }
    if let Some(level) = &cli.log_level {
        options.log_level = level.clone();
    }
    if let Some(interval) = cli.report_interval {
        options.report_interval_secs = interval;
    }
    if let Some(version) = &cli.xray_version {
        options.xray_version = version.clone();
    }
    options.version = cli.version.clone();
    if let Some(dir) = &cli.install_dir {
        options.install_dir = dir.clone();
    }
    if let Some(dir) = &cli.data_dir {
        options.data_dir = dir.clone();
    }
    if let Some(dir) = &cli.config_dir {
        options.config_dir = dir.clone();
    }
    options
}

/// Interactive runs collect the node's required fields before validation so
/// the operator is asked instead of rejected.
pub(crate) fn fill_missing_node_options(
    role: Role,
    options: &mut InstallOptions,
    prompts: &mut dyn PromptSource,
) -> Result<()> {
    if role != Role::Node {
        return Ok(());
    }

    if options
        .master_url
        .as_deref()
        .map_or(true, |value| value.trim().is_empty())
    {
        let value = prompts.input("Master server address (http:// or https://)")?;
        if !value.is_empty() {
            options.master_url = Some(value);
        }
    }
    if options
        .master_token
        .as_deref()
        .map_or(true, |value| value.trim().is_empty())
    {
        let value = prompts.input("Node authentication token")?;
        if !value.is_empty() {
            options.master_token = Some(value);
        }
    }
    Ok(())
}

pub(crate) fn time_sync_policy(cli: &Cli, interactive: bool) -> TimeSyncPolicy {
    if cli.skip_ntp {
        TimeSyncPolicy::Skip
    } else if cli.install_ntp {
        TimeSyncPolicy::AutoInstall
    } else if interactive {
        TimeSyncPolicy::Interactive
    } else {
        TimeSyncPolicy::Skip
    }
}

#[cfg(unix)]
fn ensure_root() -> Result<()> {
    if !nix::unistd::geteuid().is_root() {
        return Err(anyhow::anyhow!(
            "root privileges are required to manage installations; re-run with sudo"
        ));
    }
    Ok(())
}

#[cfg(not(unix))]
fn ensure_root() -> Result<()> {
    Ok(())
}
