use anyhow::{anyhow, Result};
use trellis_core::{ConvergenceAction, PriorState, PromptSource};

const UPGRADE_CHOICES: [&str; 3] = [
    "Keep the existing configuration and refresh the binary",
    "Replace the configuration (the old file is backed up first)",
    "Abort without changing anything",
];

/// Decides the convergence action for a detected prior state.
///
/// With no prior installation every path is a fresh install. With one, the
/// force flags decide non-interactively; without them an interactive run asks
/// the operator, and a non-interactive run refreshes the binary while leaving
/// the configuration untouched. Destructive action always requires explicit
/// opt-in, so Abort is only reachable through the prompt.
pub fn plan(
    prior: &PriorState,
    force_overwrite_binary: bool,
    force_overwrite_config: bool,
    interactive: bool,
    prompts: &mut dyn PromptSource,
) -> Result<ConvergenceAction> {
    if !prior.is_present() {
        return Ok(ConvergenceAction::FreshInstall);
    }

    if force_overwrite_config {
        return Ok(ConvergenceAction::UpgradeReplaceConfig);
    }
    if force_overwrite_binary || !interactive {
        return Ok(ConvergenceAction::UpgradePreserveConfig);
    }

    let prompt = format!("A previous installation was found ({prior}). How should it be handled?");
    match prompts.choose(&prompt, &UPGRADE_CHOICES)? {
        0 => Ok(ConvergenceAction::UpgradePreserveConfig),
        1 => Ok(ConvergenceAction::UpgradeReplaceConfig),
        2 => Ok(ConvergenceAction::Abort),
        other => Err(anyhow!("prompt returned out-of-range choice: {other}")),
    }
}
