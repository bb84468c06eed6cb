use std::path::Path;
use std::process::Command;

use trellis_core::{Backend, InstallTarget, PriorState, Role};

use crate::layout::InstallLayout;

/// Facts about a native installation, reported independently: a binary can
/// exist with no config and vice versa.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeInspection {
    pub binary_present: bool,
    pub binary_version: Option<String>,
    pub config_present: bool,
}

impl NativeInspection {
    pub fn classify(&self) -> PriorState {
        match (self.binary_present, self.config_present) {
            (false, false) => PriorState::Absent,
            (true, false) => PriorState::BinaryOnly {
                version: self.binary_version.clone(),
            },
            (false, true) => PriorState::ConfigOnly,
            (true, true) => PriorState::Both {
                version: self.binary_version.clone(),
            },
        }
    }
}

/// Classifies the prior installation state for `target`. Never mutates and
/// is safe to call any number of times per invocation.
pub fn detect(target: InstallTarget, layout: &InstallLayout) -> PriorState {
    match target.backend {
        Backend::NativeService => inspect_native(target.role, layout).classify(),
        Backend::Container => detect_container(target.role, layout),
    }
}

pub fn inspect_native(role: Role, layout: &InstallLayout) -> NativeInspection {
    let binary_path = layout.binary_path(role);
    let binary_present = binary_path.exists();
    let binary_version = if binary_present {
        probe_binary_version(&binary_path)
    } else {
        None
    };

    NativeInspection {
        binary_present,
        binary_version,
        config_present: layout.config_path(role).exists(),
    }
}

/// Container state is manifest presence only; image state is delegated to
/// the runtime's own pull semantics.
pub fn detect_container(role: Role, layout: &InstallLayout) -> PriorState {
    if layout.compose_path(role).exists() {
        PriorState::ManifestPresent
    } else {
        PriorState::Absent
    }
}

/// Best-effort self-reported version. A binary that cannot report one still
/// counts as installed.
fn probe_binary_version(path: &Path) -> Option<String> {
    let output = Command::new(path).arg("--version").output().ok()?;
    if !output.status.success() {
        return None;
    }
    parse_version_output(&String::from_utf8_lossy(&output.stdout))
}

/// Expects output like `trellis-node v1.2.3`; takes the last token of the
/// first non-empty line.
pub(crate) fn parse_version_output(raw: &str) -> Option<String> {
    let line = raw.lines().find(|line| !line.trim().is_empty())?;
    line.split_whitespace().last().map(str::to_string)
}
