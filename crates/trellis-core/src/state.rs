use std::fmt;

/// Classified prior installation state for one target, computed fresh on
/// every invocation and never persisted. The native detector reports the
/// binary and config facts independently; the container detector only knows
/// whether the deployment manifest exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PriorState {
    Absent,
    BinaryOnly { version: Option<String> },
    ConfigOnly,
    Both { version: Option<String> },
    ManifestPresent,
}

impl PriorState {
    pub fn is_present(&self) -> bool {
        !matches!(self, Self::Absent)
    }

    /// Version the installed binary reported, when one was captured.
    pub fn installed_version(&self) -> Option<&str> {
        match self {
            Self::BinaryOnly { version } | Self::Both { version } => version.as_deref(),
            _ => None,
        }
    }
}

impl fmt::Display for PriorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absent => f.write_str("no prior installation"),
            Self::BinaryOnly { version: Some(v) } => write!(f, "binary {v}, no config"),
            Self::BinaryOnly { version: None } => f.write_str("binary present, no config"),
            Self::ConfigOnly => f.write_str("config present, no binary"),
            Self::Both { version: Some(v) } => write!(f, "binary {v} with config"),
            Self::Both { version: None } => f.write_str("binary and config present"),
            Self::ManifestPresent => f.write_str("deployment manifest present"),
        }
    }
}

/// The idempotent operation chosen to move the host from its detected prior
/// state to the desired target state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvergenceAction {
    FreshInstall,
    UpgradePreserveConfig,
    UpgradeReplaceConfig,
    Abort,
}

impl ConvergenceAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FreshInstall => "fresh install",
            Self::UpgradePreserveConfig => "upgrade (config preserved)",
            Self::UpgradeReplaceConfig => "upgrade (config replaced)",
            Self::Abort => "abort",
        }
    }

    /// Whether this action materializes a config document. A preserve-config
    /// upgrade never opens the existing file at all.
    pub fn writes_config(&self) -> bool {
        matches!(self, Self::FreshInstall | Self::UpgradeReplaceConfig)
    }
}

impl fmt::Display for ConvergenceAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
