use anyhow::{anyhow, Result};

use crate::target::Role;

pub const RELEASES_BASE: &str = "https://github.com/trellis-net/trellis/releases/download";
pub const RELEASE_INDEX_URL: &str =
    "https://api.github.com/repos/trellis-net/trellis/releases/latest";
pub const REGISTRY_IMAGE: &str = "ghcr.io/trellis-net/trellis";
pub const DEFAULT_IMAGE_TAG: &str = "latest";

/// Supported kernel families. Anything else is an unrecoverable
/// precondition failure at probe time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostOs {
    Linux,
}

impl HostOs {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Linux => "linux",
        }
    }

    pub fn from_target(raw: &str) -> Result<Self> {
        match raw {
            "linux" => Ok(Self::Linux),
            other => Err(anyhow!(
                "unsupported operating system '{other}': trellis targets linux hosts only"
            )),
        }
    }
}

/// Supported architectures, named with the release pipeline's tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostArch {
    Amd64,
    Arm64,
}

impl HostArch {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Amd64 => "amd64",
            Self::Arm64 => "arm64",
        }
    }

    pub fn from_target(raw: &str) -> Result<Self> {
        match raw {
            "x86_64" => Ok(Self::Amd64),
            "aarch64" => Ok(Self::Arm64),
            other => Err(anyhow!(
                "unsupported architecture '{other}': trellis releases cover x86_64 and aarch64 only"
            )),
        }
    }
}

/// Released asset name: `<binary>-<os>-<arch>`. Must match the release
/// pipeline's naming convention exactly.
pub fn binary_name(role: Role, os: HostOs, arch: HostArch) -> String {
    format!("{}-{}-{}", role.binary_name(), os.as_str(), arch.as_str())
}

pub fn download_url(version: &str, role: Role, os: HostOs, arch: HostArch) -> String {
    format!("{RELEASES_BASE}/{version}/{}", binary_name(role, os, arch))
}

pub fn image_ref(tag: &str) -> String {
    format!("{REGISTRY_IMAGE}:{tag}")
}
