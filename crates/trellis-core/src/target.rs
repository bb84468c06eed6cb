use std::fmt;

use anyhow::{anyhow, Result};

/// Which of the two cooperating process types is being installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Server,
    Node,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Server => "server",
            Self::Node => "node",
        }
    }

    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "server" => Ok(Self::Server),
            "node" => Ok(Self::Node),
            _ => Err(anyhow!(
                "invalid mode '{value}': expected 'server' or 'node'"
            )),
        }
    }

    /// Name of the released executable for this role.
    pub fn binary_name(&self) -> &'static str {
        match self {
            Self::Server => "trellis-server",
            Self::Node => "trellis-node",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The deployment mechanism used to run the installed process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Container,
    NativeService,
}

impl Backend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Container => "docker",
            Self::NativeService => "system",
        }
    }

    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "docker" => Ok(Self::Container),
            "system" => Ok(Self::NativeService),
            _ => Err(anyhow!(
                "invalid method '{value}': expected 'docker' or 'system'"
            )),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One (role, backend) pair: the unit the state machine reasons about. Each
/// target owns one set of on-disk artifacts and one supervised process or
/// container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstallTarget {
    pub role: Role,
    pub backend: Backend,
}

impl InstallTarget {
    pub fn new(role: Role, backend: Backend) -> Self {
        Self { role, backend }
    }
}

impl fmt::Display for InstallTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.role, self.backend)
    }
}
