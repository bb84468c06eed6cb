use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use trellis_core::{InstallOptions, Role};

const SYSTEMD_UNIT_DIR: &str = "/etc/systemd/system";

/// Path oracle for everything the installer writes. One layout covers both
/// backends: native artifacts live under `bin`/the config dir, container
/// artifacts under a per-role subdirectory of the install dir.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallLayout {
    install_dir: PathBuf,
    config_dir: PathBuf,
    data_dir: PathBuf,
    unit_dir: PathBuf,
}

impl InstallLayout {
    pub fn new(
        install_dir: impl Into<PathBuf>,
        config_dir: impl Into<PathBuf>,
        data_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            install_dir: install_dir.into(),
            config_dir: config_dir.into(),
            data_dir: data_dir.into(),
            unit_dir: PathBuf::from(SYSTEMD_UNIT_DIR),
        }
    }

    pub fn from_options(options: &InstallOptions) -> Self {
        Self::new(
            options.install_dir.clone(),
            options.config_dir.clone(),
            options.data_dir.clone(),
        )
    }

    /// Overrides the systemd unit directory.
    pub fn with_unit_dir(mut self, unit_dir: impl Into<PathBuf>) -> Self {
        self.unit_dir = unit_dir.into();
        self
    }

    pub fn install_dir(&self) -> &Path {
        &self.install_dir
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn bin_dir(&self) -> PathBuf {
        self.install_dir.join("bin")
    }

    pub fn binary_path(&self, role: Role) -> PathBuf {
        self.bin_dir().join(role.binary_name())
    }

    pub fn config_path(&self, role: Role) -> PathBuf {
        self.config_dir.join(format!("{}.toml", role.as_str()))
    }

    pub fn unit_name(role: Role) -> String {
        format!("{}.service", role.binary_name())
    }

    pub fn unit_path(&self, role: Role) -> PathBuf {
        self.unit_dir.join(Self::unit_name(role))
    }

    /// Container backend: per-role directory holding the manifest and env file.
    pub fn role_dir(&self, role: Role) -> PathBuf {
        self.install_dir.join(role.as_str())
    }

    pub fn compose_path(&self, role: Role) -> PathBuf {
        self.role_dir(role).join("docker-compose.yml")
    }

    pub fn env_file_path(&self, role: Role) -> PathBuf {
        self.role_dir(role).join(".env")
    }

    pub fn role_data_dir(&self, role: Role) -> PathBuf {
        self.data_dir.join(role.as_str())
    }

    /// Idempotent directory creation for a native install.
    pub fn ensure_native_dirs(&self, role: Role) -> Result<()> {
        for dir in [
            self.bin_dir(),
            self.config_dir.clone(),
            self.role_data_dir(role),
        ] {
            fs::create_dir_all(&dir)
                .with_context(|| format!("failed to create {}", dir.display()))?;
        }
        Ok(())
    }

    /// Idempotent directory creation for a container install.
    pub fn ensure_container_dirs(&self, role: Role) -> Result<()> {
        for dir in [self.role_dir(role), self.role_data_dir(role)] {
            fs::create_dir_all(&dir)
                .with_context(|| format!("failed to create {}", dir.display()))?;
        }
        Ok(())
    }
}
