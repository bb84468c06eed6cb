use std::path::PathBuf;

use anyhow::{anyhow, Result};

use crate::target::Role;

pub const DEFAULT_SERVER_PORT: u16 = 8080;
pub const DEFAULT_ADMIN_USERNAME: &str = "admin";
pub const DEFAULT_JWT_EXPIRATION: &str = "24h";
pub const DEFAULT_TIMEZONE: &str = "UTC";
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_REPORT_INTERVAL_SECS: u64 = 60;
pub const DEFAULT_XRAY_VERSION: &str = "latest";
pub const DEFAULT_INSTALL_DIR: &str = "/opt/trellis";
pub const DEFAULT_DATA_DIR: &str = "/var/lib/trellis";
pub const DEFAULT_CONFIG_DIR: &str = "/etc/trellis";

const GENERATED_PASSWORD_LEN: usize = 12;
const GENERATED_JWT_SECRET_LEN: usize = 32;

/// Everything one invocation needs, built once by the command surface and
/// passed by reference into every component. There is no ambient global
/// configuration anywhere else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallOptions {
    pub port: u16,
    /// External master address for node installs. Required, never defaulted.
    pub master_url: Option<String>,
    /// Shared authentication token for node installs. Required, never defaulted.
    pub master_token: Option<String>,
    pub admin_username: String,
    pub admin_password: Option<String>,
    pub jwt_secret: Option<String>,
    pub jwt_expiration: String,
    pub timezone: String,
    pub log_level: String,
    pub report_interval_secs: u64,
    pub xray_version: String,
    /// Explicit release pin. `None` resolves the latest published tag.
    pub version: Option<String>,
    pub install_dir: PathBuf,
    pub data_dir: PathBuf,
    pub config_dir: PathBuf,
}

impl Default for InstallOptions {
    fn default() -> Self {
        Self {
            port: DEFAULT_SERVER_PORT,
            master_url: None,
            master_token: None,
            admin_username: DEFAULT_ADMIN_USERNAME.to_string(),
            admin_password: None,
            jwt_secret: None,
            jwt_expiration: DEFAULT_JWT_EXPIRATION.to_string(),
            timezone: DEFAULT_TIMEZONE.to_string(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            report_interval_secs: DEFAULT_REPORT_INTERVAL_SECS,
            xray_version: DEFAULT_XRAY_VERSION.to_string(),
            version: None,
            install_dir: PathBuf::from(DEFAULT_INSTALL_DIR),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            config_dir: PathBuf::from(DEFAULT_CONFIG_DIR),
        }
    }
}

impl InstallOptions {
    /// Hard precondition check for the selected role. Must run before any
    /// filesystem mutation.
    pub fn validate_for(&self, role: Role) -> Result<()> {
        if role == Role::Node {
            if self
                .master_url
                .as_deref()
                .map_or(true, |value| value.trim().is_empty())
            {
                return Err(anyhow!("--master is required when installing a node"));
            }
            if self
                .master_token
                .as_deref()
                .map_or(true, |value| value.trim().is_empty())
            {
                return Err(anyhow!("--token is required when installing a node"));
            }
        }
        Ok(())
    }
}

/// Secret material minted during this invocation, kept separate so the
/// summary can tell the operator what was generated for them. Filled at most
/// once, and only on config-writing paths: a preserve-config upgrade never
/// reaches `fill`, so secrets already referenced by a running config are
/// never invalidated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratedSecrets {
    pub jwt_secret: Option<String>,
    pub admin_password: Option<String>,
}

impl GeneratedSecrets {
    pub fn none() -> Self {
        Self::default()
    }

    /// Generates the server secrets that were not supplied, writing them into
    /// `options` and recording what was minted.
    pub fn fill(options: &mut InstallOptions, role: Role) -> Self {
        let mut generated = Self::none();
        if role != Role::Server {
            return generated;
        }

        if options.jwt_secret.is_none() {
            let secret = random_token(GENERATED_JWT_SECRET_LEN);
            options.jwt_secret = Some(secret.clone());
            generated.jwt_secret = Some(secret);
        }
        if options.admin_password.is_none() {
            let password = random_token(GENERATED_PASSWORD_LEN);
            options.admin_password = Some(password.clone());
            generated.admin_password = Some(password);
        }
        generated
    }

    pub fn is_empty(&self) -> bool {
        self.jwt_secret.is_none() && self.admin_password.is_none()
    }
}

fn random_token(len: usize) -> String {
    const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
    (0..len)
        .map(|_| ALPHABET[fastrand::usize(..ALPHABET.len())] as char)
        .collect()
}
