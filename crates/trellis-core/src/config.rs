use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

use crate::artifact::image_ref;
use crate::options::InstallOptions;
use crate::target::Role;

/// Fixed API path nodes register on. Appended verbatim by
/// [`convert_master_url`].
pub const NODE_WS_PATH: &str = "/api/v1/ws/node";

/// Converts the operator-supplied master address into the node's websocket
/// registration endpoint: `http` maps to `ws`, `https` to `wss`, one trailing
/// slash is stripped, then the fixed API path is appended.
pub fn convert_master_url(master: &str) -> Result<String> {
    let trimmed = master.trim();
    let converted = if let Some(rest) = trimmed.strip_prefix("https://") {
        format!("wss://{rest}")
    } else if let Some(rest) = trimmed.strip_prefix("http://") {
        format!("ws://{rest}")
    } else {
        return Err(anyhow!(
            "master url must start with http:// or https://: {master}"
        ));
    };
    let base = converted.strip_suffix('/').unwrap_or(&converted);
    Ok(format!("{base}{NODE_WS_PATH}"))
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServerConfig {
    pub server: ServerSection,
    pub database: DatabaseSection,
    pub jwt: JwtSection,
    pub admin: AdminSection,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServerSection {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DatabaseSection {
    pub driver: String,
    pub dsn: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JwtSection {
    pub secret: String,
    pub expiration: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AdminSection {
    pub username: String,
    pub password: String,
}

impl ServerConfig {
    pub fn from_options(options: &InstallOptions) -> Result<Self> {
        let jwt_secret = options
            .jwt_secret
            .clone()
            .ok_or_else(|| anyhow!("jwt secret is missing; supply or generate one first"))?;
        let admin_password = options
            .admin_password
            .clone()
            .ok_or_else(|| anyhow!("admin password is missing; supply or generate one first"))?;

        Ok(Self {
            server: ServerSection {
                host: "0.0.0.0".to_string(),
                port: options.port,
            },
            database: DatabaseSection {
                driver: "sqlite3".to_string(),
                dsn: options
                    .data_dir
                    .join("server")
                    .join("trellis.db")
                    .display()
                    .to_string(),
            },
            jwt: JwtSection {
                secret: jwt_secret,
                expiration: options.jwt_expiration.clone(),
            },
            admin: AdminSection {
                username: options.admin_username.clone(),
                password: admin_password,
            },
        })
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("failed to serialize server config")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NodeConfig {
    pub report_interval: u64,
    pub master: MasterSection,
    pub xray: XraySection,
    pub log: LogSection,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MasterSection {
    pub url: String,
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct XraySection {
    pub bin_path: String,
    pub config_path: String,
    pub version: String,
    pub asset_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogSection {
    pub level: String,
    pub file: String,
}

impl NodeConfig {
    pub fn from_options(options: &InstallOptions) -> Result<Self> {
        let master = options
            .master_url
            .as_deref()
            .ok_or_else(|| anyhow!("master url is missing for node config"))?;
        let token = options
            .master_token
            .clone()
            .ok_or_else(|| anyhow!("master token is missing for node config"))?;

        Ok(Self {
            report_interval: options.report_interval_secs,
            master: MasterSection {
                url: convert_master_url(master)?,
                token,
            },
            xray: XraySection {
                bin_path: options
                    .install_dir
                    .join("bin")
                    .join("xray")
                    .display()
                    .to_string(),
                config_path: options.config_dir.join("xray.json").display().to_string(),
                version: options.xray_version.clone(),
                asset_path: options.data_dir.join("xray").display().to_string(),
            },
            log: LogSection {
                level: options.log_level.clone(),
                file: options
                    .data_dir
                    .join("node")
                    .join("trellis-node.log")
                    .display()
                    .to_string(),
            },
        })
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("failed to serialize node config")
    }
}

/// Renders the role's native config document.
pub fn render_config(role: Role, options: &InstallOptions) -> Result<String> {
    match role {
        Role::Server => ServerConfig::from_options(options)?.to_toml(),
        Role::Node => NodeConfig::from_options(options)?.to_toml(),
    }
}

/// Renders the container backend's environment file. The keys mirror the
/// native config fields and are consumed by the compose manifest through
/// `${VAR}` substitution.
pub fn render_env_file(role: Role, options: &InstallOptions, tag: &str) -> Result<String> {
    let mut payload = String::new();
    let mut push = |key: &str, value: &str| {
        payload.push_str(&format!("{key}={value}\n"));
    };

    push("TRELLIS_IMAGE", &image_ref(tag));
    push("TZ", &options.timezone);
    push(
        "DATA_DIR",
        &options.data_dir.join(role.as_str()).display().to_string(),
    );

    match role {
        Role::Server => {
            let config = ServerConfig::from_options(options)?;
            push("SERVER_HOST", &config.server.host);
            push("SERVER_PORT", &config.server.port.to_string());
            push("DATABASE_DRIVER", &config.database.driver);
            // Container-side path: the host data dir is mounted at
            // /var/lib/trellis/<role> by the manifest.
            push("DATABASE_DSN", "/var/lib/trellis/server/trellis.db");
            push("JWT_SECRET", &config.jwt.secret);
            push("JWT_EXPIRATION", &config.jwt.expiration);
            push("ADMIN_USERNAME", &config.admin.username);
            push("ADMIN_PASSWORD", &config.admin.password);
        }
        Role::Node => {
            let config = NodeConfig::from_options(options)?;
            push("MASTER_URL", &config.master.url);
            push("MASTER_TOKEN", &config.master.token);
            push("XRAY_VERSION", &config.xray.version);
            push("LOG_LEVEL", &config.log.level);
            push("REPORT_INTERVAL", &config.report_interval.to_string());
        }
    }

    Ok(payload)
}
