use std::path::PathBuf;

use clap::Parser;
use clap_complete::Shell;

/// Installs, upgrades, and removes the trellis server and node agents.
#[derive(Parser, Debug)]
#[command(name = "trellis-setup")]
#[command(about = "Install and manage trellis server/node deployments", long_about = None)]
pub struct Cli {
    /// Which role to install: server or node
    #[arg(long, value_name = "ROLE")]
    pub mode: Option<String>,

    /// Deployment method: docker or system
    #[arg(long, value_name = "METHOD")]
    pub method: Option<String>,

    /// Release tag to install (defaults to the latest published release)
    #[arg(long, value_name = "TAG")]
    pub version: Option<String>,

    /// Listen port for the server role
    #[arg(long, value_name = "PORT")]
    pub port: Option<u16>,

    /// JWT signing secret (server; generated when omitted)
    #[arg(long, value_name = "SECRET")]
    pub jwt_secret: Option<String>,

    /// JWT expiration, e.g. 24h (server)
    #[arg(long, value_name = "DURATION")]
    pub jwt_expiration: Option<String>,

    /// Admin username (server)
    #[arg(long, value_name = "NAME")]
    pub admin_user: Option<String>,

    /// Admin password (server; generated when omitted)
    #[arg(long, value_name = "PASS")]
    pub admin_pass: Option<String>,

    /// Master server address, e.g. https://panel.example.com (node, required)
    #[arg(long, value_name = "URL")]
    pub master: Option<String>,

    /// Authentication token issued by the master (node, required)
    #[arg(long, value_name = "TOKEN")]
    pub token: Option<String>,

    /// Version pin for the node's managed xray proxy
    #[arg(long, value_name = "VERSION")]
    pub xray_version: Option<String>,

    /// Log level for the installed agent
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Node status report interval in seconds
    #[arg(long, value_name = "SECONDS")]
    pub report_interval: Option<u64>,

    /// Installation directory
    #[arg(long, value_name = "DIR")]
    pub install_dir: Option<PathBuf>,

    /// Data directory
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Config directory
    #[arg(long, value_name = "DIR")]
    pub config_dir: Option<PathBuf>,

    /// Container timezone
    #[arg(long, value_name = "TZ")]
    pub timezone: Option<String>,

    /// Remove the selected installation instead of installing
    #[arg(long)]
    pub uninstall: bool,

    /// Skip the time synchronization preflight
    #[arg(long)]
    pub skip_ntp: bool,

    /// Install and enable a time daemon when none is active
    #[arg(long)]
    pub install_ntp: bool,

    /// Never prompt; use defaults and fail when a required value is missing
    #[arg(long, short = 'y')]
    pub yes: bool,

    /// Refresh the binary/image even when an installation already exists
    #[arg(long)]
    pub force: bool,

    /// Also replace the configuration (the old file is backed up first)
    #[arg(long)]
    pub force_config: bool,

    /// Generate shell completions and exit
    #[arg(long, value_name = "SHELL")]
    pub completions: Option<Shell>,
}
