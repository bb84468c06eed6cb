mod artifact;
mod config;
mod options;
mod prompt;
mod state;
mod target;
mod version;

pub use artifact::{
    binary_name, download_url, image_ref, HostArch, HostOs, DEFAULT_IMAGE_TAG, REGISTRY_IMAGE,
    RELEASES_BASE, RELEASE_INDEX_URL,
};
pub use config::{
    convert_master_url, render_config, render_env_file, NodeConfig, ServerConfig, NODE_WS_PATH,
};
pub use options::{
    GeneratedSecrets, InstallOptions, DEFAULT_ADMIN_USERNAME, DEFAULT_CONFIG_DIR, DEFAULT_DATA_DIR,
    DEFAULT_INSTALL_DIR, DEFAULT_JWT_EXPIRATION, DEFAULT_LOG_LEVEL, DEFAULT_REPORT_INTERVAL_SECS,
    DEFAULT_SERVER_PORT, DEFAULT_TIMEZONE, DEFAULT_XRAY_VERSION,
};
pub use prompt::PromptSource;
pub use state::{ConvergenceAction, PriorState};
pub use target::{Backend, InstallTarget, Role};
pub use version::{classify_version_change, parse_release_version, VersionChange};

#[cfg(test)]
mod tests;
