use std::path::PathBuf;

use super::*;

fn node_options() -> InstallOptions {
    InstallOptions {
        master_url: Some("https://panel.example.com".to_string()),
        master_token: Some("node-token".to_string()),
        ..InstallOptions::default()
    }
}

#[test]
fn role_and_backend_round_trip() {
    assert_eq!(Role::parse("server").expect("must parse"), Role::Server);
    assert_eq!(Role::parse("node").expect("must parse"), Role::Node);
    assert_eq!(
        Backend::parse("docker").expect("must parse"),
        Backend::Container
    );
    assert_eq!(
        Backend::parse("system").expect("must parse"),
        Backend::NativeService
    );

    let err = Role::parse("worker").expect_err("unknown role must fail");
    assert!(err.to_string().contains("invalid mode"));
    let err = Backend::parse("podman").expect_err("unknown backend must fail");
    assert!(err.to_string().contains("invalid method"));
}

#[test]
fn target_display_names_role_and_backend() {
    let target = InstallTarget::new(Role::Node, Backend::Container);
    assert_eq!(target.to_string(), "node/docker");
}

#[test]
fn convert_master_url_maps_schemes_and_appends_ws_path() {
    assert_eq!(
        convert_master_url("http://1.2.3.4:8080").expect("must convert"),
        "ws://1.2.3.4:8080/api/v1/ws/node"
    );
    assert_eq!(
        convert_master_url("https://h.example/").expect("must convert"),
        "wss://h.example/api/v1/ws/node"
    );
}

#[test]
fn convert_master_url_strips_only_one_trailing_slash() {
    assert_eq!(
        convert_master_url("https://h.example//").expect("must convert"),
        "wss://h.example//api/v1/ws/node"
    );
}

#[test]
fn convert_master_url_rejects_other_schemes() {
    let err = convert_master_url("ftp://h.example").expect_err("must reject");
    assert!(err.to_string().contains("http:// or https://"));
}

#[test]
fn unsupported_architecture_is_rejected() {
    let err = HostArch::from_target("mips64").expect_err("must reject");
    assert!(err.to_string().contains("unsupported architecture"));
    let err = HostOs::from_target("windows").expect_err("must reject");
    assert!(err.to_string().contains("unsupported operating system"));
}

#[test]
fn artifact_references_match_release_naming() {
    assert_eq!(
        binary_name(Role::Node, HostOs::Linux, HostArch::Arm64),
        "trellis-node-linux-arm64"
    );
    assert_eq!(
        download_url("v1.4.0", Role::Server, HostOs::Linux, HostArch::Amd64),
        "https://github.com/trellis-net/trellis/releases/download/v1.4.0/trellis-server-linux-amd64"
    );
    assert_eq!(image_ref("v1.4.0"), "ghcr.io/trellis-net/trellis:v1.4.0");
}

#[test]
fn server_config_renders_expected_keys() {
    let mut options = InstallOptions {
        port: 9000,
        jwt_secret: Some("sekrit".to_string()),
        admin_password: Some("hunter2".to_string()),
        data_dir: PathBuf::from("/srv/trellis-data"),
        ..InstallOptions::default()
    };
    let generated = GeneratedSecrets::fill(&mut options, Role::Server);
    assert!(generated.is_empty(), "supplied secrets must not be replaced");

    let rendered = render_config(Role::Server, &options).expect("must render");
    let parsed: ServerConfig = toml::from_str(&rendered).expect("must parse back");
    assert_eq!(parsed.server.host, "0.0.0.0");
    assert_eq!(parsed.server.port, 9000);
    assert_eq!(parsed.database.driver, "sqlite3");
    assert_eq!(parsed.database.dsn, "/srv/trellis-data/server/trellis.db");
    assert_eq!(parsed.jwt.secret, "sekrit");
    assert_eq!(parsed.jwt.expiration, "24h");
    assert_eq!(parsed.admin.username, "admin");
    assert_eq!(parsed.admin.password, "hunter2");
}

#[test]
fn server_config_requires_secret_material() {
    let options = InstallOptions::default();
    let err = render_config(Role::Server, &options).expect_err("missing secrets must fail");
    assert!(err.to_string().contains("jwt secret is missing"));
}

#[test]
fn node_config_renders_expected_keys() {
    let options = node_options();
    let rendered = render_config(Role::Node, &options).expect("must render");
    let parsed: NodeConfig = toml::from_str(&rendered).expect("must parse back");

    assert_eq!(parsed.master.url, "wss://panel.example.com/api/v1/ws/node");
    assert_eq!(parsed.master.token, "node-token");
    assert_eq!(parsed.xray.bin_path, "/opt/trellis/bin/xray");
    assert_eq!(parsed.xray.config_path, "/etc/trellis/xray.json");
    assert_eq!(parsed.xray.version, "latest");
    assert_eq!(parsed.xray.asset_path, "/var/lib/trellis/xray");
    assert_eq!(parsed.log.level, "info");
    assert_eq!(parsed.log.file, "/var/lib/trellis/node/trellis-node.log");
    assert_eq!(parsed.report_interval, 60);
}

#[test]
fn node_config_requires_master_and_token() {
    let options = InstallOptions::default();
    let err = render_config(Role::Node, &options).expect_err("missing master must fail");
    assert!(err.to_string().contains("master url is missing"));
}

#[test]
fn validate_for_node_rejects_missing_or_blank_required_fields() {
    let options = InstallOptions::default();
    let err = options
        .validate_for(Role::Node)
        .expect_err("missing master must fail");
    assert!(err.to_string().contains("--master is required"));

    let options = InstallOptions {
        master_url: Some("https://panel.example.com".to_string()),
        master_token: Some("   ".to_string()),
        ..InstallOptions::default()
    };
    let err = options
        .validate_for(Role::Node)
        .expect_err("blank token must fail");
    assert!(err.to_string().contains("--token is required"));

    node_options()
        .validate_for(Role::Node)
        .expect("complete node options must validate");
    InstallOptions::default()
        .validate_for(Role::Server)
        .expect("server has no required extra fields");
}

#[test]
fn generated_secrets_fill_only_missing_server_fields() {
    let mut options = InstallOptions {
        jwt_secret: Some("keep-me".to_string()),
        ..InstallOptions::default()
    };
    let generated = GeneratedSecrets::fill(&mut options, Role::Server);

    assert!(generated.jwt_secret.is_none());
    assert_eq!(options.jwt_secret.as_deref(), Some("keep-me"));

    let password = generated
        .admin_password
        .as_deref()
        .expect("password must be generated");
    assert_eq!(password.len(), 12);
    assert!(password.chars().all(|ch| ch.is_ascii_alphanumeric()));
    assert_eq!(options.admin_password.as_deref(), Some(password));

    // A second fill must not mint anything new.
    let again = GeneratedSecrets::fill(&mut options, Role::Server);
    assert!(again.is_empty());
}

#[test]
fn generated_secrets_never_fill_for_node() {
    let mut options = node_options();
    let generated = GeneratedSecrets::fill(&mut options, Role::Node);
    assert!(generated.is_empty());
    assert!(options.jwt_secret.is_none());
    assert!(options.admin_password.is_none());
}

#[test]
fn env_file_mirrors_server_config_fields() {
    let mut options = InstallOptions::default();
    GeneratedSecrets::fill(&mut options, Role::Server);

    let rendered = render_env_file(Role::Server, &options, "v2.0.1").expect("must render");
    let lines: Vec<&str> = rendered.lines().collect();
    assert!(lines.contains(&"TRELLIS_IMAGE=ghcr.io/trellis-net/trellis:v2.0.1"));
    assert!(lines.contains(&"TZ=UTC"));
    assert!(lines.contains(&"DATA_DIR=/var/lib/trellis/server"));
    assert!(lines.contains(&"SERVER_PORT=8080"));
    assert!(lines.contains(&"DATABASE_DSN=/var/lib/trellis/server/trellis.db"));
    assert!(rendered.contains("JWT_SECRET="));
    assert!(rendered.contains("ADMIN_PASSWORD="));
}

#[test]
fn env_file_mirrors_node_config_fields() {
    let options = node_options();
    let rendered = render_env_file(Role::Node, &options, "latest").expect("must render");
    let lines: Vec<&str> = rendered.lines().collect();
    assert!(lines.contains(&"TRELLIS_IMAGE=ghcr.io/trellis-net/trellis:latest"));
    assert!(lines.contains(&"DATA_DIR=/var/lib/trellis/node"));
    assert!(lines.contains(&"MASTER_URL=wss://panel.example.com/api/v1/ws/node"));
    assert!(lines.contains(&"MASTER_TOKEN=node-token"));
    assert!(lines.contains(&"REPORT_INTERVAL=60"));
    assert!(!rendered.contains("JWT_SECRET"));
}

#[test]
fn prior_state_reports_presence_and_version() {
    assert!(!PriorState::Absent.is_present());
    assert!(PriorState::ConfigOnly.is_present());
    assert!(PriorState::ManifestPresent.is_present());

    let both = PriorState::Both {
        version: Some("v1.2.0".to_string()),
    };
    assert_eq!(both.installed_version(), Some("v1.2.0"));
    assert_eq!(PriorState::ConfigOnly.installed_version(), None);
}

#[test]
fn convergence_action_config_write_policy() {
    assert!(ConvergenceAction::FreshInstall.writes_config());
    assert!(ConvergenceAction::UpgradeReplaceConfig.writes_config());
    assert!(!ConvergenceAction::UpgradePreserveConfig.writes_config());
    assert!(!ConvergenceAction::Abort.writes_config());
}

#[test]
fn version_change_classification() {
    assert_eq!(
        classify_version_change(Some("v1.2.0"), "v1.3.0"),
        VersionChange::Upgraded
    );
    assert_eq!(
        classify_version_change(Some("1.3.0"), "v1.2.0"),
        VersionChange::Downgraded
    );
    assert_eq!(
        classify_version_change(Some("v1.3.0"), "1.3.0"),
        VersionChange::Reinstalled
    );
    assert_eq!(
        classify_version_change(None, "v1.3.0"),
        VersionChange::Unknown
    );
    assert_eq!(
        classify_version_change(Some("v1.3.0"), "latest"),
        VersionChange::Unknown
    );
}
