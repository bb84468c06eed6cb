use super::*;
use crate::timesync::{parse_os_release_id, strategy_for};

#[test]
fn compose_variant_command_shapes() {
    let (program, prefix) = ComposeVariant::Plugin.command();
    assert_eq!(program, "docker");
    assert_eq!(prefix, ["compose"]);

    let (program, prefix) = ComposeVariant::Standalone.command();
    assert_eq!(program, "docker-compose");
    assert!(prefix.is_empty());
}

#[test]
fn os_release_id_parsing() {
    let raw = "NAME=\"Ubuntu\"\nID=ubuntu\nID_LIKE=debian\nVERSION_ID=\"24.04\"\n";
    assert_eq!(parse_os_release_id(raw).as_deref(), Some("ubuntu"));

    let quoted = "ID=\"opensuse-leap\"\n";
    assert_eq!(parse_os_release_id(quoted).as_deref(), Some("opensuse-leap"));

    assert_eq!(parse_os_release_id("NAME=Something\n"), None);
    assert_eq!(parse_os_release_id("ID=\n"), None);
}

#[test]
fn time_daemon_strategy_table_covers_known_families() {
    let debian = strategy_for("debian").expect("debian must have a strategy");
    assert_eq!(debian[0].0, "apt-get");
    assert_eq!(debian[1].0, "systemctl");

    let rocky = strategy_for("rocky").expect("rocky must have a strategy");
    assert_eq!(rocky[0].0, "dnf");

    assert!(
        strategy_for("gentoo").is_none(),
        "unknown distro must map to no strategy"
    );
}

#[test]
fn run_capture_reports_failing_command() {
    let mut command = std::process::Command::new("false");
    let err = run_capture(&mut command, "probe failed").expect_err("false must fail");
    assert!(err.to_string().contains("probe failed"));
}

#[test]
fn command_succeeds_tolerates_missing_executables() {
    let mut command = std::process::Command::new("definitely-not-a-real-tool-9f3a");
    assert!(!command_succeeds(&mut command));

    let mut command = std::process::Command::new("true");
    assert!(command_succeeds(&mut command));
}
