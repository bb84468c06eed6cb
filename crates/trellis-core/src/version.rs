use std::cmp::Ordering;

use semver::Version;

/// How the resolved release relates to the previously installed one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionChange {
    Upgraded,
    Downgraded,
    Reinstalled,
    /// One side could not be parsed as a release version.
    Unknown,
}

/// Release tags carry a `v` prefix; installed binaries may report either
/// form.
pub fn parse_release_version(raw: &str) -> Option<Version> {
    Version::parse(raw.trim().trim_start_matches('v')).ok()
}

pub fn classify_version_change(installed: Option<&str>, resolved: &str) -> VersionChange {
    let Some(installed) = installed.and_then(parse_release_version) else {
        return VersionChange::Unknown;
    };
    let Some(resolved) = parse_release_version(resolved) else {
        return VersionChange::Unknown;
    };

    match resolved.cmp(&installed) {
        Ordering::Greater => VersionChange::Upgraded,
        Ordering::Less => VersionChange::Downgraded,
        Ordering::Equal => VersionChange::Reinstalled,
    }
}
