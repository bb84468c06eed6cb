use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use chrono::Local;

pub(crate) const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Writes `contents` through a temp sibling and a rename so a concurrent
/// reader never observes a partially written file at `path`.
pub fn atomic_write(path: &Path, contents: &str, mode: u32) -> Result<()> {
    let file_name = path
        .file_name()
        .and_then(|value| value.to_str())
        .ok_or_else(|| anyhow!("invalid destination path: {}", path.display()))?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("failed to create {}", parent.display()))?;
    }

    let tmp_path = path.with_file_name(format!("{file_name}.tmp.{}", std::process::id()));
    fs::write(&tmp_path, contents.as_bytes())
        .with_context(|| format!("failed to write {}", tmp_path.display()))?;
    if let Err(err) = set_mode(&tmp_path, mode) {
        let _ = fs::remove_file(&tmp_path);
        return Err(err);
    }

    if let Err(err) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(err).with_context(|| format!("failed to move {} into place", path.display()));
    }
    Ok(())
}

/// Copies `path` to `<path>.bak.<YYYYmmddHHMMSS>` and returns the backup
/// path. The original is left untouched.
pub fn backup_file(path: &Path) -> Result<PathBuf> {
    let stamp = Local::now().format(BACKUP_TIMESTAMP_FORMAT);
    let backup = PathBuf::from(format!("{}.bak.{stamp}", path.display()));
    fs::copy(path, &backup).with_context(|| {
        format!(
            "failed to back up {} to {}",
            path.display(),
            backup.display()
        )
    })?;
    Ok(backup)
}

pub fn remove_file_if_exists(path: &Path) -> io::Result<()> {
    if path.exists() {
        fs::remove_file(path)?;
    }
    Ok(())
}

pub fn set_executable(path: &Path) -> Result<()> {
    set_mode(path, 0o755)
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode))
        .with_context(|| format!("failed to set permissions on {}", path.display()))
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) -> Result<()> {
    Ok(())
}
