use std::fs;
use std::path::Path;
use std::process::Command;

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use trellis_core::RELEASE_INDEX_URL;
use trellis_host::run_command;

use crate::fs_utils::{remove_file_if_exists, set_executable};

#[derive(Debug, Deserialize)]
struct ReleaseIndexEntry {
    tag_name: Option<String>,
}

/// A pinned version is returned unchanged; the download step is its
/// validation. An unpinned request resolves the latest published tag.
pub fn resolve_version(pinned: Option<&str>) -> Result<String> {
    if let Some(version) = pinned {
        return Ok(version.to_string());
    }
    latest_release_tag(RELEASE_INDEX_URL)
}

pub fn latest_release_tag(index_url: &str) -> Result<String> {
    let client = reqwest::blocking::Client::builder()
        .user_agent("trellis-setup")
        .build()
        .context("failed to build release index client")?;
    let response = client
        .get(index_url)
        .send()
        .with_context(|| format!("release index unreachable: {index_url}"))?;
    if !response.status().is_success() {
        return Err(anyhow!(
            "release index query failed: {index_url} returned {}",
            response.status()
        ));
    }

    let entry: ReleaseIndexEntry = response
        .json()
        .context("failed to parse release index response")?;
    match entry.tag_name {
        Some(tag) if !tag.trim().is_empty() => Ok(tag.trim().to_string()),
        _ => Err(anyhow!("release index returned no published tag: {index_url}")),
    }
}

/// Downloads a release binary to `dest` through a `.part` sibling so a
/// failed transfer never leaves a partial file at the final path, marks it
/// executable, and returns its sha256 digest.
pub fn download_binary(url: &str, dest: &Path) -> Result<String> {
    let file_name = dest
        .file_name()
        .and_then(|value| value.to_str())
        .ok_or_else(|| anyhow!("invalid download destination: {}", dest.display()))?;
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    let part_path = dest.with_file_name(format!("{file_name}.part"));
    let result =
        download_with_curl(url, &part_path).or_else(|_| download_with_wget(url, &part_path));
    if let Err(err) = result {
        let _ = fs::remove_file(&part_path);
        return Err(err);
    }

    let metadata = fs::metadata(&part_path)
        .with_context(|| format!("failed to inspect download: {}", part_path.display()))?;
    if metadata.len() == 0 {
        let _ = fs::remove_file(&part_path);
        return Err(anyhow!("downloaded artifact is empty: {url}"));
    }

    let digest = file_sha256(&part_path)?;
    remove_file_if_exists(dest)
        .with_context(|| format!("failed to replace existing binary: {}", dest.display()))?;
    fs::rename(&part_path, dest)
        .with_context(|| format!("failed to move download into place: {}", dest.display()))?;
    set_executable(dest)?;
    Ok(digest)
}

fn download_with_curl(url: &str, out_path: &Path) -> Result<()> {
    let mut command = Command::new("curl");
    command.arg("-fL").arg("-o").arg(out_path).arg(url);
    run_command(&mut command, "curl download failed")
}

fn download_with_wget(url: &str, out_path: &Path) -> Result<()> {
    let mut command = Command::new("wget");
    command.arg("-O").arg(out_path).arg(url);
    run_command(&mut command, "wget download failed")
}

pub fn file_sha256(path: &Path) -> Result<String> {
    let bytes =
        fs::read(path).with_context(|| format!("failed to read {} for digest", path.display()))?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(hex::encode(hasher.finalize()))
}
