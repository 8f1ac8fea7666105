//! First-run acquisition of the offline wake-phrase model.

use crate::config::WakeConfig;
use crate::error::ModelError;
use anyhow::Context;
use reqwest::Client;
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tracing::info;

/// Downloads the model archive and unpacks it into `dir`. A marker file
/// inside the archive tells a complete install from a partial one.
#[derive(Debug, Clone)]
pub struct ModelManager {
    url: String,
    dir: PathBuf,
    marker: String,
}

impl ModelManager {
    pub fn new(url: impl Into<String>, dir: PathBuf, marker: impl Into<String>) -> Self {
        Self { url: url.into(), dir, marker: marker.into() }
    }

    pub fn from_config(config: &WakeConfig, dir: PathBuf) -> Self {
        Self::new(config.model_url.clone(), dir, config.model_marker.clone())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn is_ready(&self) -> bool {
        self.dir.join(&self.marker).is_file()
    }

    /// No-op when the model is already in place.
    pub async fn ensure(&self, client: &Client) -> Result<(), ModelError> {
        if self.is_ready() {
            return Ok(());
        }
        info!(url = %self.url, "downloading offline model");
        let archive = download(client, &self.url)
            .await
            .map_err(|e| ModelError::Download(format!("{e:#}")))?;

        let dir = self.dir.clone();
        tokio::task::spawn_blocking(move || install_archive(&archive, &dir))
            .await
            .map_err(|e| ModelError::Archive(e.to_string()))??;

        if !self.is_ready() {
            return Err(ModelError::Incomplete(self.marker.clone()));
        }
        info!(dir = %self.dir.display(), "offline model installed");
        Ok(())
    }

    /// Deletes an unusable model so the next attempt downloads it again.
    pub fn remove(&self) -> Result<(), ModelError> {
        match fs::remove_dir_all(&self.dir) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

async fn download(client: &Client, url: &str) -> anyhow::Result<Vec<u8>> {
    let response = client
        .get(url)
        .send()
        .await
        .context("request failed")?
        .error_for_status()
        .context("server refused")?;
    let bytes = response.bytes().await.context("body interrupted")?;
    Ok(bytes.to_vec())
}

/// Unpacks into a sibling staging dir, then swaps it into place, so `dest`
/// is either absent or complete.
pub fn install_archive(archive: &[u8], dest: &Path) -> Result<(), ModelError> {
    let staging = dest.with_extension("partial");
    if staging.exists() {
        fs::remove_dir_all(&staging)?;
    }
    fs::create_dir_all(&staging)?;
    extract_stripped(archive, &staging)?;

    if dest.exists() {
        fs::remove_dir_all(dest)?;
    }
    fs::rename(&staging, dest)?;
    Ok(())
}

/// Extracts every entry with its first path component dropped; model
/// archives wrap everything in a versioned top-level folder.
pub fn extract_stripped(archive: &[u8], dest: &Path) -> Result<(), ModelError> {
    let mut zip =
        zip::ZipArchive::new(Cursor::new(archive)).map_err(|e| ModelError::Archive(e.to_string()))?;

    for i in 0..zip.len() {
        let mut entry = zip
            .by_index(i)
            .map_err(|e| ModelError::Archive(e.to_string()))?;
        let Some(name) = entry.enclosed_name() else {
            continue;
        };
        let relative: PathBuf = name.components().skip(1).collect();
        if relative.as_os_str().is_empty() {
            continue;
        }
        let target = dest.join(relative);
        if entry.is_dir() {
            fs::create_dir_all(&target)?;
            continue;
        }
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut out = fs::File::create(&target)?;
        std::io::copy(&mut entry, &mut out)?;
    }
    Ok(())
}
