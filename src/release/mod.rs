//! GitHub release metadata and asset downloads.
//!
//! The installer talks to two endpoints: the "latest release" document for
//! a repository, and the raw download URL of that release's first asset.
//! Release packaging is expected to publish exactly one relevant artifact
//! per release; anything after the first asset is ignored.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

use crate::constants::{GITHUB_API_ROOT, USER_AGENT};
use crate::core::PackupError;

/// A published release: its tag plus the ordered list of downloadable
/// assets.
///
/// Tags are treated as opaque strings and compared by exact equality — a
/// downgrade or an unrelated tag is indistinguishable from an upgrade.
#[derive(Debug, Clone, Deserialize)]
pub struct Release {
    /// The release tag, e.g. `v1.4.0`.
    pub tag_name: String,
    /// Downloadable files attached to the release, in publication order.
    #[serde(default)]
    pub assets: Vec<ReleaseAsset>,
}

/// One downloadable file attached to a release.
#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseAsset {
    /// The asset's file name as published.
    #[serde(default)]
    pub name: String,
    /// Direct download URL for the asset's binary content.
    pub browser_download_url: String,
}

impl Release {
    /// The first listed asset, which is the only one the installer
    /// consults.
    #[must_use]
    pub fn primary_asset(&self) -> Option<&ReleaseAsset> {
        self.assets.first()
    }
}

impl ReleaseAsset {
    /// File name to stage the download under, derived from the final
    /// segment of the download URL.
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.browser_download_url
            .rsplit('/')
            .next()
            .filter(|segment| !segment.is_empty())
            .unwrap_or("asset.bin")
    }
}

/// HTTP client for the releases endpoint and asset downloads.
///
/// Carries a custom user agent (GitHub rejects anonymous requests without
/// one) and an overridable API root so tests can point it at an
/// unreachable address. Requests use reqwest's defaults; there are no
/// retries — every operation is attempted exactly once per run.
pub struct ReleaseClient {
    http: reqwest::Client,
    api_root: String,
}

impl ReleaseClient {
    /// Create a client against the real GitHub API.
    pub fn new() -> Result<Self> {
        Self::with_api_root(GITHUB_API_ROOT)
    }

    /// Create a client against an alternative API root.
    pub fn with_api_root(api_root: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { http, api_root: api_root.into() })
    }

    /// Fetch the latest release document for `repo` (an `owner/name`
    /// coordinate).
    ///
    /// # Errors
    ///
    /// [`PackupError::ReleaseFetch`] for transport or HTTP-status failures,
    /// [`PackupError::ReleaseParse`] when the response body does not match
    /// the release document shape.
    pub async fn latest_release(&self, repo: &str) -> Result<Release> {
        let url = format!("{}/repos/{repo}/releases/latest", self.api_root);
        debug!(url = %url, "fetching latest release");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|source| PackupError::ReleaseFetch { url: url.clone(), source })?;

        let release = response
            .json::<Release>()
            .await
            .map_err(|source| PackupError::ReleaseParse { url: url.clone(), source })?;

        debug!(tag = %release.tag_name, assets = release.assets.len(), "release fetched");
        Ok(release)
    }

    /// Download an asset's binary content to `dest`.
    ///
    /// The body is buffered in memory before the write; release archives
    /// are small enough that streaming to disk buys nothing here.
    pub async fn download_asset(&self, url: &str, dest: &Path) -> Result<()> {
        debug!(url = %url, dest = %dest.display(), "downloading asset");

        let bytes = self
            .http
            .get(url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|source| PackupError::AssetDownload { url: url.to_string(), source })?
            .bytes()
            .await
            .map_err(|source| PackupError::AssetDownload { url: url.to_string(), source })?;

        tokio::fs::write(dest, &bytes)
            .await
            .with_context(|| format!("Failed to write downloaded asset: {}", dest.display()))?;

        Ok(())
    }
}
