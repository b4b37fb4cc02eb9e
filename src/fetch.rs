//! Result download with graceful fallback to the remote URL.

use crate::error::Result;
use crate::types::FetchResult;
use std::path::{Path, PathBuf};

/// Directory downloaded videos are written to by default.
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// Downloads generated videos, degrading to the remote URL on any failure.
pub struct ResultFetcher {
    http: reqwest::Client,
    output_dir: PathBuf,
}

impl Default for ResultFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultFetcher {
    /// Creates a fetcher writing into the default `output/` directory.
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }

    /// Creates a fetcher writing into the given directory.
    pub fn with_output_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            http: reqwest::Client::new(),
            output_dir: dir.into(),
        }
    }

    /// Resolves a result URL, optionally downloading it.
    ///
    /// Without `download` (or with an empty URL) the URL passes through
    /// unchanged and no request is made. Download failures are logged and
    /// fall back to the remote URL; this method never errors.
    pub async fn fetch(&self, url: &str, download: bool, filename: &str) -> FetchResult {
        if !download || url.is_empty() {
            return FetchResult::Remote(url.to_string());
        }

        match self.download(url, filename).await {
            Ok(path) => {
                tracing::debug!(path = %path.display(), "video downloaded");
                FetchResult::Downloaded(path)
            }
            Err(e) => {
                tracing::warn!(url = %url, "download failed, returning remote URL: {e}");
                FetchResult::Remote(url.to_string())
            }
        }
    }

    async fn download(&self, url: &str, filename: &str) -> Result<PathBuf> {
        let response = self.http.get(url).send().await?.error_for_status()?;
        let bytes = response.bytes().await?;

        std::fs::create_dir_all(&self.output_dir)?;
        let path = self.output_dir.join(filename);
        std::fs::write(&path, &bytes)?;

        Ok(path)
    }

    /// Returns the configured output directory.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fetch_without_download_passes_url_through() {
        let fetcher = ResultFetcher::new();
        let result = fetcher
            .fetch("https://x/video.mp4", false, "video.mp4")
            .await;
        assert_eq!(result, FetchResult::Remote("https://x/video.mp4".into()));
    }

    #[tokio::test]
    async fn test_fetch_empty_url_passes_through() {
        let fetcher = ResultFetcher::new();
        let result = fetcher.fetch("", true, "video.mp4").await;
        assert_eq!(result, FetchResult::Remote(String::new()));
    }

    #[tokio::test]
    async fn test_fetch_failed_download_falls_back_to_url() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = ResultFetcher::with_output_dir(dir.path());

        // Not a valid URL, so the GET fails before any network traffic.
        let result = fetcher.fetch("not a url", true, "video.mp4").await;
        assert_eq!(result, FetchResult::Remote("not a url".into()));
        assert!(!dir.path().join("video.mp4").exists());
    }

    #[test]
    fn test_default_output_dir() {
        let fetcher = ResultFetcher::new();
        assert_eq!(fetcher.output_dir(), Path::new("output"));
    }
}
