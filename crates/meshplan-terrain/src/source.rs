use async_trait::async_trait;
use meshplan_common::TileKey;

use crate::error::TerrainError;

/// A pluggable origin for raw tile bytes: HTTP, a local directory, or
/// anything else that can hand back a `{z}/{x}/{y}` tile's raw bytes.
#[async_trait]
pub trait TileSource: Send + Sync {
    async fn fetch_bytes(&self, key: TileKey) -> Result<Vec<u8>, TerrainError>;
}

/// Fetches tiles over HTTP from `{base_url}/{z}/{x}/{y}.tif`.
pub struct HttpTileSource {
    base_url: String,
    client: reqwest::Client,
}

impl HttpTileSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(60))
                .build()
                .expect("reqwest client configuration is static and valid"),
        }
    }

    fn url_for(&self, key: TileKey) -> String {
        format!(
            "{}/{}/{}/{}.tif",
            self.base_url.trim_end_matches('/'),
            key.z,
            key.x,
            key.y
        )
    }
}

#[async_trait]
impl TileSource for HttpTileSource {
    async fn fetch_bytes(&self, key: TileKey) -> Result<Vec<u8>, TerrainError> {
        let url = self.url_for(key);
        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(TerrainError::TileUnavailable(key));
        }
        Ok(response.bytes().await?.to_vec())
    }
}

/// Reads tiles from a local directory laid out as `{root}/{z}/{x}/{y}.tif`,
/// for `file://` configured tile sources.
pub struct FileTileSource {
    root: std::path::PathBuf,
}

impl FileTileSource {
    pub fn new(root: impl Into<std::path::PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, key: TileKey) -> std::path::PathBuf {
        self.root
            .join(key.z.to_string())
            .join(key.x.to_string())
            .join(format!("{}.tif", key.y))
    }
}

#[async_trait]
impl TileSource for FileTileSource {
    async fn fetch_bytes(&self, key: TileKey) -> Result<Vec<u8>, TerrainError> {
        let path = self.path_for(key);
        tokio::fs::read(&path)
            .await
            .map_err(|_| TerrainError::TileUnavailable(key))
    }
}
