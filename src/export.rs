//! Snapshot export: rasterize the settled preview and save it locally.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use log::{debug, info};

use crate::rendering::{RegionHandle, Renderer, Screenshot};
use crate::sizing::LayoutMetrics;
use crate::{Error, Result};

/// Name every export is saved under.
pub const DEFAULT_EXPORT_FILE_NAME: &str = "formatted-code.png";

/// Destination for exported files.
#[async_trait]
pub trait FileWriter: Send + Sync {
    /// Store `bytes` under `name` and return where they ended up.
    async fn write(&self, name: &str, bytes: &[u8]) -> Result<PathBuf>;
}

/// Writes files into a local directory, replacing any previous export.
#[derive(Debug, Clone)]
pub struct DownloadDir {
    dir: PathBuf,
}

impl DownloadDir {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl FileWriter for DownloadDir {
    async fn write(&self, name: &str, bytes: &[u8]) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.dir.join(name);
        tokio::fs::write(&path, bytes).await?;
        Ok(path)
    }
}

/// Result of a successful export.
#[derive(Debug, Clone)]
pub struct ExportReceipt {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub digest: String,
}

#[derive(Debug, Clone)]
pub struct SnapshotExporter {
    file_name: String,
}

impl Default for SnapshotExporter {
    fn default() -> Self {
        Self::new(DEFAULT_EXPORT_FILE_NAME)
    }
}

impl SnapshotExporter {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Rasterize `region` and check the image really is that region.
    pub async fn capture(&self, renderer: &dyn Renderer, region: &RegionHandle) -> Result<Screenshot> {
        let png = renderer.rasterize(region).await?;
        let shot = Screenshot::from_png(png)?;
        if (shot.width, shot.height) != (region.width_px, region.height_px) {
            return Err(Error::ExportCaptureFailed(format!(
                "captured {}x{} but the region is {}x{}",
                shot.width, shot.height, region.width_px, region.height_px
            )));
        }
        Ok(shot)
    }

    /// Wait for the renderer to settle on `expected`, capture, and save.
    ///
    /// Fails without writing anything when the settled region is not laid out
    /// at the expected container height.
    pub async fn export(
        &self,
        renderer: &mut dyn Renderer,
        expected: &LayoutMetrics,
        writer: &dyn FileWriter,
    ) -> Result<ExportReceipt> {
        // Give any render work queued by the last edit a cycle to start.
        tokio::task::yield_now().await;
        let region = renderer.settle().await?;
        debug!(
            "Settled region {} at {}x{}",
            region.generation, region.width_px, region.height_px
        );
        if region.height_px != expected.container_height_px {
            return Err(Error::ExportCaptureFailed(format!(
                "region is {}px tall, expected {}px",
                region.height_px, expected.container_height_px
            )));
        }

        let shot = self.capture(&*renderer, &region).await?;
        let digest = shot.digest();
        let path = writer.write(&self.file_name, &shot.png_data).await?;
        info!(
            "Exported {}x{} snapshot to {} (sha256 {})",
            shot.width,
            shot.height,
            path.display(),
            digest
        );
        Ok(ExportReceipt {
            path,
            width: shot.width,
            height: shot.height,
            digest,
        })
    }
}
