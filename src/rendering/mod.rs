//! Rendering: the preview region the exporter captures.
//!
//! A [`Renderer`] receives frames synchronously through `present` and lays
//! them out and paints them later. `settle` is the point where pending work
//! has been committed; only a settled [`RegionHandle`] may be rasterized.

pub mod layout;
pub mod paint;
#[cfg(feature = "raster")]
pub mod raster;

use async_trait::async_trait;
use sha2::{Digest, Sha256};

use crate::document::Document;
use crate::highlight::{Highlighter, StyledLine};
use crate::rendering::layout::{layout_panel, PanelStyle};
use crate::rendering::paint::{expand_tabs, paint_panel, to_svg};
use crate::sizing::{LayoutConstants, LayoutMetrics};
use crate::{Error, Result};

const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";

/// What a renderer is asked to show: the document and the height it gets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewFrame {
    pub document: Document,
    pub metrics: LayoutMetrics,
}

/// A laid-out, painted region, identified by the frame generation it shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionHandle {
    pub generation: u64,
    pub width_px: u32,
    pub height_px: u32,
}

#[async_trait]
pub trait Renderer: Send + Sync {
    /// Schedule `frame` for display. Must not block on layout or paint.
    fn present(&mut self, frame: PreviewFrame);

    /// Wait until every presented frame is laid out and painted.
    async fn settle(&mut self) -> Result<RegionHandle>;

    /// Rasterize a settled region into PNG bytes.
    async fn rasterize(&self, region: &RegionHandle) -> Result<Vec<u8>>;
}

/// A composed frame: the region it occupies and its SVG markup.
#[derive(Debug, Clone)]
pub struct Scene {
    pub region: RegionHandle,
    pub svg: String,
}

/// Highlight, lay out and paint `frame` into an SVG scene.
pub fn compose_scene(
    frame: &PreviewFrame,
    generation: u64,
    highlighter: &dyn Highlighter,
    constants: &LayoutConstants,
    style: &PanelStyle,
) -> Scene {
    let doc = &frame.document;
    let placeholder = doc.is_empty();
    let mut lines: Vec<StyledLine> = if placeholder {
        vec![StyledLine::plain(doc.display_text(), crate::highlight::DEFAULT_FOREGROUND)]
    } else {
        highlighter.highlight(&doc.code, doc.language)
    };
    expand_tabs(&mut lines);

    let longest = lines.iter().map(StyledLine::char_len).max().unwrap_or(0);
    let layout = layout_panel(&frame.metrics, longest, constants, style);
    let label = doc.language.file_label();
    let cmds = paint_panel(&layout, &lines, &label, placeholder, style);
    let svg = to_svg(&cmds, layout.canvas.width, layout.canvas.height, &style.font_family);

    Scene {
        region: RegionHandle {
            generation,
            width_px: layout.canvas.width,
            height_px: layout.canvas.height,
        },
        svg,
    }
}

#[derive(Debug, Clone)]
pub struct Screenshot {
    pub width: u32,
    pub height: u32,
    pub png_data: Vec<u8>,
}

impl Screenshot {
    /// Wrap PNG bytes, reading the dimensions from the IHDR chunk.
    pub fn from_png(png_data: Vec<u8>) -> Result<Self> {
        if png_data.len() < 24 || !png_data.starts_with(PNG_SIGNATURE) || &png_data[12..16] != b"IHDR" {
            return Err(Error::ExportCaptureFailed(
                "rasterizer did not produce a PNG image".into(),
            ));
        }
        let be = |b: &[u8]| u32::from_be_bytes([b[0], b[1], b[2], b[3]]);
        Ok(Self {
            width: be(&png_data[16..20]),
            height: be(&png_data[20..24]),
            png_data,
        })
    }

    /// SHA-256 of the PNG bytes, hex encoded.
    pub fn digest(&self) -> String {
        hex::encode(Sha256::digest(&self.png_data))
    }
}
