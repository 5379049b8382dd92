//! Codeshot
//!
//! Turns pasted source code into a screenshot-ready panel, exports that panel
//! as a PNG, and packs the code and its language into a URL that reproduces
//! the same panel for someone else.
//!
//! # Features
//!
//! - **Share tokens**: lossless, URL-path-safe encoding of a document
//! - **Deterministic sizing**: the panel is always tall enough for every line,
//!   so exports are never clipped to a scroll viewport
//! - **Raster backend** (`raster`, default): SVG scene rasterized with resvg
//! - **System clipboard** (`clipboard`, default): share links copied via arboard
//!
//! # Example
//!
//! ```
//! use codeshot::{codec, Document, Language, PreviewLayoutSizer};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let doc = Document::new("print('hi')", Language::Python);
//! let token = codec::encode(&doc)?;
//! assert_eq!(codec::decode(token.as_str())?, doc);
//!
//! let height = PreviewLayoutSizer::default().compute_height(&doc.code);
//! assert_eq!(height, 200);
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

pub mod error;
pub use error::{Error, Result};

pub mod codec;
pub mod document;
pub mod export;
pub mod highlight;
pub mod language;
pub mod rendering;
pub mod session;
pub mod share;
pub mod sizing;

// System clipboard backend
#[cfg(feature = "clipboard")]
pub mod clipboard;

pub use codec::{Decoded, LanguageResolution, ShareToken};
pub use document::Document;
pub use export::{DownloadDir, ExportReceipt, FileWriter, SnapshotExporter, DEFAULT_EXPORT_FILE_NAME};
pub use highlight::{Highlighter, PlainHighlighter, SyntectHighlighter};
pub use language::Language;
pub use rendering::layout::PanelStyle;
pub use rendering::{PreviewFrame, RegionHandle, Renderer, Screenshot};
pub use session::{EditorSession, Notice, NoticeKind, SessionParts, SessionState};
pub use share::{Clipboard, ShareLinkPublisher, SharedLink};
pub use sizing::{LayoutConstants, LayoutMetrics, PreviewLayoutSizer};

#[cfg(feature = "raster")]
pub use rendering::raster::SvgRenderer;

#[cfg(feature = "clipboard")]
pub use clipboard::SystemClipboard;

/// Origin used for share links when none is configured.
pub const DEFAULT_SHARE_ORIGIN: &str = "http://localhost:3000";

/// Configuration for a codeshot session
///
/// Every field has a default, so a JSON config file only needs the values it
/// changes:
///
/// ```
/// let cfg: codeshot::PanelConfig =
///     serde_json::from_str(r#"{ "layout": { "line_height_px": 24 } }"#).unwrap();
/// assert_eq!(cfg.layout.line_height_px, 24);
/// assert_eq!(cfg.layout.base_height_px, 200);
/// assert!(cfg.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    /// Sizing constants
    pub layout: LayoutConstants,
    /// Panel chrome and typography
    pub style: PanelStyle,
    /// File name exports are saved under
    pub export_file_name: String,
    /// Origin share URLs are built on
    pub share_origin: String,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            layout: LayoutConstants::default(),
            style: PanelStyle::default(),
            export_file_name: DEFAULT_EXPORT_FILE_NAME.to_string(),
            share_origin: DEFAULT_SHARE_ORIGIN.to_string(),
        }
    }
}

impl PanelConfig {
    /// Read and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let cfg: PanelConfig = serde_json::from_str(&text)
            .map_err(|e| Error::ConfigError(format!("{}: {}", path.display(), e)))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        let l = &self.layout;
        if l.line_height_px == 0 {
            return Err(Error::ConfigError("line_height_px must be positive".into()));
        }
        if l.base_height_px == 0 {
            return Err(Error::ConfigError("base_height_px must be positive".into()));
        }
        if let Some(max) = l.max_height_px {
            if max < l.base_height_px {
                return Err(Error::ConfigError(format!(
                    "max_height_px ({}) is below base_height_px ({})",
                    max, l.base_height_px
                )));
            }
        }
        let frame = self.style.frame_height_px();
        if l.chrome_padding_px < frame {
            return Err(Error::ConfigError(format!(
                "chrome_padding_px ({}) is smaller than the panel frame ({}px); lines would be cut off",
                l.chrome_padding_px, frame
            )));
        }
        let char_width = self.style.char_width_px;
        if self.style.font_size_px == 0 || char_width.is_nan() || char_width <= 0.0 {
            return Err(Error::ConfigError("font size and character width must be positive".into()));
        }
        let name = self.export_file_name.trim();
        if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
            return Err(Error::ConfigError(format!(
                "export_file_name must be a bare file name, got '{}'",
                self.export_file_name
            )));
        }
        ShareLinkPublisher::new(&self.share_origin)?;
        Ok(())
    }
}
