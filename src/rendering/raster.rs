/// SVG panel renderer rasterized with resvg.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use log::debug;

use crate::highlight::Highlighter;
use crate::rendering::layout::PanelStyle;
use crate::rendering::{compose_scene, PreviewFrame, RegionHandle, Renderer, Scene};
use crate::sizing::LayoutConstants;
use crate::{Error, Result};

/// Load system fonts plus any extra font files.
///
/// The generic `monospace` family is pointed at the first monospaced face
/// found, since the built-in default rarely exists on Linux.
pub fn load_fonts<P: AsRef<Path>>(extra: &[P]) -> Result<Arc<fontdb::Database>> {
    let mut db = fontdb::Database::new();
    db.load_system_fonts();
    for path in extra {
        db.load_font_file(path.as_ref()).map_err(|e| {
            Error::ConfigError(format!("Failed to load font {}: {}", path.as_ref().display(), e))
        })?;
    }
    let mono = db
        .faces()
        .find(|f| f.monospaced)
        .and_then(|f| f.families.first().map(|(name, _)| name.clone()));
    if let Some(name) = mono {
        debug!("Using '{}' as the monospace family", name);
        db.set_monospace_family(name);
    }
    debug!("Font database holds {} faces", db.len());
    Ok(Arc::new(db))
}

/// Render an SVG document into PNG bytes of exactly `width` x `height`.
pub fn render_svg_to_png(svg: &str, width: u32, height: u32, fonts: Arc<fontdb::Database>) -> Result<Vec<u8>> {
    let options = usvg::Options {
        fontdb: fonts,
        ..Default::default()
    };

    let tree = usvg::Tree::from_str(svg, &options)
        .map_err(|e| Error::ExportCaptureFailed(format!("Failed to parse SVG: {}", e)))?;

    let mut pixmap = tiny_skia::Pixmap::new(width, height).ok_or_else(|| {
        Error::ExportCaptureFailed(format!("Failed to create a {}x{} pixmap", width, height))
    })?;

    resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

    pixmap
        .encode_png()
        .map_err(|e| Error::ExportCaptureFailed(format!("Failed to encode PNG: {}", e)))
}

/// Renderer that composes frames as SVG on settle and rasterizes on demand.
pub struct SvgRenderer {
    highlighter: Box<dyn Highlighter>,
    constants: LayoutConstants,
    style: PanelStyle,
    fonts: Arc<fontdb::Database>,
    pending: Option<PreviewFrame>,
    generation: u64,
    committed: Option<Scene>,
}

impl SvgRenderer {
    pub fn new(
        highlighter: Box<dyn Highlighter>,
        constants: LayoutConstants,
        style: PanelStyle,
        fonts: Arc<fontdb::Database>,
    ) -> Self {
        Self {
            highlighter,
            constants,
            style,
            fonts,
            pending: None,
            generation: 0,
            committed: None,
        }
    }

    /// The last committed scene, if any.
    pub fn scene(&self) -> Option<&Scene> {
        self.committed.as_ref()
    }
}

#[async_trait]
impl Renderer for SvgRenderer {
    fn present(&mut self, frame: PreviewFrame) {
        self.generation += 1;
        self.pending = Some(frame);
    }

    async fn settle(&mut self) -> Result<RegionHandle> {
        // Let the presenting handler finish its turn before committing.
        tokio::task::yield_now().await;
        if let Some(frame) = self.pending.take() {
            let scene = compose_scene(
                &frame,
                self.generation,
                self.highlighter.as_ref(),
                &self.constants,
                &self.style,
            );
            debug!(
                "Committed frame {} ({}x{})",
                scene.region.generation, scene.region.width_px, scene.region.height_px
            );
            self.committed = Some(scene);
        }
        self.committed
            .as_ref()
            .map(|s| s.region)
            .ok_or_else(|| Error::RenderError("no frame has been presented".into()))
    }

    async fn rasterize(&self, region: &RegionHandle) -> Result<Vec<u8>> {
        let scene = self
            .committed
            .as_ref()
            .filter(|s| s.region == *region)
            .ok_or_else(|| Error::ExportCaptureFailed("region is not the committed frame".into()))?;
        let svg = scene.svg.clone();
        let fonts = Arc::clone(&self.fonts);
        let (width, height) = (region.width_px, region.height_px);
        tokio::task::spawn_blocking(move || render_svg_to_png(&svg, width, height, fonts))
            .await
            .map_err(|e| Error::ExportCaptureFailed(format!("Rasterizer task failed: {}", e)))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use crate::highlight::PlainHighlighter;
    use crate::language::Language;
    use crate::sizing::PreviewLayoutSizer;

    fn renderer() -> SvgRenderer {
        SvgRenderer::new(
            Box::new(PlainHighlighter::default()),
            LayoutConstants::default(),
            PanelStyle::default(),
            Arc::new(fontdb::Database::new()),
        )
    }

    #[test]
    fn renders_png_of_requested_size() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg" width="16" height="8"><rect width="16" height="8" fill="red"/></svg>"#;
        let png = render_svg_to_png(svg, 16, 8, Arc::new(fontdb::Database::new())).unwrap();
        assert_eq!(&png[0..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn invalid_svg_is_a_capture_failure() {
        let err = render_svg_to_png("<svg", 4, 4, Arc::new(fontdb::Database::new())).unwrap_err();
        assert!(matches!(err, Error::ExportCaptureFailed(_)));
    }

    #[tokio::test]
    async fn settle_without_frame_fails() {
        let mut r = renderer();
        assert!(matches!(r.settle().await, Err(Error::RenderError(_))));
    }

    #[tokio::test]
    async fn stale_region_is_refused() {
        let mut r = renderer();
        let doc = Document::new("a", Language::Ruby);
        let metrics = PreviewLayoutSizer::default().measure(&doc.code);
        r.present(PreviewFrame { document: doc.clone(), metrics });
        let first = r.settle().await.unwrap();
        r.present(PreviewFrame { document: doc, metrics });
        let second = r.settle().await.unwrap();
        assert_ne!(first, second);
        assert!(matches!(r.rasterize(&first).await, Err(Error::ExportCaptureFailed(_))));
        assert!(r.rasterize(&second).await.is_ok());
    }
}
