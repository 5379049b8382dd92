#![cfg(feature = "raster")]

use std::sync::Arc;

use codeshot::rendering::raster::render_svg_to_png;
use codeshot::{
    Clipboard, DownloadDir, EditorSession, Language, PanelConfig, PanelStyle, PlainHighlighter,
    SessionParts, SvgRenderer, SyntectHighlighter,
};

struct NoClipboard;

#[async_trait::async_trait]
impl Clipboard for NoClipboard {
    async fn write_text(&self, _text: &str) -> codeshot::Result<()> {
        Err(codeshot::Error::PublishClipboardDenied("unused".into()))
    }
}

fn png_size(png: &[u8]) -> (u32, u32) {
    assert_eq!(&png[0..8], b"\x89PNG\r\n\x1a\n");
    let be = |b: &[u8]| u32::from_be_bytes([b[0], b[1], b[2], b[3]]);
    (be(&png[16..20]), be(&png[20..24]))
}

#[test]
fn smoke_render_svg() {
    let svg = r#"<svg xmlns="http://www.w3.org/2000/svg" width="256" height="128"><rect width="256" height="128" fill="white"/></svg>"#;
    let png = render_svg_to_png(svg, 256, 128, Arc::new(fontdb::Database::new())).unwrap();
    assert_eq!(png_size(&png), (256, 128));
}

#[tokio::test]
async fn exported_image_has_the_computed_height() {
    let dir = tempfile::tempdir().unwrap();
    let config = PanelConfig::default();
    let renderer = SvgRenderer::new(
        Box::new(SyntectHighlighter::new()),
        config.layout,
        PanelStyle::default(),
        Arc::new(fontdb::Database::new()),
    );
    let parts = SessionParts {
        renderer: Box::new(renderer),
        clipboard: Box::new(NoClipboard),
        writer: Box::new(DownloadDir::new(dir.path())),
    };
    let mut session = EditorSession::new(&config, parts).unwrap();
    session.set_language(Language::Python);
    let code: Vec<String> = (0..40).map(|i| format!("print({})", i)).collect();
    session.set_code(code.join("\n"));

    let receipt = session.export_image().await.unwrap();
    assert_eq!(receipt.height, 40 * 20 + 148);
    assert_eq!(receipt.path, dir.path().join("formatted-code.png"));

    let bytes = std::fs::read(&receipt.path).unwrap();
    assert_eq!(png_size(&bytes), (receipt.width, receipt.height));
}

#[tokio::test]
async fn empty_document_exports_at_base_height() {
    let dir = tempfile::tempdir().unwrap();
    let config = PanelConfig::default();
    let renderer = SvgRenderer::new(
        Box::new(PlainHighlighter::default()),
        config.layout,
        config.style.clone(),
        Arc::new(fontdb::Database::new()),
    );
    let parts = SessionParts {
        renderer: Box::new(renderer),
        clipboard: Box::new(NoClipboard),
        writer: Box::new(DownloadDir::new(dir.path())),
    };
    let mut session = EditorSession::new(&config, parts).unwrap();
    let receipt = session.export_image().await.unwrap();
    assert_eq!(receipt.height, config.layout.base_height_px);
    assert_eq!(receipt.width, config.style.min_width_px);
}

struct RecordingClipboard(std::sync::Mutex<Vec<String>>);

#[async_trait::async_trait]
impl Clipboard for RecordingClipboard {
    async fn write_text(&self, text: &str) -> codeshot::Result<()> {
        self.0.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

#[tokio::test]
async fn sharing_works_without_fonts_or_syntaxes() {
    let dir = tempfile::tempdir().unwrap();
    let config = PanelConfig::default();
    let renderer = SvgRenderer::new(
        Box::new(PlainHighlighter::default()),
        config.layout,
        config.style.clone(),
        Arc::new(fontdb::Database::new()),
    );
    let parts = SessionParts {
        renderer: Box::new(renderer),
        clipboard: Box::new(RecordingClipboard(Default::default())),
        writer: Box::new(DownloadDir::new(dir.path())),
    };
    let mut session = EditorSession::new(&config, parts).unwrap();
    session.set_language(Language::Ruby);
    session.set_code("puts 1");

    let link = session.share().await.unwrap();
    assert!(link.url.as_str().starts_with("http://localhost:3000/share/"));
    assert_eq!(link.url, session.share_url().unwrap().url);
    assert!(std::fs::read_dir(dir.path()).unwrap().next().is_none());
}
