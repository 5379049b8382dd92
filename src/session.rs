//! Editor session: owns the document and drives sizing, export and sharing.
//!
//! `Editing` is the only steady state. `Exporting` and `Publishing` last for
//! the duration of the corresponding action and always fall back to
//! `Editing`, including when the action future is dropped midway.
//!
//! Actions take `&mut self`, so the borrow checker already rules out a second
//! export or share on the same session while one is in flight. The state is
//! published on a watch channel; [`EditorSession::status`] hands out receivers
//! a UI can use to disable its buttons while an action runs.

use std::fmt;

use log::{debug, warn};
use tokio::sync::watch;
use url::Url;

use crate::codec::{self, LanguageResolution};
use crate::document::Document;
use crate::export::{ExportReceipt, FileWriter, SnapshotExporter};
use crate::language::Language;
use crate::rendering::{PreviewFrame, Renderer};
use crate::share::{token_from_route, Clipboard, ShareLinkPublisher, SharedLink};
use crate::sizing::{LayoutMetrics, PreviewLayoutSizer};
use crate::{Error, PanelConfig, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Editing,
    Exporting,
    Publishing,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SessionState::Editing => "editing",
            SessionState::Exporting => "export",
            SessionState::Publishing => "share",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// A user-visible, non-blocking message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    /// Somewhere the user can navigate to, such as a freshly shared URL
    pub link: Option<Url>,
    /// Whether repeating the action may succeed
    pub retryable: bool,
}

impl Notice {
    fn success(message: impl Into<String>, link: Option<Url>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
            link,
            retryable: false,
        }
    }

    fn failure(context: &str, err: &Error) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: format!("{}: {}", context, err),
            link: None,
            retryable: err.is_retryable(),
        }
    }
}

/// The capabilities a session drives.
pub struct SessionParts {
    pub renderer: Box<dyn Renderer>,
    pub clipboard: Box<dyn Clipboard>,
    pub writer: Box<dyn FileWriter>,
}

/// Resets the session to `Editing` when a transient action ends.
struct Transient<'a> {
    state: &'a watch::Sender<SessionState>,
}

impl<'a> Transient<'a> {
    fn enter(state: &'a watch::Sender<SessionState>, next: SessionState) -> Result<Self> {
        let current = *state.borrow();
        match current {
            SessionState::Editing => {
                state.send_replace(next);
                Ok(Self { state })
            }
            busy => Err(Error::SessionBusy(match busy {
                SessionState::Exporting => "export",
                _ => "share",
            })),
        }
    }
}

impl Drop for Transient<'_> {
    fn drop(&mut self) {
        self.state.send_replace(SessionState::Editing);
    }
}

pub struct EditorSession {
    document: Document,
    metrics: LayoutMetrics,
    sizer: PreviewLayoutSizer,
    exporter: SnapshotExporter,
    publisher: ShareLinkPublisher,
    parts: SessionParts,
    state: watch::Sender<SessionState>,
    notices: Vec<Notice>,
}

impl EditorSession {
    /// Start a session on a fresh, empty document.
    pub fn new(config: &PanelConfig, parts: SessionParts) -> Result<Self> {
        Self::with_document(Document::default(), config, parts)
    }

    /// Start a session seeded with `document`.
    pub fn with_document(document: Document, config: &PanelConfig, parts: SessionParts) -> Result<Self> {
        config.validate()?;
        let sizer = PreviewLayoutSizer::new(config.layout);
        let metrics = sizer.measure(&document.code);
        let mut session = Self {
            document,
            metrics,
            sizer,
            exporter: SnapshotExporter::new(config.export_file_name.clone()),
            publisher: ShareLinkPublisher::new(&config.share_origin)?,
            parts,
            state: watch::channel(SessionState::Editing).0,
            notices: Vec::new(),
        };
        session.present();
        Ok(session)
    }

    /// Start a session from a share URL or path.
    ///
    /// A malformed token never fails the session: it starts on an empty
    /// document and queues an error notice instead. A defaulted language is
    /// only logged.
    pub fn from_share_route(route: &str, config: &PanelConfig, parts: SessionParts) -> Result<Self> {
        let decoded = token_from_route(route)
            .ok_or_else(|| Error::DecodeMalformed("route has no token segment".into()))
            .and_then(codec::decode_detailed);

        match decoded {
            Ok(decoded) => {
                if let LanguageResolution::Unrecognized(name) = &decoded.language {
                    debug!("Shared document asked for '{}', opened as {}", name, decoded.document.language);
                }
                Self::with_document(decoded.document, config, parts)
            }
            Err(err) => {
                warn!("Could not decode shared document: {}", err);
                let mut session = Self::new(config, parts)?;
                session.notices.push(Notice::failure("Could not open the shared code", &err));
                Ok(session)
            }
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn metrics(&self) -> &LayoutMetrics {
        &self.metrics
    }

    pub fn state(&self) -> SessionState {
        *self.state.borrow()
    }

    /// Whether an export or share is in flight; UIs disable both actions.
    pub fn is_busy(&self) -> bool {
        self.state() != SessionState::Editing
    }

    /// Subscribe to state changes. Receivers keep observing while an action
    /// holds the session borrowed.
    pub fn status(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    pub fn set_code(&mut self, code: impl Into<String>) {
        self.document.code = code.into();
        self.metrics = self.sizer.measure(&self.document.code);
        debug!(
            "Code changed: {} lines, {}px",
            self.metrics.line_count, self.metrics.container_height_px
        );
        self.present();
    }

    pub fn set_language(&mut self, language: Language) {
        if self.document.language != language {
            self.document.language = language;
            self.present();
        }
    }

    fn present(&mut self) {
        self.parts.renderer.present(PreviewFrame {
            document: self.document.clone(),
            metrics: self.metrics,
        });
    }

    /// Export the preview as an image. Failures are also queued as notices.
    pub async fn export_image(&mut self) -> Result<ExportReceipt> {
        let result = match Transient::enter(&self.state, SessionState::Exporting) {
            Ok(_guard) => {
                self.exporter
                    .export(self.parts.renderer.as_mut(), &self.metrics, self.parts.writer.as_ref())
                    .await
            }
            Err(busy) => Err(busy),
        };

        match &result {
            Ok(receipt) => self.notices.push(Notice::success(
                format!("Saved {}", receipt.path.display()),
                None,
            )),
            Err(err) => {
                warn!("Export failed: {}", err);
                self.notices.push(Notice::failure("Export failed", err));
            }
        }
        result
    }

    /// Copy a share URL for the current document to the clipboard.
    pub async fn share(&mut self) -> Result<SharedLink> {
        let result = match Transient::enter(&self.state, SessionState::Publishing) {
            Ok(_guard) => {
                self.publisher
                    .publish(&self.document, self.parts.clipboard.as_ref())
                    .await
            }
            Err(busy) => Err(busy),
        };

        match &result {
            Ok(link) => self.notices.push(Notice::success(
                "Share link copied to the clipboard",
                Some(link.url.clone()),
            )),
            Err(err) => {
                warn!("Share failed: {}", err);
                let context = match err {
                    Error::PublishClipboardDenied(_) => "Could not copy the share link",
                    _ => "Could not create a share link",
                };
                self.notices.push(Notice::failure(context, err));
            }
        }
        result
    }

    /// The share URL for the current document, without copying it.
    pub fn share_url(&self) -> Result<SharedLink> {
        self.publisher.share_url(&self.document)
    }
}
