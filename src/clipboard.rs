//! System clipboard backed by `arboard`.
//!
//! The clipboard handle lives on a dedicated worker thread for the lifetime
//! of [`SystemClipboard`]: on X11 the copied text is only served while its
//! owner is alive, and the handle is not guaranteed to be `Send`.

use std::sync::mpsc::{self, Sender};
use std::thread;

use async_trait::async_trait;
use log::debug;
use tokio::sync::oneshot;

use crate::share::Clipboard;
use crate::{Error, Result};

enum Command {
    SetText(String, oneshot::Sender<Result<()>>),
    Close,
}

pub struct SystemClipboard {
    cmd_tx: Sender<Command>,
}

impl SystemClipboard {
    /// Spawn the worker and open the clipboard on it.
    pub async fn new() -> Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel::<Command>();
        let (init_tx, init_rx) = oneshot::channel::<Result<()>>();

        thread::spawn(move || {
            let mut clipboard = match arboard::Clipboard::new() {
                Ok(c) => c,
                Err(err) => {
                    let _ = init_tx.send(Err(Error::PublishClipboardDenied(format!(
                        "clipboard unavailable: {}",
                        err
                    ))));
                    return;
                }
            };
            let _ = init_tx.send(Ok(()));

            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    Command::SetText(text, resp) => {
                        let res = clipboard
                            .set_text(text)
                            .map_err(|e| Error::PublishClipboardDenied(e.to_string()));
                        let _ = resp.send(res);
                    }
                    Command::Close => break,
                }
            }
            debug!("Clipboard worker stopped");
        });

        init_rx
            .await
            .map_err(|e| Error::Other(format!("Clipboard worker init canceled: {}", e)))??;
        Ok(Self { cmd_tx })
    }
}

#[async_trait]
impl Clipboard for SystemClipboard {
    async fn write_text(&self, text: &str) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::SetText(text.to_string(), tx))
            .map_err(|_| Error::PublishClipboardDenied("clipboard worker is gone".into()))?;
        rx.await
            .map_err(|e| Error::PublishClipboardDenied(format!("clipboard write canceled: {}", e)))?
    }
}

impl Drop for SystemClipboard {
    fn drop(&mut self) {
        let _ = self.cmd_tx.send(Command::Close);
    }
}
