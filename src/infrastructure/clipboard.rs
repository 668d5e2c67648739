use arboard::Clipboard;

use crate::domain::ClipboardError;

/// System clipboard, opened lazily on first use.
#[derive(Default)]
pub struct ClipboardSink {
    inner: Option<Clipboard>,
}

impl ClipboardSink {
    /// Replaces the clipboard contents with `text`.
    ///
    /// # Errors
    ///
    /// [`ClipboardError::Unavailable`] when no clipboard can be opened and
    /// [`ClipboardError::Write`] when the platform rejects the text.
    pub fn copy(&mut self, text: &str) -> Result<(), ClipboardError> {
        if self.inner.is_none() {
            self.inner = Some(Clipboard::new().map_err(unavailable)?);
        }
        let Some(clipboard) = self.inner.as_mut() else {
            return Err(ClipboardError::Unavailable("clipboard was not opened".to_string()));
        };
        clipboard
            .set_text(text.to_string())
            .map_err(|e| ClipboardError::Write(e.to_string()))
    }
}

fn unavailable(err: arboard::Error) -> ClipboardError {
    ClipboardError::Unavailable(err.to_string())
}

impl std::fmt::Debug for ClipboardSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClipboardSink")
            .field("open", &self.inner.is_some())
            .finish()
    }
}
