use arboard::Clipboard;

use super::{ClipboardError, ClipboardService};

/// Clipboard of the current desktop session.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClipboard;

impl ClipboardService for SystemClipboard {
    fn set_content(&self, content: &str) -> Result<(), ClipboardError> {
        let mut clipboard =
            Clipboard::new().map_err(|err| ClipboardError::Unavailable(err.to_string()))?;
        clipboard
            .set_text(content)
            .map_err(|err| ClipboardError::Unavailable(err.to_string()))
    }
}
