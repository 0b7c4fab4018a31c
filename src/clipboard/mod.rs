use std::sync::Arc;

use thiserror::Error;

pub mod system;

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),
}

pub trait ClipboardService: Send + Sync {
    fn set_content(&self, content: &str) -> Result<(), ClipboardError>;
}

/// Places `code` on the clipboard. Blank code is skipped and reported as `false`.
pub fn copy_code(service: &dyn ClipboardService, code: &str) -> Result<bool, ClipboardError> {
    let code = code.trim();
    if code.is_empty() {
        return Ok(false);
    }
    service.set_content(code)?;
    Ok(true)
}

pub fn default_service() -> Arc<dyn ClipboardService> {
    Arc::new(system::SystemClipboard)
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;

    use super::{ClipboardError, ClipboardService};

    #[derive(Default)]
    pub struct RecordingClipboard {
        pub copied: Mutex<Vec<String>>,
    }

    impl ClipboardService for RecordingClipboard {
        fn set_content(&self, content: &str) -> Result<(), ClipboardError> {
            self.copied
                .lock()
                .map_err(|_| ClipboardError::Unavailable("lock poisoned".to_string()))?
                .push(content.to_string());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::RecordingClipboard;
    use super::*;

    #[test]
    fn copies_trimmed_code() {
        let clipboard = RecordingClipboard::default();
        let copied = copy_code(&clipboard, "\n  let x = 1;\n").expect("copy");
        assert!(copied);
        assert_eq!(
            clipboard.copied.lock().expect("lock").as_slice(),
            ["let x = 1;".to_string()]
        );
    }

    #[test]
    fn blank_code_is_not_copied() {
        let clipboard = RecordingClipboard::default();
        let copied = copy_code(&clipboard, "   \n").expect("copy");
        assert!(!copied);
        assert!(clipboard.copied.lock().expect("lock").is_empty());
    }
}
