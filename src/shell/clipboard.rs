use std::path::Path;

use crate::foundation::error::{ShelfError, ShelfResult};

/// Put `text` on the system clipboard.
#[cfg(feature = "clipboard")]
pub fn copy_text(text: &str) -> ShelfResult<()> {
    let mut clipboard = arboard::Clipboard::new()
        .map_err(|e| ShelfError::process(format!("clipboard is unavailable: {e}")))?;
    clipboard
        .set_text(text.to_string())
        .map_err(|e| ShelfError::process(format!("failed to set clipboard text: {e}")))?;
    Ok(())
}

#[cfg(not(feature = "clipboard"))]
pub fn copy_text(_text: &str) -> ShelfResult<()> {
    Err(ShelfError::process(
        "shelfkit was built without the `clipboard` feature",
    ))
}

/// Platform-native spelling of `path` as it is put on the clipboard.
pub fn path_text(path: &Path) -> String {
    let text = path.display().to_string();
    if cfg!(windows) {
        text.replace('/', "\\")
    } else {
        text
    }
}

/// Copy `path` and return the text that was copied.
#[tracing::instrument]
pub fn copy_path(path: &Path) -> ShelfResult<String> {
    let text = path_text(path);
    copy_text(&text)?;
    tracing::info!(text, "copied path to clipboard");
    Ok(text)
}

#[cfg(test)]
#[path = "../../tests/unit/shell/clipboard.rs"]
mod tests;
