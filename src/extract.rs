//! Text extraction from uploaded files.

use crate::error::ErrorContext;
use crate::{Error, Result};
use std::path::Path;

/// Extensions read as text without sniffing.
pub const TEXT_EXTENSIONS: &[&str] = &[
    "txt", "md", "feature", "json", "csv", "yaml", "yml", "xml", "html", "py", "js", "ts",
];

/// Decode an uploaded document as UTF-8 text.
///
/// Known text extensions tolerate invalid sequences (lossy decode); anything
/// else must be valid UTF-8. Empty results are an extraction error.
pub fn extract_text(file_name: &str, bytes: &[u8]) -> Result<String> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    let text = if has_text_extension(file_name) {
        Some(String::from_utf8_lossy(bytes).into_owned())
    } else {
        std::str::from_utf8(bytes).ok().map(str::to_string)
    };

    match text.filter(|t| !t.trim().is_empty() && !t.contains('\0')) {
        Some(t) => Ok(t.trim().to_string()),
        None => Err(Error::Extraction {
            message: format!("Could not extract text from file: {}", file_name),
            context: ErrorContext::new()
                .with_field_path("file")
                .with_source("extract"),
        }),
    }
}

fn has_text_extension(file_name: &str) -> bool {
    Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| TEXT_EXTENSIONS.iter().any(|t| t.eq_ignore_ascii_case(e)))
        .unwrap_or(false)
}

/// Merge typed input with extracted file text.
pub fn combine_requirement(requirement: Option<&str>, file_text: &str) -> String {
    match requirement.map(str::trim).filter(|r| !r.is_empty()) {
        Some(req) => format!("User Input:\n{}\n\nFile Content:\n{}", req, file_text),
        None => format!("File Content:\n{}", file_text),
    }
}
