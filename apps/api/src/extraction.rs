//! Text Extraction — turns an uploaded résumé into plain text, best-effort.
//!
//! Never fails: unreadable or unsupported documents yield an empty string and a
//! warning in the log.

use bytes::Bytes;
use tracing::{debug, warn};

/// An uploaded document as received from the client.
#[derive(Debug, Clone)]
pub struct Document {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DocumentKind {
    Pdf,
    Text,
    Unsupported,
}

impl Document {
    fn kind(&self) -> DocumentKind {
        let content_type = self.content_type.as_deref().unwrap_or_default();
        let extension = self
            .file_name
            .as_deref()
            .and_then(|name| name.rsplit_once('.'))
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();

        if content_type == "application/pdf"
            || extension == "pdf"
            || self.bytes.starts_with(b"%PDF")
        {
            DocumentKind::Pdf
        } else if content_type.starts_with("text/") || matches!(extension.as_str(), "txt" | "md")
        {
            DocumentKind::Text
        } else {
            DocumentKind::Unsupported
        }
    }
}

/// Extracts plain text from `document`. Returns an empty string on any failure.
pub async fn extract_text(document: &Document) -> String {
    let name = document.file_name.as_deref().unwrap_or("<unnamed>");

    let text = match document.kind() {
        DocumentKind::Text => String::from_utf8_lossy(&document.bytes).into_owned(),
        DocumentKind::Pdf => {
            let bytes = document.bytes.clone();
            // pdf-extract is CPU-bound and panics on some malformed files.
            match tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
                .await
            {
                Ok(Ok(text)) => text,
                Ok(Err(e)) => {
                    warn!("PDF extraction failed for {name}: {e}");
                    String::new()
                }
                Err(e) => {
                    warn!("PDF extraction aborted for {name}: {e}");
                    String::new()
                }
            }
        }
        DocumentKind::Unsupported => {
            warn!(
                "Unsupported document type for {name} ({})",
                document.content_type.as_deref().unwrap_or("unknown")
            );
            String::new()
        }
    };

    let text = text.trim().to_string();
    debug!("Extracted {} characters from {name}", text.chars().count());
    text
}
