//! The selected policy document.

use std::fmt;
use std::sync::Arc;

use crate::domain::foundation::{DocumentId, ValidationError};

/// Document kinds the upload form accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    Pdf,
    PlainText,
    Word,
    WordOpenXml,
    /// Anything else; the analysis service decides whether it can read it.
    Other,
}

impl DocumentKind {
    /// Infers the kind from a file name's extension (case-insensitive).
    pub fn from_file_name(name: &str) -> Self {
        let ext = name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "pdf" => DocumentKind::Pdf,
            "txt" => DocumentKind::PlainText,
            "doc" => DocumentKind::Word,
            "docx" => DocumentKind::WordOpenXml,
            _ => DocumentKind::Other,
        }
    }

    /// MIME type sent with the upload.
    pub fn mime_type(&self) -> &'static str {
        match self {
            DocumentKind::Pdf => "application/pdf",
            DocumentKind::PlainText => "text/plain",
            DocumentKind::Word => "application/msword",
            DocumentKind::WordOpenXml => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            DocumentKind::Other => "application/octet-stream",
        }
    }
}

/// Immutable handle to a selected file.
///
/// A new selection produces a new `Document`; documents are never mutated.
/// Cloning is cheap, the content is shared.
#[derive(Clone, PartialEq, Eq)]
pub struct Document {
    id: DocumentId,
    name: String,
    kind: DocumentKind,
    content: Arc<[u8]>,
}

impl Document {
    /// Creates a document from a file name and its raw bytes.
    ///
    /// # Errors
    ///
    /// - `EmptyField("name")` if the name is blank
    /// - `EmptyField("content")` if the file has no bytes
    pub fn new(name: impl Into<String>, content: impl Into<Vec<u8>>) -> Result<Self, ValidationError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(ValidationError::empty_field("name"));
        }

        let content: Vec<u8> = content.into();
        if content.is_empty() {
            return Err(ValidationError::empty_field("content"));
        }

        Ok(Self {
            id: DocumentId::new(),
            kind: DocumentKind::from_file_name(&name),
            name,
            content: content.into(),
        })
    }

    pub fn id(&self) -> DocumentId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// File name without its final extension.
    pub fn stem(&self) -> &str {
        match self.name.rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() => stem,
            _ => &self.name,
        }
    }

    pub fn mime_hint(&self) -> &'static str {
        self.kind.mime_type()
    }

    pub fn byte_size(&self) -> u64 {
        self.content.len() as u64
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("byte_size", &self.byte_size())
            .finish()
    }
}
