use std::path::Path;

use bytes::Bytes;

use crate::error::{Result, ScreenerError};

/// Which of the two upload inputs a document belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Resume,
    JobDescription,
}

impl Slot {
    pub fn display_name(&self) -> &'static str {
        match self {
            Slot::Resume => "Resume",
            Slot::JobDescription => "Job Description",
        }
    }

    /// Multipart field name expected by the backend
    pub fn field_name(&self) -> &'static str {
        match self {
            Slot::Resume => "resume",
            Slot::JobDescription => "jd",
        }
    }
}

/// A user-chosen document, held whole in memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    name: String,
    content: Bytes,
}

impl Document {
    pub fn new(name: impl Into<String>, content: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Read a document from disk, naming it after the file
    pub async fn load(path: &Path) -> Result<Self> {
        let content = tokio::fs::read(path)
            .await
            .map_err(|source| ScreenerError::Document {
                path: path.to_path_buf(),
                source,
            })?;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        tracing::debug!(name = %name, bytes = content.len(), "loaded document");
        Ok(Self::new(name, content))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content(&self) -> &Bytes {
        &self.content
    }

    /// Size in bytes
    pub fn size(&self) -> usize {
        self.content.len()
    }

    /// MIME type sent with the multipart part, guessed from the extension
    pub fn mime_type(&self) -> &'static str {
        let ext = Path::new(&self.name)
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase());

        match ext.as_deref() {
            Some("pdf") => "application/pdf",
            Some("txt") => "text/plain",
            _ => "application/octet-stream",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_mime_type_from_extension() {
        assert_eq!(Document::new("cv.PDF", "x").mime_type(), "application/pdf");
        assert_eq!(Document::new("jd.txt", "x").mime_type(), "text/plain");
        assert_eq!(Document::new("notes", "x").mime_type(), "application/octet-stream");
    }

    #[tokio::test]
    async fn test_load_reads_name_and_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resume.txt");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(b"Python, SQL").unwrap();

        let doc = Document::load(&path).await.unwrap();
        assert_eq!(doc.name(), "resume.txt");
        assert_eq!(doc.content().as_ref(), b"Python, SQL");
        assert_eq!(doc.size(), 11);
    }

    #[tokio::test]
    async fn test_load_missing_file_is_document_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Document::load(&dir.path().join("nope.pdf")).await.unwrap_err();
        assert!(matches!(err, ScreenerError::Document { .. }));
    }
}
