/// File payload types
use std::fmt;

/// A file picked by the user for upload.
#[derive(Clone, PartialEq, Eq)]
pub struct SelectedFile {
    /// Original file name, including extension
    pub name: String,

    /// MIME type reported by the picker, if any
    pub content_type: Option<String>,

    /// File contents
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    /// Create a file without a reported content type
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type: None,
            bytes,
        }
    }

    /// Attach the MIME type reported by the picker
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Segment after the last `.` of the name, or the whole name without one
    pub fn extension(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }

    /// Size in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the file has no content
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for SelectedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectedFile")
            .field("name", &self.name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Binary content returned by an object download.
#[derive(Clone, PartialEq, Eq)]
pub struct StoredObject {
    /// Object contents
    pub bytes: Vec<u8>,

    /// MIME type reported by the store
    pub content_type: Option<String>,
}

impl fmt::Debug for StoredObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoredObject")
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}
