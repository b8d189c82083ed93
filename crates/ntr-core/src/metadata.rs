//! Document metadata supplied by the caller.

use serde::{Deserialize, Serialize};

/// Descriptive information about a document that does not come from its
/// records, such as where it was loaded from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub title: Option<String>,
    /// Where the text came from, typically a file path.
    pub source: Option<String>,
}

impl Metadata {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}
