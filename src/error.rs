use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("unknown section: {0}")]
    UnknownSection(String),

    #[error("unknown chapter in {section}: {chapter}")]
    UnknownChapter { section: String, chapter: String },

    #[error("unknown lesson in {section}/{chapter}: {lesson}")]
    UnknownLesson {
        section: String,
        chapter: String,
        lesson: String,
    },

    #[error("invalid catalog at {location}: {reason}")]
    Invalid { location: String, reason: String },
}

impl CatalogError {
    pub fn invalid(location: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Invalid {
            location: location.into(),
            reason: reason.into(),
        }
    }

    /// True for lookups that should surface as a 404 rather than a failure.
    pub fn is_not_found(&self) -> bool {
        !matches!(self, Self::Invalid { .. })
    }
}
