use thiserror::Error;

pub type Result<T> = std::result::Result<T, SelectionError>;

/// Errors raised while building a tree or applying a selection edit.
///
/// Every variant is raised before any state is touched, so a rejected call
/// leaves the session exactly as it was.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    /// The raw tree handed over by the analysis step is structurally invalid.
    #[error("malformed tree at {location}: {reason}")]
    MalformedTree { location: String, reason: String },

    /// An edit referenced a path that is not in the current tree
    /// (or not of the kind the edit needs).
    #[error("unknown path '{0}'")]
    UnknownPath(String),

    /// An edit referenced a suffix the extension index does not offer.
    #[error("unknown extension '{0}'")]
    UnknownExtension(String),
}

impl SelectionError {
    pub fn malformed(location: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedTree {
            location: location.into(),
            reason: reason.into(),
        }
    }

    pub fn unknown_path(path: impl Into<String>) -> Self {
        Self::UnknownPath(path.into())
    }
}
