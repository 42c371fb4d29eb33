//! Error types for manifest documents and stores.

/// Errors raised while loading, editing, or persisting a manifest document.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    /// No manifest exists at the requested path.
    #[error("manifest not found: {path}")]
    NotFound { path: String },

    /// Any other read/write failure.
    #[error("manifest I/O error: {path}: {message}")]
    Io { path: String, message: String },

    /// The manifest text is not a JSON object.
    #[error("malformed manifest {origin}: {message}")]
    Malformed { origin: String, message: String },

    /// The tool-private config section exists but is not an object.
    #[error("config section `{section}` must be an object, found {found}")]
    InvalidConfigSection {
        section: &'static str,
        found: &'static str,
    },

    #[error("serialization error: {0}")]
    Serialize(String),
}

impl ManifestError {
    pub(crate) fn from_io(path: &std::path::Path, err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound {
                path: path.display().to_string(),
            }
        } else {
            Self::Io {
                path: path.display().to_string(),
                message: err.to_string(),
            }
        }
    }
}
