//! Error type for entrypoint operations.

use crate::fields::ShapeError;
use crate::resolve::ResolutionError;
use crate::validate::ValidationError;
use prebundle_manifest::ManifestError;

/// Errors surfaced by entrypoint construction, field access and promotion.
///
/// Nothing here is recovered or retried locally.
#[derive(Debug, thiserror::Error)]
pub enum EntrypointError {
    /// The manifest could not be read or parsed.
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// A stored field does not have its declared shape.
    #[error(transparent)]
    Shape(#[from] ShapeError),

    /// The validator rejected the entrypoint.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The source entry did not resolve to a module file.
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    /// The owning package was dropped while the entrypoint was still in use.
    #[error("owning package of {location} is no longer available")]
    PackageReleased { location: String },
}
