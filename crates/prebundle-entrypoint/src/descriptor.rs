//! Either variant of an entrypoint descriptor.

use crate::entrypoint::{Entrypoint, Loose, Strict};
use crate::error::EntrypointError;
use crate::fields::ShapeError;
use crate::validate::Validator;
use prebundle_manifest::ManifestDocument;
use std::path::Path;

/// An entrypoint whose strictness is only known at runtime.
#[derive(Debug)]
pub enum Descriptor {
    Loose(Entrypoint<Loose>),
    Strict(Entrypoint<Strict>),
}

impl Descriptor {
    pub fn is_strict(&self) -> bool {
        matches!(self, Self::Strict(_))
    }

    pub fn location(&self) -> &Path {
        match self {
            Self::Loose(entry) => entry.location(),
            Self::Strict(entry) => entry.location(),
        }
    }

    pub fn document(&self) -> &ManifestDocument {
        match self {
            Self::Loose(entry) => entry.document(),
            Self::Strict(entry) => entry.document(),
        }
    }

    pub fn qualified_name(&self) -> Result<String, EntrypointError> {
        match self {
            Self::Loose(entry) => entry.qualified_name(),
            Self::Strict(entry) => entry.qualified_name(),
        }
    }

    pub fn primary_output(&self) -> Result<Option<&str>, ShapeError> {
        match self {
            Self::Loose(entry) => entry.primary_output(),
            Self::Strict(entry) => Ok(Some(entry.primary_output())),
        }
    }

    /// Promote in place. A strict descriptor is left untouched.
    pub fn promote<V: Validator>(self, validator: &V) -> Result<Self, (Self, EntrypointError)> {
        self.into_strict(validator).map(Self::Strict)
    }

    /// The strict descriptor, or the unchanged descriptor with the reason it
    /// could not be promoted.
    pub fn into_strict<V: Validator>(
        self,
        validator: &V,
    ) -> Result<Entrypoint<Strict>, (Self, EntrypointError)> {
        match self {
            Self::Strict(entry) => Ok(entry),
            Self::Loose(entry) => entry
                .into_strict(validator)
                .map_err(|(entry, err)| (Self::Loose(entry), err)),
        }
    }

    pub fn into_loose(self) -> Entrypoint<Loose> {
        match self {
            Self::Loose(entry) => entry,
            Self::Strict(entry) => entry.into_loose(),
        }
    }
}

impl From<Entrypoint<Loose>> for Descriptor {
    fn from(entry: Entrypoint<Loose>) -> Self {
        Self::Loose(entry)
    }
}

impl From<Entrypoint<Strict>> for Descriptor {
    fn from(entry: Entrypoint<Strict>) -> Self {
        Self::Strict(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::package::Package;
    use crate::validate::ManifestValidator;
    use std::path::PathBuf;

    #[test]
    fn promote_moves_loose_to_strict() {
        let pkg = Package::new("pkg", "/repo/pkg");
        let entry = Entrypoint::from_text(
            PathBuf::from("/repo/pkg/package.json"),
            r#"{"main":"dist/index.js"}"#,
            &pkg,
        )
        .expect("fixture manifest should parse");

        let descriptor = Descriptor::from(entry)
            .promote(&ManifestValidator)
            .expect("main is set");
        assert!(descriptor.is_strict());
        assert_eq!(descriptor.primary_output(), Ok(Some("dist/index.js")));
        assert_eq!(descriptor.qualified_name().expect("package alive"), "pkg");
    }

    #[test]
    fn strict_descriptor_promotes_to_itself() {
        let pkg = Package::new("pkg", "/repo/pkg");
        let strict = Entrypoint::from_text(
            PathBuf::from("/repo/pkg/package.json"),
            r#"{"main":"dist/index.js"}"#,
            &pkg,
        )
        .expect("fixture manifest should parse")
        .into_strict(&ManifestValidator)
        .map_err(|(_, err)| err)
        .expect("main is set");

        let strict = Descriptor::from(strict)
            .into_strict(&ManifestValidator)
            .map_err(|(_, err)| err)
            .expect("already strict");
        assert_eq!(strict.primary_output(), "dist/index.js");
    }

    #[test]
    fn failed_promotion_returns_loose_descriptor() {
        let pkg = Package::new("pkg", "/repo/pkg");
        let entry = Entrypoint::from_text(
            PathBuf::from("/repo/pkg/package.json"),
            r#"{"name":"pkg"}"#,
            &pkg,
        )
        .expect("fixture manifest should parse");

        let (descriptor, err) = Descriptor::from(entry)
            .into_strict(&ManifestValidator)
            .expect_err("main is missing");
        assert!(!descriptor.is_strict());
        assert!(matches!(err, EntrypointError::Validation(_)));
        assert_eq!(descriptor.location(), Path::new("/repo/pkg/package.json"));
    }
}
