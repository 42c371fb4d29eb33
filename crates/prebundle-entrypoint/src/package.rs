//! Owning package of a set of entrypoints.

use crate::error::EntrypointError;
use crate::fields::{Shape, ShapeError, optional_string};
use prebundle_manifest::{DocumentStore, MANIFEST_FILE_NAME, ManifestDocument};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

/// A named package rooted at a directory.
///
/// Callers own packages behind an `Arc`; entrypoints only hold a `Weak`
/// back-reference and use it to derive their qualified name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    name: String,
    directory: PathBuf,
}

impl Package {
    pub fn new(name: impl Into<String>, directory: impl Into<PathBuf>) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            directory: directory.into(),
        })
    }

    /// Load a package from the `name` field of `<directory>/package.json`.
    pub fn load(
        directory: impl AsRef<Path>,
        store: &(impl DocumentStore + ?Sized),
    ) -> Result<Arc<Self>, EntrypointError> {
        let directory = directory.as_ref();
        let location = directory.join(MANIFEST_FILE_NAME);
        let text = store.read_text(&location)?;
        let document = ManifestDocument::parse_at(&location, &text)?;
        let name = optional_string(document.get("name"), "name")?.ok_or(ShapeError {
            key: "name".to_string(),
            expected: Shape::String,
            found: "nothing",
        })?;
        Ok(Self::new(name, directory))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Name of an entrypoint rooted at `entry_directory`, e.g. `pkg/sub`.
    ///
    /// The package root itself qualifies to the bare package name. A `..`
    /// step consumes the preceding name segment, so `/repo/other` under a
    /// package `pkg` at `/repo/pkg` qualifies to `other`.
    pub fn qualify(&self, entry_directory: &Path) -> String {
        let mut segments: Vec<String> = self.name.split('/').map(str::to_string).collect();
        for component in relative_path(&self.directory, entry_directory).components() {
            match component {
                Component::ParentDir
                    if segments.last().is_some_and(|segment| segment.as_str() != "..") =>
                {
                    segments.pop();
                }
                other => segments.push(other.as_os_str().to_string_lossy().into_owned()),
            }
        }
        if segments.is_empty() {
            return ".".to_string();
        }
        segments.join("/")
    }
}

/// Lexical path from `base` to `target`, using `..` to climb out of `base`.
fn relative_path(base: &Path, target: &Path) -> PathBuf {
    let base: Vec<Component<'_>> = normalized(base);
    let target: Vec<Component<'_>> = normalized(target);
    let common = base
        .iter()
        .zip(target.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut relative = PathBuf::new();
    for _ in common..base.len() {
        relative.push("..");
    }
    for component in &target[common..] {
        relative.push(component.as_os_str());
    }
    relative
}

fn normalized(path: &Path) -> Vec<Component<'_>> {
    let mut out = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir if matches!(out.last(), Some(Component::Normal(_))) => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use prebundle_manifest::MemoryDocumentStore;

    #[test]
    fn qualify_package_root_is_bare_name() {
        let pkg = Package::new("@scope/pkg", "/repo/packages/pkg");
        assert_eq!(pkg.qualify(Path::new("/repo/packages/pkg")), "@scope/pkg");
        assert_eq!(pkg.qualify(Path::new("/repo/packages/pkg/.")), "@scope/pkg");
    }

    #[test]
    fn qualify_nested_entrypoint_joins_with_slash() {
        let pkg = Package::new("pkg", "/repo/pkg");
        assert_eq!(pkg.qualify(Path::new("/repo/pkg/utils/fp")), "pkg/utils/fp");
    }

    #[test]
    fn qualify_outside_package_root_collapses_parent_steps() {
        let pkg = Package::new("pkg", "/repo/pkg");
        assert_eq!(pkg.qualify(Path::new("/repo/other")), "other");
        assert_eq!(pkg.qualify(Path::new("/repo")), ".");
        assert_eq!(pkg.qualify(Path::new("/elsewhere/lib")), "../elsewhere/lib");

        let scoped = Package::new("@scope/pkg", "/repo/packages/pkg");
        assert_eq!(
            scoped.qualify(Path::new("/repo/packages/compat")),
            "@scope/compat"
        );
    }

    #[test]
    fn relative_path_climbs_out_of_base() {
        assert_eq!(
            relative_path(Path::new("/repo/a/b"), Path::new("/repo/c")),
            PathBuf::from("../../c")
        );
    }

    #[test]
    fn load_reads_name_from_manifest() {
        let store = MemoryDocumentStore::new();
        store.insert("/repo/pkg/package.json", r#"{"name":"pkg"}"#);
        let pkg = Package::load("/repo/pkg", &store).expect("package should load");
        assert_eq!(pkg.name(), "pkg");
        assert_eq!(pkg.directory(), Path::new("/repo/pkg"));
    }

    #[test]
    fn load_without_name_is_shape_error() {
        let store = MemoryDocumentStore::new();
        store.insert("/repo/pkg/package.json", r#"{"main":"index.js"}"#);
        let err = Package::load("/repo/pkg", &store).expect_err("name is required");
        assert!(matches!(err, EntrypointError::Shape(ShapeError { ref key, .. }) if key == "name"));
    }
}
