//! Entrypoint descriptors.
//!
//! `Entrypoint<Loose>` is what you get from reading a manifest: every field is
//! optional. `Entrypoint<Strict>` is only produced by promotion and carries
//! `main` as a plain `String`, so a strict descriptor without a primary output
//! cannot exist.
//!
//! Promotion from a loose descriptor is memoized: the first successful
//! `strict()` call caches the strict descriptor and later calls hand back that
//! same instance.

use crate::error::EntrypointError;
use crate::fields::{
    BROWSER_KEY, DEFAULT_SOURCE_ENTRY, MAIN_KEY, MODULE_KEY, PlatformOverride, REACT_NATIVE_KEY,
    SOURCE_KEY, ShapeError, UMD_MAIN_KEY, UMD_NAME_KEY, config_key_path, config_value,
    optional_platform_override, optional_string,
};
use crate::package::Package;
use crate::resolve::ModuleResolver;
use crate::validate::{Severity, ValidationError, ValidationIssue, ValidationMode, Validator};
use prebundle_manifest::{DocumentStore, MANIFEST_FILE_NAME, ManifestDocument};
use serde_json::Value;
use std::fmt::Debug;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Weak};

mod sealed {
    pub trait Sealed {}
}

/// Marker for the two descriptor variants. Sealed.
pub trait Strictness: sealed::Sealed + Debug {}

/// State of a descriptor read straight from a manifest.
#[derive(Debug, Default)]
pub struct Loose {
    promoted: Option<Box<Entrypoint<Strict>>>,
}

/// State of a promoted descriptor.
#[derive(Debug)]
pub struct Strict {
    main: String,
}

impl sealed::Sealed for Loose {}
impl sealed::Sealed for Strict {}
impl Strictness for Loose {}
impl Strictness for Strict {}

/// Typed view over one entrypoint's `package.json`.
#[derive(Debug)]
pub struct Entrypoint<S: Strictness = Loose> {
    location: PathBuf,
    document: ManifestDocument,
    package: Weak<Package>,
    state: S,
}

impl Entrypoint<Loose> {
    /// Read `<directory>/package.json` through `store`.
    pub fn create(
        directory: impl AsRef<Path>,
        package: &Arc<Package>,
        store: &(impl DocumentStore + ?Sized),
    ) -> Result<Self, EntrypointError> {
        let location = directory.as_ref().join(MANIFEST_FILE_NAME);
        let text = store.read_text(&location)?;
        Self::from_text(location, &text, package)
    }

    /// Awaitable form of [`Entrypoint::create`]; yields the same descriptor.
    pub async fn create_async(
        directory: impl AsRef<Path>,
        package: &Arc<Package>,
        store: &(impl DocumentStore + ?Sized),
    ) -> Result<Self, EntrypointError> {
        let location = directory.as_ref().join(MANIFEST_FILE_NAME);
        let text = store.read_text_async(&location).await?;
        Self::from_text(location, &text, package)
    }

    /// Build a descriptor from manifest text already read from `location`.
    pub fn from_text(
        location: PathBuf,
        text: &str,
        package: &Arc<Package>,
    ) -> Result<Self, EntrypointError> {
        let document = ManifestDocument::parse_at(&location, text)?;
        Ok(Self::from_document(location, document, package))
    }

    pub fn from_document(
        location: PathBuf,
        document: ManifestDocument,
        package: &Arc<Package>,
    ) -> Self {
        Self::with_weak_package(location, document, Arc::downgrade(package))
    }

    fn with_weak_package(
        location: PathBuf,
        document: ManifestDocument,
        package: Weak<Package>,
    ) -> Self {
        Self {
            location,
            document,
            package,
            state: Loose::default(),
        }
    }

    /// `main`, if set.
    pub fn primary_output(&self) -> Result<Option<&str>, ShapeError> {
        self.declared_primary_output()
    }

    /// Set `main`, or remove it with `None`.
    pub fn set_primary_output(&mut self, path: Option<&str>) {
        self.document.set_or_remove(MAIN_KEY, path.map(Value::from));
    }

    /// Validate in `mode` and convert into a new strict descriptor.
    ///
    /// The strict descriptor starts from a snapshot of this descriptor's
    /// current document. Nothing is cached; see [`Entrypoint::strict`].
    pub fn promote<V: Validator>(
        &self,
        validator: &V,
        mode: ValidationMode,
    ) -> Result<Entrypoint<Strict>, EntrypointError> {
        validator.validate(self, mode)?;
        self.snapshot_strict()
    }

    /// Memoized promotion.
    ///
    /// Runs the validator in advisory mode on every call. The first call that
    /// also finds `main` set caches a strict descriptor; every later call
    /// returns that same instance. On failure nothing is cached.
    pub fn strict<V: Validator>(
        &mut self,
        validator: &V,
    ) -> Result<&mut Entrypoint<Strict>, EntrypointError> {
        let strict = self.take_promoted(validator)?;
        Ok(&mut **self.state.promoted.insert(strict))
    }

    /// The cached strict descriptor, if promotion has succeeded before.
    pub fn promoted(&self) -> Option<&Entrypoint<Strict>> {
        self.state.promoted.as_deref()
    }

    /// Promote by value, reusing a cached strict descriptor when present.
    ///
    /// On failure the loose descriptor is handed back alongside the error.
    pub fn into_strict<V: Validator>(
        mut self,
        validator: &V,
    ) -> Result<Entrypoint<Strict>, (Self, EntrypointError)> {
        match self.take_promoted(validator) {
            Ok(strict) => Ok(*strict),
            Err(err) => Err((self, err)),
        }
    }

    /// Validate, then move the cached strict descriptor out, building it on
    /// first use. The cache is untouched when this fails.
    fn take_promoted<V: Validator>(
        &mut self,
        validator: &V,
    ) -> Result<Box<Entrypoint<Strict>>, EntrypointError> {
        validator.validate(&*self, ValidationMode::Advisory)?;
        match self.state.promoted.take() {
            Some(strict) => Ok(strict),
            None => Ok(Box::new(self.snapshot_strict()?)),
        }
    }

    fn snapshot_strict(&self) -> Result<Entrypoint<Strict>, EntrypointError> {
        let main = self.declared_primary_output()?.ok_or_else(|| ValidationError {
            issues: vec![ValidationIssue::new(
                MAIN_KEY,
                Severity::Error,
                "`main` must be set before an entrypoint can be made strict",
            )],
        })?;
        Ok(Entrypoint {
            location: self.location.clone(),
            document: self.document.clone(),
            package: self.package.clone(),
            state: Strict {
                main: main.to_string(),
            },
        })
    }
}

impl Entrypoint<Strict> {
    /// `main`. Always present on a strict descriptor.
    pub fn primary_output(&self) -> &str {
        &self.state.main
    }

    pub fn set_primary_output(&mut self, path: &str) {
        self.document.set(MAIN_KEY, path);
        self.state.main = path.to_string();
    }

    /// Already strict.
    pub fn strict(&mut self) -> &mut Self {
        self
    }

    /// Swap in a new backing document, e.g. after the manifest was rewritten
    /// on disk.
    ///
    /// The candidate is validated in advisory mode and must still have `main`;
    /// otherwise the current document is kept and the error returned.
    pub fn replace_document<V: Validator>(
        &mut self,
        document: ManifestDocument,
        validator: &V,
    ) -> Result<(), EntrypointError> {
        let candidate =
            Entrypoint::with_weak_package(self.location.clone(), document, self.package.clone());
        let strict = candidate.promote(validator, ValidationMode::Advisory)?;
        self.document = strict.document;
        self.state = strict.state;
        Ok(())
    }

    /// Drop the strictness guarantee.
    pub fn into_loose(self) -> Entrypoint<Loose> {
        Entrypoint::with_weak_package(self.location, self.document, self.package)
    }
}

impl<S: Strictness> Entrypoint<S> {
    /// Absolute path of the backing `package.json`.
    pub fn location(&self) -> &Path {
        &self.location
    }

    /// Directory containing the manifest.
    pub fn directory(&self) -> &Path {
        self.location.parent().unwrap_or(Path::new(""))
    }

    pub fn document(&self) -> &ManifestDocument {
        &self.document
    }

    pub fn package(&self) -> Option<Arc<Package>> {
        self.package.upgrade()
    }

    /// Package name joined with this entrypoint's directory relative to the
    /// package root. Recomputed on every call.
    pub fn qualified_name(&self) -> Result<String, EntrypointError> {
        let package = self
            .package
            .upgrade()
            .ok_or_else(|| EntrypointError::PackageReleased {
                location: self.location.display().to_string(),
            })?;
        Ok(package.qualify(self.directory()))
    }

    /// Raw `main` read shared by both variants.
    pub fn declared_primary_output(&self) -> Result<Option<&str>, ShapeError> {
        optional_string(self.document.get(MAIN_KEY), MAIN_KEY)
    }

    pub fn module_output(&self) -> Result<Option<&str>, ShapeError> {
        optional_string(self.document.get(MODULE_KEY), MODULE_KEY)
    }

    pub fn set_module_output(&mut self, path: Option<&str>) {
        self.document
            .set_or_remove(MODULE_KEY, path.map(Value::from));
    }

    pub fn browser_output(&self) -> Result<Option<PlatformOverride>, ShapeError> {
        optional_platform_override(self.document.get(BROWSER_KEY), BROWSER_KEY)
    }

    pub fn set_browser_output(&mut self, option: Option<PlatformOverride>) {
        self.document
            .set_or_remove(BROWSER_KEY, option.map(Value::from));
    }

    /// `react-native` override.
    pub fn platform_output(&self) -> Result<Option<PlatformOverride>, ShapeError> {
        optional_platform_override(self.document.get(REACT_NATIVE_KEY), REACT_NATIVE_KEY)
    }

    pub fn set_platform_output(&mut self, option: Option<PlatformOverride>) {
        self.document
            .set_or_remove(REACT_NATIVE_KEY, option.map(Value::from));
    }

    pub fn umd_output(&self) -> Result<Option<&str>, ShapeError> {
        optional_string(self.document.get(UMD_MAIN_KEY), UMD_MAIN_KEY)
    }

    pub fn set_umd_output(&mut self, path: Option<&str>) {
        self.document
            .set_or_remove(UMD_MAIN_KEY, path.map(Value::from));
    }

    /// Source entry relative to the entrypoint directory; `src/index.js` when unset.
    pub fn source_entry(&self) -> Result<&str, ShapeError> {
        let key = config_key_path(SOURCE_KEY);
        let value = config_value(&self.document, SOURCE_KEY)?;
        Ok(optional_string(value, &key)?.unwrap_or(DEFAULT_SOURCE_ENTRY))
    }

    pub fn set_source_entry(&mut self, path: &str) -> Result<(), EntrypointError> {
        self.document.set_config_key(SOURCE_KEY, path)?;
        Ok(())
    }

    pub fn umd_global_name(&self) -> Result<Option<&str>, ShapeError> {
        let key = config_key_path(UMD_NAME_KEY);
        optional_string(config_value(&self.document, UMD_NAME_KEY)?, &key)
    }

    /// Set the UMD global name. `None` removes it, and removes the config
    /// section too if nothing else is left in it.
    pub fn set_umd_global_name(&mut self, name: Option<&str>) -> Result<(), EntrypointError> {
        self.document
            .set_or_clear_config_key(UMD_NAME_KEY, name.map(Value::from))?;
        Ok(())
    }

    /// Resolve the source entry against the entrypoint directory.
    pub fn resolved_source(
        &self,
        resolver: &(impl ModuleResolver + ?Sized),
    ) -> Result<PathBuf, EntrypointError> {
        let request = self.directory().join(self.source_entry()?);
        Ok(resolver.resolve(&request)?)
    }
}
