//! # prebundle-entrypoint
//!
//! An entrypoint is one build target inside a package, described by a handful
//! of keys in its `package.json`. This crate gives typed access to those keys
//! and a two-tier discipline for handing them to build steps:
//!
//! ```text
//! DocumentStore ──read──▶ Entrypoint<Loose>    every field optional
//!                              │
//!                              │ strict(validator)   validated, memoized
//!                              ▼
//!                         Entrypoint<Strict>   `main` guaranteed
//! ```
//!
//! The crate performs no I/O of its own. Reading manifests, validating them
//! and resolving module paths go through the injected `DocumentStore`,
//! `Validator` and `ModuleResolver`.

pub mod descriptor;
pub mod entrypoint;
pub mod error;
pub mod fields;
pub mod package;
pub mod resolve;
pub mod validate;

pub use descriptor::Descriptor;
pub use entrypoint::{Entrypoint, Loose, Strict, Strictness};
pub use error::EntrypointError;
pub use fields::{
    BROWSER_KEY, DEFAULT_SOURCE_ENTRY, MAIN_KEY, MODULE_KEY, PlatformOverride, REACT_NATIVE_KEY,
    SOURCE_KEY, Shape, ShapeError, UMD_MAIN_KEY, UMD_NAME_KEY,
};
pub use package::Package;
pub use resolve::{DEFAULT_EXTENSIONS, FsModuleResolver, ModuleResolver, ResolutionError};
pub use validate::{
    ManifestValidator, Severity, ValidationError, ValidationIssue, ValidationMode, Validator,
};
