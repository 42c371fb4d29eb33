//! Module resolution for source entries.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Extensions tried, in order, when a request has no matching file as-is.
pub const DEFAULT_EXTENSIONS: &[&str] = &[".js", ".jsx", ".mjs", ".cjs", ".ts", ".tsx", ".json"];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolutionError {
    #[error("cannot resolve module `{request}`")]
    NotFound { request: String },
}

/// Maps a module request (a path, possibly without extension) to a file.
pub trait ModuleResolver {
    fn resolve(&self, request: &Path) -> Result<PathBuf, ResolutionError>;
}

impl<F> ModuleResolver for F
where
    F: Fn(&Path) -> Result<PathBuf, ResolutionError>,
{
    fn resolve(&self, request: &Path) -> Result<PathBuf, ResolutionError> {
        self(request)
    }
}

/// Filesystem resolver with node-style extension and `index` lookup.
#[derive(Debug, Clone)]
pub struct FsModuleResolver {
    extensions: Vec<String>,
}

impl Default for FsModuleResolver {
    fn default() -> Self {
        Self::with_extensions(DEFAULT_EXTENSIONS.iter().copied())
    }
}

impl FsModuleResolver {
    pub fn with_extensions<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            extensions: extensions.into_iter().map(Into::into).collect(),
        }
    }

    fn with_extension(&self, base: &Path) -> Option<PathBuf> {
        self.extensions.iter().find_map(|ext| {
            let mut candidate: OsString = base.as_os_str().to_os_string();
            candidate.push(ext);
            let candidate = PathBuf::from(candidate);
            candidate.is_file().then_some(candidate)
        })
    }
}

impl ModuleResolver for FsModuleResolver {
    fn resolve(&self, request: &Path) -> Result<PathBuf, ResolutionError> {
        if request.is_file() {
            return Ok(request.to_path_buf());
        }
        if let Some(found) = self.with_extension(request) {
            return Ok(found);
        }
        if request.is_dir()
            && let Some(found) = self.with_extension(&request.join("index"))
        {
            return Ok(found);
        }
        Err(ResolutionError::NotFound {
            request: request.display().to_string(),
        })
    }
}
