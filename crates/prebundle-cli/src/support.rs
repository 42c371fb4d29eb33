use crate::cli::PackageArgs;
use prebundle_entrypoint::{
    Entrypoint, EntrypointError, Loose, Package, PlatformOverride, ShapeError,
};
use prebundle_manifest::{DocumentStore, FsDocumentStore};
use serde_json::{Value, json};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter, e.g. `PREBUNDLE_LOG=debug`.
pub const LOG_ENV: &str = "PREBUNDLE_LOG";
const DEFAULT_LOG_FILTER: &str = "warn";

pub fn init_logging() {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

pub fn exit_with_error(message: impl std::fmt::Display) -> ! {
    eprintln!("error: {message}");
    std::process::exit(1);
}

/// Resolve the owning package: explicit name wins, otherwise read `name`
/// from the package root manifest.
pub fn load_package_or_exit(entry_dir: &Path, args: &PackageArgs) -> Arc<Package> {
    let package_dir = args
        .package_dir
        .as_deref()
        .map(PathBuf::from)
        .unwrap_or_else(|| entry_dir.to_path_buf());
    let package_dir = absolute_or_exit(&package_dir);

    if let Some(name) = &args.package_name {
        return Package::new(name.clone(), package_dir);
    }
    match Package::load(&package_dir, &FsDocumentStore) {
        Ok(package) => package,
        // Unnamed manifests fall back to the directory name.
        Err(EntrypointError::Shape(err)) if err.key == "name" && err.found == "nothing" => {
            let name = package_dir
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| exit_with_error("package directory has no name"));
            Package::new(name, package_dir)
        }
        Err(e) => exit_with_error(format!(
            "failed to load package at {}: {e}",
            package_dir.display()
        )),
    }
}

pub fn load_entrypoint_or_exit(dir: &str, args: &PackageArgs) -> (Entrypoint<Loose>, Arc<Package>) {
    let entry_dir = absolute_or_exit(Path::new(dir));
    let package = load_package_or_exit(&entry_dir, args);
    tracing::debug!(
        entry = %entry_dir.display(),
        package = package.name(),
        "loading entrypoint"
    );
    let entry = Entrypoint::create(&entry_dir, &package, &FsDocumentStore).unwrap_or_else(|e| {
        exit_with_error(format!(
            "failed to load entrypoint at {}: {e}",
            entry_dir.display()
        ))
    });
    (entry, package)
}

pub fn persist_or_exit(entry: &Entrypoint<Loose>) {
    let text = entry
        .document()
        .to_text()
        .unwrap_or_else(|e| exit_with_error(e));
    FsDocumentStore
        .write_text(entry.location(), &text)
        .unwrap_or_else(|e| exit_with_error(e));
}

pub fn value_or_exit<T>(read: Result<T, ShapeError>) -> T {
    read.unwrap_or_else(|e| exit_with_error(e))
}

pub fn override_json(option: Option<PlatformOverride>) -> Value {
    option.map_or(Value::Null, |option| json!(option))
}

pub fn display_or_unset(value: Option<&str>) -> &str {
    value.unwrap_or("(unset)")
}

pub fn display_override(option: &Option<PlatformOverride>) -> String {
    match option {
        None => "(unset)".to_string(),
        Some(PlatformOverride::Path(path)) => path.clone(),
        Some(PlatformOverride::Mapping(mapping)) => mapping
            .iter()
            .map(|(from, to)| format!("{from} -> {to}"))
            .collect::<Vec<_>>()
            .join(", "),
    }
}

pub fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}

fn absolute_or_exit(path: &Path) -> PathBuf {
    std::path::absolute(path)
        .unwrap_or_else(|e| exit_with_error(format!("invalid path {}: {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn display_override_lists_mapping_entries() {
        let option = Some(PlatformOverride::Mapping(BTreeMap::from([
            ("./a.js".to_string(), "./a.browser.js".to_string()),
            ("./b.js".to_string(), "./b.browser.js".to_string()),
        ])));
        assert_eq!(
            display_override(&option),
            "./a.js -> ./a.browser.js, ./b.js -> ./b.browser.js"
        );
        assert_eq!(display_override(&None), "(unset)");
    }

    #[test]
    fn override_json_serializes_untagged() {
        assert_eq!(override_json(None), Value::Null);
        assert_eq!(
            override_json(Some(PlatformOverride::Path("dist/a.js".to_string()))),
            json!("dist/a.js")
        );
    }
}
