use crate::cli::PackageArgs;
use crate::support::{exit_with_error, load_entrypoint_or_exit};
use prebundle_entrypoint::FsModuleResolver;

pub fn run(dir: String, package: PackageArgs) {
    let (entry, _package) = load_entrypoint_or_exit(&dir, &package);
    let resolved = entry
        .resolved_source(&FsModuleResolver::default())
        .unwrap_or_else(|e| exit_with_error(e));
    println!("{}", resolved.display());
}
