use crate::cli::PackageArgs;
use crate::support::{exit_with_error, load_entrypoint_or_exit, persist_or_exit};
use serde_json::json;

pub struct Args {
    pub dir: String,
    pub main: Option<String>,
    pub module: Option<String>,
    pub umd_main: Option<String>,
    pub umd_name: Option<String>,
    pub clear_umd_name: bool,
    pub source: Option<String>,
    pub package: PackageArgs,
    pub json: bool,
}

pub fn run(args: Args) {
    let (mut entry, _package) = load_entrypoint_or_exit(&args.dir, &args.package);
    let mut changed = Vec::new();

    if let Some(main) = args.main.as_deref() {
        entry.set_primary_output(Some(main));
        changed.push("main");
    }
    if let Some(module) = args.module.as_deref() {
        entry.set_module_output(Some(module));
        changed.push("module");
    }
    if let Some(umd_main) = args.umd_main.as_deref() {
        entry.set_umd_output(Some(umd_main));
        changed.push("umd:main");
    }
    if let Some(source) = args.source.as_deref() {
        entry
            .set_source_entry(source)
            .unwrap_or_else(|e| exit_with_error(e));
        changed.push("prebundle.source");
    }
    if args.umd_name.is_some() || args.clear_umd_name {
        entry
            .set_umd_global_name(args.umd_name.as_deref())
            .unwrap_or_else(|e| exit_with_error(e));
        changed.push("prebundle.umdName");
    }

    if changed.is_empty() {
        exit_with_error("nothing to set; pass at least one field flag");
    }

    persist_or_exit(&entry);
    tracing::info!(
        manifest = %entry.location().display(),
        fields = ?changed,
        "updated entrypoint manifest"
    );

    if args.json {
        let payload = json!({
            "action": "entrypoint.set",
            "location": entry.location().display().to_string(),
            "changed": changed,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&payload).expect("json serialization")
        );
    } else {
        println!(
            "prebundle set\n  Updated: {}\n  Path: {}",
            changed.join(", "),
            entry.location().display()
        );
    }
}
