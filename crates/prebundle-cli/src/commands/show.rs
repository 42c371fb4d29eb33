use crate::cli::PackageArgs;
use crate::support::{
    display_or_unset, display_override, exit_with_error, load_entrypoint_or_exit, override_json,
    value_or_exit,
};
use serde_json::json;

pub fn run(dir: String, package: PackageArgs, json_output: bool) {
    let (entry, _package) = load_entrypoint_or_exit(&dir, &package);

    let qualified_name = entry
        .qualified_name()
        .unwrap_or_else(|e| exit_with_error(e));
    let main = value_or_exit(entry.primary_output());
    let module = value_or_exit(entry.module_output());
    let browser = value_or_exit(entry.browser_output());
    let react_native = value_or_exit(entry.platform_output());
    let umd_main = value_or_exit(entry.umd_output());
    let source = value_or_exit(entry.source_entry());
    let umd_name = value_or_exit(entry.umd_global_name());

    if json_output {
        let payload = json!({
            "qualifiedName": qualified_name,
            "location": entry.location().display().to_string(),
            "main": main,
            "module": module,
            "browser": override_json(browser),
            "reactNative": override_json(react_native),
            "umdMain": umd_main,
            "source": source,
            "umdName": umd_name,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&payload).expect("json serialization")
        );
        return;
    }

    println!("prebundle show {qualified_name}");
    println!();
    println!("  manifest: {}", entry.location().display());
    println!("  main: {}", display_or_unset(main));
    println!("  module: {}", display_or_unset(module));
    println!("  browser: {}", display_override(&browser));
    println!("  react-native: {}", display_override(&react_native));
    println!("  umd:main: {}", display_or_unset(umd_main));
    println!("  source: {source}");
    println!("  umd name: {}", display_or_unset(umd_name));
}
