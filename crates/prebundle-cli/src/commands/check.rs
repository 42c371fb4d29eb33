use crate::cli::PackageArgs;
use crate::support::{exit_with_error, load_entrypoint_or_exit, yes_no};
use prebundle_entrypoint::{ManifestValidator, Severity, ValidationMode, Validator};
use serde_json::json;

pub fn run(dir: String, package: PackageArgs, strict: bool, json_output: bool) {
    let (mut entry, _package) = load_entrypoint_or_exit(&dir, &package);
    let qualified_name = entry
        .qualified_name()
        .unwrap_or_else(|e| exit_with_error(e));

    let (mode, mode_label) = if strict {
        (ValidationMode::Strict, "strict")
    } else {
        (ValidationMode::Advisory, "advisory")
    };
    let (issues, valid) = match ManifestValidator.validate(&entry, mode) {
        Ok(issues) => (issues, true),
        Err(err) => (err.issues, false),
    };

    // Promotion needs `main` even when advisory validation passed.
    let promoted = if valid {
        match entry.strict(&ManifestValidator) {
            Ok(strict) => Some(strict.primary_output().to_string()),
            Err(err) => {
                tracing::debug!(entrypoint = %qualified_name, error = %err, "promotion failed");
                None
            }
        }
    } else {
        None
    };
    let passed = valid && (!strict || promoted.is_some());

    if json_output {
        let payload = json!({
            "qualifiedName": qualified_name,
            "mode": mode,
            "valid": valid,
            "promoted": promoted.is_some(),
            "main": promoted,
            "issues": issues,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&payload).expect("json serialization")
        );
    } else {
        println!("prebundle check {qualified_name}");
        println!();
        println!("  mode: {mode_label}");
        println!("  valid: {}", yes_no(valid));
        println!("  promoted: {}", yes_no(promoted.is_some()));
        if let Some(main) = &promoted {
            println!("  main: {main}");
        }
        for issue in &issues {
            let label = match issue.severity {
                Severity::Warning => "warning",
                Severity::Error => "error",
            };
            println!("  {label}: {} ({})", issue.message, issue.key);
        }
    }

    if !passed {
        exit_with_error(format!(
            "entrypoint {qualified_name} is not valid in {mode_label} mode"
        ));
    }
}
