use serde_json::Value;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

struct TempDirGuard {
    path: PathBuf,
}

impl TempDirGuard {
    fn new(prefix: &str) -> Self {
        let unique = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock should be after unix epoch")
            .as_nanos();
        let path = std::env::temp_dir().join(format!(
            "prebundle-cli-{prefix}-{}-{unique}",
            std::process::id()
        ));
        fs::create_dir_all(&path).expect("temp dir should be created");
        Self { path }
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempDirGuard {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

fn run_prebundle<I, S>(args: I) -> Output
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let bin = env!("CARGO_BIN_EXE_prebundle");
    Command::new(bin)
        .args(args)
        .env_remove("PREBUNDLE_LOG")
        .output()
        .expect("prebundle command should execute")
}

fn assert_success(output: &Output) {
    if !output.status.success() {
        panic!(
            "command failed with status {:?}\nstdout:\n{}\nstderr:\n{}",
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr),
        );
    }
}

fn assert_failure(output: &Output) {
    if output.status.success() {
        panic!(
            "command unexpectedly succeeded\nstdout:\n{}\nstderr:\n{}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr),
        );
    }
}

fn stdout_text(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn parse_json_stdout(output: &Output) -> Value {
    serde_json::from_slice::<Value>(&output.stdout).unwrap_or_else(|e| {
        panic!(
            "expected valid JSON stdout, got error: {e}\nstdout:\n{}",
            String::from_utf8_lossy(&output.stdout)
        )
    })
}

fn write_manifest(dir: &Path, text: &str) {
    fs::create_dir_all(dir).expect("manifest dir should be created");
    fs::write(dir.join("package.json"), text).expect("manifest should be written");
}

#[test]
fn show_json_reports_fields_and_defaults() {
    let tmp = TempDirGuard::new("show");
    write_manifest(
        tmp.path(),
        r#"{"name":"pkg","main":"dist/pkg.cjs.js","browser":{"./dist/pkg.cjs.js":"./dist/pkg.browser.cjs.js"}}"#,
    );

    let output = run_prebundle([
        OsStr::new("show"),
        tmp.path().as_os_str(),
        OsStr::new("--json"),
    ]);
    assert_success(&output);

    let payload = parse_json_stdout(&output);
    assert_eq!(payload["qualifiedName"], "pkg");
    assert_eq!(payload["main"], "dist/pkg.cjs.js");
    assert_eq!(payload["module"], Value::Null);
    assert_eq!(
        payload["browser"]["./dist/pkg.cjs.js"],
        "./dist/pkg.browser.cjs.js"
    );
    assert_eq!(payload["source"], "src/index.js");
    assert_eq!(payload["umdName"], Value::Null);
}

#[test]
fn show_qualifies_nested_entrypoint() {
    let tmp = TempDirGuard::new("nested");
    write_manifest(tmp.path(), r#"{"name":"@scope/pkg"}"#);
    let entry_dir = tmp.path().join("compat");
    write_manifest(&entry_dir, r#"{"main":"dist/compat.cjs.js"}"#);

    let output = run_prebundle([
        OsStr::new("show"),
        entry_dir.as_os_str(),
        OsStr::new("--package-dir"),
        tmp.path().as_os_str(),
    ]);
    assert_success(&output);
    let text = stdout_text(&output);
    assert!(text.contains("prebundle show @scope/pkg/compat"));
    assert!(text.contains("main: dist/compat.cjs.js"));
}

#[test]
fn show_rejects_wrong_field_shape() {
    let tmp = TempDirGuard::new("shape");
    write_manifest(tmp.path(), r#"{"name":"pkg","main":7}"#);

    let output = run_prebundle([OsStr::new("show"), tmp.path().as_os_str()]);
    assert_failure(&output);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid `main` field"));
}

#[test]
fn check_strict_fails_without_main() {
    let tmp = TempDirGuard::new("check-missing");
    write_manifest(tmp.path(), r#"{"name":"pkg"}"#);

    let advisory = run_prebundle([
        OsStr::new("check"),
        tmp.path().as_os_str(),
        OsStr::new("--json"),
    ]);
    assert_success(&advisory);
    let payload = parse_json_stdout(&advisory);
    assert_eq!(payload["valid"], true);
    assert_eq!(payload["promoted"], false);
    assert_eq!(payload["issues"][0]["severity"], "warning");

    let strict = run_prebundle([
        OsStr::new("check"),
        tmp.path().as_os_str(),
        OsStr::new("--strict"),
        OsStr::new("--json"),
    ]);
    assert_failure(&strict);
    let payload = parse_json_stdout(&strict);
    assert_eq!(payload["mode"], "strict");
    assert_eq!(payload["issues"][0]["key"], "main");
    assert_eq!(payload["issues"][0]["severity"], "error");
}

#[test]
fn check_promotes_manifest_with_main() {
    let tmp = TempDirGuard::new("check-ok");
    write_manifest(tmp.path(), r#"{"name":"pkg","main":"dist/index.js"}"#);

    let output = run_prebundle([
        OsStr::new("check"),
        tmp.path().as_os_str(),
        OsStr::new("--strict"),
    ]);
    assert_success(&output);
    let text = stdout_text(&output);
    assert!(text.contains("promoted: yes"));
    assert!(text.contains("main: dist/index.js"));
}

#[test]
fn set_writes_fields_and_clears_empty_config_section() {
    let tmp = TempDirGuard::new("set");
    write_manifest(
        tmp.path(),
        "{\n  \"name\": \"pkg\",\n  \"prebundle\": {\n    \"umdName\": \"Pkg\"\n  }\n}\n",
    );

    let output = run_prebundle([
        OsStr::new("set"),
        tmp.path().as_os_str(),
        OsStr::new("--main"),
        OsStr::new("dist/pkg.cjs.js"),
        OsStr::new("--clear-umd-name"),
        OsStr::new("--json"),
    ]);
    assert_success(&output);
    let payload = parse_json_stdout(&output);
    assert_eq!(
        payload["changed"],
        serde_json::json!(["main", "prebundle.umdName"])
    );

    let text = fs::read_to_string(tmp.path().join("package.json")).expect("manifest readable");
    assert_eq!(
        text,
        "{\n  \"name\": \"pkg\",\n  \"main\": \"dist/pkg.cjs.js\"\n}\n"
    );
}

#[test]
fn set_without_fields_fails() {
    let tmp = TempDirGuard::new("set-empty");
    write_manifest(tmp.path(), r#"{"name":"pkg"}"#);

    let output = run_prebundle([OsStr::new("set"), tmp.path().as_os_str()]);
    assert_failure(&output);
    assert!(String::from_utf8_lossy(&output.stderr).contains("nothing to set"));
}

#[test]
fn set_uses_directory_name_for_unnamed_manifest() {
    let tmp = TempDirGuard::new("unnamed");
    let entry_dir = tmp.path().join("widget");
    write_manifest(&entry_dir, r#"{}"#);

    let output = run_prebundle([
        OsStr::new("set"),
        entry_dir.as_os_str(),
        OsStr::new("--umd-name"),
        OsStr::new("Widget"),
    ]);
    assert_success(&output);

    let show = run_prebundle([
        OsStr::new("show"),
        entry_dir.as_os_str(),
        OsStr::new("--json"),
    ]);
    assert_success(&show);
    let payload = parse_json_stdout(&show);
    assert_eq!(payload["qualifiedName"], "widget");
    assert_eq!(payload["umdName"], "Widget");
}

#[test]
fn source_resolves_configured_entry() {
    let tmp = TempDirGuard::new("source");
    write_manifest(
        tmp.path(),
        r#"{"name":"pkg","prebundle":{"source":"src/main"}}"#,
    );
    fs::create_dir_all(tmp.path().join("src")).expect("src dir");
    fs::write(tmp.path().join("src/main.tsx"), "export {};\n").expect("source should write");

    let output = run_prebundle([OsStr::new("source"), tmp.path().as_os_str()]);
    assert_success(&output);
    assert!(stdout_text(&output).trim_end().ends_with("src/main.tsx"));

    fs::remove_file(tmp.path().join("src/main.tsx")).expect("source removable");
    let missing = run_prebundle([OsStr::new("source"), tmp.path().as_os_str()]);
    assert_failure(&missing);
    assert!(String::from_utf8_lossy(&missing.stderr).contains("cannot resolve module"));
}
