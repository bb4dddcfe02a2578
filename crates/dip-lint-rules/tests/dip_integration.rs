//! Integration test: both DIP rules end-to-end via Analyzer.
//!
//! The fixture under `tests/fixtures/example/` mirrors a small service
//! package; the other tests build throwaway trees with `tempfile`.

use dip_lint_core::{Analyzer, Config, LintResult, Severity, ViolationKind};
use dip_lint_rules::rules_from_settings;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn fixture_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/example")
}

fn analyze(root: &Path, config: Config) -> LintResult {
    let rules = rules_from_settings(&config.dip).expect("settings should compile");
    let mut builder = Analyzer::builder().root(root).config(config);
    for rule in rules {
        builder = builder.rule_box(rule);
    }
    builder
        .build()
        .expect("analyzer should build")
        .analyze()
        .expect("analysis should succeed")
}

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create dirs");
    }
    fs::write(path, content).expect("write file");
}

fn summary(result: &LintResult) -> Vec<String> {
    result
        .violations
        .iter()
        .map(|v| {
            format!(
                "{} {}:{} {}",
                v.code,
                v.location.file.display(),
                v.location.line,
                v.severity
            )
        })
        .collect()
}

// ── Fixture ──

#[test]
fn fixture_reports_concrete_constructors_and_bindings() {
    let root = fixture_root();
    let config = Config::from_file(&root.join("dip-lint.toml")).expect("fixture config");
    let result = analyze(&root, config);

    assert_eq!(result.files_checked, 2);
    assert_eq!(
        summary(&result),
        vec![
            "DIP002 src/app.rs:4 error",
            "DIP001 src/example.rs:13 error",
            "DIP001 src/example.rs:21 error",
        ]
    );

    let bindings = result.by_kind(ViolationKind::DirectConcreteBinding);
    assert_eq!(bindings.len(), 1);
    assert!(bindings[0].message.contains("'service'"));
    assert!(bindings[0].message.contains("'NewService'"));

    let ctors = result.by_kind(ViolationKind::ConstructorReturnsConcrete);
    assert_eq!(ctors[0].location.column, 8);
    assert!(ctors[1].message.contains("'NewManager'"));
}

#[test]
fn fixture_is_idempotent() {
    let root = fixture_root();
    let load = || Config::from_file(&root.join("dip-lint.toml")).expect("fixture config");

    let first = analyze(&root, load());
    let second = analyze(&root, load());
    assert_eq!(first.violations, second.violations);
}

// ── Scope ──

#[test]
fn include_and_exclude_prefixes_apply_to_relative_paths() {
    let dir = TempDir::new().expect("tempdir");
    let ctor = "pub struct S;\npub fn NewS() -> S { S }\n";
    write(dir.path(), "pkg/core/a.rs", ctor);
    write(dir.path(), "pkg/core/generated/b.rs", ctor);
    write(dir.path(), "pkg/other/x.rs", ctor);

    let config = Config::parse(
        r#"
[dip]
include = ["pkg/core"]
exclude = ["pkg/core/generated"]
"#,
    )
    .expect("config");
    let result = analyze(dir.path(), config);

    assert_eq!(result.files_checked, 3);
    assert_eq!(summary(&result), vec!["DIP001 pkg/core/a.rs:2 error"]);
}

#[test]
fn bindings_resolve_constructors_across_files() {
    let dir = TempDir::new().expect("tempdir");
    write(
        dir.path(),
        "src/repo.rs",
        "pub struct PgRepo;\npub trait Repo {}\nimpl Repo for PgRepo {}\n\
         // dip-lint: allow(constructor-returns-concrete) reason=\"adapter\"\n\
         pub fn NewPgRepo() -> PgRepo { PgRepo }\n",
    );
    write(
        dir.path(),
        "src/main.rs",
        "fn main() {\n    let repo = repo::NewPgRepo();\n    let shared: Box<dyn repo::Repo> = Box::new(repo);\n}\n",
    );

    let result = analyze(dir.path(), Config::default());
    assert_eq!(summary(&result), vec!["DIP002 src/main.rs:2 error"]);
}

#[test]
fn same_named_constructors_resolve_by_module() {
    let dir = TempDir::new().expect("tempdir");
    write(
        dir.path(),
        "src/a.rs",
        r"pub struct MemStore;
impl crate::Store for MemStore {}
pub fn NewStore() -> Box<dyn crate::Store> { Box::new(MemStore) }
",
    );
    write(
        dir.path(),
        "src/b.rs",
        r#"pub struct PgStore;
// dip-lint: allow(constructor-returns-concrete) reason="adapter"
pub fn NewStore() -> PgStore { PgStore }
"#,
    );
    write(
        dir.path(),
        "src/main.rs",
        r"pub trait Store {}
fn main() {
    let mem = a::NewStore();
    let pg = b::NewStore();
    let remote = reqwest::NewStore();
}
",
    );

    let result = analyze(dir.path(), Config::default());
    assert_eq!(summary(&result), vec!["DIP002 src/main.rs:4 error"]);
    assert!(result.violations[0].message.contains("'PgStore'"));
}

// ── Configuration ──

#[test]
fn severity_overrides_and_disabled_rules() {
    let dir = TempDir::new().expect("tempdir");
    write(
        dir.path(),
        "lib.rs",
        "pub struct S;\npub fn NewS() -> S { S }\nfn run() {\n    let s = NewS();\n}\n",
    );

    let config = Config::parse(
        r#"
[rules.constructor-returns-concrete]
severity = "warning"

[rules.direct-concrete-binding]
enabled = false
"#,
    )
    .expect("config");
    let result = analyze(dir.path(), config);

    assert_eq!(summary(&result), vec!["DIP001 lib.rs:2 warning"]);
    assert!(!result.has_errors());
}

#[test]
fn custom_constructor_prefix() {
    let dir = TempDir::new().expect("tempdir");
    write(
        dir.path(),
        "lib.rs",
        "pub struct S;\npub fn NewS() -> S { S }\npub fn MakeS() -> S { S }\n",
    );

    let config = Config::parse("[dip]\nconstructor_prefix = \"Make\"\n").expect("config");
    let result = analyze(dir.path(), config);

    assert_eq!(summary(&result), vec!["DIP001 lib.rs:3 error"]);
    assert!(result.violations[0].message.contains("'MakeS'"));
}

#[test]
fn json_config_is_accepted() {
    let dir = TempDir::new().expect("tempdir");
    write(
        dir.path(),
        "dip-lint.json",
        r#"{ "dip": { "name_patterns": ["*Repo"] } }"#,
    );
    write(
        dir.path(),
        "lib.rs",
        "pub struct A;\npub fn NewUserRepo() -> A { A }\npub fn NewService() -> A { A }\n",
    );

    let config = Config::from_file(&dir.path().join("dip-lint.json")).expect("json config");
    let result = analyze(dir.path(), config);

    assert_eq!(summary(&result), vec!["DIP001 lib.rs:2 error"]);
}

#[test]
fn allow_without_reason_downgrades_to_warning() {
    let dir = TempDir::new().expect("tempdir");
    write(
        dir.path(),
        "lib.rs",
        "pub struct S;\n// dip-lint: allow(all)\npub fn NewS() -> S { S }\n",
    );

    let result = analyze(dir.path(), Config::default());

    assert_eq!(summary(&result), vec!["DIP001 lib.rs:3 warning"]);
    assert_eq!(result.violations[0].severity, Severity::Warning);
    assert!(result.violations[0].message.contains("needs a reason"));
}
