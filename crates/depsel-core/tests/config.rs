use depsel_core::config::{ModuleReassignment, ResolveConfig};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_default_reassignment_is_immediate() {
    let config = ResolveConfig::default();
    assert_eq!(
        config.selection.module_reassignment,
        ModuleReassignment::Immediate
    );
}

#[test]
fn test_default_excludes_snapshots() {
    let config = ResolveConfig::default();
    assert!(!config.catalog.include_snapshots);
}

#[test]
fn test_empty_toml_uses_defaults() {
    let config = ResolveConfig::from_toml_str("").unwrap();
    assert_eq!(
        config.selection.module_reassignment,
        ModuleReassignment::Immediate
    );
    assert!(!config.catalog.include_snapshots);
}

#[test]
fn test_parse_from_toml() {
    let toml = r#"
[selection]
module-reassignment = "deferred"

[catalog]
include-snapshots = true
"#;
    let config = ResolveConfig::from_toml_str(toml).unwrap();
    assert_eq!(
        config.selection.module_reassignment,
        ModuleReassignment::Deferred
    );
    assert!(config.catalog.include_snapshots);
}

#[test]
fn test_bad_reassignment_value_is_config_error() {
    let err = ResolveConfig::from_toml_str("[selection]\nmodule-reassignment = \"later\"\n")
        .unwrap_err();
    assert!(
        err.to_string().contains("Configuration error"),
        "got: {err}"
    );
}

#[test]
fn test_load_or_default_without_file() {
    let tmp = TempDir::new().unwrap();
    let config = ResolveConfig::load_or_default(tmp.path()).unwrap();
    assert_eq!(
        config.selection.module_reassignment,
        ModuleReassignment::Immediate
    );
}

#[test]
fn test_load_or_default_reads_file() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join(ResolveConfig::FILE_NAME),
        "[selection]\nmodule-reassignment = \"deferred\"\n",
    )
    .unwrap();
    let config = ResolveConfig::load_or_default(tmp.path()).unwrap();
    assert_eq!(
        config.selection.module_reassignment,
        ModuleReassignment::Deferred
    );
}

#[test]
fn test_from_path_missing_file_is_io_error() {
    let tmp = TempDir::new().unwrap();
    let err = ResolveConfig::from_path(&tmp.path().join("nope.toml")).unwrap_err();
    assert!(err.to_string().contains("I/O error"), "got: {err}");
    assert!(matches!(
        err.downcast_ref::<depsel_util::errors::DepselError>(),
        Some(depsel_util::errors::DepselError::Io(_))
    ));
}
