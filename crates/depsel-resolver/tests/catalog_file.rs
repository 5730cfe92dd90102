use std::fs;

use depsel_core::config::{ModuleReassignment, ResolveConfig};
use depsel_core::declaration::{DependencyMetadata, DependencyState};
use depsel_core::failure::ResolveFailure;
use depsel_resolver::catalog::CatalogResolver;
use depsel_resolver::session::ResolveSession;
use depsel_util::errors::DepselError;

const CATALOG: &str = r#"
[[module]]
id = "org.example:app-lib"
versions = ["1.0"]

[module.dependencies]
"1.0" = ["org.example:util:[1.0,2.0)", "org.example:json:2.0"]

[[module]]
id = "org.example:util"
versions = ["1.0", "1.2", "2.0-SNAPSHOT"]

[[module]]
id = "org.example:json"
versions = ["2.0"]
broken = ["2.0"]
"#;

#[test]
fn walk_dependencies_from_files() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("depsel.toml"),
        "[selection]\nmodule-reassignment = \"deferred\"\n",
    )
    .unwrap();
    let catalog_path = dir.path().join("catalog.toml");
    fs::write(&catalog_path, CATALOG).unwrap();

    let config = ResolveConfig::load_or_default(dir.path()).unwrap();
    assert_eq!(config.selection.module_reassignment, ModuleReassignment::Deferred);
    let catalog = CatalogResolver::from_path(&catalog_path, &config.catalog).unwrap();
    let mut session = ResolveSession::new(config);

    let mut queue = vec![DependencyState::new(
        DependencyMetadata::parse("org.example:app-lib:1.0").unwrap(),
    )];
    let mut resolved = Vec::new();
    let mut broken = Vec::new();
    while let Some(state) = queue.pop() {
        let id = session.add_dependency(state).unwrap();
        let Some(component) = session.resolve(id, &catalog) else {
            continue;
        };
        resolved.push(session.registry().component(component).id().clone());
        match session.resolve_metadata(component, &catalog) {
            Ok(metadata) => queue.extend(
                metadata
                    .dependencies
                    .iter()
                    .cloned()
                    .map(DependencyState::new),
            ),
            Err(failure) => broken.push(failure.clone()),
        }
    }

    resolved.sort_by_key(|id| id.to_string());
    assert_eq!(
        resolved.iter().map(ToString::to_string).collect::<Vec<_>>(),
        vec![
            "org.example:app-lib:1.0",
            "org.example:json:2.0",
            "org.example:util:1.2",
        ]
    );
    assert_eq!(broken.len(), 1);
    assert!(matches!(
        broken[0],
        ResolveFailure::MetadataUnavailable { .. }
    ));
    assert_eq!(session.selectors().count(), 3);
    assert_eq!(session.registry().module_count(), 3);
}

#[test]
fn missing_catalog_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = CatalogResolver::from_path(
        &dir.path().join("absent.toml"),
        &ResolveConfig::default().catalog,
    )
    .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<DepselError>(),
        Some(DepselError::Io(_))
    ));
}

#[test]
fn malformed_catalog_module_is_rejected() {
    let err = CatalogResolver::from_toml_str(
        "[[module]]\nid = \"no-group\"\n",
        &ResolveConfig::default().catalog,
    )
    .unwrap_err();
    assert!(err.to_string().contains("no-group"));
}
