use depsel_core::config::ResolveConfig;
use depsel_core::constraint::VersionConstraint;
use depsel_core::coordinate::{ComponentSelector, ModuleId, ModuleVersionId};
use depsel_core::declaration::{DependencyMetadata, DependencyState};
use depsel_core::failure::ResolveFailure;
use depsel_core::reason::{SelectionCause, SelectionDescriptor};
use depsel_resolver::catalog::CatalogResolver;
use depsel_resolver::id_resolver::{IdResolveResult, IdentifierResolver};
use depsel_resolver::session::ResolveSession;
use depsel_util::errors::DepselError;

fn lib() -> ModuleId {
    ModuleId::new("org.example", "lib")
}

fn catalog() -> CatalogResolver {
    CatalogResolver::default().with_module(lib(), &["1.0", "1.5", "2.0"])
}

fn declare(notation: &str) -> DependencyState {
    DependencyState::new(DependencyMetadata::parse(notation).unwrap())
}

fn constraint_only(notation: &str) -> DependencyState {
    let selector = DependencyMetadata::parse(notation).unwrap().selector;
    DependencyState::new(DependencyMetadata::constraint(selector))
}

/// Fails every selector after describing the failure itself.
struct Missing;

impl IdentifierResolver for Missing {
    fn resolve(&self, dependency: &DependencyMetadata, result: &mut IdResolveResult) {
        result.set_selection_description(
            SelectionDescriptor::requested().with_description("NotFound"),
        );
        result.failed(ResolveFailure::not_found(
            dependency.selector.to_string(),
            "[1.0,2.0)",
        ));
    }
}

#[test]
fn plain_request_reason_is_requested() {
    let mut session = ResolveSession::default();
    let id = session.add_dependency(declare("org.example:lib:1.0")).unwrap();

    let component = session.resolve(id, &catalog()).unwrap();
    assert_eq!(
        session.registry().component(component).id(),
        &ModuleVersionId::new(lib(), "1.0")
    );
    let reason = session.selection_reason(id).unwrap();
    assert_eq!(reason.descriptors(), &[SelectionDescriptor::requested()]);
    assert_eq!(reason.to_string(), "requested");
}

#[test]
fn repeated_resolve_is_idempotent() {
    let mut session = ResolveSession::default();
    let id = session.add_dependency(declare("org.example:lib:1.0")).unwrap();
    let resolver = catalog();

    let first = session.resolve(id, &resolver).unwrap();
    for _ in 0..3 {
        assert_eq!(session.resolve(id, &resolver), Some(first));
    }
    assert_eq!(session.registry().component(first).selection_reason().len(), 1);
    assert_eq!(session.registry().component(first).selectors().len(), 1);
}

#[test]
fn two_selectors_share_one_component() {
    let mut session = ResolveSession::default();
    let a = session.add_dependency(declare("org.example:lib:1.0")).unwrap();
    let b = session.add_dependency(declare("org.example:lib:1.0")).unwrap();
    let resolver = catalog();

    let ca = session.resolve(a, &resolver).unwrap();
    let cb = session.resolve(b, &resolver).unwrap();
    assert_eq!(ca, cb);
    assert_eq!(session.registry().component_count(), 1);

    let reason = session.registry().component(ca).selection_reason();
    assert_eq!(
        reason.causes().collect::<Vec<_>>(),
        vec![SelectionCause::Requested, SelectionCause::Requested]
    );
    assert_eq!(session.registry().component(ca).selectors(), &[a, b]);
}

#[test]
fn causes_follow_resolution_order() {
    let mut session = ResolveSession::default();
    let a = session.add_dependency(declare("org.example:lib:1.0")).unwrap();
    let b = session.add_dependency(constraint_only("org.example:lib:1.0")).unwrap();
    let resolver = catalog();

    session.resolve(b, &resolver);
    let component = session.resolve(a, &resolver).unwrap();
    let causes: Vec<_> = session
        .registry()
        .component(component)
        .selection_reason()
        .causes()
        .collect();
    assert_eq!(
        causes,
        vec![SelectionCause::Constraint, SelectionCause::Requested]
    );
}

#[test]
fn selectors_register_with_their_module() {
    let mut session = ResolveSession::default();
    let a = session.add_dependency(declare("org.example:lib:1.0")).unwrap();
    let b = session.add_dependency(declare("org.example:lib:[1.0,2.0)")).unwrap();
    let resolver = catalog();
    session.resolve(a, &resolver);
    session.resolve(b, &resolver);

    let module = session.registry().find_module(&lib()).unwrap();
    assert_eq!(session.registry().module(module).selectors(), &[a, b]);
    assert_eq!(session.selector(a).target_module(), module);
    assert_eq!(session.selector(a).result_id(), 0);
    assert_eq!(session.selector(b).result_id(), 1);
}

#[test]
fn constraint_only_success_contributes_constraint_cause() {
    let mut session = ResolveSession::default();
    let id = session
        .add_dependency(constraint_only("org.example:lib:[1.0,2.0)"))
        .unwrap();
    session.resolve(id, &catalog()).unwrap();

    let reason = session.selection_reason(id).unwrap();
    assert_eq!(reason.count_of(SelectionCause::Constraint), 1);
    assert_eq!(
        session.selector(id).version_constraint().unwrap().to_string(),
        "[1.0,2.0)"
    );
}

/// Resolves from the catalog but reports its own description.
struct Describing(CatalogResolver);

impl IdentifierResolver for Describing {
    fn resolve(&self, dependency: &DependencyMetadata, result: &mut IdResolveResult) {
        result.set_selection_description(
            SelectionDescriptor::requested().with_description("matched 1.5"),
        );
        self.0.resolve(dependency, result);
    }
}

#[test]
fn constraint_cause_survives_rewritten_description() {
    let mut session = ResolveSession::default();
    let ok = session
        .add_dependency(constraint_only("org.example:lib:[1.0,2.0)"))
        .unwrap();
    let missing = session
        .add_dependency(constraint_only("org.example:lib:[1.0,2.0)"))
        .unwrap();

    session.resolve(ok, &Describing(catalog())).unwrap();
    assert!(session.resolve(missing, &Missing).is_none());

    let success = session.selection_reason(ok).unwrap();
    let failure = session.selection_reason(missing).unwrap();
    assert_eq!(success.count_of(SelectionCause::Constraint), 1);
    assert_eq!(failure.count_of(SelectionCause::Constraint), 1);
    assert_eq!(success.to_string(), "matched 1.5, constraint");
    assert_eq!(failure.to_string(), "NotFound, constraint");
}

#[test]
fn constraint_cause_is_not_doubled_with_constraint_rule() {
    let mut session = ResolveSession::default();
    let state = constraint_only("org.example:lib:[1.0,2.0)")
        .with_rule(SelectionDescriptor::constraint().with_description("platform alignment"));
    let id = session.add_dependency(state).unwrap();

    session.resolve(id, &Describing(catalog())).unwrap();
    let reason = session.selection_reason(id).unwrap();
    assert_eq!(reason.to_string(), "matched 1.5, platform alignment");
    assert_eq!(reason.count_of(SelectionCause::Constraint), 1);
}

#[test]
fn constraint_only_failure_reason_marks_constraint_once() {
    let mut session = ResolveSession::default();
    let id = session
        .add_dependency(constraint_only("org.example:lib:[1.0,2.0)"))
        .unwrap();

    assert!(session.resolve(id, &Missing).is_none());
    assert!(matches!(
        session.failure(id),
        Some(ResolveFailure::NotFound { .. })
    ));
    let reason = session.selection_reason(id).unwrap();
    let descriptions: Vec<_> = reason.descriptors().iter().map(|d| d.description()).collect();
    assert_eq!(descriptions, vec!["NotFound", "constraint"]);
    assert_eq!(reason.count_of(SelectionCause::Constraint), 1);
}

#[test]
fn constraint_failure_with_untouched_description_is_not_doubled() {
    let mut session = ResolveSession::default();
    let id = session
        .add_dependency(constraint_only("org.example:lib:[5.0,6.0)"))
        .unwrap();

    assert!(session.resolve(id, &catalog()).is_none());
    let reason = session.selection_reason(id).unwrap();
    assert_eq!(
        reason.causes().collect::<Vec<_>>(),
        vec![SelectionCause::Constraint]
    );
}

#[test]
fn rule_is_attributed_once_on_failure() {
    let mut session = ResolveSession::default();
    let rule = SelectionDescriptor::by_rule("substitute legacy lib");
    let id = session
        .add_dependency(constraint_only("org.example:lib:[5.0,6.0)").with_rule(rule.clone()))
        .unwrap();

    session.resolve(id, &catalog());
    let reason = session.selection_reason(id).unwrap();
    assert_eq!(
        reason.descriptors(),
        &[SelectionDescriptor::constraint(), rule]
    );
}

#[test]
fn rule_is_attributed_once_on_success() {
    let mut session = ResolveSession::default();
    let rule = SelectionDescriptor::by_rule("align logging");
    let id = session
        .add_dependency(declare("org.example:lib:2.0").with_rule(rule.clone()))
        .unwrap();
    let resolver = catalog();
    session.resolve(id, &resolver);
    session.resolve(id, &resolver);

    let reason = session.selection_reason(id).unwrap();
    assert_eq!(reason.count_of(SelectionCause::SelectedByRule), 1);
    assert_eq!(reason.descriptors()[1], rule);
}

#[test]
fn malformed_declaration_fails_without_resolver() {
    let mut session = ResolveSession::default();
    let id = session
        .add_dependency(DependencyState::from_notation("org.example", lib()))
        .unwrap();

    assert!(session.resolve(id, &catalog()).is_none());
    assert!(matches!(
        session.failure(id),
        Some(ResolveFailure::InvalidDeclaration { .. })
    ));
    assert_eq!(
        session.selection_reason(id).unwrap().descriptors(),
        &[SelectionDescriptor::requested()]
    );
    assert_eq!(session.registry().component_count(), 0);
}

#[test]
fn failed_selector_stays_failed() {
    let mut session = ResolveSession::default();
    let id = session.add_dependency(declare("org.example:lib:9.0")).unwrap();
    assert!(session.resolve(id, &catalog()).is_none());

    let later = catalog().with_module(lib(), &["9.0"]);
    assert!(session.resolve(id, &later).is_none());
    assert!(session.selector(id).selected().is_none());
}

#[test]
fn project_selector_needs_explicit_target() {
    let mut session = ResolveSession::new(ResolveConfig::default());
    let project = DependencyState::new(DependencyMetadata::new(ComponentSelector::project(":core")));
    let err = session.add_dependency(project.clone()).unwrap_err();
    assert!(matches!(err, DepselError::Resolution { .. }));
    assert!(err.to_string().contains("project :core"));

    let core = ModuleId::new("com.acme", "core");
    let id = session.add_selector(project, &core);
    let resolver =
        CatalogResolver::default().with_project(":core", ModuleVersionId::new(core.clone(), "0.1"));
    let component = session.resolve(id, &resolver).unwrap();
    assert_eq!(session.registry().component(component).id().module, core);
}

#[test]
fn resolved_constraint_is_captured() {
    let mut session = ResolveSession::default();
    let dependency = DependencyMetadata::new(ComponentSelector::module(
        lib(),
        VersionConstraint::requires("[1.0,3.0)").with_rejected("2.0"),
    ));
    let id = session.add_dependency(DependencyState::new(dependency)).unwrap();
    let component = session.resolve(id, &catalog()).unwrap();

    assert_eq!(session.registry().component(component).id().version, "1.5");
    let selector = session.selector(id);
    assert_eq!(
        selector.version_constraint().unwrap().to_string(),
        "[1.0,3.0) (reject 2.0)"
    );
    assert_eq!(selector.resolve_result().unwrap().rejected(), &["2.0".to_string()]);
}
