use crate::common::Article;
use scoped_search::model::Model;
use scoped_search::query_builder::{
    Condition, GlobalScope, QueryBuilder, Scope, SoftDeletingScope,
};
use scoped_search::{Result, SearchError};
use std::borrow::Cow;

fn term_scope(field: &'static str, value: i64) -> GlobalScope {
    GlobalScope::callable(move |query| {
        query.where_term(field, value);
        Ok(())
    })
}

/// Records which model it was applied with
struct ModelMarkerScope;

impl Scope for ModelMarkerScope {
    fn identifier(&self) -> &str {
        "model_marker"
    }

    fn apply(&self, builder: &mut QueryBuilder, model: Option<&dyn Model>) -> Result<()> {
        builder.where_term("model", model.map(|model| model.name()));
        Ok(())
    }
}

#[test]
fn test_apply_without_scopes_returns_same_builder() {
    let mut builder = QueryBuilder::new();
    builder.where_term("status", "active");

    let applied = builder.apply_scopes().unwrap();
    assert!(matches!(applied, Cow::Borrowed(_)));
    assert!(std::ptr::eq(applied.as_ref(), &builder));
}

#[test]
fn test_apply_with_scopes_leaves_original_untouched() {
    let mut builder = QueryBuilder::new();
    builder.with_global_scope("tenant", term_scope("tenant", 42));

    let applied = builder.apply_scopes().unwrap();
    assert!(matches!(applied, Cow::Owned(_)));
    assert!(!std::ptr::eq(applied.as_ref(), &builder));
    assert_eq!(applied.predicates(), [Condition::term("tenant", 42)]);

    assert!(builder.predicates().is_empty());
    assert_eq!(builder.registry().len(), 1);
    assert!(builder.removed_scopes().is_empty());
}

#[test]
fn test_scopes_apply_in_registration_order() {
    let mut builder = QueryBuilder::new();
    builder.without_global_scope("b");
    builder.without_global_scope("a");
    builder.with_global_scope("a", term_scope("a", 1));
    builder.with_global_scope("b", term_scope("b", 2));

    let applied = builder.apply_scopes().unwrap();
    assert_eq!(
        applied.predicates(),
        [Condition::term("a", 1), Condition::term("b", 2)]
    );
}

#[test]
fn test_reregistration_keeps_original_position() {
    let mut builder = QueryBuilder::new();
    builder.with_global_scope("a", term_scope("a", 1));
    builder.with_global_scope("b", term_scope("b", 2));
    builder.with_global_scope("a", term_scope("a", 3));

    let applied = builder.apply_scopes().unwrap();
    assert_eq!(
        applied.predicates(),
        [Condition::term("a", 3), Condition::term("b", 2)]
    );
}

#[test]
fn test_removal_is_idempotent_but_logged_each_time() {
    let mut builder = QueryBuilder::new();
    builder.with_global_scope("tenant", term_scope("tenant", 42));
    builder.with_global_scope("region", term_scope("region", 1));

    builder.without_global_scope("tenant");
    let after_once: Vec<String> = builder.registry().identifiers().map(String::from).collect();
    builder.without_global_scope("tenant");
    let after_twice: Vec<String> = builder.registry().identifiers().map(String::from).collect();

    assert_eq!(after_once, after_twice);
    assert_eq!(after_twice, vec!["region"]);
    assert_eq!(builder.removed_scopes(), ["tenant", "tenant"]);
}

#[test]
fn test_scope_removed_during_application_does_not_run() {
    let mut builder = QueryBuilder::new();
    builder.with_global_scope(
        "first",
        GlobalScope::callable(|query| {
            query.where_term("first", true);
            query.without_global_scope("second");
            Ok(())
        }),
    );
    builder.with_global_scope("second", term_scope("second", 2));
    builder.with_global_scope("third", term_scope("third", 3));

    let applied = builder.apply_scopes().unwrap();
    assert_eq!(
        applied.predicates(),
        [Condition::term("first", true), Condition::term("third", 3)]
    );
    assert_eq!(applied.removed_scopes(), ["second"]);
    assert!(builder.registry().contains("second"));
}

#[test]
fn test_without_global_scopes_only_removes_current() {
    let mut builder = QueryBuilder::new();
    builder.with_global_scope("a", term_scope("a", 1));
    builder.with_global_scope("b", term_scope("b", 2));
    builder.without_global_scopes();
    builder.with_global_scope("c", term_scope("c", 3));

    let applied = builder.apply_scopes().unwrap();
    assert_eq!(applied.predicates(), [Condition::term("c", 3)]);
    assert_eq!(builder.removed_scopes(), ["a", "b"]);
}

#[test]
fn test_without_global_scopes_named() {
    let mut builder = QueryBuilder::new();
    builder.with_global_scope("a", term_scope("a", 1));
    builder.with_global_scope("b", term_scope("b", 2));
    builder.with_global_scope("c", term_scope("c", 3));
    builder.without_global_scopes_named(["c", "a"]);

    let applied = builder.apply_scopes().unwrap();
    assert_eq!(applied.predicates(), [Condition::term("b", 2)]);
    assert_eq!(builder.removed_scopes(), ["c", "a"]);
}

#[test]
fn test_tenant_scenario() {
    let mut base = QueryBuilder::new();
    base.with_global_scope("tenant", term_scope("tenant", 42));
    base.where_term("status", "active");

    let scoped = base.apply_scopes().unwrap();
    assert!(scoped.predicates().contains(&Condition::term("tenant", 42)));

    let mut unscoped = base.clone();
    unscoped.without_global_scope("tenant");
    let applied = unscoped.apply_scopes().unwrap();

    assert!(!applied.predicates().contains(&Condition::term("tenant", 42)));
    assert_eq!(applied.predicates(), [Condition::term("status", "active")]);
    assert_eq!(unscoped.removed_scopes(), ["tenant"]);
    assert!(base.removed_scopes().is_empty());
}

#[test]
fn test_scope_error_propagates() {
    let mut builder = QueryBuilder::new();
    builder.with_global_scope("ok", term_scope("ok", 1));
    builder.with_global_scope(
        "failing",
        GlobalScope::callable(|_| Err(SearchError::ScopeError("tenant unavailable".to_string()))),
    );

    let error = builder.apply_scopes().unwrap_err();
    assert_eq!(
        error,
        SearchError::ScopeError("tenant unavailable".to_string())
    );
    assert!(builder.predicates().is_empty());
}

#[test]
fn test_applying_twice_reruns_scopes() {
    let mut builder = QueryBuilder::new();
    builder.with_global_scope("tenant", term_scope("tenant", 42));

    let once = builder.apply_scopes().unwrap().into_owned();
    let twice = once.apply_scopes().unwrap();
    assert_eq!(twice.predicates().len(), 2);
}

#[test]
fn test_object_scope_receives_model() {
    let article = Article::for_tenant(7);
    let mut builder = QueryBuilder::for_model(&article);
    builder.without_global_scopes();
    builder.with_scope(ModelMarkerScope);

    let applied = builder.apply_scopes().unwrap();
    assert_eq!(applied.predicates(), [Condition::term("model", "Article")]);
}

#[test]
fn test_object_scope_without_model() {
    let mut builder = QueryBuilder::new();
    builder.with_scope(ModelMarkerScope);

    let applied = builder.apply_scopes().unwrap();
    assert_eq!(
        applied.predicates(),
        [Condition::term("model", serde_json::Value::Null)]
    );
}

#[test]
fn test_model_global_scopes_registered_in_order() {
    let article = Article::for_tenant(7);
    let builder = QueryBuilder::for_model(&article);

    assert_eq!(builder.target_index(), Some("articles"));
    assert_eq!(
        builder.registry().identifiers().collect::<Vec<_>>(),
        vec!["tenant", SoftDeletingScope::IDENTIFIER]
    );
    assert!(builder.has_macro("with_trashed"));

    let applied = builder.apply_scopes().unwrap();
    assert_eq!(
        applied.predicates(),
        [Condition::term("tenant", 7), Condition::missing("deleted_at")]
    );
}

#[test]
fn test_remove_object_scope_by_identity() {
    let article = Article::for_tenant(7);
    let mut builder = QueryBuilder::for_model(&article);
    builder.without_scope(&SoftDeletingScope::default());

    let applied = builder.apply_scopes().unwrap();
    assert_eq!(applied.predicates(), [Condition::term("tenant", 7)]);
    assert_eq!(builder.removed_scopes(), [SoftDeletingScope::IDENTIFIER]);
}

#[test]
fn test_clones_have_independent_registries() {
    let article = Article::for_tenant(7);
    let base = QueryBuilder::for_model(&article);

    let mut trashed = base.clone();
    trashed.call_macro("only_trashed", &[]).unwrap();

    let base_applied = base.apply_scopes().unwrap();
    let trashed_applied = trashed.apply_scopes().unwrap();

    assert_eq!(
        base_applied.predicates(),
        [Condition::term("tenant", 7), Condition::missing("deleted_at")]
    );
    assert_eq!(
        trashed_applied.predicates(),
        [Condition::exists("deleted_at"), Condition::term("tenant", 7)]
    );
}
