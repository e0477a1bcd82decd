use crate::common::{Article, Post};
use scoped_search::query_builder::{Condition, QueryBuilder, ScopeSelector};
use scoped_search::SearchError;
use serde_json::json;
use std::sync::Arc;

#[test]
fn test_named_scope_mutates_builder() {
    let post = Post::shared();
    let mut builder = QueryBuilder::for_model(&post);
    builder.scopes("active").unwrap();

    assert_eq!(builder.predicates(), [Condition::term("status", "active")]);
}

#[test]
fn test_unknown_named_scope() {
    let post = Post::shared();
    let mut builder = QueryBuilder::for_model(&post);
    let error = builder.scopes("nonexistent").unwrap_err();

    assert_eq!(
        error,
        SearchError::UnknownScopeError {
            model: "Post".to_string(),
            scope: "nonexistent".to_string(),
        }
    );
}

#[test]
fn test_named_scope_requires_model() {
    let mut builder = QueryBuilder::new();
    let error = builder.scopes("active").unwrap_err();
    assert!(matches!(error, SearchError::BindingError(_)));
}

#[test]
fn test_dropped_model_is_binding_error() {
    let post = Post::shared();
    let mut builder = QueryBuilder::for_model(&post);
    drop(post);

    assert!(builder.model().is_none());
    assert!(!builder.has_named_scope("active"));
    assert!(matches!(
        builder.scopes("active"),
        Err(SearchError::BindingError(_))
    ));
}

#[test]
fn test_names_run_in_caller_order() {
    let post = Post::shared();
    let mut builder = QueryBuilder::for_model(&post);
    builder.scopes(["published", "active"]).unwrap();

    assert_eq!(
        builder.predicates(),
        [
            Condition::exists("published_at"),
            Condition::term("status", "active")
        ]
    );
}

#[test]
fn test_scopes_with_parameters() {
    let post = Post::shared();
    let mut builder = QueryBuilder::for_model(&post);
    builder
        .scopes(vec![
            ("tagged", vec![json!("rust"), json!("search")]),
            ("active", vec![]),
        ])
        .unwrap();

    assert_eq!(
        builder.predicates(),
        [
            Condition::terms("tags", vec![json!("rust"), json!("search")]),
            Condition::term("status", "active")
        ]
    );
}

#[test]
fn test_selector_stops_at_first_failure() {
    let post = Post::shared();
    let mut builder = QueryBuilder::for_model(&post);
    let result = builder.scopes(ScopeSelector::Names(vec![
        "active".to_string(),
        "broken".to_string(),
        "published".to_string(),
    ]));

    assert_eq!(
        result.unwrap_err(),
        SearchError::ScopeError("broken scope".to_string())
    );
    assert_eq!(builder.predicates(), [Condition::term("status", "active")]);
}

#[test]
fn test_call_named_scope_directly() {
    let post = Post::shared();
    let mut builder = QueryBuilder::for_model(&post);
    builder
        .call_named_scope("tagged", &[json!("rust")])
        .unwrap()
        .limit(5);

    assert_eq!(builder.predicates().len(), 1);
    assert_eq!(builder.to_body()["size"], json!(5));
}

#[test]
fn test_has_named_scope() {
    let post = Post::shared();
    let builder = QueryBuilder::for_model(&post);

    assert!(builder.has_named_scope("active"));
    assert!(!builder.has_named_scope("archived"));
}

#[test]
fn test_named_and_global_scopes_combine() {
    let article = Article::for_tenant(3);
    let mut builder = QueryBuilder::for_model(&article);
    builder.scopes("recent").unwrap();

    let applied = builder.apply_scopes().unwrap();
    let body = applied.to_body();

    assert_eq!(body["sort"], json!([{ "created_at": { "order": "desc" } }]));
    assert_eq!(
        body["query"]["bool"]["filter"][0],
        json!({ "term": { "tenant": 3 } })
    );
}

#[test]
fn test_builders_share_model() {
    let post = Post::shared();
    let first = QueryBuilder::for_model(&post);
    let second = first.clone();

    let first_model = first.model().unwrap();
    let second_model = second.model().unwrap();
    assert!(Arc::ptr_eq(&first_model, &second_model));
}
