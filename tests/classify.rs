mod common;

use common::*;
use serde_json::json;
use tracelens::classify::{SpanRole, classify, is_database_call, is_model_call};
use tracelens::span::{Span, wire};

#[test]
fn test_roles_map_from_discriminator() {
    assert_eq!(classify(&role_span("a", None, "workflow")), SpanRole::Workflow);
    assert_eq!(classify(&role_span("b", None, "subflow")), SpanRole::Subflow);
    assert_eq!(classify(&role_span("c", None, "node")), SpanRole::Node);
    assert_eq!(
        classify(&role_span("d", None, "run_concurrent")),
        SpanRole::ConcurrentGroup
    );
}

#[test]
fn test_unset_empty_and_unknown_fall_back_to_other() {
    assert_eq!(classify(&plain_span("a", None)), SpanRole::Other);
    assert_eq!(classify(&role_span("b", None, "")), SpanRole::Other);
    assert_eq!(classify(&role_span("c", None, "mystery")), SpanRole::Other);
}

#[test]
fn test_non_string_discriminator_is_other() {
    let span = Span::builder("a", "t")
        .with_attribute(wire::SPAN_TYPE, json!(42))
        .build();
    assert_eq!(classify(&span), SpanRole::Other);
}

#[test]
fn test_workflow_like_predicate() {
    assert!(SpanRole::Workflow.is_workflow_like());
    assert!(SpanRole::Subflow.is_workflow_like());
    assert!(!SpanRole::Node.is_workflow_like());
    assert!(!SpanRole::ConcurrentGroup.is_workflow_like());
    assert!(!SpanRole::Other.is_workflow_like());
}

#[test]
fn test_database_and_model_classifiers_are_independent() {
    let db = Span::builder("a", "t")
        .with_attribute(wire::DB_SYSTEM, json!("postgresql"))
        .build();
    assert!(is_database_call(&db));
    assert!(!is_model_call(&db));

    let llm = Span::builder("b", "t")
        .with_attribute(wire::GEN_AI_SYSTEM, json!("anthropic"))
        .build();
    assert!(is_model_call(&llm));
    assert!(!is_database_call(&llm));

    // Non-exclusive: a span may be both.
    let both = Span::builder("c", "t")
        .with_attribute(wire::DB_SYSTEM, json!("sqlite"))
        .with_attribute(wire::GEN_AI_SYSTEM, json!("openai"))
        .build();
    assert!(is_database_call(&both) && is_model_call(&both));
}

#[test]
fn test_icon_classifiers_do_not_affect_role() {
    let span = Span::builder("a", "t")
        .with_attribute(wire::SPAN_TYPE, json!("node"))
        .with_attribute(wire::DB_SYSTEM, json!("postgresql"))
        .build();
    assert_eq!(classify(&span), SpanRole::Node);
}
