mod common;

use serde_json::json;
use tracelens::graph::{GraphDocument, GraphError, RenderOptions, render};
use tracelens::span::{Span, wire};

const SIMPLE: &str = r#"{
    "v": 1,
    "nodes": [
        {"id": "load", "type": "node", "label": "Load"},
        {"id": "store", "type": "node", "label": "Store"}
    ],
    "edges": [
        {"id": "e1", "source": "load", "target": "store", "condition": "ok"}
    ]
}"#;

const NESTED: &str = r#"{
    "v": 1,
    "nodes": [
        {"id": "ingest", "type": "node", "label": "Ingest"},
        {"id": "grp", "type": "group", "label": "Fan-out", "isSubgraph": true,
         "children": ["inner", "a"]},
        {"id": "inner", "type": "group", "label": "Inner", "isSubgraph": true,
         "children": ["b"]},
        {"id": "a", "type": "node", "label": "A"},
        {"id": "b", "type": "node", "label": "B"}
    ],
    "edges": [
        {"id": "e1", "source": "ingest", "target": "grp", "condition": null},
        {"id": "e2", "source": "a", "target": "b", "condition": "retry"}
    ]
}"#;

// -- Parsing & validation ---------------------------------------------------

#[test]
fn test_parse_simple_document() {
    let doc = GraphDocument::parse(SIMPLE).unwrap();
    assert_eq!(doc.v, 1);
    assert_eq!(doc.nodes.len(), 2);
    assert_eq!(doc.edges.len(), 1);
    assert_eq!(doc.node("load").unwrap().label, "Load");
}

#[test]
fn test_invalid_json_is_malformed() {
    assert!(matches!(
        GraphDocument::parse("{not json"),
        Err(GraphError::Malformed { .. })
    ));
}

#[test]
fn test_unknown_fields_rejected() {
    let raw = r#"{"v":1,"nodes":[{"id":"a","type":"node","label":"A","surprise":1}],"edges":[]}"#;
    assert!(matches!(
        GraphDocument::parse(raw),
        Err(GraphError::Malformed { .. })
    ));
}

#[test]
fn test_unsupported_version_rejected() {
    let raw = r#"{"v":2,"nodes":[],"edges":[]}"#;
    assert!(matches!(
        GraphDocument::parse(raw),
        Err(GraphError::UnsupportedVersion { v: 2 })
    ));
}

#[test]
fn test_duplicate_node_id_rejected() {
    let raw = r#"{"v":1,"nodes":[
        {"id":"a","type":"node","label":"A"},
        {"id":"a","type":"node","label":"A again"}],"edges":[]}"#;
    assert!(matches!(
        GraphDocument::parse(raw),
        Err(GraphError::DuplicateNode { ref id }) if id == "a"
    ));
}

#[test]
fn test_empty_node_id_rejected() {
    let raw = r#"{"v":1,"nodes":[{"id":"","type":"node","label":"X"}],"edges":[]}"#;
    assert!(matches!(
        GraphDocument::parse(raw),
        Err(GraphError::EmptyNodeId)
    ));
}

#[test]
fn test_edge_with_unknown_endpoint_rejected() {
    let raw = r#"{"v":1,"nodes":[{"id":"a","type":"node","label":"A"}],
        "edges":[{"id":"e1","source":"a","target":"ghost","condition":null}]}"#;
    assert!(matches!(
        GraphDocument::parse(raw),
        Err(GraphError::UnknownEndpoint { ref edge, ref node }) if edge == "e1" && node == "ghost"
    ));
}

#[test]
fn test_unknown_child_rejected() {
    let raw = r#"{"v":1,"nodes":[
        {"id":"grp","type":"group","label":"G","isSubgraph":true,"children":["ghost"]}],
        "edges":[]}"#;
    assert!(matches!(
        GraphDocument::parse(raw),
        Err(GraphError::UnknownChild { ref child, .. }) if child == "ghost"
    ));
}

#[test]
fn test_child_claimed_twice_rejected() {
    let raw = r#"{"v":1,"nodes":[
        {"id":"g1","type":"group","label":"G1","isSubgraph":true,"children":["kid"]},
        {"id":"g2","type":"group","label":"G2","isSubgraph":true,"children":["kid"]},
        {"id":"kid","type":"node","label":"Kid"}],"edges":[]}"#;
    assert!(matches!(
        GraphDocument::parse(raw),
        Err(GraphError::ChildReparented { ref child, .. }) if child == "kid"
    ));
}

#[test]
fn test_children_on_non_subgraph_rejected() {
    let raw = r#"{"v":1,"nodes":[
        {"id":"leaf","type":"node","label":"L","children":["kid"]},
        {"id":"kid","type":"node","label":"Kid"}],"edges":[]}"#;
    assert!(matches!(
        GraphDocument::parse(raw),
        Err(GraphError::ChildrenOnLeaf { ref id }) if id == "leaf"
    ));
}

#[test]
fn test_subgraph_cycle_rejected() {
    let raw = r#"{"v":1,"nodes":[
        {"id":"g1","type":"group","label":"G1","isSubgraph":true,"children":["g2"]},
        {"id":"g2","type":"group","label":"G2","isSubgraph":true,"children":["g1"]}],
        "edges":[]}"#;
    assert!(matches!(
        GraphDocument::parse(raw),
        Err(GraphError::CyclicSubgraph { .. })
    ));
}

// -- Rendering --------------------------------------------------------------

#[test]
fn test_render_declares_nodes_before_edges() {
    let doc = GraphDocument::parse(SIMPLE).unwrap();
    let rendered = render(&doc, &RenderOptions::default()).unwrap();

    let node_pos = rendered.text.find(r#"load["Load"]"#).unwrap();
    let edge_pos = rendered.text.find("load --> store").unwrap();
    assert!(node_pos < edge_pos);
}

#[test]
fn test_render_is_byte_identical_across_calls() {
    let doc = GraphDocument::parse(NESTED).unwrap();
    let options = RenderOptions {
        show_edge_labels: true,
    };
    let first = render(&doc, &options).unwrap();
    let second = render(&doc, &options).unwrap();
    assert_eq!(first.text, second.text);
    assert_eq!(first.registry, second.registry);
}

#[test]
fn test_edge_labels_only_when_enabled() {
    let doc = GraphDocument::parse(SIMPLE).unwrap();

    let plain = render(&doc, &RenderOptions::default()).unwrap();
    assert!(plain.text.contains("load --> store"));
    assert!(!plain.text.contains("ok"));

    let labeled = render(
        &doc,
        &RenderOptions {
            show_edge_labels: true,
        },
    )
    .unwrap();
    assert!(labeled.text.contains(r#"load -->|"ok"| store"#));
}

#[test]
fn test_null_condition_never_renders_a_label() {
    let doc = GraphDocument::parse(NESTED).unwrap();
    let rendered = render(
        &doc,
        &RenderOptions {
            show_edge_labels: true,
        },
    )
    .unwrap();
    assert!(rendered.text.contains("ingest --> grp\n"));
    assert!(rendered.text.contains(r#"a -->|"retry"| b"#));
}

#[test]
fn test_subgraphs_nest_recursively() {
    let doc = GraphDocument::parse(NESTED).unwrap();
    let rendered = render(&doc, &RenderOptions::default()).unwrap();

    let text = &rendered.text;
    let outer = text.find(r#"subgraph grp["Fan-out"]"#).unwrap();
    let inner = text.find(r#"subgraph inner["Inner"]"#).unwrap();
    let leaf_b = text.find(r#"b["B"]"#).unwrap();
    assert!(outer < inner && inner < leaf_b);
    assert_eq!(text.matches("\n  end\n").count(), 1); // outer closes at depth 1
    assert_eq!(text.matches("end\n").count(), 2);

    // Children render only inside their subgraph, not at top level.
    assert_eq!(text.matches(r#"a["A"]"#).count(), 1);
}

#[test]
fn test_labels_are_escaped() {
    let raw = r#"{"v":1,"nodes":[{"id":"a","type":"node","label":"say \"hi\" <now>"}],"edges":[]}"#;
    let doc = GraphDocument::parse(raw).unwrap();
    let rendered = render(&doc, &RenderOptions::default()).unwrap();
    assert!(rendered.text.contains("say &quot;hi&quot; &lt;now&gt;"));
}

// -- Registry ---------------------------------------------------------------

#[test]
fn test_registry_round_trips_every_node() {
    let doc = GraphDocument::parse(NESTED).unwrap();
    let rendered = render(&doc, &RenderOptions::default()).unwrap();

    assert_eq!(rendered.registry.len(), doc.nodes.len());
    for node in &doc.nodes {
        let rid = rendered.registry.rendered_id(&node.id).unwrap();
        assert_eq!(rendered.registry.domain_id(rid), Some(node.id.as_str()));
    }
}

#[test]
fn test_registry_disambiguates_sanitization_collisions() {
    let raw = r#"{"v":1,"nodes":[
        {"id":"fetch-user","type":"node","label":"A"},
        {"id":"fetch_user","type":"node","label":"B"}],"edges":[]}"#;
    let doc = GraphDocument::parse(raw).unwrap();
    let rendered = render(&doc, &RenderOptions::default()).unwrap();

    let first = rendered.registry.rendered_id("fetch-user").unwrap();
    let second = rendered.registry.rendered_id("fetch_user").unwrap();
    assert_ne!(first, second);
    assert_eq!(rendered.registry.domain_id(first), Some("fetch-user"));
    assert_eq!(rendered.registry.domain_id(second), Some("fetch_user"));
}

#[test]
fn test_rendered_ids_derive_from_domain_ids() {
    let raw = r#"{"v":1,"nodes":[{"id":"1st-step","type":"node","label":"S"}],"edges":[]}"#;
    let doc = GraphDocument::parse(raw).unwrap();
    let rendered = render(&doc, &RenderOptions::default()).unwrap();
    assert_eq!(rendered.registry.rendered_id("1st-step"), Some("n_1st_step"));
}

#[test]
fn test_span_node_id_resolves_through_registry() {
    // A node span's recorded graph-node id maps to the rendered element,
    // so clicking either side of the diagram selects the other.
    let doc = GraphDocument::parse(SIMPLE).unwrap();
    let rendered = render(&doc, &RenderOptions::default()).unwrap();

    let span = Span::builder("s", "t")
        .with_attribute(wire::NODE_ID, json!("load"))
        .build();

    let rid = rendered.registry.rendered_id(span.node_id().unwrap()).unwrap();
    assert_eq!(rendered.registry.domain_id(rid), Some("load"));
    assert!(rendered.text.contains(rid));
}

#[test]
fn test_render_revalidates_hand_built_documents() {
    let mut doc = GraphDocument::parse(SIMPLE).unwrap();
    doc.edges[0].target = "ghost".to_string();
    assert!(matches!(
        render(&doc, &RenderOptions::default()),
        Err(GraphError::UnknownEndpoint { .. })
    ));
}
