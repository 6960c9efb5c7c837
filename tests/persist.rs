use serde_json::json;
use thrackle::error::GraphError;
use thrackle::model::Color;
use thrackle::Graph;

fn build_sample() -> Graph {
    let mut g = Graph::new();
    let a = g.add_vertex(0.0, 0.0);
    let b = g.add_vertex(20.0, 0.0);
    let c = g.add_vertex(0.0, 5.0);
    let d = g.add_vertex(20.0, 5.0);
    g.set_vertex_label(a, Some("a".to_string())).unwrap();
    g.set_vertex_size(b, 14.0).unwrap();
    g.set_vertex_color(
        c,
        Some(Color {
            r: 200,
            g: 40,
            b: 40,
            a: 255,
        }),
    )
    .unwrap();
    g.add_edge(a, b, true).unwrap();
    let e2 = g.add_edge(c, d, true).unwrap();
    g.set_edge_style(e2, None, 3.5, true).unwrap();
    // Two bends dipping C-D across A-B twice.
    g.add_bend(c, d, Some((5.0, -5.0)), false, true).unwrap();
    g.add_bend(c, d, Some((15.0, -5.0)), false, true).unwrap();
    g
}

#[test]
fn document_round_trip_preserves_derived_state() {
    let g = build_sample();
    assert!(g.crossing_count() > 0);
    let doc = g.to_json_value();
    let mut back = Graph::new();
    back.from_json_value(doc).unwrap();
    assert!(back.crossings_current());
    assert_eq!(back.vertex_count(), g.vertex_count());
    assert_eq!(back.edge_count(), g.edge_count());
    assert_eq!(back.crossing_count(), g.crossing_count());
    assert_eq!(back.crossing_categories(), g.crossing_categories());
    assert_eq!(back.curve_complexity(), g.curve_complexity());
    assert_eq!(back.thrackle_number(), g.thrackle_number());
}

#[test]
fn document_round_trip_preserves_styles_and_labels() {
    let g = build_sample();
    let doc = g.to_json_value();
    let mut back = Graph::new();
    back.from_json_value(doc).unwrap();
    let labeled: Vec<&str> = back
        .vertices()
        .filter_map(|(_, v)| v.label.as_deref())
        .collect();
    assert_eq!(labeled, vec!["a"]);
    assert!(back.vertices().any(|(_, v)| v.size == 14.0));
    let dashed: Vec<f64> = back
        .edges()
        .filter(|(_, e)| e.dashed)
        .map(|(_, e)| e.thickness)
        .collect();
    assert_eq!(dashed, vec![3.5]);
}

#[test]
fn bends_reload_in_original_order() {
    let g = build_sample();
    let doc = g.to_json_value();
    let mut back = Graph::new();
    back.from_json_value(doc).unwrap();
    let bent: Vec<_> = back
        .edges()
        .filter(|(_, e)| !e.bends.is_empty())
        .collect();
    assert_eq!(bent.len(), 1);
    let (_, e) = bent[0];
    assert_eq!(e.bends.len(), 2);
    assert!(e.bends[0].x < e.bends[1].x);
}

#[test]
fn minimal_document_loads_with_defaults() {
    let mut g = Graph::new();
    g.from_json_value(json!({
        "vertices": [
            {"id": 0, "x": 0.0, "y": 0.0},
            {"id": 1, "x": 10.0, "y": 10.0}
        ],
        "edges": [
            {"v1": 0, "v2": 1}
        ]
    }))
    .unwrap();
    assert_eq!(g.vertex_count(), 2);
    assert_eq!(g.edge_count(), 1);
    assert_eq!(g.crossing_count(), 0);
}

#[test]
fn malformed_document_is_a_typed_error_and_leaves_state() {
    let mut g = build_sample();
    let before_vertices = g.vertex_count();
    let before_crossings = g.crossing_count();
    let err = g.from_json_value(json!({"vertices": 3})).unwrap_err();
    assert!(matches!(err, GraphError::InvalidDocument(_)));
    assert_eq!(g.vertex_count(), before_vertices);
    assert_eq!(g.crossing_count(), before_crossings);
}

#[test]
fn dangling_edge_reference_is_rejected() {
    let mut g = Graph::new();
    let err = g
        .from_json_value(json!({
            "vertices": [{"id": 0, "x": 0.0, "y": 0.0}],
            "edges": [{"v1": 0, "v2": 9}]
        }))
        .unwrap_err();
    assert!(matches!(err, GraphError::InvalidDocument(_)));
    assert_eq!(g.vertex_count(), 0);
}

#[test]
fn duplicate_vertex_id_is_rejected() {
    let mut g = Graph::new();
    let err = g
        .from_json_value(json!({
            "vertices": [
                {"id": 0, "x": 0.0, "y": 0.0},
                {"id": 0, "x": 1.0, "y": 1.0}
            ],
            "edges": []
        }))
        .unwrap_err();
    assert!(matches!(err, GraphError::InvalidDocument(_)));
}
