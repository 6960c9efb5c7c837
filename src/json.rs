//! Import/export document: the minimal vertex/edge/bend record needed to
//! rebuild the model. Reconstruction goes through the public mutation
//! surface with deferred updates, re-adding bends in their original order,
//! and finishes with one full recompute — a loaded graph is exactly as
//! consistent as a drawn one.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::GraphError;
use crate::model::{Color, DEFAULT_BEND_SIZE, DEFAULT_EDGE_THICKNESS, DEFAULT_VERTEX_SIZE};
use crate::Graph;

#[derive(Serialize, Deserialize)]
struct VertexDoc {
    id: u32,
    x: f64,
    y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    color: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    shape: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    label: Option<String>,
}

#[derive(Serialize, Deserialize)]
struct BendDoc {
    x: f64,
    y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    color: Option<Color>,
}

#[derive(Serialize, Deserialize)]
struct EdgeDoc {
    v1: u32,
    v2: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    dashed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    thickness: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    color: Option<Color>,
    #[serde(default)]
    bends: Vec<BendDoc>,
}

#[derive(Serialize, Deserialize)]
struct GraphDoc {
    vertices: Vec<VertexDoc>,
    edges: Vec<EdgeDoc>,
}

fn to_doc(g: &Graph) -> GraphDoc {
    let mut vertices = Vec::new();
    for (id, v) in g.vertices() {
        vertices.push(VertexDoc {
            id,
            x: v.x,
            y: v.y,
            size: (v.size != DEFAULT_VERTEX_SIZE).then_some(v.size),
            color: v.color,
            shape: v.shape.clone(),
            label: v.label.clone(),
        });
    }
    let mut edges = Vec::new();
    for (_, e) in g.edges() {
        edges.push(EdgeDoc {
            v1: e.a,
            v2: e.b,
            dashed: e.dashed.then_some(true),
            thickness: (e.thickness != DEFAULT_EDGE_THICKNESS).then_some(e.thickness),
            color: e.color,
            bends: e
                .bends
                .iter()
                .map(|b| BendDoc {
                    x: b.x,
                    y: b.y,
                    size: (b.size != DEFAULT_BEND_SIZE).then_some(b.size),
                    color: b.color,
                })
                .collect(),
        });
    }
    GraphDoc { vertices, edges }
}

fn from_doc(g: &mut Graph, doc: &GraphDoc) -> Result<(), GraphError> {
    // Build into a fresh graph so a malformed document leaves `g` intact.
    let mut fresh = Graph::new();
    fresh.set_self_loops_allowed(g.self_loops_allowed());
    fresh.set_parallel_edges_allowed(g.parallel_edges_allowed());
    fresh.set_update_mode(g.update_mode());

    let mut ids: HashMap<u32, u32> = HashMap::new();
    for v in &doc.vertices {
        if ids.contains_key(&v.id) {
            return Err(GraphError::InvalidDocument(format!(
                "duplicate vertex id {}",
                v.id
            )));
        }
        if !v.x.is_finite() || !v.y.is_finite() {
            return Err(GraphError::InvalidDocument(format!(
                "non-finite position on vertex {}",
                v.id
            )));
        }
        let nid = fresh.add_vertex(v.x, v.y);
        ids.insert(v.id, nid);
        if let Some(size) = v.size {
            fresh.set_vertex_size(nid, size)?;
        }
        if v.color.is_some() {
            fresh.set_vertex_color(nid, v.color)?;
        }
        if v.shape.is_some() {
            fresh.set_vertex_shape(nid, v.shape.clone())?;
        }
        if v.label.is_some() {
            fresh.set_vertex_label(nid, v.label.clone())?;
        }
    }
    for e in &doc.edges {
        let a = *ids.get(&e.v1).ok_or_else(|| {
            GraphError::InvalidDocument(format!("edge references unknown vertex {}", e.v1))
        })?;
        let b = *ids.get(&e.v2).ok_or_else(|| {
            GraphError::InvalidDocument(format!("edge references unknown vertex {}", e.v2))
        })?;
        let eid = fresh.add_edge(a, b, false)?;
        for bend in &e.bends {
            let bref = fresh.add_bend_to_edge(eid, Some((bend.x, bend.y)), false, false)?;
            // Cosmetic restore; no geometry change.
            if let Some(Some(edge)) = fresh.edges.get_mut(eid as usize) {
                if let Some(bd) = edge.bends.get_mut(bref.index) {
                    if let Some(size) = bend.size {
                        bd.size = if size.is_finite() && size > 0.0 {
                            size
                        } else {
                            DEFAULT_BEND_SIZE
                        };
                    }
                    bd.color = bend.color;
                }
            }
        }
        fresh.set_edge_style(
            eid,
            e.color,
            e.thickness.unwrap_or(DEFAULT_EDGE_THICKNESS),
            e.dashed.unwrap_or(false),
        )?;
    }
    fresh.update_crossings();
    fresh.update_curve_complexity();
    debug!(
        vertices = fresh.vertex_count(),
        edges = fresh.edge_count(),
        crossings = fresh.crossing_count(),
        "document loaded"
    );
    *g = fresh;
    Ok(())
}

pub fn to_json_impl(g: &Graph) -> Value {
    serde_json::to_value(to_doc(g)).unwrap_or(Value::Null)
}

pub fn from_json_impl(g: &mut Graph, v: Value) -> Result<(), GraphError> {
    let doc: GraphDoc =
        serde_json::from_value(v).map_err(|e| GraphError::InvalidDocument(e.to_string()))?;
    from_doc(g, &doc)
}
