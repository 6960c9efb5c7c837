//! All-pairs crossing discovery and classification over edge pairs.
//!
//! Discovery order is deterministic: subsegment-index-major within a pair,
//! ascending edge id across pairs. The order carries no meaning but keeps
//! crossing ids reproducible.

use crate::geometry::intersect::{intersect, Subsegment};
use crate::model::{Crossing, Edge, DEFAULT_CROSSING_SIZE};
use crate::Graph;

fn share_endpoint(e1: &Edge, e2: &Edge) -> bool {
    e1.a == e2.a || e1.a == e2.b || e1.b == e2.a || e1.b == e2.b
}

fn classified(
    x: f64,
    y: f64,
    s1: &Subsegment,
    s2: &Subsegment,
    id1: u32,
    id2: u32,
    e1: &Edge,
    e2: &Edge,
) -> Crossing {
    let self_crossing = id1 == id2;
    // Crossings of edges incident to a common vertex are structurally
    // unavoidable and not counted as real.
    let legal = !self_crossing && !share_endpoint(e1, e2);
    Crossing {
        x,
        y,
        size: DEFAULT_CROSSING_SIZE,
        edges: (id1, id2),
        subs: ((s1.edge, s1.index), (s2.edge, s2.index)),
        legal,
        self_crossing,
        more_than_once: false,
    }
}

/// Every interior crossing between the subsegments of `id1` and `id2`.
/// A self-pair scans unordered subsegment pairs `i < j` so each hit is
/// reported once. Missing edges yield an empty result.
pub fn crossing_points(g: &Graph, id1: u32, id2: u32) -> Vec<Crossing> {
    let e1 = match g.get_edge(id1) {
        Some(e) => e,
        None => return Vec::new(),
    };
    let e2 = match g.get_edge(id2) {
        Some(e) => e,
        None => return Vec::new(),
    };
    let subs1 = g.subsegments(id1);
    let mut out = Vec::new();
    if id1 == id2 {
        for i in 0..subs1.len() {
            for j in (i + 1)..subs1.len() {
                if let Some((x, y)) = intersect(&subs1[i], &subs1[j]) {
                    out.push(classified(x, y, &subs1[i], &subs1[j], id1, id2, e1, e2));
                }
            }
        }
    } else {
        let subs2 = g.subsegments(id2);
        for s1 in &subs1 {
            for s2 in &subs2 {
                if let Some((x, y)) = intersect(s1, s2) {
                    out.push(classified(x, y, s1, s2, id1, id2, e1, e2));
                }
            }
        }
    }
    out
}

/// Flags every crossing whose unordered edge pair occurs more than once in
/// the batch. Informational only; never affects legality.
pub fn mark_multiplicity(crossings: &mut [Crossing]) {
    for i in 0..crossings.len() {
        for j in (i + 1)..crossings.len() {
            if crossings[i].same_edges(&crossings[j]) {
                crossings[i].more_than_once = true;
                crossings[j].more_than_once = true;
            }
        }
    }
}

/// Full rebuild of the crossing cache: every unordered edge pair including
/// self-pairs, multiplicity over the entire result. Ground truth for the
/// incremental path.
pub fn recompute_all(g: &mut Graph) {
    let ids: Vec<u32> = g.edge_ids().collect();
    let mut all = Vec::new();
    for (i, &a) in ids.iter().enumerate() {
        for &b in &ids[i..] {
            all.extend(crossing_points(g, a, b));
        }
    }
    mark_multiplicity(&mut all);
    g.crossings = all;
}
