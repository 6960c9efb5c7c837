//! Localized crossing-cache maintenance.
//!
//! A mutation that only changes the geometry of edge `e` invalidates exactly
//! the cached crossings referencing `e`. The splice below recomputes `e`'s
//! crossings against every live edge (including `e` itself, to catch
//! self-crossings), drops the stale entries, and appends the fresh batch.
//!
//! Multiplicity is flagged within the fresh batch only. That is still
//! globally correct: a batch always covers complete edge pairs, and any
//! mutation that can change some pair's crossing count runs a batch
//! containing that whole pair. The consistency tests hold this path to the
//! output of a full recompute, flags included.

use super::crossings::{crossing_points, mark_multiplicity};
use crate::Graph;

/// Recompute every crossing involving `eid` and splice the result into the
/// cache. Other pairs are left untouched.
pub fn update_for_edge(g: &mut Graph, eid: u32) {
    let partners: Vec<u32> = g.edge_ids().collect();
    let mut batch = Vec::new();
    for other in partners {
        batch.extend(crossing_points(g, eid, other));
    }
    mark_multiplicity(&mut batch);
    g.crossings.retain(|c| !c.touches_edge(eid));
    g.crossings.extend(batch);
}

/// Deletion cleanup: drop every cached crossing referencing `eid`.
pub fn remove_for_edge(g: &mut Graph, eid: u32) {
    g.crossings.retain(|c| !c.touches_edge(eid));
}
