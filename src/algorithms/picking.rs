use crate::geometry::math::seg_distance_sq;
use crate::{Graph, Pick};

// Point kinds use their own size as a minimum pick radius; edges use the
// caller's tolerance alone.
pub fn pick_impl(g: &Graph, x: f64, y: f64, tol: f64) -> Option<Pick> {
    // Vertices first
    let mut best_vertex: Option<(u32, f64)> = None;
    for (id, v) in g.vertices() {
        let r = tol.max(v.size);
        let dx = v.x - x;
        let dy = v.y - y;
        let d2 = dx * dx + dy * dy;
        if d2 <= r * r && best_vertex.map_or(true, |(_, bd)| d2 < bd) {
            best_vertex = Some((id, d2));
        }
    }
    if let Some((id, d2)) = best_vertex {
        return Some(Pick::Vertex { id, dist: d2.sqrt() });
    }
    // Bends
    let mut best_bend: Option<(u32, usize, f64)> = None;
    for (eid, e) in g.edges() {
        for (index, bend) in e.bends.iter().enumerate() {
            let r = tol.max(bend.size);
            let dx = bend.x - x;
            let dy = bend.y - y;
            let d2 = dx * dx + dy * dy;
            if d2 <= r * r && best_bend.map_or(true, |(_, _, bd)| d2 < bd) {
                best_bend = Some((eid, index, d2));
            }
        }
    }
    if let Some((edge, index, d2)) = best_bend {
        return Some(Pick::Bend {
            edge,
            index,
            dist: d2.sqrt(),
        });
    }
    // Crossings
    let mut best_crossing: Option<(usize, f64)> = None;
    for (index, c) in g.crossings().iter().enumerate() {
        let r = tol.max(c.size);
        let dx = c.x - x;
        let dy = c.y - y;
        let d2 = dx * dx + dy * dy;
        if d2 <= r * r && best_crossing.map_or(true, |(_, bd)| d2 < bd) {
            best_crossing = Some((index, d2));
        }
    }
    if let Some((index, d2)) = best_crossing {
        return Some(Pick::Crossing {
            index,
            dist: d2.sqrt(),
        });
    }
    // Edges: nearest subsegment, parameter weighted by arc length
    let tol2 = tol * tol;
    let mut best_edge: Option<(u32, f64, f64)> = None;
    for eid in g.edge_ids().collect::<Vec<_>>() {
        let subs = g.subsegments(eid);
        let mut length = 0.0;
        let mut lens = Vec::with_capacity(subs.len());
        for s in &subs {
            let l = ((s.bx - s.ax).powi(2) + (s.by - s.ay).powi(2)).sqrt();
            lens.push(l);
            length += l;
        }
        let mut acc = 0.0;
        for (s, &l) in subs.iter().zip(&lens) {
            let (d2, ts) = seg_distance_sq(x, y, s.ax, s.ay, s.bx, s.by);
            if d2 <= tol2 {
                let t = if length > 0.0 { (acc + ts * l) / length } else { 0.0 };
                if best_edge.map_or(true, |(_, bd, _)| d2 < bd) {
                    best_edge = Some((eid, d2, t));
                }
            }
            acc += l;
        }
    }
    if let Some((id, d2, t)) = best_edge {
        return Some(Pick::Edge {
            id,
            t,
            dist: d2.sqrt(),
        });
    }
    None
}
