pub mod error;
pub mod model;
pub mod geometry {
    pub mod intersect;
    pub mod math;
    pub mod tolerance;
}
pub mod algorithms {
    pub mod crossings;
    pub mod incremental;
    pub mod metrics;
    pub mod picking;
}
mod json;

use error::GraphError;
use geometry::intersect::Subsegment;
use geometry::tolerance::EPS_POS;
use model::{
    Bend, Color, Crossing, Edge, Vertex, DEFAULT_BEND_SIZE, DEFAULT_EDGE_THICKNESS,
    DEFAULT_VERTEX_SIZE,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub use algorithms::metrics::CrossingCategories;

/// Strategy used to keep the crossing cache consistent after a mutation.
/// Both strategies are observationally identical; `Full` is the ground
/// truth the incremental splice is tested against.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpdateMode {
    Incremental,
    Full,
}

/// Transient handle to one bend of one edge. Indices shift when bends are
/// inserted or removed earlier on the same edge; re-resolve after
/// structural edits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BendRef {
    pub edge: u32,
    pub index: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub enum Pick {
    #[serde(rename = "vertex")]
    Vertex { id: u32, dist: f64 },
    #[serde(rename = "bend")]
    Bend { edge: u32, index: usize, dist: f64 },
    #[serde(rename = "crossing")]
    Crossing { index: usize, dist: f64 },
    #[serde(rename = "edge")]
    Edge { id: u32, t: f64, dist: f64 },
}

pub struct Graph {
    pub(crate) vertices: Vec<Option<Vertex>>, // id is index
    pub(crate) edges: Vec<Option<Edge>>,      // id is index
    pub(crate) crossings: Vec<Crossing>,      // derived cache
    pub(crate) curve_complexity: usize,       // cache: max bend count over all edges
    pub(crate) geom_ver: u64,
    pub(crate) crossings_ver: u64,
    self_loops_allowed: bool,
    parallel_edges_allowed: bool,
    update_mode: UpdateMode,
}

impl Graph {
    pub fn new() -> Graph {
        Graph {
            vertices: Vec::new(),
            edges: Vec::new(),
            crossings: Vec::new(),
            curve_complexity: 0,
            geom_ver: 1,
            crossings_ver: 1,
            self_loops_allowed: false,
            parallel_edges_allowed: false,
            update_mode: UpdateMode::Incremental,
        }
    }

    // Policies
    pub fn self_loops_allowed(&self) -> bool {
        self.self_loops_allowed
    }
    pub fn set_self_loops_allowed(&mut self, allowed: bool) {
        self.self_loops_allowed = allowed;
    }
    pub fn parallel_edges_allowed(&self) -> bool {
        self.parallel_edges_allowed
    }
    pub fn set_parallel_edges_allowed(&mut self, allowed: bool) {
        self.parallel_edges_allowed = allowed;
    }
    pub fn update_mode(&self) -> UpdateMode {
        self.update_mode
    }
    pub fn set_update_mode(&mut self, mode: UpdateMode) {
        self.update_mode = mode;
    }

    // Versioning. The crossing cache is stamped with the geometry version
    // it was last made consistent at; deferred callers can observe
    // staleness instead of relying on convention alone.
    pub fn geom_version(&self) -> u64 {
        self.geom_ver
    }
    pub fn crossings_current(&self) -> bool {
        self.crossings_ver == self.geom_ver
    }

    fn bump(&mut self) {
        self.geom_ver += 1;
    }

    // A mutation that cannot change any crossing keeps a current cache
    // current; a stale cache stays stale.
    fn bump_no_crossing_change(&mut self) {
        let was_current = self.crossings_current();
        self.geom_ver += 1;
        if was_current {
            self.crossings_ver = self.geom_ver;
        }
    }

    // After per-edge maintenance the cache is current iff it was current
    // before the mutation; a full recompute makes it current regardless.
    fn note_maintained(&mut self, was_current: bool) {
        if was_current || self.update_mode == UpdateMode::Full {
            self.crossings_ver = self.geom_ver;
        }
    }

    fn maintain_edge(&mut self, eid: u32) {
        match self.update_mode {
            UpdateMode::Incremental => algorithms::incremental::update_for_edge(self, eid),
            UpdateMode::Full => algorithms::crossings::recompute_all(self),
        }
    }

    // Lookup
    pub fn get_vertex(&self, id: u32) -> Option<&Vertex> {
        self.vertices.get(id as usize).and_then(|v| v.as_ref())
    }
    pub fn get_edge(&self, id: u32) -> Option<&Edge> {
        self.edges.get(id as usize).and_then(|e| e.as_ref())
    }
    pub fn get_bend(&self, bref: BendRef) -> Option<&Bend> {
        self.get_edge(bref.edge).and_then(|e| e.bends.get(bref.index))
    }

    fn vertex(&self, id: u32) -> Result<&Vertex, GraphError> {
        self.get_vertex(id).ok_or(GraphError::VertexNotFound(id))
    }
    fn vertex_mut(&mut self, id: u32) -> Result<&mut Vertex, GraphError> {
        self.vertices
            .get_mut(id as usize)
            .and_then(|v| v.as_mut())
            .ok_or(GraphError::VertexNotFound(id))
    }
    fn edge_mut(&mut self, id: u32) -> Result<&mut Edge, GraphError> {
        self.edges
            .get_mut(id as usize)
            .and_then(|e| e.as_mut())
            .ok_or(GraphError::EdgeNotFound(id))
    }

    // Iteration over live slots
    pub fn vertices(&self) -> impl Iterator<Item = (u32, &Vertex)> {
        self.vertices
            .iter()
            .enumerate()
            .filter_map(|(i, v)| v.as_ref().map(|v| (i as u32, v)))
    }
    pub fn edges(&self) -> impl Iterator<Item = (u32, &Edge)> {
        self.edges
            .iter()
            .enumerate()
            .filter_map(|(i, e)| e.as_ref().map(|e| (i as u32, e)))
    }
    pub fn edge_ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.edges
            .iter()
            .enumerate()
            .filter_map(|(i, e)| e.as_ref().map(|_| i as u32))
    }
    pub fn crossings(&self) -> &[Crossing] {
        &self.crossings
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.iter().filter(|v| v.is_some()).count()
    }
    pub fn edge_count(&self) -> usize {
        self.edges.iter().filter(|e| e.is_some()).count()
    }
    pub fn crossing_count(&self) -> usize {
        self.crossings.len()
    }
    pub fn curve_complexity(&self) -> usize {
        self.curve_complexity
    }

    fn incident_edges(&self, vid: u32) -> Vec<u32> {
        self.edges
            .iter()
            .enumerate()
            .filter_map(|(i, e)| {
                e.as_ref()
                    .filter(|e| e.touches(vid))
                    .map(|_| i as u32)
            })
            .collect()
    }

    /// The N+1 straight pieces of the edge's polyline, in order from
    /// endpoint `a` to endpoint `b`. Empty for unknown edges.
    pub fn subsegments(&self, eid: u32) -> Vec<Subsegment> {
        let e = match self.get_edge(eid) {
            Some(e) => e,
            None => return Vec::new(),
        };
        let (a, b) = match (self.get_vertex(e.a), self.get_vertex(e.b)) {
            (Some(a), Some(b)) => (a, b),
            _ => return Vec::new(),
        };
        let mut pts: Vec<(f64, f64)> = Vec::with_capacity(e.bends.len() + 2);
        pts.push((a.x, a.y));
        pts.extend(e.bends.iter().map(|bd| (bd.x, bd.y)));
        pts.push((b.x, b.y));
        pts.windows(2)
            .enumerate()
            .map(|(i, w)| Subsegment {
                edge: eid,
                index: i,
                ax: w[0].0,
                ay: w[0].1,
                bx: w[1].0,
                by: w[1].1,
            })
            .collect()
    }

    // Vertices
    pub fn add_vertex(&mut self, x: f64, y: f64) -> u32 {
        let id = self.vertices.len() as u32;
        self.vertices.push(Some(Vertex {
            x,
            y,
            size: DEFAULT_VERTEX_SIZE,
            label: None,
            color: None,
            shape: None,
            temporary: false,
            neighbors: Vec::new(),
        }));
        self.bump_no_crossing_change();
        id
    }

    pub fn move_vertex(&mut self, id: u32, x: f64, y: f64, update: bool) -> Result<(), GraphError> {
        if !x.is_finite() || !y.is_finite() {
            return Err(GraphError::NonFinite);
        }
        let (oldx, oldy) = {
            let v = self.vertex(id)?;
            (v.x, v.y)
        };
        let dx = x - oldx;
        let dy = y - oldy;
        if dx * dx + dy * dy <= EPS_POS * EPS_POS {
            return Ok(());
        }
        let was_current = self.crossings_current();
        {
            let v = self.vertex_mut(id)?;
            v.x = x;
            v.y = y;
        }
        self.bump();
        if update {
            match self.update_mode {
                UpdateMode::Incremental => {
                    for eid in self.incident_edges(id) {
                        algorithms::incremental::update_for_edge(self, eid);
                    }
                }
                UpdateMode::Full => algorithms::crossings::recompute_all(self),
            }
            self.note_maintained(was_current);
        }
        Ok(())
    }

    pub fn remove_vertex(&mut self, id: u32) -> Result<(), GraphError> {
        self.vertex(id)?;
        let incident = self.incident_edges(id);
        for &eid in &incident {
            if let Some(edge) = self.edges.get_mut(eid as usize).and_then(|s| s.take()) {
                self.unlink_neighbor(edge.a, edge.b);
                self.unlink_neighbor(edge.b, edge.a);
            }
        }
        if let Some(slot) = self.vertices.get_mut(id as usize) {
            *slot = None;
        }
        let was_current = self.crossings_current();
        self.bump();
        match self.update_mode {
            UpdateMode::Incremental => {
                self.crossings
                    .retain(|c| !incident.iter().any(|&e| c.touches_edge(e)));
            }
            UpdateMode::Full => algorithms::crossings::recompute_all(self),
        }
        self.note_maintained(was_current);
        self.update_curve_complexity();
        Ok(())
    }

    pub fn set_vertex_label(&mut self, id: u32, label: Option<String>) -> Result<(), GraphError> {
        self.vertex_mut(id)?.label = label;
        Ok(())
    }
    pub fn set_vertex_color(&mut self, id: u32, color: Option<Color>) -> Result<(), GraphError> {
        self.vertex_mut(id)?.color = color;
        Ok(())
    }
    pub fn set_vertex_shape(&mut self, id: u32, shape: Option<String>) -> Result<(), GraphError> {
        self.vertex_mut(id)?.shape = shape;
        Ok(())
    }
    pub fn set_vertex_size(&mut self, id: u32, size: f64) -> Result<(), GraphError> {
        let v = self.vertex_mut(id)?;
        v.size = if size.is_finite() && size > 0.0 {
            size
        } else {
            DEFAULT_VERTEX_SIZE
        };
        Ok(())
    }
    pub fn set_temporary(&mut self, id: u32, temporary: bool) -> Result<(), GraphError> {
        self.vertex_mut(id)?.temporary = temporary;
        Ok(())
    }

    // Edges
    pub fn add_edge(&mut self, a: u32, b: u32, update: bool) -> Result<u32, GraphError> {
        self.vertex(a)?;
        self.vertex(b)?;
        if a == b && !self.self_loops_allowed {
            warn!(vertex = a, "rejected self-loop");
            return Err(GraphError::SelfLoopDisallowed);
        }
        if !self.parallel_edges_allowed && self.edges.iter().flatten().any(|e| e.connects(a, b)) {
            warn!(a, b, "rejected parallel edge");
            return Err(GraphError::ParallelEdgeDisallowed(a, b));
        }
        let id = self.edges.len() as u32;
        self.edges.push(Some(Edge {
            a,
            b,
            bends: Vec::new(),
            color: None,
            thickness: DEFAULT_EDGE_THICKNESS,
            dashed: false,
        }));
        self.vertex_mut(a)?.neighbors.push(b);
        self.vertex_mut(b)?.neighbors.push(a);
        let was_current = self.crossings_current();
        self.bump();
        if update {
            self.maintain_edge(id);
            self.note_maintained(was_current);
        }
        Ok(id)
    }

    pub fn remove_edge(&mut self, id: u32) -> Result<(), GraphError> {
        let edge = self
            .edges
            .get_mut(id as usize)
            .and_then(|s| s.take())
            .ok_or(GraphError::EdgeNotFound(id))?;
        self.unlink_neighbor(edge.a, edge.b);
        self.unlink_neighbor(edge.b, edge.a);
        let was_current = self.crossings_current();
        self.bump();
        match self.update_mode {
            UpdateMode::Incremental => algorithms::incremental::remove_for_edge(self, id),
            UpdateMode::Full => algorithms::crossings::recompute_all(self),
        }
        self.note_maintained(was_current);
        if self.curve_complexity > 0 && edge.bends.len() == self.curve_complexity {
            self.update_curve_complexity();
        }
        Ok(())
    }

    pub fn set_edge_style(
        &mut self,
        id: u32,
        color: Option<Color>,
        thickness: f64,
        dashed: bool,
    ) -> Result<(), GraphError> {
        let e = self.edge_mut(id)?;
        e.color = color;
        e.thickness = if thickness.is_finite() && thickness > 0.0 {
            thickness
        } else {
            DEFAULT_EDGE_THICKNESS
        };
        e.dashed = dashed;
        Ok(())
    }

    fn unlink_neighbor(&mut self, v: u32, other: u32) {
        if let Some(Some(vx)) = self.vertices.get_mut(v as usize) {
            if let Some(pos) = vx.neighbors.iter().position(|&n| n == other) {
                vx.neighbors.swap_remove(pos);
            }
        }
    }

    // Bends
    /// Insert a bend on the first edge connecting `v` and `u`. With no
    /// coordinates the bend lands on the endpoint midpoint. `on_edge`
    /// projects the position onto the geometrically closest subsegment and
    /// inserts at that subsegment's slot, preserving polyline order;
    /// otherwise the bend is appended last.
    pub fn add_bend(
        &mut self,
        v: u32,
        u: u32,
        at: Option<(f64, f64)>,
        on_edge: bool,
        update: bool,
    ) -> Result<BendRef, GraphError> {
        self.vertex(v)?;
        self.vertex(u)?;
        let eid = self
            .edges
            .iter()
            .enumerate()
            .find_map(|(i, e)| e.as_ref().filter(|e| e.connects(v, u)).map(|_| i as u32))
            .ok_or(GraphError::NoEdgeBetween(v, u))?;
        self.add_bend_to_edge(eid, at, on_edge, update)
    }

    /// Same as [`add_bend`](Graph::add_bend), addressing the edge directly.
    pub fn add_bend_to_edge(
        &mut self,
        eid: u32,
        at: Option<(f64, f64)>,
        on_edge: bool,
        update: bool,
    ) -> Result<BendRef, GraphError> {
        let (ax, ay, bx, by) = {
            let e = self.get_edge(eid).ok_or(GraphError::EdgeNotFound(eid))?;
            let va = self.vertex(e.a)?;
            let vb = self.vertex(e.b)?;
            (va.x, va.y, vb.x, vb.y)
        };
        let (x, y) = match at {
            Some((x, y)) => {
                if !x.is_finite() || !y.is_finite() {
                    return Err(GraphError::NonFinite);
                }
                (x, y)
            }
            None => ((ax + bx) * 0.5, (ay + by) * 0.5),
        };
        let (index, px, py) = if on_edge {
            // Closest subsegment wins; strict comparison keeps the first
            // found on ties.
            let mut best: Option<(usize, f64, f64, f64)> = None;
            for s in self.subsegments(eid) {
                let (d2, t) = geometry::math::seg_distance_sq(x, y, s.ax, s.ay, s.bx, s.by);
                if best.map_or(true, |(_, bd, _, _)| d2 < bd) {
                    best = Some((
                        s.index,
                        d2,
                        s.ax + t * (s.bx - s.ax),
                        s.ay + t * (s.by - s.ay),
                    ));
                }
            }
            match best {
                Some((index, _, px, py)) => (index, px, py),
                None => (0, x, y),
            }
        } else {
            let len = self.get_edge(eid).map(|e| e.bends.len()).unwrap_or(0);
            (len, x, y)
        };
        let was_current = self.crossings_current();
        let new_len = {
            let e = self.edge_mut(eid)?;
            e.bends.insert(
                index,
                Bend {
                    x: px,
                    y: py,
                    size: DEFAULT_BEND_SIZE,
                    color: None,
                },
            );
            e.bends.len()
        };
        if new_len > self.curve_complexity {
            self.curve_complexity = new_len;
        }
        self.bump();
        if update {
            self.maintain_edge(eid);
            self.note_maintained(was_current);
        }
        Ok(BendRef { edge: eid, index })
    }

    pub fn move_bend(
        &mut self,
        bref: BendRef,
        x: f64,
        y: f64,
        update: bool,
    ) -> Result<(), GraphError> {
        if !x.is_finite() || !y.is_finite() {
            return Err(GraphError::NonFinite);
        }
        let was_current = self.crossings_current();
        {
            let edge = self.edge_mut(bref.edge)?;
            let bend = edge.bends.get_mut(bref.index).ok_or(GraphError::BendNotFound {
                edge: bref.edge,
                index: bref.index,
            })?;
            let dx = x - bend.x;
            let dy = y - bend.y;
            if dx * dx + dy * dy <= EPS_POS * EPS_POS {
                return Ok(());
            }
            bend.x = x;
            bend.y = y;
        }
        self.bump();
        if update {
            self.maintain_edge(bref.edge);
            self.note_maintained(was_current);
        }
        Ok(())
    }

    pub fn remove_bend(&mut self, bref: BendRef) -> Result<(), GraphError> {
        let was_current = self.crossings_current();
        {
            let edge = self.edge_mut(bref.edge)?;
            if bref.index >= edge.bends.len() {
                return Err(GraphError::BendNotFound {
                    edge: bref.edge,
                    index: bref.index,
                });
            }
            edge.bends.remove(bref.index);
        }
        self.bump();
        self.maintain_edge(bref.edge);
        self.note_maintained(was_current);
        self.update_curve_complexity();
        Ok(())
    }

    // Crossing maintenance entry points for deferred-update callers.
    pub fn update_crossings(&mut self) {
        algorithms::crossings::recompute_all(self);
        self.crossings_ver = self.geom_ver;
        debug!(
            edges = self.edge_count(),
            crossings = self.crossings.len(),
            "full crossing recompute"
        );
    }

    /// Localized recompute of every crossing involving `eid`. Does not
    /// re-verify pairs the edge is not part of; a deferred batch caller
    /// that touched several edges should prefer [`update_crossings`](Graph::update_crossings).
    pub fn update_crossings_for_edge(&mut self, eid: u32) {
        algorithms::incremental::update_for_edge(self, eid);
    }

    pub fn update_curve_complexity(&mut self) {
        self.curve_complexity = self
            .edges
            .iter()
            .flatten()
            .map(|e| e.bends.len())
            .max()
            .unwrap_or(0);
    }

    // Metrics & queries
    pub fn thrackle_number(&self) -> i64 {
        algorithms::metrics::thrackle_number(self)
    }
    pub fn crossing_categories(&self) -> CrossingCategories {
        algorithms::metrics::categories(self)
    }
    pub fn pick(&self, x: f64, y: f64, tol: f64) -> Option<Pick> {
        algorithms::picking::pick_impl(self, x, y, tol)
    }

    // JSON
    pub fn to_json_value(&self) -> serde_json::Value {
        json::to_json_impl(self)
    }
    pub fn from_json_value(&mut self, v: serde_json::Value) -> Result<(), GraphError> {
        json::from_json_impl(self, v)
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.edges.clear();
        self.crossings.clear();
        self.curve_complexity = 0;
        self.bump();
        self.crossings_ver = self.geom_ver;
    }
}

impl Default for Graph {
    fn default() -> Self {
        Graph::new()
    }
}

impl Clone for Graph {
    // Deep copy. Neighbor links are rebuilt from the edges and the derived
    // caches are recomputed rather than copied, which doubles as a check
    // that the copy is geometrically faithful.
    fn clone(&self) -> Graph {
        let mut g = Graph {
            vertices: self
                .vertices
                .iter()
                .map(|slot| {
                    slot.as_ref().map(|v| Vertex {
                        neighbors: Vec::new(),
                        ..v.clone()
                    })
                })
                .collect(),
            edges: self.edges.clone(),
            crossings: Vec::new(),
            curve_complexity: 0,
            geom_ver: 1,
            crossings_ver: 0,
            self_loops_allowed: self.self_loops_allowed,
            parallel_edges_allowed: self.parallel_edges_allowed,
            update_mode: self.update_mode,
        };
        for i in 0..g.edges.len() {
            let (a, b) = match &g.edges[i] {
                Some(e) => (e.a, e.b),
                None => continue,
            };
            if let Some(Some(v)) = g.vertices.get_mut(a as usize) {
                v.neighbors.push(b);
            }
            if let Some(Some(v)) = g.vertices.get_mut(b as usize) {
                v.neighbors.push(a);
            }
        }
        g.update_crossings();
        g.update_curve_complexity();
        g
    }
}
