//! Global drawing metrics derived from the graph and its crossing cache.

use serde::Serialize;

use crate::Graph;

/// Partition of the crossing cache, checked in priority order
/// self -> neighbor -> multiple -> legal, so a self-crossing is never
/// double-counted under another category.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CrossingCategories {
    pub self_crossings: usize,
    pub neighbor: usize,
    pub multiple: usize,
    pub legal: usize,
}

impl CrossingCategories {
    pub fn total(&self) -> usize {
        self.self_crossings + self.neighbor + self.multiple + self.legal
    }
}

/// Upper bound on the number of pairwise crossings any simple drawing of
/// this graph's combinatorial structure can realize:
/// `(E(E+1) - sum(deg(v)^2)) / 2`.
pub fn thrackle_number(g: &Graph) -> i64 {
    let e = g.edge_count() as i64;
    let deg_sq: i64 = g
        .vertices()
        .map(|(_, v)| {
            let d = v.degree() as i64;
            d * d
        })
        .sum();
    (e * (e + 1) - deg_sq) / 2
}

pub fn categories(g: &Graph) -> CrossingCategories {
    let mut out = CrossingCategories::default();
    for c in g.crossings() {
        if c.self_crossing {
            out.self_crossings += 1;
        } else if !c.legal {
            out.neighbor += 1;
        } else if c.more_than_once {
            out.multiple += 1;
        } else {
            out.legal += 1;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use crate::Graph;

    #[test]
    fn thrackle_bound_of_a_path() {
        // Path on 4 vertices: degrees 1,2,2,1 -> (3*4 - 10) / 2 = 1.
        let mut g = Graph::new();
        let a = g.add_vertex(0.0, 0.0);
        let b = g.add_vertex(10.0, 0.0);
        let c = g.add_vertex(20.0, 0.0);
        let d = g.add_vertex(30.0, 0.0);
        g.add_edge(a, b, true).unwrap();
        g.add_edge(b, c, true).unwrap();
        g.add_edge(c, d, true).unwrap();
        assert_eq!(g.thrackle_number(), 1);
    }

    #[test]
    fn thrackle_bound_of_empty_graph() {
        let g = Graph::new();
        assert_eq!(g.thrackle_number(), 0);
    }
}
