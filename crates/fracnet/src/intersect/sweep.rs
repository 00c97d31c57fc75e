//! All-pairs sweep assembling the intersection network.

use super::pair::{intersect_line_line, intersect_pair, PairIntersection};
use super::types::{Edge, Network};
use crate::geom::{Fracture, Tol};

/// Intersect every unordered fracture pair and assemble the network.
///
/// Segment results become edges; touching results become vertices. Each
/// new segment is also crossed against every edge recorded before it, and
/// those crossings become vertices as well (deduplicated against the full
/// vertex list).
pub fn sweep(fractures: &[Fracture], tol: &Tol) -> Network {
    let mut net = Network::new();
    for i in 0..fractures.len() {
        for j in (i + 1)..fractures.len() {
            match intersect_pair(&fractures[i], &fractures[j], tol) {
                PairIntersection::None => {}
                PairIntersection::Touching(p) => {
                    net.push_vertex(p, tol.eps_point);
                }
                PairIntersection::Segment(a, b) => {
                    let crossings: Vec<_> = net
                        .edges
                        .iter()
                        .filter_map(|e| intersect_line_line(a, b, e.a, e.b, tol))
                        .collect();
                    for p in crossings {
                        net.push_vertex(p, tol.eps_point);
                    }
                    let (id_i, id_j) = (fractures[i].id, fractures[j].id);
                    net.push_edge(Edge {
                        a,
                        b,
                        fractures: (id_i.min(id_j), id_i.max(id_j)),
                    });
                }
            }
        }
    }
    net
}
