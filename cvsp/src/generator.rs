use rand::Rng;

use sepgraph::{GraphError, SepGraph};

/// G(n, p) random graph with nodes labelled `v0..`. Definition files only
/// carry nodes through their edges, so a node that came out isolated gets
/// one random incident edge to keep the export round-trippable.
pub fn gnp<R: Rng>(n: usize, p: f64, rng: &mut R) -> Result<SepGraph, GraphError> {
    let labels: Vec<String> = (0..n).map(|i| format!("v{}", i)).collect();

    let mut edges: Vec<(usize, usize)> = Vec::new();
    for u in 0..n {
        for v in (u + 1)..n {
            if rng.gen_bool(p) {
                edges.push((u, v));
            }
        }
    }

    if n > 1 {
        for u in 0..n {
            if !edges.iter().any(|(a, b)| *a == u || *b == u) {
                let mut v = rng.gen_range(0..n - 1);
                if v >= u {
                    v += 1;
                }
                edges.push((u.min(v), u.max(v)));
            }
        }
    }

    SepGraph::new(labels, false, edges)
}

/// Rows x cols lattice, row-major labels `v0..`.
pub fn grid(rows: usize, cols: usize) -> Result<SepGraph, GraphError> {
    let labels: Vec<String> = (0..rows * cols).map(|i| format!("v{}", i)).collect();

    let mut edges = Vec::new();
    for r in 0..rows {
        for c in 0..cols {
            let i = r * cols + c;
            if c + 1 < cols {
                edges.push((i, i + 1));
            }
            if r + 1 < rows {
                edges.push((i, i + cols));
            }
        }
    }

    SepGraph::new(labels, false, edges)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn grid_has_lattice_shape() {
        let graph = grid(3, 4).unwrap();
        assert_eq!(graph.node_count(), 12);
        // 3 rows of 3 horizontal edges plus 2 rows of 4 vertical edges.
        assert_eq!(graph.edge_count(), 17);
        assert_eq!(graph.connected_components().len(), 1);
    }

    #[test]
    fn generated_graphs_round_trip_through_the_definition_format() {
        let mut rng = StdRng::seed_from_u64(7);
        let graph = gnp(12, 0.2, &mut rng).unwrap();

        assert!(graph.nodes().all(|v| graph.degree(v) > 0));

        let mut buffer = Vec::new();
        graph.write_definition(&mut buffer).unwrap();
        let reparsed = SepGraph::from_reader(buffer.as_slice()).unwrap();
        assert_eq!(reparsed.node_count(), graph.node_count());

        // Indices may be renumbered by appearance order, labels may not.
        let labelled = |g: &SepGraph| -> Vec<(String, String)> {
            g.edges()
                .iter()
                .map(|(u, v)| (g.label(*u).to_owned(), g.label(*v).to_owned()))
                .collect()
        };
        assert_eq!(labelled(&reparsed), labelled(&graph));
    }

    #[test]
    fn same_seed_same_graph() {
        let a = gnp(10, 0.3, &mut StdRng::seed_from_u64(42)).unwrap();
        let b = gnp(10, 0.3, &mut StdRng::seed_from_u64(42)).unwrap();
        assert_eq!(a.edges(), b.edges());
    }
}
