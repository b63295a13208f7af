use hashbrown::HashSet;

use crate::NodeId;

/// Bron-Kerbosch with pivoting over the undirected adjacency.
pub(crate) fn maximal_cliques(adjacency: &[HashSet<NodeId>]) -> Vec<Vec<NodeId>> {
    if adjacency.is_empty() {
        return Vec::new();
    }

    let mut cliques = Vec::new();
    let mut current = Vec::new();
    let mut candidates: HashSet<NodeId> = (0..adjacency.len()).collect();
    let mut excluded: HashSet<NodeId> = HashSet::new();

    expand(
        adjacency,
        &mut current,
        &mut candidates,
        &mut excluded,
        &mut cliques,
    );

    cliques.sort();
    cliques
}

fn expand(
    adjacency: &[HashSet<NodeId>],
    current: &mut Vec<NodeId>,
    candidates: &mut HashSet<NodeId>,
    excluded: &mut HashSet<NodeId>,
    cliques: &mut Vec<Vec<NodeId>>,
) {
    if candidates.is_empty() && excluded.is_empty() {
        let mut clique = current.clone();
        clique.sort_unstable();
        cliques.push(clique);
        return;
    }

    // Pivot on the node covering the most candidates, so only
    // its non-neighbours have to be branched on.
    let pivot = candidates
        .iter()
        .chain(excluded.iter())
        .max_by_key(|u| {
            adjacency[**u]
                .iter()
                .filter(|w| candidates.contains(*w))
                .count()
        })
        .copied()
        .expect("either set is non-empty");

    let mut branch: Vec<NodeId> = candidates
        .iter()
        .filter(|v| !adjacency[pivot].contains(*v))
        .copied()
        .collect();
    branch.sort_unstable();

    for v in branch {
        current.push(v);
        let mut next_candidates: HashSet<NodeId> = candidates
            .iter()
            .filter(|w| adjacency[v].contains(*w))
            .copied()
            .collect();
        let mut next_excluded: HashSet<NodeId> = excluded
            .iter()
            .filter(|w| adjacency[v].contains(*w))
            .copied()
            .collect();
        expand(
            adjacency,
            current,
            &mut next_candidates,
            &mut next_excluded,
            cliques,
        );
        current.pop();
        candidates.remove(&v);
        excluded.insert(v);
    }
}
