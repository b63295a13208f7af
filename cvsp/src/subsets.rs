use itertools::Itertools;

use sepgraph::NodeId;

/// All non-empty subsets of `0..n`, by ascending size and lexicographically
/// within a size. The order only depends on `n`, which keeps the generated
/// constraint systems reproducible across runs.
pub fn nonempty_subsets(n: usize) -> impl Iterator<Item = Vec<NodeId>> {
    (1..=n).flat_map(move |size| (0..n).combinations(size))
}

/// The candidate universe of the cover formulations: every non-empty subset
/// except the full node set.
pub fn proper_subsets(n: usize) -> impl Iterator<Item = Vec<NodeId>> {
    (1..n).flat_map(move |size| (0..n).combinations(size))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hashbrown::HashSet;

    #[test]
    fn yields_every_nonempty_subset_once() {
        for n in 1..=5 {
            let subsets: Vec<Vec<NodeId>> = nonempty_subsets(n).collect();
            let distinct: HashSet<Vec<NodeId>> = subsets.iter().cloned().collect();
            assert_eq!(subsets.len(), (1 << n) - 1);
            assert_eq!(distinct.len(), subsets.len());
        }
    }

    #[test]
    fn proper_subsets_drop_only_the_full_set() {
        let subsets: Vec<Vec<NodeId>> = proper_subsets(4).collect();
        assert_eq!(subsets.len(), (1 << 4) - 2);
        assert!(subsets.iter().all(|w| w.len() < 4));
    }

    #[test]
    fn order_is_size_then_lexicographic() {
        let subsets: Vec<Vec<NodeId>> = nonempty_subsets(3).collect();
        assert_eq!(
            subsets,
            vec![
                vec![0],
                vec![1],
                vec![2],
                vec![0, 1],
                vec![0, 2],
                vec![1, 2],
                vec![0, 1, 2],
            ]
        );
    }
}
