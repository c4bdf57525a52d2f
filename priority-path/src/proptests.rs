use super::*;

use proptest::prelude::*;

/// Bellman-Ford relaxation to a fixed point; the reference for Dijkstra.
fn reference_distances(n: usize, edges: &[(usize, usize, u64)], source: usize) -> Vec<Option<u64>> {
    let mut dist = vec![None; n];
    dist[source] = Some(0u64);
    for _ in 0..n {
        let mut changed = false;
        for &(from, to, weight) in edges {
            let Some(d) = dist[from] else { continue };
            let Some(candidate) = d.checked_add(weight) else { continue };
            if dist[to].map_or(true, |best| candidate < best) {
                dist[to] = Some(candidate);
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }
    dist
}

fn graph_strategy() -> impl Strategy<Value = (usize, Vec<(usize, usize, u64)>, usize)> {
    (1usize..=12).prop_flat_map(|n| {
        let edge = (0..n, 0..n, 0u64..50);
        (Just(n), prop::collection::vec(edge, 0..=40), 0..n)
    })
}

fn validate_paths(g: &Graph, paths: &ShortestPaths) {
    for node in 0..g.node_count() {
        match (paths.distance(node), paths.path_to(node)) {
            (Some(d), Some(path)) => {
                assert_eq!(path.first(), Some(&paths.source()));
                assert_eq!(path.last(), Some(&node));
                let mut total = 0u64;
                for hop in path.windows(2) {
                    let cheapest = g
                        .neighbors(hop[0])
                        .unwrap()
                        .iter()
                        .filter(|e| e.to == hop[1])
                        .map(|e| e.weight)
                        .min()
                        .expect("path hop must follow an edge");
                    total += cheapest;
                }
                assert_eq!(total, d, "path weight must equal the reported distance");
            }
            (None, None) => {}
            other => panic!("distance and path disagree for node {node}: {other:?}"),
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_dijkstra_matches_bellman_ford((n, edges, source) in graph_strategy()) {
        let g = Graph::from_edges(n, edges.iter().copied()).unwrap();
        let paths = shortest_paths(&g, source).unwrap();
        let expected = reference_distances(n, &edges, source);
        prop_assert_eq!(paths.distances(), expected.as_slice());
        prop_assert_eq!(paths.settled(), paths.distances().iter().flatten().count());
        validate_paths(&g, &paths);
    }

    #[test]
    fn prop_merge_matches_sort(
        mut sources in prop::collection::vec(prop::collection::vec(any::<i16>(), 0..20), 0..8)
    ) {
        for source in &mut sources {
            source.sort_unstable();
        }
        let mut expected: Vec<i16> = sources.iter().flatten().copied().collect();
        expected.sort_unstable();

        let merged: Vec<i16> = merge_sorted(sources).collect();
        prop_assert_eq!(merged, expected);
    }

    #[test]
    fn prop_keyed_merge_is_source_stable(
        mut sources in prop::collection::vec(prop::collection::vec(0u8..5, 0..12), 0..6)
    ) {
        for source in &mut sources {
            source.sort_unstable();
        }
        // Tag each element with (source, position) so the order of ties is visible.
        let tagged: Vec<Vec<(u8, usize, usize)>> = sources
            .iter()
            .enumerate()
            .map(|(s, items)| items.iter().enumerate().map(|(i, &k)| (k, s, i)).collect())
            .collect();
        let mut expected: Vec<(u8, usize, usize)> = tagged.iter().flatten().copied().collect();
        expected.sort_unstable();

        let merged: Vec<(u8, usize, usize)> = merge_sorted_by_key(tagged, |&(k, _, _)| k).collect();
        prop_assert_eq!(merged, expected);
    }
}
