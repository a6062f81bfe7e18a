//! Level assignment for the hub subgraph.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::graph::{Classification, DenseGraph};

/// Assign a level to every hub node; leaves and isolated nodes stay
/// unassigned and are handled later.
///
/// Levels come from the subgraph induced by hub nodes: a topological
/// order (smallest index first among ready nodes) gives longest-path
/// levels, then one pull-up pass moves each node directly above its
/// closest successor and one push-down pass moves it directly below its
/// deepest predecessor. The two passes run exactly once each; they are
/// a bounded heuristic, not a fixpoint iteration. Self loops are
/// ignored throughout.
///
/// # Errors
/// Returns the dense index of an unplaceable node if the hub subgraph
/// contains a cycle.
pub(crate) fn assign_levels<N: Copy + Ord>(
    graph: &DenseGraph<N>,
    class: &Classification,
) -> Result<Vec<Option<usize>>, usize> {
    let n = graph.node_count();
    let mut indegree = vec![0usize; n];
    let mut ready = BinaryHeap::new();
    let mut hub_count = 0;

    for v in 0..n {
        if !class.is_hub(v) {
            continue;
        }
        hub_count += 1;
        indegree[v] = hub_preds(graph, class, v).count();
        if indegree[v] == 0 {
            ready.push(Reverse(v));
        }
    }

    let mut level = vec![None; n];
    let mut placed = 0;
    while let Some(Reverse(v)) = ready.pop() {
        let assigned = hub_preds(graph, class, v)
            .filter_map(|p| level[p])
            .map(|l| l + 1)
            .max()
            .unwrap_or(0);
        level[v] = Some(assigned);
        placed += 1;
        for s in hub_succs(graph, class, v).collect::<Vec<_>>() {
            indegree[s] -= 1;
            if indegree[s] == 0 {
                ready.push(Reverse(s));
            }
        }
    }

    if placed != hub_count {
        // every unplaced hub sits on or behind a cycle; report the
        // smallest one
        let stuck = (0..n)
            .find(|&v| class.is_hub(v) && level[v].is_none())
            .unwrap();
        return Err(stuck);
    }

    pull_up(graph, class, &mut level);
    push_down(graph, class, &mut level);
    Ok(level)
}

fn hub_preds<'a, N: Copy + Ord>(
    graph: &'a DenseGraph<N>,
    class: &'a Classification,
    node: usize,
) -> impl Iterator<Item = usize> + 'a {
    graph.preds[node]
        .iter()
        .copied()
        .filter(move |&p| p != node && class.is_hub(p))
}

fn hub_succs<'a, N: Copy + Ord>(
    graph: &'a DenseGraph<N>,
    class: &'a Classification,
    node: usize,
) -> impl Iterator<Item = usize> + 'a {
    graph.succs[node]
        .iter()
        .copied()
        .filter(move |&s| s != node && class.is_hub(s))
}

fn rows_by_level(level: &[Option<usize>]) -> Vec<Vec<usize>> {
    let depth = level.iter().flatten().max().map_or(0, |&m| m + 1);
    let mut rows = vec![Vec::new(); depth];
    for (v, l) in level.iter().enumerate() {
        if let Some(l) = *l {
            rows[l].push(v);
        }
    }
    rows
}

/// Move every node with successors directly above its closest one,
/// deepest level first.
fn pull_up<N: Copy + Ord>(
    graph: &DenseGraph<N>,
    class: &Classification,
    level: &mut [Option<usize>],
) {
    for row in rows_by_level(level).iter().rev() {
        for &v in row {
            let min_succ = hub_succs(graph, class, v).filter_map(|s| level[s]).min();
            if let Some(min_succ) = min_succ {
                level[v] = Some(min_succ.saturating_sub(1));
            }
        }
    }
}

/// Move every node with predecessors directly below its deepest one,
/// shallowest level first.
fn push_down<N: Copy + Ord>(
    graph: &DenseGraph<N>,
    class: &Classification,
    level: &mut [Option<usize>],
) {
    for row in rows_by_level(level).iter() {
        for &v in row {
            let max_pred = hub_preds(graph, class, v).filter_map(|p| level[p]).max();
            if let Some(max_pred) = max_pred {
                level[v] = Some(max_pred + 1);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn diamond_levels() {
        let g = DenseGraph::new(&[], &[(1, 2), (1, 3), (2, 4), (3, 4)]);
        let class = g.classify();
        let levels = assign_levels(&g, &class).unwrap();
        assert_eq!(levels, vec![Some(0), Some(1), Some(1), Some(2)]);
    }

    #[test]
    fn pull_up_moves_sources_toward_their_successors() {
        // hub 1 only reaches level 2, so it is pulled down to level 1;
        // node 5 is a leaf and stays unassigned
        let g = DenseGraph::new(&[], &[(1, 4), (1, 5), (2, 3), (2, 6), (3, 4), (3, 6)]);
        let class = g.classify();
        let levels = assign_levels(&g, &class).unwrap();
        assert_eq!(
            levels,
            vec![Some(1), Some(0), Some(1), Some(2), None, Some(2)]
        );
    }

    #[test]
    fn push_down_rejoins_deep_predecessors() {
        // 5 sits between 1 (level 0) and 6 (level 3); the pull-up pass
        // drags it toward 6 but the push-down pass parks it right
        // below 1 again
        let g = DenseGraph::new(&[], &[(1, 5), (5, 6), (1, 2), (2, 3), (3, 6)]);
        let class = g.classify();
        let levels = assign_levels(&g, &class).unwrap();
        assert_eq!(
            levels,
            vec![Some(0), Some(1), Some(2), Some(1), Some(3)]
        );
    }

    #[test]
    fn leaves_are_not_levelled() {
        let g = DenseGraph::new(&[], &[(1, 2), (2, 3), (3, 4)]);
        let class = g.classify();
        let levels = assign_levels(&g, &class).unwrap();
        assert_eq!(levels, vec![None, Some(0), Some(1), None]);
    }

    #[test]
    fn hub_cycle_is_an_error() {
        let g = DenseGraph::new(&[], &[(1, 2), (2, 3), (3, 1)]);
        let class = g.classify();
        assert_eq!(assign_levels(&g, &class), Err(0));
    }

    #[test]
    fn self_loop_does_not_fake_a_cycle() {
        let g = DenseGraph::new(&[], &[(1, 1), (1, 2), (2, 3), (1, 3)]);
        let class = g.classify();
        let levels = assign_levels(&g, &class).unwrap();
        assert_eq!(levels, vec![Some(0), Some(1), Some(2)]);
    }
}
