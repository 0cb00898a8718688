//! Connected-component decomposition and cut-node ordering.
//!
//! A cluster is a connected set of territories under adjacency, restricted
//! to some membership set (a player's holdings, the unowned part of a
//! continent). Clusters are always recomputed from the live snapshot.

use std::collections::{BTreeSet, VecDeque};

use crate::map::{TerritoryGraph, TerritoryId};

/// Split `territories` into connected clusters.
///
/// Only edges with both endpoints in `territories` count. Each cluster is
/// seeded from the lowest id not yet visited and lists its members in
/// breadth-first order.
#[must_use]
pub fn build_clusters(
    graph: &TerritoryGraph,
    territories: &BTreeSet<TerritoryId>,
) -> Vec<Vec<TerritoryId>> {
    let mut unseen = territories.clone();
    let mut clusters = Vec::new();

    while let Some(seed) = unseen.pop_first() {
        let mut cluster = vec![seed];
        let mut work = VecDeque::from([seed]);

        while let Some(current) = work.pop_front() {
            for &next in graph.adjacent(current) {
                if unseen.remove(&next) {
                    cluster.push(next);
                    work.push_back(next);
                }
            }
        }
        clusters.push(cluster);
    }

    clusters
}

/// Number of `cluster` members adjacent to `territory`.
#[must_use]
pub fn neighbours_in_cluster(
    graph: &TerritoryGraph,
    territory: TerritoryId,
    cluster: &[TerritoryId],
) -> usize {
    graph
        .adjacent(territory)
        .iter()
        .filter(|n| cluster.contains(n))
        .count()
}

/// Whether capturing `target` would split the rest of `cluster` in two.
///
/// A territory outside the cluster, or with at most one in-cluster
/// neighbour, is never a cut node.
#[must_use]
pub fn is_cut_node(graph: &TerritoryGraph, cluster: &[TerritoryId], target: TerritoryId) -> bool {
    if !cluster.contains(&target) || neighbours_in_cluster(graph, target, cluster) <= 1 {
        return false;
    }

    let rest: BTreeSet<TerritoryId> = cluster.iter().copied().filter(|&t| t != target).collect();
    build_clusters(graph, &rest).len() > 1
}

/// Order attack candidates so the remaining frontier stays connected.
///
/// Candidates with fewer in-cluster neighbours come first (stable), then
/// non-cut nodes are moved ahead of cut nodes.
#[must_use]
pub fn sort_attack_priority(
    graph: &TerritoryGraph,
    cluster: &[TerritoryId],
    candidates: &[TerritoryId],
) -> Vec<TerritoryId> {
    let mut sorted = candidates.to_vec();
    sorted.sort_by_key(|&t| neighbours_in_cluster(graph, t, cluster));

    let (safe, cut): (Vec<TerritoryId>, Vec<TerritoryId>) = sorted
        .into_iter()
        .partition(|&t| !is_cut_node(graph, cluster, t));

    safe.into_iter().chain(cut).collect()
}
