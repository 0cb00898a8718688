//! Troop-weighted shortest paths between clusters and the owned frontier.
//!
//! Paths are found with Dijkstra over the territory graph. Entering a
//! territory costs the troops that must be beaten to pass through it, so
//! the cheapest path is the one that loses the fewest troops on the way.
//! All iteration orders are fixed, so results are deterministic.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, BinaryHeap};

use tracing::debug;

use crate::booking::BookingLedger;
use crate::config::AgentConfig;
use crate::difficulty::cluster_difficulty_score;
use crate::map::TerritoryId;
use crate::state::Board;

/// A path from an owned territory to a cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPlan {
    /// Territories from the owned end (`path[0]`) to the cluster.
    pub path: Vec<TerritoryId>,
    /// Accumulated entry weight.
    pub weight: u32,
}

impl PathPlan {
    /// Owned territory the path starts from.
    #[must_use]
    pub fn origin(&self) -> Option<TerritoryId> {
        self.path.first().copied()
    }

    /// Territories past the owned end.
    #[must_use]
    pub fn extension(&self) -> &[TerritoryId] {
        self.path.get(1..).unwrap_or(&[])
    }

    /// `cluster` grown by the extension, original members first.
    ///
    /// Added territories are listed from the cluster outwards.
    #[must_use]
    pub fn extend(&self, cluster: &[TerritoryId]) -> Vec<TerritoryId> {
        let mut members = cluster.to_vec();
        for &t in self.extension().iter().rev() {
            if !members.contains(&t) {
                members.push(t);
            }
        }
        members
    }

    /// Troops at the owned end minus the path weight.
    fn score(&self, board: &Board<'_>) -> i64 {
        let origin = self.origin().map_or(0, |t| board.troops(t));
        i64::from(origin) - i64::from(self.weight)
    }
}

/// A node in the Dijkstra frontier.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
struct FrontierNode {
    weight: u32,
    territory: TerritoryId,
}

impl Ord for FrontierNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap; reverse both keys so the lightest node,
        // then the lowest territory id, pops first.
        match other.weight.cmp(&self.weight) {
            Ordering::Equal => other.territory.cmp(&self.territory),
            ord => ord,
        }
    }
}

impl PartialOrd for FrontierNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Cost of entering `territory` on the way out of `cluster`.
///
/// Free inside the cluster and on owned ground. A single defender costs
/// one; any other garrison, empty ones included, costs one more than its
/// troops.
#[must_use]
pub fn territory_weight(board: &Board<'_>, territory: TerritoryId, cluster: &[TerritoryId]) -> u32 {
    if cluster.contains(&territory) || board.is_mine(territory) {
        return 0;
    }
    match board.troops(territory) {
        1 => 1,
        troops => troops + 1,
    }
}

/// Cheapest path from `cluster[0]` to any territory in `targets`.
///
/// Banned territories are never entered. Returns `None` when no target is
/// reachable or the search exceeds `max_expansions` pops.
#[must_use]
pub fn best_path_to_cluster(
    board: &Board<'_>,
    cluster: &[TerritoryId],
    targets: &BTreeSet<TerritoryId>,
    banned: &BTreeSet<TerritoryId>,
    max_expansions: usize,
) -> Option<PathPlan> {
    let &start = cluster.first()?;
    let graph = board.graph();

    let mut best: BTreeMap<TerritoryId, u32> = BTreeMap::new();
    let mut parent: BTreeMap<TerritoryId, TerritoryId> = BTreeMap::new();
    let mut frontier = BinaryHeap::new();

    let start_weight = territory_weight(board, start, cluster);
    best.insert(start, start_weight);
    frontier.push(FrontierNode {
        weight: start_weight,
        territory: start,
    });

    let mut expansions = 0;
    while let Some(FrontierNode { weight, territory }) = frontier.pop() {
        if targets.contains(&territory) {
            return Some(PathPlan {
                path: walk_back(&parent, territory),
                weight,
            });
        }

        expansions += 1;
        if expansions > max_expansions {
            debug!(start, max_expansions, "Path search exhausted its expansion budget");
            return None;
        }

        if best.get(&territory).is_some_and(|&known| weight > known) {
            continue;
        }

        for &next in graph.adjacent(territory) {
            if banned.contains(&next) {
                continue;
            }
            let candidate = weight + territory_weight(board, next, cluster);
            if best.get(&next).map_or(true, |&known| candidate < known) {
                best.insert(next, candidate);
                parent.insert(next, territory);
                frontier.push(FrontierNode {
                    weight: candidate,
                    territory: next,
                });
            }
        }
    }

    None
}

/// Follow parent links from `end` back to the search start.
fn walk_back(parent: &BTreeMap<TerritoryId, TerritoryId>, end: TerritoryId) -> Vec<TerritoryId> {
    let mut path = vec![end];
    let mut current = end;
    while let Some(&previous) = parent.get(&current) {
        path.push(previous);
        current = previous;
    }
    path
}

/// Best way to bring an owned attacker to `cluster`.
///
/// If the strongest adjacent attacker already covers the cluster after
/// bookings, that attacker alone is the path at weight zero. Otherwise the
/// cheapest path to any owned border competes with the path to the single
/// strongest border, and the higher `troops(path[0]) - weight` wins, the
/// first candidate on ties.
#[must_use]
pub fn best_path_from_score(
    board: &Board<'_>,
    cluster: &[TerritoryId],
    banned: &BTreeSet<TerritoryId>,
    ledger: &BookingLedger,
    config: &AgentConfig,
) -> Option<PathPlan> {
    let mine = board.my_territories();
    let border = board.border_territories(&mine);
    if border.is_empty() {
        return None;
    }

    if let Some(attacker) = board.best_attacker(cluster) {
        let score = cluster_difficulty_score(board, cluster, config);
        if ledger.surplus(attacker, board.troops(attacker)) >= i64::from(score) {
            return Some(PathPlan {
                path: vec![attacker],
                weight: 0,
            });
        }
    }

    let mut candidates = Vec::with_capacity(2);
    if let Some(plan) = best_path_to_cluster(board, cluster, &border, banned, config.max_path_expansions) {
        candidates.push(plan);
    }

    if let Some(strongest) = board.strongest(&border) {
        let only_strongest = BTreeSet::from([strongest]);
        let mut strongest_banned: BTreeSet<TerritoryId> =
            mine.iter().copied().filter(|&t| t != strongest).collect();
        strongest_banned.extend(banned.iter().copied());

        if let Some(plan) = best_path_to_cluster(
            board,
            cluster,
            &only_strongest,
            &strongest_banned,
            config.max_path_expansions,
        ) {
            candidates.push(plan);
        }
    }

    candidates
        .into_iter()
        .reduce(|best, plan| if plan.score(board) > best.score(board) { plan } else { best })
}
