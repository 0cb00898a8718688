//! Territory claiming during setup.
//!
//! The agent opens in an empty continent, backs out of a start shared with
//! too many players, and afterwards grows around its choke points.

use std::cmp::Reverse;
use std::collections::{BTreeSet, VecDeque};

use tracing::{debug, info};

use crate::config::AgentConfig;
use crate::decisions::{main_cluster, SetupState};
use crate::error::{PlannerError, Result};
use crate::map::{ContinentId, TerritoryGraph, TerritoryId};
use crate::priority::ContinentPriority;
use crate::state::Board;

/// Choke-role view of the board used to score claim candidates.
struct ClaimScorer<'b> {
    board: &'b Board<'b>,
    mine_adjacent: BTreeSet<TerritoryId>,
    my_continents: BTreeSet<ContinentId>,
    focus_in: BTreeSet<TerritoryId>,
    focus_out: BTreeSet<TerritoryId>,
    contested_out: BTreeSet<TerritoryId>,
}

impl<'b> ClaimScorer<'b> {
    fn new(board: &'b Board<'b>, focus: &BTreeSet<ContinentId>) -> Self {
        let graph = board.graph();
        let mine = board.my_territories();
        let contested_out = graph
            .continents()
            .filter(|&c| graph.continent_territories(c).any(|t| board.occupier(t).is_some()))
            .flat_map(|c| graph.out_chokes(c).iter().copied())
            .collect();

        Self {
            board,
            mine_adjacent: graph.all_adjacent(&mine),
            my_continents: board.my_continents(),
            focus_in: focus.iter().flat_map(|&c| graph.in_chokes(c).iter().copied()).collect(),
            focus_out: focus.iter().flat_map(|&c| graph.out_chokes(c).iter().copied()).collect(),
            contested_out,
        }
    }

    /// 6 down to 1 by choke role and adjacency; `None` when unrelated.
    fn score(&self, territory: TerritoryId) -> Option<u8> {
        let in_my_continent = self
            .board
            .graph()
            .continent_of(territory)
            .is_some_and(|c| self.my_continents.contains(&c));
        let adjacent = self.mine_adjacent.contains(&territory);

        if self.focus_in.contains(&territory) && self.contested_out.contains(&territory) {
            Some(6)
        } else if self.focus_in.contains(&territory) {
            Some(5)
        } else if in_my_continent && adjacent {
            Some(4)
        } else if in_my_continent {
            Some(3)
        } else if self.focus_out.contains(&territory) {
            Some(2)
        } else if adjacent {
            Some(1)
        } else {
            None
        }
    }

    /// Best-scoring candidate, earliest on ties.
    fn best<'c, I>(&self, candidates: I) -> Option<(TerritoryId, Option<u8>)>
    where
        I: IntoIterator<Item = &'c TerritoryId>,
    {
        candidates
            .into_iter()
            .enumerate()
            .map(|(i, &t)| (i, t, self.score(t)))
            .min_by_key(|&(i, _, score)| (Reverse(score), i))
            .map(|(_, t, score)| (t, score))
    }
}

fn highest_priority_start<'c, I>(
    board: &Board<'_>,
    candidates: I,
    focus: &BTreeSet<ContinentId>,
) -> Option<(TerritoryId, Option<u8>)>
where
    I: IntoIterator<Item = &'c TerritoryId>,
{
    ClaimScorer::new(board, focus).best(candidates)
}

/// Closest member of `targets` to `cluster` by hop count.
fn closest_to_cluster(
    graph: &TerritoryGraph,
    cluster: &[TerritoryId],
    targets: &BTreeSet<TerritoryId>,
) -> Option<TerritoryId> {
    let start = graph.all_adjacent(cluster);
    let mut seen: BTreeSet<TerritoryId> = cluster.iter().copied().chain(start.iter().copied()).collect();
    let mut work: VecDeque<TerritoryId> = start.into_iter().collect();

    while let Some(current) = work.pop_front() {
        if targets.contains(&current) {
            return Some(current);
        }
        for &next in graph.adjacent(current) {
            if seen.insert(next) {
                work.push_back(next);
            }
        }
    }
    None
}

/// Opening claim: an untouched continent in base order, else the least
/// crowded continent that still has room.
fn opening_claim(
    priority: &ContinentPriority,
    board: &Board<'_>,
    unclaimed: &BTreeSet<TerritoryId>,
) -> Option<TerritoryId> {
    let graph = board.graph();
    for &continent in priority.base() {
        let territories: Vec<TerritoryId> = graph.continent_territories(continent).collect();
        if territories.iter().all(|t| unclaimed.contains(t)) {
            return highest_priority_start(board, &territories, &BTreeSet::from([continent])).map(|(t, _)| t);
        }
    }

    let continent = graph
        .continents()
        .filter(|&c| graph.continent_territories(c).any(|t| unclaimed.contains(&t)))
        .min_by_key(|&c| (board.players_in_continent(c).len(), c))?;
    let candidates: Vec<TerritoryId> = graph
        .continent_territories(continent)
        .filter(|t| unclaimed.contains(t))
        .collect();
    highest_priority_start(board, &candidates, &BTreeSet::from([continent])).map(|(t, _)| t)
}

/// Pick an unclaimed territory to claim.
pub fn claim_territory(
    setup: &mut SetupState,
    priority: &ContinentPriority,
    board: &Board<'_>,
    config: &AgentConfig,
) -> Result<TerritoryId> {
    let graph = board.graph();
    let unclaimed = board.owned_by(None);
    let fallback = unclaimed
        .first()
        .copied()
        .ok_or(PlannerError::NoCandidate("territory claim"))?;
    let mine = board.my_territories();

    let mut restart = false;
    if mine.len() == 1 {
        if let Some(continent) = mine.first().and_then(|&t| graph.continent_of(t)) {
            let players = board.players_in_continent(continent).len();
            if players >= config.max_player_continent_start {
                info!(continent, players, "Crowded start, looking elsewhere");
                setup.banned_init = graph.continent_territories(continent).collect();
                restart = true;
            }
        }
    }

    if mine.is_empty() || restart {
        return Ok(opening_claim(priority, board, &unclaimed).unwrap_or(fallback));
    }

    let open: Vec<TerritoryId> = unclaimed.difference(&setup.banned_init).copied().collect();
    if let Some((territory, Some(score))) = highest_priority_start(board, &open, &board.my_continents()) {
        debug!(territory, score, "Claim by choke score");
        return Ok(territory);
    }

    let main = main_cluster(board, &mine);
    let closest = closest_to_cluster(graph, &main, &unclaimed);
    debug!(?closest, "Claim closest to main cluster");
    Ok(closest.unwrap_or(fallback))
}
