//! Initial troop placement during setup.
//!
//! Troops go first to the focus continent's exposed in-chokes, then to the
//! attackers of the setup clusters, one troop per request.

use std::collections::BTreeSet;

use tracing::debug;

use crate::cluster::build_clusters;
use crate::config::AgentConfig;
use crate::decisions::SetupState;
use crate::difficulty::cluster_difficulty_score;
use crate::error::{PlannerError, Result};
use crate::map::{ContinentId, TerritoryId};
use crate::priority::ContinentPriority;
use crate::state::Board;
use crate::target::{ClusterKind, TargetCluster};

/// Owned in-chokes on the border, plus the lone owned out-choke flanking
/// each interior in-choke.
fn guarded_territories(board: &Board<'_>, focus: ContinentId, mine: &BTreeSet<TerritoryId>) -> Vec<TerritoryId> {
    let graph = board.graph();
    let border = board.border_territories(mine);
    let owned_out: BTreeSet<TerritoryId> = graph
        .out_chokes(focus)
        .iter()
        .copied()
        .filter(|t| mine.contains(t))
        .collect();

    let mut guarded: Vec<TerritoryId> = graph
        .in_chokes(focus)
        .iter()
        .copied()
        .filter(|t| border.contains(t))
        .collect();

    for &choke in graph.in_chokes(focus) {
        if !mine.contains(&choke) || border.contains(&choke) {
            continue;
        }
        let flanking: Vec<TerritoryId> = graph
            .adjacent(choke)
            .iter()
            .copied()
            .filter(|t| owned_out.contains(t))
            .collect();
        if flanking.len() <= 1 {
            for t in flanking {
                if !guarded.contains(&t) {
                    guarded.push(t);
                }
            }
        }
    }
    guarded
}

fn setup_cluster(id: usize, members: Vec<TerritoryId>, attacker: TerritoryId, continent: ContinentId) -> TargetCluster {
    TargetCluster {
        id: u32::try_from(id).unwrap_or(u32::MAX),
        original: members.clone(),
        members,
        attacker,
        difficulty: 0,
        recommended_troops: 0,
        kind: ClusterKind::Continent,
        continent: Some(continent),
        committed: false,
    }
}

/// Clusters to stack initial troops against.
///
/// While the focus continent is incomplete these are its unowned clusters,
/// each paired with an attacker that is not itself a guarded choke where
/// possible. Once it is complete, the cheapest neighbouring continent.
fn seed_clusters(
    board: &Board<'_>,
    focus: ContinentId,
    guarded: &[TerritoryId],
    config: &AgentConfig,
) -> Vec<TargetCluster> {
    let graph = board.graph();
    let unowned_in = |continent: ContinentId| -> BTreeSet<TerritoryId> {
        graph
            .continent_territories(continent)
            .filter(|&t| !board.is_mine(t))
            .collect()
    };

    if !board.owns_continent(focus) {
        return build_clusters(graph, &unowned_in(focus))
            .into_iter()
            .enumerate()
            .filter_map(|(id, cluster)| {
                let candidates = board.adjacent_owned(&cluster);
                let attacker = candidates
                    .iter()
                    .find(|t| !guarded.contains(t))
                    .or_else(|| candidates.first())
                    .copied()?;
                Some(setup_cluster(id, cluster, attacker, focus))
            })
            .collect();
    }

    let next = graph
        .continent_neighbours(focus)
        .iter()
        .copied()
        .map(|c| (c, unowned_in(c).into_iter().collect::<Vec<_>>()))
        .filter(|(_, unowned)| !unowned.is_empty())
        .min_by_key(|(c, unowned)| (cluster_difficulty_score(board, unowned, config), *c));

    next.and_then(|(continent, unowned)| {
        let attacker = board.best_attacker(&unowned)?;
        Some(vec![setup_cluster(0, unowned, attacker, continent)])
    })
    .unwrap_or_default()
}

/// Pick the territory to receive one initial troop.
pub fn place_initial_troop(
    setup: &mut SetupState,
    priority: &mut ContinentPriority,
    board: &Board<'_>,
    config: &AgentConfig,
) -> Result<TerritoryId> {
    let mine = board.my_territories();
    let fallback = board
        .strongest(&board.border_territories(&mine))
        .or_else(|| board.strongest(&mine))
        .ok_or(PlannerError::NoCandidate("initial placement"))?;

    let graph = board.graph();
    let focus = board
        .most_owned_continent()
        .ok_or(PlannerError::NoCandidate("initial placement"))?;
    priority.rebase(graph, focus);

    let guarded = guarded_territories(board, focus, &mine);
    if let Some(&territory) = guarded
        .iter()
        .find(|&&t| board.troops(t) < config.init_min_troops)
    {
        debug!(territory, focus, "Topping up choke");
        return Ok(territory);
    }

    if setup.initial_clusters.is_empty() {
        setup.initial_clusters = seed_clusters(board, focus, &guarded, config).into();
    }
    if setup.initial_clusters.is_empty() {
        return Ok(fallback);
    }
    setup.initial_clusters.rotate_left(1);

    let mut hardest: Option<(u32, TerritoryId)> = None;
    for target in &setup.initial_clusters {
        let difficulty = cluster_difficulty_score(board, &target.members, config);
        if difficulty > board.troops(target.attacker) {
            debug!(attacker = target.attacker, difficulty, "Stacking setup attacker");
            return Ok(target.attacker);
        }
        if difficulty > hardest.map_or(0, |(d, _)| d) {
            hardest = Some((difficulty, target.attacker));
        }
    }
    Ok(hardest.map_or(fallback, |(_, attacker)| attacker))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decisions::fixture::snapshot;
    use crate::map::TerritoryGraph;

    #[test]
    fn test_exposed_in_choke_first() {
        let graph = TerritoryGraph::earth();
        let st = snapshot(&[0, 1], |t| Some(u32::from(!(38..42).contains(&t))), |_| 1);
        let board = Board::new(&graph, &st).unwrap();

        let mut setup = SetupState::default();
        let mut priority = ContinentPriority::new(&graph);
        let placed = place_initial_troop(&mut setup, &mut priority, &board, &AgentConfig::default()).unwrap();

        assert_eq!(placed, 40);
        assert_eq!(priority.base(), &[5, 2]);
    }

    #[test]
    fn test_complete_continent_stacks_towards_neighbour() {
        let graph = TerritoryGraph::earth();
        let st = snapshot(
            &[0, 1],
            |t| Some(u32::from(!(38..42).contains(&t))),
            |t| if t == 40 { 5 } else { 1 },
        );
        let board = Board::new(&graph, &st).unwrap();

        let mut setup = SetupState::default();
        let mut priority = ContinentPriority::new(&graph);
        let placed = place_initial_troop(&mut setup, &mut priority, &board, &AgentConfig::default()).unwrap();

        assert_eq!(placed, 40);
        assert_eq!(setup.initial_clusters.len(), 1);
        assert_eq!(setup.initial_clusters[0].continent, Some(2));
    }

    #[test]
    fn test_unowned_cluster_gets_unguarded_attacker() {
        let graph = TerritoryGraph::earth();
        let st = snapshot(
            &[0, 1],
            |t| Some(u32::from(!matches!(t, 38 | 39 | 41))),
            |t| if t == 40 { 4 } else { 5 },
        );
        let board = Board::new(&graph, &st).unwrap();

        let mut setup = SetupState::default();
        let mut priority = ContinentPriority::new(&graph);
        let config = AgentConfig::default();
        assert_eq!(place_initial_troop(&mut setup, &mut priority, &board, &config).unwrap(), 39);
        assert_eq!(place_initial_troop(&mut setup, &mut priority, &board, &config).unwrap(), 39);
        assert_eq!(setup.initial_clusters[0].members, vec![40]);
    }

    #[test]
    fn test_nothing_owned_is_an_error() {
        let graph = TerritoryGraph::earth();
        let st = snapshot(&[0, 1], |_| Some(1), |_| 1);
        let board = Board::new(&graph, &st).unwrap();
        let mut priority = ContinentPriority::new(&graph);
        assert_eq!(
            place_initial_troop(
                &mut SetupState::default(),
                &mut priority,
                &board,
                &AgentConfig::default()
            ),
            Err(PlannerError::NoCandidate("initial placement"))
        );
    }
}
