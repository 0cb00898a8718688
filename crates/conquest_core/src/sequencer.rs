//! Attack sequencer.
//!
//! Drains the turn plan one decision per attack request. Each call either
//! attacks from the current cluster's best attacker or moves on to the next
//! queued cluster, and passes once the queue runs dry.
//!
//! ```text
//!   Idle ──pop──▶ ActiveCluster ──no affordable target──▶ Draining
//!                      ▲                                     │
//!                      └──────────────pop────────────────────┘
//!   queue empty ──▶ Exhausted (pass)
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cluster::sort_attack_priority;
use crate::config::AgentConfig;
use crate::error::{PlannerError, Result};
use crate::generator::generate_priority_clusters;
use crate::map::TerritoryId;
use crate::priority::ContinentPriority;
use crate::state::Board;
use crate::target::{ClusterKind, TargetCluster};
use crate::turn::TurnPlanner;

/// Where the sequencer stands within the attack phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SequencerState {
    /// No cluster selected yet.
    #[default]
    Idle,
    /// Attacking from the current cluster.
    ActiveCluster,
    /// Current cluster abandoned; moving to the next one.
    Draining,
    /// Queue empty; every further request passes.
    Exhausted,
}

/// One attack-phase decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttackDecision {
    /// Attack `defender` from `attacker` with `troops`.
    Attack {
        /// Owned territory attacking.
        attacker: TerritoryId,
        /// Territory under attack.
        defender: TerritoryId,
        /// Troops committed to the roll.
        troops: u32,
    },
    /// Stop attacking this turn.
    Pass,
}

/// Troops to attack with, or `None` if the attack is not worth making.
///
/// A lone defender needs `min_attack_single` attackers; a larger garrison
/// needs `min_attack_troops` and a `min_attack_troop_diff` advantage.
#[must_use]
pub fn attack_troops(attacker_troops: u32, defender_troops: u32, config: &AgentConfig) -> Option<u32> {
    let affordable = if defender_troops <= 1 {
        attacker_troops >= config.min_attack_single
    } else {
        attacker_troops >= config.min_attack_troops
            && attacker_troops >= defender_troops + config.min_attack_troop_diff
    };
    affordable.then(|| config.max_attack_troops.min(attacker_troops.saturating_sub(1)))
}

fn transition(planner: &mut TurnPlanner, next: SequencerState) {
    if planner.state() != next {
        debug!(from = ?planner.state(), to = ?next, "Sequencer transition");
        planner.set_state(next);
    }
}

/// Unowned out-choke of the cluster's continent that borders the cluster,
/// picked in current continent preference order.
fn extra_target(
    cluster: &TargetCluster,
    board: &Board<'_>,
    priority: &ContinentPriority,
) -> Result<Option<TerritoryId>> {
    let wants_extra = matches!(cluster.kind, ClusterKind::Continent | ClusterKind::Forced)
        && !cluster.has_extension();
    let Some(continent) = cluster.continent.filter(|_| wants_extra) else {
        return Ok(None);
    };

    let graph = board.graph();
    let adjacent = graph.all_adjacent(&cluster.members);
    let mut candidates = Vec::new();
    for &choke in graph.out_chokes(continent) {
        if board.is_mine(choke) || !adjacent.contains(&choke) {
            continue;
        }
        let home = graph
            .continent_of(choke)
            .ok_or(PlannerError::UnknownContinent(choke))?;
        candidates.push((choke, home));
    }

    Ok(priority
        .current()
        .iter()
        .find_map(|&c| candidates.iter().find(|(_, home)| *home == c).map(|(t, _)| *t)))
}

/// Pick an attack from `cluster`, or `None` if nothing is affordable.
fn attack_from_cluster(
    cluster: &TargetCluster,
    board: &Board<'_>,
    priority: &ContinentPriority,
    config: &AgentConfig,
) -> Result<Option<AttackDecision>> {
    if cluster.members.iter().all(|&t| board.is_mine(t)) {
        return Ok(None);
    }
    let attacker = board
        .best_attacker(&cluster.members)
        .ok_or(PlannerError::MissingAttacker { cluster_id: cluster.id })?;
    let graph = board.graph();

    let mut frontier = cluster.members.clone();
    let mut candidates: Vec<TerritoryId> = cluster
        .members
        .iter()
        .copied()
        .filter(|&t| graph.are_adjacent(attacker, t) && !board.is_mine(t))
        .collect();

    if let Some(extra) = extra_target(cluster, board, priority)? {
        frontier.push(extra);
        if graph.are_adjacent(attacker, extra) {
            candidates.push(extra);
        }
    }

    let ordered = sort_attack_priority(graph, &frontier, &candidates);
    let attacker_troops = board.troops(attacker);
    Ok(ordered.into_iter().find_map(|defender| {
        attack_troops(attacker_troops, board.troops(defender), config).map(|troops| AttackDecision::Attack {
            attacker,
            defender,
            troops,
        })
    }))
}

/// Answer one attack request.
///
/// Refreshes the continent preference from the board, regenerates a stale
/// plan with no deployable troops, then works through the queue until an
/// affordable attack is found.
pub fn decide_attack(
    planner: &mut TurnPlanner,
    priority: &mut ContinentPriority,
    board: &Board<'_>,
    config: &AgentConfig,
) -> Result<AttackDecision> {
    priority.refresh(board);
    if planner.context().plan_stale {
        let clusters = generate_priority_clusters(board, config, 0)?;
        debug!(clusters = clusters.len(), "Regenerated stale plan");
        planner.install(clusters);
    }

    loop {
        if planner.current().is_none() {
            planner.advance();
        }
        let Some(cluster) = planner.current().cloned() else {
            transition(planner, SequencerState::Exhausted);
            return Ok(AttackDecision::Pass);
        };
        transition(planner, SequencerState::ActiveCluster);

        if cluster.kind == ClusterKind::Forced && planner.context().forced_capture_done {
            debug!(id = cluster.id, "Skipping forced cluster after a capture");
            planner.discard_current();
            transition(planner, SequencerState::Draining);
            continue;
        }

        if let Some(decision) = attack_from_cluster(&cluster, board, priority, config)? {
            let context = planner.context_mut();
            context.attacked_this_turn = true;
            context.cluster_attack_pending = true;
            debug!(id = cluster.id, ?decision, "Attack chosen");
            return Ok(decision);
        }

        debug!(id = cluster.id, "No affordable target left in cluster");
        planner.discard_current();
        transition(planner, SequencerState::Draining);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_defender_needs_three() {
        let config = AgentConfig::default();
        assert_eq!(attack_troops(6, 1, &config), Some(3));
        assert_eq!(attack_troops(3, 1, &config), Some(2));
        assert_eq!(attack_troops(2, 1, &config), None);
        assert_eq!(attack_troops(3, 0, &config), Some(2));
    }

    #[test]
    fn test_garrison_needs_margin() {
        let config = AgentConfig::default();
        assert_eq!(attack_troops(4, 3, &config), None);
        assert_eq!(attack_troops(5, 3, &config), Some(3));
        assert_eq!(attack_troops(5, 4, &config), None);
        assert_eq!(attack_troops(9, 7, &config), Some(3));
    }

    #[test]
    fn test_default_state_is_idle() {
        assert_eq!(SequencerState::default(), SequencerState::Idle);
    }
}
