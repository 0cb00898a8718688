//! Move-in sizing after a capture.

use tracing::debug;

use crate::config::AgentConfig;
use crate::error::{PlannerError, Result};
use crate::map::TerritoryId;
use crate::state::Board;
use crate::target::ClusterKind;
use crate::turn::TurnPlanner;

/// Troops to move from `attacking` into the captured `defending`.
///
/// Never less than `attacking_troops`, the troops that survived the roll.
/// Troops still booked by queued clusters attacking from the same territory
/// stay behind. Every capture invalidates the plan.
pub fn troops_after_attack(
    planner: &mut TurnPlanner,
    board: &Board<'_>,
    config: &AgentConfig,
    attacking: TerritoryId,
    defending: TerritoryId,
    attacking_troops: u32,
) -> Result<u32> {
    let graph = board.graph();
    if defending >= graph.territory_count() {
        return Err(PlannerError::UnknownTerritory(defending));
    }

    planner.context_mut().forced_capture_done = true;
    let kind = planner.current().map(|c| c.kind);

    let mut booked = 0;
    if planner.context().cluster_attack_pending {
        if let Some(kind) = kind {
            booked = planner
                .queue()
                .iter()
                .filter(|c| c.attacker == attacking && c.kind <= kind && !c.contains(defending))
                .map(|c| c.difficulty)
                .sum();
        }
    }
    planner.reset_plan();
    planner.context_mut().cluster_attack_pending = false;

    let troops = board.troops(attacking);
    let move_in = if matches!(kind, Some(ClusterKind::Forced | ClusterKind::Disrupt)) {
        attacking_troops
    } else if graph.adjacent(defending).iter().all(|&t| board.is_mine(t) || t == attacking) {
        attacking_troops
    } else if board.is_late_game(config) && kind != Some(ClusterKind::Player) {
        troops.saturating_sub(config.late_min_troops).max(attacking_troops)
    } else if is_guarding_choke(board, attacking) && board.is_early_game(config) {
        troops
            .saturating_sub(config.min_choke_troops.max(booked))
            .max(attacking_troops)
    } else {
        troops.saturating_sub(booked.max(1)).max(attacking_troops)
    };

    debug!(attacking, defending, ?kind, booked, move_in, "Move-in after capture");
    Ok(move_in)
}

/// An owned in-choke that still touches a foreign territory.
fn is_guarding_choke(board: &Board<'_>, territory: TerritoryId) -> bool {
    let graph = board.graph();
    let Some(continent) = graph.continent_of(territory) else {
        return false;
    };
    graph.in_chokes(continent).contains(&territory)
        && graph.adjacent(territory).iter().any(|&t| !board.is_mine(t))
}
