//! End-of-turn fortification.
//!
//! Pulls the largest interior stack one step towards the front line.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::map::TerritoryId;
use crate::state::Board;
use crate::turn::TurnPlanner;

/// A single fortify move between two adjacent owned territories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FortifyMove {
    /// Territory troops leave.
    pub source: TerritoryId,
    /// Territory troops arrive at.
    pub target: TerritoryId,
    /// Troops moved.
    pub troops: u32,
}

/// First step of the shortest owned path from `source` to any of `goals`.
fn first_step(
    board: &Board<'_>,
    mine: &BTreeSet<TerritoryId>,
    source: TerritoryId,
    goals: &BTreeSet<TerritoryId>,
) -> Option<TerritoryId> {
    let mut came_from: BTreeMap<TerritoryId, TerritoryId> = BTreeMap::new();
    let mut work = VecDeque::from([source]);

    while let Some(current) = work.pop_front() {
        if goals.contains(&current) {
            let mut step = current;
            while let Some(&prev) = came_from.get(&step) {
                if prev == source {
                    return Some(step);
                }
                step = prev;
            }
            return None;
        }
        for &next in board.graph().adjacent(current) {
            if next != source && mine.contains(&next) && !came_from.contains_key(&next) {
                came_from.insert(next, current);
                work.push_back(next);
            }
        }
    }
    None
}

/// Fortify from the strongest interior territory towards the border.
///
/// Ends the turn: the attack plan and per-turn flags are cleared.
pub fn fortify(planner: &mut TurnPlanner, board: &Board<'_>) -> Option<FortifyMove> {
    planner.end_turn();

    let mine = board.my_territories();
    let border = board.border_territories(&mine);
    let interior: BTreeSet<TerritoryId> = mine.difference(&border).copied().collect();

    let source = board.strongest(&interior)?;
    let troops = board.troops(source);
    if troops <= 1 {
        return None;
    }
    let target = first_step(board, &mine, source, &border)?;

    debug!(source, target, troops = troops - 1, "Fortify towards border");
    Some(FortifyMove {
        source,
        target,
        troops: troops - 1,
    })
}
