//! Defender dice.

use crate::config::AgentConfig;
use crate::map::TerritoryId;
use crate::state::Board;

/// Troops to defend `defending` with: everything up to the dice limit.
#[must_use]
pub fn defend_troops(board: &Board<'_>, defending: TerritoryId, config: &AgentConfig) -> u32 {
    board.troops(defending).min(config.max_defend_troops)
}
