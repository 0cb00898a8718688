//! Tunable decision constants.
//!
//! Every threshold the planner and the turn handlers consult lives in
//! [`AgentConfig`]. The defaults are the tuned values the agent ships with;
//! a RON file can override any subset of them.

use serde::{Deserialize, Serialize};

/// All agent tunables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Troops kept on an in-choke border after a capture before the mid game.
    pub min_choke_troops: u32,
    /// Minimum attacker troops against a defender holding more than one troop.
    pub min_attack_troops: u32,
    /// Minimum attacker troops against a single-troop defender.
    pub min_attack_single: u32,
    /// Required troop advantage over a multi-troop defender.
    pub min_attack_troop_diff: u32,
    /// Upper bound on troops committed to one attack roll.
    pub max_attack_troops: u32,
    /// Players sharing a starting continent before it is abandoned.
    pub max_player_continent_start: usize,
    /// Target troop count on focus-continent chokes during setup.
    pub init_min_troops: u32,
    /// Troops left behind after late-game captures.
    pub late_min_troops: u32,
    /// Share of new troops held back for defence in the late game, in percent.
    pub defense_percent: u32,
    /// Extra difficulty charged per defended territory after the first.
    pub territory_score: u32,
    /// Base difficulty of any cluster.
    pub base_difficulty: u32,
    /// Card sets redeemed after which the game counts as late.
    pub late_game_card_sets: u32,
    /// Recorded moves before which early-game rules apply.
    pub mid_game_turn: u32,
    /// Remaining players at or below which the endgame override applies.
    pub endgame_players: usize,
    /// Most troops a defender may roll with.
    pub max_defend_troops: u32,
    /// Hand size that forces a card redemption.
    pub forced_redeem_hand_size: usize,
    /// Node expansion cap for a single path search.
    pub max_path_expansions: usize,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            min_choke_troops: 4,
            min_attack_troops: 5,
            min_attack_single: 3,
            min_attack_troop_diff: 2,
            max_attack_troops: 3,
            max_player_continent_start: 2,
            init_min_troops: 4,
            late_min_troops: 1,
            defense_percent: 50,
            territory_score: 2,
            base_difficulty: 3,
            late_game_card_sets: 5,
            mid_game_turn: 0,
            endgame_players: 2,
            max_defend_troops: 2,
            forced_redeem_hand_size: 5,
            max_path_expansions: 4096,
        }
    }
}
