//! Capture cost of a cluster and the troop commitment it calls for.

use crate::config::AgentConfig;
use crate::map::TerritoryId;
use crate::state::Board;

/// Integer cost of capturing every territory in `cluster`.
///
/// Base cost plus all defending troops, plus `territory_score` for each
/// member after the first that holds more than one troop.
#[must_use]
pub fn cluster_difficulty_score(board: &Board<'_>, cluster: &[TerritoryId], config: &AgentConfig) -> u32 {
    cluster
        .iter()
        .enumerate()
        .fold(config.base_difficulty, |score, (index, &territory)| {
            let troops = board.troops(territory);
            if index == 0 || troops <= 1 {
                score + troops
            } else {
                score + troops + config.territory_score
            }
        })
}

/// Signed shortfall of an attacker against `score` after bookings.
///
/// Negative when the attacker already has spare troops.
#[must_use]
pub fn net_cost(score: u32, attacker_troops: u32, booked: u32) -> i64 {
    let surplus = i64::from(attacker_troops) - i64::from(booked);
    i64::from(score) - surplus
}

/// Troops to deploy on an attacker so it can cover `score`.
///
/// `max(score - (attacker_troops - booked), 0)`.
#[must_use]
pub fn recommended_troops(score: u32, attacker_troops: u32, booked: u32) -> u32 {
    u32::try_from(net_cost(score, attacker_troops, booked).max(0)).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::{TerritoryGraph, TERRITORY_COUNT};
    use crate::state::{GameState, PlayerState, TerritoryState};

    fn state_with_troops(troops: &[(TerritoryId, u32)]) -> GameState {
        GameState {
            me: 0,
            territories: (0..TERRITORY_COUNT)
                .map(|t| TerritoryState {
                    territory_id: t,
                    troops: troops
                        .iter()
                        .find(|(id, _)| *id == t)
                        .map_or(1, |(_, n)| *n),
                    occupier: Some(1),
                })
                .collect(),
            players: vec![PlayerState {
                player_id: 0,
                alive: true,
                troops_remaining: 0,
                must_place_territory_bonus: Vec::new(),
            }],
            card_sets_redeemed: 0,
            turn: 0,
            cards: Vec::new(),
        }
    }

    #[test]
    fn test_single_territory_score() {
        let graph = TerritoryGraph::earth();
        let state = state_with_troops(&[(35, 5)]);
        let board = Board::new(&graph, &state).unwrap();
        assert_eq!(cluster_difficulty_score(&board, &[35], &AgentConfig::default()), 8);
    }

    #[test]
    fn test_territory_score_skips_first_and_single_troops() {
        let graph = TerritoryGraph::earth();
        let state = state_with_troops(&[(32, 4), (33, 1), (37, 3)]);
        let board = Board::new(&graph, &state).unwrap();
        // 3 + 4 + 1 + (3 + 2)
        assert_eq!(
            cluster_difficulty_score(&board, &[32, 33, 37], &AgentConfig::default()),
            13
        );
    }

    #[test]
    fn test_score_is_monotone_at_low_troops() {
        let graph = TerritoryGraph::earth();
        let config = AgentConfig::default();
        let mut previous = 0;
        for troops in 0..5 {
            let state = state_with_troops(&[(32, 2), (33, troops)]);
            let board = Board::new(&graph, &state).unwrap();
            let score = cluster_difficulty_score(&board, &[32, 33], &config);
            assert!(score >= previous, "score dropped at {troops} troops");
            previous = score;
        }
    }

    #[test]
    fn test_recommended_troops_clamps_at_zero() {
        assert_eq!(recommended_troops(8, 10, 0), 0);
        assert_eq!(recommended_troops(8, 2, 0), 6);
        assert_eq!(recommended_troops(8, 10, 6), 4);
        assert_eq!(net_cost(8, 10, 0), -2);
    }

    #[test]
    fn test_overbooked_attacker_needs_more() {
        // Bookings beyond the stack raise the requirement.
        assert_eq!(recommended_troops(5, 3, 8), 10);
    }
}
