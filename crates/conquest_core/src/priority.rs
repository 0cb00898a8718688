//! Continent preference order.
//!
//! The base order is fixed at startup and rebased once setup settles on a
//! focus continent. The current order is recomputed from the board before
//! every distribution and attack phase.

use serde::{Deserialize, Serialize};

use crate::map::{ContinentId, TerritoryGraph};
use crate::state::Board;

/// Base, current and owned continent orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContinentPriority {
    base: Vec<ContinentId>,
    current: Vec<ContinentId>,
    owned: Vec<ContinentId>,
}

impl ContinentPriority {
    /// Start from the graph's default preference.
    #[must_use]
    pub fn new(graph: &TerritoryGraph) -> Self {
        let base = graph.base_priority();
        Self {
            current: base.clone(),
            base,
            owned: Vec::new(),
        }
    }

    /// Base preference, highest first.
    #[must_use]
    pub fn base(&self) -> &[ContinentId] {
        &self.base
    }

    /// Current attack preference, highest first.
    #[must_use]
    pub fn current(&self) -> &[ContinentId] {
        &self.current
    }

    /// Continents wholly owned at the last refresh.
    #[must_use]
    pub fn owned(&self) -> &[ContinentId] {
        &self.owned
    }

    /// Owned continents followed by the current preference.
    #[must_use]
    pub fn owned_and_current(&self) -> Vec<ContinentId> {
        self.owned.iter().chain(&self.current).copied().collect()
    }

    /// Make `focus` and its neighbours the base preference.
    pub fn rebase(&mut self, graph: &TerritoryGraph, focus: ContinentId) {
        self.base = std::iter::once(focus)
            .chain(graph.continent_neighbours(focus).iter().copied())
            .collect();
    }

    /// Recompute the current order from the board.
    ///
    /// With owned continents, their neighbours come first (by static
    /// priority score), followed by the rest of the base order. Without any,
    /// the most-owned continent leads, followed by its neighbours.
    pub fn refresh(&mut self, board: &Board<'_>) {
        let graph = board.graph();
        self.owned = board.owned_continents();

        if self.owned.is_empty() {
            let Some(top) = board.most_owned_continent() else {
                self.current = self.base.clone();
                return;
            };
            let mut neighbours = graph.continent_neighbours(top).to_vec();
            neighbours.sort_by_key(|&c| graph.priority_score(c));
            self.current = std::iter::once(top).chain(neighbours).collect();
            return;
        }

        let mut adjacent: Vec<ContinentId> = self
            .owned
            .iter()
            .flat_map(|&c| graph.continent_neighbours(c).iter().copied())
            .filter(|c| !self.owned.contains(c))
            .collect();
        adjacent.sort_by_key(|&c| (graph.priority_score(c), c));
        adjacent.dedup();

        for &c in &self.base {
            if !adjacent.contains(&c) && !self.owned.contains(&c) {
                adjacent.push(c);
            }
        }
        self.current = adjacent;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::TERRITORY_COUNT;
    use crate::state::{GameState, PlayerState, TerritoryState};

    fn state(mine: impl Fn(usize) -> bool) -> GameState {
        GameState {
            me: 0,
            territories: (0..TERRITORY_COUNT)
                .map(|t| TerritoryState {
                    territory_id: t,
                    troops: 1,
                    occupier: Some(if mine(t) { 0 } else { 1 }),
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
    fn test_rebase_puts_focus_first() {
        let graph = TerritoryGraph::earth();
        let mut priority = ContinentPriority::new(&graph);
        assert_eq!(priority.base(), &[3, 5, 0, 4, 1, 2]);
        priority.rebase(&graph, 4);
        assert_eq!(priority.base(), &[4, 3, 1, 2]);
    }

    #[test]
    fn test_refresh_with_owned_continent() {
        let graph = TerritoryGraph::earth();
        let st = state(|t| (28..32).contains(&t));
        let board = Board::new(&graph, &st).unwrap();
        let mut priority = ContinentPriority::new(&graph);
        priority.refresh(&board);

        assert_eq!(priority.owned(), &[3]);
        // Neighbours of South America by score: North America (3), Africa (4).
        assert_eq!(priority.current(), &[0, 4, 5, 1, 2]);
        assert_eq!(priority.owned_and_current(), vec![3, 0, 4, 5, 1, 2]);
    }

    #[test]
    fn test_refresh_without_owned_continent() {
        let graph = TerritoryGraph::earth();
        // Two of four Australian territories, one of nine North American.
        let st = state(|t| t == 38 || t == 39 || t == 0);
        let board = Board::new(&graph, &st).unwrap();
        let mut priority = ContinentPriority::new(&graph);
        priority.refresh(&board);

        assert!(priority.owned().is_empty());
        assert_eq!(priority.current(), &[5, 2]);
    }
}
