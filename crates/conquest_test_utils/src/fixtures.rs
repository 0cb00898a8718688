//! Test fixtures and helpers.
//!
//! Snapshot builders and canned board positions for consistent testing.

use conquest_core::map::{TerritoryId, TERRITORY_COUNT};
use conquest_core::state::{Card, GameState, PlayerId, PlayerState, TerritoryState};

/// Player id the fixtures use for the agent.
pub const ME: PlayerId = 0;

/// Builder for [`GameState`] snapshots.
///
/// Every territory starts unclaimed with zero troops.
#[derive(Debug, Clone)]
pub struct GameStateBuilder {
    state: GameState,
}

impl GameStateBuilder {
    /// Start a snapshot for `players`, the agent being [`ME`].
    #[must_use]
    pub fn new(players: &[PlayerId]) -> Self {
        Self {
            state: GameState {
                me: ME,
                territories: (0..TERRITORY_COUNT)
                    .map(|territory_id| TerritoryState {
                        territory_id,
                        troops: 0,
                        occupier: None,
                    })
                    .collect(),
                players: players
                    .iter()
                    .map(|&player_id| PlayerState {
                        player_id,
                        alive: true,
                        troops_remaining: 0,
                        must_place_territory_bonus: Vec::new(),
                    })
                    .collect(),
                card_sets_redeemed: 0,
                turn: 0,
                cards: Vec::new(),
            },
        }
    }

    /// Give `territory` to `player` with `troops`.
    #[must_use]
    pub fn territory(mut self, territory: TerritoryId, player: PlayerId, troops: u32) -> Self {
        if let Some(t) = self.state.territories.get_mut(territory) {
            t.occupier = Some(player);
            t.troops = troops;
        }
        self
    }

    /// Give every territory in `territories` to `player` with `troops` each.
    #[must_use]
    pub fn fill<I>(self, territories: I, player: PlayerId, troops: u32) -> Self
    where
        I: IntoIterator<Item = TerritoryId>,
    {
        territories
            .into_iter()
            .fold(self, |builder, t| builder.territory(t, player, troops))
    }

    /// Set the troops `player` still has to place.
    #[must_use]
    pub fn troops_remaining(mut self, player: PlayerId, troops: u32) -> Self {
        if let Some(p) = self.state.players.iter_mut().find(|p| p.player_id == player) {
            p.troops_remaining = troops;
        }
        self
    }

    /// Mark `player` as eliminated.
    #[must_use]
    pub fn eliminated(mut self, player: PlayerId) -> Self {
        if let Some(p) = self.state.players.iter_mut().find(|p| p.player_id == player) {
            p.alive = false;
        }
        self
    }

    /// Set the number of card sets redeemed so far.
    #[must_use]
    pub fn card_sets_redeemed(mut self, sets: u32) -> Self {
        self.state.card_sets_redeemed = sets;
        self
    }

    /// Set the move count.
    #[must_use]
    pub fn turn(mut self, turn: u32) -> Self {
        self.state.turn = turn;
        self
    }

    /// Set the agent's hand.
    #[must_use]
    pub fn cards(mut self, cards: Vec<Card>) -> Self {
        self.state.cards = cards;
        self
    }

    /// Finish the snapshot.
    #[must_use]
    pub fn build(self) -> GameState {
        self.state
    }
}

/// Mid-game position: the agent holds South America and Africa, player 1
/// holds North America and Europe, player 2 holds Asia and Australia.
#[must_use]
pub fn mid_game() -> GameState {
    GameStateBuilder::new(&[ME, 1, 2])
        .fill(0..16, 1, 2)
        .fill(16..28, 2, 2)
        .fill(28..38, ME, 3)
        .fill(38..42, 2, 2)
        .territory(29, ME, 9)
        .territory(33, ME, 7)
        .troops_remaining(ME, 8)
        .turn(40)
        .build()
}

/// Late-game position with one weak opponent cornered in Australia.
#[must_use]
pub fn late_game() -> GameState {
    GameStateBuilder::new(&[ME, 1, 2])
        .fill(0..38, ME, 2)
        .fill(38..42, 1, 1)
        .territory(24, ME, 12)
        .fill(9..16, 2, 3)
        .card_sets_redeemed(7)
        .troops_remaining(ME, 10)
        .turn(200)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults_unclaimed() {
        let state = GameStateBuilder::new(&[ME, 1]).build();
        assert_eq!(state.territories.len(), TERRITORY_COUNT);
        assert!(state.territories.iter().all(|t| t.occupier.is_none()));
        assert_eq!(state.players.len(), 2);
    }

    #[test]
    fn test_mid_game_split() {
        let state = mid_game();
        assert_eq!(state.territories[29].troops, 9);
        assert_eq!(state.territories[20].occupier, Some(2));
        assert_eq!(state.my_troops_remaining(), 8);
    }
}
