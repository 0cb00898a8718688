//! Property-based testing strategies.

use std::collections::BTreeSet;

use conquest_core::map::{TerritoryId, TERRITORY_COUNT};
use conquest_core::state::{GameState, PlayerId};
use proptest::prelude::*;

use crate::fixtures::{GameStateBuilder, ME};

/// Any subset of the board.
pub fn arb_territory_set() -> impl Strategy<Value = BTreeSet<TerritoryId>> {
    proptest::collection::btree_set(0..TERRITORY_COUNT, 0..30)
}

/// A fully claimed board split between `players` players, the agent owning
/// at least one territory.
pub fn arb_claimed_board(players: PlayerId) -> impl Strategy<Value = GameState> {
    let players = players.max(2);
    (
        proptest::collection::vec((0..players, 1_u32..12), TERRITORY_COUNT),
        0_u32..10,
        0_u32..20,
    )
        .prop_map(move |(cells, card_sets, deployable)| {
            let ids: Vec<PlayerId> = (0..players).collect();
            let builder = cells
                .into_iter()
                .enumerate()
                .fold(GameStateBuilder::new(&ids), |builder, (t, (owner, troops))| {
                    builder.territory(t, owner, troops)
                });
            let mut state = builder
                .card_sets_redeemed(card_sets)
                .troops_remaining(ME, deployable)
                .build();
            if state.territories.iter().all(|t| t.occupier != Some(ME)) {
                state.territories[0].occupier = Some(ME);
            }
            state
        })
}
