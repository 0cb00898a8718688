//! Card set redemption.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::AgentConfig;
use crate::state::{Board, Card, Symbol};

/// Why the host asked for a redemption.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RedeemCause {
    /// Start of the agent's turn.
    TurnStarted,
    /// The agent just eliminated a player and took their cards.
    PlayerEliminated,
}

/// Whether three symbols make a set: all alike or all different, with
/// wildcards standing in for anything.
fn is_set(symbols: [Symbol; 3]) -> bool {
    let plain: Vec<Symbol> = symbols
        .into_iter()
        .filter(|&s| s != Symbol::Wildcard)
        .collect();
    match plain.as_slice() {
        [a, b, c] => (a == b && b == c) || (a != b && b != c && a != c),
        _ => true,
    }
}

/// First redeemable set in `cards`, using as few wildcards as possible.
///
/// Among sets with the same wildcard count the earliest in hand order wins.
#[must_use]
pub fn find_card_set(cards: &[Card]) -> Option<[Card; 3]> {
    let n = cards.len();
    for wildcards in 0..=3 {
        for i in 0..n {
            for j in i + 1..n {
                for k in j + 1..n {
                    let set = [cards[i], cards[j], cards[k]];
                    let used = set.iter().filter(|c| c.symbol == Symbol::Wildcard).count();
                    if used == wildcards && is_set(set.map(|c| c.symbol)) {
                        return Some(set);
                    }
                }
            }
        }
    }
    None
}

/// Card sets to redeem, as card id triples.
///
/// A full hand is always traded down. Late in the game every available set
/// is traded at the start of the turn.
#[must_use]
pub fn redeem_cards(board: &Board<'_>, config: &AgentConfig, cause: RedeemCause) -> Vec<[u32; 3]> {
    let redeem_all = cause == RedeemCause::TurnStarted && board.is_late_game(config);
    let mut hand: Vec<Card> = board.state().cards.clone();
    let mut sets = Vec::new();

    while redeem_all || hand.len() >= config.forced_redeem_hand_size {
        let Some(set) = find_card_set(&hand) else {
            break;
        };
        let ids = set.map(|c| c.card_id);
        hand.retain(|c| !ids.contains(&c.card_id));
        sets.push(ids);
    }

    debug!(?cause, sets = sets.len(), left = hand.len(), "Card redemption");
    sets
}
