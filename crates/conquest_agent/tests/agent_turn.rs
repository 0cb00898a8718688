//! End-to-end sessions over the JSON-lines protocol.

use conquest_agent::{AgentRunner, Envelope, Move, Query};
use conquest_core::prelude::*;
use conquest_test_utils::fixtures::{late_game, mid_game, GameStateBuilder, ME};

fn line(state: &GameState, query: Query) -> String {
    let envelope = Envelope {
        state: state.clone(),
        query,
    };
    serde_json::to_string(&envelope).unwrap()
}

fn run_session(lines: &[String]) -> Vec<Move> {
    let input = lines.join("\n");
    let mut output = Vec::new();
    let mut runner = AgentRunner::default();
    runner.run(input.as_bytes(), &mut output).unwrap();

    String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect()
}

// =============================================================================
// Setup
// =============================================================================

#[test]
fn test_setup_round() {
    let empty = GameStateBuilder::new(&[ME, 1, 2]).build();
    let seeded = GameStateBuilder::new(&[ME, 1, 2])
        .fill(0..42, 1, 1)
        .fill(28..32, ME, 1)
        .build();

    let moves = run_session(&[
        line(&empty, Query::ClaimTerritory),
        line(&seeded, Query::PlaceInitialTroop),
    ]);

    assert_eq!(moves[0], Move::ready());
    assert_eq!(moves[1], Move::ClaimTerritory { territory: 29 });
    let Move::PlaceInitialTroop { territory } = moves[2] else {
        panic!("expected a placement, got {:?}", moves[2]);
    };
    assert!((28..32).contains(&territory));
}

// =============================================================================
// A full turn
// =============================================================================

#[test]
fn test_turn_from_cards_to_fortify() {
    let mut state = mid_game();
    let moves = run_session(&[
        line(
            &state,
            Query::RedeemCards {
                cause: RedeemCause::TurnStarted,
            },
        ),
        line(&state, Query::DistributeTroops),
    ]);
    assert_eq!(moves[1], Move::RedeemCards { sets: vec![] });
    let Move::DistributeTroops { distributions } = &moves[2] else {
        panic!("expected a distribution, got {:?}", moves[2]);
    };
    assert_eq!(distributions.values().sum::<u32>(), 8);
    assert!(distributions.keys().all(|&t| state.territories[t].occupier == Some(ME)));

    for (&territory, &troops) in distributions {
        state.territories[territory].troops += troops;
    }
    state.players[0].troops_remaining = 0;

    // A fresh session regenerates the plan from the snapshot alone.
    let moves = run_session(&[
        line(&state, Query::Attack),
        line(&state, Query::Fortify),
    ]);
    match moves[1] {
        Move::Attack {
            attacking_territory,
            defending_territory,
            attacking_troops,
        } => {
            assert_eq!(state.territories[attacking_territory].occupier, Some(ME));
            assert_ne!(state.territories[defending_territory].occupier, Some(ME));
            assert!((1..=3).contains(&attacking_troops));
        }
        Move::AttackPass => {}
        ref other => panic!("expected an attack decision, got {other:?}"),
    }
    assert!(matches!(moves[2], Move::Fortify { .. } | Move::FortifyPass));
}

#[test]
fn test_move_in_never_below_survivors() {
    let state = GameStateBuilder::new(&[ME, 1])
        .fill(0..42, 1, 1)
        .territory(29, ME, 10)
        .territory(36, ME, 3)
        .build();

    let moves = run_session(&[line(
        &state,
        Query::TroopsAfterAttack {
            attacking_territory: 29,
            defending_territory: 36,
            attacking_troops: 3,
        },
    )]);
    let Move::TroopsAfterAttack { troops } = moves[1] else {
        panic!("expected a move-in, got {:?}", moves[1]);
    };
    assert!(troops >= 3 && troops < 10);
}

#[test]
fn test_late_game_redeems_every_set() {
    let mut state = late_game();
    state.cards = vec![
        Card {
            card_id: 1,
            territory_id: Some(0),
            symbol: Symbol::Infantry,
        },
        Card {
            card_id: 2,
            territory_id: Some(1),
            symbol: Symbol::Infantry,
        },
        Card {
            card_id: 3,
            territory_id: Some(2),
            symbol: Symbol::Infantry,
        },
    ];

    let moves = run_session(&[line(
        &state,
        Query::RedeemCards {
            cause: RedeemCause::TurnStarted,
        },
    )]);
    assert_eq!(moves[1], Move::RedeemCards { sets: vec![[1, 2, 3]] });
}

// =============================================================================
// Malformed input
// =============================================================================

#[test]
fn test_bad_lines_do_not_end_session() {
    let state = mid_game();
    let moves = run_session(&[
        "{\"state\":{},\"query\":{\"type\":\"attack\"}}".to_string(),
        line(
            &state,
            Query::Defend {
                attacking_territory: 13,
                defending_territory: 36,
                attacking_troops: 3,
            },
        ),
    ]);
    assert!(matches!(moves[1], Move::Error { .. }));
    assert_eq!(moves[2], Move::Defend { troops: 2 });
}

#[test]
fn test_shipped_config_matches_defaults() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../configs/agent.ron");
    let config = conquest_agent::load_config(path).unwrap();
    assert_eq!(config, AgentConfig::default());
}
