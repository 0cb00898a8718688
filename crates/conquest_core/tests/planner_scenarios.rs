//! Scenario tests for the four-phase priority cluster generator.

use conquest_core::prelude::*;
use conquest_test_utils::fixtures::{late_game, mid_game, GameStateBuilder, ME};

// =============================================================================
// Player elimination
// =============================================================================

/// Opponent 1 holds only Madagascar; the agent holds everything else.
fn cornered_opponent() -> GameState {
    GameStateBuilder::new(&[ME, 1, 2])
        .fill(0..42, ME, 1)
        .territory(33, ME, 2)
        .territory(35, 1, 5)
        .card_sets_redeemed(6)
        .troops_remaining(ME, 10)
        .build()
}

#[test]
fn test_elimination_books_attacker() {
    let graph = TerritoryGraph::earth();
    let state = cornered_opponent();
    let board = Board::new(&graph, &state).unwrap();
    let config = AgentConfig::default();

    let mut generator = PriorityGenerator::new(&board, &config, 10);
    generator.player_phase();

    let committed = generator.committed();
    assert_eq!(committed.len(), 1);
    assert_eq!(committed[0].kind, ClusterKind::Player);
    assert_eq!(committed[0].attacker, 33);
    assert_eq!(committed[0].difficulty, 8);
    assert_eq!(committed[0].recommended_troops, 6);
    assert_eq!(generator.ledger().booked(33), 8);
    assert_eq!(generator.budget(), 4);
}

#[test]
fn test_elimination_rolls_back_when_unaffordable() {
    let graph = TerritoryGraph::earth();
    let state = cornered_opponent();
    let board = Board::new(&graph, &state).unwrap();
    let config = AgentConfig::default();

    let mut generator = PriorityGenerator::new(&board, &config, 5);
    generator.player_phase();

    assert!(generator.committed().is_empty());
    assert!(generator.ledger().is_empty());
    assert_eq!(generator.budget(), 5);
}

#[test]
fn test_booked_attacker_is_not_counted_twice() {
    let graph = TerritoryGraph::earth();
    let state = cornered_opponent();
    let board = Board::new(&graph, &state).unwrap();
    let config = AgentConfig::default();

    // Africa's only unowned cluster is Madagascar again, now against a
    // booked attacker: recommendation 8 - 2 + 8 exceeds the remaining 4.
    let clusters = generate_priority_clusters(&board, &config, 10).unwrap();
    assert_eq!(clusters.len(), 1);
    assert_eq!(clusters[0].kind, ClusterKind::Player);
}

#[test]
fn test_no_elimination_before_late_game() {
    let graph = TerritoryGraph::earth();
    let mut state = cornered_opponent();
    state.card_sets_redeemed = 5;
    let board = Board::new(&graph, &state).unwrap();
    let config = AgentConfig::default();

    let mut generator = PriorityGenerator::new(&board, &config, 10);
    generator.player_phase();
    assert!(generator.committed().is_empty());
}

#[test]
fn test_late_game_fixture_targets_weak_player() {
    let graph = TerritoryGraph::earth();
    let state = late_game();
    let board = Board::new(&graph, &state).unwrap();
    let config = AgentConfig::default();

    let clusters = generate_priority_clusters(&board, &config, state.my_troops_remaining()).unwrap();
    let first = clusters.first().unwrap();
    assert_eq!(first.kind, ClusterKind::Player);
    assert!(first.members.iter().all(|t| (38..42).contains(t)));
    assert_eq!(first.attacker, 24);
}

// =============================================================================
// Disruption and forced fallback
// =============================================================================

/// Agent holds South America with single troops; player 2 holds the rest
/// of the world with 3 troops; player 1 holds Australia with 1 troop.
fn boxed_in(siam: Option<u32>) -> GameState {
    let builder = GameStateBuilder::new(&[ME, 1, 2, 3])
        .fill(0..28, 2, 3)
        .fill(28..32, ME, 1)
        .fill(32..38, 2, 3)
        .fill(38..42, 1, 1);
    match siam {
        Some(troops) => builder.territory(24, ME, troops).build(),
        None => builder.build(),
    }
}

#[test]
fn test_cheap_disruption_is_committed() {
    let graph = TerritoryGraph::earth();
    let state = boxed_in(Some(10));
    let board = Board::new(&graph, &state).unwrap();
    let config = AgentConfig::default();

    let clusters = generate_priority_clusters(&board, &config, 0).unwrap();
    assert_eq!(clusters.len(), 1);
    let disrupt = &clusters[0];
    assert_eq!(disrupt.kind, ClusterKind::Disrupt);
    assert_eq!(disrupt.members, vec![40]);
    assert_eq!(disrupt.attacker, 24);
    assert_eq!(disrupt.continent, Some(5));
    assert_eq!(disrupt.recommended_troops, 0);
}

#[test]
fn test_forced_fallback_when_nothing_fits() {
    let graph = TerritoryGraph::earth();
    let state = boxed_in(None);
    let board = Board::new(&graph, &state).unwrap();
    let config = AgentConfig::default();

    let clusters = generate_priority_clusters(&board, &config, 0).unwrap();
    assert_eq!(clusters.len(), 1);
    let forced = &clusters[0];
    assert_eq!(forced.kind, ClusterKind::Forced);
    assert!(forced.committed);
    assert!(matches!(forced.continent, Some(0 | 4)));
    assert!(board.is_mine(forced.attacker));

    let mut generator = PriorityGenerator::new(&board, &config, 0);
    let ranking = generator.continent_phase();
    let cheapest = ranking.lowest_cost_cluster().unwrap();
    assert_eq!(forced.members, cheapest.members);
    assert_eq!(forced.attacker, cheapest.attacker);
}

#[test]
fn test_empty_candidates_give_empty_plan() {
    let graph = TerritoryGraph::earth();
    let state = GameStateBuilder::new(&[ME, 1, 2]).fill(0..42, 1, 2).build();
    let board = Board::new(&graph, &state).unwrap();

    let clusters = generate_priority_clusters(&board, &AgentConfig::default(), 5).unwrap();
    assert!(clusters.is_empty());
}

// =============================================================================
// Continent takeover
// =============================================================================

#[test]
fn test_affordable_continent_is_committed() {
    let graph = TerritoryGraph::earth();
    let state = mid_game();
    let board = Board::new(&graph, &state).unwrap();
    let config = AgentConfig::default();

    let mut generator = PriorityGenerator::new(&board, &config, 1000);
    let ranking = generator.continent_phase();

    assert!(!ranking.entries.is_empty());
    assert!(ranking.entries.windows(2).all(|w| w[0].net_cost <= w[1].net_cost));
    assert!(ranking.entries.iter().all(|e| e.committed));
    assert!(generator
        .committed()
        .iter()
        .all(|c| c.kind == ClusterKind::Continent && c.continent.is_some()));
}

#[test]
fn test_planning_twice_gives_same_plan() {
    let graph = TerritoryGraph::earth();
    let state = mid_game();
    let board = Board::new(&graph, &state).unwrap();
    let config = AgentConfig::default();

    let first = generate_priority_clusters(&board, &config, 8).unwrap();
    let second = generate_priority_clusters(&board, &config, 8).unwrap();
    assert_eq!(first, second);
    assert!(!first.is_empty());
}
