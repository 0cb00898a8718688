//! Property tests for cluster decomposition and planning invariants.

use std::collections::BTreeSet;

use conquest_core::prelude::*;
use conquest_test_utils::determinism::{hash_plan, verify_determinism};
use conquest_test_utils::proptest::prelude::*;
use conquest_test_utils::strategies::{arb_claimed_board, arb_territory_set};

proptest! {
    #[test]
    fn test_clusters_partition_input(territories in arb_territory_set()) {
        let graph = TerritoryGraph::earth();
        let clusters = build_clusters(&graph, &territories);

        let mut seen = BTreeSet::new();
        for cluster in &clusters {
            for &t in cluster {
                prop_assert!(seen.insert(t), "territory {} in two clusters", t);
            }
        }
        prop_assert_eq!(seen, territories);
    }

    #[test]
    fn test_clusters_are_connected_and_maximal(territories in arb_territory_set()) {
        let graph = TerritoryGraph::earth();
        let clusters = build_clusters(&graph, &territories);

        for (i, cluster) in clusters.iter().enumerate() {
            let members: BTreeSet<TerritoryId> = cluster.iter().copied().collect();
            prop_assert_eq!(build_clusters(&graph, &members).len(), 1);

            for other in clusters.iter().skip(i + 1) {
                for &a in cluster {
                    for &b in other {
                        prop_assert!(!graph.are_adjacent(a, b));
                    }
                }
            }
        }
    }

    #[test]
    fn test_attack_order_is_permutation_with_cut_nodes_last(territories in arb_territory_set()) {
        let graph = TerritoryGraph::earth();
        for cluster in build_clusters(&graph, &territories) {
            let ordered = sort_attack_priority(&graph, &cluster, &cluster);

            let mut sorted_in = cluster.clone();
            sorted_in.sort_unstable();
            let mut sorted_out = ordered.clone();
            sorted_out.sort_unstable();
            prop_assert_eq!(sorted_in, sorted_out);

            let first_cut = ordered.iter().position(|&t| is_cut_node(&graph, &cluster, t));
            if let Some(first_cut) = first_cut {
                prop_assert!(ordered[first_cut..].iter().all(|&t| is_cut_node(&graph, &cluster, t)));
            }
        }
    }

    #[test]
    fn test_committed_clusters_have_owned_attackers(state in arb_claimed_board(3)) {
        let graph = TerritoryGraph::earth();
        let board = Board::new(&graph, &state).unwrap();
        let config = AgentConfig::default();
        let clusters = generate_priority_clusters(&board, &config, state.my_troops_remaining()).unwrap();

        let forced = clusters.iter().filter(|c| c.kind == ClusterKind::Forced).count();
        prop_assert!(forced <= 1);
        if forced == 1 {
            prop_assert_eq!(clusters.len(), 1);
        }
        for cluster in &clusters {
            prop_assert!(cluster.committed);
            prop_assert!(board.is_mine(cluster.attacker));
            prop_assert!(board.adjacent_owned(&cluster.members).contains(&cluster.attacker));
            prop_assert!(cluster.members.iter().all(|&t| !board.is_mine(t)));
        }
    }

    #[test]
    fn test_planning_is_deterministic(state in arb_claimed_board(4)) {
        let graph = TerritoryGraph::earth();
        let board = Board::new(&graph, &state).unwrap();
        let config = AgentConfig::default();

        let result = verify_determinism(
            3,
            || generate_priority_clusters(&board, &config, state.my_troops_remaining()).unwrap(),
            |plan| hash_plan(plan),
        );
        prop_assert!(result.is_deterministic);
    }

    #[test]
    fn test_distribution_places_whole_budget(state in arb_claimed_board(3)) {
        let graph = TerritoryGraph::earth();
        let board = Board::new(&graph, &state).unwrap();
        let config = AgentConfig::default();
        let mut planner = TurnPlanner::new();
        let mut priority = ContinentPriority::new(&graph);

        let distribution = distribute_troops(&mut planner, &mut priority, &board, &config).unwrap();
        prop_assert_eq!(distribution.values().sum::<u32>(), state.my_troops_remaining());
        prop_assert!(distribution.keys().all(|&t| board.is_mine(t)));
    }

    #[test]
    fn test_attacks_are_legal(state in arb_claimed_board(3)) {
        let graph = TerritoryGraph::earth();
        let board = Board::new(&graph, &state).unwrap();
        let config = AgentConfig::default();
        let mut planner = TurnPlanner::new();
        let mut priority = ContinentPriority::new(&graph);

        match decide_attack(&mut planner, &mut priority, &board, &config).unwrap() {
            AttackDecision::Attack { attacker, defender, troops } => {
                prop_assert!(board.is_mine(attacker));
                prop_assert!(!board.is_mine(defender));
                prop_assert!(graph.are_adjacent(attacker, defender));
                prop_assert!(troops >= 1 && troops <= config.max_attack_troops);
                prop_assert!(troops < board.troops(attacker));
            }
            AttackDecision::Pass => {
                prop_assert_eq!(planner.state(), SequencerState::Exhausted);
            }
        }
    }
}
