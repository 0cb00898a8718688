//! # Conquest Core
//!
//! Deterministic decision engine for a territory-conquest board-game agent.
//!
//! This crate contains **only** deterministic logic:
//! - No IO
//! - No randomness
//! - No floating-point math (uses fixed-point)
//!
//! Every decision is a pure function of the host's snapshot plus the
//! agent's own turn-scoped state, so the same snapshot always yields the
//! same move.
//!
//! ## Crate Structure
//!
//! - [`map`] - Static 42-territory graph, continents and choke points
//! - [`state`] - Game snapshot and the [`state::Board`] query view
//! - [`cluster`] - Connected clusters and cut-node ordering
//! - [`pathfinding`] - Dijkstra path planner from clusters to attackers
//! - [`difficulty`] - Cluster capture cost
//! - [`booking`] - Per-pass troop booking ledger
//! - [`generator`] - Four-phase priority cluster generation
//! - [`sequencer`] - Attack sequencer state machine
//! - [`decisions`] - Handlers for every host request
//! - [`math`] - Fixed-point helpers

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod booking;
pub mod cluster;
pub mod config;
pub mod decisions;
pub mod difficulty;
pub mod error;
pub mod generator;
pub mod map;
pub mod math;
pub mod pathfinding;
pub mod priority;
pub mod sequencer;
pub mod state;
pub mod target;
pub mod turn;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::booking::BookingLedger;
    pub use crate::cluster::{build_clusters, is_cut_node, sort_attack_priority};
    pub use crate::config::AgentConfig;
    pub use crate::decisions::{
        claim_territory, defend_troops, distribute_troops, find_card_set, fortify,
        place_initial_troop, redeem_cards, troops_after_attack, Distribution, FortifyMove,
        RedeemCause, SetupState,
    };
    pub use crate::difficulty::cluster_difficulty_score;
    pub use crate::error::{PlannerError, Result};
    pub use crate::generator::{generate_priority_clusters, PriorityGenerator};
    pub use crate::map::{ContinentId, TerritoryGraph, TerritoryId};
    pub use crate::math::Fixed;
    pub use crate::pathfinding::{best_path_from_score, best_path_to_cluster, PathPlan};
    pub use crate::priority::ContinentPriority;
    pub use crate::sequencer::{decide_attack, AttackDecision, SequencerState};
    pub use crate::state::{Board, Card, GameState, PlayerId, PlayerState, Symbol, TerritoryState};
    pub use crate::target::{ClusterKind, TargetCluster};
    pub use crate::turn::{TurnContext, TurnPlanner};
}
