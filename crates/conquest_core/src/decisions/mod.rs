//! Turn handlers built on top of the planner.
//!
//! Each handler answers one kind of host request: claiming and seeding the
//! board during setup, redeeming cards, distributing troops, sizing the
//! move-in after a capture, defending, and fortifying. They are thin rule
//! layers; the planning work happens in [`crate::generator`] and
//! [`crate::sequencer`].

pub mod after_attack;
pub mod cards;
pub mod claim;
pub mod defend;
pub mod distribute;
pub mod fortify;
pub mod placement;

use std::collections::{BTreeSet, VecDeque};

use serde::{Deserialize, Serialize};

use crate::cluster::build_clusters;
use crate::map::TerritoryId;
use crate::state::Board;
use crate::target::TargetCluster;

pub use after_attack::troops_after_attack;
pub use cards::{find_card_set, redeem_cards, RedeemCause};
pub use claim::claim_territory;
pub use defend::defend_troops;
pub use distribute::{distribute_troops, Distribution};
pub use fortify::{fortify, FortifyMove};
pub use placement::place_initial_troop;

/// State carried through the claim and initial placement rounds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetupState {
    /// Territories not to claim after abandoning a crowded start.
    pub banned_init: BTreeSet<TerritoryId>,
    /// Clusters the initial troops are being stacked against, rotated each placement.
    pub initial_clusters: VecDeque<TargetCluster>,
}

/// The agent's cluster holding the most troops, lowest seed id on ties.
pub(crate) fn main_cluster(board: &Board<'_>, mine: &BTreeSet<TerritoryId>) -> Vec<TerritoryId> {
    build_clusters(board.graph(), mine)
        .into_iter()
        .fold(None, |best: Option<(u32, Vec<TerritoryId>)>, cluster| {
            let troops = board.total_troops(&cluster);
            match best {
                Some((most, _)) if most >= troops => best,
                _ => Some((troops, cluster)),
            }
        })
        .map(|(_, cluster)| cluster)
        .unwrap_or_default()
}
