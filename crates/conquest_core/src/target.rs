//! Target clusters produced by a planning pass.

use serde::{Deserialize, Serialize};

use crate::map::{ContinentId, TerritoryId};

/// Objective a cluster serves. Declaration order is queue priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClusterKind {
    /// Eliminate a weak player.
    Player,
    /// Take over a continent.
    Continent,
    /// Break an opponent's continent bonus.
    Disrupt,
    /// Minimal capture so the turn earns a card.
    Forced,
}

/// A cluster selected for attack, with its attacker and troop sizing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetCluster {
    /// Sequence id, unique within one pass.
    pub id: u32,
    /// Members including the path extension towards the attacker.
    pub members: Vec<TerritoryId>,
    /// Members before extension.
    pub original: Vec<TerritoryId>,
    /// Owned territory the attack starts from.
    pub attacker: TerritoryId,
    /// Capture cost of `members`.
    pub difficulty: u32,
    /// Troops to deploy on `attacker`.
    pub recommended_troops: u32,
    /// Objective.
    pub kind: ClusterKind,
    /// Continent for continent and forced clusters.
    pub continent: Option<ContinentId>,
    /// Whether the pass accepted the cluster.
    pub committed: bool,
}

impl TargetCluster {
    /// Whether the path planner grew the cluster beyond its original members.
    #[must_use]
    pub fn has_extension(&self) -> bool {
        self.members.iter().any(|t| !self.original.contains(t))
    }

    /// Whether `territory` is a member.
    #[must_use]
    pub fn contains(&self, territory: TerritoryId) -> bool {
        self.members.contains(&territory)
    }
}
