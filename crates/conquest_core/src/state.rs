//! Game snapshot and the read-only board view the planner works on.
//!
//! [`GameState`] is what the host sends with every request. [`Board`] pairs
//! it with the static [`TerritoryGraph`] and answers the ownership and
//! troop queries every planning step needs. A board is built per request
//! and never outlives it.

use std::cmp::Reverse;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::config::AgentConfig;
use crate::error::{PlannerError, Result};
use crate::map::{ContinentId, TerritoryGraph, TerritoryId};
use crate::math::{ratio, Fixed};

/// Player identifier assigned by the host.
pub type PlayerId = u32;

/// Live state of one territory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerritoryState {
    /// Territory id (0..42).
    pub territory_id: TerritoryId,
    /// Troops stationed on the territory.
    pub troops: u32,
    /// Owning player, `None` while unclaimed.
    #[serde(default)]
    pub occupier: Option<PlayerId>,
}

/// Public state of one player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    /// Player id.
    pub player_id: PlayerId,
    /// Whether the player still holds territory.
    pub alive: bool,
    /// Troops the player still has to place this phase.
    #[serde(default)]
    pub troops_remaining: u32,
    /// Territories that must receive the matching-card bonus.
    #[serde(default)]
    pub must_place_territory_bonus: Vec<TerritoryId>,
}

/// Card symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Symbol {
    /// Infantry.
    Infantry,
    /// Cavalry.
    Cavalry,
    /// Artillery.
    Artillery,
    /// Wildcard, completes any set.
    Wildcard,
}

/// A card in the agent's hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// Card id.
    pub card_id: u32,
    /// Territory printed on the card; wildcards carry none.
    #[serde(default)]
    pub territory_id: Option<TerritoryId>,
    /// Card symbol.
    pub symbol: Symbol,
}

/// Snapshot of the game as seen by the agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    /// The agent's own player id.
    pub me: PlayerId,
    /// Every territory on the board.
    pub territories: Vec<TerritoryState>,
    /// Every player in the game, the agent included.
    pub players: Vec<PlayerState>,
    /// Card sets redeemed by all players so far.
    #[serde(default)]
    pub card_sets_redeemed: u32,
    /// Moves recorded so far.
    #[serde(default)]
    pub turn: u32,
    /// The agent's hand.
    #[serde(default)]
    pub cards: Vec<Card>,
}

impl GameState {
    /// The agent's own player entry.
    #[must_use]
    pub fn me_player(&self) -> Option<&PlayerState> {
        self.players.iter().find(|p| p.player_id == self.me)
    }

    /// Troops the agent still has to place.
    #[must_use]
    pub fn my_troops_remaining(&self) -> u32 {
        self.me_player().map_or(0, |p| p.troops_remaining)
    }
}

/// Read-only view pairing a snapshot with the board graph.
#[derive(Debug, Clone)]
pub struct Board<'a> {
    graph: &'a TerritoryGraph,
    state: &'a GameState,
    troops: Vec<u32>,
    occupiers: Vec<Option<PlayerId>>,
}

impl<'a> Board<'a> {
    /// Index a snapshot against the graph.
    ///
    /// Fails when a territory id is out of range or missing.
    pub fn new(graph: &'a TerritoryGraph, state: &'a GameState) -> Result<Self> {
        let count = graph.territory_count();
        let mut troops = vec![0; count];
        let mut occupiers = vec![None; count];
        let mut seen = vec![false; count];

        for territory in &state.territories {
            let id = territory.territory_id;
            if id >= count {
                return Err(PlannerError::UnknownTerritory(id));
            }
            troops[id] = territory.troops;
            occupiers[id] = territory.occupier;
            seen[id] = true;
        }
        if let Some(missing) = seen.iter().position(|s| !s) {
            return Err(PlannerError::UnknownTerritory(missing));
        }

        Ok(Self {
            graph,
            state,
            troops,
            occupiers,
        })
    }

    /// The static graph.
    #[must_use]
    pub fn graph(&self) -> &'a TerritoryGraph {
        self.graph
    }

    /// The underlying snapshot.
    #[must_use]
    pub fn state(&self) -> &'a GameState {
        self.state
    }

    /// The agent's player id.
    #[must_use]
    pub fn me(&self) -> PlayerId {
        self.state.me
    }

    /// Troops on `territory`.
    #[must_use]
    pub fn troops(&self, territory: TerritoryId) -> u32 {
        self.troops.get(territory).copied().unwrap_or(0)
    }

    /// Occupier of `territory`.
    #[must_use]
    pub fn occupier(&self, territory: TerritoryId) -> Option<PlayerId> {
        self.occupiers.get(territory).copied().flatten()
    }

    /// Whether the agent holds `territory`.
    #[must_use]
    pub fn is_mine(&self, territory: TerritoryId) -> bool {
        self.occupier(territory) == Some(self.state.me)
    }

    /// Territories held by `player` (`None` selects unclaimed ones).
    #[must_use]
    pub fn owned_by(&self, player: Option<PlayerId>) -> BTreeSet<TerritoryId> {
        self.occupiers
            .iter()
            .enumerate()
            .filter(|(_, occupier)| **occupier == player)
            .map(|(id, _)| id)
            .collect()
    }

    /// Territories held by the agent.
    #[must_use]
    pub fn my_territories(&self) -> BTreeSet<TerritoryId> {
        self.owned_by(Some(self.state.me))
    }

    /// Members of `territories` with at least one neighbour outside the set.
    #[must_use]
    pub fn border_territories(&self, territories: &BTreeSet<TerritoryId>) -> BTreeSet<TerritoryId> {
        territories
            .iter()
            .copied()
            .filter(|&t| {
                self.graph
                    .adjacent(t)
                    .iter()
                    .any(|n| !territories.contains(n))
            })
            .collect()
    }

    /// Owned territories bordering `cluster`.
    #[must_use]
    pub fn adjacent_owned(&self, cluster: &[TerritoryId]) -> BTreeSet<TerritoryId> {
        self.graph
            .all_adjacent(cluster)
            .into_iter()
            .filter(|&t| self.is_mine(t))
            .collect()
    }

    /// Sum of troops over `territories`.
    pub fn total_troops<'t, I>(&self, territories: I) -> u32
    where
        I: IntoIterator<Item = &'t TerritoryId>,
    {
        territories.into_iter().map(|&t| self.troops(t)).sum()
    }

    /// Territory with the most troops, lowest id on ties.
    pub fn strongest<'t, I>(&self, territories: I) -> Option<TerritoryId>
    where
        I: IntoIterator<Item = &'t TerritoryId>,
    {
        territories
            .into_iter()
            .copied()
            .min_by_key(|&t| (Reverse(self.troops(t)), t))
    }

    /// Territory with the fewest troops, lowest id on ties.
    pub fn weakest<'t, I>(&self, territories: I) -> Option<TerritoryId>
    where
        I: IntoIterator<Item = &'t TerritoryId>,
    {
        territories
            .into_iter()
            .copied()
            .min_by_key(|&t| (self.troops(t), t))
    }

    /// Best attacker for `cluster`: the strongest owned territory next to it.
    #[must_use]
    pub fn best_attacker(&self, cluster: &[TerritoryId]) -> Option<TerritoryId> {
        self.strongest(&self.adjacent_owned(cluster))
    }

    /// Players occupying at least one territory of `continent`.
    #[must_use]
    pub fn players_in_continent(&self, continent: ContinentId) -> BTreeSet<PlayerId> {
        self.graph
            .continent_territories(continent)
            .filter_map(|t| self.occupier(t))
            .collect()
    }

    /// Share of `continent` held by the agent.
    #[must_use]
    pub fn continent_owned_ratio(&self, continent: ContinentId) -> Fixed {
        let range = self.graph.continent_territories(continent);
        let total = u32::try_from(range.len()).unwrap_or(u32::MAX);
        let owned = u32::try_from(range.filter(|&t| self.is_mine(t)).count()).unwrap_or(0);
        ratio(owned, total)
    }

    /// Whether the agent holds every territory of `continent`.
    #[must_use]
    pub fn owns_continent(&self, continent: ContinentId) -> bool {
        let mut range = self.graph.continent_territories(continent);
        !range.is_empty() && range.all(|t| self.is_mine(t))
    }

    /// Continents wholly held by the agent, ascending.
    #[must_use]
    pub fn owned_continents(&self) -> Vec<ContinentId> {
        self.graph
            .continents()
            .filter(|&c| self.owns_continent(c))
            .collect()
    }

    /// Continents where the agent holds at least one territory.
    #[must_use]
    pub fn my_continents(&self) -> BTreeSet<ContinentId> {
        self.my_territories()
            .iter()
            .filter_map(|&t| self.graph.continent_of(t))
            .collect()
    }

    /// Continent whose territories are the largest share held by the agent.
    #[must_use]
    pub fn most_owned_continent(&self) -> Option<ContinentId> {
        self.graph
            .continents()
            .min_by_key(|&c| (Reverse(self.continent_owned_ratio(c)), c))
    }

    /// Number of players still alive, the agent included.
    #[must_use]
    pub fn remaining_players(&self) -> usize {
        self.state.players.iter().filter(|p| p.alive).count()
    }

    /// Living opponents, ascending by id.
    #[must_use]
    pub fn living_opponents(&self) -> Vec<PlayerId> {
        let mut ids: Vec<PlayerId> = self
            .state
            .players
            .iter()
            .filter(|p| p.alive && p.player_id != self.state.me)
            .map(|p| p.player_id)
            .collect();
        ids.sort_unstable();
        ids
    }

    /// More card sets have been redeemed than the late-game threshold.
    #[must_use]
    pub fn is_late_game(&self, config: &AgentConfig) -> bool {
        self.state.card_sets_redeemed > config.late_game_card_sets
    }

    /// Few enough players remain that over-committing is allowed.
    #[must_use]
    pub fn is_endgame(&self, config: &AgentConfig) -> bool {
        self.remaining_players() <= config.endgame_players
    }

    /// Fewer moves have been recorded than the mid-game threshold.
    #[must_use]
    pub fn is_early_game(&self, config: &AgentConfig) -> bool {
        self.state.turn < config.mid_game_turn
    }
}
