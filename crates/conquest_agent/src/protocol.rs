//! JSON protocol between the game host and the agent.
//!
//! The agent communicates via JSON lines (one JSON object per line):
//!
//! **Input (stdin):** an [`Envelope`] per request, carrying the full game
//! snapshot and the question being asked
//! **Output (stdout):** exactly one [`Move`] per request
//!
//! # Protocol Flow
//!
//! 1. Agent starts, outputs `{"type":"ready","version":"1.0"}`
//! 2. Host sends one envelope per decision
//! 3. Agent answers each envelope with one move line
//! 4. Host closes stdin to end the session
//!
//! # Example Session
//!
//! ```text
//! <- {"type":"ready","version":"1.0"}
//! -> {"state":{...},"query":{"type":"claim_territory"}}
//! <- {"type":"claim_territory","territory":29}
//! -> {"state":{...},"query":{"type":"attack"}}
//! <- {"type":"attack","attacking_territory":29,"defending_territory":36,"attacking_troops":3}
//! -> {"state":{...},"query":{"type":"attack"}}
//! <- {"type":"attack_pass"}
//! ```

use std::collections::BTreeMap;

use serde::de::{self, Unexpected};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use conquest_core::decisions::{Distribution, RedeemCause};
use conquest_core::map::TerritoryId;
use conquest_core::state::GameState;

/// Protocol version announced in the ready line.
pub const PROTOCOL_VERSION: &str = "1.0";

// ============================================================================
// Input (Host -> Agent)
// ============================================================================

/// One request: the current snapshot plus the question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    /// Game snapshot as seen by the agent.
    pub state: GameState,
    /// Decision requested.
    pub query: Query,
}

/// Decisions the host can ask for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Query {
    /// Claim one unclaimed territory during setup.
    ClaimTerritory,

    /// Place one troop on an owned territory during setup.
    PlaceInitialTroop,

    /// Redeem card sets.
    RedeemCards { cause: RedeemCause },

    /// Distribute this turn's new troops.
    DistributeTroops,

    /// Attack once or pass.
    Attack,

    /// Troops to move into a captured territory.
    TroopsAfterAttack {
        attacking_territory: TerritoryId,
        defending_territory: TerritoryId,
        attacking_troops: u32,
    },

    /// Troops to defend an attack with.
    Defend {
        attacking_territory: TerritoryId,
        defending_territory: TerritoryId,
        attacking_troops: u32,
    },

    /// Fortify once or pass.
    Fortify,
}

// ============================================================================
// Output (Agent -> Host)
// ============================================================================

/// Moves sent back to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Move {
    /// Agent is ready to accept requests.
    Ready { version: String },

    /// Territory claimed.
    ClaimTerritory { territory: TerritoryId },

    /// Territory reinforced during setup.
    PlaceInitialTroop { territory: TerritoryId },

    /// Card ids of every set redeemed, possibly none.
    RedeemCards { sets: Vec<[u32; 3]> },

    /// Troops placed per territory.
    DistributeTroops {
        #[serde(with = "territory_keys")]
        distributions: Distribution,
    },

    /// Attack from one territory into another.
    Attack {
        attacking_territory: TerritoryId,
        defending_territory: TerritoryId,
        attacking_troops: u32,
    },

    /// Stop attacking this turn.
    AttackPass,

    /// Troops moved into the captured territory.
    TroopsAfterAttack { troops: u32 },

    /// Troops defending.
    Defend { troops: u32 },

    /// Move troops between two owned territories.
    Fortify {
        source: TerritoryId,
        target: TerritoryId,
        troops: u32,
    },

    /// Skip fortification.
    FortifyPass,

    /// The request could not be answered.
    Error { message: String },
}

// ============================================================================
// Helpers
// ============================================================================

/// JSON object keys are strings; territory ids are written and read as
/// decimal strings.
mod territory_keys {
    use super::*;

    pub fn serialize<S: Serializer>(map: &Distribution, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(map.iter().map(|(territory, troops)| (territory.to_string(), troops)))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Distribution, D::Error> {
        BTreeMap::<String, u32>::deserialize(deserializer)?
            .into_iter()
            .map(|(key, troops)| {
                let territory = key.parse::<TerritoryId>().map_err(|_| {
                    <D::Error as de::Error>::invalid_value(Unexpected::Str(&key), &"a territory id")
                })?;
                Ok((territory, troops))
            })
            .collect()
    }
}

impl Move {
    /// Create the ready line.
    pub fn ready() -> Self {
        Self::Ready {
            version: PROTOCOL_VERSION.to_string(),
        }
    }

    /// Create an error move.
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    /// Serialize to JSON line (with newline).
    pub fn to_json_line(&self) -> String {
        let mut json = serde_json::to_string(self).unwrap_or_else(|e| {
            format!(
                r#"{{"type":"error","message":"Serialization failed: {}"}}"#,
                e
            )
        });
        json.push('\n');
        json
    }
}

impl Envelope {
    /// Parse from a JSON line.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl Query {
    /// Query name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ClaimTerritory => "claim_territory",
            Self::PlaceInitialTroop => "place_initial_troop",
            Self::RedeemCards { .. } => "redeem_cards",
            Self::DistributeTroops => "distribute_troops",
            Self::Attack => "attack",
            Self::TroopsAfterAttack { .. } => "troops_after_attack",
            Self::Defend { .. } => "defend",
            Self::Fortify => "fortify",
        }
    }
}
