//! Per-pass troop booking ledger.
//!
//! Accepted clusters earmark their attacker's troops here so that two
//! clusters cannot both count on the same stack. A ledger lives for one
//! planning pass only.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::difficulty::recommended_troops;
use crate::map::TerritoryId;

/// Attacker territory to troops already promised.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingLedger {
    booked: BTreeMap<TerritoryId, u32>,
}

impl BookingLedger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Earmark `amount` troops of `attacker`.
    pub fn book(&mut self, attacker: TerritoryId, amount: u32) {
        let entry = self.booked.entry(attacker).or_insert(0);
        *entry = entry.saturating_add(amount);
    }

    /// Undo a booking. Never drops below zero.
    pub fn release(&mut self, attacker: TerritoryId, amount: u32) {
        if let Some(entry) = self.booked.get_mut(&attacker) {
            *entry = entry.saturating_sub(amount);
            if *entry == 0 {
                self.booked.remove(&attacker);
            }
        }
    }

    /// Troops already promised from `attacker`.
    #[must_use]
    pub fn booked(&self, attacker: TerritoryId) -> u32 {
        self.booked.get(&attacker).copied().unwrap_or(0)
    }

    /// Troops on `attacker` not yet promised. Negative when overbooked.
    #[must_use]
    pub fn surplus(&self, attacker: TerritoryId, attacker_troops: u32) -> i64 {
        i64::from(attacker_troops) - i64::from(self.booked(attacker))
    }

    /// Troops to deploy on `attacker` so it can cover `score`.
    #[must_use]
    pub fn recommend(&self, score: u32, attacker: TerritoryId, attacker_troops: u32) -> u32 {
        recommended_troops(score, attacker_troops, self.booked(attacker))
    }

    /// Whether nothing is booked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.booked.is_empty()
    }
}
