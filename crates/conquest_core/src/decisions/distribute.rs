//! Troop distribution at the start of a turn.
//!
//! Runs a planning pass with the whole troop budget, installs the committed
//! clusters as the turn plan, and places troops on their attackers. The
//! returned map always accounts for every troop the agent must place.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, info};

use crate::config::AgentConfig;
use crate::decisions::main_cluster;
use crate::error::{PlannerError, Result};
use crate::generator::generate_priority_clusters;
use crate::map::TerritoryId;
use crate::math::proportional_share;
use crate::priority::ContinentPriority;
use crate::state::Board;
use crate::target::{ClusterKind, TargetCluster};
use crate::turn::TurnPlanner;

/// Territory to troops placed on it.
pub type Distribution = BTreeMap<TerritoryId, u32>;

/// Running allocation that never hands out more than it holds.
struct Allocation {
    placed: Distribution,
    remaining: i64,
}

impl Allocation {
    fn new(total: u32) -> Self {
        Self {
            placed: Distribution::new(),
            remaining: i64::from(total),
        }
    }

    /// Place up to `amount` troops on `territory`; returns what was placed.
    fn add(&mut self, territory: TerritoryId, amount: i64) -> i64 {
        let amount = amount.min(self.remaining);
        if amount <= 0 {
            return 0;
        }
        let entry = self.placed.entry(territory).or_insert(0);
        *entry = entry.saturating_add(u32::try_from(amount).unwrap_or(u32::MAX));
        self.remaining -= amount;
        amount
    }
}

/// One extra troop on weak main-cluster borders inside preferred continents.
fn reinforce_weak_borders(
    alloc: &mut Allocation,
    priority: &ContinentPriority,
    board: &Board<'_>,
    mine: &BTreeSet<TerritoryId>,
    config: &AgentConfig,
) -> Result<()> {
    let preferred = priority.owned_and_current();
    let main: BTreeSet<TerritoryId> = main_cluster(board, mine).into_iter().collect();

    for territory in board.border_territories(&main) {
        if alloc.remaining <= 0 {
            break;
        }
        let continent = board
            .graph()
            .continent_of(territory)
            .ok_or(PlannerError::UnknownContinent(territory))?;
        if preferred.contains(&continent) && board.troops(territory) <= config.min_choke_troops {
            alloc.add(territory, 1);
        }
    }
    Ok(())
}

/// Late-game top-up of bare territories out of a share of the budget.
fn hold_back_defence(
    alloc: &mut Allocation,
    board: &Board<'_>,
    mine: &BTreeSet<TerritoryId>,
    config: &AgentConfig,
) {
    let mut defensive = alloc.remaining * i64::from(config.defense_percent) / 100;
    for &territory in mine {
        if defensive <= 0 {
            break;
        }
        if board.troops(territory) < config.late_min_troops {
            defensive -= alloc.add(territory, 1);
        }
    }
}

/// Place this turn's troops and install the attack plan.
pub fn distribute_troops(
    planner: &mut TurnPlanner,
    priority: &mut ContinentPriority,
    board: &Board<'_>,
    config: &AgentConfig,
) -> Result<Distribution> {
    priority.refresh(board);
    planner.reset_plan();

    let state = board.state();
    let mine = board.my_territories();
    if mine.is_empty() {
        return Err(PlannerError::NoCandidate("troop distribution"));
    }
    let mut alloc = Allocation::new(state.my_troops_remaining());

    let bonus = state
        .me_player()
        .and_then(|p| p.must_place_territory_bonus.first().copied());
    if let Some(territory) = bonus {
        if alloc.remaining >= 2 {
            alloc.add(territory, 2);
        }
    }

    if board.is_early_game(config) {
        reinforce_weak_borders(&mut alloc, priority, board, &mine, config)?;
    }

    let budget = u32::try_from(alloc.remaining.max(0)).unwrap_or(u32::MAX);
    let mut players: Vec<TargetCluster> = Vec::new();
    let mut continents: Vec<TargetCluster> = Vec::new();
    let mut disrupts: Vec<TargetCluster> = Vec::new();
    let mut forced: Option<TargetCluster> = None;
    for cluster in generate_priority_clusters(board, config, budget)? {
        match cluster.kind {
            ClusterKind::Player => players.push(cluster),
            ClusterKind::Continent => continents.push(cluster),
            ClusterKind::Disrupt => disrupts.push(cluster),
            ClusterKind::Forced => {
                forced.get_or_insert(cluster);
            }
        }
    }

    if board.is_late_game(config) && players.is_empty() {
        hold_back_defence(&mut alloc, board, &mine, config);
    }

    // Troops left for continents once player clusters are paid for; spread
    // over the player clusters instead when there are any.
    let player_assigned: i64 = players.iter().map(|c| i64::from(c.recommended_troops)).sum();
    let mut allowance = alloc.remaining - player_assigned;
    if !players.is_empty() && allowance > 0 {
        let total_difficulty: i64 = players.iter().map(|c| i64::from(c.difficulty)).sum();
        for cluster in &mut players {
            let share = proportional_share(allowance, i64::from(cluster.difficulty), total_difficulty);
            cluster.recommended_troops += u32::try_from(share).unwrap_or(0);
            allowance -= share;
            if allowance <= 0 {
                break;
            }
        }
        if let Some(first) = players.first_mut() {
            first.recommended_troops += u32::try_from(allowance.max(0)).unwrap_or(0);
        }
        allowance = 0;
    }

    let mut queue: Vec<TargetCluster> = Vec::new();
    for cluster in players {
        alloc.add(cluster.attacker, i64::from(cluster.recommended_troops));
        queue.push(cluster);
    }

    for cluster in &continents {
        if allowance <= 0 {
            break;
        }
        allowance -= alloc.add(cluster.attacker, i64::from(cluster.recommended_troops));
        queue.push(cluster.clone());
    }

    for cluster in disrupts {
        if alloc.remaining <= 0 {
            break;
        }
        alloc.add(cluster.attacker, i64::from(cluster.recommended_troops));
        queue.push(cluster);
    }

    if !continents.is_empty() {
        let pool = alloc.remaining;
        let total_difficulty: i64 = continents.iter().map(|c| i64::from(c.difficulty)).sum();
        let mut hardest: Option<(u32, TerritoryId)> = None;
        for cluster in &continents {
            alloc.add(
                cluster.attacker,
                proportional_share(pool, i64::from(cluster.difficulty), total_difficulty),
            );
            if cluster.difficulty > hardest.map_or(0, |(difficulty, _)| difficulty) {
                hardest = Some((cluster.difficulty, cluster.attacker));
            }
        }
        if let Some((_, attacker)) = hardest {
            let rest = alloc.remaining;
            alloc.add(attacker, rest);
        }
    }

    if let Some(cluster) = forced {
        let rest = alloc.remaining;
        alloc.add(cluster.attacker, rest);
        queue.push(cluster);
    }

    info!(queued = queue.len(), budget, "Turn plan installed");
    planner.install(queue);

    if alloc.remaining > 0 {
        let border = board.border_territories(&mine);
        if let Some(territory) = board.strongest(&border).or_else(|| board.strongest(&mine)) {
            debug!(territory, troops = alloc.remaining, "Leftover troops to strongest border");
            let rest = alloc.remaining;
            alloc.add(territory, rest);
        }
    }

    Ok(alloc.placed)
}
