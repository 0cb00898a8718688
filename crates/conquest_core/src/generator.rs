//! Priority cluster generation.
//!
//! One planning pass turns a snapshot and a troop budget into an ordered
//! list of committed [`TargetCluster`]s. The pass runs four phases in order:
//!
//! 1. **Player elimination** (late game only): wipe out opponents cheap
//!    enough to finish this turn.
//! 2. **Continent takeover**: rank candidate continents by net capture cost
//!    and commit those the budget covers.
//! 3. **Disruption**: take one cheap territory from a continent held
//!    entirely by a single opponent.
//! 4. **Forced fallback**: when nothing else was committed, commit the
//!    first cluster of the cheapest continent anyway so the turn still
//!    captures.
//!
//! Every phase books the troops it counts on in a [`BookingLedger`] so that
//! later clusters see only the attacker troops left over.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::booking::BookingLedger;
use crate::cluster::build_clusters;
use crate::config::AgentConfig;
use crate::difficulty::{cluster_difficulty_score, net_cost};
use crate::error::Result;
use crate::map::{ContinentId, TerritoryId};
use crate::math::ratio;
use crate::pathfinding::best_path_from_score;
use crate::state::{Board, PlayerId};
use crate::target::{ClusterKind, TargetCluster};

/// A continent scored during the takeover phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedContinent {
    /// Continent id.
    pub continent: ContinentId,
    /// Sum of cluster shortfalls before bookings. Lower is cheaper.
    pub net_cost: i64,
    /// Clusters in commit order, with recommendations against the live ledger.
    pub clusters: Vec<TargetCluster>,
    /// Whether the continent was committed.
    pub committed: bool,
}

/// Candidate continents in ascending net cost.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContinentRanking {
    /// Ranked continents, cheapest first.
    pub entries: Vec<RankedContinent>,
}

impl ContinentRanking {
    /// Continents that were committed.
    pub fn committed(&self) -> impl Iterator<Item = ContinentId> + '_ {
        self.entries
            .iter()
            .filter(|e| e.committed)
            .map(|e| e.continent)
    }

    /// First cluster in commit order of the cheapest continent.
    #[must_use]
    pub fn lowest_cost_cluster(&self) -> Option<&TargetCluster> {
        self.entries.first()?.clusters.first()
    }
}

/// One planning pass over a snapshot.
pub struct PriorityGenerator<'a> {
    board: &'a Board<'a>,
    config: &'a AgentConfig,
    mine: BTreeSet<TerritoryId>,
    ledger: BookingLedger,
    budget: i64,
    next_id: u32,
    result: Vec<TargetCluster>,
}

impl<'a> PriorityGenerator<'a> {
    /// Start a pass with `deployable` troops to allocate.
    #[must_use]
    pub fn new(board: &'a Board<'a>, config: &'a AgentConfig, deployable: u32) -> Self {
        Self {
            board,
            config,
            mine: board.my_territories(),
            ledger: BookingLedger::new(),
            budget: i64::from(deployable),
            next_id: 0,
            result: Vec::new(),
        }
    }

    /// Troops still unallocated. Negative after an endgame over-commit.
    #[must_use]
    pub fn budget(&self) -> i64 {
        self.budget
    }

    /// Bookings made so far.
    #[must_use]
    pub fn ledger(&self) -> &BookingLedger {
        &self.ledger
    }

    /// Clusters committed so far.
    #[must_use]
    pub fn committed(&self) -> &[TargetCluster] {
        &self.result
    }

    /// Extend `cluster` towards an attacker and score it.
    ///
    /// Returns `None` when no owned territory can reach the cluster.
    fn plan_cluster(&mut self, cluster: &[TerritoryId], kind: ClusterKind) -> Option<TargetCluster> {
        let plan = best_path_from_score(self.board, cluster, &BTreeSet::new(), &self.ledger, self.config)?;
        let members = plan.extend(cluster);
        let attacker = self.board.best_attacker(&members)?;
        let difficulty = cluster_difficulty_score(self.board, &members, self.config);
        let recommended_troops = self
            .ledger
            .recommend(difficulty, attacker, self.board.troops(attacker));

        let id = self.next_id;
        self.next_id += 1;
        debug!(
            id,
            ?kind,
            attacker,
            difficulty,
            recommended_troops,
            members = ?members,
            "Scored cluster"
        );

        Some(TargetCluster {
            id,
            members,
            original: cluster.to_vec(),
            attacker,
            difficulty,
            recommended_troops,
            kind,
            continent: None,
            committed: false,
        })
    }

    /// Owned territories bordering the cluster; fewer go first.
    fn owned_neighbour_count(&self, cluster: &TargetCluster) -> usize {
        self.board.adjacent_owned(&cluster.members).len()
    }

    fn commit(&mut self, mut cluster: TargetCluster) {
        cluster.committed = true;
        info!(
            id = cluster.id,
            kind = ?cluster.kind,
            attacker = cluster.attacker,
            difficulty = cluster.difficulty,
            recommended = cluster.recommended_troops,
            "Committed cluster"
        );
        self.result.push(cluster);
    }

    /// Opponents whose whole holdings cost no more than the agent can field.
    fn weak_players(&self) -> Vec<(PlayerId, BTreeSet<TerritoryId>)> {
        let available = i64::from(self.board.total_troops(&self.mine)) + self.budget;

        let mut weak: Vec<(u32, PlayerId, BTreeSet<TerritoryId>)> = self
            .board
            .living_opponents()
            .into_iter()
            .filter_map(|player| {
                let territories = self.board.owned_by(Some(player));
                if territories.is_empty() {
                    return None;
                }
                let all: Vec<TerritoryId> = territories.iter().copied().collect();
                let score = cluster_difficulty_score(self.board, &all, self.config);
                (i64::from(score) <= available).then_some((score, player, territories))
            })
            .collect();
        weak.sort_by_key(|(score, player, _)| (*score, *player));

        weak.into_iter()
            .map(|(_, player, territories)| (player, territories))
            .collect()
    }

    /// Phase 1: commit every cluster of each opponent the budget can finish.
    pub fn player_phase(&mut self) {
        if !self.board.is_late_game(self.config) {
            return;
        }

        for (player, territories) in self.weak_players() {
            let mut planned: Vec<TargetCluster> = Vec::new();
            let mut reachable = true;

            for cluster in build_clusters(self.board.graph(), &territories) {
                match self.plan_cluster(&cluster, ClusterKind::Player) {
                    Some(target) => {
                        self.ledger.book(target.attacker, target.difficulty);
                        planned.push(target);
                    }
                    None => {
                        reachable = false;
                        break;
                    }
                }
            }

            let total: i64 = planned.iter().map(|c| i64::from(c.recommended_troops)).sum();
            if reachable && total <= self.budget {
                planned.sort_by_key(|c| self.owned_neighbour_count(c));
                for cluster in planned {
                    self.commit(cluster);
                }
                self.budget -= total;
                info!(player, total, budget = self.budget, "Elimination target accepted");
            } else {
                for cluster in &planned {
                    self.ledger.release(cluster.attacker, cluster.difficulty);
                }
                debug!(player, total, reachable, budget = self.budget, "Elimination target rejected");
            }
        }
    }

    /// Continent with the best troop-weighted ownership over itself and its
    /// out-chokes, deployable troops counted as owned.
    fn best_takeover_continent(&self) -> ContinentId {
        let graph = self.board.graph();
        let deployable = u32::try_from(self.budget.max(0)).unwrap_or(u32::MAX);

        let mut best = (graph.base_priority().first().copied().unwrap_or(0), ratio(0, 1));
        for continent in graph.continents() {
            let area: Vec<TerritoryId> = graph
                .continent_territories(continent)
                .chain(graph.out_chokes(continent).iter().copied())
                .collect();
            let total = self.board.total_troops(&area);
            let owned = deployable
                + area
                    .iter()
                    .filter(|&&t| self.board.is_mine(t))
                    .map(|&t| self.board.troops(t))
                    .sum::<u32>();
            let share = ratio(owned, total);
            if share > best.1 {
                best = (continent, share);
            }
        }
        best.0
    }

    fn candidate_continents(&self) -> BTreeSet<ContinentId> {
        let graph = self.board.graph();
        if self.board.is_late_game(self.config) || self.board.is_endgame(self.config) {
            return graph.continents().collect();
        }

        let owned = self.board.owned_continents();
        if owned.is_empty() {
            return BTreeSet::from([self.best_takeover_continent()]);
        }

        owned
            .iter()
            .flat_map(|&c| graph.continent_neighbours(c).iter().copied())
            .filter(|c| !owned.contains(c))
            .collect()
    }

    /// Extra cost of holding a continent against an enemy out-choke.
    fn choke_surcharge(&self, continent: ContinentId, cluster: &[TerritoryId]) -> u32 {
        let graph = self.board.graph();
        let adjacent = graph.all_adjacent(cluster);
        let inside = graph.continent_territories(continent);

        graph
            .out_chokes(continent)
            .iter()
            .copied()
            .filter(|c| adjacent.contains(c) && !self.board.is_mine(*c))
            .filter(|&c| {
                !graph
                    .adjacent(c)
                    .iter()
                    .copied()
                    .filter(|t| inside.contains(t))
                    .all(|t| self.board.is_mine(t))
            })
            .map(|c| self.board.troops(c).saturating_sub(1))
            .sum()
    }

    /// Score every unowned cluster of `continent`.
    ///
    /// Clusters no owned territory can reach are left out. Returns `None`
    /// when the continent is already owned or none of its clusters is
    /// reachable.
    fn score_continent(&mut self, continent: ContinentId) -> Option<RankedContinent> {
        let graph = self.board.graph();
        let unowned: BTreeSet<TerritoryId> = graph
            .continent_territories(continent)
            .filter(|&t| !self.board.is_mine(t))
            .collect();
        let clusters = build_clusters(graph, &unowned);
        if clusters.is_empty() {
            return None;
        }

        let late = self.board.is_late_game(self.config);
        let mut scored = Vec::with_capacity(clusters.len());
        let mut net_total = 0;

        for cluster in clusters {
            let Some(mut target) = self.plan_cluster(&cluster, ClusterKind::Continent) else {
                debug!(continent, cluster = ?cluster, "Continent cluster unreachable");
                continue;
            };
            target.continent = Some(continent);
            if !late {
                target.difficulty += self.choke_surcharge(continent, &cluster);
            }

            let troops = self.board.troops(target.attacker);
            let booked = self.ledger.booked(target.attacker);
            target.recommended_troops = self.ledger.recommend(target.difficulty, target.attacker, troops);
            net_total += net_cost(target.difficulty, troops, booked);
            scored.push(target);
        }

        if scored.is_empty() {
            return None;
        }

        scored.sort_by_key(|c| self.owned_neighbour_count(c));
        Some(RankedContinent {
            continent,
            net_cost: net_total,
            clusters: scored,
            committed: false,
        })
    }

    /// Phase 2: rank candidate continents and commit those the budget covers.
    ///
    /// With few players left every ranked continent is committed, even past
    /// the budget.
    pub fn continent_phase(&mut self) -> ContinentRanking {
        let mut entries: Vec<RankedContinent> = Vec::new();
        for continent in self.candidate_continents() {
            if let Some(ranked) = self.score_continent(continent) {
                entries.push(ranked);
            }
        }
        entries.sort_by_key(|e| e.net_cost);

        let endgame = self.board.is_endgame(self.config);
        for entry in &mut entries {
            let mut total: i64 = 0;
            for cluster in &mut entry.clusters {
                let troops = self.board.troops(cluster.attacker);
                cluster.recommended_troops = self.ledger.recommend(cluster.difficulty, cluster.attacker, troops);
                self.ledger.book(cluster.attacker, cluster.difficulty);
                total += i64::from(cluster.recommended_troops);
            }

            if total <= self.budget || endgame {
                if total > self.budget {
                    warn!(
                        continent = entry.continent,
                        total,
                        budget = self.budget,
                        "Endgame override commits continent beyond budget"
                    );
                }
                entry.committed = true;
                self.budget -= total;
                for cluster in &entry.clusters {
                    self.commit(cluster.clone());
                }
            } else {
                for cluster in &entry.clusters {
                    self.ledger.release(cluster.attacker, cluster.difficulty);
                }
                debug!(continent = entry.continent, total, budget = self.budget, "Continent rejected");
            }
        }

        ContinentRanking { entries }
    }

    /// Phase 3: chip a territory off continents held whole by one opponent.
    pub fn disrupt_phase(&mut self, committed: &BTreeSet<ContinentId>) {
        let graph = self.board.graph();
        let reachable = graph.all_adjacent(&self.mine);

        for continent in graph.continents() {
            if committed.contains(&continent) {
                continue;
            }
            let Some(holder) = graph
                .continent_territories(continent)
                .next()
                .and_then(|t| self.board.occupier(t))
            else {
                continue;
            };
            let whole = graph
                .continent_territories(continent)
                .all(|t| self.board.occupier(t) == Some(holder));
            if holder == self.board.me() || !whole {
                continue;
            }

            let exposed: Vec<TerritoryId> = graph
                .continent_territories(continent)
                .filter(|t| reachable.contains(t))
                .collect();
            let Some(target) = self.board.weakest(&exposed) else {
                continue;
            };
            let members = vec![target];
            let Some(attacker) = self.board.best_attacker(&members) else {
                continue;
            };
            let difficulty = cluster_difficulty_score(self.board, &members, self.config);
            let recommended_troops = self
                .ledger
                .recommend(difficulty, attacker, self.board.troops(attacker));

            let id = self.next_id;
            self.next_id += 1;
            if i64::from(recommended_troops) <= self.budget {
                self.ledger.book(attacker, difficulty);
                self.budget -= i64::from(recommended_troops);
                self.commit(TargetCluster {
                    id,
                    members: members.clone(),
                    original: members,
                    attacker,
                    difficulty,
                    recommended_troops,
                    kind: ClusterKind::Disrupt,
                    continent: Some(continent),
                    committed: false,
                });
            } else {
                debug!(continent, target, recommended_troops, "Disruption unaffordable");
            }
        }
    }

    /// Phase 4: when nothing was committed, force the first cluster of the
    /// cheapest continent through regardless of cost.
    pub fn forced_phase(&mut self, ranking: &ContinentRanking) {
        if !self.result.is_empty() {
            return;
        }
        match ranking.lowest_cost_cluster() {
            Some(cluster) => {
                let mut forced = cluster.clone();
                forced.kind = ClusterKind::Forced;
                self.commit(forced);
            }
            None => debug!("No continent cluster available to force"),
        }
    }

    /// Run all four phases in order.
    pub fn run(&mut self) {
        self.player_phase();
        let ranking = self.continent_phase();
        let committed: BTreeSet<ContinentId> = ranking.committed().collect();
        self.disrupt_phase(&committed);
        self.forced_phase(&ranking);
    }

    /// Consume the pass and return committed clusters in queue order.
    pub fn finish(self) -> Result<Vec<TargetCluster>> {
        #[cfg(feature = "debug-validation")]
        self.validate()?;
        Ok(self.result)
    }

    #[cfg(feature = "debug-validation")]
    fn validate(&self) -> Result<()> {
        use crate::error::PlannerError;

        let forced = self
            .result
            .iter()
            .filter(|c| c.kind == ClusterKind::Forced)
            .count();
        if forced > 1 {
            return Err(PlannerError::InvalidState(format!("{forced} forced clusters in one pass")));
        }
        for cluster in &self.result {
            let attacker_ok = self.board.is_mine(cluster.attacker)
                && self.board.adjacent_owned(&cluster.members).contains(&cluster.attacker);
            if !attacker_ok {
                return Err(PlannerError::MissingAttacker { cluster_id: cluster.id });
            }
        }
        Ok(())
    }
}

/// Plan the turn: committed clusters in the order they should be attacked.
pub fn generate_priority_clusters(
    board: &Board<'_>,
    config: &AgentConfig,
    deployable: u32,
) -> Result<Vec<TargetCluster>> {
    let mut generator = PriorityGenerator::new(board, config, deployable);
    generator.run();
    generator.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decisions::fixture::snapshot;
    use crate::map::TerritoryGraph;

    fn ranked_cluster(id: u32, members: &[TerritoryId], recommended_troops: u32) -> TargetCluster {
        TargetCluster {
            id,
            members: members.to_vec(),
            original: members.to_vec(),
            attacker: 33,
            difficulty: 5,
            recommended_troops,
            kind: ClusterKind::Continent,
            continent: Some(4),
            committed: false,
        }
    }

    #[test]
    fn test_choke_surcharge_counts_enemy_out_chokes() {
        let graph = TerritoryGraph::earth();
        // Egypt borders Southern Europe (enemy, 4) and the Middle East (mine).
        let st = snapshot(
            &[0, 1],
            |t| Some(if t == 22 || t == 33 { 0 } else { 1 }),
            |t| match t {
                13 => 4,
                22 => 6,
                _ => 2,
            },
        );
        let board = Board::new(&graph, &st).unwrap();
        let config = AgentConfig::default();
        let generator = PriorityGenerator::new(&board, &config, 0);

        assert_eq!(generator.choke_surcharge(4, &[34]), 3);
        // Madagascar touches no out-choke.
        assert_eq!(generator.choke_surcharge(4, &[35]), 0);
    }

    #[test]
    fn test_continent_difficulty_includes_choke_surcharge() {
        let graph = TerritoryGraph::earth();
        let st = snapshot(
            &[0, 1],
            |t| Some(if t == 22 || t == 33 { 0 } else { 1 }),
            |t| match t {
                13 => 4,
                22 => 6,
                33 => 30,
                _ => 2,
            },
        );
        let board = Board::new(&graph, &st).unwrap();
        let config = AgentConfig::default();
        let mut generator = PriorityGenerator::new(&board, &config, 0);

        // One cluster covers the rest of Africa. Southern Europe adds 3,
        // Western Europe and Brazil add 1 each.
        let ranked = generator.score_continent(4).unwrap();
        assert_eq!(ranked.clusters.len(), 1);
        let africa = &ranked.clusters[0];
        assert_eq!(africa.attacker, 33);
        let base = cluster_difficulty_score(&board, &africa.members, &config);
        assert_eq!(africa.difficulty, base + 5);
    }

    #[test]
    fn test_unreachable_cluster_does_not_drop_continent() {
        let graph = TerritoryGraph::earth();
        // Kamchatka and Mongolia cut Japan off from the rest of Asia. Only
        // Japan is cheap enough for Kamchatka to take without a path search.
        let st = snapshot(
            &[0, 1],
            |t| Some(if t == 21 || t == 23 { 0 } else { 1 }),
            |t| match t {
                21 => 30,
                20 | 23 => 1,
                _ => 5,
            },
        );
        let board = Board::new(&graph, &st).unwrap();
        let config = AgentConfig {
            max_path_expansions: 0,
            ..AgentConfig::default()
        };
        let mut generator = PriorityGenerator::new(&board, &config, 0);

        let ranked = generator.score_continent(2).unwrap();
        assert_eq!(ranked.clusters.len(), 1);
        assert_eq!(ranked.clusters[0].members, vec![20]);
        assert_eq!(ranked.clusters[0].attacker, 21);
    }

    #[test]
    fn test_continent_with_no_reachable_cluster_is_skipped() {
        let graph = TerritoryGraph::earth();
        let st = snapshot(&[0, 1], |t| Some(if t == 21 { 0 } else { 1 }), |_| 5);
        let board = Board::new(&graph, &st).unwrap();
        let config = AgentConfig {
            max_path_expansions: 0,
            ..AgentConfig::default()
        };
        let mut generator = PriorityGenerator::new(&board, &config, 0);
        assert!(generator.score_continent(4).is_none());
    }

    #[test]
    fn test_lowest_cost_cluster_keeps_commit_order() {
        let ranking = ContinentRanking {
            entries: vec![
                RankedContinent {
                    continent: 4,
                    net_cost: 2,
                    clusters: vec![ranked_cluster(0, &[36], 5), ranked_cluster(1, &[35], 1)],
                    committed: false,
                },
                RankedContinent {
                    continent: 3,
                    net_cost: 9,
                    clusters: vec![ranked_cluster(2, &[31], 0)],
                    committed: false,
                },
            ],
        };
        assert_eq!(ranking.lowest_cost_cluster().map(|c| c.id), Some(0));
        assert!(ContinentRanking::default().lowest_cost_cluster().is_none());
    }
}
