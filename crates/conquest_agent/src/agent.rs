//! Request dispatcher.
//!
//! [`Agent`] owns everything that outlives a single request: the static
//! board graph, the continent priority, the setup-phase state and the turn
//! plan. Each [`Envelope`] is answered by exactly one [`Move`].

use conquest_core::prelude::*;
use tracing::{debug, error, warn};

use crate::protocol::{Envelope, Move, Query};

/// The decision-making agent.
#[derive(Debug, Clone)]
pub struct Agent {
    graph: TerritoryGraph,
    priority: ContinentPriority,
    setup: SetupState,
    planner: TurnPlanner,
    config: AgentConfig,
}

impl Default for Agent {
    fn default() -> Self {
        Self::new(AgentConfig::default())
    }
}

impl Agent {
    /// Create an agent on the Earth board.
    pub fn new(config: AgentConfig) -> Self {
        let graph = TerritoryGraph::earth();
        let priority = ContinentPriority::new(&graph);
        Self {
            graph,
            priority,
            setup: SetupState::default(),
            planner: TurnPlanner::new(),
            config,
        }
    }

    /// Tunables in use.
    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// Current turn plan.
    pub fn planner(&self) -> &TurnPlanner {
        &self.planner
    }

    /// Answer one request.
    ///
    /// Planner faults never reach the host: they are logged and answered with
    /// the closest neutral move instead.
    pub fn handle(&mut self, envelope: &Envelope) -> Move {
        let state = &envelope.state;
        let board = match Board::new(&self.graph, state) {
            Ok(board) => board,
            Err(e) => {
                error!(query = envelope.query.name(), error = %e, "Rejected snapshot");
                return Move::error(e.to_string());
            }
        };
        debug!(query = envelope.query.name(), turn = state.turn, "Handling request");

        match envelope.query {
            Query::ClaimTerritory => {
                match claim_territory(&mut self.setup, &self.priority, &board, &self.config) {
                    Ok(territory) => Move::ClaimTerritory { territory },
                    Err(e) => fallback(&e, first_unclaimed(&board).map(|territory| Move::ClaimTerritory { territory })),
                }
            }
            Query::PlaceInitialTroop => {
                match place_initial_troop(&mut self.setup, &mut self.priority, &board, &self.config) {
                    Ok(territory) => Move::PlaceInitialTroop { territory },
                    Err(e) => fallback(
                        &e,
                        strongest_owned(&board).map(|territory| Move::PlaceInitialTroop { territory }),
                    ),
                }
            }
            Query::RedeemCards { cause } => Move::RedeemCards {
                sets: redeem_cards(&board, &self.config, cause),
            },
            Query::DistributeTroops => {
                match distribute_troops(&mut self.planner, &mut self.priority, &board, &self.config) {
                    Ok(distributions) => Move::DistributeTroops { distributions },
                    Err(e) => {
                        self.planner.reset_plan();
                        let troops = state.my_troops_remaining();
                        let all_on_one = strongest_owned(&board).map(|territory| Move::DistributeTroops {
                            distributions: Distribution::from([(territory, troops)]),
                        });
                        fallback(&e, all_on_one)
                    }
                }
            }
            Query::Attack => match decide_attack(&mut self.planner, &mut self.priority, &board, &self.config) {
                Ok(AttackDecision::Attack {
                    attacker,
                    defender,
                    troops,
                }) => Move::Attack {
                    attacking_territory: attacker,
                    defending_territory: defender,
                    attacking_troops: troops,
                },
                Ok(AttackDecision::Pass) => Move::AttackPass,
                Err(e) => {
                    self.planner.reset_plan();
                    fallback(&e, Some(Move::AttackPass))
                }
            },
            Query::TroopsAfterAttack {
                attacking_territory,
                defending_territory,
                attacking_troops,
            } => match troops_after_attack(
                &mut self.planner,
                &board,
                &self.config,
                attacking_territory,
                defending_territory,
                attacking_troops,
            ) {
                Ok(troops) => Move::TroopsAfterAttack { troops },
                Err(e) => fallback(
                    &e,
                    Some(Move::TroopsAfterAttack {
                        troops: attacking_troops,
                    }),
                ),
            },
            Query::Defend {
                defending_territory, ..
            } => Move::Defend {
                troops: defend_troops(&board, defending_territory, &self.config),
            },
            Query::Fortify => match fortify(&mut self.planner, &board) {
                Some(FortifyMove {
                    source,
                    target,
                    troops,
                }) => Move::Fortify { source, target, troops },
                None => Move::FortifyPass,
            },
        }
    }
}

/// Log a planner fault and degrade to `neutral`, or report the fault when
/// there is no legal neutral move.
fn fallback(error: &PlannerError, neutral: Option<Move>) -> Move {
    match neutral {
        Some(neutral) => {
            warn!(%error, ?neutral, "Planner fault, answering with neutral move");
            neutral
        }
        None => {
            error!(%error, "Planner fault with no legal fallback");
            Move::error(error.to_string())
        }
    }
}

fn first_unclaimed(board: &Board<'_>) -> Option<TerritoryId> {
    board.owned_by(None).into_iter().next()
}

fn strongest_owned(board: &Board<'_>) -> Option<TerritoryId> {
    board.strongest(&board.my_territories())
}
