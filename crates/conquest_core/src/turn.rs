//! Turn-scoped planner state.
//!
//! The plan built when troops are distributed is drained by the attack
//! sequencer and torn down when fortification begins. Nothing here
//! survives past the end of the agent's turn.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::sequencer::SequencerState;
use crate::target::TargetCluster;

/// Per-turn flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnContext {
    /// At least one attack was issued this turn.
    pub attacked_this_turn: bool,
    /// A territory was captured this turn.
    pub forced_capture_done: bool,
    /// The plan must be regenerated before the next attack.
    pub plan_stale: bool,
    /// The last attack came from a cluster and awaits its capture result.
    pub cluster_attack_pending: bool,
}

impl Default for TurnContext {
    fn default() -> Self {
        Self {
            attacked_this_turn: false,
            forced_capture_done: false,
            plan_stale: true,
            cluster_attack_pending: false,
        }
    }
}

/// Queue of committed clusters plus the one being attacked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnPlanner {
    queue: VecDeque<TargetCluster>,
    current: Option<TargetCluster>,
    context: TurnContext,
    state: SequencerState,
}

impl TurnPlanner {
    /// Create an empty, stale planner.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pending clusters, front first.
    #[must_use]
    pub fn queue(&self) -> &VecDeque<TargetCluster> {
        &self.queue
    }

    /// Cluster under attack, if any.
    #[must_use]
    pub fn current(&self) -> Option<&TargetCluster> {
        self.current.as_ref()
    }

    /// Per-turn flags.
    #[must_use]
    pub fn context(&self) -> &TurnContext {
        &self.context
    }

    /// Mutable per-turn flags.
    pub fn context_mut(&mut self) -> &mut TurnContext {
        &mut self.context
    }

    /// Sequencer state.
    #[must_use]
    pub fn state(&self) -> SequencerState {
        self.state
    }

    pub(crate) fn set_state(&mut self, state: SequencerState) {
        self.state = state;
    }

    /// Drop the plan and mark it stale.
    pub fn reset_plan(&mut self) {
        self.queue.clear();
        self.current = None;
        self.context.plan_stale = true;
        self.state = SequencerState::Idle;
    }

    /// Append a cluster to the back of the queue.
    pub fn enqueue(&mut self, cluster: TargetCluster) {
        self.queue.push_back(cluster);
    }

    /// Replace the plan with `clusters` and mark it fresh.
    pub fn install<I>(&mut self, clusters: I)
    where
        I: IntoIterator<Item = TargetCluster>,
    {
        self.reset_plan();
        self.queue.extend(clusters);
        self.context.plan_stale = false;
    }

    /// Move the front of the queue into the current slot.
    pub(crate) fn advance(&mut self) -> Option<&TargetCluster> {
        self.current = self.queue.pop_front();
        self.current.as_ref()
    }

    /// Abandon the current cluster.
    pub(crate) fn discard_current(&mut self) {
        self.current = None;
    }

    /// Tear the plan down and clear the per-turn flags.
    pub fn end_turn(&mut self) {
        self.reset_plan();
        self.context.attacked_this_turn = false;
        self.context.forced_capture_done = false;
        self.context.cluster_attack_pending = false;
    }
}
