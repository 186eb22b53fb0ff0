//! Transition Sequencing
//!
//! Orchestrates the enter/exit transitions of a group of nodes (or nested
//! groups), either all at once or one after another.
//!
//! # Design
//!
//! A sequence never touches nodes itself. `start` and `member_completed`
//! return a [`SequenceStep`] naming the nodes whose transitions the caller
//! must start now, and whether the sequence just completed. Completion is
//! reported exactly once; late, duplicate or foreign reports are ignored.

use serde::{Deserialize, Serialize};

use crate::element::NodeId;

/// Whether members start together or one after another
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timing {
    #[default]
    Parallel,
    Series,
}

/// Which transition a sequence drives
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Enter,
    Exit,
}

/// One entry of a sequence
#[derive(Clone, Debug)]
pub enum Member {
    Node(NodeId),
    Sequence(TransitionSequence),
}

impl From<NodeId> for Member {
    fn from(id: NodeId) -> Self {
        Member::Node(id)
    }
}

impl From<TransitionSequence> for Member {
    fn from(seq: TransitionSequence) -> Self {
        Member::Sequence(seq)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SequenceState {
    Idle,
    Running,
    Complete,
}

/// What the caller must do after driving a sequence
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SequenceStep {
    /// Nodes whose transition starts now, in order
    pub start: Vec<NodeId>,
    /// The sequence finished during this call
    pub complete: bool,
}

impl SequenceStep {
    fn absorb(&mut self, other: SequenceStep) -> bool {
        self.start.extend(other.start);
        other.complete
    }
}

#[derive(Clone, Debug)]
pub struct TransitionSequence {
    members: Vec<Member>,
    timing: Timing,
    direction: Direction,
    state: SequenceState,
    started: Vec<bool>,
    done: Vec<bool>,
}

impl TransitionSequence {
    pub fn new(members: Vec<Member>, timing: Timing, direction: Direction) -> Self {
        let len = members.len();
        Self {
            members,
            timing,
            direction,
            state: SequenceState::Idle,
            started: vec![false; len],
            done: vec![false; len],
        }
    }

    /// Sequence over plain nodes
    pub fn of_nodes(nodes: &[NodeId], timing: Timing, direction: Direction) -> Self {
        Self::new(nodes.iter().copied().map(Member::Node).collect(), timing, direction)
    }

    pub fn empty(direction: Direction) -> Self {
        Self::new(Vec::new(), Timing::Parallel, direction)
    }

    pub fn state(&self) -> SequenceState {
        self.state
    }

    pub fn timing(&self) -> Timing {
        self.timing
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn is_running(&self) -> bool {
        self.state == SequenceState::Running
    }

    /// Every node in the sequence, depth-first
    pub fn nodes(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        for member in &self.members {
            match member {
                Member::Node(id) => out.push(*id),
                Member::Sequence(seq) => out.extend(seq.nodes()),
            }
        }
        out
    }

    /// Begin the sequence
    ///
    /// An empty sequence completes immediately. Starting a sequence that is
    /// not idle does nothing.
    pub fn start(&mut self) -> SequenceStep {
        let mut step = SequenceStep::default();
        if self.state != SequenceState::Idle {
            return step;
        }
        self.state = SequenceState::Running;
        if self.members.is_empty() {
            self.state = SequenceState::Complete;
            step.complete = true;
            return step;
        }
        match self.timing {
            Timing::Parallel => {
                for i in 0..self.members.len() {
                    self.start_member(i, &mut step);
                }
            }
            Timing::Series => self.start_member(0, &mut step),
        }
        step
    }

    /// Record that `node` finished its transition
    pub fn member_completed(&mut self, node: NodeId) -> SequenceStep {
        let mut step = SequenceStep::default();
        if self.state != SequenceState::Running {
            return step;
        }
        for i in 0..self.members.len() {
            if !self.started[i] || self.done[i] {
                continue;
            }
            let finished = match &mut self.members[i] {
                Member::Node(id) if *id == node => true,
                Member::Node(_) => false,
                Member::Sequence(seq) => step.absorb(seq.member_completed(node)),
            };
            if finished {
                self.mark_done(i, &mut step);
                break;
            }
        }
        step
    }

    fn start_member(&mut self, i: usize, step: &mut SequenceStep) {
        if self.started[i] {
            return;
        }
        self.started[i] = true;
        let finished = match &mut self.members[i] {
            Member::Node(id) => {
                step.start.push(*id);
                false
            }
            Member::Sequence(seq) => step.absorb(seq.start()),
        };
        if finished {
            self.mark_done(i, step);
        }
    }

    fn mark_done(&mut self, i: usize, step: &mut SequenceStep) {
        self.done[i] = true;
        if self.timing == Timing::Series && i + 1 < self.members.len() {
            self.start_member(i + 1, step);
        }
        if self.state == SequenceState::Running && self.done.iter().all(|d| *d) {
            self.state = SequenceState::Complete;
            step.complete = true;
        }
    }
}
