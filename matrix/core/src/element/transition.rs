//! Enter/Exit Transitions
//!
//! # Design
//!
//! A node's transition completes once two signals have arrived: its own
//! animation finished, and its child sequence finished. Either may come
//! first, so the node tracks what it still awaits in [`Awaiting`]. Signals
//! are queued and drained after the animation pass, never delivered
//! re-entrantly, and carry the epoch of the transition that produced them so
//! a signal from a superseded transition is dropped.

use rand::Rng;

use crate::animation::{Animation, AnimationTarget};
use crate::events::ViewEvent;
use crate::grid::LayeredBuffer;
use crate::sequence::{Direction, SequenceState, TransitionSequence};
use crate::similarity::SimilarityTable;

use super::tree::ElementTree;
use super::{NodeId, Stage};

/// Signals a transition still waits for
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Awaiting {
    /// Animation and child sequence
    Both,
    /// Only the animation
    Animation,
    /// Only the child sequence
    Chain,
    Done,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SignalSource {
    Animation,
    Chain,
}

impl Awaiting {
    pub(crate) fn record(self, source: SignalSource) -> Self {
        match (self, source) {
            (Awaiting::Both, SignalSource::Animation) => Awaiting::Chain,
            (Awaiting::Both, SignalSource::Chain) => Awaiting::Animation,
            (Awaiting::Animation, SignalSource::Animation) => Awaiting::Done,
            (Awaiting::Chain, SignalSource::Chain) => Awaiting::Done,
            (state, _) => state,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct ActiveTransition {
    pub(crate) direction: Direction,
    pub(crate) awaiting: Awaiting,
    pub(crate) epoch: u32,
}

/// An animation attached to a node
#[derive(Clone, Debug)]
pub(crate) struct RunningAnimation {
    pub(crate) animation: Animation,
    /// Epoch of the transition this animation belongs to, if any
    pub(crate) transition: Option<u32>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Signal {
    Animation { node: NodeId, epoch: u32 },
    Chain { node: NodeId, epoch: u32 },
    ChildDone { parent: NodeId, child: NodeId, direction: Direction },
}

impl ElementTree {
    /// Start entering or exiting a node and, through its sequence, its children
    pub fn start_transition(&mut self, id: NodeId, direction: Direction) {
        let backdrop = self.backdrop_of(id);
        let Some(node) = self.get_mut(id) else {
            tracing::debug!(?id, "start_transition on a stale node");
            return;
        };
        if node.stage == Stage::Exited {
            tracing::debug!(key = %node.key, "Ignoring transition of an exited node");
            return;
        }

        node.epoch = node.epoch.wrapping_add(1);
        let epoch = node.epoch;
        node.stage = match direction {
            Direction::Enter => Stage::Entering,
            Direction::Exit => Stage::Exiting,
        };
        let mut awaiting = Awaiting::Both;
        match node.animations.for_direction(direction) {
            Some(config) => {
                node.animation = Some(RunningAnimation {
                    animation: Animation::new(config, backdrop),
                    transition: Some(epoch),
                });
            }
            None => {
                node.animation = None;
                awaiting = awaiting.record(SignalSource::Animation);
            }
        }
        node.transition = Some(ActiveTransition {
            direction,
            awaiting,
            epoch,
        });

        let timing = match direction {
            Direction::Enter => node.entrance_timing,
            Direction::Exit => node.exit_timing,
        };
        let children = node.children.clone();
        let sequence = node.sequence_mut(direction);
        if sequence.state() != SequenceState::Idle {
            *sequence = TransitionSequence::of_nodes(&children, timing, direction);
        }
        tracing::debug!(key = %node.key, ?direction, "Transition started");

        if direction == Direction::Exit {
            self.remove_foreign(id);
        }
        self.flag_redraw(id);
        self.start_sequence(id, direction);
    }

    /// Start a node's sequence and the transitions of the members it names
    pub(crate) fn start_sequence(&mut self, id: NodeId, direction: Direction) {
        let Some(node) = self.get_mut(id) else {
            return;
        };
        let epoch = node.epoch;
        let step = node.sequence_mut(direction).start();
        for child in step.start {
            self.start_transition(child, direction);
        }
        if step.complete {
            self.signals.push_back(Signal::Chain { node: id, epoch });
        }
    }

    /// Emit `TransitionComplete` when this node finishes a transition
    pub fn watch(&mut self, id: NodeId) {
        if let Some(node) = self.get_mut(id) {
            node.watched = true;
        }
    }

    /// Drain queued signals until none are left
    pub fn process_signals(&mut self) {
        while let Some(signal) = self.signals.pop_front() {
            match signal {
                Signal::Animation { node, epoch } => {
                    self.record(node, epoch, SignalSource::Animation);
                }
                Signal::Chain { node, epoch } => self.record(node, epoch, SignalSource::Chain),
                Signal::ChildDone {
                    parent,
                    child,
                    direction,
                } => self.child_done(parent, child, direction),
            }
        }
    }

    fn record(&mut self, id: NodeId, epoch: u32, source: SignalSource) {
        let Some(transition) = self.get_mut(id).and_then(|n| n.transition.as_mut()) else {
            return;
        };
        if transition.epoch != epoch {
            tracing::debug!(?id, epoch, "Dropping stale transition signal");
            return;
        }
        transition.awaiting = transition.awaiting.record(source);
        if transition.awaiting == Awaiting::Done {
            self.complete(id);
        }
    }

    fn child_done(&mut self, parent: NodeId, child: NodeId, direction: Direction) {
        let Some(node) = self.get_mut(parent) else {
            return;
        };
        let epoch = node.epoch;
        let in_transition = node
            .transition
            .is_some_and(|t| t.direction == direction);
        let step = node.sequence_mut(direction).member_completed(child);
        for next in step.start {
            self.start_transition(next, direction);
        }
        if step.complete && in_transition {
            self.signals.push_back(Signal::Chain {
                node: parent,
                epoch,
            });
        }
    }

    fn complete(&mut self, id: NodeId) {
        let Some(node) = self.get_mut(id) else {
            return;
        };
        let Some(transition) = node.transition.take() else {
            return;
        };
        let direction = transition.direction;
        node.stage = match direction {
            Direction::Enter => Stage::Main,
            Direction::Exit => Stage::Exited,
        };
        let key = node.key.clone();
        let watched = node.watched;
        let parent = node.parent;
        tracing::debug!(key = %key, ?direction, "Transition complete");

        if direction == Direction::Enter {
            self.flag_redraw(id);
        }
        if watched {
            self.events.push(ViewEvent::TransitionComplete {
                node: id,
                key,
                direction,
            });
        }
        if let Some(parent) = parent {
            self.signals.push_back(Signal::ChildDone {
                parent,
                child: id,
                direction,
            });
        }
    }

    /// Advance every running animation by one step
    pub fn run_animations<R: Rng + ?Sized>(
        &mut self,
        buffer: &mut LayeredBuffer,
        table: &SimilarityTable,
        rng: &mut R,
    ) {
        let mut animating = Vec::new();
        if let Some(root) = self.root {
            self.collect_animating(root, &mut animating);
        }

        for id in animating {
            let points = self.visible_points(id);
            let Some(node) = self.get_mut(id) else {
                continue;
            };
            let Some(mut running) = node.animation.take() else {
                continue;
            };
            let target = AnimationTarget {
                size: node.size,
                bordered: node.bordered,
                background: node.background,
                points: &points,
                origin: node.full_content_offset - node.content_offset() - node.scroll_offset,
            };
            if running.animation.run_step(&target, buffer, table, rng) {
                if let Some(epoch) = running.transition {
                    self.signals.push_back(Signal::Animation { node: id, epoch });
                }
            } else {
                node.animation = Some(running);
            }
        }
    }

    fn collect_animating(&self, id: NodeId, out: &mut Vec<NodeId>) {
        let Some(node) = self.get(id) else {
            return;
        };
        if node.animation.is_some() {
            out.push(id);
        }
        for child in &node.children {
            self.collect_animating(*child, out);
        }
    }
}
