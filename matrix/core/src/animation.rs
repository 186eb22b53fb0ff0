//! Head/Tail Sweep Animations
//!
//! An animation moves a head across a node's visible cells along a
//! shape-dependent path. Cells just behind the head form the tail and show
//! substitute glyphs from the similarity table; cells further back show the
//! node's content (entrance, interaction) or the backdrop (exit).
//!
//! # Design
//!
//! Animations draw only into the animation layer and never own the node
//! they animate. The caller passes the node's current geometry every step,
//! so a node that resizes mid-animation keeps a consistent extent.
//! `run_step` reports completion exactly once.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::geometry::IntPoint;
use crate::glyphs::SPACE_CHAR;
use crate::grid::{CharGrid, LayeredBuffer};
use crate::similarity::SimilarityTable;

/// Path the head follows
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnimationKind {
    /// Row-major sweep; bordered nodes trace the perimeter first
    RowTracer,
    /// Skewed diagonal wavefront at distance `x + y * slant`
    DiagonalSwipe { slant: i32 },
}

/// What the animation is for
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationUse {
    Entrance,
    Exit,
    Interaction,
}

/// Parameters for one animation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimationConfig {
    pub kind: AnimationKind,
    pub tail_length: i32,
    /// Cells the head advances per step
    pub head_speed: i32,
    /// Upper bound (exclusive) of the random offset added to tail indices
    pub jitter: i32,
    pub usage: AnimationUse,
}

impl AnimationConfig {
    pub fn row_tracer(usage: AnimationUse) -> Self {
        Self {
            kind: AnimationKind::RowTracer,
            tail_length: 8,
            head_speed: 1,
            jitter: 3,
            usage,
        }
    }

    pub fn diagonal_swipe(slant: i32, usage: AnimationUse) -> Self {
        Self {
            kind: AnimationKind::DiagonalSwipe { slant },
            tail_length: 8,
            head_speed: 1,
            jitter: 3,
            usage,
        }
    }

    #[must_use]
    pub fn with_tail_length(mut self, tail_length: i32) -> Self {
        self.tail_length = tail_length.max(0);
        self
    }

    #[must_use]
    pub fn with_head_speed(mut self, head_speed: i32) -> Self {
        self.head_speed = head_speed;
        self
    }

    #[must_use]
    pub fn with_jitter(mut self, jitter: i32) -> Self {
        self.jitter = jitter.max(0);
        self
    }

    /// Same shape and timing, different use
    #[must_use]
    pub fn for_use(mut self, usage: AnimationUse) -> Self {
        self.usage = usage;
        self
    }
}

/// Geometry of the animated node for one step
#[derive(Clone, Copy, Debug)]
pub struct AnimationTarget<'a> {
    pub size: IntPoint,
    pub bordered: bool,
    /// The node's own background filler
    pub background: char,
    /// Visible cells in node-local coordinates
    pub points: &'a [IntPoint],
    /// Screen position of the node's top-left corner
    pub origin: IntPoint,
}

impl AnimationTarget<'_> {
    fn is_on_border(&self, p: IntPoint) -> bool {
        self.bordered
            && (p.x == 0 || p.y == 0 || p.x == self.size.x - 1 || p.y == self.size.y - 1)
    }
}

/// A running sweep
#[derive(Clone, Debug)]
pub struct Animation {
    config: AnimationConfig,
    head: i32,
    /// Glyph behind an exit tail, normally the parent's background
    backdrop: char,
    finished: bool,
}

impl Animation {
    pub fn new(config: AnimationConfig, backdrop: char) -> Self {
        let config = AnimationConfig {
            head_speed: config.head_speed.max(1),
            tail_length: config.tail_length.max(0),
            jitter: config.jitter.max(0),
            ..config
        };
        Self {
            config,
            head: 0,
            backdrop,
            finished: false,
        }
    }

    pub fn config(&self) -> &AnimationConfig {
        &self.config
    }

    pub fn head(&self) -> i32 {
        self.head
    }

    /// True once completion has been reported
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Length of the head's path over a node of `size`
    pub fn extent(&self, size: IntPoint) -> i32 {
        match self.config.kind {
            AnimationKind::RowTracer => size.x * size.y,
            AnimationKind::DiagonalSwipe { slant } => size.x + slant * size.y,
        }
    }

    /// The head has cleared the shape and the whole tail
    pub fn is_complete(&self, size: IntPoint) -> bool {
        self.head > self.extent(size) + self.config.tail_length + 2
    }

    /// Position of a cell along the head's path
    pub fn distance_from_start(&self, p: IntPoint, size: IntPoint, bordered: bool) -> i32 {
        match self.config.kind {
            AnimationKind::DiagonalSwipe { slant } => p.x + p.y * slant,
            AnimationKind::RowTracer if bordered => row_tracer_bordered(p, size),
            AnimationKind::RowTracer => p.y * size.x + p.x,
        }
    }

    /// Draw one frame and advance the head
    ///
    /// Returns `true` exactly once, on the first call after the head clears
    /// the shape. Later calls draw nothing and return `false`.
    pub fn run_step<R: Rng + ?Sized>(
        &mut self,
        target: &AnimationTarget<'_>,
        buffer: &mut LayeredBuffer,
        table: &SimilarityTable,
        rng: &mut R,
    ) -> bool {
        if self.finished {
            return false;
        }
        if self.is_complete(target.size) {
            self.finished = true;
            return true;
        }
        self.draw(target, buffer, table, rng);
        self.head += self.config.head_speed;
        false
    }

    fn draw<R: Rng + ?Sized>(
        &self,
        target: &AnimationTarget<'_>,
        buffer: &mut LayeredBuffer,
        table: &SimilarityTable,
        rng: &mut R,
    ) {
        let (content, animation) = buffer.content_and_animation();
        let usage = self.config.usage;
        let tail = self.config.tail_length;

        if usage == AnimationUse::Entrance && self.head == 0 {
            for &p in target.points {
                animation.set(p, self.backdrop, target.origin);
            }
        }

        for &p in target.points {
            let behind = self.head - self.distance_from_start(p, target.size, target.bordered);
            if behind <= 0 {
                continue;
            }
            let ch = if behind <= tail + 1 {
                self.tail_char(behind, p, target, content, table, rng)
            } else if usage == AnimationUse::Exit {
                self.backdrop
            } else {
                content.get(p, target.origin)
            };
            animation.set(p, ch, target.origin);
        }
    }

    fn tail_char<R: Rng + ?Sized>(
        &self,
        behind: i32,
        p: IntPoint,
        target: &AnimationTarget<'_>,
        content: &mut CharGrid,
        table: &SimilarityTable,
        rng: &mut R,
    ) -> char {
        let base = content.get(p, target.origin);
        if !table.contains(base) || base == SPACE_CHAR {
            return base;
        }

        let tail = self.config.tail_length;
        let exiting = self.config.usage == AnimationUse::Exit;
        // front half of an exit tail dissolves, everything else reforms
        let front_half = exiting && 2 * behind <= tail;
        let mut index = if front_half { behind } else { tail - behind + 1 };

        let randomize = target.is_on_border(p)
            || base == target.background
            || (exiting && !front_half);
        if randomize && index != 0 && self.config.jitter > 0 {
            index += rng.gen_range(0..self.config.jitter);
        }

        table.substitute(base, index.max(0) as usize)
    }
}

/// Perimeter clockwise from the top-left corner, then the interior row-major
fn row_tracer_bordered(p: IntPoint, size: IntPoint) -> i32 {
    let (w, h) = (size.x, size.y);
    let (x, y) = (p.x, p.y);
    if w < 2 || h < 2 {
        return y * w + x;
    }
    let perimeter = 2 * (w - 1) + 2 * (h - 1);
    if y == 0 {
        x
    } else if x == w - 1 {
        (w - 1) + y
    } else if y == h - 1 {
        (w - 1) + (h - 1) + (w - 1 - x)
    } else if x == 0 {
        2 * (w - 1) + (h - 1) + (h - 1 - y)
    } else {
        perimeter + (y - 1) * (w - 2) + (x - 1)
    }
}
