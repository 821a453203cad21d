//! Evaluation of an animation tree: rendering a frame at a relative timestamp
//! and replaying the discrete blocks crossed between two timestamps.
//!
//! Every timestamp taken here is raw (uncurved) progress on the top-level
//! node's timeline. Curves are applied node by node on the way down.

use log::trace;
use serde::{Deserialize, Serialize};

use crate::animation::blocks::{Direction, FrameContext};
use crate::animation::child::{AnimationNode, BlockEvent, ChildAnimation};
use crate::animation::Animation;

/// Whether the starting timestamp of a block range is part of the range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Inclusivity {
    Inclusive,
    Exclusive,
}

impl Inclusivity {
    #[inline]
    pub fn is_inclusive(self) -> bool {
        matches!(self, Inclusivity::Inclusive)
    }
}

/// Where a node's curved progress sits relative to a child's window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum WindowPosition {
    Before,
    Inside,
    After,
}

impl<E: 'static> Animation<E> {
    fn window_position(&self, child: &ChildAnimation<E>, progress: f64) -> WindowPosition {
        let eps = self.boundary_epsilon;
        // Windows touching the ends of the timeline extend past them.
        if child.start > eps && progress < child.start - eps {
            WindowPosition::Before
        } else if child.end() < 1.0 - eps && progress > child.end() + eps {
            WindowPosition::After
        } else {
            WindowPosition::Inside
        }
    }

    /// Writes every keyframed property for raw progress `raw`.
    ///
    /// Children that have not started yet are clamped to their start and
    /// finished children to their end; active children then render, and this
    /// node's own keyframes are applied last so they win over any child.
    pub fn apply(&self, element: &mut E, raw: f64) {
        let progress = self.curve.adjusted_progress(raw);

        let mut pending = Vec::new();
        let mut finished = Vec::new();
        let mut active = Vec::new();
        for child in &self.children {
            match self.window_position(child, progress) {
                WindowPosition::Before => pending.push(child),
                WindowPosition::Inside => active.push(child),
                WindowPosition::After => finished.push(child),
            }
        }
        pending.sort_by(|a, b| b.start.total_cmp(&a.start));
        finished.sort_by(|a, b| a.end().total_cmp(&b.end()));

        for child in pending {
            child.content.apply(element, 0.0);
        }
        for child in finished {
            child.content.apply(element, 1.0);
        }
        for child in active {
            child.content.apply(element, child.local_progress(progress));
        }
        for series in &self.keyframe_series {
            series.apply(element, progress);
        }
    }

    /// Runs per-frame blocks of this node and of every active child.
    pub(crate) fn run_per_frame(&self, element: &mut E, raw: f64) {
        let progress = self.curve.adjusted_progress(raw);
        for child in &self.children {
            if self.window_position(child, progress) == WindowPosition::Inside {
                child
                    .content
                    .run_per_frame(element, child.local_progress(progress));
            }
        }
        if self.per_frame.is_empty() {
            return;
        }
        let mut context = FrameContext {
            element,
            uncurved_progress: raw,
            progress,
        };
        for block in &self.per_frame {
            block(&mut context);
        }
    }

    /// [`apply`](Self::apply) followed by the per-frame blocks.
    pub fn render(&self, element: &mut E, raw: f64) {
        self.apply(element, raw);
        self.run_per_frame(element, raw);
    }

    /// Records the current value of every keyframed property in the tree.
    /// Relative keyframes resolve against these values.
    pub fn capture_initial_values(&mut self, element: &E) {
        for series in &mut self.keyframe_series {
            series.capture_initial_value(element);
        }
        for child in &mut self.children {
            child.content.capture_initial_values(element);
        }
    }

    /// Every discrete block in the tree on the top-level raw timeline, sorted
    /// by timestamp (ties keep tree order).
    pub(crate) fn block_events(&self) -> Vec<BlockEvent> {
        let mut events = Vec::new();
        let identity = |raw: f64| Some(raw);
        self.collect_events(&identity, &mut Vec::new(), &mut events);
        events.sort_by(|a, b| a.timestamp.total_cmp(&b.timestamp));
        events
    }

    /// Fires the blocks crossed when moving from `from` to `to`.
    ///
    /// Blocks strictly between the two timestamps fire, plus those at `to`,
    /// plus those at `from` when `inclusivity` is inclusive. Moving forward runs
    /// forward blocks in ascending order; moving back runs reverse blocks in
    /// descending order. `from == to` fires the blocks at that timestamp
    /// forward when inclusive and nothing otherwise.
    pub fn execute_blocks(&mut self, element: &mut E, from: f64, inclusivity: Inclusivity, to: f64) {
        let events = self.block_events();
        self.execute_block_events(&events, element, from, inclusivity, to);
    }

    /// `execute_blocks` over events already taken from `block_events` on this
    /// tree.
    pub(crate) fn execute_block_events(
        &mut self,
        events: &[BlockEvent],
        element: &mut E,
        from: f64,
        inclusivity: Inclusivity,
        to: f64,
    ) {
        let (direction, addresses) =
            select_events(events, from, inclusivity, to, self.boundary_epsilon);
        trace!(
            "execute blocks {} {:?} -> {}: {} block(s)",
            from,
            inclusivity,
            to,
            addresses.len()
        );
        for address in addresses {
            self.fire(element, &address, direction);
        }
    }
}

/// Addresses of the events crossed between `from` and `to`, in firing order.
fn select_events(
    events: &[BlockEvent],
    from: f64,
    inclusivity: Inclusivity,
    to: f64,
    eps: f64,
) -> (Direction, Vec<Vec<usize>>) {
    let at = |t: f64, mark: f64| (t - mark).abs() <= eps;
    let inclusive = inclusivity.is_inclusive();

    if at(from, to) {
        let addresses = if inclusive {
            events
                .iter()
                .filter(|e| at(e.timestamp, from))
                .map(|e| e.address.clone())
                .collect()
        } else {
            Vec::new()
        };
        return (Direction::Forward, addresses);
    }

    let forward = to > from;
    let crossed = |t: f64| {
        let past_start = if forward { t > from + eps } else { t < from - eps };
        let before_end = if forward { t <= to + eps } else { t >= to - eps };
        (past_start || (inclusive && at(t, from))) && before_end
    };
    let mut addresses: Vec<Vec<usize>> = events
        .iter()
        .filter(|e| crossed(e.timestamp))
        .map(|e| e.address.clone())
        .collect();

    if forward {
        (Direction::Forward, addresses)
    } else {
        addresses.reverse();
        (Direction::Reverse, addresses)
    }
}
