//! Drivers turn elapsed time into executor calls.
//!
//! A [`Driver`] owns the delay/duration/repeat policy and is stepped by
//! explicit [`Driver::tick`] calls; it never touches a platform timer. It talks
//! to the running animation only through [`DrivenAnimation`], which is also
//! the seam test doubles implement to record the exact call sequence.

use log::trace;

use crate::executor::Inclusivity;
use crate::instance::CancelationBehavior;
use crate::timing::Timing;

/// What a driver may ask of a running animation.
pub trait DrivenAnimation {
    fn execute_blocks(&mut self, from: f64, inclusivity: Inclusivity, to: f64);
    fn render_frame(&mut self, relative_timestamp: f64);
    fn mark_animation_as_complete(&mut self);
}

/// Schedules a running animation.
pub trait Driver {
    /// Called once, right after the instance captured its initial values.
    fn animation_instance_did_initialize(&mut self, animation: &mut dyn DrivenAnimation);
    /// Called once when the instance is cancelled; runs the close-out inline.
    fn animation_instance_did_cancel(
        &mut self,
        animation: &mut dyn DrivenAnimation,
        behavior: CancelationBehavior,
    );
    /// Advances to `elapsed` seconds since the instance started.
    fn tick(&mut self, animation: &mut dyn DrivenAnimation, elapsed: f64);
}

/// Position of the driver on the repeat timeline.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Cursor {
    cycle: u64,
    relative: f64,
    /// Whether blocks at `relative` still have to run.
    inclusive: bool,
}

impl Cursor {
    const START: Cursor = Cursor {
        cycle: 0,
        relative: 0.0,
        inclusive: true,
    };

    fn inclusivity(&self) -> Inclusivity {
        if self.inclusive {
            Inclusivity::Inclusive
        } else {
            Inclusivity::Exclusive
        }
    }
}

/// The default driver: a delay, then `repeat_style.count` cycles of
/// `duration` seconds each.
#[derive(Clone, Debug)]
pub struct TimelineDriver {
    timing: Timing,
    cursor: Option<Cursor>,
    finished: bool,
}

impl TimelineDriver {
    pub fn new(timing: Timing) -> Self {
        Self {
            timing,
            cursor: None,
            finished: false,
        }
    }

    pub fn timing(&self) -> &Timing {
        &self.timing
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Last cycle that runs to completion; a zero-length infinite animation
    /// completes after one.
    fn final_cycle(&self) -> u64 {
        self.timing.repeat_style.last_cycle().unwrap_or(0)
    }

    /// Runs every block between the cursor and `(cycle, relative)`, crossing
    /// each intermediate cycle boundary on the way.
    fn advance_to(&mut self, animation: &mut dyn DrivenAnimation, cycle: u64, relative: f64) {
        let repeat = self.timing.repeat_style;
        let mut cursor = self.cursor.take().unwrap_or(Cursor::START);

        while cursor.cycle < cycle {
            let end = repeat.cycle_endpoint(cursor.cycle);
            animation.execute_blocks(cursor.relative, cursor.inclusivity(), end);
            trace!("cycle {} closed at {}", cursor.cycle, end);

            let next = cursor.cycle + 1;
            cursor = if repeat.autoreversing {
                Cursor {
                    cycle: next,
                    relative: end,
                    inclusive: true,
                }
            } else {
                // Undo the finished cycle so the next one starts clean.
                animation.execute_blocks(1.0, Inclusivity::Inclusive, 0.0);
                Cursor {
                    cycle: next,
                    relative: 0.0,
                    inclusive: true,
                }
            };
        }

        animation.execute_blocks(cursor.relative, cursor.inclusivity(), relative);
        self.cursor = Some(Cursor {
            cycle,
            relative,
            inclusive: false,
        });
    }

    fn finish(&mut self, animation: &mut dyn DrivenAnimation) {
        let last = self.final_cycle();
        let end = self.timing.repeat_style.cycle_endpoint(last);
        self.advance_to(animation, last, end);
        animation.render_frame(end);
        self.finished = true;
        animation.mark_animation_as_complete();
    }

    fn cancel_revert(&mut self, animation: &mut dyn DrivenAnimation) {
        let Some(cursor) = self.cursor else {
            return;
        };
        let end = self.timing.repeat_style.cycle_endpoint(cursor.cycle);
        self.advance_to(animation, cursor.cycle, end);
        if end == 1.0 {
            animation.execute_blocks(1.0, Inclusivity::Inclusive, 0.0);
        }
        animation.render_frame(0.0);
    }

    fn cancel_complete(&mut self, animation: &mut dyn DrivenAnimation) {
        let repeat = self.timing.repeat_style;
        let final_end = repeat.cycle_endpoint(self.final_cycle());

        let Some(cursor) = self.cursor else {
            // Nothing ran yet: jump straight to the natural final state.
            if final_end == 1.0 {
                animation.execute_blocks(0.0, Inclusivity::Inclusive, 1.0);
            }
            animation.render_frame(final_end);
            return;
        };

        let end = repeat.cycle_endpoint(cursor.cycle);
        self.advance_to(animation, cursor.cycle, end);
        if repeat.is_infinite() {
            animation.render_frame(end);
            return;
        }
        if end != final_end {
            animation.execute_blocks(end, Inclusivity::Inclusive, final_end);
        }
        animation.render_frame(final_end);
    }
}

impl Driver for TimelineDriver {
    fn animation_instance_did_initialize(&mut self, animation: &mut dyn DrivenAnimation) {
        if self.timing.delay > 0.0 {
            return;
        }
        if self.timing.duration == 0.0 {
            self.finish(animation);
            return;
        }
        animation.render_frame(0.0);
        self.cursor = Some(Cursor::START);
    }

    fn animation_instance_did_cancel(
        &mut self,
        animation: &mut dyn DrivenAnimation,
        behavior: CancelationBehavior,
    ) {
        if self.finished {
            return;
        }
        match behavior {
            CancelationBehavior::Halt => {}
            CancelationBehavior::Revert => self.cancel_revert(animation),
            CancelationBehavior::Complete => self.cancel_complete(animation),
        }
        self.finished = true;
    }

    fn tick(&mut self, animation: &mut dyn DrivenAnimation, elapsed: f64) {
        if self.finished {
            return;
        }
        let local = elapsed - self.timing.delay;
        if local < 0.0 {
            return;
        }
        if self.timing.duration == 0.0 {
            self.finish(animation);
            return;
        }

        let position = local / self.timing.duration;
        let repeat = self.timing.repeat_style;
        if !repeat.is_infinite() && position >= f64::from(repeat.count) {
            self.finish(animation);
            return;
        }

        let cycle = position.floor() as u64;
        let fraction = position - position.floor();
        let relative = if repeat.is_forward(cycle) {
            fraction
        } else {
            1.0 - fraction
        };
        self.advance_to(animation, cycle, relative);
        animation.render_frame(relative);
    }
}
