//! Pointer animation state.
//!
//! Each drawn pointer owns a [`PointerContext`] that survives incremental
//! patches. Retargeting an in-flight animation starts the new transition
//! from wherever the pointer is currently displayed, so a value change
//! never makes the needle jump.

use std::cell::RefCell;
use std::rc::Rc;

use super::coordinator::{CallbackResult, FrameInfo};
use super::easing::Easing;
use crate::config::PointerConfig;

/// Per-pointer animation state, shared between the gauge and its
/// coordinator callback.
#[derive(Debug, Clone, PartialEq)]
pub struct PointerContext {
    /// Where the current transition started, in `[0, 1]`
    pub prev_percent: f64,
    /// Eased progress of the current transition; may exceed 1 while an
    /// elastic curve overshoots
    pub prev_progress: f64,
    /// Where the current transition ends
    pub current_percent: f64,
    /// Last drawn pointer path (empty for shapes drawn without a path)
    pub path: String,
    /// Whether the pointer shape is drawn as a path
    pub should_draw_path: bool,
}

pub type SharedPointerContext = Rc<RefCell<PointerContext>>;

impl PointerContext {
    /// A pointer resting at `percent`
    pub fn at(percent: f64) -> Self {
        Self {
            prev_percent: percent,
            prev_progress: 1.0,
            current_percent: percent,
            path: String::new(),
            should_draw_path: true,
        }
    }

    /// Percentage the pointer is drawn at right now, kept on the arc
    pub fn displayed_percent(&self) -> f64 {
        let p = self.prev_percent + (self.current_percent - self.prev_percent) * self.prev_progress;
        p.clamp(0.0, 1.0)
    }

    pub fn is_settled(&self) -> bool {
        self.prev_progress >= 1.0 && self.displayed_percent() == self.current_percent
    }

    /// Aim at a new percentage. Returns false when already aimed there.
    pub fn retarget(&mut self, percent: f64) -> bool {
        if percent == self.current_percent {
            return false;
        }
        self.prev_percent = self.displayed_percent();
        self.current_percent = percent;
        self.prev_progress = 0.0;
        true
    }

    /// Jump straight to `percent` with no transition
    pub fn settle(&mut self, percent: f64) {
        self.prev_percent = percent;
        self.current_percent = percent;
        self.prev_progress = 1.0;
    }
}

/// Timing of one pointer transition
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerTransition {
    /// Milliseconds before the pointer starts moving
    pub delay: f64,
    /// Milliseconds
    pub duration: f64,
    pub easing: Easing,
}

impl PointerTransition {
    /// Transition for `config`, with an extra start offset from the
    /// coordinator's stagger.
    pub fn from_config(config: &PointerConfig, stagger: f64) -> Self {
        Self {
            delay: config.animation_delay.max(0.0) + stagger.max(0.0),
            duration: config.animation_duration.max(0.0),
            easing: Easing::for_pointer(config),
        }
    }

    /// Eased progress after `elapsed` ms, and whether the transition is done
    pub fn progress_at(&self, elapsed: f64) -> (f64, bool) {
        let active = elapsed - self.delay;
        if active < 0.0 {
            return (0.0, false);
        }
        if self.duration <= 0.0 {
            return (1.0, true);
        }
        let t = (active / self.duration).min(1.0);
        if t >= 1.0 {
            (1.0, true)
        } else {
            (self.easing.apply(t), false)
        }
    }
}

/// Coordinator callback that drives `context` through `transition`.
///
/// The transition clock starts at the first frame the callback sees.
pub fn pointer_animation(
    context: SharedPointerContext,
    transition: PointerTransition,
) -> impl FnMut(&FrameInfo) -> CallbackResult {
    let mut started: Option<f64> = None;
    move |frame| {
        let start = *started.get_or_insert(frame.timestamp);
        let (progress, done) = transition.progress_at(frame.timestamp - start);
        context.borrow_mut().prev_progress = progress;
        Ok(!done)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{AnimationCoordinator, FrameQueue};

    #[test]
    fn retarget_mid_flight_starts_from_displayed_position() {
        let mut ctx = PointerContext::at(0.0);
        ctx.retarget(0.8);
        ctx.prev_progress = 0.5;
        assert!((ctx.displayed_percent() - 0.4).abs() < 1e-12);

        assert!(ctx.retarget(0.2));
        assert!((ctx.prev_percent - 0.4).abs() < 1e-12);
        assert_eq!(ctx.prev_progress, 0.0);
        assert!((ctx.displayed_percent() - 0.4).abs() < 1e-12);
    }

    #[test]
    fn retarget_to_same_value_is_ignored() {
        let mut ctx = PointerContext::at(0.3);
        assert!(!ctx.retarget(0.3));
        assert!(ctx.is_settled());
    }

    #[test]
    fn overshoot_is_kept_on_the_arc() {
        let mut ctx = PointerContext::at(0.5);
        ctx.retarget(1.0);
        ctx.prev_progress = 1.2;
        assert_eq!(ctx.displayed_percent(), 1.0);
    }

    #[test]
    fn transition_waits_for_delay() {
        let cfg = PointerConfig::default();
        let tr = PointerTransition::from_config(&cfg, 16.0);
        assert_eq!(tr.delay, 116.0);
        assert_eq!(tr.progress_at(100.0), (0.0, false));
        assert_eq!(tr.progress_at(116.0 + 3000.0), (1.0, true));
    }

    #[test]
    fn zero_duration_finishes_immediately() {
        let cfg = PointerConfig {
            animation_delay: 0.0,
            animation_duration: 0.0,
            ..PointerConfig::default()
        };
        let tr = PointerTransition::from_config(&cfg, 0.0);
        assert_eq!(tr.progress_at(0.0), (1.0, true));
    }

    #[test]
    fn callback_drives_context_to_completion() {
        let queue = FrameQueue::new();
        let coord = AnimationCoordinator::new(queue.clone());
        let ctx: SharedPointerContext = Rc::new(RefCell::new(PointerContext::at(0.0)));
        ctx.borrow_mut().retarget(1.0);

        let cfg = PointerConfig {
            animation_delay: 0.0,
            animation_duration: 100.0,
            ..PointerConfig::default()
        };
        coord.register(
            "g/pointer-0",
            0,
            pointer_animation(ctx.clone(), PointerTransition::from_config(&cfg, 0.0)),
        );

        coord.tick(0.0);
        assert!(ctx.borrow().displayed_percent() < 1e-9);
        coord.tick(50.0);
        let mid = ctx.borrow().displayed_percent();
        assert!(mid > 0.5 && mid < 1.0, "mid = {mid}");
        coord.tick(100.0);
        assert!(ctx.borrow().is_settled());
        assert!(!coord.is_registered("g/pointer-0"));
        assert!(!coord.is_running());
    }
}
