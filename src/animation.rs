//! Animation system for overlay widgets.
//!
//! Tasks interpolate a scalar between two endpoints over a fixed duration,
//! optionally after a delay. They advance only through timestamped `step`
//! calls issued by the [`AnimationController`] from the host's frame loop;
//! nothing here spawns threads or timers. Owners keep an [`AnimationHandle`]
//! to read the current value and observe completion.

mod easing;

use std::cell::RefCell;
use std::rc::Rc;

pub use easing::Easing;

/// Animation task state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnimationState {
    /// Registered but not yet stepped.
    Pending,
    /// Currently playing.
    Running,
    /// Ran to completion; the value rests at the end point.
    Finished,
    /// Stopped before completion; the value is frozen where it was.
    Cancelled,
}

/// A single scalar interpolation task.
///
/// Timestamps are seconds on the host's monotonic clock (see [`FrameClock`]).
/// During the delay phase the value holds at `from`.
#[derive(Debug, Clone)]
pub struct Animation {
    /// Starting value.
    pub from: f32,
    /// Ending value.
    pub to: f32,
    /// Active duration in seconds, delay excluded.
    pub duration: f64,
    /// Delay before interpolation begins, in seconds.
    pub delay: f64,
    /// Easing function.
    pub easing: Easing,
    state: AnimationState,
    started_at: f64,
    current: f32,
}

impl Animation {
    /// Create a new animation task.
    pub fn new(from: f32, to: f32, duration: f64) -> Self {
        Self {
            from,
            to,
            duration,
            delay: 0.0,
            easing: Easing::default(),
            state: AnimationState::Pending,
            started_at: 0.0,
            current: from,
        }
    }

    /// Set delay before starting.
    pub fn delay(mut self, delay: f64) -> Self {
        self.delay = delay;
        self
    }

    /// Set easing function.
    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Mark the task running as of `now`. No effect unless Pending.
    pub fn start(&mut self, now: f64) {
        if self.state == AnimationState::Pending {
            self.started_at = now;
            self.state = AnimationState::Running;
        }
    }

    /// Advance to the given timestamp and return the current value.
    ///
    /// A step landing at or past `delay + duration` finishes the task and
    /// rests the value at the end point.
    pub fn step(&mut self, now: f64) -> f32 {
        if self.state != AnimationState::Running {
            return self.current;
        }
        let elapsed = now - (self.started_at + self.delay);
        if elapsed >= 0.0 {
            let t = if self.duration > 0.0 {
                (elapsed / self.duration) as f32
            } else {
                1.0
            };
            if t >= 1.0 {
                self.current = self.to;
                self.state = AnimationState::Finished;
            } else {
                self.current = self.from + self.easing.apply(t) * (self.to - self.from);
            }
        }
        self.current
    }

    /// Current value without advancing time.
    pub fn value(&self) -> f32 {
        self.current
    }

    /// Stop the task, freezing its value. Cancelled tasks never restart.
    pub fn cancel(&mut self) {
        if self.state != AnimationState::Finished {
            self.state = AnimationState::Cancelled;
        }
    }

    /// Get current state.
    pub fn state(&self) -> AnimationState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state == AnimationState::Finished
    }

    pub fn is_cancelled(&self) -> bool {
        self.state == AnimationState::Cancelled
    }

    /// Pending or Running.
    pub fn is_active(&self) -> bool {
        matches!(self.state, AnimationState::Pending | AnimationState::Running)
    }
}

/// Shared handle to a registered animation task.
///
/// The controller and the owning widget each hold a clone; the owner reads
/// the value and polls for completion, the controller steps the task.
#[derive(Debug)]
pub struct AnimationHandle(Rc<RefCell<Animation>>);

impl Clone for AnimationHandle {
    fn clone(&self) -> Self {
        AnimationHandle(self.0.clone())
    }
}

impl AnimationHandle {
    pub fn value(&self) -> f32 {
        self.0.borrow().value()
    }

    pub fn start_value(&self) -> f32 {
        self.0.borrow().from
    }

    pub fn end_value(&self) -> f32 {
        self.0.borrow().to
    }

    pub fn is_finished(&self) -> bool {
        self.0.borrow().is_finished()
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.borrow().is_cancelled()
    }

    pub fn is_active(&self) -> bool {
        self.0.borrow().is_active()
    }

    /// Cancel the underlying task. The controller reaps it on its next step.
    pub fn cancel(&self) {
        self.0.borrow_mut().cancel();
    }
}

/// Steps registered animation tasks from the host frame loop.
#[derive(Debug, Default)]
pub struct AnimationController {
    tasks: Vec<AnimationHandle>,
}

impl AnimationController {
    /// Create a new animation controller.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a task. Returns the handle the owner keeps.
    pub fn add(&mut self, animation: Animation) -> AnimationHandle {
        let handle = AnimationHandle(Rc::new(RefCell::new(animation)));
        self.tasks.push(handle.clone());
        handle
    }

    /// Advance every live task to `now`.
    ///
    /// Pending tasks start on this call. Returns true if any task advanced,
    /// which is the host's signal that a redraw is needed. Finished and
    /// cancelled tasks are dropped from the controller; owners holding a
    /// handle can still read their final state.
    pub fn step(&mut self, now: f64) -> bool {
        let mut animating = false;
        self.tasks.retain(|task| {
            let mut anim = task.0.borrow_mut();
            if anim.state() == AnimationState::Pending {
                anim.start(now);
            }
            if anim.state() == AnimationState::Running {
                anim.step(now);
                animating = true;
            }
            anim.is_active()
        });
        animating
    }

    /// True when no tasks remain.
    pub fn is_idle(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Number of live tasks.
    pub fn active_count(&self) -> usize {
        self.tasks.len()
    }
}

/// Monotonic frame clock producing the timestamps tasks are stepped with.
///
/// Uses web_time so the same code runs on wasm targets.
#[derive(Debug)]
pub struct FrameClock {
    origin: web_time::Instant,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            origin: web_time::Instant::now(),
        }
    }

    /// Seconds since the clock was created.
    pub fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_animation_basic() {
        let mut anim = Animation::new(0.0, 100.0, 1.0);
        anim.start(10.0);
        assert_eq!(anim.state(), AnimationState::Running);

        let val = anim.step(10.5);
        assert!((val - 50.0).abs() < 0.001);

        let val = anim.step(11.0);
        assert!((val - 100.0).abs() < 0.001);
        assert!(anim.is_finished());
    }

    #[test]
    fn test_animation_delay_holds_start_value() {
        let mut anim = Animation::new(0.1, 1.0, 0.2).delay(1.0);
        anim.start(0.0);

        // Still in the delay phase.
        let val = anim.step(0.5);
        assert!((val - 0.1).abs() < 0.001);
        assert!(!anim.is_finished());

        // Halfway through the active phase.
        let val = anim.step(1.1);
        assert!((val - 0.55).abs() < 0.001);

        let val = anim.step(1.2);
        assert!((val - 1.0).abs() < 0.001);
        assert!(anim.is_finished());
    }

    #[test]
    fn test_step_exactly_at_end_finishes() {
        // Hide profile: 1.0 -> 0.0 over 0.3s after a 1.0s delay.
        let mut anim = Animation::new(1.0, 0.0, 0.3).delay(1.0);
        anim.start(0.0);

        let val = anim.step(1.15);
        assert!((val - 0.5).abs() < 0.001);
        assert!(!anim.is_finished());

        let val = anim.step(1.3);
        assert!((val - 0.0).abs() < 0.001);
        assert!(anim.is_finished());
    }

    #[test]
    fn test_value_is_clamped_past_duration() {
        let mut anim = Animation::new(0.0, 1.0, 0.2);
        anim.start(0.0);
        let val = anim.step(5.0);
        assert!((val - 1.0).abs() < 0.001);
        assert!(anim.is_finished());
        // Stepping a finished task changes nothing.
        let val = anim.step(6.0);
        assert!((val - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_pending_reads_start_value() {
        let anim = Animation::new(0.25, 1.0, 0.2);
        assert!((anim.value() - 0.25).abs() < 0.001);
        assert!(anim.is_active());
    }

    #[test]
    fn test_cancel_freezes_value() {
        let mut anim = Animation::new(0.0, 1.0, 1.0);
        anim.start(0.0);
        anim.step(0.5);
        anim.cancel();
        assert!(anim.is_cancelled());

        let val = anim.step(1.0);
        assert!((val - 0.5).abs() < 0.001);
        // A cancelled task never restarts.
        anim.start(2.0);
        assert!(anim.is_cancelled());
    }

    #[test]
    fn test_zero_duration_finishes_immediately() {
        let mut anim = Animation::new(0.0, 1.0, 0.0);
        anim.start(0.0);
        let val = anim.step(0.0);
        assert!((val - 1.0).abs() < 0.001);
        assert!(anim.is_finished());
    }

    #[test]
    fn test_eased_step_differs_from_linear() {
        let mut linear = Animation::new(0.0, 1.0, 1.0);
        let mut eased = Animation::new(0.0, 1.0, 1.0).easing(Easing::EaseOut);
        linear.start(0.0);
        eased.start(0.0);
        assert!(eased.step(0.5) > linear.step(0.5));
    }

    #[test]
    fn test_controller_starts_tasks_on_first_step() {
        let mut controller = AnimationController::new();
        let handle = controller.add(Animation::new(0.0, 100.0, 1.0));
        assert!((handle.value() - 0.0).abs() < 0.001);

        // First step records the start timestamp.
        assert!(controller.step(7.0));
        assert!(controller.step(7.5));
        assert!((handle.value() - 50.0).abs() < 0.001);
    }

    #[test]
    fn test_controller_drops_finished_tasks() {
        let mut controller = AnimationController::new();
        let short = controller.add(Animation::new(0.0, 1.0, 0.1));
        let long = controller.add(Animation::new(0.0, 1.0, 10.0));
        assert_eq!(controller.active_count(), 2);

        controller.step(0.0);
        assert!(controller.step(0.5));
        assert_eq!(controller.active_count(), 1);
        assert!(short.is_finished());
        assert!((short.value() - 1.0).abs() < 0.001);
        assert!(long.is_active());

        assert!(controller.step(10.0));
        assert!(controller.is_idle());
        assert!(!controller.step(11.0));
        assert!(long.is_finished());
    }

    #[test]
    fn test_controller_reaps_cancelled_tasks() {
        let mut controller = AnimationController::new();
        let handle = controller.add(Animation::new(0.0, 1.0, 1.0));
        controller.step(0.0);
        handle.cancel();

        assert!(!controller.step(0.5));
        assert!(controller.is_idle());
        assert!(handle.is_cancelled());
    }

    #[test]
    fn test_handle_endpoints() {
        let mut controller = AnimationController::new();
        let handle = controller.add(Animation::new(1.0, 0.0, 0.3).delay(1.0));
        assert!((handle.start_value() - 1.0).abs() < 0.001);
        assert!((handle.end_value() - 0.0).abs() < 0.001);
    }

    #[test]
    fn test_frame_clock_monotonic() {
        let clock = FrameClock::new();
        let first = clock.now();
        std::thread::sleep(std::time::Duration::from_millis(10));
        let second = clock.now();
        assert!(second >= first);
        assert!(second - first >= 0.005); // Allow some tolerance
    }
}
