//! Screen rotation state and the animated rotate-to-north action.

use std::f32::consts::{PI, TAU};

use crate::animation::{Animation, AnimationController, AnimationHandle, Easing};

const ROTATE_DURATION: f64 = 0.3;

/// Map orientation provider for overlay widgets.
///
/// Holds the screen rotation angle and the compass-follow flag. Rotation
/// changes can be animated through the host's [`AnimationController`]; the
/// host calls [`update`](Navigator::update) each frame (after stepping the
/// controller) to publish the task's current angle.
#[derive(Debug, Default)]
pub struct Navigator {
    angle: f32,
    follow_compass: bool,
    rotation: Option<AnimationHandle>,
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current screen rotation in radians.
    pub fn screen_angle(&self) -> f32 {
        self.angle
    }

    /// Set the rotation directly, cancelling any animated rotation in flight.
    pub fn set_screen_angle(&mut self, angle: f32) {
        if let Some(rotation) = self.rotation.take() {
            rotation.cancel();
        }
        self.angle = angle;
    }

    pub fn follow_compass(&self) -> bool {
        self.follow_compass
    }

    pub fn set_follow_compass(&mut self, on: bool) {
        self.follow_compass = on;
    }

    pub fn stop_compass_follow(&mut self) {
        if self.follow_compass {
            log::debug!("navigator: compass follow off");
            self.follow_compass = false;
        }
    }

    /// Animate the screen rotation from `from` to `to` along the shortest arc.
    ///
    /// Cancels any previous rotation task. The published angle converges on a
    /// value congruent to `to` modulo a full turn.
    pub fn rotate_screen(&mut self, from: f32, to: f32, anim: &mut AnimationController) {
        let mut delta = to - from;
        while delta > PI {
            delta -= TAU;
        }
        while delta < -PI {
            delta += TAU;
        }
        let target = from + delta;

        if let Some(rotation) = self.rotation.take() {
            rotation.cancel();
        }
        log::debug!("navigator: rotate screen {from:.3} -> {target:.3}");
        self.angle = from;
        self.rotation = Some(anim.add(
            Animation::new(from, target, ROTATE_DURATION).easing(Easing::EaseOut),
        ));
    }

    /// Publish the rotation task's current angle and drop it once it settles.
    pub fn update(&mut self) {
        if let Some(rotation) = &self.rotation {
            self.angle = rotation.value();
            if !rotation.is_active() {
                self.rotation = None;
            }
        }
    }

    pub fn is_rotating(&self) -> bool {
        self.rotation.is_some()
    }
}
