//! Compass arrow overlay.
//!
//! A rotating compass icon anchored at a screen pivot. The widget fades in
//! and out through the host's animation controller, reports a lazily
//! recomputed oriented bounding rect, hit-tests as a circle around the pivot,
//! and on tap turns the map back to north.

use std::f32::consts::FRAC_PI_2;

use smallvec::SmallVec;

use crate::animation::{Animation, AnimationHandle};
use crate::element::{
    ElementState, EventContext, EventResult, LayoutContext, Overlay, PaintContext,
};
use crate::geometry::{OrientedBounds, Point, Size, Transform};
use crate::scene::{DisplayList, GpuVertex};
use crate::skin::{IconId, Skin};

const SHOW_FROM_ALPHA: f32 = 0.1;
const SHOW_DURATION: f64 = 0.2;
const HIDE_DURATION: f64 = 0.3;
const HIDE_DELAY: f64 = 1.0;
/// Hit radius as a multiple of the icon's half extent.
const HIT_RADIUS_FACTOR: f32 = 1.5;

pub struct Compass {
    state: ElementState,
    /// Rotation in radians, fed from the navigation source.
    angle: f32,
    icon: String,
    /// Active fade, if one is in flight. At most one at a time; starting a
    /// new fade cancels and replaces the old one.
    fade: Option<AnimationHandle>,
    /// Visibility applied when the current fade finishes.
    fade_shows: bool,
    list: Option<DisplayList>,
    bound_rects: SmallVec<[OrientedBounds; 1]>,
}

impl Compass {
    pub fn new() -> Self {
        Self {
            state: ElementState::default(),
            angle: 0.0,
            icon: "compass".into(),
            fade: None,
            fade_shows: false,
            list: None,
            bound_rects: SmallVec::new(),
        }
    }

    pub fn pivot(mut self, pivot: Point) -> Self {
        self.set_pivot(pivot);
        self
    }

    pub fn set_pivot(&mut self, pivot: Point) {
        if self.state.pivot != pivot {
            self.state.pivot = pivot;
            self.state.dirty_rect = true;
        }
    }

    pub fn depth(mut self, depth: u32) -> Self {
        self.state.depth = depth;
        self
    }

    /// Name of the skin icon to draw. Defaults to `"compass"`.
    pub fn icon(mut self, name: impl Into<String>) -> Self {
        self.icon = name.into();
        self
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// Update the rotation. Marks the bounding shape dirty when the angle
    /// actually changed.
    pub fn set_angle(&mut self, angle: f32) {
        if self.angle != angle {
            self.angle = angle;
            self.state.dirty_rect = true;
        }
    }

    /// Current fade alpha, or fully opaque when no fade is in flight.
    pub fn alpha(&self) -> f32 {
        self.fade.as_ref().map_or(1.0, AnimationHandle::value)
    }

    /// Icon's native size from the skin, unscaled.
    pub fn pixel_size(&self, skin: &Skin) -> Size {
        skin.icon_size(self.resolve_icon(skin))
    }

    /// Fade the widget in: 0.2 s, no delay.
    ///
    /// A hidden widget becomes visible immediately; alpha, not the visibility
    /// flag, drives transparency while the fade runs. Called during a hide
    /// fade, this cancels the hide and resumes from its current alpha.
    /// Idempotent while a show fade is live or the widget is fully shown.
    /// Without an animation controller the request is dropped.
    pub fn animate_show(&mut self, cx: &mut EventContext) {
        if cx.anim.is_none() {
            log::debug!("compass: no animation controller, show dropped");
            return;
        }
        self.sync_fade();

        if !self.state.visible && self.fade_absent_or_hiding() {
            self.state.visible = true;
            self.start_fade(SHOW_FROM_ALPHA, 1.0, SHOW_DURATION, 0.0, true, cx);
        }

        if self.state.visible && self.fade_absent_or_hiding() {
            let from = self.alpha();
            self.start_fade(from, 1.0, SHOW_DURATION, 0.0, true, cx);
        }
    }

    /// Fade the widget out: 0.3 s after a 1.0 s delay.
    ///
    /// Fires while visible unless a hide fade is already running; an
    /// in-progress show fade is cancelled (hide wins). The visibility flag
    /// flips only when the fade completes. Without an animation controller
    /// the request is dropped.
    pub fn animate_hide(&mut self, cx: &mut EventContext) {
        if cx.anim.is_none() {
            log::debug!("compass: no animation controller, hide dropped");
            return;
        }
        self.sync_fade();

        if self.state.visible && !self.fade_is_hiding() {
            self.start_fade(1.0, 0.0, HIDE_DURATION, HIDE_DELAY, false, cx);
        }
    }

    /// A fade whose start is above its end is hiding the widget.
    fn fade_is_hiding(&self) -> bool {
        self.fade
            .as_ref()
            .is_some_and(|fade| fade.start_value() > fade.end_value())
    }

    fn fade_absent_or_hiding(&self) -> bool {
        self.fade.is_none() || self.fade_is_hiding()
    }

    fn start_fade(
        &mut self,
        from: f32,
        to: f32,
        duration: f64,
        delay: f64,
        shows: bool,
        cx: &mut EventContext,
    ) {
        let Some(anim) = cx.anim.as_deref_mut() else {
            return;
        };
        if let Some(old) = self.fade.take() {
            old.cancel();
        }
        log::debug!("compass: fade {from:.2} -> {to:.2} over {duration}s");
        self.fade = Some(anim.add(Animation::new(from, to, duration).delay(delay)));
        self.fade_shows = shows;
        cx.request_redraw();
    }

    /// Apply the end-of-fade visibility once the task finishes.
    fn sync_fade(&mut self) {
        if self.fade.as_ref().is_some_and(AnimationHandle::is_finished) {
            self.state.visible = self.fade_shows;
            self.fade = None;
        }
    }

    fn resolve_icon(&self, skin: &Skin) -> IconId {
        match skin.icon_id(&self.icon) {
            Some(id) => id,
            None => panic!("compass icon {:?} missing from skin", self.icon),
        }
    }
}

impl Default for Compass {
    fn default() -> Self {
        Self::new()
    }
}

impl Overlay for Compass {
    fn state(&self) -> &ElementState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ElementState {
        &mut self.state
    }

    fn bounds(&mut self, cx: &LayoutContext) -> &[OrientedBounds] {
        if self.state.dirty_rect {
            let size = self.pixel_size(cx.skin);
            let half = Size::new(
                size.width / 2.0 * cx.scale_factor,
                size.height / 2.0 * cx.scale_factor,
            );
            let rect = OrientedBounds::new(self.state.pivot, self.angle - FRAC_PI_2, half);
            self.bound_rects.clear();
            self.bound_rects.push(rect);
            self.state.dirty_rect = false;
        }
        &self.bound_rects
    }

    fn cache(&mut self, cx: &LayoutContext) {
        self.purge();

        let id = self.resolve_icon(cx.skin);
        let icon = cx.skin.icon(id);
        let size = cx.skin.icon_size(id);
        let half_w = size.width / 2.0;
        let half_h = size.height / 2.0;
        let [min_u, min_v, max_u, max_v] = cx.skin.uv_rect(id);

        // Icon-local textured strip, centered on the pivot.
        let vertices = vec![
            GpuVertex {
                position: [-half_w, -half_h],
                uv: [min_u, min_v],
            },
            GpuVertex {
                position: [-half_w, half_h],
                uv: [min_u, max_v],
            },
            GpuVertex {
                position: [half_w, -half_h],
                uv: [max_u, min_v],
            },
            GpuVertex {
                position: [half_w, half_h],
                uv: [max_u, max_v],
            },
        ];
        log::debug!(
            "compass: cached display list, {}x{} on pipeline {:?}",
            size.width,
            size.height,
            icon.pipeline
        );
        self.list = Some(DisplayList::new(vertices, icon.pipeline));
    }

    fn purge(&mut self) {
        self.list = None;
    }

    fn draw(&mut self, cx: &mut PaintContext) {
        self.sync_fade();
        if !self.state.visible {
            return;
        }
        let Some(list) = &self.list else {
            debug_assert!(false, "compass drawn before cache()");
            return;
        };

        let alpha = self.alpha();
        log::trace!("compass: draw angle {:.3} alpha {alpha:.3}", self.angle);

        let transform = Transform::rotation(self.angle)
            .then(&Transform::translation(self.state.pivot))
            .then(&cx.view);
        cx.scene.set_layer(self.state.depth);
        cx.scene.submit(list, transform, alpha);
    }

    fn hit_test(&self, point: Point, cx: &LayoutContext) -> bool {
        let size = self.pixel_size(cx.skin);
        let radius = HIT_RADIUS_FACTOR * (size.width.max(size.height) / 2.0);
        point.distance(self.state.pivot) < radius * cx.scale_factor
    }

    fn tap_ended(&mut self, _point: Point, cx: &mut EventContext) -> EventResult {
        cx.navigator.stop_compass_follow();

        let from = cx.navigator.screen_angle();
        match cx.anim.as_deref_mut() {
            Some(anim) => cx.navigator.rotate_screen(from, 0.0, anim),
            // Degraded mode: no controller to animate with, jump to north.
            None => cx.navigator.set_screen_angle(0.0),
        }

        cx.request_redraw();
        EventResult::Handled
    }
}
