//! Overlay element contract.
//!
//! Every screen-anchored widget implements [`Overlay`] and is driven by the
//! host's dispatch loop: the layout pass reads `bounds`, the render pass calls
//! `draw`, the input pass routes pointer events through `hit_test` and
//! `tap_ended`. Collaborators arrive through explicit contexts; there is no
//! ambient framework global.

use crate::animation::AnimationController;
use crate::geometry::{OrientedBounds, Point, Transform};
use crate::navigator::Navigator;
use crate::scene::Scene;
use crate::skin::Skin;

/// Positioning and visibility state shared by overlay elements.
#[derive(Debug, Clone)]
pub struct ElementState {
    /// Screen-space anchor point, logical pixels.
    pub pivot: Point,
    /// Scene layer the element draws on.
    pub depth: u32,
    /// Whether the element participates in draw and hit-test passes.
    pub visible: bool,
    /// Cached bounding shape is stale and must be recomputed before reading.
    pub dirty_rect: bool,
}

impl ElementState {
    pub fn new(pivot: Point, depth: u32) -> Self {
        Self {
            pivot,
            depth,
            visible: true,
            dirty_rect: true,
        }
    }
}

impl Default for ElementState {
    fn default() -> Self {
        Self::new(Point::ZERO, 0)
    }
}

/// Context for the layout pass: bounds and hit-test queries.
pub struct LayoutContext<'a> {
    pub skin: &'a Skin,
    /// Display-density multiplier applied to hit radii and bound extents.
    pub scale_factor: f32,
}

/// Context for the render pass.
pub struct PaintContext<'a> {
    pub scene: &'a mut Scene,
    pub skin: &'a Skin,
    pub scale_factor: f32,
    /// Screen-to-viewport transform applied after element placement.
    pub view: Transform,
}

/// Context for the input pass.
///
/// The animation controller is optional: hosts without one still dispatch
/// events, and animated reactions degrade (see the widget docs).
pub struct EventContext<'a> {
    pub anim: Option<&'a mut AnimationController>,
    pub navigator: &'a mut Navigator,
    pub scale_factor: f32,
    redraw_requested: bool,
}

impl<'a> EventContext<'a> {
    pub fn new(
        anim: Option<&'a mut AnimationController>,
        navigator: &'a mut Navigator,
        scale_factor: f32,
    ) -> Self {
        Self {
            anim,
            navigator,
            scale_factor,
            redraw_requested: false,
        }
    }

    /// Ask the host loop to schedule a redraw after this event.
    pub fn request_redraw(&mut self) {
        self.redraw_requested = true;
    }

    pub fn redraw_requested(&self) -> bool {
        self.redraw_requested
    }
}

/// Result of event handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    /// Event was handled; stop propagation.
    Handled,
    /// Event was not handled; continue to the next element.
    Ignored,
}

/// The contract the overlay dispatch loop drives.
pub trait Overlay {
    fn state(&self) -> &ElementState;

    fn state_mut(&mut self) -> &mut ElementState;

    /// Current screen footprint. Implementations recompute lazily when the
    /// dirty-rect flag is set.
    fn bounds(&mut self, cx: &LayoutContext) -> &[OrientedBounds];

    /// Rebuild cached rendering resources from the skin. Must run before the
    /// first draw and again after skin invalidation.
    fn cache(&mut self, cx: &LayoutContext);

    /// Release cached rendering resources.
    fn purge(&mut self);

    fn draw(&mut self, cx: &mut PaintContext);

    fn hit_test(&self, point: Point, cx: &LayoutContext) -> bool;

    /// Cheap pre-filter the input pass runs before the precise test.
    fn rough_hit_test(&self, point: Point, cx: &LayoutContext) -> bool {
        self.hit_test(point, cx)
    }

    fn tap_ended(&mut self, _point: Point, _cx: &mut EventContext) -> EventResult {
        EventResult::Ignored
    }

    fn is_visible(&self) -> bool {
        self.state().visible
    }
}
