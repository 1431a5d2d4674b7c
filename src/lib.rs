//! Map overlay UI kit.
//!
//! Screen-anchored widgets drawn on top of a map: the compass arrow, and the
//! framework seams other overlay elements plug into. The crate stays on the
//! CPU side of the renderer: widgets record display lists, submit them into a
//! layered [`Scene`] each frame, and the host uploads the resolved
//! [`GpuInstance`] data. Animations advance cooperatively through timestamped
//! steps from the host's frame loop; there are no threads and no blocking
//! calls.
//!
//! A frame looks like:
//!
//! ```ignore
//! controller.step(clock.now());
//! navigator.update();
//! compass.set_angle(navigator.screen_angle());
//! scene.clear();
//! compass.draw(&mut paint_cx);
//! let instances = scene.gpu_instances_for_layer(layer, scale_factor);
//! ```

pub mod animation;
pub mod element;
pub mod geometry;
pub mod navigator;
pub mod scene;
pub mod skin;
pub mod widgets;

pub use animation::{
    Animation, AnimationController, AnimationHandle, AnimationState, Easing, FrameClock,
};
pub use element::{
    ElementState, EventContext, EventResult, LayoutContext, Overlay, PaintContext,
};
pub use geometry::{Bounds, OrientedBounds, Point, Size, Transform};
pub use navigator::Navigator;
pub use scene::{DisplayList, GpuInstance, GpuVertex, Scene, Submission};
pub use skin::{Icon, IconId, PipelineId, Skin, SkinError};
pub use widgets::Compass;
