//! Screen-anchored map overlay widgets.

mod compass;

pub use compass::Compass;
