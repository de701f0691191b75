//! Event plumbing: the publish/subscribe primitive and the directional
//! bubbling relays built on top of it.

mod bubble;
mod emitter;

pub use bubble::{bubble_down, bubble_up, BubbleGuard};
pub use emitter::{Event, EventEmitter, ListenerId};

/// Event name for size changes relayed between a row and its children.
pub const RESIZE: &str = "resize";
