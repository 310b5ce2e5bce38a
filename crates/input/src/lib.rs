//! Input surface: movement directions, cursor deltas, and frame timing.
//!
//! Nothing here knows about a window system. The host event loop translates
//! platform events into [`Direction`]s and offsets and pushes them through an
//! [`InputHandler`].
//!
//! # Invariants
//! - Vertical offsets follow the "up is positive" convention, regardless of
//!   the platform's screen-space y axis.
//! - Frame deltas are never negative.

pub mod clock;
pub mod cursor;
pub mod direction;
pub mod handler;
pub mod keys;

pub use clock::FrameClock;
pub use cursor::CursorTracker;
pub use direction::{Direction, ParseDirectionError};
pub use handler::InputHandler;
pub use keys::MovementKeys;

pub fn crate_info() -> &'static str {
    "marchview-input v0.1.0"
}
