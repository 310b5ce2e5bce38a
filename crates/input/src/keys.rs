use crate::direction::Direction;
use crate::handler::InputHandler;
use std::collections::BTreeSet;

/// Movement keys currently held down.
///
/// Keys are polled once per frame: each held direction produces exactly one
/// `on_key` call per [`drive`](Self::drive), however long it has been held.
#[derive(Debug, Clone, Default)]
pub struct MovementKeys {
    held: BTreeSet<Direction>,
}

impl MovementKeys {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, direction: Direction) {
        if self.held.insert(direction) {
            tracing::trace!(%direction, "movement key pressed");
        }
    }

    pub fn release(&mut self, direction: Direction) {
        if self.held.remove(&direction) {
            tracing::trace!(%direction, "movement key released");
        }
    }

    /// Apply a press or release.
    pub fn set(&mut self, direction: Direction, pressed: bool) {
        if pressed {
            self.press(direction);
        } else {
            self.release(direction);
        }
    }

    pub fn is_held(&self, direction: Direction) -> bool {
        self.held.contains(&direction)
    }

    pub fn is_idle(&self) -> bool {
        self.held.is_empty()
    }

    /// Drop every held key, e.g. when the window loses focus and release
    /// events will never arrive.
    pub fn clear(&mut self) {
        self.held.clear();
    }

    /// Held directions in polling order.
    pub fn held(&self) -> impl Iterator<Item = Direction> + '_ {
        self.held.iter().copied()
    }

    /// Deliver one frame of movement to `handler`.
    pub fn drive<H: InputHandler + ?Sized>(&self, handler: &mut H, delta_time: f32) {
        for direction in self.held() {
            handler.on_key(direction, delta_time);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::recording::Recorder;

    #[test]
    fn drive_polls_in_fixed_order() {
        let mut keys = MovementKeys::new();
        keys.press(Direction::Down);
        keys.press(Direction::Forward);
        keys.press(Direction::Left);

        let mut rec = Recorder::default();
        keys.drive(&mut rec, 0.016);
        assert_eq!(
            rec.keys,
            vec![
                (Direction::Forward, 0.016),
                (Direction::Left, 0.016),
                (Direction::Down, 0.016),
            ]
        );
    }

    #[test]
    fn repeated_press_counts_once() {
        let mut keys = MovementKeys::new();
        keys.press(Direction::Up);
        keys.press(Direction::Up);

        let mut rec = Recorder::default();
        keys.drive(&mut rec, 1.0);
        assert_eq!(rec.keys.len(), 1);
    }

    #[test]
    fn release_and_clear() {
        let mut keys = MovementKeys::new();
        keys.set(Direction::Right, true);
        keys.set(Direction::Backward, true);
        assert!(keys.is_held(Direction::Right));

        keys.set(Direction::Right, false);
        assert!(!keys.is_held(Direction::Right));
        assert!(!keys.is_idle());

        keys.clear();
        assert!(keys.is_idle());

        let mut rec = Recorder::default();
        keys.drive(&mut rec, 1.0);
        assert!(rec.keys.is_empty());
    }

    #[test]
    fn release_of_unheld_key_is_ignored() {
        let mut keys = MovementKeys::new();
        keys.release(Direction::Left);
        assert!(keys.is_idle());
    }
}
