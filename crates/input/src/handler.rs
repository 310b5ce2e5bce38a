use crate::direction::Direction;

/// The capability surface the host event loop drives.
///
/// Implementors never see window-system types: the loop owns the translation
/// from platform events to these calls, and hands in a `&mut` to whatever
/// object owns the state.
pub trait InputHandler {
    /// A movement key is held for `delta_time` seconds of this frame.
    fn on_key(&mut self, direction: Direction, delta_time: f32);

    /// The cursor moved by `(x_offset, y_offset)` since the last sample.
    /// Positive `y_offset` means "up".
    fn on_mouse_move(&mut self, x_offset: f32, y_offset: f32);

    /// The scroll wheel moved by `y_offset`. Positive means away from the user.
    fn on_scroll(&mut self, y_offset: f32);
}

impl<T: InputHandler + ?Sized> InputHandler for &mut T {
    fn on_key(&mut self, direction: Direction, delta_time: f32) {
        (**self).on_key(direction, delta_time);
    }

    fn on_mouse_move(&mut self, x_offset: f32, y_offset: f32) {
        (**self).on_mouse_move(x_offset, y_offset);
    }

    fn on_scroll(&mut self, y_offset: f32) {
        (**self).on_scroll(y_offset);
    }
}


#[cfg(test)]
mod tests {
    use super::recording::Recorder;
    use super::*;

    fn drive(mut handler: impl InputHandler) {
        handler.on_key(Direction::Up, 0.5);
        handler.on_mouse_move(1.0, -1.0);
        handler.on_scroll(2.0);
    }

    #[test]
    fn mutable_reference_forwards_calls() {
        let mut rec = Recorder::default();
        drive(&mut rec);
        assert_eq!(rec.keys, vec![(Direction::Up, 0.5)]);
        assert_eq!(rec.moves, vec![(1.0, -1.0)]);
        assert_eq!(rec.scrolls, vec![2.0]);
    }

    #[test]
    fn usable_as_trait_object() {
        let mut rec = Recorder::default();
        {
            let handler: &mut dyn InputHandler = &mut rec;
            handler.on_scroll(-3.0);
        }
        assert_eq!(rec.scrolls, vec![-3.0]);
    }
}
