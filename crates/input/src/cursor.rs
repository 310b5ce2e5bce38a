/// Turns absolute cursor positions into per-event offsets.
///
/// Screen-space y grows downward; offsets are returned with y flipped so a
/// cursor moving up yields a positive vertical offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CursorTracker {
    last_x: f32,
    last_y: f32,
}

impl CursorTracker {
    /// Start tracking from the centre of a `width` x `height` window.
    pub fn centered(width: f32, height: f32) -> Self {
        Self {
            last_x: width / 2.0,
            last_y: height / 2.0,
        }
    }

    /// Offset from the previous sample to `(x, y)`. Records `(x, y)` as the
    /// new previous sample.
    pub fn offset(&mut self, x: f32, y: f32) -> (f32, f32) {
        let x_offset = x - self.last_x;
        let y_offset = self.last_y - y;
        self.last_x = x;
        self.last_y = y;
        (x_offset, y_offset)
    }

    /// Convert a raw relative motion (locked cursor) to the same convention
    /// as [`offset`](Self::offset). Does not touch the last sample.
    pub fn motion(&self, dx: f32, dy: f32) -> (f32, f32) {
        (dx, -dy)
    }

    /// Move the reference point without producing an offset, e.g. after the
    /// cursor re-enters the window.
    pub fn reset(&mut self, x: f32, y: f32) {
        self.last_x = x;
        self.last_y = y;
    }

    pub fn last_position(&self) -> (f32, f32) {
        (self.last_x, self.last_y)
    }
}
