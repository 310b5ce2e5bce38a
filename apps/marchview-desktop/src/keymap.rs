use marchview_input::Direction;
use winit::event::MouseScrollDelta;
use winit::keyboard::KeyCode;

/// Pixels of trackpad scroll treated as one wheel notch.
const PIXELS_PER_LINE: f32 = 20.0;

/// Movement key bindings: WASD, Space to rise, Left Shift to sink.
pub fn direction_for(key: KeyCode) -> Option<Direction> {
    match key {
        KeyCode::KeyW => Some(Direction::Forward),
        KeyCode::KeyS => Some(Direction::Backward),
        KeyCode::KeyA => Some(Direction::Left),
        KeyCode::KeyD => Some(Direction::Right),
        KeyCode::Space => Some(Direction::Up),
        KeyCode::ShiftLeft => Some(Direction::Down),
        _ => None,
    }
}

/// Vertical scroll amount in wheel notches. Positive scrolls away from the user.
pub fn scroll_lines(delta: MouseScrollDelta) -> f32 {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => y,
        MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / PIXELS_PER_LINE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::PhysicalPosition;

    #[test]
    fn every_direction_is_bound_once() {
        let keys = [
            KeyCode::KeyW,
            KeyCode::KeyS,
            KeyCode::KeyA,
            KeyCode::KeyD,
            KeyCode::Space,
            KeyCode::ShiftLeft,
        ];
        let bound: Vec<Direction> = keys.iter().filter_map(|&k| direction_for(k)).collect();
        assert_eq!(bound, Direction::ALL.to_vec());
    }

    #[test]
    fn other_keys_are_unbound() {
        assert_eq!(direction_for(KeyCode::Escape), None);
        assert_eq!(direction_for(KeyCode::ControlLeft), None);
        assert_eq!(direction_for(KeyCode::KeyQ), None);
    }

    #[test]
    fn scroll_units() {
        assert_eq!(scroll_lines(MouseScrollDelta::LineDelta(3.0, -2.0)), -2.0);
        assert_eq!(
            scroll_lines(MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, 40.0))),
            2.0
        );
    }
}
