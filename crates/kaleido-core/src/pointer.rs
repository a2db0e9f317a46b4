//! Last known pointer position
//!
//! Mouse and touch handlers write, the frame callback reads. Both run on the
//! event-loop thread, so a plain value is enough.

use glam::Vec2;

/// Pointer position in normalized device coordinates (`[-1, 1]²`, Y up)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Pointer {
    position: Vec2,
}

impl Pointer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a pointer at window pixel `(x, y)` in a `width × height` window.
    ///
    /// Events arriving while the window has no area are ignored.
    pub fn update(&mut self, x: f64, y: f64, width: f64, height: f64) {
        if width > 0.0 && height > 0.0 {
            self.position = normalize(x, y, width, height);
        }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }
}

/// Map window pixels (origin top-left, Y down) to `[-1, 1]²` with Y up
pub fn normalize(x: f64, y: f64, width: f64, height: f64) -> Vec2 {
    Vec2::new(
        (2.0 * x / width - 1.0) as f32,
        (1.0 - 2.0 * y / height) as f32,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corners_and_center() {
        assert_eq!(normalize(0.0, 0.0, 800.0, 600.0), Vec2::new(-1.0, 1.0));
        assert_eq!(normalize(800.0, 600.0, 800.0, 600.0), Vec2::new(1.0, -1.0));
        assert_eq!(normalize(400.0, 300.0, 800.0, 600.0), Vec2::ZERO);
    }

    #[test]
    fn test_update_keeps_last_value_for_empty_window() {
        let mut pointer = Pointer::new();
        pointer.update(200.0, 150.0, 800.0, 600.0);
        let before = pointer.position();
        pointer.update(10.0, 10.0, 0.0, 600.0);
        assert_eq!(pointer.position(), before);
        assert_eq!(before, Vec2::new(-0.5, 0.5));
    }
}
