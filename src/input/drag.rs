use cgmath::{Point2, Vector2};

/// Mouse drag in progress.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Drag {
    /// Cursor position when the drag last moved the camera.
    pub last_cursor: Point2<f64>,
}
impl Drag {
    /// Starts a drag at the given cursor position.
    pub fn new(cursor: Point2<f64>) -> Self {
        Self {
            last_cursor: cursor,
        }
    }

    /// Records a new cursor position and returns how far it moved since the
    /// previous one, in screen pixels.
    pub fn update_cursor(&mut self, cursor: Point2<f64>) -> Vector2<f64> {
        let delta = cursor - self.last_cursor;
        self.last_cursor = cursor;
        delta
    }
}

#[cfg(test)]
#[test]
fn test_drag_deltas() {
    let mut drag = Drag::new(Point2::new(10.0, 10.0));
    assert_eq!(drag.update_cursor(Point2::new(15.0, 7.0)), Vector2::new(5.0, -3.0));
    assert_eq!(drag.update_cursor(Point2::new(15.0, 7.0)), Vector2::new(0.0, 0.0));
    assert_eq!(drag.update_cursor(Point2::new(0.0, 0.0)), Vector2::new(-15.0, -7.0));
}
