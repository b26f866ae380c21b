use crate::constants::{ARENA_HEIGHT, ARENA_WIDTH, DIRECTION_EPSILON};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vector2D {
    pub x: f64,
    pub y: f64,
}

impl Vector2D {
    pub fn new(x: f64, y: f64) -> Self {
        Vector2D { x, y }
    }

    pub fn scale(&self, scalar: f64) -> Self {
        Vector2D::new(self.x * scalar, self.y * scalar)
    }

    pub fn add(&self, other: Vector2D) -> Self {
        Vector2D::new(self.x + other.x, self.y + other.y)
    }

    pub fn negate(&self) -> Self {
        Vector2D::new(-self.x, -self.y)
    }

    pub fn length(&self) -> f64 {
        self.x.hypot(self.y)
    }
}

/// Axis-aligned box in arena units. `y` grows downward.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Rect { left, top, width, height }
    }

    pub fn from_center(center: Vector2D, width: f64, height: f64) -> Self {
        Rect::new(center.x - width / 2.0, center.y - height / 2.0, width, height)
    }

    pub fn arena() -> Self {
        Rect::new(0.0, 0.0, ARENA_WIDTH, ARENA_HEIGHT)
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn center(&self) -> Vector2D {
        Vector2D::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    /// Midpoint of the bottom edge.
    pub fn bottom_center(&self) -> Vector2D {
        Vector2D::new(self.left + self.width / 2.0, self.bottom())
    }

    pub fn translate(&mut self, delta: Vector2D) {
        self.left += delta.x;
        self.top += delta.y;
    }

    /// Strict overlap: boxes that only share an edge do not collide.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left < other.right()
            && other.left < self.right()
            && self.top < other.bottom()
            && other.top < self.bottom()
    }
}

/// Returns `(horizontal_ok, vertical_ok)`: whether the box lies inside the
/// arena on each axis.
pub fn within_bounds(rect: &Rect) -> (bool, bool) {
    let horizontal = rect.left >= 0.0 && rect.right() <= ARENA_WIDTH;
    let vertical = rect.top >= 0.0 && rect.bottom() <= ARENA_HEIGHT;
    (horizontal, vertical)
}

pub fn fully_inside(rect: &Rect) -> bool {
    within_bounds(rect) == (true, true)
}

/// Unit vector from `origin`'s center toward `target`'s center. Nearly
/// coincident centers yield straight down, `(0, 1)`.
pub fn direction_to(origin: &Rect, target: &Rect) -> Vector2D {
    let from = origin.center();
    let to = target.center();
    let diff = Vector2D::new(to.x - from.x, to.y - from.y);
    let norm = diff.length();
    if norm < DIRECTION_EPSILON {
        return Vector2D::new(0.0, 1.0);
    }
    diff.scale(1.0 / norm)
}
