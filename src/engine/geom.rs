use std::ops::{Add, AddAssign, Mul, Sub};

/// A point or vector in logical canvas pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn distance(self, other: Vec2) -> f32 {
        (other - self).length()
    }

    /// Moves `self` toward `target` by at most `step`.
    /// Returns `true` when the target was reached (and snapped to).
    pub fn step_toward(&mut self, target: Vec2, step: f32) -> bool {
        let delta = target - *self;
        let dist = delta.length();
        if dist < step || dist == 0.0 {
            *self = target;
            return true;
        }
        *self += delta * (step / dist);
        false
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;
    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

/// Axis-aligned rectangle, origin at the top-left corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center_y(&self) -> f32 {
        self.y + self.h / 2.0
    }
}

/// Clamps an interval start so `[start, start + len]` fits inside `[0, bound]`.
pub fn clamp_span(start: f32, len: f32, bound: f32) -> f32 {
    start.clamp(0.0, (bound - len).max(0.0))
}

/// Ball-vs-paddle test: the circle centre must lie within the rectangle's
/// vertical extent and the circle's edge must overlap it horizontally.
pub fn circle_hits_rect(center: Vec2, radius: f32, rect: &Rect) -> bool {
    center.y > rect.y
        && center.y < rect.bottom()
        && center.x + radius > rect.x
        && center.x - radius < rect.right()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_toward_snaps_when_within_one_step() {
        let mut p = Vec2::new(0.0, 0.0);
        assert!(p.step_toward(Vec2::new(3.0, 4.0), 5.5));
        assert_eq!(p, Vec2::new(3.0, 4.0));
    }

    #[test]
    fn step_toward_moves_by_step_length() {
        let mut p = Vec2::new(0.0, 0.0);
        assert!(!p.step_toward(Vec2::new(30.0, 40.0), 5.0));
        assert!((p.x - 3.0).abs() < 1e-4);
        assert!((p.y - 4.0).abs() < 1e-4);
    }

    #[test]
    fn clamp_span_keeps_interval_inside() {
        assert_eq!(clamp_span(-10.0, 80.0, 400.0), 0.0);
        assert_eq!(clamp_span(390.0, 80.0, 400.0), 320.0);
        assert_eq!(clamp_span(100.0, 80.0, 400.0), 100.0);
    }

    #[test]
    fn circle_rect_overlap() {
        let paddle = Rect::new(20.0, 100.0, 12.0, 80.0);
        assert!(circle_hits_rect(Vec2::new(40.0, 140.0), 10.0, &paddle));
        assert!(!circle_hits_rect(Vec2::new(43.0, 140.0), 10.0, &paddle));
        assert!(!circle_hits_rect(Vec2::new(40.0, 190.0), 10.0, &paddle));
    }
}
