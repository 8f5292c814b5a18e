use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

/// 2D vector in simulation units
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector2 {
    pub x: f64,
    pub y: f64,
}

impl Vector2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }

    pub fn subtract(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }

    pub fn scale(self, scalar: f64) -> Self {
        Self::new(self.x * scalar, self.y * scalar)
    }

    pub fn divide(self, scalar: f64) -> Self {
        Self::new(self.x / scalar, self.y / scalar)
    }

    pub fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y
    }

    pub fn length_squared(self) -> f64 {
        self.x * self.x + self.y * self.y
    }

    pub fn length(self) -> f64 {
        self.length_squared().sqrt()
    }

    /// Unit vector in the same direction.
    ///
    /// A zero vector yields NaN components; use [`Vector2::try_normalized`]
    /// when the input may be degenerate.
    pub fn normalized(self) -> Self {
        self.divide(self.length())
    }

    pub fn try_normalized(self) -> Option<Self> {
        let n = self.normalized();
        n.is_finite().then_some(n)
    }

    /// Rotate by -90°: `(x, y) -> (y, -x)`
    pub fn perpendicular(self) -> Self {
        Self::new(self.y, -self.x)
    }

    /// Vector pointing from `self` to `other`
    pub fn distance_vector(self, other: Self) -> Self {
        other.subtract(self)
    }

    /// In-place add for summation loops
    pub fn accumulate(&mut self, other: Self) {
        self.x += other.x;
        self.y += other.y;
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Vector2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Vector2::add(self, rhs)
    }
}

impl Sub for Vector2 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        self.subtract(rhs)
    }
}

impl Mul<f64> for Vector2 {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        self.scale(rhs)
    }
}

impl Div<f64> for Vector2 {
    type Output = Self;

    fn div(self, rhs: f64) -> Self {
        self.divide(rhs)
    }
}

impl Neg for Vector2 {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

impl AddAssign for Vector2 {
    fn add_assign(&mut self, rhs: Self) {
        self.accumulate(rhs);
    }
}

impl SubAssign for Vector2 {
    fn sub_assign(&mut self, rhs: Self) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl From<[f64; 2]> for Vector2 {
    fn from(v: [f64; 2]) -> Self {
        Self::new(v[0], v[1])
    }
}

impl From<Vector2> for [f32; 2] {
    fn from(v: Vector2) -> Self {
        [v.x as f32, v.y as f32]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_arithmetic() {
        let a = Vector2::new(3.0, 4.0);
        let b = Vector2::new(1.0, -2.0);
        assert_eq!(a + b, Vector2::new(4.0, 2.0));
        assert_eq!(a - b, Vector2::new(2.0, 6.0));
        assert_eq!(a * 2.0, Vector2::new(6.0, 8.0));
        assert_eq!(a / 2.0, Vector2::new(1.5, 2.0));
        assert_eq!(-a, Vector2::new(-3.0, -4.0));
        assert_eq!(a.length_squared(), 25.0);
        assert_eq!(a.length(), 5.0);
    }

    #[test]
    fn test_distance_vector_points_to_other() {
        let a = Vector2::new(1.0, 1.0);
        let b = Vector2::new(4.0, 5.0);
        assert_eq!(a.distance_vector(b), Vector2::new(3.0, 4.0));
    }

    #[test]
    fn test_perpendicular_rotates_clockwise() {
        let v = Vector2::new(2.0, 1.0);
        let p = v.perpendicular();
        assert_eq!(p, Vector2::new(1.0, -2.0));
        assert_eq!(v.dot(p), 0.0);
    }

    #[test]
    fn test_normalized() {
        let n = Vector2::new(0.0, -7.0).normalized();
        assert_relative_eq!(n.length(), 1.0);
        assert_relative_eq!(n.y, -1.0);
    }

    #[test]
    fn test_zero_normalizes_to_nan() {
        assert!(!Vector2::ZERO.normalized().is_finite());
        assert_eq!(Vector2::ZERO.try_normalized(), None);
    }

    #[test]
    fn test_accumulate() {
        let mut acc = Vector2::ZERO;
        for v in [Vector2::new(1.0, 2.0), Vector2::new(-0.5, 0.5)] {
            acc.accumulate(v);
        }
        assert_eq!(acc, Vector2::new(0.5, 2.5));
    }
}
