//! 2D vector type for edge directions and offsets.

use num_traits::Float;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// A 2D vector representing a direction or offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vec2<F> {
    pub x: F,
    pub y: F,
}

impl<F: Float> Vec2<F> {
    /// Creates a vector from its components.
    #[inline]
    pub fn new(x: F, y: F) -> Self {
        Self { x, y }
    }

    /// The zero vector.
    #[inline]
    pub fn zero() -> Self {
        Self {
            x: F::zero(),
            y: F::zero(),
        }
    }

    /// Dot product.
    #[inline]
    pub fn dot(self, other: Self) -> F {
        self.x * other.x + self.y * other.y
    }

    /// Computes the 2D cross product (perpendicular dot product).
    ///
    /// Positive means `other` is counter-clockwise from `self`.
    #[inline]
    pub fn cross(self, other: Self) -> F {
        self.x * other.y - self.y * other.x
    }

    /// Squared length. Avoids the square root.
    #[inline]
    pub fn magnitude_squared(self) -> F {
        self.dot(self)
    }

    /// Euclidean length.
    #[inline]
    pub fn magnitude(self) -> F {
        self.magnitude_squared().sqrt()
    }

    /// Returns a unit-length copy, or `None` if the vector is too short to normalize.
    #[inline]
    pub fn normalize(self) -> Option<Self> {
        let mag = self.magnitude();
        if mag > F::epsilon() {
            Some(self / mag)
        } else {
            None
        }
    }

    /// Signed turn angle from `self` to `other` in `(-π, π]`.
    ///
    /// Positive for a counter-clockwise (left) turn.
    #[inline]
    pub fn signed_angle_to(self, other: Self) -> F {
        self.cross(other).atan2(self.dot(other))
    }
}

impl<F: Float> Add for Vec2<F> {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl<F: Float> Sub for Vec2<F> {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

impl<F: Float> Mul<F> for Vec2<F> {
    type Output = Self;

    #[inline]
    fn mul(self, scalar: F) -> Self {
        Self {
            x: self.x * scalar,
            y: self.y * scalar,
        }
    }
}

impl<F: Float> Div<F> for Vec2<F> {
    type Output = Self;

    #[inline]
    fn div(self, scalar: F) -> Self {
        Self {
            x: self.x / scalar,
            y: self.y / scalar,
        }
    }
}

impl<F: Float> Neg for Vec2<F> {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
        }
    }
}

impl<F: Float> Default for Vec2<F> {
    fn default() -> Self {
        Self::zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_cross_sign() {
        let a: Vec2<f64> = Vec2::new(1.0, 0.0);
        let b = Vec2::new(0.0, 1.0);
        assert_eq!(a.cross(b), 1.0);
        assert_eq!(b.cross(a), -1.0);
    }

    #[test]
    fn test_normalize_zero() {
        let v: Vec2<f64> = Vec2::zero();
        assert!(v.normalize().is_none());
        let n = Vec2::new(3.0_f64, 4.0).normalize().unwrap();
        assert_relative_eq!(n.magnitude(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_signed_angle() {
        let east: Vec2<f64> = Vec2::new(1.0, 0.0);
        assert_relative_eq!(east.signed_angle_to(Vec2::new(0.0, 1.0)), FRAC_PI_2, epsilon = 1e-12);
        assert_relative_eq!(east.signed_angle_to(Vec2::new(0.0, -1.0)), -FRAC_PI_2, epsilon = 1e-12);
        assert_relative_eq!(east.signed_angle_to(Vec2::new(-1.0, 0.0)), PI, epsilon = 1e-12);
    }

    #[test]
    fn test_arithmetic() {
        let a: Vec2<f64> = Vec2::new(1.0, 2.0);
        let b = Vec2::new(3.0, 4.0);
        assert_eq!(a + b, Vec2::new(4.0, 6.0));
        assert_eq!(b - a, Vec2::new(2.0, 2.0));
        assert_eq!(a * 2.0, Vec2::new(2.0, 4.0));
        assert_eq!(b / 2.0, Vec2::new(1.5, 2.0));
        assert_eq!(-a, Vec2::new(-1.0, -2.0));
    }
}
