/// A 2D vector used for position, velocity and displacement
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector2D {
    pub x: f32,
    pub y: f32,
}

impl Vector2D {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Relative size below which a vector counts as zero in [`Self::with_magnitude`].
    pub const NEGLIGIBLE: f32 = 1e-4;

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn zero() -> Self {
        Self::ZERO
    }

    /// Vector with the same value on both axes.
    pub fn splat(value: f32) -> Self {
        Self { x: value, y: value }
    }

    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    pub fn mul_elementwise(&self, other: Vector2D) -> Self {
        Self {
            x: self.x * other.x,
            y: self.y * other.y,
        }
    }

    /// Per-axis remainder in `[0, divisor)`, used to wrap positions.
    pub fn floor_mod(&self, divisor: Vector2D) -> Self {
        fn axis(value: f32, divisor: f32) -> f32 {
            // rem_euclid rounds tiny negative values up to the divisor itself
            let r = value.rem_euclid(divisor);
            if r >= divisor {
                0.0
            } else {
                r
            }
        }

        Self {
            x: axis(self.x, divisor.x),
            y: axis(self.y, divisor.y),
        }
    }

    /// Rotated a quarter turn counter-clockwise.
    pub fn perpendicular(&self) -> Self {
        Self {
            x: -self.y,
            y: self.x,
        }
    }

    pub fn magnitude(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn distance(&self, other: &Vector2D) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn dot(&self, other: &Vector2D) -> f32 {
        self.x * other.x + self.y * other.y
    }

    /// Heading in radians, `atan2(y, x)`.
    pub fn angle(&self) -> f32 {
        self.y.atan2(self.x)
    }

    /// Per-axis sign that is zero while `|component| < threshold`.
    ///
    /// At or above the threshold the result is `-1.0` for negative components
    /// and `1.0` otherwise.
    pub fn sign_with_threshold(&self, threshold: Vector2D) -> Self {
        fn axis(value: f32, threshold: f32) -> f32 {
            if value.abs() < threshold {
                0.0
            } else if value < 0.0 {
                -1.0
            } else {
                1.0
            }
        }

        Self {
            x: axis(self.x, threshold.x),
            y: axis(self.y, threshold.y),
        }
    }

    /// Rescale to `length`, keeping direction.
    ///
    /// A vector no longer than `NEGLIGIBLE * length` has no trustworthy
    /// direction (it is rounding noise at that scale) and yields `None`, as
    /// does the zero vector.
    pub fn with_magnitude(&self, length: f32) -> Option<Self> {
        let mag = self.magnitude();
        if mag > 0.0 && mag > Self::NEGLIGIBLE * length {
            Some(*self * (length / mag))
        } else {
            None
        }
    }

    pub fn limit(&self, max: f32) -> Self {
        let mag = self.magnitude();
        if mag > max {
            *self * (max / mag)
        } else {
            *self
        }
    }
}

impl core::ops::Add for Vector2D {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl core::ops::Sub for Vector2D {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

impl core::ops::Neg for Vector2D {
    type Output = Self;

    fn neg(self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
        }
    }
}

impl core::ops::Mul<f32> for Vector2D {
    type Output = Self;

    fn mul(self, scalar: f32) -> Self {
        Self {
            x: self.x * scalar,
            y: self.y * scalar,
        }
    }
}

impl core::ops::Div<f32> for Vector2D {
    type Output = Self;

    fn div(self, scalar: f32) -> Self {
        Self {
            x: self.x / scalar,
            y: self.y / scalar,
        }
    }
}

impl core::ops::AddAssign for Vector2D {
    fn add_assign(&mut self, other: Self) {
        self.x += other.x;
        self.y += other.y;
    }
}

impl core::iter::Sum for Vector2D {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, v| acc + v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector2d_magnitude() {
        let v = Vector2D::new(3.0, 4.0);
        assert_eq!(v.magnitude(), 5.0);
        assert_eq!(Vector2D::zero().distance(&v), 5.0);
    }

    #[test]
    fn test_vector2d_operations() {
        let v1 = Vector2D::new(1.0, 2.0);
        let v2 = Vector2D::new(3.0, 4.0);

        assert_eq!(v1 + v2, Vector2D::new(4.0, 6.0));
        assert_eq!(v2 - v1, Vector2D::new(2.0, 2.0));
        assert_eq!(v1 * 2.0, Vector2D::new(2.0, 4.0));
        assert_eq!(v1.mul_elementwise(v2), Vector2D::new(3.0, 8.0));
        assert_eq!(v1.dot(&v2), 11.0);
    }

    #[test]
    fn test_floor_mod_is_non_negative() {
        let bounds = Vector2D::new(100.0, 50.0);
        assert_eq!(Vector2D::new(-1.0, 51.0).floor_mod(bounds), Vector2D::new(99.0, 1.0));
        assert_eq!(Vector2D::new(204.0, -100.0).floor_mod(bounds), Vector2D::new(4.0, 0.0));
    }

    #[test]
    fn test_floor_mod_never_returns_divisor() {
        let bounds = Vector2D::new(800.0, 600.0);
        let wrapped = Vector2D::new(0.0 - 1e-6, -1e-7).floor_mod(bounds);
        assert!(wrapped.x >= 0.0 && wrapped.x < 800.0, "x = {}", wrapped.x);
        assert!(wrapped.y >= 0.0 && wrapped.y < 600.0, "y = {}", wrapped.y);
    }

    #[test]
    fn test_perpendicular() {
        let v = Vector2D::new(3.0, 7.0);
        assert_eq!(v.perpendicular(), Vector2D::new(-7.0, 3.0));
        assert_eq!(v.dot(&v.perpendicular()), 0.0);
    }

    #[test]
    fn test_sign_threshold_is_exclusive_below() {
        let threshold = Vector2D::new(10.0, 10.0);
        assert_eq!(
            Vector2D::new(9.99, -9.99).sign_with_threshold(threshold),
            Vector2D::zero()
        );
        assert_eq!(
            Vector2D::new(10.0, -10.0).sign_with_threshold(threshold),
            Vector2D::new(1.0, -1.0)
        );
        assert_eq!(
            Vector2D::new(-250.0, 3.0).sign_with_threshold(threshold),
            Vector2D::new(-1.0, 0.0)
        );
    }

    #[test]
    fn test_angle() {
        assert_eq!(Vector2D::new(1.0, 0.0).angle(), 0.0);
        let up = Vector2D::new(0.0, 2.0).angle();
        assert!((up - core::f32::consts::FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn test_with_magnitude() {
        let v = Vector2D::new(3.0, 4.0).with_magnitude(10.0).unwrap();
        assert!((v.x - 6.0).abs() < 1e-5);
        assert!((v.y - 8.0).abs() < 1e-5);
        assert!(Vector2D::zero().with_magnitude(10.0).is_none());
        assert!(Vector2D::new(1e-7, -2e-7).with_magnitude(7.6).is_none());
    }

    #[test]
    fn test_limit() {
        let v = Vector2D::new(30.0, 40.0).limit(10.0);
        assert!((v.magnitude() - 10.0).abs() < 1e-5);
        assert_eq!(Vector2D::new(1.0, 1.0).limit(10.0), Vector2D::new(1.0, 1.0));
    }
}
