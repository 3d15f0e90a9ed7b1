use std::ops::{Add, Div, Mul};

/// A scalar carrying two partial derivatives, used to push analytic
/// Jacobians through arithmetic.
///
/// Seeding a coordinate pair as `Dual2::new(x, 1.0, 0.0)` and
/// `Dual2::new(y, 0.0, 1.0)` and evaluating a projective map yields both
/// the mapped point and its partials with respect to `x` and `y` in one
/// pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dual2 {
    /// The value.
    pub val: f32,
    /// Partial derivative with respect to x.
    pub dx: f32,
    /// Partial derivative with respect to y.
    pub dy: f32,
}

impl Dual2 {
    /// A dual with explicit partials.
    pub fn new(val: f32, dx: f32, dy: f32) -> Dual2 {
        Dual2 { val, dx, dy }
    }
}

impl From<f32> for Dual2 {
    /// A constant: both partials are zero.
    fn from(val: f32) -> Dual2 {
        Dual2 { val, dx: 0.0, dy: 0.0 }
    }
}

impl Add for Dual2 {
    type Output = Dual2;

    fn add(self, rhs: Dual2) -> Dual2 {
        Dual2 {
            val: self.val + rhs.val,
            dx: self.dx + rhs.dx,
            dy: self.dy + rhs.dy,
        }
    }
}

impl Add<f32> for Dual2 {
    type Output = Dual2;

    fn add(self, rhs: f32) -> Dual2 {
        Dual2 {
            val: self.val + rhs,
            ..self
        }
    }
}

impl Mul<f32> for Dual2 {
    type Output = Dual2;

    fn mul(self, rhs: f32) -> Dual2 {
        Dual2 {
            val: self.val * rhs,
            dx: self.dx * rhs,
            dy: self.dy * rhs,
        }
    }
}

impl Mul for Dual2 {
    type Output = Dual2;

    fn mul(self, rhs: Dual2) -> Dual2 {
        // product rule
        Dual2 {
            val: self.val * rhs.val,
            dx: self.val * rhs.dx + self.dx * rhs.val,
            dy: self.val * rhs.dy + self.dy * rhs.val,
        }
    }
}

impl Div for Dual2 {
    type Output = Dual2;

    fn div(self, rhs: Dual2) -> Dual2 {
        // callers guard against rhs.val == 0
        let binv = 1.0 / rhs.val;
        let q = self.val * binv;
        Dual2 {
            val: q,
            dx: binv * (self.dx - q * rhs.dx),
            dy: binv * (self.dy - q * rhs.dy),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constants_have_zero_partials() {
        let c = Dual2::from(3.0);
        assert_eq!((c.dx, c.dy), (0.0, 0.0));
    }

    #[test]
    fn linear_combination() {
        let x = Dual2::new(2.0, 1.0, 0.0);
        let y = Dual2::new(5.0, 0.0, 1.0);
        // f = 3x + 2y + 1
        let f = x * 3.0 + y * 2.0 + 1.0;
        assert_eq!(f.val, 17.0);
        assert_eq!(f.dx, 3.0);
        assert_eq!(f.dy, 2.0);
    }

    #[test]
    fn product_rule() {
        let x = Dual2::new(2.0, 1.0, 0.0);
        let y = Dual2::new(5.0, 0.0, 1.0);
        // d(xy)/dx = y, d(xy)/dy = x
        let f = x * y;
        assert_eq!(f.val, 10.0);
        assert_eq!(f.dx, 5.0);
        assert_eq!(f.dy, 2.0);
    }

    #[test]
    fn quotient_rule() {
        let x = Dual2::new(6.0, 1.0, 0.0);
        let y = Dual2::new(2.0, 0.0, 1.0);
        // f = x/y; df/dx = 1/y; df/dy = -x/y^2
        let f = x / y;
        assert_eq!(f.val, 3.0);
        assert!((f.dx - 0.5).abs() < 1e-6);
        assert!((f.dy + 1.5).abs() < 1e-6);
    }
}
