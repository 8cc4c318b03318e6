//! 2D affine transforms.

use std::ops::Mul;

use crate::constants::SINGULAR_DETERMINANT;

/// A 2D affine map with six coefficients.
///
/// A point `(x, y)` maps to:
///
/// ```text
/// x' = a * x + c * y + e
/// y' = b * x + d * y + f
/// ```
///
/// `a`/`d` are the x/y scale, `b`/`c` the skew terms and `e`/`f` the
/// translation. Values are immutable: every operation returns a new
/// transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineTransform {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl AffineTransform {
    pub const IDENTITY: Self = Self::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);

    pub const fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    pub const fn translate(tx: f64, ty: f64) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    /// Uniform scale about the origin.
    pub const fn scale(s: f64) -> Self {
        Self::new(s, 0.0, 0.0, s, 0.0, 0.0)
    }

    pub const fn scale_non_uniform(sx: f64, sy: f64) -> Self {
        Self::new(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    /// `translate(tx, ty) * scale(s)`: scale about the origin, then move.
    pub const fn translate_scale(tx: f64, ty: f64, s: f64) -> Self {
        Self::new(s, 0.0, 0.0, s, tx, ty)
    }

    pub fn coefficients(&self) -> [f64; 6] {
        [self.a, self.b, self.c, self.d, self.e, self.f]
    }

    pub fn determinant(&self) -> f64 {
        self.a * self.d - self.b * self.c
    }

    pub fn is_finite(&self) -> bool {
        self.coefficients().iter().all(|v| v.is_finite())
    }

    /// Returns true if the transform is finite and has a usable inverse.
    pub fn is_invertible(&self) -> bool {
        let det = self.determinant();
        self.is_finite() && det.is_finite() && det.abs() > SINGULAR_DETERMINANT
    }

    /// Compute the inverse transform, or `None` when the transform is
    /// singular or contains non-finite coefficients.
    pub fn inverse(&self) -> Option<Self> {
        if !self.is_invertible() {
            return None;
        }
        let inv_det = self.determinant().recip();
        let inverse = Self::new(
            self.d * inv_det,
            -self.b * inv_det,
            -self.c * inv_det,
            self.a * inv_det,
            (self.c * self.f - self.d * self.e) * inv_det,
            (self.b * self.e - self.a * self.f) * inv_det,
        );
        inverse.is_finite().then_some(inverse)
    }

    /// Apply the transform to raw coordinates.
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }
}

impl Default for AffineTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Composition: `(lhs * rhs)` applies `rhs` first, then `lhs`.
impl Mul for AffineTransform {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self::new(
            self.a * rhs.a + self.c * rhs.b,
            self.b * rhs.a + self.d * rhs.b,
            self.a * rhs.c + self.c * rhs.d,
            self.b * rhs.c + self.d * rhs.d,
            self.a * rhs.e + self.c * rhs.f + self.e,
            self.b * rhs.e + self.d * rhs.f + self.f,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn approx_eq(a: (f64, f64), b: (f64, f64)) -> bool {
        (a.0 - b.0).abs() < EPSILON && (a.1 - b.1).abs() < EPSILON
    }

    #[test]
    fn test_identity_leaves_points_alone() {
        assert_eq!(AffineTransform::IDENTITY.apply(3.5, -2.0), (3.5, -2.0));
    }

    #[test]
    fn test_multiply_applies_right_operand_first() {
        let scale = AffineTransform::scale(2.0);
        let translate = AffineTransform::translate(10.0, 0.0);

        // Scale first, then translate
        let scale_then_translate = translate * scale;
        assert!(approx_eq(scale_then_translate.apply(1.0, 1.0), (12.0, 2.0)));

        // Translate first, then scale
        let translate_then_scale = scale * translate;
        assert!(approx_eq(translate_then_scale.apply(1.0, 1.0), (22.0, 2.0)));
    }

    #[test]
    fn test_translate_scale_matches_composition() {
        let direct = AffineTransform::translate_scale(5.0, 7.0, 3.0);
        let composed = AffineTransform::translate(5.0, 7.0) * AffineTransform::scale(3.0);
        assert_eq!(direct, composed);
    }

    #[test]
    fn test_inverse_undoes_transform() {
        let t = AffineTransform::new(1.5, 0.25, -0.5, 2.0, 30.0, -12.0);
        let inv = t.inverse().unwrap();
        let (x, y) = t.apply(42.0, -7.0);
        assert!(approx_eq(inv.apply(x, y), (42.0, -7.0)));
        assert!(approx_eq((t * inv).apply(9.0, 11.0), (9.0, 11.0)));
    }

    #[test]
    fn test_singular_transform_has_no_inverse() {
        assert!(AffineTransform::scale(0.0).inverse().is_none());
        assert!(AffineTransform::scale_non_uniform(1.0, 0.0).inverse().is_none());
    }

    #[test]
    fn test_non_finite_transform_has_no_inverse() {
        assert!(AffineTransform::scale(f64::NAN).inverse().is_none());
        assert!(AffineTransform::translate(f64::INFINITY, 0.0).inverse().is_none());
    }
}
