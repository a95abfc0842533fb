use nalgebra::{Matrix3, Point2};

/// Affine transform from board (real-world) units to canvas/device pixels.
///
/// Uses the 2D canvas convention:
/// ```plaintext
/// x' = a·x + c·y + e
/// y' = b·x + d·y + f
/// ```
///
/// Arc radii and pour/pad sizes are scaled assuming a similarity transform (uniform scale, rotation,
/// optional reflection, no shear). Under a sheared or non-uniformly scaled transform arcs and sizes will
/// be visually incorrect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasTransform {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Default for CanvasTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl CanvasTransform {
    pub const IDENTITY: Self = Self::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);

    pub const fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self {
            a,
            b,
            c,
            d,
            e,
            f,
        }
    }

    pub const fn translation(x: f64, y: f64) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, x, y)
    }

    pub const fn scale(sx: f64, sy: f64) -> Self {
        Self::new(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    pub fn rotation(radians: f64) -> Self {
        let (sin_theta, cos_theta) = radians.sin_cos();
        Self::new(cos_theta, sin_theta, -sin_theta, cos_theta, 0.0, 0.0)
    }

    /// The usual board-to-screen mapping: board Y points up, canvas Y points down.
    ///
    /// `origin` is the board position that lands on the canvas pixel (0, 0).
    pub fn board_to_canvas(pixels_per_unit: f64, origin: Point2<f64>) -> Self {
        Self::translation(-origin.x, -origin.y).then(&Self::scale(pixels_per_unit, -pixels_per_unit))
    }

    /// Returns a transform that applies `self` first, then `next`.
    pub fn then(&self, next: &CanvasTransform) -> Self {
        Self::from(next.to_matrix() * self.to_matrix())
    }

    pub fn apply_to_position(&self, position: Point2<f64>) -> Point2<f64> {
        Point2::new(
            self.a * position.x + self.c * position.y + self.e,
            self.b * position.x + self.d * position.y + self.f,
        )
    }

    pub fn determinant(&self) -> f64 {
        self.a * self.d - self.b * self.c
    }

    /// A negative determinant means the transform mirrors one axis, which reverses the visual sweep
    /// direction of every arc.
    pub fn is_flipped(&self) -> bool {
        self.determinant() < 0.0
    }

    /// Uniform scale factor, taken from the X axis only (`|a|`).
    pub fn uniform_scale(&self) -> f64 {
        self.a.abs()
    }

    pub fn to_matrix(&self) -> Matrix3<f64> {
        Matrix3::new(self.a, self.c, self.e, self.b, self.d, self.f, 0.0, 0.0, 1.0)
    }
}

impl From<Matrix3<f64>> for CanvasTransform {
    fn from(matrix: Matrix3<f64>) -> Self {
        Self::new(
            matrix[(0, 0)],
            matrix[(1, 0)],
            matrix[(0, 1)],
            matrix[(1, 1)],
            matrix[(0, 2)],
            matrix[(1, 2)],
        )
    }
}

#[cfg(test)]
mod transform_tests {
    use std::f64::consts::FRAC_PI_2;

    use nalgebra::Point2;
    use rstest::rstest;

    use super::CanvasTransform;

    #[test]
    fn test_identity_is_noop() {
        let position = Point2::new(12.5, -3.0);
        assert_eq!(CanvasTransform::IDENTITY.apply_to_position(position), position);
    }

    #[test]
    fn test_then_applies_in_order() {
        // given
        let transform = CanvasTransform::translation(10.0, 0.0).then(&CanvasTransform::scale(2.0, 2.0));

        // when
        let result = transform.apply_to_position(Point2::new(1.0, 1.0));

        // then
        assert_eq!(result, Point2::new(22.0, 2.0));
    }

    #[test]
    fn test_rotation_90_degrees() {
        let result = CanvasTransform::rotation(FRAC_PI_2).apply_to_position(Point2::new(1.0, 0.0));

        assert!((result.x - 0.0).abs() < 1e-12);
        assert!((result.y - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_board_to_canvas_flips_y() {
        // given
        let transform = CanvasTransform::board_to_canvas(4.0, Point2::new(-10.0, 20.0));

        // when
        let result = transform.apply_to_position(Point2::new(0.0, 0.0));

        // then
        assert_eq!(result, Point2::new(40.0, 80.0));
        assert!(transform.is_flipped());
        assert_eq!(transform.uniform_scale(), 4.0);
    }

    #[rstest]
    #[case(CanvasTransform::IDENTITY, false)]
    #[case(CanvasTransform::scale(3.0, 3.0), false)]
    #[case(CanvasTransform::scale(1.0, -1.0), true)]
    #[case(CanvasTransform::scale(-1.0, 1.0), true)]
    #[case(CanvasTransform::scale(-1.0, -1.0), false)]
    #[case(CanvasTransform::rotation(1.0), false)]
    fn test_is_flipped(#[case] transform: CanvasTransform, #[case] expected: bool) {
        assert_eq!(transform.is_flipped(), expected);
    }

    #[test]
    fn test_matrix_round_trip() {
        let transform = CanvasTransform::new(1.0, 2.0, 3.0, 4.0, 5.0, 6.0);
        assert_eq!(CanvasTransform::from(transform.to_matrix()), transform);
    }
}
