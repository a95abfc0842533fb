use nalgebra::Point2;

use super::GEOMETRY_EPSILON;

/// The circle a bulge-encoded segment lies on, in the same space as the segment's endpoints.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BulgeArc {
    pub center: Point2<f64>,
    pub radius: f64,
}

pub fn is_straight_bulge(bulge: f64) -> bool {
    bulge.abs() < GEOMETRY_EPSILON
}

/// Reconstructs the circle encoded by a bulge value on the segment `start` -> `end`.
///
/// The bulge is the tangent of a quarter of the included angle, so the sagitta is `|bulge| * chord / 2`.
/// A positive bulge places the center to the right of the chord direction, a negative bulge to the left.
///
/// Returns `None` when the segment should be drawn as a straight line: a near-zero bulge, coincident
/// endpoints, or a result that is not finite.
pub fn resolve_bulge_arc(start: Point2<f64>, end: Point2<f64>, bulge: f64) -> Option<BulgeArc> {
    if is_straight_bulge(bulge) {
        return None;
    }

    let chord = end - start;
    let chord_length = chord.x.hypot(chord.y);
    if chord_length < GEOMETRY_EPSILON {
        return None;
    }

    let half_chord = chord_length / 2.0;
    let sagitta = bulge.abs() * half_chord;
    let radius = (sagitta * sagitta + half_chord * half_chord) / (2.0 * sagitta);
    let dist_to_center = radius - sagitta;

    let midpoint = Point2::new((start.x + end.x) / 2.0, (start.y + end.y) / 2.0);
    let (perp_x, perp_y) = (-chord.y / chord_length, chord.x / chord_length);
    let sign = if bulge > 0.0 { -1.0 } else { 1.0 };

    let center = Point2::new(
        midpoint.x + sign * perp_x * dist_to_center,
        midpoint.y + sign * perp_y * dist_to_center,
    );

    if !(radius.is_finite() && center.x.is_finite() && center.y.is_finite()) {
        return None;
    }

    Some(BulgeArc {
        center,
        radius,
    })
}

#[cfg(test)]
mod bulge_tests {
    use nalgebra::Point2;
    use rstest::rstest;

    use super::*;

    fn distance(a: Point2<f64>, b: Point2<f64>) -> f64 {
        (a.x - b.x).hypot(a.y - b.y)
    }

    #[rstest]
    #[case(0.0)]
    #[case(1e-11)]
    #[case(-9e-11)]
    fn test_near_zero_bulge_is_straight(#[case] bulge: f64) {
        assert_eq!(resolve_bulge_arc(Point2::new(0.0, 0.0), Point2::new(10.0, 0.0), bulge), None);
    }

    #[test]
    fn test_coincident_points_are_straight() {
        let point = Point2::new(3.0, 4.0);
        assert_eq!(resolve_bulge_arc(point, point, 1.0), None);
    }

    #[test]
    fn test_semicircle() {
        // given
        let start = Point2::new(0.0, 0.0);
        let end = Point2::new(10.0, 0.0);

        // when
        let arc = resolve_bulge_arc(start, end, 1.0).unwrap();

        // then
        // a bulge of 1 is a half circle, the center is the chord midpoint
        assert!((arc.radius - 5.0).abs() < 1e-12);
        assert!((arc.center.x - 5.0).abs() < 1e-12);
        assert!(arc.center.y.abs() < 1e-12);
    }

    #[rstest]
    #[case(0.25)]
    #[case(-0.25)]
    #[case(0.5)]
    #[case(-0.75)]
    #[case(1.0)]
    #[case(2.5)]
    #[case(-4.0)]
    fn test_center_is_equidistant_from_endpoints(#[case] bulge: f64) {
        // given
        let start = Point2::new(-3.0, 7.0);
        let end = Point2::new(11.0, -2.0);

        // when
        let arc = resolve_bulge_arc(start, end, bulge).unwrap();

        // then
        let epsilon = 1e-9;
        assert!((distance(arc.center, start) - arc.radius).abs() < epsilon);
        assert!((distance(arc.center, end) - arc.radius).abs() < epsilon);
    }

    #[test]
    fn test_bulge_sign_selects_side() {
        // given
        let start = Point2::new(0.0, 0.0);
        let end = Point2::new(10.0, 0.0);

        // when
        let positive = resolve_bulge_arc(start, end, 0.5).unwrap();
        let negative = resolve_bulge_arc(start, end, -0.5).unwrap();

        // then
        // chord points along +X, positive bulges put the center below it, negative above it
        assert!(positive.center.y < 0.0);
        assert!(negative.center.y > 0.0);
        assert!((positive.center.y + negative.center.y).abs() < 1e-12);
        assert!((positive.radius - negative.radius).abs() < 1e-12);
    }

    #[test]
    fn test_quarter_circle_radius() {
        // bulge = tan(90° / 4)
        let bulge = (std::f64::consts::FRAC_PI_2 / 4.0).tan();
        let arc = resolve_bulge_arc(Point2::new(1.0, 0.0), Point2::new(0.0, 1.0), bulge).unwrap();

        assert!((arc.radius - 1.0).abs() < 1e-9);
        assert!((arc.center.x - 1.0).abs() < 1e-9);
        assert!((arc.center.y - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_non_finite_result_is_straight() {
        assert_eq!(resolve_bulge_arc(Point2::new(0.0, 0.0), Point2::new(1.0, 0.0), f64::INFINITY), None);
    }
}
