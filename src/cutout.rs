use log::{trace, warn};
use nalgebra::Point2;

use crate::board::positions;
use crate::canvas::{CompositeOperation, DrawingContext, SavedState};
use crate::{
    draw_circle, draw_oval, draw_pill, draw_polygon, draw_rect, BoardElement, CanvasTransform,
    CircleShape, GeometryError, Hole, HoleShape, OvalShape, PadShape, PillShape, PlatedHole, PlatedHoleShape,
    PolygonShape, RectShape, Rgba, Side, SmtPad, Via,
};

/// Fill used for openings. Only its alpha matters while destination-out is active, full alpha removes
/// the mask completely.
pub const CUTOUT_MASK_COLOR: Rgba = Rgba::WHITE;

/// Erases an opening in everything already drawn for each exposed pad, plated hole, via and hole on
/// `layer`.
///
/// Destination-out compositing is only active for the duration of the call. A feature with malformed
/// geometry is skipped, the remaining features are still cut.
#[profiling::function]
pub fn cut_pour_openings<C: DrawingContext + ?Sized>(
    context: &mut C,
    elements: &[BoardElement],
    layer: Side,
    transform: &CanvasTransform,
) {
    let mut context = SavedState::new(context);
    context.set_composite_operation(CompositeOperation::DestinationOut);

    for (index, element) in elements.iter().enumerate() {
        let result = match element {
            BoardElement::SmtPad(pad) => {
                if !pad.layer.is_side(layer) || !pad.coverage.needs_opening() {
                    continue;
                }
                cut_smt_pad(&mut *context, pad, transform)
            }
            BoardElement::PlatedHole(hole) => {
                if !hole.is_on(layer) || !hole.coverage.needs_opening() {
                    continue;
                }
                cut_plated_hole(&mut *context, hole, transform)
            }
            BoardElement::Via(via) => {
                if !via.is_on(layer) || !via.coverage().needs_opening() {
                    continue;
                }
                cut_via(&mut *context, via, transform)
            }
            BoardElement::Hole(hole) => {
                if !hole.coverage.needs_opening() {
                    continue;
                }
                cut_hole(&mut *context, hole, transform)
            }
            BoardElement::CopperPour(_) | BoardElement::Other => continue,
        };

        if let Err(error) = result {
            warn!("Skipping opening for element {}, cause: {}", index, error);
        }
    }
}

fn cut_circle<C: DrawingContext + ?Sized>(
    context: &mut C,
    circle: CircleShape,
    transform: &CanvasTransform,
) -> Result<(), GeometryError> {
    circle.validate()?;
    draw_circle(context, &circle, CUTOUT_MASK_COLOR, transform);
    Ok(())
}

fn cut_oval<C: DrawingContext + ?Sized>(
    context: &mut C,
    oval: OvalShape,
    transform: &CanvasTransform,
) -> Result<(), GeometryError> {
    oval.validate()?;
    draw_oval(context, &oval, CUTOUT_MASK_COLOR, transform);
    Ok(())
}

fn cut_pill<C: DrawingContext + ?Sized>(
    context: &mut C,
    pill: PillShape,
    transform: &CanvasTransform,
) -> Result<(), GeometryError> {
    pill.validate()?;
    draw_pill(context, &pill, CUTOUT_MASK_COLOR, transform);
    Ok(())
}

fn cut_rect<C: DrawingContext + ?Sized>(
    context: &mut C,
    rect: RectShape,
    transform: &CanvasTransform,
) -> Result<(), GeometryError> {
    rect.validate()?;
    draw_rect(context, &rect, CUTOUT_MASK_COLOR, transform);
    Ok(())
}

fn cut_polygon<C: DrawingContext + ?Sized>(
    context: &mut C,
    polygon: PolygonShape,
    transform: &CanvasTransform,
) -> Result<(), GeometryError> {
    polygon.validate()?;
    draw_polygon(context, &polygon, CUTOUT_MASK_COLOR, transform);
    Ok(())
}

#[cfg_attr(feature = "profile-renderables", profiling::function)]
fn cut_smt_pad<C: DrawingContext + ?Sized>(
    context: &mut C,
    pad: &SmtPad,
    transform: &CanvasTransform,
) -> Result<(), GeometryError> {
    match &pad.shape {
        PadShape::Rect(rect) | PadShape::RotatedRect(rect) => {
            let rotation = match pad.shape {
                PadShape::RotatedRect(_) => rect.ccw_rotation.unwrap_or(0.0),
                _ => 0.0,
            };
            cut_rect(
                context,
                RectShape {
                    center: Point2::new(rect.x, rect.y),
                    width: rect.width,
                    height: rect.height,
                    border_radius: rect.border_radius(),
                    rotation,
                },
                transform,
            )
        }
        PadShape::Circle {
            x,
            y,
            radius,
        } => cut_circle(
            context,
            CircleShape {
                center: Point2::new(*x, *y),
                radius: *radius,
            },
            transform,
        ),
        PadShape::Pill(pill) | PadShape::RotatedPill(pill) => {
            let rotation = match pad.shape {
                PadShape::RotatedPill(_) => pill.ccw_rotation.unwrap_or(0.0),
                _ => 0.0,
            };
            cut_pill(
                context,
                PillShape {
                    center: Point2::new(pill.x, pill.y),
                    width: pill.width,
                    height: pill.height,
                    rotation,
                },
                transform,
            )
        }
        PadShape::Polygon {
            points,
        } => cut_polygon(
            context,
            PolygonShape {
                points: positions(points),
            },
            transform,
        ),
        PadShape::Unsupported => {
            trace!("Ignoring smt pad with unsupported shape, id: {:?}", pad.pcb_smtpad_id);
            Ok(())
        }
    }
}

#[cfg_attr(feature = "profile-renderables", profiling::function)]
fn cut_plated_hole<C: DrawingContext + ?Sized>(
    context: &mut C,
    hole: &PlatedHole,
    transform: &CanvasTransform,
) -> Result<(), GeometryError> {
    let center = Point2::new(hole.x, hole.y);

    match &hole.shape {
        PlatedHoleShape::Circle {
            outer_diameter, ..
        } => cut_circle(
            context,
            CircleShape {
                center,
                radius: outer_diameter / 2.0,
            },
            transform,
        ),
        PlatedHoleShape::Oval(outline) => cut_oval(
            context,
            OvalShape {
                center,
                radius_x: outline.outer_width / 2.0,
                radius_y: outline.outer_height / 2.0,
                rotation: outline.ccw_rotation,
            },
            transform,
        ),
        PlatedHoleShape::Pill(outline) => cut_pill(
            context,
            PillShape {
                center,
                width: outline.outer_width,
                height: outline.outer_height,
                rotation: outline.ccw_rotation,
            },
            transform,
        ),
        PlatedHoleShape::CircularHoleWithRectPad(pad)
        | PlatedHoleShape::PillHoleWithRectPad(pad)
        | PlatedHoleShape::RotatedPillHoleWithRectPad(pad) => {
            let rotation = match hole.shape {
                PlatedHoleShape::RotatedPillHoleWithRectPad(_) => pad.rect_ccw_rotation.unwrap_or(0.0),
                _ => 0.0,
            };
            cut_rect(
                context,
                RectShape {
                    center,
                    width: pad.rect_pad_width,
                    height: pad.rect_pad_height,
                    border_radius: pad.rect_border_radius.unwrap_or(0.0),
                    rotation,
                },
                transform,
            )
        }
        PlatedHoleShape::HoleWithPolygonPad {
            pad_outline,
        } => {
            let points = pad_outline
                .iter()
                .map(|point| Point2::new(hole.x + point.x, hole.y + point.y))
                .collect();
            cut_polygon(
                context,
                PolygonShape {
                    points,
                },
                transform,
            )
        }
        PlatedHoleShape::Unsupported => {
            trace!(
                "Ignoring plated hole with unsupported shape, id: {:?}",
                hole.pcb_plated_hole_id
            );
            Ok(())
        }
    }
}

#[cfg_attr(feature = "profile-renderables", profiling::function)]
fn cut_via<C: DrawingContext + ?Sized>(
    context: &mut C,
    via: &Via,
    transform: &CanvasTransform,
) -> Result<(), GeometryError> {
    cut_circle(
        context,
        CircleShape {
            center: Point2::new(via.x, via.y),
            radius: via.outer_diameter / 2.0,
        },
        transform,
    )
}

#[cfg_attr(feature = "profile-renderables", profiling::function)]
fn cut_hole<C: DrawingContext + ?Sized>(
    context: &mut C,
    hole: &Hole,
    transform: &CanvasTransform,
) -> Result<(), GeometryError> {
    let center = Point2::new(hole.x, hole.y);
    let rotation = hole.ccw_rotation.unwrap_or(0.0);

    match hole.shape {
        HoleShape::Circle {
            hole_diameter,
        } => cut_circle(
            context,
            CircleShape {
                center,
                radius: hole_diameter / 2.0,
            },
            transform,
        ),
        HoleShape::Square {
            hole_diameter,
        } => cut_rect(
            context,
            RectShape {
                center,
                width: hole_diameter,
                height: hole_diameter,
                border_radius: 0.0,
                rotation,
            },
            transform,
        ),
        HoleShape::Oval {
            hole_width,
            hole_height,
        } => cut_oval(
            context,
            OvalShape {
                center,
                radius_x: hole_width / 2.0,
                radius_y: hole_height / 2.0,
                rotation,
            },
            transform,
        ),
        HoleShape::Rect {
            hole_width,
            hole_height,
        } => cut_rect(
            context,
            RectShape {
                center,
                width: hole_width,
                height: hole_height,
                border_radius: 0.0,
                rotation,
            },
            transform,
        ),
        HoleShape::Pill {
            hole_width,
            hole_height,
        }
        | HoleShape::RotatedPill {
            hole_width,
            hole_height,
        } => cut_pill(
            context,
            PillShape {
                center,
                width: hole_width,
                height: hole_height,
                rotation,
            },
            transform,
        ),
        HoleShape::Unsupported => {
            trace!("Ignoring hole with unsupported shape, id: {:?}", hole.pcb_hole_id);
            Ok(())
        }
    }
}

#[cfg(test)]
mod cutout_tests {
    use rstest::rstest;

    use super::*;
    use crate::testing::{DrawCommand, RecordingCanvas};
    use crate::{BoardPoint, Coverage, Layer, OuterOutline, PillPad, RectPad, RectPadOutline};

    fn init_logging() {
        let _ = env_logger::builder()
            .is_test(true)
            .try_init();
    }

    fn circle_pad(layer: Layer, coverage: Coverage) -> BoardElement {
        BoardElement::SmtPad(SmtPad {
            pcb_smtpad_id: None,
            layer,
            coverage,
            shape: PadShape::Circle {
                x: 1.0,
                y: 1.0,
                radius: 0.5,
            },
        })
    }

    fn via(layers: Option<Vec<Layer>>) -> BoardElement {
        BoardElement::Via(Via {
            pcb_via_id: None,
            x: 0.0,
            y: 0.0,
            outer_diameter: 0.6,
            hole_diameter: Some(0.3),
            layers,
        })
    }

    fn plated_circle(layers: Option<Vec<Layer>>, coverage: Coverage) -> BoardElement {
        BoardElement::PlatedHole(PlatedHole {
            pcb_plated_hole_id: None,
            x: 3.0,
            y: 3.0,
            layers,
            coverage,
            shape: PlatedHoleShape::Circle {
                outer_diameter: 2.0,
                hole_diameter: Some(1.0),
            },
        })
    }

    fn hole(coverage: Coverage, ccw_rotation: Option<f64>, shape: HoleShape) -> BoardElement {
        BoardElement::Hole(Hole {
            pcb_hole_id: None,
            x: 2.0,
            y: 2.0,
            coverage,
            ccw_rotation,
            shape,
        })
    }

    fn fill_count(canvas: &RecordingCanvas) -> usize {
        canvas.fills().len()
    }

    fn cut(elements: &[BoardElement], layer: Side) -> RecordingCanvas {
        init_logging();
        let mut canvas = RecordingCanvas::default();
        cut_pour_openings(&mut canvas, elements, layer, &CanvasTransform::IDENTITY);
        canvas
    }

    #[test]
    fn test_composite_operation_is_scoped() {
        // when
        let canvas = cut(&[], Side::Top);

        // then
        assert_eq!(canvas.commands(), &[
            DrawCommand::Save,
            DrawCommand::SetCompositeOperation(CompositeOperation::DestinationOut),
            DrawCommand::Restore,
        ]);
    }

    #[test]
    fn test_openings_use_the_mask_color() {
        let canvas = cut(&[circle_pad(Layer::Top, Coverage::Exposed)], Side::Top);

        assert!(canvas
            .commands()
            .contains(&DrawCommand::SetFillStyle(CUTOUT_MASK_COLOR)));
        assert!(CUTOUT_MASK_COLOR.is_opaque());
        assert!(canvas.is_balanced());
    }

    #[rstest]
    #[case::exposed_on_layer(circle_pad(Layer::Top, Coverage::Exposed), 1)]
    #[case::covered(circle_pad(Layer::Top, Coverage::Covered), 0)]
    #[case::other_layer(circle_pad(Layer::Bottom, Coverage::Exposed), 0)]
    #[case::inner_layer(circle_pad(Layer::Other("inner1".to_string()), Coverage::Exposed), 0)]
    #[case::via_without_layers(via(None), 1)]
    #[case::via_on_layer(via(Some(vec![Layer::Top, Layer::Bottom])), 1)]
    #[case::via_elsewhere(via(Some(vec![Layer::Bottom])), 0)]
    #[case::plated_without_layers(plated_circle(None, Coverage::Exposed), 1)]
    #[case::plated_elsewhere(plated_circle(Some(vec![Layer::Bottom]), Coverage::Exposed), 0)]
    #[case::plated_covered(plated_circle(None, Coverage::Covered), 0)]
    #[case::hole(hole(Coverage::Exposed, None, HoleShape::Circle { hole_diameter: 1.0 }), 1)]
    #[case::covered_hole(hole(Coverage::Covered, None, HoleShape::Circle { hole_diameter: 1.0 }), 0)]
    #[case::unsupported_hole(hole(Coverage::Exposed, None, HoleShape::Unsupported), 0)]
    #[case::other_element(BoardElement::Other, 0)]
    fn test_skip_rules(#[case] element: BoardElement, #[case] expected_fills: usize) {
        // when
        let canvas = cut(&[element], Side::Top);

        // then
        assert_eq!(fill_count(&canvas), expected_fills);
        assert!(canvas.is_balanced());
    }

    #[test]
    fn test_hole_ignores_layer() {
        let element = hole(Coverage::Exposed, None, HoleShape::Circle {
            hole_diameter: 1.0,
        });

        assert_eq!(fill_count(&cut(&[element.clone()], Side::Top)), 1);
        assert_eq!(fill_count(&cut(&[element], Side::Bottom)), 1);
    }

    #[test]
    fn test_pours_are_never_cut() {
        // given
        let pour = BoardElement::CopperPour(crate::CopperPour {
            pcb_copper_pour_id: None,
            layer: Layer::Top,
            coverage: Coverage::Exposed,
            shape: crate::PourShape::Polygon {
                points: vec![BoardPoint::new(0.0, 0.0), BoardPoint::new(1.0, 0.0), BoardPoint::new(0.0, 1.0)],
            },
        });

        // when
        let canvas = cut(&[pour], Side::Top);

        // then
        assert_eq!(fill_count(&canvas), 0);
    }

    #[test]
    fn test_openings_follow_element_order() {
        // given
        let elements = [
            via(None),
            circle_pad(Layer::Top, Coverage::Exposed),
            plated_circle(None, Coverage::Exposed),
        ];

        // when
        let canvas = cut(&elements, Side::Top);

        // then
        let radii: Vec<f64> = canvas
            .commands()
            .iter()
            .filter_map(|command| match command {
                DrawCommand::Arc {
                    radius, ..
                } => Some(*radius),
                _ => None,
            })
            .collect();
        assert_eq!(radii, vec![0.3, 0.5, 1.0]);
    }

    #[test]
    fn test_malformed_feature_is_skipped_and_pass_continues() {
        // given
        let broken = BoardElement::SmtPad(SmtPad {
            pcb_smtpad_id: Some("broken".to_string()),
            layer: Layer::Top,
            coverage: Coverage::Exposed,
            shape: PadShape::Circle {
                x: f64::NAN,
                y: 0.0,
                radius: 1.0,
            },
        });
        let polygon = BoardElement::SmtPad(SmtPad {
            pcb_smtpad_id: None,
            layer: Layer::Top,
            coverage: Coverage::Exposed,
            shape: PadShape::Polygon {
                points: vec![BoardPoint::new(0.0, 0.0), BoardPoint::new(1.0, 0.0)],
            },
        });

        // when
        let canvas = cut(&[broken, polygon, via(None)], Side::Top);

        // then
        assert_eq!(fill_count(&canvas), 1);
        assert!(canvas.is_balanced());
        assert_eq!(canvas.commands().last(), Some(&DrawCommand::Restore));
    }

    #[rstest]
    #[case::rect(PadShape::Rect(RectPad { x: 0.0, y: 0.0, width: 2.0, height: 1.0, ccw_rotation: Some(30.0), ..RectPad::default() }), 0)]
    #[case::rotated_rect(PadShape::RotatedRect(RectPad { x: 0.0, y: 0.0, width: 2.0, height: 1.0, ccw_rotation: Some(30.0), ..RectPad::default() }), 1)]
    #[case::pill(PadShape::Pill(PillPad { x: 0.0, y: 0.0, width: 2.0, height: 1.0, ccw_rotation: Some(30.0) }), 0)]
    #[case::rotated_pill(PadShape::RotatedPill(PillPad { x: 0.0, y: 0.0, width: 2.0, height: 1.0, ccw_rotation: Some(30.0) }), 1)]
    fn test_pad_rotation_only_for_rotated_shapes(#[case] shape: PadShape, #[case] expected_rotations: usize) {
        // given
        let pad = BoardElement::SmtPad(SmtPad {
            pcb_smtpad_id: None,
            layer: Layer::Top,
            coverage: Coverage::Exposed,
            shape,
        });

        // when
        let canvas = cut(&[pad], Side::Top);

        // then
        assert_eq!(
            canvas.count(|command| matches!(command, DrawCommand::Rotate(_))),
            expected_rotations
        );
    }

    #[test]
    fn test_pad_corner_radius_falls_back_to_legacy_name() {
        // given
        let pad = BoardElement::SmtPad(SmtPad {
            pcb_smtpad_id: None,
            layer: Layer::Top,
            coverage: Coverage::Exposed,
            shape: PadShape::Rect(RectPad {
                x: 0.0,
                y: 0.0,
                width: 4.0,
                height: 4.0,
                rect_border_radius: Some(1.0),
                ..RectPad::default()
            }),
        });

        // when
        let canvas = cut(&[pad], Side::Top);

        // then
        assert_eq!(
            canvas.count(|command| matches!(command, DrawCommand::Arc { radius, .. } if *radius == 1.0)),
            4
        );
    }

    #[rstest]
    #[case::circular(PlatedHoleShape::CircularHoleWithRectPad(RectPadOutline { rect_pad_width: 2.0, rect_pad_height: 3.0, rect_border_radius: None, rect_ccw_rotation: Some(45.0) }), 0)]
    #[case::pill(PlatedHoleShape::PillHoleWithRectPad(RectPadOutline { rect_pad_width: 2.0, rect_pad_height: 3.0, rect_border_radius: None, rect_ccw_rotation: Some(45.0) }), 0)]
    #[case::rotated_pill(PlatedHoleShape::RotatedPillHoleWithRectPad(RectPadOutline { rect_pad_width: 2.0, rect_pad_height: 3.0, rect_border_radius: None, rect_ccw_rotation: Some(45.0) }), 1)]
    #[case::oval(PlatedHoleShape::Oval(OuterOutline { outer_width: 2.0, outer_height: 1.0, ccw_rotation: 10.0 }), 1)]
    #[case::pill_outline(PlatedHoleShape::Pill(OuterOutline { outer_width: 2.0, outer_height: 1.0, ccw_rotation: 0.0 }), 0)]
    fn test_plated_hole_rotation(#[case] shape: PlatedHoleShape, #[case] expected_rotations: usize) {
        // given
        let element = BoardElement::PlatedHole(PlatedHole {
            pcb_plated_hole_id: None,
            x: 0.0,
            y: 0.0,
            layers: None,
            coverage: Coverage::Exposed,
            shape,
        });

        // when
        let canvas = cut(&[element], Side::Top);

        // then
        assert_eq!(fill_count(&canvas), 1);
        assert_eq!(
            canvas.count(|command| matches!(command, DrawCommand::Rotate(_))),
            expected_rotations
        );
    }

    #[test]
    fn test_polygon_pad_outline_is_relative_to_hole() {
        // given
        let element = BoardElement::PlatedHole(PlatedHole {
            pcb_plated_hole_id: None,
            x: 10.0,
            y: 20.0,
            layers: Some(vec![Layer::Top]),
            coverage: Coverage::Exposed,
            shape: PlatedHoleShape::HoleWithPolygonPad {
                pad_outline: vec![BoardPoint::new(-1.0, -1.0), BoardPoint::new(1.0, -1.0), BoardPoint::new(0.0, 1.0)],
            },
        });

        // when
        let canvas = cut(&[element], Side::Top);

        // then
        assert!(canvas
            .commands()
            .contains(&DrawCommand::MoveTo(Point2::new(9.0, 19.0))));
        assert!(canvas
            .commands()
            .contains(&DrawCommand::LineTo(Point2::new(10.0, 21.0))));
    }

    #[rstest]
    #[case::square(HoleShape::Square { hole_diameter: 2.0 })]
    #[case::rect(HoleShape::Rect { hole_width: 2.0, hole_height: 1.0 })]
    #[case::oval(HoleShape::Oval { hole_width: 2.0, hole_height: 1.0 })]
    #[case::pill(HoleShape::Pill { hole_width: 2.0, hole_height: 1.0 })]
    #[case::rotated_pill(HoleShape::RotatedPill { hole_width: 2.0, hole_height: 1.0 })]
    fn test_hole_rotation_defaults_to_zero(#[case] shape: HoleShape) {
        // when
        let unrotated = cut(&[hole(Coverage::Exposed, None, shape.clone())], Side::Top);
        let rotated = cut(&[hole(Coverage::Exposed, Some(90.0), shape)], Side::Top);

        // then
        assert_eq!(unrotated.count(|command| matches!(command, DrawCommand::Rotate(_))), 0);
        assert_eq!(
            rotated.count(|command| matches!(command, DrawCommand::Rotate(_))),
            1
        );
        assert_eq!(fill_count(&rotated), 1);
    }
}
