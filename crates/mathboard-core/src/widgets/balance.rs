//! Balance scale: a pivoting beam with two plates and draggable weights.

use kurbo::{Point, Rect, Vec2};

use super::palette;
use crate::config::{WidgetConfig, or_fallback};
use crate::scene::{
    DropZone, ElementKind, InteractiveElement, Scene, SceneShape, ShapeStyle, WidgetKind, ZoneKind,
};

/// Beam pivot, canvas center-top.
pub const PIVOT: Point = Point::new(500.0, 400.0);
/// Discrete beam tip angle in degrees.
pub const TIP_DEGREES: f64 = 20.0;

const BEAM_HALF_SPAN: f64 = 250.0;
const HANGER_DROP: f64 = 80.0;
const PLATE_HALF_WIDTH: f64 = 70.0;

/// Nominal plate anchors at rest (tokens snap here).
const LEFT_ANCHOR: Point = Point::new(250.0, 440.0);
const RIGHT_ANCHOR: Point = Point::new(750.0, 440.0);

/// Generous static bounding boxes around each plate, covering the plate in
/// any beam position.
const LEFT_ZONE: Rect = Rect::new(130.0, 360.0, 370.0, 600.0);
const RIGHT_ZONE: Rect = Rect::new(630.0, 360.0, 870.0, 600.0);

const BANK_Y: f64 = 880.0;
const BANK_X0: f64 = 200.0;
const BANK_STEP: f64 = 110.0;
const TOKEN_RADIUS: f64 = 35.0;

/// Discrete beam rotation for the given totals: -20° when the left side is
/// heavier, +20° when the right side is heavier, 0° when equal.
pub fn beam_rotation(left: f64, right: f64) -> f64 {
    if (left - right).abs() < f64::EPSILON {
        0.0
    } else if left > right {
        -TIP_DEGREES
    } else {
        TIP_DEGREES
    }
}

/// Beam, hangers and plates at the given rotation.
pub fn beam_shapes(degrees: f64) -> Vec<SceneShape> {
    let rad = degrees.to_radians();
    let dir = Vec2::new(rad.cos(), rad.sin());
    let left_end = PIVOT - dir * BEAM_HALF_SPAN;
    let right_end = PIVOT + dir * BEAM_HALF_SPAN;

    let beam_style = ShapeStyle::stroke(palette::INK, 8.0);
    let hanger_style = ShapeStyle::stroke(palette::AXIS, 2.0);
    let plate_style = ShapeStyle::stroke(palette::INK, 5.0);

    let mut shapes = vec![
        SceneShape::Segment {
            from: left_end,
            to: right_end,
            style: beam_style,
        },
        SceneShape::Circle {
            center: PIVOT,
            radius: 10.0,
            style: ShapeStyle::filled(palette::INK, palette::INK, 1.0),
        },
    ];

    for end in [left_end, right_end] {
        let plate_center = Point::new(end.x, end.y + HANGER_DROP);
        shapes.push(SceneShape::Segment {
            from: end,
            to: plate_center,
            style: hanger_style,
        });
        shapes.push(SceneShape::Segment {
            from: Point::new(plate_center.x - PLATE_HALF_WIDTH, plate_center.y),
            to: Point::new(plate_center.x + PLATE_HALF_WIDTH, plate_center.y),
            style: plate_style,
        });
    }

    shapes
}

/// Sum the payloads resting on each plate: (left total, right total).
pub fn plate_tally(scene: &Scene) -> (f64, f64) {
    let mut left = 0.0;
    let mut right = 0.0;
    for element in &scene.elements {
        match element.placed_in {
            Some(ZoneKind::PlateLeft) => left += element.payload,
            Some(ZoneKind::PlateRight) => right += element.payload,
            _ => {}
        }
    }
    (left, right)
}

pub fn build(config: &WidgetConfig) -> Scene {
    let mut scene = Scene::new(WidgetKind::BalanceScale);

    // Pillar and base under the pivot.
    let frame_style = ShapeStyle::stroke(palette::INK, 6.0);
    scene.push_shape(SceneShape::Segment {
        from: PIVOT,
        to: Point::new(PIVOT.x, 700.0),
        style: frame_style,
    });
    scene.push_shape(SceneShape::Segment {
        from: Point::new(380.0, 700.0),
        to: Point::new(620.0, 700.0),
        style: frame_style,
    });

    let zone_style = ShapeStyle::filled(palette::ZONE_FILL, palette::AXIS, 1.0).dashed();
    for (rect, kind, anchor) in [
        (LEFT_ZONE, ZoneKind::PlateLeft, LEFT_ANCHOR),
        (RIGHT_ZONE, ZoneKind::PlateRight, RIGHT_ANCHOR),
    ] {
        scene.push_shape(SceneShape::Rect {
            rect,
            style: zone_style,
        });
        scene.push_zone(DropZone::new(rect, kind, anchor));
    }

    // Preplaced plate weights. A zero weight contributes nothing and gets
    // no token.
    let left = or_fallback(config.left_weight);
    let right = or_fallback(config.right_weight);
    for (slot, (weight, name, zone, anchor)) in [
        (left, "left-weight", ZoneKind::PlateLeft, LEFT_ANCHOR),
        (right, "right-weight", ZoneKind::PlateRight, RIGHT_ANCHOR),
    ]
    .into_iter()
    .enumerate()
    {
        if weight != 0.0 {
            // Home slots continue past the bank tokens, so a missed drop
            // never stacks two tokens on one slot.
            let home = bank_slot(config.inputs.len() + slot);
            scene.push_element(
                InteractiveElement::new(name, ElementKind::Token { home }, anchor)
                    .with_payload(weight)
                    .with_radius(TOKEN_RADIUS)
                    .with_style(token_style())
                    .with_label(format_weight(weight))
                    .placed(zone),
            );
        }
    }

    // Draggable bank tokens.
    for (i, &value) in config.inputs.iter().enumerate() {
        let home = bank_slot(i);
        scene.push_element(
            InteractiveElement::new(format!("weight-{i}"), ElementKind::Token { home }, home)
                .with_payload(value)
                .with_radius(TOKEN_RADIUS)
                .with_style(token_style())
                .with_label(format_weight(value)),
        );
    }

    let (left_total, right_total) = plate_tally(&scene);
    scene.beam_degrees = beam_rotation(left_total, right_total);
    scene.set_overlay("beam", beam_shapes(scene.beam_degrees));

    scene.set_readout(
        "left-total",
        Point::new(250.0, 740.0),
        format!("Left: {}", format_weight(left_total)),
    );
    scene.set_readout(
        "right-total",
        Point::new(750.0, 740.0),
        format!("Right: {}", format_weight(right_total)),
    );

    scene
}

/// Refresh the beam overlay and the plate readouts from the current tally.
pub fn refresh(scene: &mut Scene) -> (f64, f64) {
    let (left, right) = plate_tally(scene);
    scene.beam_degrees = beam_rotation(left, right);
    let shapes = beam_shapes(scene.beam_degrees);
    scene.set_overlay("beam", shapes);
    scene.update_readout("left-total", format!("Left: {}", format_weight(left)));
    scene.update_readout("right-total", format!("Right: {}", format_weight(right)));
    (left, right)
}

fn bank_slot(index: usize) -> Point {
    Point::new(BANK_X0 + index as f64 * BANK_STEP, BANK_Y)
}

fn token_style() -> ShapeStyle {
    ShapeStyle::filled(palette::WARM, palette::INK, 2.0)
}

fn format_weight(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{value:.1}")
    }
}
