//! Coordinate grid: a draggable point over a centered plane.

use kurbo::{Point, Rect};

use super::palette;
use crate::config::WidgetConfig;
use crate::scene::{ElementKind, InteractiveElement, Scene, SceneShape, ShapeStyle, WidgetKind};

/// The 800×800 plane area, centered in the frame.
pub const AREA: Rect = Rect::new(100.0, 100.0, 900.0, 900.0);
/// Grid spacing in scene pixels; one math unit.
pub const UNIT: f64 = 50.0;
/// Origin of the math plane, center of the area.
pub const ORIGIN: Point = Point::new(500.0, 500.0);

/// Where the live coordinate readout sits.
pub const COORDS_READOUT: Point = Point::new(140.0, 70.0);

/// Convert a scene position to math coordinates (Y inverted: screen-down
/// is math-negative).
pub fn math_coords(origin: Point, unit: f64, position: Point) -> (f64, f64) {
    let x = (position.x - origin.x) / unit;
    let y = -((position.y - origin.y) / unit);
    // The negation turns an on-axis 0.0 into -0.0.
    (x, if y == 0.0 { 0.0 } else { y })
}

/// Scene position of integer math coordinates.
pub fn screen_from_math(origin: Point, unit: f64, x: i64, y: i64) -> Point {
    Point::new(origin.x + x as f64 * unit, origin.y - y as f64 * unit)
}

/// Live coordinate text with one decimal, used while dragging.
pub fn coord_text(origin: Point, unit: f64, position: Point) -> String {
    let (x, y) = math_coords(origin, unit, position);
    format!("({}, {})", display_coord(x), display_coord(y))
}

/// One-decimal display value; anything that rounds to zero prints as 0.0.
fn display_coord(value: f64) -> String {
    let rounded = (value * 10.0).round() / 10.0;
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{rounded:.1}")
}

/// Exact coordinate text for a snapped position.
pub fn snapped_text(x: i64, y: i64) -> String {
    format!("({x}, {y})")
}

pub fn marker_style() -> ShapeStyle {
    ShapeStyle::filled(palette::ACCENT, palette::INK, 2.0)
}

pub fn success_style() -> ShapeStyle {
    ShapeStyle::filled(palette::SUCCESS, palette::INK, 2.0)
}

pub fn build(config: &WidgetConfig) -> Scene {
    let mut scene = Scene::new(WidgetKind::CoordinateGrid);

    let line_style = ShapeStyle::stroke(palette::GRID, 1.0);
    let axis_style = ShapeStyle::stroke(palette::AXIS, 2.0);

    // Grid lines at UNIT spacing inside the area, axes through the origin.
    let steps = ((AREA.x1 - AREA.x0) / UNIT) as i64;
    for i in 0..=steps {
        let offset = AREA.x0 + i as f64 * UNIT;
        let vertical = (offset - ORIGIN.x).abs() < f64::EPSILON;
        scene.push_shape(SceneShape::Segment {
            from: Point::new(offset, AREA.y0),
            to: Point::new(offset, AREA.y1),
            style: if vertical { axis_style } else { line_style },
        });
        let horizontal = (offset - ORIGIN.y).abs() < f64::EPSILON;
        scene.push_shape(SceneShape::Segment {
            from: Point::new(AREA.x0, offset),
            to: Point::new(AREA.x1, offset),
            style: if horizontal { axis_style } else { line_style },
        });
    }

    scene.push_element(
        InteractiveElement::new(
            "grid-point",
            ElementKind::GridPoint {
                origin: ORIGIN,
                unit: UNIT,
                extent: ((AREA.x1 - ORIGIN.x) / UNIT) as i64,
                target: config.target,
            },
            ORIGIN,
        )
        .with_radius(14.0)
        .with_style(marker_style()),
    );

    scene.set_readout("coords", COORDS_READOUT, coord_text(ORIGIN, UNIT, ORIGIN));

    scene
}
