//! Slope scanner: an element constrained to the parabola y = x² with a
//! live tangent line and slope readout.

use kurbo::Point;

use super::palette;
use crate::config::WidgetConfig;
use crate::scene::{ElementKind, InteractiveElement, Scene, SceneShape, ShapeStyle, WidgetKind};

/// Screen position of math (0, 0).
pub const ORIGIN: Point = Point::new(500.0, 950.0);
/// Pixels per math unit.
pub const SCALE: f64 = 100.0;
pub const MIN_X: f64 = -3.0;
pub const MAX_X: f64 = 3.0;

/// Half-span of the tangent segment in screen x.
pub const TANGENT_HALF_SPAN: f64 = 100.0;

/// Where the slope readout sits.
pub const SLOPE_READOUT: Point = Point::new(140.0, 70.0);

/// Screen position on the curve for a math x.
pub fn screen_from_math(x: f64) -> Point {
    Point::new(ORIGIN.x + x * SCALE, ORIGIN.y - x * x * SCALE)
}

/// Math x for a screen x, clamped to the curve's domain.
pub fn math_x_from_screen(screen_x: f64) -> f64 {
    ((screen_x - ORIGIN.x) / SCALE).clamp(MIN_X, MAX_X)
}

/// Derivative of y = x².
pub fn slope_at(x: f64) -> f64 {
    2.0 * x
}

/// Dashed tangent segment spanning ±100 px in screen x around the contact
/// point. Screen y runs opposite to math y, so the segment falls by
/// `slope` pixels per pixel to the right.
pub fn tangent_shapes(contact: Point, slope: f64) -> Vec<SceneShape> {
    vec![SceneShape::Segment {
        from: Point::new(
            contact.x - TANGENT_HALF_SPAN,
            contact.y + TANGENT_HALF_SPAN * slope,
        ),
        to: Point::new(
            contact.x + TANGENT_HALF_SPAN,
            contact.y - TANGENT_HALF_SPAN * slope,
        ),
        style: ShapeStyle::stroke(palette::ACCENT, 2.0).dashed(),
    }]
}

pub fn slope_readout(slope: f64) -> String {
    format!("slope = {slope:.2}")
}

pub fn build(_config: &WidgetConfig) -> Scene {
    let mut scene = Scene::new(WidgetKind::SlopeScanner);

    let axis_style = ShapeStyle::stroke(palette::AXIS, 2.0);
    scene.push_shape(SceneShape::Segment {
        from: Point::new(150.0, ORIGIN.y),
        to: Point::new(850.0, ORIGIN.y),
        style: axis_style,
    });
    scene.push_shape(SceneShape::Segment {
        from: Point::new(ORIGIN.x, 30.0),
        to: Point::new(ORIGIN.x, 970.0),
        style: axis_style,
    });

    // Parabola sampled finely enough to read as a curve.
    let samples = 120;
    let points = (0..=samples)
        .map(|i| {
            let x = MIN_X + (MAX_X - MIN_X) * i as f64 / samples as f64;
            screen_from_math(x)
        })
        .collect();
    scene.push_shape(SceneShape::Polyline {
        points,
        style: ShapeStyle::stroke(palette::INK, 2.5),
    });

    let start_x = 1.0;
    let start = screen_from_math(start_x);
    scene.push_element(
        InteractiveElement::new(
            "scanner",
            ElementKind::CurveFollower {
                origin: ORIGIN,
                scale: SCALE,
                min_x: MIN_X,
                max_x: MAX_X,
            },
            start,
        )
        .with_radius(14.0)
        .with_style(ShapeStyle::filled(palette::WARM, palette::INK, 2.0)),
    );

    scene.set_overlay("tangent", tangent_shapes(start, slope_at(start_x)));
    scene.set_readout("slope", SLOPE_READOUT, slope_readout(slope_at(start_x)));

    scene
}
