//! Unit circle: a handle constrained to the circle boundary with optional
//! sine/cosine projection segments.

use kurbo::Point;

use super::palette;
use crate::config::WidgetConfig;
use crate::scene::{ElementKind, InteractiveElement, Scene, SceneShape, ShapeStyle, WidgetKind};

pub const CENTER: Point = Point::new(500.0, 500.0);
pub const RADIUS: f64 = 200.0;

/// Where the sine readout sits.
pub const SINE_READOUT: Point = Point::new(500.0, 120.0);

/// Math-convention sine for a screen-space angle (screen Y grows downward).
pub fn math_sine(screen_angle: f64) -> f64 {
    -screen_angle.sin()
}

/// Position on the circle for a screen-space angle.
pub fn point_at(screen_angle: f64) -> Point {
    Point::new(
        CENTER.x + RADIUS * screen_angle.cos(),
        CENTER.y + RADIUS * screen_angle.sin(),
    )
}

/// Projection segments for a handle position: sine is the vertical drop to
/// the horizontal axis, cosine the horizontal run along the axis.
pub fn projection_shapes(
    center: Point,
    position: Point,
    show_sine: bool,
    show_cosine: bool,
) -> Vec<SceneShape> {
    let mut shapes = Vec::new();
    if show_sine {
        shapes.push(SceneShape::Segment {
            from: position,
            to: Point::new(position.x, center.y),
            style: ShapeStyle::stroke(palette::SUCCESS, 3.0).dashed(),
        });
    }
    if show_cosine {
        shapes.push(SceneShape::Segment {
            from: center,
            to: Point::new(position.x, center.y),
            style: ShapeStyle::stroke(palette::WARM, 3.0).dashed(),
        });
    }
    shapes
}

pub fn sine_readout(screen_angle: f64) -> String {
    format!("sin \u{3b8} = {:.2}", math_sine(screen_angle))
}

pub fn build(config: &WidgetConfig) -> Scene {
    let mut scene = Scene::new(WidgetKind::UnitCircle);

    let axis_style = ShapeStyle::stroke(palette::AXIS, 2.0);
    scene.push_shape(SceneShape::Segment {
        from: Point::new(120.0, CENTER.y),
        to: Point::new(880.0, CENTER.y),
        style: axis_style,
    });
    scene.push_shape(SceneShape::Segment {
        from: Point::new(CENTER.x, 120.0),
        to: Point::new(CENTER.x, 880.0),
        style: axis_style,
    });
    scene.push_shape(SceneShape::Circle {
        center: CENTER,
        radius: RADIUS,
        style: ShapeStyle::stroke(palette::INK, 2.5),
    });

    // Handle starts at angle 0 (positive x axis).
    let start = point_at(0.0);
    scene.push_element(
        InteractiveElement::new(
            "circle-handle",
            ElementKind::CircleHandle {
                center: CENTER,
                radius: RADIUS,
                show_sine: config.show_sine,
                show_cosine: config.show_cosine,
            },
            start,
        )
        .with_radius(14.0)
        .with_style(ShapeStyle::filled(palette::ACCENT, palette::INK, 2.0)),
    );

    scene.set_overlay(
        "projection",
        projection_shapes(CENTER, start, config.show_sine, config.show_cosine),
    );
    scene.set_readout("sine", SINE_READOUT, sine_readout(0.0));

    scene
}
