//! Function machine: input box, rule body and output box joined by pipes.

use kurbo::{Point, Rect};
use log::warn;

use super::palette;
use crate::config::WidgetConfig;
use crate::scene::{
    DropZone, ElementKind, InteractiveElement, Scene, SceneColor, SceneShape, ShapeStyle,
    WidgetKind, ZoneKind,
};

const INPUT_BOX: Rect = Rect::new(120.0, 420.0, 280.0, 580.0);
const BODY: Rect = Rect::new(400.0, 380.0, 700.0, 620.0);
const OUTPUT_BOX: Rect = Rect::new(780.0, 420.0, 940.0, 580.0);

/// Where a token pauses while the rule is applied.
pub const MACHINE_CENTER: Point = Point::new(550.0, 500.0);
/// Where a processed token comes to rest.
pub const OUTPUT_ANCHOR: Point = Point::new(860.0, 500.0);

const INPUT_ANCHOR: Point = Point::new(200.0, 500.0);

const BANK_Y: f64 = 840.0;
const BANK_X0: f64 = 160.0;
const BANK_STEP: f64 = 110.0;
const TOKEN_RADIUS: f64 = 32.0;

/// A parsed machine rule. Only the `+ N` and `* N` forms exist.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MachineRule {
    Add(f64),
    Mul(f64),
}

impl MachineRule {
    /// Parse a rule string. Accepts `+ 2`, `* 3` and the compact `+2` form.
    /// Malformed rules yield None; the value then passes through unchanged.
    pub fn parse(text: &str) -> Option<Self> {
        let trimmed = text.trim();
        let (op, rest) = match trimmed.split_once(char::is_whitespace) {
            Some((op, rest)) => (op, rest.trim()),
            None if trimmed.len() > 1 => trimmed.split_at(1),
            _ => {
                warn!("unrecognized machine rule {text:?}; value passes through unchanged");
                return None;
            }
        };
        let operand: f64 = match rest.parse() {
            Ok(n) => n,
            Err(_) => {
                warn!("unrecognized machine rule {text:?}; value passes through unchanged");
                return None;
            }
        };
        match op {
            "+" => Some(MachineRule::Add(operand)),
            "*" => Some(MachineRule::Mul(operand)),
            _ => {
                warn!("unrecognized machine rule {text:?}; value passes through unchanged");
                None
            }
        }
    }

    pub fn apply(self, value: f64) -> f64 {
        match self {
            MachineRule::Add(n) => value + n,
            MachineRule::Mul(n) => value * n,
        }
    }
}

pub fn build(config: &WidgetConfig) -> Scene {
    let mut scene = Scene::new(WidgetKind::FunctionMachine);

    let box_style = ShapeStyle::stroke(palette::INK, 3.0);
    let body_style = ShapeStyle::filled(SceneColor::new(52, 120, 246, 25), palette::ACCENT, 3.0);
    let pipe_style = ShapeStyle::stroke(palette::AXIS, 6.0);

    scene.push_shape(SceneShape::Rect {
        rect: INPUT_BOX,
        style: box_style,
    });
    scene.push_shape(SceneShape::Rect {
        rect: BODY,
        style: body_style,
    });
    scene.push_shape(SceneShape::Rect {
        rect: OUTPUT_BOX,
        style: box_style,
    });
    scene.push_shape(SceneShape::Segment {
        from: Point::new(INPUT_BOX.x1, 500.0),
        to: Point::new(BODY.x0, 500.0),
        style: pipe_style,
    });
    scene.push_shape(SceneShape::Segment {
        from: Point::new(BODY.x1, 500.0),
        to: Point::new(OUTPUT_BOX.x0, 500.0),
        style: pipe_style,
    });
    scene.push_shape(SceneShape::Label {
        position: Point::new(INPUT_ANCHOR.x, INPUT_BOX.y0 - 24.0),
        text: "IN".to_string(),
        size: 28.0,
        color: palette::AXIS,
    });
    scene.push_shape(SceneShape::Label {
        position: Point::new(OUTPUT_ANCHOR.x, OUTPUT_BOX.y0 - 24.0),
        text: "OUT".to_string(),
        size: 28.0,
        color: palette::AXIS,
    });

    let rule_text = config.rule.clone().unwrap_or_default();
    scene.set_readout("rule", MACHINE_CENTER, rule_text.clone());
    scene.rule = Some(rule_text);

    // One drop zone over the input box, slightly inflated for forgiveness.
    scene.push_zone(DropZone::new(
        INPUT_BOX.inflate(30.0, 30.0),
        ZoneKind::MachineInput,
        INPUT_ANCHOR,
    ));

    for (i, &value) in config.inputs.iter().enumerate() {
        let home = Point::new(BANK_X0 + i as f64 * BANK_STEP, BANK_Y);
        scene.push_element(
            InteractiveElement::new(format!("input-{i}"), ElementKind::Token { home }, home)
                .with_payload(value)
                .with_radius(TOKEN_RADIUS)
                .with_style(ShapeStyle::filled(palette::ACCENT_FILL, palette::ACCENT, 2.0))
                .with_label(format_value(value)),
        );
    }

    scene
}

pub fn format_value(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{value:.2}")
    }
}
