//! Scene builders, one module per widget kind.
//!
//! Builders are deterministic: the same kind and config always produce the
//! same geometry. All widgets render into the normalized [`FRAME`]×[`FRAME`]
//! coordinate frame.

pub mod balance;
pub mod circle;
pub mod grid;
pub mod machine;
pub mod riemann;
pub mod slope;

use crate::config::WidgetConfig;
use crate::scene::{Scene, WidgetKind};

/// Side length of the normalized square frame all widgets render into.
pub const FRAME: f64 = 1000.0;

/// Shared color palette for the widget family.
pub mod palette {
    use crate::scene::SceneColor;

    pub const INK: SceneColor = SceneColor::rgb(40, 44, 52);
    pub const GRID: SceneColor = SceneColor::rgb(210, 215, 222);
    pub const AXIS: SceneColor = SceneColor::rgb(120, 128, 140);
    pub const ACCENT: SceneColor = SceneColor::rgb(52, 120, 246);
    pub const ACCENT_FILL: SceneColor = SceneColor::new(52, 120, 246, 60);
    pub const SUCCESS: SceneColor = SceneColor::rgb(46, 160, 67);
    pub const WARM: SceneColor = SceneColor::rgb(217, 119, 6);
    pub const ZONE_FILL: SceneColor = SceneColor::new(120, 128, 140, 30);
    pub const HIGHLIGHT: SceneColor = SceneColor::rgb(250, 170, 20);
}

/// Build the scene for a widget kind from its configuration.
pub fn build(kind: WidgetKind, config: &WidgetConfig) -> Scene {
    match kind {
        WidgetKind::BalanceScale => balance::build(config),
        WidgetKind::FunctionMachine => machine::build(config),
        WidgetKind::CoordinateGrid => grid::build(config),
        WidgetKind::UnitCircle => circle::build(config),
        WidgetKind::SlopeScanner => slope::build(config),
        WidgetKind::RiemannSum => riemann::build(config),
    }
}
