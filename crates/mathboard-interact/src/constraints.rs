//! Constraint strategies: the geometric rules that turn free pointer
//! coordinates into a valid element configuration, dispatched on the
//! element's kind tag.
//!
//! `apply_move` runs on every pointer move and keeps the scene's live
//! feedback (overlays, readouts) in sync; `finalize` runs once on release
//! and settles the element (zone snap, grid snap, home reset).

use kurbo::Point;

use mathboard_core::widgets::{balance, circle, grid, riemann, slope};
use mathboard_core::{ElementId, ElementKind, Scene, WidgetKind, ZoneKind};

/// A settled interaction result, reported to the lesson-progression layer
/// through the session's outcome callback.
#[derive(Debug, Clone, PartialEq)]
pub enum InteractionOutcome {
    /// A weight landed on (or left) a plate; `balanced` means the plate
    /// totals are equal.
    BalanceChanged {
        left: f64,
        right: f64,
        balanced: bool,
    },
    /// The grid marker snapped to an intersection.
    GridSnapped { coord: (i64, i64), hit_target: bool },
    /// The Riemann slider settled on a new rectangle count.
    SliderChanged { n: u32 },
    /// A token was dropped outside every zone and returned home.
    TokenReturned { element: ElementId },
    /// A token entered the machine input slot.
    MachineAccepted { input: f64 },
    /// The machine processing sequence finished.
    MachineCompleted { input: f64, output: f64 },
}

/// Request to run the function-machine processing sequence, handed from
/// `finalize` to the animator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MachineStart {
    pub element: ElementId,
    pub from: Point,
    pub input: f64,
}

/// What a release produced: outcomes to report, plus an optional machine
/// sequence for the animator to run.
#[derive(Debug, Default, PartialEq)]
pub struct FinalizeResult {
    pub outcomes: Vec<InteractionOutcome>,
    pub machine_start: Option<MachineStart>,
}

/// Move `id` toward `target`, constrained by its kind. Live overlays and
/// readouts follow the element; outcomes are only produced by strategies
/// with discrete mid-drag state changes (the slider).
pub fn apply_move(scene: &mut Scene, id: ElementId, target: Point) -> Vec<InteractionOutcome> {
    let Some(element) = scene.element(id) else {
        return Vec::new();
    };
    let kind = element.kind.clone();
    match kind {
        ElementKind::Token { .. } => {
            let element = scene.element_mut(id).unwrap();
            element.position = target;
            // Lifting a placed token takes it off its plate immediately.
            element.placed_in = None;
            Vec::new()
        }
        ElementKind::GridPoint { origin, unit, .. } => {
            scene.element_mut(id).unwrap().position = target;
            scene.update_readout("coords", grid::coord_text(origin, unit, target));
            Vec::new()
        }
        ElementKind::CircleHandle {
            center,
            radius,
            show_sine,
            show_cosine,
        } => {
            let angle = (target.y - center.y).atan2(target.x - center.x);
            let position = Point::new(
                center.x + radius * angle.cos(),
                center.y + radius * angle.sin(),
            );
            scene.element_mut(id).unwrap().position = position;
            scene.set_overlay(
                "projection",
                circle::projection_shapes(center, position, show_sine, show_cosine),
            );
            scene.update_readout("sine", circle::sine_readout(angle));
            Vec::new()
        }
        ElementKind::CurveFollower {
            origin,
            scale,
            min_x,
            max_x,
        } => {
            let x = ((target.x - origin.x) / scale).clamp(min_x, max_x);
            let position = Point::new(origin.x + x * scale, origin.y - x * x * scale);
            let slope = slope::slope_at(x);
            scene.element_mut(id).unwrap().position = position;
            scene.set_overlay("tangent", slope::tangent_shapes(position, slope));
            scene.update_readout("slope", slope::slope_readout(slope));
            Vec::new()
        }
        ElementKind::Slider {
            track_y,
            min_px,
            max_px,
            min_n,
            max_n,
        } => {
            let x = target.x.clamp(min_px, max_px);
            let t = (x - min_px) / (max_px - min_px);
            let n = (min_n as f64 + t * (max_n - min_n) as f64).round() as u32;
            let element = scene.element_mut(id).unwrap();
            element.position = Point::new(x, track_y);
            let previous = element.payload as u32;
            if n == previous {
                // Same count: the thumb tracks the pointer but nothing is
                // redrawn or reported.
                return Vec::new();
            }
            element.payload = n as f64;
            scene.set_overlay("rectangles", riemann::rectangles(n));
            scene.update_readout("n", riemann::n_text(n));
            scene.update_readout("area", riemann::area_text(n));
            vec![InteractionOutcome::SliderChanged { n }]
        }
    }
}

/// Settle `id` after release. Tokens snap into the first matching zone in
/// registration order, or fly home; the grid marker snaps to the nearest
/// intersection. The other kinds already sit in a valid position.
pub fn finalize(scene: &mut Scene, id: ElementId) -> FinalizeResult {
    let Some(element) = scene.element(id) else {
        return FinalizeResult::default();
    };
    let kind = element.kind.clone();
    let mut result = FinalizeResult::default();

    match kind {
        ElementKind::Token { home } => {
            let position = scene.element(id).unwrap().position;
            if let Some(zone) = scene.zone_at(position).copied() {
                let element = scene.element_mut(id).unwrap();
                element.position = zone.anchor;
                element.placed_in = Some(zone.kind);
                match zone.kind {
                    ZoneKind::PlateLeft | ZoneKind::PlateRight => {
                        let (left, right) = balance::refresh(scene);
                        result.outcomes.push(InteractionOutcome::BalanceChanged {
                            left,
                            right,
                            balanced: (left - right).abs() < f64::EPSILON,
                        });
                    }
                    ZoneKind::MachineInput => {
                        let input = scene.element(id).unwrap().payload;
                        result
                            .outcomes
                            .push(InteractionOutcome::MachineAccepted { input });
                        result.machine_start = Some(MachineStart {
                            element: id,
                            from: zone.anchor,
                            input,
                        });
                    }
                }
            } else {
                let element = scene.element_mut(id).unwrap();
                element.position = home;
                element.placed_in = None;
                if scene.kind == Some(WidgetKind::BalanceScale) {
                    // The token may have been lifted off a plate, so the
                    // tally can change on a miss too.
                    let (left, right) = balance::refresh(scene);
                    result.outcomes.push(InteractionOutcome::BalanceChanged {
                        left,
                        right,
                        balanced: (left - right).abs() < f64::EPSILON,
                    });
                }
                result
                    .outcomes
                    .push(InteractionOutcome::TokenReturned { element: id });
            }
        }
        ElementKind::GridPoint {
            origin,
            unit,
            extent,
            target,
        } => {
            let position = scene.element(id).unwrap().position;
            // Nearest intersection, kept inside the drawn grid area.
            let gx = ((position.x - origin.x) / unit).round() as i64;
            let gy = ((position.y - origin.y) / unit).round() as i64;
            let coord = (gx.clamp(-extent, extent), (-gy).clamp(-extent, extent));
            let hit_target = target == Some(coord);
            let element = scene.element_mut(id).unwrap();
            element.position = grid::screen_from_math(origin, unit, coord.0, coord.1);
            element.style = if hit_target {
                grid::success_style()
            } else {
                grid::marker_style()
            };
            scene.update_readout("coords", grid::snapped_text(coord.0, coord.1));
            result
                .outcomes
                .push(InteractionOutcome::GridSnapped { coord, hit_target });
        }
        // Handle, follower and slider stay wherever the last move left
        // them; every mid-drag position is already valid.
        ElementKind::CircleHandle { .. }
        | ElementKind::CurveFollower { .. }
        | ElementKind::Slider { .. } => {}
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use mathboard_core::{WidgetConfig, widgets};

    fn config_with_inputs(inputs: &[f64]) -> WidgetConfig {
        WidgetConfig {
            inputs: inputs.to_vec(),
            ..WidgetConfig::default()
        }
    }

    #[test]
    fn test_circle_handle_stays_on_radius() {
        let mut scene = widgets::build(WidgetKind::UnitCircle, &WidgetConfig::default());
        let id = scene.element_by_name("circle-handle").unwrap().id;
        for target in [
            Point::new(900.0, 100.0),
            Point::new(500.0, 501.0),
            Point::new(0.0, 0.0),
        ] {
            apply_move(&mut scene, id, target);
            let p = scene.element(id).unwrap().position;
            let dist = ((p.x - circle::CENTER.x).powi(2) + (p.y - circle::CENTER.y).powi(2)).sqrt();
            assert!((dist - circle::RADIUS).abs() < 1e-9);
        }
    }

    #[test]
    fn test_curve_follower_clamps_to_domain() {
        let mut scene = widgets::build(WidgetKind::SlopeScanner, &WidgetConfig::default());
        let id = scene.element_by_name("scanner").unwrap().id;
        apply_move(&mut scene, id, Point::new(5000.0, 0.0));
        let p = scene.element(id).unwrap().position;
        assert!((p.x - slope::screen_from_math(slope::MAX_X).x).abs() < 1e-9);
        assert!((p.y - slope::screen_from_math(slope::MAX_X).y).abs() < 1e-9);
        // Slope readout follows: f'(3) = 6.
        assert_eq!(
            scene.readout("slope"),
            Some(slope::slope_readout(6.0).as_str())
        );
    }

    #[test]
    fn test_grid_marker_snaps_to_intersections() {
        let mut scene = widgets::build(WidgetKind::CoordinateGrid, &WidgetConfig::default());
        let id = scene.element_by_name("grid-point").unwrap().id;
        apply_move(&mut scene, id, Point::new(563.0, 441.0));
        let result = finalize(&mut scene, id);
        let p = scene.element(id).unwrap().position;
        assert!((p.x - 550.0).abs() < 1e-9);
        assert!((p.y - 450.0).abs() < 1e-9);
        assert_eq!(
            result.outcomes,
            vec![InteractionOutcome::GridSnapped {
                coord: (1, 1),
                hit_target: false,
            }]
        );
    }

    #[test]
    fn test_grid_marker_clamps_to_grid_area() {
        let mut scene = widgets::build(WidgetKind::CoordinateGrid, &WidgetConfig::default());
        let id = scene.element_by_name("grid-point").unwrap().id;
        // Release near the frame corner, past the drawn 800x800 area.
        apply_move(&mut scene, id, Point::new(995.0, 2.0));
        let result = finalize(&mut scene, id);
        assert_eq!(
            result.outcomes,
            vec![InteractionOutcome::GridSnapped {
                coord: (8, 8),
                hit_target: false,
            }]
        );
        let p = scene.element(id).unwrap().position;
        assert!((p.x - 900.0).abs() < 1e-9);
        assert!((p.y - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_grid_marker_recolors_on_target() {
        let config = WidgetConfig {
            target: Some((2, -1)),
            ..WidgetConfig::default()
        };
        let mut scene = widgets::build(WidgetKind::CoordinateGrid, &config);
        let id = scene.element_by_name("grid-point").unwrap().id;
        apply_move(&mut scene, id, Point::new(598.0, 552.0));
        let result = finalize(&mut scene, id);
        assert_eq!(
            result.outcomes,
            vec![InteractionOutcome::GridSnapped {
                coord: (2, -1),
                hit_target: true,
            }]
        );
        let style = scene.element(id).unwrap().style;
        assert_eq!(style.stroke_color, grid::success_style().stroke_color);
    }

    #[test]
    fn test_slider_reports_only_on_count_change() {
        let mut scene = widgets::build(WidgetKind::RiemannSum, &WidgetConfig::default());
        let id = scene.element_by_name("slider").unwrap().id;
        let start_n = scene.element(id).unwrap().payload as u32;

        // A one-pixel nudge keeps the same count.
        let x = scene.element(id).unwrap().position.x;
        let outcomes = apply_move(&mut scene, id, Point::new(x + 1.0, 0.0));
        assert!(outcomes.is_empty());

        // The right end of the track is the maximum count.
        let outcomes = apply_move(&mut scene, id, Point::new(riemann::MAX_PX + 50.0, 0.0));
        assert_eq!(
            outcomes,
            vec![InteractionOutcome::SliderChanged { n: riemann::MAX_N }]
        );
        assert_ne!(start_n, riemann::MAX_N);
        assert_eq!(
            scene.overlay("rectangles").unwrap().len(),
            riemann::MAX_N as usize
        );
    }

    #[test]
    fn test_token_snaps_to_plate_and_reports_tally() {
        let mut scene = widgets::build(WidgetKind::BalanceScale, &config_with_inputs(&[3.0]));
        let id = scene.element_by_name("weight-0").unwrap().id;
        apply_move(&mut scene, id, Point::new(250.0, 450.0));
        let result = finalize(&mut scene, id);
        assert_eq!(
            result.outcomes,
            vec![InteractionOutcome::BalanceChanged {
                left: 3.0,
                right: 0.0,
                balanced: false,
            }]
        );
        let element = scene.element(id).unwrap();
        assert_eq!(element.placed_in, Some(ZoneKind::PlateLeft));
        assert!((scene.beam_degrees - (-balance::TIP_DEGREES)).abs() < f64::EPSILON);
    }

    #[test]
    fn test_token_returns_home_outside_zones() {
        let mut scene = widgets::build(WidgetKind::BalanceScale, &config_with_inputs(&[5.0]));
        let id = scene.element_by_name("weight-0").unwrap().id;
        let home = scene.element(id).unwrap().position;
        apply_move(&mut scene, id, Point::new(500.0, 700.0));
        let result = finalize(&mut scene, id);
        assert!(
            result
                .outcomes
                .contains(&InteractionOutcome::TokenReturned { element: id })
        );
        let p = scene.element(id).unwrap().position;
        assert!((p.x - home.x).abs() < 1e-9 && (p.y - home.y).abs() < 1e-9);
    }

    #[test]
    fn test_lifting_placed_weight_changes_tally() {
        let config = WidgetConfig {
            left_weight: Some(4.0),
            ..WidgetConfig::default()
        };
        let mut scene = widgets::build(WidgetKind::BalanceScale, &config);
        let id = scene.element_by_name("left-weight").unwrap().id;
        apply_move(&mut scene, id, Point::new(500.0, 880.0));
        let result = finalize(&mut scene, id);
        assert!(result.outcomes.contains(&InteractionOutcome::BalanceChanged {
            left: 0.0,
            right: 0.0,
            balanced: true,
        }));
        assert!(scene.beam_degrees.abs() < f64::EPSILON);
    }

    #[test]
    fn test_machine_drop_requests_sequence() {
        let config = WidgetConfig {
            rule: Some("+2".into()),
            inputs: vec![3.0],
            ..WidgetConfig::default()
        };
        let mut scene = widgets::build(WidgetKind::FunctionMachine, &config);
        let id = scene.element_by_name("input-0").unwrap().id;
        apply_move(&mut scene, id, Point::new(200.0, 500.0));
        let result = finalize(&mut scene, id);
        assert_eq!(
            result.outcomes,
            vec![InteractionOutcome::MachineAccepted { input: 3.0 }]
        );
        let start = result.machine_start.unwrap();
        assert_eq!(start.element, id);
        assert!((start.input - 3.0).abs() < f64::EPSILON);
    }
}
