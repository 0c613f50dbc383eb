//! Time-based tweening: easing curves, the animator, and the staged
//! function-machine processing sequence.
//!
//! The animator is driven by an explicit clock. Hosts call `tick` with
//! the current `Instant` on every frame; nothing here spawns threads or
//! owns a timer.

use std::time::{Duration, Instant};

use kurbo::Point;
use log::debug;

use mathboard_core::widgets::balance;
use mathboard_core::widgets::machine::{self, MachineRule};
use mathboard_core::{ElementId, Scene};

use crate::constraints::MachineStart;

/// Duration of each stage of the machine sequence (fly in, transform,
/// fly out).
pub const STAGE: Duration = Duration::from_millis(500);

pub fn ease_out_cubic(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

pub fn ease_in_out_quad(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    Linear,
    #[default]
    OutCubic,
    InOutQuad,
}

impl Easing {
    pub fn apply(self, t: f64) -> f64 {
        match self {
            Easing::Linear => t.clamp(0.0, 1.0),
            Easing::OutCubic => ease_out_cubic(t),
            Easing::InOutQuad => ease_in_out_quad(t),
        }
    }
}

/// Identifier of one animator run, used to cancel it while in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnimationId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MachineStage {
    ToMachine,
    Transform,
    ToOutput,
}

#[derive(Debug)]
enum RunKind {
    /// Move an element between two points, then stop.
    Move {
        element: ElementId,
        from: Point,
        to: Point,
    },
    /// Sweep the balance beam between two angles, in degrees.
    Beam { from: f64, to: f64 },
    /// The three-stage machine sequence for one token.
    Machine {
        element: ElementId,
        stage: MachineStage,
        from: Point,
        to: Point,
        input: f64,
        rule: Option<MachineRule>,
    },
}

#[derive(Debug)]
struct Run {
    id: AnimationId,
    kind: RunKind,
    started: Instant,
    duration: Duration,
    easing: Easing,
}

/// What a tick produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnimEvent {
    Finished(AnimationId),
    MachineCompleted {
        element: ElementId,
        input: f64,
        output: f64,
    },
}

#[derive(Debug, Default)]
pub struct Animator {
    runs: Vec<Run>,
    next_id: u64,
}

impl Animator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_idle(&self) -> bool {
        self.runs.is_empty()
    }

    fn allocate(&mut self) -> AnimationId {
        self.next_id += 1;
        AnimationId(self.next_id)
    }

    /// Tween an element's position. A run already targeting the same
    /// element is cancelled first, so runs never fight over a position.
    pub fn start_move(
        &mut self,
        element: ElementId,
        from: Point,
        to: Point,
        duration: Duration,
        easing: Easing,
        now: Instant,
    ) -> AnimationId {
        self.cancel_element(element);
        let id = self.allocate();
        self.runs.push(Run {
            id,
            kind: RunKind::Move { element, from, to },
            started: now,
            duration,
            easing,
        });
        id
    }

    /// Sweep the beam from its current angle. Only one beam sweep runs at
    /// a time; a new one replaces any in flight.
    pub fn start_beam_sweep(
        &mut self,
        from_degrees: f64,
        to_degrees: f64,
        duration: Duration,
        easing: Easing,
        now: Instant,
    ) -> AnimationId {
        self.runs.retain(|run| !matches!(run.kind, RunKind::Beam { .. }));
        let id = self.allocate();
        self.runs.push(Run {
            id,
            kind: RunKind::Beam {
                from: from_degrees,
                to: to_degrees,
            },
            started: now,
            duration,
            easing,
        });
        id
    }

    /// Run the machine processing sequence for a token dropped in the
    /// input slot.
    pub fn start_machine(
        &mut self,
        start: MachineStart,
        rule: Option<MachineRule>,
        now: Instant,
    ) -> AnimationId {
        self.cancel_element(start.element);
        debug!("machine sequence started for input {}", start.input);
        let id = self.allocate();
        self.runs.push(Run {
            id,
            kind: RunKind::Machine {
                element: start.element,
                stage: MachineStage::ToMachine,
                from: start.from,
                to: machine::MACHINE_CENTER,
                input: start.input,
                rule,
            },
            started: now,
            duration: STAGE,
            easing: Easing::OutCubic,
        });
        id
    }

    pub fn cancel(&mut self, id: AnimationId) {
        self.runs.retain(|run| run.id != id);
    }

    /// Cancel any run touching `element`. Starting a new run on an element
    /// does this implicitly.
    pub fn cancel_element(&mut self, element: ElementId) {
        self.runs.retain(|run| match run.kind {
            RunKind::Move { element: e, .. } | RunKind::Machine { element: e, .. } => e != element,
            RunKind::Beam { .. } => true,
        });
    }

    /// Advance every run to `now`, writing interpolated state into the
    /// scene. Stage boundaries are caught up within a single tick, so a
    /// coarse clock still completes sequences in order.
    pub fn tick(&mut self, now: Instant, scene: &mut Scene) -> Vec<AnimEvent> {
        let mut events = Vec::new();
        let mut index = 0;
        while index < self.runs.len() {
            let run = &mut self.runs[index];
            let elapsed = now.saturating_duration_since(run.started);
            let t = if run.duration.is_zero() {
                1.0
            } else {
                (elapsed.as_secs_f64() / run.duration.as_secs_f64()).min(1.0)
            };
            let eased = run.easing.apply(t);

            match &run.kind {
                RunKind::Move { element, from, to } | RunKind::Machine {
                    element, from, to, ..
                } => {
                    if let Some(el) = scene.element_mut(*element) {
                        el.position = from.lerp(*to, eased);
                    }
                }
                RunKind::Beam { from, to } => {
                    let degrees = from + (to - from) * eased;
                    scene.beam_degrees = degrees;
                    let shapes = balance::beam_shapes(degrees);
                    scene.set_overlay("beam", shapes);
                }
            }

            if t < 1.0 {
                index += 1;
                continue;
            }

            // The run reached its end; complete it or advance its stage.
            // The next stage starts at the previous boundary, not at `now`,
            // so a late tick does not stretch the sequence.
            match &mut run.kind {
                RunKind::Move { .. } | RunKind::Beam { .. } => {
                    events.push(AnimEvent::Finished(run.id));
                    self.runs.remove(index);
                }
                RunKind::Machine {
                    element,
                    stage,
                    from,
                    to,
                    input,
                    rule,
                } => match *stage {
                    MachineStage::ToMachine => {
                        // Apply the rule while the token sits inside the body.
                        let output = rule.map_or(*input, |r| r.apply(*input));
                        if let Some(el) = scene.element_mut(*element) {
                            el.payload = output;
                            el.label = Some(machine::format_value(output));
                        }
                        *stage = MachineStage::Transform;
                        *from = *to;
                        run.started += run.duration;
                    }
                    MachineStage::Transform => {
                        *stage = MachineStage::ToOutput;
                        *from = machine::MACHINE_CENTER;
                        *to = machine::OUTPUT_ANCHOR;
                        run.started += run.duration;
                    }
                    MachineStage::ToOutput => {
                        let event = AnimEvent::MachineCompleted {
                            element: *element,
                            input: *input,
                            output: scene.element(*element).map_or(*input, |el| el.payload),
                        };
                        if let Some(el) = scene.element_mut(*element) {
                            el.placed_in = None;
                        }
                        debug!("machine sequence finished");
                        events.push(event);
                        self.runs.remove(index);
                    }
                },
            }
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mathboard_core::{WidgetConfig, WidgetKind, widgets};

    #[test]
    fn test_easing_endpoints() {
        for easing in [Easing::Linear, Easing::OutCubic, Easing::InOutQuad] {
            assert!(easing.apply(0.0).abs() < 1e-12);
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-12);
            // Out of range input is clamped.
            assert!((easing.apply(2.0) - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_ease_out_cubic_midpoint() {
        assert!((ease_out_cubic(0.5) - 0.875).abs() < 1e-12);
    }

    #[test]
    fn test_move_finishes_once() {
        let mut scene = widgets::build(WidgetKind::CoordinateGrid, &WidgetConfig::default());
        let id = scene.element_by_name("grid-point").unwrap().id;
        let mut animator = Animator::new();
        let t0 = Instant::now();
        let run = animator.start_move(
            id,
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            Duration::from_millis(100),
            Easing::Linear,
            t0,
        );

        let events = animator.tick(t0 + Duration::from_millis(50), &mut scene);
        assert!(events.is_empty());
        let mid = scene.element(id).unwrap().position;
        assert!((mid.x - 50.0).abs() < 1e-9);

        let events = animator.tick(t0 + Duration::from_millis(150), &mut scene);
        assert_eq!(events, vec![AnimEvent::Finished(run)]);
        assert!(animator.is_idle());
        let end = scene.element(id).unwrap().position;
        assert!((end.x - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_new_run_cancels_previous_on_same_element() {
        let mut scene = widgets::build(WidgetKind::CoordinateGrid, &WidgetConfig::default());
        let id = scene.element_by_name("grid-point").unwrap().id;
        let mut animator = Animator::new();
        let t0 = Instant::now();
        let first = animator.start_move(
            id,
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            Duration::from_millis(100),
            Easing::Linear,
            t0,
        );
        let second = animator.start_move(
            id,
            Point::new(0.0, 0.0),
            Point::new(0.0, 100.0),
            Duration::from_millis(100),
            Easing::Linear,
            t0,
        );
        assert_ne!(first, second);
        let events = animator.tick(t0 + Duration::from_millis(200), &mut scene);
        // Only the replacement finishes.
        assert_eq!(events, vec![AnimEvent::Finished(second)]);
    }

    #[test]
    fn test_beam_sweep_writes_degrees() {
        let mut scene = widgets::build(WidgetKind::BalanceScale, &WidgetConfig::default());
        let mut animator = Animator::new();
        let t0 = Instant::now();
        animator.start_beam_sweep(
            0.0,
            20.0,
            Duration::from_millis(100),
            Easing::Linear,
            t0,
        );
        animator.tick(t0 + Duration::from_millis(50), &mut scene);
        assert!((scene.beam_degrees - 10.0).abs() < 1e-9);
        animator.tick(t0 + Duration::from_millis(100), &mut scene);
        assert!((scene.beam_degrees - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_machine_sequence_transforms_payload() {
        let config = WidgetConfig {
            rule: Some("* 3".into()),
            inputs: vec![4.0],
            ..WidgetConfig::default()
        };
        let mut scene = widgets::build(WidgetKind::FunctionMachine, &config);
        let id = scene.element_by_name("input-0").unwrap().id;
        let mut animator = Animator::new();
        let t0 = Instant::now();
        animator.start_machine(
            MachineStart {
                element: id,
                from: Point::new(200.0, 500.0),
                input: 4.0,
            },
            MachineRule::parse("* 3"),
            t0,
        );

        // Mid fly-in: payload untouched.
        animator.tick(t0 + Duration::from_millis(250), &mut scene);
        assert!((scene.element(id).unwrap().payload - 4.0).abs() < f64::EPSILON);

        // After the first stage the rule has been applied.
        animator.tick(t0 + Duration::from_millis(600), &mut scene);
        let element = scene.element(id).unwrap();
        assert!((element.payload - 12.0).abs() < f64::EPSILON);
        assert_eq!(element.label.as_deref(), Some("12"));

        // A single late tick catches up through the remaining stages.
        let events = animator.tick(t0 + Duration::from_millis(1600), &mut scene);
        assert_eq!(
            events,
            vec![AnimEvent::MachineCompleted {
                element: id,
                input: 4.0,
                output: 12.0,
            }]
        );
        let p = scene.element(id).unwrap().position;
        assert!((p.x - machine::OUTPUT_ANCHOR.x).abs() < 1e-9);
        assert!(animator.is_idle());
    }

    #[test]
    fn test_missing_rule_passes_value_through() {
        let config = WidgetConfig {
            inputs: vec![7.0],
            ..WidgetConfig::default()
        };
        let mut scene = widgets::build(WidgetKind::FunctionMachine, &config);
        let id = scene.element_by_name("input-0").unwrap().id;
        let mut animator = Animator::new();
        let t0 = Instant::now();
        animator.start_machine(
            MachineStart {
                element: id,
                from: Point::new(200.0, 500.0),
                input: 7.0,
            },
            None,
            t0,
        );
        let events = animator.tick(t0 + Duration::from_millis(1600), &mut scene);
        assert_eq!(
            events,
            vec![AnimEvent::MachineCompleted {
                element: id,
                input: 7.0,
                output: 7.0,
            }]
        );
    }
}
