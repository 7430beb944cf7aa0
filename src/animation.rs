//! Tick-driven FIFO of gate animations.
//!
//! The host calls [`GateAnimationQueue::advance`] once per display refresh
//! with the current wall-clock time. At most one gate animates at a time; the
//! next queued gate starts on the tick after the previous one reaches `t = 1`.

use std::collections::VecDeque;
use std::f64::consts::PI;
use std::time::Duration;

use nalgebra::{Unit, UnitQuaternion, Vector3};
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::error::BlochError;
use crate::rotation::{pointer, AppliedGate, RotationPath, RotationPlanner};

/// See https://easings.net/#easeInOutSine
pub fn ease_in_out_sine(x: f64) -> f64 {
    -((PI * x).cos() - 1.0) / 2.0
}

/// See https://easings.net/#easeOutSine
pub fn ease_out_sine(x: f64) -> f64 {
    (x * PI / 2.0).sin()
}

/// Visual weight of trail point `index` in a trail of `len` points. The oldest
/// point is the most faded and the newest has weight `1`.
pub fn trail_weight(index: usize, len: usize) -> f64 {
    if len == 0 {
        return 0.0;
    }
    ease_out_sine((index + 1) as f64 / len as f64)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GateId(u64);

impl GateId {
    pub fn value(self) -> u64 {
        self.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrailPoint {
    /// Pointer tip on the unit sphere.
    pub orientation: Vector3<f64>,
    pub created_at_index: usize,
}

#[derive(Clone, Debug, Default)]
pub struct Trail {
    points: Vec<TrailPoint>,
}

impl Trail {
    fn push(&mut self, orientation: Vector3<f64>) {
        let created_at_index = self.points.len();
        self.points.push(TrailPoint {
            orientation,
            created_at_index,
        });
    }

    pub fn points(&self) -> &[TrailPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn weights(&self) -> Vec<f64> {
        (0..self.points.len())
            .map(|i| trail_weight(i, self.points.len()))
            .collect()
    }

    /// Marker scale, `weight + 0.5`.
    pub fn scales(&self) -> Vec<f64> {
        self.weights().into_iter().map(|w| w + 0.5).collect()
    }

    fn clear(&mut self) {
        self.points.clear();
    }
}

/// One sample handed to the renderer.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    pub gate_id: GateId,
    /// Eased progress in `[0, 1]`.
    pub t: f64,
    pub orientation: UnitQuaternion<f64>,
    pub pointer: Vector3<f64>,
    /// Rotation axis indicator in the pointer's local frame; cleared on the
    /// final frame of a gate.
    pub axis: Option<Unit<Vector3<f64>>>,
    pub new_trail_points: usize,
    pub finished: bool,
}

/// Result of one [`GateAnimationQueue::advance`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Tick {
    /// `None` once the queue has drained; the host may stop ticking.
    pub frame: Option<Frame>,
    pub rejected: Vec<(GateId, BlochError)>,
}

impl Tick {
    pub fn is_idle(&self) -> bool {
        self.frame.is_none()
    }

    pub fn finished_gate(&self) -> Option<GateId> {
        self.frame
            .as_ref()
            .filter(|frame| frame.finished)
            .map(|frame| frame.gate_id)
    }
}

#[derive(Clone, Copy, Debug)]
struct ActiveGate {
    id: GateId,
    started_at: Duration,
    last_step: Option<usize>,
}

#[derive(Clone, Debug)]
pub struct GateAnimationQueue {
    rotation_duration: Duration,
    trail_steps: usize,
    pending: VecDeque<(GateId, AppliedGate)>,
    planner: RotationPlanner,
    active: Option<ActiveGate>,
    trail: Trail,
    next_id: u64,
}

impl GateAnimationQueue {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            rotation_duration: config.rotation_duration,
            trail_steps: config.trail_steps.max(1),
            pending: VecDeque::new(),
            planner: RotationPlanner::new(),
            active: None,
            trail: Trail::default(),
            next_id: 0,
        }
    }

    pub fn enqueue(&mut self, gate: AppliedGate) -> GateId {
        let id = GateId(self.next_id);
        self.next_id += 1;

        if !self.is_running() {
            debug!(gate = id.0, "animation queue resumed");
        }
        self.pending.push_back((id, gate));
        id
    }

    /// `true` while a gate animates or waits; the host keeps ticking.
    pub fn is_running(&self) -> bool {
        self.active.is_some() || !self.pending.is_empty()
    }

    pub fn is_animating(&self) -> bool {
        self.active.is_some()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn trail(&self) -> &Trail {
        &self.trail
    }

    pub fn current_path(&self) -> Option<&RotationPath> {
        self.planner.current_path()
    }

    pub fn resting_orientation(&self) -> &UnitQuaternion<f64> {
        self.planner.resting_orientation()
    }

    pub fn advance(&mut self, now: Duration) -> Tick {
        let mut tick = Tick::default();

        if self.active.is_none() {
            self.start_next(now, &mut tick.rejected);
        }

        let Some(mut active) = self.active else {
            return tick;
        };
        let Some(path) = self.planner.current_path().copied() else {
            // Never report an active gate without a path.
            self.active = None;
            return tick;
        };

        let elapsed = now.saturating_sub(active.started_at);
        let x = if self.rotation_duration.is_zero() {
            1.0
        } else {
            elapsed.as_secs_f64() / self.rotation_duration.as_secs_f64()
        };
        let t = if x < 1.0 { ease_in_out_sine(x) } else { 1.0 };

        let orientation = path.sample_at(t);
        let new_trail_points = self.record_trail(&path, &mut active, t);

        let finished = t >= 1.0;
        if finished {
            self.planner.finish();
            self.active = None;
            debug!(gate = active.id.0, "gate animation finished");
        } else {
            self.active = Some(active);
        }

        tick.frame = Some(Frame {
            gate_id: active.id,
            t,
            orientation,
            pointer: pointer(&orientation),
            axis: if finished {
                None
            } else {
                Some(*path.local_axis())
            },
            new_trail_points,
            finished,
        });
        tick
    }

    fn start_next(&mut self, now: Duration, rejected: &mut Vec<(GateId, BlochError)>) {
        while let Some((id, gate)) = self.pending.pop_front() {
            match self.planner.begin(&gate) {
                Ok(_) => {
                    // The previous gate already left a point where this one
                    // starts.
                    let last_step = if self.trail.is_empty() { None } else { Some(0) };
                    self.active = Some(ActiveGate {
                        id,
                        started_at: now,
                        last_step,
                    });
                    return;
                }
                Err(err) => {
                    warn!(gate = id.0, error = %err, "gate animation rejected");
                    rejected.push((id, err));
                }
            }
        }
        debug!("animation queue drained");
    }

    /// Appends a point for every path position reached but not yet recorded.
    fn record_trail(&mut self, path: &RotationPath, active: &mut ActiveGate, t: f64) -> usize {
        let steps = self.trail_steps;
        let reached = ((t * steps as f64).floor() as usize).min(steps);
        let from = active.last_step.map_or(0, |step| step + 1);
        if from > reached {
            return 0;
        }

        for step in from..=reached {
            let orientation = path.sample_at(step as f64 / steps as f64);
            self.trail.push(pointer(&orientation));
        }
        active.last_step = Some(reached);
        reached - from + 1
    }

    /// Drops everything, including the gate in flight, and returns the
    /// pointer to the identity orientation.
    pub fn reset(&mut self) {
        let discarded = self.pending.len() + usize::from(self.active.is_some());
        self.pending.clear();
        self.active = None;
        self.trail.clear();
        self.planner.reset();
        info!(discarded, "animation queue reset");
    }
}
