//! Pointer orientation and the per-gate rotation paths between orientations.
//!
//! The pointer rests on `+z` (`|0>`) and its orientation is a unit quaternion
//! mapping that rest direction onto the current Bloch vector. A gate rotates
//! the pointer by an exact signed angle about a fixed world axis; the planner
//! never takes a shortest-arc shortcut, so a Pauli half turn always sweeps the
//! whole half turn in the gate's direction.

use nalgebra::{Unit, UnitQuaternion, Vector3};
use tracing::debug;

use crate::error::{BlochError, Result};
use crate::gates::RotationAxis;

/// Geometric action of a gate on the Bloch pointer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AppliedGate {
    pub axis: Vector3<f64>,
    /// Radians, signed (right-hand rule about `axis`).
    pub angle: f64,
}

impl AppliedGate {
    pub fn new(axis: Vector3<f64>, angle: f64) -> Self {
        Self { axis, angle }
    }

    pub fn about(axis: RotationAxis, angle: f64) -> Self {
        Self::new(axis.unit_vector(), angle)
    }

    /// Normalized axis, rejecting zero-length and non-finite input.
    pub fn unit_axis(&self) -> Result<Unit<Vector3<f64>>> {
        if !self.axis.iter().all(|c| c.is_finite()) || !self.angle.is_finite() {
            return Err(BlochError::InvalidAxis);
        }
        Unit::try_new(self.axis, 1e-12).ok_or(BlochError::InvalidAxis)
    }
}

/// Pointer tip for an orientation.
pub fn pointer(orientation: &UnitQuaternion<f64>) -> Vector3<f64> {
    orientation * Vector3::z()
}

/// One gate's sweep from `start` to `target`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RotationPath {
    start: UnitQuaternion<f64>,
    target: UnitQuaternion<f64>,
    local_axis: Unit<Vector3<f64>>,
    angle: f64,
}

impl RotationPath {
    pub fn new(start: UnitQuaternion<f64>, gate: &AppliedGate) -> Result<Self> {
        let world_axis = gate.unit_axis()?;
        // The pointer may already be turned by earlier gates, so the world axis
        // is expressed in its local frame before composing.
        let local_axis = start.inverse_transform_unit_vector(&world_axis);
        let target = start * UnitQuaternion::from_axis_angle(&local_axis, gate.angle);

        Ok(Self {
            start,
            target,
            local_axis,
            angle: gate.angle,
        })
    }

    pub fn start(&self) -> &UnitQuaternion<f64> {
        &self.start
    }

    pub fn target(&self) -> &UnitQuaternion<f64> {
        &self.target
    }

    pub fn local_axis(&self) -> &Unit<Vector3<f64>> {
        &self.local_axis
    }

    /// World-frame axis, i.e. the gate's axis after normalization.
    pub fn world_axis(&self) -> Unit<Vector3<f64>> {
        self.start * self.local_axis
    }

    pub fn angle(&self) -> f64 {
        self.angle
    }

    /// Orientation after sweeping the fraction `t` of the gate angle.
    ///
    /// `t` is clamped into `[0, 1]`; both endpoints return the stored
    /// orientations unchanged.
    pub fn sample_at(&self, t: f64) -> UnitQuaternion<f64> {
        if t.is_nan() || t <= 0.0 {
            return self.start;
        }
        if t >= 1.0 {
            return self.target;
        }
        self.start * UnitQuaternion::from_axis_angle(&self.local_axis, self.angle * t)
    }
}

#[derive(Clone, Debug, PartialEq)]
enum PlannerState {
    Idle,
    Animating(RotationPath),
}

/// Tracks the resting orientation and at most one in-flight path.
#[derive(Clone, Debug)]
pub struct RotationPlanner {
    resting: UnitQuaternion<f64>,
    state: PlannerState,
}

impl RotationPlanner {
    pub fn new() -> Self {
        Self {
            resting: UnitQuaternion::identity(),
            state: PlannerState::Idle,
        }
    }

    pub fn is_animating(&self) -> bool {
        matches!(self.state, PlannerState::Animating(_))
    }

    pub fn resting_orientation(&self) -> &UnitQuaternion<f64> {
        &self.resting
    }

    pub fn current_path(&self) -> Option<&RotationPath> {
        match &self.state {
            PlannerState::Idle => None,
            PlannerState::Animating(path) => Some(path),
        }
    }

    /// Starts a path from the resting orientation. An invalid gate leaves the
    /// planner idle.
    pub fn begin(&mut self, gate: &AppliedGate) -> Result<RotationPath> {
        if let PlannerState::Animating(path) = &self.state {
            // A path that was never finished still counts as completed.
            self.resting = *path.target();
        }
        self.state = PlannerState::Idle;

        let path = RotationPath::new(self.resting, gate)?;
        debug!(angle = gate.angle, axis = ?gate.axis, "rotation path started");

        self.state = PlannerState::Animating(path);
        Ok(path)
    }

    pub fn sample_at(&self, t: f64) -> Option<UnitQuaternion<f64>> {
        self.current_path().map(|path| path.sample_at(t))
    }

    /// Retires the current path; its target becomes the resting orientation.
    pub fn finish(&mut self) -> UnitQuaternion<f64> {
        if let PlannerState::Animating(path) = &self.state {
            self.resting = *path.target();
        }
        self.state = PlannerState::Idle;
        self.resting
    }

    pub fn reset(&mut self) {
        self.resting = UnitQuaternion::identity();
        self.state = PlannerState::Idle;
    }
}

impl Default for RotationPlanner {
    fn default() -> Self {
        Self::new()
    }
}
