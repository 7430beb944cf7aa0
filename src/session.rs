//! One Bloch-sphere session: the qubit state, its animation queue and the
//! record of every gate that has been committed.
//!
//! A gate request is checked and queued immediately, but its unitary reaches
//! [`BlochSession::state`] only when its animation completes, so the committed
//! state always matches what the pointer shows. Independent sessions share
//! nothing.

use std::collections::VecDeque;
use std::fmt::Display;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::animation::{GateAnimationQueue, GateId, Tick, Trail};
use crate::bloch::{bloch_angles, BlochAngles};
use crate::config::EngineConfig;
use crate::engine::{apply_op, apply_unitary, parse_angle, parse_sequence, GateOp};
use crate::error::{BlochError, Result};
use crate::gates::{GateSymbol, RotationAxis};
use crate::matrix::Matrix2;
use crate::qstate::QState;

/// How often renormalization had to correct more than the strict tolerance.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct NormalizationDiagnostics {
    pub applications: u64,
    pub corrections: u64,
    pub max_drift: f64,
}

impl NormalizationDiagnostics {
    fn record(&mut self, drift: f64, strict_tolerance: f64) {
        self.applications += 1;
        if drift > strict_tolerance {
            self.corrections += 1;
        }
        self.max_drift = self.max_drift.max(drift);
    }
}

/// A committed gate with the states on either side of it.
#[derive(Clone, Debug, PartialEq)]
pub struct EvolutionEntry {
    pub index: usize,
    pub label: String,
    pub unitary: Matrix2,
    pub before: QState,
    pub after: QState,
}

impl Display for EvolutionEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} |ψ⟩_{} = {} · {} = {}",
            self.label, self.index, self.unitary, self.before, self.after
        )
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SequenceReport {
    pub queued: Vec<GateId>,
    pub skipped: Vec<BlochError>,
}

#[derive(Clone, Debug)]
struct PendingGate {
    id: GateId,
    op: GateOp,
    unitary: Matrix2,
}

#[derive(Clone, Debug)]
pub struct BlochSession {
    config: EngineConfig,
    state: QState,
    /// `state` with every pending unitary applied.
    projected: QState,
    pending: VecDeque<PendingGate>,
    queue: GateAnimationQueue,
    history: Vec<EvolutionEntry>,
    diagnostics: NormalizationDiagnostics,
}

impl BlochSession {
    pub fn new(config: EngineConfig) -> Self {
        let queue = GateAnimationQueue::new(&config);
        Self {
            config,
            state: QState::ket0(),
            projected: QState::ket0(),
            pending: VecDeque::new(),
            queue,
            history: Vec::new(),
            diagnostics: NormalizationDiagnostics::default(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// State after every finished animation.
    pub fn state(&self) -> &QState {
        &self.state
    }

    /// State once every queued gate has been applied.
    pub fn projected_state(&self) -> QState {
        self.projected
    }

    /// Refolds the pending unitaries onto the committed state. Only needed
    /// when a gate leaves the queue without being committed.
    fn rebuild_projection(&mut self) {
        let mut projected = self.state;
        for gate in &self.pending {
            match apply_unitary(&projected, &gate.unitary) {
                Ok((next, _)) => projected = next,
                Err(err) => {
                    warn!(gate = gate.id.value(), error = %err, "gate left out of projection");
                }
            }
        }
        self.projected = projected;
    }

    pub fn bloch_angles(&self) -> BlochAngles {
        bloch_angles(&self.state)
    }

    pub fn trail(&self) -> &Trail {
        self.queue.trail()
    }

    pub fn queue(&self) -> &GateAnimationQueue {
        &self.queue
    }

    pub fn history(&self) -> &[EvolutionEntry] {
        &self.history
    }

    pub fn diagnostics(&self) -> &NormalizationDiagnostics {
        &self.diagnostics
    }

    /// `true` while a gate animates or waits to.
    pub fn is_running(&self) -> bool {
        self.queue.is_running()
    }

    pub fn apply(&mut self, op: GateOp) -> Result<GateId> {
        // Validate against the projected state so a bad request never queues.
        let application = apply_op(&self.projected, op)?;
        let id = self.queue.enqueue(application.applied);

        debug!(gate = id.value(), label = %op.label(), "gate queued");
        self.pending.push_back(PendingGate {
            id,
            op,
            unitary: application.unitary,
        });
        self.projected = application.state;
        Ok(id)
    }

    pub fn apply_symbol(&mut self, symbol: char) -> Result<GateId> {
        let gate = GateSymbol::from_char(symbol).ok_or(BlochError::UnrecognizedGateSymbol {
            symbol,
            position: 0,
        })?;
        self.apply(GateOp::Named(gate))
    }

    pub fn apply_rotation(&mut self, axis: RotationAxis, angle: f64) -> Result<GateId> {
        self.apply(GateOp::Rotation(axis, angle))
    }

    /// Rotation with an angle typed by the user. Unparsable input is a no-op.
    pub fn apply_rotation_input(&mut self, axis: RotationAxis, input: &str) -> Result<GateId> {
        let angle = parse_angle(input).inspect_err(|err| {
            warn!(error = %err, "ignoring rotation request");
        })?;
        self.apply_rotation(axis, angle)
    }

    /// Queues every recognized gate of `text`, left to right.
    pub fn run_sequence(&mut self, text: &str) -> SequenceReport {
        let (gates, mut skipped) = parse_sequence(text, self.config.separator_policy);
        let mut queued = Vec::with_capacity(gates.len());

        for gate in gates {
            match self.apply(GateOp::Named(gate)) {
                Ok(id) => queued.push(id),
                Err(err) => skipped.push(err),
            }
        }

        info!(queued = queued.len(), skipped = skipped.len(), "gate sequence queued");
        SequenceReport { queued, skipped }
    }

    /// Drives the animation; a gate is committed to the state on the tick its
    /// animation reaches `t = 1`.
    pub fn advance(&mut self, now: Duration) -> Tick {
        let tick = self.queue.advance(now);

        let mut dropped = false;
        for (id, err) in &tick.rejected {
            if let Some(gate) = self.take_pending(*id) {
                warn!(gate = id.value(), label = %gate.op.label(), error = %err, "dropping gate");
                dropped = true;
            }
        }
        if dropped {
            self.rebuild_projection();
        }

        if let Some(id) = tick.finished_gate() {
            if let Some(gate) = self.take_pending(id) {
                self.commit(gate);
            }
        }

        tick
    }

    fn take_pending(&mut self, id: GateId) -> Option<PendingGate> {
        let index = self.pending.iter().position(|gate| gate.id == id)?;
        self.pending.remove(index)
    }

    fn commit(&mut self, gate: PendingGate) {
        match apply_unitary(&self.state, &gate.unitary) {
            Ok((after, drift)) => {
                self.diagnostics
                    .record(drift, self.config.strict_norm_tolerance);
                self.history.push(EvolutionEntry {
                    index: self.history.len(),
                    label: gate.op.label(),
                    unitary: gate.unitary,
                    before: self.state,
                    after,
                });
                self.state = after;
            }
            Err(err) => {
                warn!(gate = gate.id.value(), error = %err, "state left unchanged");
                self.rebuild_projection();
            }
        }
    }

    /// Discards queued and in-flight gates, the trail and the history, and
    /// returns to `|0>`.
    pub fn reset(&mut self) {
        self.queue.reset();
        self.pending.clear();
        self.history.clear();
        self.state = QState::ket0();
        self.projected = QState::ket0();
        info!("session reset");
    }
}

impl Default for BlochSession {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
