pub mod animation;
pub mod bloch;
pub mod complex;
pub mod config;
pub mod engine;
pub mod error;
pub mod gates;
pub mod matrix;
pub mod qstate;
pub mod rotation;
pub mod session;
pub mod su2;

#[cfg(test)]
mod test_util;

use num_complex::Complex;

pub type Qbit = Complex<f64>;

pub use animation::{Frame, GateAnimationQueue, GateId, Tick, Trail, TrailPoint};
pub use bloch::{bloch_angles, to_unit_vector, BlochAngles};
pub use config::{EngineConfig, SeparatorPolicy};
pub use engine::{apply_named_gate, apply_rotation, apply_sequence, GateApplication, GateOp};
pub use error::{BlochError, Result};
pub use gates::{GateSymbol, RotationAxis};
pub use matrix::Matrix2;
pub use qstate::QState;
pub use rotation::{AppliedGate, RotationPath, RotationPlanner};
pub use session::{BlochSession, EvolutionEntry, NormalizationDiagnostics};
