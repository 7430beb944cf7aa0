//! Pure gate application: state in, new state and pointer rotation out.

use num_complex::Complex;
use tracing::warn;

use crate::complex::format_complex;
use crate::config::SeparatorPolicy;
use crate::error::{BlochError, Result};
use crate::gates::{GateSymbol, RotationAxis};
use crate::matrix::Matrix2;
use crate::qstate::QState;
use crate::rotation::AppliedGate;
use crate::su2::axis_angle;

/// A gate request: a catalog symbol or a parametrized rotation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GateOp {
    Named(GateSymbol),
    Rotation(RotationAxis, f64),
}

impl GateOp {
    pub fn matrix(&self) -> Matrix2 {
        match *self {
            GateOp::Named(gate) => gate.matrix(),
            GateOp::Rotation(axis, angle) => Matrix2::rotation(axis, angle),
        }
    }

    pub fn applied_gate(&self) -> AppliedGate {
        match *self {
            GateOp::Named(gate) => gate.applied_gate(),
            GateOp::Rotation(axis, angle) => AppliedGate::about(axis, angle),
        }
    }

    pub fn label(&self) -> String {
        match *self {
            GateOp::Named(gate) => gate.label().to_string(),
            GateOp::Rotation(axis, angle) => format!(
                "{}({})",
                axis.gate_name(),
                format_complex(Complex::new(angle, 0.0))
            ),
        }
    }
}

/// Outcome of applying one gate to a state.
#[derive(Clone, Debug, PartialEq)]
pub struct GateApplication {
    pub op: GateOp,
    pub unitary: Matrix2,
    pub before: QState,
    pub state: QState,
    pub applied: AppliedGate,
    /// Norm drift corrected after the matrix product.
    pub drift: f64,
}

/// `unitary · state`, renormalized.
pub fn apply_unitary(state: &QState, unitary: &Matrix2) -> Result<(QState, f64)> {
    unitary.mul_vec(state).renormalize()
}

pub fn apply_op(state: &QState, op: GateOp) -> Result<GateApplication> {
    if let GateOp::Rotation(_, angle) = op {
        if !angle.is_finite() {
            return Err(BlochError::InvalidNumericInput {
                input: angle.to_string(),
            });
        }
    }

    let unitary = op.matrix();
    let (new_state, drift) = apply_unitary(state, &unitary)?;

    Ok(GateApplication {
        op,
        unitary,
        before: *state,
        state: new_state,
        applied: op.applied_gate(),
        drift,
    })
}

pub fn apply_named_gate(state: &QState, symbol: char) -> Result<GateApplication> {
    let gate = GateSymbol::from_char(symbol).ok_or(BlochError::UnrecognizedGateSymbol {
        symbol,
        position: 0,
    })?;
    apply_op(state, GateOp::Named(gate))
}

pub fn apply_rotation(state: &QState, axis: RotationAxis, angle: f64) -> Result<GateApplication> {
    apply_op(state, GateOp::Rotation(axis, angle))
}

/// Parses an angle in radians; anything but a finite number is rejected.
pub fn parse_angle(input: &str) -> Result<f64> {
    match input.trim().parse::<f64>() {
        Ok(angle) if angle.is_finite() => Ok(angle),
        _ => Err(BlochError::InvalidNumericInput {
            input: input.to_string(),
        }),
    }
}

/// Splits a gate sequence into gates (left to right) and the characters that
/// were skipped.
pub fn parse_sequence(text: &str, policy: SeparatorPolicy) -> (Vec<GateSymbol>, Vec<BlochError>) {
    let mut gates = Vec::new();
    let mut skipped = Vec::new();

    for (position, symbol) in text.chars().enumerate() {
        if let Some(gate) = GateSymbol::from_char(symbol) {
            gates.push(gate);
            continue;
        }
        if policy == SeparatorPolicy::Ignore && SeparatorPolicy::is_separator(symbol) {
            continue;
        }

        warn!(symbol = ?symbol, position, "skipping unrecognized gate symbol");
        skipped.push(BlochError::UnrecognizedGateSymbol { symbol, position });
    }

    (gates, skipped)
}

#[derive(Clone, Debug, PartialEq)]
pub struct SequenceOutcome {
    pub state: QState,
    pub applied: Vec<GateApplication>,
    pub skipped: Vec<BlochError>,
}

/// Applies every recognized gate of `text` in order. Unknown characters are
/// reported and do not stop the rest of the sequence.
pub fn apply_sequence(state: &QState, text: &str, policy: SeparatorPolicy) -> SequenceOutcome {
    let (gates, mut skipped) = parse_sequence(text, policy);
    let mut current = *state;
    let mut applied = Vec::with_capacity(gates.len());

    for gate in gates {
        match apply_op(&current, GateOp::Named(gate)) {
            Ok(application) => {
                current = application.state;
                applied.push(application);
            }
            Err(err) => skipped.push(err),
        }
    }

    SequenceOutcome {
        state: current,
        applied,
        skipped,
    }
}

/// The single operator equivalent to running `text`; unknown characters are
/// ignored.
pub fn sequence_unitary(text: &str) -> Matrix2 {
    text.chars()
        .filter_map(GateSymbol::from_char)
        .fold(Matrix2::identity(), |acc, gate| gate.matrix().mul(&acc))
}

/// The single pointer rotation equivalent to running `text`.
pub fn net_rotation(text: &str) -> Result<AppliedGate> {
    axis_angle(&sequence_unitary(text))
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;

    use proptest::prelude::*;

    use super::*;
    use crate::{assert_approx_complex_eq, assert_approx_eq};

    #[test]
    fn test_x_on_ket0() {
        let result = apply_named_gate(&QState::ket0(), 'X').unwrap();
        assert_approx_complex_eq!(0.0, 0.0, result.state.a());
        assert_approx_complex_eq!(1.0, 0.0, result.state.b());
        assert_eq!(QState::ket0(), result.before);
        assert_eq!(PI, result.applied.angle);
    }

    #[test]
    fn test_h_on_ket0() {
        let result = apply_named_gate(&QState::ket0(), 'H').unwrap();
        assert_approx_complex_eq!(1.0 / 2f64.sqrt(), 0.0, result.state.a());
        assert_approx_complex_eq!(1.0 / 2f64.sqrt(), 0.0, result.state.b());
    }

    #[test]
    fn test_unknown_symbol() {
        assert_eq!(
            Err(BlochError::UnrecognizedGateSymbol {
                symbol: 'Q',
                position: 0
            }),
            apply_named_gate(&QState::ket0(), 'Q')
        );
    }

    #[test]
    fn test_rotation_accepts_out_of_range_angles() {
        let result = apply_rotation(&QState::ket0(), RotationAxis::Y, 3.0 * PI).unwrap();
        assert!(result.state.is_normalized());
        assert_eq!(3.0 * PI, result.applied.angle);
        assert_eq!("Ry(9.4248)", result.op.label());
    }

    #[test]
    fn test_rotation_rejects_nan() {
        let err = apply_rotation(&QState::ket0(), RotationAxis::X, f64::NAN).unwrap_err();
        assert!(matches!(err, BlochError::InvalidNumericInput { .. }));
    }

    #[test]
    fn test_parse_angle() {
        assert_eq!(Ok(0.5), parse_angle(" 0.5 "));
        assert_eq!(Ok(-2.0), parse_angle("-2"));
        for bad in ["", "abc", "NaN", "inf", "1.2.3"] {
            assert!(
                matches!(parse_angle(bad), Err(BlochError::InvalidNumericInput { .. })),
                "{:?} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_unrecognized_symbol_is_skipped() {
        let with_q = apply_sequence(&QState::ket0(), "XQZ", SeparatorPolicy::Strict);
        let without = apply_sequence(&QState::ket0(), "XZ", SeparatorPolicy::Strict);

        assert!(with_q.state.approx_eq(&without.state, 1e-12));
        assert_eq!(2, with_q.applied.len());
        assert_eq!(
            vec![BlochError::UnrecognizedGateSymbol {
                symbol: 'Q',
                position: 1
            }],
            with_q.skipped
        );
    }

    #[test]
    fn test_separator_policy() {
        let (gates, skipped) = parse_sequence("H, T t", SeparatorPolicy::Strict);
        assert_eq!(vec![GateSymbol::H, GateSymbol::T, GateSymbol::TDagger], gates);
        assert_eq!(3, skipped.len());

        let (gates, skipped) = parse_sequence("H, T t", SeparatorPolicy::Ignore);
        assert_eq!(3, gates.len());
        assert!(skipped.is_empty());

        // Non-separators are still reported under the lenient policy.
        let (_, skipped) = parse_sequence("H;T", SeparatorPolicy::Ignore);
        assert_eq!(1, skipped.len());
    }

    #[test]
    fn test_sequence_unitary_matches_sequence() {
        let text = "HTsYZtHX";
        let outcome = apply_sequence(&QState::ket0(), text, SeparatorPolicy::Strict);
        let unitary = sequence_unitary(text);

        assert!(unitary.is_unitary(1e-9));
        assert!(unitary
            .mul_vec(&QState::ket0())
            .approx_eq(&outcome.state, 1e-9));
    }

    #[test]
    fn test_sequence_unitary_ignores_unknown() {
        assert!(sequence_unitary("H?H").approx_eq(&Matrix2::identity(), 1e-12));
        assert!(sequence_unitary("").approx_eq(&Matrix2::identity(), 1e-12));
    }

    #[test]
    fn test_net_rotation() {
        // H Z H is X up to phase
        let gate = net_rotation("HZH").unwrap();
        assert_approx_eq!(PI, gate.angle, 1e-9);
        assert_approx_eq!(1.0, gate.axis.x.abs(), 1e-9);

        let gate = net_rotation("TT").unwrap();
        assert_approx_eq!(PI / 2.0, gate.angle, 1e-9);
        assert_approx_eq!(1.0, gate.axis.z, 1e-9);

        assert_eq!(0.0, net_rotation("Ss").unwrap().angle);
    }

    #[test]
    fn test_norm_holds_over_long_sequences() {
        let text = "HTHTHSHtY".repeat(500);
        let outcome = apply_sequence(&QState::ket0(), &text, SeparatorPolicy::Strict);
        assert_approx_eq!(1.0, outcome.state.norm_sqr(), 1e-9);
        assert!(outcome.applied.iter().all(|a| a.state.is_normalized()));
    }

    fn gate_op() -> impl Strategy<Value = GateOp> {
        prop_oneof![
            prop::sample::select(GateSymbol::ALL.to_vec()).prop_map(GateOp::Named),
            (
                prop::sample::select(vec![RotationAxis::X, RotationAxis::Y, RotationAxis::Z]),
                -20.0f64..20.0
            )
                .prop_map(|(axis, angle)| GateOp::Rotation(axis, angle)),
        ]
    }

    proptest! {
        #[test]
        fn prop_every_gate_is_unitary(op in gate_op()) {
            prop_assert!(op.matrix().is_unitary(1e-9));
        }

        #[test]
        fn prop_state_stays_normalized(ops in prop::collection::vec(gate_op(), 0..64)) {
            let mut state = QState::ket0();
            for op in ops {
                state = apply_op(&state, op).unwrap().state;
                prop_assert!((state.norm_sqr() - 1.0).abs() <= 1e-9);
            }
        }

        #[test]
        fn prop_rz_halves_compose(angle in -10.0f64..10.0) {
            let half = Matrix2::rotation(RotationAxis::Z, angle / 2.0);
            let full = Matrix2::rotation(RotationAxis::Z, angle);
            prop_assert!(half.mul(&half).approx_eq(&full, 1e-9));
        }
    }
}
