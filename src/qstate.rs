use std::fmt::Display;
use std::str::FromStr;

use nalgebra::Vector2;
use num_complex::Complex;

use crate::complex::{format_complex, is_finite};
use crate::error::{BlochError, Result};
use crate::Qbit;

/// Tolerance of the `|a|² + |b|² = 1` invariant.
pub const NORM_TOLERANCE: f64 = 1e-9;

/// Single qubit amplitude vector `a|0> + b|1>`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QState {
    pub(crate) state: Vector2<Qbit>,
}

impl QState {
    /// Builds a state from amplitudes, normalizing them.
    pub fn new(a: Qbit, b: Qbit) -> Result<Self> {
        let (state, _) = Self::from_unnormalized(a, b).renormalize()?;
        Ok(state)
    }

    pub(crate) fn from_unnormalized(a: Qbit, b: Qbit) -> Self {
        Self {
            state: Vector2::new(a, b),
        }
    }

    /// `|0>`
    pub fn ket0() -> Self {
        Self::from_unnormalized(Complex::ONE, Complex::ZERO)
    }

    /// `|1>`
    pub fn ket1() -> Self {
        Self::from_unnormalized(Complex::ZERO, Complex::ONE)
    }

    pub fn a(&self) -> Qbit {
        self.state[0]
    }

    pub fn b(&self) -> Qbit {
        self.state[1]
    }

    /// `|a|² + |b|²`
    pub fn norm_sqr(&self) -> f64 {
        self.a().norm_sqr() + self.b().norm_sqr()
    }

    pub fn is_finite(&self) -> bool {
        is_finite(self.a()) && is_finite(self.b())
    }

    pub fn is_normalized(&self) -> bool {
        (self.norm_sqr() - 1.0).abs() <= NORM_TOLERANCE
    }

    /// Divides by the norm and reports the drift `||a|² + |b|² - 1|` that was
    /// corrected. Non-finite or zero vectors are rejected.
    pub fn renormalize(&self) -> Result<(QState, f64)> {
        if !self.is_finite() {
            return Err(BlochError::NonFiniteState);
        }

        let norm_sqr = self.norm_sqr();
        if !norm_sqr.is_finite() || norm_sqr == 0.0 {
            return Err(BlochError::NonFiniteState);
        }

        let drift = (norm_sqr - 1.0).abs();
        if drift == 0.0 {
            return Ok((*self, drift));
        }

        let norm = norm_sqr.sqrt();
        Ok((
            QState {
                state: self.state.map(|amp| amp.unscale(norm)),
            },
            drift,
        ))
    }

    pub fn approx_eq(&self, other: &QState, eps: f64) -> bool {
        self.state
            .iter()
            .zip(other.state.iter())
            .all(|(x, y)| (x.re - y.re).abs() <= eps && (x.im - y.im).abs() <= eps)
    }
}

impl Default for QState {
    fn default() -> Self {
        Self::ket0()
    }
}

impl FromStr for QState {
    type Err = BlochError;

    /// Parses a basis label: `0`, `1`, `+` or `-`.
    fn from_str(label: &str) -> Result<Self> {
        let root2 = 2.0_f64.sqrt();
        match label.trim() {
            "0" => Ok(Self::ket0()),
            "1" => Ok(Self::ket1()),
            "+" => Ok(Self::from_unnormalized(
                Complex::new(1.0 / root2, 0.0),
                Complex::new(1.0 / root2, 0.0),
            )),
            "-" => Ok(Self::from_unnormalized(
                Complex::new(1.0 / root2, 0.0),
                Complex::new(-1.0 / root2, 0.0),
            )),
            other => Err(BlochError::InvalidState(format!(
                "unknown basis label {:?}",
                other
            ))),
        }
    }
}

impl Display for QState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}, {}]",
            format_complex(self.a()),
            format_complex(self.b())
        )
    }
}

impl From<QState> for Vector2<Qbit> {
    fn from(qstate: QState) -> Self {
        qstate.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{assert_approx_complex_eq, assert_approx_eq};

    #[test]
    fn test_qstate_from_str() {
        let qstate: QState = "0".parse().unwrap();
        assert_approx_complex_eq!(1.0, 0.0, qstate.a());
        assert_approx_complex_eq!(0.0, 0.0, qstate.b());

        let qstate: QState = "1".parse().unwrap();
        assert_approx_complex_eq!(0.0, 0.0, qstate.a());
        assert_approx_complex_eq!(1.0, 0.0, qstate.b());

        let qstate: QState = "-".parse().unwrap();
        assert_approx_complex_eq!(1.0 / 2f64.sqrt(), 0.0, qstate.a());
        assert_approx_complex_eq!(-1.0 / 2f64.sqrt(), 0.0, qstate.b());
        assert!(qstate.is_normalized());
    }

    #[test]
    fn test_qstate_from_unknown_label() {
        let err = "01".parse::<QState>().unwrap_err();
        assert!(matches!(err, BlochError::InvalidState(_)));
    }

    #[test]
    fn test_new_normalizes() {
        let qstate = QState::new(Complex::new(3.0, 0.0), Complex::new(0.0, 4.0)).unwrap();
        assert_approx_complex_eq!(0.6, 0.0, qstate.a());
        assert_approx_complex_eq!(0.0, 0.8, qstate.b());
        assert_approx_eq!(1.0, qstate.norm_sqr());
    }

    #[test]
    fn test_new_rejects_zero_and_nan() {
        assert_eq!(
            Err(BlochError::NonFiniteState),
            QState::new(Complex::ZERO, Complex::ZERO)
        );
        assert_eq!(
            Err(BlochError::NonFiniteState),
            QState::new(Complex::new(f64::NAN, 0.0), Complex::ONE)
        );
    }

    #[test]
    fn test_renormalize_reports_drift() {
        let drifted = QState::from_unnormalized(Complex::new(1.0 + 1e-6, 0.0), Complex::ZERO);
        let (fixed, drift) = drifted.renormalize().unwrap();

        assert!(drift > 1e-7);
        assert_approx_eq!(1.0, fixed.norm_sqr());

        let (same, drift) = QState::ket1().renormalize().unwrap();
        assert_eq!(0.0, drift);
        assert_eq!(QState::ket1(), same);
    }

    #[test]
    fn test_display() {
        assert_eq!("[1, 0]", QState::ket0().to_string());
    }
}
