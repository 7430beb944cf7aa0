use std::fmt::Display;
use std::ops::Mul;

use nalgebra::Matrix2 as DenseMatrix2;
use num_complex::Complex;

use crate::complex::format_complex;
use crate::gates::RotationAxis;
use crate::qstate::QState;
use crate::Qbit;

/// A 2x2 complex operator `[[a, b], [c, d]]`.
///
/// Values are never mutated after construction; composition returns a new
/// matrix.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Matrix2 {
    pub(crate) inner: DenseMatrix2<Qbit>,
}

impl Matrix2 {
    pub fn new(a: Qbit, b: Qbit, c: Qbit, d: Qbit) -> Self {
        Self {
            inner: DenseMatrix2::new(a, b, c, d),
        }
    }

    pub fn identity() -> Self {
        Self {
            inner: DenseMatrix2::identity(),
        }
    }

    pub fn a(&self) -> Qbit {
        self.inner[(0, 0)]
    }

    pub fn b(&self) -> Qbit {
        self.inner[(0, 1)]
    }

    pub fn c(&self) -> Qbit {
        self.inner[(1, 0)]
    }

    pub fn d(&self) -> Qbit {
        self.inner[(1, 1)]
    }

    /// `self · other`. Applying `g1` and then `g2` to a state is `g2.mul(&g1)`.
    pub fn mul(&self, other: &Matrix2) -> Matrix2 {
        Matrix2 {
            inner: self.inner * other.inner,
        }
    }

    /// Applies the operator to a state. The result is not renormalized.
    pub fn mul_vec(&self, state: &QState) -> QState {
        QState {
            state: self.inner * state.state,
        }
    }

    /// Conjugate transpose.
    pub fn adjoint(&self) -> Matrix2 {
        Matrix2 {
            inner: self.inner.adjoint(),
        }
    }

    /// `exp(-i·θ/2·σ)` for the Pauli generator of `axis`.
    pub fn rotation(axis: RotationAxis, theta: f64) -> Matrix2 {
        let half = theta / 2.0;
        let cos = Complex::new(half.cos(), 0.0);
        let sin = half.sin();

        match axis {
            RotationAxis::X => {
                let minus_i_sin = Complex::new(0.0, -sin);
                Matrix2::new(cos, minus_i_sin, minus_i_sin, cos)
            }
            RotationAxis::Y => Matrix2::new(
                cos,
                Complex::new(-sin, 0.0),
                Complex::new(sin, 0.0),
                cos,
            ),
            RotationAxis::Z => Matrix2::new(
                Complex::from_polar(1.0, -half),
                Complex::ZERO,
                Complex::ZERO,
                Complex::from_polar(1.0, half),
            ),
        }
    }

    pub fn approx_eq(&self, other: &Matrix2, eps: f64) -> bool {
        self.inner
            .iter()
            .zip(other.inner.iter())
            .all(|(x, y)| (x.re - y.re).abs() <= eps && (x.im - y.im).abs() <= eps)
    }

    /// Checks `M · M† = I` entry by entry.
    pub fn is_unitary(&self, eps: f64) -> bool {
        self.mul(&self.adjoint()).approx_eq(&Matrix2::identity(), eps)
    }
}

impl Mul<&Matrix2> for &Matrix2 {
    type Output = Matrix2;

    fn mul(self, rhs: &Matrix2) -> Matrix2 {
        Matrix2::mul(self, rhs)
    }
}

impl Mul<&QState> for &Matrix2 {
    type Output = QState;

    fn mul(self, rhs: &QState) -> QState {
        self.mul_vec(rhs)
    }
}

impl Display for Matrix2 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[[{}, {}], [{}, {}]]",
            format_complex(self.a()),
            format_complex(self.b()),
            format_complex(self.c()),
            format_complex(self.d())
        )
    }
}
