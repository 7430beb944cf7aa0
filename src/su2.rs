//! Reading a single-qubit unitary as a rotation of the Bloch sphere.
//!
//! Any `U ∈ U(2)` is `e^{iα}·(cos(θ/2)·I - i·sin(θ/2)·(n·σ))`. Dividing out the
//! global phase leaves an SU(2) element whose Pauli coordinates give the axis
//! `n` and angle `θ`.

use std::f64::consts::PI;

use nalgebra::Vector3;

use crate::error::{BlochError, Result};
use crate::gates::RotationAxis;
use crate::matrix::Matrix2;
use crate::rotation::AppliedGate;

/// Divides `u` by a square root of its determinant, giving `det = 1`.
pub fn to_special_unitary(u: &Matrix2) -> Result<Matrix2> {
    let det = u.a() * u.d() - u.b() * u.c();
    if !det.re.is_finite() || !det.im.is_finite() || det.norm() < 1e-12 {
        return Err(BlochError::NonFiniteState);
    }

    let phase = det.sqrt();
    Ok(Matrix2::new(
        u.a() / phase,
        u.b() / phase,
        u.c() / phase,
        u.d() / phase,
    ))
}

/// `(cos(θ/2), n·sin(θ/2))` of an SU(2) element.
fn mat_to_cart4(u: &Matrix2) -> (f64, f64, f64, f64) {
    (
        (u.a().re + u.d().re) / 2.0,
        -(u.b().im + u.c().im) / 2.0,
        (u.c().re - u.b().re) / 2.0,
        (u.d().im - u.a().im) / 2.0,
    )
}

/// Pointer rotation performed by `u`. The angle lands in `[0, π]`; rotations
/// past a half turn are read about the flipped axis.
pub fn axis_angle(u: &Matrix2) -> Result<AppliedGate> {
    let su = to_special_unitary(u)?;
    let (cos, sx, sy, sz) = mat_to_cart4(&su);
    let sin = (sx * sx + sy * sy + sz * sz).sqrt();

    if sin < 1e-10 {
        // ±I: no rotation
        return Ok(AppliedGate::about(RotationAxis::Z, 0.0));
    }

    let mut angle = 2.0 * sin.atan2(cos);
    let mut axis = Vector3::new(sx, sy, sz) / sin;
    if angle > PI + 1e-12 {
        angle = 2.0 * PI - angle;
        axis = -axis;
    }

    Ok(AppliedGate::new(axis, angle))
}

/// Equality of unitaries up to a global phase.
pub struct Su2Equiv {
    epsilon: f64,
    gamma: f64,
}

impl Su2Equiv {
    pub fn new(e: f64) -> Self {
        Su2Equiv {
            epsilon: e * e,
            gamma: (2.0 - e) * (2.0 - e),
        }
    }

    pub fn equals(&self, a: &Matrix2, b: &Matrix2) -> bool {
        let (Ok(a), Ok(b)) = (to_special_unitary(a), to_special_unitary(b)) else {
            return false;
        };
        let a = mat_to_cart4(&a);
        let b = mat_to_cart4(&b);

        let d0 = a.0 - b.0;
        let d1 = a.1 - b.1;
        let d2 = a.2 - b.2;
        let d3 = a.3 - b.3;

        // U and -U are the same rotation, which puts them at distance 2.
        let dist = d0 * d0 + d1 * d1 + d2 * d2 + d3 * d3;
        dist < self.epsilon || dist > self.gamma
    }
}

impl Default for Su2Equiv {
    fn default() -> Self {
        Self::new(1e-8)
    }
}
