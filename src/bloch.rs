//! Mapping from qubit amplitudes to points on the Bloch sphere.
//!
//! The engine frame is the physics frame: `|0>` sits on `+z`, `|+>` on `+x`
//! and `|+i>` on `+y`. Renderers with a Y-up scene graph convert with
//! [`to_scene_vector`] and [`to_scene_orientation`], where scene X is Bloch y,
//! scene Y is Bloch z and scene Z is Bloch x.

use std::f64::consts::{PI, TAU};

use nalgebra::{Quaternion, UnitQuaternion, Vector3};

use crate::complex::{argument, magnitude};
use crate::qstate::QState;

/// Polar angle `theta ∈ [0, π]` and azimuth `phi ∈ [0, 2π)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BlochAngles {
    pub theta: f64,
    pub phi: f64,
}

impl BlochAngles {
    pub fn to_unit_vector(&self) -> Vector3<f64> {
        to_unit_vector(self.theta, self.phi)
    }
}

pub fn bloch_angles(state: &QState) -> BlochAngles {
    // |a| can overshoot 1.0 by an ulp after repeated gates.
    let a = magnitude(state.a()).clamp(0.0, 1.0);
    let theta = (2.0 * a.acos()).clamp(0.0, PI);

    let mut phi = argument(state.b()) - argument(state.a());
    while phi < 0.0 {
        phi += TAU;
    }
    if phi >= TAU {
        phi -= TAU;
    }

    BlochAngles { theta, phi }
}

/// `(sin θ cos φ, sin θ sin φ, cos θ)`
pub fn to_unit_vector(theta: f64, phi: f64) -> Vector3<f64> {
    Vector3::new(
        theta.sin() * phi.cos(),
        theta.sin() * phi.sin(),
        theta.cos(),
    )
}

pub fn bloch_vector(state: &QState) -> Vector3<f64> {
    bloch_angles(state).to_unit_vector()
}

pub fn to_scene_vector(v: &Vector3<f64>) -> Vector3<f64> {
    Vector3::new(v.y, v.z, v.x)
}

/// Re-expresses an engine-frame rotation in the Y-up scene frame.
pub fn to_scene_orientation(q: &UnitQuaternion<f64>) -> UnitQuaternion<f64> {
    let v = q.imag();
    UnitQuaternion::new_unchecked(Quaternion::new(q.w, v.y, v.z, v.x))
}

#[cfg(test)]
mod tests {
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

    use approx::assert_relative_eq;
    use num_complex::Complex;

    use super::*;
    use crate::assert_approx_eq;
    use crate::gates::{h_matrix, s_matrix, t_matrix, x_matrix};

    #[test]
    fn test_poles() {
        let angles = bloch_angles(&QState::ket0());
        assert_approx_eq!(0.0, angles.theta);

        let angles = bloch_angles(&QState::ket1());
        assert_approx_eq!(PI, angles.theta);
    }

    #[test]
    fn test_equator() {
        let plus = h_matrix().mul_vec(&QState::ket0());
        let angles = bloch_angles(&plus);
        assert_approx_eq!(FRAC_PI_2, angles.theta);
        assert_approx_eq!(0.0, angles.phi);
        assert_relative_eq!(Vector3::x(), angles.to_unit_vector(), epsilon = 1e-12);

        let plus_i = s_matrix().mul_vec(&plus);
        assert_relative_eq!(Vector3::y(), bloch_vector(&plus_i), epsilon = 1e-12);
    }

    #[test]
    fn test_phi_is_wrapped_into_positive_range() {
        // T† on |+> lands at phi = -π/4, reported as 7π/4.
        let plus = h_matrix().mul_vec(&QState::ket0());
        let state = t_matrix().adjoint().mul_vec(&plus);
        let angles = bloch_angles(&state);
        assert_approx_eq!(2.0 * PI - FRAC_PI_4, angles.phi);
        assert!(angles.phi >= 0.0 && angles.phi < TAU);
    }

    #[test]
    fn test_global_phase_is_ignored() {
        let plus = h_matrix().mul_vec(&QState::ket0());
        let phase = Complex::from_polar(1.0, 2.5);
        let shifted = QState::from_unnormalized(plus.a() * phase, plus.b() * phase);
        let angles = bloch_angles(&shifted);
        assert_approx_eq!(FRAC_PI_2, angles.theta);
        assert_approx_eq!(0.0, angles.phi.min(TAU - angles.phi));
    }

    #[test]
    fn test_overshoot_is_clamped() {
        let state = QState::from_unnormalized(Complex::new(1.0 + 1e-15, 0.0), Complex::ZERO);
        let angles = bloch_angles(&state);
        assert_eq!(0.0, angles.theta);
        assert!(!angles.theta.is_nan());
    }

    #[test]
    fn test_ket1_points_down() {
        let one = x_matrix().mul_vec(&QState::ket0());
        assert_relative_eq!(-Vector3::z(), bloch_vector(&one), epsilon = 1e-12);
    }

    #[test]
    fn test_scene_mapping() {
        assert_relative_eq!(Vector3::y(), to_scene_vector(&Vector3::z()));
        assert_relative_eq!(Vector3::z(), to_scene_vector(&Vector3::x()));
        assert_relative_eq!(Vector3::x(), to_scene_vector(&Vector3::y()));

        let q = UnitQuaternion::from_axis_angle(&Vector3::x_axis(), 0.7);
        let v = Vector3::new(0.2, -0.4, 0.9);
        let in_scene = to_scene_orientation(&q) * to_scene_vector(&v);
        assert_relative_eq!(to_scene_vector(&(q * v)), in_scene, epsilon = 1e-12);
    }
}
