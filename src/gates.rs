use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};
use std::fmt::Display;
use std::str::FromStr;

use nalgebra::Vector3;
use num_complex::Complex;

use crate::error::BlochError;
use crate::matrix::Matrix2;
use crate::rotation::AppliedGate;

pub fn identity_matrix() -> Matrix2 {
    Matrix2::identity()
}

pub fn x_matrix() -> Matrix2 {
    Matrix2::new(Complex::ZERO, Complex::ONE, Complex::ONE, Complex::ZERO)
}

pub fn y_matrix() -> Matrix2 {
    Matrix2::new(
        Complex::ZERO,
        Complex::new(0.0, -1.0),
        Complex::new(0.0, 1.0),
        Complex::ZERO,
    )
}

pub fn z_matrix() -> Matrix2 {
    Matrix2::new(
        Complex::ONE,
        Complex::ZERO,
        Complex::ZERO,
        Complex::new(-1.0, 0.0),
    )
}

pub fn h_matrix() -> Matrix2 {
    let root2 = 2.0_f64.sqrt();
    let one = Complex::new(1.0, 0.0);
    Matrix2::new(one / root2, one / root2, one / root2, -one / root2)
}

pub fn s_matrix() -> Matrix2 {
    Matrix2::new(
        Complex::ONE,
        Complex::ZERO,
        Complex::ZERO,
        Complex::new(0.0, 1.0),
    )
}

pub fn t_matrix() -> Matrix2 {
    Matrix2::new(
        Complex::ONE,
        Complex::ZERO,
        Complex::ZERO,
        Complex::from_polar(1.0, FRAC_PI_4),
    )
}

/// Axis of a parametrized rotation gate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RotationAxis {
    X,
    Y,
    Z,
}

impl RotationAxis {
    /// Direction on the Bloch sphere (engine frame, z up).
    pub fn unit_vector(self) -> Vector3<f64> {
        match self {
            RotationAxis::X => Vector3::x(),
            RotationAxis::Y => Vector3::y(),
            RotationAxis::Z => Vector3::z(),
        }
    }

    pub fn gate_name(self) -> &'static str {
        match self {
            RotationAxis::X => "Rx",
            RotationAxis::Y => "Ry",
            RotationAxis::Z => "Rz",
        }
    }
}

impl FromStr for RotationAxis {
    type Err = BlochError;

    /// Accepts `Rx`, `Ry`, `Rz` as well as the bare axis letter.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Rx" | "rx" | "RX" | "X" | "x" => Ok(RotationAxis::X),
            "Ry" | "ry" | "RY" | "Y" | "y" => Ok(RotationAxis::Y),
            "Rz" | "rz" | "RZ" | "Z" | "z" => Ok(RotationAxis::Z),
            _ => Err(BlochError::UnknownRotationAxis {
                input: s.to_string(),
            }),
        }
    }
}

/// Single character gates understood in a gate sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GateSymbol {
    X,
    Y,
    Z,
    H,
    S,
    SDagger,
    T,
    TDagger,
}

impl GateSymbol {
    pub const ALL: [GateSymbol; 8] = [
        GateSymbol::X,
        GateSymbol::Y,
        GateSymbol::Z,
        GateSymbol::H,
        GateSymbol::S,
        GateSymbol::SDagger,
        GateSymbol::T,
        GateSymbol::TDagger,
    ];

    pub fn from_char(symbol: char) -> Option<Self> {
        match symbol {
            'X' => Some(GateSymbol::X),
            'Y' => Some(GateSymbol::Y),
            'Z' => Some(GateSymbol::Z),
            'H' => Some(GateSymbol::H),
            'S' => Some(GateSymbol::S),
            's' => Some(GateSymbol::SDagger),
            'T' => Some(GateSymbol::T),
            't' => Some(GateSymbol::TDagger),
            _ => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            GateSymbol::X => 'X',
            GateSymbol::Y => 'Y',
            GateSymbol::Z => 'Z',
            GateSymbol::H => 'H',
            GateSymbol::S => 'S',
            GateSymbol::SDagger => 's',
            GateSymbol::T => 'T',
            GateSymbol::TDagger => 't',
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            GateSymbol::X => "X",
            GateSymbol::Y => "Y",
            GateSymbol::Z => "Z",
            GateSymbol::H => "H",
            GateSymbol::S => "S",
            GateSymbol::SDagger => "S†",
            GateSymbol::T => "T",
            GateSymbol::TDagger => "T†",
        }
    }

    pub fn matrix(self) -> Matrix2 {
        match self {
            GateSymbol::X => x_matrix(),
            GateSymbol::Y => y_matrix(),
            GateSymbol::Z => z_matrix(),
            GateSymbol::H => h_matrix(),
            GateSymbol::S => s_matrix(),
            GateSymbol::SDagger => s_matrix().adjoint(),
            GateSymbol::T => t_matrix(),
            GateSymbol::TDagger => t_matrix().adjoint(),
        }
    }

    /// How the gate turns the Bloch pointer.
    pub fn applied_gate(self) -> AppliedGate {
        match self {
            GateSymbol::X => AppliedGate::about(RotationAxis::X, PI),
            GateSymbol::Y => AppliedGate::about(RotationAxis::Y, PI),
            GateSymbol::Z => AppliedGate::about(RotationAxis::Z, PI),
            GateSymbol::H => AppliedGate::new(Vector3::new(1.0, 0.0, 1.0).normalize(), PI),
            GateSymbol::S => AppliedGate::about(RotationAxis::Z, FRAC_PI_2),
            GateSymbol::SDagger => AppliedGate::about(RotationAxis::Z, -FRAC_PI_2),
            GateSymbol::T => AppliedGate::about(RotationAxis::Z, FRAC_PI_4),
            GateSymbol::TDagger => AppliedGate::about(RotationAxis::Z, -FRAC_PI_4),
        }
    }
}

impl Display for GateSymbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
