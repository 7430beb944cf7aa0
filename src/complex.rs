//! Complex helpers on top of `num_complex::Complex<f64>`.
//!
//! Addition, subtraction, multiplication, conjugation and real scaling come
//! straight from `num_complex`. Polar decomposition is wrapped here so that
//! the zero amplitude has a defined magnitude and argument of `0`.

use std::fmt::Write;

use crate::Qbit;

pub fn magnitude(z: Qbit) -> f64 {
    if z.re == 0.0 && z.im == 0.0 {
        0.0
    } else {
        z.norm()
    }
}

/// `atan2(im, re)`, with the argument of zero defined as `0`.
pub fn argument(z: Qbit) -> f64 {
    if z.re == 0.0 && z.im == 0.0 {
        0.0
    } else {
        z.im.atan2(z.re)
    }
}

pub fn is_finite(z: Qbit) -> bool {
    z.re.is_finite() && z.im.is_finite()
}

/// Short human readable form, e.g. `0.7071`, `-0.5i`, `0.5+0.5i`.
pub fn format_complex(z: Qbit) -> String {
    fn trim(v: f64) -> f64 {
        let rounded = (v * 1e4).round() / 1e4;
        if rounded == 0.0 {
            0.0
        } else {
            rounded
        }
    }

    let re = trim(z.re);
    let im = trim(z.im);
    let mut out = String::new();

    match (re != 0.0, im != 0.0) {
        (false, false) => out.push('0'),
        (true, false) => {
            let _ = write!(out, "{}", re);
        }
        (false, true) => {
            let _ = write!(out, "{}i", im);
        }
        (true, true) => {
            let sign = if im < 0.0 { '-' } else { '+' };
            let _ = write!(out, "{}{}{}i", re, sign, im.abs());
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

    use num_complex::Complex;

    use super::*;
    use crate::assert_approx_eq;

    #[test]
    fn test_zero_has_zero_polar_form() {
        assert_eq!(0.0, magnitude(Complex::ZERO));
        assert_eq!(0.0, argument(Complex::ZERO));
    }

    #[test]
    fn test_polar_form() {
        assert_approx_eq!(1.0, magnitude(Complex::I));
        assert_approx_eq!(FRAC_PI_2, argument(Complex::I));
        assert_approx_eq!(PI, argument(Complex::new(-1.0, 0.0)));
        assert_approx_eq!(FRAC_PI_4, argument(Complex::new(1.0, 1.0)));
        assert_approx_eq!(2f64.sqrt(), magnitude(Complex::new(1.0, 1.0)));
    }

    #[test]
    fn test_arithmetic_comes_from_num_complex() {
        let a = Complex::new(1.0, 2.0);
        let b = Complex::new(3.0, -1.0);

        assert_eq!(Complex::new(4.0, 1.0), a + b);
        assert_eq!(Complex::new(-2.0, 3.0), a - b);
        assert_eq!(Complex::new(5.0, 5.0), a * b);
        assert_eq!(Complex::new(1.0, -2.0), a.conj());
        assert_eq!(Complex::new(0.5, 1.0), a.scale(0.5));
    }

    #[test]
    fn test_format_complex() {
        assert_eq!("0", format_complex(Complex::new(1e-12, -1e-12)));
        assert_eq!("0.7071", format_complex(Complex::new(0.5f64.sqrt(), 0.0)));
        assert_eq!("-0.5i", format_complex(Complex::new(0.0, -0.5)));
        assert_eq!("0.5-0.25i", format_complex(Complex::new(0.5, -0.25)));
        assert_eq!("1+1i", format_complex(Complex::new(1.0, 1.0)));
    }

    #[test]
    fn test_is_finite() {
        assert!(is_finite(Complex::new(1.0, -1.0)));
        assert!(!is_finite(Complex::new(f64::NAN, 0.0)));
        assert!(!is_finite(Complex::new(0.0, f64::INFINITY)));
    }
}
