#[macro_export]
macro_rules! assert_approx_complex_eq {
    ($expected_re:expr, $expected_im:expr, $actual:expr) => {{
        let actual: num_complex::Complex<f64> = $actual;
        let expected = num_complex::Complex::new($expected_re, $expected_im);
        assert!(
            (expected.re - actual.re).abs() < 1e-10 && (expected.im - actual.im).abs() < 1e-10,
            "Expected {},  but got {}",
            expected,
            actual
        );
    }};
}

#[macro_export]
macro_rules! assert_approx_eq {
    ($expected:expr, $actual:expr) => {
        $crate::assert_approx_eq!($expected, $actual, 1e-10)
    };
    ($expected:expr, $actual:expr, $eps:expr) => {{
        let expected: f64 = $expected;
        let actual: f64 = $actual;
        assert!(
            (expected - actual).abs() < $eps,
            "Expected {},  but got {}",
            expected,
            actual
        );
    }};
}
