use nalgebra::DVector;

/// Poor man's approx assertion for matrices
#[macro_export]
macro_rules! assert_approx_matrix_eq {
    ($x:expr, $y:expr, abstol = $tol:expr) => {{
        let diff = $x - $y;

        let max_absdiff = diff.abs().max();
        let approx_eq = max_absdiff <= $tol;

        if !approx_eq {
            println!("abstol: {:e}", $tol);
            println!("left: {}", $x);
            println!("right: {}", $y);
            println!("diff: {:e}", diff);
        }
        assert!(approx_eq);
    }};
}

/// Asserts that a `Result` is an `Err` matching the given pattern.
#[macro_export]
macro_rules! assert_err_matches {
    ($e:expr, $pattern:pat) => {{
        match $e {
            Err($pattern) => {}
            Err(other) => panic!("assert_err_matches!({}) failed: unexpected error {:?}", stringify!($e), other),
            Ok(_) => panic!("assert_err_matches!({}) failed: expected an error", stringify!($e)),
        }
    }};
}

/// `n` equally spaced values from `a` to `b`, both included.
pub fn linspace(a: f64, b: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![a],
        _ => (0..n)
            .map(|i| a + (b - a) * (i as f64) / ((n - 1) as f64))
            .collect(),
    }
}

/// Observed order of convergence between two successive refinements.
pub fn convergence_rate(h_coarse: f64, error_coarse: f64, h_fine: f64, error_fine: f64) -> f64 {
    (error_coarse / error_fine).ln() / (h_coarse / h_fine).ln()
}

/// The vector `[0, 1, ..., n - 1]` as floating point values.
pub fn index_vector(n: usize) -> DVector<f64> {
    DVector::from_fn(n, |i, _| i as f64)
}
