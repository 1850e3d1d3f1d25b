//! Bisection root finding for the solved-yield helpers.

use crate::error::{ReturnsError, ReturnsResult};

/// Default absolute tolerance on the residual.
pub const DEFAULT_TOLERANCE: f64 = 1e-6;

/// Default iteration cap.
pub const DEFAULT_MAX_ITERATIONS: u32 = 80;

/// Configuration for [`bisection`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig {
    /// Residual below which the midpoint is accepted.
    pub tolerance: f64,
    /// Maximum number of halvings.
    pub max_iterations: u32,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

/// Outcome of a solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverResult {
    /// The root estimate.
    pub root: f64,
    /// Halvings performed.
    pub iterations: u32,
    /// `f(root)`.
    pub residual: f64,
}

/// Finds a root of `f` inside `[a, b]` by bisection.
///
/// Requires `f(a)` and `f(b)` of opposite sign (or one of them zero). When
/// the iteration cap is reached without meeting the tolerance, the midpoint
/// of the final bracket is returned; after the default 80 halvings it is
/// far below any tolerance that matters for a yield.
///
/// # Errors
///
/// [`ReturnsError::Convergence`] when the root is not bracketed.
///
/// # Example
///
/// ```rust
/// use versified_returns::solver::{bisection, SolverConfig};
///
/// let result = bisection(|x| x * x - 2.0, 1.0, 2.0, &SolverConfig::default()).unwrap();
/// assert!((result.root - std::f64::consts::SQRT_2).abs() < 1e-6);
/// ```
pub fn bisection<F>(f: F, a: f64, b: f64, config: &SolverConfig) -> ReturnsResult<SolverResult>
where
    F: Fn(f64) -> f64,
{
    let mut lo = a.min(b);
    let mut hi = a.max(b);
    let mut f_lo = f(lo);
    let f_hi = f(hi);

    if !(f_lo * f_hi <= 0.0) {
        return Err(ReturnsError::convergence(
            0,
            format!("root not bracketed in [{lo}, {hi}]: f = {f_lo}, {f_hi}"),
        ));
    }

    for iteration in 0..config.max_iterations {
        let mid = (lo + hi) / 2.0;
        let f_mid = f(mid);

        if f_mid.abs() < config.tolerance {
            return Ok(SolverResult {
                root: mid,
                iterations: iteration + 1,
                residual: f_mid,
            });
        }

        if f_lo * f_mid <= 0.0 {
            hi = mid;
        } else {
            lo = mid;
            f_lo = f_mid;
        }
    }

    let mid = (lo + hi) / 2.0;
    Ok(SolverResult {
        root: mid,
        iterations: config.max_iterations,
        residual: f(mid),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sqrt_2() {
        let result = bisection(|x| x * x - 2.0, 1.0, 2.0, &SolverConfig::default()).unwrap();
        assert_relative_eq!(result.root, std::f64::consts::SQRT_2, epsilon = 1e-6);
    }

    #[test]
    fn test_reversed_bracket() {
        let result = bisection(|x| x * x - 2.0, 2.0, 1.0, &SolverConfig::default()).unwrap();
        assert_relative_eq!(result.root, std::f64::consts::SQRT_2, epsilon = 1e-6);
    }

    #[test]
    fn test_invalid_bracket() {
        let result = bisection(|x| x * x - 2.0, 2.0, 3.0, &SolverConfig::default());
        assert!(matches!(result, Err(ReturnsError::Convergence { .. })));
    }

    #[test]
    fn test_nan_is_not_bracketed() {
        let result = bisection(|_| f64::NAN, 0.0, 1.0, &SolverConfig::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_iteration_cap_returns_midpoint() {
        let config = SolverConfig {
            tolerance: 0.0,
            max_iterations: 3,
        };
        let result = bisection(|x| x - 0.3, 0.0, 1.0, &config).unwrap();
        assert_eq!(result.iterations, 3);
        assert_relative_eq!(result.root, 0.3125);
    }
}
