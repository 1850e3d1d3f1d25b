//! Solved yields and spreads over a government curve.
//!
//! These are comparison figures next to the closed-form approximation the
//! estimator reports. They work in `f64` on a simplified bond: a whole
//! number of equal periods, `max(1, round(years * frequency))`, paying the
//! coupon each period and the notional with the last one. Rates go in and
//! come out in percent.

use serde::{Deserialize, Serialize};

use versified_core::types::Frequency;

use crate::error::{ReturnsError, ReturnsResult};
use crate::solver::{bisection, SolverConfig};

/// Initial spread bracket in percent.
const SPREAD_BRACKET: (f64, f64) = (-5.0, 10.0);

/// How far the upper spread bound moves per widening step, in percent.
const SPREAD_WIDENING_STEP: f64 = 10.0;

/// Widening steps tried before giving up.
const SPREAD_WIDENING_ATTEMPTS: u32 = 6;

/// Yield bracket for the solved YTM, as annual fractions.
const YIELD_BRACKET: (f64, f64) = (-0.99, 2.0);

/// One government benchmark point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    /// Years to maturity.
    pub years: f64,
    /// Yield in percent.
    #[serde(rename = "yield")]
    pub yield_pct: f64,
}

impl CurvePoint {
    /// Creates a point.
    #[must_use]
    pub fn new(years: f64, yield_pct: f64) -> Self {
        Self { years, yield_pct }
    }
}

/// A government yield curve built from benchmark bonds.
///
/// Interpolation is linear between the two points bracketing the target
/// maturity. Outside the curve the nearest two points are extended.
///
/// # Example
///
/// ```rust
/// use versified_returns::curve::{CurvePoint, GovernmentCurve};
///
/// let curve = GovernmentCurve::new(vec![
///     CurvePoint::new(4.0, 2.0),
///     CurvePoint::new(2.0, 1.5),
/// ])
/// .unwrap();
///
/// assert!((curve.yield_at(3.0) - 1.75).abs() < 1e-12);
/// assert!((curve.yield_at(6.0) - 2.5).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<CurvePoint>", into = "Vec<CurvePoint>")]
pub struct GovernmentCurve {
    points: Vec<CurvePoint>,
}

impl GovernmentCurve {
    /// Builds a curve; points are sorted by maturity.
    ///
    /// # Errors
    ///
    /// [`ReturnsError::InvalidBondData`] with fewer than two points or a
    /// non-finite value.
    pub fn new(mut points: Vec<CurvePoint>) -> ReturnsResult<Self> {
        if points.len() < 2 {
            return Err(ReturnsError::invalid_bond_data(
                "curve",
                format!("need at least two points, got {}", points.len()),
            ));
        }
        if points
            .iter()
            .any(|p| !p.years.is_finite() || !p.yield_pct.is_finite())
        {
            return Err(ReturnsError::invalid_bond_data(
                "curve",
                "points must be finite numbers",
            ));
        }
        points.sort_by(|a, b| a.years.total_cmp(&b.years));
        Ok(Self { points })
    }

    /// The points in ascending maturity order.
    #[must_use]
    pub fn points(&self) -> &[CurvePoint] {
        &self.points
    }

    /// The two points used to interpolate at `years`.
    ///
    /// The first two below the curve, the last two above it, otherwise the
    /// first point at or beyond `years` and its predecessor.
    #[must_use]
    pub fn bracket(&self, years: f64) -> (CurvePoint, CurvePoint) {
        let pts = &self.points;
        let n = pts.len();
        if years <= pts[0].years {
            return (pts[0], pts[1]);
        }
        if years >= pts[n - 1].years {
            return (pts[n - 2], pts[n - 1]);
        }
        let idx = pts
            .iter()
            .position(|p| p.years >= years)
            .unwrap_or(n - 1)
            .max(1);
        (pts[idx - 1], pts[idx])
    }

    /// Interpolated yield in percent at `years`.
    #[must_use]
    pub fn yield_at(&self, years: f64) -> f64 {
        let (low, high) = self.bracket(years);
        line_through(low, high, years)
    }
}

impl TryFrom<Vec<CurvePoint>> for GovernmentCurve {
    type Error = ReturnsError;

    fn try_from(points: Vec<CurvePoint>) -> Result<Self, Self::Error> {
        Self::new(points)
    }
}

impl From<GovernmentCurve> for Vec<CurvePoint> {
    fn from(curve: GovernmentCurve) -> Self {
        curve.points
    }
}

fn line_through(low: CurvePoint, high: CurvePoint, years: f64) -> f64 {
    if high.years == low.years {
        return low.yield_pct;
    }
    let weight = (years - low.years) / (high.years - low.years);
    low.yield_pct + weight * (high.yield_pct - low.yield_pct)
}

/// Number of whole coupon periods used to approximate a horizon.
#[must_use]
pub fn estimate_periods(years: f64, frequency: Frequency) -> u32 {
    let periods = (years * f64::from(frequency.periods_per_year())).round();
    if periods < 1.0 {
        1
    } else {
        periods as u32
    }
}

fn check_inputs(price: f64, years: f64) -> ReturnsResult<()> {
    if !(price > 0.0) {
        return Err(ReturnsError::invalid_bond_data(
            "price",
            format!("must be positive, got {price}"),
        ));
    }
    if !(years > 0.0) {
        return Err(ReturnsError::invalid_bond_data(
            "years",
            format!("must be positive, got {years}"),
        ));
    }
    Ok(())
}

/// Solves the annual yield, in percent, at which the simplified bond's
/// periodic cash flows are worth `price`.
///
/// # Arguments
///
/// * `price` - Price of the position, in the same units as `notional`
/// * `coupon_rate_pct` - Annual coupon in percent
/// * `years` - Years to maturity
/// * `frequency` - Coupon frequency
/// * `notional` - Redemption amount
///
/// # Errors
///
/// [`ReturnsError::InvalidBondData`] for non-positive inputs and
/// [`ReturnsError::Convergence`] when no yield in [-99%, 200%] matches.
pub fn solve_yield_to_maturity(
    price: f64,
    coupon_rate_pct: f64,
    years: f64,
    frequency: Frequency,
    notional: f64,
) -> ReturnsResult<f64> {
    check_inputs(price, years)?;
    if !(notional > 0.0) {
        return Err(ReturnsError::invalid_bond_data(
            "notional",
            format!("must be positive, got {notional}"),
        ));
    }

    let freq = f64::from(frequency.periods_per_year());
    let periods = estimate_periods(years, frequency) as i32;
    let coupon = coupon_rate_pct / 100.0 * notional / freq;

    let present_value = |rate: f64| {
        let per_rate = 1.0 + rate / freq;
        let coupons: f64 = (1..=periods).map(|i| coupon / per_rate.powi(i)).sum();
        coupons + notional / per_rate.powi(periods)
    };

    let result = bisection(
        |rate| present_value(rate) - price,
        YIELD_BRACKET.0,
        YIELD_BRACKET.1,
        &SolverConfig::default(),
    )?;

    log::debug!(
        "solved yield {:.6}% after {} iterations",
        result.root * 100.0,
        result.iterations
    );
    Ok(result.root * 100.0)
}

/// Constant spread, in basis points, over the government curve that prices
/// the simplified bond at `price`.
///
/// `price` is in percent of face. Every cash flow is discounted annually at
/// the curve yield for its time plus the spread, where the curve yield is
/// taken on the line through the two benchmarks bracketing the bond's own
/// maturity.
///
/// # Errors
///
/// [`ReturnsError::InvalidBondData`] for non-positive inputs and
/// [`ReturnsError::Convergence`] when no spread can be bracketed, even after
/// widening the upper bound.
pub fn gov_spread_bps(
    price: f64,
    coupon_rate_pct: f64,
    years: f64,
    frequency: Frequency,
    curve: &GovernmentCurve,
) -> ReturnsResult<f64> {
    check_inputs(price, years)?;

    const NOTIONAL: f64 = 100.0;
    let freq = f64::from(frequency.periods_per_year());
    let periods = estimate_periods(years, frequency);
    let coupon = coupon_rate_pct / 100.0 * NOTIONAL / freq;
    let trade_value = price / 100.0 * NOTIONAL;

    let cashflows: Vec<(f64, f64)> = (1..=periods)
        .map(|i| {
            let amount = if i == periods { coupon + NOTIONAL } else { coupon };
            (f64::from(i) / freq, amount)
        })
        .collect();

    let (low, high) = curve.bracket(years);
    let residual = |spread: f64| {
        let pv: f64 = cashflows
            .iter()
            .map(|(t, amount)| {
                let rate = (line_through(low, high, *t) + spread) / 100.0;
                amount / (1.0 + rate).powf(*t)
            })
            .sum();
        pv - trade_value
    };

    let (lower, mut upper) = SPREAD_BRACKET;
    let f_lower = residual(lower);
    let mut attempts = 0;
    while f_lower * residual(upper) > 0.0 && attempts < SPREAD_WIDENING_ATTEMPTS {
        upper += SPREAD_WIDENING_STEP;
        attempts += 1;
    }
    if attempts > 0 {
        log::debug!("widened spread bracket to [{lower}, {upper}] after {attempts} steps");
    }

    let result = bisection(residual, lower, upper, &SolverConfig::default())?;
    Ok(result.root * 100.0)
}
