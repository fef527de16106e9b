use std::fmt;

use nalgebra::{DMatrix, DVector};

use crate::{
    error::{SplineError, SplineResult},
    knot::KnotVector,
    polynomial::{PiecewisePolynomial, Polynomial},
};

use super::{extrapolate_quadratic, write_segments, Interpolant, Samples, SplineKind};

/// Interpolating B-spline of arbitrary degree.
///
/// Knots are the averages of consecutive abscissae, the control polygon is
/// the solution of the banded collocation system. Outside the samples the
/// spline is continued by the quadratic Taylor polynomial at the end points.
/// # Example
/// ```
/// use piecewise_spline::{BSpline, Interpolant};
/// use assert_approx_eq::assert_approx_eq;
///
/// let x = vec![0.0, 1.0, 2.0, 3.0, 4.0];
/// let y = vec![0.0, 1.0, 0.0, 1.0, 0.0];
/// let spline = BSpline::new(&x, &y, 3).unwrap();
///
/// assert_approx_eq!(spline.eval(2.0).unwrap(), 0.0, 1e-12);
/// assert_eq!(spline.order(), 4);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct BSpline {
    samples: Samples,
    knots: KnotVector,
    polygon: Vec<f64>,
    left: [f64; 3],
    right: [f64; 3],
}

impl BSpline {
    pub fn new(x: &[f64], y: &[f64], degree: usize) -> SplineResult<Self> {
        let samples = Samples::new("BSpline", x.to_vec(), y.to_vec(), 2, "BSpline::build")?;
        BSpline::from_samples(samples, degree)
    }

    pub(crate) fn from_samples(samples: Samples, degree: usize) -> SplineResult<Self> {
        let context = format!("{}::build", samples.name);
        if degree == 0 {
            return Err(SplineError::invalid("degree must be at least 1", &context));
        }
        if samples.len() < degree + 1 {
            return Err(SplineError::insufficient(degree + 1, samples.len(), &context));
        }
        if let Some(w) = samples.x.windows(2).find(|w| w[1] <= w[0]) {
            return Err(SplineError::NotIncreasing {
                previous: w[0],
                x: w[1],
                context,
            });
        }
        log::debug!(
            "building bspline `{}` of degree {} on {} points",
            samples.name,
            degree,
            samples.len()
        );

        let knots = KnotVector::averaged(&samples.x, degree)?;
        let polygon = collocate(&knots, &samples.x, &samples.y)?;

        let mut spline = BSpline {
            samples,
            knots,
            polygon,
            left: [0.0; 3],
            right: [0.0; 3],
        };
        spline.update_boundary();
        Ok(spline)
    }

    fn update_boundary(&mut self) {
        let n = self.samples.len();
        let (first, last) = (self.knots.degree(), n - 1);
        let (x0, xn) = (self.samples.x[0], self.samples.x[n - 1]);
        for order in 0..3 {
            self.left[order] = self.knots.evaluate_in_span(&self.polygon, first, x0, order);
            self.right[order] = self.knots.evaluate_in_span(&self.polygon, last, xn, order);
        }
    }

    pub fn degree(&self) -> usize {
        self.knots.degree()
    }

    pub fn knots(&self) -> &KnotVector {
        &self.knots
    }

    /// Control point values solving the interpolation conditions.
    pub fn control_polygon(&self) -> &[f64] {
        &self.polygon
    }

    fn inside(&self, x: f64) -> bool {
        self.x_min() <= x && x <= self.x_max()
    }

    /// All `n` basis functions at `x`, zero outside the samples.
    pub fn bases(&self, x: f64) -> Vec<f64> {
        let mut values = vec![0.0; self.num_points()];
        if self.inside(x) {
            let (first, nonzero) = self.bases_nz(x);
            values[first..first + nonzero.len()].copy_from_slice(&nonzero);
        }
        values
    }

    /// Index of the first non vanishing basis function at `x` and the
    /// `degree + 1` values starting there.
    pub fn bases_nz(&self, x: f64) -> (usize, Vec<f64>) {
        let span = self.knots.span(x);
        let first = span - self.degree();
        if self.inside(x) {
            (first, self.knots.basis_functions(span, x))
        } else {
            (first, vec![0.0; self.degree() + 1])
        }
    }

    /// Derivatives of order `order` of the non vanishing basis functions.
    pub fn bases_nz_d(&self, x: f64, order: usize) -> (usize, Vec<f64>) {
        let span = self.knots.span(x);
        let first = span - self.degree();
        if self.inside(x) {
            (first, self.knots.basis_derivatives(span, x, order))
        } else {
            (first, vec![0.0; self.degree() + 1])
        }
    }

    fn evaluate(&self, x: f64, order: usize) -> SplineResult<f64> {
        self.samples.check(x)?;
        if x >= self.x_max() {
            Ok(extrapolate_quadratic(x - self.x_max(), self.right, order))
        } else if x <= self.x_min() {
            Ok(extrapolate_quadratic(x - self.x_min(), self.left, order))
        } else {
            Ok(self.knots.evaluate(&self.polygon, x, order))
        }
    }
}

/// Solves the collocation system `sum_j N_j(x_i) c_j = y_i`.
fn collocate(knots: &KnotVector, x: &[f64], y: &[f64]) -> SplineResult<Vec<f64>> {
    let n = x.len();
    let d = knots.degree();
    // row i holds columns i - d ..= i + d
    let mut band = vec![vec![0.0; 2 * d + 1]; n];
    for (i, xi) in x.iter().enumerate() {
        let span = knots.span(*xi);
        for (k, value) in knots.basis_functions(span, *xi).into_iter().enumerate() {
            let j = span - d + k;
            if j + d < i || j > i + d {
                return Err(SplineError::invalid(
                    format!("basis {} outside the band of row {}", j, i),
                    "BSpline::build",
                ));
            }
            band[i][j + d - i] = value;
        }
    }
    let mut rhs = y.to_vec();
    if solve_banded(&mut band.clone(), &mut rhs, d) {
        return Ok(rhs);
    }

    log::debug!("banded elimination met a zero pivot, falling back to LU");
    let matrix = DMatrix::from_fn(n, n, |i, j| {
        if j + d >= i && j <= i + d {
            band[i][j + d - i]
        } else {
            0.0
        }
    });
    let rhs = DVector::from_column_slice(y);
    match matrix.lu().solve(&rhs) {
        Some(solution) => Ok(solution.iter().copied().collect()),
        None => Err(SplineError::invalid("singular collocation system", "BSpline::build")),
    }
}

/// Gaussian elimination without pivoting on a band matrix with `d` sub and
/// super diagonals. Returns false on a zero pivot.
fn solve_banded(band: &mut [Vec<f64>], rhs: &mut [f64], d: usize) -> bool {
    let n = rhs.len();
    for i in 0..n {
        let last = (i + d).min(n - 1);
        let pivot = band[i][d];
        if pivot == 0.0 || !pivot.is_finite() {
            return false;
        }
        for j in i..=last {
            band[i][j + d - i] /= pivot;
        }
        rhs[i] /= pivot;
        for k in i + 1..=last {
            let factor = band[k][i + d - k];
            if factor == 0.0 {
                continue;
            }
            band[k][i + d - k] = 0.0;
            for j in i + 1..=last {
                band[k][j + d - k] -= factor * band[i][j + d - i];
            }
            rhs[k] -= factor * rhs[i];
        }
    }
    for i in (0..n).rev() {
        let last = (i + d).min(n - 1);
        for j in i + 1..=last {
            rhs[i] -= band[i][j + d - i] * rhs[j];
        }
    }
    true
}

impl Interpolant for BSpline {
    fn name(&self) -> &str {
        &self.samples.name
    }

    fn kind(&self) -> SplineKind {
        SplineKind::BSpline
    }

    fn order(&self) -> usize {
        self.degree() + 1
    }

    fn x_nodes(&self) -> &[f64] {
        &self.samples.x
    }

    fn y_nodes(&self) -> &[f64] {
        &self.samples.y
    }

    fn eval(&self, x: f64) -> SplineResult<f64> {
        self.evaluate(x, 0)
    }

    fn eval_d(&self, x: f64) -> SplineResult<f64> {
        self.evaluate(x, 1)
    }

    fn eval_dd(&self, x: f64) -> SplineResult<f64> {
        self.evaluate(x, 2)
    }

    fn eval_ddd(&self, x: f64) -> SplineResult<f64> {
        self.evaluate(x, 3)
    }

    /// One piece per non empty knot span, expanded at the left knot.
    fn coeffs(&self) -> SplineResult<PiecewisePolynomial> {
        let d = self.degree();
        let u = self.knots.knots();
        let mut breaks = vec![u[d]];
        let mut pieces = Vec::new();
        for span in d..self.knots.num_bases() {
            if u[span + 1] <= u[span] {
                continue;
            }
            let mut factorial = 1.0;
            let coefficients = (0..=d)
                .map(|m| {
                    if m > 0 {
                        factorial *= m as f64;
                    }
                    self.knots.evaluate_in_span(&self.polygon, span, u[span], m) / factorial
                })
                .collect();
            pieces.push(Polynomial::with_origin(coefficients, u[span]));
            breaks.push(u[span + 1]);
        }
        PiecewisePolynomial::new(breaks, pieces)
    }

    fn check_range(&self) -> bool {
        self.samples.check_range
    }

    fn set_check_range(&mut self, check_range: bool) {
        self.samples.check_range = check_range;
    }

    fn set_origin(&mut self, x0: f64) {
        let from = self.samples.x[0];
        self.samples.set_origin(x0);
        self.knots.remap(from, x0, 1.0);
    }

    fn set_range(&mut self, xmin: f64, xmax: f64) -> SplineResult<()> {
        let from = self.samples.x[0];
        let scale = self.samples.set_range(xmin, xmax)?;
        self.knots.remap(from, xmin, scale);
        for jet in [&mut self.left, &mut self.right] {
            jet[1] /= scale;
            jet[2] /= scale * scale;
        }
        Ok(())
    }
}

impl fmt::Display for BSpline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_segments(f, &self.samples, &[])
    }
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;
    use rstest::rstest;

    use super::*;

    fn samples() -> (Vec<f64>, Vec<f64>) {
        let x = vec![0.0, 0.4, 1.0, 1.7, 2.5, 3.0, 4.2, 5.0];
        let y = x.iter().map(|v: &f64| v.sin() + 0.1 * v).collect();
        (x, y)
    }

    #[rstest]
    #[case(1)]
    #[case(2)]
    #[case(3)]
    #[case(5)]
    fn interpolates_samples(#[case] degree: usize) {
        let eps = 1e-10;
        let (x, y) = samples();
        let spline = BSpline::new(&x, &y, degree).unwrap();
        assert_eq!(spline.control_polygon().len(), x.len());
        for (xi, yi) in x.iter().zip(y.iter()) {
            assert_approx_eq!(spline.eval(*xi).unwrap(), *yi, eps);
        }
    }

    #[test]
    fn reproduces_polynomials_of_its_degree() {
        let eps = 1e-9;
        let f = |x: f64| 1.0 - x + 0.5 * x * x - 0.1 * x * x * x;
        let df = |x: f64| -1.0 + x - 0.3 * x * x;
        let (x, _) = samples();
        let y: Vec<f64> = x.iter().map(|&v| f(v)).collect();
        let spline = BSpline::new(&x, &y, 3).unwrap();

        for at in [0.2, 1.3, 2.2, 4.7] {
            assert_approx_eq!(spline.eval(at).unwrap(), f(at), eps);
            assert_approx_eq!(spline.eval_d(at).unwrap(), df(at), eps);
            assert_approx_eq!(spline.eval_ddd(at).unwrap(), -0.6, 1e-8);
        }
        let coeffs = spline.coeffs().unwrap();
        assert_eq!(coeffs.order(), 4);
        assert_approx_eq!(coeffs.evaluate(3.3), f(3.3), eps);
    }

    #[test]
    fn bases() {
        let eps = 1e-12;
        let (x, y) = samples();
        let spline = BSpline::new(&x, &y, 3).unwrap();

        for at in [0.0, 0.9, 2.5, 5.0] {
            let bases = spline.bases(at);
            assert_eq!(bases.len(), x.len());
            assert_approx_eq!(bases.iter().sum::<f64>(), 1.0, eps);
            let value: f64 = bases.iter().zip(spline.control_polygon()).map(|(b, c)| b * c).sum();
            assert_approx_eq!(value, spline.eval(at).unwrap(), eps);

            let (first, nonzero) = spline.bases_nz(at);
            assert_eq!(nonzero.len(), 4);
            assert_eq!(&bases[first..first + 4], &nonzero[..]);
        }
        assert!(spline.bases(6.0).iter().all(|b| *b == 0.0));
        let (_, derivatives) = spline.bases_nz_d(1.0, 1);
        assert_approx_eq!(derivatives.iter().sum::<f64>(), 0.0, eps);
    }

    #[test]
    fn quadratic_extrapolation() {
        let eps = 1e-9;
        let (x, y) = samples();
        let spline = BSpline::new(&x, &y, 3).unwrap();
        let (v, d, dd) = (
            spline.eval(5.0).unwrap(),
            spline.eval_d(5.0).unwrap(),
            spline.eval_dd(5.0).unwrap(),
        );
        assert_approx_eq!(spline.eval(6.0).unwrap(), v + d + 0.5 * dd, eps);
        assert_eq!(spline.eval_ddd(6.0).unwrap(), 0.0);
        assert_approx_eq!(spline.eval(0.0).unwrap(), y[0], eps);
    }

    #[test]
    fn rejects_bad_input() {
        assert!(BSpline::new(&[0.0, 1.0, 2.0], &[0.0; 3], 0).is_err());
        assert!(matches!(
            BSpline::new(&[0.0, 1.0, 2.0], &[0.0; 3], 3),
            Err(SplineError::InsufficientData { required: 4, .. })
        ));
        assert!(matches!(
            BSpline::new(&[0.0, 1.0, 1.0, 2.0], &[0.0; 4], 1),
            Err(SplineError::NotIncreasing { .. })
        ));
    }

    #[test]
    fn set_range_keeps_shape() {
        let eps = 1e-9;
        let (x, y) = samples();
        let mut spline = BSpline::new(&x, &y, 3).unwrap();
        let before = (spline.eval(2.0).unwrap(), spline.eval_d(2.0).unwrap(), spline.eval_d(6.0).unwrap());

        spline.set_range(0.0, 10.0).unwrap();
        assert_approx_eq!(spline.eval(4.0).unwrap(), before.0, eps);
        assert_approx_eq!(spline.eval_d(4.0).unwrap(), before.1 / 2.0, eps);
        assert_approx_eq!(spline.eval_d(12.0).unwrap(), before.2 / 2.0, eps);

        spline.set_origin(-10.0);
        assert_approx_eq!(spline.eval(-6.0).unwrap(), before.0, eps);
    }
}
