use crate::{
    error::{SplineError, SplineResult},
    search::IntervalCursor,
};

/// Clamped knot vector of a B-spline of fixed degree.
///
/// Holds `n + degree + 1` knots for `n` basis functions: `degree + 1` copies
/// of each end abscissa around the interior knots. The span of a point is
/// found with the same cached search used by the splines.
#[derive(Debug, Clone, PartialEq)]
pub struct KnotVector {
    degree: usize,
    knots: Vec<f64>,
    cursor: IntervalCursor,
}

impl KnotVector {
    /// Knots of the interpolating B-spline through the abscissae `x`: each
    /// interior knot is the average of `degree` consecutive abscissae.
    /// # Example
    /// ```
    /// use piecewise_spline::KnotVector;
    ///
    /// let knots = KnotVector::averaged(&[0.0, 1.0, 2.0, 4.0], 2).unwrap();
    /// assert_eq!(knots.knots(), &[0.0, 0.0, 0.0, 1.5, 4.0, 4.0, 4.0]);
    /// assert_eq!(knots.num_bases(), 4);
    /// ```
    pub fn averaged(x: &[f64], degree: usize) -> SplineResult<Self> {
        if degree == 0 {
            return Err(SplineError::invalid("degree must be at least 1", "KnotVector::averaged"));
        }
        let n = x.len();
        if n < degree + 1 {
            return Err(SplineError::insufficient(degree + 1, n, "KnotVector::averaged"));
        }
        let mut knots = vec![x[0]; degree + 1];
        knots.extend((0..n - degree - 1).map(|j| x[j + 1..=j + degree].iter().sum::<f64>() / degree as f64));
        knots.extend(std::iter::repeat(x[n - 1]).take(degree + 1));
        Ok(KnotVector {
            degree,
            knots,
            cursor: IntervalCursor::new(),
        })
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    pub fn knots(&self) -> &[f64] {
        &self.knots
    }

    /// Number of basis functions, which is also the size of a control polygon.
    pub fn num_bases(&self) -> usize {
        self.knots.len() - self.degree - 1
    }

    /// Index `s` with `knots[s] <= x <= knots[s + 1]` and
    /// `degree <= s < num_bases`. Points outside the knots are clamped.
    pub fn span(&self, x: f64) -> usize {
        let active = &self.knots[self.degree..=self.num_bases()];
        self.degree + self.cursor.find(x, active)
    }

    /// The `degree + 1` basis functions that do not vanish on `span`, i.e.
    /// `N[span - degree] ..= N[span]` evaluated at `x`.
    pub fn basis_functions(&self, span: usize, x: f64) -> Vec<f64> {
        basis_functions(&self.knots, self.degree, span, x)
    }

    /// Derivatives of order `order` of the non vanishing basis functions.
    pub fn basis_derivatives(&self, span: usize, x: f64, order: usize) -> Vec<f64> {
        basis_derivatives(&self.knots, self.degree, span, x, order)
    }

    /// Derivative of order `order` of the B-spline with control polygon
    /// `control` at `x`. No extrapolation policy is applied: outside the knots
    /// the boundary polynomial piece is continued.
    pub fn evaluate(&self, control: &[f64], x: f64, order: usize) -> f64 {
        self.evaluate_in_span(control, self.span(x), x, order)
    }

    pub(crate) fn evaluate_in_span(&self, control: &[f64], span: usize, x: f64, order: usize) -> f64 {
        let p = self.degree;
        if order > p {
            return 0.0;
        }
        let u = &self.knots;
        let mut c: Vec<f64> = control[span - p..=span].to_vec();
        // control polygon of the derivative, one level per order
        for m in 1..=order {
            for j in 0..=p - m {
                let i = span - p + j;
                let den = u[i + p + 1] - u[i + m];
                c[j] = if den > 0.0 {
                    (p - m + 1) as f64 * (c[j + 1] - c[j]) / den
                } else {
                    0.0
                };
            }
        }
        de_boor(&u[order..u.len() - order], p - order, span - order, x, &mut c[..=p - order])
    }

    /// Applies `x -> origin + (x - from) * scale` to every knot.
    pub(crate) fn remap(&mut self, from: f64, origin: f64, scale: f64) {
        self.knots.iter_mut().for_each(|k| *k = origin + (*k - from) * scale);
        self.cursor.reset();
    }
}

/// Cox–de Boor triangle for the `degree + 1` bases that are non zero on
/// `span`.
fn basis_functions(knots: &[f64], degree: usize, span: usize, x: f64) -> Vec<f64> {
    let mut n = vec![0.0; degree + 1];
    let mut left = vec![0.0; degree + 1];
    let mut right = vec![0.0; degree + 1];
    n[0] = 1.0;
    for j in 1..=degree {
        left[j] = x - knots[span + 1 - j];
        right[j] = knots[span + j] - x;
        let mut saved = 0.0;
        for r in 0..j {
            let den = right[r + 1] + left[j - r];
            let temp = if den != 0.0 { n[r] / den } else { 0.0 };
            n[r] = saved + right[r + 1] * temp;
            saved = left[j - r] * temp;
        }
        n[j] = saved;
    }
    n
}

/// Derivatives through the degree reduction formula
/// `N'[i,p] = p (N[i,p-1] / (u[i+p] - u[i]) - N[i+1,p-1] / (u[i+p+1] - u[i+1]))`.
fn basis_derivatives(knots: &[f64], degree: usize, span: usize, x: f64, order: usize) -> Vec<f64> {
    if order == 0 {
        return basis_functions(knots, degree, span, x);
    }
    if order > degree {
        return vec![0.0; degree + 1];
    }
    let lower = basis_derivatives(knots, degree - 1, span, x, order - 1);
    let p = degree as f64;
    let ratio = |value: f64, den: f64| if den > 0.0 { value / den } else { 0.0 };
    (0..=degree)
        .map(|j| {
            let i = span - degree + j;
            let a = if j > 0 { ratio(lower[j - 1], knots[i + degree] - knots[i]) } else { 0.0 };
            let b = if j < degree { ratio(lower[j], knots[i + degree + 1] - knots[i + 1]) } else { 0.0 };
            p * (a - b)
        })
        .collect()
}

/// De Boor's algorithm on the local control points `c` of `span`.
fn de_boor(knots: &[f64], degree: usize, span: usize, x: f64, c: &mut [f64]) -> f64 {
    for r in 1..=degree {
        for j in (r..=degree).rev() {
            let i = span - degree + j;
            let den = knots[i + degree + 1 - r] - knots[i];
            let alpha = if den > 0.0 { (x - knots[i]) / den } else { 0.0 };
            c[j] = (1.0 - alpha) * c[j - 1] + alpha * c[j];
        }
    }
    c[degree]
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;

    use super::*;

    #[test]
    fn averaged_knots() {
        let knots = KnotVector::averaged(&[0.0, 1.0, 2.0, 3.0, 4.0, 5.0], 3).unwrap();
        assert_eq!(knots.knots(), &[0.0, 0.0, 0.0, 0.0, 2.0, 3.0, 5.0, 5.0, 5.0, 5.0]);
        assert_eq!(knots.num_bases(), 6);

        assert!(KnotVector::averaged(&[0.0, 1.0], 0).is_err());
        assert!(KnotVector::averaged(&[0.0, 1.0, 2.0], 3).is_err());
        // a single span
        let knots = KnotVector::averaged(&[0.0, 1.0, 2.0, 3.0], 3).unwrap();
        assert_eq!(knots.knots().len(), 8);
        assert_eq!(knots.span(1.5), 3);
    }

    #[test]
    fn spans() {
        let knots = KnotVector::averaged(&[0.0, 1.0, 2.0, 3.0, 4.0, 5.0], 3).unwrap();
        assert_eq!(knots.span(0.0), 3);
        assert_eq!(knots.span(1.9), 3);
        assert_eq!(knots.span(2.0), 4);
        assert_eq!(knots.span(4.0), 5);
        assert_eq!(knots.span(5.0), 5);
        assert_eq!(knots.span(9.0), 5);
        assert_eq!(knots.span(-1.0), 3);
    }

    #[test]
    fn partition_of_unity() {
        let eps = 1e-12;
        let knots = KnotVector::averaged(&[0.0, 0.5, 1.5, 2.0, 3.5, 4.0, 6.0], 3).unwrap();
        for x in [0.0, 0.3, 1.1, 2.7, 3.9, 6.0] {
            let span = knots.span(x);
            let bases = knots.basis_functions(span, x);
            assert_approx_eq!(bases.iter().sum::<f64>(), 1.0, eps);
            assert!(bases.iter().all(|b| *b >= -eps));
            let derivative: f64 = knots.basis_derivatives(span, x, 1).iter().sum();
            assert_approx_eq!(derivative, 0.0, eps);
        }
    }

    #[test]
    fn derivatives_match_finite_differences() {
        let knots = KnotVector::averaged(&[0.0, 0.7, 1.5, 2.0, 3.0, 4.2], 3).unwrap();
        let control = vec![1.0, -2.0, 0.5, 3.0, 2.0, -1.0];
        let h = 1e-5;
        for x in [0.4, 1.2, 2.6, 3.3] {
            let span = knots.span(x);
            for order in 1..=3 {
                let fd = (knots.evaluate_in_span(&control, span, x + h, order - 1)
                    - knots.evaluate_in_span(&control, span, x - h, order - 1))
                    / (2.0 * h);
                assert_approx_eq!(knots.evaluate(&control, x, order), fd, 1e-5);

                let bases = knots.basis_derivatives(span, x, order);
                let from_bases: f64 = bases
                    .iter()
                    .enumerate()
                    .map(|(j, b)| b * control[span - 3 + j])
                    .sum();
                assert_approx_eq!(from_bases, knots.evaluate(&control, x, order), 1e-9);
            }
            assert_eq!(knots.evaluate(&control, x, 4), 0.0);
        }
    }

    #[test]
    fn constant_polygon() {
        let eps = 1e-12;
        let knots = KnotVector::averaged(&[0.0, 1.0, 2.0, 3.0, 4.0], 2).unwrap();
        let control = vec![2.5; knots.num_bases()];
        for x in [0.0, 0.5, 2.2, 4.0] {
            assert_approx_eq!(knots.evaluate(&control, x, 0), 2.5, eps);
            assert_approx_eq!(knots.evaluate(&control, x, 1), 0.0, eps);
        }
    }
}
