use crate::{
    error::{SplineError, SplineResult},
    roots::{cubic_roots, quadratic_roots, Roots},
    search::IntervalCursor,
};

/// Polynomial written in the local coordinate `t = x - origin`:
/// `c[0] + c[1] t + c[2] t^2 + ...`.
#[derive(Debug, Clone, PartialEq)]
pub struct Polynomial {
    coefficients: Vec<f64>,
    origin: f64,
}

impl Polynomial {
    pub fn new(coefficients: Vec<f64>) -> Self {
        Polynomial { coefficients, origin: 0.0 }
    }

    pub fn with_origin(coefficients: Vec<f64>, origin: f64) -> Self {
        Polynomial { coefficients, origin }
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    pub fn origin(&self) -> f64 {
        self.origin
    }

    /// Number of coefficients.
    pub fn order(&self) -> usize {
        self.coefficients.len()
    }

    pub fn evaluate(&self, x: f64) -> f64 {
        let t = x - self.origin;
        self.coefficients.iter().rev().fold(0.0, |acc, c| acc * t + c)
    }

    pub fn derivative(&self) -> Polynomial {
        let coefficients = self
            .coefficients
            .iter()
            .enumerate()
            .skip(1)
            .map(|(power, c)| power as f64 * c)
            .collect();
        Polynomial { coefficients, origin: self.origin }
    }

    /// Roots in the global coordinate `x`. Only degrees up to 3 are supported.
    pub fn roots(&self) -> SplineResult<Roots> {
        let c = |i: usize| self.coefficients.get(i).copied().unwrap_or(0.0);
        if self.coefficients.len() > 4 && self.coefficients[4..].iter().any(|c| *c != 0.0) {
            return Err(SplineError::Unsupported(format!(
                "roots of a polynomial with {} coefficients",
                self.coefficients.len()
            )));
        }
        let local = if c(3) == 0.0 {
            quadratic_roots(&[c(0), c(1), c(2)])
        } else {
            cubic_roots(&[c(0), c(1), c(2), c(3)])
        };
        Ok(local.shifted(self.origin))
    }
}

/// Piecewise polynomial representation of a spline: `pieces[i]` is valid on
/// `[breaks[i], breaks[i+1]]` and the end pieces are continued outside.
#[derive(Debug, Clone, PartialEq)]
pub struct PiecewisePolynomial {
    breaks: Vec<f64>,
    pieces: Vec<Polynomial>,
    cursor: IntervalCursor,
}

impl PiecewisePolynomial {
    pub fn new(breaks: Vec<f64>, pieces: Vec<Polynomial>) -> SplineResult<Self> {
        if pieces.is_empty() {
            return Err(SplineError::insufficient(1, 0, "PiecewisePolynomial::new"));
        }
        if breaks.len() != pieces.len() + 1 {
            return Err(SplineError::shape(
                pieces.len() + 1,
                breaks.len(),
                "PiecewisePolynomial::new",
            ));
        }
        Ok(PiecewisePolynomial {
            breaks,
            pieces,
            cursor: IntervalCursor::new(),
        })
    }

    pub fn breaks(&self) -> &[f64] {
        &self.breaks
    }

    pub fn pieces(&self) -> &[Polynomial] {
        &self.pieces
    }

    /// Largest number of coefficients among the pieces.
    pub fn order(&self) -> usize {
        self.pieces.iter().map(Polynomial::order).max().unwrap_or(0)
    }

    pub fn evaluate(&self, x: f64) -> f64 {
        let index = self.cursor.find(x, &self.breaks);
        self.pieces[index].evaluate(x)
    }
}
