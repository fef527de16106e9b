use crate::error::{SplineError, SplineResult};

use super::{
    gather_strided, AkimaSpline, BSpline, BesselSpline, ConstantSpline, CubicSpline, HermiteSpline, Interpolant,
    LinearSpline, PchipSpline, QuinticSpline, Samples, Spline, SplineKind,
};

/// Collects options and points, then builds a [Spline] of the requested
/// kind.
/// # Example
/// ```
/// use piecewise_spline::{Interpolant, SplineBuilder, SplineKind};
/// use assert_approx_eq::assert_approx_eq;
///
/// let mut builder = SplineBuilder::new(SplineKind::Pchip).name("speed");
/// builder.push_back(0.0, 0.0).unwrap();
/// builder.push_back(1.0, 2.0).unwrap();
/// builder.push_back(2.0, 2.5).unwrap();
/// let spline = builder.build().unwrap();
///
/// assert_eq!(spline.name(), "speed");
/// assert_approx_eq!(spline.eval(1.0).unwrap(), 2.0, 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SplineBuilder {
    kind: SplineKind,
    name: String,
    check_range: bool,
    check_nan: bool,
    ddy0: f64,
    ddyn: f64,
    degree: usize,
    x: Vec<f64>,
    y: Vec<f64>,
    yp: Vec<f64>,
}

impl SplineBuilder {
    pub fn new(kind: SplineKind) -> Self {
        SplineBuilder {
            kind,
            name: kind.name().to_string(),
            check_range: false,
            check_nan: true,
            ddy0: 0.0,
            ddyn: 0.0,
            degree: 3,
            x: Vec::new(),
            y: Vec::new(),
            yp: Vec::new(),
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn check_range(mut self, check_range: bool) -> Self {
        self.check_range = check_range;
        self
    }

    /// Scan derivative data for non finite values after the build (default on).
    pub fn check_nan(mut self, check_nan: bool) -> Self {
        self.check_nan = check_nan;
        self
    }

    /// Curvatures at the ends of a cubic spline.
    pub fn end_conditions(mut self, ddy0: f64, ddyn: f64) -> Self {
        self.ddy0 = ddy0;
        self.ddyn = ddyn;
        self
    }

    /// Degree of a B-spline (default 3).
    pub fn degree(mut self, degree: usize) -> Self {
        self.degree = degree;
        self
    }

    pub fn kind(&self) -> SplineKind {
        self.kind
    }

    pub fn num_points(&self) -> usize {
        self.x.len()
    }

    /// Appends a sample. The abscissa may repeat the previous one, which
    /// starts a new monotone run, but may not decrease.
    pub fn push_back(&mut self, x: f64, y: f64) -> SplineResult<()> {
        if let Some(&previous) = self.x.last() {
            if x < previous {
                return Err(SplineError::NotIncreasing {
                    previous,
                    x,
                    context: format!("{}::push_back", self.name),
                });
            }
        }
        self.x.push(x);
        self.y.push(y);
        Ok(())
    }

    /// Appends a sample with its slope, for Hermite splines.
    pub fn push_back_with_slope(&mut self, x: f64, y: f64, yp: f64) -> SplineResult<()> {
        self.push_back(x, y)?;
        self.yp.resize(self.x.len() - 1, 0.0);
        self.yp.push(yp);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.x.clear();
        self.y.clear();
        self.yp.clear();
    }

    /// Builds from the appended points.
    pub fn build(&self) -> SplineResult<Spline> {
        let samples = self.samples(self.x.clone(), self.y.clone())?;
        let yp = (self.kind == SplineKind::Hermite).then(|| self.yp.clone());
        self.finish(samples, yp)
    }

    pub fn build_from(&self, x: &[f64], y: &[f64]) -> SplineResult<Spline> {
        self.reject_hermite()?;
        let samples = self.samples(x.to_vec(), y.to_vec())?;
        self.finish(samples, None)
    }

    /// Builds from `x[0], x[incx], ...` and `y[0], y[incy], ...`.
    pub fn build_strided(&self, x: &[f64], incx: usize, y: &[f64], incy: usize, n: usize) -> SplineResult<Spline> {
        self.reject_hermite()?;
        let context = format!("{}::build", self.name);
        let samples = self.samples(
            gather_strided(x, incx, n, &context)?,
            gather_strided(y, incy, n, &context)?,
        )?;
        self.finish(samples, None)
    }

    pub fn build_hermite(&self, x: &[f64], y: &[f64], yp: &[f64]) -> SplineResult<Spline> {
        if self.kind != SplineKind::Hermite {
            return Err(SplineError::Unsupported(format!(
                "slopes can't be supplied to a {} spline",
                self.kind
            )));
        }
        let samples = self.samples(x.to_vec(), y.to_vec())?;
        self.finish(samples, Some(yp.to_vec()))
    }

    fn reject_hermite(&self) -> SplineResult<()> {
        if self.kind == SplineKind::Hermite {
            return Err(SplineError::Unsupported(format!(
                "{}: hermite spline needs slopes, use build_hermite",
                self.name
            )));
        }
        Ok(())
    }

    fn samples(&self, x: Vec<f64>, y: Vec<f64>) -> SplineResult<Samples> {
        Samples::new(self.name.clone(), x, y, 2, &format!("{}::build", self.name))
    }

    fn finish(&self, samples: Samples, yp: Option<Vec<f64>>) -> SplineResult<Spline> {
        let mut spline = match self.kind {
            SplineKind::Constant => Spline::Constant(ConstantSpline::from_samples(samples)?),
            SplineKind::Linear => Spline::Linear(LinearSpline::from_samples(samples)?),
            SplineKind::Cubic => Spline::Cubic(CubicSpline::from_samples(samples, self.ddy0, self.ddyn)?),
            SplineKind::Akima => Spline::Akima(AkimaSpline::from_samples(samples)?),
            SplineKind::Bessel => Spline::Bessel(BesselSpline::from_samples(samples)?),
            SplineKind::Pchip => Spline::Pchip(PchipSpline::from_samples(samples)?),
            SplineKind::Hermite => Spline::Hermite(HermiteSpline::from_samples(samples, yp.unwrap_or_default())?),
            SplineKind::Quintic => Spline::Quintic(QuinticSpline::from_samples(samples)?),
            SplineKind::BSpline => Spline::BSpline(BSpline::from_samples(samples, self.degree)?),
        };
        spline.set_check_range(self.check_range);
        if self.check_nan {
            spline.check_nan()?;
        }
        Ok(spline)
    }
}
