//! Interpolants of samples `z(x[i], y[j])` on a rectangular grid.
//!
//! Every variant implements [Surface] and is collected in the
//! [SurfaceSpline] sum type built by a [SurfaceBuilder].

use std::{fmt, io, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    error::{check_nan, SplineError, SplineResult},
    search::IntervalCursor,
};

mod akima2d;
mod bicubic;
mod bicubic_base;
mod bilinear;
mod biquintic;

pub use akima2d::Akima2DSpline;
pub use bicubic::BiCubicSpline;
pub use bilinear::BilinearSpline;
pub use biquintic::BiQuinticSpline;

/// Type tag of a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SurfaceKind {
    Bilinear,
    BiCubic,
    Akima2D,
    BiQuintic,
}

impl SurfaceKind {
    pub const ALL: [SurfaceKind; 4] = [
        SurfaceKind::Bilinear,
        SurfaceKind::BiCubic,
        SurfaceKind::Akima2D,
        SurfaceKind::BiQuintic,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SurfaceKind::Bilinear => "bilinear",
            SurfaceKind::BiCubic => "bicubic",
            SurfaceKind::Akima2D => "akima2d",
            SurfaceKind::BiQuintic => "biquintic",
        }
    }
}

impl fmt::Display for SurfaceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SurfaceKind {
    type Err = SplineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        SurfaceKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == lower)
            .ok_or(SplineError::UnknownKind(s.to_string()))
    }
}

/// Evaluation contract shared by every surface.
///
/// `d` returns `[z, Dx, Dy]` and `dd` returns `[z, Dx, Dy, Dxx, Dxy, Dyy]`.
/// Outside the grid the boundary patch is continued.
pub trait Surface {
    fn name(&self) -> &str;

    fn kind(&self) -> SurfaceKind;

    fn x_nodes(&self) -> &[f64];

    fn y_nodes(&self) -> &[f64];

    /// Samples in row major order, `z[i * ny + j] = z(x[i], y[j])`.
    fn z_nodes(&self) -> &[f64];

    fn z_min(&self) -> f64;

    fn z_max(&self) -> f64;

    fn check_range(&self) -> bool;

    fn set_check_range(&mut self, check_range: bool);

    fn eval(&self, x: f64, y: f64) -> SplineResult<f64>;

    fn dx(&self, x: f64, y: f64) -> SplineResult<f64>;

    fn dy(&self, x: f64, y: f64) -> SplineResult<f64>;

    fn dxx(&self, x: f64, y: f64) -> SplineResult<f64>;

    fn dxy(&self, x: f64, y: f64) -> SplineResult<f64>;

    fn dyy(&self, x: f64, y: f64) -> SplineResult<f64>;

    fn d(&self, x: f64, y: f64) -> SplineResult<[f64; 3]> {
        Ok([self.eval(x, y)?, self.dx(x, y)?, self.dy(x, y)?])
    }

    fn dd(&self, x: f64, y: f64) -> SplineResult<[f64; 6]> {
        Ok([
            self.eval(x, y)?,
            self.dx(x, y)?,
            self.dy(x, y)?,
            self.dxx(x, y)?,
            self.dxy(x, y)?,
            self.dyy(x, y)?,
        ])
    }

    fn eval_d_1(&self, x: f64, y: f64) -> SplineResult<f64> {
        self.dx(x, y)
    }

    fn eval_d_2(&self, x: f64, y: f64) -> SplineResult<f64> {
        self.dy(x, y)
    }

    fn eval_d_1_1(&self, x: f64, y: f64) -> SplineResult<f64> {
        self.dxx(x, y)
    }

    fn eval_d_1_2(&self, x: f64, y: f64) -> SplineResult<f64> {
        self.dxy(x, y)
    }

    fn eval_d_2_2(&self, x: f64, y: f64) -> SplineResult<f64> {
        self.dyy(x, y)
    }

    fn num_x(&self) -> usize {
        self.x_nodes().len()
    }

    fn num_y(&self) -> usize {
        self.y_nodes().len()
    }

    fn x_node(&self, i: usize) -> Option<f64> {
        self.x_nodes().get(i).copied()
    }

    fn y_node(&self, j: usize) -> Option<f64> {
        self.y_nodes().get(j).copied()
    }

    fn z_node(&self, i: usize, j: usize) -> Option<f64> {
        if i < self.num_x() && j < self.num_y() {
            self.z_nodes().get(i * self.num_y() + j).copied()
        } else {
            None
        }
    }

    fn x_min(&self) -> f64 {
        self.x_nodes().first().copied().unwrap_or(f64::NAN)
    }

    fn x_max(&self) -> f64 {
        self.x_nodes().last().copied().unwrap_or(f64::NAN)
    }

    fn y_min(&self) -> f64 {
        self.y_nodes().first().copied().unwrap_or(f64::NAN)
    }

    fn y_max(&self) -> f64 {
        self.y_nodes().last().copied().unwrap_or(f64::NAN)
    }

    fn info(&self, out: &mut dyn io::Write) -> io::Result<()> {
        writeln!(out, "Bivariate spline [{}] of type = {}", self.name(), self.kind())
    }
}

/// Grid direction of a one dimensional pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Axis {
    X,
    Y,
}

/// Strictly increasing axes, row major samples, range policy and one search
/// cache per axis.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Grid {
    pub(crate) name: String,
    pub(crate) x: Vec<f64>,
    pub(crate) y: Vec<f64>,
    pub(crate) z: Vec<f64>,
    pub(crate) z_min: f64,
    pub(crate) z_max: f64,
    pub(crate) check_range: bool,
    cursor_x: IntervalCursor,
    cursor_y: IntervalCursor,
}

fn check_axis(v: &[f64], name: &str, array: &'static str, context: &str) -> SplineResult<()> {
    if v.len() < 2 {
        return Err(SplineError::insufficient(2, v.len(), context));
    }
    check_nan(v, name, array)?;
    for w in v.windows(2) {
        if w[1] <= w[0] {
            return Err(SplineError::NotIncreasing {
                previous: w[0],
                x: w[1],
                context: format!("{} ({} must be strictly increasing)", context, array),
            });
        }
    }
    Ok(())
}

impl Grid {
    pub(crate) fn new(name: impl Into<String>, x: Vec<f64>, y: Vec<f64>, z: Vec<f64>, context: &str) -> SplineResult<Self> {
        let name = name.into();
        check_axis(&x, &name, "X", context)?;
        check_axis(&y, &name, "Y", context)?;
        if z.len() != x.len() * y.len() {
            return Err(SplineError::shape(x.len() * y.len(), z.len(), context));
        }
        check_nan(&z, &name, "Z")?;
        let z_min = z.iter().copied().fold(f64::INFINITY, f64::min);
        let z_max = z.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Ok(Grid {
            name,
            x,
            y,
            z,
            z_min,
            z_max,
            check_range: false,
            cursor_x: IntervalCursor::new(),
            cursor_y: IntervalCursor::new(),
        })
    }

    pub(crate) fn nx(&self) -> usize {
        self.x.len()
    }

    pub(crate) fn ny(&self) -> usize {
        self.y.len()
    }

    pub(crate) fn at(&self, i: usize, j: usize) -> usize {
        i * self.y.len() + j
    }

    /// Patch `(i, j)` containing `(x, y)`, after the optional range check.
    pub(crate) fn search(&self, x: f64, y: f64) -> SplineResult<(usize, usize)> {
        if self.check_range {
            for (v, axis, label) in [(x, &self.x, "x"), (y, &self.y, "y")] {
                let (min, max) = (axis[0], axis[axis.len() - 1]);
                if !(min <= v && v <= max) {
                    return Err(SplineError::OutOfRange {
                        point: v,
                        min,
                        max,
                        context: format!("{}::search_{}", self.name, label),
                    });
                }
            }
        }
        Ok((self.cursor_x.find(x, &self.x), self.cursor_y.find(y, &self.y)))
    }

    /// Runs a one dimensional rule on every grid line along `axis`.
    ///
    /// `rule` receives the abscissae and the values of one line and returns
    /// `N` derivative arrays of the same length, gathered back in grid layout.
    pub(crate) fn along_lines<const N: usize, F>(&self, values: &[f64], axis: Axis, rule: F) -> [Vec<f64>; N]
    where
        F: Fn(&[f64], &[f64]) -> [Vec<f64>; N],
    {
        let (abscissae, lines) = match axis {
            Axis::X => (&self.x, self.ny()),
            Axis::Y => (&self.y, self.nx()),
        };
        let index = |line: usize, k: usize| match axis {
            Axis::X => self.at(k, line),
            Axis::Y => self.at(line, k),
        };
        let mut result: [Vec<f64>; N] = std::array::from_fn(|_| vec![0.0; values.len()]);
        for line in 0..lines {
            let data: Vec<f64> = (0..abscissae.len()).map(|k| values[index(line, k)]).collect();
            for (target, derivative) in result.iter_mut().zip(rule(abscissae, &data)) {
                for (k, value) in derivative.into_iter().enumerate() {
                    target[index(line, k)] = value;
                }
            }
        }
        result
    }

    /// Writes the patch headers, `extra` adds per patch corner data.
    pub(crate) fn write_patches<F>(&self, f: &mut fmt::Formatter<'_>, mut extra: F) -> fmt::Result
    where
        F: FnMut(&mut fmt::Formatter<'_>, [usize; 4]) -> fmt::Result,
    {
        writeln!(f, "Nx = {} Ny = {}", self.nx(), self.ny())?;
        for i in 1..self.nx() {
            for j in 1..self.ny() {
                let corners = [
                    self.at(i - 1, j - 1),
                    self.at(i - 1, j),
                    self.at(i, j - 1),
                    self.at(i, j),
                ];
                writeln!(f, "patch ({},{})", i, j)?;
                write!(
                    f,
                    " DX = {:<10} DY = {:<10}\n Z00  = {:<10} Z01  = {:<10} Z10  = {:<10} Z11  = {:<10}\n",
                    self.x[i] - self.x[i - 1],
                    self.y[j] - self.y[j - 1],
                    self.z[corners[0]],
                    self.z[corners[1]],
                    self.z[corners[2]],
                    self.z[corners[3]]
                )?;
                extra(f, corners)?;
            }
        }
        Ok(())
    }
}

/// Generates the [Surface] implementation of a variant from the path of its
/// [Grid] and a `blend(x, y, ox, oy)` method giving the derivative of order
/// `ox` in x and `oy` in y.
macro_rules! surface_interpolant {
    ($surface:ty, $kind:expr, $($grid:ident).+) => {
        impl $crate::surface::Surface for $surface {
            fn name(&self) -> &str {
                &self.$($grid).+.name
            }

            fn kind(&self) -> $crate::surface::SurfaceKind {
                $kind
            }

            fn x_nodes(&self) -> &[f64] {
                &self.$($grid).+.x
            }

            fn y_nodes(&self) -> &[f64] {
                &self.$($grid).+.y
            }

            fn z_nodes(&self) -> &[f64] {
                &self.$($grid).+.z
            }

            fn z_min(&self) -> f64 {
                self.$($grid).+.z_min
            }

            fn z_max(&self) -> f64 {
                self.$($grid).+.z_max
            }

            fn check_range(&self) -> bool {
                self.$($grid).+.check_range
            }

            fn set_check_range(&mut self, check_range: bool) {
                self.$($grid).+.check_range = check_range;
            }

            fn eval(&self, x: f64, y: f64) -> $crate::error::SplineResult<f64> {
                self.blend(x, y, 0, 0)
            }

            fn dx(&self, x: f64, y: f64) -> $crate::error::SplineResult<f64> {
                self.blend(x, y, 1, 0)
            }

            fn dy(&self, x: f64, y: f64) -> $crate::error::SplineResult<f64> {
                self.blend(x, y, 0, 1)
            }

            fn dxx(&self, x: f64, y: f64) -> $crate::error::SplineResult<f64> {
                self.blend(x, y, 2, 0)
            }

            fn dxy(&self, x: f64, y: f64) -> $crate::error::SplineResult<f64> {
                self.blend(x, y, 1, 1)
            }

            fn dyy(&self, x: f64, y: f64) -> $crate::error::SplineResult<f64> {
                self.blend(x, y, 0, 2)
            }
        }
    };
}

pub(crate) use surface_interpolant;

/// Any surface.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceSpline {
    Bilinear(BilinearSpline),
    BiCubic(BiCubicSpline),
    Akima2D(Akima2DSpline),
    BiQuintic(BiQuinticSpline),
}

macro_rules! dispatch {
    ($self:expr, $s:ident => $body:expr) => {
        match $self {
            SurfaceSpline::Bilinear($s) => $body,
            SurfaceSpline::BiCubic($s) => $body,
            SurfaceSpline::Akima2D($s) => $body,
            SurfaceSpline::BiQuintic($s) => $body,
        }
    };
}

impl Surface for SurfaceSpline {
    fn name(&self) -> &str {
        dispatch!(self, s => s.name())
    }

    fn kind(&self) -> SurfaceKind {
        dispatch!(self, s => s.kind())
    }

    fn x_nodes(&self) -> &[f64] {
        dispatch!(self, s => s.x_nodes())
    }

    fn y_nodes(&self) -> &[f64] {
        dispatch!(self, s => s.y_nodes())
    }

    fn z_nodes(&self) -> &[f64] {
        dispatch!(self, s => s.z_nodes())
    }

    fn z_min(&self) -> f64 {
        dispatch!(self, s => s.z_min())
    }

    fn z_max(&self) -> f64 {
        dispatch!(self, s => s.z_max())
    }

    fn check_range(&self) -> bool {
        dispatch!(self, s => s.check_range())
    }

    fn set_check_range(&mut self, check_range: bool) {
        dispatch!(self, s => s.set_check_range(check_range))
    }

    fn eval(&self, x: f64, y: f64) -> SplineResult<f64> {
        dispatch!(self, s => s.eval(x, y))
    }

    fn dx(&self, x: f64, y: f64) -> SplineResult<f64> {
        dispatch!(self, s => s.dx(x, y))
    }

    fn dy(&self, x: f64, y: f64) -> SplineResult<f64> {
        dispatch!(self, s => s.dy(x, y))
    }

    fn dxx(&self, x: f64, y: f64) -> SplineResult<f64> {
        dispatch!(self, s => s.dxx(x, y))
    }

    fn dxy(&self, x: f64, y: f64) -> SplineResult<f64> {
        dispatch!(self, s => s.dxy(x, y))
    }

    fn dyy(&self, x: f64, y: f64) -> SplineResult<f64> {
        dispatch!(self, s => s.dyy(x, y))
    }
}

impl fmt::Display for SurfaceSpline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        dispatch!(self, s => fmt::Display::fmt(s, f))
    }
}

/// Builds a [SurfaceSpline] of the requested kind from samples in any of
/// the usual matrix layouts.
///
/// Without flags `z` is a C matrix, `Z(i, j) = z[i * ldz + j]`, with `i`
/// running over the x nodes. `fortran_storage` selects `Z(i, j) = z[i + j *
/// ldz]`, and `transposed` swaps the roles of the two indices.
/// # Example
/// ```
/// use piecewise_spline::{Surface, SurfaceBuilder, SurfaceKind};
/// use assert_approx_eq::assert_approx_eq;
///
/// // z = x + 10 y stored by column
/// let z = [0.0, 1.0, 2.0, 10.0, 11.0, 12.0];
/// let surface = SurfaceBuilder::new(SurfaceKind::Bilinear)
///     .fortran_storage(true)
///     .build(&[0.0, 1.0, 2.0], &[0.0, 1.0], &z)
///     .unwrap();
///
/// assert_approx_eq!(surface.eval(1.5, 0.5).unwrap(), 6.5, 1e-12);
/// assert_eq!(surface.z_node(2, 1), Some(12.0));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceBuilder {
    kind: SurfaceKind,
    name: String,
    check_range: bool,
    check_nan: bool,
    fortran_storage: bool,
    transposed: bool,
}

impl SurfaceBuilder {
    pub fn new(kind: SurfaceKind) -> Self {
        SurfaceBuilder {
            kind,
            name: kind.name().to_string(),
            check_range: false,
            check_nan: true,
            fortran_storage: false,
            transposed: false,
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

    pub fn check_nan(mut self, check_nan: bool) -> Self {
        self.check_nan = check_nan;
        self
    }

    pub fn fortran_storage(mut self, fortran_storage: bool) -> Self {
        self.fortran_storage = fortran_storage;
        self
    }

    pub fn transposed(mut self, transposed: bool) -> Self {
        self.transposed = transposed;
        self
    }

    /// True when consecutive `j` are contiguous in the input matrix.
    fn row_major(&self) -> bool {
        self.fortran_storage == self.transposed
    }

    /// Builds from full axes and a dense matrix whose leading dimension is
    /// implied by the layout.
    pub fn build(&self, x: &[f64], y: &[f64], z: &[f64]) -> SplineResult<SurfaceSpline> {
        let ldz = if self.row_major() { y.len() } else { x.len() };
        self.build_strided(x, 1, y, 1, z, ldz, x.len(), y.len())
    }

    /// Builds on the index grids `0..nx` and `0..ny`.
    pub fn build_z(&self, z: &[f64], ldz: usize, nx: usize, ny: usize) -> SplineResult<SurfaceSpline> {
        let x: Vec<f64> = (0..nx).map(|i| i as f64).collect();
        let y: Vec<f64> = (0..ny).map(|j| j as f64).collect();
        self.build_strided(&x, 1, &y, 1, z, ldz, nx, ny)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn build_strided(
        &self,
        x: &[f64],
        incx: usize,
        y: &[f64],
        incy: usize,
        z: &[f64],
        ldz: usize,
        nx: usize,
        ny: usize,
    ) -> SplineResult<SurfaceSpline> {
        let context = format!("{}::build", self.name);
        let x = crate::spline::gather_strided(x, incx, nx, &context)?;
        let y = crate::spline::gather_strided(y, incy, ny, &context)?;

        let (inner, outer) = if self.row_major() { (ny, nx) } else { (nx, ny) };
        if ldz < inner {
            return Err(SplineError::invalid(
                format!("ldZ = {} must be >= {}", ldz, inner),
                &context,
            ));
        }
        if outer > 0 && inner > 0 && z.len() < (outer - 1) * ldz + inner {
            return Err(SplineError::shape((outer - 1) * ldz + inner, z.len(), &context));
        }
        let row_major = self.row_major();
        let mut values = Vec::with_capacity(nx * ny);
        for i in 0..nx {
            for j in 0..ny {
                values.push(if row_major { z[i * ldz + j] } else { z[i + j * ldz] });
            }
        }

        let grid = Grid::new(self.name.clone(), x, y, values, &context)?;
        log::debug!(
            "building {} surface `{}` on a {}x{} grid",
            self.kind,
            grid.name,
            grid.nx(),
            grid.ny()
        );
        let mut surface = match self.kind {
            SurfaceKind::Bilinear => SurfaceSpline::Bilinear(BilinearSpline::from_grid(grid)),
            SurfaceKind::BiCubic => SurfaceSpline::BiCubic(BiCubicSpline::from_grid(grid)),
            SurfaceKind::Akima2D => SurfaceSpline::Akima2D(Akima2DSpline::from_grid(grid)),
            SurfaceKind::BiQuintic => SurfaceSpline::BiQuintic(BiQuinticSpline::from_grid(grid)),
        };
        surface.set_check_range(self.check_range);
        if self.check_nan {
            surface.check_nan()?;
        }
        Ok(surface)
    }
}

impl SurfaceSpline {
    /// Scans the derivative data computed by the build for non finite values.
    pub fn check_nan(&self) -> SplineResult<()> {
        match self {
            SurfaceSpline::Bilinear(_) => Ok(()),
            SurfaceSpline::BiCubic(s) => s.base.check_nan(),
            SurfaceSpline::Akima2D(s) => s.base.check_nan(),
            SurfaceSpline::BiQuintic(s) => s.check_nan(),
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;
    use rstest::rstest;

    use super::*;

    const X: [f64; 5] = [0.0, 0.5, 1.5, 2.0, 3.5];
    const Y: [f64; 4] = [-1.0, 0.0, 1.0, 2.5];

    fn sample(f: impl Fn(f64, f64) -> f64) -> Vec<f64> {
        X.iter().flat_map(|x| Y.iter().map(move |y| (*x, *y))).map(|(x, y)| f(x, y)).collect()
    }

    #[test]
    fn kind_names() {
        for kind in SurfaceKind::ALL {
            assert_eq!(kind.name().parse::<SurfaceKind>().unwrap(), kind);
        }
        assert_eq!("BiCubic".parse::<SurfaceKind>().unwrap(), SurfaceKind::BiCubic);
        assert!("cubic".parse::<SurfaceKind>().is_err());
    }

    #[rstest]
    #[case(SurfaceKind::Bilinear)]
    #[case(SurfaceKind::BiCubic)]
    #[case(SurfaceKind::Akima2D)]
    #[case(SurfaceKind::BiQuintic)]
    fn interpolates_samples(#[case] kind: SurfaceKind) {
        let eps = 1e-12;
        let z = sample(|x, y| (x * 1.3).sin() + y * y);
        let surface = SurfaceBuilder::new(kind).build(&X, &Y, &z).unwrap();
        assert_eq!(surface.kind(), kind);
        assert_eq!(surface.name(), kind.name());
        for (i, x) in X.iter().enumerate() {
            for (j, y) in Y.iter().enumerate() {
                assert_approx_eq!(surface.eval(*x, *y).unwrap(), z[i * Y.len() + j], eps);
            }
        }
    }

    #[rstest]
    #[case(SurfaceKind::Bilinear)]
    #[case(SurfaceKind::BiCubic)]
    #[case(SurfaceKind::Akima2D)]
    #[case(SurfaceKind::BiQuintic)]
    fn reproduces_planes(#[case] kind: SurfaceKind) {
        let eps = 1e-10;
        let plane = |x: f64, y: f64| 2.0 - 0.5 * x + 3.0 * y;
        let surface = SurfaceBuilder::new(kind).build(&X, &Y, &sample(plane)).unwrap();
        for (x, y) in [(0.2, -0.7), (1.7, 0.3), (3.1, 2.2)] {
            let [z, dx, dy, dxx, dxy, dyy] = surface.dd(x, y).unwrap();
            assert_approx_eq!(z, plane(x, y), eps);
            assert_approx_eq!(dx, -0.5, eps);
            assert_approx_eq!(dy, 3.0, eps);
            assert_approx_eq!(dxx, 0.0, eps);
            assert_approx_eq!(dxy, 0.0, eps);
            assert_approx_eq!(dyy, 0.0, eps);
        }
    }

    #[rstest]
    #[case(SurfaceKind::BiCubic)]
    #[case(SurfaceKind::Akima2D)]
    #[case(SurfaceKind::BiQuintic)]
    fn derivatives_match_finite_differences(#[case] kind: SurfaceKind) {
        let z = sample(|x, y| (x * 0.8).cos() * (1.0 + 0.3 * y * y));
        let surface = SurfaceBuilder::new(kind).build(&X, &Y, &z).unwrap();
        let h = 1e-6;
        for (x, y) in [(0.3, -0.4), (1.1, 0.6), (2.7, 1.9)] {
            let fd_x = (surface.eval(x + h, y).unwrap() - surface.eval(x - h, y).unwrap()) / (2.0 * h);
            let fd_y = (surface.eval(x, y + h).unwrap() - surface.eval(x, y - h).unwrap()) / (2.0 * h);
            assert_approx_eq!(surface.eval_d_1(x, y).unwrap(), fd_x, 1e-6);
            assert_approx_eq!(surface.eval_d_2(x, y).unwrap(), fd_y, 1e-6);
            let fd_xy = (surface.dx(x, y + h).unwrap() - surface.dx(x, y - h).unwrap()) / (2.0 * h);
            assert_approx_eq!(surface.eval_d_1_2(x, y).unwrap(), fd_xy, 1e-5);
            let fd_xx = (surface.dx(x + h, y).unwrap() - surface.dx(x - h, y).unwrap()) / (2.0 * h);
            assert_approx_eq!(surface.eval_d_1_1(x, y).unwrap(), fd_xx, 1e-5);
            let fd_yy = (surface.dy(x, y + h).unwrap() - surface.dy(x, y - h).unwrap()) / (2.0 * h);
            assert_approx_eq!(surface.eval_d_2_2(x, y).unwrap(), fd_yy, 1e-5);
        }
    }

    #[test]
    fn storage_layouts_agree() {
        let x = [0.0, 1.0, 2.0];
        let y = [0.0, 1.0];
        let f = |i: usize, j: usize| (i * 10 + j) as f64;
        let c: Vec<f64> = (0..3).flat_map(|i| (0..2).map(move |j| f(i, j))).collect();
        let fortran: Vec<f64> = (0..2).flat_map(|j| (0..3).map(move |i| f(i, j))).collect();
        // padded C matrix with ldz = 3
        let padded: Vec<f64> = (0..3).flat_map(|i| vec![f(i, 0), f(i, 1), -1.0]).collect();

        let reference = SurfaceBuilder::new(SurfaceKind::Bilinear).build(&x, &y, &c).unwrap();
        let builders = [
            SurfaceBuilder::new(SurfaceKind::Bilinear).fortran_storage(true).build(&x, &y, &fortran),
            SurfaceBuilder::new(SurfaceKind::Bilinear).transposed(true).build(&x, &y, &fortran),
            SurfaceBuilder::new(SurfaceKind::Bilinear)
                .fortran_storage(true)
                .transposed(true)
                .build(&x, &y, &c),
            SurfaceBuilder::new(SurfaceKind::Bilinear).build_strided(&x, 1, &y, 1, &padded, 3, 3, 2),
        ];
        for surface in builders {
            assert_eq!(surface.unwrap().z_nodes(), reference.z_nodes());
        }

        assert!(SurfaceBuilder::new(SurfaceKind::Bilinear)
            .build_strided(&x, 1, &y, 1, &c, 1, 3, 2)
            .is_err());
        assert!(matches!(
            SurfaceBuilder::new(SurfaceKind::Bilinear).build(&x, &y, &c[..5]),
            Err(SplineError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn index_grids_and_accessors() {
        let z = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let mut surface = SurfaceBuilder::new(SurfaceKind::BiCubic)
            .name("grid")
            .build_z(&z, 3, 2, 3)
            .unwrap();
        assert_eq!(surface.x_nodes(), &[0.0, 1.0]);
        assert_eq!(surface.y_nodes(), &[0.0, 1.0, 2.0]);
        assert_eq!((surface.num_x(), surface.num_y()), (2, 3));
        assert_eq!(surface.z_node(1, 2), Some(6.0));
        assert_eq!(surface.z_node(2, 0), None);
        assert_eq!((surface.z_min(), surface.z_max()), (1.0, 6.0));
        assert_eq!((surface.x_min(), surface.x_max(), surface.y_min(), surface.y_max()), (0.0, 1.0, 0.0, 2.0));

        assert!(surface.eval(2.0, 1.0).is_ok());
        surface.set_check_range(true);
        assert!(matches!(surface.eval(2.0, 1.0), Err(SplineError::OutOfRange { .. })));
        assert!(surface.eval(0.5, 2.5).is_err());

        let mut info = Vec::new();
        surface.info(&mut info).unwrap();
        assert_eq!(String::from_utf8(info).unwrap(), "Bivariate spline [grid] of type = bicubic\n");
    }

    #[test]
    fn grid_validation() {
        assert!(matches!(
            SurfaceBuilder::new(SurfaceKind::Bilinear).build(&[0.0, 0.0], &[0.0, 1.0], &[0.0; 4]),
            Err(SplineError::NotIncreasing { .. })
        ));
        assert!(matches!(
            SurfaceBuilder::new(SurfaceKind::Bilinear).build(&[0.0], &[0.0, 1.0], &[0.0; 2]),
            Err(SplineError::InsufficientData { .. })
        ));
        assert!(matches!(
            SurfaceBuilder::new(SurfaceKind::Bilinear).build(&[0.0, 1.0], &[0.0, 1.0], &[0.0, 1.0, f64::NAN, 0.0]),
            Err(SplineError::NotFinite { array: "Z", .. })
        ));
    }
}
