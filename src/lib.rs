//! Piecewise polynomial interpolation of sampled data.
//! Curves, surfaces on rectangular grids and sets of curves sharing one
//! abscissa, with derivatives up to the third order and inverse evaluation.
//! Nothing assumes a graphics context.
//!
//! # Example
//! ```
//! use piecewise_spline::{Interpolant, SplineBuilder, SplineKind};
//! use assert_approx_eq::assert_approx_eq;
//!
//! let x = [0.0, 1.0, 2.0, 3.0];
//! let y = [0.0, 1.0, 1.0, 2.0];
//! let spline = SplineBuilder::new(SplineKind::Pchip).build_from(&x, &y).unwrap();
//!
//! assert_approx_eq!(1.0, spline.eval(1.5).unwrap(), 1e-12);
//! assert_approx_eq!(0.0, spline.eval_d(2.0).unwrap(), 1e-12);
//! ```

mod arena;
mod config;
mod error;
mod hermite;
mod knot;
mod monotonicity;
mod polynomial;
mod registry;
mod roots;
mod search;
mod spline;
mod spline_set;
mod surface;

pub use arena::{ArenaBlock, ValueArena};
pub use config::{ColumnData, SplineConfig, SplineSetConfig, SurfaceConfig};
pub use error::{check_nan, SplineError, SplineResult};
pub use hermite::{
    bilinear3, bilinear5, hermite3, hermite3_d, hermite3_dd, hermite3_ddd, hermite5, hermite5_d, hermite5_dd,
    hermite5_ddd, hermite5_dddd, hermite5_ddddd,
};
pub use knot::KnotVector;
pub use monotonicity::{check_cubic_spline_monotonicity, check_data_monotonicity, Monotonicity};
pub use polynomial::{PiecewisePolynomial, Polynomial};
pub use registry::SplineRegistry;
pub use roots::{cubic_roots, quadratic_roots, Roots};
pub use search::{update_interval, IntervalCursor};
pub use spline::{
    AkimaSpline, BSpline, BesselSpline, ConstantSpline, CubicSpline, HermiteSpline, Interpolant, LinearSpline,
    PchipSpline, QuinticSpline, Spline, SplineBuilder, SplineKind,
};
pub use spline_set::{SplineIndex, SplineSet, SplineSetBuilder};
pub use surface::{
    Akima2DSpline, BiCubicSpline, BiQuinticSpline, BilinearSpline, Surface, SurfaceBuilder, SurfaceKind,
    SurfaceSpline,
};
