//! Closed form roots of quadratic and cubic polynomials.
//!
//! Coefficients are given in increasing degree order, `a[0] + a[1] z + a[2] z^2 (+ a[3] z^3)`.

const MACHINE_EPS: f64 = f64::EPSILON;

/// Roots of a polynomial of degree at most 3.
///
/// Real roots are sorted in increasing order. Complex roots come in conjugate
/// pairs stored as `(re, im)` with the positive imaginary part first.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Roots {
    real: Vec<f64>,
    complex: Vec<(f64, f64)>,
}

impl Roots {
    pub fn real(&self) -> &[f64] {
        &self.real
    }

    pub fn complex(&self) -> &[(f64, f64)] {
        &self.complex
    }

    pub fn real_count(&self) -> usize {
        self.real.len()
    }

    pub fn complex_count(&self) -> usize {
        self.complex.len()
    }

    /// `(number of distinct real roots, number of complex roots)`.
    pub fn counts(&self) -> (usize, usize) {
        (self.real.len(), self.complex.len())
    }

    /// First real root in the closed interval `[lower, upper]`.
    pub fn real_in(&self, lower: f64, upper: f64) -> Option<f64> {
        self.real.iter().copied().find(|r| lower <= *r && *r <= upper)
    }

    fn push_conjugates(&mut self, re: f64, im: f64) {
        let im = im.abs();
        self.complex.push((re, im));
        self.complex.push((re, -im));
    }

    /// Translates every root by `origin` (local to global coordinate).
    pub(crate) fn shifted(mut self, origin: f64) -> Roots {
        self.real.iter_mut().for_each(|r| *r += origin);
        self.complex.iter_mut().for_each(|(re, _)| *re += origin);
        self
    }

    fn sort_real(&mut self) {
        self.real.sort_by(|a, b| a.total_cmp(b));
    }
}

/// Roots of `a[0] + a[1] z + a[2] z^2`.
///
/// When `a[2] == 0` the linear root is returned (none if `a[1] == 0` too).
/// The two distinct real roots are computed as `w / a[2]` and `a[0] / w`
/// with `w = -(a[1] + sign(a[1]) sqrt(d)) / 2`, which avoids cancellation.
/// # Example
/// ```
/// use piecewise_spline::quadratic_roots;
///
/// let roots = quadratic_roots(&[2.0, -3.0, 1.0]);
/// assert_eq!(roots.real(), &[1.0, 2.0]);
/// ```
pub fn quadratic_roots(a: &[f64; 3]) -> Roots {
    let (c, b, a2) = (a[0], a[1], a[2]);
    let mut roots = Roots::default();

    if a2 == 0.0 {
        if b != 0.0 {
            roots.real.push(-c / b);
        }
        return roots;
    }

    let discriminant = b * b - 4.0 * a2 * c;
    if discriminant.abs() <= 2.0 * MACHINE_EPS * b * b {
        // double root
        roots.real.push(-b / (2.0 * a2));
    } else if discriminant < 0.0 {
        let r = (-discriminant).sqrt();
        roots.push_conjugates(-b / (2.0 * a2), r / (2.0 * a2));
    } else {
        let r = discriminant.sqrt();
        if b == 0.0 {
            let root = (r / (2.0 * a2)).abs();
            roots.real.push(-root);
            roots.real.push(root);
        } else {
            let w = if b > 0.0 { -0.5 * (b + r) } else { 0.5 * (r - b) };
            roots.real.push(c / w);
            roots.real.push(w / a2);
            roots.sort_real();
        }
    }
    roots
}

/// Roots of `a[0] + a[1] z + a[2] z^2 + a[3] z^3`.
///
/// The monic cubic `z^3 + A z^2 + B z + C` is shifted to `y^3 + p y + q`
/// (`z = y - A/3`) and scaled by `S = max(sqrt|p|, cbrt|q|)` before the
/// discriminant `(p/3)^3 + (q/2)^2` selects the case:
/// - triple root when `S` vanishes,
/// - a double and a simple root when the discriminant is negligible,
/// - one real root and a conjugate pair when it is positive,
/// - three real roots (trigonometric form) when it is negative.
///
/// Degenerate leading or trailing coefficients fall back to [quadratic_roots].
/// # Example
/// ```
/// use piecewise_spline::cubic_roots;
/// use assert_approx_eq::assert_approx_eq;
///
/// // (z - 1)(z - 2)(z - 3)
/// let roots = cubic_roots(&[-6.0, 11.0, -6.0, 1.0]);
/// assert_eq!(roots.counts(), (3, 0));
/// assert_approx_eq!(roots.real()[0], 1.0, 1e-12);
/// assert_approx_eq!(roots.real()[2], 3.0, 1e-12);
/// ```
pub fn cubic_roots(a: &[f64; 4]) -> Roots {
    if a[0] == 0.0 {
        let mut roots = quadratic_roots(&[a[1], a[2], a[3]]);
        if !roots.real.contains(&0.0) {
            roots.real.push(0.0);
            roots.sort_real();
        }
        return roots;
    }

    if a[3] == 0.0 {
        return quadratic_roots(&[a[0], a[1], a[2]]);
    }

    let c = a[0] / a[3];
    let b = a[1] / a[3];
    let aa = a[2] / a[3];

    let a3 = aa / 3.0;
    let p = b - aa * a3;
    let q = c + a3 * (2.0 * a3 * a3 - b);

    let scale = p.abs().sqrt().max(q.abs().cbrt());

    let mut roots = Roots::default();
    if scale <= MACHINE_EPS {
        roots.real.push(-a3);
        return roots;
    }

    let p_scaled = (p / 3.0) / (scale * scale);
    let sqrt_p = (p / 3.0).abs().sqrt() / scale;
    let q_scaled = (q / 2.0) / (scale * scale * scale);

    let d = p_scaled * p_scaled * p_scaled + q_scaled * q_scaled;
    let sqrt_d = d.abs().sqrt();

    if sqrt_d < q_scaled.abs() * MACHINE_EPS {
        // (y - r)^2 (y + 2r) with r^2 = -P and r^3 = Q
        let r = if q_scaled > 0.0 { sqrt_p } else { -sqrt_p };
        roots.real.push(r);
        roots.real.push(-2.0 * r);
    } else if d > 0.0 {
        let (w1, w2) = if q_scaled > 0.0 {
            let w2 = -(sqrt_d + q_scaled).cbrt();
            (-p_scaled / w2, w2)
        } else {
            let w1 = (sqrt_d - q_scaled).cbrt();
            (w1, -p_scaled / w1)
        };
        roots.real.push(w1 + w2);
        roots.push_conjugates(-0.5 * (w1 + w2), (w1 - w2) * 0.75_f64.sqrt());
    } else {
        let mut angle = sqrt_d.atan2(-q_scaled);
        if angle < 0.0 {
            angle += 2.0 * std::f64::consts::PI;
        }
        angle /= 3.0;
        let re = sqrt_p * angle.cos();
        let im = sqrt_p * angle.sin();
        let sqrt3 = 3.0_f64.sqrt();
        roots.real.push(2.0 * re);
        roots.real.push(-re + sqrt3 * im);
        roots.real.push(-re - sqrt3 * im);
    }

    for r in roots.real.iter_mut() {
        *r = *r * scale - a3;
    }
    for (re, im) in roots.complex.iter_mut() {
        *re = *re * scale - a3;
        *im *= scale;
    }
    roots.sort_real();
    roots
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    use super::*;

    fn cubic_from_roots(r1: f64, r2: f64, r3: f64) -> [f64; 4] {
        [
            -r1 * r2 * r3,
            r1 * r2 + r1 * r3 + r2 * r3,
            -(r1 + r2 + r3),
            1.0,
        ]
    }

    #[test]
    fn quadratic_two_real() {
        let eps = 1e-12;
        let roots = quadratic_roots(&[2.0, -3.0, 1.0]);
        assert_eq!(roots.counts(), (2, 0));
        assert_approx_eq!(roots.real()[0], 1.0, eps);
        assert_approx_eq!(roots.real()[1], 2.0, eps);

        let roots = quadratic_roots(&[-4.0, 0.0, 1.0]);
        assert_eq!(roots.real(), &[-2.0, 2.0]);
    }

    #[test]
    fn quadratic_complex_pair() {
        let roots = quadratic_roots(&[1.0, 0.0, 1.0]);
        assert_eq!(roots.counts(), (0, 2));
        assert_eq!(roots.complex()[0], (0.0, 1.0));
        assert_eq!(roots.complex()[1], (0.0, -1.0));
    }

    #[test]
    fn quadratic_degenerate() {
        let eps = 1e-12;
        let roots = quadratic_roots(&[2.0, 4.0, 0.0]);
        assert_eq!(roots.counts(), (1, 0));
        assert_approx_eq!(roots.real()[0], -0.5, eps);

        assert_eq!(quadratic_roots(&[2.0, 0.0, 0.0]).counts(), (0, 0));

        // (z - 3)^2
        let roots = quadratic_roots(&[9.0, -6.0, 1.0]);
        assert_eq!(roots.counts(), (1, 0));
        assert_approx_eq!(roots.real()[0], 3.0, eps);
    }

    #[test]
    fn quadratic_without_cancellation() {
        // roots 1e-8 and 1e8
        let roots = quadratic_roots(&[1.0, -(1e8 + 1e-8), 1.0]);
        assert_approx_eq!(roots.real()[0] * 1e8, 1.0, 1e-12);
        assert_approx_eq!(roots.real()[1] * 1e-8, 1.0, 1e-12);
    }

    #[test]
    fn cubic_three_real() {
        let eps = 1e-10;
        let roots = cubic_roots(&cubic_from_roots(1.0, 2.0, 3.0));
        assert_eq!(roots.counts(), (3, 0));
        assert_approx_eq!(roots.real()[0], 1.0, eps);
        assert_approx_eq!(roots.real()[1], 2.0, eps);
        assert_approx_eq!(roots.real()[2], 3.0, eps);
    }

    #[test]
    fn cubic_one_real_two_complex() {
        let eps = 1e-10;
        // (z - 1)(z^2 + 1)
        let roots = cubic_roots(&[-1.0, 1.0, -1.0, 1.0]);
        assert_eq!(roots.counts(), (1, 2));
        assert_approx_eq!(roots.real()[0], 1.0, eps);
        assert_approx_eq!(roots.complex()[0].0, 0.0, eps);
        assert_approx_eq!(roots.complex()[0].1, 1.0, eps);
        assert_approx_eq!(roots.complex()[1].1, -1.0, eps);
    }

    #[test]
    fn cubic_triple_root() {
        // (z - 2)^3
        let roots = cubic_roots(&[-8.0, 12.0, -6.0, 1.0]);
        assert_eq!(roots.counts(), (1, 0));
        assert_approx_eq!(roots.real()[0], 2.0, 1e-12);
    }

    #[test]
    fn cubic_zero_root_and_degenerate() {
        let eps = 1e-12;
        // z (z - 1)(z - 2)
        let roots = cubic_roots(&[0.0, 2.0, -3.0, 1.0]);
        assert_eq!(roots.counts(), (3, 0));
        assert_approx_eq!(roots.real()[0], 0.0, eps);
        assert_approx_eq!(roots.real()[1], 1.0, eps);
        assert_approx_eq!(roots.real()[2], 2.0, eps);

        let roots = cubic_roots(&[2.0, -3.0, 1.0, 0.0]);
        assert_eq!(roots.counts(), (2, 0));
        assert_eq!(roots.real_in(1.5, 3.0), Some(2.0));
        assert_eq!(roots.real_in(5.0, 6.0), None);
    }

    #[test]
    fn cubic_random_real_roots() {
        let mut rng = StdRng::seed_from_u64(1234);
        for _ in 0..500 {
            let r1: f64 = rng.gen_range(-5.0..5.0);
            let r2 = r1 + rng.gen_range(0.1..3.0);
            let r3 = r2 + rng.gen_range(0.1..3.0);
            let scale: f64 = rng.gen_range(0.5..4.0);
            let mut a = cubic_from_roots(r1, r2, r3);
            a.iter_mut().for_each(|c| *c *= scale);

            let roots = cubic_roots(&a);
            assert_eq!(roots.counts(), (3, 0));
            assert_approx_eq!(roots.real()[0], r1, 1e-8);
            assert_approx_eq!(roots.real()[1], r2, 1e-8);
            assert_approx_eq!(roots.real()[2], r3, 1e-8);
        }
    }

    #[test]
    fn cubic_random_complex_roots() {
        let mut rng = StdRng::seed_from_u64(4321);
        for _ in 0..500 {
            let r: f64 = rng.gen_range(-5.0..5.0);
            let re: f64 = rng.gen_range(-5.0..5.0);
            let im: f64 = rng.gen_range(0.5..3.0);
            // (z - r)(z^2 - 2 re z + re^2 + im^2)
            let m = re * re + im * im;
            let a = [-r * m, m + 2.0 * re * r, -(2.0 * re + r), 1.0];

            let roots = cubic_roots(&a);
            assert_eq!(roots.counts(), (1, 2));
            assert_approx_eq!(roots.real()[0], r, 1e-8);
            assert_approx_eq!(roots.complex()[0].0, re, 1e-8);
            assert_approx_eq!(roots.complex()[0].1, im, 1e-8);
        }
    }
}
