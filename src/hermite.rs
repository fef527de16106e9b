//! Cubic and quintic Hermite bases on an interval of width `h`.
//!
//! All functions take the local coordinate `t = x - x0` and the interval width
//! `h`. Cubic bases are ordered `[value at x0, value at x1, slope at x0,
//! slope at x1]`; quintic bases add `[curvature at x0, curvature at x1]`.
//! Derivatives are taken with respect to `t`.

pub fn hermite3(t: f64, h: f64) -> [f64; 4] {
    let s = t / h;
    let b1 = s * s * (3.0 - 2.0 * s);
    [1.0 - b1, b1, t * (s * (s - 2.0) + 1.0), t * s * (s - 1.0)]
}

pub fn hermite3_d(t: f64, h: f64) -> [f64; 4] {
    let s = t / h;
    let b0 = 6.0 * s * (s - 1.0) / h;
    [b0, -b0, (3.0 * s - 4.0) * s + 1.0, s * (3.0 * s - 2.0)]
}

pub fn hermite3_dd(t: f64, h: f64) -> [f64; 4] {
    let s = t / h;
    let b0 = (12.0 * s - 6.0) / (h * h);
    [b0, -b0, (6.0 * s - 4.0) / h, (6.0 * s - 2.0) / h]
}

pub fn hermite3_ddd(_t: f64, h: f64) -> [f64; 4] {
    let b0 = 12.0 / (h * h * h);
    let b2 = 6.0 / (h * h);
    [b0, -b0, b2, b2]
}

pub fn hermite5(t: f64, h: f64) -> [f64; 6] {
    let s = t / h;
    let s2 = s * s;
    let s3 = s2 * s;
    let b1 = s3 * (10.0 + s * (6.0 * s - 15.0));
    [
        1.0 - b1,
        b1,
        h * s * (1.0 + s2 * (-6.0 + s * (8.0 - 3.0 * s))),
        h * s3 * (-4.0 + s * (7.0 - 3.0 * s)),
        0.5 * h * h * s2 * (1.0 + s * (-3.0 + s * (3.0 - s))),
        0.5 * h * h * s3 * (1.0 + s * (s - 2.0)),
    ]
}

pub fn hermite5_d(t: f64, h: f64) -> [f64; 6] {
    let s = t / h;
    let s2 = s * s;
    let b0 = -30.0 * s2 * (1.0 - s) * (1.0 - s) / h;
    [
        b0,
        -b0,
        1.0 + s2 * (-18.0 + s * (32.0 - 15.0 * s)),
        s2 * (-12.0 + s * (28.0 - 15.0 * s)),
        0.5 * h * s * (2.0 + s * (-9.0 + s * (12.0 - 5.0 * s))),
        0.5 * h * s2 * (3.0 + s * (5.0 * s - 8.0)),
    ]
}

pub fn hermite5_dd(t: f64, h: f64) -> [f64; 6] {
    let s = t / h;
    let b0 = s * (-60.0 + s * (180.0 - 120.0 * s)) / (h * h);
    [
        b0,
        -b0,
        s * (-36.0 + s * (96.0 - 60.0 * s)) / h,
        s * (-24.0 + s * (84.0 - 60.0 * s)) / h,
        1.0 + s * (-9.0 + s * (18.0 - 10.0 * s)),
        s * (3.0 + s * (10.0 * s - 12.0)),
    ]
}

pub fn hermite5_ddd(t: f64, h: f64) -> [f64; 6] {
    let s = t / h;
    let h2 = h * h;
    let b0 = (-60.0 + s * (360.0 - 360.0 * s)) / (h2 * h);
    [
        b0,
        -b0,
        (-36.0 + s * (192.0 - 180.0 * s)) / h2,
        (-24.0 + s * (168.0 - 180.0 * s)) / h2,
        (-9.0 + s * (36.0 - 30.0 * s)) / h,
        (3.0 + s * (30.0 * s - 24.0)) / h,
    ]
}

pub fn hermite5_dddd(t: f64, h: f64) -> [f64; 6] {
    let s = t / h;
    let h2 = h * h;
    let b0 = (360.0 - 720.0 * s) / (h2 * h2);
    [
        b0,
        -b0,
        (192.0 - 360.0 * s) / (h2 * h),
        (168.0 - 360.0 * s) / (h2 * h),
        (36.0 - 60.0 * s) / h2,
        (60.0 * s - 24.0) / h2,
    ]
}

pub fn hermite5_ddddd(_t: f64, h: f64) -> [f64; 6] {
    let h2 = h * h;
    let h3 = h2 * h;
    let b0 = 720.0 / (h3 * h2);
    let b2 = -360.0 / (h2 * h2);
    let b4 = 60.0 / h3;
    [-b0, b0, b2, b2, -b4, b4]
}

fn blend<const N: usize>(p: &[f64; N], m: &[[f64; N]; N], q: &[f64; N]) -> f64 {
    p.iter()
        .zip(m.iter())
        .map(|(pi, row)| pi * row.iter().zip(q.iter()).map(|(mij, qj)| mij * qj).sum::<f64>())
        .sum()
}

/// `p^T M q` for the 4x4 corner data of a bicubic patch.
pub fn bilinear3(p: &[f64; 4], m: &[[f64; 4]; 4], q: &[f64; 4]) -> f64 {
    blend(p, m, q)
}

/// `p^T M q` for the 6x6 corner data of a biquintic patch.
pub fn bilinear5(p: &[f64; 6], m: &[[f64; 6]; 6], q: &[f64; 6]) -> f64 {
    blend(p, m, q)
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;

    use super::*;

    fn dot<const N: usize>(a: &[f64; N], b: &[f64; N]) -> f64 {
        a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
    }

    #[test]
    fn cubic_bases_interpolate_end_data() {
        let eps = 1e-12;
        let h = 0.7;
        assert_eq!(hermite3(0.0, h), [1.0, 0.0, 0.0, 0.0]);
        let right = hermite3(h, h);
        assert_approx_eq!(right[0], 0.0, eps);
        assert_approx_eq!(right[1], 1.0, eps);
        assert_approx_eq!(right[2], 0.0, eps);
        assert_approx_eq!(right[3], 0.0, eps);

        let slope_left = hermite3_d(0.0, h);
        assert_approx_eq!(slope_left[2], 1.0, eps);
        let slope_right = hermite3_d(h, h);
        assert_approx_eq!(slope_right[3], 1.0, eps);
        assert_approx_eq!(slope_right[0], 0.0, eps);
    }

    #[test]
    fn cubic_bases_reproduce_cubic() {
        // p(x) = 1 - 2x + 0.5x^2 + x^3 on [0.5, 1.75]
        let eps = 1e-10;
        let p = |x: f64| 1.0 - 2.0 * x + 0.5 * x * x + x.powi(3);
        let dp = |x: f64| -2.0 + x + 3.0 * x * x;
        let (x0, x1) = (0.5, 1.75);
        let h = x1 - x0;
        let data = [p(x0), p(x1), dp(x0), dp(x1)];

        for x in [0.5, 0.8, 1.1, 1.75, 2.3] {
            let t = x - x0;
            assert_approx_eq!(dot(&hermite3(t, h), &data), p(x), eps);
            assert_approx_eq!(dot(&hermite3_d(t, h), &data), dp(x), eps);
            assert_approx_eq!(dot(&hermite3_dd(t, h), &data), 1.0 + 6.0 * x, eps);
            assert_approx_eq!(dot(&hermite3_ddd(t, h), &data), 6.0, eps);
        }
    }

    #[test]
    fn quintic_bases_reproduce_quintic() {
        let eps = 1e-9;
        let p = |x: f64| 2.0 - x + 0.3 * x.powi(2) - 0.7 * x.powi(3) + 0.2 * x.powi(4) + 0.1 * x.powi(5);
        let dp = |x: f64| -1.0 + 0.6 * x - 2.1 * x.powi(2) + 0.8 * x.powi(3) + 0.5 * x.powi(4);
        let ddp = |x: f64| 0.6 - 4.2 * x + 2.4 * x.powi(2) + 2.0 * x.powi(3);
        let dddp = |x: f64| -4.2 + 4.8 * x + 6.0 * x.powi(2);
        let ddddp = |x: f64| 4.8 + 12.0 * x;
        let (x0, x1) = (-0.4, 1.3);
        let h = x1 - x0;
        let data = [p(x0), p(x1), dp(x0), dp(x1), ddp(x0), ddp(x1)];

        for x in [-0.4, 0.0, 0.45, 1.0, 1.3] {
            let t = x - x0;
            assert_approx_eq!(dot(&hermite5(t, h), &data), p(x), eps);
            assert_approx_eq!(dot(&hermite5_d(t, h), &data), dp(x), eps);
            assert_approx_eq!(dot(&hermite5_dd(t, h), &data), ddp(x), eps);
            assert_approx_eq!(dot(&hermite5_ddd(t, h), &data), dddp(x), eps);
            assert_approx_eq!(dot(&hermite5_dddd(t, h), &data), ddddp(x), eps);
            assert_approx_eq!(dot(&hermite5_ddddd(t, h), &data), 12.0, eps);
        }
    }

    #[test]
    fn blends() {
        let eps = 1e-12;
        let p = [1.0, 2.0, 0.0, -1.0];
        let q = [0.5, 0.0, 1.0, 2.0];
        let mut m = [[0.0; 4]; 4];
        for (i, row) in m.iter_mut().enumerate() {
            for (j, v) in row.iter_mut().enumerate() {
                *v = (i * 4 + j) as f64;
            }
        }
        // sum_ij p_i m_ij q_j
        let expected: f64 = (0..4)
            .map(|i| (0..4).map(|j| p[i] * m[i][j] * q[j]).sum::<f64>())
            .sum();
        assert_approx_eq!(bilinear3(&p, &m, &q), expected, eps);

        let p5 = [1.0, 0.0, 0.0, 0.0, 0.0, 0.0];
        let q5 = [0.0, 0.0, 0.0, 0.0, 0.0, 1.0];
        let mut m5 = [[0.0; 6]; 6];
        m5[0][5] = 3.5;
        assert_approx_eq!(bilinear5(&p5, &m5, &q5), 3.5, eps);
    }
}
