#![allow(dead_code)]

use rand::{rngs::StdRng, Rng, SeedableRng};

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Strictly increasing grid of `n` points starting at `x0` with random steps.
pub fn random_grid(rng: &mut StdRng, n: usize, x0: f64) -> Vec<f64> {
    let mut x = Vec::with_capacity(n);
    x.push(x0);
    for _ in 1..n {
        let step = rng.gen_range(0.2..1.5);
        x.push(x[x.len() - 1] + step);
    }
    x
}

/// Non-decreasing samples with a few flat steps.
pub fn random_monotone(rng: &mut StdRng, n: usize) -> Vec<f64> {
    let mut y = Vec::with_capacity(n);
    y.push(0.0);
    for _ in 1..n {
        let step = if rng.gen_bool(0.2) { 0.0 } else { rng.gen_range(0.0..3.0) };
        y.push(y[y.len() - 1] + step);
    }
    y
}
