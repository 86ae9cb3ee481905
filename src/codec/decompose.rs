//! Singular value decomposition of a pixel matrix and its rank-k truncation.
//!
//! Work happens in `f64`; [`TruncatedDecomposition`] stores `f32`, the
//! precision of the container payload.

use super::options::DecompositionStrategy;
use crate::error::{CodecError, Result};
use log::debug;
use nalgebra::{DMatrix, DVector};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, StandardNormal};

/// Economy SVD `A = U * diag(S) * V^T` with `S` in descending order.
#[derive(Clone, Debug)]
pub struct FullDecomposition {
    /// rows x min(rows, cols)
    pub u: DMatrix<f64>,
    /// min(rows, cols), descending
    pub s: DVector<f64>,
    /// cols x min(rows, cols)
    pub v: DMatrix<f64>,
}

/// Rank-k factors `U` (rows x k), `S` (k) and `V` (cols x k).
#[derive(Clone, Debug, PartialEq)]
pub struct TruncatedDecomposition {
    u: DMatrix<f32>,
    s: DVector<f32>,
    v: DMatrix<f32>,
}

impl TruncatedDecomposition {
    /// Assemble factors; `U`, `S` and `V` must agree on a rank in
    /// `1..=min(rows, cols)`.
    pub fn new(u: DMatrix<f32>, s: DVector<f32>, v: DMatrix<f32>) -> Result<Self> {
        let k = s.len();
        if u.ncols() != k {
            return Err(CodecError::ShapeMismatch {
                expected: (u.nrows(), k),
                actual: u.shape(),
            });
        }
        if v.ncols() != k {
            return Err(CodecError::ShapeMismatch {
                expected: (v.nrows(), k),
                actual: v.shape(),
            });
        }
        let (rows, cols) = (u.nrows(), v.nrows());
        if k == 0 || k > rows.min(cols) {
            return Err(CodecError::InvalidRank { rank: k, rows, cols });
        }
        Ok(Self { u, s, v })
    }

    pub fn rank(&self) -> usize {
        self.s.len()
    }

    pub fn rows(&self) -> usize {
        self.u.nrows()
    }

    pub fn cols(&self) -> usize {
        self.v.nrows()
    }

    pub fn u(&self) -> &DMatrix<f32> {
        &self.u
    }

    pub fn s(&self) -> &DVector<f32> {
        &self.s
    }

    pub fn v(&self) -> &DMatrix<f32> {
        &self.v
    }
}

/// Full economy SVD, sorted by decreasing singular value.
pub fn decompose(matrix: &DMatrix<f64>) -> Result<FullDecomposition> {
    let (rows, cols) = matrix.shape();
    if rows == 0 || cols == 0 {
        return Err(CodecError::Decomposition(format!(
            "cannot decompose an empty {rows}x{cols} matrix"
        )));
    }
    let svd = matrix
        .clone()
        .try_svd(true, true, f64::EPSILON, 0)
        .ok_or_else(|| CodecError::Decomposition("SVD did not converge".to_string()))?;
    let (u_raw, v_t) = match (svd.u, svd.v_t) {
        (Some(u), Some(v_t)) => (u, v_t),
        _ => {
            return Err(CodecError::Decomposition(
                "SVD returned no singular vectors".to_string(),
            ))
        }
    };
    let sv = svd.singular_values;
    let n = sv.len();

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| sv[b].total_cmp(&sv[a]));

    let u = DMatrix::from_fn(rows, n, |r, j| u_raw[(r, order[j])]);
    let v = DMatrix::from_fn(cols, n, |c, j| v_t[(order[j], c)]);
    let s = DVector::from_fn(n, |j, _| sv[order[j]]);
    Ok(FullDecomposition { u, s, v })
}

/// Keep the `k` leading components and reduce them to `f32`.
pub fn truncate(full: &FullDecomposition, k: usize) -> Result<TruncatedDecomposition> {
    if k == 0 || k > full.s.len() {
        return Err(CodecError::InvalidRank {
            rank: k,
            rows: full.u.nrows(),
            cols: full.v.nrows(),
        });
    }
    TruncatedDecomposition::new(
        full.u.columns(0, k).map(|x| x as f32),
        full.s.rows(0, k).map(|x| x as f32),
        full.v.columns(0, k).map(|x| x as f32),
    )
}

/// Rank-`k` decomposition of `matrix` using `strategy`.
pub fn decompose_rank(
    matrix: &DMatrix<f64>,
    k: usize,
    strategy: DecompositionStrategy,
) -> Result<TruncatedDecomposition> {
    match strategy {
        DecompositionStrategy::Full => truncate(&decompose(matrix)?, k),
        DecompositionStrategy::Randomized {
            oversample,
            power_iterations,
            seed,
        } => randomized(matrix, k, oversample, power_iterations, seed),
    }
}

/// Randomized range finder followed by an exact SVD of the projected matrix.
///
/// Only `k + oversample` directions are ever factored, so the cost is
/// `O(rows * cols * (k + oversample))` per pass instead of the full SVD.
fn randomized(
    matrix: &DMatrix<f64>,
    k: usize,
    oversample: usize,
    power_iterations: usize,
    seed: u64,
) -> Result<TruncatedDecomposition> {
    let (rows, cols) = matrix.shape();
    let n = rows.min(cols);
    if k == 0 || k > n {
        return Err(CodecError::InvalidRank {
            rank: k,
            rows,
            cols,
        });
    }
    let width = (k + oversample).min(n);
    debug!(
        "randomized SVD {rows}x{cols}: k={k} width={width} power_iterations={power_iterations}"
    );

    let mut rng = StdRng::seed_from_u64(seed);
    let omega = DMatrix::<f64>::from_fn(cols, width, |_, _| StandardNormal.sample(&mut rng));

    let mut q = orthonormal_basis(matrix * &omega);
    for _ in 0..power_iterations {
        let z = orthonormal_basis(matrix.transpose() * &q);
        q = orthonormal_basis(matrix * &z);
    }

    let projected = q.transpose() * matrix;
    let small = decompose(&projected)?;
    let lifted = FullDecomposition {
        u: &q * &small.u,
        s: small.s,
        v: small.v,
    };
    truncate(&lifted, k)
}

fn orthonormal_basis(m: DMatrix<f64>) -> DMatrix<f64> {
    m.qr().q()
}
