//! Spatial frequency transform applied to every 8×8 sample block.
//!
//! The codec only relies on the [`Transform`] contract (a forward transform
//! and its exact inverse). [`Dct2d`] is the separable orthonormal DCT-II /
//! DCT-III pair used by default.

use std::sync::OnceLock;

use crate::matrix::{Matrix, BLOCK_SIDE};

/// Forward/inverse block transform.
pub trait Transform {
    fn forward(&self, block: &Matrix<f64>) -> Matrix<f64>;
    fn inverse(&self, coefficients: &Matrix<f64>) -> Matrix<f64>;
}

/// `BASIS[u][x] = C(u) * cos((2x + 1) * u * PI / 16)` with the orthonormal
/// scale `C(0) = 1/sqrt(8)`, `C(u>0) = 1/2`.
static BASIS: OnceLock<[[f64; BLOCK_SIDE]; BLOCK_SIDE]> = OnceLock::new();

fn basis() -> &'static [[f64; BLOCK_SIDE]; BLOCK_SIDE] {
    BASIS.get_or_init(|| {
        let mut table = [[0.0f64; BLOCK_SIDE]; BLOCK_SIDE];
        for (u, row) in table.iter_mut().enumerate() {
            let scale = if u == 0 { (1.0 / 8.0f64).sqrt() } else { 0.5 };
            for (x, cell) in row.iter_mut().enumerate() {
                *cell = scale
                    * ((2 * x + 1) as f64 * u as f64 * std::f64::consts::PI / 16.0).cos();
            }
        }
        table
    })
}

/// Orthonormal two dimensional DCT over 8×8 blocks.
#[derive(Debug, Clone, Copy, Default)]
pub struct Dct2d;

impl Transform for Dct2d {
    fn forward(&self, block: &Matrix<f64>) -> Matrix<f64> {
        debug_assert_eq!(block.shape(), (BLOCK_SIDE, BLOCK_SIDE));
        let b = basis();

        // rows, then columns
        let rows = Matrix::from_fn(BLOCK_SIDE, BLOCK_SIDE, |y, u| {
            (0..BLOCK_SIDE).map(|x| b[u][x] * block[(y, x)]).sum::<f64>()
        });
        Matrix::from_fn(BLOCK_SIDE, BLOCK_SIDE, |v, u| {
            (0..BLOCK_SIDE).map(|y| b[v][y] * rows[(y, u)]).sum::<f64>()
        })
    }

    fn inverse(&self, coefficients: &Matrix<f64>) -> Matrix<f64> {
        debug_assert_eq!(coefficients.shape(), (BLOCK_SIDE, BLOCK_SIDE));
        let b = basis();

        let cols = Matrix::from_fn(BLOCK_SIDE, BLOCK_SIDE, |y, u| {
            (0..BLOCK_SIDE).map(|v| b[v][y] * coefficients[(v, u)]).sum::<f64>()
        });
        Matrix::from_fn(BLOCK_SIDE, BLOCK_SIDE, |y, x| {
            (0..BLOCK_SIDE).map(|u| b[u][x] * cols[(y, u)]).sum::<f64>()
        })
    }
}
