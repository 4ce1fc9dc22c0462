//! Zigzag scan order between 2D block positions and the 1D coefficient
//! sequence.
//!
//! The scan visits coefficients by increasing spatial frequency, one
//! anti-diagonal at a time, alternating direction. It starts at (0,0), steps
//! right to (0,1) and ends at the bottom-right corner.

use crate::error::{CodecError, Result};
use crate::matrix::{Matrix, BLOCK_LEN, BLOCK_SIDE};

/// Maps zigzag index (0–63) to natural row-major index (0–63) of an 8×8
/// block.
#[rustfmt::skip]
pub const ZIGZAG_TO_NATURAL: [usize; BLOCK_LEN] = [
     0,  1,  8, 16,  9,  2,  3, 10,
    17, 24, 32, 25, 18, 11,  4,  5,
    12, 19, 26, 33, 40, 48, 41, 34,
    27, 20, 13,  6,  7, 14, 21, 28,
    35, 42, 49, 56, 57, 50, 43, 36,
    29, 22, 15, 23, 30, 37, 44, 51,
    58, 59, 52, 45, 38, 31, 39, 46,
    53, 60, 61, 54, 47, 55, 62, 63,
];

/// Scan order over a `rows` × `cols` matrix as `(row, col)` points.
pub fn zigzag_points(rows: usize, cols: usize) -> Vec<(usize, usize)> {
    let mut points = Vec::with_capacity(rows * cols);
    if rows == 0 || cols == 0 {
        return points;
    }

    for diagonal in 0..rows + cols - 1 {
        if diagonal % 2 == 0 {
            // up and to the right
            let mut row = diagonal.min(rows - 1);
            let mut col = diagonal - row;
            loop {
                points.push((row, col));
                if row == 0 || col + 1 == cols {
                    break;
                }
                row -= 1;
                col += 1;
            }
        } else {
            // down and to the left
            let mut col = diagonal.min(cols - 1);
            let mut row = diagonal - col;
            loop {
                points.push((row, col));
                if col == 0 || row + 1 == rows {
                    break;
                }
                row += 1;
                col -= 1;
            }
        }
    }

    points
}

/// Reads the block out in zigzag order.
pub fn block_to_zigzag<T: Copy>(block: &Matrix<T>) -> Vec<T> {
    if block.shape() == (BLOCK_SIDE, BLOCK_SIDE) {
        let natural = block.as_slice();
        return ZIGZAG_TO_NATURAL.iter().map(|&i| natural[i]).collect();
    }
    zigzag_points(block.rows(), block.cols())
        .into_iter()
        .map(|point| block[point])
        .collect()
}

/// Folds a zigzag sequence back into a square block.
pub fn zigzag_to_block<T: Copy + Default>(zigzag: &[T]) -> Result<Matrix<T>> {
    let side = integer_sqrt(zigzag.len());
    if side * side != zigzag.len() {
        return Err(CodecError::NotSquare { len: zigzag.len() });
    }

    let mut block = Matrix::filled(side, side, T::default());
    if side == BLOCK_SIDE {
        for (&value, &i) in zigzag.iter().zip(ZIGZAG_TO_NATURAL.iter()) {
            block[(i / BLOCK_SIDE, i % BLOCK_SIDE)] = value;
        }
        return Ok(block);
    }
    for (&value, point) in zigzag.iter().zip(zigzag_points(side, side)) {
        block[point] = value;
    }
    Ok(block)
}

fn integer_sqrt(n: usize) -> usize {
    let mut root = (n as f64).sqrt() as usize;
    while root * root > n {
        root -= 1;
    }
    while (root + 1) * (root + 1) <= n {
        root += 1;
    }
    root
}
