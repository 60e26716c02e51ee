//! Center-of-mass crop and area resampling into the classifier's input grid.

use crate::error::ValidationError;
use crate::raster::RasterBoard;

/// Axis-aligned bounding box of marked cells, end-exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub row_start: usize,
    pub row_end: usize,
    pub col_start: usize,
    pub col_end: usize,
}

/// Square region cut from a board around its center of mass.
#[derive(Debug, Clone, PartialEq)]
pub struct Crop {
    /// Mean (row, col) of marked cells
    pub centroid: (f32, f32),
    /// Centroid rounded to a cell, used for indexing
    pub center: (usize, usize),
    pub bounds: Bounds,
    /// Half the side of the square
    pub dim: usize,
    /// Zero cells added on every edge before extraction
    pub padding: usize,
    /// Top-left corner of the square in board coordinates; negative when it hangs off the board
    pub origin: (i64, i64),
    /// `2 * dim`
    pub side: usize,
    /// Row-major cells of the square, 0.0 or 1.0
    pub cells: Vec<f32>,
}

impl Crop {
    /// Whether the square covers the whole bounding box.
    pub fn contains_bounds(&self) -> bool {
        let (top, left) = self.origin;
        let side = self.side as i64;
        top <= self.bounds.row_start as i64
            && left <= self.bounds.col_start as i64
            && top + side >= self.bounds.row_end as i64
            && left + side >= self.bounds.col_end as i64
    }
}

/// Fixed-resolution image produced by [`DigitNormalizer`], values in `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedImage {
    side: usize,
    pixels: Vec<f32>,
}

impl NormalizedImage {
    pub fn side(&self) -> usize {
        self.side
    }

    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.pixels[row * self.side + col]
    }

    /// Row-major flattened pixels.
    pub fn as_slice(&self) -> &[f32] {
        &self.pixels
    }

    pub fn into_vec(self) -> Vec<f32> {
        self.pixels
    }
}

/// Crops a binary board to a centered square around its mass and resizes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DigitNormalizer {
    side: usize,
}

impl DigitNormalizer {
    /// `side` is the classifier's input resolution (e.g. 24 for 24x24).
    pub fn new(side: usize) -> Self {
        Self { side }
    }

    pub fn side(&self) -> usize {
        self.side
    }

    /// Crop `board` around its center of mass and resample to `side x side`.
    pub fn normalize(&self, board: &RasterBoard) -> Result<NormalizedImage, ValidationError> {
        let crop = crop_center_of_mass(board)?;
        let pixels = resize_area(&crop.cells, crop.side, crop.side, self.side, self.side);
        Ok(NormalizedImage {
            side: self.side,
            pixels,
        })
    }
}

/// Extract the smallest square centered on the center of mass that covers every
/// marked cell, zero-padding the board when the square runs past its edges.
pub fn crop_center_of_mass(board: &RasterBoard) -> Result<Crop, ValidationError> {
    let (rows, cols) = (board.rows(), board.cols());

    let mut count = 0usize;
    let (mut row_sum, mut col_sum) = (0usize, 0usize);
    let mut bounds = Bounds {
        row_start: usize::MAX,
        row_end: 0,
        col_start: usize::MAX,
        col_end: 0,
    };

    for row in 0..rows {
        for col in 0..cols {
            if board.get(row, col) == 0 {
                continue;
            }
            count += 1;
            row_sum += row;
            col_sum += col;
            bounds.row_start = bounds.row_start.min(row);
            bounds.row_end = bounds.row_end.max(row + 1);
            bounds.col_start = bounds.col_start.min(col);
            bounds.col_end = bounds.col_end.max(col + 1);
        }
    }

    if count == 0 {
        return Err(ValidationError::EmptyRaster { rows, cols });
    }

    let centroid = (
        row_sum as f32 / count as f32,
        col_sum as f32 / count as f32,
    );
    // Rounded centroid, kept inside the bounding box
    let center = (
        (centroid.0.round() as usize).clamp(bounds.row_start, bounds.row_end - 1),
        (centroid.1.round() as usize).clamp(bounds.col_start, bounds.col_end - 1),
    );
    let (cr, cc) = (center.0 as i64, center.1 as i64);

    let dim = [
        cr - bounds.row_start as i64,
        bounds.row_end as i64 - cr,
        cc - bounds.col_start as i64,
        bounds.col_end as i64 - cc,
    ]
    .into_iter()
    .max()
    .unwrap_or(1)
    .max(1);

    let padding = [
        dim - cr,
        dim - cc,
        cr + dim - rows as i64,
        cc + dim - cols as i64,
    ]
    .into_iter()
    .fold(0, i64::max);

    let padded = pad(board, padding as usize);
    let side = (2 * dim) as usize;
    let top = (cr + padding - dim) as usize;
    let left = (cc + padding - dim) as usize;

    let mut cells = Vec::with_capacity(side * side);
    for row in top..top + side {
        for col in left..left + side {
            cells.push(padded.get(row, col) as f32);
        }
    }

    Ok(Crop {
        centroid,
        center,
        bounds,
        dim: dim as usize,
        padding: padding as usize,
        origin: (cr - dim, cc - dim),
        side,
        cells,
    })
}

/// Copy `board` into a larger zero board with `padding` cells on every edge.
fn pad(board: &RasterBoard, padding: usize) -> RasterBoard {
    if padding == 0 {
        return board.clone();
    }
    let mut padded = RasterBoard::new(board.rows() + 2 * padding, board.cols() + 2 * padding);
    for row in 0..board.rows() {
        for col in 0..board.cols() {
            if board.get(row, col) == 1 {
                padded.set(row + padding, col + padding);
            }
        }
    }
    padded
}

/// For each output index along one axis, the source indices it covers and
/// the fraction of the output cell each one contributes.
fn axis_weights(src: usize, dst: usize) -> Vec<Vec<(usize, f32)>> {
    let scale = src as f64 / dst as f64;
    (0..dst)
        .map(|t| {
            let lo = (t * src) as f64 / dst as f64;
            let hi = ((t + 1) * src) as f64 / dst as f64;
            let first = lo.floor() as usize;
            let last = (hi.ceil() as usize).min(src);
            (first..last)
                .filter_map(|k| {
                    let overlap = hi.min((k + 1) as f64) - lo.max(k as f64);
                    (overlap > 0.0).then_some((k, (overlap / scale) as f32))
                })
                .collect()
        })
        .collect()
}

/// Resample a row-major image by area averaging.
///
/// Each output cell is the overlap-weighted mean of the source cells it covers,
/// which works for both shrinking and enlarging.
pub fn resize_area(
    src: &[f32],
    src_width: usize,
    src_height: usize,
    dst_width: usize,
    dst_height: usize,
) -> Vec<f32> {
    if src_width == 0 || src_height == 0 || dst_width == 0 || dst_height == 0 {
        return vec![0.0; dst_width * dst_height];
    }

    let x_weights = axis_weights(src_width, dst_width);
    let y_weights = axis_weights(src_height, dst_height);

    let mut out = Vec::with_capacity(dst_width * dst_height);
    for ys in &y_weights {
        for xs in &x_weights {
            let mut acc = 0.0f32;
            for &(sy, wy) in ys {
                let row = &src[sy * src_width..(sy + 1) * src_width];
                for &(sx, wx) in xs {
                    acc += row[sx] * wy * wx;
                }
            }
            out.push(acc);
        }
    }
    out
}
