// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The escape-time field.
//!
//! Every pixel of the grid stands for a point `c` on the complex
//! plane.  Starting from `z = 0` we repeatedly replace `z` with
//! `z * z + c` and count how many steps it takes before `|z|` climbs
//! past 2 (that is, `|z|^2` past 4).  Points that are still bounded
//! when we run out of steps are taken to be in the Mandelbrot set, and
//! are recorded at the cap, which is one less than the iteration
//! limit.  That cap is the table index the host colors as "in the
//! set", so it matters that it is exactly `max_iterations - 1`.

use std::time::Instant;

use crossbeam;
use itertools::iproduct;
use num::Complex;

use errors::FieldError;
use viewport::{Pixel, Viewport};

/// Counts the steps `z -> z * z + c` takes, starting from zero, before
/// `|z|^2` exceeds 4, giving up at `max_iterations - 1`.  The escape
/// test runs before every step, so the value used in a step has always
/// been checked first.
pub fn escape_time(c: Complex<f64>, max_iterations: u32) -> u32 {
    let cap = max_iterations.saturating_sub(1);
    let mut z: Complex<f64> = Complex { re: 0.0, im: 0.0 };
    let mut iterations = 0;
    while iterations < cap && z.norm_sqr() <= 4.0 {
        z = z * z + c;
        iterations += 1;
    }
    iterations
}

/// The iteration count of every pixel in a `width` x `height` grid,
/// stored row by row from the top left.
#[derive(Clone, Debug, PartialEq)]
pub struct IterationMatrix {
    width: usize,
    height: usize,
    counts: Vec<u32>,
}

impl IterationMatrix {
    /// Number of columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// The count at column `pixel.0`, row `pixel.1`, or None off the
    /// grid.
    pub fn get(&self, pixel: Pixel) -> Option<u32> {
        if pixel.0 >= self.width || pixel.1 >= self.height {
            return None;
        }
        Some(self.counts[pixel.1 * self.width + pixel.0])
    }

    /// All counts, row-major.
    pub fn counts(&self) -> &[u32] {
        &self.counts
    }

    /// The counts one row at a time, top to bottom.
    pub fn rows(&self) -> ::std::slice::Chunks<u32> {
        self.counts.chunks(self.width)
    }
}

/// Fills `band`, which holds whole rows starting at `first_row`, with
/// the escape times of its pixels.
fn fill_band(
    viewport: &Viewport,
    width: usize,
    height: usize,
    first_row: usize,
    band: &mut [u32],
    max_iterations: u32,
) {
    let reals: Vec<f64> = (0..width)
        .map(|column| viewport.column_to_real(column, width))
        .collect();
    let rows = band.len() / width;
    for ((row, column), count) in
        iproduct!(first_row..first_row + rows, 0..width).zip(band.iter_mut())
    {
        let c = Complex::new(reals[column], viewport.row_to_imag(row, height));
        *count = escape_time(c, max_iterations);
    }
}

/// Computes a fresh matrix.  With more than one thread the rows are
/// dealt out in contiguous bands, one band per scoped thread, and each
/// thread writes only into its own band.  Nothing is returned until
/// every band is finished.
fn compute(
    viewport: &Viewport,
    width: usize,
    height: usize,
    max_iterations: u32,
    threads: usize,
) -> Result<IterationMatrix, FieldError> {
    let mut counts = vec![0 as u32; width * height];
    if threads <= 1 || height < 2 {
        fill_band(viewport, width, height, 0, &mut counts, max_iterations);
    } else {
        let rows_per_band = (height + threads - 1) / threads;
        crossbeam::scope(|spawner| {
            for (index, band) in counts.chunks_mut(rows_per_band * width).enumerate() {
                spawner.spawn(move |_| {
                    fill_band(
                        viewport,
                        width,
                        height,
                        index * rows_per_band,
                        band,
                        max_iterations,
                    )
                });
            }
        })
        .map_err(|_| FieldError::WorkerPanicked)?;
    }
    Ok(IterationMatrix {
        width,
        height,
        counts,
    })
}

fn check_grid(width: usize, height: usize) -> Result<(), FieldError> {
    if width == 0 || height == 0 {
        return Err(FieldError::InvalidViewport(format!(
            "pixel grid {}x{} is empty",
            width, height
        )));
    }
    Ok(())
}

/// Owns the current viewport, the grid it is mapped onto, and the
/// iteration counts for that grid.  The counts are rebuilt from
/// scratch whenever any of those change, and the new matrix replaces
/// the old one only once it is complete; a failed call changes
/// nothing.
#[derive(Debug)]
pub struct FractalField {
    viewport: Viewport,
    width: usize,
    height: usize,
    max_iterations: u32,
    threads: usize,
    matrix: IterationMatrix,
}

impl FractalField {
    /// Requires the viewport, the width and height of the pixel grid,
    /// and the iteration limit.  Computes the field immediately, on one
    /// thread.
    pub fn new(
        viewport: Viewport,
        width: usize,
        height: usize,
        max_iterations: u32,
    ) -> Result<Self, FieldError> {
        FractalField::threaded(viewport, width, height, max_iterations, 1)
    }

    /// As `new`, spreading this and every later recompute over
    /// `threads` threads.
    pub fn threaded(
        viewport: Viewport,
        width: usize,
        height: usize,
        max_iterations: u32,
        threads: usize,
    ) -> Result<Self, FieldError> {
        viewport.validate()?;
        check_grid(width, height)?;
        let threads = threads.max(1);
        let matrix = compute(&viewport, width, height, max_iterations, threads)?;
        Ok(FractalField {
            viewport,
            width,
            height,
            max_iterations,
            threads,
            matrix,
        })
    }

    /// Sets the number of threads later recomputes use.  The counts
    /// are the same for any thread count.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads.max(1);
        self
    }

    /// The viewport the current matrix was computed for.
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Width of the pixel grid.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height of the pixel grid.
    pub fn height(&self) -> usize {
        self.height
    }

    /// The iteration limit.  Counts never exceed one less than this.
    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    /// The current iteration counts.
    pub fn matrix(&self) -> &IterationMatrix {
        &self.matrix
    }

    /// Recomputes the whole field for a new viewport, grid, or limit.
    pub fn recompute(
        &mut self,
        viewport: Viewport,
        width: usize,
        height: usize,
        max_iterations: u32,
    ) -> Result<&IterationMatrix, FieldError> {
        viewport.validate()?;
        check_grid(width, height)?;

        let started = Instant::now();
        let matrix = compute(&viewport, width, height, max_iterations, self.threads)?;
        debug!(
            "recomputed {}x{} at {} iterations on {} thread(s) in {:?}",
            width,
            height,
            max_iterations,
            self.threads,
            started.elapsed()
        );

        self.viewport = viewport;
        self.width = width;
        self.height = height;
        self.max_iterations = max_iterations;
        self.matrix = matrix;
        Ok(&self.matrix)
    }

    /// Maps a drag rectangle on a `width` x `height` grid showing
    /// `viewport` to the viewport that zooms in on it.  See
    /// [`Viewport::rectangle_to_viewport`].
    pub fn rectangle_to_viewport(
        viewport: &Viewport,
        width: usize,
        height: usize,
        click: Pixel,
        release: Pixel,
    ) -> Result<Viewport, FieldError> {
        viewport.rectangle_to_viewport(width, height, click, release)
    }

    /// Zooms in on a drag rectangle of the current grid and recomputes.
    pub fn zoom(&mut self, click: Pixel, release: Pixel) -> Result<&IterationMatrix, FieldError> {
        let next = self
            .viewport
            .rectangle_to_viewport(self.width, self.height, click, release)?;
        info!(
            "zoom {:?} -> {:?}: Re = [{}, {}], Im = [{}, {}]",
            click, release, next.real_min, next.real_max, next.imag_min, next.imag_max
        );
        let (width, height, max_iterations) = (self.width, self.height, self.max_iterations);
        self.recompute(next, width, height, max_iterations)
    }
}
