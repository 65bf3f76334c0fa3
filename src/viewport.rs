// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Contains the Viewport struct, which describes the rectangle of the
//! complex plane currently shown, and the mapping between that
//! rectangle and an integral pixel grid with its origin at the top
//! left corner.  Pixel rows grow downward, so row 0 is `imag_max`.
use num::Complex;

use errors::FieldError;

/// Describes the x, y of a pixel in the grid.  x is the column, y is
/// the row, counted from the top left.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pixel(pub usize, pub usize);

/// The rectangle of the complex plane mapped onto the pixel grid.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Viewport {
    /// Left edge, mapped to pixel column 0.
    pub real_min: f64,
    /// Right edge, mapped to the last pixel column.
    pub real_max: f64,
    /// Bottom edge, mapped to the last pixel row.
    pub imag_min: f64,
    /// Top edge, mapped to pixel row 0.
    pub imag_max: f64,
}

impl Viewport {
    /// Constructor.  Fails unless all four bounds are finite and both
    /// intervals are non-degenerate and correctly ordered.
    pub fn new(
        real_min: f64,
        real_max: f64,
        imag_min: f64,
        imag_max: f64,
    ) -> Result<Viewport, FieldError> {
        let viewport = Viewport {
            real_min,
            real_max,
            imag_min,
            imag_max,
        };
        viewport.validate()?;
        Ok(viewport)
    }

    /// The opening view: the given real interval, with the imaginary
    /// interval centered on the real axis and sized so the view has
    /// the same aspect ratio as a `width` x `height` grid.
    pub fn centered(
        real_min: f64,
        real_max: f64,
        width: usize,
        height: usize,
    ) -> Result<Viewport, FieldError> {
        if width == 0 || height == 0 {
            return Err(FieldError::InvalidViewport(format!(
                "pixel grid {}x{} is empty",
                width, height
            )));
        }
        let imag_max = (height as f64) * (real_max - real_min) / (2.0 * (width as f64));
        Viewport::new(real_min, real_max, -imag_max, imag_max)
    }

    /// Checks the invariants a viewport must hold before it may be
    /// mapped onto a grid.
    pub fn validate(&self) -> Result<(), FieldError> {
        let bounds = [self.real_min, self.real_max, self.imag_min, self.imag_max];
        if bounds.iter().any(|b| !b.is_finite()) {
            return Err(FieldError::InvalidViewport(format!(
                "bounds must be finite: {:?}",
                self
            )));
        }
        if !(self.real_min < self.real_max) {
            return Err(FieldError::InvalidViewport(format!(
                "real interval [{}, {}] is empty or inverted",
                self.real_min, self.real_max
            )));
        }
        if !(self.imag_min < self.imag_max) {
            return Err(FieldError::InvalidViewport(format!(
                "imaginary interval [{}, {}] is empty or inverted",
                self.imag_min, self.imag_max
            )));
        }
        if !self.real_span().is_finite() || !self.imag_span().is_finite() {
            return Err(FieldError::InvalidViewport(format!(
                "span of {:?} overflows",
                self
            )));
        }
        Ok(())
    }

    /// Width of the viewport on the real axis.
    pub fn real_span(&self) -> f64 {
        self.real_max - self.real_min
    }

    /// Height of the viewport on the imaginary axis.
    pub fn imag_span(&self) -> f64 {
        self.imag_max - self.imag_min
    }

    /// Real part of the point under pixel column `column` of a grid
    /// `width` pixels wide.  Both edges are included: column 0 is
    /// `real_min` and column `width - 1` is `real_max`.
    pub fn column_to_real(&self, column: usize, width: usize) -> f64 {
        along(self.real_min, self.real_max, column, width)
    }

    /// Imaginary part of the point under pixel row `row` of a grid
    /// `height` pixels tall.  Row 0 is `imag_max`, the last row is
    /// `imag_min`.
    pub fn row_to_imag(&self, row: usize, height: usize) -> f64 {
        along(self.imag_max, self.imag_min, row, height)
    }

    /// Given a pixel on the grid, the point on the complex plane it
    /// stands for.
    pub fn pixel_to_point(&self, pixel: &Pixel, width: usize, height: usize) -> Complex<f64> {
        Complex::new(
            self.column_to_real(pixel.0, width),
            self.row_to_imag(pixel.1, height),
        )
    }

    /// Turns a drag rectangle (click at the top left, release at the
    /// bottom right) into the next viewport.  The horizontal extent
    /// comes from the drag; the vertical extent is recomputed from it
    /// so the new view keeps the grid's aspect ratio, anchored at the
    /// click's row.  A drag that runs right-to-left is not swapped: it
    /// produces an inverted viewport and is rejected.
    pub fn rectangle_to_viewport(
        &self,
        width: usize,
        height: usize,
        click: Pixel,
        release: Pixel,
    ) -> Result<Viewport, FieldError> {
        self.validate()?;
        for &(name, pixel) in &[("click", click), ("release", release)] {
            if pixel.0 >= width || pixel.1 >= height {
                return Err(FieldError::InvalidViewport(format!(
                    "{} at {:?} lies outside the {}x{} grid",
                    name, pixel, width, height
                )));
            }
        }

        let real_min = self.column_to_real(click.0, width);
        let real_max = self.column_to_real(release.0, width);
        let imag_max = self.row_to_imag(click.1, height);
        let imag_min = imag_max - (height as f64) * (real_max - real_min) / (width as f64);
        Viewport::new(real_min, real_max, imag_min, imag_max)
    }
}

/// The `index`th of `count` evenly spaced values from `start` to `end`
/// inclusive.  Each value is measured from the nearer end, so both ends
/// come out exact and a range symmetric about zero gives values that
/// are exact negations of each other.
fn along(start: f64, end: f64, index: usize, count: usize) -> f64 {
    if count < 2 {
        return start;
    }
    let last = count - 1;
    let step = (end - start) / (last as f64);
    if index * 2 <= last {
        start + (index as f64) * step
    } else {
        end - ((last - index) as f64) * step
    }
}
