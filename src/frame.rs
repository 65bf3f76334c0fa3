// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Composes an iteration matrix and a palette into 8-bit RGB pixels.
//! Neither the field nor the palette knows about the other; this is the
//! host's side of the pipeline, shared by the binary, the tests, and
//! the benchmarks.

use errors::PaletteError;
use field::IterationMatrix;
use palette::{Color, GradientPalette};

/// A packed RGB8 frame, row-major from the top left.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameBuffer {
    /// Number of columns.
    pub width: usize,
    /// Number of rows.
    pub height: usize,
    /// `width * height * 3` bytes.
    pub pixels: Vec<u8>,
}

impl FrameBuffer {
    /// A black frame.
    pub fn new(width: usize, height: usize) -> Self {
        FrameBuffer {
            width,
            height,
            pixels: vec![0 as u8; width * height * 3],
        }
    }

    /// Paints every pixel with the table entry its iteration count
    /// indexes.  Fails if a count falls outside the table, which means
    /// the table is smaller than the iteration limit.
    pub fn paint(
        &mut self,
        matrix: &IterationMatrix,
        palette: &GradientPalette,
    ) -> Result<(), PaletteError> {
        if matrix.width() != self.width || matrix.height() != self.height {
            *self = FrameBuffer::new(matrix.width(), matrix.height());
        }
        for (pixel, &count) in self.pixels.chunks_mut(3).zip(matrix.counts()) {
            let rgb = palette.table_lookup(count as usize)?.to_rgb8();
            pixel.copy_from_slice(&rgb);
        }
        Ok(())
    }
}

/// Paints a fresh frame.
pub fn colorize(
    matrix: &IterationMatrix,
    palette: &GradientPalette,
) -> Result<FrameBuffer, PaletteError> {
    let mut frame = FrameBuffer::new(matrix.width(), matrix.height());
    frame.paint(matrix, palette)?;
    Ok(frame)
}

/// Draws the set in black by overwriting the table's last entry, the
/// one the iteration cap indexes.  The override lives in the table, so
/// it must be applied again after every rebuild of the palette.
pub fn paint_set_black(palette: &mut GradientPalette) -> Result<(), PaletteError> {
    let last = palette.spec().table_size - 1;
    let black = Color::black(palette.spec().encoding);
    palette.override_slot(last, black)
}

/// Undoes `paint_set_black`.
pub fn paint_set_gradient(palette: &mut GradientPalette) -> Result<(), PaletteError> {
    let last = palette.spec().table_size - 1;
    palette.restore_slot(last)
}
