// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Error types for the two halves of the library.  Every one of these
//! is a local input-validation failure: the value that raised it is
//! left exactly as it was before the call.

/// Failures raised while mapping or computing the fractal field.
#[derive(Debug, Fail, Clone, PartialEq)]
pub enum FieldError {
    /// The viewport is degenerate, inverted, non-finite, or cannot be
    /// mapped onto the requested grid.
    #[fail(display = "invalid viewport: {}", _0)]
    InvalidViewport(String),

    /// A worker thread died while computing its band of rows.
    #[fail(display = "a recompute worker thread panicked")]
    WorkerPanicked,
}

/// Failures raised by the gradient palette.
#[derive(Debug, Fail, Clone, PartialEq)]
pub enum PaletteError {
    /// The requested gradient is not one we know how to draw.
    #[fail(display = "unknown gradient: {}", _0)]
    UnknownGradient(String),

    /// A color table lookup outside `[0, size)`.
    #[fail(display = "index {} is outside the color table of {} entries", index, size)]
    IndexOutOfRange {
        /// The index asked for.
        index: usize,
        /// The length of the table.
        size: usize,
    },

    /// The normalization domain is not finite or runs backwards.
    #[fail(display = "invalid domain [{}, {}]", min, max)]
    InvalidDomain {
        /// Value mapped to the first table entry.
        min: f64,
        /// Value mapped to the last table entry.
        max: f64,
    },

    /// A color table must hold at least one entry.
    #[fail(display = "the color table must have at least one entry")]
    InvalidTableSize,
}
