#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Mandelbrot zoomer
//!
//! The Mandelbrot set is the set of points `c` on the complex plane
//! for which repeatedly squaring and adding, `z -> z * z + c` starting
//! from zero, never runs off to infinity.  Points outside the set do
//! run away, some quickly and some slowly, and the number of steps
//! they take to get past `|z| = 2` is what we color.
//!
//! The library has two halves that never talk to each other.  The
//! [`FractalField`] owns a viewport onto the complex plane and turns
//! it into a matrix of iteration counts for a pixel grid; it can also
//! turn a drag rectangle on that grid into the next viewport.  The
//! [`GradientPalette`] owns a named color ramp and a lookup table
//! from iteration count to color.  The host, in [`frame`], reads each
//! count and looks up its color.

extern crate crossbeam;
#[macro_use]
extern crate failure;
extern crate itertools;
#[macro_use]
extern crate log;
extern crate num;

pub mod errors;
pub mod field;
pub mod frame;
pub mod gradient;
pub mod palette;
pub mod viewport;

pub use errors::{FieldError, PaletteError};
pub use field::{escape_time, FractalField, IterationMatrix};
pub use frame::{colorize, FrameBuffer};
pub use palette::{Color, Encoding, GradientPalette, GradientSpec};
pub use viewport::{Pixel, Viewport};
