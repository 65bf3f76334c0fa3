// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The GradientPalette maps scalars, usually iteration counts, to
//! colors.  It keeps a precomputed table of `table_size` colors evenly
//! spread across `[domain_min, domain_max]` for the per-pixel hot
//! path, and can also compute the exact color for any scalar on
//! demand.
//!
//! The table is a derived cache: changing anything in the
//! [`GradientSpec`] rebuilds it from scratch, and the rebuilt table
//! replaces the old one in a single assignment.  That includes any
//! slot written with [`GradientPalette::override_slot`], which is the
//! whole point of calling that method "lossy".

use std::fmt;
use std::str::FromStr;

use errors::PaletteError;
use gradient::{self, Gradient, CYCLE_NAMES};

/// How table entries and samples are encoded.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Encoding {
    /// Red, green, blue as `0..=255`.
    RgbU8,
    /// Red, green, blue as `0..=255`, alpha left as a float in `[0, 1]`.
    RgbaU8,
    /// Red, green, blue as floats in `[0, 1]`.
    RgbFloat,
    /// Red, green, blue, alpha as floats in `[0, 1]`.
    RgbaFloat,
}

impl FromStr for Encoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rgb_u8" => Ok(Encoding::RgbU8),
            "rgba_u8" => Ok(Encoding::RgbaU8),
            "rgb_f" => Ok(Encoding::RgbFloat),
            "rgba_f" => Ok(Encoding::RgbaFloat),
            _ => Err(format!("unknown color encoding: {}", s)),
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match *self {
            Encoding::RgbU8 => "rgb_u8",
            Encoding::RgbaU8 => "rgba_u8",
            Encoding::RgbFloat => "rgb_f",
            Encoding::RgbaFloat => "rgba_f",
        };
        write!(f, "{}", name)
    }
}

/// A single color in one of the four encodings.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Color {
    /// See [`Encoding::RgbU8`].
    Rgb8([u8; 3]),
    /// See [`Encoding::RgbaU8`].  The alpha is not scaled
    /// to 8 bits.
    Rgba8([u8; 3], f64),
    /// See [`Encoding::RgbFloat`].
    RgbF([f64; 3]),
    /// See [`Encoding::RgbaFloat`].
    RgbaF([f64; 4]),
}

fn to_u8(channel: f64) -> u8 {
    (255.0 * channel).round() as u8
}

impl Color {
    /// Encodes a float RGBA quadruple.
    pub fn encode(rgba: [f64; 4], encoding: Encoding) -> Color {
        let rgb8 = [to_u8(rgba[0]), to_u8(rgba[1]), to_u8(rgba[2])];
        match encoding {
            Encoding::RgbU8 => Color::Rgb8(rgb8),
            Encoding::RgbaU8 => Color::Rgba8(rgb8, rgba[3]),
            Encoding::RgbFloat => Color::RgbF([rgba[0], rgba[1], rgba[2]]),
            Encoding::RgbaFloat => Color::RgbaF(rgba),
        }
    }

    /// Opaque black in the given encoding.
    pub fn black(encoding: Encoding) -> Color {
        Color::encode([0.0, 0.0, 0.0, 1.0], encoding)
    }

    /// The encoding this color is in.
    pub fn encoding(&self) -> Encoding {
        match *self {
            Color::Rgb8(_) => Encoding::RgbU8,
            Color::Rgba8(..) => Encoding::RgbaU8,
            Color::RgbF(_) => Encoding::RgbFloat,
            Color::RgbaF(_) => Encoding::RgbaFloat,
        }
    }

    /// The color as float RGBA.  8-bit channels are scaled back to
    /// `[0, 1]`; colors without alpha are opaque.
    pub fn rgba(&self) -> [f64; 4] {
        let from_u8 = |c: [u8; 3]| {
            [
                f64::from(c[0]) / 255.0,
                f64::from(c[1]) / 255.0,
                f64::from(c[2]) / 255.0,
            ]
        };
        match *self {
            Color::Rgb8(c) => {
                let c = from_u8(c);
                [c[0], c[1], c[2], 1.0]
            }
            Color::Rgba8(c, alpha) => {
                let c = from_u8(c);
                [c[0], c[1], c[2], alpha]
            }
            Color::RgbF(c) => [c[0], c[1], c[2], 1.0],
            Color::RgbaF(c) => c,
        }
    }

    /// The same color in another encoding.
    pub fn to_encoding(&self, encoding: Encoding) -> Color {
        if self.encoding() == encoding {
            *self
        } else {
            Color::encode(self.rgba(), encoding)
        }
    }

    /// The color as 8-bit RGB, whatever its encoding, for writing to a
    /// frame buffer.  Alpha is dropped.
    pub fn to_rgb8(&self) -> [u8; 3] {
        match *self {
            Color::Rgb8(c) | Color::Rgba8(c, _) => c,
            Color::RgbF(c) => [to_u8(c[0]), to_u8(c[1]), to_u8(c[2])],
            Color::RgbaF(c) => [to_u8(c[0]), to_u8(c[1]), to_u8(c[2])],
        }
    }
}

/// Everything that determines the contents of the color table.
#[derive(Clone, Debug, PartialEq)]
pub struct GradientSpec {
    /// Name of the gradient, one of `supported_gradients()`.
    pub gradient_name: String,
    /// Scalar mapped to the first table entry.
    pub domain_min: f64,
    /// Scalar mapped to the last table entry.
    pub domain_max: f64,
    /// Number of entries in the table.
    pub table_size: usize,
    /// Encoding of every entry.
    pub encoding: Encoding,
}

impl Default for GradientSpec {
    fn default() -> Self {
        GradientSpec {
            gradient_name: "viridis".to_string(),
            domain_min: 0.0,
            domain_max: 255.0,
            table_size: 256,
            encoding: Encoding::RgbU8,
        }
    }
}

/// A named, cyclable gradient with its precomputed color table.
#[derive(Clone, Debug)]
pub struct GradientPalette {
    spec: GradientSpec,
    gradient: Gradient,
    table: Vec<Color>,
    cycle_index: usize,
}

fn check_domain(min: f64, max: f64) -> Result<(), PaletteError> {
    if min.is_finite() && max.is_finite() && min <= max && (max - min).is_finite() {
        Ok(())
    } else {
        Err(PaletteError::InvalidDomain { min, max })
    }
}

fn check_table_size(size: usize) -> Result<(), PaletteError> {
    if size == 0 {
        Err(PaletteError::InvalidTableSize)
    } else {
        Ok(())
    }
}

fn lookup(name: &str) -> Result<Gradient, PaletteError> {
    Gradient::named(name).ok_or_else(|| PaletteError::UnknownGradient(name.to_string()))
}

impl GradientPalette {
    /// Builds a palette, and its table, from a spec.  The cycle
    /// starts from the spec's gradient if that gradient is in the
    /// cycle list, and from the head of the list otherwise.
    pub fn new(spec: GradientSpec) -> Result<Self, PaletteError> {
        let gradient = lookup(&spec.gradient_name)?;
        check_domain(spec.domain_min, spec.domain_max)?;
        check_table_size(spec.table_size)?;
        let cycle_index = CYCLE_NAMES
            .iter()
            .position(|n| *n == spec.gradient_name)
            .unwrap_or(0);
        let mut palette = GradientPalette {
            spec,
            gradient,
            table: vec![],
            cycle_index,
        };
        palette.rebuild();
        Ok(palette)
    }

    /// All gradient names `set_gradient` accepts.
    pub fn supported_gradients() -> Vec<&'static str> {
        gradient::supported_names()
    }

    /// The names `cycle` walks through, in order.
    pub fn cycle_list() -> &'static [&'static str] {
        &CYCLE_NAMES
    }

    /// The current spec.
    pub fn spec(&self) -> &GradientSpec {
        &self.spec
    }

    /// Name of the current gradient.
    pub fn name(&self) -> &str {
        &self.spec.gradient_name
    }

    /// The whole color table.
    pub fn table(&self) -> &[Color] {
        &self.table
    }

    /// The scalar table entry `k` is sampled at.  The last entry is
    /// pinned to the upper end of the domain.
    fn table_value(&self, k: usize) -> f64 {
        let size = self.spec.table_size;
        let (min, max) = (self.spec.domain_min, self.spec.domain_max);
        if size < 2 {
            min
        } else if k + 1 == size {
            max
        } else {
            min + (k as f64) * ((max - min) / ((size - 1) as f64))
        }
    }

    fn rebuild(&mut self) {
        let table: Vec<Color> = (0..self.spec.table_size)
            .map(|k| self.sample(self.table_value(k)))
            .collect();
        debug!(
            "rebuilt {} table: {} entries over [{}, {}] as {}",
            self.spec.gradient_name,
            table.len(),
            self.spec.domain_min,
            self.spec.domain_max,
            self.spec.encoding
        );
        self.table = table;
    }

    /// Switches to the named gradient and rebuilds the table.  An
    /// unknown name leaves the palette untouched.  Picking a member of
    /// the cycle list moves the cycle to it.
    pub fn set_gradient(&mut self, name: &str) -> Result<(), PaletteError> {
        let gradient = lookup(name)?;
        if let Some(index) = CYCLE_NAMES.iter().position(|n| *n == name) {
            self.cycle_index = index;
        }
        self.gradient = gradient;
        self.spec.gradient_name = name.to_string();
        self.rebuild();
        info!("gradient: {}", name);
        Ok(())
    }

    /// Moves to the next gradient in the cycle list, wrapping at the
    /// end.
    pub fn cycle(&mut self) {
        let index = (self.cycle_index + 1) % CYCLE_NAMES.len();
        let name = CYCLE_NAMES[index];
        self.cycle_index = index;
        self.gradient = match Gradient::named(name) {
            Some(gradient) => gradient,
            None => unreachable!("cycle list names are always supported"),
        };
        self.spec.gradient_name = name.to_string();
        self.rebuild();
        info!("gradient: {}", name);
    }

    /// Changes the scalar range the table spans.
    pub fn set_domain(&mut self, min: f64, max: f64) -> Result<(), PaletteError> {
        check_domain(min, max)?;
        self.spec.domain_min = min;
        self.spec.domain_max = max;
        self.rebuild();
        Ok(())
    }

    /// Changes the number of table entries.
    pub fn set_table_size(&mut self, size: usize) -> Result<(), PaletteError> {
        check_table_size(size)?;
        self.spec.table_size = size;
        self.rebuild();
        Ok(())
    }

    /// Changes the encoding of the table and of `sample`.
    pub fn set_encoding(&mut self, encoding: Encoding) {
        self.spec.encoding = encoding;
        self.rebuild();
    }

    /// Where `value` falls on the gradient, as a fraction of the
    /// domain.  A zero-width domain puts everything at 0.
    fn normalize(&self, value: f64) -> f64 {
        let span = self.spec.domain_max - self.spec.domain_min;
        if span == 0.0 {
            0.0
        } else {
            (value - self.spec.domain_min) / span
        }
    }

    fn rgba(&self, value: f64) -> [f64; 4] {
        if value.is_nan() {
            return [0.0, 0.0, 0.0, 0.0];
        }
        let rgb = self.gradient.at(self.normalize(value));
        [rgb[0], rgb[1], rgb[2], 1.0]
    }

    /// The exact color for any scalar, in the palette's encoding.
    /// Values outside the domain get the end colors; NaN is
    /// transparent black.
    pub fn sample(&self, value: f64) -> Color {
        self.sample_as(value, self.spec.encoding)
    }

    /// As `sample`, in an explicit encoding.
    pub fn sample_as(&self, value: f64, encoding: Encoding) -> Color {
        Color::encode(self.rgba(value), encoding)
    }

    /// The precomputed color at `index`.
    pub fn table_lookup(&self, index: usize) -> Result<Color, PaletteError> {
        self.table
            .get(index)
            .cloned()
            .ok_or(PaletteError::IndexOutOfRange {
                index,
                size: self.table.len(),
            })
    }

    /// Overwrites one table entry in place.  This is lossy: the next
    /// rebuild (`set_gradient`, `cycle`, or any other spec change)
    /// recomputes the whole table and the override is gone.  Callers
    /// that want it to stick must apply it again after each of those.
    /// A color in another encoding is converted to the table's.
    pub fn override_slot(&mut self, index: usize, color: Color) -> Result<(), PaletteError> {
        let size = self.table.len();
        let color = color.to_encoding(self.spec.encoding);
        match self.table.get_mut(index) {
            Some(slot) => {
                *slot = color;
                Ok(())
            }
            None => Err(PaletteError::IndexOutOfRange { index, size }),
        }
    }

    /// Puts the computed color back into one table entry.
    pub fn restore_slot(&mut self, index: usize) -> Result<(), PaletteError> {
        let size = self.spec.table_size;
        if index >= size {
            return Err(PaletteError::IndexOutOfRange { index, size });
        }
        let value = self.table_value(index);
        let color = self.sample(value);
        self.override_slot(index, color)
    }
}

impl Default for GradientPalette {
    fn default() -> Self {
        match GradientPalette::new(GradientSpec::default()) {
            Ok(palette) => palette,
            Err(e) => unreachable!("the default spec is valid: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: Color, b: Color) {
        match (a, b) {
            (Color::Rgb8(x), Color::Rgb8(y)) => assert_eq!(x, y),
            (Color::Rgba8(x, xa), Color::Rgba8(y, ya)) => {
                assert_eq!(x, y);
                assert!((xa - ya).abs() < 1e-9);
            }
            (Color::RgbF(x), Color::RgbF(y)) => {
                assert!(x.iter().zip(y.iter()).all(|(p, q)| (p - q).abs() < 1e-9))
            }
            (Color::RgbaF(x), Color::RgbaF(y)) => {
                assert!(x.iter().zip(y.iter()).all(|(p, q)| (p - q).abs() < 1e-9))
            }
            (a, b) => panic!("{:?} and {:?} are in different encodings", a, b),
        }
    }

    fn spec(name: &str, size: usize, encoding: Encoding) -> GradientSpec {
        GradientSpec {
            gradient_name: name.to_string(),
            domain_min: 0.0,
            domain_max: (size - 1) as f64,
            table_size: size,
            encoding,
        }
    }

    #[test]
    fn default_palette_is_viridis_256() {
        let p = GradientPalette::default();
        assert_eq!(p.name(), "viridis");
        assert_eq!(p.table().len(), 256);
        assert_eq!(p.table_lookup(0).unwrap(), Color::Rgb8([0x44, 0x01, 0x54]));
        assert_eq!(p.table_lookup(255).unwrap(), Color::Rgb8([0xfd, 0xe7, 0x25]));
    }

    #[test]
    fn new_rejects_bad_specs() {
        assert_eq!(
            GradientPalette::new(spec("nope", 4, Encoding::RgbU8)).unwrap_err(),
            PaletteError::UnknownGradient("nope".to_string())
        );
        let mut s = spec("hot", 4, Encoding::RgbU8);
        s.table_size = 0;
        assert_eq!(
            GradientPalette::new(s).unwrap_err(),
            PaletteError::InvalidTableSize
        );
        let mut s = spec("hot", 4, Encoding::RgbU8);
        s.domain_min = 10.0;
        assert!(GradientPalette::new(s).is_err());
    }

    #[test]
    fn table_ends_match_samples_in_every_encoding() {
        let encodings = [
            Encoding::RgbU8,
            Encoding::RgbaU8,
            Encoding::RgbFloat,
            Encoding::RgbaFloat,
        ];
        for &encoding in &encodings {
            for name in GradientPalette::supported_gradients() {
                let p = GradientPalette::new(spec(name, 50, encoding)).unwrap();
                let last = p.spec().table_size - 1;
                assert_close(p.table_lookup(0).unwrap(), p.sample(p.spec().domain_min));
                assert_close(
                    p.table_lookup(last).unwrap(),
                    p.sample(p.spec().domain_max),
                );
            }
        }
    }

    #[test]
    fn table_length_follows_the_spec() {
        let mut p = GradientPalette::new(spec("magma", 10, Encoding::RgbU8)).unwrap();
        assert_eq!(p.table().len(), 10);
        p.set_table_size(1).unwrap();
        assert_eq!(p.table().len(), 1);
        assert_eq!(p.table_lookup(0).unwrap(), p.sample(0.0));
        p.set_table_size(1000).unwrap();
        assert_eq!(p.table().len(), 1000);
        assert_eq!(p.set_table_size(0), Err(PaletteError::InvalidTableSize));
        assert_eq!(p.table().len(), 1000);
    }

    #[test]
    fn lookup_outside_the_table_fails() {
        let p = GradientPalette::new(spec("hot", 8, Encoding::RgbU8)).unwrap();
        assert_eq!(
            p.table_lookup(8),
            Err(PaletteError::IndexOutOfRange { index: 8, size: 8 })
        );
        assert!(p.table_lookup(7).is_ok());
    }

    #[test]
    fn u8_channels_round_and_alpha_stays_float() {
        let p = GradientPalette::new(spec("gray", 3, Encoding::RgbaU8)).unwrap();
        // 127.5 rounds up, where truncation would give 127.
        assert_eq!(p.sample(1.0), Color::Rgba8([128, 128, 128], 1.0));
        assert_eq!(
            p.sample_as(1.0, Encoding::RgbaFloat),
            Color::RgbaF([0.5, 0.5, 0.5, 1.0])
        );
        assert_eq!(p.sample_as(2.0, Encoding::RgbU8), Color::Rgb8([255, 255, 255]));
    }

    #[test]
    fn sample_is_independent_of_table_size() {
        let mut p = GradientPalette::new(spec("plasma", 5, Encoding::RgbFloat)).unwrap();
        let before = p.sample(1.3);
        p.set_table_size(3).unwrap();
        assert_close(p.sample(1.3), before);
    }

    #[test]
    fn sample_clamps_and_handles_nan() {
        let p = GradientPalette::new(spec("autumn", 11, Encoding::RgbaFloat)).unwrap();
        assert_eq!(p.sample(-100.0), p.sample(0.0));
        assert_eq!(p.sample(1e9), p.sample(10.0));
        assert_eq!(p.sample(::std::f64::NAN), Color::RgbaF([0.0, 0.0, 0.0, 0.0]));
    }

    #[test]
    fn zero_width_domain_maps_everything_to_the_start() {
        let mut p = GradientPalette::new(spec("gray", 4, Encoding::RgbU8)).unwrap();
        p.set_domain(5.0, 5.0).unwrap();
        assert!(p.table().iter().all(|c| *c == Color::Rgb8([0, 0, 0])));
        assert_eq!(
            p.set_domain(3.0, 1.0),
            Err(PaletteError::InvalidDomain { min: 3.0, max: 1.0 })
        );
        assert_eq!(p.spec().domain_min, 5.0);
    }

    #[test]
    fn overflowing_domain_is_rejected() {
        let mut p = GradientPalette::default();
        assert_eq!(
            p.set_domain(-1e308, 1e308),
            Err(PaletteError::InvalidDomain {
                min: -1e308,
                max: 1e308
            })
        );
        assert_eq!(p.spec().domain_max, 255.0);
        assert_eq!(p.table_lookup(0).unwrap(), p.sample(p.spec().domain_min));

        p.set_domain(-1e307, 1e307).unwrap();
        assert_eq!(p.table_lookup(0).unwrap(), p.sample(-1e307));
    }

    #[test]
    fn unknown_gradient_leaves_the_table_alone() {
        let mut p = GradientPalette::new(spec("inferno", 16, Encoding::RgbU8)).unwrap();
        let before: Vec<Color> = p.table().to_vec();
        assert_eq!(
            p.set_gradient("unknown_name_xyz"),
            Err(PaletteError::UnknownGradient("unknown_name_xyz".to_string()))
        );
        assert_eq!(p.table(), &before[..]);
        assert_eq!(p.name(), "inferno");
    }

    #[test]
    fn set_gradient_accepts_names_outside_the_cycle() {
        let mut p = GradientPalette::default();
        p.set_gradient("copper").unwrap();
        assert_eq!(p.name(), "copper");
        assert_eq!(p.table_lookup(0).unwrap(), Color::Rgb8([0, 0, 0]));
    }

    #[test]
    fn cycle_wraps_back_to_the_start() {
        let mut p = GradientPalette::default();
        let start = p.name().to_string();
        p.cycle();
        assert_eq!(p.name(), "plasma");
        for _ in 1..GradientPalette::cycle_list().len() {
            p.cycle();
        }
        assert_eq!(p.name(), start);
    }

    #[test]
    fn cycle_continues_from_a_selected_member() {
        let mut p = GradientPalette::default();
        p.set_gradient("winter").unwrap();
        p.cycle();
        assert_eq!(p.name(), "hot");
        p.cycle();
        assert_eq!(p.name(), "twilight");
        p.cycle();
        assert_eq!(p.name(), "viridis");
    }

    #[test]
    fn override_is_lost_on_rebuild() {
        let mut p = GradientPalette::new(spec("viridis", 64, Encoding::RgbU8)).unwrap();
        let black = Color::black(Encoding::RgbU8);
        p.override_slot(63, black).unwrap();
        assert_eq!(p.table_lookup(63).unwrap(), black);
        assert_ne!(p.table_lookup(62).unwrap(), black);

        p.cycle();
        assert_ne!(p.table_lookup(63).unwrap(), black);
        assert_eq!(p.table_lookup(63).unwrap(), p.sample(63.0));
    }

    #[test]
    fn override_takes_the_table_encoding() {
        let mut p = GradientPalette::default();
        p.override_slot(255, Color::RgbaF([0.0, 0.0, 0.0, 1.0]))
            .unwrap();
        assert_eq!(p.table_lookup(255).unwrap(), Color::Rgb8([0, 0, 0]));
        assert!(p.table().iter().all(|c| c.encoding() == Encoding::RgbU8));

        p.set_encoding(Encoding::RgbaU8);
        p.override_slot(0, Color::Rgb8([255, 128, 0])).unwrap();
        assert_eq!(p.table_lookup(0).unwrap(), Color::Rgba8([255, 128, 0], 1.0));
    }

    #[test]
    fn restore_slot_undoes_an_override() {
        let mut p = GradientPalette::new(spec("hot", 10, Encoding::RgbU8)).unwrap();
        let original = p.table_lookup(4).unwrap();
        p.override_slot(4, Color::black(Encoding::RgbU8)).unwrap();
        p.restore_slot(4).unwrap();
        assert_eq!(p.table_lookup(4).unwrap(), original);
        assert!(p.override_slot(10, original).is_err());
    }

    #[test]
    fn encodings_parse_and_print() {
        for name in &["rgb_u8", "rgba_u8", "rgb_f", "rgba_f"] {
            let e: Encoding = name.parse().unwrap();
            assert_eq!(e.to_string(), *name);
        }
        assert!("rgb16".parse::<Encoding>().is_err());
    }
}
