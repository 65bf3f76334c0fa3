// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The named color ramps.  Each gradient is a list of RGB anchor
//! stops on `[0, 1]`; a position between two stops is linearly
//! interpolated channel by channel.  The perceptual maps (viridis and
//! friends) are listed as evenly spaced stops; the analytic ones
//! (spring, hot, ...) are given at their exact breakpoints.

use num::clamp;

/// One anchor of a gradient: a position on `[0, 1]` and the RGB color
/// found there.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Stop(pub f64, pub [f64; 3]);

/// A continuous color ramp.
#[derive(Clone, Debug, PartialEq)]
pub struct Gradient {
    name: &'static str,
    stops: Vec<Stop>,
}

/// The gradients `cycle()` steps through, in order.  A small subset
/// of everything supported.
pub const CYCLE_NAMES: [&str; 11] = [
    "viridis", "plasma", "magma", "inferno", "cividis", "spring", "summer", "autumn", "winter",
    "hot", "twilight",
];

/// Gradients that can be selected by name but are never reached by
/// cycling.
const EXTRA_NAMES: [&str; 6] = ["gray", "bone", "cool", "copper", "pink", "binary"];

const VIRIDIS: [u32; 9] = [
    0x44_01_54, 0x47_2d_7b, 0x3b_52_8b, 0x2c_72_8e, 0x21_91_8c, 0x28_ae_80, 0x5e_c9_62,
    0xad_dc_30, 0xfd_e7_25,
];
const PLASMA: [u32; 9] = [
    0x0d_08_87, 0x54_02_a3, 0x8b_0a_a5, 0xb9_32_89, 0xdb_5c_68, 0xf4_88_4a, 0xfe_bc_2a,
    0xfa_e6_27, 0xf0_f9_21,
];
const MAGMA: [u32; 9] = [
    0x00_00_04, 0x1c_10_44, 0x4f_12_7b, 0x81_25_81, 0xb5_36_7a, 0xe5_59_64, 0xfb_87_61,
    0xfe_c2_87, 0xfc_fd_bf,
];
const INFERNO: [u32; 10] = [
    0x00_00_04, 0x1b_0c_41, 0x4a_0c_6b, 0x78_1c_6d, 0xa5_2c_60, 0xcf_44_46, 0xed_69_25,
    0xfb_9b_06, 0xf7_d1_3d, 0xfc_ff_a4,
];
const CIVIDIS: [u32; 10] = [
    0x00_22_4e, 0x12_35_70, 0x3b_49_6c, 0x57_5d_6d, 0x70_71_73, 0x8a_87_79, 0xa6_9d_75,
    0xc4_b5_6c, 0xe4_cf_5b, 0xfe_e8_38,
];
// Cyclic: starts and ends on the same pale lilac.
const TWILIGHT: [u32; 11] = [
    0xe2_d9_e2, 0xa4_be_cb, 0x6d_8e_c4, 0x5d_57_b4, 0x4a_24_74, 0x2f_14_36, 0x63_1d_4a,
    0x9e_3d_4f, 0xc2_6e_5f, 0xd7_ab_9b, 0xe2_d9_e2,
];

fn hex(rgb: u32) -> [f64; 3] {
    [
        f64::from((rgb >> 16) & 0xff) / 255.0,
        f64::from((rgb >> 8) & 0xff) / 255.0,
        f64::from(rgb & 0xff) / 255.0,
    ]
}

fn listed(colors: &[u32]) -> Vec<Stop> {
    let last = (colors.len() - 1) as f64;
    colors
        .iter()
        .enumerate()
        .map(|(i, &c)| Stop(i as f64 / last, hex(c)))
        .collect()
}

fn segmented(stops: &[(f64, [f64; 3])]) -> Vec<Stop> {
    stops.iter().map(|&(at, rgb)| Stop(at, rgb)).collect()
}

fn stops_for(name: &str) -> Option<Vec<Stop>> {
    let stops = match name {
        "viridis" => listed(&VIRIDIS),
        "plasma" => listed(&PLASMA),
        "magma" => listed(&MAGMA),
        "inferno" => listed(&INFERNO),
        "cividis" => listed(&CIVIDIS),
        "twilight" => listed(&TWILIGHT),
        "spring" => segmented(&[(0.0, [1.0, 0.0, 1.0]), (1.0, [1.0, 1.0, 0.0])]),
        "summer" => segmented(&[(0.0, [0.0, 0.5, 0.4]), (1.0, [1.0, 1.0, 0.4])]),
        "autumn" => segmented(&[(0.0, [1.0, 0.0, 0.0]), (1.0, [1.0, 1.0, 0.0])]),
        "winter" => segmented(&[(0.0, [0.0, 0.0, 1.0]), (1.0, [0.0, 1.0, 0.5])]),
        "hot" => segmented(&[
            (0.0, [0.0416, 0.0, 0.0]),
            (0.365079, [1.0, 0.0, 0.0]),
            (0.746032, [1.0, 1.0, 0.0]),
            (1.0, [1.0, 1.0, 1.0]),
        ]),
        "gray" => segmented(&[(0.0, [0.0, 0.0, 0.0]), (1.0, [1.0, 1.0, 1.0])]),
        "binary" => segmented(&[(0.0, [1.0, 1.0, 1.0]), (1.0, [0.0, 0.0, 0.0])]),
        "cool" => segmented(&[(0.0, [0.0, 1.0, 1.0]), (1.0, [1.0, 0.0, 1.0])]),
        "copper" => segmented(&[
            (0.0, [0.0, 0.0, 0.0]),
            (0.809524, [1.0, 0.6324, 0.4027]),
            (1.0, [1.0, 0.7812, 0.4975]),
        ]),
        "bone" => segmented(&[
            (0.0, [0.0, 0.0, 0.0]),
            (0.365079, [0.319_444, 0.319_444, 0.444_444]),
            (0.746032, [0.652_778, 0.777_778, 0.777_778]),
            (1.0, [1.0, 1.0, 1.0]),
        ]),
        "pink" => listed(&[
            0x1e_00_00, 0x8a_55_55, 0xbd_8b_7b, 0xd2_b4_98, 0xe8_e8_b4, 0xff_ff_ff,
        ]),
        _ => return None,
    };
    Some(stops)
}

/// Every gradient name `Gradient::named` accepts: the cycle list
/// first, then the extras.
pub fn supported_names() -> Vec<&'static str> {
    CYCLE_NAMES.iter().chain(EXTRA_NAMES.iter()).cloned().collect()
}

/// Whether `name` is one of the supported gradients.
pub fn is_supported(name: &str) -> bool {
    supported_names().contains(&name)
}

impl Gradient {
    /// Looks a gradient up by name.
    pub fn named(name: &str) -> Option<Gradient> {
        let name = supported_names().into_iter().find(|n| *n == name)?;
        let stops = stops_for(name)?;
        Some(Gradient { name, stops })
    }

    /// The gradient's name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// RGB at position `t`.  Positions outside `[0, 1]` take the color
    /// of the nearest end.
    pub fn at(&self, t: f64) -> [f64; 3] {
        let t = clamp(t, 0.0, 1.0);
        let first = self.stops[0];
        if t <= first.0 {
            return first.1;
        }
        for pair in self.stops.windows(2) {
            let (lo, hi) = (pair[0], pair[1]);
            if t <= hi.0 {
                let f = (t - lo.0) / (hi.0 - lo.0);
                return [
                    lo.1[0] + (hi.1[0] - lo.1[0]) * f,
                    lo.1[1] + (hi.1[1] - lo.1[1]) * f,
                    lo.1[2] + (hi.1[2] - lo.1[2]) * f,
                ];
            }
        }
        self.stops[self.stops.len() - 1].1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: [f64; 3], b: [f64; 3]) -> bool {
        a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() < 1e-9)
    }

    #[test]
    fn every_supported_name_resolves() {
        for name in supported_names() {
            let g = Gradient::named(name).unwrap();
            assert_eq!(g.name(), name);
        }
    }

    #[test]
    fn cycle_list_is_a_strict_subset() {
        let all = supported_names();
        assert!(CYCLE_NAMES.iter().all(|n| all.contains(n)));
        assert!(all.len() > CYCLE_NAMES.len());
    }

    #[test]
    fn unknown_names_do_not_resolve() {
        assert!(Gradient::named("unknown_name_xyz").is_none());
        assert!(!is_supported("Viridis"));
    }

    #[test]
    fn stops_are_ordered_and_span_the_unit_interval() {
        for name in supported_names() {
            let stops = stops_for(name).unwrap();
            assert_eq!(stops[0].0, 0.0, "{}", name);
            assert_eq!(stops[stops.len() - 1].0, 1.0, "{}", name);
            assert!(stops.windows(2).all(|w| w[0].0 < w[1].0), "{}", name);
        }
    }

    #[test]
    fn ends_and_midpoints_interpolate() {
        let g = Gradient::named("gray").unwrap();
        assert!(close(g.at(0.0), [0.0, 0.0, 0.0]));
        assert!(close(g.at(0.25), [0.25, 0.25, 0.25]));
        assert!(close(g.at(1.0), [1.0, 1.0, 1.0]));

        let g = Gradient::named("viridis").unwrap();
        assert!(close(g.at(0.0), hex(0x44_01_54)));
        assert!(close(g.at(1.0), hex(0xfd_e7_25)));
        assert!(close(g.at(0.5), hex(0x21_91_8c)));
    }

    #[test]
    fn positions_outside_the_ramp_clamp() {
        let g = Gradient::named("autumn").unwrap();
        assert!(close(g.at(-3.0), [1.0, 0.0, 0.0]));
        assert!(close(g.at(7.0), [1.0, 1.0, 0.0]));
    }

    #[test]
    fn hot_breakpoints_are_exact() {
        let g = Gradient::named("hot").unwrap();
        assert!(close(g.at(0.365079), [1.0, 0.0, 0.0]));
        assert!(close(g.at(0.746032), [1.0, 1.0, 0.0]));
    }
}
