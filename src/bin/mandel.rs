// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

extern crate clap;
extern crate env_logger;
extern crate failure;
extern crate image;
#[macro_use]
extern crate log;
extern crate mandelzoom;
extern crate num_cpus;

use clap::{App, Arg, ArgMatches};
use failure::{err_msg, Error};
use image::ColorType;
use mandelzoom::frame::{colorize, paint_set_black};
use mandelzoom::{Encoding, FractalField, GradientPalette, GradientSpec, Pixel, Viewport};
use std::path::Path;
use std::str::FromStr;

fn parse_pair<T>(s: &str, separator: char) -> Option<(T, T)>
where
    T: FromStr,
{
    match s.find(separator) {
        None => None,
        Some(index) => match (T::from_str(&s[..index]), T::from_str(&s[index + 1..])) {
            (Ok(l), Ok(r)) => Some((l, r)),
            _ => None,
        },
    }
}

/// A drag is written `CLICKX,CLICKY:RELEASEX,RELEASEY`, in pixels.
fn parse_drag(s: &str) -> Option<(Pixel, Pixel)> {
    let (click, release) = parse_pair::<String>(s, ':')?;
    let click = parse_pair::<usize>(&click, ',')?;
    let release = parse_pair::<usize>(&release, ',')?;
    Some((Pixel(click.0, click.1), Pixel(release.0, release.1)))
}

fn validate_pair<T: FromStr>(s: &str, separator: char, err: &str) -> Result<(), String> {
    match parse_pair::<T>(s, separator) {
        Some(_) => Ok(()),
        None => Err(err.to_string()),
    }
}

fn validate_range<T: FromStr + Ord>(
    s: &str,
    low: T,
    high: T,
    isnotanumber_err: &str,
    isnotinrange_err: &str,
) -> Result<(), String> {
    match T::from_str(s) {
        Ok(i) => {
            if i >= low && i <= high {
                Ok(())
            } else {
                Err(isnotinrange_err.to_string())
            }
        }
        Err(_) => Err(isnotanumber_err.to_string()),
    }
}

const OUTPUT: &str = "output";
const SIZE: &str = "size";
const REAL: &str = "real";
const ITERATIONS: &str = "iterations";
const GRADIENT: &str = "gradient";
const ENCODING: &str = "encoding";
const CYCLE: &str = "cycle";
const BLACK: &str = "black";
const ZOOM: &str = "zoom";
const THREADS: &str = "threads";
const LIST: &str = "list-gradients";

fn args<'a>() -> ArgMatches<'a> {
    let max_threads = num_cpus::get();

    App::new("mandel")
        .version("0.1.0")
        .author("Elf M. Sternberg <elf.sternberg@gmail.com>")
        .about("Mandelbrot zoomer")
        .arg(
            Arg::with_name(OUTPUT)
                .required_unless(LIST)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .help("Output image; the format follows the extension"),
        )
        .arg(
            Arg::with_name(SIZE)
                .long(SIZE)
                .short("s")
                .takes_value(true)
                .default_value("1280x800")
                .validator(|s| validate_pair::<u16>(&s, 'x', "Could not parse image size"))
                .help("Size of the pixel grid"),
        )
        .arg(
            Arg::with_name(REAL)
                .long(REAL)
                .short("r")
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("-2.0,1.0")
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse real range"))
                .help("Real range of the opening view; the imaginary range is centered on it"),
        )
        .arg(
            Arg::with_name(ITERATIONS)
                .long(ITERATIONS)
                .short("i")
                .takes_value(true)
                .default_value("256")
                .validator(|s| {
                    validate_range(
                        &s,
                        2,
                        100_000,
                        "Could not parse iteration count",
                        "Iteration count must be between 2 and 100000",
                    )
                })
                .help("Iteration limit, and the size of the color table"),
        )
        .arg(
            Arg::with_name(GRADIENT)
                .long(GRADIENT)
                .short("g")
                .takes_value(true)
                .default_value("viridis")
                .help("Starting gradient (see --list-gradients)"),
        )
        .arg(
            Arg::with_name(ENCODING)
                .long(ENCODING)
                .short("e")
                .takes_value(true)
                .default_value("rgb_u8")
                .possible_values(&["rgb_u8", "rgba_u8", "rgb_f", "rgba_f"])
                .help("Encoding of the color table"),
        )
        .arg(
            Arg::with_name(CYCLE)
                .long(CYCLE)
                .short("c")
                .takes_value(true)
                .default_value("0")
                .validator(|s| {
                    validate_range(
                        &s,
                        0,
                        1000,
                        "Could not parse cycle count",
                        "Cycle count must be between 0 and 1000",
                    )
                })
                .help("Number of times to cycle the gradient after starting"),
        )
        .arg(
            Arg::with_name(BLACK)
                .long(BLACK)
                .short("b")
                .help("Draw the set itself in black"),
        )
        .arg(
            Arg::with_name(ZOOM)
                .long(ZOOM)
                .short("z")
                .takes_value(true)
                .multiple(true)
                .number_of_values(1)
                .validator(|s| match parse_drag(&s) {
                    Some(_) => Ok(()),
                    None => Err("Could not parse zoom drag; expected CX,CY:RX,RY".to_string()),
                })
                .help("Zoom drag from click to release pixel; may be repeated"),
        )
        .arg(
            Arg::with_name(THREADS)
                .long(THREADS)
                .short("t")
                .takes_value(true)
                .default_value("1")
                .validator(move |s| {
                    validate_range(
                        &s,
                        1,
                        max_threads,
                        "Could not parse thread count",
                        &format!("Thread count must be between 1 and {}", max_threads),
                    )
                })
                .help("Number of threads to use in solver"),
        )
        .arg(
            Arg::with_name(LIST)
                .long(LIST)
                .help("List the supported gradients and exit"),
        )
        .get_matches()
}

/// Everything the command line asks for, parsed.
#[derive(Debug)]
struct Settings {
    output: String,
    size: (usize, usize),
    real: (f64, f64),
    iterations: u32,
    gradient: String,
    encoding: Encoding,
    cycles: usize,
    black: bool,
    drags: Vec<(Pixel, Pixel)>,
    threads: usize,
}

fn value<T: FromStr>(matches: &ArgMatches, name: &str) -> Result<T, Error> {
    let raw = matches
        .value_of(name)
        .ok_or_else(|| err_msg(format!("missing --{}", name)))?;
    T::from_str(raw).map_err(|_| err_msg(format!("could not parse --{} {}", name, raw)))
}

fn pair<T: FromStr>(matches: &ArgMatches, name: &str, separator: char) -> Result<(T, T), Error> {
    matches
        .value_of(name)
        .and_then(|raw| parse_pair(raw, separator))
        .ok_or_else(|| err_msg(format!("could not parse --{}", name)))
}

impl Settings {
    fn from_matches(matches: &ArgMatches) -> Result<Settings, Error> {
        let drags = match matches.values_of(ZOOM) {
            Some(values) => values
                .map(|v| parse_drag(v).ok_or_else(|| err_msg(format!("could not parse --zoom {}", v))))
                .collect::<Result<Vec<_>, Error>>()?,
            None => vec![],
        };
        let encoding = matches.value_of(ENCODING).unwrap_or("rgb_u8");
        Ok(Settings {
            output: value(matches, OUTPUT)?,
            size: pair(matches, SIZE, 'x')?,
            real: pair(matches, REAL, ',')?,
            iterations: value(matches, ITERATIONS)?,
            gradient: value(matches, GRADIENT)?,
            encoding: Encoding::from_str(encoding).map_err(err_msg)?,
            cycles: value(matches, CYCLE)?,
            black: matches.is_present(BLACK),
            drags,
            threads: value(matches, THREADS)?,
        })
    }
}

fn list_gradients() {
    let cycle = GradientPalette::cycle_list();
    for name in GradientPalette::supported_gradients() {
        if cycle.contains(&name) {
            println!("{} (cycle)", name);
        } else {
            println!("{}", name);
        }
    }
}

fn write_image(outfile: &str, pixels: &[u8], bounds: (usize, usize)) -> Result<(), Error> {
    let path = Path::new(outfile);
    image::save_buffer(
        &path,
        pixels,
        bounds.0 as u32,
        bounds.1 as u32,
        ColorType::RGB(8),
    )?;
    Ok(())
}

fn run(settings: &Settings) -> Result<(), Error> {
    let (width, height) = settings.size;
    let viewport = Viewport::centered(settings.real.0, settings.real.1, width, height)?;
    let mut field = FractalField::threaded(
        viewport,
        width,
        height,
        settings.iterations,
        settings.threads,
    )?;

    // A bad drag is dropped and the session carries on from the last
    // good view.
    for &(click, release) in &settings.drags {
        if let Err(e) = field.zoom(click, release) {
            warn!("ignoring drag {:?} -> {:?}: {}", click, release, e);
        }
    }

    let mut palette = GradientPalette::new(GradientSpec {
        gradient_name: settings.gradient.clone(),
        domain_min: 0.0,
        domain_max: f64::from(settings.iterations - 1),
        table_size: settings.iterations as usize,
        encoding: settings.encoding,
    })?;
    if settings.black {
        paint_set_black(&mut palette)?;
    }
    for _ in 0..settings.cycles {
        palette.cycle();
        if settings.black {
            paint_set_black(&mut palette)?;
        }
    }

    let frame = colorize(field.matrix(), &palette)?;
    write_image(&settings.output, &frame.pixels, (width, height))?;
    let vp = field.viewport();
    info!(
        "wrote {} ({}x{}, {}): Re = [{}, {}], Im = [{}, {}]",
        settings.output,
        width,
        height,
        palette.name(),
        vp.real_min,
        vp.real_max,
        vp.imag_min,
        vp.imag_max
    );
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let matches = args();
    if matches.is_present(LIST) {
        list_gradients();
        return;
    }

    let result = Settings::from_matches(&matches).and_then(|settings| run(&settings));
    if let Err(e) = result {
        eprintln!("Render failure: {}", e);
        std::process::exit(1);
    }
}
