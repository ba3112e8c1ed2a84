// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

extern crate clap;
extern crate failure;
extern crate histobrot;
extern crate num;
extern crate num_cpus;
extern crate tracing;
extern crate tracing_subscriber;

use clap::{App, Arg, ArgMatches};
use histobrot::{Camera, Histogram, Mandelbrot, Renderer};
use num::Complex;
use std::path::Path;
use std::str::FromStr;
use tracing::info;
use tracing_subscriber::EnvFilter;

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

fn parse_complex(s: &str) -> Option<Complex<f64>> {
    match parse_pair(s, ',') {
        Some((re, im)) => Some(Complex { re, im }),
        None => None,
    }
}

fn validate_pair<T: FromStr>(s: &str, separator: char, err: &str) -> Result<(), String> {
    match parse_pair::<T>(s, separator) {
        Some(_) => Ok(()),
        None => Err(err.to_string()),
    }
}

fn validate_size(s: &str) -> Result<(), String> {
    match parse_pair::<u16>(s, 'x') {
        Some((w, h)) if w > 0 && h > 0 => Ok(()),
        Some(_) => Err("Output image size must be positive".to_string()),
        None => Err("Could not parse output image size".to_string()),
    }
}

fn validate_range<T: FromStr + PartialOrd>(
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
const CENTER: &str = "center";
const WIDTH: &str = "width";
const SUPERSAMPLING: &str = "supersampling";
const THREADS: &str = "threads";
const ITERATIONS: &str = "iterations";
const PALETTE: &str = "palette";

fn args<'a>(max_threads: usize, default_threads: &'a str) -> ArgMatches<'a> {
    App::new("histobrot")
        .version("0.1.0")
        .author("Elf M. Sternberg <elf.sternberg@gmail.com>")
        .about("Supersampled Mandelbrot renderer with histogram equalization")
        .arg(
            Arg::with_name(OUTPUT)
                .required(true)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .help("Output file; the format follows the extension"),
        )
        .arg(
            Arg::with_name(SIZE)
                .required(false)
                .long(SIZE)
                .short("s")
                .takes_value(true)
                .default_value("800x600")
                .validator(|s| validate_size(&s))
                .help("Size of output image"),
        )
        .arg(
            Arg::with_name(CENTER)
                .required(false)
                .long(CENTER)
                .short("c")
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("-0.5,0")
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse center point"))
                .help("Center of the view on the complex plane"),
        )
        .arg(
            Arg::with_name(WIDTH)
                .required(false)
                .long(WIDTH)
                .short("w")
                .takes_value(true)
                .default_value("3")
                .validator(|s| {
                    validate_range(
                        &s,
                        std::f64::MIN_POSITIVE,
                        std::f64::MAX,
                        "Could not parse view width",
                        "View width must be positive",
                    )
                })
                .help("Span of the real axis across the view; smaller zooms in"),
        )
        .arg(
            Arg::with_name(SUPERSAMPLING)
                .required(false)
                .long(SUPERSAMPLING)
                .short("a")
                .takes_value(true)
                .default_value("3")
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        8,
                        "Could not parse supersampling factor",
                        "Supersampling must be between 1 and 8",
                    )
                })
                .help("Samples per pixel along each axis"),
        )
        .arg(
            Arg::with_name(THREADS)
                .required(false)
                .long(THREADS)
                .short("t")
                .takes_value(true)
                .default_value(default_threads)
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
            Arg::with_name(ITERATIONS)
                .required(false)
                .long(ITERATIONS)
                .short("i")
                .takes_value(true)
                .default_value("1000")
                .validator(move |s| {
                    validate_range(
                        &s,
                        1,
                        200_000,
                        "Could not parse iteration count",
                        "Iteration count must be between 1 and 200000",
                    )
                })
                .help("Iterations before a point is considered inside the set"),
        )
        .arg(
            Arg::with_name(PALETTE)
                .required(false)
                .long(PALETTE)
                .short("p")
                .takes_value(true)
                .possible_values(&["classic", "grayscale", "fire"])
                .default_value("classic")
                .help("Color gradient applied by rank"),
        )
        .get_matches()
}

fn palette(name: &str) -> Histogram {
    match name {
        "grayscale" => Histogram::grayscale(),
        "fire" => Histogram::fire(),
        _ => Histogram::classic(),
    }
}

fn run(matches: &ArgMatches) -> Result<(), failure::Error> {
    // The validators have already vetted every value unwrapped below.
    let image_size: (u16, u16) =
        parse_pair(matches.value_of(SIZE).unwrap(), 'x').expect("Error parsing image dimensions");
    let center = parse_complex(matches.value_of(CENTER).unwrap()).expect("Error parsing center");
    let width = f64::from_str(matches.value_of(WIDTH).unwrap())?;
    let supersampling = usize::from_str(matches.value_of(SUPERSAMPLING).unwrap())?;
    let threads = usize::from_str(matches.value_of(THREADS).unwrap())?;
    let iterations = usize::from_str(matches.value_of(ITERATIONS).unwrap())?;
    let histogram = palette(matches.value_of(PALETTE).unwrap());

    let (columns, rows) = (usize::from(image_size.0), usize::from(image_size.1));
    let camera = Camera::new(center.into(), width, columns as f64 / rows as f64)?;
    let mandelbrot = Mandelbrot::new(iterations, histobrot::mandelbrot::DEFAULT_ESCAPE_BOUND)?;
    let renderer = Renderer::new(columns, rows, supersampling, camera, mandelbrot)?;

    let frame = renderer.render(&histogram, threads)?;
    let outfile = Path::new(matches.value_of(OUTPUT).unwrap());
    frame.to_image().save(outfile)?;
    info!(path = %outfile.display(), "image written");
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let max_threads = num_cpus::get();
    let default_threads = max_threads.to_string();
    let matches = args(max_threads, &default_threads);

    if let Err(e) = run(&matches) {
        eprintln!("Render failure: {}", e);
        std::process::exit(1);
    }
}
