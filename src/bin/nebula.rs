// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

extern crate clap;
extern crate env_logger;
extern crate image;
extern crate nebulabrot;

use clap::{App, Arg, ArgMatches};
use image::png::PNGEncoder;
use image::ColorType;
use nebulabrot::{RenderConfig, Renderer, TermSink, Viewport};
use std::fs::File;
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

fn validate_pair<T: FromStr>(s: &str, separator: char, err: &str) -> Result<(), String> {
    match parse_pair::<T>(s, separator) {
        Some(_) => Ok(()),
        None => Err(err.to_string()),
    }
}

fn validate_number<T: FromStr>(s: &str, err: &str) -> Result<(), String> {
    match T::from_str(s) {
        Ok(_) => Ok(()),
        Err(_) => Err(err.to_string()),
    }
}

const OUTPUT: &str = "output";
const REAL: &str = "real";
const IMAG: &str = "imag";
const STEPS: &str = "steps";
const PROBABILITY: &str = "probability";
const MIN_ITERATIONS: &str = "min-iterations";
const MAX_ITERATIONS: &str = "max-iterations";
const MODULATION: &str = "modulation";
const THREADS: &str = "threads";
const SEED: &str = "seed";

fn args<'a>() -> ArgMatches<'a> {
    App::new("nebula")
        .version("0.1.0")
        .about("Probabilistic Buddhabrot/Nebulabrot renderer")
        .arg(
            Arg::with_name(OUTPUT)
                .required(true)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .help("Output PNG file"),
        )
        .arg(
            Arg::with_name(REAL)
                .long(REAL)
                .takes_value(true)
                .default_value("-2.0,1.0")
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse real-axis bounds"))
                .help("Real-axis bounds of the viewport, min,max"),
        )
        .arg(
            Arg::with_name(IMAG)
                .long(IMAG)
                .takes_value(true)
                .default_value("-1.125,1.125")
                .validator(|s| {
                    validate_pair::<f64>(&s, ',', "Could not parse imaginary-axis bounds")
                })
                .help("Imaginary-axis bounds of the viewport, min,max"),
        )
        .arg(
            Arg::with_name(STEPS)
                .long(STEPS)
                .short("s")
                .takes_value(true)
                .default_value("0.005,0.005")
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse step sizes"))
                .help("Grid step per axis, real,imaginary"),
        )
        .arg(
            Arg::with_name(PROBABILITY)
                .long(PROBABILITY)
                .short("p")
                .takes_value(true)
                .default_value("0.25")
                .validator(|s| validate_number::<f64>(&s, "Could not parse probability"))
                .help("Probability that a pixel is sampled, in (0,1]"),
        )
        .arg(
            Arg::with_name(MIN_ITERATIONS)
                .long(MIN_ITERATIONS)
                .takes_value(true)
                .default_value("500")
                .validator(|s| validate_number::<usize>(&s, "Could not parse iteration count"))
                .help("Orbits escaping sooner than this are discarded"),
        )
        .arg(
            Arg::with_name(MAX_ITERATIONS)
                .long(MAX_ITERATIONS)
                .short("i")
                .takes_value(true)
                .default_value("20000")
                .validator(|s| validate_number::<usize>(&s, "Could not parse iteration count"))
                .help("Iteration cap per orbit"),
        )
        .arg(
            Arg::with_name(MODULATION)
                .long(MODULATION)
                .short("m")
                .takes_value(true)
                .default_value("10.0")
                .validator(|s| validate_number::<f32>(&s, "Could not parse modulation factor"))
                .help("Exponent of the post-processing power curve"),
        )
        .arg(
            Arg::with_name(THREADS)
                .long(THREADS)
                .short("t")
                .takes_value(true)
                .validator(|s| validate_number::<usize>(&s, "Could not parse thread count"))
                .help("Worker thread count (default: all cores)"),
        )
        .arg(
            Arg::with_name(SEED)
                .long(SEED)
                .takes_value(true)
                .default_value("0")
                .validator(|s| validate_number::<u64>(&s, "Could not parse seed"))
                .help("Base RNG seed; worker k draws from seed+k"),
        )
        .get_matches()
}

fn write_image(outfile: &str, pixels: &[u8], width: usize, height: usize) -> std::io::Result<()> {
    let path = Path::new(outfile);
    let output = File::create(&path)?;
    let encoder = PNGEncoder::new(output);
    encoder.encode(pixels, width as u32, height as u32, ColorType::RGB(8))?;
    Ok(())
}

fn config_from(matches: &ArgMatches) -> RenderConfig {
    let mut config = RenderConfig::default();
    // The validators above guarantee the unwraps.
    let (min_re, max_re) = parse_pair(matches.value_of(REAL).unwrap(), ',').unwrap();
    let (min_im, max_im) = parse_pair(matches.value_of(IMAG).unwrap(), ',').unwrap();
    config.viewport = Viewport {
        min_re,
        max_re,
        min_im,
        max_im,
    };
    let (re_step, im_step) = parse_pair(matches.value_of(STEPS).unwrap(), ',').unwrap();
    config.re_step = re_step;
    config.im_step = im_step;
    config.sample_probability =
        f64::from_str(matches.value_of(PROBABILITY).unwrap()).unwrap();
    config.min_iterations =
        usize::from_str(matches.value_of(MIN_ITERATIONS).unwrap()).unwrap();
    config.max_iterations =
        usize::from_str(matches.value_of(MAX_ITERATIONS).unwrap()).unwrap();
    config.modulation_factor = f32::from_str(matches.value_of(MODULATION).unwrap()).unwrap();
    config.seed = u64::from_str(matches.value_of(SEED).unwrap()).unwrap();
    if let Some(threads) = matches.value_of(THREADS) {
        config.workers = usize::from_str(threads).unwrap();
    }
    config
}

fn main() {
    env_logger::init();
    let matches = args();
    let outfile = matches.value_of(OUTPUT).unwrap().to_string();
    let config = config_from(&matches);

    let renderer = match Renderer::new(config) {
        Ok(renderer) => renderer,
        Err(e) => {
            eprintln!("nebula: {}", e);
            std::process::exit(1);
        }
    };
    let (width, height) = (renderer.width(), renderer.height());

    let pixels = {
        let mut sink = TermSink::new();
        match renderer.render(&mut sink) {
            Ok(pixels) => pixels,
            Err(e) => {
                eprintln!("nebula: render failure: {}", e);
                std::process::exit(1);
            }
        }
    };

    if let Err(e) = write_image(&outfile, &pixels, width, height) {
        eprintln!("nebula: could not write {}: {}", outfile, e);
        std::process::exit(1);
    }
}
