#[macro_use]
extern crate clap;
extern crate env_logger;
extern crate escapetime;
#[macro_use]
extern crate log;
extern crate num_cpus;

use clap::{App, AppSettings, Arg, ArgMatches};
use escapetime::config::DEFAULT_CONFIG;
use escapetime::job::MAX_RESOLUTION;
use escapetime::{parse_hex_color, Config, JobSpec, PngWriter, RenderError, Runner};
use std::path::PathBuf;
use std::str::FromStr;

fn validate_number<T: FromStr>(s: &str, err: &str) -> Result<(), String> {
    match T::from_str(s) {
        Ok(_) => Ok(()),
        Err(_) => Err(err.to_string()),
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

fn validate_color(s: &str) -> Result<(), String> {
    parse_hex_color(s).map(|_| ()).map_err(|e| e.to_string())
}

const BG: &str = "bg";
const JOBS: &str = "jobs";
const CONFIG: &str = "config";
const RES: &str = "res";
const XMIN: &str = "xmin";
const XMAX: &str = "xmax";
const YMIN: &str = "ymin";
const YMAX: &str = "ymax";
const OUTPUT: &str = "output";
const REAL: &str = "real";
const IMAGINARY: &str = "im";
const PALETTE: &str = "palette";
const ITERATIONS: &str = "iter";
const THRESHOLD: &str = "threshold";
const THREADS: &str = "threads";

fn bound<'a>(name: &'a str, default: &'a str, help: &'a str) -> Arg<'a, 'a> {
    Arg::with_name(name)
        .long(name)
        .takes_value(true)
        .default_value(default)
        .validator(|s| validate_number::<f64>(&s, "Could not parse bound"))
        .help(help)
}

fn args<'a>() -> ArgMatches<'a> {
    let max_threads = num_cpus::get();

    App::new("escapetime")
        .version(crate_version!())
        .about("Mandelbrot and Julia set renderer")
        .setting(AppSettings::AllowNegativeNumbers)
        .arg(
            Arg::with_name(BG)
                .long(BG)
                .takes_value(true)
                .default_value("#fff")
                .validator(|s| validate_color(&s))
                .help("Hex value for the background color"),
        )
        .arg(
            Arg::with_name(JOBS)
                .long(JOBS)
                .short("j")
                .help("Render every job in the configuration file instead of one job"),
        )
        .arg(
            Arg::with_name(CONFIG)
                .long(CONFIG)
                .short("c")
                .takes_value(true)
                .default_value(DEFAULT_CONFIG)
                .help("Configuration file holding palettes and jobs"),
        )
        .arg(
            Arg::with_name(RES)
                .long(RES)
                .takes_value(true)
                .default_value("4096")
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        MAX_RESOLUTION,
                        "Could not parse resolution",
                        &format!("Resolution must be between 1 and {}", MAX_RESOLUTION),
                    )
                })
                .help("Width and height of the image"),
        )
        .arg(bound(XMIN, "-1.2", "Minimum value on the real axis"))
        .arg(bound(XMAX, "1.2", "Maximum value on the real axis"))
        .arg(bound(YMIN, "-1.2", "Minimum value on the imaginary axis"))
        .arg(bound(YMAX, "1.2", "Maximum value on the imaginary axis"))
        .arg(
            Arg::with_name(OUTPUT)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .default_value("image.png")
                .help("Output path for the generated image"),
        )
        .arg(
            Arg::with_name(REAL)
                .long(REAL)
                .short("r")
                .takes_value(true)
                .default_value("0")
                .validator(|s| validate_number::<f64>(&s, "Could not parse real component"))
                .help("Real component of the Julia constant"),
        )
        .arg(
            Arg::with_name(IMAGINARY)
                .long(IMAGINARY)
                .takes_value(true)
                .default_value("0")
                .validator(|s| validate_number::<f64>(&s, "Could not parse imaginary component"))
                .help("Imaginary component of the Julia constant"),
        )
        .arg(
            Arg::with_name(PALETTE)
                .long(PALETTE)
                .short("p")
                .takes_value(true)
                .default_value("blue")
                .help("Palette name from the configuration file"),
        )
        .arg(
            Arg::with_name(ITERATIONS)
                .long(ITERATIONS)
                .short("i")
                .takes_value(true)
                .default_value("100")
                .validator(|s| validate_number::<u32>(&s, "Could not parse iteration count"))
                .help("Iterations before a point is considered bounded"),
        )
        .arg(
            Arg::with_name(THRESHOLD)
                .long(THRESHOLD)
                .takes_value(true)
                .validator(|s| validate_number::<u32>(&s, "Could not parse threshold"))
                .help("Escape counts at or below this get the background color [default: 5, or 16 for Julia]"),
        )
        .arg(
            Arg::with_name(THREADS)
                .long(THREADS)
                .short("t")
                .takes_value(true)
                .validator(move |s| {
                    validate_range(
                        &s,
                        1,
                        max_threads,
                        "Could not parse thread count",
                        &format!("Thread count must be between 1 and {}", max_threads),
                    )
                })
                .help("Number of threads to use [default: all cores]"),
        )
        .get_matches()
}

/// Everything the command line decided, fixed before any work starts.
#[derive(Debug)]
struct Settings {
    config: PathBuf,
    batch: bool,
    threads: usize,
    job: JobSpec,
}

impl Settings {
    fn from_matches(matches: &ArgMatches) -> Settings {
        let value = |name: &str| matches.value_of(name).unwrap_or_default().to_string();
        let float = |name: &str| value_t!(matches, name, f64).unwrap_or_else(|e| e.exit());
        let threshold = if matches.is_present(THRESHOLD) {
            Some(value_t!(matches, THRESHOLD, u32).unwrap_or_else(|e| e.exit()))
        } else {
            None
        };
        let threads = if matches.is_present(THREADS) {
            value_t!(matches, THREADS, usize).unwrap_or_else(|e| e.exit())
        } else {
            num_cpus::get()
        };

        Settings {
            config: PathBuf::from(value(CONFIG)),
            batch: matches.is_present(JOBS),
            threads,
            job: JobSpec {
                bg: value(BG),
                out: value(OUTPUT),
                res: value_t!(matches, RES, usize).unwrap_or_else(|e| e.exit()),
                xmin: float(XMIN),
                xmax: float(XMAX),
                ymin: float(YMIN),
                ymax: float(YMAX),
                palette: value(PALETTE),
                iterations: value_t!(matches, ITERATIONS, u32).unwrap_or_else(|e| e.exit()),
                real: float(REAL),
                imaginary: float(IMAGINARY),
                threshold,
            },
        }
    }
}

fn run(settings: &Settings) -> Result<(), RenderError> {
    let config = Config::load(&settings.config)?;
    let runner = Runner::new(PngWriter, settings.threads);
    if settings.batch {
        let written = runner.run_batch(&config)?;
        info!("{} images written", written);
        Ok(())
    } else {
        runner.run_single(&config, &settings.job)
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let settings = Settings::from_matches(&args());
    debug!("{:?}", settings);

    if let Err(e) = run(&settings) {
        eprintln!("Render failure: {}", e);
        std::process::exit(1);
    }
}
