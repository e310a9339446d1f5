// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A validated rendering request.

use std::path::PathBuf;

use image::Rgba;
use num::Complex;

use crate::config::JobSpec;
use crate::errors::RenderError;
use crate::escape::Mode;
use crate::palette::{parse_hex_color, ColorPolicy, JULIA_THRESHOLD, MANDELBROT_THRESHOLD};
use crate::planes::Viewport;

/// Largest width and height a job may ask for.  PNG dimensions are
/// 32-bit and the raster is held in memory, so this is kept well
/// inside both.
pub const MAX_RESOLUTION: usize = 65_535;

/// One image to render.  Read-only once built.
#[derive(Clone, Debug, PartialEq)]
pub struct Job {
    /// Color for bounded and near-field points.
    pub background: Rgba<u8>,
    /// Where the PNG goes.
    pub output: PathBuf,
    /// Width and height, in pixels.
    pub resolution: usize,
    /// The window on the complex plane.
    pub viewport: Viewport,
    /// Name of the palette to color with.
    pub palette: String,
    /// Iteration limit.
    pub max_iterations: u32,
    /// Mandelbrot, or Julia with its constant.
    pub mode: Mode,
    /// Escape counts at or below this are painted as background.
    pub threshold: u32,
}

impl Job {
    /// Validate a job descriptor.
    pub fn from_spec(spec: &JobSpec) -> Result<Job, RenderError> {
        if spec.res == 0 || spec.res > MAX_RESOLUTION {
            return Err(RenderError::Configuration(format!(
                "{}: resolution must be between 1 and {}, not {}",
                spec.out, MAX_RESOLUTION, spec.res
            )));
        }
        let bounds = [spec.xmin, spec.xmax, spec.ymin, spec.ymax];
        if bounds.iter().any(|b| !b.is_finite()) {
            return Err(RenderError::Configuration(format!(
                "{}: viewport bounds must be finite",
                spec.out
            )));
        }

        let mode = Mode::from_constant(Complex::new(spec.real, spec.imaginary));
        let threshold = spec.threshold.unwrap_or(match mode {
            Mode::Mandelbrot => MANDELBROT_THRESHOLD,
            Mode::Julia(_) => JULIA_THRESHOLD,
        });

        Ok(Job {
            background: parse_hex_color(&spec.bg)?,
            output: PathBuf::from(&spec.out),
            resolution: spec.res,
            viewport: Viewport::new(spec.xmin, spec.xmax, spec.ymin, spec.ymax),
            palette: spec.palette.clone(),
            max_iterations: spec.iterations,
            mode,
            threshold,
        })
    }

    /// The background rules for this job.
    pub fn policy(&self) -> ColorPolicy {
        ColorPolicy {
            background: self.background,
            threshold: self.threshold,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec() -> JobSpec {
        JobSpec {
            bg: "#808080".to_string(),
            out: "out.png".to_string(),
            res: 64,
            xmin: -1.2,
            xmax: 1.2,
            ymin: -1.2,
            ymax: 1.2,
            palette: "bw".to_string(),
            iterations: 50,
            real: 0.0,
            imaginary: 0.0,
            threshold: None,
        }
    }

    #[test]
    fn zero_constant_builds_a_mandelbrot_job() {
        let job = Job::from_spec(&spec()).unwrap();
        assert_eq!(job.mode, Mode::Mandelbrot);
        assert_eq!(job.threshold, MANDELBROT_THRESHOLD);
        assert_eq!(job.background, Rgba([128, 128, 128, 255]));
        assert_eq!(job.output, PathBuf::from("out.png"));
    }

    #[test]
    fn any_nonzero_constant_builds_a_julia_job() {
        let mut s = spec();
        s.imaginary = 0.3;
        let job = Job::from_spec(&s).unwrap();
        assert_eq!(job.mode, Mode::Julia(Complex::new(0.0, 0.3)));
        assert_eq!(job.threshold, JULIA_THRESHOLD);
    }

    #[test]
    fn explicit_threshold_wins() {
        let mut s = spec();
        s.threshold = Some(0);
        assert_eq!(Job::from_spec(&s).unwrap().threshold, 0);
    }

    #[test]
    fn bad_background_fails() {
        let mut s = spec();
        s.bg = "grey".to_string();
        match Job::from_spec(&s) {
            Err(RenderError::InvalidColorFormat(_)) => {}
            other => panic!("expected a color error, got {:?}", other),
        }
    }

    #[test]
    fn zero_resolution_fails() {
        let mut s = spec();
        s.res = 0;
        assert!(Job::from_spec(&s).is_err());
    }

    #[test]
    fn oversized_resolution_is_a_configuration_error() {
        let mut s = spec();
        s.res = 1usize << 31;
        match Job::from_spec(&s) {
            Err(RenderError::Configuration(msg)) => assert!(msg.contains("resolution")),
            other => panic!("expected a configuration error, got {:?}", other),
        }
        s.res = MAX_RESOLUTION + 1;
        assert!(Job::from_spec(&s).is_err());
        s.res = MAX_RESOLUTION;
        assert_eq!(Job::from_spec(&s).unwrap().resolution, MAX_RESOLUTION);
    }

    #[test]
    fn non_finite_bounds_fail() {
        let mut s = spec();
        s.ymax = ::std::f64::NAN;
        assert!(Job::from_spec(&s).is_err());
    }
}
