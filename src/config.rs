// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The configuration document: named palettes plus a list of jobs.
//!
//! ```json
//! {
//!   "palettes": { "blue": [[0, 0, 64, 255], [0, 0, 255, 255]] },
//!   "jobs": [
//!     { "bg": "#000", "out": "m.png", "res": 1024,
//!       "xmin": -2.0, "xmax": 1.0, "ymin": -1.5, "ymax": 1.5,
//!       "palette": "blue", "iterations": 200 }
//!   ]
//! }
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use image::Rgba;
use serde::Deserialize;

use crate::errors::RenderError;
use crate::palette::Palette;

/// Where the configuration is looked for when nobody says otherwise.
pub const DEFAULT_CONFIG: &str = "mandelbrot.json";

/// The whole configuration document.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Palette name -> RGBA entries, in cycle order.
    pub palettes: HashMap<String, Vec<[u8; 4]>>,
    /// Jobs for batch mode, in file order.
    pub jobs: Vec<JobSpec>,
}

/// One job, as written in the configuration document.  Nothing here
/// has been validated yet; see `Job::from_spec`.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct JobSpec {
    /// Background color, `#rgb` or `#rrggbb`.
    pub bg: String,
    /// Output path for the PNG.
    pub out: String,
    /// Width and height of the image, in pixels.
    pub res: usize,
    /// Real coordinate of the left edge.
    pub xmin: f64,
    /// Real coordinate of the right edge.
    pub xmax: f64,
    /// Imaginary coordinate of the top edge.
    pub ymin: f64,
    /// Imaginary coordinate of the bottom edge.
    pub ymax: f64,
    /// Name of a palette in the same document.
    pub palette: String,
    /// Iteration limit.
    pub iterations: u32,
    /// Real part of the Julia constant; zero with `im` means Mandelbrot.
    #[serde(default)]
    pub real: f64,
    /// Imaginary part of the Julia constant.
    #[serde(default, rename = "im")]
    pub imaginary: f64,
    /// Near-field suppression; defaults by mode when absent.
    #[serde(default)]
    pub threshold: Option<u32>,
}

impl Config {
    /// Read and parse the document at `path`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Config, RenderError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|cause| RenderError::ConfigRead {
            path: path.display().to_string(),
            cause,
        })?;
        let config: Config = text.parse()?;
        debug!(
            "{}: {} palettes, {} jobs",
            path.display(),
            config.palettes.len(),
            config.jobs.len()
        );
        Ok(config)
    }

    /// Look up a palette by name.  A missing or empty palette is a
    /// configuration error.
    pub fn palette(&self, name: &str) -> Result<Palette, RenderError> {
        match self.palettes.get(name) {
            None => Err(RenderError::Configuration(format!(
                "no palette named {:?}",
                name
            ))),
            Some(entries) => Palette::new(name, entries.iter().map(|c| Rgba(*c)).collect()),
        }
    }
}

impl FromStr for Config {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Config, RenderError> {
        Ok(serde_json::from_str(s)?)
    }
}
