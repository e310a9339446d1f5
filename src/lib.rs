#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Escape-time renderer
//!
//! The Mandelbrot set and its Julia sets come from the same map:
//! take a point on the complex plane, square it, add a constant, and
//! repeat.  Some points run off to infinity, some never do.  Color
//! each pixel by how many steps its point took to run away and you
//! get the familiar pictures.
//!
//! For the Mandelbrot set the constant is the pixel's own point.  For
//! a Julia set it is one fixed value shared by every pixel.  Both are
//! rendered by the same loop; a job with a constant of exactly zero
//! is a Mandelbrot job, anything else is a Julia job.
//!
//! Jobs come either from the command line or, in batch, from a JSON
//! document that also holds the named palettes.  Each job renders
//! into an in-memory raster which is then written out as a PNG.

extern crate crossbeam;
extern crate image;
extern crate itertools;
#[macro_use]
extern crate log;
extern crate num;
extern crate serde_json;

pub mod config;
pub mod errors;
pub mod escape;
pub mod job;
pub mod output;
pub mod palette;
pub mod planes;
pub mod render;
pub mod runner;

pub use config::{Config, JobSpec};
pub use errors::RenderError;
pub use escape::{escape_time, EscapeResult, Mode};
pub use job::Job;
pub use output::{PngWriter, RasterSink};
pub use palette::{parse_hex_color, ColorPolicy, Palette};
pub use planes::{PlaneMapper, RangeMap, Viewport};
pub use render::{Raster, Renderer};
pub use runner::Runner;
