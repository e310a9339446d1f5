// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The single error type shared by every stage of a render.

use failure::Fail;
use std::io;

/// Everything that can stop a render.  None of these are recoverable
/// for the job in progress.
#[derive(Debug, Fail)]
pub enum RenderError {
    /// The configuration names something it does not define, or
    /// defines something unusable (an empty palette, a zero-sized
    /// canvas).
    #[fail(display = "configuration error: {}", _0)]
    Configuration(String),

    /// The configuration document could not be read at all.
    #[fail(display = "could not read configuration {}: {}", path, cause)]
    ConfigRead {
        /// Where we looked.
        path: String,
        /// What the filesystem said.
        #[cause]
        cause: io::Error,
    },

    /// The configuration document is not the JSON we expect.
    #[fail(display = "could not parse configuration: {}", _0)]
    ConfigParse(#[cause] serde_json::Error),

    /// A color string is neither `#rgb` nor `#rrggbb`.
    #[fail(display = "invalid color format: {:?}", _0)]
    InvalidColorFormat(String),

    /// A value fell outside the source range of a `RangeMap`.  Pixel
    /// loops never produce this; seeing it means the loop is wrong.
    #[fail(display = "value {} is outside the mapped range [{}, {}]", value, min, max)]
    MapperDomain {
        /// The rejected input.
        value: f64,
        /// Lower end of the source range.
        min: f64,
        /// Upper end of the source range.
        max: f64,
    },

    /// The output image could not be created or written.
    #[fail(display = "could not write {}: {}", path, cause)]
    Io {
        /// The destination.
        path: String,
        /// What the filesystem said.
        #[cause]
        cause: io::Error,
    },

    /// A render worker thread died.
    #[fail(display = "render worker failed: {}", _0)]
    Worker(String),
}

impl From<serde_json::Error> for RenderError {
    fn from(err: serde_json::Error) -> Self {
        RenderError::ConfigParse(err)
    }
}
