// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Contains the PlaneMapper struct, which describes a relationship
//! between a rectangle on the integral plane with an origin at 0,0,
//! and a rectangle on the complex plane bounded independently on the
//! real and imaginary axes.
use num::Complex;

use crate::errors::RenderError;

/// An affine map from one closed interval of the real line onto
/// another.  The source interval is always stored lowest-first, so
/// the out-of-range test is a plain comparison.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RangeMap {
    min: f64,
    max: f64,
    slope: f64,
    intercept: f64,
}

impl RangeMap {
    /// Map `source` onto `dest`.  If the source range is given
    /// backwards both ranges are flipped, so the orientation the
    /// caller asked for is kept.
    pub fn new(source: (f64, f64), dest: (f64, f64)) -> RangeMap {
        let (source, dest) = if source.0 > source.1 {
            ((source.1, source.0), (dest.1, dest.0))
        } else {
            (source, dest)
        };
        let slope = (dest.1 - dest.0) / (source.1 - source.0);
        RangeMap {
            min: source.0,
            max: source.1,
            slope,
            intercept: dest.0 - slope * source.0,
        }
    }

    /// Map a value from the source interval into the destination
    /// interval.
    pub fn map(&self, value: f64) -> Result<f64, RenderError> {
        if value < self.min || value > self.max {
            return Err(RenderError::MapperDomain {
                value,
                min: self.min,
                max: self.max,
            });
        }
        Ok(self.slope * value + self.intercept)
    }
}

/// The window on the complex plane to be rendered.  The real axis
/// runs `xmin..xmax` left to right, the imaginary axis `ymin..ymax`
/// top to bottom of the raster.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Viewport {
    /// Real coordinate of the left edge.
    pub xmin: f64,
    /// Real coordinate of the right edge.
    pub xmax: f64,
    /// Imaginary coordinate of the top edge.
    pub ymin: f64,
    /// Imaginary coordinate of the bottom edge.
    pub ymax: f64,
}

impl Viewport {
    /// Constructor.
    pub fn new(xmin: f64, xmax: f64, ymin: f64, ymax: f64) -> Viewport {
        Viewport {
            xmin,
            xmax,
            ymin,
            ymax,
        }
    }
}

/// Describes the column, row of a pixel in the raster.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pixel(pub usize, pub usize);

/// Contains the definitions of two planes: an integral cartesian
/// plane, and a window on the complex plane.  Maps pixels of the
/// first to points of the second, one axis at a time.
#[derive(Debug)]
pub struct PlaneMapper {
    /// Width of the integral plane, in pixels.
    pub width: usize,
    /// Height of the integral plane, in pixels.
    pub height: usize,
    // column -> real part
    x: RangeMap,
    // row -> imaginary part
    y: RangeMap,
}

impl PlaneMapper {
    /// Constructor.  Each axis gets its own map from `[0, dimension]`
    /// onto the matching pair of viewport bounds.
    pub fn new(width: usize, height: usize, viewport: &Viewport) -> PlaneMapper {
        let x = RangeMap::new((0.0, width as f64), (viewport.xmin, viewport.xmax));
        let y = RangeMap::new((0.0, height as f64), (viewport.ymin, viewport.ymax));
        debug!("plane {}x{} -> {:?}", width, height, viewport);
        PlaneMapper {
            width,
            height,
            x,
            y,
        }
    }

    /// Given a pixel on the integral cartesian plane, return the
    /// point of the complex plane it stands for.
    pub fn pixel_to_point(&self, pixel: &Pixel) -> Result<Complex<f64>, RenderError> {
        Ok(Complex::new(
            self.x.map(pixel.0 as f64)?,
            self.y.map(pixel.1 as f64)?,
        ))
    }
}
