// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The per-pixel loop: map each pixel onto the complex plane, run the
//! evaluator on it, pick its color, and store the color in a raster.
//!
//! Every pixel is independent of every other, so the threaded
//! renderer hands out whole rows from a shared queue and each worker
//! writes only the row it was given.  The result is identical to the
//! single-threaded loop, byte for byte.

use image::Rgba;
use itertools::iproduct;
use std::iter::Enumerate;
use std::slice::ChunksMut;
use std::sync::{Arc, Mutex};

use crate::errors::RenderError;
use crate::escape::escape_time;
use crate::job::Job;
use crate::palette::Palette;
use crate::planes::{Pixel, PlaneMapper};

const CHANNELS: usize = 4;

type RowQueue<'a> = Arc<Mutex<Enumerate<ChunksMut<'a, u8>>>>;

/// An RGBA image held in memory, row-major, eight bits per channel.
#[derive(Clone, Debug, PartialEq)]
pub struct Raster {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl Raster {
    /// A transparent black raster.  Fails if the byte count does not
    /// fit in memory addressing.
    pub fn new(width: usize, height: usize) -> Result<Raster, RenderError> {
        let size = width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(CHANNELS))
            .ok_or_else(|| {
                RenderError::Configuration(format!("a {}x{} raster is too large", width, height))
            })?;
        Ok(Raster {
            width,
            height,
            pixels: vec![0 as u8; size],
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// The raw RGBA bytes, row by row.
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    fn offset(&self, pixel: &Pixel) -> usize {
        (pixel.1 * self.width + pixel.0) * CHANNELS
    }

    /// The color at a pixel.
    pub fn get(&self, pixel: &Pixel) -> Rgba<u8> {
        let o = self.offset(pixel);
        let p = &self.pixels[o..o + CHANNELS];
        Rgba([p[0], p[1], p[2], p[3]])
    }

    /// Set the color at a pixel.
    pub fn put(&mut self, pixel: &Pixel, color: Rgba<u8>) {
        let o = self.offset(pixel);
        self.pixels[o..o + CHANNELS].copy_from_slice(&color.0);
    }
}

/// Renders one job against one palette.
pub struct Renderer<'a> {
    plane: PlaneMapper,
    job: &'a Job,
    palette: &'a Palette,
}

impl<'a> Renderer<'a> {
    /// The plane is square, `resolution` on a side, over the job's
    /// viewport.
    pub fn new(job: &'a Job, palette: &'a Palette) -> Self {
        Renderer {
            plane: PlaneMapper::new(job.resolution, job.resolution, &job.viewport),
            job,
            palette,
        }
    }

    /// Color for one pixel.
    fn shade(&self, pixel: &Pixel) -> Result<Rgba<u8>, RenderError> {
        let start = self.plane.pixel_to_point(pixel)?;
        let result = escape_time(start, self.job.mode, self.job.max_iterations);
        self.job.policy().resolve(self.palette, result)
    }

    fn render_row(&self, row: usize, buffer: &mut [u8]) -> Result<(), RenderError> {
        for (column, cell) in buffer.chunks_mut(CHANNELS).enumerate() {
            let color = self.shade(&Pixel(column, row))?;
            cell.copy_from_slice(&color.0);
        }
        Ok(())
    }

    /// The reference loop: every pixel, in order, on this thread.
    pub fn render_single(&self) -> Result<Raster, RenderError> {
        let mut raster = Raster::new(self.plane.width, self.plane.height)?;
        for (row, column) in iproduct!(0..self.plane.height, 0..self.plane.width) {
            let pixel = Pixel(column, row);
            let color = self.shade(&pixel)?;
            raster.put(&pixel, color);
        }
        Ok(raster)
    }

    /// Render with up to `threads` workers pulling rows from a shared
    /// queue.  One thread falls back to `render_single`.
    pub fn render(&self, threads: usize) -> Result<Raster, RenderError> {
        if threads <= 1 || self.plane.height <= 1 {
            return self.render_single();
        }
        debug!(
            "rendering {} on {} threads",
            self.job.output.display(),
            threads
        );

        let mut raster = Raster::new(self.plane.width, self.plane.height)?;
        let stride = raster.width * CHANNELS;
        if stride == 0 {
            return Ok(raster);
        }
        {
            let rows: RowQueue = Arc::new(Mutex::new(raster.pixels.chunks_mut(stride).enumerate()));
            let outcomes = crossbeam::scope(|spawner| {
                let handles: Vec<_> = (0..threads)
                    .map(|_| {
                        let rows = rows.clone();
                        spawner.spawn(move |_| -> Result<(), RenderError> {
                            loop {
                                let row = {
                                    rows.lock()
                                        .map_err(|_| RenderError::Worker("row queue poisoned".to_string()))?
                                        .next()
                                };
                                match row {
                                    Some((index, buffer)) => self.render_row(index, buffer)?,
                                    None => return Ok(()),
                                }
                            }
                        })
                    })
                    .collect();
                handles.into_iter().map(|h| h.join()).collect::<Vec<_>>()
            })
            .map_err(|_| RenderError::Worker("render scope panicked".to_string()))?;

            for outcome in outcomes {
                match outcome {
                    Ok(result) => result?,
                    Err(_) => return Err(RenderError::Worker("a render thread panicked".to_string())),
                }
            }
        }
        Ok(raster)
    }
}
