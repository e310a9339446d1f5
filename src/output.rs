// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Persistence for finished rasters.

use image::png::PNGEncoder;
use image::ColorType;
use std::convert::TryFrom;
use std::fs::File;
use std::io;
use std::path::Path;

use crate::errors::RenderError;
use crate::render::Raster;

/// Something that durably stores a completed raster at a
/// destination.
pub trait RasterSink {
    /// Write `raster` to `path`.
    fn persist(&self, raster: &Raster, path: &Path) -> Result<(), RenderError>;
}

/// Writes rasters as 8-bit RGBA PNG files.
#[derive(Copy, Clone, Debug, Default)]
pub struct PngWriter;

impl RasterSink for PngWriter {
    fn persist(&self, raster: &Raster, path: &Path) -> Result<(), RenderError> {
        let io_error = |cause: io::Error| RenderError::Io {
            path: path.display().to_string(),
            cause,
        };
        let too_big = || {
            io_error(io::Error::new(
                io::ErrorKind::InvalidInput,
                "raster too large for PNG",
            ))
        };
        let width = u32::try_from(raster.width()).map_err(|_| too_big())?;
        let height = u32::try_from(raster.height()).map_err(|_| too_big())?;

        let output = File::create(path).map_err(io_error)?;
        let encoder = PNGEncoder::new(output);
        encoder
            .encode(raster.as_bytes(), width, height, ColorType::RGBA(8))
            .map_err(io_error)?;
        info!("wrote {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planes::Pixel;
    use image::{GenericImageView, Rgba};
    use tempfile::tempdir;

    #[test]
    fn writes_a_readable_png() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tiny.png");

        let mut raster = Raster::new(3, 2).unwrap();
        raster.put(&Pixel(0, 0), Rgba([255, 0, 0, 255]));
        raster.put(&Pixel(2, 1), Rgba([0, 0, 255, 128]));
        PngWriter.persist(&raster, &path).unwrap();

        let img = image::open(&path).unwrap();
        assert_eq!(img.dimensions(), (3, 2));
        assert_eq!(img.get_pixel(0, 0), Rgba([255, 0, 0, 255]));
        assert_eq!(img.get_pixel(2, 1), Rgba([0, 0, 255, 128]));
    }

    #[test]
    fn unwritable_destination_is_an_io_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("tiny.png");
        match PngWriter.persist(&Raster::new(1, 1).unwrap(), &path) {
            Err(RenderError::Io { path: p, .. }) => assert!(p.ends_with("tiny.png")),
            other => panic!("expected an I/O error, got {:?}", other),
        }
    }
}
