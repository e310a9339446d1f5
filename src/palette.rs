// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Turns iteration counts into colors.
//!
//! Palettes are cyclic, not gradients: iteration count `n` picks
//! entry `n mod len`.  Points that never escaped, and points that
//! escaped almost at once, are painted with the job's background.

use image::Rgba;

use crate::errors::RenderError;
use crate::escape::EscapeResult;

/// Near-field suppression for Mandelbrot jobs.
pub const MANDELBROT_THRESHOLD: u32 = 5;

/// Near-field suppression for Julia jobs.
pub const JULIA_THRESHOLD: u32 = 16;

/// Index into a cyclic list of `len` entries.
pub fn cyclic_index(count: u32, len: usize) -> Result<usize, RenderError> {
    if len == 0 {
        return Err(RenderError::Configuration(
            "cannot index an empty palette".to_string(),
        ));
    }
    Ok(count as usize % len)
}

/// Parse `#rgb` or `#rrggbb` into an opaque color.
pub fn parse_hex_color(s: &str) -> Result<Rgba<u8>, RenderError> {
    let invalid = || RenderError::InvalidColorFormat(s.to_string());
    let digits = match s.as_bytes().split_first() {
        Some((b'#', rest)) => rest,
        _ => return Err(invalid()),
    };

    let nibble = |b: u8| -> Result<u8, RenderError> {
        match b {
            b'0'..=b'9' => Ok(b - b'0'),
            b'a'..=b'f' => Ok(b - b'a' + 10),
            b'A'..=b'F' => Ok(b - b'A' + 10),
            _ => Err(invalid()),
        }
    };

    match digits.len() {
        6 => {
            let mut rgb = [0u8; 3];
            for (channel, pair) in rgb.iter_mut().zip(digits.chunks(2)) {
                *channel = nibble(pair[0])? << 4 | nibble(pair[1])?;
            }
            Ok(Rgba([rgb[0], rgb[1], rgb[2], 0xff]))
        }
        3 => Ok(Rgba([
            nibble(digits[0])? * 17,
            nibble(digits[1])? * 17,
            nibble(digits[2])? * 17,
            0xff,
        ])),
        _ => Err(invalid()),
    }
}

/// A named, ordered, non-empty list of colors.
#[derive(Clone, Debug, PartialEq)]
pub struct Palette {
    name: String,
    colors: Vec<Rgba<u8>>,
}

impl Palette {
    /// Fails if `colors` is empty; an empty palette has nothing to
    /// cycle through.
    pub fn new(name: &str, colors: Vec<Rgba<u8>>) -> Result<Palette, RenderError> {
        if colors.is_empty() {
            return Err(RenderError::Configuration(format!(
                "palette {:?} has no colors",
                name
            )));
        }
        Ok(Palette {
            name: name.to_string(),
            colors,
        })
    }

    /// The name the palette was configured under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// The entry for iteration count `count`.
    pub fn color_for(&self, count: u32) -> Result<Rgba<u8>, RenderError> {
        Ok(self.colors[cyclic_index(count, self.colors.len())?])
    }
}

/// The per-job rules that decide when the background wins over the
/// palette.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ColorPolicy {
    /// Color for bounded and near-field points.
    pub background: Rgba<u8>,
    /// Counts at or below this are painted as background.
    pub threshold: u32,
}

impl ColorPolicy {
    /// Resolve one evaluator result to a color.
    pub fn resolve(&self, palette: &Palette, result: EscapeResult) -> Result<Rgba<u8>, RenderError> {
        if result.bounded || result.iterations <= self.threshold {
            return Ok(self.background);
        }
        palette.color_for(result.iterations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_tone() -> Palette {
        Palette::new("bw", vec![Rgba([0, 0, 0, 255]), Rgba([255, 255, 255, 255])]).unwrap()
    }

    #[test]
    fn parses_short_hex() {
        assert_eq!(parse_hex_color("#fff").unwrap(), Rgba([255, 255, 255, 255]));
        assert_eq!(parse_hex_color("#1aF").unwrap(), Rgba([0x11, 0xaa, 0xff, 255]));
    }

    #[test]
    fn parses_long_hex() {
        assert_eq!(parse_hex_color("#000000").unwrap(), Rgba([0, 0, 0, 255]));
        assert_eq!(parse_hex_color("#808080").unwrap(), Rgba([128, 128, 128, 255]));
        assert_eq!(parse_hex_color("#C0ffee").unwrap(), Rgba([0xc0, 0xff, 0xee, 255]));
    }

    #[test]
    fn rejects_bad_hex() {
        for bad in &["#zzz", "fff", "", "#", "#ffff", "#12345g", "#fffffff", "#é12"] {
            match parse_hex_color(bad) {
                Err(RenderError::InvalidColorFormat(s)) => assert_eq!(s, *bad),
                other => panic!("{:?} parsed as {:?}", bad, other),
            }
        }
    }

    #[test]
    fn cyclic_index_wraps() {
        assert_eq!(cyclic_index(0, 3).unwrap(), 0);
        assert_eq!(cyclic_index(7, 3).unwrap(), 1);
        assert_eq!(cyclic_index(u32::max_value(), 1).unwrap(), 0);
    }

    #[test]
    fn cyclic_index_refuses_empty_palette() {
        match cyclic_index(4, 0) {
            Err(RenderError::Configuration(_)) => {}
            other => panic!("expected a configuration error, got {:?}", other),
        }
    }

    #[test]
    fn empty_palette_is_a_configuration_error() {
        assert!(Palette::new("nothing", vec![]).is_err());
    }

    #[test]
    fn policy_paints_bounded_points_with_background() {
        let bg = Rgba([128, 128, 128, 255]);
        let policy = ColorPolicy { background: bg, threshold: 5 };
        let r = EscapeResult { iterations: 50, bounded: true };
        assert_eq!(policy.resolve(&two_tone(), r).unwrap(), bg);
    }

    #[test]
    fn policy_suppresses_near_field_inclusively() {
        let bg = Rgba([1, 2, 3, 255]);
        let policy = ColorPolicy { background: bg, threshold: 5 };
        for n in 0..=5 {
            let r = EscapeResult { iterations: n, bounded: false };
            assert_eq!(policy.resolve(&two_tone(), r).unwrap(), bg);
        }
        let r = EscapeResult { iterations: 6, bounded: false };
        assert_eq!(policy.resolve(&two_tone(), r).unwrap(), Rgba([0, 0, 0, 255]));
        let r = EscapeResult { iterations: 7, bounded: false };
        assert_eq!(policy.resolve(&two_tone(), r).unwrap(), Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn palette_alpha_is_kept() {
        let p = Palette::new("glass", vec![Rgba([10, 20, 30, 40])]).unwrap();
        assert_eq!(p.color_for(99).unwrap(), Rgba([10, 20, 30, 40]));
        assert_eq!(p.name(), "glass");
        assert_eq!(p.len(), 1);
    }
}
