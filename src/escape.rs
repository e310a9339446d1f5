// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The escape-time evaluator.
//!
//! Both the Mandelbrot and the Julia sets come from iterating the
//! quadratic map `z -> z² + c`.  They differ only in where `c` comes
//! from: the Mandelbrot set pins `c` to each pixel's own starting
//! point, while a Julia set uses one constant for the whole image.
//!
//! The escape test is not the textbook `|z|² > 4`.  After each step
//! we look at the real and imaginary parts of the *square*, before
//! `c` is added, and stop once `|re(z²) + im(z²)|` exceeds 16.  Every
//! image this renderer has ever produced depends on that exact
//! quantity, so it stays.

use num::Complex;

/// Bound on `|re(z²) + im(z²)|` past which a point has escaped.
pub const ESCAPE_BOUND: f64 = 16.0;

/// Where the map constant `c` comes from.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Mode {
    /// `c` is the starting point of each pixel.
    Mandelbrot,
    /// `c` is the same for every pixel.
    Julia(Complex<f64>),
}

impl Mode {
    /// A constant of exactly zero in both parts means Mandelbrot;
    /// anything else is the Julia constant.
    pub fn from_constant(constant: Complex<f64>) -> Mode {
        if constant.re == 0.0 && constant.im == 0.0 {
            Mode::Mandelbrot
        } else {
            Mode::Julia(constant)
        }
    }

    /// The map constant to use for a point starting at `start`.
    #[inline]
    pub fn constant_for(&self, start: Complex<f64>) -> Complex<f64> {
        match *self {
            Mode::Mandelbrot => start,
            Mode::Julia(c) => c,
        }
    }
}

/// What the evaluator learned about a point.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct EscapeResult {
    /// Iterations completed before escape, `0..=limit`.
    pub iterations: u32,
    /// True if the point never escaped within the limit.
    pub bounded: bool,
}

/// Iterate the quadratic map from `start` for at most `limit` steps.
#[inline]
pub fn escape_time(start: Complex<f64>, mode: Mode, limit: u32) -> EscapeResult {
    let c = mode.constant_for(start);
    let (mut a, mut b) = (start.re, start.im);
    let mut n = 0;
    while n < limit {
        let a_squared = a * a - b * b;
        let two_ab = 2.0 * a * b;

        a = a_squared + c.re;
        b = two_ab + c.im;

        if (a_squared + two_ab).abs() > ESCAPE_BOUND {
            break;
        }
        n += 1;
    }
    EscapeResult {
        iterations: n,
        bounded: n == limit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_constant_is_mandelbrot() {
        assert_eq!(Mode::from_constant(Complex::new(0.0, 0.0)), Mode::Mandelbrot);
        assert_eq!(
            Mode::from_constant(Complex::new(0.0, 0.5)),
            Mode::Julia(Complex::new(0.0, 0.5))
        );
        assert_eq!(
            Mode::from_constant(Complex::new(-0.8, 0.0)),
            Mode::Julia(Complex::new(-0.8, 0.0))
        );
    }

    #[test]
    fn origin_never_escapes() {
        let r = escape_time(Complex::new(0.0, 0.0), Mode::Mandelbrot, 50);
        assert_eq!(r, EscapeResult { iterations: 50, bounded: true });
    }

    #[test]
    fn origin_with_zero_julia_constant_never_escapes() {
        let r = escape_time(
            Complex::new(0.0, 0.0),
            Mode::Julia(Complex::new(0.0, 0.0)),
            1000,
        );
        assert_eq!(r.iterations, 1000);
        assert!(r.bounded);
    }

    #[test]
    fn main_cardioid_is_bounded() {
        let r = escape_time(Complex::new(-0.1, 0.1), Mode::Mandelbrot, 200);
        assert!(r.bounded);
    }

    #[test]
    fn corner_of_the_window_escapes_after_three_steps() {
        let r = escape_time(Complex::new(-1.2, -1.2), Mode::Mandelbrot, 50);
        assert_eq!(r, EscapeResult { iterations: 3, bounded: false });
    }

    #[test]
    fn far_point_escapes_immediately() {
        // 10² - 10² = 0, but 2·10·10 = 200.
        let r = escape_time(Complex::new(10.0, 10.0), Mode::Mandelbrot, 50);
        assert_eq!(r, EscapeResult { iterations: 0, bounded: false });
    }

    #[test]
    fn escape_test_uses_the_unshifted_square() {
        // z² = 3.0 + 4.0i sums to 7, well under the bound, even though
        // the added constant throws |z|² far past any textbook radius.
        let start = Complex::new(2.0, 1.0);
        let mode = Mode::Julia(Complex::new(100.0, 0.0));
        let r = escape_time(start, mode, 1);
        assert_eq!(r, EscapeResult { iterations: 1, bounded: true });
    }

    #[test]
    fn julia_uses_the_fixed_constant() {
        let start = Complex::new(0.5, 0.0);
        let fixed = escape_time(start, Mode::Julia(Complex::new(0.5, 0.0)), 100);
        let pinned = escape_time(start, Mode::Mandelbrot, 100);
        assert_eq!(fixed, pinned);

        let other = escape_time(start, Mode::Julia(Complex::new(-0.4, 0.6)), 100);
        assert_ne!(other, pinned);
    }

    #[test]
    fn evaluator_is_deterministic() {
        let start = Complex::new(-0.743_643_887, 0.131_825_904);
        let mode = Mode::Julia(Complex::new(-0.7269, 0.1889));
        let first = escape_time(start, mode, 500);
        for _ in 0..10 {
            assert_eq!(escape_time(start, mode, 500), first);
        }
    }

    #[test]
    fn zero_limit_is_trivially_bounded() {
        let r = escape_time(Complex::new(5.0, 5.0), Mode::Mandelbrot, 0);
        assert_eq!(r, EscapeResult { iterations: 0, bounded: true });
    }
}
