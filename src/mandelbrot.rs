// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The escape-time engine.
//!
//! Take a point `c`, start with `z = 0`, and repeatedly replace `z`
//! with `z² + c`.  Points whose orbit leaves the disc of radius two
//! are outside the Mandelbrot set, and how quickly they leave is what
//! gets colored.  Rather than the raw iteration count, which bands
//! badly, we return the "smoothed" count
//!
//! ```text
//!     n - log₂(ln |zₙ|)
//! ```
//!
//! which varies continuously across the plane.  Points that never
//! leave within the iteration budget get [`INTERIOR`], positive
//! infinity, so that they sort after every escaping point.

use std::f64::INFINITY;

use crate::complex::Complex;
use crate::error::{invalid, Result};

/// Divergence value for points that did not escape.
pub const INTERIOR: f64 = INFINITY;

/// Iteration budget used unless told otherwise.
pub const DEFAULT_ITERATIONS: usize = 1000;

/// Squared escape radius used unless told otherwise.  Once `|z| > 2`
/// the orbit is guaranteed to run off to infinity.
pub const DEFAULT_ESCAPE_BOUND: f64 = 4.0;

const D4: f64 = 1.0 / 4.0;
const D16: f64 = D4 / 4.0;

/// The escape-time parameters.  Once built this should not be
/// mutable; it is shared read-only by every render thread.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Mandelbrot {
    max_iterations: usize,
    // Compared against |z|², so this is the radius squared.
    escape_bound: f64,
    interior_check: bool,
}

impl Mandelbrot {
    /// Requires the iteration limit and the squared escape radius.
    /// The limit must be positive; the bound must be at least 4, the
    /// smallest value that guarantees divergence (and keeps the
    /// smoothing logarithms real).
    pub fn new(max_iterations: usize, escape_bound: f64) -> Result<Self> {
        if max_iterations == 0 {
            return invalid("the iteration limit must be positive");
        }
        if !escape_bound.is_finite() || escape_bound < DEFAULT_ESCAPE_BOUND {
            return invalid(format!(
                "the squared escape bound must be finite and at least {}, got {}",
                DEFAULT_ESCAPE_BOUND, escape_bound
            ));
        }
        Ok(Mandelbrot {
            max_iterations,
            escape_bound,
            interior_check: true,
        })
    }

    /// Always iterate, even for points that are known to be inside the
    /// main cardioid or the period-2 bulb.  The answers are the same,
    /// only slower.
    pub fn without_interior_check(self) -> Self {
        Mandelbrot {
            interior_check: false,
            ..self
        }
    }

    /// The iteration limit L.
    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    /// The squared escape radius.
    pub fn escape_bound(&self) -> f64 {
        self.escape_bound
    }

    /// This is our classic iterator function, which either returns the
    /// iteration at which the orbit escaped along with the first `z`
    /// past the bound, or nothing at all.
    pub fn escape_time(&self, c: Complex) -> Option<(usize, Complex)> {
        if self.interior_check && !maybe_outside(c) {
            return None;
        }
        let mut z = Complex::ZERO;
        for i in 0..self.max_iterations {
            if z.squared_modulus() > self.escape_bound {
                return Some((i, z));
            }
            z = z * z + c;
        }
        None
    }

    /// The smoothed divergence of `c`: a finite value in `[0, L)` for
    /// points that escape, smaller for points that escape sooner, or
    /// [`INTERIOR`] for points that don't.
    pub fn divergence(&self, c: Complex) -> f64 {
        match self.escape_time(c) {
            None => INTERIOR,
            Some((n, z)) => ((n as f64) - z.modulus().ln().log2()).max(0.0),
        }
    }
}

impl Default for Mandelbrot {
    fn default() -> Self {
        Mandelbrot {
            max_iterations: DEFAULT_ITERATIONS,
            escape_bound: DEFAULT_ESCAPE_BOUND,
            interior_check: true,
        }
    }
}

/// False if the point is guaranteed to be inside the main cardioid or
/// the period-2 bulb.  True does *not* mean the point is outside the
/// set; it still has to be iterated.
pub fn maybe_outside(point: Complex) -> bool {
    let y = point.im * point.im;
    let q = y + (point.re - D4) * (point.re - D4);
    q * (q + point.re - D4) > (y * D4) && (point.re + 1.0) * (point.re + 1.0) + y > D16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_is_interior() {
        assert_eq!(Mandelbrot::default().divergence(Complex::ZERO), INTERIOR);
        let slow = Mandelbrot::default().without_interior_check();
        assert_eq!(slow.divergence(Complex::ZERO), INTERIOR);
    }

    #[test]
    fn bulb_and_cardioid_points_are_interior_either_way() {
        let fast = Mandelbrot::default();
        let slow = fast.without_interior_check();
        for c in &[
            Complex::new(-1.0, 0.0),
            Complex::new(-0.1, 0.1),
            Complex::new(0.2, 0.0),
            Complex::new(-0.5, 0.5),
        ] {
            assert!(!maybe_outside(*c));
            assert_eq!(fast.divergence(*c), INTERIOR);
            assert_eq!(slow.divergence(*c), INTERIOR);
        }
    }

    #[test]
    fn escape_requires_exceeding_the_bound() {
        // The orbit of -2 sits at |z| = 2 forever.
        let slow = Mandelbrot::default().without_interior_check();
        assert_eq!(slow.escape_time(Complex::real(-2.0)), None);
        assert_eq!(slow.divergence(Complex::real(-2.0)), INTERIOR);
    }

    #[test]
    fn far_points_escape_quickly() {
        let m = Mandelbrot::default();
        for c in &[
            Complex::new(3.0, 0.0),
            Complex::new(-2.0, 2.0),
            Complex::new(0.0, -2.5),
            Complex::new(1.5, 1.5),
        ] {
            let d = m.divergence(*c);
            assert!(d.is_finite());
            assert!(d >= 0.0 && d < 2.0, "divergence of {} was {}", c, d);
        }
        assert_eq!(m.escape_time(Complex::real(3.0)).map(|(n, _)| n), Some(1));
    }

    #[test]
    fn very_far_points_clamp_to_zero() {
        assert_eq!(Mandelbrot::default().divergence(Complex::real(1e6)), 0.0);
    }

    #[test]
    fn faster_escapes_give_smaller_values() {
        let m = Mandelbrot::default();
        let values: Vec<f64> = [0.5, 1.0, 2.0, 3.0]
            .iter()
            .map(|re| m.divergence(Complex::real(*re)))
            .collect();
        for pair in values.windows(2) {
            assert!(pair[0] > pair[1], "{:?} is not decreasing", values);
        }
        for v in &values {
            assert!(*v < m.divergence(Complex::ZERO));
        }
    }

    #[test]
    fn iteration_limit_bounds_the_value() {
        let near = Complex::real(0.2501);
        let short = Mandelbrot::new(100, DEFAULT_ESCAPE_BOUND).unwrap();
        assert_eq!(short.divergence(near), INTERIOR);

        let m = Mandelbrot::default();
        let d = m.divergence(near);
        assert!(d.is_finite());
        assert!(d > 100.0 && d < m.max_iterations() as f64);
    }

    #[test]
    fn invalid_configurations_are_rejected() {
        assert!(Mandelbrot::new(0, 4.0).is_err());
        assert!(Mandelbrot::new(10, 1.0).is_err());
        assert!(Mandelbrot::new(10, std::f64::NAN).is_err());
        assert!(Mandelbrot::new(10, INFINITY).is_err());
        let m = Mandelbrot::new(10, 16.0).unwrap();
        assert_eq!((m.max_iterations(), m.escape_bound()), (10, 16.0));
    }
}
