// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A small immutable complex number.
//!
//! `num::Complex` would happily divide by zero and hand back NaNs and
//! infinities; the renderer would much rather be told.  This type
//! keeps the same `re`/`im` layout (and converts to and from
//! `num::Complex<f64>` freely), but its division and reciprocal are
//! fallible.
//!
//! Equality is exact: two values are equal when both of their
//! components compare equal as `f64`.  Numerical code that needs
//! slack should say so explicitly with [`Complex::approx_eq`].

use num::{One, Zero};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Add, Mul, Neg, Sub};

use crate::error::{Error, Result};

/// Default tolerance for [`Complex::approx_eq`].
pub const EPSILON: f64 = 1e-9;

/// A point on the complex plane, treating the real part as the
/// x-component and the imaginary part as the y-component.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Complex {
    /// The real component.
    pub re: f64,
    /// The imaginary component.
    pub im: f64,
}

impl Complex {
    /// 0 + 0i
    pub const ZERO: Complex = Complex { re: 0.0, im: 0.0 };
    /// 1 + 0i
    pub const ONE: Complex = Complex { re: 1.0, im: 0.0 };
    /// 0 + 1i
    pub const I: Complex = Complex { re: 0.0, im: 1.0 };

    /// Constructor.
    pub const fn new(re: f64, im: f64) -> Complex {
        Complex { re, im }
    }

    /// A complex number lying on the real axis.
    pub const fn real(re: f64) -> Complex {
        Complex { re, im: 0.0 }
    }

    /// The point at angle `theta` (radians) on the unit circle.
    /// Multiplying by it rotates a number about the origin.
    pub fn rotation(theta: f64) -> Complex {
        Complex::new(theta.cos(), theta.sin())
    }

    /// Flips the sign of the imaginary part.
    pub fn conjugate(self) -> Complex {
        Complex::new(self.re, -self.im)
    }

    /// Multiplies both components by a real factor.
    pub fn scale(self, k: f64) -> Complex {
        Complex::new(self.re * k, self.im * k)
    }

    /// `re² + im²`.  Cheaper than the modulus, and all the escape test
    /// ever needs.
    pub fn squared_modulus(self) -> f64 {
        self.re * self.re + self.im * self.im
    }

    /// Distance from the origin.
    pub fn modulus(self) -> f64 {
        self.squared_modulus().sqrt()
    }

    /// `1 / self`, computed as the conjugate divided by the squared
    /// modulus.  Fails on zero rather than producing infinities.
    pub fn reciprocal(self) -> Result<Complex> {
        let m = self.squared_modulus();
        if m == 0.0 {
            return Err(Error::DivisionByZero);
        }
        Ok(Complex::new(self.re / m, -self.im / m))
    }

    /// `self / divisor`.
    pub fn divide(self, divisor: Complex) -> Result<Complex> {
        Ok(self * divisor.reciprocal()?)
    }

    /// Raises to a non-negative integer power.  `pow(0)` is `ONE` for
    /// every value, zero included.
    pub fn pow(self, exponent: usize) -> Complex {
        num::pow(self, exponent)
    }

    /// Component-wise comparison with an absolute tolerance.
    pub fn approx_eq(self, other: Complex, epsilon: f64) -> bool {
        (self.re - other.re).abs() <= epsilon && (self.im - other.im).abs() <= epsilon
    }
}

impl Add for Complex {
    type Output = Complex;
    fn add(self, rhs: Complex) -> Complex {
        Complex::new(self.re + rhs.re, self.im + rhs.im)
    }
}

impl Sub for Complex {
    type Output = Complex;
    fn sub(self, rhs: Complex) -> Complex {
        Complex::new(self.re - rhs.re, self.im - rhs.im)
    }
}

impl Mul for Complex {
    type Output = Complex;
    fn mul(self, rhs: Complex) -> Complex {
        Complex::new(
            self.re * rhs.re - self.im * rhs.im,
            self.re * rhs.im + self.im * rhs.re,
        )
    }
}

impl Mul<f64> for Complex {
    type Output = Complex;
    fn mul(self, k: f64) -> Complex {
        self.scale(k)
    }
}

impl Neg for Complex {
    type Output = Complex;
    fn neg(self) -> Complex {
        Complex::new(-self.re, -self.im)
    }
}

impl Zero for Complex {
    fn zero() -> Complex {
        Complex::ZERO
    }

    fn is_zero(&self) -> bool {
        *self == Complex::ZERO
    }
}

impl One for Complex {
    fn one() -> Complex {
        Complex::ONE
    }
}

// 0.0 == -0.0, so they must hash alike.
fn canonical_bits(x: f64) -> u64 {
    if x == 0.0 {
        0
    } else {
        x.to_bits()
    }
}

impl Hash for Complex {
    fn hash<H: Hasher>(&self, state: &mut H) {
        canonical_bits(self.re).hash(state);
        canonical_bits(self.im).hash(state);
    }
}

impl fmt::Display for Complex {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.im.is_sign_negative() {
            write!(f, "{}-{}i", self.re, -self.im)
        } else {
            write!(f, "{}+{}i", self.re, self.im)
        }
    }
}

impl From<num::Complex<f64>> for Complex {
    fn from(c: num::Complex<f64>) -> Complex {
        Complex::new(c.re, c.im)
    }
}

impl From<Complex> for num::Complex<f64> {
    fn from(c: Complex) -> num::Complex<f64> {
        num::Complex::new(c.re, c.im)
    }
}
