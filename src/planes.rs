// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Contains the Camera struct, which describes a relationship between
//! the unit square of normalized screen coordinates and a rectangle
//! (possibly rotated) on the complex plane.
//!
//! The camera knows nothing about pixels.  Whoever walks the pixel
//! grid is responsible for normalizing its coordinates into [0, 1],
//! and for flipping the vertical axis: screen rows grow downward, the
//! imaginary axis grows upward.
use crate::complex::Complex;
use crate::error::{invalid, Result};

/// A view onto the complex plane: where it's centered, how much of
/// the plane it takes in, and which way is up.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Camera {
    center: Complex,
    // The full extent of the view along each screen axis, as vectors
    // in the complex plane.  Unrotated, these are `width` along the
    // real axis and `width / aspect_ratio` along the imaginary axis.
    horizontal: Complex,
    vertical: Complex,
    width: f64,
    aspect_ratio: f64,
    angle: f64,
}

impl Camera {
    /// Constructor.  `width` is the zoom: the span of the real axis
    /// visible across the view.  Smaller widths zoom in.  The
    /// imaginary span is `width / aspect_ratio`.
    pub fn new(center: Complex, width: f64, aspect_ratio: f64) -> Result<Camera> {
        Camera::build(center, width, aspect_ratio, 0.0)
    }

    fn build(center: Complex, width: f64, aspect_ratio: f64, angle: f64) -> Result<Camera> {
        if !center.re.is_finite() || !center.im.is_finite() {
            return invalid(format!("camera center {} is not finite", center));
        }
        if !width.is_finite() || width <= 0.0 {
            return invalid(format!("camera width must be positive, got {}", width));
        }
        if !aspect_ratio.is_finite() || aspect_ratio <= 0.0 {
            return invalid(format!(
                "camera aspect ratio must be positive, got {}",
                aspect_ratio
            ));
        }
        if !angle.is_finite() {
            return invalid(format!("camera angle {} is not finite", angle));
        }

        let turn = Complex::rotation(angle);
        Ok(Camera {
            center,
            horizontal: turn * Complex::real(width),
            vertical: turn * Complex::new(0.0, width / aspect_ratio),
            width,
            aspect_ratio,
            angle,
        })
    }

    /// The view the renderer opens on: the whole set, framed for a
    /// 4:3 canvas.
    pub fn classic() -> Camera {
        Camera::preset(Complex::new(-0.5, 0.0), 3.0, 4.0 / 3.0)
    }

    /// The square [-2, 2] x [-2, 2], which holds every point that
    /// could possibly be in the set.
    pub fn full() -> Camera {
        Camera::preset(Complex::ZERO, 4.0, 1.0)
    }

    /// A close-up of Seahorse Valley, between the cardioid and the
    /// period-2 bulb.
    pub fn seahorse() -> Camera {
        Camera::preset(Complex::new(-0.743_643_887, 0.131_825_904), 0.01, 4.0 / 3.0)
    }

    // Presets are compile-time known good.
    fn preset(center: Complex, width: f64, aspect_ratio: f64) -> Camera {
        Camera {
            center,
            horizontal: Complex::real(width),
            vertical: Complex::new(0.0, width / aspect_ratio),
            width,
            aspect_ratio,
            angle: 0.0,
        }
    }

    /// The same view reshaped for a canvas with a different
    /// width-to-height ratio.  The real span is kept.
    pub fn with_aspect_ratio(&self, aspect_ratio: f64) -> Result<Camera> {
        Camera::build(self.center, self.width, aspect_ratio, self.angle)
    }

    /// The same view, turned counter-clockwise by `angle` radians
    /// about its center.
    pub fn rotated(&self, angle: f64) -> Result<Camera> {
        Camera::build(self.center, self.width, self.aspect_ratio, self.angle + angle)
    }

    /// The point at the middle of the view.
    pub fn center(&self) -> Complex {
        self.center
    }

    /// The span of the real axis visible across the view.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Width over height of the view.
    pub fn aspect_ratio(&self) -> f64 {
        self.aspect_ratio
    }

    /// Given normalized screen coordinates, return the corresponding
    /// point on the complex plane.  (0, 0) and (1, 1) are opposite
    /// corners of the view, and (0.5, 0.5) is its center.  Increasing
    /// `v` moves toward the positive imaginary axis.
    pub fn to_complex(&self, u: f64, v: f64) -> Complex {
        self.center + self.horizontal.scale(u - 0.5) + self.vertical.scale(v - 0.5)
    }
}

impl Default for Camera {
    fn default() -> Camera {
        Camera::classic()
    }
}
