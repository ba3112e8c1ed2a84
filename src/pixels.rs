// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! What a render hands back: samples, the pixels they belong to, and
//! the frame of pixels.
use image::{ImageBuffer, Rgb, RgbImage};
use std::cmp::Ordering;

use crate::mandelbrot::INTERIOR;

/// One sampled point: its divergence, and the color equalization gave
/// it.  The color is unset until the whole frame has been painted.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SubPixel {
    divergence: f64,
    color: Option<Rgb<u8>>,
}

impl SubPixel {
    /// A fresh, uncolored sample.
    pub fn new(divergence: f64) -> SubPixel {
        SubPixel {
            divergence,
            color: None,
        }
    }

    /// The smoothed divergence, or [`INTERIOR`].
    pub fn divergence(&self) -> f64 {
        self.divergence
    }

    /// True if the point never escaped.
    pub fn is_interior(&self) -> bool {
        self.divergence == INTERIOR
    }

    /// The assigned color, if equalization has run.
    pub fn color(&self) -> Option<Rgb<u8>> {
        self.color
    }

    /// Assigns the color.
    pub fn set_color(&mut self, color: Rgb<u8>) {
        self.color = Some(color);
    }

    /// Ascending by divergence, interior last.  Used with a stable
    /// sort, so equal values keep their generation order.
    pub fn compare(&self, other: &SubPixel) -> Ordering {
        self.divergence
            .partial_cmp(&other.divergence)
            .unwrap_or(Ordering::Equal)
    }
}

/// Describes the x, y of a display cell, and the S x S samples taken
/// inside it.
#[derive(Clone, Debug, PartialEq)]
pub struct Pixel {
    x: usize,
    y: usize,
    subpixels: Vec<SubPixel>,
}

impl Pixel {
    /// Constructor.  The samples are ordered subpixel column first,
    /// then row within that column.
    pub fn new(x: usize, y: usize, subpixels: Vec<SubPixel>) -> Pixel {
        Pixel { x, y, subpixels }
    }

    /// Column of the pixel.
    pub fn x(&self) -> usize {
        self.x
    }

    /// Row of the pixel, counting down from the top.
    pub fn y(&self) -> usize {
        self.y
    }

    /// The samples taken inside this pixel.
    pub fn subpixels(&self) -> &[SubPixel] {
        &self.subpixels
    }

    /// The displayable color: the channel-wise mean of the sample
    /// colors.  A sample that was never painted counts as black.
    pub fn color(&self) -> Rgb<u8> {
        if self.subpixels.is_empty() {
            return Rgb([0, 0, 0]);
        }
        let mut sums = [0u32; 3];
        for sub in &self.subpixels {
            if let Some(Rgb(channels)) = sub.color {
                for (sum, channel) in sums.iter_mut().zip(channels.iter()) {
                    *sum += u32::from(*channel);
                }
            }
        }
        let n = self.subpixels.len() as u32;
        // Rounded, not truncated, so a uniform pixel keeps its color.
        let mean = |sum: u32| ((sum + n / 2) / n) as u8;
        Rgb([mean(sums[0]), mean(sums[1]), mean(sums[2])])
    }
}

/// The result of a render: `width * height` pixels in row-major
/// order, each carrying `supersampling²` painted samples.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    width: usize,
    height: usize,
    supersampling: usize,
    pixels: Vec<Pixel>,
}

impl Frame {
    pub(crate) fn new(
        width: usize,
        height: usize,
        supersampling: usize,
        pixels: Vec<Pixel>,
    ) -> Frame {
        debug_assert_eq!(pixels.len(), width * height);
        Frame {
            width,
            height,
            supersampling,
            pixels,
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Samples per pixel along each axis.
    pub fn supersampling(&self) -> usize {
        self.supersampling
    }

    /// Every pixel, row by row from the top left.
    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    /// The pixel at column `x`, row `y`, if there is one.
    pub fn pixel(&self, x: usize, y: usize) -> Option<&Pixel> {
        if x < self.width && y < self.height {
            self.pixels.get(y * self.width + x)
        } else {
            None
        }
    }

    /// Every sample in the frame, pixel by pixel.
    pub fn subpixels(&self) -> impl Iterator<Item = &SubPixel> {
        self.pixels.iter().flat_map(|p| p.subpixels.iter())
    }

    /// Flattens the frame into an image, one averaged color per pixel.
    pub fn to_image(&self) -> RgbImage {
        ImageBuffer::from_fn(self.width as u32, self.height as u32, |x, y| {
            self.pixels[(y as usize) * self.width + (x as usize)].color()
        })
    }
}
