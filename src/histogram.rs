// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Histogram (rank) equalization.
//!
//! Raw divergence values bunch up badly: zoom in far enough and
//! nearly every point escapes after about the same number of
//! iterations, so any fixed mapping from value to color washes out.
//! Instead we sort the escaping samples and color them by where they
//! *rank*: the fastest escape gets the first configured color, the
//! slowest gets the last, and everything in between is spread evenly
//! along a piecewise-linear gradient.  Contrast then survives any
//! zoom level.
//!
//! The gradient is anchored at a list of breakpoints in [0, 1], each
//! paired with a color.  A rank that lands exactly on a breakpoint
//! gets exactly that breakpoint's color.

use image::Rgb;
use num::clamp;

use crate::error::{invalid, Result};
use crate::pixels::SubPixel;

const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

/// A color gradient over normalized rank, plus the color given to
/// points that never escaped.
#[derive(Clone, Debug, PartialEq)]
pub struct Histogram {
    breakpoints: Vec<f64>,
    colors: Vec<Rgb<u8>>,
    background: Rgb<u8>,
}

impl Histogram {
    /// Pairs `breakpoints[k]` with `colors[k]`.  Requires at least two
    /// of each, the same number of each, and breakpoints that rise
    /// strictly from exactly 0.0 to exactly 1.0.
    pub fn new(breakpoints: Vec<f64>, colors: Vec<Rgb<u8>>) -> Result<Histogram> {
        if breakpoints.len() != colors.len() {
            return invalid(format!(
                "{} breakpoints but {} colors",
                breakpoints.len(),
                colors.len()
            ));
        }
        if breakpoints.len() < 2 {
            return invalid("a histogram needs at least two breakpoints");
        }
        if let Some(bad) = breakpoints.iter().find(|b| !b.is_finite()) {
            return invalid(format!("breakpoint {} is not finite", bad));
        }
        if breakpoints[0] != 0.0 {
            return invalid(format!("the first breakpoint must be 0, got {}", breakpoints[0]));
        }
        let last = breakpoints[breakpoints.len() - 1];
        if last != 1.0 {
            return invalid(format!("the last breakpoint must be 1, got {}", last));
        }
        if let Some(pair) = breakpoints.windows(2).find(|w| w[0] >= w[1]) {
            return invalid(format!(
                "breakpoints must be strictly ascending, but {} is followed by {}",
                pair[0], pair[1]
            ));
        }
        Ok(Histogram {
            breakpoints,
            colors,
            background: BLACK,
        })
    }

    /// Replaces the color given to interior (non-escaping) samples.
    /// The default is black.
    pub fn with_background(self, background: Rgb<u8>) -> Histogram {
        Histogram { background, ..self }
    }

    /// The gradient the renderer has always opened with: dim grays
    /// for the bulk of the escapes, shading through blues and bronze
    /// to a pale yellow for the last few percent.
    pub fn classic() -> Histogram {
        Histogram {
            breakpoints: vec![0.0, 0.75, 0.85, 0.95, 0.99, 1.0],
            colors: vec![
                Rgb([51, 51, 51]),
                Rgb([179, 179, 179]),
                Rgb([55, 118, 145]),
                Rgb([63, 74, 132]),
                Rgb([145, 121, 82]),
                Rgb([250, 250, 200]),
            ],
            background: BLACK,
        }
    }

    /// Black to white.
    pub fn grayscale() -> Histogram {
        Histogram {
            breakpoints: vec![0.0, 1.0],
            colors: vec![BLACK, Rgb([255, 255, 255])],
            background: BLACK,
        }
    }

    /// Black through red and yellow to white.
    pub fn fire() -> Histogram {
        Histogram {
            breakpoints: vec![0.0, 0.33, 0.66, 1.0],
            colors: vec![
                BLACK,
                Rgb([255, 0, 0]),
                Rgb([255, 255, 0]),
                Rgb([255, 255, 255]),
            ],
            background: BLACK,
        }
    }

    /// The configured breakpoints.
    pub fn breakpoints(&self) -> &[f64] {
        &self.breakpoints
    }

    /// The configured colors, one per breakpoint.
    pub fn colors(&self) -> &[Rgb<u8>] {
        &self.colors
    }

    /// The color given to interior samples.
    pub fn background(&self) -> Rgb<u8> {
        self.background
    }

    /// The gradient color at normalized rank `r`.  Ranks outside
    /// [0, 1] are clamped.
    pub fn color_at(&self, r: f64) -> Rgb<u8> {
        let r = clamp(r, 0.0, 1.0);
        // First bracket whose upper end reaches r; b[k] <= r follows
        // from the breakpoints ascending out of 0.
        let k = self
            .breakpoints
            .windows(2)
            .position(|w| r <= w[1])
            .unwrap_or(self.breakpoints.len() - 2);
        let (low, high) = (self.breakpoints[k], self.breakpoints[k + 1]);
        let fraction = if high > low {
            (r - low) / (high - low)
        } else {
            0.0
        };
        let (from, to) = (self.colors[k], self.colors[k + 1]);
        Rgb([
            lerp(from.0[0], to.0[0], fraction),
            lerp(from.0[1], to.0[1], fraction),
            lerp(from.0[2], to.0[2], fraction),
        ])
    }

    /// One color per rank for `count` ranked samples.  The first is
    /// always `colors[0]`, the last always the final color, and a rank
    /// that coincides with a breakpoint gets that breakpoint's color.
    pub fn generate(&self, count: usize) -> Vec<Rgb<u8>> {
        match count {
            0 => Vec::new(),
            1 => vec![self.colors[0]],
            _ => {
                let last = (count - 1) as f64;
                (0..count).map(|i| self.color_at(i as f64 / last)).collect()
            }
        }
    }

    /// Colors a whole pool of samples at once.  Escaping samples are
    /// ranked by divergence (ties keep their order in the slice) and
    /// given the generated gradient; interior samples get the
    /// background.  The slice itself is not reordered.
    pub fn paint(&self, subpixels: &mut [SubPixel]) {
        let mut ranked: Vec<usize> = Vec::with_capacity(subpixels.len());
        for (index, sub) in subpixels.iter_mut().enumerate() {
            if sub.is_interior() {
                sub.set_color(self.background);
            } else {
                ranked.push(index);
            }
        }
        // sort_by is stable.
        ranked.sort_by(|&a, &b| subpixels[a].compare(&subpixels[b]));
        let colors = self.generate(ranked.len());
        for (index, color) in ranked.into_iter().zip(colors) {
            subpixels[index].set_color(color);
        }
    }
}

impl Default for Histogram {
    fn default() -> Histogram {
        Histogram::classic()
    }
}

fn lerp(from: u8, to: u8, fraction: f64) -> u8 {
    let (from, to) = (f64::from(from), f64::from(to));
    clamp((from + (to - from) * fraction).round(), 0.0, 255.0) as u8
}
