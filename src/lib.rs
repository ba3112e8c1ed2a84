#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Histobrot: a Mandelbrot renderer with histogram equalization
//!
//! The Mandelbrot set is the set of points `c` on the complex plane
//! for which repeatedly squaring a number and adding `c` never runs
//! off to infinity.  Points outside the set do run off, some faster
//! than others, and the speed at which they do is what gives the
//! familiar pictures their color.
//!
//! This crate samples a grid of points several times per pixel
//! (supersampling), measures a smoothed escape speed for each sample,
//! and then colors the samples not by that raw speed but by its
//! *rank* among all the samples in the frame.  Ranking spreads the
//! configured colors evenly over whatever range of values the frame
//! happens to contain, which keeps the contrast up no matter how far
//! in you zoom.  Because ranking needs every sample, a render runs in
//! two phases: a freely parallel map from points to divergences, and
//! then one global sort-and-paint.
//!
//! ```no_run
//! use histobrot::{Camera, Histogram, Mandelbrot, Renderer};
//!
//! let camera = Camera::classic().with_aspect_ratio(800.0 / 600.0).unwrap();
//! let renderer = Renderer::new(800, 600, 3, camera, Mandelbrot::default()).unwrap();
//! let frame = renderer.render(&Histogram::classic(), 4).unwrap();
//! frame.to_image().save("mandelbrot.png").unwrap();
//! ```

extern crate crossbeam;
extern crate failure;
extern crate image;
extern crate itertools;
extern crate num;
extern crate tracing;

pub mod complex;
pub mod error;
pub mod histogram;
pub mod mandelbrot;
pub mod pixels;
pub mod planes;
pub mod render;

pub use complex::Complex;
pub use error::{Error, Result};
pub use histogram::Histogram;
pub use mandelbrot::{Mandelbrot, INTERIOR};
pub use pixels::{Frame, Pixel, SubPixel};
pub use planes::Camera;
pub use render::{CancelToken, Renderer, DEFAULT_SUPERSAMPLING};
