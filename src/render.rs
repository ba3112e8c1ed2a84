// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The render pipeline.
//!
//! Rendering happens in two phases with a hard barrier between them.
//! First every sample in the supersampled grid is mapped through the
//! camera and the escape-time engine.  Each sample depends only on its
//! own coordinates and the (immutable) configuration, so this phase
//! is split into rows and handed out to as many threads as you like.
//! Only once every thread has finished can the second phase begin:
//! equalization ranks the *whole* pool of samples, so no color can be
//! assigned while any divergence is still missing.

use itertools::iproduct;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tracing::{debug, info};

use crate::complex::Complex;
use crate::error::{invalid, Error, Result};
use crate::histogram::Histogram;
use crate::mandelbrot::Mandelbrot;
use crate::pixels::{Frame, Pixel, SubPixel};
use crate::planes::Camera;

/// Samples per pixel along each axis, unless told otherwise.
pub const DEFAULT_SUPERSAMPLING: usize = 3;

/// A flag shared between whoever starts a render and whoever wants to
/// stop it.  Workers look at it between rows; a sample already being
/// computed is always finished.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// A token that has not been cancelled.
    pub fn new() -> CancelToken {
        CancelToken::default()
    }

    /// Asks every render watching this token to stop.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether `cancel` has been called on this token or a clone of it.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Takes a canvas size, a supersampling factor, a camera and an
/// escape-time engine, and renders frames from them.  The histogram
/// is supplied per render, so it can be swapped between frames
/// without rebuilding anything else.
#[derive(Clone, Debug)]
pub struct Renderer {
    width: usize,
    height: usize,
    supersampling: usize,
    camera: Camera,
    mandelbrot: Mandelbrot,
}

impl Renderer {
    /// Requires the width and height of the image in pixels, and the
    /// number of samples per pixel along each axis.  All three must be
    /// positive.  The camera is used as given; callers who want it to
    /// match the canvas shape should reshape it with
    /// [`Camera::with_aspect_ratio`] first.
    pub fn new(
        width: usize,
        height: usize,
        supersampling: usize,
        camera: Camera,
        mandelbrot: Mandelbrot,
    ) -> Result<Self> {
        if width == 0 || height == 0 {
            return invalid(format!("canvas must not be empty, got {}x{}", width, height));
        }
        if supersampling == 0 {
            return invalid("supersampling must be at least 1");
        }
        Ok(Renderer {
            width,
            height,
            supersampling,
            camera,
            mandelbrot,
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

    /// Samples per pixel along each axis.
    pub fn supersampling(&self) -> usize {
        self.supersampling
    }

    /// The view being rendered.
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// The escape-time engine in use.
    pub fn mandelbrot(&self) -> &Mandelbrot {
        &self.mandelbrot
    }

    /// The total number of samples in a frame.  Used to calculate
    /// memory needs.
    pub fn sample_count(&self) -> usize {
        self.width * self.height * self.samples_per_pixel()
    }

    fn samples_per_pixel(&self) -> usize {
        self.supersampling * self.supersampling
    }

    fn samples_per_row(&self) -> usize {
        self.width * self.samples_per_pixel()
    }

    /// Normalized screen coordinates of sample `index`.  Samples are
    /// numbered pixel by pixel in row-major order, and within a pixel
    /// subpixel column first.  The vertical coordinate is flipped so
    /// that rows further down the image land lower on the plane.
    pub fn sample_position(&self, index: usize) -> (f64, f64) {
        let s = self.supersampling;
        let (pixel, sub) = (index / (s * s), index % (s * s));
        let (x, y) = (pixel % self.width, pixel / self.width);
        let (i, j) = (sub / s, sub % s);
        let grid_width = (s * self.width) as f64;
        let grid_height = (s * self.height) as f64;
        (
            ((s * x + i) as f64) / grid_width,
            1.0 - ((s * y + j) as f64) / grid_height,
        )
    }

    /// The point on the complex plane sampled by sample `index`.
    pub fn sample_point(&self, index: usize) -> Complex {
        let (u, v) = self.sample_position(index);
        self.camera.to_complex(u, v)
    }

    fn fill_row(&self, row: usize, buffer: &mut [f64]) {
        let start = row * self.samples_per_row();
        for (offset, value) in buffer.iter_mut().enumerate() {
            *value = self.mandelbrot.divergence(self.sample_point(start + offset));
        }
    }

    /// The first phase on the calling thread: every sample's
    /// divergence, in sample order.
    pub fn divergences_single(&self, cancel: &CancelToken) -> Result<Vec<f64>> {
        let mut buffer = vec![0.0; self.sample_count()];
        for (row, chunk) in buffer.chunks_mut(self.samples_per_row()).enumerate() {
            if cancel.is_cancelled() {
                return Err(Error::Cancelled);
            }
            self.fill_row(row, chunk);
        }
        Ok(buffer)
    }

    /// The first phase spread over `threads` scoped threads.  Rows are
    /// handed out one at a time from a shared iterator, so a thread
    /// that drew cheap rows simply takes more of them.  The result is
    /// identical to [`Renderer::divergences_single`].
    pub fn divergences(&self, threads: usize, cancel: &CancelToken) -> Result<Vec<f64>> {
        if threads <= 1 {
            return self.divergences_single(cancel);
        }
        let mut buffer = vec![0.0; self.sample_count()];
        {
            let rows = Mutex::new(buffer.chunks_mut(self.samples_per_row()).enumerate());
            let rows = &rows;
            crossbeam::scope(|spawner| {
                for _ in 0..threads {
                    spawner.spawn(move |_| loop {
                        if cancel.is_cancelled() {
                            break;
                        }
                        let row = match rows.lock() {
                            Ok(mut rows) => rows.next(),
                            Err(_) => None,
                        };
                        match row {
                            Some((row, chunk)) => self.fill_row(row, chunk),
                            None => break,
                        }
                    });
                }
            })
            .map_err(|_| Error::WorkerPanicked)?;
        }
        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }
        Ok(buffer)
    }

    /// The second phase: paint the whole pool at once, then hand each
    /// pixel its own samples back.
    fn assemble(&self, divergences: Vec<f64>, histogram: &Histogram) -> Frame {
        let mut subpixels: Vec<SubPixel> = divergences.into_iter().map(SubPixel::new).collect();
        histogram.paint(&mut subpixels);
        let pixels: Vec<Pixel> = iproduct!(0..self.height, 0..self.width)
            .zip(subpixels.chunks(self.samples_per_pixel()))
            .map(|((y, x), samples)| Pixel::new(x, y, samples.to_vec()))
            .collect();
        Frame::new(self.width, self.height, self.supersampling, pixels)
    }

    /// Renders a frame on the calling thread.
    pub fn render_single(&self, histogram: &Histogram) -> Result<Frame> {
        let start = Instant::now();
        info!(
            width = self.width,
            height = self.height,
            supersampling = self.supersampling,
            "rendering on one thread"
        );
        let divergences = self.divergences_single(&CancelToken::new())?;
        Ok(self.finish(divergences, histogram, start))
    }

    /// Renders a frame using `threads` threads for the first phase.
    pub fn render(&self, histogram: &Histogram, threads: usize) -> Result<Frame> {
        self.render_with_cancel(histogram, threads, &CancelToken::new())
    }

    /// As [`Renderer::render`], but gives up with
    /// [`Error::Cancelled`] once `cancel` is set.
    pub fn render_with_cancel(
        &self,
        histogram: &Histogram,
        threads: usize,
        cancel: &CancelToken,
    ) -> Result<Frame> {
        let start = Instant::now();
        info!(
            width = self.width,
            height = self.height,
            supersampling = self.supersampling,
            threads = threads,
            "rendering"
        );
        let divergences = self.divergences(threads, cancel)?;
        Ok(self.finish(divergences, histogram, start))
    }

    fn finish(&self, divergences: Vec<f64>, histogram: &Histogram, start: Instant) -> Frame {
        let interior = divergences.iter().filter(|d| d.is_infinite()).count();
        debug!(
            samples = divergences.len(),
            interior = interior,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "divergences computed"
        );
        let frame = self.assemble(divergences, histogram);
        info!(
            pixels = frame.pixels().len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "frame rendered"
        );
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mandelbrot::INTERIOR;

    fn small(supersampling: usize) -> Renderer {
        Renderer::new(
            20,
            15,
            supersampling,
            Camera::classic(),
            Mandelbrot::new(200, 4.0).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn renderer_fails_on_empty_grids() {
        let (camera, m) = (Camera::classic(), Mandelbrot::default());
        assert!(Renderer::new(0, 10, 3, camera, m).is_err());
        assert!(Renderer::new(10, 0, 3, camera, m).is_err());
        assert!(Renderer::new(10, 10, 0, camera, m).is_err());
        assert!(Renderer::new(1, 1, 1, camera, m).is_ok());
    }

    #[test]
    fn sample_positions_follow_the_grid() {
        let r = Renderer::new(2, 2, 2, Camera::full(), Mandelbrot::default()).unwrap();
        assert_eq!(r.sample_count(), 16);
        // pixel (0, 0), subpixel (0, 0): left edge, top edge
        assert_eq!(r.sample_position(0), (0.0, 1.0));
        // pixel (0, 0), subpixel (0, 1): one subpixel row down
        assert_eq!(r.sample_position(1), (0.0, 0.75));
        // pixel (0, 0), subpixel (1, 0): one subpixel column across
        assert_eq!(r.sample_position(2), (0.25, 1.0));
        // pixel (1, 0), subpixel (0, 0)
        assert_eq!(r.sample_position(4), (0.5, 1.0));
        // pixel (0, 1), subpixel (1, 1)
        assert_eq!(r.sample_position(11), (0.25, 0.25));
    }

    #[test]
    fn lower_rows_sample_lower_on_the_plane() {
        let r = Renderer::new(4, 4, 1, Camera::full(), Mandelbrot::default()).unwrap();
        assert_eq!(r.sample_point(0), Complex::new(-2.0, 2.0));
        for row in 1..4 {
            let above = r.sample_point((row - 1) * 4);
            let below = r.sample_point(row * 4);
            assert!(below.im < above.im);
            assert_eq!(below.re, above.re);
        }
    }

    #[test]
    fn frame_has_every_pixel_and_sample() {
        let frame = small(2).render_single(&Histogram::classic()).unwrap();
        assert_eq!((frame.width(), frame.height(), frame.supersampling()), (20, 15, 2));
        assert_eq!(frame.pixels().len(), 300);
        for (index, pixel) in frame.pixels().iter().enumerate() {
            assert_eq!((pixel.x(), pixel.y()), (index % 20, index / 20));
            assert_eq!(pixel.subpixels().len(), 4);
            assert!(pixel.subpixels().iter().all(|s| s.color().is_some()));
        }
    }

    #[test]
    fn threads_do_not_change_the_picture() {
        let renderer = small(3);
        let histogram = Histogram::classic();
        let single = renderer.render_single(&histogram).unwrap();
        for threads in &[0, 1, 2, 4, 7] {
            assert_eq!(renderer.render(&histogram, *threads).unwrap(), single);
        }
    }

    #[test]
    fn cancelled_renders_stop() {
        let renderer = small(1);
        let cancel = CancelToken::new();
        let watcher = cancel.clone();
        cancel.cancel();
        assert!(watcher.is_cancelled());
        for threads in &[1, 4] {
            assert_eq!(
                renderer.render_with_cancel(&Histogram::classic(), *threads, &watcher),
                Err(Error::Cancelled)
            );
        }
        assert_eq!(renderer.divergences_single(&watcher), Err(Error::Cancelled));
    }

    #[test]
    fn interior_samples_get_the_background() {
        let histogram = Histogram::grayscale().with_background(image::Rgb([1, 2, 3]));
        let frame = small(1).render(&histogram, 2).unwrap();
        let interior: Vec<&SubPixel> = frame.subpixels().filter(|s| s.is_interior()).collect();
        assert!(!interior.is_empty());
        assert!(interior
            .iter()
            .all(|s| s.divergence() == INTERIOR && s.color() == Some(image::Rgb([1, 2, 3]))));
    }
}
