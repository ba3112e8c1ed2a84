// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

#[macro_use]
extern crate criterion;
extern crate histobrot;

use criterion::Criterion;
use histobrot::{Camera, Complex, Histogram, Mandelbrot, Renderer};
use std::hint::black_box;

fn divergence(c: &mut Criterion) {
    let m = Mandelbrot::default();
    c.bench_function("divergence near the boundary", move |b| {
        b.iter(|| m.divergence(black_box(Complex::new(-0.743_643_887, 0.131_825_904))))
    });
    let slow = Mandelbrot::default().without_interior_check();
    c.bench_function("divergence inside, no shortcut", move |b| {
        b.iter(|| slow.divergence(black_box(Complex::new(-0.1, 0.1))))
    });
}

fn small_render(c: &mut Criterion) {
    let renderer = Renderer::new(64, 48, 2, Camera::classic(), Mandelbrot::default()).unwrap();
    let histogram = Histogram::classic();
    c.bench_function("render 64x48 single", move |b| {
        b.iter(|| renderer.render_single(&histogram).unwrap())
    });
}

criterion_group!(benches, divergence, small_render);
criterion_main!(benches);
