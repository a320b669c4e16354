// Copyright 2025 Lars Brubaker
// WASM bindings for p2t-rust

use p2t_rust::{Point, SweepContext};
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn main_js() {
    console_error_panic_hook::set_once();
}

fn to_points(coords: &[f64]) -> Vec<Point> {
    coords
        .chunks_exact(2)
        .map(|c| Point::new(c[0], c[1]))
        .collect()
}

/// A polygon with holes and Steiner points, triangulated on demand.
#[wasm_bindgen]
pub struct SweepContextJs {
    inner: SweepContext,
    last_error: Option<String>,
}

#[wasm_bindgen]
impl SweepContextJs {
    /// Start from the outer boundary as a flat [x0,y0, x1,y1, ...] Float64Array.
    #[wasm_bindgen(constructor)]
    pub fn new(boundary: &[f64]) -> SweepContextJs {
        let mut inner = SweepContext::new();
        let last_error = inner
            .initialize(&to_points(boundary))
            .err()
            .map(|e| e.to_string());
        SweepContextJs { inner, last_error }
    }

    /// Returns false (see last_error) if the hole was rejected.
    pub fn add_hole(&mut self, hole: &[f64]) -> bool {
        let r = self.inner.add_hole(&to_points(hole));
        self.record(r)
    }

    pub fn add_point(&mut self, x: f64, y: f64) -> bool {
        let r = self.inner.add_point(Point::new(x, y));
        self.record(r)
    }

    /// Triangulate and return true on success.
    pub fn triangulate(&mut self) -> bool {
        let r = self.inner.triangulate().map(|_| ());
        self.record(r)
    }

    pub fn triangle_count(&self) -> u32 {
        self.inner.triangle_count() as u32
    }

    /// Flat vertex positions [x0,y0, x1,y1, ...]: boundary, holes, then Steiner points.
    pub fn get_vertices(&self) -> Vec<f64> {
        self.inner.vertices().to_vec()
    }

    /// Flat triangle vertex-index triples [i0,i1,i2, ...].
    pub fn get_elements(&self) -> Vec<u32> {
        self.inner.elements().to_vec()
    }

    /// Message of the last failed call, if any.
    pub fn last_error(&self) -> Option<String> {
        self.last_error.clone()
    }
}

impl SweepContextJs {
    fn record(&mut self, r: p2t_rust::P2tResult<()>) -> bool {
        match r {
            Ok(()) => true,
            Err(e) => {
                self.last_error = Some(e.to_string());
                false
            }
        }
    }
}

/// Convenience: triangulate a single boundary without holes and return the
/// element index array (empty on failure).
#[wasm_bindgen]
pub fn triangulate_polygon(boundary: &[f64]) -> Vec<u32> {
    let mut ctx = SweepContextJs::new(boundary);
    if ctx.last_error.is_some() || !ctx.triangulate() {
        return Vec::new();
    }
    ctx.get_elements()
}
