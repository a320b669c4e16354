// p2t-rust: Rust port of Poly2Tri, sweep-line Constrained Delaunay Triangulation
// Copyright 2025 Lars Brubaker
// License: BSD-3-Clause (Poly2Tri Copyright (c) 2009-2011, Poly2Tri Contributors)

pub mod context;
pub mod error;
pub mod front;
pub mod geom;
pub mod mesh;
pub mod sweep;

pub use context::{Edge, SweepContext, SweepOption};
pub use error::{P2tError, P2tResult};
pub use geom::{Orientation, Point, Real};
pub use mesh::{Mesh, PointIdx, TriIdx, Triangle};
