// Copyright 2025 Lars Brubaker
// License: BSD-3-Clause (Poly2Tri Copyright (c) 2009-2011, Poly2Tri Contributors)
//
// Error kinds reported by the triangulation engine. Every failure is terminal
// for the current triangulation request; no partial mesh is kept.

use thiserror::Error;

use crate::geom::Point;

/// Errors that can occur while building or triangulating a [`SweepContext`].
///
/// [`SweepContext`]: crate::SweepContext
#[derive(Debug, Clone, PartialEq, Error)]
pub enum P2tError {
    /// Three points that were about to form a triangle are collinear within
    /// the orientation tolerance, or a point lies on a constraint edge.
    #[error("degenerate geometry: ({a}), ({b}), ({c}) are collinear")]
    DegenerateGeometry { a: Point, b: Point, c: Point },

    /// Two input points share identical coordinates.
    #[error("duplicate point ({x}, {y})")]
    DuplicatePoint { x: f64, y: f64 },

    /// A constraint edge could not be inserted without crossing another one.
    #[error("unresolvable constraint ({p}) -> ({q}): {reason}")]
    UnresolvableConstraint { p: Point, q: Point, reason: String },

    /// The boundary is too small, or no interior triangle survived finalization.
    #[error("invalid boundary: {0}")]
    InvalidBoundary(String),

    /// An operation was called in the wrong lifecycle stage.
    #[error("precondition violated: {0}")]
    Precondition(String),

    /// A coordinate is NaN or infinite.
    #[error("invalid coordinate ({x}, {y})")]
    InvalidCoordinate { x: f64, y: f64 },
}

pub type P2tResult<T> = Result<T, P2tError>;
