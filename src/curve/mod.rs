// Copyright 2026 the Curvebender Authors
// SPDX-License-Identifier: Apache-2.0

//! Curve chains - the editable representation.
//!
//! A [`Curve`] is one cubic bezier segment with four control points. A
//! [`CurveChain`] owns an ordered sequence of curves joined at shared
//! anchors, plus the parallel list of [`Handle`]s that the overlay renders
//! as grabbable points. Adjacency between neighboring curves is derived
//! from position in the chain, never stored, so splits and merges cannot
//! leave stale links behind.

pub mod bezier;
pub mod chain;

pub use bezier::{ControlPointHit, Curve, CurveHit};
pub use chain::{CurveChain, Geometry, Handle, HandleObserver, PointRemoval};
