// Copyright 2026 the Curvebender Authors
// SPDX-License-Identifier: Apache-2.0

//! The rendering-side collaborator: hover markers and handle visuals.
//!
//! The editing core never draws anything itself. It reports what should be
//! visible through this trait: a single hover/drag marker that tracks the
//! current target, and one small visual per editable handle of every
//! registered chain. All calls happen synchronously from the session's
//! event handlers, so implementations should be cheap.

use kurbo::Point;

use crate::curve::Handle;

/// Opaque token for a marker created by the overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarkerId(pub u64);

/// Display surface for the hover marker and the per-point visuals
pub trait Overlay {
    /// Display a marker at a world position, returning a token for later
    /// moves and removal
    fn show_marker(&mut self, at: Point) -> MarkerId;

    /// Reposition an existing marker
    fn move_marker(&mut self, marker: MarkerId, to: Point);

    /// Remove a marker
    fn remove_marker(&mut self, marker: MarkerId);

    /// A chain gained an editable point
    fn add_handle_visual(&mut self, handle: Handle);

    /// A chain lost an editable point
    fn remove_handle_visual(&mut self, handle: Handle);
}
