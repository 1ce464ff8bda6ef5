// Copyright 2026 the Curvebender Authors
// SPDX-License-Identifier: Apache-2.0

//! Curvebender: the geometric core of an interactive bezier curve editor.
//!
//! A host application registers curve chains (built from polylines or from
//! prebuilt cubic segments) with an [`EditSession`] and feeds it pointer
//! events. The session hit-tests the pointer against a spatial index over
//! curve extents, shows a hover marker through the [`Overlay`] collaborator,
//! and on drag mutates the targeted point - splitting a curve in place when
//! the grab was on the curve body rather than on an existing point.
//!
//! Rendering, the canvas transform, and pointer-event dispatch stay outside
//! the crate: the overlay and the [`PixelTransform`] are traits the host
//! implements, and events arrive pre-classified as [`PointerEvent`]s.

pub mod curve;
pub mod editing;
pub mod error;
pub mod overlay;
pub mod spatial;

mod entity_id;

pub use curve::{
    ControlPointHit, Curve, CurveChain, CurveHit, Geometry, Handle, HandleObserver, PointRemoval,
};
pub use editing::{
    DEFAULT_PIXEL_TOLERANCE, DeleteCondition, EditSession, Modifiers, PixelTransform, PointKind,
    PointerEvent, PointerEventKind, SessionConfig, TargetPoint, ViewPort,
};
pub use entity_id::EntityId;
pub use error::EditError;
pub use overlay::{MarkerId, Overlay};
pub use spatial::{IndexEntry, SpatialIndex};
