// Copyright 2026 the Curvebender Authors
// SPDX-License-Identifier: Apache-2.0

//! Ordered curve sequences joined at shared anchors.
//!
//! A chain owns its curves and keeps two invariants:
//!
//! - adjacent curves share their boundary anchor by value
//!   (`curves[i].p3 == curves[i + 1].p0`), and
//! - the handle list stays parallel to the curve sequence, with exactly
//!   one handle per editable point (a shared joint is tagged on the
//!   earlier curve as its control point 3).
//!
//! Neighbor relationships are derived from position in the sequence
//! rather than stored, so structural edits never have links to repair.

use std::collections::HashMap;

use kurbo::{CubicBez, Point};

use super::bezier::Curve;
use crate::entity_id::EntityId;
use crate::error::EditError;

/// Input geometry offered for registration
///
/// Matched once when a chain is built; only line-like geometry converts,
/// everything else is reported as unsupported.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    /// An open polyline, editable as a bezier chain
    Line(Vec<Point>),
    /// A single point feature
    Point(Point),
    /// A closed ring of points
    Polygon(Vec<Point>),
}

impl Geometry {
    /// Short name used in logs and error messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            Geometry::Line(_) => "line",
            Geometry::Point(_) => "point",
            Geometry::Polygon(_) => "polygon",
        }
    }
}

/// An editable point marker: one per anchor and one per control handle
///
/// Handles are views; the position they refer to lives in the owning
/// curve's control point array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Handle {
    /// Stable identity, kept across edits that do not touch this point
    pub id: EntityId,
    /// The curve this handle points into
    pub curve: EntityId,
    /// Control point index within that curve (0..=3)
    pub index: usize,
}

/// Receiver for synchronous handle add/remove notifications
///
/// Invoked during structural edits (splits, merges, curve removal) so the
/// overlay can keep its visible point markers in sync with the chain.
pub trait HandleObserver {
    /// A handle came into existence
    fn handle_added(&mut self, handle: Handle);
    /// A handle ceased to exist
    fn handle_removed(&mut self, handle: Handle);
}

/// What deleting a point did to the chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointRemoval {
    /// An interior handle was snapped back onto its adjacent anchor; the
    /// curve keeps its identity but its extent changed
    HandleReset {
        /// The curve whose handle collapsed
        curve: EntityId,
    },
    /// An interior anchor was deleted and its two incident curves were
    /// merged into one
    AnchorMerged {
        /// The two curves that no longer exist
        removed: [EntityId; 2],
        /// The curve that replaced them
        merged: EntityId,
    },
    /// A chain-end anchor was deleted together with its curve
    EndCurveRemoved {
        /// The curve that no longer exists
        removed: EntityId,
    },
}

/// An ordered sequence of curves approximating one original line
#[derive(Debug, Clone)]
pub struct CurveChain {
    id: EntityId,
    curves: Vec<Curve>,
    handles: Vec<Handle>,
}

impl CurveChain {
    /// Build a chain from an open polyline
    ///
    /// One cubic per consecutive point pair, with the interior handles
    /// placed at 1/3 and 2/3 of the chord, so the initial chain renders
    /// the polyline exactly.
    pub fn from_line_geometry(points: &[Point]) -> Result<Self, EditError> {
        if points.len() < 2 {
            return Err(EditError::UnsupportedGeometry(
                "line with fewer than two points",
            ));
        }
        let curves = points
            .windows(2)
            .map(|pair| {
                let (a, b) = (pair[0], pair[1]);
                Curve::new(a, a.lerp(b, 1.0 / 3.0), a.lerp(b, 2.0 / 3.0), b)
            })
            .collect();
        Ok(Self::from_curve_vec(curves))
    }

    /// Build a chain from cubic segments that already share their anchors
    pub fn from_cubics(cubics: impl IntoIterator<Item = CubicBez>) -> Self {
        let curves: Vec<Curve> = cubics.into_iter().map(Curve::from_cubic).collect();
        assert!(!curves.is_empty(), "a curve chain needs at least one curve");
        for pair in curves.windows(2) {
            assert_eq!(
                pair[0].cubic().p3,
                pair[1].cubic().p0,
                "adjacent curves must share their boundary anchor"
            );
        }
        Self::from_curve_vec(curves)
    }

    fn from_curve_vec(curves: Vec<Curve>) -> Self {
        let mut chain = Self {
            id: EntityId::next(),
            curves,
            handles: Vec::new(),
        };
        chain.handles = chain.fresh_handles();
        chain
    }

    /// This chain's stable identity
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// The curves in order
    pub fn curves(&self) -> &[Curve] {
        &self.curves
    }

    /// The editable point markers, parallel to the curve sequence
    pub fn handles(&self) -> &[Handle] {
        &self.handles
    }

    /// Look up a curve by id
    pub fn curve(&self, id: EntityId) -> Option<&Curve> {
        self.position(id).map(|pos| &self.curves[pos])
    }

    /// The curve preceding `id` in the chain, if any
    pub fn predecessor(&self, id: EntityId) -> Option<&Curve> {
        let pos = self.position(id)?;
        pos.checked_sub(1).map(|prev| &self.curves[prev])
    }

    /// The curve following `id` in the chain, if any
    pub fn successor(&self, id: EntityId) -> Option<&Curve> {
        let pos = self.position(id)?;
        self.curves.get(pos + 1)
    }

    /// Split a curve at parameter `t`, replacing it with the two halves
    ///
    /// Fails with [`EditError::InvalidParameter`] unless `t` is strictly
    /// inside (0, 1). Handle changes are reported through `observer`;
    /// neighbor relationships need no fixup because they are derived from
    /// position. Returns the ids of the left and right halves.
    pub fn split_curve(
        &mut self,
        curve: EntityId,
        t: f64,
        observer: &mut dyn HandleObserver,
    ) -> Result<(EntityId, EntityId), EditError> {
        if !(t > 0.0 && t < 1.0) {
            return Err(EditError::InvalidParameter(t));
        }
        let pos = self.expect_position(curve);
        let (left, right) = self.curves[pos].split_at(t);
        let (left_id, right_id) = (left.id(), right.id());
        self.curves.splice(pos..=pos, [left, right]);
        self.refresh_handles(observer);
        tracing::debug!(
            chain = ?self.id,
            split = ?curve,
            left = ?left_id,
            right = ?right_id,
            "curve split"
        );
        Ok((left_id, right_id))
    }

    /// Move a control point while preserving the chain's invariants
    ///
    /// Interior handles (1, 2) move alone. Anchors (0, 3) carry the
    /// handles flanking them on both incident curves by the same delta,
    /// and the neighboring curve's shared anchor is updated by value, so
    /// the joint stays shared and its tangent directions are preserved.
    pub fn move_control_point(&mut self, curve: EntityId, index: usize, to: Point) {
        let pos = self.expect_position(curve);
        let delta = to - self.curves[pos].point(index);
        self.curves[pos].set_control_point(index, to);
        match index {
            0 => {
                let p1 = self.curves[pos].point(1);
                self.curves[pos].set_control_point(1, p1 + delta);
                if pos > 0 {
                    let prev = &mut self.curves[pos - 1];
                    prev.set_control_point(3, to);
                    let p2 = prev.point(2);
                    prev.set_control_point(2, p2 + delta);
                }
            }
            3 => {
                let p2 = self.curves[pos].point(2);
                self.curves[pos].set_control_point(2, p2 + delta);
                if pos + 1 < self.curves.len() {
                    let next = &mut self.curves[pos + 1];
                    next.set_control_point(0, to);
                    let p1 = next.point(1);
                    next.set_control_point(1, p1 + delta);
                }
            }
            1 | 2 => {}
            _ => panic!("control point index out of range: {index}"),
        }
    }

    /// Delete an editable point
    ///
    /// - an interior handle snaps back onto its adjacent anchor,
    /// - an interior anchor merges its two incident curves into one
    ///   (`(a.p0, a.p1, b.p2, b.p3)`), keeping the outer anchors and
    ///   tangents,
    /// - a chain-end anchor removes its whole curve.
    ///
    /// Returns `None` when the deletion is refused because the chain
    /// would lose its last curve. Handle changes are reported through
    /// `observer`.
    pub fn delete_point(
        &mut self,
        curve: EntityId,
        index: usize,
        observer: &mut dyn HandleObserver,
    ) -> Option<PointRemoval> {
        let pos = self.expect_position(curve);
        match index {
            1 => {
                let anchor = self.curves[pos].point(0);
                self.curves[pos].set_control_point(1, anchor);
                Some(PointRemoval::HandleReset { curve })
            }
            2 => {
                let anchor = self.curves[pos].point(3);
                self.curves[pos].set_control_point(2, anchor);
                Some(PointRemoval::HandleReset { curve })
            }
            0 | 3 => self.delete_anchor(pos, index, observer),
            _ => panic!("control point index out of range: {index}"),
        }
    }

    // ===== PRIVATE HELPERS =====

    /// Delete the anchor at (`pos`, `index`), merging or trimming curves
    fn delete_anchor(
        &mut self,
        pos: usize,
        index: usize,
        observer: &mut dyn HandleObserver,
    ) -> Option<PointRemoval> {
        // an interior anchor is the joint between `left` and `left + 1`
        let interior_left = match index {
            0 => pos.checked_sub(1),
            _ => (pos + 1 < self.curves.len()).then_some(pos),
        };
        let removal = match interior_left {
            Some(left) => {
                let a = self.curves[left];
                let b = self.curves[left + 1];
                let merged = Curve::new(a.point(0), a.point(1), b.point(2), b.point(3));
                let merged_id = merged.id();
                let removed = [a.id(), b.id()];
                self.curves.splice(left..=left + 1, [merged]);
                tracing::debug!(
                    chain = ?self.id,
                    removed = ?removed,
                    merged = ?merged_id,
                    "interior anchor deleted, incident curves merged"
                );
                PointRemoval::AnchorMerged {
                    removed,
                    merged: merged_id,
                }
            }
            None => {
                // a chain keeps at least one curve
                if self.curves.len() < 2 {
                    return None;
                }
                let removed = self.curves.remove(pos);
                tracing::debug!(
                    chain = ?self.id,
                    removed = ?removed.id(),
                    "end anchor deleted together with its curve"
                );
                PointRemoval::EndCurveRemoved {
                    removed: removed.id(),
                }
            }
        };
        self.refresh_handles(observer);
        Some(removal)
    }

    /// The position of a curve in the sequence, panicking on unknown ids
    ///
    /// An unknown id means the caller's bookkeeping has diverged from the
    /// chain, which must surface immediately.
    fn expect_position(&self, curve: EntityId) -> usize {
        self.position(curve).unwrap_or_else(|| {
            panic!("curve {curve:?} is not part of chain {:?}", self.id)
        })
    }

    fn position(&self, curve: EntityId) -> Option<usize> {
        self.curves.iter().position(|c| c.id() == curve)
    }

    /// Which handle indices a curve at `pos` contributes
    ///
    /// Every curve owns its points 1..=3; only the first curve also owns
    /// point 0, since every later point 0 is the previous curve's point 3.
    fn handle_indices(pos: usize) -> std::ops::RangeInclusive<usize> {
        (if pos == 0 { 0 } else { 1 })..=3
    }

    /// A brand-new handle list for the current curve sequence
    fn fresh_handles(&self) -> Vec<Handle> {
        let mut handles = Vec::new();
        for (pos, curve) in self.curves.iter().enumerate() {
            for index in Self::handle_indices(pos) {
                handles.push(Handle {
                    id: EntityId::next(),
                    curve: curve.id(),
                    index,
                });
            }
        }
        handles
    }

    /// Regenerate the handle list after a structural edit
    ///
    /// Handles for surviving (curve, index) pairs keep their ids; every
    /// other change is reported to the observer.
    fn refresh_handles(&mut self, observer: &mut dyn HandleObserver) {
        let mut old: HashMap<(EntityId, usize), Handle> = self
            .handles
            .drain(..)
            .map(|handle| ((handle.curve, handle.index), handle))
            .collect();
        let mut added = Vec::new();
        let mut next = Vec::new();
        for (pos, curve) in self.curves.iter().enumerate() {
            for index in Self::handle_indices(pos) {
                let handle = old.remove(&(curve.id(), index)).unwrap_or_else(|| {
                    let handle = Handle {
                        id: EntityId::next(),
                        curve: curve.id(),
                        index,
                    };
                    added.push(handle);
                    handle
                });
                next.push(handle);
            }
        }
        self.handles = next;
        for handle in old.into_values() {
            observer.handle_removed(handle);
        }
        for handle in added {
            observer.handle_added(handle);
        }
    }
}
