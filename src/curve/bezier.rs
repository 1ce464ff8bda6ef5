// Copyright 2026 the Curvebender Authors
// SPDX-License-Identifier: Apache-2.0

//! A single cubic bezier segment and its point-level geometry queries.

use kurbo::{CubicBez, ParamCurve, ParamCurveNearest, Point, Rect};

use crate::entity_id::EntityId;

/// Accuracy passed to the nearest-point solver. Far below a pixel at any
/// reasonable zoom, so hit classification is stable.
const NEAREST_ACCURACY: f64 = 1e-12;

/// The closest point on a curve body to a query point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveHit {
    /// Position on the curve
    pub point: Point,
    /// Bezier parameter of that position, clamped to [0, 1]
    pub param: f64,
    /// Squared distance from the query point
    pub distance_sq: f64,
}

/// The closest of a curve's control points to a query point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlPointHit {
    /// The control point's position
    pub point: Point,
    /// Which control point it is (0..=3)
    pub index: usize,
    /// Squared distance from the query point
    pub distance_sq: f64,
}

/// One cubic bezier segment of a chain
///
/// Control points 0 and 3 are the anchors (shared with the neighboring
/// curves in a chain); 1 and 2 are the interior handles. The id stays
/// stable across control-point mutation but a split produces two curves
/// with fresh ids.
#[derive(Debug, Clone, Copy)]
pub struct Curve {
    id: EntityId,
    bez: CubicBez,
}

impl Curve {
    /// Create a curve from its four control points
    pub fn new(p0: Point, p1: Point, p2: Point, p3: Point) -> Self {
        Self::from_cubic(CubicBez::new(p0, p1, p2, p3))
    }

    /// Create a curve from an existing cubic segment
    pub fn from_cubic(bez: CubicBez) -> Self {
        Self {
            id: EntityId::next(),
            bez,
        }
    }

    /// This curve's stable identity
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// The underlying cubic segment
    pub fn cubic(&self) -> CubicBez {
        self.bez
    }

    /// The four control points in order
    pub fn points(&self) -> [Point; 4] {
        [self.bez.p0, self.bez.p1, self.bez.p2, self.bez.p3]
    }

    /// A single control point by index (0..=3)
    pub fn point(&self, index: usize) -> Point {
        match index {
            0 => self.bez.p0,
            1 => self.bez.p1,
            2 => self.bez.p2,
            3 => self.bez.p3,
            _ => panic!("control point index out of range: {index}"),
        }
    }

    /// Axis-aligned bounding box of the four control points
    ///
    /// This is the control-polygon hull, which always encloses the curve
    /// itself. It is recomputed on every call; anything that caches it
    /// (the spatial index) must be refreshed after control points change.
    pub fn extent(&self) -> Rect {
        Rect::from_points(self.bez.p0, self.bez.p1)
            .union_pt(self.bez.p2)
            .union_pt(self.bez.p3)
    }

    /// Evaluate the curve at parameter `t` in [0, 1]
    pub fn point_at(&self, t: f64) -> Point {
        self.bez.eval(t)
    }

    /// The closest point on the curve body to `query`
    ///
    /// Deterministic for identical inputs; the parameter is clamped to
    /// [0, 1], so queries beyond an endpoint resolve to that anchor.
    pub fn closest_point(&self, query: Point) -> CurveHit {
        let nearest = self.bez.nearest(query, NEAREST_ACCURACY);
        CurveHit {
            point: self.bez.eval(nearest.t),
            param: nearest.t,
            distance_sq: nearest.distance_sq,
        }
    }

    /// The closest of the four control points to `query`
    ///
    /// Ties are broken toward the lowest index.
    pub fn closest_control_point(&self, query: Point) -> ControlPointHit {
        self.closest_among(query, &[0, 1, 2, 3])
    }

    /// The closest interior handle (control point 1 or 2) to `query`
    ///
    /// Used when a drag on the curve body is converted into a handle drag:
    /// excluding the anchors keeps a freshly created joint in place.
    pub fn closest_interior_handle(&self, query: Point) -> ControlPointHit {
        self.closest_among(query, &[1, 2])
    }

    /// Move a control point (0..=3) in place
    ///
    /// The caller is responsible for refreshing any spatial-index entry
    /// that recorded this curve's extent.
    pub fn set_control_point(&mut self, index: usize, point: Point) {
        match index {
            0 => self.bez.p0 = point,
            1 => self.bez.p1 = point,
            2 => self.bez.p2 = point,
            3 => self.bez.p3 = point,
            _ => panic!("control point index out of range: {index}"),
        }
    }

    /// Subdivide the curve at parameter `t`, strictly inside (0, 1)
    ///
    /// De Casteljau subdivision: the concatenation of the two halves
    /// reproduces this curve exactly, and both halves carry the identical
    /// joint point (`point_at(t)`). Parameter validation happens at the
    /// chain level; this method only debug-asserts the contract.
    pub fn split_at(&self, t: f64) -> (Curve, Curve) {
        debug_assert!(
            t > 0.0 && t < 1.0,
            "split parameter must be strictly inside (0, 1), got {t}"
        );
        let CubicBez { p0, p1, p2, p3 } = self.bez;
        let q0 = p0.lerp(p1, t);
        let q1 = p1.lerp(p2, t);
        let q2 = p2.lerp(p3, t);
        let r0 = q0.lerp(q1, t);
        let r1 = q1.lerp(q2, t);
        let joint = r0.lerp(r1, t);
        (
            Curve::new(p0, q0, r0, joint),
            Curve::new(joint, r1, q2, p3),
        )
    }

    fn closest_among(&self, query: Point, indices: &[usize]) -> ControlPointHit {
        let mut best: Option<ControlPointHit> = None;
        for &index in indices {
            let point = self.point(index);
            let distance_sq = point.distance_squared(query);
            // strict comparison keeps the lowest index on ties
            if best.is_none_or(|b| distance_sq < b.distance_sq) {
                best = Some(ControlPointHit {
                    point,
                    index,
                    distance_sq,
                });
            }
        }
        best.expect("closest_among called with no candidate indices")
    }
}
