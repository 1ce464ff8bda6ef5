// Copyright 2026 the Curvebender Authors
// SPDX-License-Identifier: Apache-2.0

//! Resolving a pointer location to the nearest editable point.
//!
//! The tolerance test runs in pixel space (what the user perceives), while
//! candidate ranking runs in world space, which is an adequate proxy for
//! ordering as long as the host transform is close to uniform.

use std::collections::HashMap;

use kurbo::{Point, Rect};

use crate::curve::{Curve, CurveChain};
use crate::editing::viewport::PixelTransform;
use crate::entity_id::EntityId;
use crate::spatial::{IndexEntry, SpatialIndex};

/// Default pixel tolerance for grabbing points and curves
pub const DEFAULT_PIXEL_TOLERANCE: f64 = 10.0;

/// Parameter distance from 0 or 1 under which an on-curve hit counts as
/// an anchor hit
const ANCHOR_PARAM_EPS: f64 = 1e-6;

/// What kind of editable point a target refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointKind {
    /// A curve endpoint (control point 0 or 3), shared with the
    /// neighboring curve in its chain
    Anchor { index: usize },
    /// An interior control handle (control point 1 or 2)
    Control { index: usize },
    /// A point on the curve body, away from both anchors
    Curve,
}

impl PointKind {
    /// Classify a control point index as anchor or handle
    pub fn for_index(index: usize) -> Self {
        match index {
            0 | 3 => PointKind::Anchor { index },
            1 | 2 => PointKind::Control { index },
            _ => panic!("control point index out of range: {index}"),
        }
    }

    /// The control point index this kind refers to, if any
    pub fn point_index(self) -> Option<usize> {
        match self {
            PointKind::Anchor { index } | PointKind::Control { index } => Some(index),
            PointKind::Curve => None,
        }
    }
}

/// The editable point a pointer location resolved to
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetPoint {
    /// The chain owning the hit curve
    pub chain: EntityId,
    /// The hit curve
    pub curve: EntityId,
    /// World position of the hit
    pub point: Point,
    /// Bezier parameter of the hit: 0 or 1 for anchors, fractional for a
    /// hit on the curve body; for control handles the nominal parameter
    /// of the anchor they flank
    pub param: f64,
    /// What was hit
    pub kind: PointKind,
}

/// Find the nearest editable point within `pixel_tolerance` of the pointer
///
/// Queries the spatial index with a world-space box covering the pixel
/// tolerance square, ranks the candidate curves by world-space distance,
/// and gates the winner with the exact pixel-space distance. An on-curve
/// hit yields to a control point that is also within tolerance: grabbing
/// a handle is the more specific action.
pub fn find_target(
    index: &SpatialIndex,
    chains: &HashMap<EntityId, CurveChain>,
    world: Point,
    pixel: Point,
    pixel_tolerance: f64,
    map: &dyn PixelTransform,
) -> Option<TargetPoint> {
    // the pixel tolerance square, mapped into world space
    let corner_a = map.to_world(Point::new(
        pixel.x - pixel_tolerance,
        pixel.y + pixel_tolerance,
    ));
    let corner_b = map.to_world(Point::new(
        pixel.x + pixel_tolerance,
        pixel.y - pixel_tolerance,
    ));
    let query = Rect::from_points(corner_a, corner_b);

    // rank candidates by world-space distance to the curve body
    let mut best: Option<(IndexEntry, crate::curve::CurveHit)> = None;
    for entry in index.query_extent(query) {
        let hit = resolve_curve(chains, &entry).closest_point(world);
        if best.as_ref().is_none_or(|(_, b)| hit.distance_sq < b.distance_sq) {
            best = Some((entry, hit));
        }
    }
    let (entry, hit) = best?;

    if pixel_distance(map, hit.point, world) > pixel_tolerance {
        return None;
    }

    let curve = resolve_curve(chains, &entry);
    match classify_param(hit.param) {
        PointKind::Curve => {
            // a control point inside tolerance outranks the curve body
            let control = curve.closest_control_point(world);
            if pixel_distance(map, control.point, world) <= pixel_tolerance {
                return Some(TargetPoint {
                    chain: entry.chain,
                    curve: entry.curve,
                    point: control.point,
                    param: nominal_param(control.index),
                    kind: PointKind::for_index(control.index),
                });
            }
            Some(TargetPoint {
                chain: entry.chain,
                curve: entry.curve,
                point: hit.point,
                param: hit.param,
                kind: PointKind::Curve,
            })
        }
        kind @ PointKind::Anchor { index } => Some(TargetPoint {
            chain: entry.chain,
            curve: entry.curve,
            point: curve.point(index),
            param: nominal_param(index),
            kind,
        }),
        PointKind::Control { .. } => unreachable!("classification never yields a handle"),
    }
}

/// The parameter a non-curve target nominally sits at: the start anchor
/// side for points 0 and 1, the end anchor side for points 2 and 3
pub(crate) fn nominal_param(index: usize) -> f64 {
    match index {
        0 | 1 => 0.0,
        2 | 3 => 1.0,
        _ => panic!("control point index out of range: {index}"),
    }
}

/// Distance between two world points as the user sees it, in pixels
fn pixel_distance(map: &dyn PixelTransform, a: Point, b: Point) -> f64 {
    map.to_pixel(a).distance(map.to_pixel(b))
}

/// An on-curve parameter at (or numerically against) an end is an anchor
fn classify_param(param: f64) -> PointKind {
    if param <= ANCHOR_PARAM_EPS {
        PointKind::Anchor { index: 0 }
    } else if param >= 1.0 - ANCHOR_PARAM_EPS {
        PointKind::Anchor { index: 3 }
    } else {
        PointKind::Curve
    }
}

/// Resolve an index entry to its curve, panicking when the entry refers
/// to state the session no longer has (index desynchronization)
fn resolve_curve<'a>(
    chains: &'a HashMap<EntityId, CurveChain>,
    entry: &IndexEntry,
) -> &'a Curve {
    chains
        .get(&entry.chain)
        .and_then(|chain| chain.curve(entry.curve))
        .unwrap_or_else(|| {
            panic!(
                "index entry for curve {:?} in chain {:?} does not resolve; \
                 chain and index bookkeeping have diverged",
                entry.curve, entry.chain
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::viewport::ViewPort;
    use kurbo::CubicBez;

    fn setup(cubics: impl IntoIterator<Item = CubicBez>) -> (SpatialIndex, HashMap<EntityId, CurveChain>) {
        let chain = CurveChain::from_cubics(cubics);
        let mut index = SpatialIndex::new();
        for curve in chain.curves() {
            index.insert(IndexEntry {
                chain: chain.id(),
                curve: curve.id(),
                extent: curve.extent(),
            });
        }
        let mut chains = HashMap::new();
        chains.insert(chain.id(), chain);
        (index, chains)
    }

    fn hill() -> CubicBez {
        CubicBez::new((0.0, 0.0), (1.0, 1.0), (2.0, 1.0), (3.0, 0.0))
    }

    fn find(
        index: &SpatialIndex,
        chains: &HashMap<EntityId, CurveChain>,
        world: Point,
        tolerance: f64,
    ) -> Option<TargetPoint> {
        // identity transform: pixel coordinates equal world coordinates
        find_target(index, chains, world, world, tolerance, &ViewPort::default())
    }

    #[test]
    fn a_pointer_over_the_curve_body_yields_an_on_curve_target() {
        let (index, chains) = setup([hill()]);
        let target = find(&index, &chains, Point::new(1.5, 0.9), 0.3).unwrap();

        assert_eq!(target.kind, PointKind::Curve);
        assert!((target.param - 0.5).abs() < 1e-3);
        assert!(target.point.distance(Point::new(1.5, 0.75)) < 1e-3);
    }

    #[test]
    fn a_control_point_within_tolerance_wins_over_the_curve_body() {
        let (index, chains) = setup([hill()]);
        let target = find(&index, &chains, Point::new(1.05, 0.95), 0.3).unwrap();

        assert_eq!(target.kind, PointKind::Control { index: 1 });
        assert_eq!(target.point, Point::new(1.0, 1.0));
        assert_eq!(target.param, 0.0);
    }

    #[test]
    fn a_pointer_near_an_endpoint_yields_an_anchor_target() {
        let (index, chains) = setup([hill()]);
        let target = find(&index, &chains, Point::new(0.05, -0.02), 0.3).unwrap();

        assert_eq!(target.kind, PointKind::Anchor { index: 0 });
        assert_eq!(target.point, Point::new(0.0, 0.0));
        assert_eq!(target.param, 0.0);
    }

    #[test]
    fn a_pointer_far_from_everything_yields_nothing() {
        let (index, chains) = setup([hill()]);
        assert!(find(&index, &chains, Point::new(50.0, 50.0), 0.3).is_none());
    }

    #[test]
    fn candidates_inside_the_query_box_still_fail_the_distance_gate() {
        let (index, chains) = setup([hill()]);
        // the tolerance box overlaps the extent, but no point of the curve
        // or its handles is within tolerance
        assert!(find(&index, &chains, Point::new(1.5, 1.2), 0.3).is_none());
    }

    #[test]
    fn the_nearest_of_several_curves_wins() {
        let (index, chains) = setup([
            CubicBez::new((0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0)),
            CubicBez::new((3.0, 0.0), (4.0, 0.0), (5.0, 0.0), (6.0, 0.0)),
        ]);
        let target = find(&index, &chains, Point::new(4.5, 0.1), 0.3).unwrap();

        let chain = chains.values().next().unwrap();
        assert_eq!(target.curve, chain.curves()[1].id());
        assert_eq!(target.kind, PointKind::Curve);
    }

    #[test]
    fn tolerance_scales_with_the_viewport_zoom() {
        let (index, chains) = setup([hill()]);
        let viewport = ViewPort::new(Point::ZERO, 100.0);
        let world = Point::new(1.5, 0.9);
        let pixel = viewport.to_pixel(world);

        // 30 pixels at 100x zoom is 0.3 world units: the body is inside,
        // the handles are not
        let target = find_target(&index, &chains, world, pixel, 30.0, &viewport).unwrap();
        assert_eq!(target.kind, PointKind::Curve);

        // 5 pixels is 0.05 world units: nothing is that close
        assert!(find_target(&index, &chains, world, pixel, 5.0, &viewport).is_none());
    }
}
