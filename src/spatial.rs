// Copyright 2026 the Curvebender Authors
// SPDX-License-Identifier: Apache-2.0

//! Bounding-box index over curve extents for fast pointer queries.
//!
//! A k-d tree indexes the center point of every entry's extent. Rectangle
//! queries run a bounding-circle pre-filter (query circumradius plus the
//! largest live entry circumradius) against the tree, then apply the
//! exact rectangle intersection test to the survivors. That keeps the
//! hot-path query sublinear while staying exact.

use std::collections::HashMap;

use kiddo::{KdTree, SquaredEuclidean};
use kurbo::Rect;

use crate::entity_id::EntityId;

/// The unit stored in the spatial index: one entry per curve of every
/// registered chain
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexEntry {
    /// The chain owning the curve
    pub chain: EntityId,
    /// The indexed curve
    pub curve: EntityId,
    /// The curve's extent at the time it was (re)inserted
    pub extent: Rect,
}

/// Spatial index over curve extents, keyed by curve id
///
/// `remove` and `update` on a curve without an entry panic: that state
/// means chain and index bookkeeping have diverged, and a silent no-op
/// would turn the divergence into missed hit-tests much later.
#[derive(Debug, Clone)]
pub struct SpatialIndex {
    tree: KdTree<f64, 2>,
    entries: HashMap<EntityId, IndexEntry>,
    /// Largest circumradius among live extents, inflating query circles
    max_half_diag: f64,
}

impl SpatialIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self {
            tree: KdTree::new(),
            entries: HashMap::new(),
            max_half_diag: 0.0,
        }
    }

    /// Number of indexed curves
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Add an entry for a curve not currently indexed
    pub fn insert(&mut self, entry: IndexEntry) {
        debug_assert!(
            !self.entries.contains_key(&entry.curve),
            "duplicate index entry for curve {:?}",
            entry.curve
        );
        self.tree.add(&Self::center(entry.extent), entry.curve.raw());
        self.max_half_diag = self.max_half_diag.max(Self::half_diag(entry.extent));
        self.entries.insert(entry.curve, entry);
    }

    /// Remove the entry for `curve`, returning it
    ///
    /// Panics when no entry exists.
    pub fn remove(&mut self, curve: EntityId) -> IndexEntry {
        let Some(entry) = self.entries.remove(&curve) else {
            panic!(
                "spatial index has no entry for curve {curve:?}; \
                 chain and index bookkeeping have diverged"
            );
        };
        self.tree.remove(&Self::center(entry.extent), curve.raw());
        // the inflation radius may have shrunk with this extent gone
        if Self::half_diag(entry.extent) >= self.max_half_diag {
            self.max_half_diag = self
                .entries
                .values()
                .map(|e| Self::half_diag(e.extent))
                .fold(0.0, f64::max);
        }
        entry
    }

    /// Re-register `curve` at a new extent (remove plus reinsert)
    ///
    /// Required whenever a curve's control points have changed. Panics
    /// when no entry exists.
    pub fn update(&mut self, curve: EntityId, extent: Rect) {
        let entry = self.remove(curve);
        self.insert(IndexEntry { extent, ..entry });
    }

    /// All entries whose extent intersects `extent`, in no particular order
    pub fn query_extent(&self, extent: Rect) -> Vec<IndexEntry> {
        if self.entries.is_empty() {
            return Vec::new();
        }
        let center = extent.center();
        // conservative: any intersecting extent has its center within this
        // radius of the query center
        let radius = Self::half_diag(extent) + self.max_half_diag + 1e-9;
        self.tree
            .within::<SquaredEuclidean>(&[center.x, center.y], radius * radius)
            .into_iter()
            .filter_map(|hit| {
                let entry = self.entry_for(EntityId::from_raw(hit.item));
                entry.extent.overlaps(extent).then_some(entry)
            })
            .collect()
    }

    /// Every entry, for the rare scan that has no extent to query with
    pub fn query_all(&self) -> impl Iterator<Item = IndexEntry> + '_ {
        self.entries.values().copied()
    }

    // ===== PRIVATE HELPERS =====

    fn entry_for(&self, curve: EntityId) -> IndexEntry {
        *self.entries.get(&curve).unwrap_or_else(|| {
            panic!(
                "index tree refers to curve {curve:?} with no entry; \
                 chain and index bookkeeping have diverged"
            )
        })
    }

    fn center(extent: Rect) -> [f64; 2] {
        let center = extent.center();
        [center.x, center.y]
    }

    fn half_diag(extent: Rect) -> f64 {
        extent.width().hypot(extent.height()) * 0.5
    }
}

impl Default for SpatialIndex {
    fn default() -> Self {
        Self::new()
    }
}
