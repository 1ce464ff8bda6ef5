// Copyright 2026 the Curvebender Authors
// SPDX-License-Identifier: Apache-2.0

//! The edit session: hover, drag, split-on-drag, and delete.
//!
//! One session owns the registered chains and the spatial index and is
//! driven by a stream of pointer events. At most one point is hovered or
//! dragged at a time; all work happens synchronously inside
//! [`EditSession::on_pointer_event`].

use std::collections::HashMap;
use std::fmt;

use kurbo::Point;

use crate::curve::{Curve, CurveChain, Geometry, Handle, HandleObserver, PointRemoval};
use crate::editing::hit_test::{self, PointKind, TargetPoint};
use crate::editing::pointer::{PointerEvent, PointerEventKind};
use crate::editing::viewport::PixelTransform;
use crate::entity_id::EntityId;
use crate::error::EditError;
use crate::overlay::{MarkerId, Overlay};
use crate::spatial::{IndexEntry, SpatialIndex};

/// Predicate deciding whether an event triggers the delete gesture
pub type DeleteCondition = Box<dyn Fn(&PointerEvent) -> bool>;

/// Session configuration
pub struct SessionConfig {
    /// Maximum pixel distance at which a point or curve is grabbable
    pub pixel_tolerance: f64,
    /// When this returns true for an event while a point is hovered, the
    /// point is deleted instead of dragged. Defaults to a single click
    /// with no modifier keys held.
    pub delete_condition: DeleteCondition,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            pixel_tolerance: hit_test::DEFAULT_PIXEL_TOLERANCE,
            delete_condition: Box::new(|event| {
                event.kind == PointerEventKind::Click && event.modifiers.is_empty()
            }),
        }
    }
}

impl fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionConfig")
            .field("pixel_tolerance", &self.pixel_tolerance)
            .finish_non_exhaustive()
    }
}

/// Interaction state: at most one point is hovered or dragged at a time
#[derive(Debug, Clone, Copy)]
enum SessionState {
    /// Nothing within tolerance of the pointer
    Idle,
    /// A point is under the pointer and marked
    Hovering {
        target: TargetPoint,
        marker: MarkerId,
    },
    /// The marked point follows the pointer
    Dragging {
        target: TargetPoint,
        marker: MarkerId,
        /// A drag splits its curve at most once, even if the split fails
        attempted_split: bool,
    },
}

/// The interactive editing session
///
/// Owns the registered chains and the spatial index over their curves.
/// The rendering overlay and the coordinate transform stay outside and
/// are passed into each call that needs them.
#[derive(Debug)]
pub struct EditSession {
    chains: HashMap<EntityId, CurveChain>,
    index: SpatialIndex,
    state: SessionState,
    config: SessionConfig,
    /// Last pointer sample (world, pixel), for re-evaluating hover when
    /// chains appear under a resting pointer
    last_pointer: Option<(Point, Point)>,
}

impl EditSession {
    /// Create a session with default configuration
    pub fn new() -> Self {
        Self::with_config(SessionConfig::default())
    }

    /// Create a session with the given configuration
    pub fn with_config(config: SessionConfig) -> Self {
        Self {
            chains: HashMap::new(),
            index: SpatialIndex::new(),
            state: SessionState::Idle,
            config,
            last_pointer: None,
        }
    }

    /// The registered chains, in no particular order
    pub fn chains(&self) -> impl Iterator<Item = &CurveChain> {
        self.chains.values()
    }

    /// Look up a registered chain
    pub fn chain(&self, id: EntityId) -> Option<&CurveChain> {
        self.chains.get(&id)
    }

    /// The spatial index over all registered curves
    pub fn spatial_index(&self) -> &SpatialIndex {
        &self.index
    }

    /// The currently hovered or dragged point, if any
    pub fn active_target(&self) -> Option<TargetPoint> {
        match self.state {
            SessionState::Hovering { target, .. } | SessionState::Dragging { target, .. } => {
                Some(target)
            }
            SessionState::Idle => None,
        }
    }

    /// Whether a drag gesture is in progress
    pub fn is_dragging(&self) -> bool {
        matches!(self.state, SessionState::Dragging { .. })
    }

    /// Convert input geometry into a chain and register it
    ///
    /// Only line geometry is supported; other kinds are skipped with an
    /// [`EditError::UnsupportedGeometry`] and the session is unchanged.
    pub fn register_geometry(
        &mut self,
        geometry: Geometry,
        map: &dyn PixelTransform,
        overlay: &mut dyn Overlay,
    ) -> Result<EntityId, EditError> {
        match geometry {
            Geometry::Line(points) => {
                let chain = CurveChain::from_line_geometry(&points)?;
                Ok(self.register_chain(chain, map, overlay))
            }
            other => {
                tracing::debug!(kind = other.kind_name(), "skipping unsupported geometry");
                Err(EditError::UnsupportedGeometry(other.kind_name()))
            }
        }
    }

    /// Register a chain: index its curves and show its handle visuals
    ///
    /// If the pointer is already resting over the new chain, the hover
    /// state picks it up immediately.
    pub fn register_chain(
        &mut self,
        chain: CurveChain,
        map: &dyn PixelTransform,
        overlay: &mut dyn Overlay,
    ) -> EntityId {
        let id = chain.id();
        for curve in chain.curves() {
            self.index.insert(IndexEntry {
                chain: id,
                curve: curve.id(),
                extent: curve.extent(),
            });
        }
        for handle in chain.handles() {
            overlay.add_handle_visual(*handle);
        }
        tracing::info!(chain = ?id, curves = chain.curves().len(), "registered curve chain");
        self.chains.insert(id, chain);

        if let Some((world, pixel)) = self.last_pointer
            && !self.is_dragging()
        {
            self.evaluate_hover(world, pixel, map, overlay);
        }
        id
    }

    /// Deregister a chain, dropping its index entries and handle visuals
    ///
    /// Returns the chain, or `None` when the id is not registered. Any
    /// hover or drag targeting the chain is abandoned.
    pub fn deregister_chain(
        &mut self,
        chain: EntityId,
        overlay: &mut dyn Overlay,
    ) -> Option<CurveChain> {
        let removed = self.chains.remove(&chain)?;
        for curve in removed.curves() {
            self.index.remove(curve.id());
        }
        for handle in removed.handles() {
            overlay.remove_handle_visual(*handle);
        }
        if self.active_target().is_some_and(|t| t.chain == chain) {
            self.clear_marker(overlay);
        }
        tracing::info!(chain = ?chain, "deregistered curve chain");
        Some(removed)
    }

    /// Feed one pointer event through the state machine
    ///
    /// Returns whether the session consumed the event; an unconsumed
    /// down event leaves the gesture free for other interactions.
    pub fn on_pointer_event(
        &mut self,
        event: &PointerEvent,
        map: &dyn PixelTransform,
        overlay: &mut dyn Overlay,
    ) -> bool {
        self.last_pointer = Some((event.world, event.pixel));

        // the delete gesture outranks everything while a point is hovered
        if matches!(self.state, SessionState::Hovering { .. })
            && (self.config.delete_condition)(event)
        {
            return self.delete_hovered(overlay);
        }

        match event.kind {
            PointerEventKind::Move => {
                if !self.is_dragging() {
                    self.evaluate_hover(event.world, event.pixel, map, overlay);
                }
                false
            }
            PointerEventKind::Down => self.begin_drag(),
            PointerEventKind::Drag => self.continue_drag(event.world, overlay),
            PointerEventKind::Up => self.finish_drag(),
            PointerEventKind::Click => false,
        }
    }

    // ===== STATE TRANSITIONS =====

    /// Re-run hit testing and sync the hover marker to the result
    fn evaluate_hover(
        &mut self,
        world: Point,
        pixel: Point,
        map: &dyn PixelTransform,
        overlay: &mut dyn Overlay,
    ) {
        let found = hit_test::find_target(
            &self.index,
            &self.chains,
            world,
            pixel,
            self.config.pixel_tolerance,
            map,
        );
        self.state = match (self.state, found) {
            (SessionState::Idle, Some(target)) => {
                let marker = overlay.show_marker(target.point);
                tracing::debug!(curve = ?target.curve, kind = ?target.kind, "hover acquired");
                SessionState::Hovering { target, marker }
            }
            (SessionState::Hovering { marker, .. }, Some(target)) => {
                overlay.move_marker(marker, target.point);
                SessionState::Hovering { target, marker }
            }
            (SessionState::Hovering { marker, .. }, None) => {
                overlay.remove_marker(marker);
                tracing::debug!("hover lost");
                SessionState::Idle
            }
            (state, _) => state,
        };
    }

    /// A down event promotes a hovered target to a drag target
    fn begin_drag(&mut self) -> bool {
        match self.state {
            SessionState::Hovering { target, marker } => {
                tracing::debug!(curve = ?target.curve, kind = ?target.kind, "drag started");
                self.state = SessionState::Dragging {
                    target,
                    marker,
                    attempted_split: false,
                };
                true
            }
            // nothing hovered: the gesture is not ours
            _ => false,
        }
    }

    /// Apply one drag step to the target
    fn continue_drag(&mut self, world: Point, overlay: &mut dyn Overlay) -> bool {
        let SessionState::Dragging {
            mut target,
            marker,
            mut attempted_split,
        } = self.state
        else {
            return false;
        };

        overlay.move_marker(marker, world);

        // a grab on the curve body splits the curve once, then continues
        // as an ordinary handle drag
        if matches!(target.kind, PointKind::Curve) && !attempted_split {
            attempted_split = true;
            match self.split_for_drag(&target, world, overlay) {
                Ok(retargeted) => target = retargeted,
                Err(err) => {
                    tracing::warn!(curve = ?target.curve, %err, "mid-drag split failed; curve left unmodified");
                }
            }
        }

        if let Some(index) = target.kind.point_index() {
            let chain = registered_chain_mut(&mut self.chains, target.chain);
            chain.move_control_point(target.curve, index, world);
            target.point = world;
        }

        self.state = SessionState::Dragging {
            target,
            marker,
            attempted_split,
        };
        true
    }

    /// Split the dragged curve at the hit parameter and re-target the
    /// drag onto the nearest interior handle of the first half
    fn split_for_drag(
        &mut self,
        target: &TargetPoint,
        world: Point,
        overlay: &mut dyn Overlay,
    ) -> Result<TargetPoint, EditError> {
        let chain = registered_chain_mut(&mut self.chains, target.chain);
        let mut visuals = HandleVisuals(&mut *overlay);
        let (left, right) = chain.split_curve(target.curve, target.param, &mut visuals)?;

        // swap the index entry of the split curve for its two halves
        self.index.remove(target.curve);
        for id in [left, right] {
            self.index.insert(IndexEntry {
                chain: target.chain,
                curve: id,
                extent: chain_curve(chain, id).extent(),
            });
        }

        // excluding the anchors keeps the fresh joint at the split point
        let control = chain_curve(chain, left).closest_interior_handle(world);
        Ok(TargetPoint {
            chain: target.chain,
            curve: left,
            point: control.point,
            param: hit_test::nominal_param(control.index),
            kind: PointKind::for_index(control.index),
        })
    }

    /// An up event commits the drag: refresh the dragged curve's extent,
    /// and the neighbor's when a shared anchor moved
    fn finish_drag(&mut self) -> bool {
        let SessionState::Dragging { target, marker, .. } = self.state else {
            return false;
        };

        let chain = registered_chain(&self.chains, target.chain);
        self.index
            .update(target.curve, chain_curve(chain, target.curve).extent());

        // moving a shared anchor reshapes the neighbor even though its
        // own points were never the drag target
        if let PointKind::Anchor { index } = target.kind {
            let neighbor = if index == 0 {
                chain.predecessor(target.curve)
            } else {
                chain.successor(target.curve)
            };
            if let Some(neighbor) = neighbor {
                self.index.update(neighbor.id(), neighbor.extent());
            }
        }

        tracing::debug!(curve = ?target.curve, "drag finished, extents refreshed");
        // the released point is exactly under the pointer, so it stays
        // hovered; the next move re-evaluates
        self.state = SessionState::Hovering { target, marker };
        true
    }

    /// Remove the hovered point per the chain's delete policy
    fn delete_hovered(&mut self, overlay: &mut dyn Overlay) -> bool {
        let SessionState::Hovering { target, marker } = self.state else {
            return false;
        };
        // the curve body itself is not deletable
        let Some(index) = target.kind.point_index() else {
            return false;
        };

        let chain = registered_chain_mut(&mut self.chains, target.chain);
        let removal = {
            let mut visuals = HandleVisuals(&mut *overlay);
            chain.delete_point(target.curve, index, &mut visuals)
        };
        let Some(removal) = removal else {
            tracing::debug!(curve = ?target.curve, "delete refused; chain keeps its last curve");
            return false;
        };

        match removal {
            PointRemoval::HandleReset { curve } => {
                let extent = chain_curve(chain, curve).extent();
                self.index.update(curve, extent);
            }
            PointRemoval::AnchorMerged { removed, merged } => {
                for curve in removed {
                    self.index.remove(curve);
                }
                let extent = chain_curve(chain, merged).extent();
                self.index.insert(IndexEntry {
                    chain: target.chain,
                    curve: merged,
                    extent,
                });
            }
            PointRemoval::EndCurveRemoved { removed } => {
                self.index.remove(removed);
            }
        }

        overlay.remove_marker(marker);
        self.state = SessionState::Idle;
        tracing::debug!(?removal, "deleted point");
        true
    }

    /// Drop any hover/drag marker and return to idle
    fn clear_marker(&mut self, overlay: &mut dyn Overlay) {
        match self.state {
            SessionState::Hovering { marker, .. } | SessionState::Dragging { marker, .. } => {
                overlay.remove_marker(marker);
            }
            SessionState::Idle => {}
        }
        self.state = SessionState::Idle;
    }
}

impl Default for EditSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Forwards chain handle notifications to the overlay's visuals
struct HandleVisuals<'a>(&'a mut dyn Overlay);

impl HandleObserver for HandleVisuals<'_> {
    fn handle_added(&mut self, handle: Handle) {
        self.0.add_handle_visual(handle);
    }

    fn handle_removed(&mut self, handle: Handle) {
        self.0.remove_handle_visual(handle);
    }
}

// Free lookup helpers so chain borrows stay disjoint from the index.
// Failures here are bookkeeping divergence and must surface immediately.

fn registered_chain(chains: &HashMap<EntityId, CurveChain>, id: EntityId) -> &CurveChain {
    chains.get(&id).unwrap_or_else(|| {
        panic!("no registered chain {id:?}; session state and chains have diverged")
    })
}

fn registered_chain_mut(
    chains: &mut HashMap<EntityId, CurveChain>,
    id: EntityId,
) -> &mut CurveChain {
    chains.get_mut(&id).unwrap_or_else(|| {
        panic!("no registered chain {id:?}; session state and chains have diverged")
    })
}

fn chain_curve(chain: &CurveChain, id: EntityId) -> &Curve {
    chain.curve(id).unwrap_or_else(|| {
        panic!("curve {id:?} missing from chain {:?}; bookkeeping has diverged", chain.id())
    })
}
