// Copyright 2026 the Curvebender Authors
// SPDX-License-Identifier: Apache-2.0

//! Pointer events as delivered by the host framework.
//!
//! The core does not listen to any input device itself; the host feeds it
//! a stream of classified events, each carrying both the world and the
//! pixel coordinate of the pointer.

use kurbo::Point;

/// Host-side classification of a pointer event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEventKind {
    /// The pointer moved without a button held
    Move,
    /// A button was pressed
    Down,
    /// The pointer moved with a button held
    Drag,
    /// The button was released
    Up,
    /// A single click: down and up without a drag in between, as
    /// classified by the host framework
    Click,
}

/// Modifier keys held during an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    /// No modifier keys held
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    /// Whether no modifier key is held
    pub fn is_empty(self) -> bool {
        !(self.shift || self.ctrl || self.alt || self.meta)
    }
}

/// One pointer event
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerEventKind,
    /// Pointer position in world coordinates
    pub world: Point,
    /// Pointer position in pixel coordinates
    pub pixel: Point,
    /// Modifier keys held
    pub modifiers: Modifiers,
}

impl PointerEvent {
    /// Create an event with no modifiers held
    pub fn new(kind: PointerEventKind, world: Point, pixel: Point) -> Self {
        Self {
            kind,
            world,
            pixel,
            modifiers: Modifiers::NONE,
        }
    }

    /// Attach modifier state
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}
