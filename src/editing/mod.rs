// Copyright 2026 the Curvebender Authors
// SPDX-License-Identifier: Apache-2.0

//! Pointer interaction: hit testing, coordinate mapping, and the session

pub mod hit_test;
pub mod pointer;
pub mod session;
pub mod viewport;

pub use hit_test::{DEFAULT_PIXEL_TOLERANCE, PointKind, TargetPoint};
pub use pointer::{Modifiers, PointerEvent, PointerEventKind};
pub use session::{DeleteCondition, EditSession, SessionConfig};
pub use viewport::{PixelTransform, ViewPort};
