// Copyright 2026 the Curvebender Authors
// SPDX-License-Identifier: Apache-2.0

//! Error types for chain construction and editing operations.

use thiserror::Error;

/// Errors reported by chain construction and editing operations.
///
/// Desynchronization between a chain and the spatial index is deliberately
/// not represented here: it is a caller bookkeeping bug, and the index
/// panics instead of returning an error so the divergence surfaces at the
/// point it happens.
#[derive(Debug, Error)]
pub enum EditError {
    /// A curve split was requested at a parameter outside the open interval
    #[error("split parameter {0} must lie strictly inside (0, 1)")]
    InvalidParameter(f64),

    /// A geometry kind that cannot be converted into an editable chain
    #[error("unsupported geometry kind: {0}")]
    UnsupportedGeometry(&'static str),
}
