//! Column width normalization.
//!
//! Pure functions over a list of [`ColumnSpec`]s. Two passes:
//!
//! 1. Fill missing or invalid widths from whatever share of the row the
//!    declared widths leave over, clamped to the per-column minimum.
//! 2. If the resulting total is not exactly the row width, discard every
//!    width and redistribute evenly, sending the integer remainder to the
//!    middle column.
//!
//! Pass 1 honors author intent when the declared widths are internally
//! consistent; pass 2 is the safety net that makes the row-total invariant
//! unconditional. Authoring mistakes are repaired, never rejected.
//!
//! The constants live in [`NormalizerConfig`] and are injected per call, so
//! a host embedding rows at another scale can swap them without touching the
//! algorithm.

use taffy::prelude::FromPercent;
use tracing::{debug, warn};

use crate::types::ColumnSpec;

// =============================================================================
// Configuration
// =============================================================================

/// Width a full row occupies, in percent.
pub const ROW_WIDTH: f64 = 100.0;

/// Smallest width a single column may end up with, in percent.
pub const MINIMUM_COLUMN_WIDTH: f64 = 10.0;

/// Constants the normalizer works against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizerConfig {
    /// Exact total the column widths must sum to.
    pub row_width: f64,
    /// Lower bound for any single column width.
    pub min_column_width: f64,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            row_width: ROW_WIDTH,
            min_column_width: MINIMUM_COLUMN_WIDTH,
        }
    }
}

impl NormalizerConfig {
    /// Whether a declared width counts as valid.
    ///
    /// Anything else (absent, non-finite, below the minimum, above the row
    /// width) is treated as unset and filled by pass 1.
    pub fn accepts(&self, width: f64) -> bool {
        width.is_finite() && width >= self.min_column_width && width <= self.row_width
    }
}

// =============================================================================
// Normalization
// =============================================================================

/// Normalize column widths in place.
///
/// Afterwards every column has `Some(width)` within
/// `[min_column_width, row_width]` and the widths sum to exactly
/// `row_width`. Empty input is left untouched.
pub fn normalize_widths(columns: &mut [ColumnSpec], config: &NormalizerConfig) {
    if columns.is_empty() {
        return;
    }

    // Pass 1: fill missing or invalid widths from the remaining share.
    let mut declared = 0.0;
    let mut unset = 0usize;
    for column in columns.iter_mut() {
        match column.width {
            Some(width) if config.accepts(width) => declared += width,
            Some(_) | None => {
                column.width = None;
                unset += 1;
            }
        }
    }

    if unset > 0 {
        let share = (config.row_width - declared) / unset as f64;
        let fill = share.max(config.min_column_width);
        debug!(unset, fill, "filling undeclared column widths");
        for column in columns.iter_mut().filter(|c| c.width.is_none()) {
            column.width = Some(fill);
        }
    }

    // Pass 2: force the exact row total. Exact comparison on purpose: the
    // redistribution below owns any drift pass 1 leaves behind.
    let total: f64 = columns.iter().filter_map(|c| c.width).sum();
    if total != config.row_width {
        warn!(
            total,
            expected = config.row_width,
            "column widths inconsistent, redistributing evenly"
        );
        redistribute_evenly(columns, config);
    }
}

/// Give every column the same floor share and hand the integer remainder to
/// the middle column at `n / 2 - 1`.
///
/// A single column is the degenerate case and simply takes the whole row.
fn redistribute_evenly(columns: &mut [ColumnSpec], config: &NormalizerConfig) {
    let n = columns.len();
    if n == 1 {
        columns[0].width = Some(config.row_width);
        return;
    }

    let base = (config.row_width / n as f64).floor();
    let rest = config.row_width - base * n as f64;
    let middle = n / 2 - 1;
    for (index, column) in columns.iter_mut().enumerate() {
        let extra = if index == middle { rest } else { 0.0 };
        column.width = Some(base + extra);
    }
}

/// Typed flex-basis for a normalized width, for hosts laying columns out
/// with a flexbox engine.
pub fn flex_basis(width: f64) -> taffy::Dimension {
    taffy::Dimension::from_percent((width / ROW_WIDTH) as f32)
}

// =============================================================================
// Tests
// =============================================================================
