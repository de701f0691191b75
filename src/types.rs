//! Core data model for trellis-row.
//!
//! Everything here is plain data that crosses the host boundary: the authored
//! column configuration going in, and serialized per-child state coming back
//! out. All of it round-trips through JSON with serde; multi-word keys use
//! camelCase to match the documents hosts already produce.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;

// =============================================================================
// Opaque host payloads
// =============================================================================

/// Content descriptor for one column.
///
/// Opaque to the container; it is handed to the host factory untouched.
pub type ContentDescriptor = Value;

/// Serialized state of one child instance, opaque to the container.
pub type StateBlob = Value;

/// A reporting statement produced by a child instance, opaque to the
/// container.
pub type Statement = Value;

// =============================================================================
// Column configuration
// =============================================================================

/// Paddings authored on a column.
///
/// Carried as data only. The container applies no padding styling itself;
/// hosts that care read these back from [`ColumnSpec`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paddings {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
    /// CSS-like unit string, e.g. `"px"` or `"em"`.
    pub unit: String,
}

/// One authored column: an optional relative width (percent of the row),
/// optional paddings, and the opaque content descriptor for the child.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnSpec {
    /// Relative width in percent. Invalid or missing values are repaired by
    /// width normalization; after normalization every surviving column has a
    /// defined width and the row sums to exactly the configured total.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paddings: Option<Paddings>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<ContentDescriptor>,
}

impl ColumnSpec {
    /// Whether this column can become a child instance.
    ///
    /// Editors leave empty `{}` entries (and explicit nulls) behind; those
    /// carry nothing to instantiate and are dropped before normalization so
    /// they never consume a state slot.
    pub fn is_usable(&self) -> bool {
        matches!(&self.content, Some(content) if !content.is_null())
    }
}

/// The authored row: an ordered list of columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RowConfig {
    #[serde(default)]
    pub columns: Vec<ColumnSpec>,
}

impl RowConfig {
    /// Parse a configuration document from JSON.
    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}

// =============================================================================
// Restored / captured state
// =============================================================================

/// Serialized state for a whole row, one blob per surviving column.
///
/// Index `i` corresponds to the `i`-th surviving, normalized column. The
/// container resolves column survival and order before any state lookup so
/// this correspondence holds for both restore and capture.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PreviousState {
    #[serde(default)]
    pub instances: Vec<StateBlob>,
}

/// Optional host metadata attached to the row content.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Any further metadata the host carries; preserved on round-trip.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// User-specific data supplied at construction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_state: Option<PreviousState>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

// =============================================================================
// Tests
// =============================================================================
