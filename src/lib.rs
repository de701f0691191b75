//! # trellis-row
//!
//! Composite row layout container for independently-created child widgets.
//!
//! A [`Row`] takes an authored list of columns, repairs their relative widths
//! (exact 100 percent total, per-column minimum), creates one child instance
//! per column through a host-supplied factory, and fans the cross-cutting
//! contracts (answers, scoring, solutions, reset, serialized state,
//! reporting statements) out across the children. A resize signal raised in
//! any child bubbles up to the row and never reflects back down; a resize
//! raised on the row itself relays to every child.
//!
//! ## Architecture
//!
//! ```text
//! RowConfig → filter + normalize → factory per column → InstanceRegistry
//!                                        │
//!                    bubble-up (child → row) × n, bubble-down (row → children)
//!                                        │
//!                 attach(container): wrapper + flex-basis slots, once
//! ```
//!
//! The container is host-agnostic: nodes, children and titles come in through
//! the traits in [`host`]. Everything runs on one thread with synchronous
//! dispatch; re-entrant resize relay is bounded by a one-bit guard owned by
//! each row.
//!
//! ## Modules
//!
//! - [`types`] - Column/config/state data model (serde round-trip)
//! - [`layout`] - Width normalization and flex-basis conversion
//! - [`events`] - Publish/subscribe primitive and directional bubbling
//! - [`instance`] - Child contract, capability set, registry
//! - [`host`] - Traits the embedding host implements
//! - [`row`] - The container itself

pub mod error;
pub mod events;
pub mod host;
pub mod instance;
pub mod layout;
pub mod row;
pub mod types;

// Re-export commonly used items
pub use error::{Error, FactoryError, Result};

pub use events::{bubble_down, bubble_up, BubbleGuard, Event, EventEmitter, ListenerId, RESIZE};

pub use host::{Host, InstanceFactory, Node, NodeFactory, NodeHandle, TitleFormatter};

pub use instance::{
    Answerable, Capabilities, ChildInstance, InstanceContext, InstanceRegistry, InstanceSlot,
    Resettable, Scorable, SolutionRevealable, StateCapturable, StatementProducing,
};

pub use layout::{
    flex_basis, normalize_widths, NormalizerConfig, MINIMUM_COLUMN_WIDTH, ROW_WIDTH,
};

pub use row::Row;

pub use types::{
    ColumnSpec, ContentDescriptor, Metadata, Paddings, PreviousState, RowConfig, RowData,
    StateBlob, Statement,
};
