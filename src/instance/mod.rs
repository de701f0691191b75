//! Child instance contract and capability set.
//!
//! Children are polymorphic over an enumerated set of optional capabilities.
//! A child advertises a capability by returning `Some(self)` from the
//! matching `as_*` accessor; the aggregate contracts on the row query those
//! accessors and treat `None` as a neutral contributor. No runtime
//! introspection, no stringly method lookups.

use std::rc::{Rc, Weak};

use crate::events::EventEmitter;
use crate::host::NodeHandle;
use crate::row::Row;
use crate::types::{StateBlob, Statement};

mod registry;

pub use registry::{InstanceRegistry, InstanceSlot};

// =============================================================================
// Capability set
// =============================================================================

bitflags::bitflags! {
    /// Capability flags a child can advertise.
    ///
    /// Derived from the `as_*` accessors; useful to hosts deciding which
    /// controls to render for a row.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Capabilities: u8 {
        const NONE = 0;
        const ANSWERABLE = 1 << 0;
        const SCORABLE = 1 << 1;
        const SOLUTION_REVEALABLE = 1 << 2;
        const RESETTABLE = 1 << 3;
        const STATE_CAPTURABLE = 1 << 4;
        const STATEMENT_PRODUCING = 1 << 5;
    }
}

// =============================================================================
// Capability traits
// =============================================================================

/// Reports whether the user has given an answer.
pub trait Answerable {
    fn answer_given(&self) -> bool;
}

/// Reports achieved and achievable score.
pub trait Scorable {
    fn score(&self) -> i32;
    fn max_score(&self) -> i32;
}

/// Can reveal its solutions.
pub trait SolutionRevealable {
    fn show_solutions(&self);

    /// Enable or disable solution narration. The container disables this
    /// around a reveal so the reveal itself is not read aloud. Children
    /// without narration ignore it.
    fn set_read_speaker(&self, _enabled: bool) {}
}

/// Can return to its pristine state.
pub trait Resettable {
    fn reset_task(&self);
}

/// Can capture its state for later restoration.
pub trait StateCapturable {
    fn current_state(&self) -> StateBlob;
}

/// Produces reporting statements describing user interaction.
pub trait StatementProducing {
    fn xapi_statements(&self) -> Vec<Statement>;
}

// =============================================================================
// Child instance
// =============================================================================

/// A live child widget occupying one column.
///
/// Implementations come from the host factory. The two required methods are
/// the event surface and attachment; every capability is opt-in through its
/// accessor.
pub trait ChildInstance {
    /// The child's event surface. The row wires resize bubbling against it.
    fn emitter(&self) -> &Rc<EventEmitter>;

    /// Attach the child's UI into its slot node.
    fn attach(&self, target: &NodeHandle);

    fn as_answerable(&self) -> Option<&dyn Answerable> {
        None
    }

    fn as_scorable(&self) -> Option<&dyn Scorable> {
        None
    }

    fn as_solution_revealable(&self) -> Option<&dyn SolutionRevealable> {
        None
    }

    fn as_resettable(&self) -> Option<&dyn Resettable> {
        None
    }

    fn as_state_capturable(&self) -> Option<&dyn StateCapturable> {
        None
    }

    fn as_statement_producing(&self) -> Option<&dyn StatementProducing> {
        None
    }

    /// Advertised capability set, derived from the accessors.
    fn capabilities(&self) -> Capabilities {
        let mut caps = Capabilities::NONE;
        if self.as_answerable().is_some() {
            caps |= Capabilities::ANSWERABLE;
        }
        if self.as_scorable().is_some() {
            caps |= Capabilities::SCORABLE;
        }
        if self.as_solution_revealable().is_some() {
            caps |= Capabilities::SOLUTION_REVEALABLE;
        }
        if self.as_resettable().is_some() {
            caps |= Capabilities::RESETTABLE;
        }
        if self.as_state_capturable().is_some() {
            caps |= Capabilities::STATE_CAPTURABLE;
        }
        if self.as_statement_producing().is_some() {
            caps |= Capabilities::STATEMENT_PRODUCING;
        }
        caps
    }
}

// =============================================================================
// Factory context
// =============================================================================

/// Per-column data handed to the host factory alongside the content
/// descriptor.
#[derive(Clone)]
pub struct InstanceContext {
    /// Back-reference to the owning row. Weak on purpose: children must not
    /// keep their container alive.
    pub parent: Weak<Row>,

    /// Restored state for this column, when the row was constructed with
    /// previous state and the slot holds a non-null blob.
    pub previous_state: Option<StateBlob>,
}

// =============================================================================
// Tests
// =============================================================================
