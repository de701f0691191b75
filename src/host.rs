//! Host collaborator traits.
//!
//! The container is host-agnostic: it never builds real UI nodes, children,
//! or display titles itself. Everything it needs from the outside world comes
//! through the small traits here, bundled into a [`Host`] handed to the row
//! at construction.

use std::rc::Rc;

use taffy::Dimension;

use crate::error::FactoryError;
use crate::instance::{ChildInstance, InstanceContext};
use crate::types::ContentDescriptor;

// =============================================================================
// Attachable nodes
// =============================================================================

/// An attachable node produced by the host.
///
/// The container relies on exactly two things: a node accepts children, and
/// a node accepts a flex-basis width. Box model, classes, paddings and every
/// other visual concern stay on the host side.
pub trait Node {
    /// Append another node underneath this one.
    fn append(&self, child: &NodeHandle);

    /// Apply the column's share of the row as a flex-basis.
    fn set_flex_basis(&self, basis: Dimension);

    /// Drop existing content before new content is appended. Hosts without
    /// retained children can ignore this.
    fn clear(&self) {}
}

/// Shared handle to a host node.
pub type NodeHandle = Rc<dyn Node>;

/// Creates host nodes on demand.
pub trait NodeFactory {
    fn create_node(&self) -> NodeHandle;
}

// =============================================================================
// Other collaborators
// =============================================================================

/// Turns a raw metadata title into the display form the host wants.
pub trait TitleFormatter {
    fn format(&self, raw: &str) -> String;
}

/// Builds a live child instance from a column's content descriptor.
pub trait InstanceFactory {
    /// `root_id` is the host content identifier the row was built under;
    /// `context` carries the parent back-reference and any restored state
    /// for this column.
    fn create(
        &self,
        content: &ContentDescriptor,
        root_id: &str,
        context: InstanceContext,
    ) -> Result<Rc<dyn ChildInstance>, FactoryError>;
}

/// Everything the row consumes from its host.
#[derive(Clone)]
pub struct Host {
    pub instances: Rc<dyn InstanceFactory>,
    pub nodes: Rc<dyn NodeFactory>,
    pub titles: Rc<dyn TitleFormatter>,
}
