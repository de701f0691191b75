//! Instance registry: the ordered child collection and its attachment slots.
//!
//! One slot per surviving column, in column order. A slot starts without a
//! node; the row realizes the placeholder on first attach and flips the slot
//! to attached exactly once. Slots are never removed while the row lives.

use std::rc::Rc;

use crate::events::EventEmitter;
use crate::host::NodeHandle;

use super::ChildInstance;

// =============================================================================
// Slot
// =============================================================================

/// Attachment record for one column.
pub struct InstanceSlot {
    instance_index: usize,
    node: Option<NodeHandle>,
    attached: bool,
}

impl InstanceSlot {
    fn new(instance_index: usize) -> Self {
        Self {
            instance_index,
            node: None,
            attached: false,
        }
    }

    /// Position of the instance this slot belongs to.
    pub fn instance_index(&self) -> usize {
        self.instance_index
    }

    /// The realized placeholder node, if any.
    pub fn node(&self) -> Option<&NodeHandle> {
        self.node.as_ref()
    }

    /// Whether the child has been attached into this slot.
    pub fn is_attached(&self) -> bool {
        self.attached
    }
}

// =============================================================================
// Registry
// =============================================================================

/// Ordered collection of child instances plus their slots.
#[derive(Default)]
pub struct InstanceRegistry {
    instances: Vec<Rc<dyn ChildInstance>>,
    slots: Vec<InstanceSlot>,
}

impl InstanceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a child, creating its slot. Returns the child's index.
    pub fn register(&mut self, instance: Rc<dyn ChildInstance>) -> usize {
        let index = self.instances.len();
        self.instances.push(instance);
        self.slots.push(InstanceSlot::new(index));
        index
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Ordered view of all registered children.
    pub fn instances(&self) -> &[Rc<dyn ChildInstance>] {
        &self.instances
    }

    pub fn instance(&self, index: usize) -> Option<&Rc<dyn ChildInstance>> {
        self.instances.get(index)
    }

    pub fn slot(&self, index: usize) -> Option<&InstanceSlot> {
        self.slots.get(index)
    }

    /// Indices of slots still waiting for attachment, in column order.
    pub fn pending(&self) -> Vec<usize> {
        self.slots
            .iter()
            .filter(|slot| !slot.attached)
            .map(|slot| slot.instance_index)
            .collect()
    }

    /// The realized node of a slot, if it has one.
    pub fn slot_node(&self, index: usize) -> Option<NodeHandle> {
        self.slots.get(index).and_then(|slot| slot.node.clone())
    }

    /// Record the placeholder node realized for a slot. A node already in
    /// place stays; realization happens once.
    pub fn realize_slot(&mut self, index: usize, node: NodeHandle) {
        if let Some(slot) = self.slots.get_mut(index) {
            if slot.node.is_none() {
                slot.node = Some(node);
            }
        }
    }

    /// Flip a slot to attached.
    pub fn mark_attached(&mut self, index: usize) {
        if let Some(slot) = self.slots.get_mut(index) {
            slot.attached = true;
        }
    }

    /// Event surfaces of all children, in column order.
    pub fn emitters(&self) -> Vec<Rc<EventEmitter>> {
        self.instances
            .iter()
            .map(|instance| Rc::clone(instance.emitter()))
            .collect()
    }
}

// =============================================================================
// Tests
// =============================================================================
