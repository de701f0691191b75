//! Directional event relay with reflection suppression.
//!
//! `bubble_up` re-emits a child event on a parent; `bubble_down` relays a
//! parent event to every child. Wired together naively those two form a
//! cycle: child emits, parent re-emits, relay hands it straight back to the
//! children. The [`BubbleGuard`] breaks that cycle with a single bit, raised
//! only for the duration of an upward re-emission. A downward relay that
//! observes the raised guard skips its targets for that one emission.
//!
//! The guard is a token owned by whoever wires the relays. It is passed into
//! both directions explicitly instead of living on an emitter, so unrelated
//! listeners never couple through a shared mutable field.

use std::cell::Cell;
use std::rc::Rc;

use super::emitter::{EventEmitter, ListenerId};

// =============================================================================
// Guard
// =============================================================================

/// One-bit reentrancy token shared by a pair of relay directions.
///
/// Clones share the same bit.
#[derive(Clone, Debug, Default)]
pub struct BubbleGuard {
    upwards: Rc<Cell<bool>>,
}

impl BubbleGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether an upward re-emission is on the call stack right now.
    pub fn is_bubbling_upwards(&self) -> bool {
        self.upwards.get()
    }

    /// Raise the guard for the lifetime of the returned scope.
    ///
    /// The previous value is restored on drop, so nested raises unwind
    /// correctly.
    fn raise(&self) -> RaisedGuard {
        let previous = self.upwards.replace(true);
        RaisedGuard {
            upwards: Rc::clone(&self.upwards),
            previous,
        }
    }
}

/// RAII scope holding the guard raised.
struct RaisedGuard {
    upwards: Rc<Cell<bool>>,
    previous: bool,
}

impl Drop for RaisedGuard {
    fn drop(&mut self) {
        self.upwards.set(self.previous);
    }
}

// =============================================================================
// Wiring
// =============================================================================

/// Relay `event` from `origin` to `target`, flagging the re-emission as an
/// upward bubble for the guard's lifetime.
pub fn bubble_up(
    origin: &EventEmitter,
    event: &str,
    target: Rc<EventEmitter>,
    guard: BubbleGuard,
) -> ListenerId {
    let name = event.to_string();
    origin.on(event, move |incoming| {
        let _raised = guard.raise();
        target.trigger(&name, incoming.data.clone());
    })
}

/// Relay `event` from `origin` to every target, unless the emission is an
/// upward bubble arriving through the same guard.
pub fn bubble_down(
    origin: &EventEmitter,
    event: &str,
    targets: &[Rc<EventEmitter>],
    guard: BubbleGuard,
) -> ListenerId {
    let name = event.to_string();
    let targets: Vec<Rc<EventEmitter>> = targets.to_vec();
    origin.on(event, move |incoming| {
        if guard.is_bubbling_upwards() {
            return;
        }
        for target in &targets {
            target.trigger(&name, incoming.data.clone());
        }
    })
}

// =============================================================================
// Tests
// =============================================================================
