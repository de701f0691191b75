//! The row container.
//!
//! A `Row` arranges independently-created child widgets side by side. On
//! construction it drops unusable columns, normalizes the surviving widths,
//! creates every child through the host factory and wires resize bubbling in
//! both directions. Node materialization is lazy: placeholders appear on the
//! first [`Row::attach`] and children are attached into them exactly once,
//! while later attach calls only re-home the wrapper into a new container.
//!
//! Aggregate contracts fan out over the children in column order. A child
//! that lacks a capability contributes neutrally; nothing here ever fails
//! because a child is simpler than its siblings.
//!
//! # Example
//!
//! ```ignore
//! use trellis_row::{Row, RowConfig, RowData, Host};
//!
//! let config = RowConfig::from_json(raw_json)?;
//! let row = Row::new(config, "content-42", None, host)?;
//! row.attach(&container);
//! let total = row.score();
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::Value;
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::events::{bubble_down, bubble_up, BubbleGuard, EventEmitter, ListenerId, RESIZE};
use crate::host::{Host, NodeHandle};
use crate::instance::{Capabilities, ChildInstance, InstanceContext, InstanceRegistry};
use crate::layout::{flex_basis, normalize_widths, NormalizerConfig};
use crate::types::{ColumnSpec, Metadata, PreviousState, RowConfig, RowData, StateBlob, Statement};

// =============================================================================
// Row
// =============================================================================

/// Composite container laying out a row of child widgets.
pub struct Row {
    root_id: String,
    columns: Vec<ColumnSpec>,
    metadata: Option<Metadata>,
    host: Host,
    emitter: Rc<EventEmitter>,
    guard: BubbleGuard,
    registry: RefCell<InstanceRegistry>,
    state: RefCell<Vec<StateBlob>>,
    wrapper: RefCell<Option<NodeHandle>>,
}

impl std::fmt::Debug for Row {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Row")
            .field("root_id", &self.root_id)
            .field("columns", &self.columns.len())
            .finish_non_exhaustive()
    }
}

impl Row {
    /// Build a row: filter and normalize columns, seed restored state, create
    /// every child through the host factory, wire resize bubbling.
    ///
    /// Children are created here, eagerly; only their UI attachment waits for
    /// [`Row::attach`]. Fails only if the host factory fails.
    pub fn new(
        config: RowConfig,
        root_id: impl Into<String>,
        data: Option<RowData>,
        host: Host,
    ) -> Result<Rc<Self>> {
        let data = data.unwrap_or_default();

        // Survival and order are settled before any state lookup, so the
        // positional previous-state correspondence holds.
        let mut columns: Vec<ColumnSpec> = config
            .columns
            .into_iter()
            .filter(ColumnSpec::is_usable)
            .collect();
        normalize_widths(&mut columns, &NormalizerConfig::default());

        let mut state = data
            .previous_state
            .map(|previous| previous.instances)
            .unwrap_or_default();
        state.resize(columns.len(), Value::Null);

        let row = Rc::new(Self {
            root_id: root_id.into(),
            columns,
            metadata: data.metadata,
            host,
            emitter: Rc::new(EventEmitter::new()),
            guard: BubbleGuard::new(),
            registry: RefCell::new(InstanceRegistry::new()),
            state: RefCell::new(state),
            wrapper: RefCell::new(None),
        });

        for index in 0..row.columns.len() {
            let Some(content) = row.columns[index].content.as_ref() else {
                continue;
            };
            let restored = {
                let state = row.state.borrow();
                match &state[index] {
                    Value::Null => None,
                    blob => Some(blob.clone()),
                }
            };
            let context = InstanceContext {
                parent: Rc::downgrade(&row),
                previous_state: restored,
            };
            let instance = row
                .host
                .instances
                .create(content, &row.root_id, context)
                .map_err(|source| Error::Instance { index, source })?;

            bubble_up(
                instance.emitter(),
                RESIZE,
                Rc::clone(&row.emitter),
                row.guard.clone(),
            );
            row.registry.borrow_mut().register(instance);
        }

        let emitters = row.registry.borrow().emitters();
        bubble_down(&row.emitter, RESIZE, &emitters, row.guard.clone());

        debug!(
            root_id = %row.root_id,
            columns = row.columns.len(),
            "row constructed"
        );
        Ok(row)
    }

    // =========================================================================
    // Attachment
    // =========================================================================

    /// Attach the row into a host container.
    ///
    /// Safe to call repeatedly. The first call realizes the wrapper and one
    /// placeholder node per column (flex-basis only, everything else is the
    /// host's business) and attaches every child into its slot. Later calls
    /// re-home the wrapper into the new container and pick up any slot that
    /// is still pending; attached slots are skipped, children are never
    /// re-created.
    pub fn attach(&self, container: &NodeHandle) {
        let wrapper = {
            let mut wrapper = self.wrapper.borrow_mut();
            match wrapper.as_ref() {
                Some(existing) => Rc::clone(existing),
                None => {
                    let created = self.host.nodes.create_node();
                    *wrapper = Some(Rc::clone(&created));
                    created
                }
            }
        };

        container.clear();
        container.append(&wrapper);

        // Realize pending slots under the registry borrow, then attach the
        // children outside it: a child is free to call back into the row
        // while attaching.
        let pending: Vec<(Rc<dyn ChildInstance>, NodeHandle)> = {
            let mut registry = self.registry.borrow_mut();
            let mut work = Vec::new();
            for index in registry.pending() {
                let node = match registry.slot_node(index) {
                    Some(node) => node,
                    None => {
                        let node = self.host.nodes.create_node();
                        if let Some(width) = self.columns.get(index).and_then(|c| c.width) {
                            node.set_flex_basis(flex_basis(width));
                        }
                        wrapper.append(&node);
                        registry.realize_slot(index, Rc::clone(&node));
                        node
                    }
                };
                if let Some(instance) = registry.instance(index) {
                    work.push((Rc::clone(instance), node));
                }
                registry.mark_attached(index);
            }
            work
        };

        trace!(attached = pending.len(), "row attach");
        for (instance, node) in pending {
            instance.attach(&node);
        }
    }

    // =========================================================================
    // Aggregate contracts
    // =========================================================================

    /// Whether every answer-capable child has an answer. The identity is
    /// `true`: children without the capability never veto, and an empty row
    /// answers `true`.
    pub fn answer_given(&self) -> bool {
        self.registry
            .borrow()
            .instances()
            .iter()
            .filter_map(|instance| instance.as_answerable())
            .all(|answerable| answerable.answer_given())
    }

    /// Sum of achieved scores across score-capable children.
    pub fn score(&self) -> i32 {
        self.registry
            .borrow()
            .instances()
            .iter()
            .filter_map(|instance| instance.as_scorable())
            .map(|scorable| scorable.score())
            .sum()
    }

    /// Sum of achievable scores across score-capable children.
    pub fn max_score(&self) -> i32 {
        self.registry
            .borrow()
            .instances()
            .iter()
            .filter_map(|instance| instance.as_scorable())
            .map(|scorable| scorable.max_score())
            .sum()
    }

    /// Reveal solutions on every capable child, with narration suppressed
    /// for the duration of each reveal.
    pub fn show_solutions(&self) {
        for instance in self.registry.borrow().instances() {
            if let Some(revealable) = instance.as_solution_revealable() {
                revealable.set_read_speaker(false);
                revealable.show_solutions();
                revealable.set_read_speaker(true);
            }
        }
    }

    /// Reset every capable child. Idempotency is each child's business.
    pub fn reset_task(&self) {
        for instance in self.registry.borrow().instances() {
            if let Some(resettable) = instance.as_resettable() {
                resettable.reset_task();
            }
        }
    }

    /// Capture serialized state for the whole row.
    ///
    /// Capture-capable children overwrite their positional slot; everyone
    /// else keeps whatever the slot already held, so state restored for a
    /// child that cannot re-capture it survives the round-trip.
    pub fn current_state(&self) -> PreviousState {
        let registry = self.registry.borrow();
        let mut state = self.state.borrow_mut();
        for (index, instance) in registry.instances().iter().enumerate() {
            if let Some(capturable) = instance.as_state_capturable() {
                state[index] = capturable.current_state();
            }
        }
        PreviousState {
            instances: state.clone(),
        }
    }

    /// Read-only ordered view of the child instances.
    pub fn instances(&self) -> Vec<Rc<dyn ChildInstance>> {
        self.registry.borrow().instances().to_vec()
    }

    /// Reporting statements of all statement-producing children, flattened
    /// into one sequence with empty results dropped.
    ///
    /// The row itself stays out of the statement tree on purpose: whatever
    /// composes rows aggregates them, and an intermediate actor for a layout
    /// container would only pollute the trace.
    pub fn xapi_statements(&self) -> Vec<Statement> {
        self.registry
            .borrow()
            .instances()
            .iter()
            .filter_map(|instance| instance.as_statement_producing())
            .flat_map(|producer| producer.xapi_statements())
            .filter(|statement| !statement.is_null())
            .collect()
    }

    /// Display title derived from host metadata, formatted by the host.
    /// Missing metadata falls back to formatting the empty string.
    pub fn title(&self) -> String {
        let raw = self
            .metadata
            .as_ref()
            .and_then(|metadata| metadata.title.as_deref())
            .unwrap_or("");
        self.host.titles.format(raw)
    }

    /// Union of every child's advertised capability set.
    pub fn capabilities(&self) -> Capabilities {
        self.registry
            .borrow()
            .instances()
            .iter()
            .fold(Capabilities::NONE, |caps, instance| {
                caps | instance.capabilities()
            })
    }

    // =========================================================================
    // Events and accessors
    // =========================================================================

    /// The row's event surface. Resize events emitted here relay to every
    /// child; resize events bubbling up from a child re-emit here without
    /// reflecting back down.
    pub fn emitter(&self) -> &Rc<EventEmitter> {
        &self.emitter
    }

    /// Subscribe on the row's event surface.
    pub fn on(&self, event: &str, listener: impl Fn(&crate::events::Event) + 'static) -> ListenerId {
        self.emitter.on(event, listener)
    }

    /// Remove a listener from the row's event surface.
    pub fn off(&self, event: &str, id: ListenerId) -> bool {
        self.emitter.off(event, id)
    }

    /// Emit on the row's event surface.
    pub fn trigger(&self, event: &str, data: Option<Value>) {
        self.emitter.trigger(event, data);
    }

    /// The surviving columns with their normalized widths.
    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    /// Host content identifier the row was built under.
    pub fn root_id(&self) -> &str {
        &self.root_id
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FactoryError;
    use crate::host::{InstanceFactory, Node, NodeFactory, TitleFormatter};
    use crate::instance::{
        Answerable, Resettable, Scorable, SolutionRevealable, StateCapturable, StatementProducing,
    };
    use crate::types::ContentDescriptor;
    use serde_json::json;
    use std::cell::Cell;
    use std::collections::VecDeque;
    use std::rc::Weak;
    use taffy::prelude::FromPercent;
    use taffy::Dimension;

    // =========================================================================
    // Stub child
    // =========================================================================

    #[derive(Default)]
    struct ChildSpec {
        answered: Option<bool>,
        score: Option<(i32, i32)>,
        stateful: bool,
        state: Option<StateBlob>,
        statements: Option<Vec<Statement>>,
        resettable: bool,
        revealable: bool,
    }

    struct StubChild {
        emitter: Rc<EventEmitter>,
        spec: ChildSpec,
        restored: RefCell<Option<StateBlob>>,
        parent: RefCell<Option<Weak<Row>>>,
        attaches: Cell<usize>,
        resets: Cell<usize>,
        reveal_log: RefCell<Vec<&'static str>>,
    }

    impl StubChild {
        fn with(spec: ChildSpec) -> Rc<Self> {
            Rc::new(Self {
                emitter: Rc::new(EventEmitter::new()),
                spec,
                restored: RefCell::new(None),
                parent: RefCell::new(None),
                attaches: Cell::new(0),
                resets: Cell::new(0),
                reveal_log: RefCell::new(Vec::new()),
            })
        }

        fn plain() -> Rc<Self> {
            Self::with(ChildSpec::default())
        }
    }

    impl ChildInstance for StubChild {
        fn emitter(&self) -> &Rc<EventEmitter> {
            &self.emitter
        }

        fn attach(&self, _target: &NodeHandle) {
            self.attaches.set(self.attaches.get() + 1);
        }

        fn as_answerable(&self) -> Option<&dyn Answerable> {
            self.spec.answered.map(|_| self as &dyn Answerable)
        }

        fn as_scorable(&self) -> Option<&dyn Scorable> {
            self.spec.score.map(|_| self as &dyn Scorable)
        }

        fn as_solution_revealable(&self) -> Option<&dyn SolutionRevealable> {
            self.spec.revealable.then_some(self as &dyn SolutionRevealable)
        }

        fn as_resettable(&self) -> Option<&dyn Resettable> {
            self.spec.resettable.then_some(self as &dyn Resettable)
        }

        fn as_state_capturable(&self) -> Option<&dyn StateCapturable> {
            self.spec.stateful.then_some(self as &dyn StateCapturable)
        }

        fn as_statement_producing(&self) -> Option<&dyn StatementProducing> {
            self.spec
                .statements
                .as_ref()
                .map(|_| self as &dyn StatementProducing)
        }
    }

    impl Answerable for StubChild {
        fn answer_given(&self) -> bool {
            self.spec.answered.unwrap_or(true)
        }
    }

    impl Scorable for StubChild {
        fn score(&self) -> i32 {
            self.spec.score.map_or(0, |(score, _)| score)
        }

        fn max_score(&self) -> i32 {
            self.spec.score.map_or(0, |(_, max)| max)
        }
    }

    impl SolutionRevealable for StubChild {
        fn show_solutions(&self) {
            self.reveal_log.borrow_mut().push("reveal");
        }

        fn set_read_speaker(&self, enabled: bool) {
            self.reveal_log
                .borrow_mut()
                .push(if enabled { "rs-on" } else { "rs-off" });
        }
    }

    impl Resettable for StubChild {
        fn reset_task(&self) {
            self.resets.set(self.resets.get() + 1);
        }
    }

    impl StateCapturable for StubChild {
        fn current_state(&self) -> StateBlob {
            self.spec
                .state
                .clone()
                .or_else(|| self.restored.borrow().clone())
                .unwrap_or(Value::Null)
        }
    }

    impl StatementProducing for StubChild {
        fn xapi_statements(&self) -> Vec<Statement> {
            self.spec.statements.clone().unwrap_or_default()
        }
    }

    // =========================================================================
    // Stub host
    // =========================================================================

    #[derive(Default)]
    struct StubFactory {
        queue: RefCell<VecDeque<Rc<StubChild>>>,
        created: Cell<usize>,
        root_ids: RefCell<Vec<String>>,
        fail_at: Option<usize>,
    }

    impl StubFactory {
        fn queued(children: Vec<Rc<StubChild>>) -> Rc<Self> {
            Rc::new(Self {
                queue: RefCell::new(children.into()),
                ..Default::default()
            })
        }
    }

    impl InstanceFactory for StubFactory {
        fn create(
            &self,
            _content: &ContentDescriptor,
            root_id: &str,
            context: InstanceContext,
        ) -> std::result::Result<Rc<dyn ChildInstance>, FactoryError> {
            let position = self.created.get();
            self.created.set(position + 1);
            if self.fail_at == Some(position) {
                return Err("factory refused".into());
            }
            self.root_ids.borrow_mut().push(root_id.to_string());

            let child = self
                .queue
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(StubChild::plain);
            *child.restored.borrow_mut() = context.previous_state;
            *child.parent.borrow_mut() = Some(context.parent);
            Ok(child)
        }
    }

    #[derive(Default)]
    struct StubNode {
        children: RefCell<Vec<NodeHandle>>,
        flex_basis: Cell<Option<Dimension>>,
        clears: Cell<usize>,
    }

    impl Node for StubNode {
        fn append(&self, child: &NodeHandle) {
            self.children.borrow_mut().push(Rc::clone(child));
        }

        fn set_flex_basis(&self, basis: Dimension) {
            self.flex_basis.set(Some(basis));
        }

        fn clear(&self) {
            self.children.borrow_mut().clear();
            self.clears.set(self.clears.get() + 1);
        }
    }

    #[derive(Default)]
    struct StubNodes {
        created: RefCell<Vec<Rc<StubNode>>>,
    }

    impl StubNodes {
        fn count(&self) -> usize {
            self.created.borrow().len()
        }

        fn node(&self, index: usize) -> Rc<StubNode> {
            Rc::clone(&self.created.borrow()[index])
        }
    }

    impl NodeFactory for StubNodes {
        fn create_node(&self) -> NodeHandle {
            let node = Rc::new(StubNode::default());
            self.created.borrow_mut().push(Rc::clone(&node));
            node
        }
    }

    struct StubTitles;

    impl TitleFormatter for StubTitles {
        fn format(&self, raw: &str) -> String {
            format!("[{raw}]")
        }
    }

    struct Fixture {
        factory: Rc<StubFactory>,
        nodes: Rc<StubNodes>,
        host: Host,
    }

    fn fixture_with(factory: Rc<StubFactory>) -> Fixture {
        let nodes = Rc::new(StubNodes::default());
        let host = Host {
            instances: Rc::clone(&factory) as Rc<dyn InstanceFactory>,
            nodes: Rc::clone(&nodes) as Rc<dyn NodeFactory>,
            titles: Rc::new(StubTitles),
        };
        Fixture {
            factory,
            nodes,
            host,
        }
    }

    fn fixture(children: Vec<Rc<StubChild>>) -> Fixture {
        fixture_with(StubFactory::queued(children))
    }

    fn usable_column() -> ColumnSpec {
        ColumnSpec {
            content: Some(json!({"library": "Text 1.0"})),
            ..Default::default()
        }
    }

    fn config(columns: usize) -> RowConfig {
        RowConfig {
            columns: (0..columns).map(|_| usable_column()).collect(),
        }
    }

    fn container() -> (Rc<StubNode>, NodeHandle) {
        let node = Rc::new(StubNode::default());
        let handle: NodeHandle = Rc::clone(&node) as NodeHandle;
        (node, handle)
    }

    // =========================================================================
    // Construction
    // =========================================================================

    #[test]
    fn test_unusable_columns_never_reach_instantiation() {
        let fx = fixture(vec![]);
        let config = RowConfig {
            columns: vec![
                ColumnSpec::default(),
                usable_column(),
                ColumnSpec {
                    width: Some(50.0),
                    ..Default::default()
                },
            ],
        };

        let row = Row::new(config, "main", None, fx.host.clone()).unwrap();
        assert_eq!(fx.factory.created.get(), 1);
        assert_eq!(row.instances().len(), 1);
        assert_eq!(row.columns().len(), 1);
    }

    #[test]
    fn test_construction_normalizes_widths() {
        let fx = fixture(vec![]);
        let row = Row::new(config(3), "main", None, fx.host.clone()).unwrap();

        let widths: Vec<f64> = row.columns().iter().filter_map(|c| c.width).collect();
        assert_eq!(widths, vec![34.0, 33.0, 33.0]);
    }

    #[test]
    fn test_factory_receives_root_id_and_restored_state() {
        let first = StubChild::plain();
        let second = StubChild::plain();
        let fx = fixture(vec![Rc::clone(&first), Rc::clone(&second)]);

        let data = RowData {
            previous_state: Some(PreviousState {
                instances: vec![json!({"answers": [1]}), Value::Null],
            }),
            ..Default::default()
        };
        let _row = Row::new(config(2), "content-7", Some(data), fx.host.clone()).unwrap();

        assert_eq!(*fx.factory.root_ids.borrow(), vec!["content-7", "content-7"]);
        assert_eq!(*first.restored.borrow(), Some(json!({"answers": [1]})));
        // A null slot means no restored state for that child.
        assert_eq!(*second.restored.borrow(), None);
    }

    #[test]
    fn test_children_get_a_parent_back_reference() {
        let child = StubChild::plain();
        let fx = fixture(vec![Rc::clone(&child)]);

        let row = Row::new(config(1), "main", None, fx.host.clone()).unwrap();
        let parent = child.parent.borrow().as_ref().unwrap().upgrade().unwrap();
        assert!(Rc::ptr_eq(&parent, &row));
        // The reference is weak: the child alone must not keep the row alive.
        drop(row);
        assert!(child.parent.borrow().as_ref().unwrap().upgrade().is_none());
    }

    #[test]
    fn test_factory_failure_surfaces_with_column_index() {
        let factory = Rc::new(StubFactory {
            fail_at: Some(1),
            ..Default::default()
        });
        let fx = fixture_with(factory);

        let err = Row::new(config(3), "main", None, fx.host.clone()).unwrap_err();
        match err {
            Error::Instance { index, .. } => assert_eq!(index, 1),
            other => panic!("unexpected error: {other}"),
        }
    }

    // =========================================================================
    // Attachment
    // =========================================================================

    #[test]
    fn test_attach_is_lazy_idempotent_and_re_homes() {
        let fx = fixture(vec![]);
        let row = Row::new(config(2), "main", None, fx.host.clone()).unwrap();

        // Children exist, nodes do not.
        assert_eq!(fx.factory.created.get(), 2);
        assert_eq!(fx.nodes.count(), 0);

        let (container_a, handle_a) = container();
        row.attach(&handle_a);

        // Wrapper plus one placeholder per column.
        assert_eq!(fx.nodes.count(), 3);
        assert_eq!(container_a.clears.get(), 1);
        assert_eq!(container_a.children.borrow().len(), 1);

        let (container_b, handle_b) = container();
        row.attach(&handle_b);

        // Re-homed, nothing re-created, nothing re-attached.
        assert_eq!(fx.nodes.count(), 3);
        assert_eq!(fx.factory.created.get(), 2);
        assert_eq!(container_b.children.borrow().len(), 1);
    }

    #[test]
    fn test_children_attach_exactly_once_across_repeated_attach() {
        let first = StubChild::plain();
        let second = StubChild::plain();
        let fx = fixture(vec![Rc::clone(&first), Rc::clone(&second)]);
        let row = Row::new(config(2), "main", None, fx.host.clone()).unwrap();

        let (_, handle_a) = container();
        let (_, handle_b) = container();
        row.attach(&handle_a);
        row.attach(&handle_b);
        row.attach(&handle_a);

        assert_eq!(first.attaches.get(), 1);
        assert_eq!(second.attaches.get(), 1);
        assert_eq!(fx.factory.created.get(), 2);
    }

    #[test]
    fn test_slot_nodes_carry_flex_basis() {
        let fx = fixture(vec![]);
        let row = Row::new(config(2), "main", None, fx.host.clone()).unwrap();
        let (_, handle) = container();
        row.attach(&handle);

        // Node 0 is the wrapper, 1 and 2 the column placeholders.
        assert_eq!(fx.nodes.node(0).flex_basis.get(), None);
        assert_eq!(
            fx.nodes.node(1).flex_basis.get(),
            Some(Dimension::from_percent(0.5))
        );
        assert_eq!(
            fx.nodes.node(2).flex_basis.get(),
            Some(Dimension::from_percent(0.5))
        );
        assert_eq!(fx.nodes.node(0).children.borrow().len(), 2);
    }

    // =========================================================================
    // Aggregate contracts
    // =========================================================================

    #[test]
    fn test_answer_given_is_an_and_reduction_over_capable_children() {
        let fx = fixture(vec![
            StubChild::with(ChildSpec {
                answered: Some(true),
                ..Default::default()
            }),
            StubChild::plain(),
            StubChild::with(ChildSpec {
                answered: Some(false),
                ..Default::default()
            }),
        ]);
        let row = Row::new(config(3), "main", None, fx.host.clone()).unwrap();
        assert!(!row.answer_given());
    }

    #[test]
    fn test_answer_given_identity_is_true() {
        let fx = fixture(vec![]);
        let empty = Row::new(config(0), "main", None, fx.host.clone()).unwrap();
        assert!(empty.answer_given());

        let fx = fixture(vec![StubChild::plain()]);
        let incapable_only = Row::new(config(1), "main", None, fx.host.clone()).unwrap();
        assert!(incapable_only.answer_given());
    }

    #[test]
    fn test_score_sums_over_capable_children() {
        let fx = fixture(vec![
            StubChild::with(ChildSpec {
                score: Some((2, 3)),
                ..Default::default()
            }),
            StubChild::plain(),
            StubChild::with(ChildSpec {
                score: Some((5, 6)),
                ..Default::default()
            }),
        ]);
        let row = Row::new(config(3), "main", None, fx.host.clone()).unwrap();
        assert_eq!(row.score(), 7);
        assert_eq!(row.max_score(), 9);
    }

    #[test]
    fn test_show_solutions_suppresses_narration_around_reveal() {
        let revealable = StubChild::with(ChildSpec {
            revealable: true,
            ..Default::default()
        });
        let plain = StubChild::plain();
        let fx = fixture(vec![Rc::clone(&revealable), Rc::clone(&plain)]);
        let row = Row::new(config(2), "main", None, fx.host.clone()).unwrap();

        row.show_solutions();
        assert_eq!(*revealable.reveal_log.borrow(), vec!["rs-off", "reveal", "rs-on"]);
        assert!(plain.reveal_log.borrow().is_empty());
    }

    #[test]
    fn test_reset_task_fans_out_to_capable_children() {
        let resettable = StubChild::with(ChildSpec {
            resettable: true,
            ..Default::default()
        });
        let plain = StubChild::plain();
        let fx = fixture(vec![Rc::clone(&resettable), Rc::clone(&plain)]);
        let row = Row::new(config(2), "main", None, fx.host.clone()).unwrap();

        row.reset_task();
        row.reset_task();
        assert_eq!(resettable.resets.get(), 2);
        assert_eq!(plain.resets.get(), 0);
    }

    #[test]
    fn test_current_state_round_trips_without_mutation() {
        let s0 = json!({"kept": true});
        let s1 = json!({"answers": [2, 3]});
        // First child cannot capture state, second echoes what it restored.
        let fx = fixture(vec![
            StubChild::plain(),
            StubChild::with(ChildSpec {
                stateful: true,
                ..Default::default()
            }),
        ]);
        let data = RowData {
            previous_state: Some(PreviousState {
                instances: vec![s0.clone(), s1.clone()],
            }),
            ..Default::default()
        };
        let row = Row::new(config(2), "main", Some(data), fx.host.clone()).unwrap();

        let state = row.current_state();
        assert_eq!(state.instances, vec![s0, s1]);
    }

    #[test]
    fn test_current_state_overwrites_only_capturable_slots() {
        let fx = fixture(vec![
            StubChild::plain(),
            StubChild::with(ChildSpec {
                stateful: true,
                state: Some(json!({"fresh": 1})),
                ..Default::default()
            }),
        ]);
        let data = RowData {
            previous_state: Some(PreviousState {
                instances: vec![json!("old-a"), json!("old-b")],
            }),
            ..Default::default()
        };
        let row = Row::new(config(2), "main", Some(data), fx.host.clone()).unwrap();

        let state = row.current_state();
        assert_eq!(state.instances, vec![json!("old-a"), json!({"fresh": 1})]);
    }

    #[test]
    fn test_state_vector_tracks_surviving_column_count() {
        // Stale extra blob is truncated, missing blobs are null-filled.
        let fx = fixture(vec![]);
        let data = RowData {
            previous_state: Some(PreviousState {
                instances: vec![json!(1), json!(2), json!(3)],
            }),
            ..Default::default()
        };
        let row = Row::new(config(2), "main", Some(data), fx.host.clone()).unwrap();
        assert_eq!(row.current_state().instances.len(), 2);

        let fx = fixture(vec![]);
        let data = RowData {
            previous_state: Some(PreviousState {
                instances: vec![json!(1)],
            }),
            ..Default::default()
        };
        let row = Row::new(config(2), "main", Some(data), fx.host.clone()).unwrap();
        assert_eq!(row.current_state().instances, vec![json!(1), Value::Null]);
    }

    #[test]
    fn test_xapi_statements_flatten_and_drop_empty_results() {
        let fx = fixture(vec![
            StubChild::with(ChildSpec {
                statements: Some(vec![json!({"verb": "answered"}), json!({"verb": "passed"})]),
                ..Default::default()
            }),
            StubChild::plain(),
            StubChild::with(ChildSpec {
                statements: Some(vec![]),
                ..Default::default()
            }),
            StubChild::with(ChildSpec {
                statements: Some(vec![Value::Null, json!({"verb": "attempted"})]),
                ..Default::default()
            }),
        ]);
        let row = Row::new(config(4), "main", None, fx.host.clone()).unwrap();

        assert_eq!(
            row.xapi_statements(),
            vec![
                json!({"verb": "answered"}),
                json!({"verb": "passed"}),
                json!({"verb": "attempted"}),
            ]
        );
    }

    #[test]
    fn test_title_formats_metadata_and_falls_back_to_empty() {
        let fx = fixture(vec![]);
        let data = RowData {
            metadata: Some(Metadata {
                title: Some("Morning quiz".into()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let row = Row::new(config(1), "main", Some(data), fx.host.clone()).unwrap();
        assert_eq!(row.title(), "[Morning quiz]");

        let fx = fixture(vec![]);
        let row = Row::new(config(1), "main", None, fx.host.clone()).unwrap();
        assert_eq!(row.title(), "[]");
    }

    #[test]
    fn test_capabilities_union_over_children() {
        let fx = fixture(vec![
            StubChild::with(ChildSpec {
                score: Some((0, 1)),
                ..Default::default()
            }),
            StubChild::with(ChildSpec {
                resettable: true,
                ..Default::default()
            }),
        ]);
        let row = Row::new(config(2), "main", None, fx.host.clone()).unwrap();
        assert_eq!(
            row.capabilities(),
            Capabilities::SCORABLE | Capabilities::RESETTABLE
        );
    }

    // =========================================================================
    // Resize bubbling
    // =========================================================================

    fn resize_counter(emitter: &EventEmitter) -> Rc<Cell<usize>> {
        let count = Rc::new(Cell::new(0));
        let count_in = Rc::clone(&count);
        emitter.on(RESIZE, move |_| count_in.set(count_in.get() + 1));
        count
    }

    #[test]
    fn test_child_resize_bubbles_up_without_reflecting() {
        let first = StubChild::plain();
        let second = StubChild::plain();
        let fx = fixture(vec![Rc::clone(&first), Rc::clone(&second)]);
        let row = Row::new(config(2), "main", None, fx.host.clone()).unwrap();

        let row_count = resize_counter(row.emitter());
        let own_count = resize_counter(first.emitter());
        let sibling_count = resize_counter(second.emitter());

        first.emitter.trigger(RESIZE, None);

        assert_eq!(row_count.get(), 1);
        // The origin sees only its own emission, the sibling nothing.
        assert_eq!(own_count.get(), 1);
        assert_eq!(sibling_count.get(), 0);
    }

    #[test]
    fn test_row_resize_relays_down_to_every_child() {
        let first = StubChild::plain();
        let second = StubChild::plain();
        let fx = fixture(vec![Rc::clone(&first), Rc::clone(&second)]);
        let row = Row::new(config(2), "main", None, fx.host.clone()).unwrap();

        let first_count = resize_counter(first.emitter());
        let second_count = resize_counter(second.emitter());

        row.trigger(RESIZE, None);
        assert_eq!(first_count.get(), 1);
        assert_eq!(second_count.get(), 1);

        // The guard resets between emissions; a second broadcast works too.
        row.trigger(RESIZE, None);
        assert_eq!(first_count.get(), 2);
        assert_eq!(second_count.get(), 2);
    }
}
