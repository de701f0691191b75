//! Basic Example - A row with two children over a toy in-memory host
//!
//! This example demonstrates basic usage of trellis-row:
//! - Implementing the host traits (nodes, factory, titles)
//! - Constructing a Row from JSON configuration
//! - Attaching, scoring and resize bubbling
//!
//! Run with: cargo run --example basic

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use serde_json::json;
use taffy::Dimension;

use trellis_row::{
    ChildInstance, ContentDescriptor, EventEmitter, FactoryError, Host, InstanceContext,
    InstanceFactory, Node, NodeFactory, NodeHandle, Row, RowConfig, Scorable, TitleFormatter,
    RESIZE,
};

// A host node is just a box that remembers its children.
#[derive(Default)]
struct DemoNode {
    children: RefCell<Vec<NodeHandle>>,
    flex_basis: Cell<Option<Dimension>>,
}

impl DemoNode {
    fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }
}

impl Node for DemoNode {
    fn append(&self, child: &NodeHandle) {
        self.children.borrow_mut().push(Rc::clone(child));
    }

    fn set_flex_basis(&self, basis: Dimension) {
        self.flex_basis.set(Some(basis));
    }
}

#[derive(Default)]
struct DemoNodes {
    created: Cell<usize>,
}

impl NodeFactory for DemoNodes {
    fn create_node(&self) -> NodeHandle {
        self.created.set(self.created.get() + 1);
        DemoNode::new()
    }
}

// A child that counts clicks as its score and announces size changes.
struct DemoChild {
    name: String,
    emitter: Rc<EventEmitter>,
    clicks: Cell<i32>,
}

impl ChildInstance for DemoChild {
    fn emitter(&self) -> &Rc<EventEmitter> {
        &self.emitter
    }

    fn attach(&self, _target: &NodeHandle) {
        println!("  child {} attached", self.name);
    }

    fn as_scorable(&self) -> Option<&dyn Scorable> {
        Some(self)
    }
}

impl Scorable for DemoChild {
    fn score(&self) -> i32 {
        self.clicks.get()
    }

    fn max_score(&self) -> i32 {
        10
    }
}

struct DemoFactory;

impl InstanceFactory for DemoFactory {
    fn create(
        &self,
        content: &ContentDescriptor,
        _root_id: &str,
        _context: InstanceContext,
    ) -> Result<Rc<dyn ChildInstance>, FactoryError> {
        let name = content["name"].as_str().unwrap_or("anonymous").to_string();
        Ok(Rc::new(DemoChild {
            name,
            emitter: Rc::new(EventEmitter::new()),
            clicks: Cell::new(0),
        }))
    }
}

struct DemoTitles;

impl TitleFormatter for DemoTitles {
    fn format(&self, raw: &str) -> String {
        if raw.is_empty() {
            "Untitled row".to_string()
        } else {
            raw.to_string()
        }
    }
}

fn main() {
    println!("=== trellis-row Basic Example ===\n");

    let config = RowConfig::from_json(
        r#"{
            "columns": [
                {"width": 70, "content": {"name": "reader"}},
                {"content": {"name": "quiz"}},
                {}
            ]
        }"#,
    )
    .expect("demo config is valid");

    let nodes = Rc::new(DemoNodes::default());
    let host = Host {
        instances: Rc::new(DemoFactory),
        nodes: Rc::clone(&nodes) as Rc<dyn NodeFactory>,
        titles: Rc::new(DemoTitles),
    };

    let row = Row::new(config, "demo-1", None, host).expect("demo factory never fails");

    println!("Normalized columns:");
    for (index, column) in row.columns().iter().enumerate() {
        println!("  column {index}: width {:?}%", column.width);
    }

    let container = DemoNode::new();
    println!("\nAttaching:");
    row.attach(&(Rc::clone(&container) as NodeHandle));
    println!(
        "  host created {} node(s), stage holds {} wrapper(s)",
        nodes.created.get(),
        container.children.borrow().len()
    );

    println!("\nScore: {}/{}", row.score(), row.max_score());
    println!("Title: {}", row.title());

    // A child announcing its new size reaches the row exactly once and no
    // sibling hears an echo.
    let relayed = Rc::new(Cell::new(0));
    let relayed_in = Rc::clone(&relayed);
    row.on(RESIZE, move |_| relayed_in.set(relayed_in.get() + 1));

    let children = row.instances();
    children[1].emitter().trigger(RESIZE, Some(json!({"height": 120})));
    println!("\nRow saw {} resize event(s) from the quiz child", relayed.get());

    // The host resizing the whole row relays down to every child.
    row.trigger(RESIZE, None);

    println!("\n=== Example Complete ===");
}
