//! Retained element store.
//!
//! The renderer owns every drawn element here. Elements are grouped by
//! category so a structural rebuild can tear down exactly the categories it
//! recreates. Every create, remove and patch is appended to an operation
//! log, which is how callers (and tests) verify that a rebuild clears
//! before it creates and that a no-op update touches nothing.

use crate::types::{Bounds, Point};
use crate::update::RebuildSet;

/// Element categories, in drawing order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Arcs,
    Ticks,
    Pointers,
    ValueLabel,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Arcs,
        Category::Ticks,
        Category::Pointers,
        Category::ValueLabel,
    ];

    /// Is this category torn down by `rebuild`?
    pub fn in_set(self, rebuild: &RebuildSet) -> bool {
        match self {
            Category::Arcs => rebuild.arcs,
            Category::Ticks => rebuild.ticks,
            Category::Pointers => rebuild.pointers,
            Category::ValueLabel => rebuild.value_label,
        }
    }

    /// CSS class of the group holding this category
    pub fn class(self) -> &'static str {
        match self {
            Category::Arcs => "arcs",
            Category::Ticks => "ticks",
            Category::Pointers => "pointers",
            Category::ValueLabel => "value-label",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAnchor {
    Start,
    #[default]
    Middle,
    End,
}

impl TextAnchor {
    pub fn as_str(self) -> &'static str {
        match self {
            TextAnchor::Start => "start",
            TextAnchor::Middle => "middle",
            TextAnchor::End => "end",
        }
    }
}

/// A drawable primitive. Coordinates are relative to the gauge center.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Path with its precomputed extent
    Path {
        d: String,
        fill: String,
        bounds: Bounds,
    },
    Circle {
        center: Point,
        radius: f64,
        fill: String,
    },
    Line {
        from: Point,
        to: Point,
        stroke: String,
        width: f64,
    },
    /// `position` is the baseline anchor point
    Text {
        position: Point,
        text: String,
        font_size: f64,
        fill: String,
        anchor: TextAnchor,
    },
    Group(Vec<Node>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(u64);

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub id: ElementId,
    pub category: Category,
    /// Position within the category (pointer index, tick index, ...)
    pub index: usize,
    pub node: Node,
}

/// One mutation of the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneOp {
    Create { id: ElementId, category: Category },
    Remove { id: ElementId, category: Category },
    Patch { id: ElementId, category: Category },
}

impl SceneOp {
    pub fn category(&self) -> Category {
        match *self {
            SceneOp::Create { category, .. }
            | SceneOp::Remove { category, .. }
            | SceneOp::Patch { category, .. } => category,
        }
    }
}

/// Retained element store.
///
/// The op log is the net change since the last [`Scene::take_ops`]: an
/// element appears at most once, so the log never outgrows the elements
/// alive now plus those alive at the last drain.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    elements: Vec<Element>,
    next_id: u64,
    ops: Vec<SceneOp>,
    opacity: f64,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    pub fn new() -> Self {
        Self {
            elements: Vec::new(),
            next_id: 0,
            ops: Vec::new(),
            opacity: 1.0,
        }
    }

    /// A scene drawn for measurement only
    pub fn hidden() -> Self {
        Self {
            opacity: 0.0,
            ..Self::new()
        }
    }

    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    pub fn set_opacity(&mut self, opacity: f64) {
        self.opacity = opacity.clamp(0.0, 1.0);
    }

    pub fn is_visible(&self) -> bool {
        self.opacity > 0.0
    }

    pub fn create(&mut self, category: Category, index: usize, node: Node) -> ElementId {
        let id = ElementId(self.next_id);
        self.next_id += 1;
        self.elements.push(Element {
            id,
            category,
            index,
            node,
        });
        self.ops.push(SceneOp::Create { id, category });
        id
    }

    /// Remove every element of `category`, returning how many went.
    pub fn clear(&mut self, category: Category) -> usize {
        let gone: Vec<ElementId> = self
            .elements
            .iter()
            .filter(|e| e.category == category)
            .map(|e| e.id)
            .collect();
        self.elements.retain(|e| e.category != category);
        for &id in &gone {
            self.log_remove(id, category);
        }
        gone.len()
    }

    pub fn clear_all(&mut self) {
        for category in Category::ALL {
            self.clear(category);
        }
    }

    /// Replace the node of an existing element. Identical nodes are left
    /// alone and not logged. Returns false when no such element exists.
    pub fn patch(&mut self, category: Category, index: usize, node: Node) -> bool {
        let Some(element) = self
            .elements
            .iter_mut()
            .find(|e| e.category == category && e.index == index)
        else {
            return false;
        };
        if element.node != node {
            element.node = node;
            let id = element.id;
            let pending = self.ops.iter().any(|op| {
                matches!(
                    op,
                    SceneOp::Create { id: i, .. } | SceneOp::Patch { id: i, .. } if *i == id
                )
            });
            if !pending {
                self.ops.push(SceneOp::Patch { id, category });
            }
        }
        true
    }

    /// An element created since the last drain leaves no trace; any other
    /// gets a single `Remove` in place of its pending patches.
    fn log_remove(&mut self, id: ElementId, category: Category) {
        let created = self
            .ops
            .iter()
            .any(|op| matches!(op, SceneOp::Create { id: i, .. } if *i == id));
        self.ops.retain(|op| match op {
            SceneOp::Create { id: i, .. } | SceneOp::Patch { id: i, .. } => *i != id,
            SceneOp::Remove { .. } => true,
        });
        if !created {
            self.ops.push(SceneOp::Remove { id, category });
        }
    }

    pub fn get(&self, category: Category, index: usize) -> Option<&Element> {
        self.elements
            .iter()
            .find(|e| e.category == category && e.index == index)
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn by_category(&self, category: Category) -> impl Iterator<Item = &Element> {
        self.elements.iter().filter(move |e| e.category == category)
    }

    pub fn count(&self, category: Category) -> usize {
        self.by_category(category).count()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn ops(&self) -> &[SceneOp] {
        &self.ops
    }

    pub fn take_ops(&mut self) -> Vec<SceneOp> {
        std::mem::take(&mut self.ops)
    }
}
