//! Element tree implementation for the Bramble markup parser.
//!
//! # Design
//!
//! The tree uses arena allocation with [`NodeId`] indices for all relationships,
//! providing O(1) access and traversal without borrow checker issues. A parent
//! owns its children through its `children` list; the child keeps a plain
//! index back to the parent for attribute inheritance and ancestry queries.
//!
//! Every node is an element. What an element carries besides its tag and
//! attributes depends on its [`ElementKind`]:
//! - `Generic` elements store raw text content
//! - `Stylesheet` elements store parsed [`StyleRule`]s and synthesize their
//!   text content from them
//! - `Custom` elements delegate to a caller-supplied [`CustomElement`]

/// Element kinds produced per tag name.
pub mod registry;

mod query;
mod serialize;

use std::any::Any;
use std::collections::HashMap;
use std::fmt;

use bramble_css::{DEFAULT_INDENT_STEP, StyleRule, parse_stylesheet, serialize_rules};

pub use query::DescendantIterator;
pub use registry::{ElementFactory, ElementRegistry, STYLE_TAG};
pub use serialize::SerializeOptions;

/// Map of attribute names to values for an element.
pub type AttributesMap = HashMap<String, String>;

/// A type-safe index into the element tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// Tag name and attributes, shared by every element kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementData {
    /// Lowercase tag name.
    pub tag_name: String,
    /// Attributes set directly on this element.
    pub attrs: AttributesMap,
}

impl ElementData {
    /// Create element data, normalizing the tag name to lowercase.
    #[must_use]
    pub fn new(tag_name: &str, attrs: AttributesMap) -> Self {
        Self {
            tag_name: tag_name.to_lowercase(),
            attrs,
        }
    }

    /// Returns the element's own id attribute value if present.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.attrs.get("id").map(String::as_str)
    }
}

/// A caller-defined element type, installed through the [`ElementRegistry`].
///
/// Implementations own their text payload. Use [`DomTree::custom`] to get the
/// concrete type back.
pub trait CustomElement: Any + fmt::Debug {
    /// Text content, if any.
    fn content(&self) -> Option<String>;

    /// Replace the text content. `None` clears it.
    fn set_content(&mut self, content: Option<&str>);

    /// Deep copy behind a fresh box.
    fn clone_box(&self) -> Box<dyn CustomElement>;

    /// Upcast for downcasting to the concrete type.
    fn as_any(&self) -> &dyn Any;

    /// Mutable upcast for downcasting to the concrete type.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl Clone for Box<dyn CustomElement> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// What an element carries in addition to its tag and attributes.
#[derive(Debug, Clone)]
pub enum ElementKind {
    /// Plain element with optional raw text content.
    Generic(Option<String>),
    /// `<style>`-like element whose content lives as parsed rules.
    Stylesheet(Vec<StyleRule>),
    /// Caller-defined element.
    Custom(Box<dyn CustomElement>),
}

impl ElementKind {
    /// The text payload of this kind.
    ///
    /// Stylesheets always have content: the serialization of their rules.
    #[must_use]
    pub fn content(&self) -> Option<String> {
        match self {
            Self::Generic(content) => content.clone(),
            Self::Stylesheet(rules) => Some(serialize_rules(rules, 0, DEFAULT_INDENT_STEP)),
            Self::Custom(custom) => custom.content(),
        }
    }

    /// Replace the text payload.
    ///
    /// Stylesheets re-parse `content` into rules and keep no literal text;
    /// `None` leaves them without rules.
    pub fn set_content(&mut self, content: Option<&str>) {
        match self {
            Self::Generic(slot) => *slot = content.map(str::to_string),
            Self::Stylesheet(rules) => *rules = content.map(parse_stylesheet).unwrap_or_default(),
            Self::Custom(custom) => custom.set_content(content),
        }
    }
}

/// A single element in the tree.
///
/// This node stores indices for parent/child relationships,
/// enabling O(1) upward traversal.
#[derive(Debug, Clone)]
pub struct Node {
    /// Tag name and attributes.
    pub data: ElementData,

    /// Payload depending on the element kind.
    pub kind: ElementKind,

    /// The parent element, `None` for roots and detached nodes.
    pub parent: Option<NodeId>,

    /// Child elements in document order.
    pub children: Vec<NodeId>,
}

/// Arena-based element tree with O(1) node access and traversal.
///
/// This structure stores all nodes in a contiguous vector, using indices
/// for all relationships. Removing a child detaches it but leaves it
/// allocated, so ids stay valid for the lifetime of the tree.
#[derive(Debug, Clone, Default)]
pub struct DomTree {
    /// All nodes in the tree, indexed by `NodeId`.
    nodes: Vec<Node>,

    /// The document root, if parsing produced one.
    root: Option<NodeId>,
}

impl DomTree {
    /// Create an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the root element ID.
    #[must_use]
    pub const fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Set (or clear) the root element.
    pub fn set_root(&mut self, root: Option<NodeId>) {
        self.root = root;
    }

    /// Get a node by its ID.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Get a mutable reference to a node by its ID.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    /// Get the number of allocated nodes, detached ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if no node was ever allocated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocate a new node and return its ID.
    /// The node is not yet attached to the tree.
    pub fn alloc(&mut self, data: ElementData, kind: ElementKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            data,
            kind,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    /// Allocate a detached generic element.
    pub fn create_element(&mut self, tag_name: &str, attrs: AttributesMap) -> NodeId {
        self.alloc(ElementData::new(tag_name, attrs), ElementKind::Generic(None))
    }

    /// Appends `child` as the last child of `parent`.
    ///
    /// A child that is still attached elsewhere is detached first. Appending
    /// a node under itself or one of its descendants is ignored.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if parent == child
            || self.is_descendant_of(parent, child)
            || self.get(parent).is_none()
            || self.get(child).is_none()
        {
            return;
        }
        if let Some(old_parent) = self.parent(child) {
            let _ = self.remove_child(old_parent, child);
        }
        self.nodes[parent.0].children.push(child);
        self.nodes[child.0].parent = Some(parent);
    }

    /// Append several children in order.
    pub fn append_children(&mut self, parent: NodeId, children: impl IntoIterator<Item = NodeId>) {
        for child in children {
            self.append_child(parent, child);
        }
    }

    /// Detach `child` from `parent`. Returns false if it was not a child.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        let Some(index) = self.children(parent).iter().position(|&c| c == child) else {
            return false;
        };
        let _ = self.remove_child_at(parent, index);
        true
    }

    /// Detach the child at `index`, returning its ID.
    pub fn remove_child_at(&mut self, parent: NodeId, index: usize) -> Option<NodeId> {
        let node = self.get_mut(parent)?;
        if index >= node.children.len() {
            return None;
        }
        let child = node.children.remove(index);
        self.nodes[child.0].parent = None;
        Some(child)
    }

    /// Detach every child of `parent`, returning them in order.
    pub fn remove_children(&mut self, parent: NodeId) -> Vec<NodeId> {
        let Some(node) = self.get_mut(parent) else {
            return Vec::new();
        };
        let children = std::mem::take(&mut node.children);
        for &child in &children {
            self.nodes[child.0].parent = None;
        }
        children
    }

    /// Get the parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Whether the node is attached to a parent.
    #[must_use]
    pub fn has_parent(&self, id: NodeId) -> bool {
        self.parent(id).is_some()
    }

    /// Get all children of a node.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Get the child at `index`.
    #[must_use]
    pub fn child(&self, id: NodeId, index: usize) -> Option<NodeId> {
        self.children(id).get(index).copied()
    }

    /// Whether the node has any children.
    #[must_use]
    pub fn has_children(&self, id: NodeId) -> bool {
        !self.children(id).is_empty()
    }

    /// Get the next sibling of a node.
    #[must_use]
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let siblings = self.children(self.parent(id)?);
        let index = siblings.iter().position(|&c| c == id)?;
        siblings.get(index + 1).copied()
    }

    /// Get the previous sibling of a node.
    #[must_use]
    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        let siblings = self.children(self.parent(id)?);
        let index = siblings.iter().position(|&c| c == id)?;
        index.checked_sub(1).map(|i| siblings[i])
    }

    /// Check if `descendant` is a descendant of `ancestor`.
    #[must_use]
    pub fn is_descendant_of(&self, descendant: NodeId, ancestor: NodeId) -> bool {
        self.ancestors(descendant).any(|id| id == ancestor)
    }

    /// Iterate over all ancestors of a node, from parent to root.
    #[must_use]
    pub fn ancestors(&self, id: NodeId) -> AncestorIterator<'_> {
        AncestorIterator {
            tree: self,
            current: self.parent(id),
        }
    }

    /// Get element data for a node.
    #[must_use]
    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id).map(|n| &n.data)
    }

    /// The lowercase tag name of a node.
    #[must_use]
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|e| e.tag_name.as_str())
    }

    // ===== Attributes =====

    /// Look up an attribute on the node, then on each ancestor in turn.
    #[must_use]
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        std::iter::once(id)
            .chain(self.ancestors(id))
            .find_map(|node| self.element(node)?.attrs.get(name))
            .map(String::as_str)
    }

    /// Whether [`DomTree::attribute`] resolves `name`, inheritance included.
    #[must_use]
    pub fn has_attribute(&self, id: NodeId, name: &str) -> bool {
        self.attribute(id, name).is_some()
    }

    /// Whether the node itself carries any attribute.
    #[must_use]
    pub fn has_attributes(&self, id: NodeId) -> bool {
        self.element(id).is_some_and(|e| !e.attrs.is_empty())
    }

    /// Set an attribute on the node itself.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) {
        if let Some(node) = self.get_mut(id) {
            let _ = node.data.attrs.insert(name.to_string(), value.to_string());
        }
    }

    /// Remove an attribute from the node itself, returning its value.
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> Option<String> {
        self.get_mut(id)?.data.attrs.remove(name)
    }

    /// The `id` attribute, inheritance included.
    #[must_use]
    pub fn id_attribute(&self, id: NodeId) -> Option<&str> {
        self.attribute(id, "id")
    }

    // ===== Classes =====
    //
    // Class lookups go through `attribute`, so a node without its own class
    // attribute reports the nearest ancestor's.

    /// The class attribute, inheritance included, or `""` when absent.
    #[must_use]
    pub fn class_string(&self, id: NodeId) -> &str {
        self.attribute(id, "class").unwrap_or_default()
    }

    /// The class names of [`DomTree::class_string`], in attribute order.
    #[must_use]
    pub fn classes(&self, id: NodeId) -> Vec<&str> {
        self.class_string(id).split_whitespace().collect()
    }

    /// Whether `class` is one of the node's class names.
    #[must_use]
    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.classes(id).contains(&class)
    }

    /// Replace the class attribute on the node itself.
    pub fn set_class(&mut self, id: NodeId, classes: &str) {
        self.set_attribute(id, "class", classes);
    }

    /// Add a class name unless it is already present.
    ///
    /// The result is written to the node itself, starting from the
    /// (possibly inherited) current class list.
    pub fn add_class(&mut self, id: NodeId, class: &str) {
        let mut classes: Vec<String> = self.classes(id).into_iter().map(str::to_string).collect();
        if classes.iter().any(|c| c == class) {
            return;
        }
        classes.push(class.to_string());
        self.set_class(id, &classes.join(" "));
    }

    /// Remove a class name. Nodes without any class list are left alone.
    pub fn remove_class(&mut self, id: NodeId, class: &str) {
        let classes = self.classes(id);
        if classes.is_empty() {
            return;
        }
        let remaining: Vec<String> = classes
            .into_iter()
            .filter(|&c| c != class)
            .map(str::to_string)
            .collect();
        self.set_class(id, &remaining.join(" "));
    }

    // ===== Content =====

    /// Get the element kind of a node.
    #[must_use]
    pub fn kind(&self, id: NodeId) -> Option<&ElementKind> {
        self.get(id).map(|n| &n.kind)
    }

    /// Text content of a node, synthesized from rules for stylesheets.
    #[must_use]
    pub fn content(&self, id: NodeId) -> Option<String> {
        self.kind(id).and_then(ElementKind::content)
    }

    /// Replace the text content of a node.
    ///
    /// Existing children are kept; serialization prefers content over them.
    pub fn set_content(&mut self, id: NodeId, content: Option<&str>) {
        if let Some(node) = self.get_mut(id) {
            node.kind.set_content(content);
        }
    }

    /// Whether the node is a stylesheet element.
    #[must_use]
    pub fn is_stylesheet(&self, id: NodeId) -> bool {
        matches!(self.kind(id), Some(ElementKind::Stylesheet(_)))
    }

    /// The rules of a stylesheet element.
    #[must_use]
    pub fn rules(&self, id: NodeId) -> Option<&[StyleRule]> {
        match self.kind(id)? {
            ElementKind::Stylesheet(rules) => Some(rules.as_slice()),
            _ => None,
        }
    }

    /// Mutable rules of a stylesheet element.
    pub fn rules_mut(&mut self, id: NodeId) -> Option<&mut Vec<StyleRule>> {
        match &mut self.get_mut(id)?.kind {
            ElementKind::Stylesheet(rules) => Some(rules),
            _ => None,
        }
    }

    /// The rule at `index` of a stylesheet element.
    #[must_use]
    pub fn rule(&self, id: NodeId, index: usize) -> Option<&StyleRule> {
        self.rules(id)?.get(index)
    }

    /// Replace all rules of a stylesheet element. Returns false for other kinds.
    pub fn set_rules(&mut self, id: NodeId, rules: Vec<StyleRule>) -> bool {
        self.rules_mut(id).map(|slot| *slot = rules).is_some()
    }

    /// Append a rule to a stylesheet element. Returns false for other kinds.
    pub fn add_rule(&mut self, id: NodeId, rule: StyleRule) -> bool {
        self.rules_mut(id).map(|rules| rules.push(rule)).is_some()
    }

    /// Remove the first rule equal to `rule`. Returns whether one was removed.
    pub fn remove_rule(&mut self, id: NodeId, rule: &StyleRule) -> bool {
        let Some(rules) = self.rules_mut(id) else {
            return false;
        };
        match rules.iter().position(|r| r == rule) {
            Some(index) => {
                let _ = rules.remove(index);
                true
            }
            None => false,
        }
    }

    /// Remove the rule at `index`.
    pub fn remove_rule_at(&mut self, id: NodeId, index: usize) -> Option<StyleRule> {
        let rules = self.rules_mut(id)?;
        (index < rules.len()).then(|| rules.remove(index))
    }

    /// Downcast a custom element to its concrete type.
    #[must_use]
    pub fn custom<T: CustomElement>(&self, id: NodeId) -> Option<&T> {
        match self.kind(id)? {
            ElementKind::Custom(custom) => custom.as_any().downcast_ref(),
            _ => None,
        }
    }

    /// Mutably downcast a custom element to its concrete type.
    pub fn custom_mut<T: CustomElement>(&mut self, id: NodeId) -> Option<&mut T> {
        match &mut self.get_mut(id)?.kind {
            ElementKind::Custom(custom) => custom.as_any_mut().downcast_mut(),
            _ => None,
        }
    }

    // ===== Copying =====

    /// Deep-copy the subtree at `id` into new, detached nodes of this tree.
    ///
    /// Attribute maps, content and stylesheet rules are copied, never shared;
    /// custom elements are copied through [`CustomElement::clone_box`].
    pub fn clone_subtree(&mut self, id: NodeId) -> Option<NodeId> {
        let (data, kind) = self.get(id).map(|n| (n.data.clone(), n.kind.clone()))?;
        let copy = self.alloc(data, kind);

        // (source, copy) pairs whose children still need copying
        let mut stack = vec![(id, copy)];
        while let Some((source, copy)) = stack.pop() {
            for child in self.children(source).to_vec() {
                let node = &self.nodes[child.0];
                let (data, kind) = (node.data.clone(), node.kind.clone());
                let child_copy = self.alloc(data, kind);
                self.nodes[copy.0].children.push(child_copy);
                self.nodes[child_copy.0].parent = Some(copy);
                stack.push((child, child_copy));
            }
        }
        Some(copy)
    }

    /// Copy the subtree at `id` into a new tree whose root is the copy.
    ///
    /// Detached nodes elsewhere in this tree are not carried over.
    #[must_use]
    pub fn extract_subtree(&self, id: NodeId) -> Self {
        let mut copy = Self::new();
        let Some(source) = self.get(id) else {
            return copy;
        };
        let root = copy.alloc(source.data.clone(), source.kind.clone());
        copy.root = Some(root);

        let mut stack = vec![(id, root)];
        while let Some((source, target)) = stack.pop() {
            for &child in self.children(source) {
                let node = &self.nodes[child.0];
                let child_copy = copy.alloc(node.data.clone(), node.kind.clone());
                copy.append_child(target, child_copy);
                stack.push((child, child_copy));
            }
        }
        copy
    }

    /// Visit the node and every descendant in document order.
    pub fn visit_deep(&self, id: NodeId, mut visitor: impl FnMut(NodeId)) {
        if self.get(id).is_none() {
            return;
        }
        visitor(id);
        for descendant in self.descendants(id) {
            visitor(descendant);
        }
    }
}

/// Iterator over ancestors of a node.
pub struct AncestorIterator<'a> {
    tree: &'a DomTree,
    current: Option<NodeId>,
}

impl Iterator for AncestorIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.tree.parent(id);
        Some(id)
    }
}
