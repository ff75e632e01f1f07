//! Tag name to element kind bindings.
//!
//! The tree builder asks the registry which [`ElementKind`] to create for each
//! opening tag. Tags without a registered factory become generic elements.

use std::collections::HashMap;
use std::fmt;

use crate::{AttributesMap, DomTree, ElementData, ElementKind, NodeId};

/// Tag name bound to the stylesheet element kind by default.
pub const STYLE_TAG: &str = "style";

/// Builds the payload for a newly created element from its tag and attributes.
pub type ElementFactory = Box<dyn Fn(&ElementData) -> ElementKind>;

/// Registry of element factories keyed by lowercase tag name.
pub struct ElementRegistry {
    factories: HashMap<String, ElementFactory>,
}

impl ElementRegistry {
    /// Registry with the built-in `style` binding.
    #[must_use]
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register(STYLE_TAG, |_| ElementKind::Stylesheet(Vec::new()));
        registry
    }

    /// Registry without any binding; every tag becomes a generic element.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Bind `tag_name` to `factory`, replacing any previous binding.
    pub fn register<F>(&mut self, tag_name: &str, factory: F)
    where
        F: Fn(&ElementData) -> ElementKind + 'static,
    {
        let _ = self
            .factories
            .insert(tag_name.to_lowercase(), Box::new(factory));
    }

    /// Drop the binding for `tag_name`. Returns whether one existed.
    pub fn unregister(&mut self, tag_name: &str) -> bool {
        self.factories.remove(&tag_name.to_lowercase()).is_some()
    }

    /// Whether `tag_name` has a factory.
    #[must_use]
    pub fn is_registered(&self, tag_name: &str) -> bool {
        self.factories.contains_key(&tag_name.to_lowercase())
    }

    /// The payload a new element with this data gets.
    #[must_use]
    pub fn kind_for(&self, data: &ElementData) -> ElementKind {
        self.factories
            .get(&data.tag_name)
            .map_or(ElementKind::Generic(None), |factory| factory(data))
    }

    /// Allocate a detached element for `tag_name` in `tree`.
    pub fn create(&self, tree: &mut DomTree, tag_name: &str, attrs: AttributesMap) -> NodeId {
        let data = ElementData::new(tag_name, attrs);
        let kind = self.kind_for(&data);
        tree.alloc(data, kind)
    }
}

impl Default for ElementRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ElementRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tags: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        tags.sort_unstable();
        f.debug_struct("ElementRegistry").field("tags", &tags).finish()
    }
}
