//! Tree-wide lookups by id, tag name and class.
//!
//! Every lookup walks the subtree depth-first in document order using an
//! explicit stack, so deeply nested input cannot overflow the call stack.

use crate::{DomTree, NodeId};

/// Pre-order iterator over the descendants of a node, the node itself excluded.
pub struct DescendantIterator<'a> {
    tree: &'a DomTree,
    stack: Vec<NodeId>,
}

impl Iterator for DescendantIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tree.children(id).iter().rev().copied());
        Some(id)
    }
}

impl DomTree {
    /// Iterate over all descendants of `id` in document order.
    #[must_use]
    pub fn descendants(&self, id: NodeId) -> DescendantIterator<'_> {
        DescendantIterator {
            tree: self,
            stack: self.children(id).iter().rev().copied().collect(),
        }
    }

    /// First node, starting with `from` itself, whose `id` attribute equals
    /// `id`.
    ///
    /// The attribute is resolved with inheritance, like
    /// [`DomTree::attribute`].
    #[must_use]
    pub fn find_by_id(&self, from: NodeId, id: &str) -> Option<NodeId> {
        std::iter::once(from)
            .filter(|&node| self.get(node).is_some())
            .chain(self.descendants(from))
            .find(|&node| self.id_attribute(node) == Some(id))
    }

    /// All descendants of `from` with this tag name.
    ///
    /// Tag names are stored lowercase; the comparison ignores ASCII case, so
    /// `"P"` finds `<p>` elements.
    #[must_use]
    pub fn find_all_by_tag_name(&self, from: NodeId, tag_name: &str) -> Vec<NodeId> {
        self.descendants(from)
            .filter(|&node| {
                self.tag_name(node)
                    .is_some_and(|tag| tag.eq_ignore_ascii_case(tag_name))
            })
            .collect()
    }

    /// All descendants of `from` listing `class` in their class attribute,
    /// inheritance included.
    #[must_use]
    pub fn find_all_by_class_name(&self, from: NodeId, class: &str) -> Vec<NodeId> {
        self.descendants(from)
            .filter(|&node| self.has_class(node, class))
            .collect()
    }
}
