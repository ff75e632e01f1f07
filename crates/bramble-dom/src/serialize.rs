//! Rendering a subtree back to markup text.
//!
//! Output shape, with the default two-space step:
//!
//! ```text
//! <div class="box">
//!   <p>
//!     Hello !
//!   </p>
//!   <br />
//!   <style>
//!     .red {
//!       color: red;
//!     }
//!   </style>
//! </div>
//! ```
//!
//! Attributes are written in name order. Parsing the output again yields the
//! same tags, attributes, content and shape.

use bramble_css::{DEFAULT_INDENT_STEP, serialize_rules};

use crate::{DomTree, ElementData, ElementKind, NodeId};

/// Formatting options for [`DomTree::serialize_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SerializeOptions {
    /// Spaces added per nesting level.
    pub indent_step: usize,
}

impl Default for SerializeOptions {
    fn default() -> Self {
        Self {
            indent_step: DEFAULT_INDENT_STEP,
        }
    }
}

impl DomTree {
    /// Serialize the subtree at `id` with default options.
    #[must_use]
    pub fn serialize(&self, id: NodeId) -> String {
        self.serialize_with(id, 0, SerializeOptions::default())
    }

    /// Serialize the subtree at `id`, starting at `indent` spaces.
    #[must_use]
    pub fn serialize_with(&self, id: NodeId, indent: usize, options: SerializeOptions) -> String {
        let mut out = String::new();
        self.write_node(&mut out, id, indent, options.indent_step);
        out
    }

    fn write_node(&self, out: &mut String, id: NodeId, indent: usize, step: usize) {
        let Some(node) = self.get(id) else { return };
        let pad = " ".repeat(indent);

        if let ElementKind::Stylesheet(rules) = &node.kind {
            write_open_tag(out, &pad, &node.data, "");
            out.push_str(&serialize_rules(rules, indent + step, step));
            write_close_tag(out, &pad, &node.data.tag_name);
            return;
        }

        let content = node.kind.content().filter(|c| !c.trim().is_empty());
        if let Some(content) = content {
            write_open_tag(out, &pad, &node.data, "");
            let inner = " ".repeat(indent + step);
            for line in content.lines() {
                out.push_str(&inner);
                out.push_str(line.trim());
                out.push('\n');
            }
            write_close_tag(out, &pad, &node.data.tag_name);
        } else if node.children.is_empty() {
            write_open_tag(out, &pad, &node.data, " /");
        } else {
            write_open_tag(out, &pad, &node.data, "");
            for &child in &node.children {
                self.write_node(out, child, indent + step, step);
            }
            write_close_tag(out, &pad, &node.data.tag_name);
        }
    }
}

fn write_open_tag(out: &mut String, pad: &str, data: &ElementData, suffix: &str) {
    out.push_str(pad);
    out.push('<');
    out.push_str(&data.tag_name);

    let mut attrs: Vec<(&String, &String)> = data.attrs.iter().collect();
    attrs.sort_unstable();
    for (name, value) in attrs {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        out.push_str(value);
        out.push('"');
    }

    out.push_str(suffix);
    out.push_str(">\n");
}

fn write_close_tag(out: &mut String, pad: &str, tag_name: &str) {
    out.push_str(pad);
    out.push_str("</");
    out.push_str(tag_name);
    out.push_str(">\n");
}
