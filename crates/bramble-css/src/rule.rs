//! The stylesheet rule model.

use std::fmt;

use serde::Serialize;

use crate::DEFAULT_INDENT_STEP;

/// One `name: value` pair inside a rule block.
///
/// Both halves are kept exactly as they appeared in the source, minus
/// whitespace (which the parser strips).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Declaration {
    /// The property name.
    pub name: String,
    /// The raw, untyped property value.
    pub value: String,
}

/// A stylesheet rule: selectors plus declarations.
///
/// Selectors behave as a set and declarations as a map keyed by property
/// name. Both keep first-insertion order so serialized text follows the
/// source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StyleRule {
    selectors: Vec<String>,
    declarations: Vec<Declaration>,
}

impl StyleRule {
    /// Create an empty rule.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a rule from selectors and `(name, value)` pairs.
    ///
    /// Duplicate selectors collapse; a repeated property keeps its last value.
    pub fn from_parts<S, P, N, V>(selectors: S, properties: P) -> Self
    where
        S: IntoIterator,
        S::Item: Into<String>,
        P: IntoIterator<Item = (N, V)>,
        N: Into<String>,
        V: Into<String>,
    {
        let mut rule = Self::new();
        for selector in selectors {
            rule.add_selector(selector);
        }
        for (name, value) in properties {
            rule.set_property(name, value);
        }
        rule
    }

    /// The raw selector strings.
    #[must_use]
    pub fn selectors(&self) -> &[String] {
        &self.selectors
    }

    /// Add a selector unless it is already present.
    pub fn add_selector(&mut self, selector: impl Into<String>) {
        let selector = selector.into();
        if !self.has_selector(&selector) {
            self.selectors.push(selector);
        }
    }

    /// Whether the rule lists exactly this selector string.
    #[must_use]
    pub fn has_selector(&self, selector: &str) -> bool {
        self.selectors.iter().any(|s| s == selector)
    }

    /// Whether the rule lists the class selector `.class`.
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.selectors
            .iter()
            .any(|s| s.strip_prefix('.') == Some(class))
    }

    /// The declarations in first-insertion order.
    #[must_use]
    pub fn properties(&self) -> &[Declaration] {
        &self.declarations
    }

    /// Whether a value is set for `name`.
    #[must_use]
    pub fn has_property(&self, name: &str) -> bool {
        self.property_value(name).is_some()
    }

    /// Alias of [`StyleRule::has_property`].
    #[must_use]
    pub fn has_style(&self, name: &str) -> bool {
        self.has_property(name)
    }

    /// The raw value set for `name`.
    #[must_use]
    pub fn property_value(&self, name: &str) -> Option<&str> {
        self.declarations
            .iter()
            .find(|d| d.name == name)
            .map(|d| d.value.as_str())
    }

    /// Set a property. An existing value for the same name is replaced in place.
    pub fn set_property(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.declarations.iter_mut().find(|d| d.name == name) {
            Some(existing) => existing.value = value,
            None => self.declarations.push(Declaration { name, value }),
        }
    }

    /// Remove a property, returning its value.
    pub fn remove_property(&mut self, name: &str) -> Option<String> {
        let index = self.declarations.iter().position(|d| d.name == name)?;
        Some(self.declarations.remove(index).value)
    }

    /// Render the rule with its selector line at `indent` spaces and each
    /// declaration one `step` deeper.
    pub fn write_css(&self, out: &mut String, indent: usize, step: usize) {
        let pad = " ".repeat(indent);
        let inner = " ".repeat(indent + step);

        out.push_str(&pad);
        out.push_str(&self.selectors.join(", "));
        out.push_str(" {\n");
        for declaration in &self.declarations {
            out.push_str(&inner);
            out.push_str(&declaration.name);
            out.push_str(": ");
            out.push_str(&declaration.value);
            out.push_str(";\n");
        }
        out.push_str(&pad);
        out.push_str("}\n");
    }

    /// Render the rule at `indent` spaces using the default step.
    #[must_use]
    pub fn to_css_string(&self, indent: usize) -> String {
        let mut out = String::new();
        self.write_css(&mut out, indent, DEFAULT_INDENT_STEP);
        out
    }
}

impl fmt::Display for StyleRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css_string(0))
    }
}
