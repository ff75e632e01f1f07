//! Integration tests for the markup tree builder.

use std::any::Any;

use bramble_common::warning::has_warned;
use bramble_dom::{CustomElement, DomTree, ElementKind, NodeId};
use bramble_markup::{IssueKind, MarkupError, MarkupParser, parse, parse_reader};

/// Helper to parse markup and return the tree with its root
fn parse_root(markup: &str) -> (DomTree, NodeId) {
    let tree = parse(markup);
    let root = tree.root().expect("markup should produce a root");
    (tree, root)
}

/// Helper to get the content of the nodes as owned strings
fn contents(tree: &DomTree, ids: &[NodeId]) -> Vec<String> {
    ids.iter()
        .map(|&id| tree.content(id).unwrap_or_default())
        .collect()
}

/// A caller-defined element used to check that registrations take effect.
#[derive(Debug, Clone, Default)]
struct Panel {
    body: Option<String>,
}

impl CustomElement for Panel {
    fn content(&self) -> Option<String> {
        self.body.clone()
    }

    fn set_content(&mut self, content: Option<&str>) {
        self.body = content.map(str::to_string);
    }

    fn clone_box(&self) -> Box<dyn CustomElement> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[test]
fn test_simple_parsing() {
    let (tree, root) = parse_root("<div><text>Hello !</text></div>");
    assert_eq!(tree.tag_name(root), Some("div"));
    assert_eq!(tree.children(root).len(), 1);

    let text = tree.child(root, 0).unwrap();
    assert_eq!(tree.tag_name(text), Some("text"));
    assert_eq!(tree.content(text).as_deref(), Some("Hello !"));
    assert_eq!(tree.content(root), None);
}

#[test]
fn test_multiline_document() {
    let markup = "\
<div>
    <text>
        Hello !
    </text>
</div>
";
    let (tree, root) = parse_root(markup);
    assert_eq!(tree.children(root).len(), 1);
    assert_eq!(
        tree.content(tree.child(root, 0).unwrap()).as_deref(),
        Some("Hello !")
    );
}

#[test]
fn test_find_all_by_class_name() {
    let markup = "<div>\
        <p class=\"test2\">test2</p>\
        <p class=\"test test2 test3\">test test2 test3</p>\
        <p></p>\
        <p class=\"test test2\">test test2</p>\
        <p class=\"test2\">test2!!</p>\
        <p class=\"test\">test</p>\
    </div>";
    let (tree, root) = parse_root(markup);
    assert_eq!(tree.children(root).len(), 6);

    let test2 = tree.find_all_by_class_name(root, "test2");
    assert_eq!(
        contents(&tree, &test2),
        vec!["test2", "test test2 test3", "test test2", "test2!!"]
    );

    let test = tree.find_all_by_class_name(root, "test");
    assert_eq!(
        contents(&tree, &test),
        vec!["test test2 test3", "test test2", "test"]
    );
}

#[test]
fn test_style_element_gets_rules() {
    let (tree, root) = parse_root("<head><style>.red {color: red;}</style></head>");
    let style = tree.find_all_by_tag_name(root, "style")[0];

    assert!(tree.is_stylesheet(style));
    let rules = tree.rules(style).unwrap();
    assert_eq!(rules.len(), 1);
    assert!(rules[0].has_selector(".red"));
    assert_eq!(rules[0].property_value("color"), Some("red"));
}

#[test]
fn test_multiline_style_element() {
    let markup = "\
<html>
  <style type=\"text/css\">
    h1, h2 {
      margin: 0;
      color: blue;
    }
    .note { font-weight: bold }
  </style>
</html>
";
    let (tree, root) = parse_root(markup);
    let style = tree.child(root, 0).unwrap();
    assert_eq!(tree.attribute(style, "type"), Some("text/css"));

    let rules = tree.rules(style).unwrap();
    assert_eq!(rules.len(), 2);
    assert_eq!(rules[0].selectors(), &["h1".to_string(), "h2".to_string()]);
    assert_eq!(rules[0].property_value("color"), Some("blue"));
    assert!(rules[1].has_class("note"));
}

#[test]
fn test_uppercase_style_tag_is_stylesheet() {
    let (tree, root) = parse_root("<div><STYLE>p { a: b; }</STYLE></div>");
    let style = tree.child(root, 0).unwrap();
    assert_eq!(tree.tag_name(style), Some("style"));
    assert!(tree.is_stylesheet(style));
}

#[test]
fn test_custom_factory_for_div() {
    let parser = MarkupParser::new().with("div", |_| ElementKind::Custom(Box::new(Panel::default())));
    let tree = parser.parse("<div id=\"dv\"></div>");
    let root = tree.root().unwrap();

    let dv = tree.find_by_id(root, "dv").unwrap();
    assert!(tree.custom::<Panel>(dv).is_some());
}

#[test]
fn test_custom_factory_receives_content() {
    let parser = MarkupParser::new().set("panel", |_| ElementKind::Custom(Box::new(Panel::default())));
    let tree = parser.parse("<root><panel>inside</panel></root>");
    let root = tree.root().unwrap();
    let panel = tree.child(root, 0).unwrap();
    assert_eq!(tree.custom::<Panel>(panel).unwrap().body.as_deref(), Some("inside"));
}

#[test]
fn test_style_can_be_overridden() {
    let parser = MarkupParser::new().with("style", |_| ElementKind::Generic(None));
    let tree = parser.parse("<style>.a { b: c; }</style>");
    let root = tree.root().unwrap();
    assert!(!tree.is_stylesheet(root));
    assert_eq!(tree.content(root).as_deref(), Some(".a { b: c; }"));
}

#[test]
fn test_attribute_inheritance() {
    let (tree, root) = parse_root("<html lang=\"fr\"><body><p>Bonjour</p></body></html>");
    let p = tree.find_all_by_tag_name(root, "p")[0];
    assert_eq!(tree.attribute(p, "lang"), Some("fr"));
    assert_eq!(tree.attribute(p, "dir"), None);
}

#[test]
fn test_class_is_inherited() {
    let (tree, root) = parse_root("<div class=\"x\"><p>t</p></div>");
    let p = tree.child(root, 0).unwrap();
    assert_eq!(tree.class_string(p), "x");
    assert_eq!(tree.classes(p), vec!["x"]);
    assert_eq!(tree.find_all_by_class_name(root, "x"), vec![p]);
}

#[test]
fn test_self_closing_tags() {
    let (tree, root) = parse_root("<div><br/><img src=\"a.png\" /><p>after</p></div>");
    let tags: Vec<&str> = tree
        .children(root)
        .iter()
        .filter_map(|&id| tree.tag_name(id))
        .collect();
    assert_eq!(tags, vec!["br", "img", "p"]);

    let img = tree.child(root, 1).unwrap();
    assert_eq!(tree.attribute(img, "src"), Some("a.png"));
    assert!(!tree.has_children(img));
}

#[test]
fn test_slash_in_attribute_value_is_not_self_closing() {
    let (tree, root) = parse_root("<div><a href=\"/x/y\">link</a><span class=\"a/b\">s</span></div>");
    assert_eq!(tree.children(root).len(), 2);
    let span = tree.child(root, 1).unwrap();
    assert_eq!(tree.class_string(span), "a/b");
    assert_eq!(tree.content(span).as_deref(), Some("s"));
}

#[test]
fn test_tag_spanning_lines() {
    let markup = "<div\n  class=\"wide\"\n  title=\"two\nlines\">body</div>";
    let (tree, root) = parse_root(markup);
    assert_eq!(tree.class_string(root), "wide");
    assert_eq!(tree.attribute(root, "title"), Some("two lines"));
    assert_eq!(tree.content(root).as_deref(), Some("body"));
}

#[test]
fn test_multiline_text_joined_with_newlines() {
    let (tree, root) = parse_root("<pre>\n  first\n\n  second  \n</pre>");
    assert_eq!(tree.content(root).as_deref(), Some("first\nsecond"));
}

#[test]
fn test_text_before_child_is_discarded() {
    // Text is only kept when an end tag follows it directly.
    let (tree, root) = parse_root("<div>intro<p>x</p>outro</div>");
    assert_eq!(tree.content(root).as_deref(), Some("outro"));
    assert_eq!(tree.children(root).len(), 1);
}

#[test]
fn test_attribute_last_write_wins() {
    let (tree, root) = parse_root("<p id=\"a\" id=\"b\">x</p>");
    assert_eq!(tree.attribute(root, "id"), Some("b"));
}

#[test]
fn test_end_tags_are_not_matched() {
    let (tree, issues) = MarkupParser::new().parse_with_issues("<a><b>x</c></d>");
    let root = tree.root().unwrap();
    assert_eq!(tree.tag_name(root), Some("a"));
    assert_eq!(tree.content(tree.child(root, 0).unwrap()).as_deref(), Some("x"));
    assert_eq!(
        issues.iter().filter(|i| i.kind == IssueKind::MismatchedEndTag).count(),
        2
    );
}

#[test]
fn test_content_after_root_is_ignored() {
    let (tree, issues) = MarkupParser::new().parse_with_issues("<a>x</a><b>y</b>");
    let root = tree.root().unwrap();
    assert_eq!(tree.tag_name(root), Some("a"));
    assert_eq!(tree.len(), 1);
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].kind, IssueKind::TrailingContent);
}

#[test]
fn test_no_tags_gives_no_root() {
    let (tree, issues) = MarkupParser::new().parse_with_issues("just text");
    assert_eq!(tree.root(), None);
    assert!(tree.is_empty());
    assert_eq!(issues[0].kind, IssueKind::StrayText);

    assert_eq!(parse("").root(), None);
}

#[test]
fn test_stray_end_tag_is_skipped() {
    let (tree, issues) = MarkupParser::new().parse_with_issues("</x><a>y</a>");
    let root = tree.root().unwrap();
    assert_eq!(tree.tag_name(root), Some("a"));
    assert_eq!(issues[0].kind, IssueKind::StrayEndTag);
}

#[test]
fn test_unclosed_input_returns_current_element() {
    let (tree, issues) = MarkupParser::new().parse_with_issues("<a><b><c>text");
    let root = tree.root().unwrap();
    assert_eq!(tree.tag_name(root), Some("c"));
    assert_eq!(tree.ancestors(root).count(), 2);
    assert_eq!(issues.last().unwrap().kind, IssueKind::UnclosedElements);
}

#[test]
fn test_self_closing_root_is_clean() {
    let (tree, issues) = MarkupParser::new().parse_with_issues("<br />");
    assert_eq!(tree.tag_name(tree.root().unwrap()), Some("br"));
    assert!(issues.is_empty());
}

#[test]
fn test_empty_tag_name_is_skipped() {
    let (tree, issues) = MarkupParser::new().parse_with_issues("<a><>x</a>");
    assert_eq!(tree.content(tree.root().unwrap()).as_deref(), Some("x"));
    assert_eq!(issues[0].kind, IssueKind::EmptyTagName);
}

#[test]
fn test_unterminated_tag_at_end_of_input() {
    let (tree, issues) = MarkupParser::new().parse_with_issues("<a>x</a");
    let root = tree.root().unwrap();
    assert_eq!(tree.tag_name(root), Some("a"));
    assert_eq!(issues[0].kind, IssueKind::UnterminatedTag);
}

#[test]
fn test_strict_mode_rejects_anomalies() {
    let parser = MarkupParser::new().with_strict_mode();
    assert!(parser.try_parse("<a><b>ok</b></a>").is_ok());

    match parser.try_parse("<a><b>x</c></a>") {
        Err(MarkupError::Malformed { first, count }) => {
            assert_eq!(first.kind, IssueKind::MismatchedEndTag);
            assert_eq!(count, 1);
        }
        other => panic!("Expected Malformed error, got {other:?}"),
    }

    // Non-strict parsers never fail.
    assert!(MarkupParser::new().try_parse("<a><b>x</c></a>").is_ok());
}

#[test]
fn test_parse_reader() {
    let tree = parse_reader("<div>\r\n<p id=\"x\">hi</p>\r\n</div>".as_bytes()).unwrap();
    let root = tree.root().unwrap();
    let p = tree.find_by_id(root, "x").unwrap();
    assert_eq!(tree.content(p).as_deref(), Some("hi"));
}

#[test]
fn test_parse_reader_invalid_utf8() {
    let bytes: &[u8] = &[b'<', b'a', b'>', 0xff, b'<', b'/', b'a', b'>'];
    assert!(matches!(parse_reader(bytes), Err(MarkupError::Source(_))));
}

#[test]
fn test_each_parse_starts_with_fresh_warnings() {
    let parser = MarkupParser::new();
    let (_, issues) = parser.parse_with_issues("qz7 loose words<a>x</a>");
    assert_eq!(issues[0].kind, IssueKind::StrayText);
    let message = issues[0].message.clone();

    let _ = parser.parse_with_issues("<a>clean</a>");
    assert!(!has_warned("Markup Parser", &message));
}
