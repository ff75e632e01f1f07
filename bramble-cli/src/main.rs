//! Bramble CLI
//!
//! Parses a markup document and prints the tree, its stylesheet rules,
//! query results and any tolerated parse issues.

use std::path::PathBuf;

use anyhow::Context;
use bramble_common::{read_file, set_quiet};
use bramble_dom::{DomTree, NodeId, SerializeOptions};
use bramble_markup::{MarkupParser, ParseIssue};
use clap::Parser;
use owo_colors::OwoColorize;
use serde_json::{Map, Value, json};

/// Bramble: parse line-oriented markup with embedded stylesheets
#[derive(Parser, Debug)]
#[command(name = "bramble")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Print the parsed tree of a file
    bramble page.xml

    # Parse an inline string
    bramble --markup '<div><text>Hello !</text></div>'

    # Dump the tree as JSON
    bramble --json page.xml

    # Query by class, indenting output by four spaces
    bramble --find-class note --indent 4 page.xml
"#)]
struct Cli {
    /// Path to the markup file
    #[arg(value_name = "FILE")]
    path: Option<PathBuf>,

    /// Parse a markup string directly instead of a file
    #[arg(long, value_name = "MARKUP", conflicts_with = "path")]
    markup: Option<String>,

    /// Print the tree as JSON instead of markup
    #[arg(long)]
    json: bool,

    /// Print the rules of every stylesheet element
    #[arg(long)]
    rules: bool,

    /// Spaces per nesting level in serialized output
    #[arg(long, default_value = "2")]
    indent: usize,

    /// Print the element with this id
    #[arg(long, value_name = "ID")]
    find_id: Option<String>,

    /// Print every element with this tag name
    #[arg(long, value_name = "TAG")]
    find_tag: Option<String>,

    /// Print every element carrying this class
    #[arg(long, value_name = "CLASS")]
    find_class: Option<String>,

    /// Fail on the first tolerated anomaly instead of recovering
    #[arg(long)]
    strict: bool,

    /// Suppress warnings on stderr
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    set_quiet(cli.quiet);

    let text = load_text(&cli)?;
    let (tree, issues) = if cli.strict {
        let parser = MarkupParser::new().with_strict_mode();
        (parser.try_parse(&text)?, Vec::new())
    } else {
        MarkupParser::new().parse_with_issues(&text)
    };

    let Some(root) = tree.root() else {
        println!("{}", "No root element found".yellow());
        print_issues(&issues);
        return Ok(());
    };
    let options = SerializeOptions {
        indent_step: cli.indent,
    };

    if cli.json {
        let value = node_to_json(&tree, root)?;
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    let queried = cli.find_id.is_some() || cli.find_tag.is_some() || cli.find_class.is_some();
    if queried {
        if let Some(ref id) = cli.find_id {
            let found: Vec<NodeId> = tree.find_by_id(root, id).into_iter().collect();
            print_matches(&tree, &format!("#{id}"), &found, options);
        }
        if let Some(ref tag) = cli.find_tag {
            print_matches(&tree, tag, &tree.find_all_by_tag_name(root, tag), options);
        }
        if let Some(ref class) = cli.find_class {
            let found = tree.find_all_by_class_name(root, class);
            print_matches(&tree, &format!(".{class}"), &found, options);
        }
    } else {
        println!("{}", "=== DOM Tree ===".bold());
        println!("{}", tree.serialize_with(root, 0, options));
    }

    if cli.rules {
        print_rules(&tree, root, options);
    }
    print_issues(&issues);

    Ok(())
}

/// Read the document from `--markup` or the positional path
fn load_text(cli: &Cli) -> anyhow::Result<String> {
    if let Some(ref markup) = cli.markup {
        Ok(markup.clone())
    } else if let Some(ref path) = cli.path {
        read_file(path).with_context(|| format!("failed to load {}", path.display()))
    } else {
        anyhow::bail!("No input provided. Pass a file path or --markup '<div>...</div>'")
    }
}

fn print_matches(tree: &DomTree, label: &str, found: &[NodeId], options: SerializeOptions) {
    println!(
        "{} {}",
        format!("=== Matches for {label} ===").bold(),
        format!("({})", found.len()).dimmed()
    );
    for &id in found {
        println!("{}", tree.serialize_with(id, 0, options));
    }
}

fn print_rules(tree: &DomTree, root: NodeId, options: SerializeOptions) {
    println!("\n{}", "=== Stylesheet Rules ===".bold());
    let mut out = String::new();
    let mut count = 0;
    for id in std::iter::once(root).chain(tree.descendants(root)) {
        for rule in tree.rules(id).unwrap_or_default() {
            rule.write_css(&mut out, 0, options.indent_step);
            count += 1;
        }
    }
    print!("{out}");
    println!("{}", format!("{count} rules").dimmed());
}

fn print_issues(issues: &[ParseIssue]) {
    if issues.is_empty() {
        return;
    }
    println!("\n{}", "=== Parse Issues ===".bold());
    for issue in issues {
        println!("  - {}", issue.yellow());
    }
}

/// Convert a subtree to a JSON value with tag, attributes, content and children
fn node_to_json(tree: &DomTree, id: NodeId) -> anyhow::Result<Value> {
    let Some(data) = tree.element(id) else {
        return Ok(Value::Null);
    };

    let mut attrs: Vec<(&String, &String)> = data.attrs.iter().collect();
    attrs.sort();
    let attributes: Map<String, Value> = attrs
        .into_iter()
        .map(|(k, v)| (k.clone(), Value::String(v.clone())))
        .collect();

    let children = tree
        .children(id)
        .iter()
        .map(|&child| node_to_json(tree, child))
        .collect::<anyhow::Result<Vec<_>>>()?;

    let mut value = json!({
        "tagName": data.tag_name,
        "attributes": attributes,
        "content": tree.content(id),
        "children": children,
    });
    if let Some(rules) = tree.rules(id) {
        value["rules"] = serde_json::to_value(rules)?;
    }
    Ok(value)
}
