//! GraphViz DOT rendering of simplified permission trees
//!
//! Each tree becomes a dashed cluster. Tree nodes render as outlined
//! HTML tables holding the relation and object, set operations render as
//! filled trapezium nodes, and direct subjects collect into one
//! left-aligned list node per tree node. Feed the output to GraphViz:
//!
//! ```text
//! dot -Tpng -o graph.png graph.dot
//! ```

use crate::tree::{SetOperation, SimplifiedTree};

const OPERATION_FILL_COLOR: &str = "#d3d3e3";

/// Rendering options for [`DotBuilder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DotOptions {
    /// Indent nested lines and join lines with newlines. When off, the
    /// whole document comes back as a single line.
    pub pretty: bool,
    /// Spaces per nesting level when `pretty` is set.
    pub indent: usize,
}

impl Default for DotOptions {
    fn default() -> Self {
        Self {
            pretty: true,
            indent: 1,
        }
    }
}

/// Incremental DOT document builder.
///
/// Build one document per render: ids are handed out from a counter
/// starting at 1, in insertion order, and clusters draw from the same
/// counter as nodes. [`finish`](Self::finish) closes the graph and
/// returns the text.
pub struct DotBuilder {
    options: DotOptions,
    next_id: usize,
    level: usize,
    lines: Vec<String>,
}

impl DotBuilder {
    pub fn new(options: DotOptions) -> Self {
        Self {
            options,
            next_id: 1,
            level: 1,
            lines: vec!["digraph G {".to_string()],
        }
    }

    /// Add a dashed cluster wrapping one rendered tree and return the
    /// cluster id.
    pub fn add_cluster(&mut self, label: &str, node: &SimplifiedTree) -> usize {
        let id = self.alloc_id();
        self.push(&format!("subgraph cluster_{id} {{"));
        self.level += 1;
        self.push("style=\"dashed\";");
        self.push(&format!("label=\"{}\";", escape_quoted(label)));
        self.add_node(node, None);
        self.level -= 1;
        self.push("}");
        id
    }

    /// Add a node with a plain quoted label and return its id.
    pub fn add_label_node(&mut self, label: &str, properties: &[(&str, &str)]) -> usize {
        let id = self.alloc_id();
        self.push(&format!(
            "{id} [label=\"{}\"{}];",
            escape_quoted(label),
            format_properties(properties)
        ));
        id
    }

    /// Add a node with an HTML table label and return its id. The shape
    /// is always `plain`; further properties follow it.
    pub fn add_html_node(&mut self, html: &str, properties: &[(&str, &str)]) -> usize {
        let id = self.alloc_id();
        let mut all_properties = vec![("shape", "plain")];
        all_properties.extend_from_slice(properties);
        self.push(&format!(
            "{id} [label=<{html}>{}];",
            format_properties(&all_properties)
        ));
        id
    }

    /// Add a directed edge, optionally labelled.
    pub fn add_edge(&mut self, from: usize, to: usize, label: Option<&str>) {
        match label {
            Some(label) => self.push(&format!(
                "{from} -> {to} [label=\"{}\"];",
                escape_quoted(label)
            )),
            None => self.push(&format!("{from} -> {to};")),
        }
    }

    /// Render one simplified tree node and its descendants, wiring it to
    /// `parent` when given.
    ///
    /// The node itself becomes an outlined two-row table (relation over
    /// object). Children hang off an operator node when the node carries
    /// a set operation, and directly off the node when it does not.
    /// Direct subjects render as a single borderless list node.
    pub fn add_node(&mut self, node: &SimplifiedTree, parent: Option<usize>) {
        let node_id = self.add_html_node(
            &outlined_list_html([node.relation.as_str(), node.object.as_str()], "center"),
            &[("color", "black")],
        );

        if let Some(parent) = parent {
            self.add_edge(parent, node_id, None);
        }

        if !node.children.is_empty() {
            match node.operation {
                Some(operation) => {
                    let shape = if operation == SetOperation::Union {
                        "trapezium"
                    } else {
                        "invtrapezium"
                    };
                    let operation_id = self.add_label_node(
                        operation.label(),
                        &[
                            ("shape", shape),
                            ("fillcolor", OPERATION_FILL_COLOR),
                            ("color", OPERATION_FILL_COLOR),
                            ("style", "filled"),
                        ],
                    );
                    self.add_edge(node_id, operation_id, None);
                    for child in &node.children {
                        self.add_node(child, Some(operation_id));
                    }
                }
                None => {
                    for child in &node.children {
                        self.add_node(child, Some(node_id));
                    }
                }
            }
        }

        if !node.subjects.is_empty() {
            let subject_list_id = self.add_html_node(
                &outlined_list_html(node.subjects.iter().map(String::as_str), "left"),
                &[("color", "none")],
            );
            self.add_edge(node_id, subject_list_id, None);
        }
    }

    /// Close the graph and return the document text.
    pub fn finish(mut self) -> String {
        self.level -= 1;
        self.push("}");
        let separator = if self.options.pretty { "\n" } else { "" };
        self.lines.join(separator)
    }

    fn alloc_id(&mut self) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn push(&mut self, line: &str) {
        if self.options.pretty {
            let mut indented = " ".repeat(self.level * self.options.indent);
            indented.push_str(line);
            self.lines.push(indented);
        } else {
            self.lines.push(line.to_string());
        }
    }
}

/// Render simplified trees as one DOT document, one dashed cluster per
/// tree. Identical trees and options produce byte-identical output.
pub fn render_dot(trees: &[SimplifiedTree], options: DotOptions) -> String {
    let mut builder = DotBuilder::new(options);
    for tree in trees {
        builder.add_cluster("", tree);
    }
    builder.finish()
}

/// Format node properties as `, key="value"` pairs, in slice order.
fn format_properties(properties: &[(&str, &str)]) -> String {
    properties
        .iter()
        .map(|(key, value)| format!(", {key}=\"{value}\""))
        .collect()
}

/// An outlined table (centered, padded, bordered cell) wrapping an inner
/// borderless table with one row per entry.
fn outlined_list_html<'a, I>(rows: I, align: &str) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut inner =
        String::from("<table border=\"0\" cellspacing=\"0\" cellpadding=\"1\" cellborder=\"0\">");
    for row in rows {
        inner.push_str(&format!(
            "<tr><td align=\"{align}\">{}</td></tr>",
            escape_html(row)
        ));
    }
    inner.push_str("</table>");
    format!(
        "<table border=\"0\" cellspacing=\"0\" cellpadding=\"4\" cellborder=\"1\"><tr><td align=\"center\">{inner}</td></tr></table>"
    )
}

/// Escape text for a double-quoted DOT string.
fn escape_quoted(text: &str) -> String {
    text.replace('"', "\\\"")
}

/// Escape text for a DOT HTML table cell.
fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
