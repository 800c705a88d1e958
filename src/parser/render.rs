//! Box-drawing tree renderer
//!
//! One line per node, depth-first pre-order. A child's first line is
//! prefixed with `├` (or `└` for the last child), its remaining lines with
//! `│` (or a blank for the last child), then a space.

use super::ast::{AstNode, NodeRef, SourceLocation, StmtList};

#[cfg(windows)]
pub const LINE_ENDING: &str = "\r\n";
#[cfg(not(windows))]
pub const LINE_ENDING: &str = "\n";

/// One rendered line and the position of the node it depicts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeRow {
    pub text: String,
    pub location: Option<SourceLocation>,
    pub depth: usize,
}

/// `label` or `label : annotation`
pub fn node_line(node: &NodeRef<'_>) -> String {
    match node.annotation() {
        Some(annotation) => format!("{} : {}", node.label(), annotation),
        None => node.label(),
    }
}

pub fn render_rows(node: &NodeRef<'_>) -> Vec<TreeRow> {
    let mut rows = Vec::new();
    push_rows(node, 0, &mut rows);
    rows
}

fn push_rows(node: &NodeRef<'_>, depth: usize, rows: &mut Vec<TreeRow>) {
    rows.push(TreeRow {
        text: node_line(node),
        location: node.location(),
        depth,
    });

    let children = node.children();
    let last = children.len().saturating_sub(1);
    for (i, child) in children.iter().enumerate() {
        let (corner, continuation) = if i == last { ('└', ' ') } else { ('├', '│') };
        let first = rows.len();
        push_rows(child, depth + 1, rows);
        for (j, row) in rows[first..].iter_mut().enumerate() {
            let prefix = if j == 0 { corner } else { continuation };
            row.text = format!("{} {}", prefix, row.text);
        }
    }
}

/// Rendered lines of the tree rooted at `node`
pub fn tree(node: &NodeRef<'_>) -> Vec<String> {
    render_rows(node).into_iter().map(|row| row.text).collect()
}

/// Rendered tree joined with the platform line ending
pub fn render_text(node: &NodeRef<'_>) -> String {
    tree(node).join(LINE_ENDING)
}

impl AstNode {
    pub fn tree(&self) -> Vec<String> {
        tree(&self.as_node_ref())
    }
}

impl StmtList {
    pub fn tree(&self) -> Vec<String> {
        tree(&NodeRef::StmtList(self))
    }

    pub fn render_text(&self) -> String {
        render_text(&NodeRef::StmtList(self))
    }
}
