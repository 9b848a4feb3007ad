//! Starlark parser using tree-sitter-starlark

use crate::error::{Error, Result};
use std::path::Path;
use tree_sitter::{Node, Parser, Tree};

/// Parser for BUILD, WORKSPACE and .bzl files
pub struct StarlarkParser {
    parser: Parser,
}

impl StarlarkParser {
    /// Create a new Starlark parser
    pub fn new() -> Result<Self> {
        let mut parser = Parser::new();
        let language = tree_sitter_starlark::LANGUAGE;
        parser
            .set_language(&language.into())
            .map_err(|e| Error::TreeSitterError(format!("Failed to set Starlark language: {}", e)))?;

        Ok(Self { parser })
    }

    /// Parse declaration file content into an AST
    pub fn parse_build_file(&mut self, content: &str) -> Result<StarlarkAst> {
        let tree = self
            .parser
            .parse(content, None)
            .ok_or_else(|| Error::ParseError("Failed to parse BUILD file".to_string()))?;

        if tree.root_node().has_error() {
            let line = first_error_line(tree.root_node()).unwrap_or(1);
            return Err(Error::ParseError(format!(
                "BUILD file contains syntax errors near line {line}"
            )));
        }

        Ok(StarlarkAst {
            tree,
            source: content.to_string(),
        })
    }

    /// Read and parse a file, attributing failures to its path
    pub fn parse_file(&mut self, path: &Path) -> Result<StarlarkAst> {
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => Error::FileNotFound(path.to_path_buf()),
            _ => Error::IoError(e),
        })?;
        self.parse_build_file(&content).map_err(|e| match e {
            Error::ParseError(msg) => Error::ParseError(format!("{}: {msg}", path.display())),
            other => other,
        })
    }
}

fn first_error_line(node: Node) -> Option<usize> {
    if node.is_error() || node.is_missing() {
        return Some(node.start_position().row + 1);
    }
    let mut cursor = node.walk();
    let children: Vec<Node> = node.children(&mut cursor).collect();
    children
        .into_iter()
        .filter(|child| child.has_error())
        .find_map(first_error_line)
}

/// Parsed Starlark AST
pub struct StarlarkAst {
    pub tree: Tree,
    pub source: String,
}

impl StarlarkAst {
    /// Get the root node of the AST
    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    /// Get a slice of the source code for a node
    pub fn node_text<'a>(&'a self, node: &Node) -> &'a str {
        node.utf8_text(self.source.as_bytes()).unwrap_or("")
    }
}
