//! Statement-by-statement evaluation of BUILD, WORKSPACE and .bzl files

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tree_sitter::Node;

use super::label::resolve_load_path;
use super::rules::{Dialect, RuleRegistry};
use super::starlark_parser::{StarlarkAst, StarlarkParser};
use super::value::{RuleInvocation, Value};
use crate::config::ConverterConfig;
use crate::converter::DirectoryRecord;
use crate::error::{Error, Result};

/// Names bound in one context: assignments, `def`s and everything imported by `load()`
pub type Namespace = HashMap<String, Value>;

/// Functions available in every context regardless of dialect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Builtin {
    Load,
    Glob,
    Select,
    MapDep,
    Licenses,
}

impl Builtin {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "load" => Some(Builtin::Load),
            "glob" => Some(Builtin::Glob),
            "select" => Some(Builtin::Select),
            "map_dep" => Some(Builtin::MapDep),
            "licenses" => Some(Builtin::Licenses),
            _ => None,
        }
    }
}

/// Evaluation namespace for a single file.
///
/// A context is created per evaluated file. BUILD contexts dispatch rule calls to the
/// registry and append the output to the record passed to [`Context::evaluate`];
/// module contexts (files reached through `load()`) only bind names, which the caller
/// imports through [`Context::into_exports`]. Names bound in the namespace shadow both
/// builtins and rules, for this context only.
pub struct Context<'a> {
    registry: Option<&'a RuleRegistry>,
    config: &'a ConverterConfig,
    root: &'a Path,
    file: PathBuf,
    package_dir: PathBuf,
    namespace: Namespace,
    /// Files currently being loaded above this one
    loading: Vec<PathBuf>,
}

impl<'a> Context<'a> {
    /// Context for a BUILD or WORKSPACE file, dispatching to `registry`
    pub fn new(
        registry: &'a RuleRegistry,
        config: &'a ConverterConfig,
        root: &'a Path,
        file: &Path,
    ) -> Self {
        Self::with_registry(Some(registry), config, root, file, Vec::new())
    }

    /// Context for a file reached through `load()`: no rules, only bindings
    pub fn module(
        config: &'a ConverterConfig,
        root: &'a Path,
        file: &Path,
        loading: Vec<PathBuf>,
    ) -> Self {
        Self::with_registry(None, config, root, file, loading)
    }

    fn with_registry(
        registry: Option<&'a RuleRegistry>,
        config: &'a ConverterConfig,
        root: &'a Path,
        file: &Path,
        loading: Vec<PathBuf>,
    ) -> Self {
        let package_dir = file.parent().unwrap_or(root).to_path_buf();
        Self {
            registry,
            config,
            root,
            file: file.to_path_buf(),
            package_dir,
            namespace: Namespace::new(),
            loading,
        }
    }

    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    /// Merge names exported by a loaded file into this context
    pub fn import(&mut self, exports: Namespace) {
        self.namespace.extend(exports);
    }

    /// Everything this context bound, for the file that loaded it
    pub fn into_exports(self) -> Namespace {
        self.namespace
    }

    /// Parse and evaluate this context's file
    pub fn evaluate_file(
        &mut self,
        parser: &mut StarlarkParser,
        out: &mut DirectoryRecord,
    ) -> Result<()> {
        tracing::debug!("Evaluating {:?}", self.file);
        let ast = parser.parse_file(&self.file)?;
        self.evaluate(parser, &ast, out)
    }

    /// Evaluate top-level statements in textual order
    pub fn evaluate(
        &mut self,
        parser: &mut StarlarkParser,
        ast: &StarlarkAst,
        out: &mut DirectoryRecord,
    ) -> Result<()> {
        for statement in named_children(ast.root()) {
            let line = statement.start_position().row + 1;
            self.statement(parser, ast, statement, out)
                .map_err(|e| e.at(&self.file, line))?;
        }
        Ok(())
    }

    fn statement(
        &mut self,
        parser: &mut StarlarkParser,
        ast: &StarlarkAst,
        node: Node,
        out: &mut DirectoryRecord,
    ) -> Result<()> {
        match node.kind() {
            "expression_statement" => {
                for child in named_children(node) {
                    self.simple_statement(parser, ast, child, out)?;
                }
                Ok(())
            }
            "assignment" | "augmented_assignment" => self.assignment(ast, node),
            "function_definition" => {
                let name = ast.node_text(&field(node, "name")?).to_string();
                tracing::trace!("Binding macro {}", name);
                self.namespace.insert(name.clone(), Value::Macro(name));
                Ok(())
            }
            "pass_statement" => Ok(()),
            other => Err(Error::UnsupportedSyntax(format!("{other} at top level"))),
        }
    }

    fn simple_statement(
        &mut self,
        parser: &mut StarlarkParser,
        ast: &StarlarkAst,
        node: Node,
        out: &mut DirectoryRecord,
    ) -> Result<()> {
        match node.kind() {
            "assignment" | "augmented_assignment" => self.assignment(ast, node),
            "call" => self.call_statement(parser, ast, node, out),
            // Docstrings
            "string" | "concatenated_string" => Ok(()),
            _ => self.eval(ast, node).map(|_| ()),
        }
    }

    fn assignment(&mut self, ast: &StarlarkAst, node: Node) -> Result<()> {
        let left = field(node, "left")?;
        if left.kind() != "identifier" {
            return Err(Error::UnsupportedSyntax(format!(
                "assignment to {}",
                left.kind()
            )));
        }
        let name = ast.node_text(&left).to_string();
        let right = node
            .child_by_field_name("right")
            .ok_or_else(|| Error::UnsupportedSyntax(format!("assignment to {name} without a value")))?;
        let value = self.eval(ast, right)?;

        let value = if node.kind() == "augmented_assignment" {
            let operator = node
                .child_by_field_name("operator")
                .map(|op| ast.node_text(&op))
                .unwrap_or_default();
            if operator != "+=" {
                return Err(Error::UnsupportedSyntax(format!("operator {operator}")));
            }
            let current = self
                .namespace
                .get(&name)
                .cloned()
                .ok_or_else(|| Error::NameError(name.clone()))?;
            current.concat(value)?
        } else {
            value
        };

        tracing::trace!("Binding {} = {}", name, value);
        self.namespace.insert(name, value);
        Ok(())
    }

    /// A call in statement position: the only place rules and `load()` may appear
    fn call_statement(
        &mut self,
        parser: &mut StarlarkParser,
        ast: &StarlarkAst,
        node: Node,
        out: &mut DirectoryRecord,
    ) -> Result<()> {
        let name = callee_name(ast, node)?;

        if self.namespace.contains_key(name) {
            self.eval_call(ast, node)?;
            return Ok(());
        }

        match Builtin::from_name(name) {
            Some(Builtin::Load) => return self.load(parser, ast, node),
            Some(_) => {
                self.eval_call(ast, node)?;
                return Ok(());
            }
            None => {}
        }

        match self.registry {
            Some(registry) if registry.recognizes(name) => {
                let invocation = self.invocation(ast, node, name)?;
                tracing::debug!("{}:{} {}()", self.file.display(), invocation.line, name);
                registry.dispatch(&invocation, self.config, out)
            }
            _ => Err(Error::NameError(name.to_string())),
        }
    }

    fn invocation(&self, ast: &StarlarkAst, node: Node, keyword: &str) -> Result<RuleInvocation> {
        let (positional, arguments) = self.arguments(ast, node)?;
        Ok(RuleInvocation {
            keyword: keyword.to_string(),
            positional,
            arguments,
            line: node.start_position().row + 1,
        })
    }

    fn load(&mut self, parser: &mut StarlarkParser, ast: &StarlarkAst, node: Node) -> Result<()> {
        if self.registry.map(RuleRegistry::dialect) == Some(Dialect::Workspace) {
            tracing::trace!("Ignoring load() in workspace file");
            return Ok(());
        }

        let (positional, arguments) = self.arguments(ast, node)?;
        let mut positional = positional.into_iter();
        let label = match positional.next() {
            Some(Value::Str(label)) => label,
            Some(other) => {
                return Err(Error::TypeError(format!(
                    "load() label must be a string, got {}",
                    other.type_name()
                )));
            }
            None => return Err(Error::missing("load", "label")),
        };

        let Some(path) = resolve_load_path(
            &label,
            self.root,
            &self.package_dir,
            self.config.ignore_external_loads,
        )?
        else {
            return Ok(());
        };

        if path == self.file || self.loading.contains(&path) {
            return Err(Error::LoadCycle(path));
        }

        let mut loading = self.loading.clone();
        loading.push(self.file.clone());
        let mut module = Context::module(self.config, self.root, &path, loading);
        let mut scratch = DirectoryRecord::new();
        module.evaluate_file(parser, &mut scratch)?;
        let exports = module.into_exports();

        let requested = positional
            .filter_map(|value| value.as_str().map(str::to_string))
            .chain(arguments.into_values().filter_map(|value| value.as_str().map(str::to_string)));
        for symbol in requested {
            if !exports.contains_key(&symbol) {
                tracing::debug!("{} does not define {}", label, symbol);
            }
        }

        tracing::debug!("Imported {} names from {}", exports.len(), label);
        self.import(exports);
        Ok(())
    }

    /// A call in expression position: builtins and macros only
    fn eval_call(&self, ast: &StarlarkAst, node: Node) -> Result<Value> {
        let name = callee_name(ast, node)?;

        if let Some(bound) = self.namespace.get(name) {
            return match bound {
                Value::Macro(_) => {
                    // Arguments are still evaluated so undefined names surface
                    self.arguments(ast, node)?;
                    tracing::debug!("Macro {}() has no CMake output", name);
                    Ok(Value::None)
                }
                other => Err(Error::TypeError(format!(
                    "'{}' object is not callable",
                    other.type_name()
                ))),
            };
        }

        match Builtin::from_name(name) {
            Some(Builtin::Glob) | Some(Builtin::Select) => {
                self.arguments(ast, node)?;
                Ok(Value::List(Vec::new()))
            }
            Some(Builtin::Licenses) => {
                self.arguments(ast, node)?;
                Ok(Value::None)
            }
            Some(Builtin::MapDep) => {
                let (positional, _) = self.arguments(ast, node)?;
                let mut positional = positional.into_iter();
                match (positional.next(), positional.next()) {
                    (Some(dep), None) => Ok(dep),
                    _ => Err(Error::TypeError("map_dep() takes exactly one argument".to_string())),
                }
            }
            Some(Builtin::Load) => Err(Error::UnsupportedSyntax(
                "load() used as an expression".to_string(),
            )),
            None => match self.registry {
                Some(registry) if registry.recognizes(name) => Err(Error::UnsupportedSyntax(
                    format!("{name}() used as an expression"),
                )),
                _ => Err(Error::NameError(name.to_string())),
            },
        }
    }

    fn arguments(&self, ast: &StarlarkAst, node: Node) -> Result<(Vec<Value>, HashMap<String, Value>)> {
        let mut positional = Vec::new();
        let mut keywords = HashMap::new();

        let Some(args) = node.child_by_field_name("arguments") else {
            return Ok((positional, keywords));
        };

        for arg in named_children(args) {
            match arg.kind() {
                "keyword_argument" => {
                    let name = ast.node_text(&field(arg, "name")?).to_string();
                    let value = self.eval(ast, field(arg, "value")?)?;
                    if keywords.insert(name.clone(), value).is_some() {
                        return Err(Error::TypeError(format!(
                            "got multiple values for argument '{name}'"
                        )));
                    }
                }
                "list_splat" | "dictionary_splat" => {
                    return Err(Error::UnsupportedSyntax(format!("{} argument", arg.kind())));
                }
                _ => positional.push(self.eval(ast, arg)?),
            }
        }

        Ok((positional, keywords))
    }

    fn eval(&self, ast: &StarlarkAst, node: Node) -> Result<Value> {
        match node.kind() {
            "string" => Ok(Value::Str(unquote(ast.node_text(&node)))),
            "concatenated_string" => {
                let mut joined = String::new();
                for part in named_children(node) {
                    joined.push_str(&unquote(ast.node_text(&part)));
                }
                Ok(Value::Str(joined))
            }
            "integer" => parse_int(ast.node_text(&node)).map(Value::Int),
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            "none" => Ok(Value::None),
            "list" | "tuple" => named_children(node)
                .into_iter()
                .map(|item| self.eval(ast, item))
                .collect::<Result<Vec<_>>>()
                .map(Value::List),
            "dictionary" => {
                let mut entries: Vec<(Value, Value)> = Vec::new();
                for pair in named_children(node) {
                    if pair.kind() != "pair" {
                        return Err(Error::UnsupportedSyntax(format!("{} in dict", pair.kind())));
                    }
                    let key = self.eval(ast, field(pair, "key")?)?;
                    let value = self.eval(ast, field(pair, "value")?)?;
                    match entries.iter_mut().find(|(existing, _)| *existing == key) {
                        Some(entry) => entry.1 = value,
                        None => entries.push((key, value)),
                    }
                }
                Ok(Value::Dict(entries))
            }
            "parenthesized_expression" => match named_children(node).into_iter().next() {
                Some(inner) => self.eval(ast, inner),
                None => Ok(Value::List(Vec::new())),
            },
            "binary_operator" => {
                let operator = field(node, "operator").map(|op| ast.node_text(&op))?;
                if operator != "+" {
                    return Err(Error::UnsupportedSyntax(format!("operator {operator}")));
                }
                let lhs = self.eval(ast, field(node, "left")?)?;
                let rhs = self.eval(ast, field(node, "right")?)?;
                lhs.concat(rhs)
            }
            "unary_operator" => {
                let operator = field(node, "operator").map(|op| ast.node_text(&op))?;
                match (operator, self.eval(ast, field(node, "argument")?)?) {
                    ("-", Value::Int(i)) => Ok(Value::Int(-i)),
                    ("+", Value::Int(i)) => Ok(Value::Int(i)),
                    (operator, value) => Err(Error::TypeError(format!(
                        "bad operand type for unary {operator}: '{}'",
                        value.type_name()
                    ))),
                }
            }
            "identifier" => self.lookup(ast.node_text(&node)),
            "call" => self.eval_call(ast, node),
            other => Err(Error::UnsupportedSyntax(format!("{other} expression"))),
        }
    }

    fn lookup(&self, name: &str) -> Result<Value> {
        if let Some(value) = self.namespace.get(name) {
            return Ok(value.clone());
        }
        match name {
            "True" => Ok(Value::Bool(true)),
            "False" => Ok(Value::Bool(false)),
            "None" => Ok(Value::None),
            _ => Err(Error::NameError(name.to_string())),
        }
    }
}

fn named_children(node: Node) -> Vec<Node> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|child| child.kind() != "comment")
        .collect()
}

fn field<'t>(node: Node<'t>, name: &str) -> Result<Node<'t>> {
    node.child_by_field_name(name).ok_or_else(|| {
        Error::ParseError(format!("{} node without '{name}'", node.kind()))
    })
}

fn callee_name<'s>(ast: &'s StarlarkAst, node: Node) -> Result<&'s str> {
    let function = field(node, "function")?;
    if function.kind() != "identifier" {
        return Err(Error::UnsupportedSyntax(format!(
            "call through {} '{}'",
            function.kind(),
            ast.node_text(&function)
        )));
    }
    Ok(ast.node_text(&function))
}

fn parse_int(text: &str) -> Result<i64> {
    let cleaned = text.replace('_', "");
    let parsed = if let Some(hex) = cleaned.strip_prefix("0x").or_else(|| cleaned.strip_prefix("0X")) {
        i64::from_str_radix(hex, 16)
    } else if let Some(oct) = cleaned.strip_prefix("0o").or_else(|| cleaned.strip_prefix("0O")) {
        i64::from_str_radix(oct, 8)
    } else {
        cleaned.parse()
    };
    parsed.map_err(|e| Error::ParseError(format!("invalid integer literal {text}: {e}")))
}

/// Strip prefix and quotes from a string literal and resolve escapes
pub(crate) fn unquote(text: &str) -> String {
    let quote_start = text.find(['"', '\'']).unwrap_or(0);
    let (prefix, quoted) = text.split_at(quote_start);
    let body = ["\"\"\"", "'''", "\"", "'"]
        .iter()
        .find_map(|quote| {
            quoted
                .strip_prefix(quote)
                .and_then(|rest| rest.strip_suffix(quote))
        })
        .unwrap_or(quoted);

    if prefix.contains(['r', 'R']) {
        body.to_string()
    } else {
        unescape(body)
    }
}

fn unescape(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('\\') => out.push('\\'),
            Some('"') => out.push('"'),
            Some('\'') => out.push('\''),
            Some('\n') => {}
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn run(content: &str) -> Result<(DirectoryRecord, Namespace)> {
        let registry = RuleRegistry::build_file();
        let config = ConverterConfig::default();
        let root = Path::new("/workspace");
        let mut parser = StarlarkParser::new()?;
        let ast = parser.parse_build_file(content)?;
        let mut context = Context::new(&registry, &config, root, &root.join("BUILD"));
        let mut out = DirectoryRecord::new();
        context.evaluate(&mut parser, &ast, &mut out)?;
        Ok((out, context.into_exports()))
    }

    #[test]
    fn test_unquote() {
        assert_eq!(unquote(r#""upb.c""#), "upb.c");
        assert_eq!(unquote("'upb.h'"), "upb.h");
        assert_eq!(unquote(r#""""doc""""#), "doc");
        assert_eq!(unquote(r#""a\"b""#), "a\"b");
        assert_eq!(unquote(r#"r"\d+""#), r"\d+");
        assert_eq!(unquote(r#""""#), "");
    }

    #[test]
    fn test_parse_int() {
        assert_eq!(parse_int("42").unwrap(), 42);
        assert_eq!(parse_int("0x10").unwrap(), 16);
        assert_eq!(parse_int("1_000").unwrap(), 1000);
    }

    #[test]
    fn test_rules_dispatch_in_declaration_order() {
        let (out, _) = run(r#"
cc_library(name = "a", srcs = ["a.c"])
cc_library(name = "b", hdrs = ["b.h"])
"#)
        .unwrap();

        assert_eq!(
            out.generated_text(),
            [
                "add_library(a\n  a.c)\n",
                "add_library(b INTERFACE)\n",
                "target_sources(b INTERFACE\n  b.h)\n",
            ]
        );
    }

    #[test]
    fn test_variables_glob_and_select() {
        let (out, namespace) = run(r#"
COPTS = select({
    ":windows": [],
    "//conditions:default": ["-Werror"],
}) + ["-Iinclude"]

SRCS = ["upb.c"] + glob(["*.inc"])

cc_library(
    name = "upb",
    srcs = SRCS,
    copts = COPTS,
    deps = [map_dep("//:port")],
)
"#)
        .unwrap();

        assert_eq!(
            namespace.get("COPTS"),
            Some(&Value::List(vec![Value::Str("-Iinclude".into())]))
        );
        assert_eq!(
            out.text(),
            "add_library(upb\n  upb.c)\ntarget_link_libraries(upb\n  port)\ntarget_include_directories(upb PUBLIC include)\n"
        );
    }

    #[test]
    fn test_noop_rules_and_builtins() {
        let (out, _) = run(r#"
licenses(["notice"])
package(default_visibility = ["//visibility:public"])
exports_files(["LICENSE"])
proto_library(name = "p", srcs = ["p.proto"])
config_setting(name = "windows", constraint_values = ["@platforms//os:windows"])
genrule(name = "g", outs = ["g.h"], cmd = "touch $@")
"#)
        .unwrap();

        assert!(out.is_empty());
    }

    #[test]
    fn test_unknown_rule_is_name_error_with_location() {
        let err = run("\n\njava_library(name = \"x\")\n").unwrap_err();

        assert!(err.to_string().starts_with("/workspace/BUILD:3:"));
        assert!(matches!(err.root_cause(), Error::NameError(name) if name == "java_library"));
    }

    #[test]
    fn test_undefined_variable_is_name_error() {
        let err = run("cc_library(name = \"x\", srcs = MISSING)\n").unwrap_err();
        assert!(matches!(err.root_cause(), Error::NameError(name) if name == "MISSING"));
    }

    #[test]
    fn test_missing_name_is_reported() {
        let err = run("cc_library(srcs = [\"a.c\"])\n").unwrap_err();
        assert!(matches!(err.root_cause(), Error::MissingRequiredArgument { .. }));
    }

    #[test]
    fn test_unsupported_statement() {
        let err = run("for x in []:\n    pass\n").unwrap_err();
        assert!(matches!(err.root_cause(), Error::UnsupportedSyntax(_)));
    }

    #[test]
    fn test_augmented_assignment() {
        let (out, namespace) = run(r#"
DEPS = [":a"]
DEPS += [":b"]
PREFIX = "up"
PREFIX += "b"
OPTS = {"x": 1, "y": 2}
OPTS += {"y": 3}
cc_library(name = "x", srcs = ["x.c"], deps = DEPS)
"#)
        .unwrap();

        assert_eq!(namespace.get("PREFIX"), Some(&Value::Str("upb".into())));
        assert_eq!(
            namespace.get("OPTS"),
            Some(&Value::Dict(vec![
                (Value::Str("x".into()), Value::Int(1)),
                (Value::Str("y".into()), Value::Int(3)),
            ]))
        );
        assert_eq!(
            out.text(),
            "add_library(x\n  x.c)\ntarget_link_libraries(x\n  a\n  b)\n"
        );
    }

    #[test]
    fn test_augmented_assignment_rejects_other_operators_and_unbound_names() {
        let err = run("N = 1\nN -= 1\n").unwrap_err();
        assert!(matches!(err.root_cause(), Error::UnsupportedSyntax(_)));

        let err = run("UNBOUND += [\"a\"]\n").unwrap_err();
        assert!(matches!(err.root_cause(), Error::NameError(name) if name == "UNBOUND"));

        let err = run("MIXED = [\"a\"]\nMIXED += \"b\"\n").unwrap_err();
        assert!(matches!(err.root_cause(), Error::TypeError(_)));
    }

    #[test]
    fn test_unary_operators_on_integers() {
        let (_, namespace) = run("LOW = -3\nHIGH = +4\n").unwrap();
        assert_eq!(namespace.get("LOW"), Some(&Value::Int(-3)));
        assert_eq!(namespace.get("HIGH"), Some(&Value::Int(4)));

        let err = run("BAD = -\"a\"\n").unwrap_err();
        assert!(matches!(err.root_cause(), Error::TypeError(_)));
    }

    #[test]
    fn test_licenses_evaluates_to_none() {
        let (out, namespace) = run("L = licenses([\"notice\"])\nlicenses([\"notice\"])\n").unwrap();
        assert_eq!(namespace.get("L"), Some(&Value::None));
        assert!(out.is_empty());
    }

    #[test]
    fn test_load_imports_bindings_and_shadows_rules() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        std::fs::write(
            root.join("build_defs.bzl"),
            r#"
"""Shared definitions."""

UPB_DEFAULT_COPTS = ["-Iupb"]

def cc_library(**kwargs):
    native.cc_library(**kwargs)

def upb_proto_library(name, deps = []):
    pass
"#,
        )
        .unwrap();
        std::fs::write(
            root.join("BUILD"),
            r#"
load("//:build_defs.bzl", "UPB_DEFAULT_COPTS", "cc_library")

cc_library(name = "shadowed", srcs = ["x.c"], copts = UPB_DEFAULT_COPTS)
cc_binary(name = "tool", srcs = ["tool.c"], copts = UPB_DEFAULT_COPTS)
"#,
        )
        .unwrap();

        let registry = RuleRegistry::build_file();
        let config = ConverterConfig::default();
        let mut parser = StarlarkParser::new().unwrap();
        let mut context = Context::new(&registry, &config, root, &root.join("BUILD"));
        let mut out = DirectoryRecord::new();
        context.evaluate_file(&mut parser, &mut out).unwrap();

        assert_eq!(
            context.namespace().get("upb_proto_library"),
            Some(&Value::Macro("upb_proto_library".into()))
        );
        assert_eq!(
            out.generated_text(),
            [
                "add_executable(tool\n  tool.c)\n",
                "target_include_directories(tool PRIVATE upb)\n",
            ]
        );
    }

    #[test]
    fn test_load_missing_file() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        std::fs::write(root.join("BUILD"), "load(\"//:nope.bzl\", \"x\")\n").unwrap();

        let registry = RuleRegistry::build_file();
        let config = ConverterConfig::default();
        let mut parser = StarlarkParser::new().unwrap();
        let mut context = Context::new(&registry, &config, root, &root.join("BUILD"));
        let err = context
            .evaluate_file(&mut parser, &mut DirectoryRecord::new())
            .unwrap_err();

        assert!(matches!(err.root_cause(), Error::FileNotFound(path) if path.ends_with("nope.bzl")));
    }

    #[test]
    fn test_load_cycle() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        std::fs::write(root.join("a.bzl"), "load(\"//:b.bzl\", \"B\")\nA = 1\n").unwrap();
        std::fs::write(root.join("b.bzl"), "load(\"//:a.bzl\", \"A\")\nB = 2\n").unwrap();
        std::fs::write(root.join("BUILD"), "load(\"//:a.bzl\", \"A\")\n").unwrap();

        let registry = RuleRegistry::build_file();
        let config = ConverterConfig::default();
        let mut parser = StarlarkParser::new().unwrap();
        let mut context = Context::new(&registry, &config, root, &root.join("BUILD"));
        let err = context
            .evaluate_file(&mut parser, &mut DirectoryRecord::new())
            .unwrap_err();

        assert!(matches!(err.root_cause(), Error::LoadCycle(_)));
    }

    #[test]
    fn test_loaded_file_cannot_call_rules() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        std::fs::write(root.join("defs.bzl"), "cc_library(name = \"x\")\n").unwrap();
        std::fs::write(root.join("BUILD"), "load(\":defs.bzl\")\n").unwrap();

        let registry = RuleRegistry::build_file();
        let config = ConverterConfig::default();
        let mut parser = StarlarkParser::new().unwrap();
        let mut context = Context::new(&registry, &config, root, &root.join("BUILD"));
        let err = context
            .evaluate_file(&mut parser, &mut DirectoryRecord::new())
            .unwrap_err();

        assert!(matches!(err.root_cause(), Error::NameError(name) if name == "cc_library"));
        assert!(err.to_string().contains("defs.bzl:1:"));
    }

    #[test]
    fn test_workspace_ignores_load() {
        let registry = RuleRegistry::workspace_file();
        let config = ConverterConfig::default();
        let root = Path::new("/workspace");
        let mut parser = StarlarkParser::new().unwrap();
        let ast = parser
            .parse_build_file(
                r#"
workspace(name = "demo")
load("@bazel_tools//tools/build_defs/repo:http.bzl", "http_archive")
http_archive(name = "zlib", urls = ["https://example.com/zlib.tar.gz"])
"#,
            )
            .unwrap();
        let mut context = Context::new(&registry, &config, root, &root.join("WORKSPACE"));
        let mut out = DirectoryRecord::new();
        context.evaluate(&mut parser, &ast, &mut out).unwrap();

        assert_eq!(out.text(), "project(demo)\n");
    }
}
