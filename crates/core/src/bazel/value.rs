//! Evaluated Starlark values and rule invocations

use crate::error::{Error, Result};
use std::collections::HashMap;
use std::fmt;

/// A value produced by evaluating a Starlark expression
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    None,
    Bool(bool),
    Int(i64),
    Str(String),
    List(Vec<Value>),
    /// Dictionary entries in declaration order
    Dict(Vec<(Value, Value)>),
    /// A `def` from a loaded file; calling it emits nothing
    Macro(String),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::None => "NoneType",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Str(_) => "string",
            Value::List(_) => "list",
            Value::Dict(_) => "dict",
            Value::Macro(_) => "function",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Starlark `+`
    pub fn concat(self, rhs: Value) -> Result<Value> {
        match (self, rhs) {
            (Value::List(mut lhs), Value::List(rhs)) => {
                lhs.extend(rhs);
                Ok(Value::List(lhs))
            }
            (Value::Str(mut lhs), Value::Str(rhs)) => {
                lhs.push_str(&rhs);
                Ok(Value::Str(lhs))
            }
            (Value::Int(lhs), Value::Int(rhs)) => Ok(Value::Int(lhs.wrapping_add(rhs))),
            (Value::Dict(mut lhs), Value::Dict(rhs)) => {
                for (key, value) in rhs {
                    match lhs.iter_mut().find(|(existing, _)| *existing == key) {
                        Some(entry) => entry.1 = value,
                        None => lhs.push((key, value)),
                    }
                }
                Ok(Value::Dict(lhs))
            }
            (lhs, rhs) => Err(Error::TypeError(format!(
                "unsupported operand types for +: '{}' and '{}'",
                lhs.type_name(),
                rhs.type_name()
            ))),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => write!(f, "None"),
            Value::Bool(true) => write!(f, "True"),
            Value::Bool(false) => write!(f, "False"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Str(s) => write!(f, "{s:?}"),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Value::Dict(entries) => {
                write!(f, "{{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                write!(f, "}}")
            }
            Value::Macro(name) => write!(f, "<function {name}>"),
        }
    }
}

/// One `keyword(arg, name = value, ...)` statement, fully evaluated
#[derive(Debug, Clone, PartialEq)]
pub struct RuleInvocation {
    pub keyword: String,
    pub positional: Vec<Value>,
    pub arguments: HashMap<String, Value>,
    /// 1-based line of the call in its file
    pub line: usize,
}

impl RuleInvocation {
    pub fn new(keyword: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            positional: Vec::new(),
            arguments: HashMap::new(),
            line: 0,
        }
    }

    pub fn with_arg(mut self, name: &str, value: Value) -> Self {
        self.arguments.insert(name.to_string(), value);
        self
    }

    /// A string argument that must be present
    pub fn required_str(&self, argument: &str) -> Result<&str> {
        match self.arguments.get(argument) {
            None | Some(Value::None) => Err(Error::missing(&self.keyword, argument)),
            Some(Value::Str(s)) => Ok(s),
            Some(other) => Err(Error::TypeError(format!(
                "{}() argument '{argument}' must be a string, got {}",
                self.keyword,
                other.type_name()
            ))),
        }
    }

    /// A list-of-strings argument; absent or None yields an empty list
    pub fn string_list(&self, argument: &str) -> Result<Vec<String>> {
        let items = match self.arguments.get(argument) {
            None | Some(Value::None) => return Ok(Vec::new()),
            Some(Value::List(items)) => items,
            Some(other) => {
                return Err(Error::TypeError(format!(
                    "{}() argument '{argument}' must be a list, got {}",
                    self.keyword,
                    other.type_name()
                )));
            }
        };

        items
            .iter()
            .map(|item| {
                item.as_str().map(str::to_string).ok_or_else(|| {
                    Error::TypeError(format!(
                        "{}() argument '{argument}' must contain strings, got {}",
                        self.keyword,
                        item.type_name()
                    ))
                })
            })
            .collect()
    }
}
