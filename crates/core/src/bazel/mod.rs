//! Bazel support using proper Starlark parsing

pub mod context;
pub mod label;
pub mod rules;
pub mod starlark_parser;
pub mod value;

pub use context::{Context, Namespace};
pub use label::normalize_dep;
pub use rules::{Dialect, RuleHandler, RuleRegistry};
pub use starlark_parser::{StarlarkAst, StarlarkParser};
pub use value::{RuleInvocation, Value};
