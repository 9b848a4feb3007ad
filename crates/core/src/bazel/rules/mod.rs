//! Rule handlers for the recognized BUILD and WORKSPACE vocabulary

mod cc_executable;
mod cc_library;
mod passthrough;
mod workspace;

pub use cc_executable::CcExecutableHandler;
pub use cc_library::CcLibraryHandler;
pub use passthrough::{PASSTHROUGH_RULES, PassthroughHandler};
pub use workspace::WorkspaceHandler;

use crate::bazel::label::normalize_dep;
use crate::bazel::RuleInvocation;
use crate::cmake;
use crate::config::ConverterConfig;
use crate::converter::DirectoryRecord;
use crate::error::{Error, Result};

/// Trait for handling specific rule keywords
pub trait RuleHandler: Send + Sync {
    /// Check if this handler can process the given keyword
    fn can_handle(&self, keyword: &str) -> bool;

    /// Append the CMake fragments for one invocation to `out`
    fn emit(
        &self,
        invocation: &RuleInvocation,
        config: &ConverterConfig,
        out: &mut DirectoryRecord,
    ) -> Result<()>;
}

/// Which kind of file a registry interprets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// BUILD files: C/C++ rules, `load()` is evaluated
    Build,
    /// The root WORKSPACE file: `workspace()` only, `load()` is ignored
    Workspace,
}

/// The closed set of handlers for one dialect
pub struct RuleRegistry {
    dialect: Dialect,
    handlers: Vec<Box<dyn RuleHandler>>,
}

impl RuleRegistry {
    pub fn new(dialect: Dialect) -> Self {
        let handlers: Vec<Box<dyn RuleHandler>> = match dialect {
            Dialect::Build => vec![
                Box::new(CcLibraryHandler),
                Box::new(CcExecutableHandler),
                Box::new(PassthroughHandler),
            ],
            Dialect::Workspace => vec![Box::new(WorkspaceHandler)],
        };

        Self { dialect, handlers }
    }

    pub fn build_file() -> Self {
        Self::new(Dialect::Build)
    }

    pub fn workspace_file() -> Self {
        Self::new(Dialect::Workspace)
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn recognizes(&self, keyword: &str) -> bool {
        self.handler_for(keyword).is_some()
    }

    fn handler_for(&self, keyword: &str) -> Option<&dyn RuleHandler> {
        self.handlers
            .iter()
            .find(|handler| handler.can_handle(keyword))
            .map(|handler| handler.as_ref())
    }

    /// Run the handler for `invocation.keyword`; unknown keywords are a `NameError`
    pub fn dispatch(
        &self,
        invocation: &RuleInvocation,
        config: &ConverterConfig,
        out: &mut DirectoryRecord,
    ) -> Result<()> {
        let handler = self
            .handler_for(&invocation.keyword)
            .ok_or_else(|| Error::NameError(invocation.keyword.clone()))?;
        handler.emit(invocation, config, out)
    }
}

/// Visibility keyword used for usage requirements of a target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Scope {
    Public,
    Private,
    Interface,
}

impl Scope {
    fn as_str(self) -> &'static str {
        match self {
            Scope::Public => "PUBLIC",
            Scope::Private => "PRIVATE",
            Scope::Interface => "INTERFACE",
        }
    }
}

/// `target_link_libraries` for the rule's `deps`, in listed order, duplicates kept
pub(crate) fn attach_deps(
    name: &str,
    scope: Option<Scope>,
    invocation: &RuleInvocation,
    out: &mut DirectoryRecord,
) -> Result<()> {
    let deps: Vec<String> = invocation
        .string_list("deps")?
        .iter()
        .map(|dep| normalize_dep(dep))
        .collect();
    if deps.is_empty() {
        return Ok(());
    }

    let head = match scope {
        Some(scope) => format!("{name} {}", scope.as_str()),
        None => name.to_string(),
    };
    out.append(cmake::call("target_link_libraries", &head, &deps));
    Ok(())
}

/// One `target_include_directories` per include flag in `copts` and per `includes` entry
pub(crate) fn attach_includes(
    name: &str,
    scope: Scope,
    invocation: &RuleInvocation,
    config: &ConverterConfig,
    out: &mut DirectoryRecord,
) -> Result<()> {
    let copts = invocation.string_list("copts")?;
    let mut paths = include_paths(&copts, &config.include_flag_prefix);
    paths.extend(invocation.string_list("includes")?);

    for path in paths {
        out.append(format!(
            "target_include_directories({name} {} {path})\n",
            scope.as_str()
        ));
    }
    Ok(())
}

/// Paths named by include flags, in order. A bare prefix takes the following flag.
pub(crate) fn include_paths(flags: &[String], prefix: &str) -> Vec<String> {
    let mut paths = Vec::new();
    let mut flags = flags.iter();
    while let Some(flag) = flags.next() {
        let Some(path) = flag.strip_prefix(prefix) else {
            continue;
        };
        if !path.is_empty() {
            paths.push(path.to_string());
        } else if let Some(next) = flags.next() {
            paths.push(next.clone());
        }
    }
    paths
}
