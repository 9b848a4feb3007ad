//! Handler for the root WORKSPACE file

use super::RuleHandler;
use crate::bazel::RuleInvocation;
use crate::config::ConverterConfig;
use crate::converter::DirectoryRecord;
use crate::error::Result;

/// `workspace(name)` becomes the `project()` directive; repository rules are ignored
pub struct WorkspaceHandler;

impl RuleHandler for WorkspaceHandler {
    fn can_handle(&self, keyword: &str) -> bool {
        matches!(
            keyword,
            "workspace"
                | "http_archive"
                | "git_repository"
                | "new_local_repository"
                | "local_repository"
                | "bind"
        )
    }

    fn emit(
        &self,
        invocation: &RuleInvocation,
        _config: &ConverterConfig,
        out: &mut DirectoryRecord,
    ) -> Result<()> {
        if invocation.keyword == "workspace" {
            let name = invocation.required_str("name")?;
            out.append(format!("project({name})\n"));
        }
        Ok(())
    }
}
