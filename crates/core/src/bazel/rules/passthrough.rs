//! Rules without a CMake counterpart

use super::RuleHandler;
use crate::bazel::RuleInvocation;
use crate::config::ConverterConfig;
use crate::converter::DirectoryRecord;
use crate::error::Result;

/// Keywords accepted in BUILD files that produce no output
pub const PASSTHROUGH_RULES: &[&str] = &[
    "proto_library",
    "cc_proto_library",
    "genrule",
    "config_setting",
    "exports_files",
    "package",
    "filegroup",
    "test_suite",
    "sh_test",
    "sh_binary",
    "py_library",
    "py_binary",
    "py_test",
    "lua_cclibrary",
    "lua_library",
    "lua_binary",
    "lua_test",
    "make_shell_script",
    "generated_file_staleness_test",
    "upb_amalgamation",
    "upb_proto_library",
    "upb_proto_reflection_library",
];

pub struct PassthroughHandler;

impl RuleHandler for PassthroughHandler {
    fn can_handle(&self, keyword: &str) -> bool {
        PASSTHROUGH_RULES.contains(&keyword)
    }

    fn emit(
        &self,
        invocation: &RuleInvocation,
        _config: &ConverterConfig,
        _out: &mut DirectoryRecord,
    ) -> Result<()> {
        tracing::trace!("{}() has no CMake equivalent", invocation.keyword);
        Ok(())
    }
}
