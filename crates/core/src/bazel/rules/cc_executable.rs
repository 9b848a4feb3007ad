//! Handler for cc_binary and cc_test rules

use super::{RuleHandler, Scope, attach_deps, attach_includes};
use crate::bazel::RuleInvocation;
use crate::bazel::label::{data_copy_paths, strip_file_label};
use crate::cmake;
use crate::config::ConverterConfig;
use crate::converter::DirectoryRecord;
use crate::error::Result;

/// Handler for cc_binary and cc_test rules
pub struct CcExecutableHandler;

impl RuleHandler for CcExecutableHandler {
    fn can_handle(&self, keyword: &str) -> bool {
        matches!(keyword, "cc_binary" | "cc_test")
    }

    fn emit(
        &self,
        invocation: &RuleInvocation,
        config: &ConverterConfig,
        out: &mut DirectoryRecord,
    ) -> Result<()> {
        let name = invocation.required_str("name")?;
        let srcs: Vec<String> = invocation
            .string_list("srcs")?
            .iter()
            .map(|file| strip_file_label(file).to_string())
            .collect();

        out.append(cmake::call("add_executable", name, &srcs));

        if invocation.keyword == "cc_test" {
            out.append(format!("add_test(NAME {name} COMMAND {name})\n"));
            for data in invocation.string_list("data")? {
                let (source, destination) = data_copy_paths(&data);
                out.append(cmake::post_build_copy(name, &source, &destination));
            }
        }

        attach_deps(name, None, invocation, out)?;
        attach_includes(name, Scope::Private, invocation, config, out)
    }
}
