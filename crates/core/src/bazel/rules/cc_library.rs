//! Handler for cc_library rules

use super::{RuleHandler, Scope, attach_deps, attach_includes};
use crate::bazel::RuleInvocation;
use crate::bazel::label::strip_file_label;
use crate::cmake;
use crate::config::ConverterConfig;
use crate::converter::DirectoryRecord;
use crate::error::Result;

/// Handler for cc_library rules
pub struct CcLibraryHandler;

impl RuleHandler for CcLibraryHandler {
    fn can_handle(&self, keyword: &str) -> bool {
        keyword == "cc_library"
    }

    fn emit(
        &self,
        invocation: &RuleInvocation,
        config: &ConverterConfig,
        out: &mut DirectoryRecord,
    ) -> Result<()> {
        let name = invocation.required_str("name")?;
        if config.is_suppressed(name) {
            tracing::debug!("Skipping suppressed cc_library {}", name);
            return Ok(());
        }

        let files: Vec<String> = invocation
            .string_list("srcs")?
            .into_iter()
            .chain(invocation.string_list("hdrs")?)
            .map(|file| strip_file_label(&file).to_string())
            .collect();

        if files.iter().any(|file| config.is_compiled_source(file)) {
            out.append(cmake::call("add_library", name, &files));
            attach_deps(name, None, invocation, out)?;
            attach_includes(name, Scope::Public, invocation, config, out)?;
        } else {
            // Header-only: an INTERFACE target carries the headers as sources
            out.append(format!("add_library({name} INTERFACE)\n"));
            out.append(cmake::call(
                "target_sources",
                &format!("{name} INTERFACE"),
                &files,
            ));
            attach_deps(name, Some(Scope::Interface), invocation, out)?;
            attach_includes(name, Scope::Interface, invocation, config, out)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bazel::Value;
    use crate::error::Error;

    fn strings(items: &[&str]) -> Value {
        Value::List(items.iter().map(|s| Value::Str(s.to_string())).collect())
    }

    fn emit(invocation: RuleInvocation) -> Result<DirectoryRecord> {
        let mut out = DirectoryRecord::new();
        CcLibraryHandler.emit(&invocation, &ConverterConfig::default(), &mut out)?;
        Ok(out)
    }

    #[test]
    fn test_compiled_library() {
        let out = emit(
            RuleInvocation::new("cc_library")
                .with_arg("name", Value::Str("core".into()))
                .with_arg("srcs", strings(&["core.cc"]))
                .with_arg("hdrs", strings(&["core.h"]))
                .with_arg("deps", strings(&[":util"])),
        )
        .unwrap();

        assert_eq!(
            out.text(),
            "add_library(core\n  core.cc\n  core.h)\ntarget_link_libraries(core\n  util)\n"
        );
    }

    #[test]
    fn test_header_only_library() {
        let out = emit(
            RuleInvocation::new("cc_library")
                .with_arg("name", Value::Str("port".into()))
                .with_arg("hdrs", strings(&["port_def.inc", ":port_undef.inc"]))
                .with_arg("deps", strings(&["//:base"])),
        )
        .unwrap();

        assert_eq!(
            out.generated_text(),
            [
                "add_library(port INTERFACE)\n",
                "target_sources(port INTERFACE\n  port_def.inc\n  port_undef.inc)\n",
                "target_link_libraries(port INTERFACE\n  base)\n",
            ]
        );
    }

    #[test]
    fn test_glob_only_library_is_header_only() {
        let out = emit(
            RuleInvocation::new("cc_library")
                .with_arg("name", Value::Str("headers".into()))
                .with_arg("srcs", strings(&[])),
        )
        .unwrap();

        assert_eq!(
            out.text(),
            "add_library(headers INTERFACE)\ntarget_sources(headers INTERFACE)\n"
        );
    }

    #[test]
    fn test_suppressed_targets_emit_nothing() {
        for name in ["amalgamation", "upbc_generator"] {
            let out = emit(
                RuleInvocation::new("cc_library")
                    .with_arg("name", Value::Str(name.into()))
                    .with_arg("srcs", strings(&["upb.c"]))
                    .with_arg("deps", strings(&[":upb"])),
            )
            .unwrap();
            assert!(out.is_empty(), "{name} should be suppressed");
        }
    }

    #[test]
    fn test_missing_name() {
        let err = emit(RuleInvocation::new("cc_library").with_arg("srcs", strings(&["a.c"])))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::MissingRequiredArgument { ref rule, ref argument } if rule == "cc_library" && argument == "name"
        ));
    }

    #[test]
    fn test_include_flags_follow_link_directive() {
        let out = emit(
            RuleInvocation::new("cc_library")
                .with_arg("name", Value::Str("json".into()))
                .with_arg("srcs", strings(&["json.c"]))
                .with_arg("deps", strings(&[":upb"]))
                .with_arg("copts", strings(&["-Werror", "-Ithird_party/json"])),
        )
        .unwrap();

        assert_eq!(
            out.generated_text().last().map(String::as_str),
            Some("target_include_directories(json PUBLIC third_party/json)\n")
        );
        assert_eq!(out.generated_text().len(), 3);
    }
}
