//! Post-order traversal of the source tree

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use super::state::{ConverterState, DirectoryRecord};
use crate::bazel::{Context, RuleRegistry, StarlarkParser};
use crate::config::ConverterConfig;
use crate::error::Result;

/// Visits every directory below the root, children before parents, evaluating each
/// declaration file into the directory's record and registering ancestors of
/// directories that produced output.
pub struct DirectoryWalker<'a> {
    config: &'a ConverterConfig,
    build_rules: RuleRegistry,
    workspace_rules: RuleRegistry,
    parser: StarlarkParser,
}

impl<'a> DirectoryWalker<'a> {
    pub fn new(config: &'a ConverterConfig) -> Result<Self> {
        Ok(Self {
            config,
            build_rules: RuleRegistry::build_file(),
            workspace_rules: RuleRegistry::workspace_file(),
            parser: StarlarkParser::new()?,
        })
    }

    /// Evaluate the workspace file, then every declaration file under `root`
    pub fn walk(&mut self, root: &Path, state: &mut ConverterState) -> Result<()> {
        let preamble = self.evaluate_workspace(root)?;
        state.set_preamble(preamble);

        // Qualifying children per parent, in traversal order
        let mut pending: HashMap<PathBuf, Vec<PathBuf>> = HashMap::new();

        let config = self.config;
        let entries = WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .contents_first(true)
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !is_skipped(entry, config));

        for entry in entries {
            let entry = entry?;
            if !entry.file_type().is_dir() {
                continue;
            }

            let dir = entry.path();
            let relative = dir.strip_prefix(root).unwrap_or(dir).to_path_buf();
            let children = pending.remove(&relative).unwrap_or_default();

            let has_build_file = match self.build_file_in(dir) {
                Some(build_file) => {
                    let record = state.record_mut(&relative);
                    self.evaluate_build_file(root, &build_file, record)?;
                    true
                }
                None => false,
            };

            if !has_build_file && children.is_empty() {
                continue;
            }

            tracing::info!(
                "Directory {:?} produces output ({} subdirectories)",
                relative,
                children.len()
            );
            let record = state.record_mut(&relative);
            for child in children {
                record.add_child(child);
            }

            if let Some(parent) = relative.parent() {
                pending.entry(parent.to_path_buf()).or_default().push(relative);
            }
        }

        if state.is_empty() {
            tracing::warn!("No BUILD files found under {:?}", root);
        }
        Ok(())
    }

    /// The project directive contributed by the root workspace file, if any
    pub fn evaluate_workspace(&mut self, root: &Path) -> Result<Option<String>> {
        let Some(workspace_file) = first_file(root, &self.config.workspace_file_names) else {
            tracing::debug!("No workspace file in {:?}", root);
            return Ok(None);
        };

        let mut scratch = DirectoryRecord::new();
        let mut context = Context::new(&self.workspace_rules, self.config, root, &workspace_file);
        context.evaluate_file(&mut self.parser, &mut scratch)?;

        if scratch.generated_text().len() > 1 {
            tracing::warn!(
                "{:?} declares workspace() {} times",
                workspace_file,
                scratch.generated_text().len()
            );
        }
        let preamble = scratch.text();
        Ok((!preamble.is_empty()).then_some(preamble))
    }

    fn build_file_in(&self, dir: &Path) -> Option<PathBuf> {
        first_file(dir, &self.config.build_file_names)
    }

    fn evaluate_build_file(
        &mut self,
        root: &Path,
        build_file: &Path,
        record: &mut DirectoryRecord,
    ) -> Result<()> {
        let mut context = Context::new(&self.build_rules, self.config, root, build_file);
        context.evaluate_file(&mut self.parser, record)
    }
}

fn is_skipped(entry: &DirEntry, config: &ConverterConfig) -> bool {
    entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| config.skips_dir(name))
}

fn first_file(dir: &Path, names: &[String]) -> Option<PathBuf> {
    names
        .iter()
        .filter(|name| !name.is_empty())
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
}
