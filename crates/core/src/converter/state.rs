//! Per-directory accumulators shared by the walker, the rules and the emitter

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Output accumulated for one source directory
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DirectoryRecord {
    generated_text: Vec<String>,
    children_with_output: Vec<PathBuf>,
}

impl DirectoryRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one fragment. Fragments are never removed or reordered.
    pub fn append(&mut self, fragment: impl Into<String>) {
        self.generated_text.push(fragment.into());
    }

    pub fn generated_text(&self) -> &[String] {
        &self.generated_text
    }

    pub fn text(&self) -> String {
        self.generated_text.concat()
    }

    /// Immediate subdirectories (relative to the source root) that produced output
    pub fn children_with_output(&self) -> &[PathBuf] {
        &self.children_with_output
    }

    pub(crate) fn add_child(&mut self, child: PathBuf) {
        if !self.children_with_output.contains(&child) {
            self.children_with_output.push(child);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.generated_text.is_empty() && self.children_with_output.is_empty()
    }
}

/// Accumulated state of one conversion run, keyed by directory relative to the root
#[derive(Debug, Default)]
pub struct ConverterState {
    records: BTreeMap<PathBuf, DirectoryRecord>,
    preamble: Option<String>,
}

impl ConverterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// The record for `dir`, created on first use
    pub fn record_mut(&mut self, dir: &Path) -> &mut DirectoryRecord {
        self.records.entry(dir.to_path_buf()).or_default()
    }

    pub fn record(&self, dir: &Path) -> Option<&DirectoryRecord> {
        self.records.get(dir)
    }

    /// Directories in the emission set, root first, in sorted path order
    pub fn emitted(&self) -> impl Iterator<Item = (&Path, &DirectoryRecord)> {
        self.records.iter().map(|(dir, record)| (dir.as_path(), record))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn preamble(&self) -> Option<&str> {
        self.preamble.as_deref()
    }

    pub(crate) fn set_preamble(&mut self, preamble: Option<String>) {
        self.preamble = preamble;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_appends_in_order() {
        let mut record = DirectoryRecord::new();
        record.append("add_library(a)\n");
        record.append("add_library(b)\n");

        assert_eq!(record.generated_text(), ["add_library(a)\n", "add_library(b)\n"]);
        assert_eq!(record.text(), "add_library(a)\nadd_library(b)\n");
    }

    #[test]
    fn test_children_are_deduplicated_in_order() {
        let mut record = DirectoryRecord::new();
        record.add_child(PathBuf::from("b"));
        record.add_child(PathBuf::from("a"));
        record.add_child(PathBuf::from("b"));

        assert_eq!(record.children_with_output(), [PathBuf::from("b"), PathBuf::from("a")]);
    }

    #[test]
    fn test_records_sort_root_first() {
        let mut state = ConverterState::new();
        state.record_mut(Path::new("lib/sub")).append("x");
        state.record_mut(Path::new("")).add_child(PathBuf::from("lib"));
        state.record_mut(Path::new("lib")).add_child(PathBuf::from("lib/sub"));

        let order: Vec<&Path> = state.emitted().map(|(dir, _)| dir).collect();
        assert_eq!(order, [Path::new(""), Path::new("lib"), Path::new("lib/sub")]);
    }
}
