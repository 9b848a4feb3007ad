//! Rendering of the emission set into CMakeLists files

use std::path::{Path, PathBuf};

use super::state::ConverterState;
use crate::cmake::{self, templates};
use crate::error::Result;

/// One generated file, addressed by its directory relative to the source root
#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    pub directory: PathBuf,
    pub contents: String,
}

impl Artifact {
    pub fn is_root(&self) -> bool {
        self.directory.as_os_str().is_empty()
    }

    pub fn path(&self, root: &Path, file_name: &str) -> PathBuf {
        root.join(&self.directory).join(file_name)
    }

    /// Write to `<root>/<directory>/<file_name>`
    pub fn write(&self, root: &Path, file_name: &str) -> Result<PathBuf> {
        let path = self.path(root, file_name);
        std::fs::write(&path, &self.contents)?;
        tracing::info!("Wrote {:?}", path);
        Ok(path)
    }
}

pub struct Emitter;

impl Emitter {
    /// One artifact per emitted directory: the root header (root only), then the
    /// subdirectory references, then the accumulated text.
    pub fn render(state: &ConverterState) -> Vec<Artifact> {
        state
            .emitted()
            .map(|(directory, record)| {
                let mut contents = String::new();
                if directory.as_os_str().is_empty() {
                    contents.push_str(&templates::root_header(state.preamble()));
                }
                for child in record.children_with_output() {
                    let name = child
                        .file_name()
                        .map(|name| name.to_string_lossy().into_owned())
                        .unwrap_or_else(|| child.to_string_lossy().into_owned());
                    contents.push_str(&cmake::add_subdirectory(&name));
                }
                contents.push_str(&record.text());

                Artifact {
                    directory: directory.to_path_buf(),
                    contents,
                }
            })
            .collect()
    }
}
