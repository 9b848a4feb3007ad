//! Directory-level conversion: state, traversal and emission

mod emitter;
mod state;
mod walker;

pub use emitter::{Artifact, Emitter};
pub use state::{ConverterState, DirectoryRecord};
pub use walker::DirectoryWalker;

use std::path::{Path, PathBuf};

use crate::config::ConverterConfig;
use crate::error::Result;

/// Converts a Bazel source tree into one CMake file per qualifying directory
pub struct Converter {
    config: ConverterConfig,
}

impl Converter {
    pub fn new(config: ConverterConfig) -> Self {
        Self { config }
    }

    /// Evaluate every declaration file under `root` into a fresh state
    pub fn convert(&self, root: &Path) -> Result<ConverterState> {
        let mut state = ConverterState::new();
        DirectoryWalker::new(&self.config)?.walk(root, &mut state)?;
        Ok(state)
    }

    /// Convert `root` and render the resulting files without writing them
    pub fn render(&self, root: &Path) -> Result<Vec<Artifact>> {
        let state = self.convert(root)?;
        Ok(Emitter::render(&state))
    }

    /// Convert `root` and write `file_name` into every emitted directory
    pub fn run(&self, root: &Path, file_name: &str) -> Result<Vec<PathBuf>> {
        self.render(root)?
            .iter()
            .map(|artifact| artifact.write(root, file_name))
            .collect()
    }
}
