use anyhow::Result;
use clap::Parser;

use crate::commands::convert_command;

/// Convert the Bazel tree in the current directory into CMake files
#[derive(Parser, Debug)]
#[command(name = "bazel-to-cmake")]
#[command(version, about, long_about = None)]
#[command(after_help = "ENVIRONMENT:\n    RUST_LOG=debug    Enable debug logging")]
pub struct Cli {
    /// File name to write into every converted directory (e.g. CMakeLists.txt)
    pub output: String,
}

impl Cli {
    /// Execute the conversion
    pub fn execute(self) -> Result<()> {
        convert_command(&self.output)
    }
}
