//! Configuration management for bazel-to-cmake

mod settings;

pub use settings::{CONFIG_FILE_NAMES, ConverterConfig};
