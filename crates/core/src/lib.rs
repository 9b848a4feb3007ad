//! bazel-cmake-core - Translate Bazel BUILD trees into CMakeLists.txt hierarchies
//!
//! This crate provides functionality to:
//! - Parse BUILD, WORKSPACE and .bzl files and evaluate them against a fixed rule vocabulary
//! - Accumulate CMake fragments per source directory
//! - Stitch per-directory output into `add_subdirectory` hierarchies mirroring the source tree
pub mod bazel;
pub mod cmake;
pub mod config;
pub mod converter;
pub mod error;

// Re-export commonly used types
pub use bazel::{RuleInvocation, RuleRegistry, Value, normalize_dep};
pub use config::ConverterConfig;
pub use converter::{Artifact, Converter, ConverterState, DirectoryRecord, Emitter};
pub use error::{Error, Result};
