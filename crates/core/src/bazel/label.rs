//! Bazel label handling

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// Reduce a dependency label to the bare target name used as a CMake target.
///
/// `b`, `:a`, `//x:c`, `@repo//x:c`, `//x/y` (default target `y`) and `@zlib` all map
/// to a name without label syntax. Normalizing a normalized name returns it unchanged.
pub fn normalize_dep(dep: &str) -> String {
    let dep = dep.trim();
    let without_repo = match dep.strip_prefix('@') {
        Some(rest) => match rest.find("//") {
            Some(idx) => &rest[idx..],
            None => rest,
        },
        None => dep,
    };
    let path = without_repo.trim_start_matches('/');

    match path.rsplit_once(':') {
        Some((_, target)) => target.replace('/', "_"),
        None => path.rsplit('/').next().unwrap_or(path).to_string(),
    }
}

/// Strip the package-local `:` from a file label such as `:port_def.inc`
pub fn strip_file_label(file: &str) -> &str {
    file.strip_prefix(':').unwrap_or(file)
}

/// A label split into its repository-relative package and target parts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Label<'a> {
    /// `//pkg:target` or `@//pkg:target`
    Absolute { package: &'a str, target: &'a str },
    /// `:target`
    Local { target: &'a str },
    /// `@repo//pkg:target`
    External { repository: &'a str },
    /// `path/to/file.bzl`
    Path(&'a str),
}

impl<'a> Label<'a> {
    pub fn parse(label: &'a str) -> Self {
        if let Some(rest) = label.strip_prefix("@//") {
            return Self::absolute(rest);
        }
        if let Some(rest) = label.strip_prefix('@') {
            let repository = rest.split("//").next().unwrap_or(rest);
            return Label::External { repository };
        }
        if let Some(rest) = label.strip_prefix("//") {
            return Self::absolute(rest);
        }
        if let Some(target) = label.strip_prefix(':') {
            return Label::Local { target };
        }
        Label::Path(label)
    }

    fn absolute(rest: &'a str) -> Self {
        match rest.split_once(':') {
            Some((package, target)) => Label::Absolute { package, target },
            None => {
                let target = rest.rsplit('/').next().unwrap_or(rest);
                Label::Absolute { package: rest, target }
            }
        }
    }
}

/// Resolve the file a `load()` label refers to.
///
/// `//:` is rooted at the source root, `:file` at the loading package. External
/// repositories cannot be resolved; they yield `Ok(None)` when `ignore_external` is set
/// and `FileNotFound` otherwise.
pub fn resolve_load_path(
    label: &str,
    root: &Path,
    package_dir: &Path,
    ignore_external: bool,
) -> Result<Option<PathBuf>> {
    let path = match Label::parse(label) {
        Label::Absolute { package, target } => root.join(package).join(target),
        Label::Local { target } => package_dir.join(target),
        Label::Path(path) => root.join(path),
        Label::External { repository } => {
            if ignore_external {
                tracing::debug!("Skipping load of external repository @{}: {}", repository, label);
                return Ok(None);
            }
            return Err(Error::FileNotFound(PathBuf::from(label)));
        }
    };

    if path.is_file() {
        Ok(Some(path))
    } else {
        Err(Error::FileNotFound(path))
    }
}

/// Source and destination of a test data file relative to the CMake build tree
pub fn data_copy_paths(data: &str) -> (String, String) {
    match Label::parse(data) {
        Label::Absolute { package, target } if !package.is_empty() => (
            format!("${{CMAKE_SOURCE_DIR}}/{package}/{target}"),
            format!("${{CMAKE_CURRENT_BINARY_DIR}}/{target}"),
        ),
        Label::Absolute { target, .. } => (
            format!("${{CMAKE_SOURCE_DIR}}/{target}"),
            format!("${{CMAKE_CURRENT_BINARY_DIR}}/{target}"),
        ),
        _ => {
            let relative = strip_file_label(data);
            (
                format!("${{CMAKE_CURRENT_SOURCE_DIR}}/{relative}"),
                format!("${{CMAKE_CURRENT_BINARY_DIR}}/{relative}"),
            )
        }
    }
}
