use anyhow::{Context, Result, bail};
use bazel_cmake_core::{Converter, ConverterConfig};
use std::path::Path;
use tracing::debug;

pub fn convert_command(output: &str) -> Result<()> {
    validate_output_name(output)?;

    let root = std::env::current_dir().context("Failed to determine current directory")?;
    debug!("Converting {:?} into {}", root, output);

    let config = ConverterConfig::discover(&root).context("Failed to load configuration")?;
    let written = Converter::new(config)
        .run(&root, output)
        .with_context(|| format!("Failed to convert {}", root.display()))?;

    for path in &written {
        println!("✅ {}", written_label(&root, path));
    }
    if written.is_empty() {
        println!("⚠️  No BUILD files found, nothing written");
    }

    Ok(())
}

/// Path of a written file relative to the source root, with `./` marking the root itself
fn written_label(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    match relative.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => relative.display().to_string(),
        _ => format!("./{}", relative.display()),
    }
}

/// The output name is used as-is in every directory, so it must be a bare file name
fn validate_output_name(output: &str) -> Result<()> {
    let path = Path::new(output);
    if output.is_empty() || path.file_name().and_then(|n| n.to_str()) != Some(output) {
        bail!("Output must be a plain file name, got {output:?}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_output_name() {
        assert!(validate_output_name("CMakeLists.txt").is_ok());
        assert!(validate_output_name("").is_err());
        assert!(validate_output_name("out/CMakeLists.txt").is_err());
        assert!(validate_output_name("..").is_err());
    }

    #[test]
    fn test_written_label_names_the_directory() {
        let root = Path::new("/src/upb");
        assert_eq!(
            written_label(root, &root.join("CMakeLists.txt")),
            "./CMakeLists.txt"
        );
        assert_eq!(
            written_label(root, &root.join("upb/json/CMakeLists.txt")),
            "upb/json/CMakeLists.txt"
        );
    }
}
