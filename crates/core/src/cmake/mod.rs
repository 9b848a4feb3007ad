//! CMake fragment rendering

pub mod templates;

/// Render `command(head\n  item\n  item)\n`, or `command(head)\n` when `items` is empty
pub fn call<S: AsRef<str>>(command: &str, head: &str, items: &[S]) -> String {
    let mut out = format!("{command}({head}");
    for item in items {
        out.push_str("\n  ");
        out.push_str(item.as_ref());
    }
    out.push_str(")\n");
    out
}

pub fn add_subdirectory(dir_name: &str) -> String {
    format!("add_subdirectory({dir_name})\n")
}

pub fn post_build_copy(target: &str, source: &str, destination: &str) -> String {
    format!(
        "add_custom_command(\n    TARGET {target} POST_BUILD\n    COMMAND ${{CMAKE_COMMAND}} -E copy\n            {source}\n            {destination})\n"
    )
}
