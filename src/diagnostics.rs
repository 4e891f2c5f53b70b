use crate::error::Error;

const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Render an error as valid markdown with bold headings and print to stderr.
pub fn print_error(e: &Error) {
    let md = render_error(e);
    for line in md.lines() {
        if line.starts_with('#') {
            eprintln!("{BOLD}{line}{RESET}");
        } else {
            eprintln!("{line}");
        }
    }
}

/// Render an error as a structured markdown diagnostic.
///
/// Each variant produces a block with what happened and how to fix it.
/// Designed to be readable by both humans and CI logs.
pub fn render_error(e: &Error) -> String {
    match e {
        Error::CorpusRootNotFound { path } => format!("\
# Error: Documentation Root Not Found

`{}` does not exist or is not a directory.

## Fix

Pass the path to your documentation tree:

    doclink check docs/
", path.display()),

        Error::Io(e) => format!("\
# Error: I/O

{e}
"),

        Error::JsonSer(e) => format!("\
# Error: JSON Serialization

{e}
"),

        Error::RenameCollision { new_name, old_names } => render_rename_collision(new_name, old_names),

        Error::TomlDe(e) => format!("\
# Error: Invalid Config

`.doclink.toml` could not be parsed:

{e}
"),
    }
}

fn render_rename_collision(new_name: &str, old_names: &[String]) -> String {
    let listed = old_names
        .iter()
        .map(|name| format!("- {name}"))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "\
# Error: Rename Collision

These files would all end up named `{new_name}`:

{listed}

No files were changed.

## Fix

Rename one of them by hand so the kebab-case forms stay distinct, then
re-run:

    doclink harmonize docs/
"
    )
}
