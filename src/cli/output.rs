//! Terminal output formatting with colors
//!
//! Respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE automatically.

use colored::Colorize;
use itertools::Itertools;

use crate::application::Structure;

/// Print error (red bold "error:" prefix) to stderr
pub fn error(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// Print warning (yellow "Warning:" prefix) to stderr
pub fn warning(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "Warning".yellow(), msg);
}

/// Print success status (green checkmark)
pub fn success(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{} {}", "✓".green(), msg);
}

/// Print failure status (red X)
pub fn failure(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{} {}", "✗".red(), msg);
}

/// Print skipped status (dimmed dash)
pub fn skipped(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{} {}", "-".dimmed(), msg.to_string().dimmed());
}

/// Print section header (cyan bold)
pub fn header(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg.to_string().cyan().bold());
}

/// Print indented detail (no color)
pub fn detail(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("  {}", msg);
}

/// Print plain output (no color)
pub fn info(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg);
}

/// Text rendering of a structure: bracketed sequence for linear kinds,
/// a `termtree` for trees.
pub fn render_structure(structure: &Structure) -> String {
    match structure {
        Structure::ArrayList(_) | Structure::LinkedList(_) | Structure::Stack(_) => {
            let values = structure
                .as_sequence()
                .map(|s| s.to_vec())
                .unwrap_or_default();
            let sep = if matches!(structure, Structure::LinkedList(_)) {
                " -> "
            } else {
                ", "
            };
            format!("{}: [{}]", structure.kind(), values.iter().join(sep))
        }
        Structure::BinaryTree(tree) => tree.arena().to_termtree(|v| v.to_string()).to_string(),
        Structure::Bst(tree) | Structure::Avl(tree) => tree
            .arena()
            .to_termtree(|n| format!("{} (h={})", n.value, n.height))
            .to_string(),
        Structure::Huffman(tree) => tree.arena().to_termtree(|n| n.to_string()).to_string(),
    }
}
