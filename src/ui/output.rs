use crate::loader::SkippedLink;
use crate::output::is_quiet;
use crate::ui::{theme, Icons};
use owo_colors::OwoColorize;
use std::path::Path;

pub fn header(text: &str) {
    if is_quiet() {
        return;
    }
    println!("{} {}", Icons::FLASK, text.style(theme().header.clone()));
}

pub fn status(icon: &str, label: &str, value: &str) {
    if is_quiet() {
        return;
    }
    println!("{} {}: {}", icon, label.style(theme().dim.clone()), value);
}

pub fn section(title: &str) {
    if is_quiet() {
        return;
    }
    println!();
    println!("━{}━", title.style(theme().header.clone()));
}

pub fn success(label: &str) {
    println!("{} {}", Icons::CHECK, label.style(theme().success.clone()));
}

pub fn error(label: &str) {
    eprintln!("{} {}", Icons::CROSS, label.style(theme().error.clone()));
}

/// One participant that got no junction row
pub fn skipped_link(link: &SkippedLink) {
    if is_quiet() {
        return;
    }
    println!(
        "  {} {} {} in {}",
        Icons::LINK.style(theme().warn.clone()),
        link.formula.style(theme().formula.clone()),
        format!("({})", link.side).style(theme().dim.clone()),
        link.equation
    );
}

/// The completion line. Printed even in quiet mode.
pub fn completed(database: &Path) {
    println!("Database {} created successfully.", database.display());
}
