//! Color palette and styling for CLI output.

use owo_colors::{OwoColorize, Style};

/// Style for warning text.
pub fn warning() -> Style {
    Style::new().yellow()
}

/// Style for failure messages.
pub fn failure() -> Style {
    Style::new().red()
}

/// Style for debug traces - present but out of the way.
pub fn debug() -> Style {
    Style::new().dimmed()
}

/// Style for section headings like "Currently reading:".
pub fn heading() -> Style {
    Style::new().white().bold()
}

/// Format a book title in italics.
pub fn fmt_title(text: &str, use_color: bool) -> String {
    if use_color {
        text.italic().to_string()
    } else {
        text.to_string()
    }
}

/// Format a section heading with styling.
pub fn fmt_heading(text: &str, use_color: bool) -> String {
    if use_color {
        text.style(heading()).to_string()
    } else {
        text.to_string()
    }
}

/// Format warning text with styling.
pub fn fmt_warning(text: &str, use_color: bool) -> String {
    if use_color {
        text.style(warning()).to_string()
    } else {
        text.to_string()
    }
}

/// Format failure text with styling.
pub fn fmt_failure(text: &str, use_color: bool) -> String {
    if use_color {
        text.style(failure()).to_string()
    } else {
        text.to_string()
    }
}

/// Format debug text with styling.
pub fn fmt_debug(text: &str, use_color: bool) -> String {
    if use_color {
        text.style(debug()).to_string()
    } else {
        text.to_string()
    }
}
