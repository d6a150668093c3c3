//! Terminal color support and semantic styles for guia output.

use std::io::IsTerminal;

use colored::{ColoredString, Colorize};

use crate::catalog::Category;

/// Level of color support detected for the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSupport {
    /// `NO_COLOR` set, `TERM=dumb` or piped output.
    None,
    Basic,
}

impl ColorSupport {
    #[must_use]
    pub fn detect() -> Self {
        // https://no-color.org/
        if std::env::var_os("NO_COLOR").is_some() {
            return Self::None;
        }
        if std::env::var_os("FORCE_COLOR").is_some() {
            return Self::Basic;
        }
        if !std::io::stdout().is_terminal() {
            return Self::None;
        }
        if std::env::var("TERM").is_ok_and(|term| term == "dumb") {
            return Self::None;
        }
        Self::Basic
    }

    #[must_use]
    pub const fn has_color(self) -> bool {
        matches!(self, Self::Basic)
    }

    /// Apply the detected support to the `colored` crate globally.
    pub fn apply(self) {
        colored::control::set_override(self.has_color());
    }
}

/// Pre-built styles for listing output.
pub struct GuiaStyles;

impl GuiaStyles {
    pub fn title<S: AsRef<str>>(text: S) -> ColoredString {
        text.as_ref().bold()
    }

    pub fn muted<S: AsRef<str>>(text: S) -> ColoredString {
        text.as_ref().bright_black()
    }

    pub fn warning<S: AsRef<str>>(text: S) -> ColoredString {
        text.as_ref().yellow()
    }

    pub fn error<S: AsRef<str>>(text: S) -> ColoredString {
        text.as_ref().red().bold()
    }

    pub fn featured<S: AsRef<str>>(text: S) -> ColoredString {
        text.as_ref().bright_yellow().bold()
    }

    /// Green from 4.5, yellow from 3.5, red below.
    #[must_use]
    pub fn rating(rating: f64) -> ColoredString {
        let text = format!("{rating:.1}★");
        if rating >= 4.5 {
            text.green()
        } else if rating >= 3.5 {
            text.yellow()
        } else {
            text.red()
        }
    }

    #[must_use]
    pub fn price(level: u8) -> ColoredString {
        "$".repeat(usize::from(level)).cyan()
    }

    pub fn category(category: Category, label: &str) -> ColoredString {
        match category {
            Category::Restaurant => label.red(),
            Category::Hotel => label.blue(),
            Category::Attraction => label.magenta(),
            Category::Shopping => label.yellow(),
            Category::Service => label.white(),
            Category::Activity => label.green(),
            Category::Wellness => label.cyan(),
            Category::Nightlife => label.bright_magenta(),
        }
    }
}
