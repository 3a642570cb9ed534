use console::{style, StyledObject};

/// Signal colors match the overlay: red for bug days, yellow for CI failures.
pub fn bug(text: impl std::fmt::Display) -> StyledObject<String> {
    style(text.to_string()).red().bold()
}

pub fn failure(text: impl std::fmt::Display) -> StyledObject<String> {
    style(text.to_string()).yellow().bold()
}

/// Fetch lifecycle states shown by the spinner.
pub fn pending(text: impl std::fmt::Display) -> StyledObject<String> {
    style(text.to_string()).bright().yellow()
}

pub fn done(text: impl std::fmt::Display) -> StyledObject<String> {
    style(text.to_string()).bright().green()
}

pub fn failed(text: impl std::fmt::Display) -> StyledObject<String> {
    style(text.to_string()).bright().red()
}

pub fn heading(text: impl std::fmt::Display) -> StyledObject<String> {
    style(text.to_string()).bright().underlined()
}

pub fn muted(text: impl std::fmt::Display) -> StyledObject<String> {
    style(text.to_string()).dim()
}
