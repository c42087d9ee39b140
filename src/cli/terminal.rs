//! Terminal capability detection

use kbmarket::view::grid::columns_for_width;

/// Whether stdout should receive colour escape codes
pub fn supports_color() -> bool {
    supports_color::on(supports_color::Stream::Stdout).is_some()
}

/// Width of the attached terminal, if there is one
pub fn terminal_width() -> Option<u16> {
    terminal_size::terminal_size().map(|(width, _)| width.0)
}

/// Number of card columns that fit the current terminal
pub fn grid_columns() -> usize {
    columns_for_width(terminal_width())
}
