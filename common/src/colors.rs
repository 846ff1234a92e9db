// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.

/// Color given to a project when none is chosen.
pub const DEFAULT_PROJECT_COLOR: &str = "#3B82F6";

/// The fixed palette projects pick their display color from.
pub const PALETTE: [(&str, &str); 8] = [
    ("#3B82F6", "blue"),
    ("#10B981", "green"),
    ("#F59E0B", "yellow"),
    ("#EF4444", "red"),
    ("#8B5CF6", "purple"),
    ("#EC4899", "pink"),
    ("#06B6D4", "cyan"),
    ("#84CC16", "lime"),
];

pub fn default_color() -> String {
    DEFAULT_PROJECT_COLOR.to_string()
}

pub fn is_palette_color(color: &str) -> bool {
    PALETTE.iter().any(|(hex, _)| hex.eq_ignore_ascii_case(color))
}

/// Resolves a palette entry from either its hex code or its name.
pub fn resolve(color: &str) -> Option<&'static str> {
    PALETTE
        .iter()
        .find(|(hex, name)| hex.eq_ignore_ascii_case(color) || name.eq_ignore_ascii_case(color))
        .map(|(hex, _)| *hex)
}

/// Picks the palette color for the next project, wrapping around once the
/// palette is exhausted.
pub fn suggest(existing_projects: usize) -> &'static str {
    PALETTE[existing_projects % PALETTE.len()].0
}
