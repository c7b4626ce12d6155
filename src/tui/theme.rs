//! Color themes for the wizard and editor.
//!
//! Themes are built in and picked by name from the `[ui]` config section.

use ratatui::style::Color;

/// Colors used by the wizard and editor views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub name: &'static str,
    /// Step titles, editor border, headings
    pub primary: Color,
    /// Panel titles, selected differentiator chips, code
    pub secondary: Color,
    /// Markers, bullets, command icons, mode badge
    pub accent: Color,
    /// Status messages
    pub highlight: Color,
    pub text: Color,
    /// Subtitles and descriptions
    pub text_dim: Color,
    /// Placeholders, hints, loading text
    pub text_muted: Color,
    /// `Reset` keeps the terminal background
    pub background: Color,
    /// Highlighted list rows and the progress track
    pub selected_bg: Color,
    pub border: Color,
    /// Incomplete review notice
    pub warning: Color,
}

const DEFAULT: Theme = Theme {
    name: "default",
    primary: Color::Rgb(56, 189, 248),    // Sky
    secondary: Color::Rgb(52, 211, 153),  // Emerald
    accent: Color::Rgb(244, 114, 182),    // Pink
    highlight: Color::Rgb(253, 224, 71),  // Yellow
    text: Color::White,
    text_dim: Color::Rgb(161, 161, 170),  // Zinc-400
    text_muted: Color::Rgb(113, 113, 122), // Zinc-500
    background: Color::Reset,
    selected_bg: Color::Rgb(39, 39, 42),  // Zinc-800
    border: Color::Rgb(82, 82, 91),       // Zinc-600
    warning: Color::Rgb(251, 146, 60),    // Orange
};

const PAPER: Theme = Theme {
    name: "paper",
    primary: Color::Rgb(29, 78, 216),     // Blue-700
    secondary: Color::Rgb(4, 120, 87),    // Emerald-700
    accent: Color::Rgb(190, 24, 93),      // Pink-700
    highlight: Color::Rgb(161, 98, 7),    // Yellow-700
    text: Color::Rgb(24, 24, 27),
    text_dim: Color::Rgb(82, 82, 91),
    text_muted: Color::Rgb(113, 113, 122),
    background: Color::Rgb(250, 250, 249),
    selected_bg: Color::Rgb(228, 228, 231),
    border: Color::Rgb(161, 161, 170),
    warning: Color::Rgb(194, 65, 12),
};

const NORD: Theme = Theme {
    name: "nord",
    primary: Color::Rgb(136, 192, 208),   // Frost
    secondary: Color::Rgb(163, 190, 140), // Aurora green
    accent: Color::Rgb(180, 142, 173),    // Aurora purple
    highlight: Color::Rgb(235, 203, 139), // Aurora yellow
    text: Color::Rgb(236, 239, 244),
    text_dim: Color::Rgb(216, 222, 233),
    text_muted: Color::Rgb(97, 110, 136),
    background: Color::Rgb(46, 52, 64),
    selected_bg: Color::Rgb(59, 66, 82),
    border: Color::Rgb(76, 86, 106),
    warning: Color::Rgb(208, 135, 112),
};

const BUILTIN: [Theme; 3] = [DEFAULT, PAPER, NORD];

impl Default for Theme {
    fn default() -> Self {
        DEFAULT
    }
}

impl Theme {
    /// Get a theme by name (case-insensitive).
    pub fn by_name(name: &str) -> Option<Self> {
        BUILTIN.iter().find(|theme| theme.name.eq_ignore_ascii_case(name)).copied()
    }

    /// Names of the built-in themes.
    pub fn available_themes() -> Vec<&'static str> {
        BUILTIN.iter().map(|theme| theme.name).collect()
    }
}
