use ratatui::prelude::*;

/// Default pin indicator character
const DEFAULT_PIN_INDICATOR: &str = "*";

/// Theme errors
#[derive(Debug, thiserror::Error)]
pub enum ThemeError {
    #[error("Unknown theme '{0}' (available: dark, light)")]
    UnknownTheme(String),
}

/// Runtime theme with direct field access for all UI elements
#[derive(Debug, Clone)]
pub struct Theme {
    // === Default Colors ===
    pub default_fg: Color,
    pub default_bg: Color,

    // === Backgrounds ===
    pub modal_bg: Color,
    pub selection_bg: Color,
    pub status_bar_bg: Color,

    // === Toolbar ===
    pub toolbar_button: Style,
    pub toolbar_active: Style,
    pub toolbar_focused: Style,

    // === Clip List Elements ===
    pub pin_indicator: String,
    pub pin_indicator_style: Style,
    pub clip_number: Style,
    pub clip_kind: Style,
    pub clip_text: Style,
    pub clip_text_selected: Style,
    pub timestamp: Style,
    pub clip_list_header: Style,

    // === Preview Panel ===
    pub preview_text: Style,
    pub preview_metadata_label: Style,
    pub preview_metadata_value: Style,
    pub preview_missing: Style,

    // === Status Bar ===
    pub status_key: Style,
    pub status_desc: Style,
    pub flash_warn: Style,
    pub flash_error: Style,

    // === Search Input ===
    pub search_input: Style,

    // === Modals ===
    pub modal_title: Style,
    pub modal_header: Style,
    pub modal_key: Style,
    pub modal_text: Style,
    pub modal_footer: Style,
    pub modal_selected: Style,

    // === Error Modal ===
    pub error_text: Style,
    pub error_border: Style,

    pub divider_style: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

/// Palette a built-in theme is derived from
struct Palette {
    fg: Color,
    bg: Color,
    mantle: Color,
    surface: Color,
    subtle: Color,
    blue: Color,
    yellow: Color,
    pink: Color,
    red: Color,
    teal: Color,
    overlay: Color,
}

impl Theme {
    pub const NAMES: &'static [&'static str] = &["dark", "light"];

    /// Catppuccin Mocha based dark theme
    pub fn dark() -> Self {
        Self::from_palette(Palette {
            fg: Color::Rgb(205, 214, 244),
            bg: Color::Rgb(30, 30, 46),
            mantle: Color::Rgb(24, 24, 37),
            surface: Color::Rgb(49, 50, 68),
            subtle: Color::Rgb(166, 173, 200),
            blue: Color::Rgb(137, 180, 250),
            yellow: Color::Rgb(249, 226, 175),
            pink: Color::Rgb(245, 194, 231),
            red: Color::Rgb(243, 139, 168),
            teal: Color::Rgb(137, 220, 235),
            overlay: Color::Rgb(108, 112, 134),
        })
    }

    /// Catppuccin Latte based light theme
    pub fn light() -> Self {
        Self::from_palette(Palette {
            fg: Color::Rgb(76, 79, 105),
            bg: Color::Rgb(239, 241, 245),
            mantle: Color::Rgb(230, 233, 239),
            surface: Color::Rgb(204, 208, 218),
            subtle: Color::Rgb(108, 111, 133),
            blue: Color::Rgb(30, 102, 245),
            yellow: Color::Rgb(223, 142, 29),
            pink: Color::Rgb(234, 118, 203),
            red: Color::Rgb(210, 15, 57),
            teal: Color::Rgb(4, 165, 229),
            overlay: Color::Rgb(156, 160, 176),
        })
    }

    /// Look up a built-in theme by name
    pub fn load(name: &str) -> Result<Self, ThemeError> {
        match name.to_lowercase().as_str() {
            "dark" => Ok(Self::dark()),
            "light" => Ok(Self::light()),
            _ => Err(ThemeError::UnknownTheme(name.to_string())),
        }
    }

    /// Name of the theme following `name`, wrapping around
    pub fn next_name(name: &str) -> &'static str {
        let idx = Self::NAMES
            .iter()
            .position(|n| n.eq_ignore_ascii_case(name))
            .map(|i| (i + 1) % Self::NAMES.len())
            .unwrap_or(0);
        Self::NAMES[idx]
    }

    fn from_palette(p: Palette) -> Self {
        Theme {
            default_fg: p.fg,
            default_bg: p.bg,

            modal_bg: p.mantle,
            selection_bg: p.surface,
            status_bar_bg: p.mantle,

            // Dimmed like a translucent toolbox until something is active
            toolbar_button: Style::default().fg(p.subtle).add_modifier(Modifier::DIM),
            toolbar_active: Style::default().fg(p.teal).add_modifier(Modifier::BOLD),
            toolbar_focused: Style::default().fg(p.bg).bg(p.blue),

            pin_indicator: DEFAULT_PIN_INDICATOR.to_string(),
            pin_indicator_style: Style::default().fg(p.yellow),
            clip_number: Style::default().fg(p.pink).add_modifier(Modifier::BOLD),
            clip_kind: Style::default().fg(p.teal),
            clip_text: Style::default().fg(p.fg),
            clip_text_selected: Style::default().fg(p.blue).add_modifier(Modifier::BOLD),
            timestamp: Style::default().fg(p.subtle),
            clip_list_header: Style::default().fg(p.subtle),

            preview_text: Style::default().fg(p.fg),
            preview_metadata_label: Style::default().fg(p.subtle),
            preview_metadata_value: Style::default().fg(p.fg),
            preview_missing: Style::default().fg(p.red).add_modifier(Modifier::CROSSED_OUT),

            status_key: Style::default().fg(p.fg).add_modifier(Modifier::BOLD),
            status_desc: Style::default().fg(p.subtle),
            flash_warn: Style::default().fg(p.yellow),
            flash_error: Style::default().fg(p.red).add_modifier(Modifier::BOLD),

            search_input: Style::default().fg(p.yellow),

            modal_title: Style::default().fg(p.blue).add_modifier(Modifier::BOLD),
            modal_header: Style::default().fg(p.blue).add_modifier(Modifier::BOLD),
            modal_key: Style::default().fg(p.yellow).add_modifier(Modifier::BOLD),
            modal_text: Style::default().fg(p.fg),
            modal_footer: Style::default().fg(p.subtle),
            modal_selected: Style::default().fg(p.fg).bg(p.surface),

            error_text: Style::default().fg(p.fg),
            error_border: Style::default().fg(p.red),

            divider_style: Style::default().fg(p.overlay),
        }
    }
}
