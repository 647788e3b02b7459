use log::Level;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use super::{Theme, Toolbar};
use crate::app::AppMode;
use crate::logging::FlashMessage;
use crate::models::SearchMode;

type Hints = &'static [(&'static [&'static str], &'static str)];

const NORMAL_HINTS: Hints = &[
    (&["j", "k"], "move"),
    (&["Enter"], "copy"),
    (&["/"], "search"),
    (&["f"], "filter"),
    (&["p"], "pin"),
    (&["d"], "delete"),
    (&["D"], "clear"),
    (&["Tab"], "toolbar"),
    (&["t"], "track"),
    (&["?"], "help"),
];

const SEARCH_HINTS: Hints = &[
    (&["↑", "↓"], "move"),
    (&["Ctrl-r"], "case"),
    (&["Esc"], "done"),
    (&["Enter"], "copy"),
];

const TOOLBAR_HINTS: Hints = &[
    (&["←", "→"], "move"),
    (&["Enter"], "activate"),
    (&["Esc"], "back"),
];

const CONFIRM_HINTS: Hints = &[(&["y"], "confirm"), (&["n", "Esc"], "cancel")];

const CLOSE_HINTS: Hints = &[(&["any key"], "close")];

const HELP_HINTS: Hints = &[(&["j", "k"], "scroll"), (&["any key"], "close")];

const PREFERENCES_HINTS: Hints = &[
    (&["j", "k"], "move"),
    (&["h", "l"], "change"),
    (&["Space"], "toggle"),
    (&["Esc"], "save & close"),
];

/// What the status bar needs to know about the app
pub struct StatusContext<'a> {
    pub mode: AppMode,
    pub toolbar: &'a Toolbar,
    /// Most recent flash message still on screen
    pub flash: Option<&'a FlashMessage>,
    pub search_mode: SearchMode,
}

fn hint_spans(hints: Hints, theme: &Theme) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    for (keys, description) in hints {
        for (i, key) in keys.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled("/", theme.status_desc.add_modifier(Modifier::DIM)));
            }
            spans.push(Span::styled(*key, theme.status_key));
        }
        spans.push(Span::raw(" "));
        spans.push(Span::styled(*description, theme.status_desc));
        spans.push(Span::raw("  "));
    }
    spans
}

fn status_spans<'a>(ctx: &StatusContext<'a>, theme: &Theme) -> Vec<Span<'a>> {
    if let Some(flash) = ctx.flash {
        let style = if flash.level <= Level::Error {
            theme.flash_error
        } else {
            theme.flash_warn
        };
        return vec![Span::styled(flash.message.clone(), style)];
    }

    match ctx.mode {
        AppMode::Toolbar => {
            // Stands in for the hovered button's tooltip
            let button = ctx.toolbar.focused();
            let mut spans = vec![
                Span::styled(button.tooltip, theme.status_key),
                Span::styled(format!(" ({})  ", button.key), theme.status_desc),
            ];
            spans.extend(hint_spans(TOOLBAR_HINTS, theme));
            spans
        }
        AppMode::Search => {
            let mut spans = hint_spans(SEARCH_HINTS, theme);
            if ctx.search_mode == SearchMode::CaseSensitive {
                spans.push(Span::styled("[case-sensitive]", theme.status_key));
            }
            spans
        }
        AppMode::Normal => hint_spans(NORMAL_HINTS, theme),
        AppMode::Confirm => hint_spans(CONFIRM_HINTS, theme),
        AppMode::Help => hint_spans(HELP_HINTS, theme),
        AppMode::About => hint_spans(CLOSE_HINTS, theme),
        AppMode::Preferences => hint_spans(PREFERENCES_HINTS, theme),
    }
}

/// Render the status bar: a flash message if one is active, otherwise
/// mode-specific keyboard hints
pub fn render_status_bar(frame: &mut Frame, area: Rect, ctx: StatusContext, theme: &Theme) {
    let paragraph = Paragraph::new(Line::from(status_spans(&ctx, theme)))
        .style(theme.status_desc.bg(theme.status_bar_bg));
    frame.render_widget(paragraph, area);
}
