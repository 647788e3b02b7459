use ratatui::prelude::*;
use ratatui::widgets::{Block, Clear, Paragraph, Wrap};
use unicode_width::UnicodeWidthStr;

use super::Theme;
use super::layout::centered_rect;

/// Height reserved for help modal padding (2 top + 2 bottom)
const HELP_MODAL_PADDING: u16 = 4;

struct HelpSection {
    title: &'static str,
    items: &'static [(&'static [&'static str], &'static str)],
}

const HELP_SECTIONS: &[HelpSection] = &[
    HelpSection {
        title: "Navigation",
        items: &[
            (&["k", "↑", "j", "↓"], "Move up/down"),
            (&["Home", "End"], "Jump to top/bottom"),
            (&["PgUp", "PgDn"], "Page up/down"),
            (&["Ctrl-u", "d"], "Half-page up/down"),
        ],
    },
    HelpSection {
        title: "Search & Filter",
        items: &[
            (&["/"], "Start fuzzy search"),
            (&["Ctrl-r"], "Toggle smart-case / case-sensitive search"),
            (&["f"], "Cycle kind filter: all, text, images, files"),
            (&["Esc"], "Clear search, then filter, then quit"),
        ],
    },
    HelpSection {
        title: "Actions",
        items: &[
            (&["Enter"], "Copy to clipboard"),
            (&["p"], "Toggle pin"),
            (&["d"], "Delete entry"),
            (&["D"], "Clear all unpinned (with confirmation)"),
            (&["c"], "Clear flash messages"),
        ],
    },
    HelpSection {
        title: "Toolbar",
        items: &[
            (&["Tab"], "Focus the toolbar (←/→ move, Enter activates)"),
            (&["q"], "Quit"),
            (&["A"], "About"),
            (&[","], "Preferences"),
            (&["t"], "Track clipboard changes on/off"),
        ],
    },
    HelpSection {
        title: "Help",
        items: &[(&["?"], "Show this help")],
    },
];

/// Add help content with proper styling and fixed-width columns
fn add_help_content(content: &mut Vec<Line<'static>>, section: &HelpSection, theme: &Theme) {
    const KEY_COLUMN_WIDTH: usize = 20;

    content.push(Line::from(Span::styled(section.title, theme.modal_header)));
    content.push(Line::default());

    for (keys, description) in section.items {
        let mut line_spans = Vec::new();
        for (i, key) in keys.iter().enumerate() {
            if i > 0 {
                line_spans.push(Span::styled("/", theme.modal_text.add_modifier(Modifier::DIM)));
            }
            line_spans.push(Span::styled(*key, theme.modal_key));
        }

        let keys_width: usize = keys.iter().map(|k| k.width()).sum::<usize>() + keys.len().saturating_sub(1);
        let padding = KEY_COLUMN_WIDTH.saturating_sub(keys_width);

        line_spans.push(Span::raw(" ".repeat(padding)));
        line_spans.push(Span::styled(*description, theme.modal_text));
        content.push(Line::from(line_spans));
    }

    content.push(Line::default());
}

/// Render help overlay with keybindings
/// Returns the scroll position clamped to the content
pub fn render_help_overlay(frame: &mut Frame, area: Rect, theme: &Theme, scroll: usize) -> usize {
    let overlay_area = centered_rect(60, 80, area);

    // Clear the background area first to hide underlying content
    frame.render_widget(Clear, overlay_area);

    let mut content = vec![
        Line::from(Span::styled("Help", theme.modal_title)),
        Line::default(),
    ];
    for section in HELP_SECTIONS {
        add_help_content(&mut content, section, theme);
    }
    content.push(Line::from(Span::styled(
        "j/k to scroll, any other key to close",
        theme.modal_footer,
    )));

    let available_height = overlay_area.height.saturating_sub(HELP_MODAL_PADDING) as usize;
    let max_scroll = content.len().saturating_sub(available_height);
    let clamped_scroll = scroll.min(max_scroll);

    let paragraph = Paragraph::new(content)
        .block(
            Block::default()
                .style(Style::default().bg(theme.modal_bg))
                .padding(ratatui::widgets::Padding::uniform(2)),
        )
        .scroll((clamped_scroll as u16, 0))
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, overlay_area);

    clamped_scroll
}
