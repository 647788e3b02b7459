pub mod about;
pub mod clip_list;
pub mod error_modal;
pub mod help;
pub mod layout;
pub mod preferences;
pub mod preview;
pub mod search;
pub mod status;
pub mod theme;
pub mod toolbar;

use ratatui::prelude::*;
use ratatui::widgets::{Block, Clear, Paragraph};

pub use about::render_about_overlay;
pub use clip_list::render_clip_list;
pub use error_modal::render_error_modal;
pub use help::render_help_overlay;
pub use layout::{MainLayout, centered_rect, create_main_layout};
pub use preferences::{PrefField, render_preferences_overlay};
pub use preview::render_preview;
pub use search::render_search_input;
pub use status::render_status_bar;
pub use theme::{Theme, ThemeError};
pub use toolbar::{ToolAction, ToolButton, Toolbar, render_toolbar};

/// Render vertical divider line between history and preview panels
pub fn render_divider(frame: &mut Frame, area: Rect, theme: &Theme) {
    // Centered in the gutter, blank columns either side
    let x = area.x + area.width / 2;
    let line_area = Rect::new(x, area.y, area.width.min(1), area.height);

    let lines: Vec<Line> = (0..area.height)
        .map(|_| Line::from(Span::styled("│", theme.divider_style)))
        .collect();
    frame.render_widget(Paragraph::new(lines), line_area);
}

/// Render confirmation dialog overlay for clear all operation
pub fn render_confirm_overlay(frame: &mut Frame, area: Rect, theme: &Theme) {
    let overlay_area = centered_rect(50, 20, area);

    frame.render_widget(Clear, overlay_area);

    let message = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Clear all unpinned clips?",
            theme.modal_text.add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled("(Pinned clips will be kept)", theme.modal_footer)),
        Line::from(""),
        Line::from(vec![
            Span::styled("y", theme.modal_key),
            Span::styled(" - Yes, clear all  ", theme.modal_text),
            Span::styled("n", theme.modal_key),
            Span::styled(" - No, cancel", theme.modal_text),
        ]),
    ];

    let paragraph = Paragraph::new(message)
        .block(
            Block::default()
                .style(Style::default().bg(theme.modal_bg))
                .padding(ratatui::widgets::Padding::uniform(1)),
        )
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, overlay_area);
}
