use ratatui::prelude::*;
use ratatui::widgets::{Block, Clear, Paragraph, Wrap};

use super::Theme;
use super::layout::centered_rect;
use crate::{APP_DESCRIPTION, APP_NAME, APP_VERSION};

const LICENSE: &str = "GNU General Public License, version 2 or later";

/// Render the about overlay
pub fn render_about_overlay(frame: &mut Frame, area: Rect, theme: &Theme) {
    let overlay_area = centered_rect(50, 40, area);
    frame.render_widget(Clear, overlay_area);

    let content = vec![
        Line::from(Span::styled(APP_NAME, theme.modal_title)),
        Line::from(Span::styled(format!("Version {}", APP_VERSION), theme.modal_text)),
        Line::default(),
        Line::from(Span::styled(APP_DESCRIPTION, theme.modal_text)),
        Line::default(),
        Line::from(Span::styled(LICENSE, theme.modal_footer)),
        Line::from(Span::styled(env!("CARGO_PKG_REPOSITORY"), theme.modal_footer)),
    ];

    let paragraph = Paragraph::new(content)
        .block(
            Block::default()
                .style(Style::default().bg(theme.modal_bg))
                .padding(ratatui::widgets::Padding::uniform(2)),
        )
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, overlay_area);
}
