use ratatui::layout::Position;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use tui_input::Input;

use super::Theme;
use crate::models::SearchMode;

/// Render the one-line search prompt, placing the cursor when it has focus
pub fn render_search_input(
    frame: &mut Frame,
    area: Rect,
    input: &Input,
    focused: bool,
    mode: SearchMode,
    theme: &Theme,
) {
    let prefix = match mode {
        SearchMode::SmartCase => "/",
        SearchMode::CaseSensitive => "/Aa ",
    };
    let prefix_width = prefix.chars().count() as u16;

    let [prefix_area, input_area] =
        Layout::horizontal([Constraint::Length(prefix_width), Constraint::Min(1)]).areas(area);

    // Keep the cursor visible when the query is wider than the area
    let scroll = input.visual_scroll(input_area.width.max(1) as usize);

    frame.render_widget(
        Paragraph::new(prefix).style(theme.search_input.add_modifier(Modifier::DIM)),
        prefix_area,
    );
    frame.render_widget(
        Paragraph::new(input.value())
            .style(theme.search_input)
            .scroll((0, scroll as u16)),
        input_area,
    );

    if focused {
        let cursor_x = input.visual_cursor().saturating_sub(scroll) as u16;
        frame.set_cursor_position(Position::new(
            (input_area.x + cursor_x).min(input_area.right().saturating_sub(1)),
            input_area.y,
        ));
    }
}
