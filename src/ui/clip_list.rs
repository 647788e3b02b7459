use chrono::{DateTime, Local};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::widgets::{Cell, Paragraph, Row, Table, TableState};
use std::time::SystemTime;
use tui_input::Input;
use unicode_width::UnicodeWidthStr;

use super::search::render_search_input;
use crate::models::{ClipEntry, KindFilter, SearchMode};

/// Rows kept between the selection and the list edge while scrolling
const SCROLL_PADDING: usize = 2;

/// Width of the kind column ("IMAGE" is the longest label)
const KIND_COL_WIDTH: u16 = 5;

/// Width of the age column ("just now" is the longest label)
const AGE_COL_WIDTH: u16 = 8;

/// Format timestamp relative to now
fn format_timestamp(timestamp: SystemTime) -> String {
    let dt: DateTime<Local> = timestamp.into();
    let duration = Local::now().signed_duration_since(dt);

    if duration.num_seconds() < 60 {
        "just now".to_string()
    } else if duration.num_minutes() < 60 {
        format!("{}m ago", duration.num_minutes())
    } else if duration.num_hours() < 24 {
        format!("{}h ago", duration.num_hours())
    } else if duration.num_days() < 7 {
        format!("{}d ago", duration.num_days())
    } else if duration.num_weeks() < 4 {
        format!("{}w ago", duration.num_weeks())
    } else {
        dt.format("%b %d").to_string()
    }
}

/// Scroll offset that keeps `selected` on screen with a little context around it
pub fn scroll_offset_for(selected: usize, offset: usize, height: usize, total: usize) -> usize {
    if height == 0 || total <= height {
        return 0;
    }

    let padding = SCROLL_PADDING.min(height.saturating_sub(1) / 2);
    let max_offset = total - height;

    let offset = if selected < offset + padding {
        selected.saturating_sub(padding)
    } else if selected + padding >= offset + height {
        selected + padding + 1 - height
    } else {
        offset
    };

    offset.min(max_offset)
}

fn table_rows<'a>(
    entries: &[&ClipEntry],
    selected: usize,
    preview_width: usize,
    theme: &'a super::Theme,
) -> Vec<Row<'a>> {
    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let is_selected = i == selected;

            let number_cell = Cell::from(Span::styled(format!("{:3}", i), theme.clip_number));

            let pin_text = if entry.pinned {
                theme.pin_indicator.as_str()
            } else {
                ""
            };
            let pin_cell = Cell::from(Span::styled(pin_text, theme.pin_indicator_style));

            let kind_cell = Cell::from(Span::styled(entry.kind().label(), theme.clip_kind));

            let preview_style = if is_selected {
                theme.clip_text_selected
            } else {
                theme.clip_text
            };
            let preview_cell =
                Cell::from(Span::styled(entry.preview(preview_width), preview_style));

            let age_cell = Cell::from(
                Line::from(Span::styled(
                    format_timestamp(entry.timestamp),
                    theme.timestamp,
                ))
                .alignment(Alignment::Right),
            );

            let row = Row::new(vec![number_cell, pin_cell, kind_cell, preview_cell, age_cell]);
            if is_selected {
                row.style(Style::default().bg(theme.selection_bg))
            } else {
                row
            }
        })
        .collect()
}

/// Context for rendering the clip list
pub struct ClipListRenderContext<'a> {
    pub selected: usize,
    pub scroll_offset: usize,
    /// Entries in history before search and filtering
    pub total: usize,
    pub kind_filter: KindFilter,
    /// Shown below the list while a query is being typed or is active
    pub search_input: Option<&'a Input>,
    pub search_focused: bool,
    pub search_mode: SearchMode,
    pub theme: &'a super::Theme,
}

/// Render the clip list: header with counts, one row per clip, optional search prompt
pub fn render_clip_list(
    frame: &mut Frame,
    area: Rect,
    entries: &[&ClipEntry],
    ctx: ClipListRenderContext,
) {
    let search_height = if ctx.search_input.is_some() { 1 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),             // Header
            Constraint::Min(1),                // List
            Constraint::Length(search_height), // Search prompt
        ])
        .split(area);

    let header_area = chunks[0];
    let list_area = chunks[1];

    let title = match ctx.kind_filter {
        KindFilter::All => "Clipboard History".to_string(),
        filter => format!("Clipboard History [{}]", filter.label()),
    };
    let count_text = if entries.len() == ctx.total {
        format!("{} items", ctx.total)
    } else {
        format!("{}/{} items", entries.len(), ctx.total)
    };

    let header_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(count_text.width() as u16),
        ])
        .split(header_area);
    frame.render_widget(
        Paragraph::new(Span::styled(title, ctx.theme.clip_list_header)),
        header_chunks[0],
    );
    frame.render_widget(
        Paragraph::new(Span::styled(count_text, ctx.theme.clip_list_header)),
        header_chunks[2],
    );

    if entries.is_empty() {
        let message = if ctx.total == 0 {
            "Nothing copied yet"
        } else {
            "No matching clips"
        };
        frame.render_widget(
            Paragraph::new(Span::styled(message, ctx.theme.timestamp)),
            list_area,
        );
    } else {
        let pin_col_width = if entries.iter().any(|e| e.pinned) {
            ctx.theme.pin_indicator.width() as u16
        } else {
            0
        };

        // Number, pin, kind and age columns plus 4 column gaps
        let preview_width = list_area
            .width
            .saturating_sub(3 + pin_col_width + KIND_COL_WIDTH + AGE_COL_WIDTH + 4);

        let rows = table_rows(entries, ctx.selected, preview_width as usize, ctx.theme);
        let widths = [
            Constraint::Length(3),
            Constraint::Length(pin_col_width),
            Constraint::Length(KIND_COL_WIDTH),
            Constraint::Min(5),
            Constraint::Length(AGE_COL_WIDTH),
        ];
        let table = Table::new(rows, widths);

        let mut table_state = TableState::default();
        table_state.select(Some(ctx.selected));
        *table_state.offset_mut() = ctx.scroll_offset;

        frame.render_stateful_widget(table, list_area, &mut table_state);
    }

    if let Some(input) = ctx.search_input {
        render_search_input(
            frame,
            chunks[2],
            input,
            ctx.search_focused,
            ctx.search_mode,
            ctx.theme,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_format_timestamp() {
        let now = SystemTime::now();
        assert_eq!(format_timestamp(now), "just now");
        assert_eq!(format_timestamp(now - Duration::from_secs(5 * 60)), "5m ago");
        assert_eq!(format_timestamp(now - Duration::from_secs(3 * 3600)), "3h ago");
        assert_eq!(format_timestamp(now - Duration::from_secs(2 * 86400)), "2d ago");
    }

    #[test]
    fn test_scroll_offset_follows_selection() {
        // Everything fits
        assert_eq!(scroll_offset_for(5, 0, 10, 8), 0);
        // Moving past the bottom edge keeps padding rows below
        assert_eq!(scroll_offset_for(9, 0, 10, 100), 2);
        // Inside the window: unchanged
        assert_eq!(scroll_offset_for(15, 10, 10, 100), 10);
        // Moving above the top edge keeps padding rows above
        assert_eq!(scroll_offset_for(10, 10, 10, 100), 8);
        // Never scrolls past the end
        assert_eq!(scroll_offset_for(99, 0, 10, 100), 90);
    }

    #[test]
    fn test_render_shows_kind_and_counts() {
        use crate::models::{ClipContent, ClipboardHistory};
        use crate::ui::Theme;
        use ratatui::{Terminal, backend::TestBackend};
        use std::path::PathBuf;

        let mut history = ClipboardHistory::new(10);
        history.add_entry(ClipContent::Text("hello world".into()));
        history.add_entry(ClipContent::Files(vec![PathBuf::from("/tmp/a.txt")]));
        let entries: Vec<&ClipEntry> = history.entries().iter().collect();

        let theme = Theme::default();
        let mut terminal = Terminal::new(TestBackend::new(60, 5)).unwrap();
        terminal
            .draw(|f| {
                render_clip_list(
                    f,
                    f.area(),
                    &entries[..1],
                    ClipListRenderContext {
                        selected: 0,
                        scroll_offset: 0,
                        total: 2,
                        kind_filter: KindFilter::Only(crate::models::ClipKind::Files),
                        search_input: None,
                        search_focused: false,
                        search_mode: SearchMode::SmartCase,
                        theme: &theme,
                    },
                )
            })
            .unwrap();

        let buffer = terminal.backend().buffer();
        let line = |y: u16| -> String {
            (0..60u16)
                .map(|x| buffer[(x, y)].symbol().to_string())
                .collect()
        };
        assert!(line(0).contains("Clipboard History [files]"));
        assert!(line(0).contains("1/2 items"));
        assert!(line(1).contains("FILES"));
        assert!(line(1).contains("a.txt"));
    }
}
