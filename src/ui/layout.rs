use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Areas of the main screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MainLayout {
    pub toolbar: Rect,
    pub clip_list: Rect,
    pub divider: Rect,
    pub preview: Rect,
    pub status: Rect,
}

/// Create main application layout: toolbar on top, clip list and preview side
/// by side, status bar at the bottom
pub fn create_main_layout(area: Rect) -> MainLayout {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Toolbar
            Constraint::Length(1), // Spacing below toolbar
            Constraint::Min(3),    // Main content area
            Constraint::Length(1), // Spacing before status bar
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(45), // Clip list (left)
            Constraint::Length(3),      // Divider
            Constraint::Min(10),        // Preview (right - remaining space)
        ])
        .split(rows[2]);

    MainLayout {
        toolbar: rows[0],
        clip_list: columns[0],
        divider: columns[1],
        preview: columns[2],
        status: rows[4],
    }
}

/// Create centered rectangle for popups/overlays
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_main_layout_rows() {
        let layout = create_main_layout(Rect::new(0, 0, 100, 30));
        assert_eq!(layout.toolbar, Rect::new(0, 0, 100, 1));
        assert_eq!(layout.status, Rect::new(0, 29, 100, 1));
        assert_eq!(layout.clip_list.y, 2);
        assert_eq!(layout.clip_list.height, 26);
        assert_eq!(layout.divider.width, 3);
        assert_eq!(
            layout.clip_list.width + layout.divider.width + layout.preview.width,
            100
        );
    }
}
