use ratatui::prelude::*;
use ratatui::widgets::{Block, Clear, Paragraph};

use super::Theme;
use super::layout::centered_rect;
use crate::storage::GeneralConfig;

const MAX_HISTORY_STEP: usize = 50;
const MAX_HISTORY_MIN: usize = 10;
const MAX_HISTORY_MAX: usize = 10_000;

/// An editable row in the preferences overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefField {
    TrackChanges,
    ExitOnSelect,
    ShowPreviewMetadata,
    DebugLogging,
    MaxHistory,
    Theme,
}

impl PrefField {
    pub const ALL: [PrefField; 6] = [
        PrefField::TrackChanges,
        PrefField::ExitOnSelect,
        PrefField::ShowPreviewMetadata,
        PrefField::DebugLogging,
        PrefField::MaxHistory,
        PrefField::Theme,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            PrefField::TrackChanges => "Track clipboard changes",
            PrefField::ExitOnSelect => "Quit after copying",
            PrefField::ShowPreviewMetadata => "Show preview metadata",
            PrefField::DebugLogging => "Debug logging (next start)",
            PrefField::MaxHistory => "History size",
            PrefField::Theme => "Theme",
        }
    }

    pub fn value(&self, config: &GeneralConfig) -> String {
        let on_off = |b: bool| String::from(if b { "on" } else { "off" });
        match self {
            PrefField::TrackChanges => on_off(config.track_changes),
            PrefField::ExitOnSelect => on_off(config.exit_on_select),
            PrefField::ShowPreviewMetadata => on_off(config.show_preview_metadata),
            PrefField::DebugLogging => on_off(config.debug_logging),
            PrefField::MaxHistory => config.max_history.to_string(),
            PrefField::Theme => config.theme.clone(),
        }
    }

    /// Step the value: switches flip whatever the direction, sizes move by
    /// a fixed step within bounds, themes cycle
    pub fn adjust(&self, config: &mut GeneralConfig, delta: i32) {
        match self {
            PrefField::TrackChanges => config.track_changes = !config.track_changes,
            PrefField::ExitOnSelect => config.exit_on_select = !config.exit_on_select,
            PrefField::ShowPreviewMetadata => {
                config.show_preview_metadata = !config.show_preview_metadata
            }
            PrefField::DebugLogging => config.debug_logging = !config.debug_logging,
            PrefField::MaxHistory => {
                let step = MAX_HISTORY_STEP * delta.unsigned_abs() as usize;
                let value = if delta < 0 {
                    config.max_history.saturating_sub(step)
                } else {
                    config.max_history.saturating_add(step)
                };
                config.max_history = value.clamp(MAX_HISTORY_MIN, MAX_HISTORY_MAX);
            }
            PrefField::Theme => config.theme = Theme::next_name(&config.theme).to_string(),
        }
    }
}

/// Render the preferences overlay
pub fn render_preferences_overlay(
    frame: &mut Frame,
    area: Rect,
    config: &GeneralConfig,
    selected: usize,
    theme: &Theme,
) {
    const LABEL_WIDTH: usize = 26;

    let overlay_area = centered_rect(50, 50, area);
    frame.render_widget(Clear, overlay_area);

    let mut content = vec![
        Line::from(Span::styled("Preferences", theme.modal_title)),
        Line::default(),
    ];

    for (i, field) in PrefField::ALL.iter().enumerate() {
        let style = if i == selected {
            theme.modal_selected
        } else {
            theme.modal_text
        };
        content.push(
            Line::from(vec![
                Span::raw(format!("{:<width$}", field.label(), width = LABEL_WIDTH)),
                Span::styled(field.value(config), theme.modal_key),
            ])
            .style(style),
        );
    }

    content.push(Line::default());
    content.push(Line::from(Span::styled(
        "Changes are saved when the dialog closes",
        theme.modal_footer,
    )));

    let paragraph = Paragraph::new(content).block(
        Block::default()
            .style(Style::default().bg(theme.modal_bg))
            .padding(ratatui::widgets::Padding::uniform(2)),
    );

    frame.render_widget(paragraph, overlay_area);
}
