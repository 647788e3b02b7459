use chrono::{DateTime, Local};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::widgets::{Paragraph, Wrap};
use std::io::Cursor;
use unicode_width::UnicodeWidthStr;

use super::Theme;
use crate::models::{ClipContent, ClipEntry};

/// Rows used by the metadata block under the content
const METADATA_HEIGHT: u16 = 3;

/// Pixel dimensions read from the image header, without decoding the pixels
fn image_dimensions(data: &[u8]) -> Option<(u32, u32)> {
    image::ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .ok()?
        .into_dimensions()
        .ok()
}

fn human_size(bytes: usize) -> String {
    const KIB: f64 = 1024.0;
    let b = bytes as f64;
    if b < KIB {
        format!("{} B", bytes)
    } else if b < KIB * KIB {
        format!("{:.1} KiB", b / KIB)
    } else {
        format!("{:.1} MiB", b / (KIB * KIB))
    }
}

fn content_lines<'a>(entry: &'a ClipEntry, theme: &Theme) -> Vec<Line<'a>> {
    match &entry.content {
        ClipContent::Text(text) => text.lines().map(Line::from).collect(),
        ClipContent::Image { data, mime_type } => {
            let dims = match image_dimensions(data) {
                Some((w, h)) => format!("{}×{}", w, h),
                None => "unknown size".to_string(),
            };
            vec![
                Line::from(Span::styled("[Image]", theme.preview_metadata_label)),
                Line::from(vec![
                    Span::styled("Type: ", theme.preview_metadata_label),
                    Span::styled(mime_type.as_str(), theme.preview_metadata_value),
                ]),
                Line::from(vec![
                    Span::styled("Dimensions: ", theme.preview_metadata_label),
                    Span::styled(dims, theme.preview_metadata_value),
                ]),
            ]
        }
        ClipContent::Files(paths) => paths
            .iter()
            .map(|path| {
                let style = if path.exists() {
                    theme.preview_text
                } else {
                    theme.preview_missing
                };
                Line::from(Span::styled(path.to_string_lossy(), style))
            })
            .collect(),
    }
}

fn metadata_lines<'a>(entry: &'a ClipEntry, width: usize, theme: &Theme) -> Vec<Line<'a>> {
    let kind = entry.kind().label();
    let size = human_size(entry.content.size());
    let padding = width.saturating_sub(kind.width() + size.width()).max(1);

    let detail = match &entry.content {
        ClipContent::Text(text) => format!("{} lines, {} chars", text.lines().count(), text.chars().count()),
        ClipContent::Image { mime_type, .. } => mime_type.clone(),
        ClipContent::Files(paths) => {
            let missing = entry.missing_files().len();
            if missing > 0 {
                format!("{} paths, {} missing", paths.len(), missing)
            } else {
                format!("{} paths", paths.len())
            }
        }
    };

    let copied: DateTime<Local> = entry.timestamp.into();
    let mut last = vec![
        Span::styled("Copied ", theme.preview_metadata_label),
        Span::styled(
            copied.format("%Y-%m-%d %H:%M:%S").to_string(),
            theme.preview_metadata_value,
        ),
    ];
    if entry.pinned {
        last.push(Span::raw("  "));
        last.push(Span::styled(
            format!("{} pinned", theme.pin_indicator),
            theme.pin_indicator_style,
        ));
    }

    vec![
        Line::from(vec![
            Span::styled(kind, theme.preview_metadata_value.add_modifier(Modifier::BOLD)),
            Span::raw(" ".repeat(padding)),
            Span::styled(size, theme.preview_metadata_label),
        ]),
        Line::from(Span::styled(detail, theme.preview_metadata_label)),
        Line::from(last),
    ]
}

/// Render preview panel with content at top and metadata at bottom
pub fn render_preview(
    frame: &mut Frame,
    area: Rect,
    entry: Option<&ClipEntry>,
    show_metadata: bool,
    theme: &Theme,
) {
    let Some(entry) = entry else {
        frame.render_widget(
            Paragraph::new("No selection").style(theme.preview_metadata_label),
            area,
        );
        return;
    };

    let (content_area, metadata_area) = if show_metadata {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(1),                  // Content
                Constraint::Length(METADATA_HEIGHT), // Metadata
            ])
            .split(area);
        (chunks[0], Some(chunks[1]))
    } else {
        (area, None)
    };

    frame.render_widget(
        Paragraph::new(content_lines(entry, theme))
            .style(theme.preview_text)
            .wrap(Wrap { trim: false }),
        content_area,
    );

    if let Some(metadata_area) = metadata_area {
        frame.render_widget(
            Paragraph::new(metadata_lines(entry, metadata_area.width as usize, theme)),
            metadata_area,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn png(width: u32, height: u32) -> Vec<u8> {
        let mut out = Cursor::new(Vec::new());
        image::RgbImage::new(width, height)
            .write_to(&mut out, image::ImageFormat::Png)
            .unwrap();
        out.into_inner()
    }

    #[test]
    fn test_image_dimensions_from_header() {
        assert_eq!(image_dimensions(&png(7, 3)), Some((7, 3)));
        assert_eq!(image_dimensions(b"not an image"), None);
    }

    #[test]
    fn test_human_size() {
        assert_eq!(human_size(512), "512 B");
        assert_eq!(human_size(2048), "2.0 KiB");
        assert_eq!(human_size(3 * 1024 * 1024), "3.0 MiB");
    }

    #[test]
    fn test_metadata_counts_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let present = dir.path().join("here.txt");
        std::fs::write(&present, "x").unwrap();
        let entry = ClipEntry::new(
            1,
            ClipContent::Files(vec![present, PathBuf::from("/nonexistent/gone.txt")]),
        );

        let lines = metadata_lines(&entry, 40, &Theme::default());
        assert_eq!(lines[1].to_string(), "2 paths, 1 missing");
        assert!(lines[0].to_string().starts_with("FILES"));
    }

    #[test]
    fn test_image_preview_shows_dimensions() {
        let entry = ClipEntry::new(
            1,
            ClipContent::Image {
                data: png(4, 2),
                mime_type: "image/png".into(),
            },
        );
        let lines = content_lines(&entry, &Theme::default());
        assert_eq!(lines[2].to_string(), "Dimensions: 4×2");
    }
}
