use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use super::Theme;

/// Style class set on the track icon while tracking is enabled
pub const ACTIVE_CLASS: &str = "active";

/// What a toolbar button does when activated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolAction {
    Quit,
    About,
    Preferences,
    Track,
}

/// A single icon button
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolButton {
    pub action: ToolAction,
    /// Freedesktop icon name the button stands for
    pub icon: &'static str,
    /// Shortcut key shown next to the glyph
    pub key: &'static str,
    pub tooltip: &'static str,
}

impl ToolButton {
    /// Terminal stand-in for the button's icon
    pub fn glyph(&self) -> &'static str {
        glyph_for_icon(self.icon)
    }
}

/// Map a freedesktop icon name to a single-column glyph
pub fn glyph_for_icon(icon: &str) -> &'static str {
    match icon.trim_end_matches("-symbolic") {
        "application-exit" => "⏻",
        "help-about" => "ⓘ",
        "preferences-system" => "⚙",
        "emblem-synchronizing" => "⟳",
        _ => "□",
    }
}

/// Ordered set of CSS-like style classes on a widget
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleClasses(Vec<&'static str>);

impl StyleClasses {
    pub fn add(&mut self, class: &'static str) {
        if !self.has(class) {
            self.0.push(class);
        }
    }

    pub fn remove(&mut self, class: &str) {
        self.0.retain(|c| *c != class);
    }

    pub fn has(&self, class: &str) -> bool {
        self.0.iter().any(|c| *c == class)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Main toolbox: quit, about, preferences and the track toggle, in that order
#[derive(Debug, Clone)]
pub struct Toolbar {
    buttons: [ToolButton; 4],
    focused: usize,
    track_active: bool,
    track_icon_classes: StyleClasses,
}

impl Toolbar {
    pub fn new(track_active: bool) -> Self {
        let mut toolbar = Toolbar {
            buttons: [
                ToolButton {
                    action: ToolAction::Quit,
                    icon: "application-exit-symbolic",
                    key: "q",
                    tooltip: "Quit",
                },
                ToolButton {
                    action: ToolAction::About,
                    icon: "help-about-symbolic",
                    key: "A",
                    tooltip: "About",
                },
                ToolButton {
                    action: ToolAction::Preferences,
                    icon: "preferences-system-symbolic",
                    key: ",",
                    tooltip: "Preferences",
                },
                ToolButton {
                    action: ToolAction::Track,
                    icon: "emblem-synchronizing-symbolic",
                    key: "t",
                    tooltip: "Track clipboard changes",
                },
            ],
            focused: 0,
            track_active: false,
            track_icon_classes: StyleClasses::default(),
        };
        toolbar.set_track_active(track_active);
        toolbar
    }

    pub fn buttons(&self) -> &[ToolButton] {
        &self.buttons
    }

    pub fn is_track_active(&self) -> bool {
        self.track_active
    }

    /// Set the toggle state, keeping the icon's `active` class in sync
    pub fn set_track_active(&mut self, active: bool) {
        self.track_active = active;
        if active {
            self.track_icon_classes.add(ACTIVE_CLASS);
        } else {
            self.track_icon_classes.remove(ACTIVE_CLASS);
        }
    }

    /// Flip the toggle, returning the new state
    pub fn toggle_track(&mut self) -> bool {
        self.set_track_active(!self.track_active);
        self.track_active
    }

    pub fn track_icon_classes(&self) -> &StyleClasses {
        &self.track_icon_classes
    }

    pub fn focused(&self) -> &ToolButton {
        &self.buttons[self.focused]
    }

    pub fn focus_next(&mut self) {
        self.focused = (self.focused + 1) % self.buttons.len();
    }

    pub fn focus_prev(&mut self) {
        self.focused = (self.focused + self.buttons.len() - 1) % self.buttons.len();
    }

    /// Button bound to a shortcut key, if any
    pub fn button_for_key(&self, key: char) -> Option<&ToolButton> {
        self.buttons
            .iter()
            .find(|b| b.key.chars().eq(std::iter::once(key)))
    }
}

/// Render the toolbar as a single row of buttons
///
/// `show_focus` highlights the focused button while the toolbar has keyboard focus.
pub fn render_toolbar(
    frame: &mut Frame,
    area: Rect,
    toolbar: &Toolbar,
    show_focus: bool,
    theme: &Theme,
) {
    let mut spans = Vec::new();

    for (i, button) in toolbar.buttons().iter().enumerate() {
        let mut style = if button.action == ToolAction::Track
            && toolbar.track_icon_classes().has(ACTIVE_CLASS)
        {
            theme.toolbar_active
        } else {
            theme.toolbar_button
        };
        if show_focus && i == toolbar.focused {
            style = style.patch(theme.toolbar_focused);
        }

        spans.push(Span::styled(format!(" {} {} ", button.glyph(), button.key), style));
        spans.push(Span::raw(" "));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
