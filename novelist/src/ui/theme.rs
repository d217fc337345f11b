//! Color theme and styling for the studio TUI

use ratatui::style::{Color, Modifier, Style};

/// Studio UI color theme
#[derive(Debug, Clone)]
pub struct StudioTheme {
    // Base colors
    pub foreground: Color,
    pub border: Color,
    pub border_focused: Color,

    // Text colors
    pub manuscript_text: Color,
    pub heading: Color,
    pub muted: Color,

    // Mode indicator colors
    pub normal_mode: Color,
    pub insert_mode: Color,
    pub command_mode: Color,

    // Status colors
    pub warning: Color,
}

impl Default for StudioTheme {
    fn default() -> Self {
        Self {
            foreground: Color::White,
            border: Color::DarkGray,
            border_focused: Color::Cyan,

            manuscript_text: Color::White,
            heading: Color::Yellow,
            muted: Color::DarkGray,

            normal_mode: Color::Cyan,
            insert_mode: Color::Green,
            command_mode: Color::Magenta,

            warning: Color::LightRed,
        }
    }
}

impl StudioTheme {
    /// Style for panel borders, highlighted when focused
    pub fn border_style(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(self.border_focused)
        } else {
            Style::default().fg(self.border)
        }
    }

    /// Style for panel titles
    pub fn title_style(&self) -> Style {
        Style::default()
            .fg(self.heading)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for secondary text
    pub fn muted_style(&self) -> Style {
        Style::default().fg(self.muted)
    }

    /// Style for the current mode indicator
    pub fn mode_style(&self, mode: crate::app::InputMode) -> Style {
        let color = match mode {
            crate::app::InputMode::Normal => self.normal_mode,
            crate::app::InputMode::Insert => self.insert_mode,
            crate::app::InputMode::Command => self.command_mode,
        };
        Style::default().fg(color).add_modifier(Modifier::BOLD)
    }
}
