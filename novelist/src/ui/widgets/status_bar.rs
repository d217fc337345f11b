//! Status bar widget

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::app::InputMode;
use crate::ui::theme::StudioTheme;

/// One-line status bar: mode, command buffer or status message, save
/// stamp.
pub struct StatusBarWidget<'a> {
    mode: InputMode,
    command_buffer: &'a str,
    status: Option<&'a str>,
    last_saved: Option<u64>,
    theme: &'a StudioTheme,
}

impl<'a> StatusBarWidget<'a> {
    pub fn new(mode: InputMode, theme: &'a StudioTheme) -> Self {
        Self {
            mode,
            command_buffer: "",
            status: None,
            last_saved: None,
            theme,
        }
    }

    pub fn command_buffer(mut self, buffer: &'a str) -> Self {
        self.command_buffer = buffer;
        self
    }

    pub fn status(mut self, status: Option<&'a str>) -> Self {
        self.status = status;
        self
    }

    pub fn last_saved(mut self, stamp: Option<u64>) -> Self {
        self.last_saved = stamp;
        self
    }

    fn mode_label(&self) -> &'static str {
        match self.mode {
            InputMode::Normal => " NORMAL ",
            InputMode::Insert => " INSERT ",
            InputMode::Command => " COMMAND ",
        }
    }
}

impl Widget for StatusBarWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut spans = vec![Span::styled(self.mode_label(), self.theme.mode_style(self.mode))];

        if self.mode == InputMode::Command {
            spans.push(Span::raw(" "));
            spans.push(Span::raw(self.command_buffer.to_string()));
        } else if let Some(status) = self.status {
            spans.push(Span::raw(" "));
            spans.push(Span::raw(status.to_string()));
        }

        let saved = match self.last_saved {
            Some(stamp) => format!(" saved@{stamp} "),
            None => " unsaved ".to_string(),
        };
        let saved_width = saved.len() as u16;

        Paragraph::new(Line::from(spans)).render(area, buf);

        // Right-aligned save stamp
        if area.width > saved_width {
            let right = Rect {
                x: area.x + area.width - saved_width,
                width: saved_width,
                ..area
            };
            Paragraph::new(Span::styled(saved, self.theme.muted_style())).render(right, buf);
        }
    }
}
