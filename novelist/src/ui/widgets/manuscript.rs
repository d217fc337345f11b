//! Manuscript display widget

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

use crate::ui::theme::StudioTheme;

/// Widget for displaying the manuscript text
pub struct ManuscriptWidget<'a> {
    title: &'a str,
    genre: &'a str,
    body: &'a str,
    scroll: usize,
    theme: &'a StudioTheme,
    focused: bool,
    insert_mode: bool,
}

impl<'a> ManuscriptWidget<'a> {
    pub fn new(title: &'a str, genre: &'a str, body: &'a str, theme: &'a StudioTheme) -> Self {
        Self {
            title,
            genre,
            body,
            scroll: 0,
            theme,
            focused: false,
            insert_mode: false,
        }
    }

    pub fn scroll(mut self, scroll: usize) -> Self {
        self.scroll = scroll;
        self
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub fn insert_mode(mut self, insert: bool) -> Self {
        self.insert_mode = insert;
        self
    }
}

impl Widget for ManuscriptWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block_title = format!(" {} ({}) ", self.title, self.genre);
        let block = Block::default()
            .title(Span::styled(block_title, self.theme.title_style()))
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(self.focused));

        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines: Vec<Line> = self
            .body
            .lines()
            .map(|line| Line::from(line.to_string()))
            .collect();

        if self.body.is_empty() {
            lines.push(Line::from(Span::styled(
                "Press 'i' and start writing.",
                self.theme.muted_style(),
            )));
        } else if self.insert_mode {
            // Visible caret at the end of the text while typing
            match lines.last_mut() {
                Some(last) if !self.body.ends_with('\n') => last.push_span("_"),
                _ => lines.push(Line::from("_")),
            }
        }

        // Cap scroll to keep the last line visible
        let height = inner.height as usize;
        let max_scroll = lines.len().saturating_sub(height);
        let scroll = self.scroll.min(max_scroll);

        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .scroll((scroll as u16, 0))
            .render(inner, buf);
    }
}
