//! Story bible sidebar widget

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

use novelist_core::Draft;

use crate::ui::theme::StudioTheme;

/// Sidebar showing characters, images, notes, and content flags
pub struct RosterWidget<'a> {
    draft: &'a Draft,
    theme: &'a StudioTheme,
    focused: bool,
}

impl<'a> RosterWidget<'a> {
    pub fn new(draft: &'a Draft, theme: &'a StudioTheme) -> Self {
        Self {
            draft,
            theme,
            focused: false,
        }
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }
}

impl Widget for RosterWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(" Story Bible ")
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(self.focused));

        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines: Vec<Line> = Vec::new();

        lines.push(Line::from(Span::styled(
            "Characters",
            self.theme.title_style(),
        )));
        if self.draft.characters.is_empty() {
            lines.push(Line::from(Span::styled(
                "  none yet (:char add <name>)",
                self.theme.muted_style(),
            )));
        }
        for character in &self.draft.characters {
            lines.push(Line::from(format!(
                "  {} [{}]",
                character.name, character.id
            )));
            if !character.bio.is_empty() {
                let bio = character.bio.lines().next().unwrap_or_default();
                lines.push(Line::from(Span::styled(
                    format!("    {bio}"),
                    self.theme.muted_style(),
                )));
            }
        }

        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("Images", self.theme.title_style())));
        lines.push(Line::from(format!(
            "  {} attached",
            self.draft.images.len()
        )));
        if let Some(latest) = self.draft.images.last() {
            lines.push(Line::from(Span::styled(
                format!("  latest: {}", latest.name),
                self.theme.muted_style(),
            )));
        }

        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "World Notes",
            self.theme.title_style(),
        )));
        if self.draft.world_notes.is_empty() {
            lines.push(Line::from(Span::styled(
                "  none yet (:notes <text>)",
                self.theme.muted_style(),
            )));
        } else {
            for line in self.draft.world_notes.lines().take(6) {
                lines.push(Line::from(format!("  {line}")));
            }
        }

        lines.push(Line::from(""));
        let flags = match (self.draft.age_verified, self.draft.adult_content) {
            (true, true) => "adult genres unlocked",
            (true, false) => "age verified",
            _ => "all-ages",
        };
        lines.push(Line::from(Span::styled(
            format!("Content: {flags}"),
            self.theme.muted_style(),
        )));

        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .render(inner, buf);
    }
}
