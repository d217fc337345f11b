//! Render orchestration for the studio TUI

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, InputMode};
use crate::ui::widgets::{ManuscriptWidget, RosterWidget, StatusBarWidget};

/// Which panel is focused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusedPanel {
    #[default]
    Manuscript,
    Roster,
}

/// Overlay types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    Help,
    AgeGate,
}

/// Main render function
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(area);

    let panels = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(72), Constraint::Percentage(28)])
        .split(rows[0]);

    let draft = app.session.draft();

    let manuscript = ManuscriptWidget::new(
        &draft.title,
        draft.genre.name(),
        &draft.body,
        &app.theme,
    )
    .scroll(app.scroll)
    .focused(matches!(app.focused_panel, FocusedPanel::Manuscript))
    .insert_mode(app.input_mode == InputMode::Insert);
    frame.render_widget(manuscript, panels[0]);

    let roster = RosterWidget::new(draft, &app.theme)
        .focused(matches!(app.focused_panel, FocusedPanel::Roster));
    frame.render_widget(roster, panels[1]);

    let status_bar = StatusBarWidget::new(app.input_mode, &app.theme)
        .command_buffer(app.command_buffer())
        .status(app.status_message())
        .last_saved(app.session.last_saved());
    frame.render_widget(status_bar, rows[1]);

    // Render overlay if present
    if let Some(overlay) = app.overlay() {
        render_overlay(frame, app, *overlay, area);
    }
}

fn render_overlay(frame: &mut Frame, app: &App, overlay: Overlay, area: Rect) {
    match overlay {
        Overlay::Help => render_help(frame, app, area),
        Overlay::AgeGate => render_age_gate(frame, app, area),
    }
}

fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let lines = vec![
        Line::from(Span::styled("Keys", app.theme.title_style())),
        Line::from("  i        write into the manuscript"),
        Line::from("  Esc      back to normal mode"),
        Line::from("  j/k g/G  scroll, top, bottom"),
        Line::from("  Tab      switch panel focus"),
        Line::from("  s        save snapshot    m  ask the muse"),
        Line::from("  q        quit"),
        Line::from(""),
        Line::from(Span::styled("Commands", app.theme.title_style())),
        Line::from("  :w :q :wq :export"),
        Line::from("  :title <t>   :genre <g>   :genres"),
        Line::from("  :char add <name> [; bio]  :char rm <id>"),
        Line::from("  :notes <text>   :adult on|off   :key <value>"),
        Line::from("  :suggest   :cover"),
        Line::from(""),
        Line::from(Span::styled("Esc or ? to close", app.theme.muted_style())),
    ];

    let popup = centered_rect(area, 56, (lines.len() + 2) as u16);
    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: false }).block(
            Block::default()
                .title(" Help ")
                .borders(Borders::ALL)
                .border_style(app.theme.border_style(true)),
        ),
        popup,
    );
}

fn render_age_gate(frame: &mut Frame, app: &App, area: Rect) {
    let lines = vec![
        Line::from("Adult genre options are age-restricted."),
        Line::from(""),
        Line::from("Are you 18 or older?"),
        Line::from(""),
        Line::from(Span::styled("  y - yes      n - no", app.theme.title_style())),
    ];

    let popup = centered_rect(area, 46, (lines.len() + 2) as u16);
    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .title(" Age Check ")
                .borders(Borders::ALL)
                .border_style(app.theme.border_style(true)),
        ),
        popup,
    );
}

/// A fixed-size rect centered in `area`.
fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
