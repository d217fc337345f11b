//! Main application state and logic

use novelist_core::{Genre, StudioSession};

use crate::ui::theme::StudioTheme;
use crate::ui::{FocusedPanel, Overlay};

/// Vim-style input modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Normal mode - navigation and hotkeys (default)
    #[default]
    Normal,
    /// Insert mode - typing into the manuscript
    Insert,
    /// Command mode - entering : commands
    Command,
}

/// Main application state
pub struct App {
    pub session: StudioSession,

    // UI state
    pub theme: StudioTheme,
    pub focused_panel: FocusedPanel,
    overlay: Option<Overlay>,

    // Manuscript display
    pub scroll: usize,
    pub scroll_locked_to_bottom: bool,

    // Input state
    pub input_mode: InputMode,
    command_buffer: String,

    // Status
    status_message: Option<String>,
    pub should_quit: bool,

    // Async work queued for the main loop
    pub pending_export: bool,
    pub pending_suggestion: bool,
    pub pending_cover: bool,
}

impl App {
    pub fn new(session: StudioSession) -> Self {
        let mut app = Self {
            session,
            theme: StudioTheme::default(),
            focused_panel: FocusedPanel::default(),
            overlay: None,
            scroll: 0,
            scroll_locked_to_bottom: true,
            input_mode: InputMode::Normal,
            command_buffer: String::new(),
            status_message: None,
            should_quit: false,
            pending_export: false,
            pending_suggestion: false,
            pending_cover: false,
        };

        let source = app
            .session
            .key_source()
            .map(|s| format!("API key from {s}"))
            .unwrap_or_else(|| "No API key set (:key <value>)".to_string());
        app.set_status(format!("Press 'i' to write, ':' for commands, '?' for help. {source}"));
        app
    }

    // ========================================================================
    // Modes and overlays
    // ========================================================================

    /// Enter command mode (starts with :)
    pub fn enter_command_mode(&mut self) {
        self.input_mode = InputMode::Command;
        self.command_buffer.clear();
        self.command_buffer.push(':');
    }

    /// Exit to normal mode
    pub fn enter_normal_mode(&mut self) {
        self.input_mode = InputMode::Normal;
        self.command_buffer.clear();
    }

    pub fn command_buffer(&self) -> &str {
        &self.command_buffer
    }

    pub fn has_overlay(&self) -> bool {
        self.overlay.is_some()
    }

    pub fn overlay(&self) -> Option<&Overlay> {
        self.overlay.as_ref()
    }

    pub fn toggle_help(&mut self) {
        self.overlay = match self.overlay {
            Some(Overlay::Help) => None,
            _ => Some(Overlay::Help),
        };
    }

    pub fn close_overlay(&mut self) {
        self.overlay = None;
    }

    /// Answer the age gate. `of_age` records verification and enables
    /// the adult content toggle that triggered the gate; declining
    /// clears both flags.
    pub fn answer_age_gate(&mut self, of_age: bool) {
        self.close_overlay();
        if of_age {
            self.session.verify_age();
            self.session.set_adult_content(true);
            self.set_status("Age verified, adult genres unlocked");
        } else {
            self.session.decline_age();
            self.set_status("Adult content stays off");
        }
    }

    // ========================================================================
    // Manuscript editing
    // ========================================================================

    pub fn type_char(&mut self, c: char) {
        let mut buf = [0u8; 4];
        self.session.append_body(c.encode_utf8(&mut buf));
        self.scroll_to_bottom();
    }

    pub fn type_newline(&mut self) {
        self.session.append_body("\n");
        self.scroll_to_bottom();
    }

    pub fn backspace(&mut self) {
        let mut body = self.session.body().to_string();
        if body.pop().is_some() {
            self.session.set_body(body);
        }
    }

    // ========================================================================
    // Scrolling
    // ========================================================================

    pub fn scroll_up(&mut self, lines: usize) {
        self.scroll = self.scroll.saturating_sub(lines);
        self.scroll_locked_to_bottom = false;
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.scroll = self.scroll.saturating_add(lines);
    }

    /// Scroll to the bottom and keep following new text.
    pub fn scroll_to_bottom(&mut self) {
        // Set to a large value; the widget caps it to the real maximum.
        self.scroll = usize::MAX / 2;
        self.scroll_locked_to_bottom = true;
    }

    pub fn scroll_to_top(&mut self) {
        self.scroll = 0;
        self.scroll_locked_to_bottom = false;
    }

    pub fn cycle_focus(&mut self) {
        self.focused_panel = match self.focused_panel {
            FocusedPanel::Manuscript => FocusedPanel::Roster,
            FocusedPanel::Roster => FocusedPanel::Manuscript,
        };
    }

    // ========================================================================
    // Status
    // ========================================================================

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    // ========================================================================
    // Command execution
    // ========================================================================

    /// Push a character into the command buffer.
    pub fn command_push(&mut self, c: char) {
        self.command_buffer.push(c);
    }

    /// Backspace in the command buffer; leaving only nothing exits
    /// command mode.
    pub fn command_backspace(&mut self) -> bool {
        self.command_buffer.pop();
        self.command_buffer.is_empty()
    }

    /// Execute the buffered : command and return to normal mode.
    pub fn submit_command(&mut self) {
        let line = self
            .command_buffer
            .trim_start_matches(':')
            .trim()
            .to_string();
        self.enter_normal_mode();
        if line.is_empty() {
            return;
        }
        self.execute_command(&line);
    }

    fn execute_command(&mut self, line: &str) {
        let (command, rest) = match line.split_once(char::is_whitespace) {
            Some((c, r)) => (c, r.trim()),
            None => (line, ""),
        };

        match command {
            "w" => {
                self.session.save();
                self.set_status("Snapshot saved");
            }
            "q" | "q!" => {
                self.should_quit = true;
            }
            "wq" => {
                self.session.save();
                self.should_quit = true;
            }
            "export" => {
                self.pending_export = true;
            }
            "suggest" => {
                self.pending_suggestion = true;
            }
            "cover" => {
                self.pending_cover = true;
            }
            "title" => {
                if rest.is_empty() {
                    self.set_status(format!("Title: {}", self.session.title()));
                } else {
                    self.session.set_title(rest);
                    self.set_status(format!("Title set to '{rest}'"));
                }
            }
            "genre" => self.command_genre(rest),
            "genres" => {
                let names: Vec<_> = self
                    .session
                    .selectable_genres()
                    .iter()
                    .map(|g| g.name())
                    .collect();
                self.set_status(format!("Genres: {}", names.join(", ")));
            }
            "char" => self.command_char(rest),
            "notes" => {
                self.session.set_world_notes(rest);
                self.set_status("World notes updated");
            }
            "adult" => self.command_adult(rest),
            "key" => {
                if rest.is_empty() {
                    self.set_status("Usage: :key <value>");
                } else {
                    self.session.set_api_key(rest);
                    self.set_status("API key stored in settings");
                }
            }
            _ => self.set_status(format!("Unknown command: :{command}")),
        }
    }

    fn command_genre(&mut self, rest: &str) {
        let Some(genre) = Genre::from_name(rest) else {
            self.set_status(format!("Unknown genre '{rest}' (try :genres)"));
            return;
        };
        match self.session.set_genre(genre) {
            Ok(()) => self.set_status(format!("Genre set to {}", genre.name())),
            Err(e) => self.set_status(format!("{e}")),
        }
    }

    fn command_char(&mut self, rest: &str) {
        let (action, rest) = match rest.split_once(char::is_whitespace) {
            Some((a, r)) => (a, r.trim()),
            None => (rest, ""),
        };

        match action {
            "add" => {
                let (name, bio) = match rest.split_once(';') {
                    Some((n, b)) => (n.trim(), b.trim()),
                    None => (rest, ""),
                };
                match self.session.add_character(name, bio) {
                    Ok(id) => self.set_status(format!("Added '{name}' (id {id})")),
                    Err(e) => self.set_status(format!("{e}")),
                }
            }
            "rm" => match rest.parse::<u64>() {
                Ok(raw) => {
                    let id = novelist_core::CharacterId(raw);
                    match self.session.remove_character(id) {
                        Ok(()) => self.set_status(format!("Removed character {id}")),
                        Err(e) => self.set_status(format!("{e}")),
                    }
                }
                Err(_) => self.set_status("Usage: :char rm <id>"),
            },
            _ => self.set_status("Usage: :char add <name> [; bio] | :char rm <id>"),
        }
    }

    fn command_adult(&mut self, rest: &str) {
        match rest {
            "on" => {
                if self.session.draft().age_verified {
                    self.session.set_adult_content(true);
                    self.set_status("Adult genres unlocked");
                } else {
                    // The age gate asks before the toggle takes effect.
                    self.overlay = Some(Overlay::AgeGate);
                }
            }
            "off" => {
                self.session.set_adult_content(false);
                self.set_status("Adult genres hidden");
            }
            _ => self.set_status("Usage: :adult on|off"),
        }
    }
}
