//! Novel drafting studio TUI.
//!
//! A vim-style terminal interface for drafting a novel with placeholder
//! Muse suggestions.
//!
//! # Headless Mode
//!
//! Run with `--headless` for a line-oriented interface suitable for
//! scripts and automated testing:
//!
//! ```bash
//! cargo run -p novelist -- --headless --data-dir /tmp/draft
//! ```

mod app;
mod events;
mod headless;
mod ui;

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use novelist_core::{SessionConfig, StudioSession};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, stdout};
use std::time::{Duration, Instant};

use app::App;
use events::{handle_event, EventResult};
use ui::render::render;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args: Vec<String> = std::env::args().collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return Ok(());
    }

    let config = build_config(&args);

    if args.iter().any(|a| a == "--headless") {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .init();
        return headless::run_headless(config).await.map_err(|e| e.into());
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let session = StudioSession::open(config).await;

    // Run app
    let result = run_app(&mut terminal, App::new(session)).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;

    if let Err(e) = result {
        eprintln!("Error: {e}");
    }

    Ok(())
}

/// Assemble the session config from args and environment.
fn build_config(args: &[String]) -> SessionConfig {
    let data_dir = args
        .iter()
        .position(|a| a == "--data-dir")
        .and_then(|i| args.get(i + 1))
        .cloned()
        .or_else(|| std::env::var("NOVELIST_DATA_DIR").ok())
        .unwrap_or_else(|| ".novelist".to_string());

    let mut config = SessionConfig::new(data_dir);
    if let Ok(url) = std::env::var("NOVELIST_CONFIG_URL") {
        config = config.with_remote_config_url(url);
    }
    config
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
) -> io::Result<()> {
    let mut last_autosave = Instant::now();

    loop {
        // Render
        terminal.draw(|f| render(f, &app))?;

        // Process any pending export
        if std::mem::take(&mut app.pending_export) {
            match app.session.export().await {
                Ok(path) => app.set_status(format!("Exported to {}", path.display())),
                Err(e) => app.set_status(format!("Export failed: {e}")),
            }
        }

        // Process any pending suggestion request
        if std::mem::take(&mut app.pending_suggestion) {
            app.set_status("The muse is thinking...");
            terminal.draw(|f| render(f, &app))?;

            match app.session.request_suggestion().await {
                Ok(suggestion) => {
                    app.session.accept_suggestion(&suggestion);
                    app.scroll_to_bottom();
                    app.set_status(format!("Suggestion accepted ({})", suggestion.model));
                }
                Err(e) => app.set_status(format!("Suggestion failed: {e}")),
            }
        }

        // Process any pending cover generation
        if std::mem::take(&mut app.pending_cover) {
            app.set_status("Generating cover...");
            terminal.draw(|f| render(f, &app))?;

            match app.session.generate_cover().await {
                Ok(id) => app.set_status(format!("Cover attached (image {id})")),
                Err(e) => app.set_status(format!("Cover generation failed: {e}")),
            }
        }

        // Periodic timestamp write at the configured fixed interval
        if last_autosave.elapsed() >= app.session.autosave_interval() {
            app.session.touch();
            last_autosave = Instant::now();
        }

        // Poll for events with a timeout so the autosave tick still runs
        if event::poll(Duration::from_millis(100))? {
            let ev = event::read()?;
            if handle_event(&mut app, ev) == EventResult::Quit {
                return Ok(());
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn print_help() {
    println!("Novelist - a local-first novel drafting studio");
    println!();
    println!("USAGE:");
    println!("  novelist [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("  -h, --help         Show this help message");
    println!("  --headless         Run the line-oriented interface (no TUI)");
    println!("  --data-dir <DIR>   Slot directory (default: .novelist, or NOVELIST_DATA_DIR)");
    println!();
    println!("ENVIRONMENT:");
    println!("  MUSE_API_KEY          API key for the Muse service");
    println!("  NOVELIST_CONFIG_URL   Remote configuration document URL");
    println!("  NOVELIST_DATA_DIR     Default slot directory");
    println!();
    println!("COMMANDS (command mode, press ':'):");
    println!("  :w            save a snapshot        :export       write the text artifact");
    println!("  :q  :q!  :wq  quit                   :suggest      ask the muse to continue");
    println!("  :title <t>    set the title          :cover        generate a cover image");
    println!("  :genre <g>    set the genre          :genres       list selectable genres");
    println!("  :char add <name> [; bio]             :char rm <id>");
    println!("  :notes <text> world notes            :adult on|off adult content toggle");
    println!("  :key <value>  store an API key");
}
